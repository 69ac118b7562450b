//! Policy and type enums persisted inside rule records.
//!
//! Each enum accepts the short codes older panel versions wrote
//! (`n`, `wc`, `a`, ...) as aliases of its canonical name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a series' samples are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Number,
    String,
    Date,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Number => write!(f, "number"),
            ValueType::String => write!(f, "string"),
            ValueType::Date => write!(f, "date"),
        }
    }
}

/// Reduced statistic read off a series when no explicit value is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    #[serde(alias = "last")]
    Current,
    First,
    Min,
    Max,
    #[serde(alias = "mean")]
    Avg,
    #[serde(alias = "sum")]
    Total,
    Count,
    Delta,
    Diff,
    Range,
}

impl Aggregation {
    /// Key of this statistic in `Series::stats`.
    pub fn stat_key(self) -> &'static str {
        match self {
            Aggregation::Current => "current",
            Aggregation::First => "first",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
            Aggregation::Avg => "avg",
            Aggregation::Total => "total",
            Aggregation::Count => "count",
            Aggregation::Delta => "delta",
            Aggregation::Diff => "diff",
            Aggregation::Range => "range",
        }
    }
}

/// Activation policy for the color, link and tooltip channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[serde(alias = "n")]
    Never,
    #[default]
    #[serde(alias = "a")]
    Always,
    #[serde(alias = "wc")]
    WarningOrCritical,
}

/// Activation policy for the label channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextOn {
    #[serde(alias = "n")]
    Never,
    #[default]
    #[serde(alias = "a", alias = "wmd")]
    Always,
    #[serde(alias = "wc")]
    WarningOrCritical,
    #[serde(alias = "co")]
    CriticalOnly,
}

/// How formatted value text merges into existing label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextReplace {
    #[default]
    Content,
    Pattern,
    #[serde(alias = "as")]
    AppendSpace,
    #[serde(alias = "anl")]
    AppendNewline,
}

/// Which sub-map table resolves string values to display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MappingType {
    Disabled,
    #[default]
    ValueMap,
    RangeMap,
}

/// Cell property the host compares against shape/text/link patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CellProperty {
    #[default]
    Id,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TooltipDirection {
    #[default]
    #[serde(alias = "v")]
    Vertical,
    #[serde(alias = "h")]
    Horizontal,
}
