//! Persisted rule record and its canonical defaults.

use serde::Serialize;

use super::{Activation, Aggregation, CellProperty, MappingType, TextOn, TextReplace, TooltipDirection, ValueType};
use crate::maps::{LinkMap, RangeMap, ShapeMap, TextMap, ValueMap};
use crate::matcher::compile_pattern;

pub const DEFAULT_PATTERN: &str = ".*";
pub const DEFAULT_ALIAS: &str = "myRule";
pub const DEFAULT_UNIT: &str = "short";
pub const DEFAULT_DECIMALS: u32 = 2;
pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";
pub const DEFAULT_TEXT_PATTERN: &str = "/.*/";
pub const DEFAULT_COLORS: [&str; 3] = [
    "rgba(245, 54, 54, 0.9)",
    "rgba(237, 129, 40, 0.89)",
    "rgba(50, 172, 45, 0.97)",
];
pub const DEFAULT_THRESHOLDS: [f64; 2] = [50.0, 80.0];

/// Plain, persistable form of a rule as stored in panel configuration.
///
/// Every field is optional on input: absent, `null` or undecodable keys
/// take the value from [`RuleData::default`], which is the only place
/// defaults are defined. Decoding lives in [`super::de`].
/// `order` is kept optional so an import can tell whether the host
/// recorded one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleData {
    pub alias: String,
    pub pattern: String,
    pub hidden: bool,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    pub aggregation: Aggregation,
    pub unit: String,
    pub decimals: u32,
    pub colors: Vec<String>,
    pub invert: bool,
    pub thresholds: Vec<f64>,
    pub string_warning: String,
    pub string_critical: String,
    pub date_format: String,
    pub color_on: Activation,
    pub text_on: TextOn,
    pub text_replace: TextReplace,
    pub text_pattern: String,
    pub link: bool,
    pub link_url: String,
    pub link_params: bool,
    pub link_on: Activation,
    pub tooltip: bool,
    pub tooltip_label: String,
    pub tooltip_colors: bool,
    pub tooltip_on: Activation,
    pub tooltip_direction: TooltipDirection,
    pub overlay_icon: bool,
    pub mapping_type: MappingType,
    pub shape_prop: CellProperty,
    pub text_prop: CellProperty,
    pub link_prop: CellProperty,
    pub shape_data: Vec<ShapeMap>,
    pub text_data: Vec<TextMap>,
    pub link_data: Vec<LinkMap>,
    pub value_data: Vec<ValueMap>,
    pub range_data: Vec<RangeMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Fields that failed to decode and fell back to their default.
    #[serde(skip)]
    pub(crate) decode_problems: Vec<String>,
}

impl Default for RuleData {
    fn default() -> Self {
        Self {
            alias: DEFAULT_ALIAS.to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            hidden: false,
            value_type: ValueType::Number,
            aggregation: Aggregation::Current,
            unit: DEFAULT_UNIT.to_string(),
            decimals: DEFAULT_DECIMALS,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            invert: false,
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            string_warning: String::new(),
            string_critical: String::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            color_on: Activation::Always,
            text_on: TextOn::Always,
            text_replace: TextReplace::Content,
            text_pattern: DEFAULT_TEXT_PATTERN.to_string(),
            link: false,
            link_url: String::new(),
            link_params: false,
            link_on: Activation::Always,
            tooltip: false,
            tooltip_label: String::new(),
            tooltip_colors: false,
            tooltip_on: Activation::Always,
            tooltip_direction: TooltipDirection::Vertical,
            overlay_icon: false,
            mapping_type: MappingType::ValueMap,
            shape_prop: CellProperty::Id,
            text_prop: CellProperty::Id,
            link_prop: CellProperty::Id,
            shape_data: Vec::new(),
            text_data: Vec::new(),
            link_data: Vec::new(),
            value_data: Vec::new(),
            range_data: Vec::new(),
            order: None,
            decode_problems: Vec::new(),
        }
    }
}

impl RuleData {
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    /// Configuration problems that degrade rendering without failing it.
    ///
    /// Nothing here is fatal: a rule with warnings still imports and
    /// renders with the documented fallbacks.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.decode_problems.clone();

        let mut check_pattern = |field: &str, pattern: &str| {
            if pattern.is_empty() {
                return;
            }
            if let Err(e) = compile_pattern(pattern) {
                warnings.push(format!("{}: {}", field, e));
            }
        };
        check_pattern("pattern", &self.pattern);
        check_pattern("textPattern", &self.text_pattern);
        for (i, m) in self.shape_data.iter().enumerate() {
            check_pattern(&format!("shapeData[{}]", i), &m.pattern);
        }
        for (i, m) in self.text_data.iter().enumerate() {
            check_pattern(&format!("textData[{}]", i), &m.pattern);
        }
        for (i, m) in self.link_data.iter().enumerate() {
            check_pattern(&format!("linkData[{}]", i), &m.pattern);
        }

        if self.value_type == ValueType::Number {
            match self.thresholds.as_slice() {
                [t0, t1] if t0 >= t1 => warnings.push(format!(
                    "thresholds: warning bound {} is not below critical bound {}",
                    t0, t1
                )),
                [_, _] => {}
                other => warnings.push(format!(
                    "thresholds: expected 2 bounds, found {}; levels disabled",
                    other.len()
                )),
            }
        }

        if self.colors.len() != 3 {
            warnings.push(format!("colors: expected 3 colors, found {}", self.colors.len()));
        }

        warnings
    }
}
