use std::fmt;

use flowmap_core::DataValue;
use serde::{Deserialize, Serialize};

use super::Rule;
use crate::schema::ValueType;

/// Severity computed from a value. Ordered: `Disabled < Ok < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// No threshold applies (feature disabled or value unusable).
    Disabled,
    Ok,
    Warning,
    Critical,
}

impl Level {
    /// Numeric encoding used by hosts: -1, 0, 1, 2.
    pub fn as_i8(self) -> i8 {
        match self {
            Level::Disabled => -1,
            Level::Ok => 0,
            Level::Warning => 1,
            Level::Critical => 2,
        }
    }

    pub fn from_i8(level: i8) -> Self {
        match level {
            i8::MIN..=-1 => Level::Disabled,
            0 => Level::Ok,
            1 => Level::Warning,
            _ => Level::Critical,
        }
    }

    pub fn is_alert(self) -> bool {
        self >= Level::Warning
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Disabled => write!(f, "disabled"),
            Level::Ok => write!(f, "ok"),
            Level::Warning => write!(f, "warning"),
            Level::Critical => write!(f, "critical"),
        }
    }
}

impl Rule {
    /// Severity of `value` under this rule.
    ///
    /// Numbers use the two-cut scale `[t0, t1]`: low values are critical
    /// unless `invert` is set. Strings compare against `stringWarning` and
    /// `stringCritical`, first raw then formatted, later hits overriding
    /// earlier ones. Dates carry no levels.
    pub fn threshold_level(&self, value: &DataValue) -> Level {
        match self.data.value_type {
            ValueType::Number => self.numeric_level(value),
            ValueType::String => self.string_level(value),
            ValueType::Date => Level::Disabled,
        }
    }

    fn numeric_level(&self, value: &DataValue) -> Level {
        let [t0, t1] = match self.data.thresholds.as_slice() {
            [t0, t1] => [*t0, *t1],
            _ => return Level::Disabled,
        };
        let v = match value.as_f64() {
            Some(v) if v.is_finite() => v,
            _ => return Level::Disabled,
        };

        let (low, mid, high) = if self.data.invert {
            (Level::Ok, Level::Warning, Level::Critical)
        } else {
            (Level::Critical, Level::Warning, Level::Ok)
        };
        let mut level = low;
        if v >= t0 {
            level = mid;
        }
        if v >= t1 {
            level = high;
        }
        level
    }

    fn string_level(&self, value: &DataValue) -> Level {
        let warning = self.data.string_warning.as_str();
        let critical = self.data.string_critical.as_str();
        let mut level = Level::Ok;

        let mut compare = |candidate: &str| {
            if !warning.is_empty() && candidate == warning {
                level = Level::Warning;
            }
            if !critical.is_empty() && candidate == critical {
                level = Level::Critical;
            }
        };
        if !value.is_null() {
            compare(&value.to_display_string());
        }
        compare(&self.formatted_value(value));
        level
    }

    /// Colors as indexed by level: authored order when inverted, reversed
    /// otherwise.
    fn level_color(&self, index: usize) -> Option<&str> {
        let colors = &self.data.colors;
        if index >= colors.len() {
            return None;
        }
        let i = if self.data.invert {
            index
        } else {
            colors.len() - 1 - index
        };
        Some(colors[i].as_str())
    }

    /// Color for `level`. Falls back to the first level color when the
    /// palette is shorter than the level. `None` only for an empty palette.
    pub fn color_for_level(&self, level: Level) -> Option<&str> {
        let index = match level {
            Level::Disabled | Level::Ok => 0,
            Level::Warning => 1,
            Level::Critical => 2,
        };
        self.level_color(index).or_else(|| self.level_color(0))
    }

    /// Color for `value`; `None` for date rules.
    pub fn color_for_value(&self, value: &DataValue) -> Option<&str> {
        if self.data.value_type == ValueType::Date {
            return None;
        }
        self.color_for_level(self.threshold_level(value))
    }
}
