use flowmap_core::DataValue;
use serde::{Deserialize, Serialize};

use super::{SubMap, NULL_SENTINEL};
use crate::schema::de::string_or_number;

/// Translation of an inclusive numeric range into display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RangeMap {
    #[serde(deserialize_with = "string_or_number")]
    pub from: String,
    #[serde(deserialize_with = "string_or_number")]
    pub to: String,
    #[serde(deserialize_with = "string_or_number")]
    pub text: String,
    pub hidden: bool,
}

fn bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

impl RangeMap {
    pub fn new(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            hidden: false,
        }
    }

    /// `"null"` on both bounds catches everything, nulls included.
    pub fn is_sentinel(&self) -> bool {
        self.from == NULL_SENTINEL && self.to == NULL_SENTINEL
    }

    /// `from <= value <= to` after numeric coercion of all three.
    ///
    /// Null samples and unparseable bounds never match a numeric range.
    pub fn matches(&self, value: &DataValue) -> bool {
        if self.hidden {
            return false;
        }
        if self.is_sentinel() {
            return true;
        }
        match (bound(&self.from), bound(&self.to), value.as_f64()) {
            (Some(from), Some(to), Some(v)) => from <= v && v <= to,
            _ => false,
        }
    }

    /// Mapped text when this map matches, otherwise `value` unchanged.
    pub fn formatted_text(&self, value: &DataValue) -> DataValue {
        if self.matches(value) {
            DataValue::Text(self.text.clone())
        } else {
            value.clone()
        }
    }
}

impl SubMap for RangeMap {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}
