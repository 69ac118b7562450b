use flowmap_core::DataValue;
use serde::{Deserialize, Serialize};

use super::{SubMap, NULL_SENTINEL};
use crate::matcher::match_string;
use crate::schema::de::string_or_number;

/// Translation of one literal value into display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValueMap {
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    #[serde(deserialize_with = "string_or_number")]
    pub text: String,
    pub hidden: bool,
}

impl ValueMap {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            hidden: false,
        }
    }

    /// Match order: null sentinel, numeric equality for non-text samples,
    /// then pattern match against the sample's string form.
    pub fn matches(&self, value: &DataValue) -> bool {
        if self.hidden {
            return false;
        }
        if value.is_null() {
            return self.value == NULL_SENTINEL;
        }
        if !matches!(value, DataValue::Text(_)) {
            if let (Some(sample), Ok(expected)) = (value.as_f64(), self.value.trim().parse::<f64>()) {
                if sample == expected {
                    return true;
                }
            }
        }
        match_string(&value.to_display_string(), &self.value)
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

impl SubMap for ValueMap {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}
