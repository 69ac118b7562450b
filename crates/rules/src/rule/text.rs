//! Value formatting and label merging.

use flowmap_core::DataValue;

use super::Rule;
use crate::format::decimal_places;
use crate::matcher::cached_pattern;
use crate::schema::{MappingType, TextReplace, ValueType};

pub const INVALID_NUMBER: &str = "Invalid Number";
pub const INVALID_DATE: &str = "Invalid date";
pub const NO_VALUE: &str = "-";

fn plain_text(value: &DataValue) -> String {
    if value.is_null() {
        NO_VALUE.to_string()
    } else {
        value.to_display_string()
    }
}

impl Rule {
    /// Display text for `value` according to this rule's type.
    pub fn formatted_value(&self, value: &DataValue) -> String {
        match self.data.value_type {
            ValueType::Number => self.format_number(value),
            ValueType::String => self.format_string(value),
            ValueType::Date => self.format_date(value),
        }
    }

    fn format_number(&self, value: &DataValue) -> String {
        if value.is_null() {
            return NO_VALUE.to_string();
        }
        let v = match value.as_f64() {
            Some(v) if v.is_finite() => v,
            _ => return INVALID_NUMBER.to_string(),
        };
        // Never pad a value beyond its own precision.
        let decimals = self.data.decimals.min(decimal_places(v));
        self.ctx.formatter.format_number(v, &self.data.unit, decimals)
    }

    fn format_string(&self, value: &DataValue) -> String {
        let value = match value {
            DataValue::List(_) => DataValue::Text(value.to_display_string()),
            other => other.clone(),
        };
        let mapped = match self.data.mapping_type {
            MappingType::ValueMap => self
                .data
                .value_data
                .iter()
                .find(|m| m.matches(&value))
                .map(|m| m.text.clone()),
            MappingType::RangeMap => self
                .data
                .range_data
                .iter()
                .find(|m| m.matches(&value))
                .map(|m| m.text.clone()),
            MappingType::Disabled => None,
        };
        mapped.unwrap_or_else(|| plain_text(&value))
    }

    fn format_date(&self, value: &DataValue) -> String {
        let value = match value {
            DataValue::List(items) => items.first().cloned().unwrap_or_default(),
            other => other.clone(),
        };
        if value.is_null() {
            return NO_VALUE.to_string();
        }
        let pattern = if self.data.date_format.is_empty() {
            self.ctx.default_date_format.as_str()
        } else {
            self.data.date_format.as_str()
        };
        self.ctx
            .formatter
            .format_date(&value, pattern)
            .unwrap_or_else(|| INVALID_DATE.to_string())
    }

    /// Merge `formatted` into the label text already on a cell.
    pub fn replace_text(&self, existing: &str, formatted: &str) -> String {
        match self.data.text_replace {
            TextReplace::Content => formatted.to_string(),
            TextReplace::Pattern => match cached_pattern(&self.data.text_pattern) {
                Ok(pattern) => pattern
                    .replace(existing, formatted)
                    .unwrap_or_else(|| existing.to_string()),
                Err(e) => {
                    self.ctx.logger.warn(&format!(
                        "rule '{}': textPattern '{}' ignored: {}",
                        self.data.alias, self.data.text_pattern, e
                    ));
                    existing.to_string()
                }
            },
            TextReplace::AppendSpace => format!("{} {}", existing, formatted),
            TextReplace::AppendNewline => format!("{}\n{}", existing, formatted),
        }
    }
}
