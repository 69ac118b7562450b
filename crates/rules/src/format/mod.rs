//! Value formatting collaborator.
//!
//! Rules format numbers and dates through a [`ValueFormatter`]. Hosts with
//! their own unit catalog inject it; [`BuiltinFormatter`] covers the common
//! units and moment-style date patterns.

pub mod date;
pub mod units;

use std::fmt;

use flowmap_core::{DataValue, DisplayTimezone};

pub use units::{is_known_unit, to_fixed};

pub trait ValueFormatter: Send + Sync + fmt::Debug {
    fn format_number(&self, value: f64, unit: &str, decimals: u32) -> String;

    /// `None` when `value` cannot be read as a date.
    fn format_date(&self, value: &DataValue, pattern: &str) -> Option<String>;

    /// Whether `unit` is part of this formatter's catalog.
    fn knows_unit(&self, unit: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFormatter {
    pub timezone: DisplayTimezone,
}

impl BuiltinFormatter {
    pub fn new(timezone: DisplayTimezone) -> Self {
        Self { timezone }
    }
}

impl ValueFormatter for BuiltinFormatter {
    fn format_number(&self, value: f64, unit: &str, decimals: u32) -> String {
        units::format_unit(value, unit, decimals)
    }

    fn format_date(&self, value: &DataValue, pattern: &str) -> Option<String> {
        date::format_date(value, pattern, self.timezone)
    }

    fn knows_unit(&self, unit: &str) -> bool {
        is_known_unit(unit)
    }
}

/// Natural number of decimal places of `value` (`1.25` → 2, `3` → 0).
pub fn decimal_places(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let repr = value.to_string();
    repr.find('.')
        .map(|pos| (repr.len() - pos - 1) as u32)
        .unwrap_or(0)
}
