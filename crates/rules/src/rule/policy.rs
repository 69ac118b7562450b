//! Per-channel activation gates.

use super::{Level, Rule};
use crate::schema::{Activation, TextOn};

fn gate(activation: Activation, level: Level) -> bool {
    match activation {
        Activation::Never => false,
        Activation::Always => true,
        Activation::WarningOrCritical => level >= Level::Warning,
    }
}

impl Rule {
    pub fn to_colorize(&self, level: Level) -> bool {
        if level == Level::Disabled {
            return false;
        }
        gate(self.data.color_on, level)
    }

    pub fn to_labelize(&self, level: Level) -> bool {
        match self.data.text_on {
            TextOn::Never => false,
            TextOn::Always => true,
            TextOn::WarningOrCritical => level >= Level::Warning,
            TextOn::CriticalOnly => level >= Level::Critical,
        }
    }

    pub fn to_iconize(&self, level: Level) -> bool {
        self.data.overlay_icon && level >= Level::Warning
    }

    pub fn to_linkable(&self, level: Level) -> bool {
        self.data.link && gate(self.data.link_on, level)
    }

    pub fn to_tooltipize(&self, level: Level) -> bool {
        self.data.tooltip && gate(self.data.tooltip_on, level)
    }

    /// Link target. With `linkParams`, the current page query (`?a=b` or
    /// `a=b`) is appended to the URL.
    pub fn link(&self, page_query: Option<&str>) -> String {
        let url = self.data.link_url.clone();
        if !self.data.link_params {
            return url;
        }
        let query = match page_query.map(|q| q.trim_start_matches('?')) {
            Some(q) if !q.is_empty() => q,
            _ => return url,
        };
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", url, separator, query)
    }
}
