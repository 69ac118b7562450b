use flowmap_core::{DataValue, Series};
use serde::Serialize;

use super::{Level, Rule};

/// Tooltip content for a governed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Visual treatment one rule assigns to one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub rule: String,
    pub serie: String,
    pub value: DataValue,
    pub level: Level,
    pub formatted_value: String,
    /// Fill color, present only when the color channel is active.
    pub color: Option<String>,
    /// Whether the label channel is active; see [`Rule::render_label`].
    pub label: bool,
    pub icon: bool,
    pub link: Option<String>,
    pub tooltip: Option<Tooltip>,
}

impl Rule {
    /// Compose every visual channel for `serie`, `None` when this rule
    /// does not govern it.
    pub fn decide(&self, serie: &Series, page_query: Option<&str>) -> Option<Decision> {
        if !self.match_serie(serie) {
            return None;
        }
        let value = self.value_for_serie(serie);
        let level = self.threshold_level(&value);
        let formatted_value = self.formatted_value(&value);

        let color = if self.to_colorize(level) {
            self.color_for_value(&value).map(str::to_string)
        } else {
            None
        };
        let link = self
            .to_linkable(level)
            .then(|| self.link(page_query));
        let tooltip = self.to_tooltipize(level).then(|| Tooltip {
            label: if self.data.tooltip_label.is_empty() {
                serie.alias.clone()
            } else {
                self.data.tooltip_label.clone()
            },
            value: formatted_value.clone(),
            color: if self.data.tooltip_colors {
                self.color_for_level(level).map(str::to_string)
            } else {
                None
            },
        });

        self.context().logger.debug(&format!(
            "rule '{}' on '{}': level {} value '{}'",
            self.data.alias, serie.alias, level, formatted_value
        ));

        Some(Decision {
            rule: self.data.alias.clone(),
            serie: serie.alias.clone(),
            value,
            level,
            label: self.to_labelize(level),
            icon: self.to_iconize(level),
            formatted_value,
            color,
            link,
            tooltip,
        })
    }

    /// New label text for a cell currently showing `existing`, `None`
    /// when the decision leaves labels untouched.
    pub fn render_label(&self, existing: &str, decision: &Decision) -> Option<String> {
        decision
            .label
            .then(|| self.replace_text(existing, &decision.formatted_value))
    }
}
