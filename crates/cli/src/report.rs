//! Per-series evaluation results and their plain-text rendering.

use flowmap_core::Series;
use flowmap_rules::{Decision, RuleSet};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerieReport {
    pub serie: String,
    /// `None` when no rule governs the series.
    pub decision: Option<Decision>,
}

/// Decide every series against `set`, keeping input order.
pub fn evaluate(set: &RuleSet, series: &[Series], page_query: Option<&str>) -> Vec<SerieReport> {
    series
        .iter()
        .map(|s| SerieReport {
            serie: s.alias.clone(),
            decision: set.decide(s, page_query),
        })
        .collect()
}

/// One line per series: `alias  level  value  [rule] color=.. link=..`.
pub fn text_line(report: &SerieReport) -> String {
    let d = match &report.decision {
        Some(d) => d,
        None => return format!("{}  no rule", report.serie),
    };
    let mut line = format!(
        "{}  {}  {}  [{}]",
        report.serie, d.level, d.formatted_value, d.rule
    );
    if let Some(color) = &d.color {
        line.push_str(&format!(" color={}", color));
    }
    if d.icon {
        line.push_str(" icon");
    }
    if let Some(link) = &d.link {
        line.push_str(&format!(" link={}", link));
    }
    if let Some(tooltip) = &d.tooltip {
        line.push_str(&format!(" tooltip=\"{}: {}\"", tooltip.label, tooltip.value));
    }
    line
}
