//! A single mapping rule: which series it governs, how it classifies the
//! series' value and which visual channels it drives.
//!
//! - `threshold`: severity levels and colors
//! - `policy`: per-channel activation gates and links
//! - `text`: value formatting and label merging
//! - `decision`: everything above composed for one series

mod decision;
mod policy;
mod text;
mod threshold;

pub use decision::*;
pub use text::{INVALID_DATE, INVALID_NUMBER, NO_VALUE};
pub use threshold::*;

use flowmap_core::{DataValue, Series};
use uuid::Uuid;

use crate::context::EngineContext;
use crate::error::{check_index, Result};
use crate::maps::{LinkMap, RangeMap, ShapeMap, TextMap, ValueMap};
use crate::matcher::try_match;
use crate::schema::RuleData;

/// In-memory rule. Owns its record by value; `export` hands out a copy.
#[derive(Debug, Clone)]
pub struct Rule {
    id: Uuid,
    reduce: bool,
    data: RuleData,
    ctx: EngineContext,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, ctx: EngineContext) -> Self {
        Self::from_data(RuleData::with_pattern(pattern), ctx)
    }

    /// Wrap an imported record, reporting degraded configuration.
    pub fn from_data(data: RuleData, ctx: EngineContext) -> Self {
        let rule = Self {
            id: Uuid::new_v4(),
            reduce: true,
            data,
            ctx,
        };
        rule.report_warnings();
        rule
    }

    /// Replace this rule's configuration. Identity is kept.
    pub fn import(&mut self, data: RuleData) {
        self.data = data;
        self.report_warnings();
    }

    pub fn export(&self) -> RuleData {
        self.data.clone()
    }

    pub fn data(&self) -> &RuleData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut RuleData {
        &mut self.data
    }

    fn report_warnings(&self) {
        for w in self.data.warnings() {
            self.ctx
                .logger
                .warn(&format!("rule '{}': {}", self.data.alias, w));
        }
        if !self.ctx.formatter.knows_unit(&self.data.unit) {
            self.ctx.logger.warn(&format!(
                "rule '{}': unknown unit '{}', rendering plain numbers",
                self.data.alias, self.data.unit
            ));
        }
    }

    /// Process-unique identity, never persisted.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// UI hint: whether the editor shows this rule collapsed.
    pub fn is_reduced(&self) -> bool {
        self.reduce
    }

    pub fn set_reduced(&mut self, reduce: bool) {
        self.reduce = reduce;
    }

    pub fn order(&self) -> Option<u32> {
        self.data.order
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.data.order = Some(order);
    }

    pub fn is_hidden(&self) -> bool {
        self.data.hidden
    }

    pub fn show(&mut self) {
        self.data.hidden = false;
    }

    pub fn hide(&mut self) {
        self.data.hidden = true;
    }

    pub(crate) fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ── Series ──────────────────────────────────────────────────────

    /// Whether this rule governs `serie`. Hidden rules govern nothing.
    pub fn match_serie(&self, serie: &Series) -> bool {
        if self.data.hidden {
            return false;
        }
        self.pattern_matches("pattern", &serie.alias, &self.data.pattern)
    }

    fn pattern_matches(&self, field: &str, candidate: &str, pattern: &str) -> bool {
        match try_match(candidate, pattern) {
            Ok(matched) => matched,
            Err(e) => {
                self.ctx.logger.warn(&format!(
                    "rule '{}': {} '{}' treated as no match: {}",
                    self.data.alias, field, pattern, e
                ));
                false
            }
        }
    }

    /// The configured statistic of a governed series, or the last raw
    /// sample when the statistic is absent. `"-"` for series this rule
    /// does not govern.
    pub fn value_for_serie(&self, serie: &Series) -> DataValue {
        if !self.match_serie(serie) {
            return DataValue::from(NO_VALUE);
        }
        match serie.stats.get(self.data.aggregation.stat_key()) {
            Some(v) => DataValue::Number(*v),
            None => serie.last_value(),
        }
    }

    pub fn formatted_value_for_serie(&self, serie: &Series) -> String {
        if !self.match_serie(serie) {
            return NO_VALUE.to_string();
        }
        self.formatted_value(&self.value_for_serie(serie))
    }

    /// Swap the outer colors and flip `invert`: same colors on the same
    /// semantic levels, opposite severity direction.
    pub fn invert_color_order(&mut self) {
        let colors = &mut self.data.colors;
        if colors.len() >= 3 {
            colors.swap(0, 2);
        }
        self.data.invert = !self.data.invert;
    }

    // ── Shape maps ──────────────────────────────────────────────────

    pub fn add_shape_map(&mut self, pattern: impl Into<String>) -> &mut ShapeMap {
        push_map(&mut self.data.shape_data, ShapeMap::new(pattern))
    }

    pub fn remove_shape_map(&mut self, index: usize) -> Result<ShapeMap> {
        remove_map(&mut self.data.shape_data, "shape map", index)
    }

    pub fn shape_map(&self, index: usize) -> Option<&ShapeMap> {
        self.data.shape_data.get(index)
    }

    pub fn shape_map_mut(&mut self, index: usize) -> Option<&mut ShapeMap> {
        self.data.shape_data.get_mut(index)
    }

    pub fn shape_maps(&self) -> &[ShapeMap] {
        &self.data.shape_data
    }

    pub fn match_shape(&self, identifier: &str) -> bool {
        self.data.shape_data.iter().any(|m| m.matches(identifier))
    }

    // ── Text maps ───────────────────────────────────────────────────

    pub fn add_text_map(&mut self, pattern: impl Into<String>) -> &mut TextMap {
        push_map(&mut self.data.text_data, TextMap::new(pattern))
    }

    pub fn remove_text_map(&mut self, index: usize) -> Result<TextMap> {
        remove_map(&mut self.data.text_data, "text map", index)
    }

    pub fn text_map(&self, index: usize) -> Option<&TextMap> {
        self.data.text_data.get(index)
    }

    pub fn text_map_mut(&mut self, index: usize) -> Option<&mut TextMap> {
        self.data.text_data.get_mut(index)
    }

    pub fn text_maps(&self) -> &[TextMap] {
        &self.data.text_data
    }

    pub fn match_text(&self, identifier: &str) -> bool {
        self.data.text_data.iter().any(|m| m.matches(identifier))
    }

    // ── Link maps ───────────────────────────────────────────────────

    pub fn add_link_map(&mut self, pattern: impl Into<String>) -> &mut LinkMap {
        push_map(&mut self.data.link_data, LinkMap::new(pattern))
    }

    pub fn remove_link_map(&mut self, index: usize) -> Result<LinkMap> {
        remove_map(&mut self.data.link_data, "link map", index)
    }

    pub fn link_map(&self, index: usize) -> Option<&LinkMap> {
        self.data.link_data.get(index)
    }

    pub fn link_map_mut(&mut self, index: usize) -> Option<&mut LinkMap> {
        self.data.link_data.get_mut(index)
    }

    pub fn link_maps(&self) -> &[LinkMap] {
        &self.data.link_data
    }

    pub fn match_link(&self, identifier: &str) -> bool {
        self.data.link_data.iter().any(|m| m.matches(identifier))
    }

    // ── Value maps ──────────────────────────────────────────────────

    pub fn add_value_map(&mut self, value: impl Into<String>, text: impl Into<String>) -> &mut ValueMap {
        push_map(&mut self.data.value_data, ValueMap::new(value, text))
    }

    pub fn remove_value_map(&mut self, index: usize) -> Result<ValueMap> {
        remove_map(&mut self.data.value_data, "value map", index)
    }

    pub fn value_map(&self, index: usize) -> Option<&ValueMap> {
        self.data.value_data.get(index)
    }

    pub fn value_map_mut(&mut self, index: usize) -> Option<&mut ValueMap> {
        self.data.value_data.get_mut(index)
    }

    pub fn value_maps(&self) -> &[ValueMap] {
        &self.data.value_data
    }

    // ── Range maps ──────────────────────────────────────────────────

    pub fn add_range_map(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut RangeMap {
        push_map(&mut self.data.range_data, RangeMap::new(from, to, text))
    }

    pub fn remove_range_map(&mut self, index: usize) -> Result<RangeMap> {
        remove_map(&mut self.data.range_data, "range map", index)
    }

    pub fn range_map(&self, index: usize) -> Option<&RangeMap> {
        self.data.range_data.get(index)
    }

    pub fn range_map_mut(&mut self, index: usize) -> Option<&mut RangeMap> {
        self.data.range_data.get_mut(index)
    }

    pub fn range_maps(&self) -> &[RangeMap] {
        &self.data.range_data
    }
}

fn push_map<T>(maps: &mut Vec<T>, map: T) -> &mut T {
    maps.push(map);
    let last = maps.len() - 1;
    &mut maps[last]
}

fn remove_map<T>(maps: &mut Vec<T>, collection: &'static str, index: usize) -> Result<T> {
    check_index(collection, index, maps.len())?;
    Ok(maps.remove(index))
}
