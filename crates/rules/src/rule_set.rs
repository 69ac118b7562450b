//! Ordered collection of rules, as persisted in a panel's configuration.
//!
//! Rules live in a single vector. Every structural mutation ends with
//! a renumbering pass, so `order` is always `1..=N` in vector order.

use std::sync::Arc;

use flowmap_core::{Logger, Series};
use serde::Deserialize;
use serde_json::Value;

use crate::context::EngineContext;
use crate::error::{check_index, Result};
use crate::rule::{Decision, Rule};
use crate::schema::RuleData;

/// Accepted shapes of a persisted rule list: the bare array, or the
/// panel options object wrapping it. Entries stay raw until
/// [`RuleSetDocument::into_records`] so one bad entry cannot reject the list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RuleSetDocument {
    List(Vec<Value>),
    Panel {
        #[serde(rename = "rulesData")]
        rules_data: Vec<Value>,
    },
}

impl RuleSetDocument {
    /// Decode every entry, skipping those that are not rule objects.
    fn into_records(self, logger: &dyn Logger) -> Vec<RuleData> {
        let entries = match self {
            RuleSetDocument::List(entries) => entries,
            RuleSetDocument::Panel { rules_data } => rules_data,
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match RuleData::deserialize(entry) {
                Ok(data) => Some(data),
                Err(e) => {
                    logger.warn(&format!("rule entry {} skipped: {}", i, e));
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    ctx: EngineContext,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(ctx: EngineContext) -> Self {
        Self {
            rules: Vec::new(),
            ctx,
        }
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self::with_context(EngineContext::default().with_logger(logger))
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ── Structural mutations ────────────────────────────────────────

    /// Append a rule matching `pattern` with the next order value.
    pub fn add(&mut self, pattern: impl Into<String>) -> &mut Rule {
        let rule = Rule::new(pattern, self.ctx.clone());
        self.rules.push(rule);
        self.renumber();
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }

    pub fn remove(&mut self, index: usize) -> Result<Rule> {
        check_index("rule", index, self.rules.len())?;
        let removed = self.rules.remove(index);
        self.ctx.logger.debug(&format!(
            "removed rule '{}' at {}",
            removed.data().alias,
            index
        ));
        self.renumber();
        Ok(removed)
    }

    /// Deep-copy the rule at `index` and insert the copy just before it.
    /// The copy gets a fresh identity and starts expanded in the editor.
    pub fn clone_rule(&mut self, index: usize) -> Result<&mut Rule> {
        check_index("rule", index, self.rules.len())?;
        let mut copy = Rule::from_data(self.rules[index].export(), self.ctx.clone());
        copy.set_reduced(false);
        self.rules.insert(index, copy);
        self.ctx.logger.debug(&format!("cloned rule at {}", index));
        self.renumber();
        Ok(&mut self.rules[index])
    }

    /// Swap the rule at `index` with its predecessor. No-op for the first rule.
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        check_index("rule", index, self.rules.len())?;
        if index == 0 {
            return Ok(());
        }
        self.rules.swap(index - 1, index);
        self.renumber();
        Ok(())
    }

    /// Swap the rule at `index` with its successor. No-op for the last rule.
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        check_index("rule", index, self.rules.len())?;
        if index + 1 == self.rules.len() {
            return Ok(());
        }
        self.rules.swap(index, index + 1);
        self.renumber();
        Ok(())
    }

    /// Replace the whole collection.
    ///
    /// When any record carries an `order`, records are first stable-sorted
    /// by it (records without one go last). Orders are reassigned
    /// sequentially afterwards either way.
    pub fn import(&mut self, mut records: Vec<RuleData>) {
        if records.iter().any(|r| r.order.is_some()) {
            records.sort_by_key(|r| r.order.unwrap_or(u32::MAX));
        }
        self.rules = records
            .into_iter()
            .map(|data| Rule::from_data(data, self.ctx.clone()))
            .collect();
        self.renumber();
        self.ctx
            .logger
            .info(&format!("imported {} rules", self.rules.len()));
    }

    pub fn import_json(&mut self, input: &str) -> Result<()> {
        let document: RuleSetDocument = serde_json::from_str(input)?;
        let records = document.into_records(self.ctx.logger.as_ref());
        self.import(records);
        Ok(())
    }

    pub fn import_yaml(&mut self, input: &str) -> Result<()> {
        let document: RuleSetDocument = serde_yaml::from_str(input)?;
        let records = document.into_records(self.ctx.logger.as_ref());
        self.import(records);
        Ok(())
    }

    /// Persistable records in rule order, each carrying its `order`.
    pub fn export(&self) -> Vec<RuleData> {
        self.rules.iter().map(Rule::export).collect()
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    pub fn export_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.export())?)
    }

    fn renumber(&mut self) {
        for (i, rule) in self.rules.iter_mut().enumerate() {
            rule.set_order(i as u32 + 1);
        }
        debug_assert!(self.orders_contiguous());
    }

    fn orders_contiguous(&self) -> bool {
        self.rules
            .iter()
            .enumerate()
            .all(|(i, r)| r.order() == Some(i as u32 + 1))
    }

    // ── Access ──────────────────────────────────────────────────────

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Rule> {
        self.rules.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    // ── Series ──────────────────────────────────────────────────────

    /// First rule, in order, governing `serie`.
    pub fn find_rule_for_serie(&self, serie: &Series) -> Option<&Rule> {
        self.rules.iter().find(|r| r.match_serie(serie))
    }

    pub fn rules_for_serie(&self, serie: &Series) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.match_serie(serie)).collect()
    }

    pub fn decide(&self, serie: &Series, page_query: Option<&str>) -> Option<Decision> {
        self.find_rule_for_serie(serie)?.decide(serie, page_query)
    }
}

#[cfg(test)]
mod tests {
    use flowmap_core::{LogLevel, MemoryLogger};
    use proptest::prelude::*;

    use super::*;
    use crate::error::RuleError;

    fn orders(set: &RuleSet) -> Vec<u32> {
        set.iter().filter_map(Rule::order).collect()
    }

    fn patterns(set: &RuleSet) -> Vec<String> {
        set.iter().map(|r| r.data().pattern.clone()).collect()
    }

    fn three() -> RuleSet {
        let mut set = RuleSet::new();
        set.add("a");
        set.add("b");
        set.add("c");
        set
    }

    #[test]
    fn add_assigns_next_order() {
        let set = three();
        assert_eq!(orders(&set), vec![1, 2, 3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_first_renumbers() {
        let mut set = three();
        let removed = set.remove(0).unwrap();
        assert_eq!(removed.data().pattern, "a");
        assert_eq!(orders(&set), vec![1, 2]);
        assert_eq!(patterns(&set), vec!["b", "c"]);
    }

    #[test]
    fn remove_out_of_range() {
        let mut set = three();
        assert!(matches!(
            set.remove(3),
            Err(RuleError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn clone_inserts_before_source() {
        let mut set = three();
        set.get_mut(1).unwrap().data_mut().alias = "second".to_string();
        let source_id = set.get(1).unwrap().id();

        let copy = set.clone_rule(1).unwrap();
        assert!(!copy.is_reduced());
        assert_ne!(copy.id(), source_id);
        assert_eq!(copy.data().alias, "second");

        assert_eq!(patterns(&set), vec!["a", "b", "b", "c"]);
        assert_eq!(orders(&set), vec![1, 2, 3, 4]);
        assert_eq!(set.get(2).unwrap().id(), source_id);
        assert!(set.get(2).unwrap().is_reduced());
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut set = three();
        set.clone_rule(0).unwrap().add_shape_map("cell-1");
        assert_eq!(set.get(0).unwrap().shape_maps().len(), 1);
        assert!(set.get(1).unwrap().shape_maps().is_empty());
    }

    #[test]
    fn moves_swap_neighbours_and_stop_at_bounds() {
        let mut set = three();
        set.move_up(0).unwrap();
        set.move_down(2).unwrap();
        assert_eq!(patterns(&set), vec!["a", "b", "c"]);

        set.move_up(2).unwrap();
        assert_eq!(patterns(&set), vec!["a", "c", "b"]);
        set.move_down(0).unwrap();
        assert_eq!(patterns(&set), vec!["c", "a", "b"]);
        assert_eq!(orders(&set), vec![1, 2, 3]);

        assert!(set.move_up(5).is_err());
        assert!(set.move_down(5).is_err());
    }

    #[test]
    fn import_sorts_by_recorded_order() {
        let records: Vec<RuleData> = [("c", Some(3)), ("a", Some(1)), ("x", None), ("b", Some(2))]
            .into_iter()
            .map(|(p, order)| RuleData {
                order,
                ..RuleData::with_pattern(p)
            })
            .collect();
        let mut set = RuleSet::new();
        set.import(records);
        assert_eq!(patterns(&set), vec!["a", "b", "c", "x"]);
        assert_eq!(orders(&set), vec![1, 2, 3, 4]);
    }

    #[test]
    fn import_without_orders_keeps_array_order() {
        let mut set = RuleSet::new();
        set.import(vec![RuleData::with_pattern("z"), RuleData::with_pattern("y")]);
        assert_eq!(patterns(&set), vec!["z", "y"]);
        assert_eq!(orders(&set), vec![1, 2]);
    }

    #[test]
    fn import_json_accepts_list_and_panel_shapes() {
        let mut set = RuleSet::new();
        set.import_json(r#"[{"pattern": "cpu"}, {"pattern": "mem"}]"#).unwrap();
        assert_eq!(patterns(&set), vec!["cpu", "mem"]);

        set.import_json(r#"{"rulesData": [{"pattern": "disk", "order": 1}]}"#)
            .unwrap();
        assert_eq!(patterns(&set), vec!["disk"]);

        assert!(matches!(set.import_json("{"), Err(RuleError::Json(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn import_yaml_list() {
        let mut set = RuleSet::new();
        set.import_yaml("- pattern: cpu\n  thresholds: [10, 20]\n- pattern: mem\n")
            .unwrap();
        assert_eq!(set.get(0).unwrap().data().thresholds, vec![10.0, 20.0]);
        assert_eq!(orders(&set), vec![1, 2]);
    }

    #[test]
    fn export_round_trips() {
        let mut set = three();
        set.get_mut(0).unwrap().add_value_map("1", "up");
        let json = set.export_json().unwrap();

        let mut reloaded = RuleSet::new();
        reloaded.import_json(&json).unwrap();
        assert_eq!(reloaded.export(), set.export());

        let yaml = set.export_yaml().unwrap();
        let mut from_yaml = RuleSet::new();
        from_yaml.import_yaml(&yaml).unwrap();
        assert_eq!(from_yaml.export(), set.export());
    }

    #[test]
    fn exported_records_carry_order() {
        let set = three();
        let json = set.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[2]["order"], 3);
    }

    #[test]
    fn first_matching_rule_decides() {
        let mut set = RuleSet::new();
        set.add("/^web-/").hide();
        set.add("/^web-\\d+$/").data_mut().alias = "numbered".to_string();
        set.add(".*").data_mut().alias = "catch-all".to_string();

        let web = Series::new("web-01").with_stat("current", 90.0);
        let db = Series::new("db");
        assert_eq!(set.find_rule_for_serie(&web).unwrap().data().alias, "numbered");
        assert_eq!(set.rules_for_serie(&web).len(), 2);
        assert_eq!(set.decide(&db, None).unwrap().rule, "catch-all");

        let empty = RuleSet::new();
        assert!(empty.decide(&db, None).is_none());
    }

    #[test]
    fn imports_report_through_injected_logger() {
        let logger = MemoryLogger::new();
        let mut set = RuleSet::with_logger(logger.clone());
        set.import_json(r#"[{"pattern": "/cpu"}]"#).unwrap();
        let warnings = logger.at_least(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pattern"));
        assert!(logger
            .entries()
            .iter()
            .any(|(l, m)| *l == LogLevel::Info && m == "imported 1 rules"));
    }

    #[test]
    fn one_bad_policy_code_degrades_only_its_rule() {
        let logger = MemoryLogger::new();
        let mut set = RuleSet::with_logger(logger.clone());
        set.import_json(r#"[{"pattern":"cpu"},{"pattern":"mem","colorOn":"sometimes"}]"#)
            .unwrap();
        assert_eq!(patterns(&set), vec!["cpu", "mem"]);
        assert_eq!(
            set.get(1).unwrap().data().color_on,
            crate::schema::Activation::Always
        );
        let warnings = logger.at_least(LogLevel::Warn);
        assert_eq!(warnings.len(), 1, "{:?}", warnings);
        assert!(warnings[0].contains("colorOn"));
    }

    #[test]
    fn legacy_fields_and_nulls_import() {
        let mut set = RuleSet::new();
        set.import_json(
            r#"{"rulesData": [
                {"pattern": "a", "mappingType": 1},
                {"pattern": "b", "mappingType": 2, "aggregation": "last_time"},
                {"pattern": "c", "unit": null, "colors": null, "hidden": null}
            ]}"#,
        )
        .unwrap();
        assert_eq!(set.len(), 3);
        let a = set.get(0).unwrap().data();
        assert_eq!(a.mapping_type, crate::schema::MappingType::ValueMap);
        let b = set.get(1).unwrap().data();
        assert_eq!(b.mapping_type, crate::schema::MappingType::RangeMap);
        assert_eq!(b.aggregation, crate::schema::Aggregation::Current);
        let c = set.get(2).unwrap().data();
        assert_eq!(c.unit, "short");
        assert_eq!(c.colors.len(), 3);
        assert!(!c.hidden);
    }

    #[test]
    fn entries_that_are_not_objects_are_skipped() {
        let logger = MemoryLogger::new();
        let mut set = RuleSet::with_logger(logger.clone());
        set.import_yaml("- pattern: cpu
- 42
- null
- pattern: mem
")
            .unwrap();
        assert_eq!(patterns(&set), vec!["cpu", "mem"]);
        assert_eq!(orders(&set), vec![1, 2]);
        let warnings = logger.at_least(LogLevel::Warn);
        assert_eq!(warnings.len(), 2, "{:?}", warnings);
        assert!(warnings[0].starts_with("rule entry 1 skipped"));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Duplicate(usize),
        Up(usize),
        Down(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Duplicate),
            (0usize..8).prop_map(Op::Up),
            (0usize..8).prop_map(Op::Down),
        ]
    }

    proptest! {
        #[test]
        fn orders_stay_contiguous(ops in proptest::collection::vec(op(), 0..40)) {
            let mut set = RuleSet::with_logger(Arc::new(flowmap_core::NullLogger));
            for op in ops {
                // Out-of-range indices are rejected without touching the set.
                let _ = match op {
                    Op::Add => {
                        set.add("x");
                        Ok(())
                    }
                    Op::Remove(i) => set.remove(i).map(|_| ()),
                    Op::Duplicate(i) => set.clone_rule(i).map(|_| ()),
                    Op::Up(i) => set.move_up(i),
                    Op::Down(i) => set.move_down(i),
                };
                let expected: Vec<u32> = (1..=set.len() as u32).collect();
                prop_assert_eq!(orders(&set), expected);
            }
        }
    }
}
