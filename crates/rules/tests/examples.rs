//! Integration tests that load every example rule file in
//! `data/rules/examples/` and drive it with the sample series in
//! `data/series/`.

use flowmap_core::{DataValue, LogLevel, MemoryLogger, Series};
use flowmap_rules::schema::{Activation, MappingType, TextOn, TextReplace, ValueType};
use flowmap_rules::{Level, RuleSet};

const RED: &str = "rgba(245, 54, 54, 0.9)";
const ORANGE: &str = "rgba(237, 129, 40, 0.89)";

/// Resolve a directory relative to the workspace root.
/// Integration tests run from the crate directory, so we go up two levels.
fn data_dir() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data")
}

fn read(relative: &str) -> String {
    let path = data_dir().join(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn load_rules(filename: &str) -> RuleSet {
    let source = read(&format!("rules/examples/{}", filename));
    let mut set = RuleSet::new();
    let loaded = if filename.ends_with(".json") {
        set.import_json(&source)
    } else {
        set.import_yaml(&source)
    };
    loaded.unwrap_or_else(|e| panic!("Failed to parse {}: {}", filename, e));
    set
}

fn sample_series() -> Vec<Series> {
    serde_json::from_str(&read("series/sample.json")).unwrap()
}

fn serie(alias: &str) -> Series {
    sample_series()
        .into_iter()
        .find(|s| s.alias == alias)
        .unwrap_or_else(|| panic!("no sample series '{}'", alias))
}

// ── server-health.yml ───────────────────────────────────────

#[test]
fn parse_server_health_example() {
    let set = load_rules("server-health.yml");
    assert_eq!(set.len(), 4);

    let orders: Vec<_> = set.iter().filter_map(|r| r.order()).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);

    let cpu = set.get(0).unwrap().data();
    assert_eq!(cpu.alias, "web cpu");
    assert_eq!(cpu.unit, "percent");
    assert_eq!(cpu.decimals, 1);
    assert_eq!(cpu.thresholds, vec![70.0, 90.0]);
    assert_eq!(cpu.text_replace, TextReplace::AppendSpace);

    let status = set.get(1).unwrap().data();
    assert_eq!(status.value_type, ValueType::String);
    assert_eq!(status.value_data.len(), 3);
    assert_eq!(status.value_data[0].value, "0");

    let disk = set.get(2).unwrap().data();
    assert_eq!(disk.link_on, Activation::WarningOrCritical);

    assert_eq!(set.get(3).unwrap().data().value_type, ValueType::Date);
}

#[test]
fn server_health_imports_cleanly() {
    let logger = MemoryLogger::new();
    let mut set = RuleSet::with_logger(logger.clone());
    set.import_yaml(&read("rules/examples/server-health.yml"))
        .unwrap();
    assert!(logger.at_least(LogLevel::Warn).is_empty());
}

#[test]
fn inverted_cpu_rule_flags_hot_node() {
    let set = load_rules("server-health.yml");
    let cpu = serie("web-01.cpu");
    let decision = set.decide(&cpu, None).unwrap();

    assert_eq!(decision.rule, "web cpu");
    assert_eq!(decision.value, DataValue::Number(95.25));
    assert_eq!(decision.level, Level::Critical);
    assert_eq!(decision.formatted_value, "95.3%");
    assert_eq!(decision.color.as_deref(), Some(RED));
    assert!(decision.icon);
    assert_eq!(decision.link, None);

    let tooltip = decision.tooltip.as_ref().unwrap();
    assert_eq!(tooltip.label, "web-01.cpu");
    assert_eq!(tooltip.color.as_deref(), Some(RED));

    let rule = set.find_rule_for_serie(&cpu).unwrap();
    assert_eq!(rule.render_label("CPU", &decision).as_deref(), Some("CPU 95.3%"));
    assert!(rule.match_shape("web-node-3"));
    assert!(!rule.match_shape("db-node-1"));
    assert!(rule.match_text("web-label"));
}

#[test]
fn status_value_map_drives_string_level() {
    let set = load_rules("server-health.yml");
    let decision = set.decide(&serie("api.status"), None).unwrap();
    assert_eq!(decision.formatted_value, "down");
    assert_eq!(decision.level, Level::Critical);
    assert_eq!(decision.color.as_deref(), Some(RED));

    let status = set.get(1).unwrap();
    assert_eq!(status.formatted_value(&DataValue::Null), "unknown");
    assert_eq!(status.threshold_level(&DataValue::Number(1.0)), Level::Ok);
}

#[test]
fn disk_rule_links_on_warning() {
    let set = load_rules("server-health.yml");
    let decision = set.decide(&serie("db.disk"), Some("?var-host=db")).unwrap();
    assert_eq!(decision.value, DataValue::Number(620_000_000_000.0));
    assert_eq!(decision.formatted_value, "620 GB");
    assert_eq!(decision.level, Level::Warning);
    assert_eq!(decision.color.as_deref(), Some(ORANGE));
    assert_eq!(
        decision.link.as_deref(),
        Some("https://grafana.local/d/disks?var-host=db")
    );
    assert!(set.get(2).unwrap().match_link("disk-icon"));
}

#[test]
fn deploy_time_renders_as_date() {
    let set = load_rules("server-health.yml");
    let decision = set.decide(&serie("deploy.time"), None).unwrap();
    assert_eq!(decision.formatted_value, "2023-11-14 22:13");
    assert_eq!(decision.level, Level::Disabled);
    assert_eq!(decision.color, None);
    assert!(decision.label);
}

#[test]
fn unmatched_series_has_no_decision() {
    let set = load_rules("server-health.yml");
    let other = serie("unmatched.metric");
    assert!(set.find_rule_for_serie(&other).is_none());
    assert!(set.decide(&other, None).is_none());
    assert_eq!(set.get(0).unwrap().formatted_value_for_serie(&other), "-");
}

// ── legacy-panel.json ───────────────────────────────────────

#[test]
fn legacy_panel_sorts_by_recorded_order() {
    let set = load_rules("legacy-panel.json");
    let aliases: Vec<_> = set.iter().map(|r| r.data().alias.as_str()).collect();
    assert_eq!(aliases, vec!["queue depth", "latency", "broken"]);

    let latency = set.get(1).unwrap().data();
    assert_eq!(latency.decimals, 0);
    assert_eq!(latency.thresholds, vec![200.0, 500.0]);
    assert_eq!(latency.color_on, Activation::WarningOrCritical);
    assert_eq!(latency.text_on, TextOn::Always);
    assert_eq!(latency.text_replace, TextReplace::AppendSpace);

    let queue = set.get(0).unwrap().data();
    assert_eq!(queue.mapping_type, MappingType::RangeMap);
    assert_eq!(queue.text_on, TextOn::CriticalOnly);
    assert_eq!(queue.range_data[0].from, "0");
}

#[test]
fn legacy_panel_reports_degraded_rule() {
    let logger = MemoryLogger::new();
    let mut set = RuleSet::with_logger(logger.clone());
    set.import_json(&read("rules/examples/legacy-panel.json"))
        .unwrap();

    let warnings = logger.at_least(LogLevel::Warn);
    assert_eq!(warnings.len(), 2, "{:?}", warnings);
    assert!(warnings.iter().all(|w| w.contains("'broken'")));

    // The broken rule still imports and simply never matches.
    let broken = set.get(2).unwrap();
    assert_eq!(broken.data().thresholds, vec![5.0]);
    assert!(!broken.match_serie(&Series::new("unterminated")));
    assert_eq!(broken.threshold_level(&DataValue::Number(1.0)), Level::Disabled);
}

#[test]
fn legacy_latency_rule_formats_milliseconds() {
    let set = load_rules("legacy-panel.json");
    let slow = Series::new("API.Latency").with_stat("current", 750.0);
    let decision = set.decide(&slow, None).unwrap();
    assert_eq!(decision.rule, "latency");
    assert_eq!(decision.formatted_value, "750 ms");
    assert_eq!(decision.level, Level::Critical);
    assert!(decision.color.is_some());

    let fast = Series::new("api.latency").with_stat("current", 120.0);
    let decision = set.decide(&fast, None).unwrap();
    assert_eq!(decision.level, Level::Ok);
    assert_eq!(decision.color, None);
}

#[test]
fn legacy_queue_ranges() {
    let set = load_rules("legacy-panel.json");
    let queue = set.get(0).unwrap();
    assert_eq!(queue.formatted_value(&DataValue::Number(5.0)), "idle");
    assert_eq!(queue.formatted_value(&DataValue::Number(42.0)), "busy");
    assert_eq!(queue.formatted_value(&DataValue::Null), "flooded");
    assert_eq!(queue.formatted_value(&DataValue::Number(500.0)), "flooded");

    let decision = set.decide(&Series::new("queue").with_stat("current", 42.0), None).unwrap();
    assert!(!decision.label);
}

// ── round trips ─────────────────────────────────────────────

#[test]
fn every_example_round_trips() {
    let dir = data_dir().join("rules/examples");
    let mut seen = 0;
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        if !(name.ends_with(".json") || name.ends_with(".yml")) {
            continue;
        }
        seen += 1;
        let set = load_rules(&name);

        let mut from_json = RuleSet::new();
        from_json.import_json(&set.export_json().unwrap()).unwrap();
        assert_eq!(from_json.export(), set.export(), "{} via JSON", name);

        let mut from_yaml = RuleSet::new();
        from_yaml.import_yaml(&set.export_yaml().unwrap()).unwrap();
        assert_eq!(from_yaml.export(), set.export(), "{} via YAML", name);

        for serie in sample_series() {
            assert_eq!(
                from_json.decide(&serie, Some("a=b")),
                set.decide(&serie, Some("a=b")),
                "{} on {}",
                name,
                serie.alias
            );
        }
    }
    assert_eq!(seen, 2);
}
