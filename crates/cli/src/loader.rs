//! Reading rule lists and series from disk.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flowmap_core::{LogLevel, MemoryLogger, Series};
use flowmap_rules::{EngineContext, RuleSet};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleFormat {
    Json,
    Yaml,
}

fn rule_format(path: &Path) -> Result<RuleFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(RuleFormat::Json),
        Some("yml") | Some("yaml") => Ok(RuleFormat::Yaml),
        _ => bail!(
            "unsupported rule file '{}': expected .json, .yml or .yaml",
            path.display()
        ),
    }
}

/// Load a rule list into a fresh [`RuleSet`] sharing `ctx`.
pub fn load_rule_set(path: &Path, ctx: EngineContext) -> Result<RuleSet> {
    let format = rule_format(path)?;
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;

    let mut set = RuleSet::with_context(ctx);
    let imported = match format {
        RuleFormat::Json => set.import_json(&source),
        RuleFormat::Yaml => set.import_yaml(&source),
    };
    imported.with_context(|| format!("failed to parse rules in {}", path.display()))?;

    info!(path = %path.display(), rules = set.len(), "loaded rules");
    Ok(set)
}

/// Load a JSON array of series, optionally filling missing statistics.
pub fn load_series(path: &Path, compute_stats: bool) -> Result<Vec<Series>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read series from {}", path.display()))?;
    let mut series: Vec<Series> = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse series in {}", path.display()))?;

    if compute_stats {
        for s in &mut series {
            s.compute_stats();
        }
    }
    debug!(path = %path.display(), series = series.len(), "loaded series");
    Ok(series)
}

/// Outcome of validating a rule file.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub rules: usize,
    pub problems: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Import a rule file and collect every degraded-configuration warning.
pub fn check_rules(path: &Path, ctx: EngineContext) -> Result<CheckReport> {
    let logger = MemoryLogger::new();
    let set = load_rule_set(path, ctx.with_logger(logger.clone()))?;
    Ok(CheckReport {
        rules: set.len(),
        problems: logger.at_least(LogLevel::Warn),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flowmap_core::DataValue;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_json_and_yaml_rules() {
        let dir = tempfile::tempdir().unwrap();
        let json = write_file(&dir, "rules.json", r#"[{"pattern": "cpu"}, {"pattern": "mem"}]"#);
        let yaml = write_file(&dir, "rules.yaml", "rulesData:\n  - pattern: disk\n");

        let set = load_rule_set(&json, EngineContext::default()).unwrap();
        assert_eq!(set.len(), 2);
        let set = load_rule_set(&yaml, EngineContext::default()).unwrap();
        assert_eq!(set.get(0).unwrap().data().pattern, "disk");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "rules.toml", "");
        let err = load_rule_set(&path, EngineContext::default()).unwrap_err();
        assert!(err.to_string().contains("unsupported rule file"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.json", "{");
        let err = load_rule_set(&path, EngineContext::default()).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_series(&dir.path().join("absent.json"), false).is_err());
    }

    #[test]
    fn series_stats_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "series.json",
            r#"[{"alias": "cpu", "datapoints": [[1, 1000], [3, 2000]], "stats": {"max": 10}}]"#,
        );

        let raw = load_series(&path, false).unwrap();
        assert_eq!(raw[0].stats.len(), 1);
        assert_eq!(raw[0].last_value(), DataValue::Number(3.0));

        let filled = load_series(&path, true).unwrap();
        assert_eq!(filled[0].stats["max"], 10.0);
        assert_eq!(filled[0].stats["avg"], 2.0);
        assert_eq!(filled[0].stats["current"], 3.0);
    }

    #[test]
    fn check_collects_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let clean = write_file(&dir, "clean.yml", "- pattern: cpu\n");
        let report = check_rules(&clean, EngineContext::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.rules, 1);

        let degraded = write_file(
            &dir,
            "degraded.json",
            r#"[{"alias": "bad", "pattern": "/(/", "unit": "parsecs"}]"#,
        );
        let report = check_rules(&degraded, EngineContext::default()).unwrap();
        assert_eq!(report.problems.len(), 2, "{:?}", report.problems);
        assert!(report.problems.iter().any(|p| p.contains("parsecs")));
    }
}
