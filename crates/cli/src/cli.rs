use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Evaluate diagram mapping rules against metric series.
///
/// Loads a rule list (JSON or YAML) and a JSON array of series, then
/// prints the visual decision of the first matching rule for each series.
#[derive(Parser, Debug)]
#[command(name = "flowmap", about = "Evaluate diagram mapping rules against metric series")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Rule list file (.json, .yml or .yaml)
    #[arg(long, env = "FLOWMAP_RULES")]
    pub rules: Option<PathBuf>,

    /// JSON array of series: `[{"alias": .., "datapoints": [[v, ts]], "stats": {..}}]`
    #[arg(long, env = "FLOWMAP_SERIES")]
    pub series: Option<PathBuf>,

    /// Page query string appended to links of rules with `linkParams`
    #[arg(long)]
    pub page_query: Option<String>,

    /// Fill statistics missing from the series file from its datapoints
    #[arg(long)]
    pub compute_stats: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a rule file and report degraded configuration
    Check {
        /// Rule list file (.json, .yml or .yaml)
        path: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evaluation_flags() {
        let args = CliArgs::try_parse_from([
            "flowmap",
            "--rules",
            "rules.yml",
            "--series",
            "series.json",
            "--page-query",
            "?from=now-1h",
            "--compute-stats",
            "--output",
            "json",
        ])
        .unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.rules, Some(PathBuf::from("rules.yml")));
        assert_eq!(args.page_query.as_deref(), Some("?from=now-1h"));
        assert!(args.compute_stats);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn parses_check_subcommand() {
        let args = CliArgs::try_parse_from(["flowmap", "check", "panel.json"]).unwrap();
        match args.command {
            Some(Command::Check { path }) => assert_eq!(path, PathBuf::from("panel.json")),
            other => panic!("expected check, got {:?}", other),
        }
        assert_eq!(args.output, OutputFormat::Text);
    }
}
