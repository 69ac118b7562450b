use std::env;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

/// Zone used when rendering date values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayTimezone {
    #[default]
    Utc,
    Local,
}

impl std::str::FromStr for DisplayTimezone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(DisplayTimezone::Utc),
            "local" | "browser" => Ok(DisplayTimezone::Local),
            other => Err(CoreError::Config(format!("unknown timezone: '{}'", other))),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fallback date pattern for rules carrying an empty one.
    pub date_format: String,
    pub timezone: DisplayTimezone,
    /// `EnvFilter` directive for the subscriber.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timezone: DisplayTimezone::Utc,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// An unparseable `FLOWMAP_TIMEZONE` falls back to UTC with a warning.
    pub fn from_env() -> Self {
        let timezone = match env_opt("FLOWMAP_TIMEZONE") {
            Some(raw) => raw.parse().unwrap_or_else(|e: CoreError| {
                tracing::warn!(error = %e, "falling back to UTC");
                DisplayTimezone::Utc
            }),
            None => DisplayTimezone::Utc,
        };
        Self {
            date_format: env_or("FLOWMAP_DATE_FORMAT", DEFAULT_DATE_FORMAT),
            timezone,
            log_filter: env_or("FLOWMAP_LOG", "warn"),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  date_format: {}", self.date_format);
        tracing::info!("  timezone:    {:?}", self.timezone);
        tracing::info!("  log_filter:  {}", self.log_filter);
    }
}
