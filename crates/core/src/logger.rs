//! Logger handed to the engine at construction time.
//!
//! The engine never consults global flags to decide what to report; it
//! writes through whatever [`Logger`] its owner injected.

use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

pub trait Logger: Send + Sync + fmt::Debug {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Forwards every message to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "flowmap", "{}", message),
            LogLevel::Info => tracing::info!(target: "flowmap", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "flowmap", "{}", message),
            LogLevel::Error => tracing::error!(target: "flowmap", "{}", message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Keeps every message in memory. Used to assert on degraded paths.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level` or above.
    pub fn at_least(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l >= level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

/// Default logger shared by engine objects built without an explicit one.
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_logger_filters_by_level() {
        let logger = MemoryLogger::new();
        logger.debug("reordered");
        logger.warn("bad pattern");
        logger.error("boom");
        assert_eq!(logger.entries().len(), 3);
        assert_eq!(logger.at_least(LogLevel::Warn), vec!["bad pattern", "boom"]);
    }

    #[test]
    fn loggers_are_object_safe() {
        let loggers: Vec<Arc<dyn Logger>> = vec![
            default_logger(),
            Arc::new(NullLogger),
            MemoryLogger::new(),
        ];
        for l in &loggers {
            l.info("hello");
        }
    }
}
