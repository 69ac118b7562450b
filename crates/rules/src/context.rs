//! Collaborators shared by a rule set and every rule it owns.

use std::sync::Arc;

use flowmap_core::{default_logger, Config, Logger};

use crate::format::{BuiltinFormatter, ValueFormatter};
use crate::schema::DEFAULT_DATE_FORMAT;

#[derive(Debug, Clone)]
pub struct EngineContext {
    pub logger: Arc<dyn Logger>,
    pub formatter: Arc<dyn ValueFormatter>,
    /// Used by date rules whose own `dateFormat` is empty.
    pub default_date_format: String,
}

impl Default for EngineContext {
    fn default() -> Self {
        Self {
            logger: default_logger(),
            formatter: Arc::new(BuiltinFormatter::default()),
            default_date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl EngineContext {
    pub fn new(logger: Arc<dyn Logger>, formatter: Arc<dyn ValueFormatter>) -> Self {
        Self {
            logger,
            formatter,
            ..Default::default()
        }
    }

    /// Built-in formatter configured from `config`, logging through `logger`.
    pub fn from_config(config: &Config, logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            formatter: Arc::new(BuiltinFormatter::new(config.timezone)),
            default_date_format: config.date_format.clone(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }
}
