//! Error types for the rule engine.
//!
//! Only caller misuse and undecodable documents are errors. Bad patterns,
//! thresholds or sample values degrade to documented fallbacks instead.

use crate::matcher::PatternError;

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Pattern that does not compile, surfaced by `try_*` accessors.
    #[error("Pattern error: {0}")]
    Pattern(#[from] PatternError),

    /// Index outside a rule list or sub-map collection.
    #[error("{collection} index {index} out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    /// JSON parse/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse/serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

pub(crate) fn check_index(collection: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(RuleError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}
