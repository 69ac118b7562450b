//! Rule engine that maps time-series values onto diagram visuals.
//!
//! This crate provides:
//! - Series and cell pattern matching (`/regex/flags` or anchored literals)
//! - Per-rule sub-maps selecting shapes, labels and links, and translating
//!   values or ranges into display text
//! - Threshold classification into severity levels and colors
//! - Value formatting through an injectable unit/date formatter
//! - An ordered rule set persisted as plain JSON or YAML records

pub mod context;
pub mod error;
pub mod format;
pub mod maps;
pub mod matcher;
pub mod rule;
pub mod rule_set;
pub mod schema;

pub use context::EngineContext;
pub use error::{Result, RuleError};
pub use format::{BuiltinFormatter, ValueFormatter};
pub use matcher::{cached_pattern, compile_pattern, match_string, try_match, CompiledPattern, PatternError};
pub use rule::{Decision, Level, Rule, Tooltip};
pub use rule_set::RuleSet;
pub use schema::RuleData;
