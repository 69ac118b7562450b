//! Persisted configuration schema: the rule record, its policy enums and
//! the lenient field deserializers they rely on.

pub mod de;
mod enums;
mod rule_data;

pub use enums::*;
pub use rule_data::*;
