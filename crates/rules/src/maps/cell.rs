use serde::{Deserialize, Serialize};

use super::SubMap;
use crate::matcher::match_string;

/// Pattern selecting diagram cells by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CellMap {
    pub pattern: String,
    pub hidden: bool,
}

pub type ShapeMap = CellMap;
pub type TextMap = CellMap;
pub type LinkMap = CellMap;

impl CellMap {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            hidden: false,
        }
    }

    /// Whether this map selects the cell `identifier`.
    pub fn matches(&self, identifier: &str) -> bool {
        if self.hidden || identifier.is_empty() {
            return false;
        }
        match_string(identifier, &self.pattern)
    }
}

impl SubMap for CellMap {
    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
}
