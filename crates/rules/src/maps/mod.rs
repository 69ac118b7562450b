//! Sub-mapping tables owned by a rule.
//!
//! - `CellMap` (as `ShapeMap`, `TextMap`, `LinkMap`): selects diagram cells
//!   by identifier
//! - `ValueMap`: literal value to display text
//! - `RangeMap`: inclusive numeric range to display text
//!
//! Every map can be soft-disabled with `hidden`; a hidden map never matches.

mod cell;
mod range_map;
mod value_map;

pub use cell::*;
pub use range_map::*;
pub use value_map::*;

/// Literal used in value and range maps to stand for a null sample.
pub const NULL_SENTINEL: &str = "null";

/// Visibility toggles shared by all sub-map kinds.
pub trait SubMap: Clone {
    fn is_hidden(&self) -> bool;

    fn set_hidden(&mut self, hidden: bool);

    fn show(&mut self) {
        self.set_hidden(false);
    }

    fn hide(&mut self) {
        self.set_hidden(true);
    }

    fn toggle(&mut self) {
        let hidden = self.is_hidden();
        self.set_hidden(!hidden);
    }

    /// Persistable form. Maps are plain values, so this is a copy.
    fn export(&self) -> Self {
        self.clone()
    }
}
