//! Poum Core - Units of measure and conversion
//!
//! This crate provides the conversion engine:
//! - `Unit`: a unit with its rational conversion to the base unit
//! - `Quantity`: a named physical quantity owning its units, one of them base
//! - `AliasTable`: alternate spellings of unit symbols
//! - `UnitCatalog`: the registry, symbol resolution and `convert`
//!
//! The catalog has no built-in content; see `poum-feed` for that.

mod error;
mod unit;
mod quantity;
mod alias;
mod config;
mod catalog;

pub use error::{CatalogError, codes};
pub use unit::{Unit, derive_display_symbol};
pub use quantity::Quantity;
pub use alias::{AliasTable, AliasPolicy};
pub use config::{CatalogConfig, NameMatching, DuplicateQuantityPolicy};
pub use catalog::{UnitCatalog, UnitRef, BLANK_SYMBOL};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Unit, Quantity, UnitCatalog, CatalogConfig, CatalogError};
    pub use crate::error::codes;
}
