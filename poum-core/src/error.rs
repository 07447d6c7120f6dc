//! Catalog errors
//!
//! Lookups never fail: an unknown symbol is an `Option::None`. Errors are
//! reserved for conversions between unrelated units and for mutations that
//! would break a catalog invariant.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INCOMPATIBLE_QUANTITY: &str = "INCOMPATIBLE_QUANTITY";
    pub const DUPLICATE_SYMBOL: &str = "DUPLICATE_SYMBOL";
    pub const DUPLICATE_QUANTITY: &str = "DUPLICATE_QUANTITY";
    pub const ALIAS_CONFLICT: &str = "ALIAS_CONFLICT";
    pub const INVALID_BASE_UNIT: &str = "INVALID_BASE_UNIT";
    pub const MISSING_BASE_UNIT: &str = "MISSING_BASE_UNIT";
    pub const INVALID_ALIAS: &str = "INVALID_ALIAS";
}

/// Errors raised by catalog conversions and mutations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unknown quantity: {0}")]
    UnknownQuantity(String),

    #[error("cannot convert {from} ({from_quantity}) to {to} ({to_quantity}): incompatible quantities")]
    IncompatibleQuantity {
        from: String,
        to: String,
        from_quantity: String,
        to_quantity: String,
    },

    #[error("unit symbol already registered: {symbol} (in {quantity})")]
    DuplicateSymbol { symbol: String, quantity: String },

    #[error("quantity already present: {0}")]
    DuplicateQuantity(String),

    #[error("alias '{alias}' already resolves to '{existing}', refusing to point it at '{requested}'")]
    AliasConflict {
        alias: String,
        existing: String,
        requested: String,
    },

    #[error("alias '{0}' collides with a canonical unit symbol")]
    AliasShadowsSymbol(String),

    #[error("alias must not be blank")]
    BlankAlias,

    #[error("base unit {symbol} must have the identity formula (a=1, b=0, c=0, d=1)")]
    InvalidBaseUnit { symbol: String },

    #[error("quantity {0} has no base unit")]
    MissingBaseUnit(String),
}

impl CatalogError {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::UnknownUnit(_) | CatalogError::UnknownQuantity(_) => codes::NOT_FOUND,
            CatalogError::IncompatibleQuantity { .. } => codes::INCOMPATIBLE_QUANTITY,
            CatalogError::DuplicateSymbol { .. } => codes::DUPLICATE_SYMBOL,
            CatalogError::DuplicateQuantity(_) => codes::DUPLICATE_QUANTITY,
            CatalogError::AliasConflict { .. } | CatalogError::AliasShadowsSymbol(_) => codes::ALIAS_CONFLICT,
            CatalogError::InvalidBaseUnit { .. } => codes::INVALID_BASE_UNIT,
            CatalogError::MissingBaseUnit(_) => codes::MISSING_BASE_UNIT,
            CatalogError::BlankAlias => codes::INVALID_ALIAS,
        }
    }

    /// Suggestion for fixing the error, when one is obvious
    pub fn suggestion(&self) -> Option<String> {
        match self {
            CatalogError::UnknownUnit(symbol) => {
                Some(format!("Check spelling of '{}' or register an alias for it", symbol))
            }
            CatalogError::IncompatibleQuantity { from, .. } => {
                Some(format!("Use convertible_units('{}') to list valid targets", from))
            }
            CatalogError::AliasConflict { alias, .. } => {
                Some(format!("Pick another spelling or enable alias overwrite for '{}'", alias))
            }
            _ => None,
        }
    }
}
