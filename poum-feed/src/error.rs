//! Feed loading errors

use std::path::PathBuf;
use thiserror::Error;
use poum_core::CatalogError;

/// Machine-readable code shared by every feed-format error
pub const FEED_ERROR: &str = "FEED_ERROR";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quantity {quantity} lists unknown unit name: {unit}")]
    UnknownUnitName { quantity: String, unit: String },

    #[error("quantity {0} has more than one base unit")]
    MultipleBaseUnits(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl FeedError {
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::Catalog(e) => e.code(),
            _ => FEED_ERROR,
        }
    }
}
