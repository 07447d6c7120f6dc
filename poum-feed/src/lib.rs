//! Poum Feed - Definition feeds for the unit catalog
//!
//! Supplies catalog content from outside the engine:
//! - `DefinitionRecord`: one unit of one quantity, with its coefficients
//! - JSON feeds, either a record array or a units/quantities document
//! - Alias seed files (`alias=symbol` per line)
//! - The built-in catalog
//!
//! ```no_run
//! let catalog = poum_feed::builtin_catalog().unwrap();
//! let kmh = catalog.convert("mi/h", "km/h", 55.0).unwrap();
//! assert!((kmh - 88.51392).abs() < 1e-9);
//! ```

mod error;
mod record;
mod document;
mod aliases;
mod loader;
mod builtin;

pub use error::{FeedError, FEED_ERROR};
pub use record::{DefinitionRecord, QuantityGroup, group_records};
pub use document::{FeedDocument, UnitEntry, QuantityEntry, parse_feed};
pub use aliases::{AliasSeed, parse_alias_seeds};
pub use loader::{FeedLoader, FeedPolicy, LoadSummary};
pub use builtin::{builtin_catalog, builtin_catalog_with, builtin_records, builtin_aliases};
