//! JSON feed documents
//!
//! Two shapes are accepted:
//! - a flat array of `DefinitionRecord`s
//! - a catalog document with separate unit and quantity lists, where each
//!   quantity names its member units:
//!
//! ```json
//! {
//!   "units": [{"name": "metre", "symbol": "m", "a": 1, "b": 0, "c": 0, "d": 1}],
//!   "quantities": [{"name": "length", "units": ["metre"]}]
//! }
//! ```
//!
//! In the document shape the base unit is `base_unit` when given, otherwise
//! the first listed unit.

use serde::Deserialize;
use crate::{DefinitionRecord, FeedError};

#[derive(Debug, Clone, Deserialize)]
pub struct UnitEntry {
    pub name: String,
    pub symbol: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    #[serde(default)]
    pub display_symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Member unit names
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub base_unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub units: Vec<UnitEntry>,
    #[serde(default)]
    pub quantities: Vec<QuantityEntry>,
}

impl FeedDocument {
    /// Flatten into one record per (quantity, unit) membership
    pub fn into_records(self) -> Result<Vec<DefinitionRecord>, FeedError> {
        let mut records = Vec::new();
        for quantity in &self.quantities {
            let base_name = quantity.base_unit.as_deref()
                .or_else(|| quantity.units.first().map(String::as_str));

            for unit_name in &quantity.units {
                let unit = self.units.iter()
                    .find(|u| &u.name == unit_name)
                    .ok_or_else(|| FeedError::UnknownUnitName {
                        quantity: quantity.name.clone(),
                        unit: unit_name.clone(),
                    })?;
                records.push(DefinitionRecord {
                    quantity: quantity.name.clone(),
                    quantity_description: quantity.description.clone().unwrap_or_default(),
                    name: unit.name.clone(),
                    symbol: unit.symbol.clone(),
                    a: unit.a,
                    b: unit.b,
                    c: unit.c,
                    d: unit.d,
                    is_base: Some(unit_name.as_str()) == base_name,
                    display_symbol: unit.display_symbol.clone(),
                });
            }
        }
        Ok(records)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedSource {
    Records(Vec<DefinitionRecord>),
    Document(FeedDocument),
}

/// Parse a JSON feed in either accepted shape
pub fn parse_feed(json: &str) -> Result<Vec<DefinitionRecord>, FeedError> {
    match serde_json::from_str(json)? {
        FeedSource::Records(records) => Ok(records),
        FeedSource::Document(document) => document.into_records(),
    }
}
