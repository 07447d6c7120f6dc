//! Flat definition records and their grouping into quantities

use serde::{Deserialize, Serialize};
use poum_core::{CatalogError, Unit};
use crate::FeedError;

/// One unit definition as supplied by a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub quantity: String,
    #[serde(default)]
    pub quantity_description: String,
    pub name: String,
    pub symbol: String,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    #[serde(default)]
    pub is_base: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_symbol: Option<String>,
}

impl DefinitionRecord {
    pub fn to_unit(&self) -> Unit {
        let unit = Unit::new(&self.name, &self.symbol, self.a, self.b, self.c, self.d);
        match &self.display_symbol {
            Some(display) => unit.with_display_symbol(display),
            None => unit,
        }
    }
}

/// Records of one quantity, base first
#[derive(Debug, Clone)]
pub struct QuantityGroup<'r> {
    pub name: &'r str,
    pub description: &'r str,
    pub base: &'r DefinitionRecord,
    pub others: Vec<&'r DefinitionRecord>,
}

/// Group records by quantity, keeping first-appearance order for quantities
/// and record order within each quantity.
pub fn group_records(records: &[DefinitionRecord]) -> Vec<Result<QuantityGroup<'_>, FeedError>> {
    let mut order: Vec<&str> = Vec::new();
    for record in records {
        if !order.contains(&record.quantity.as_str()) {
            order.push(&record.quantity);
        }
    }

    order.into_iter().map(|name| group_of(records, name)).collect()
}

fn group_of<'r>(records: &'r [DefinitionRecord], name: &'r str) -> Result<QuantityGroup<'r>, FeedError> {
    let members: Vec<&DefinitionRecord> = records.iter()
        .filter(|r| r.quantity == name)
        .collect();

    let mut bases = members.iter().copied().filter(|r| r.is_base);
    let base = bases.next()
        .ok_or_else(|| CatalogError::MissingBaseUnit(name.to_string()))?;
    if bases.next().is_some() {
        return Err(FeedError::MultipleBaseUnits(name.to_string()));
    }

    let description = members.iter()
        .copied()
        .map(|r| r.quantity_description.as_str())
        .find(|d| !d.is_empty())
        .unwrap_or("");
    Ok(QuantityGroup {
        name,
        description,
        base,
        others: members.into_iter().filter(|r| !r.is_base).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: &str, symbol: &str, a: f64, is_base: bool) -> DefinitionRecord {
        DefinitionRecord {
            quantity: quantity.to_string(),
            quantity_description: String::new(),
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            a,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            is_base,
            display_symbol: None,
        }
    }

    #[test]
    fn test_group_keeps_order() {
        let records = vec![
            record("length", "ft", 0.3048, false),
            record("time", "s", 1.0, true),
            record("length", "m", 1.0, true),
            record("length", "km", 1000.0, false),
        ];
        let groups: Vec<_> = group_records(&records).into_iter().map(Result::unwrap).collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "length");
        assert_eq!(groups[0].base.symbol, "m");
        let others: Vec<&str> = groups[0].others.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(others, vec!["ft", "km"]);
        assert_eq!(groups[1].name, "time");
    }

    #[test]
    fn test_missing_base() {
        let records = vec![record("length", "ft", 0.3048, false)];
        let groups = group_records(&records);
        assert!(matches!(groups[0], Err(FeedError::Catalog(CatalogError::MissingBaseUnit(_)))));
    }

    #[test]
    fn test_multiple_bases() {
        let records = vec![record("length", "m", 1.0, true), record("length", "metre", 1.0, true)];
        let groups = group_records(&records);
        assert!(matches!(groups[0], Err(FeedError::MultipleBaseUnits(_))));
    }

    #[test]
    fn test_display_symbol_override() {
        let mut r = record("length", "in", 0.0254, false);
        assert_eq!(r.to_unit().display_symbol(), "in");
        r.display_symbol = Some("″".to_string());
        assert_eq!(r.to_unit().display_symbol(), "″");
    }

    #[test]
    fn test_record_json_defaults() {
        let r: DefinitionRecord = serde_json::from_str(
            r#"{"quantity":"length","name":"foot","symbol":"ft","a":0.3048,"b":0,"c":0,"d":1}"#,
        ).unwrap();
        assert!(!r.is_base);
        assert_eq!(r.quantity_description, "");
        assert_eq!(r.display_symbol, None);
    }
}
