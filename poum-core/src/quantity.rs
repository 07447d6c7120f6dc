//! Quantity type - a named physical quantity owning its units

use std::fmt;
use serde::Serialize;
use crate::{CatalogError, Unit};

/// A physical quantity (length, pressure, ...) and its ordered units.
///
/// Exactly one unit is the base unit; every other unit converts through it.
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    name: String,
    description: String,
    units: Vec<Unit>,
    /// Index of the base unit in `units`
    base: usize,
}

impl Quantity {
    /// Create a quantity with its base unit.
    ///
    /// The base unit must have the identity formula.
    pub fn new(name: &str, description: &str, base_unit: Unit) -> Result<Self, CatalogError> {
        check_base(&base_unit)?;
        let mut quantity = Quantity {
            name: name.to_string(),
            description: description.to_string(),
            units: Vec::new(),
            base: 0,
        };
        quantity.push(base_unit);
        Ok(quantity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Builder: add a non-base unit, for literal quantity definitions
    pub fn with_unit(mut self, unit: Unit) -> Result<Self, CatalogError> {
        self.add_unit(unit, false)?;
        Ok(self)
    }

    /// Append a unit. When `is_base` is true the unit becomes the base and
    /// the previous base is demoted to an ordinary unit.
    ///
    /// Symbols must be unique within the quantity; uniqueness across
    /// quantities is the catalog's job.
    pub fn add_unit(&mut self, unit: Unit, is_base: bool) -> Result<(), CatalogError> {
        if self.find_unit(unit.symbol()).is_some() {
            return Err(CatalogError::DuplicateSymbol {
                symbol: unit.symbol().to_string(),
                quantity: self.name.clone(),
            });
        }
        if is_base {
            check_base(&unit)?;
        }
        self.push(unit);
        if is_base {
            self.base = self.units.len() - 1;
        }
        Ok(())
    }

    fn push(&mut self, mut unit: Unit) {
        unit.attach_to(&self.name);
        self.units.push(unit);
    }

    /// Units in insertion order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Look up a unit of this quantity by exact symbol
    pub fn find_unit(&self, symbol: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.symbol() == symbol)
    }

    pub fn base_unit(&self) -> &Unit {
        &self.units[self.base]
    }

    pub fn is_base_unit(&self, unit: &Unit) -> bool {
        self.base_unit().symbol() == unit.symbol()
    }
}

fn check_base(unit: &Unit) -> Result<(), CatalogError> {
    if unit.is_identity() {
        Ok(())
    } else {
        Err(CatalogError::InvalidBaseUnit { symbol: unit.symbol().to_string() })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantity Name: {}", self.name)?;
        write!(f, "Units:")?;
        for unit in &self.units {
            write!(f, "\n{} ({})", unit.name(), unit.display_symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length() -> Quantity {
        Quantity::new("length", "distance between two points", Unit::base("metre", "m"))
            .unwrap()
            .with_unit(Unit::linear("kilometre", "km", 1000.0))
            .unwrap()
            .with_unit(Unit::linear("foot", "ft", 0.3048))
            .unwrap()
    }

    #[test]
    fn test_new_sets_base() {
        let q = length();
        assert_eq!(q.name(), "length");
        assert_eq!(q.base_unit().symbol(), "m");
        assert!(q.is_base_unit(q.find_unit("m").unwrap()));
    }

    #[test]
    fn test_units_keep_insertion_order() {
        let q = length();
        let symbols: Vec<&str> = q.units().iter().map(|u| u.symbol()).collect();
        assert_eq!(symbols, vec!["m", "km", "ft"]);
    }

    #[test]
    fn test_units_know_their_quantity() {
        let q = length();
        assert!(q.units().iter().all(|u| u.quantity_name() == Some("length")));
    }

    #[test]
    fn test_find_unit_is_local() {
        let q = length();
        assert_eq!(q.find_unit("ft").unwrap().name(), "foot");
        assert!(q.find_unit("s").is_none());
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut q = length();
        let err = q.add_unit(Unit::linear("feet", "ft", 0.3048), false).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSymbol { .. }));
        assert_eq!(q.units().len(), 3);
    }

    #[test]
    fn test_new_base_demotes_previous() {
        let mut q = length();
        q.add_unit(Unit::base("meter", "meter"), true).unwrap();
        assert_eq!(q.base_unit().symbol(), "meter");
        assert!(!q.is_base_unit(q.find_unit("m").unwrap()));
        // Demoted unit keeps its place
        assert_eq!(q.units()[0].symbol(), "m");
    }

    #[test]
    fn test_non_identity_base_rejected() {
        let err = Quantity::new("length", "", Unit::linear("foot", "ft", 0.3048)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseUnit { .. }));

        let mut q = length();
        assert!(q.add_unit(Unit::linear("yard", "yd", 0.9144), true).is_err());
        assert_eq!(q.base_unit().symbol(), "m");
        assert!(q.find_unit("yd").is_none());
    }

    #[test]
    fn test_display() {
        let s = length().to_string();
        assert!(s.starts_with("Quantity Name: length"));
        assert!(s.contains("foot (ft)"));
    }
}
