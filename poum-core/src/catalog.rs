//! Unit catalog - the registry of quantities, the global symbol index and
//! the alias table, plus the conversion entry point.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use crate::{
    AliasTable, CatalogConfig, CatalogError, DuplicateQuantityPolicy, NameMatching, Quantity, Unit,
};

/// Symbol looked up when the caller passes a blank symbol
pub const BLANK_SYMBOL: &str = "unitless";

/// Anything that can name a unit of the catalog: a symbol, an alias, or a
/// unit previously handed out by the catalog.
pub trait UnitRef {
    fn resolve<'c>(&self, catalog: &'c UnitCatalog) -> Option<&'c Unit>;

    /// Text used in error messages
    fn label(&self) -> String;
}

impl UnitRef for str {
    fn resolve<'c>(&self, catalog: &'c UnitCatalog) -> Option<&'c Unit> {
        catalog.find_unit(self)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl UnitRef for String {
    fn resolve<'c>(&self, catalog: &'c UnitCatalog) -> Option<&'c Unit> {
        catalog.find_unit(self)
    }

    fn label(&self) -> String {
        self.clone()
    }
}

impl UnitRef for Unit {
    fn resolve<'c>(&self, catalog: &'c UnitCatalog) -> Option<&'c Unit> {
        catalog.find_unit_exact(self.symbol()).filter(|u| *u == self)
    }

    fn label(&self) -> String {
        self.symbol().to_string()
    }
}

/// Position of a unit: (quantity index, unit index within the quantity)
type Slot = (usize, usize);

/// Registry of quantities and units.
///
/// Construct one, populate it, then share it by reference. Lookups take
/// `&self`; mutations take `&mut self`, so sharing across threads needs an
/// external lock (or a rebuilt catalog per update).
#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    config: CatalogConfig,
    quantities: Vec<Quantity>,
    quantity_index: HashMap<String, usize>,
    symbol_index: HashMap<String, Slot>,
    /// Lower-cased symbol -> canonical symbols, for the case-insensitive fallback
    folded_index: HashMap<String, Vec<String>>,
    aliases: AliasTable,
}

impl UnitCatalog {
    pub fn new() -> Self {
        UnitCatalog::with_config(CatalogConfig::default())
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        UnitCatalog {
            aliases: AliasTable::new(config.alias_policy),
            config,
            quantities: Vec::new(),
            quantity_index: HashMap::new(),
            symbol_index: HashMap::new(),
            folded_index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn quantity_key(&self, name: &str) -> String {
        match self.config.quantity_names {
            NameMatching::CaseSensitive => name.to_string(),
            NameMatching::CaseInsensitive => name.to_lowercase(),
        }
    }

    // ========== Building ==========

    /// Register a quantity and index all of its units.
    ///
    /// Fails without modifying the catalog if any unit symbol is already
    /// taken (by a unit or an alias). A duplicate quantity name is rejected
    /// or merged according to the configuration.
    pub fn add_quantity(&mut self, quantity: Quantity) -> Result<(), CatalogError> {
        let key = self.quantity_key(quantity.name());
        if let Some(&existing) = self.quantity_index.get(&key) {
            return match self.config.duplicate_quantity {
                DuplicateQuantityPolicy::Reject => {
                    Err(CatalogError::DuplicateQuantity(quantity.name().to_string()))
                }
                DuplicateQuantityPolicy::Merge => self.merge_quantity(existing, quantity),
            };
        }

        for unit in quantity.units() {
            self.check_symbol_free(unit.symbol())?;
        }

        let q_idx = self.quantities.len();
        debug!(quantity = quantity.name(), units = quantity.units().len(), "adding quantity");
        for (u_idx, unit) in quantity.units().iter().enumerate() {
            self.index_symbol(unit.symbol(), (q_idx, u_idx));
        }
        self.quantity_index.insert(key, q_idx);
        self.quantities.push(quantity);
        Ok(())
    }

    /// Append the non-base units of `incoming` to an existing quantity.
    /// Both must share the base symbol, since the incoming formulas are
    /// relative to it.
    fn merge_quantity(&mut self, q_idx: usize, incoming: Quantity) -> Result<(), CatalogError> {
        let target = &self.quantities[q_idx];
        if incoming.base_unit().symbol() != target.base_unit().symbol() {
            return Err(CatalogError::DuplicateQuantity(incoming.name().to_string()));
        }
        let additions: Vec<&Unit> = incoming.units()
            .iter()
            .filter(|u| !incoming.is_base_unit(u))
            .collect();
        for unit in &additions {
            self.check_symbol_free(unit.symbol())?;
        }

        debug!(quantity = incoming.name(), units = additions.len(), "merging quantity");
        let name = target.name().to_string();
        for unit in additions {
            self.add_unit(&name, unit.clone(), false)?;
        }
        Ok(())
    }

    /// Append a unit to a registered quantity, keeping the symbol index in step
    pub fn add_unit(&mut self, quantity_name: &str, unit: Unit, is_base: bool) -> Result<(), CatalogError> {
        let key = self.quantity_key(quantity_name);
        let q_idx = *self.quantity_index.get(&key)
            .ok_or_else(|| CatalogError::UnknownQuantity(quantity_name.to_string()))?;
        self.check_symbol_free(unit.symbol())?;

        let symbol = unit.symbol().to_string();
        let quantity = &mut self.quantities[q_idx];
        quantity.add_unit(unit, is_base)?;
        let u_idx = quantity.units().len() - 1;
        debug!(quantity = quantity.name(), symbol = %symbol, is_base, "adding unit");
        self.index_symbol(&symbol, (q_idx, u_idx));
        Ok(())
    }

    /// Register `new_alias` for the unit named by `symbol_or_alias`.
    ///
    /// The left-hand side is resolved first, so an alias can be introduced
    /// by naming an existing alias; storage always points at the canonical
    /// symbol.
    pub fn add_unit_alias(&mut self, symbol_or_alias: &str, new_alias: &str) -> Result<(), CatalogError> {
        let new_alias = new_alias.trim();
        if new_alias.is_empty() {
            return Err(CatalogError::BlankAlias);
        }
        let canonical = self.find_unit(symbol_or_alias)
            .map(|u| u.symbol().to_string())
            .ok_or_else(|| CatalogError::UnknownUnit(symbol_or_alias.to_string()))?;
        if self.symbol_index.contains_key(new_alias) {
            return Err(CatalogError::AliasShadowsSymbol(new_alias.to_string()));
        }
        self.aliases.add_alias(&canonical, new_alias)?;
        debug!(alias = new_alias, symbol = %canonical, "added alias");
        Ok(())
    }

    /// Return the named quantity, registering it with `base_unit` if absent
    pub fn find_or_create_quantity(
        &mut self,
        name: &str,
        description: &str,
        base_unit: Unit,
    ) -> Result<&Quantity, CatalogError> {
        let key = self.quantity_key(name);
        let q_idx = match self.quantity_index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.add_quantity(Quantity::new(name, description, base_unit)?)?;
                self.quantities.len() - 1
            }
        };
        Ok(&self.quantities[q_idx])
    }

    /// True when `symbol` is already a canonical symbol or an alias
    pub fn is_symbol_taken(&self, symbol: &str) -> bool {
        self.symbol_index.contains_key(symbol) || self.aliases.contains(symbol)
    }

    fn check_symbol_free(&self, symbol: &str) -> Result<(), CatalogError> {
        if let Some(&(q_idx, _)) = self.symbol_index.get(symbol) {
            return Err(CatalogError::DuplicateSymbol {
                symbol: symbol.to_string(),
                quantity: self.quantities[q_idx].name().to_string(),
            });
        }
        if self.aliases.contains(symbol) {
            return Err(CatalogError::AliasShadowsSymbol(symbol.to_string()));
        }
        Ok(())
    }

    fn index_symbol(&mut self, symbol: &str, slot: Slot) {
        self.symbol_index.insert(symbol.to_string(), slot);
        self.folded_index.entry(symbol.to_lowercase()).or_default().push(symbol.to_string());
    }

    // ========== Querying ==========

    /// Canonical symbol a user-supplied symbol or alias refers to
    fn resolve_slot(&self, symbol_or_alias: &str) -> Option<Slot> {
        let trimmed = symbol_or_alias.trim();
        let input = if trimmed.is_empty() { BLANK_SYMBOL } else { trimmed };

        let canonical = self.aliases.resolve(input);
        if let Some(&slot) = self.symbol_index.get(canonical) {
            return Some(slot);
        }
        if !self.config.case_insensitive_fallback {
            return None;
        }

        // Symbols and aliases folding to the input must agree on one unit
        let folded = input.to_lowercase();
        let mut candidates: Vec<&str> = self.folded_index.get(&folded)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .chain(self.aliases.targets_folded(&folded))
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        match candidates.as_slice() {
            [only] => self.symbol_index.get(*only).copied(),
            _ => None,
        }
    }

    fn unit_at(&self, (q_idx, u_idx): Slot) -> &Unit {
        &self.quantities[q_idx].units()[u_idx]
    }

    fn find_unit_exact(&self, symbol: &str) -> Option<&Unit> {
        self.symbol_index.get(symbol).map(|&slot| self.unit_at(slot))
    }

    /// Look up a quantity by name
    pub fn find_quantity(&self, name: &str) -> Option<&Quantity> {
        self.quantity_index.get(&self.quantity_key(name)).map(|&idx| &self.quantities[idx])
    }

    /// Quantity owning the unit named by a symbol or alias
    pub fn find_quantity_for_symbol(&self, symbol_or_alias: &str) -> Option<&Quantity> {
        self.resolve_slot(symbol_or_alias).map(|(q_idx, _)| &self.quantities[q_idx])
    }

    /// Quantity owning `unit`, if the unit is registered in this catalog
    pub fn find_quantity_by_unit(&self, unit: &Unit) -> Option<&Quantity> {
        self.symbol_index.get(unit.symbol())
            .filter(|&&slot| self.unit_at(slot) == unit)
            .map(|&(q_idx, _)| &self.quantities[q_idx])
    }

    /// Look up a unit by symbol or alias
    pub fn find_unit(&self, symbol_or_alias: &str) -> Option<&Unit> {
        self.resolve_slot(symbol_or_alias).map(|slot| self.unit_at(slot))
    }

    /// Every unit of the quantity owning `symbol_or_alias`, the unit itself
    /// included. Unknown input gives an empty slice.
    pub fn find_convertible_units(&self, symbol_or_alias: &str) -> &[Unit] {
        self.find_quantity_for_symbol(symbol_or_alias)
            .map(Quantity::units)
            .unwrap_or(&[])
    }

    /// True when both units resolve and belong to the same quantity
    pub fn can_convert<F, T>(&self, from: &F, to: &T) -> bool
    where
        F: UnitRef + ?Sized,
        T: UnitRef + ?Sized,
    {
        match (from.resolve(self), to.resolve(self)) {
            (Some(a), Some(b)) => a.quantity_name() == b.quantity_name(),
            _ => false,
        }
    }

    /// Convert `value` from one unit to another of the same quantity, by way
    /// of the quantity's base unit.
    pub fn convert<F, T>(&self, from: &F, to: &T, value: f64) -> Result<f64, CatalogError>
    where
        F: UnitRef + ?Sized,
        T: UnitRef + ?Sized,
    {
        let from_unit = from.resolve(self).ok_or_else(|| CatalogError::UnknownUnit(from.label()))?;
        let to_unit = to.resolve(self).ok_or_else(|| CatalogError::UnknownUnit(to.label()))?;

        let from_quantity = from_unit.quantity_name().unwrap_or_default();
        let to_quantity = to_unit.quantity_name().unwrap_or_default();
        if from_quantity != to_quantity {
            return Err(CatalogError::IncompatibleQuantity {
                from: from_unit.symbol().to_string(),
                to: to_unit.symbol().to_string(),
                from_quantity: from_quantity.to_string(),
                to_quantity: to_quantity.to_string(),
            });
        }

        if from_unit == to_unit {
            return Ok(value);
        }
        Ok(to_unit.from_base(from_unit.to_base(value)))
    }

    /// Display symbol for a symbol or alias; empty when unknown
    pub fn display_symbol_of(&self, symbol_or_alias: &str) -> &str {
        self.find_unit(symbol_or_alias).map_or("", Unit::display_symbol)
    }

    /// Quantities in insertion order
    pub fn get_quantities(&self) -> &[Quantity] {
        &self.quantities
    }

    /// Every unit of the catalog, quantity by quantity
    pub fn get_units(&self) -> impl Iterator<Item = &Unit> {
        self.quantities.iter().flat_map(|q| q.units().iter())
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn quantity_count(&self) -> usize {
        self.quantities.len()
    }

    pub fn unit_count(&self) -> usize {
        self.symbol_index.len()
    }
}

impl fmt::Display for UnitCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantities....: {}", self.quantity_count())?;
        writeln!(f, "Units.........: {}", self.unit_count())?;
        write!(f, "Unit aliases..: {}", self.aliases.len())
    }
}
