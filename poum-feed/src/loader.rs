//! Loading feeds into a catalog

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use poum_core::{CatalogError, Quantity, UnitCatalog};
use crate::{group_records, parse_alias_seeds, parse_feed, AliasSeed, DefinitionRecord, FeedError};

/// How conflicts in a feed are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedPolicy {
    /// The first conflict aborts the load
    #[default]
    Strict,
    /// Conflicting records are skipped and logged
    Lenient,
}

/// Counts reported after a load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub quantities: usize,
    pub units: usize,
    pub aliases: usize,
    pub skipped: usize,
}

/// Feeds definition records and alias seeds into a catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedLoader {
    policy: FeedPolicy,
}

impl FeedLoader {
    pub fn new(policy: FeedPolicy) -> Self {
        FeedLoader { policy }
    }

    fn lenient(&self) -> bool {
        self.policy == FeedPolicy::Lenient
    }

    /// Register every quantity described by `records`
    pub fn load_records(
        &self,
        catalog: &mut UnitCatalog,
        records: &[DefinitionRecord],
    ) -> Result<LoadSummary, FeedError> {
        let mut summary = LoadSummary::default();

        for group in group_records(records) {
            let group = match group {
                Ok(group) => group,
                Err(e) if self.lenient() => {
                    warn!(error = %e, "skipping quantity");
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.lenient() && catalog.is_symbol_taken(&group.base.symbol) {
                warn!(quantity = group.name, symbol = %group.base.symbol, "base unit symbol taken, skipping quantity");
                summary.skipped += 1 + group.others.len();
                continue;
            }

            let mut quantity = match Quantity::new(group.name, group.description, group.base.to_unit()) {
                Ok(quantity) => quantity,
                Err(e) if self.lenient() => {
                    warn!(quantity = group.name, error = %e, "skipping quantity");
                    summary.skipped += 1 + group.others.len();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            for record in &group.others {
                let added = if catalog.is_symbol_taken(&record.symbol) {
                    Err(CatalogError::DuplicateSymbol {
                        symbol: record.symbol.clone(),
                        quantity: group.name.to_string(),
                    })
                } else {
                    quantity.add_unit(record.to_unit(), false)
                };
                match added {
                    Ok(()) => {}
                    Err(e) if self.lenient() => {
                        warn!(quantity = group.name, error = %e, "skipping unit");
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            let units = quantity.units().len();
            match catalog.add_quantity(quantity) {
                Ok(()) => {
                    summary.quantities += 1;
                    summary.units += units;
                }
                Err(e) if self.lenient() => {
                    warn!(quantity = group.name, error = %e, "skipping quantity");
                    summary.skipped += units;
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(quantities = summary.quantities, units = summary.units, skipped = summary.skipped,
            "loaded definition feed");
        Ok(summary)
    }

    /// Register alias seeds; each seed's symbol may itself be an alias
    pub fn load_aliases(&self, catalog: &mut UnitCatalog, seeds: &[AliasSeed]) -> Result<LoadSummary, FeedError> {
        let mut summary = LoadSummary::default();
        for seed in seeds {
            match catalog.add_unit_alias(&seed.symbol, &seed.alias) {
                Ok(()) => summary.aliases += 1,
                Err(e) if self.lenient() => {
                    warn!(alias = %seed.alias, symbol = %seed.symbol, error = %e, "skipping alias");
                    summary.skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
        info!(aliases = summary.aliases, skipped = summary.skipped, "loaded unit aliases");
        Ok(summary)
    }

    pub fn load_json(&self, catalog: &mut UnitCatalog, json: &str) -> Result<LoadSummary, FeedError> {
        let records = parse_feed(json)?;
        self.load_records(catalog, &records)
    }

    pub fn load_feed_file(&self, catalog: &mut UnitCatalog, path: &Path) -> Result<LoadSummary, FeedError> {
        let json = read(path)?;
        self.load_json(catalog, &json)
    }

    pub fn load_alias_file(&self, catalog: &mut UnitCatalog, path: &Path) -> Result<LoadSummary, FeedError> {
        let text = read(path)?;
        self.load_aliases(catalog, &parse_alias_seeds(&text))
    }
}

fn read(path: &Path) -> Result<String, FeedError> {
    fs::read_to_string(path).map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use poum_core::codes;

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

    fn clashing_records() -> Vec<DefinitionRecord> {
        vec![
            record("length", "m", 1.0, true),
            record("length", "ft", 0.3048, false),
            record("depth", "md", 1.0, true),
            record("depth", "ft", 0.3048, false),
            record("depth", "fathom", 1.8288, false),
        ]
    }

    #[test]
    fn test_load_records() {
        let mut catalog = UnitCatalog::new();
        let summary = FeedLoader::default()
            .load_records(&mut catalog, &clashing_records()[..2])
            .unwrap();
        assert_eq!(summary, LoadSummary { quantities: 1, units: 2, aliases: 0, skipped: 0 });
        assert_eq!(catalog.find_quantity("length").unwrap().base_unit().symbol(), "m");
    }

    #[test]
    fn test_strict_stops_on_conflict() {
        let mut catalog = UnitCatalog::new();
        let err = FeedLoader::new(FeedPolicy::Strict)
            .load_records(&mut catalog, &clashing_records())
            .unwrap_err();
        assert_eq!(err.code(), codes::DUPLICATE_SYMBOL);
        assert!(catalog.find_quantity("depth").is_none());
    }

    #[test]
    fn test_lenient_skips_conflicts() {
        let mut catalog = UnitCatalog::new();
        let summary = FeedLoader::new(FeedPolicy::Lenient)
            .load_records(&mut catalog, &clashing_records())
            .unwrap();
        assert_eq!(summary.quantities, 2);
        assert_eq!(summary.units, 4);
        assert_eq!(summary.skipped, 1);
        assert_eq!(catalog.find_quantity_for_symbol("ft").unwrap().name(), "length");
        assert_eq!(catalog.find_quantity_for_symbol("fathom").unwrap().name(), "depth");
    }

    #[test]
    fn test_lenient_skips_quantity_without_base() {
        let mut catalog = UnitCatalog::new();
        let records = vec![record("length", "ft", 0.3048, false), record("time", "s", 1.0, true)];
        let summary = FeedLoader::new(FeedPolicy::Lenient).load_records(&mut catalog, &records).unwrap();
        assert_eq!(summary.quantities, 1);
        assert_eq!(summary.skipped, 1);
        assert!(catalog.find_quantity("length").is_none());
    }

    #[test]
    fn test_load_aliases() {
        let mut catalog = UnitCatalog::new();
        let loader = FeedLoader::default();
        loader.load_records(&mut catalog, &clashing_records()[..2]).unwrap();

        let seeds = parse_alias_seeds("feet=ft\npieds=feet\n");
        let summary = loader.load_aliases(&mut catalog, &seeds).unwrap();
        assert_eq!(summary.aliases, 2);
        assert_eq!(catalog.aliases().get("pieds"), Some("ft"));

        let bad = parse_alias_seeds("furlongs=fur\n");
        assert_eq!(loader.load_aliases(&mut catalog, &bad).unwrap_err().code(), codes::NOT_FOUND);
        let summary = FeedLoader::new(FeedPolicy::Lenient).load_aliases(&mut catalog, &bad).unwrap();
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_missing_file() {
        let mut catalog = UnitCatalog::new();
        let err = FeedLoader::default()
            .load_feed_file(&mut catalog, Path::new("/nonexistent/uom.json"))
            .unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }

    #[test]
    fn test_feed_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("poum-feed-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let feed = dir.join("uom.json");
        let aliases = dir.join("unit_aliases.txt");
        fs::write(&feed, serde_json::to_string(&clashing_records()[..2]).unwrap()).unwrap();
        fs::write(&aliases, "# comment\nfeet=ft\n").unwrap();

        let mut catalog = UnitCatalog::new();
        let loader = FeedLoader::default();
        loader.load_feed_file(&mut catalog, &feed).unwrap();
        loader.load_alias_file(&mut catalog, &aliases).unwrap();
        assert_eq!(catalog.find_unit("feet").unwrap().symbol(), "ft");

        fs::remove_dir_all(&dir).unwrap();
    }
}
