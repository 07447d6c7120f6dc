//! Alias table - alternate spellings of canonical unit symbols

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::CatalogError;

/// What to do when an alias is re-registered for a different symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasPolicy {
    /// Keep the first mapping and report a conflict
    #[default]
    Reject,
    /// Last write wins
    Overwrite,
}

/// Many-to-one mapping from alias to canonical symbol.
///
/// Lookups are a single hop: an alias never points at another alias.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
    /// Lower-cased alias -> registered spellings
    folded: HashMap<String, Vec<String>>,
    policy: AliasPolicy,
}

impl AliasTable {
    pub fn new(policy: AliasPolicy) -> Self {
        AliasTable {
            aliases: HashMap::new(),
            folded: HashMap::new(),
            policy,
        }
    }

    /// Register `alias` as another spelling of `canonical`.
    ///
    /// Re-adding the same mapping is a no-op.
    pub fn add_alias(&mut self, canonical: &str, alias: &str) -> Result<(), CatalogError> {
        match self.aliases.get(alias) {
            Some(existing) if existing == canonical => return Ok(()),
            Some(existing) if self.policy == AliasPolicy::Reject => {
                return Err(CatalogError::AliasConflict {
                    alias: alias.to_string(),
                    existing: existing.clone(),
                    requested: canonical.to_string(),
                });
            }
            Some(existing) => {
                debug!(alias, from = %existing, to = canonical, "overwriting alias");
            }
            None => {}
        }
        if self.aliases.insert(alias.to_string(), canonical.to_string()).is_none() {
            self.folded.entry(alias.to_lowercase()).or_default().push(alias.to_string());
        }
        Ok(())
    }

    /// Canonical symbol for `symbol`; unknown input is returned unchanged
    pub fn resolve<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.aliases.get(symbol).map(String::as_str).unwrap_or(symbol)
    }

    /// Target of `alias`, if it is registered
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Targets of every alias whose lower-cased spelling is `folded`
    pub fn targets_folded<'a>(&'a self, folded: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.folded.get(folded)
            .into_iter()
            .flatten()
            .filter_map(|alias| self.aliases.get(alias))
            .map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// Aliases registered for `canonical`, sorted
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        let mut found: Vec<&str> = self.aliases.iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect();
        found.sort_unstable();
        found
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, s)| (a.as_str(), s.as_str()))
    }
}
