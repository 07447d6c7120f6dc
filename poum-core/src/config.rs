//! Catalog behaviour switches

use serde::{Deserialize, Serialize};
use crate::AliasPolicy;

/// How quantity names are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

/// What `add_quantity` does with a name that is already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateQuantityPolicy {
    /// Fail with DUPLICATE_QUANTITY
    #[default]
    Reject,
    /// Append the incoming units to the existing quantity as non-base units
    Merge,
}

/// Catalog configuration. Every field has a default, so a partial JSON
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub alias_policy: AliasPolicy,
    pub quantity_names: NameMatching,
    pub duplicate_quantity: DuplicateQuantityPolicy,
    /// Accept a case-insensitive symbol match when it is unambiguous
    pub case_insensitive_fallback: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            alias_policy: AliasPolicy::Reject,
            quantity_names: NameMatching::CaseSensitive,
            duplicate_quantity: DuplicateQuantityPolicy::Reject,
            case_insensitive_fallback: true,
        }
    }
}

impl CatalogConfig {
    pub fn with_alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.alias_policy = policy;
        self
    }

    pub fn with_quantity_names(mut self, matching: NameMatching) -> Self {
        self.quantity_names = matching;
        self
    }

    pub fn with_duplicate_quantity(mut self, policy: DuplicateQuantityPolicy) -> Self {
        self.duplicate_quantity = policy;
        self
    }

    pub fn with_case_insensitive_fallback(mut self, enabled: bool) -> Self {
        self.case_insensitive_fallback = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.alias_policy, AliasPolicy::Reject);
        assert_eq!(config.quantity_names, NameMatching::CaseSensitive);
        assert_eq!(config.duplicate_quantity, DuplicateQuantityPolicy::Reject);
        assert!(config.case_insensitive_fallback);
    }

    #[test]
    fn test_partial_json() {
        let config: CatalogConfig = serde_json::from_str(
            r#"{"alias_policy": "overwrite", "quantity_names": "case_insensitive"}"#,
        ).unwrap();
        assert_eq!(config.alias_policy, AliasPolicy::Overwrite);
        assert_eq!(config.quantity_names, NameMatching::CaseInsensitive);
        assert_eq!(config.duplicate_quantity, DuplicateQuantityPolicy::Reject);
        assert!(config.case_insensitive_fallback);
    }
}
