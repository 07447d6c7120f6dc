//! Alias seed files
//!
//! One `alias=symbol` pair per line. Lines starting with `#` and lines
//! without `=` are ignored; whitespace around both sides is trimmed.

/// An alternate spelling and the unit symbol it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSeed {
    pub alias: String,
    pub symbol: String,
}

impl AliasSeed {
    pub fn new(alias: &str, symbol: &str) -> Self {
        AliasSeed {
            alias: alias.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

pub fn parse_alias_seeds(text: &str) -> Vec<AliasSeed> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(alias, symbol)| AliasSeed::new(alias.trim(), symbol.trim()))
        .filter(|seed| !seed.alias.is_empty() && !seed.symbol.is_empty())
        .collect()
}
