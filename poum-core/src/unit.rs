//! Unit representation with conversion coefficients

use std::fmt;
use serde::Serialize;

/// A unit of measure and its conversion to the base unit of its quantity.
///
/// The conversion is the rational form `base = (a * value + b) / (c * value + d)`.
/// Linear units have `c = 0, d = 1`; temperatures carry an offset in `b`;
/// reciprocal scales such as API gravity use a non-zero `c`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Display name (e.g., "metre", "foot")
    name: String,
    /// Canonical symbol, unique across the catalog (e.g., "m", "ft")
    symbol: String,
    /// Presentation symbol (e.g., "m²" for "m2")
    display_symbol: String,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    /// Name of the owning quantity, set when the unit is added to one
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<String>,
}

impl Unit {
    /// Create a unit from the four rational coefficients
    pub fn new(name: &str, symbol: &str, a: f64, b: f64, c: f64, d: f64) -> Self {
        Unit {
            name: name.to_string(),
            symbol: symbol.to_string(),
            display_symbol: derive_display_symbol(symbol),
            a,
            b,
            c,
            d,
            quantity: None,
        }
    }

    /// Create a base unit (identity formula)
    pub fn base(name: &str, symbol: &str) -> Self {
        Unit::new(name, symbol, 1.0, 0.0, 0.0, 1.0)
    }

    /// Create a unit with proportional conversion: `base = factor * value`
    pub fn linear(name: &str, symbol: &str, factor: f64) -> Self {
        Unit::new(name, symbol, factor, 0.0, 0.0, 1.0)
    }

    /// Create a unit with offset: `base = factor * value + offset`
    pub fn with_offset(name: &str, symbol: &str, factor: f64, offset: f64) -> Self {
        Unit::new(name, symbol, factor, offset, 0.0, 1.0)
    }

    /// Builder: override the derived display symbol
    pub fn with_display_symbol(mut self, display_symbol: &str) -> Self {
        self.display_symbol = display_symbol.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn display_symbol(&self) -> &str {
        &self.display_symbol
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    /// Name of the quantity this unit belongs to, if it has been added to one
    pub fn quantity_name(&self) -> Option<&str> {
        self.quantity.as_deref()
    }

    pub(crate) fn attach_to(&mut self, quantity: &str) {
        self.quantity = Some(quantity.to_string());
    }

    /// True when `to_base` is the identity function
    pub fn is_identity(&self) -> bool {
        self.a == 1.0 && self.b == 0.0 && self.c == 0.0 && self.d == 1.0
    }

    /// Convert a value in this unit to the base unit.
    ///
    /// Degenerate coefficients yield NaN or infinity, never an error.
    pub fn to_base(&self, value: f64) -> f64 {
        if self.is_identity() {
            return value;
        }
        (self.a * value + self.b) / (self.c * value + self.d)
    }

    /// Convert a value in the base unit to this unit (inverse of `to_base`)
    pub fn from_base(&self, value: f64) -> f64 {
        if self.is_identity() {
            return value;
        }
        (self.b - self.d * value) / (self.c * value - self.a)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] a={}, b={}, c={}, d={}",
            self.name, self.symbol, self.a, self.b, self.c, self.d)
    }
}

/// Bases that take a `u` micro prefix in plain-ASCII symbols
const MICRO_BASES: [&str; 12] = ["m", "s", "g", "L", "A", "V", "W", "F", "H", "Pa", "mol", "ohm"];

/// SI prefixes, `u` standing for micro
const SI_PREFIXES: [&str; 20] = [
    "Y", "Z", "E", "P", "T", "G", "M", "k", "h", "da", "d", "c", "m", "u", "n", "p", "f", "a", "z", "y",
];

/// Derive a presentation symbol from a canonical symbol.
///
/// `degC` becomes `°C`, `ohm` becomes `Ω` (also after an SI prefix), a trailing `2`/`3` exponent
/// becomes `²`/`³`, a `u` micro prefix becomes `µ`, and `.` between
/// factors becomes `·`.
pub fn derive_display_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len() + 4);
    let mut token = String::new();
    let mut prev_alnum = false;

    let mut chars = symbol.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '/' => {
                out.push_str(&display_token(&token));
                token.clear();
                out.push('/');
            }
            '.' if prev_alnum && chars.peek().map_or(false, |c| c.is_alphabetic()) => {
                out.push_str(&display_token(&token));
                token.clear();
                out.push('·');
            }
            _ => token.push(ch),
        }
        prev_alnum = ch.is_alphanumeric();
    }
    out.push_str(&display_token(&token));
    out
}

fn display_token(token: &str) -> String {
    // Split off a single trailing exponent digit following a letter
    let (stem, exponent) = match token.char_indices().last() {
        Some((i, last @ ('2' | '3'))) if i > 0
            && token[..i].chars().last().map_or(false, |c| c.is_alphabetic()) =>
        {
            (&token[..i], Some(if last == '2' { '²' } else { '³' }))
        }
        _ => (token, None),
    };

    let mut rendered = display_stem(stem);
    if let Some(sup) = exponent {
        rendered.push(sup);
    }
    rendered
}

fn display_stem(stem: &str) -> String {
    if stem == "ohm" {
        return "Ω".to_string();
    }
    if let Some(rest) = stem.strip_prefix("deg") {
        if rest.len() == 1 && rest.chars().all(|c| c.is_ascii_uppercase()) {
            return format!("°{}", rest);
        }
    }
    if let Some(rest) = stem.strip_prefix('u') {
        if MICRO_BASES.contains(&rest) {
            return format!("µ{}", display_stem(rest));
        }
    }
    if let Some(prefix) = stem.strip_suffix("ohm") {
        if SI_PREFIXES.contains(&prefix) {
            return format!("{}Ω", prefix);
        }
    }
    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!((actual - expected).abs() / scale < 1e-9,
            "expected {}, got {}", expected, actual);
    }

    fn foot() -> Unit {
        Unit::linear("foot", "ft", 0.3048)
    }

    fn fahrenheit() -> Unit {
        // K = (5 * F + 2298.35) / 9
        Unit::new("degree Fahrenheit", "degF", 5.0, 2298.35, 0.0, 9.0)
    }

    fn api_gravity() -> Unit {
        // SG = 141.5 / (API + 131.5)
        Unit::new("API gravity", "dAPI", 0.0, 141.5, 1.0, 131.5)
    }

    #[test]
    fn test_linear_to_base() {
        assert_close(foot().to_base(10.0), 3.048);
    }

    #[test]
    fn test_linear_from_base() {
        assert_close(foot().from_base(3.048), 10.0);
    }

    #[test]
    fn test_offset_unit() {
        let f = fahrenheit();
        assert_close(f.to_base(32.0), 273.15);
        assert_close(f.to_base(212.0), 373.15);
        assert_close(f.from_base(273.15), 32.0);
    }

    #[test]
    fn test_rational_unit() {
        let api = api_gravity();
        assert_close(api.to_base(10.0), 1.0);
        assert_close(api.from_base(1.0), 10.0);
    }

    #[test]
    fn test_round_trip() {
        for unit in [foot(), fahrenheit(), api_gravity(), Unit::with_offset("degC", "degC", 1.0, 273.15)] {
            for v in [-40.0, 0.0, 1.5, 98.6, 1.0e6] {
                assert_close(unit.from_base(unit.to_base(v)), v);
            }
        }
    }

    #[test]
    fn test_base_identity_is_exact() {
        let m = Unit::base("metre", "m");
        assert!(m.is_identity());
        assert_eq!(m.to_base(0.1), 0.1);
        assert_eq!(m.from_base(0.1), 0.1);
    }

    #[test]
    fn test_degenerate_formula_is_non_finite() {
        let broken = Unit::new("broken", "brk", 1.0, 0.0, 0.0, 0.0);
        assert!(broken.to_base(1.0).is_infinite());
        assert!(broken.to_base(0.0).is_nan());
    }

    #[test]
    fn test_accessors() {
        let ft = foot();
        assert_eq!(ft.name(), "foot");
        assert_eq!(ft.symbol(), "ft");
        assert_eq!(ft.display_symbol(), "ft");
        assert_eq!(ft.a(), 0.3048);
        assert_eq!(ft.d(), 1.0);
        assert_eq!(ft.quantity_name(), None);
    }

    #[test]
    fn test_display_symbol_override() {
        let u = Unit::linear("inch", "in", 0.0254).with_display_symbol("″");
        assert_eq!(u.display_symbol(), "″");
        assert_eq!(u.symbol(), "in");
    }

    #[test]
    fn test_derive_display_symbol() {
        assert_eq!(derive_display_symbol("m2"), "m²");
        assert_eq!(derive_display_symbol("kg/m3"), "kg/m³");
        assert_eq!(derive_display_symbol("degC"), "°C");
        assert_eq!(derive_display_symbol("ohm.m"), "Ω·m");
        assert_eq!(derive_display_symbol("um"), "µm");
        assert_eq!(derive_display_symbol("uohm"), "µΩ");
        assert_eq!(derive_display_symbol("kohm"), "kΩ");
        assert_eq!(derive_display_symbol("Mohm"), "MΩ");
        assert_eq!(derive_display_symbol("kohm.m"), "kΩ·m");
        assert_eq!(derive_display_symbol("mohm"), "mΩ");
        assert_eq!(derive_display_symbol("xohm"), "xohm");
        assert_eq!(derive_display_symbol("mi/h"), "mi/h");
        assert_eq!(derive_display_symbol("ft"), "ft");
        assert_eq!(derive_display_symbol("1E6m3"), "1E6m³");
    }
}
