//! Built-in definitions - common oilfield and engineering units organized by quantity
//!
//! Symbols follow the Energistics unit-of-measure conventions (`mi/h`,
//! `ohm.m`, `degC`, `dAPI`, ...). The definitions are emitted as ordinary
//! feed records and go through the same loader as any external feed.

use std::f64::consts::{PI, TAU};
use poum_core::{CatalogConfig, UnitCatalog};
use crate::{AliasSeed, DefinitionRecord, FeedError, FeedLoader, FeedPolicy};

/// Built-in catalog with the default configuration
pub fn builtin_catalog() -> Result<UnitCatalog, FeedError> {
    builtin_catalog_with(CatalogConfig::default())
}

/// Built-in catalog with a caller-supplied configuration
pub fn builtin_catalog_with(config: CatalogConfig) -> Result<UnitCatalog, FeedError> {
    let mut catalog = UnitCatalog::with_config(config);
    let feed = BuiltinFeed::new();
    let loader = FeedLoader::new(FeedPolicy::Strict);
    loader.load_records(&mut catalog, &feed.records)?;
    loader.load_aliases(&mut catalog, &feed.aliases)?;
    Ok(catalog)
}

/// The built-in definition records
pub fn builtin_records() -> Vec<DefinitionRecord> {
    BuiltinFeed::new().records
}

/// The built-in alias seeds
pub fn builtin_aliases() -> Vec<AliasSeed> {
    BuiltinFeed::new().aliases
}

struct BuiltinFeed {
    records: Vec<DefinitionRecord>,
    aliases: Vec<AliasSeed>,
    quantity: &'static str,
    description: &'static str,
}

impl BuiltinFeed {
    fn new() -> Self {
        let mut feed = BuiltinFeed {
            records: Vec::new(),
            aliases: Vec::new(),
            quantity: "",
            description: "",
        };
        feed.register_all_units();
        feed
    }

    fn quantity(&mut self, name: &'static str, description: &'static str) {
        self.quantity = name;
        self.description = description;
    }

    fn push(&mut self, name: &str, symbol: &str, a: f64, b: f64, c: f64, d: f64, is_base: bool) {
        self.records.push(DefinitionRecord {
            quantity: self.quantity.to_string(),
            quantity_description: self.description.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            a,
            b,
            c,
            d,
            is_base,
            display_symbol: None,
        });
    }

    fn base(&mut self, name: &str, symbol: &str) {
        self.push(name, symbol, 1.0, 0.0, 0.0, 1.0, true);
    }

    fn linear(&mut self, name: &str, symbol: &str, factor: f64) {
        self.push(name, symbol, factor, 0.0, 0.0, 1.0, false);
    }

    /// base = numerator / denominator * value, kept as a ratio for precision
    fn ratio(&mut self, name: &str, symbol: &str, numerator: f64, denominator: f64) {
        self.push(name, symbol, numerator, 0.0, 0.0, denominator, false);
    }

    fn rational(&mut self, name: &str, symbol: &str, a: f64, b: f64, c: f64, d: f64) {
        self.push(name, symbol, a, b, c, d, false);
    }

    /// Override the display symbol of the last unit
    fn display(&mut self, display_symbol: &str) {
        if let Some(last) = self.records.last_mut() {
            last.display_symbol = Some(display_symbol.to_string());
        }
    }

    fn alias(&mut self, alias: &str, symbol: &str) {
        self.aliases.push(AliasSeed::new(alias, symbol));
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_area_units();
        self.register_volume_units();
        self.register_time_units();
        self.register_velocity_units();
        self.register_mass_units();
        self.register_density_units();
        self.register_relative_density_units();
        self.register_temperature_units();
        self.register_pressure_units();
        self.register_energy_units();
        self.register_power_units();
        self.register_force_units();
        self.register_angle_units();
        self.register_frequency_units();
        self.register_resistance_units();
        self.register_resistivity_units();
        self.register_dimensionless_units();
    }

    fn register_length_units(&mut self) {
        self.quantity("length", "Distance between two points");
        self.base("metre", "m");
        self.linear("kilometre", "km", 1000.0);
        self.linear("centimetre", "cm", 0.01);
        self.linear("millimetre", "mm", 0.001);
        self.linear("micrometre", "um", 1.0e-6);
        self.linear("inch", "in", 0.0254);
        self.linear("foot", "ft", 0.3048);
        self.ratio("US survey foot", "ftUS", 1200.0, 3937.0);
        self.linear("yard", "yd", 0.9144);
        self.linear("mile", "mi", 1609.344);
        self.linear("nautical mile", "nautmi", 1852.0);

        // Aliases
        self.alias("metre", "m");
        self.alias("metres", "m");
        self.alias("meter", "m");
        self.alias("meters", "m");
        self.alias("kilometre", "km");
        self.alias("kilometer", "km");
        self.alias("kilometers", "km");
        self.alias("millimetre", "mm");
        self.alias("millimeter", "mm");
        self.alias("inch", "in");
        self.alias("inches", "in");
        self.alias("foot", "ft");
        self.alias("feet", "ft");
        self.alias("yard", "yd");
        self.alias("yards", "yd");
        self.alias("mile", "mi");
        self.alias("miles", "mi");
        self.alias("micron", "um");
        self.alias("µm", "um");
        self.alias("nmi", "nautmi");
    }

    fn register_area_units(&mut self) {
        self.quantity("area", "Extent of a two-dimensional surface");
        self.base("square metre", "m2");
        self.linear("square kilometre", "km2", 1.0e6);
        self.linear("square centimetre", "cm2", 1.0e-4);
        self.linear("square inch", "in2", 0.00064516);
        self.linear("square foot", "ft2", 0.09290304);
        self.linear("square mile", "mi2", 2_589_988.110336);
        self.linear("acre", "acre", 4046.8564224);
        self.linear("hectare", "ha", 10_000.0);

        self.alias("m²", "m2");
        self.alias("sqft", "ft2");
        self.alias("hectare", "ha");
        self.alias("acres", "acre");
    }

    fn register_volume_units(&mut self) {
        self.quantity("volume", "Extent of a three-dimensional region");
        self.base("cubic metre", "m3");
        self.linear("litre", "L", 0.001);
        self.linear("cubic centimetre", "cm3", 1.0e-6);
        self.linear("cubic foot", "ft3", 0.028316846592);
        self.linear("US gallon", "galUS", 0.003785411784);
        self.linear("UK gallon", "galUK", 0.00454609);
        self.linear("barrel", "bbl", 0.158987294928);

        self.alias("m³", "m3");
        self.alias("litre", "L");
        self.alias("liter", "L");
        self.alias("l", "L");
        self.alias("cc", "cm3");
        self.alias("gal", "galUS");
        self.alias("barrel", "bbl");
        self.alias("barrels", "bbl");
    }

    fn register_time_units(&mut self) {
        self.quantity("time", "Duration of an event");
        self.base("second", "s");
        self.linear("millisecond", "ms", 0.001);
        self.linear("minute", "min", 60.0);
        self.linear("hour", "h", 3600.0);
        self.linear("day", "d", 86_400.0);
        self.linear("week", "wk", 604_800.0);
        // Julian year
        self.linear("annum", "a", 31_557_600.0);

        self.alias("sec", "s");
        self.alias("second", "s");
        self.alias("seconds", "s");
        self.alias("minute", "min");
        self.alias("minutes", "min");
        self.alias("hr", "h");
        self.alias("hour", "h");
        self.alias("hours", "h");
        self.alias("day", "d");
        self.alias("days", "d");
        self.alias("week", "wk");
        self.alias("weeks", "wk");
        self.alias("year", "a");
        self.alias("yr", "a");
    }

    fn register_velocity_units(&mut self) {
        self.quantity("velocity", "Distance travelled per unit of time");
        self.base("metre per second", "m/s");
        self.ratio("kilometre per hour", "km/h", 1000.0, 3600.0);
        self.linear("mile per hour", "mi/h", 0.44704);
        self.linear("foot per second", "ft/s", 0.3048);
        self.ratio("knot", "knot", 1852.0, 3600.0);

        self.alias("mph", "mi/h");
        self.alias("kph", "km/h");
        self.alias("kmh", "km/h");
        self.alias("fps", "ft/s");
        self.alias("kn", "knot");
        self.alias("knots", "knot");
    }

    fn register_mass_units(&mut self) {
        self.quantity("mass", "Quantity of matter");
        self.base("kilogram", "kg");
        self.linear("gram", "g", 0.001);
        self.linear("milligram", "mg", 1.0e-6);
        self.linear("tonne", "t", 1000.0);
        self.linear("pound mass", "lbm", 0.45359237);
        self.linear("ounce mass", "ozm", 0.028349523125);
        self.linear("US short ton", "tonUS", 907.18474);

        self.alias("kilogram", "kg");
        self.alias("kilograms", "kg");
        self.alias("gram", "g");
        self.alias("grams", "g");
        self.alias("tonne", "t");
        self.alias("tonnes", "t");
        self.alias("lb", "lbm");
        self.alias("lbs", "lbm");
        self.alias("pound", "lbm");
        self.alias("pounds", "lbm");
        self.alias("oz", "ozm");
    }

    fn register_density_units(&mut self) {
        self.quantity("mass per volume", "Mass of a substance per unit volume");
        self.base("kilogram per cubic metre", "kg/m3");
        self.linear("gram per cubic centimetre", "g/cm3", 1000.0);
        self.linear("gram per litre", "g/L", 1.0);
        self.ratio("pound mass per cubic foot", "lbm/ft3", 0.45359237, 0.028316846592);
        self.ratio("pound mass per US gallon", "lbm/galUS", 0.45359237, 0.003785411784);

        self.alias("ppg", "lbm/galUS");
    }

    fn register_relative_density_units(&mut self) {
        self.quantity("specific gravity",
            "Density relative to water, also read on the API and Baume hydrometer scales");
        self.base("specific gravity", "SG");
        // SG = 141.5 / (API + 131.5)
        self.rational("API gravity", "dAPI", 0.0, 141.5, 1.0, 131.5);
        self.display("°API");
        // SG = 140 / (Be + 130), liquids lighter than water
        self.rational("Baume light", "dBeL", 0.0, 140.0, 1.0, 130.0);
        self.display("°Bé(light)");
        // SG = 145 / (145 - Be), liquids heavier than water
        self.rational("Baume heavy", "dBeH", 0.0, 145.0, -1.0, 145.0);
        self.display("°Bé(heavy)");

        self.alias("API", "dAPI");
        self.alias("°API", "dAPI");
    }

    fn register_temperature_units(&mut self) {
        self.quantity("thermodynamic temperature", "Average kinetic energy of particles");
        self.base("kelvin", "K");
        self.rational("degree Celsius", "degC", 1.0, 273.15, 0.0, 1.0);
        // K = (5 * F + 2298.35) / 9
        self.rational("degree Fahrenheit", "degF", 5.0, 2298.35, 0.0, 9.0);
        self.ratio("degree Rankine", "degR", 5.0, 9.0);

        self.alias("kelvin", "K");
        self.alias("celsius", "degC");
        self.alias("C", "degC");
        self.alias("°C", "degC");
        self.alias("fahrenheit", "degF");
        self.alias("F", "degF");
        self.alias("°F", "degF");
        self.alias("rankine", "degR");
        self.alias("°R", "degR");
    }

    fn register_pressure_units(&mut self) {
        self.quantity("pressure", "Force applied per unit area");
        self.base("pascal", "Pa");
        self.linear("kilopascal", "kPa", 1000.0);
        self.linear("megapascal", "MPa", 1.0e6);
        self.linear("bar", "bar", 1.0e5);
        self.linear("millibar", "mbar", 100.0);
        self.ratio("pound force per square inch", "psi", 4.4482216152605, 0.00064516);
        self.linear("standard atmosphere", "atm", 101_325.0);
        self.linear("millimetre of mercury", "mmHg", 133.322387415);

        self.alias("pascal", "Pa");
        self.alias("psia", "psi");
        self.alias("lbf/in2", "psi");
        self.alias("atmosphere", "atm");
    }

    fn register_energy_units(&mut self) {
        self.quantity("energy", "Capacity to do work");
        self.base("joule", "J");
        self.linear("kilojoule", "kJ", 1000.0);
        self.linear("megajoule", "MJ", 1.0e6);
        self.linear("thermochemical calorie", "cal", 4.184);
        self.linear("thermochemical kilocalorie", "kcal", 4184.0);
        self.linear("British thermal unit", "Btu", 1055.05585262);
        self.linear("kilowatt hour", "kW.h", 3.6e6);

        self.alias("joule", "J");
        self.alias("calorie", "cal");
        self.alias("kWh", "kW.h");
        self.alias("BTU", "Btu");
    }

    fn register_power_units(&mut self) {
        self.quantity("power", "Energy transferred per unit of time");
        self.base("watt", "W");
        self.linear("kilowatt", "kW", 1000.0);
        self.linear("megawatt", "MW", 1.0e6);
        self.linear("mechanical horsepower", "hp", 745.69987158227022);
        self.ratio("British thermal unit per hour", "Btu/h", 1055.05585262, 3600.0);

        self.alias("watt", "W");
        self.alias("kilowatt", "kW");
        self.alias("horsepower", "hp");
    }

    fn register_force_units(&mut self) {
        self.quantity("force", "Interaction that changes the motion of a body");
        self.base("newton", "N");
        self.linear("kilonewton", "kN", 1000.0);
        self.linear("pound force", "lbf", 4.4482216152605);
        self.linear("kilogram force", "kgf", 9.80665);
        self.linear("dyne", "dyne", 1.0e-5);

        self.alias("newton", "N");
    }

    fn register_angle_units(&mut self) {
        self.quantity("plane angle", "Figure formed by two rays sharing an endpoint");
        self.base("radian", "rad");
        self.linear("milliradian", "mrad", 0.001);
        self.ratio("degree of an angle", "dega", PI, 180.0);
        self.display("°");
        self.ratio("gon", "gon", PI, 200.0);
        self.linear("revolution", "rev", TAU);

        self.alias("radian", "rad");
        self.alias("radians", "rad");
        self.alias("deg", "dega");
        self.alias("degree", "dega");
        self.alias("degrees", "dega");
        self.alias("°", "dega");
        self.alias("grad", "gon");
    }

    fn register_frequency_units(&mut self) {
        self.quantity("frequency", "Number of occurrences per unit of time");
        self.base("hertz", "Hz");
        self.linear("kilohertz", "kHz", 1000.0);
        self.linear("megahertz", "MHz", 1.0e6);
        self.linear("gigahertz", "GHz", 1.0e9);

        self.alias("hertz", "Hz");
    }

    fn register_resistance_units(&mut self) {
        self.quantity("electrical resistance", "Opposition to the passage of electric current");
        self.base("ohm", "ohm");
        self.linear("kiloohm", "kohm", 1000.0);
        self.linear("megaohm", "Mohm", 1.0e6);

        self.alias("Ω", "ohm");
        self.alias("ohms", "ohm");
    }

    fn register_resistivity_units(&mut self) {
        self.quantity("electrical resistivity", "Resistance of a material to electric current");
        self.base("ohm metre", "ohm.m");
        self.linear("ohm centimetre", "ohm.cm", 0.01);
        self.linear("ohm foot", "ohm.ft", 0.3048);
        self.linear("kiloohm metre", "kohm.m", 1000.0);

        self.alias("Ω·m", "ohm.m");
        self.alias("ohmm", "ohm.m");
    }

    fn register_dimensionless_units(&mut self) {
        self.quantity("dimensionless", "Ratio of two values with the same unit");
        self.base("euclid", "Euc");
        self.linear("percent", "%", 0.01);
        self.linear("part per thousand", "ppk", 0.001);
        self.linear("part per million", "ppm", 1.0e-6);

        self.alias("unitless", "Euc");
        self.alias("percent", "%");
        self.alias("fraction", "Euc");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use poum_core::{codes, NameMatching, Quantity, Unit};

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!((actual - expected).abs() / scale < 1e-9,
            "expected {}, got {}", expected, actual);
    }

    const VALUES: [f64; 6] = [0.5, 1.0, 10.0, 35.0, 98.6, 1234.5];

    fn catalog() -> UnitCatalog {
        builtin_catalog().unwrap()
    }

    #[test]
    fn test_builtin_loads() {
        let catalog = catalog();
        assert_eq!(catalog.quantity_count(), 18);
        assert_eq!(catalog.unit_count(), builtin_records().len());
        assert_eq!(catalog.aliases().len(), builtin_aliases().len());
    }

    #[test]
    fn test_round_trip_every_unit() {
        let catalog = catalog();
        for unit in catalog.get_units() {
            for v in VALUES {
                let back = unit.from_base(unit.to_base(v));
                assert!((back - v).abs() / v.abs() < 1e-9,
                    "{} round trip of {} gave {}", unit.symbol(), v, back);
            }
        }
    }

    #[test]
    fn test_conversion_consistency() {
        let catalog = catalog();
        for quantity in catalog.get_quantities() {
            for a in quantity.units() {
                for b in quantity.units() {
                    for v in VALUES {
                        let there = catalog.convert(b, a, v).unwrap();
                        let back = catalog.convert(a, b, there).unwrap();
                        assert!((back - v).abs() / v.abs() < 1e-9,
                            "{} -> {} -> {} for {} gave {}", b.symbol(), a.symbol(), b.symbol(), v, back);
                    }
                }
            }
        }
    }

    #[test]
    fn test_base_unit_identity() {
        let catalog = catalog();
        for quantity in catalog.get_quantities() {
            let base = quantity.base_unit();
            for v in VALUES {
                assert_eq!(base.to_base(v), v);
                assert_eq!(catalog.convert(base, base, v).unwrap(), v);
            }
        }
    }

    #[test]
    fn test_global_symbol_uniqueness() {
        let catalog = catalog();
        let symbols: HashSet<&str> = catalog.get_units().map(Unit::symbol).collect();
        assert_eq!(symbols.len(), catalog.get_units().count());
    }

    #[test]
    fn test_alias_transparency() {
        let catalog = catalog();
        for (alias, symbol) in catalog.aliases().iter() {
            let base = catalog.find_quantity_for_symbol(symbol).unwrap().base_unit().symbol();
            for v in VALUES {
                assert_eq!(catalog.convert(alias, base, v).unwrap(), catalog.convert(symbol, base, v).unwrap());
            }
        }
    }

    #[test]
    fn test_aliases_never_shadow_symbols() {
        let catalog = catalog();
        for (alias, _) in catalog.aliases().iter() {
            assert!(catalog.get_units().all(|u| u.symbol() != alias), "alias {} shadows a symbol", alias);
        }
    }

    #[test]
    fn test_find_quantity_length() {
        let catalog = catalog();
        let quantity = catalog.find_quantity("length").unwrap();
        assert_eq!(quantity.base_unit().name(), "metre");
        assert_eq!(quantity.base_unit().symbol(), "m");
    }

    #[test]
    fn test_find_unit_resistivity() {
        let catalog = catalog();
        let unit = catalog.find_unit("ohm.m").unwrap();
        assert_eq!(unit.name(), "ohm metre");
        assert_eq!(unit.display_symbol(), "Ω·m");
        assert_eq!(catalog.find_quantity_by_unit(unit).unwrap().name(), "electrical resistivity");
    }

    #[test]
    fn test_miles_per_hour_to_kilometres_per_hour() {
        let catalog = catalog();
        assert_close(catalog.convert("mi/h", "km/h", 55.0).unwrap(), 88.51392);
        assert_close(catalog.convert("mph", "kph", 55.0).unwrap(), 88.51392);
    }

    #[test]
    fn test_convertible_units_of_celsius() {
        let catalog = catalog();
        let symbols: Vec<&str> = catalog.find_convertible_units("degC").iter().map(Unit::symbol).collect();
        for expected in ["degC", "degF", "K"] {
            assert!(symbols.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_convertible_units_of_speed() {
        let catalog = catalog();
        let units = catalog.find_convertible_units("mi/h");
        assert!(units.iter().any(|u| u.name() == "metre per second"));
        assert!(units.iter().any(|u| u.symbol() == "m/s"));
    }

    #[test]
    fn test_can_convert() {
        let catalog = catalog();
        assert!(catalog.can_convert("mi/h", "m/s"));
        assert!(catalog.can_convert("m/s", "mi/h"));
        assert!(!catalog.can_convert("mi/h", "ohm.m"));
    }

    #[test]
    fn test_cross_quantity_rejected() {
        let catalog = catalog();
        let err = catalog.convert("degC", "m", 100.0).unwrap_err();
        assert_eq!(err.code(), codes::INCOMPATIBLE_QUANTITY);
    }

    #[test]
    fn test_temperature_scenarios() {
        let catalog = catalog();
        assert_close(catalog.convert("degC", "degF", 100.0).unwrap(), 212.0);
        assert_close(catalog.convert("°F", "celsius", 32.0).unwrap(), 0.0);
        assert_close(catalog.convert("degR", "K", 491.67).unwrap(), 273.15);
    }

    #[test]
    fn test_api_gravity() {
        let catalog = catalog();
        assert_close(catalog.convert("dAPI", "SG", 10.0).unwrap(), 1.0);
        assert_close(catalog.convert("SG", "API", 0.876).unwrap(), 141.5 / 0.876 - 131.5);
        assert_eq!(catalog.display_symbol_of("dAPI"), "°API");
    }

    #[test]
    fn test_pressure_and_angle() {
        let catalog = catalog();
        assert_close(catalog.convert("bar", "psi", 1.0).unwrap(), 14.503773773020923);
        assert_close(catalog.convert("dega", "rad", 180.0).unwrap(), PI);
        assert_close(catalog.convert("rev", "deg", 1.0).unwrap(), 360.0);
    }

    #[test]
    fn test_blank_symbol_is_unitless() {
        let catalog = catalog();
        assert_eq!(catalog.find_unit("").unwrap().symbol(), "Euc");
        assert_close(catalog.convert("%", "", 50.0).unwrap(), 0.5);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.find_unit("KM/H").unwrap().symbol(), "km/h");
        assert_eq!(catalog.find_unit("Ohm.M").unwrap().symbol(), "ohm.m");
        assert_eq!(catalog.find_unit("MPH").unwrap().symbol(), "mi/h");
        assert_eq!(catalog.find_unit("Feet").unwrap().symbol(), "ft");
        assert_eq!(catalog.find_unit("KPH").unwrap().symbol(), "km/h");
        assert_close(catalog.convert("Celsius", "K", 0.0).unwrap(), 273.15);
    }

    #[test]
    fn test_prefixed_ohm_display() {
        let catalog = catalog();
        assert_eq!(catalog.display_symbol_of("kohm"), "kΩ");
        assert_eq!(catalog.display_symbol_of("Mohm"), "MΩ");
        assert_eq!(catalog.display_symbol_of("kohm.m"), "kΩ·m");
    }

    #[test]
    fn test_computer_storage_extension() {
        let mut catalog = catalog();
        let storage = Quantity::new("computer storage", "digital information", Unit::base("byte", "byte")).unwrap()
            .with_unit(Unit::linear("kilobyte", "kB", 1.0e3)).unwrap()
            .with_unit(Unit::linear("megabyte", "MB", 1.0e6)).unwrap()
            .with_unit(Unit::linear("gigabyte", "GB", 1.0e9)).unwrap();
        catalog.add_quantity(storage).unwrap();

        assert_close(catalog.convert("byte", "MB", 1_230_000.0).unwrap(), 1.23);
        assert!(catalog.can_convert("GB", "kB"));
        assert!(!catalog.can_convert("GB", "m"));
    }

    #[test]
    fn test_extension_cannot_steal_builtin_symbol() {
        let mut catalog = catalog();
        let clash = Quantity::new("depth", "", Unit::base("metre", "m")).unwrap();
        assert_eq!(catalog.add_quantity(clash).unwrap_err().code(), codes::DUPLICATE_SYMBOL);
    }

    #[test]
    fn test_builtin_with_case_insensitive_names() {
        let config = CatalogConfig::default().with_quantity_names(NameMatching::CaseInsensitive);
        let catalog = builtin_catalog_with(config).unwrap();
        assert_eq!(catalog.find_quantity("Thermodynamic Temperature").unwrap().base_unit().symbol(), "K");
    }
}
