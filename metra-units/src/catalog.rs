//! Reference unit catalogs
//!
//! Every unit is a process-wide static, so the same instance is shared by
//! every registry. Derived units are built algebraically from units defined
//! before them.

use std::sync::LazyLock;
use crate::{ConversionRegistry, Dimension, Quantity, Unit};

/// A named group of units plus the setup routines for its custom conversions
pub struct UnitCatalog {
    pub name: &'static str,
    pub units: fn() -> Vec<Unit>,
    pub conversions: &'static [fn(&ConversionRegistry)],
}

impl UnitCatalog {
    const fn linear(name: &'static str, units: fn() -> Vec<Unit>) -> Self {
        UnitCatalog { name, units, conversions: &[] }
    }
}

/// All reference catalogs, in bootstrap order
pub static CATALOGS: [UnitCatalog; 14] = [
    UnitCatalog::linear("length", length::units),
    UnitCatalog::linear("area", area::units),
    UnitCatalog::linear("volume", volume::units),
    UnitCatalog::linear("time", time::units),
    UnitCatalog::linear("speed", speed::units),
    UnitCatalog::linear("mass", mass::units),
    UnitCatalog::linear("force", force::units),
    UnitCatalog::linear("energy", energy::units),
    UnitCatalog::linear("electric", electric::units),
    UnitCatalog::linear("pressure", pressure::units),
    UnitCatalog::linear("frequency", frequency::units),
    UnitCatalog::linear("amount", amount::units),
    UnitCatalog::linear("luminous", luminous::units),
    UnitCatalog {
        name: "temperature",
        units: temperature::units,
        conversions: &[temperature::register_conversions],
    },
];

/// Find a catalog by name (case-insensitive)
pub fn find(name: &str) -> Option<&'static UnitCatalog> {
    CATALOGS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

pub mod length {
    use super::*;

    pub static METER: LazyLock<Unit> = LazyLock::new(|| Unit::base("meter", "m", Dimension::LENGTH));
    pub static MILLIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("millimeter", "mm", &METER.scale(0.001)));
    pub static CENTIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("centimeter", "cm", &METER.scale(0.01)));
    pub static DECIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("decimeter", "dm", &METER.scale(0.1)));
    pub static DECAMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("decameter", "dam", &METER.scale(10.0)));
    pub static HECTOMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("hectometer", "hm", &METER.scale(100.0)));
    pub static KILOMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilometer", "km", &METER.scale(1000.0)));

    pub static INCH: LazyLock<Unit> = LazyLock::new(|| Unit::alias("inch", "in", &METER.scale(0.0254)));
    pub static FOOT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("foot", "ft", &INCH.scale(12.0)));
    pub static YARD: LazyLock<Unit> = LazyLock::new(|| Unit::alias("yard", "yd", &INCH.scale(36.0)));
    pub static MILE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("mile", "mi", &FOOT.scale(5280.0)));
    pub static NAUTICAL_MILE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("nautical mile", "nmi", &METER.scale(1852.0)));

    pub static LIGHT_YEAR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("light-year", "ly", &METER.scale(9_460_730_472_580_800.0)));

    pub fn units() -> Vec<Unit> {
        vec![
            METER.clone(), MILLIMETER.clone(), CENTIMETER.clone(), DECIMETER.clone(),
            DECAMETER.clone(), HECTOMETER.clone(), KILOMETER.clone(),
            INCH.clone(), FOOT.clone(), YARD.clone(), MILE.clone(), NAUTICAL_MILE.clone(),
            LIGHT_YEAR.clone(),
        ]
    }
}

pub mod area {
    use super::*;
    use super::length::{CENTIMETER, KILOMETER, METER, MILLIMETER};

    pub static SQUARE_METER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("meter²", "m²", &METER.pow(2)));
    pub static SQUARE_MILLIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("millimeter²", "mm²", &MILLIMETER.pow(2)));
    pub static SQUARE_CENTIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("centimeter²", "cm²", &CENTIMETER.pow(2)));
    pub static SQUARE_KILOMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilometer²", "km²", &KILOMETER.pow(2)));

    pub static ARE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("are", "are", &SQUARE_METER.scale(100.0)));
    pub static HECTARE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("hectare", "ha", &SQUARE_METER.scale(10_000.0)));

    pub fn units() -> Vec<Unit> {
        vec![
            SQUARE_METER.clone(), SQUARE_MILLIMETER.clone(), SQUARE_CENTIMETER.clone(),
            SQUARE_KILOMETER.clone(), ARE.clone(), HECTARE.clone(),
        ]
    }
}

pub mod volume {
    use super::*;
    use super::length::{CENTIMETER, DECIMETER, METER, MILLIMETER};

    pub static CUBIC_METER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("meter³", "m³", &METER.pow(3)));
    pub static CUBIC_MILLIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("millimeter³", "mm³", &MILLIMETER.pow(3)));
    pub static CUBIC_CENTIMETER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("centimeter³", "cm³", &CENTIMETER.pow(3)));

    pub static LITER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("liter", "L", &DECIMETER.pow(3)));
    pub static MILLILITER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("milliliter", "mL", &LITER.scale(0.001)));
    pub static CENTILITER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("centiliter", "cL", &LITER.scale(0.01)));
    pub static DECILITER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("deciliter", "dL", &LITER.scale(0.1)));

    pub fn units() -> Vec<Unit> {
        vec![
            CUBIC_METER.clone(), CUBIC_MILLIMETER.clone(), CUBIC_CENTIMETER.clone(),
            LITER.clone(), MILLILITER.clone(), CENTILITER.clone(), DECILITER.clone(),
        ]
    }
}

pub mod time {
    use super::*;

    pub static SECOND: LazyLock<Unit> = LazyLock::new(|| Unit::base("second", "s", Dimension::TIME));
    pub static MICROSECOND: LazyLock<Unit> = LazyLock::new(|| Unit::alias("microsecond", "μs", &SECOND.scale(0.000_001)));
    pub static MILLISECOND: LazyLock<Unit> = LazyLock::new(|| Unit::alias("millisecond", "ms", &SECOND.scale(0.001)));
    pub static MINUTE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("minute", "min", &SECOND.scale(60.0)));
    pub static HOUR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("hour", "h", &SECOND.scale(3600.0)));
    pub static DAY: LazyLock<Unit> = LazyLock::new(|| Unit::alias("day", "d", &HOUR.scale(24.0)));

    pub fn units() -> Vec<Unit> {
        vec![
            SECOND.clone(), MICROSECOND.clone(), MILLISECOND.clone(),
            MINUTE.clone(), HOUR.clone(), DAY.clone(),
        ]
    }
}

pub mod speed {
    use super::*;
    use super::length::{KILOMETER, METER, MILE};
    use super::time::{HOUR, SECOND};

    pub static METER_PER_SECOND: LazyLock<Unit> = LazyLock::new(|| Unit::alias("meter/second", "m/s", &METER.divide(&SECOND)));
    pub static KILOMETER_PER_HOUR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilometer/hour", "km/h", &KILOMETER.divide(&HOUR)));
    pub static MILE_PER_HOUR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("mile/hour", "mi/h", &MILE.divide(&HOUR)));
    pub static KNOT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("knot", "kn", &KILOMETER_PER_HOUR.scale(1.852)));

    pub fn units() -> Vec<Unit> {
        vec![
            METER_PER_SECOND.clone(), KILOMETER_PER_HOUR.clone(),
            MILE_PER_HOUR.clone(), KNOT.clone(),
        ]
    }
}

pub mod mass {
    use super::*;

    pub static KILOGRAM: LazyLock<Unit> = LazyLock::new(|| Unit::base("kilogram", "kg", Dimension::MASS));
    pub static GRAM: LazyLock<Unit> = LazyLock::new(|| Unit::alias("gram", "g", &KILOGRAM.scale(0.001)));
    pub static MILLIGRAM: LazyLock<Unit> = LazyLock::new(|| Unit::alias("milligram", "mg", &GRAM.scale(0.001)));
    pub static TONNE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("tonne", "t", &KILOGRAM.scale(1000.0)));

    pub fn units() -> Vec<Unit> {
        vec![KILOGRAM.clone(), GRAM.clone(), MILLIGRAM.clone(), TONNE.clone()]
    }
}

pub mod force {
    use super::*;
    use super::length::METER;
    use super::mass::KILOGRAM;
    use super::time::SECOND;

    pub static NEWTON: LazyLock<Unit> = LazyLock::new(|| {
        Unit::alias("newton", "N", &METER.multiply(&KILOGRAM).multiply(&SECOND.pow(-2)))
    });

    pub fn units() -> Vec<Unit> {
        vec![NEWTON.clone()]
    }
}

pub mod energy {
    use super::*;
    use super::length::METER;
    use super::mass::KILOGRAM;
    use super::time::{HOUR, SECOND};

    pub static JOULE: LazyLock<Unit> = LazyLock::new(|| {
        Unit::alias("joule", "J", &METER.pow(2).multiply(&KILOGRAM).multiply(&SECOND.pow(-2)))
    });
    pub static KILOJOULE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilojoule", "kJ", &JOULE.scale(1e3)));
    pub static MEGAJOULE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("megajoule", "MJ", &JOULE.scale(1e6)));
    pub static GIGAJOULE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("gigajoule", "GJ", &JOULE.scale(1e9)));

    pub static WATT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("watt", "W", &JOULE.divide(&SECOND)));
    pub static KILOWATT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilowatt", "kW", &WATT.scale(1e3)));
    pub static MEGAWATT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("megawatt", "MW", &WATT.scale(1e6)));

    pub static WATT_SECOND: LazyLock<Unit> = LazyLock::new(|| Unit::alias("watt-second", "Ws", &WATT.multiply(&SECOND)));
    pub static WATT_HOUR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("watt-hour", "Wh", &WATT.multiply(&HOUR)));
    pub static KILOWATT_HOUR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilowatt-hour", "kWh", &WATT_HOUR.scale(1e3)));

    pub static CALORIE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("calorie", "cal", &JOULE.scale(4.1868)));
    pub static KILOCALORIE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilocalorie", "kcal", &CALORIE.scale(1e3)));

    pub static HORSEPOWER: LazyLock<Unit> = LazyLock::new(|| Unit::alias("horsepower", "hp", &KILOWATT.scale(0.735_498_75)));

    pub fn units() -> Vec<Unit> {
        vec![
            JOULE.clone(), KILOJOULE.clone(), MEGAJOULE.clone(), GIGAJOULE.clone(),
            WATT.clone(), KILOWATT.clone(), MEGAWATT.clone(),
            WATT_SECOND.clone(), WATT_HOUR.clone(), KILOWATT_HOUR.clone(),
            CALORIE.clone(), KILOCALORIE.clone(), HORSEPOWER.clone(),
        ]
    }
}

pub mod electric {
    use super::*;
    use super::energy::WATT;
    use super::time::SECOND;

    pub static AMPERE: LazyLock<Unit> = LazyLock::new(|| Unit::base("ampere", "A", Dimension::CURRENT));
    pub static COULOMB: LazyLock<Unit> = LazyLock::new(|| Unit::alias("coulomb", "C", &SECOND.multiply(&AMPERE)));
    pub static VOLT: LazyLock<Unit> = LazyLock::new(|| Unit::alias("volt", "V", &WATT.divide(&AMPERE)));
    pub static OHM: LazyLock<Unit> = LazyLock::new(|| Unit::alias("ohm", "Ω", &VOLT.divide(&AMPERE)));
    pub static FARAD: LazyLock<Unit> = LazyLock::new(|| Unit::alias("farad", "F", &COULOMB.divide(&VOLT)));

    pub fn units() -> Vec<Unit> {
        vec![AMPERE.clone(), COULOMB.clone(), VOLT.clone(), OHM.clone(), FARAD.clone()]
    }
}

pub mod pressure {
    use super::*;
    use super::force::NEWTON;
    use super::length::METER;

    pub static PASCAL: LazyLock<Unit> = LazyLock::new(|| Unit::alias("pascal", "Pa", &NEWTON.multiply(&METER.pow(-2))));
    pub static HECTOPASCAL: LazyLock<Unit> = LazyLock::new(|| Unit::alias("hectopascal", "hPa", &PASCAL.scale(100.0)));
    pub static KILOPASCAL: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilopascal", "kPa", &PASCAL.scale(1000.0)));
    pub static BAR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("bar", "bar", &PASCAL.scale(100_000.0)));
    pub static MILLIBAR: LazyLock<Unit> = LazyLock::new(|| Unit::alias("millibar", "mbar", &BAR.scale(0.001)));
    pub static ATMOSPHERE: LazyLock<Unit> = LazyLock::new(|| Unit::alias("atmosphere", "atm", &PASCAL.scale(101_325.0)));

    pub fn units() -> Vec<Unit> {
        vec![
            PASCAL.clone(), HECTOPASCAL.clone(), KILOPASCAL.clone(),
            BAR.clone(), MILLIBAR.clone(), ATMOSPHERE.clone(),
        ]
    }
}

pub mod frequency {
    use super::*;
    use super::time::{MINUTE, SECOND};

    pub static HERTZ: LazyLock<Unit> = LazyLock::new(|| Unit::alias("hertz", "Hz", &SECOND.pow(-1)));
    pub static KILOHERTZ: LazyLock<Unit> = LazyLock::new(|| Unit::alias("kilohertz", "kHz", &HERTZ.scale(1e3)));
    pub static MEGAHERTZ: LazyLock<Unit> = LazyLock::new(|| Unit::alias("megahertz", "MHz", &HERTZ.scale(1e6)));
    pub static RPM: LazyLock<Unit> = LazyLock::new(|| Unit::alias("revolutions per minute", "rpm", &MINUTE.pow(-1)));

    pub fn units() -> Vec<Unit> {
        vec![HERTZ.clone(), KILOHERTZ.clone(), MEGAHERTZ.clone(), RPM.clone()]
    }
}

pub mod amount {
    use super::*;

    pub static MOLE: LazyLock<Unit> = LazyLock::new(|| Unit::base("mole", "mol", Dimension::AMOUNT));

    pub fn units() -> Vec<Unit> {
        vec![MOLE.clone()]
    }
}

pub mod luminous {
    use super::*;

    pub static CANDELA: LazyLock<Unit> = LazyLock::new(|| Unit::base("candela", "cd", Dimension::LUMINOSITY));

    pub fn units() -> Vec<Unit> {
        vec![CANDELA.clone()]
    }
}

/// Celsius and Fahrenheit are affine to Kelvin, so each gets an opaque
/// dimension and converts only through the functions registered here.
pub mod temperature {
    use super::*;

    pub const KELVIN_OFFSET: f64 = 273.15;

    pub static KELVIN: LazyLock<Unit> = LazyLock::new(|| Unit::base("kelvin", "K", Dimension::TEMPERATURE));
    pub static DEGREE_CELSIUS: LazyLock<Unit> = LazyLock::new(|| {
        Unit::base("degree celsius", "°C", Dimension::opaque("celsius temperature"))
    });
    pub static DEGREE_FAHRENHEIT: LazyLock<Unit> = LazyLock::new(|| {
        Unit::base("degree fahrenheit", "°F", Dimension::opaque("fahrenheit temperature"))
    });

    pub fn units() -> Vec<Unit> {
        vec![KELVIN.clone(), DEGREE_CELSIUS.clone(), DEGREE_FAHRENHEIT.clone()]
    }

    pub fn register_conversions(registry: &ConversionRegistry) {
        registry.register_conversion(&DEGREE_CELSIUS, &DEGREE_FAHRENHEIT, |q, _| {
            Ok(Quantity::new(q.value * 9.0 / 5.0 + 32.0, DEGREE_FAHRENHEIT.clone()))
        });
        registry.register_conversion(&DEGREE_FAHRENHEIT, &DEGREE_CELSIUS, |q, _| {
            Ok(Quantity::new((q.value - 32.0) * 5.0 / 9.0, DEGREE_CELSIUS.clone()))
        });

        registry.register_conversion(&DEGREE_CELSIUS, &KELVIN, |q, _| {
            Ok(Quantity::new(q.value + KELVIN_OFFSET, KELVIN.clone()))
        });
        registry.register_conversion(&KELVIN, &DEGREE_CELSIUS, |q, _| {
            Ok(Quantity::new(q.value - KELVIN_OFFSET, DEGREE_CELSIUS.clone()))
        });

        registry.register_conversion(&DEGREE_FAHRENHEIT, &KELVIN, |q, r| {
            q.convert_to(&DEGREE_CELSIUS, r)?.convert_to(&KELVIN, r)
        });
        registry.register_conversion(&KELVIN, &DEGREE_FAHRENHEIT, |q, r| {
            q.convert_to(&DEGREE_CELSIUS, r)?.convert_to(&DEGREE_FAHRENHEIT, r)
        });
    }
}
