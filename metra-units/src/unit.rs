//! Unit representation with conversion factors

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use crate::Dimension;

static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a unit instance. Clones of a `Unit` share it; separately
/// constructed units never do, even when every field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u64);

impl UnitId {
    fn next() -> Self {
        UnitId(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
struct UnitInner {
    id: UnitId,
    name: String,
    symbol: String,
    factor: f64,
    dimension: Dimension,
}

/// A named unit: a linear factor relative to the base unit of its dimension.
///
/// `Unit` is a cheap shared handle. `==` compares instances; use
/// [`Unit::is_compatible_to`] to compare dimensions.
#[derive(Debug, Clone)]
pub struct Unit {
    inner: Arc<UnitInner>,
}

impl Unit {
    /// Create a scaled unit
    pub fn new(name: &str, symbol: &str, factor: f64, dimension: Dimension) -> Self {
        Unit {
            inner: Arc::new(UnitInner {
                id: UnitId::next(),
                name: name.to_string(),
                symbol: symbol.to_string(),
                factor,
                dimension,
            }),
        }
    }

    /// Create the base unit (factor 1) of a dimension
    pub fn base(name: &str, symbol: &str, dimension: Dimension) -> Self {
        Self::new(name, symbol, 1.0, dimension)
    }

    /// Give an existing (usually derived) unit its own name and symbol
    pub fn alias(name: &str, symbol: &str, unit: &Unit) -> Self {
        Self::new(name, symbol, unit.factor(), unit.dimension().clone())
    }

    pub fn id(&self) -> UnitId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn symbol(&self) -> &str {
        &self.inner.symbol
    }

    /// Multiplier relative to the base unit of the dimension
    pub fn factor(&self) -> f64 {
        self.inner.factor
    }

    pub fn dimension(&self) -> &Dimension {
        &self.inner.dimension
    }

    /// Check if this is a base unit
    pub fn is_base(&self) -> bool {
        self.inner.factor == 1.0
    }

    /// Check if two units are dimensionally compatible (convertible by factor alone)
    pub fn is_compatible_to(&self, other: &Unit) -> bool {
        self.inner.dimension == other.inner.dimension
    }

    /// Check if both handles point at the same unit instance
    pub fn same_instance(&self, other: &Unit) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Scale a unit (e.g., 1000 * m -> km)
    pub fn scale(&self, scalar: f64) -> Unit {
        Unit::new(
            &format!("({}·{})", scalar, self.name()),
            &format!("({}·{})", scalar, self.symbol()),
            scalar * self.factor(),
            self.dimension().clone(),
        )
    }

    /// Multiply two units (e.g., m * m -> m^2)
    pub fn multiply(&self, other: &Unit) -> Unit {
        Unit::new(
            &format!("({}·{})", self.name(), other.name()),
            &format!("({}·{})", self.symbol(), other.symbol()),
            self.factor() * other.factor(),
            self.dimension().multiply(other.dimension()),
        )
    }

    /// Divide two units (e.g., m / s -> m/s)
    pub fn divide(&self, other: &Unit) -> Unit {
        Unit::new(
            &format!("({}/{})", self.name(), other.name()),
            &format!("({}/{})", self.symbol(), other.symbol()),
            self.factor() / other.factor(),
            self.dimension().divide(other.dimension()),
        )
    }

    /// Divide a unit by a scalar, keeping its dimension
    pub fn divide_scalar(&self, scalar: f64) -> Unit {
        Unit::new(
            &format!("({}/{})", self.name(), scalar),
            &format!("({}/{})", self.symbol(), scalar),
            self.factor() / scalar,
            self.dimension().clone(),
        )
    }

    /// Divide a scalar by a unit (e.g., 1 / s -> Hz)
    pub fn scalar_divide(scalar: f64, unit: &Unit) -> Unit {
        Unit::new(
            &format!("({}/{})", scalar, unit.name()),
            &format!("({}/{})", scalar, unit.symbol()),
            scalar / unit.factor(),
            unit.dimension().invert(),
        )
    }

    /// The reciprocal unit, `1 / self`
    pub fn reciprocal(&self) -> Unit {
        Unit::scalar_divide(1.0, self)
    }

    /// Raise unit to a power (e.g., m^2, s^-1)
    pub fn pow(&self, exp: i32) -> Unit {
        // The first power is the unit itself, custom conversions included.
        if exp == 1 {
            return self.clone();
        }
        Unit::new(
            &format!("({}^{})", self.name(), exp),
            &format!("({}^{})", self.symbol(), exp),
            self.factor().powi(exp),
            self.dimension().pow(exp),
        )
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Unit", 4)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("symbol", self.symbol())?;
        state.serialize_field("factor", &self.factor())?;
        state.serialize_field("dimension", self.dimension())?;
        state.end()
    }
}

impl Mul<&Unit> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        self.multiply(rhs)
    }
}

impl Mul<f64> for &Unit {
    type Output = Unit;

    fn mul(self, rhs: f64) -> Unit {
        self.scale(rhs)
    }
}

impl Mul<&Unit> for f64 {
    type Output = Unit;

    fn mul(self, rhs: &Unit) -> Unit {
        rhs.scale(self)
    }
}

impl Div<&Unit> for &Unit {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        self.divide(rhs)
    }
}

impl Div<f64> for &Unit {
    type Output = Unit;

    fn div(self, rhs: f64) -> Unit {
        self.divide_scalar(rhs)
    }
}

impl Div<&Unit> for f64 {
    type Output = Unit;

    fn div(self, rhs: &Unit) -> Unit {
        Unit::scalar_divide(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        Unit::base("meter", "m", Dimension::LENGTH)
    }

    fn kilometer() -> Unit {
        Unit::alias("kilometer", "km", &meter().scale(1000.0))
    }

    fn second() -> Unit {
        Unit::base("second", "s", Dimension::TIME)
    }

    #[test]
    fn test_base_unit() {
        assert!(meter().is_base());
        assert!(!kilometer().is_base());
        assert_eq!(kilometer().factor(), 1000.0);
    }

    #[test]
    fn test_alias_inherits_factor_and_dimension() {
        let hour = Unit::new("hour", "h", 3600.0, Dimension::TIME);
        let stunde = Unit::alias("stunde", "std", &hour);
        assert_eq!(stunde.factor(), 3600.0);
        assert_eq!(stunde.dimension(), &Dimension::TIME);
        assert_eq!(stunde.symbol(), "std");
        assert_ne!(stunde, hour);
    }

    #[test]
    fn test_compatible_units() {
        let m = meter();
        let km = kilometer();
        let s = second();

        assert!(m.is_compatible_to(&km));
        assert!(!m.is_compatible_to(&s));
    }

    #[test]
    fn test_compatibility_ignores_identity() {
        let a = meter();
        let b = meter();
        assert_ne!(a, b);
        assert!(!a.same_instance(&b));
        assert!(a.is_compatible_to(&b));

        let c = a.clone();
        assert_eq!(a, c);
        assert!(a.same_instance(&c));
    }

    #[test]
    fn test_unit_pow() {
        let m = meter();
        let m2 = m.pow(2);

        assert_eq!(m2.symbol(), "(m^2)");
        assert_eq!(m2.dimension(), &Dimension::AREA);
        assert_eq!(m2.factor(), 1.0);

        let km2 = kilometer().pow(2);
        assert_eq!(km2.factor(), 1_000_000.0);
        assert_eq!(second().pow(-1).dimension(), &Dimension::FREQUENCY);
    }

    #[test]
    fn test_power_identity() {
        let km = kilometer();
        assert_eq!(km.pow(1).dimension(), km.dimension());
        assert!(km.pow(0).dimension().is_dimensionless());
    }

    #[test]
    fn test_opaque_power_identity() {
        let celsius = Unit::base("degree celsius", "°C", Dimension::opaque("celsius temperature"));
        let first = celsius.pow(1);
        assert!(first.same_instance(&celsius));
        assert!(first.is_compatible_to(&celsius));

        let squared = celsius.pow(2);
        assert!(!squared.is_compatible_to(&celsius));
        assert!((&squared / &celsius).is_compatible_to(&celsius));
    }

    #[test]
    fn test_opaque_dimension_closure() {
        let celsius = Unit::base("degree celsius", "°C", Dimension::opaque("celsius temperature"));
        let kelvin = Unit::base("kelvin", "K", Dimension::TEMPERATURE);
        let s = second();

        let back = &(&celsius * &s) / &s;
        assert!(back.is_compatible_to(&celsius));
        assert!(!back.is_compatible_to(&kelvin));
        assert_eq!(back.dimension().label(), Some("celsius temperature"));
    }

    #[test]
    fn test_unit_multiply() {
        let m = meter();
        let area = &m * &m;

        assert_eq!(area.dimension(), &Dimension::AREA);
        assert_eq!(area.symbol(), "(m·m)");
    }

    #[test]
    fn test_unit_divide() {
        let km = kilometer();
        let h = Unit::new("hour", "h", 3600.0, Dimension::TIME);
        let kmh = &km / &h;

        assert_eq!(kmh.dimension(), &Dimension::VELOCITY);
        assert!((kmh.factor() - 1000.0 / 3600.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_closure() {
        let km = kilometer();
        let s = second();
        let back = &(&km * &s) / &s;
        assert!(back.is_compatible_to(&km));
    }

    #[test]
    fn test_scalar_operators() {
        let m = meter();

        let mm = 0.001 * &m;
        assert_eq!(mm.factor(), 0.001);
        assert_eq!(mm.dimension(), &Dimension::LENGTH);
        assert_eq!((&m * 12.0).factor(), 12.0);

        let half = &m / 2.0;
        assert_eq!(half.factor(), 0.5);
        assert_eq!(half.dimension(), &Dimension::LENGTH);

        let hz = 1.0 / &second();
        assert_eq!(hz.dimension(), &Dimension::FREQUENCY);
        assert_eq!(hz.symbol(), "(1/s)");
    }

    #[test]
    fn test_reciprocal() {
        let minute = Unit::new("minute", "min", 60.0, Dimension::TIME);
        let rpm = minute.reciprocal();
        assert_eq!(rpm.dimension(), &Dimension::FREQUENCY);
        assert!((rpm.factor() - 1.0 / 60.0).abs() < 1e-15);
    }

    #[test]
    fn test_display_and_serialize() {
        let km = kilometer();
        assert_eq!(format!("{}", km), "km");

        let json = serde_json::to_value(&km).unwrap();
        assert_eq!(json["name"], "kilometer");
        assert_eq!(json["symbol"], "km");
        assert_eq!(json["factor"], 1000.0);
    }
}
