//! Quantity type - a value with an associated unit

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use serde::Serialize;
use metra_core::UnitError;
use crate::{ConversionRegistry, Dimension, Unit};

/// A physical quantity: a numeric value with an associated unit
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    /// The numeric value
    pub value: f64,
    /// The unit of measurement
    pub unit: Unit,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// Get the dimension of this quantity
    pub fn dimension(&self) -> &Dimension {
        self.unit.dimension()
    }

    /// Check if two quantities have compatible dimensions
    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.unit.is_compatible_to(&other.unit)
    }

    /// Convert to another unit
    pub fn convert_to(&self, target: &Unit, registry: &ConversionRegistry) -> Result<Quantity, UnitError> {
        registry.convert(self, target)
    }

    /// Compare two quantities in the left operand's unit, rounded to the
    /// registry's equality precision. Quantities with no conversion path
    /// between them are unequal.
    pub fn equals(&self, other: &Quantity, registry: &ConversionRegistry) -> bool {
        self.equals_with_precision(other, registry, registry.equality_precision())
    }

    pub fn equals_with_precision(&self, other: &Quantity, registry: &ConversionRegistry, digits: u32) -> bool {
        match other.convert_to(&self.unit, registry) {
            Ok(converted) => round_to(self.value, digits) == round_to(converted.value, digits),
            Err(_) => false,
        }
    }

    /// Add two quantities; the result is in this quantity's unit
    pub fn add(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<Quantity, UnitError> {
        let converted = other.convert_to(&self.unit, registry)?;
        Ok(Quantity::new(self.value + converted.value, self.unit.clone()))
    }

    /// Subtract two quantities; the result is in this quantity's unit
    pub fn sub(&self, other: &Quantity, registry: &ConversionRegistry) -> Result<Quantity, UnitError> {
        let converted = other.convert_to(&self.unit, registry)?;
        Ok(Quantity::new(self.value - converted.value, self.unit.clone()))
    }

    /// Multiply two quantities (dimensions are multiplied)
    pub fn mul(&self, other: &Quantity) -> Quantity {
        Quantity::new(self.value * other.value, self.unit.multiply(&other.unit))
    }

    /// Divide two quantities (dimensions are divided)
    pub fn div(&self, other: &Quantity) -> Quantity {
        Quantity::new(self.value / other.value, self.unit.divide(&other.unit))
    }

    /// Multiply the value by a scalar, keeping the unit
    pub fn scale(&self, scalar: f64) -> Quantity {
        Quantity::new(self.value * scalar, self.unit.clone())
    }

    /// Divide the value by a scalar, keeping the unit
    pub fn divide_scalar(&self, scalar: f64) -> Quantity {
        Quantity::new(self.value / scalar, self.unit.clone())
    }

    /// Divide a scalar by a quantity (e.g., 1 / 2 s -> 0.5 1/s)
    pub fn scalar_divide(scalar: f64, quantity: &Quantity) -> Quantity {
        Quantity::new(scalar / quantity.value, quantity.unit.reciprocal())
    }

    /// Shift the value by a raw amount in the same unit
    pub fn offset(&self, delta: f64) -> Quantity {
        Quantity::new(self.value + delta, self.unit.clone())
    }

    /// Raise quantity to an integer power
    pub fn pow(&self, exp: i32) -> Quantity {
        Quantity::new(self.value.powi(exp), self.unit.pow(exp))
    }
}

/// Round to a number of decimal digits. Values too large to scale are returned as is.
fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

impl Mul<&Quantity> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        Quantity::mul(self, rhs)
    }
}

impl Div<&Quantity> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::div(self, rhs)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Mul<&Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        rhs.scale(self)
    }
}

impl Div<f64> for &Quantity {
    type Output = Quantity;

    fn div(self, rhs: f64) -> Quantity {
        self.divide_scalar(rhs)
    }
}

impl Div<&Quantity> for f64 {
    type Output = Quantity;

    fn div(self, rhs: &Quantity) -> Quantity {
        Quantity::scalar_divide(self, rhs)
    }
}

impl Add<f64> for &Quantity {
    type Output = Quantity;

    fn add(self, rhs: f64) -> Quantity {
        self.offset(rhs)
    }
}

impl Sub<f64> for &Quantity {
    type Output = Quantity;

    fn sub(self, rhs: f64) -> Quantity {
        self.offset(-rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> Unit {
        Unit::base("meter", "m", Dimension::LENGTH)
    }

    fn kilometer() -> Unit {
        Unit::new("kilometer", "km", 1000.0, Dimension::LENGTH)
    }

    fn second() -> Unit {
        Unit::base("second", "s", Dimension::TIME)
    }

    fn kilogram() -> Unit {
        Unit::base("kilogram", "kg", Dimension::MASS)
    }

    #[test]
    fn test_quantity_creation() {
        let q = Quantity::new(5.0, meter());
        assert_eq!(q.value, 5.0);
        assert_eq!(q.unit.symbol(), "m");
        assert_eq!(q.dimension(), &Dimension::LENGTH);
    }

    #[test]
    fn test_convert_to() {
        let registry = ConversionRegistry::new();
        let q = Quantity::new(5000.0, meter());
        let converted = q.convert_to(&kilometer(), &registry).unwrap();
        assert_eq!(converted.value, 5.0);
        assert_eq!(converted.unit.symbol(), "km");
    }

    #[test]
    fn test_add() {
        let registry = ConversionRegistry::new();
        let q1 = Quantity::new(1.0, kilometer());
        let q2 = Quantity::new(500.0, meter());
        let sum = q1.add(&q2, &registry).unwrap();

        // 1 km + 500 m = 1.5 km
        assert_eq!(sum.value, 1.5);
        assert_eq!(sum.unit.symbol(), "km");
    }

    #[test]
    fn test_sub_uses_left_unit() {
        let registry = ConversionRegistry::new();
        let q1 = Quantity::new(2.0, meter());
        let q2 = Quantity::new(0.001, kilometer());
        let diff = q1.sub(&q2, &registry).unwrap();

        assert!((diff.value - 1.0).abs() < 1e-12);
        assert_eq!(diff.unit, q1.unit);
    }

    #[test]
    fn test_add_incompatible_fails_at_evaluation() {
        let registry = ConversionRegistry::new();
        let length = Quantity::new(1.0, meter());
        let mass = Quantity::new(1.0, kilogram());

        let err = length.add(&mass, &registry).unwrap_err();
        assert_eq!(err, UnitError::conversion("kilogram", "meter"));
    }

    #[test]
    fn test_mul() {
        let length = Quantity::new(5.0, meter());
        let width = Quantity::new(3.0, meter());
        let area = &length * &width;

        assert_eq!(area.value, 15.0);
        assert_eq!(area.dimension(), &Dimension::AREA);
    }

    #[test]
    fn test_div() {
        let distance = Quantity::new(100.0, meter());
        let time = Quantity::new(10.0, second());
        let velocity = &distance / &time;

        assert_eq!(velocity.value, 10.0);
        assert_eq!(velocity.dimension(), &Dimension::VELOCITY);
    }

    #[test]
    fn test_mul_incompatible_never_fails() {
        let q = &Quantity::new(2.0, meter()) * &Quantity::new(3.0, kilogram());
        assert_eq!(q.value, 6.0);
        assert_eq!(q.dimension(), &Dimension::new([1, 1, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_composite_reduction() {
        let registry = ConversionRegistry::new();
        let m = meter();
        let s = second();
        let mps = m.divide(&s);

        let distance = &Quantity::new(10.0, mps) * &Quantity::new(2.0, s);
        assert!(distance.unit.is_compatible_to(&m));
        assert!(distance.equals(&Quantity::new(20.0, m.clone()), &registry));
        assert!(Quantity::new(20.0, m).equals(&distance, &registry));
    }

    #[test]
    fn test_scalar_ops() {
        let q = Quantity::new(4.0, meter());

        assert_eq!((&q * 2.0).value, 8.0);
        assert_eq!((3.0 * &q).value, 12.0);
        assert_eq!((&q / 4.0).value, 1.0);
        assert_eq!((&q / 4.0).unit, q.unit);
        assert_eq!((&q + 1.0).value, 5.0);
        assert_eq!((&q - 1.0).value, 3.0);

        let inv = 2.0 / &Quantity::new(4.0, second());
        assert_eq!(inv.value, 0.5);
        assert_eq!(inv.dimension(), &Dimension::FREQUENCY);
    }

    #[test]
    fn test_pow() {
        let length = Quantity::new(5.0, meter());
        let volume = length.pow(3);

        assert_eq!(volume.value, 125.0);
        assert_eq!(volume.dimension(), &Dimension::VOLUME);
    }

    #[test]
    fn test_equality() {
        let registry = ConversionRegistry::new();
        let q1 = Quantity::new(1.0, kilometer());
        let q2 = Quantity::new(1000.0, meter());

        assert!(q1.equals(&q2, &registry));
        assert!(!q1.equals(&Quantity::new(1001.0, meter()), &registry));
    }

    #[test]
    fn test_equality_rounds_to_eight_digits() {
        let registry = ConversionRegistry::new();
        let q1 = Quantity::new(1.000000001, meter());
        let q2 = Quantity::new(1.0, meter());
        assert!(q1.equals(&q2, &registry));

        let q3 = Quantity::new(1.00000002, meter());
        assert!(!q3.equals(&q2, &registry));
        assert!(q3.equals_with_precision(&q2, &registry, 6));
    }

    #[test]
    fn test_equality_incompatible_is_false() {
        let registry = ConversionRegistry::new();
        let q1 = Quantity::new(1.0, meter());
        let q2 = Quantity::new(1.0, kilogram());
        assert!(!q1.equals(&q2, &registry));
    }

    #[test]
    fn test_display() {
        let q = Quantity::new(5.0, meter());
        assert_eq!(format!("{}", q), "5 m");
        assert_eq!(format!("{}", Quantity::new(2.5, kilometer())), "2.5 km");
    }
}
