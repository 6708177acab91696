//! Arithmetic on possibly-absent quantities
//!
//! An absent operand of `+` or `-` counts as zero in the other operand's unit,
//! and `absent ± absent` stays absent. `*` and `/` have no neutral quantity, so
//! an absent operand there is rejected with `UnitError::Argument`.

use metra_core::UnitError;
use crate::{ConversionRegistry, Quantity};

pub fn add(
    left: Option<&Quantity>,
    right: Option<&Quantity>,
    registry: &ConversionRegistry,
) -> Result<Option<Quantity>, UnitError> {
    match (left, right) {
        (None, None) => Ok(None),
        (Some(l), None) => Ok(Some(l.clone())),
        (None, Some(r)) => Ok(Some(r.clone())),
        (Some(l), Some(r)) => l.add(r, registry).map(Some),
    }
}

pub fn sub(
    left: Option<&Quantity>,
    right: Option<&Quantity>,
    registry: &ConversionRegistry,
) -> Result<Option<Quantity>, UnitError> {
    match (left, right) {
        (None, None) => Ok(None),
        (Some(l), None) => Ok(Some(l.clone())),
        (None, Some(r)) => Ok(Some(Quantity::new(-r.value, r.unit.clone()))),
        (Some(l), Some(r)) => l.sub(r, registry).map(Some),
    }
}

pub fn mul(left: Option<&Quantity>, right: Option<&Quantity>) -> Result<Quantity, UnitError> {
    let (l, r) = require_both(left, right)?;
    Ok(l.mul(r))
}

pub fn div(left: Option<&Quantity>, right: Option<&Quantity>) -> Result<Quantity, UnitError> {
    let (l, r) = require_both(left, right)?;
    Ok(l.div(r))
}

fn require_both<'a>(
    left: Option<&'a Quantity>,
    right: Option<&'a Quantity>,
) -> Result<(&'a Quantity, &'a Quantity), UnitError> {
    let l = left.ok_or_else(|| UnitError::argument("left operand"))?;
    let r = right.ok_or_else(|| UnitError::argument("right operand"))?;
    Ok((l, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dimension, Unit};

    fn meter() -> Unit {
        Unit::base("meter", "m", Dimension::LENGTH)
    }

    #[test]
    fn test_add_absent_is_identity() {
        let registry = ConversionRegistry::new();
        let q = Quantity::new(5.0, meter());

        let right_absent = add(Some(&q), None, &registry).unwrap().unwrap();
        assert!(right_absent.equals(&q, &registry));
        assert_eq!(right_absent.unit, q.unit);

        let left_absent = add(None, Some(&q), &registry).unwrap().unwrap();
        assert_eq!(left_absent.value, 5.0);
        assert_eq!(left_absent.unit, q.unit);

        assert!(add(None, None, &registry).unwrap().is_none());
    }

    #[test]
    fn test_sub_absent() {
        let registry = ConversionRegistry::new();
        let q = Quantity::new(5.0, meter());

        assert_eq!(sub(Some(&q), None, &registry).unwrap().unwrap().value, 5.0);
        assert_eq!(sub(None, Some(&q), &registry).unwrap().unwrap().value, -5.0);
        assert!(sub(None, None, &registry).unwrap().is_none());
    }

    #[test]
    fn test_add_present_converts() {
        let registry = ConversionRegistry::new();
        let m = Quantity::new(1.0, meter());
        let cm = Quantity::new(50.0, Unit::new("centimeter", "cm", 0.01, Dimension::LENGTH));

        let sum = add(Some(&m), Some(&cm), &registry).unwrap().unwrap();
        assert!((sum.value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_add_incompatible_propagates() {
        let registry = ConversionRegistry::new();
        let m = Quantity::new(1.0, meter());
        let s = Quantity::new(1.0, Unit::base("second", "s", Dimension::TIME));

        assert!(matches!(add(Some(&m), Some(&s), &registry), Err(UnitError::Conversion { .. })));
    }

    #[test]
    fn test_mul_div_reject_absent() {
        let q = Quantity::new(2.0, meter());

        assert_eq!(mul(Some(&q), None).unwrap_err(), UnitError::argument("right operand"));
        assert_eq!(div(None, Some(&q)).unwrap_err(), UnitError::argument("left operand"));
        assert_eq!(mul(Some(&q), Some(&q)).unwrap().value, 4.0);
        assert_eq!(div(Some(&q), Some(&q)).unwrap().value, 1.0);
    }
}
