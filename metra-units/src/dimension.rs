//! Dimensional analysis types
//!
//! Each physical quantity has dimensions represented as a 7-element vector:
//! [length, mass, time, current, temperature, amount, luminosity]
//!
//! Affine scales (Celsius, Fahrenheit) cannot share Kelvin's vector without
//! becoming convertible by factor alone, so they carry opaque factors on top of
//! the vector: a label with its own exponent, combined like any base dimension.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Serialize, Deserialize};
use metra_core::UnitError;

/// Number of SI base dimensions
pub const BASE_DIMENSIONS: usize = 7;

/// An opaque scale and its exponent
type OpaqueFactor = (Cow<'static, str>, i32);

const fn base(exponents: [i32; BASE_DIMENSIONS], label: &'static str) -> Dimension {
    Dimension {
        exponents,
        label: Some(Cow::Borrowed(label)),
        opaque: Vec::new(),
    }
}

const fn derived(exponents: [i32; BASE_DIMENSIONS]) -> Dimension {
    Dimension {
        exponents,
        label: None,
        opaque: Vec::new(),
    }
}

/// Represents the dimensions of a physical quantity
/// as exponents of the 7 SI base dimensions, plus any opaque factors.
///
/// Equality compares exponents and opaque factors; the display label never counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimension {
    exponents: [i32; BASE_DIMENSIONS],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Cow<'static, str>>,
    /// Sorted by label, never holds a zero exponent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    opaque: Vec<OpaqueFactor>,
}

impl Dimension {
    /// Dimensionless quantity (all exponents zero)
    pub const DIMENSIONLESS: Dimension = derived([0, 0, 0, 0, 0, 0, 0]);

    /// Length dimension [L]
    pub const LENGTH: Dimension = base([1, 0, 0, 0, 0, 0, 0], "metre");

    /// Mass dimension [M]
    pub const MASS: Dimension = base([0, 1, 0, 0, 0, 0, 0], "kilogram");

    /// Time dimension [T]
    pub const TIME: Dimension = base([0, 0, 1, 0, 0, 0, 0], "second");

    /// Electric current dimension [I]
    pub const CURRENT: Dimension = base([0, 0, 0, 1, 0, 0, 0], "ampere");

    /// Thermodynamic temperature dimension [Θ]
    pub const TEMPERATURE: Dimension = base([0, 0, 0, 0, 1, 0, 0], "kelvin");

    /// Amount of substance dimension [N]
    pub const AMOUNT: Dimension = base([0, 0, 0, 0, 0, 1, 0], "mole");

    /// Luminous intensity dimension [J]
    pub const LUMINOSITY: Dimension = base([0, 0, 0, 0, 0, 0, 1], "candela");

    pub const VELOCITY: Dimension = derived([1, 0, -1, 0, 0, 0, 0]);
    pub const ACCELERATION: Dimension = derived([1, 0, -2, 0, 0, 0, 0]);
    pub const FORCE: Dimension = derived([1, 1, -2, 0, 0, 0, 0]);
    pub const ENERGY: Dimension = derived([2, 1, -2, 0, 0, 0, 0]);
    pub const POWER: Dimension = derived([2, 1, -3, 0, 0, 0, 0]);
    pub const PRESSURE: Dimension = derived([-1, 1, -2, 0, 0, 0, 0]);
    pub const AREA: Dimension = derived([2, 0, 0, 0, 0, 0, 0]);
    pub const VOLUME: Dimension = derived([3, 0, 0, 0, 0, 0, 0]);
    pub const FREQUENCY: Dimension = derived([0, 0, -1, 0, 0, 0, 0]);
    pub const CHARGE: Dimension = derived([0, 0, 1, 1, 0, 0, 0]);
    pub const VOLTAGE: Dimension = derived([2, 1, -3, -1, 0, 0, 0]);
    pub const RESISTANCE: Dimension = derived([2, 1, -3, -2, 0, 0, 0]);
    pub const CAPACITANCE: Dimension = derived([-2, -1, 4, 2, 0, 0, 0]);

    /// Create a new dimension from exponents
    pub fn new(exponents: [i32; BASE_DIMENSIONS]) -> Self {
        derived(exponents)
    }

    /// Create a dimension from a raw exponent list, which must have exactly 7 entries
    pub fn from_slice(exponents: &[i32]) -> Result<Self, UnitError> {
        let exponents: [i32; BASE_DIMENSIONS] = exponents.try_into().map_err(|_| {
            UnitError::Configuration(format!(
                "a dimension must have {} exponents, got {}",
                BASE_DIMENSIONS,
                exponents.len()
            ))
        })?;
        Ok(Self::new(exponents))
    }

    /// Create a dimension made of a single opaque factor. It is compatible only
    /// with dimensions carrying the same factors.
    pub fn opaque(label: impl Into<Cow<'static, str>>) -> Self {
        let label = label.into();
        Dimension {
            exponents: [0; BASE_DIMENSIONS],
            label: Some(label.clone()),
            opaque: vec![(label, 1)],
        }
    }

    /// Attach a display label
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn exponents(&self) -> &[i32; BASE_DIMENSIONS] {
        &self.exponents
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_opaque(&self) -> bool {
        !self.opaque.is_empty()
    }

    /// Check if this is a dimensionless quantity
    pub fn is_dimensionless(&self) -> bool {
        !self.is_opaque() && self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents)
    pub fn multiply(&self, other: &Dimension) -> Dimension {
        let mut result = [0i32; BASE_DIMENSIONS];
        for i in 0..BASE_DIMENSIONS {
            result[i] = self.exponents[i] + other.exponents[i];
        }
        let opaque = merge_opaque(&self.opaque, &other.opaque, 1);
        self.combine(other, result, opaque, "·")
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Dimension {
        let mut result = [0i32; BASE_DIMENSIONS];
        for i in 0..BASE_DIMENSIONS {
            result[i] = self.exponents[i] - other.exponents[i];
        }
        let opaque = merge_opaque(&self.opaque, &other.opaque, -1);
        self.combine(other, result, opaque, "/")
    }

    /// Raise to integer power (multiply exponents)
    pub fn pow(&self, exp: i32) -> Dimension {
        match exp {
            0 => return Self::DIMENSIONLESS,
            1 => return self.clone(),
            _ => {}
        }

        let mut result = [0i32; BASE_DIMENSIONS];
        for i in 0..BASE_DIMENSIONS {
            result[i] = self.exponents[i] * exp;
        }

        Dimension {
            exponents: result,
            label: self.label.as_ref().map(|l| Cow::Owned(format!("{}^{}", l, exp))),
            opaque: self.opaque.iter().map(|(l, e)| (l.clone(), e * exp)).collect(),
        }
    }

    /// Invert dimensions (negate exponents)
    pub fn invert(&self) -> Dimension {
        self.pow(-1)
    }

    /// Label for a product or quotient. Opaque results always get one; a result
    /// that cancels down to a single opaque factor takes that factor's label back.
    fn combine(
        &self,
        other: &Dimension,
        exponents: [i32; BASE_DIMENSIONS],
        opaque: Vec<OpaqueFactor>,
        op: &str,
    ) -> Dimension {
        let label = match (&self.label, &other.label) {
            _ if exponents.iter().all(|&e| e == 0) && matches!(opaque.as_slice(), [(_, 1)]) => {
                Some(opaque[0].0.clone())
            }
            (Some(a), Some(b)) => Some(Cow::Owned(format!("{}{}{}", a, op, b))),
            _ if !opaque.is_empty() => Some(Cow::Owned(format!("{}{}{}", self, op, other))),
            _ => None,
        };

        Dimension { exponents, label, opaque }
    }

    /// Get the dimension name if it matches a common dimension
    pub fn name(&self) -> Option<&'static str> {
        if self.is_opaque() {
            return None;
        }
        match self.exponents {
            [0, 0, 0, 0, 0, 0, 0] => Some("dimensionless"),
            [1, 0, 0, 0, 0, 0, 0] => Some("length"),
            [0, 1, 0, 0, 0, 0, 0] => Some("mass"),
            [0, 0, 1, 0, 0, 0, 0] => Some("time"),
            [0, 0, 0, 1, 0, 0, 0] => Some("current"),
            [0, 0, 0, 0, 1, 0, 0] => Some("temperature"),
            [0, 0, 0, 0, 0, 1, 0] => Some("amount"),
            [0, 0, 0, 0, 0, 0, 1] => Some("luminosity"),
            [1, 0, -1, 0, 0, 0, 0] => Some("velocity"),
            [1, 0, -2, 0, 0, 0, 0] => Some("acceleration"),
            [1, 1, -2, 0, 0, 0, 0] => Some("force"),
            [2, 1, -2, 0, 0, 0, 0] => Some("energy"),
            [2, 1, -3, 0, 0, 0, 0] => Some("power"),
            [-1, 1, -2, 0, 0, 0, 0] => Some("pressure"),
            [2, 0, 0, 0, 0, 0, 0] => Some("area"),
            [3, 0, 0, 0, 0, 0, 0] => Some("volume"),
            [0, 0, -1, 0, 0, 0, 0] => Some("frequency"),
            [0, 0, 1, 1, 0, 0, 0] => Some("charge"),
            [2, 1, -3, -1, 0, 0, 0] => Some("voltage"),
            [2, 1, -3, -2, 0, 0, 0] => Some("resistance"),
            [-2, -1, 4, 2, 0, 0, 0] => Some("capacitance"),
            _ => None,
        }
    }

    /// Look up a well-known dimension by the name `name()` returns
    pub fn from_name(name: &str) -> Option<Dimension> {
        let dim = match name.trim().to_lowercase().as_str() {
            "dimensionless" => Self::DIMENSIONLESS,
            "length" => Self::LENGTH,
            "mass" => Self::MASS,
            "time" => Self::TIME,
            "current" => Self::CURRENT,
            "temperature" => Self::TEMPERATURE,
            "amount" => Self::AMOUNT,
            "luminosity" => Self::LUMINOSITY,
            "velocity" | "speed" => Self::VELOCITY,
            "acceleration" => Self::ACCELERATION,
            "force" => Self::FORCE,
            "energy" => Self::ENERGY,
            "power" => Self::POWER,
            "pressure" => Self::PRESSURE,
            "area" => Self::AREA,
            "volume" => Self::VOLUME,
            "frequency" => Self::FREQUENCY,
            "charge" => Self::CHARGE,
            "voltage" => Self::VOLTAGE,
            "resistance" => Self::RESISTANCE,
            "capacitance" => Self::CAPACITANCE,
            _ => return None,
        };
        Some(dim)
    }
}

/// Add (`sign` 1) or subtract (`sign` -1) opaque exponents, dropping factors that cancel
fn merge_opaque(left: &[OpaqueFactor], right: &[OpaqueFactor], sign: i32) -> Vec<OpaqueFactor> {
    let mut factors = left.to_vec();
    for (label, exp) in right {
        match factors.iter_mut().find(|(l, _)| l == label) {
            Some(factor) => factor.1 += sign * exp,
            None => factors.push((label.clone(), sign * exp)),
        }
    }
    factors.retain(|(_, e)| *e != 0);
    factors.sort_by(|a, b| a.0.cmp(&b.0));
    factors
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.exponents == other.exponents && self.opaque == other.opaque
    }
}

impl Eq for Dimension {}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.exponents.hash(state);
        self.opaque.hash(state);
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = ["L", "M", "T", "I", "Θ", "N", "J"];
        let mut parts = Vec::new();

        for (label, exp) in &self.opaque {
            if *exp == 1 {
                parts.push(label.to_string());
            } else {
                parts.push(format!("{}^{}", label, exp));
            }
        }

        for (i, &exp) in self.exponents.iter().enumerate() {
            if exp != 0 {
                if exp == 1 {
                    parts.push(names[i].to_string());
                } else {
                    parts.push(format!("{}^{}", names[i], exp));
                }
            }
        }

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}
