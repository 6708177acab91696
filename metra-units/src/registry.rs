//! Conversion registry - the catalog of known units and custom conversions
//!
//! Conversion priority:
//! 1. same unit instance: returned unchanged
//! 2. equal dimensions: `value * source_factor / target_factor`
//! 3. a function registered for the ordered (source, target) pair
//! 4. otherwise `UnitError::Conversion`

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use metra_core::{Settings, UnitError, DEFAULT_EQUALITY_PRECISION};
use crate::unit::UnitId;
use crate::{Dimension, Quantity, Unit};

/// Custom conversion for units that are not related by a factor (e.g. Celsius -> Fahrenheit).
/// Receives the registry so it can chain through intermediate units.
pub type ConversionFn =
    Arc<dyn Fn(&Quantity, &ConversionRegistry) -> Result<Quantity, UnitError> + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    units: Vec<Unit>,
    ids: HashSet<UnitId>,
    by_dimension: HashMap<Dimension, Vec<Unit>>,
    by_name: HashMap<String, Unit>,
    by_symbol: HashMap<String, Unit>,
    conversions: HashMap<(UnitId, UnitId), ConversionFn>,
}

/// Registry of units and custom conversion functions.
///
/// Append-only. Populate it once at startup, then share it by reference;
/// lookups and conversions only take the read lock.
pub struct ConversionRegistry {
    state: RwLock<RegistryState>,
    equality_precision: u32,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        ConversionRegistry {
            state: RwLock::new(RegistryState::default()),
            equality_precision: DEFAULT_EQUALITY_PRECISION,
        }
    }

    /// Create an empty registry using the equality precision from settings
    pub fn with_settings(settings: &Settings) -> Self {
        ConversionRegistry {
            state: RwLock::new(RegistryState::default()),
            equality_precision: settings.equality_precision,
        }
    }

    /// Decimal digits compared by `Quantity::equals`
    pub fn equality_precision(&self) -> u32 {
        self.equality_precision
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a unit. Registering the same instance again is a no-op.
    ///
    /// Returns `true` if the unit was newly added. A later unit with an
    /// existing name or symbol replaces the earlier one in that index.
    pub fn register(&self, unit: &Unit) -> bool {
        let mut state = self.write();

        if !state.ids.insert(unit.id()) {
            return false;
        }

        state.units.push(unit.clone());
        state
            .by_dimension
            .entry(unit.dimension().clone())
            .or_default()
            .push(unit.clone());

        if let Some(previous) = state.by_name.insert(unit.name().to_string(), unit.clone()) {
            tracing::debug!("unit name '{}' now refers to a new definition (was {})", unit.name(), previous.symbol());
        }
        if let Some(previous) = state.by_symbol.insert(unit.symbol().to_string(), unit.clone()) {
            tracing::debug!("unit symbol '{}' now refers to {} (was {})", unit.symbol(), unit.name(), previous.name());
        }

        tracing::debug!("registered unit {} ({}) [{}]", unit.name(), unit.symbol(), unit.dimension());
        true
    }

    /// Register a conversion for the ordered pair `from -> to`, replacing any
    /// previous one. The reverse direction must be registered separately.
    pub fn register_conversion<F>(&self, from: &Unit, to: &Unit, conversion: F)
    where
        F: Fn(&Quantity, &ConversionRegistry) -> Result<Quantity, UnitError> + Send + Sync + 'static,
    {
        let mut state = self.write();
        let replaced = state
            .conversions
            .insert((from.id(), to.id()), Arc::new(conversion))
            .is_some();

        tracing::debug!(
            "registered conversion {} -> {}{}",
            from.symbol(),
            to.symbol(),
            if replaced { " (replaced)" } else { "" }
        );
    }

    /// The custom conversion registered for `from -> to`, if any
    pub fn conversion(&self, from: &Unit, to: &Unit) -> Option<ConversionFn> {
        self.read().conversions.get(&(from.id(), to.id())).cloned()
    }

    /// Convert a quantity into the target unit
    pub fn convert(&self, quantity: &Quantity, to: &Unit) -> Result<Quantity, UnitError> {
        let from = &quantity.unit;

        if from.same_instance(to) {
            return Ok(quantity.clone());
        }

        if from.is_compatible_to(to) {
            tracing::trace!("linear conversion {} -> {}", from.symbol(), to.symbol());
            let value = quantity.value * from.factor() / to.factor();
            return Ok(Quantity::new(value, to.clone()));
        }

        // The read guard is released here, so the function may convert recursively.
        match self.conversion(from, to) {
            Some(conversion) => {
                tracing::trace!("custom conversion {} -> {}", from.symbol(), to.symbol());
                conversion(quantity, self)
            }
            None => {
                tracing::trace!("no conversion path {} -> {}", from.symbol(), to.symbol());
                Err(UnitError::conversion(from.name(), to.name()))
            }
        }
    }

    /// Check if the registry holds this unit instance
    pub fn contains(&self, unit: &Unit) -> bool {
        self.read().ids.contains(&unit.id())
    }

    pub fn by_name(&self, name: &str) -> Option<Unit> {
        self.read().by_name.get(name).cloned()
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<Unit> {
        self.read().by_symbol.get(symbol).cloned()
    }

    /// Look up a unit by exact symbol, falling back to exact name
    pub fn lookup(&self, key: &str) -> Option<Unit> {
        let state = self.read();
        state
            .by_symbol
            .get(key)
            .or_else(|| state.by_name.get(key))
            .cloned()
    }

    /// All registered units sharing a dimension, in registration order
    pub fn units_of(&self, dimension: &Dimension) -> Vec<Unit> {
        self.read()
            .by_dimension
            .get(dimension)
            .cloned()
            .unwrap_or_default()
    }

    /// All registered units, in registration order
    pub fn units(&self) -> Vec<Unit> {
        self.read().units.clone()
    }

    pub fn len(&self) -> usize {
        self.read().units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().units.is_empty()
    }

    pub fn conversion_count(&self) -> usize {
        self.read().conversions.len()
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("ConversionRegistry")
            .field("units", &state.units.len())
            .field("dimensions", &state.by_dimension.len())
            .field("conversions", &state.conversions.len())
            .field("equality_precision", &self.equality_precision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn meter() -> Unit {
        Unit::base("meter", "m", Dimension::LENGTH)
    }

    #[test]
    fn test_register_is_idempotent_by_instance() {
        let registry = ConversionRegistry::new();
        let m = meter();

        assert!(registry.register(&m));
        assert!(!registry.register(&m));
        assert!(!registry.register(&m.clone()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.units_of(&Dimension::LENGTH).len(), 1);
        assert_eq!(registry.by_name("meter"), Some(m.clone()));
        assert_eq!(registry.by_symbol("m"), Some(m));
    }

    #[test]
    fn test_register_distinct_instance_with_same_name() {
        let registry = ConversionRegistry::new();
        let first = meter();
        let second = meter();

        registry.register(&first);
        registry.register(&second);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.units_of(&Dimension::LENGTH).len(), 2);
        assert_eq!(registry.by_name("meter"), Some(second.clone()));
        assert_eq!(registry.by_symbol("m"), Some(second));
        assert!(registry.contains(&first));
    }

    #[test]
    fn test_lookup_prefers_symbol() {
        let registry = ConversionRegistry::new();
        let m = meter();
        let minute = Unit::new("m", "min", 60.0, Dimension::TIME);
        registry.register(&m);
        registry.register(&minute);

        assert_eq!(registry.lookup("m"), Some(m));
        assert_eq!(registry.lookup("min"), Some(minute));
        assert_eq!(registry.lookup("meter").map(|u| u.symbol().to_string()), Some("m".to_string()));
        assert_eq!(registry.lookup("parsec"), None);
    }

    #[test]
    fn test_same_instance_fast_path() {
        let registry = ConversionRegistry::new();
        let m = meter();
        let q = Quantity::new(3.0, m.clone());
        let out = registry.convert(&q, &m).unwrap();
        assert_eq!(out.value, 3.0);
        assert_eq!(out.unit, m);
    }

    #[test]
    fn test_linear_conversion_needs_no_registration() {
        let registry = ConversionRegistry::new();
        let inch = Unit::new("inch", "in", 0.0254, Dimension::LENGTH);
        let foot = Unit::alias("foot", "ft", &inch.scale(12.0));

        let q = registry.convert(&Quantity::new(3.0, foot), &inch).unwrap();
        assert!((q.value - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_path_ignores_custom_functions() {
        let registry = ConversionRegistry::new();
        let m = meter();
        let km = Unit::new("kilometer", "km", 1000.0, Dimension::LENGTH);
        registry.register_conversion(&m, &km, |q, _| Ok(Quantity::new(q.value * 42.0, q.unit.clone())));

        let q = registry.convert(&Quantity::new(500.0, m), &km).unwrap();
        assert_eq!(q.value, 0.5);
    }

    #[test]
    fn test_custom_conversion_is_directional() {
        let registry = ConversionRegistry::new();
        let a = Unit::base("a", "a", Dimension::opaque("scale a"));
        let b = Unit::base("b", "b", Dimension::opaque("scale b"));
        let target = b.clone();
        registry.register_conversion(&a, &b, move |q, _| Ok(Quantity::new(q.value + 1.0, target.clone())));

        assert!(registry.conversion(&a, &b).is_some());
        assert!(registry.conversion(&b, &a).is_none());

        let out = registry.convert(&Quantity::new(1.0, a.clone()), &b).unwrap();
        assert_eq!(out.value, 2.0);
        assert_eq!(out.unit, b);

        let err = registry.convert(&Quantity::new(1.0, b), &a).unwrap_err();
        assert_eq!(err, UnitError::conversion("b", "a"));
    }

    #[test]
    fn test_register_conversion_overwrites() {
        let registry = ConversionRegistry::new();
        let a = Unit::base("a", "a", Dimension::opaque("scale a"));
        let b = Unit::base("b", "b", Dimension::opaque("scale b"));
        let (b1, b2) = (b.clone(), b.clone());
        registry.register_conversion(&a, &b, move |q, _| Ok(Quantity::new(q.value, b1.clone())));
        registry.register_conversion(&a, &b, move |q, _| Ok(Quantity::new(q.value * 2.0, b2.clone())));

        assert_eq!(registry.conversion_count(), 1);
        let out = registry.convert(&Quantity::new(3.0, a), &b).unwrap();
        assert_eq!(out.value, 6.0);
    }

    #[test]
    fn test_incompatible_conversion_names_both_units() {
        let registry = ConversionRegistry::new();
        let m = meter();
        let kg = Unit::base("kilogram", "kg", Dimension::MASS);

        let err = registry.convert(&Quantity::new(1.0, m), &kg).unwrap_err();
        match err {
            UnitError::Conversion { from, to } => {
                assert_eq!(from, "meter");
                assert_eq!(to, "kilogram");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_chained_conversion_reenters_registry() {
        let registry = ConversionRegistry::new();
        let a = Unit::base("a", "a", Dimension::opaque("scale a"));
        let b = Unit::base("b", "b", Dimension::opaque("scale b"));
        let c = Unit::base("c", "c", Dimension::opaque("scale c"));

        let b_target = b.clone();
        registry.register_conversion(&a, &b, move |q, _| Ok(Quantity::new(q.value * 2.0, b_target.clone())));
        let c_target = c.clone();
        registry.register_conversion(&b, &c, move |q, _| Ok(Quantity::new(q.value + 1.0, c_target.clone())));
        let (via, to) = (b.clone(), c.clone());
        registry.register_conversion(&a, &c, move |q, r| q.convert_to(&via, r)?.convert_to(&to, r));

        let out = registry.convert(&Quantity::new(5.0, a), &c).unwrap();
        assert_eq!(out.value, 11.0);
        assert_eq!(out.unit, c);
    }

    #[test]
    fn test_with_settings_precision() {
        let settings = Settings::new().with_equality_precision(3).unwrap();
        let registry = ConversionRegistry::with_settings(&settings);
        assert_eq!(registry.equality_precision(), 3);

        let m = meter();
        assert!(Quantity::new(1.0001, m.clone()).equals(&Quantity::new(1.0, m), &registry));
    }

    #[test]
    fn test_concurrent_reads_after_registration() {
        let registry = Arc::new(ConversionRegistry::new());
        let m = meter();
        let km = Unit::new("kilometer", "km", 1000.0, Dimension::LENGTH);
        registry.register(&m);
        registry.register(&km);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let (m, km) = (m.clone(), km.clone());
                thread::spawn(move || {
                    let q = Quantity::new(1000.0 * i as f64, m);
                    registry.convert(&q, &km).map(|q| q.value)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), Ok(i as f64));
        }
    }

    #[test]
    fn test_debug_shows_counts() {
        let registry = ConversionRegistry::new();
        registry.register(&meter());
        let text = format!("{:?}", registry);
        assert!(text.contains("units: 1"));
    }
}
