//! Registry bootstrap from the reference catalogs

use std::collections::HashSet;
use metra_core::{Settings, UnitError};
use crate::catalog::{self, UnitCatalog, CATALOGS};
use crate::ConversionRegistry;

/// What a bootstrap run loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub catalogs: Vec<&'static str>,
    pub units: usize,
    pub conversion_setups: usize,
}

/// Register every unit of every catalog, then run each catalog's conversion
/// setups. A catalog listed twice is loaded once.
pub fn bootstrap(registry: &ConversionRegistry, catalogs: &[&UnitCatalog]) -> BootstrapReport {
    let mut report = BootstrapReport::default();
    let mut seen = HashSet::new();

    let catalogs: Vec<&UnitCatalog> = catalogs
        .iter()
        .copied()
        .filter(|c| seen.insert(c.name))
        .collect();

    for catalog in &catalogs {
        let mut added = 0;
        for unit in (catalog.units)() {
            if registry.register(&unit) {
                added += 1;
            }
        }
        tracing::debug!("catalog '{}': {} units", catalog.name, added);
        report.units += added;
        report.catalogs.push(catalog.name);
    }

    // Conversion setups may reference units from any catalog, so they run last.
    for catalog in &catalogs {
        for setup in catalog.conversions {
            setup(registry);
            report.conversion_setups += 1;
        }
    }

    tracing::info!(
        "bootstrapped {} catalogs: {} units, {} conversion setups",
        report.catalogs.len(),
        report.units,
        report.conversion_setups
    );
    report
}

/// A registry loaded with every reference catalog
pub fn standard_registry() -> ConversionRegistry {
    let registry = ConversionRegistry::new();
    let all: Vec<&UnitCatalog> = CATALOGS.iter().collect();
    bootstrap(&registry, &all);
    registry
}

/// A registry loaded with the catalogs named in settings
pub fn registry_from_settings(settings: &Settings) -> Result<ConversionRegistry, UnitError> {
    let selected: Vec<&UnitCatalog> = match &settings.catalogs {
        None => CATALOGS.iter().collect(),
        Some(names) => names
            .iter()
            .map(|name| {
                catalog::find(name).ok_or_else(|| {
                    UnitError::Configuration(format!("unknown unit catalog '{}'", name))
                })
            })
            .collect::<Result<_, _>>()?,
    };

    let registry = ConversionRegistry::with_settings(settings);
    bootstrap(&registry, &selected);
    Ok(registry)
}
