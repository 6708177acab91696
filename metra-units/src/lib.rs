//! Metra Units - Physical Quantity and Unit Conversion
//!
//! Provides unit-aware quantities with dimensional analysis.
//! Units convert linearly when their dimensions match; affine scales such as
//! Celsius and Fahrenheit convert through functions held by the registry.
//!
//! Catalogs:
//! - Length (m, km, in, ft, mi, etc.)
//! - Area (m², ha, etc.)
//! - Volume (m³, L, mL, etc.)
//! - Time (s, min, h, d, etc.)
//! - Speed (m/s, km/h, kn, etc.)
//! - Mass (kg, g, t, etc.)
//! - Force (N)
//! - Energy and power (J, kWh, cal, W, hp, etc.)
//! - Electric (A, C, V, Ω, F)
//! - Pressure (Pa, bar, atm, etc.)
//! - Frequency (Hz, rpm, etc.)
//! - Amount (mol)
//! - Luminous intensity (cd)
//! - Temperature (K, °C, °F)

mod dimension;
mod unit;
mod quantity;
mod registry;
mod bootstrap;
pub mod catalog;
pub mod optional;

pub use dimension::Dimension;
pub use unit::{Unit, UnitId};
pub use quantity::Quantity;
pub use registry::{ConversionFn, ConversionRegistry};
pub use bootstrap::{bootstrap, registry_from_settings, standard_registry, BootstrapReport};
pub use catalog::{UnitCatalog, CATALOGS};
pub use metra_core::UnitError;
