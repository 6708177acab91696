//! Metra Core - Fundamental types
//!
//! This crate provides the types shared across Metra:
//! - `UnitError`: errors raised by the unit engine
//! - `MetraError`: structured errors for clients
//! - `Settings`: runtime configuration

mod config;
mod error;

pub use config::{Settings, DEFAULT_EQUALITY_PRECISION};
pub use error::{codes, MetraError, UnitError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{MetraError, Settings, UnitError};
}
