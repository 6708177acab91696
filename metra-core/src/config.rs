//! Runtime settings
//!
//! Read from the environment:
//! - `METRA_LOG`: default log filter (`RUST_LOG` still wins when set)
//! - `METRA_CATALOGS`: comma-separated catalog names to load, all when unset
//! - `METRA_EQUALITY_PRECISION`: decimal digits compared by quantity equality

use crate::UnitError;
use serde::{Deserialize, Serialize};
use std::env;

/// Decimal digits compared when testing two quantities for equality
pub const DEFAULT_EQUALITY_PRECISION: u32 = 8;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings shared by the library and the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Catalog names to bootstrap; `None` loads every catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalogs: Option<Vec<String>>,

    #[serde(default = "default_equality_precision")]
    pub equality_precision: u32,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_equality_precision() -> u32 {
    DEFAULT_EQUALITY_PRECISION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            catalogs: None,
            equality_precision: DEFAULT_EQUALITY_PRECISION,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from process environment variables
    pub fn from_env() -> Result<Self, UnitError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UnitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(level) = lookup("METRA_LOG") {
            let level = level.trim();
            if !level.is_empty() {
                settings.log_level = level.to_string();
            }
        }

        if let Some(list) = lookup("METRA_CATALOGS") {
            let names: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                settings.catalogs = Some(names);
            }
        }

        if let Some(raw) = lookup("METRA_EQUALITY_PRECISION") {
            let precision: u32 = raw.trim().parse().map_err(|_| {
                UnitError::Configuration(format!(
                    "METRA_EQUALITY_PRECISION must be a non-negative integer, got '{}'",
                    raw
                ))
            })?;
            settings = settings.with_equality_precision(precision)?;
        }

        Ok(settings)
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_catalogs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalogs = Some(names.into_iter().map(|s| s.into().to_lowercase()).collect());
        self
    }

    /// Set the equality precision; f64 carries at most 15 significant decimal digits
    pub fn with_equality_precision(mut self, precision: u32) -> Result<Self, UnitError> {
        if precision > 15 {
            return Err(UnitError::Configuration(format!(
                "equality precision {} exceeds 15 decimal digits",
                precision
            )));
        }
        self.equality_precision = precision;
        Ok(self)
    }

    /// Whether the named catalog should be loaded
    pub fn includes_catalog(&self, name: &str) -> bool {
        match &self.catalogs {
            None => true,
            Some(names) => names.iter().any(|n| n.eq_ignore_ascii_case(name)),
        }
    }
}
