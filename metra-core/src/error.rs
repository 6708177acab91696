//! Error types
//!
//! `UnitError` is what the unit engine returns. `MetraError` is the structured,
//! serializable form handed to clients at the server boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the unit engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Malformed definition, e.g. a dimension vector without exactly 7 components
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No linear or registered path between two units
    #[error("Failed to convert from unit '{from}' to unit '{to}'. Units are not compatible and no conversions are defined.")]
    Conversion { from: String, to: String },

    /// A required operand or argument is absent
    #[error("Missing argument: {0}")]
    Argument(String),
}

impl UnitError {
    pub fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        UnitError::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn argument(name: impl Into<String>) -> Self {
        UnitError::Argument(name.into())
    }
}

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const CONFIGURATION: &str = "CONFIGURATION";
    pub const CONVERSION_ERROR: &str = "CONVERSION_ERROR";
    pub const ARG_MISSING: &str = "ARG_MISSING";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_TOOL: &str = "UNKNOWN_TOOL";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Structured error for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetraError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl MetraError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
    }

    pub fn arg_missing(tool: &str, arg: &str) -> Self {
        Self::new(codes::ARG_MISSING, format!("{}() requires argument '{}'", tool, arg))
            .with_suggestion("Use tools/list for the argument schema")
    }

    pub fn arg_type(tool: &str, arg: &str, expected: &str) -> Self {
        Self::new(codes::ARG_TYPE, format!("{}() argument '{}': expected {}", tool, arg, expected))
    }

    pub fn unknown_unit(unit: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("Unknown unit: {}", unit))
            .with_suggestion("Use list_units to see registered names and symbols")
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(codes::UNKNOWN_TOOL, format!("Unknown tool: {}", name))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }
}

impl std::fmt::Display for MetraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for MetraError {}

impl From<UnitError> for MetraError {
    fn from(err: UnitError) -> Self {
        let message = err.to_string();
        match err {
            UnitError::Configuration(_) => Self::new(codes::CONFIGURATION, message),
            UnitError::Conversion { .. } => Self::new(codes::CONVERSION_ERROR, message)
                .with_suggestion("Check that both units measure the same dimension"),
            UnitError::Argument(_) => Self::new(codes::ARG_MISSING, message),
        }
    }
}
