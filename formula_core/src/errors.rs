//! # Error Types
//!
//! Structured error types for formula_core. Every failure a caller can hit is
//! returned as a value so a front end can render it inline next to the
//! offending field. Each variant names the variable involved where there is
//! one, and [`CalcError::error_code`] gives a stable code for programmatic
//! handling.
//!
//! ## Example
//!
//! ```rust
//! use formula_core::errors::{CalcError, CalcResult};
//!
//! fn check_depth(depth_m: f64) -> CalcResult<()> {
//!     if depth_m <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "depth",
//!             depth_m.to_string(),
//!             "must be greater than zero",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_depth(-2.0).unwrap_err();
//! assert_eq!(err.error_code(), "INVALID_INPUT");
//! assert_eq!(err.variable(), Some("depth"));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for formula_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// User-facing kinds (`Parse`, `InvalidInput`, `AmbiguousUnknown`,
/// `Overdetermined`, `Domain`) describe something the person at the keyboard
/// can fix. The remaining kinds point at a bad identifier or a broken formula
/// registration and are reported by [`CalcError::is_fatal`].
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Raw input is not a finite number
    #[error("Could not read '{raw}' for '{variable}' as a number")]
    Parse { variable: String, raw: String },

    /// A number that violates the variable's physical constraint
    #[error("Invalid input for '{variable}': {value} - {reason}")]
    InvalidInput {
        variable: String,
        value: String,
        reason: String,
    },

    /// Unit symbol not registered for the family
    #[error("Unknown unit '{unit}' for {family}")]
    UnknownUnit { family: String, unit: String },

    /// More than one variable was left out
    #[error("Cannot tell which value to solve for in {formula}: missing {missing:?}; enter {required} values")]
    AmbiguousUnknown {
        formula: String,
        missing: Vec<String>,
        required: usize,
    },

    /// Every variable was supplied and the formula has nothing left to derive
    #[error("Nothing to solve in {formula}: {supplied} values given, enter exactly {required}")]
    Overdetermined {
        formula: String,
        supplied: usize,
        required: usize,
    },

    /// The math is undefined for otherwise valid inputs
    #[error("Cannot evaluate {formula} for '{variable}': {reason}")]
    Domain {
        formula: String,
        variable: String,
        reason: String,
    },

    /// No rearrangement is registered for a solvable variable
    #[error("No rearrangement registered for '{variable}' in {formula}")]
    UnsupportedRearrangement { formula: String, variable: String },

    /// Formula id not in the registry
    #[error("Unknown formula: {formula}")]
    UnknownFormula { formula: String },

    /// Variable id not declared by the formula
    #[error("Unknown variable '{variable}' for {formula}")]
    UnknownVariable { formula: String, variable: String },

    /// Settings could not be read or are inconsistent
    #[error("Settings error: {reason}")]
    Settings { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create a Parse error
    pub fn parse(variable: impl Into<String>, raw: impl Into<String>) -> Self {
        CalcError::Parse {
            variable: variable.into(),
            raw: raw.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(variable: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            variable: variable.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownUnit error
    pub fn unknown_unit(family: impl Into<String>, unit: impl Into<String>) -> Self {
        CalcError::UnknownUnit {
            family: family.into(),
            unit: unit.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(formula: impl Into<String>, variable: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            formula: formula.into(),
            variable: variable.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownFormula error
    pub fn unknown_formula(formula: impl Into<String>) -> Self {
        CalcError::UnknownFormula {
            formula: formula.into(),
        }
    }

    /// Create an UnknownVariable error
    pub fn unknown_variable(formula: impl Into<String>, variable: impl Into<String>) -> Self {
        CalcError::UnknownVariable {
            formula: formula.into(),
            variable: variable.into(),
        }
    }

    /// Create a Settings error
    pub fn settings(reason: impl Into<String>) -> Self {
        CalcError::Settings {
            reason: reason.into(),
        }
    }

    /// True for registry and programming errors a user cannot fix by editing
    /// the form.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CalcError::UnknownUnit { .. }
                | CalcError::UnsupportedRearrangement { .. }
                | CalcError::UnknownFormula { .. }
                | CalcError::UnknownVariable { .. }
                | CalcError::Internal { .. }
        )
    }

    /// The variable the error is about, when there is one
    pub fn variable(&self) -> Option<&str> {
        match self {
            CalcError::Parse { variable, .. }
            | CalcError::InvalidInput { variable, .. }
            | CalcError::Domain { variable, .. }
            | CalcError::UnsupportedRearrangement { variable, .. }
            | CalcError::UnknownVariable { variable, .. } => Some(variable),
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::Parse { .. } => "PARSE_ERROR",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::AmbiguousUnknown { .. } => "AMBIGUOUS_UNKNOWN",
            CalcError::Overdetermined { .. } => "OVERDETERMINED",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::UnsupportedRearrangement { .. } => "UNSUPPORTED_REARRANGEMENT",
            CalcError::UnknownFormula { .. } => "UNKNOWN_FORMULA",
            CalcError::UnknownVariable { .. } => "UNKNOWN_VARIABLE",
            CalcError::Settings { .. } => "SETTINGS_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Flatten into the shape a front end renders next to a field.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.error_code().to_string(),
            variable: self.variable().map(str::to_string),
            message: self.to_string(),
            fatal: self.is_fatal(),
        }
    }
}

/// Serializable summary of a [`CalcError`].
///
/// ## JSON Example
///
/// ```json
/// {
///   "code": "INVALID_INPUT",
///   "variable": "viscosity",
///   "message": "Invalid input for 'viscosity': 0 - must be greater than zero",
///   "fatal": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: String,
    pub variable: Option<String>,
    pub message: String,
    pub fatal: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("depth", "-5", "must be greater than zero");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::parse("density", "abc").error_code(), "PARSE_ERROR");
        assert_eq!(CalcError::unknown_unit("length", "furlong").error_code(), "UNKNOWN_UNIT");
        assert_eq!(
            CalcError::domain("doppler_effect", "observed_frequency", "sonic barrier").error_code(),
            "DOMAIN_ERROR"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(CalcError::unknown_unit("length", "furlong").is_fatal());
        assert!(CalcError::unknown_formula("nope").is_fatal());
        assert!(!CalcError::parse("density", "abc").is_fatal());
        assert!(!CalcError::Overdetermined {
            formula: "hydrostatic_pressure".into(),
            supplied: 4,
            required: 3,
        }
        .is_fatal());
    }

    #[test]
    fn test_report_names_variable() {
        let report = CalcError::invalid_input("viscosity", "0", "must be greater than zero").report();
        assert_eq!(report.code, "INVALID_INPUT");
        assert_eq!(report.variable.as_deref(), Some("viscosity"));
        assert!(report.message.contains("viscosity"));
        assert!(!report.fatal);

        let ambiguous = CalcError::AmbiguousUnknown {
            formula: "reynolds_number".into(),
            missing: vec!["density".into(), "velocity".into()],
            required: 4,
        }
        .report();
        assert_eq!(ambiguous.variable, None);
        assert!(ambiguous.message.contains("enter 4 values"));
    }
}
