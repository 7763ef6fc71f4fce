//! # formula_core - Unit-Aware Formula Solver
//!
//! `formula_core` solves engineering and science formulas for whichever variable
//! is left blank. Every formula is a static descriptor listing its variables,
//! one rearrangement per solvable variable, and optional derived outputs. Known
//! values are entered in any supported unit, validated, converted to SI base
//! units, evaluated, and converted back to the unit the caller asks for.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: A calculation is a pure function of its inputs
//! - **JSON-First**: Results, errors and the formula catalog serialize with serde
//! - **Rich Errors**: Structured error types that name the offending variable
//! - **Data, not code paths**: Adding a formula means adding a descriptor
//!
//! ## Quick Start
//!
//! ```rust
//! use formula_core::{calculate, KnownValue};
//!
//! let result = calculate(
//!     "reynolds_number",
//!     &[
//!         KnownValue::new("density", "1000", "kg/m³"),
//!         KnownValue::new("velocity", "2", "m/s"),
//!         KnownValue::new("diameter", "100", "mm"),
//!         KnownValue::new("viscosity", "1", "cP"),
//!     ],
//!     None,
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(result.formatted, "200000");
//! assert_eq!(result.classification.as_deref(), Some("Turbulent"));
//! ```
//!
//! ## Modules
//!
//! - [`formulas`] - Formula catalog and registry
//! - [`solver`] - Unknown selection, evaluation and result assembly
//! - [`units`] - Unit families and conversions to SI base units
//! - [`quantity`] - A value tagged with its unit
//! - [`validation`] - Per-variable domain rules
//! - [`classify`] - Threshold bands (flow regime, safety verdict)
//! - [`format`] - Number formatting for display
//! - [`settings`] - Display settings loaded from JSON
//! - [`constants`] - Physical constants and reference data
//! - [`errors`] - Structured error types

pub mod classify;
pub mod constants;
pub mod errors;
pub mod format;
pub mod formulas;
pub mod quantity;
pub mod settings;
pub mod solver;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult, ErrorReport};
pub use formulas::{find_formula, FormulaCategory, FormulaDescriptor, VariableSpec, ALL_FORMULAS};
pub use quantity::Quantity;
pub use settings::Settings;
pub use solver::{
    calculate, list_formulas, list_variables, solve, CalculationRequest, CalculationResult,
    DerivedValue, KnownValue, Solver,
};
pub use units::UnitFamily;
