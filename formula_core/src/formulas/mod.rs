//! # Formula Catalog
//!
//! Closed-form relations the solver can rearrange, one module per subject.
//! Each module exposes a `FORMULAS` slice of descriptors; [`registry`] merges
//! them into the lookup table used by the solver.
//!
//! ## Modules
//!
//! - [`fluids`] - Reynolds number, hydrostatic pressure, ideal-gas density
//! - [`mechanics`] - projectile height, piston speed, work, stress, orbits
//! - [`electrical`] - kVA and DC current, real power, wire gauge and resistance
//! - [`thermal`] - thermal resistance networks and heat flow
//! - [`waves`] - Doppler shift
//! - [`geometry`] - circle, hexagon and parabola properties
//! - [`number_theory`] - modular inverse
//!
//! ## Conventions
//!
//! - All evaluators take and return base units (see [`crate::units`])
//! - Signed stresses: tension positive
//! - Doppler velocities: positive when moving toward the other party

pub mod electrical;
pub mod fluids;
pub mod geometry;
pub mod mechanics;
pub mod number_theory;
pub mod registry;
pub mod thermal;
pub mod waves;

pub use registry::{
    checked_asin, checked_div, checked_sqrt, ensure, find_formula, generate_formulas_markdown,
    in_category, write_formulas_markdown, BaseValues, DerivedQuantity, Eval, EvalError, FormulaCategory,
    FormulaDescriptor, Rearrangement, VariableSpec, ALL_FORMULAS,
};
