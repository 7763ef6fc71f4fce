//! Fluid mechanics: flow regime, hydrostatics and ideal-gas density.

use crate::classify::{Band, Classifier};
use crate::constants::{MOLAR_MASS_DRY_AIR, UNIVERSAL_GAS_CONSTANT};
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{checked_div, FormulaCategory, FormulaDescriptor, Rearrangement, VariableSpec};

pub static FORMULAS: &[FormulaDescriptor] = &[REYNOLDS_NUMBER, HYDROSTATIC_PRESSURE, GAS_DENSITY];

/// Pipe-flow regime thresholds
pub const FLOW_REGIME: Classifier = Classifier {
    variable: "reynolds_number",
    bands: &[Band::below(2300.0, "Laminar"), Band::up_to(4000.0, "Transitional")],
    otherwise: "Turbulent",
};

// ============================================================================
// Reynolds Number: Re = ρvD/μ
// ============================================================================

pub const REYNOLDS_NUMBER: FormulaDescriptor = FormulaDescriptor {
    id: "reynolds_number",
    name: "Reynolds Number",
    description: "Ratio of inertial to viscous forces in pipe flow, with flow regime.",
    category: FormulaCategory::Fluids,
    variables: &[
        VariableSpec::new("reynolds_number", "Re", "Reynolds number", UnitFamily::Dimensionless, Rule::Positive),
        VariableSpec::new("density", "ρ", "Fluid density", UnitFamily::Density, Rule::Positive),
        VariableSpec::new("velocity", "v", "Mean flow velocity", UnitFamily::Velocity, Rule::Positive),
        VariableSpec::new("diameter", "D", "Pipe diameter", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("viscosity", "μ", "Dynamic viscosity", UnitFamily::Viscosity, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "reynolds_number",
            formula: "Re = ρvD / μ",
            evaluate: |v| {
                checked_div(
                    v.get("density")? * v.get("velocity")? * v.get("diameter")?,
                    v.get("viscosity")?,
                    "viscosity cannot be zero",
                )
            },
        },
        Rearrangement {
            solves_for: "density",
            formula: "ρ = Re·μ / (vD)",
            evaluate: |v| {
                checked_div(
                    v.get("reynolds_number")? * v.get("viscosity")?,
                    v.get("velocity")? * v.get("diameter")?,
                    "velocity and diameter must be non-zero",
                )
            },
        },
        Rearrangement {
            solves_for: "velocity",
            formula: "v = Re·μ / (ρD)",
            evaluate: |v| {
                checked_div(
                    v.get("reynolds_number")? * v.get("viscosity")?,
                    v.get("density")? * v.get("diameter")?,
                    "density and diameter must be non-zero",
                )
            },
        },
        Rearrangement {
            solves_for: "diameter",
            formula: "D = Re·μ / (ρv)",
            evaluate: |v| {
                checked_div(
                    v.get("reynolds_number")? * v.get("viscosity")?,
                    v.get("density")? * v.get("velocity")?,
                    "density and velocity must be non-zero",
                )
            },
        },
        Rearrangement {
            solves_for: "viscosity",
            formula: "μ = ρvD / Re",
            evaluate: |v| {
                checked_div(
                    v.get("density")? * v.get("velocity")? * v.get("diameter")?,
                    v.get("reynolds_number")?,
                    "Reynolds number cannot be zero",
                )
            },
        },
    ],
    derived: &[],
    classifier: Some(FLOW_REGIME),
    assumptions: &[
        "Fully developed flow in a circular pipe",
        "Regime bands: Re < 2300 laminar, 2300 to 4000 transitional, above 4000 turbulent",
    ],
    example: &[
        ("reynolds_number", 200_000.0),
        ("density", 1000.0),
        ("velocity", 2.0),
        ("diameter", 0.1),
        ("viscosity", 0.001),
    ],
};

// ============================================================================
// Hydrostatic Pressure: P = ρgh
// ============================================================================

pub const HYDROSTATIC_PRESSURE: FormulaDescriptor = FormulaDescriptor {
    id: "hydrostatic_pressure",
    name: "Hydrostatic Pressure",
    description: "Gauge pressure at depth in a fluid at rest.",
    category: FormulaCategory::Fluids,
    variables: &[
        VariableSpec::new("pressure", "P", "Gauge pressure", UnitFamily::Pressure, Rule::NonNegative),
        VariableSpec::new("density", "ρ", "Fluid density", UnitFamily::Density, Rule::Positive),
        VariableSpec::new("gravity", "g", "Gravitational acceleration", UnitFamily::Acceleration, Rule::Positive),
        VariableSpec::new("depth", "h", "Depth below the free surface", UnitFamily::Length, Rule::NonNegative),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "pressure",
            formula: "P = ρgh",
            evaluate: |v| Ok(v.get("density")? * v.get("gravity")? * v.get("depth")?),
        },
        Rearrangement {
            solves_for: "density",
            formula: "ρ = P / (gh)",
            evaluate: |v| {
                checked_div(
                    v.get("pressure")?,
                    v.get("gravity")? * v.get("depth")?,
                    "depth cannot be zero when solving for density",
                )
            },
        },
        Rearrangement {
            solves_for: "gravity",
            formula: "g = P / (ρh)",
            evaluate: |v| {
                checked_div(
                    v.get("pressure")?,
                    v.get("density")? * v.get("depth")?,
                    "depth cannot be zero when solving for gravity",
                )
            },
        },
        Rearrangement {
            solves_for: "depth",
            formula: "h = P / (ρg)",
            evaluate: |v| {
                checked_div(
                    v.get("pressure")?,
                    v.get("density")? * v.get("gravity")?,
                    "density and gravity must be non-zero",
                )
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &[
        "Incompressible fluid at rest",
        "Gauge pressure; add surface pressure for absolute pressure",
    ],
    example: &[
        ("pressure", 117_720.0),
        ("density", 1000.0),
        ("gravity", 9.81),
        ("depth", 12.0),
    ],
};

// ============================================================================
// Ideal Gas Density: ρ = PM / (RT)
// ============================================================================

pub const GAS_DENSITY: FormulaDescriptor = FormulaDescriptor {
    id: "gas_density",
    name: "Gas Density",
    description: "Density of an ideal gas from absolute pressure, temperature and molar mass.",
    category: FormulaCategory::Fluids,
    variables: &[
        VariableSpec::new("density", "ρ", "Gas density", UnitFamily::Density, Rule::Positive),
        VariableSpec::new("pressure", "P", "Absolute pressure", UnitFamily::Pressure, Rule::Positive),
        VariableSpec::new("temperature", "T", "Absolute temperature", UnitFamily::Temperature, Rule::AboveAbsoluteZero),
        VariableSpec::new("molar_mass", "M", "Molar mass", UnitFamily::MolarMass, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "density",
            formula: "ρ = PM / (RT)",
            evaluate: |v| {
                checked_div(
                    v.get("pressure")? * v.get("molar_mass")?,
                    UNIVERSAL_GAS_CONSTANT * v.get("temperature")?,
                    "temperature must be above absolute zero",
                )
            },
        },
        Rearrangement {
            solves_for: "pressure",
            formula: "P = ρRT / M",
            evaluate: |v| {
                checked_div(
                    v.get("density")? * UNIVERSAL_GAS_CONSTANT * v.get("temperature")?,
                    v.get("molar_mass")?,
                    "molar mass cannot be zero",
                )
            },
        },
        Rearrangement {
            solves_for: "temperature",
            formula: "T = PM / (ρR)",
            evaluate: |v| {
                checked_div(
                    v.get("pressure")? * v.get("molar_mass")?,
                    v.get("density")? * UNIVERSAL_GAS_CONSTANT,
                    "density cannot be zero",
                )
            },
        },
        Rearrangement {
            solves_for: "molar_mass",
            formula: "M = ρRT / P",
            evaluate: |v| {
                checked_div(
                    v.get("density")? * UNIVERSAL_GAS_CONSTANT * v.get("temperature")?,
                    v.get("pressure")?,
                    "pressure cannot be zero",
                )
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Ideal gas", "R = 8.314462618 J/(mol·K)"],
    example: &[
        ("density", 1.225_214_981_716_772_3),
        ("pressure", 101_325.0),
        ("temperature", 288.15),
        ("molar_mass", MOLAR_MASS_DRY_AIR),
    ],
};
