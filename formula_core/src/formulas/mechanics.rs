//! Mechanics: projectile motion, engines, work, stress and orbits.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::classify::{Band, Classifier};
use crate::constants::{EARTH_MASS_KG, EARTH_RADIUS_M, GRAVITATIONAL_CONSTANT};
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    checked_asin, checked_div, checked_sqrt, ensure, BaseValues, DerivedQuantity, Eval,
    FormulaCategory, FormulaDescriptor, Rearrangement, VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[
    MAX_HEIGHT,
    PISTON_SPEED,
    FOOT_POUND_ENERGY,
    VON_MISES_PLANE_STRESS,
    SAFETY_FACTOR,
    ORBITAL_VELOCITY,
];

/// Safety verdict thresholds
pub const SAFETY_VERDICT: Classifier = Classifier {
    variable: "safety_factor",
    bands: &[Band::below(1.0, "Unsafe"), Band::below(2.0, "Marginal")],
    otherwise: "Safe",
};

// ============================================================================
// Projectile Maximum Height: h = v₀² sin²θ / (2g)
// ============================================================================

pub const MAX_HEIGHT: FormulaDescriptor = FormulaDescriptor {
    id: "max_height",
    name: "Projectile Maximum Height",
    description: "Peak height of a projectile launched from ground level.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("max_height", "h", "Maximum height", UnitFamily::Length, Rule::NonNegative),
        VariableSpec::new("initial_velocity", "v₀", "Launch speed", UnitFamily::Velocity, Rule::Positive),
        VariableSpec::new(
            "launch_angle",
            "θ",
            "Launch angle above horizontal",
            UnitFamily::Angle,
            Rule::Range { min: 0.0, max: FRAC_PI_2 },
        ),
        VariableSpec::new("gravity", "g", "Gravitational acceleration", UnitFamily::Acceleration, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "max_height",
            formula: "h = v₀² sin²θ / (2g)",
            evaluate: |v| {
                let sin = v.get("launch_angle")?.sin();
                checked_div(
                    v.get("initial_velocity")?.powi(2) * sin * sin,
                    2.0 * v.get("gravity")?,
                    "gravity cannot be zero",
                )
            },
        },
        Rearrangement {
            solves_for: "initial_velocity",
            formula: "v₀ = √(2gh) / sin θ",
            evaluate: |v| {
                let rise = checked_sqrt(
                    2.0 * v.get("gravity")? * v.get("max_height")?,
                    "height and gravity must not be negative",
                )?;
                checked_div(
                    rise,
                    v.get("launch_angle")?.sin(),
                    "a horizontal launch never gains height",
                )
            },
        },
        Rearrangement {
            solves_for: "launch_angle",
            formula: "θ = asin(√(2gh / v₀²))",
            evaluate: |v| {
                let ratio = checked_div(
                    2.0 * v.get("gravity")? * v.get("max_height")?,
                    v.get("initial_velocity")?.powi(2),
                    "launch speed cannot be zero",
                )?;
                let sin = checked_sqrt(ratio, "height and gravity must not be negative")?;
                checked_asin(sin, "height is out of reach at this launch speed")
            },
        },
        Rearrangement {
            solves_for: "gravity",
            formula: "g = v₀² sin²θ / (2h)",
            evaluate: |v| {
                let sin = v.get("launch_angle")?.sin();
                checked_div(
                    v.get("initial_velocity")?.powi(2) * sin * sin,
                    2.0 * v.get("max_height")?,
                    "height cannot be zero when solving for gravity",
                )
            },
        },
    ],
    derived: &[
        DerivedQuantity {
            id: "time_to_apex",
            symbol: "t",
            name: "Time to apex",
            family: UnitFamily::Time,
            formula: "t = v₀ sin θ / g",
            evaluate: |v| {
                checked_div(
                    v.get("initial_velocity")? * v.get("launch_angle")?.sin(),
                    v.get("gravity")?,
                    "gravity cannot be zero",
                )
            },
        },
        DerivedQuantity {
            id: "range",
            symbol: "R",
            name: "Horizontal range",
            family: UnitFamily::Length,
            formula: "R = v₀² sin 2θ / g",
            evaluate: |v| {
                checked_div(
                    v.get("initial_velocity")?.powi(2) * (2.0 * v.get("launch_angle")?).sin(),
                    v.get("gravity")?,
                    "gravity cannot be zero",
                )
            },
        },
    ],
    classifier: None,
    assumptions: &["No air resistance", "Launch and landing at the same elevation"],
    example: &[
        ("max_height", 15.290_519_877_675_838),
        ("initial_velocity", 20.0),
        ("launch_angle", PI / 3.0),
        ("gravity", 9.81),
    ],
};

// ============================================================================
// Mean Piston Speed: Vs = 2LN / 60
// ============================================================================

pub const PISTON_SPEED: FormulaDescriptor = FormulaDescriptor {
    id: "piston_speed",
    name: "Mean Piston Speed",
    description: "Average piston speed from stroke length and crankshaft speed.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("piston_speed", "Vs", "Mean piston speed", UnitFamily::Velocity, Rule::Positive),
        VariableSpec::new("stroke", "L", "Stroke length", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("engine_speed", "N", "Crankshaft speed", UnitFamily::RotationalSpeed, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "piston_speed",
            formula: "Vs = 2LN / 60",
            evaluate: |v| Ok(2.0 * v.get("stroke")? * v.get("engine_speed")? / 60.0),
        },
        Rearrangement {
            solves_for: "stroke",
            formula: "L = 60·Vs / (2N)",
            evaluate: |v| {
                checked_div(
                    60.0 * v.get("piston_speed")?,
                    2.0 * v.get("engine_speed")?,
                    "engine speed cannot be zero",
                )
            },
        },
        Rearrangement {
            solves_for: "engine_speed",
            formula: "N = 60·Vs / (2L)",
            evaluate: |v| {
                checked_div(
                    60.0 * v.get("piston_speed")?,
                    2.0 * v.get("stroke")?,
                    "stroke cannot be zero",
                )
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Two strokes per crankshaft revolution", "N in revolutions per minute"],
    example: &[
        ("piston_speed", 21.883_333_333_333_333),
        ("stroke", 0.101),
        ("engine_speed", 6500.0),
    ],
};

// ============================================================================
// Work / Foot-Pound Energy: E = F·d
// ============================================================================

pub const FOOT_POUND_ENERGY: FormulaDescriptor = FormulaDescriptor {
    id: "foot_pound_energy",
    name: "Foot-Pound Energy",
    description: "Work done by a constant force along its line of action.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("energy", "E", "Energy", UnitFamily::Energy, Rule::Positive),
        VariableSpec::new("force", "F", "Force", UnitFamily::Force, Rule::Positive),
        VariableSpec::new("distance", "d", "Distance", UnitFamily::Length, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "energy",
            formula: "E = F·d",
            evaluate: |v| Ok(v.get("force")? * v.get("distance")?),
        },
        Rearrangement {
            solves_for: "force",
            formula: "F = E / d",
            evaluate: |v| checked_div(v.get("energy")?, v.get("distance")?, "distance cannot be zero"),
        },
        Rearrangement {
            solves_for: "distance",
            formula: "d = E / F",
            evaluate: |v| checked_div(v.get("energy")?, v.get("force")?, "force cannot be zero"),
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Constant force parallel to displacement"],
    example: &[
        ("energy", 1.355_817_948_331_400_4),
        ("force", 4.448_221_615_260_5),
        ("distance", 0.3048),
    ],
};

// ============================================================================
// Von Mises Stress (plane stress)
// ============================================================================

fn principal_radius(v: &BaseValues) -> Eval {
    let half_diff = (v.get("sigma_x")? - v.get("sigma_y")?) / 2.0;
    Ok(half_diff.hypot(v.get("tau_xy")?))
}

/// Larger root of s² − o·s + (o² + 3τ² − σv²) = 0
fn normal_stress_from(v: &BaseValues, other: &str) -> Eval {
    let o = v.get(other)?;
    let radicand = 4.0 * v.get("von_mises")?.powi(2) - 3.0 * o * o - 12.0 * v.get("tau_xy")?.powi(2);
    let root = checked_sqrt(radicand, "equivalent stress is too small for the other stresses")?;
    Ok((o + root) / 2.0)
}

pub const VON_MISES_PLANE_STRESS: FormulaDescriptor = FormulaDescriptor {
    id: "von_mises_plane_stress",
    name: "Von Mises Stress",
    description: "Equivalent stress for a plane stress state.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("von_mises", "σv", "Von Mises stress", UnitFamily::Pressure, Rule::NonNegative),
        VariableSpec::new("sigma_x", "σx", "Normal stress in x", UnitFamily::Pressure, Rule::Any),
        VariableSpec::new("sigma_y", "σy", "Normal stress in y", UnitFamily::Pressure, Rule::Any),
        VariableSpec::new("tau_xy", "τxy", "In-plane shear stress", UnitFamily::Pressure, Rule::Any),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "von_mises",
            formula: "σv = √(σx² − σxσy + σy² + 3τxy²)",
            evaluate: |v| {
                let (sx, sy, t) = (v.get("sigma_x")?, v.get("sigma_y")?, v.get("tau_xy")?);
                checked_sqrt(sx * sx - sx * sy + sy * sy + 3.0 * t * t, "negative radicand")
            },
        },
        Rearrangement {
            solves_for: "sigma_x",
            formula: "σx = (σy + √(4σv² − 3σy² − 12τxy²)) / 2",
            evaluate: |v| normal_stress_from(v, "sigma_y"),
        },
        Rearrangement {
            solves_for: "sigma_y",
            formula: "σy = (σx + √(4σv² − 3σx² − 12τxy²)) / 2",
            evaluate: |v| normal_stress_from(v, "sigma_x"),
        },
        Rearrangement {
            solves_for: "tau_xy",
            formula: "τxy = √((σv² − σx² + σxσy − σy²) / 3)",
            evaluate: |v| {
                let (sv, sx, sy) = (v.get("von_mises")?, v.get("sigma_x")?, v.get("sigma_y")?);
                checked_sqrt(
                    (sv * sv - sx * sx + sx * sy - sy * sy) / 3.0,
                    "equivalent stress is too small for the normal stresses",
                )
            },
        },
    ],
    derived: &[
        DerivedQuantity {
            id: "principal_stress_1",
            symbol: "σ1",
            name: "Major principal stress",
            family: UnitFamily::Pressure,
            formula: "σ1 = (σx + σy)/2 + √(((σx − σy)/2)² + τxy²)",
            evaluate: |v| Ok((v.get("sigma_x")? + v.get("sigma_y")?) / 2.0 + principal_radius(v)?),
        },
        DerivedQuantity {
            id: "principal_stress_2",
            symbol: "σ2",
            name: "Minor principal stress",
            family: UnitFamily::Pressure,
            formula: "σ2 = (σx + σy)/2 − √(((σx − σy)/2)² + τxy²)",
            evaluate: |v| Ok((v.get("sigma_x")? + v.get("sigma_y")?) / 2.0 - principal_radius(v)?),
        },
        DerivedQuantity {
            id: "max_shear_stress",
            symbol: "τmax",
            name: "Maximum in-plane shear stress",
            family: UnitFamily::Pressure,
            formula: "τmax = √(((σx − σy)/2)² + τxy²)",
            evaluate: principal_radius,
        },
    ],
    classifier: None,
    assumptions: &[
        "Plane stress (σz = τxz = τyz = 0)",
        "Solving for a normal stress returns the larger root; solving for shear returns its magnitude",
    ],
    example: &[
        ("von_mises", 117_898_261.225_515_96),
        ("sigma_x", 120e6),
        ("sigma_y", 80e6),
        ("tau_xy", 30e6),
    ],
};

// ============================================================================
// Factor of Safety: SF = σy / σ
// ============================================================================

pub const SAFETY_FACTOR: FormulaDescriptor = FormulaDescriptor {
    id: "safety_factor",
    name: "Factor of Safety",
    description: "Ratio of yield strength to working stress, with a safety verdict.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("safety_factor", "SF", "Factor of safety", UnitFamily::Dimensionless, Rule::Positive),
        VariableSpec::new("yield_strength", "σy", "Yield strength", UnitFamily::Pressure, Rule::Positive),
        VariableSpec::new("applied_stress", "σ", "Working stress", UnitFamily::Pressure, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "safety_factor",
            formula: "SF = σy / σ",
            evaluate: |v| {
                checked_div(v.get("yield_strength")?, v.get("applied_stress")?, "working stress cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "yield_strength",
            formula: "σy = SF·σ",
            evaluate: |v| Ok(v.get("safety_factor")? * v.get("applied_stress")?),
        },
        Rearrangement {
            solves_for: "applied_stress",
            formula: "σ = σy / SF",
            evaluate: |v| {
                checked_div(v.get("yield_strength")?, v.get("safety_factor")?, "safety factor cannot be zero")
            },
        },
    ],
    derived: &[],
    classifier: Some(SAFETY_VERDICT),
    assumptions: &["Verdict: SF < 1 unsafe, 1 to 2 marginal, 2 or more safe"],
    example: &[
        ("safety_factor", 2.5),
        ("yield_strength", 250e6),
        ("applied_stress", 100e6),
    ],
};

// ============================================================================
// Circular Orbit Velocity: v = √(GM / (R + h))
// ============================================================================

fn orbit_radius(v: &BaseValues) -> Eval {
    Ok(v.get("body_radius")? + v.get("altitude")?)
}

pub const ORBITAL_VELOCITY: FormulaDescriptor = FormulaDescriptor {
    id: "orbital_velocity",
    name: "Orbital Velocity",
    description: "Speed of a circular orbit at a given altitude above a spherical body.",
    category: FormulaCategory::Mechanics,
    variables: &[
        VariableSpec::new("orbital_velocity", "v", "Orbital velocity", UnitFamily::Velocity, Rule::Positive),
        VariableSpec::new("central_mass", "M", "Mass of the central body", UnitFamily::Mass, Rule::Positive),
        VariableSpec::new("body_radius", "R", "Radius of the central body", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("altitude", "h", "Altitude above the surface", UnitFamily::Length, Rule::NonNegative),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "orbital_velocity",
            formula: "v = √(GM / (R + h))",
            evaluate: |v| {
                let mu = GRAVITATIONAL_CONSTANT * v.get("central_mass")?;
                let r = checked_div(mu, orbit_radius(v)?, "orbit radius cannot be zero")?;
                checked_sqrt(r, "orbit radius cannot be negative")
            },
        },
        Rearrangement {
            solves_for: "central_mass",
            formula: "M = v²(R + h) / G",
            evaluate: |v| Ok(v.get("orbital_velocity")?.powi(2) * orbit_radius(v)? / GRAVITATIONAL_CONSTANT),
        },
        Rearrangement {
            solves_for: "body_radius",
            formula: "R = GM / v² − h",
            evaluate: |v| {
                let r = checked_div(
                    GRAVITATIONAL_CONSTANT * v.get("central_mass")?,
                    v.get("orbital_velocity")?.powi(2),
                    "orbital velocity cannot be zero",
                )?;
                let radius = r - v.get("altitude")?;
                ensure(radius > 0.0, "altitude exceeds the orbit radius for this velocity")?;
                Ok(radius)
            },
        },
        Rearrangement {
            solves_for: "altitude",
            formula: "h = GM / v² − R",
            evaluate: |v| {
                let r = checked_div(
                    GRAVITATIONAL_CONSTANT * v.get("central_mass")?,
                    v.get("orbital_velocity")?.powi(2),
                    "orbital velocity cannot be zero",
                )?;
                let altitude = r - v.get("body_radius")?;
                ensure(altitude >= 0.0, "velocity is too high for a circular orbit above the surface")?;
                Ok(altitude)
            },
        },
    ],
    derived: &[
        DerivedQuantity {
            id: "orbital_period",
            symbol: "T",
            name: "Orbital period",
            family: UnitFamily::Time,
            formula: "T = 2π(R + h) / v",
            evaluate: |v| {
                checked_div(
                    2.0 * PI * orbit_radius(v)?,
                    v.get("orbital_velocity")?,
                    "orbital velocity cannot be zero",
                )
            },
        },
        DerivedQuantity {
            id: "escape_velocity",
            symbol: "ve",
            name: "Escape velocity at orbit altitude",
            family: UnitFamily::Velocity,
            formula: "ve = √(2GM / (R + h))",
            evaluate: |v| {
                let r = checked_div(
                    2.0 * GRAVITATIONAL_CONSTANT * v.get("central_mass")?,
                    orbit_radius(v)?,
                    "orbit radius cannot be zero",
                )?;
                checked_sqrt(r, "orbit radius cannot be negative")
            },
        },
    ],
    classifier: None,
    assumptions: &[
        "Circular orbit around a spherically symmetric body",
        "Orbiting mass negligible next to the central mass",
        "G = 6.6743e-11 m³/(kg·s²)",
    ],
    example: &[
        ("orbital_velocity", 7_672.490_413_283_604_5),
        ("central_mass", EARTH_MASS_KG),
        ("body_radius", EARTH_RADIUS_M),
        ("altitude", 400e3),
    ],
};
