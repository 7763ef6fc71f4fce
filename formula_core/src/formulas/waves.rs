//! Waves: Doppler shift for sound and other mechanical waves.
//!
//! Velocities are measured along the line joining source and observer and are
//! positive when each party moves toward the other.

use crate::constants::SPEED_OF_SOUND_AIR_20C;
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    checked_div, ensure, BaseValues, DerivedQuantity, EvalError, FormulaCategory,
    FormulaDescriptor, Rearrangement, VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[DOPPLER_EFFECT];

const SONIC_BARRIER: &str = "source speed must be below the wave speed (sonic barrier)";
const OUTRUN: &str = "observer recedes faster than the wave travels";

fn check_motion(c: f64, observer: f64, source: f64) -> Result<(), EvalError> {
    ensure(source.abs() < c, SONIC_BARRIER)?;
    ensure(c + observer > 0.0, OUTRUN)
}

fn motion(v: &BaseValues) -> Result<(f64, f64, f64), EvalError> {
    let c = v.get("wave_speed")?;
    let vo = v.get("observer_velocity")?;
    let vs = v.get("source_velocity")?;
    check_motion(c, vo, vs)?;
    Ok((c, vo, vs))
}

pub const DOPPLER_EFFECT: FormulaDescriptor = FormulaDescriptor {
    id: "doppler_effect",
    name: "Doppler Effect",
    description: "Observed frequency of a wave from a moving source to a moving observer.",
    category: FormulaCategory::Waves,
    variables: &[
        VariableSpec::new("observed_frequency", "f'", "Observed frequency", UnitFamily::Frequency, Rule::Positive),
        VariableSpec::new("source_frequency", "f", "Emitted frequency", UnitFamily::Frequency, Rule::Positive),
        VariableSpec::new("wave_speed", "c", "Wave speed in the medium", UnitFamily::Velocity, Rule::Positive),
        VariableSpec::new("observer_velocity", "vo", "Observer velocity toward source", UnitFamily::Velocity, Rule::Any),
        VariableSpec::new("source_velocity", "vs", "Source velocity toward observer", UnitFamily::Velocity, Rule::Any),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "observed_frequency",
            formula: "f' = f(c + vo) / (c − vs)",
            evaluate: |v| {
                let (c, vo, vs) = motion(v)?;
                checked_div(v.get("source_frequency")? * (c + vo), c - vs, SONIC_BARRIER)
            },
        },
        Rearrangement {
            solves_for: "source_frequency",
            formula: "f = f'(c − vs) / (c + vo)",
            evaluate: |v| {
                let (c, vo, vs) = motion(v)?;
                checked_div(v.get("observed_frequency")? * (c - vs), c + vo, OUTRUN)
            },
        },
        Rearrangement {
            solves_for: "wave_speed",
            formula: "c = (f·vo + f'·vs) / (f' − f)",
            evaluate: |v| {
                let (fo, f) = (v.get("observed_frequency")?, v.get("source_frequency")?);
                let (vo, vs) = (v.get("observer_velocity")?, v.get("source_velocity")?);
                let c = checked_div(
                    f * vo + fo * vs,
                    fo - f,
                    "wave speed is undetermined when there is no frequency shift",
                )?;
                ensure(c > 0.0, "these frequencies and velocities imply no positive wave speed")?;
                check_motion(c, vo, vs)?;
                Ok(c)
            },
        },
        Rearrangement {
            solves_for: "observer_velocity",
            formula: "vo = f'(c − vs) / f − c",
            evaluate: |v| {
                let c = v.get("wave_speed")?;
                let vs = v.get("source_velocity")?;
                ensure(vs.abs() < c, SONIC_BARRIER)?;
                let vo = checked_div(
                    v.get("observed_frequency")? * (c - vs),
                    v.get("source_frequency")?,
                    "emitted frequency cannot be zero",
                )? - c;
                check_motion(c, vo, vs)?;
                Ok(vo)
            },
        },
        Rearrangement {
            solves_for: "source_velocity",
            formula: "vs = c − f(c + vo) / f'",
            evaluate: |v| {
                let c = v.get("wave_speed")?;
                let vo = v.get("observer_velocity")?;
                ensure(c + vo > 0.0, OUTRUN)?;
                let vs = c - checked_div(
                    v.get("source_frequency")? * (c + vo),
                    v.get("observed_frequency")?,
                    "observed frequency cannot be zero",
                )?;
                check_motion(c, vo, vs)?;
                Ok(vs)
            },
        },
    ],
    derived: &[
        DerivedQuantity {
            id: "frequency_shift",
            symbol: "Δf",
            name: "Frequency shift",
            family: UnitFamily::Frequency,
            formula: "Δf = f' − f",
            evaluate: |v| Ok(v.get("observed_frequency")? - v.get("source_frequency")?),
        },
        DerivedQuantity {
            id: "wavelength",
            symbol: "λ",
            name: "Wavelength between source and observer",
            family: UnitFamily::Length,
            formula: "λ = (c − vs) / f",
            evaluate: |v| {
                checked_div(
                    v.get("wave_speed")? - v.get("source_velocity")?,
                    v.get("source_frequency")?,
                    "emitted frequency cannot be zero",
                )
            },
        },
        DerivedQuantity {
            id: "source_mach_number",
            symbol: "Ma",
            name: "Source Mach number",
            family: UnitFamily::Dimensionless,
            formula: "Ma = |vs| / c",
            evaluate: |v| {
                checked_div(v.get("source_velocity")?.abs(), v.get("wave_speed")?, "wave speed cannot be zero")
            },
        },
    ],
    classifier: None,
    assumptions: &[
        "Motion along the line joining source and observer",
        "Medium at rest; |vs| < c",
    ],
    example: &[
        ("observed_frequency", 482.172_523_961_661_34),
        ("source_frequency", 440.0),
        ("wave_speed", SPEED_OF_SOUND_AIR_20C),
        ("observer_velocity", 0.0),
        ("source_velocity", 30.0),
    ],
};
