//! Electrical: supply current, power factor and conductor sizing.

use std::f64::consts::PI;

use crate::constants::{AWG_36_DIAMETER_M, AWG_DIAMETER_RATIO, AWG_STEPS, RESISTIVITY_COPPER};
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    checked_div, ensure, DerivedQuantity, FormulaCategory, FormulaDescriptor, Rearrangement,
    VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[
    KVA_TO_AMPS_SINGLE_PHASE,
    KVA_TO_AMPS_THREE_PHASE,
    DC_POWER_TO_AMPS,
    REAL_POWER,
    WIRE_GAUGE,
    WIRE_RESISTANCE,
];

const SQRT_3: f64 = 1.732_050_807_568_877_2;

// ============================================================================
// Supply Current
// ============================================================================

pub const KVA_TO_AMPS_SINGLE_PHASE: FormulaDescriptor = FormulaDescriptor {
    id: "kva_to_amps_single_phase",
    name: "kVA to Amps (Single-Phase)",
    description: "Line current drawn by a single-phase load of known apparent power.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new("current", "I", "Line current", UnitFamily::Current, Rule::Positive),
        VariableSpec::new("apparent_power", "S", "Apparent power", UnitFamily::ApparentPower, Rule::Positive),
        VariableSpec::new("voltage", "V", "Line voltage", UnitFamily::Voltage, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "current",
            formula: "I = S / V",
            evaluate: |v| checked_div(v.get("apparent_power")?, v.get("voltage")?, "voltage cannot be zero"),
        },
        Rearrangement {
            solves_for: "apparent_power",
            formula: "S = I·V",
            evaluate: |v| Ok(v.get("current")? * v.get("voltage")?),
        },
        Rearrangement {
            solves_for: "voltage",
            formula: "V = S / I",
            evaluate: |v| checked_div(v.get("apparent_power")?, v.get("current")?, "current cannot be zero"),
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["RMS quantities"],
    example: &[
        ("current", 41.666_666_666_666_664),
        ("apparent_power", 10_000.0),
        ("voltage", 240.0),
    ],
};

pub const KVA_TO_AMPS_THREE_PHASE: FormulaDescriptor = FormulaDescriptor {
    id: "kva_to_amps_three_phase",
    name: "kVA to Amps (Three-Phase)",
    description: "Line current drawn by a balanced three-phase load of known apparent power.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new("current", "I", "Line current", UnitFamily::Current, Rule::Positive),
        VariableSpec::new("apparent_power", "S", "Apparent power", UnitFamily::ApparentPower, Rule::Positive),
        VariableSpec::new("voltage", "V", "Line-to-line voltage", UnitFamily::Voltage, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "current",
            formula: "I = S / (√3·V)",
            evaluate: |v| {
                checked_div(v.get("apparent_power")?, SQRT_3 * v.get("voltage")?, "voltage cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "apparent_power",
            formula: "S = √3·V·I",
            evaluate: |v| Ok(SQRT_3 * v.get("voltage")? * v.get("current")?),
        },
        Rearrangement {
            solves_for: "voltage",
            formula: "V = S / (√3·I)",
            evaluate: |v| {
                checked_div(v.get("apparent_power")?, SQRT_3 * v.get("current")?, "current cannot be zero")
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Balanced three-phase load", "Line-to-line voltage"],
    example: &[
        ("current", 60.140_653_040_586_024),
        ("apparent_power", 50_000.0),
        ("voltage", 480.0),
    ],
};

pub const DC_POWER_TO_AMPS: FormulaDescriptor = FormulaDescriptor {
    id: "dc_power_to_amps",
    name: "DC Power to Amps",
    description: "Current drawn by a DC load of known power.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new("current", "I", "Current", UnitFamily::Current, Rule::Positive),
        VariableSpec::new("power", "P", "Power", UnitFamily::Power, Rule::Positive),
        VariableSpec::new("voltage", "V", "Voltage", UnitFamily::Voltage, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "current",
            formula: "I = P / V",
            evaluate: |v| checked_div(v.get("power")?, v.get("voltage")?, "voltage cannot be zero"),
        },
        Rearrangement {
            solves_for: "power",
            formula: "P = I·V",
            evaluate: |v| Ok(v.get("current")? * v.get("voltage")?),
        },
        Rearrangement {
            solves_for: "voltage",
            formula: "V = P / I",
            evaluate: |v| checked_div(v.get("power")?, v.get("current")?, "current cannot be zero"),
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &[],
    example: &[("current", 5.0), ("power", 60.0), ("voltage", 12.0)],
};

// ============================================================================
// Real Power: P = S·pf
// ============================================================================

pub const REAL_POWER: FormulaDescriptor = FormulaDescriptor {
    id: "real_power",
    name: "Real Power",
    description: "Real power delivered by an AC load from apparent power and power factor.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new("real_power", "P", "Real power", UnitFamily::Power, Rule::Positive),
        VariableSpec::new("apparent_power", "S", "Apparent power", UnitFamily::ApparentPower, Rule::Positive),
        VariableSpec::new("power_factor", "pf", "Power factor", UnitFamily::Dimensionless, Rule::Fraction),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "real_power",
            formula: "P = S·pf",
            evaluate: |v| Ok(v.get("apparent_power")? * v.get("power_factor")?),
        },
        Rearrangement {
            solves_for: "apparent_power",
            formula: "S = P / pf",
            evaluate: |v| checked_div(v.get("real_power")?, v.get("power_factor")?, "power factor cannot be zero"),
        },
        Rearrangement {
            solves_for: "power_factor",
            formula: "pf = P / S",
            evaluate: |v| {
                let pf = checked_div(v.get("real_power")?, v.get("apparent_power")?, "apparent power cannot be zero")?;
                ensure(pf <= 1.0, "real power cannot exceed apparent power")?;
                Ok(pf)
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["1 VA of apparent power at unity power factor delivers 1 W"],
    example: &[("real_power", 8000.0), ("apparent_power", 10_000.0), ("power_factor", 0.8)],
};

// ============================================================================
// American Wire Gauge: d = 0.127 mm · 92^((36 − n) / 39)
// ============================================================================

pub const WIRE_GAUGE: FormulaDescriptor = FormulaDescriptor {
    id: "wire_gauge",
    name: "AWG Wire Gauge",
    description: "Conductor diameter for an American Wire Gauge number, and the reverse.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new(
            "gauge",
            "n",
            "AWG number (0000 = -3, 000 = -2, 00 = -1)",
            UnitFamily::Dimensionless,
            Rule::Range { min: -3.0, max: 40.0 },
        ),
        VariableSpec::new("diameter", "d", "Conductor diameter", UnitFamily::Length, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "diameter",
            formula: "d = 0.127 mm · 92^((36 − n) / 39)",
            evaluate: |v| Ok(AWG_36_DIAMETER_M * AWG_DIAMETER_RATIO.powf((36.0 - v.get("gauge")?) / AWG_STEPS)),
        },
        Rearrangement {
            solves_for: "gauge",
            formula: "n = 36 − 39·log₉₂(d / 0.127 mm)",
            evaluate: |v| {
                let ratio = v.get("diameter")? / AWG_36_DIAMETER_M;
                ensure(ratio > 0.0, "diameter must be greater than zero")?;
                Ok(36.0 - AWG_STEPS * ratio.ln() / AWG_DIAMETER_RATIO.ln())
            },
        },
    ],
    derived: &[DerivedQuantity {
        id: "cross_section_area",
        symbol: "A",
        name: "Cross-sectional area",
        family: UnitFamily::Area,
        formula: "A = πd² / 4",
        evaluate: |v| Ok(PI * v.get("diameter")?.powi(2) / 4.0),
    }],
    classifier: None,
    assumptions: &[
        "Solid round conductor",
        "Solving for the gauge from a diameter may return a fractional gauge",
    ],
    example: &[("gauge", 10.0), ("diameter", 0.002_588_186_728_012_863_7)],
};

// ============================================================================
// Wire Resistance: R = ρL / A
// ============================================================================

pub const WIRE_RESISTANCE: FormulaDescriptor = FormulaDescriptor {
    id: "wire_resistance",
    name: "Wire Resistance",
    description: "DC resistance of a uniform conductor.",
    category: FormulaCategory::Electrical,
    variables: &[
        VariableSpec::new("resistance", "R", "Resistance", UnitFamily::Resistance, Rule::Positive),
        VariableSpec::new("resistivity", "ρ", "Resistivity", UnitFamily::Resistivity, Rule::Positive),
        VariableSpec::new("length", "L", "Conductor length", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("area", "A", "Cross-sectional area", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "resistance",
            formula: "R = ρL / A",
            evaluate: |v| {
                checked_div(v.get("resistivity")? * v.get("length")?, v.get("area")?, "area cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "resistivity",
            formula: "ρ = RA / L",
            evaluate: |v| {
                checked_div(v.get("resistance")? * v.get("area")?, v.get("length")?, "length cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "length",
            formula: "L = RA / ρ",
            evaluate: |v| {
                checked_div(v.get("resistance")? * v.get("area")?, v.get("resistivity")?, "resistivity cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = ρL / R",
            evaluate: |v| {
                checked_div(v.get("resistivity")? * v.get("length")?, v.get("resistance")?, "resistance cannot be zero")
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Uniform cross-section", "Resistivity at operating temperature"],
    example: &[
        ("resistance", 1.68),
        ("resistivity", RESISTIVITY_COPPER),
        ("length", 100.0),
        ("area", 1e-6),
    ],
};
