//! Heat transfer: thermal resistance of walls, films and networks.

use crate::constants::STEFAN_BOLTZMANN;
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    checked_div, ensure, BaseValues, DerivedQuantity, Eval, FormulaCategory, FormulaDescriptor,
    Rearrangement, VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[
    THERMAL_RESISTANCE_CONDUCTION,
    THERMAL_RESISTANCE_CONVECTION,
    THERMAL_RESISTANCE_RADIATION,
    THERMAL_RESISTANCE_SERIES,
    THERMAL_RESISTANCE_PARALLEL,
    HEAT_FLOW,
];

pub const THERMAL_RESISTANCE_CONDUCTION: FormulaDescriptor = FormulaDescriptor {
    id: "thermal_resistance_conduction",
    name: "Conduction Resistance",
    description: "Thermal resistance of a plane wall.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("resistance", "R", "Thermal resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("thickness", "L", "Wall thickness", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("conductivity", "k", "Thermal conductivity", UnitFamily::ThermalConductivity, Rule::Positive),
        VariableSpec::new("area", "A", "Area normal to heat flow", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "resistance",
            formula: "R = L / (kA)",
            evaluate: |v| {
                checked_div(v.get("thickness")?, v.get("conductivity")? * v.get("area")?, "conductivity and area must be non-zero")
            },
        },
        Rearrangement {
            solves_for: "thickness",
            formula: "L = R·k·A",
            evaluate: |v| Ok(v.get("resistance")? * v.get("conductivity")? * v.get("area")?),
        },
        Rearrangement {
            solves_for: "conductivity",
            formula: "k = L / (RA)",
            evaluate: |v| {
                checked_div(v.get("thickness")?, v.get("resistance")? * v.get("area")?, "resistance and area must be non-zero")
            },
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = L / (Rk)",
            evaluate: |v| {
                checked_div(v.get("thickness")?, v.get("resistance")? * v.get("conductivity")?, "resistance and conductivity must be non-zero")
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["One-dimensional steady conduction", "Constant conductivity"],
    example: &[
        ("resistance", 0.025),
        ("thickness", 0.2),
        ("conductivity", 0.8),
        ("area", 10.0),
    ],
};

pub const THERMAL_RESISTANCE_CONVECTION: FormulaDescriptor = FormulaDescriptor {
    id: "thermal_resistance_convection",
    name: "Convection Resistance",
    description: "Thermal resistance of a convective surface film.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("resistance", "R", "Thermal resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new(
            "heat_transfer_coefficient",
            "h",
            "Convective heat transfer coefficient",
            UnitFamily::HeatTransferCoefficient,
            Rule::Positive,
        ),
        VariableSpec::new("area", "A", "Surface area", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "resistance",
            formula: "R = 1 / (hA)",
            evaluate: |v| {
                checked_div(1.0, v.get("heat_transfer_coefficient")? * v.get("area")?, "coefficient and area must be non-zero")
            },
        },
        Rearrangement {
            solves_for: "heat_transfer_coefficient",
            formula: "h = 1 / (RA)",
            evaluate: |v| {
                checked_div(1.0, v.get("resistance")? * v.get("area")?, "resistance and area must be non-zero")
            },
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = 1 / (Rh)",
            evaluate: |v| {
                checked_div(1.0, v.get("resistance")? * v.get("heat_transfer_coefficient")?, "resistance and coefficient must be non-zero")
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Uniform film coefficient over the surface"],
    example: &[
        ("resistance", 0.02),
        ("heat_transfer_coefficient", 25.0),
        ("area", 2.0),
    ],
};

// ============================================================================
// Linearized Radiation
// ============================================================================

/// h_rad = εσ(Ts² + Ta²)(Ts + Ta)
fn radiation_coefficient(v: &BaseValues, emissivity: f64) -> Eval {
    let ts = v.get("surface_temperature")?;
    let ta = v.get("ambient_temperature")?;
    Ok(emissivity * STEFAN_BOLTZMANN * (ts * ts + ta * ta) * (ts + ta))
}

pub const THERMAL_RESISTANCE_RADIATION: FormulaDescriptor = FormulaDescriptor {
    id: "thermal_resistance_radiation",
    name: "Radiation Resistance",
    description: "Linearized thermal resistance of radiant exchange with large surroundings.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("resistance", "R", "Thermal resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("emissivity", "ε", "Surface emissivity", UnitFamily::Dimensionless, Rule::Fraction),
        VariableSpec::new(
            "surface_temperature",
            "Ts",
            "Surface temperature",
            UnitFamily::Temperature,
            Rule::AboveAbsoluteZero,
        )
        .input_only(),
        VariableSpec::new(
            "ambient_temperature",
            "Ta",
            "Surroundings temperature",
            UnitFamily::Temperature,
            Rule::AboveAbsoluteZero,
        )
        .input_only(),
        VariableSpec::new("area", "A", "Surface area", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "resistance",
            formula: "R = 1 / (εσ(Ts² + Ta²)(Ts + Ta)·A)",
            evaluate: |v| {
                let h = radiation_coefficient(v, v.get("emissivity")?)?;
                checked_div(1.0, h * v.get("area")?, "radiative conductance is zero")
            },
        },
        Rearrangement {
            solves_for: "emissivity",
            formula: "ε = 1 / (Rσ(Ts² + Ta²)(Ts + Ta)·A)",
            evaluate: |v| {
                let h_per_emissivity = radiation_coefficient(v, 1.0)?;
                let e = checked_div(
                    1.0,
                    v.get("resistance")? * h_per_emissivity * v.get("area")?,
                    "resistance and area must be non-zero",
                )?;
                ensure(e <= 1.0, "resistance is below what a black body could achieve")?;
                Ok(e)
            },
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = 1 / (Rεσ(Ts² + Ta²)(Ts + Ta))",
            evaluate: |v| {
                let h = radiation_coefficient(v, v.get("emissivity")?)?;
                checked_div(1.0, v.get("resistance")? * h, "resistance and emissivity must be non-zero")
            },
        },
    ],
    derived: &[DerivedQuantity {
        id: "radiative_coefficient",
        symbol: "h_rad",
        name: "Radiative heat transfer coefficient",
        family: UnitFamily::HeatTransferCoefficient,
        formula: "h_rad = εσ(Ts² + Ta²)(Ts + Ta)",
        evaluate: |v| radiation_coefficient(v, v.get("emissivity")?),
    }],
    classifier: None,
    assumptions: &[
        "Small gray surface in large isothermal surroundings",
        "Temperatures are absolute; σ = 5.670374419e-8 W/(m²·K⁴)",
    ],
    example: &[
        ("resistance", 0.130_602_136_677_283_96),
        ("emissivity", 0.9),
        ("surface_temperature", 373.15),
        ("ambient_temperature", 293.15),
        ("area", 1.0),
    ],
};

// ============================================================================
// Resistance Networks
// ============================================================================

pub const THERMAL_RESISTANCE_SERIES: FormulaDescriptor = FormulaDescriptor {
    id: "thermal_resistance_series",
    name: "Series Resistance",
    description: "Total resistance of two thermal resistances in series.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("total_resistance", "Rt", "Total resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("resistance_1", "R₁", "First resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("resistance_2", "R₂", "Second resistance", UnitFamily::ThermalResistance, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "total_resistance",
            formula: "Rt = R₁ + R₂",
            evaluate: |v| Ok(v.get("resistance_1")? + v.get("resistance_2")?),
        },
        Rearrangement {
            solves_for: "resistance_1",
            formula: "R₁ = Rt − R₂",
            evaluate: |v| {
                let r = v.get("total_resistance")? - v.get("resistance_2")?;
                ensure(r > 0.0, "total resistance must exceed the other resistance")?;
                Ok(r)
            },
        },
        Rearrangement {
            solves_for: "resistance_2",
            formula: "R₂ = Rt − R₁",
            evaluate: |v| {
                let r = v.get("total_resistance")? - v.get("resistance_1")?;
                ensure(r > 0.0, "total resistance must exceed the other resistance")?;
                Ok(r)
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Same heat flow through both layers"],
    example: &[("total_resistance", 0.5), ("resistance_1", 0.2), ("resistance_2", 0.3)],
};

/// R·Rₖ / (Rₖ − R), the branch that combines with `other` to give `total`
fn parallel_branch(total: f64, other: f64) -> Eval {
    ensure(other > total, "each branch must exceed the combined resistance")?;
    checked_div(total * other, other - total, "each branch must exceed the combined resistance")
}

pub const THERMAL_RESISTANCE_PARALLEL: FormulaDescriptor = FormulaDescriptor {
    id: "thermal_resistance_parallel",
    name: "Parallel Resistance",
    description: "Combined resistance of two thermal paths in parallel.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("total_resistance", "Rt", "Combined resistance", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("resistance_1", "R₁", "First path", UnitFamily::ThermalResistance, Rule::Positive),
        VariableSpec::new("resistance_2", "R₂", "Second path", UnitFamily::ThermalResistance, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "total_resistance",
            formula: "Rt = R₁R₂ / (R₁ + R₂)",
            evaluate: |v| {
                let (r1, r2) = (v.get("resistance_1")?, v.get("resistance_2")?);
                checked_div(r1 * r2, r1 + r2, "resistances cannot sum to zero")
            },
        },
        Rearrangement {
            solves_for: "resistance_1",
            formula: "R₁ = Rt·R₂ / (R₂ − Rt)",
            evaluate: |v| parallel_branch(v.get("total_resistance")?, v.get("resistance_2")?),
        },
        Rearrangement {
            solves_for: "resistance_2",
            formula: "R₂ = Rt·R₁ / (R₁ − Rt)",
            evaluate: |v| parallel_branch(v.get("total_resistance")?, v.get("resistance_1")?),
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Same temperature difference across both paths"],
    example: &[("total_resistance", 3.0), ("resistance_1", 4.0), ("resistance_2", 12.0)],
};

// ============================================================================
// Heat Flow: Q = ΔT / R
// ============================================================================

pub const HEAT_FLOW: FormulaDescriptor = FormulaDescriptor {
    id: "heat_flow",
    name: "Heat Flow",
    description: "Steady heat flow through a thermal resistance.",
    category: FormulaCategory::Thermal,
    variables: &[
        VariableSpec::new("heat_flow", "Q", "Heat flow rate", UnitFamily::Power, Rule::Positive),
        VariableSpec::new(
            "temperature_difference",
            "ΔT",
            "Temperature difference",
            UnitFamily::TemperatureDifference,
            Rule::Positive,
        ),
        VariableSpec::new("resistance", "R", "Thermal resistance", UnitFamily::ThermalResistance, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "heat_flow",
            formula: "Q = ΔT / R",
            evaluate: |v| {
                checked_div(v.get("temperature_difference")?, v.get("resistance")?, "resistance cannot be zero")
            },
        },
        Rearrangement {
            solves_for: "temperature_difference",
            formula: "ΔT = Q·R",
            evaluate: |v| Ok(v.get("heat_flow")? * v.get("resistance")?),
        },
        Rearrangement {
            solves_for: "resistance",
            formula: "R = ΔT / Q",
            evaluate: |v| {
                checked_div(v.get("temperature_difference")?, v.get("heat_flow")?, "heat flow cannot be zero")
            },
        },
    ],
    derived: &[],
    classifier: None,
    assumptions: &["Steady state"],
    example: &[
        ("heat_flow", 2000.0),
        ("temperature_difference", 50.0),
        ("resistance", 0.025),
    ],
};
