//! Plane geometry: circles, regular hexagons and parabolas.

use std::f64::consts::PI;

use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    checked_div, checked_sqrt, ensure, BaseValues, DerivedQuantity, Eval, FormulaCategory,
    FormulaDescriptor, Rearrangement, VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[
    CIRCLE_DIAMETER,
    CIRCLE_CIRCUMFERENCE,
    CIRCLE_AREA,
    REGULAR_HEXAGON,
    PARABOLA,
];

// ============================================================================
// Circle
// ============================================================================

const RADIUS: VariableSpec =
    VariableSpec::new("radius", "r", "Radius", UnitFamily::Length, Rule::Positive);

const DIAMETER: DerivedQuantity = DerivedQuantity {
    id: "diameter",
    symbol: "d",
    name: "Diameter",
    family: UnitFamily::Length,
    formula: "d = 2r",
    evaluate: |v| Ok(2.0 * v.get("radius")?),
};

const CIRCUMFERENCE: DerivedQuantity = DerivedQuantity {
    id: "circumference",
    symbol: "C",
    name: "Circumference",
    family: UnitFamily::Length,
    formula: "C = 2πr",
    evaluate: |v| Ok(2.0 * PI * v.get("radius")?),
};

const AREA: DerivedQuantity = DerivedQuantity {
    id: "area",
    symbol: "A",
    name: "Area",
    family: UnitFamily::Area,
    formula: "A = πr²",
    evaluate: |v| Ok(PI * v.get("radius")?.powi(2)),
};

pub const CIRCLE_DIAMETER: FormulaDescriptor = FormulaDescriptor {
    id: "circle_diameter",
    name: "Circle Radius from Diameter",
    description: "Radius of a circle from its diameter, with circumference and area.",
    category: FormulaCategory::Geometry,
    variables: &[
        RADIUS,
        VariableSpec::new("diameter", "d", "Diameter", UnitFamily::Length, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "radius",
            formula: "r = d / 2",
            evaluate: |v| Ok(v.get("diameter")? / 2.0),
        },
        Rearrangement {
            solves_for: "diameter",
            formula: "d = 2r",
            evaluate: |v| Ok(2.0 * v.get("radius")?),
        },
    ],
    derived: &[CIRCUMFERENCE, AREA],
    classifier: None,
    assumptions: &[],
    example: &[("radius", 0.5), ("diameter", 1.0)],
};

pub const CIRCLE_CIRCUMFERENCE: FormulaDescriptor = FormulaDescriptor {
    id: "circle_circumference",
    name: "Circle Radius from Circumference",
    description: "Radius of a circle from its circumference, with diameter and area.",
    category: FormulaCategory::Geometry,
    variables: &[
        RADIUS,
        VariableSpec::new("circumference", "C", "Circumference", UnitFamily::Length, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "radius",
            formula: "r = C / (2π)",
            evaluate: |v| Ok(v.get("circumference")? / (2.0 * PI)),
        },
        Rearrangement {
            solves_for: "circumference",
            formula: "C = 2πr",
            evaluate: |v| Ok(2.0 * PI * v.get("radius")?),
        },
    ],
    derived: &[DIAMETER, AREA],
    classifier: None,
    assumptions: &[],
    example: &[("radius", 0.5), ("circumference", PI)],
};

pub const CIRCLE_AREA: FormulaDescriptor = FormulaDescriptor {
    id: "circle_area",
    name: "Circle Radius from Area",
    description: "Radius of a circle from its area, with diameter and circumference.",
    category: FormulaCategory::Geometry,
    variables: &[
        RADIUS,
        VariableSpec::new("area", "A", "Area", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "radius",
            formula: "r = √(A / π)",
            evaluate: |v| checked_sqrt(v.get("area")? / PI, "area cannot be negative"),
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = πr²",
            evaluate: |v| Ok(PI * v.get("radius")?.powi(2)),
        },
    ],
    derived: &[DIAMETER, CIRCUMFERENCE],
    classifier: None,
    assumptions: &[],
    example: &[("radius", 0.5), ("area", 0.785_398_163_397_448_3)],
};

// ============================================================================
// Regular Hexagon: A = (3√3 / 2)·s²
// ============================================================================

const HEXAGON_AREA_FACTOR: f64 = 2.598_076_211_353_316;

pub const REGULAR_HEXAGON: FormulaDescriptor = FormulaDescriptor {
    id: "regular_hexagon",
    name: "Regular Hexagon",
    description: "Side length and area of a regular hexagon.",
    category: FormulaCategory::Geometry,
    variables: &[
        VariableSpec::new("side", "s", "Side length", UnitFamily::Length, Rule::Positive),
        VariableSpec::new("area", "A", "Area", UnitFamily::Area, Rule::Positive),
    ],
    rearrangements: &[
        Rearrangement {
            solves_for: "side",
            formula: "s = √(2A / (3√3))",
            evaluate: |v| checked_sqrt(v.get("area")? / HEXAGON_AREA_FACTOR, "area cannot be negative"),
        },
        Rearrangement {
            solves_for: "area",
            formula: "A = (3√3 / 2)·s²",
            evaluate: |v| Ok(HEXAGON_AREA_FACTOR * v.get("side")?.powi(2)),
        },
    ],
    derived: &[
        DerivedQuantity {
            id: "perimeter",
            symbol: "P",
            name: "Perimeter",
            family: UnitFamily::Length,
            formula: "P = 6s",
            evaluate: |v| Ok(6.0 * v.get("side")?),
        },
        DerivedQuantity {
            id: "apothem",
            symbol: "a",
            name: "Apothem (inradius)",
            family: UnitFamily::Length,
            formula: "a = (√3 / 2)·s",
            evaluate: |v| Ok(3.0_f64.sqrt() / 2.0 * v.get("side")?),
        },
    ],
    classifier: None,
    assumptions: &["The circumradius equals the side length"],
    example: &[("side", 2.0), ("area", 10.392_304_845_413_264)],
};

// ============================================================================
// Parabola: y = ax² + bx + c
// ============================================================================

const NOT_A_PARABOLA: &str = "a = 0 describes a line, not a parabola";

fn vertex_x(v: &BaseValues) -> Eval {
    checked_div(-v.get("b")?, 2.0 * v.get("a")?, NOT_A_PARABOLA)
}

fn vertex_y(v: &BaseValues) -> Eval {
    let b = v.get("b")?;
    Ok(v.get("c")? - b * b / (4.0 * nonzero_a(v)?))
}

fn focal_offset(v: &BaseValues) -> Eval {
    Ok(1.0 / (4.0 * nonzero_a(v)?))
}

fn nonzero_a(v: &BaseValues) -> Eval {
    let a = v.get("a")?;
    ensure(a != 0.0, NOT_A_PARABOLA)?;
    Ok(a)
}

pub const PARABOLA: FormulaDescriptor = FormulaDescriptor {
    id: "parabola",
    name: "Parabola Properties",
    description: "Vertex, focus and directrix of y = ax² + bx + c.",
    category: FormulaCategory::Geometry,
    variables: &[
        VariableSpec::new("a", "a", "Quadratic coefficient", UnitFamily::Dimensionless, Rule::Any).input_only(),
        VariableSpec::new("b", "b", "Linear coefficient", UnitFamily::Dimensionless, Rule::Any).input_only(),
        VariableSpec::new("c", "c", "Constant term", UnitFamily::Dimensionless, Rule::Any).input_only(),
    ],
    rearrangements: &[],
    derived: &[
        DerivedQuantity {
            id: "vertex_x",
            symbol: "h",
            name: "Vertex x",
            family: UnitFamily::Dimensionless,
            formula: "h = −b / (2a)",
            evaluate: vertex_x,
        },
        DerivedQuantity {
            id: "vertex_y",
            symbol: "k",
            name: "Vertex y",
            family: UnitFamily::Dimensionless,
            formula: "k = c − b² / (4a)",
            evaluate: vertex_y,
        },
        DerivedQuantity {
            id: "focus_y",
            symbol: "y_f",
            name: "Focus y (focus x equals vertex x)",
            family: UnitFamily::Dimensionless,
            formula: "y_f = k + 1 / (4a)",
            evaluate: |v| Ok(vertex_y(v)? + focal_offset(v)?),
        },
        DerivedQuantity {
            id: "directrix_y",
            symbol: "y_d",
            name: "Directrix",
            family: UnitFamily::Dimensionless,
            formula: "y = k − 1 / (4a)",
            evaluate: |v| Ok(vertex_y(v)? - focal_offset(v)?),
        },
        DerivedQuantity {
            id: "discriminant",
            symbol: "Δ",
            name: "Discriminant",
            family: UnitFamily::Dimensionless,
            formula: "Δ = b² − 4ac",
            evaluate: |v| {
                let b = v.get("b")?;
                Ok(b * b - 4.0 * v.get("a")? * v.get("c")?)
            },
        },
    ],
    classifier: None,
    assumptions: &["Vertical axis of symmetry"],
    example: &[("a", 1.0), ("b", -4.0), ("c", 3.0)],
};
