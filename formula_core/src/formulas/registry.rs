//! # Formula Registry
//!
//! Declarative descriptors for every formula the solver knows. A descriptor
//! lists its variables (with unit family and validation rule), one evaluator
//! per variable that can be the unknown, optional derived outputs and an
//! optional classifier. The solver never branches on a formula id; it looks
//! up the rearrangement registered for the unknown and calls it.
//!
//! Evaluators work exclusively in base units.
//!
//! ## Usage
//!
//! ```rust
//! use formula_core::formulas::registry::{find_formula, FormulaCategory};
//!
//! let reynolds = find_formula("reynolds_number").unwrap();
//! assert_eq!(reynolds.category, FormulaCategory::Fluids);
//! assert!(reynolds.rearrangement("viscosity").is_some());
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::classify::Classifier;
use crate::errors::{CalcError, CalcResult};
use crate::units::UnitFamily;
use crate::validation::Rule;

use super::{electrical, fluids, geometry, mechanics, number_theory, thermal, waves};

// ============================================================================
// Formula Categories
// ============================================================================

/// Categories for grouping formulas in listings and the reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaCategory {
    Fluids,
    Mechanics,
    Electrical,
    Thermal,
    Waves,
    Geometry,
    NumberTheory,
}

impl FormulaCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Fluids => "Fluid Mechanics",
            FormulaCategory::Mechanics => "Mechanics",
            FormulaCategory::Electrical => "Electrical",
            FormulaCategory::Thermal => "Heat Transfer",
            FormulaCategory::Waves => "Waves",
            FormulaCategory::Geometry => "Geometry",
            FormulaCategory::NumberTheory => "Number Theory",
        }
    }

    /// Sort order for listings (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            FormulaCategory::Fluids => 1,
            FormulaCategory::Mechanics => 2,
            FormulaCategory::Electrical => 3,
            FormulaCategory::Thermal => 4,
            FormulaCategory::Waves => 5,
            FormulaCategory::Geometry => 6,
            FormulaCategory::NumberTheory => 7,
        }
    }

    pub fn all() -> [FormulaCategory; 7] {
        [
            FormulaCategory::Fluids,
            FormulaCategory::Mechanics,
            FormulaCategory::Electrical,
            FormulaCategory::Thermal,
            FormulaCategory::Waves,
            FormulaCategory::Geometry,
            FormulaCategory::NumberTheory,
        ]
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Why an evaluator could not produce a number.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The evaluator read a variable the solver never supplied
    Missing(String),
    /// The math is undefined for these inputs
    Domain(Cow<'static, str>),
}

pub type Eval = Result<f64, EvalError>;

/// Values keyed by variable id, all in base units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseValues(BTreeMap<&'static str, f64>);

impl BaseValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &'static str, value: f64) {
        self.0.insert(id, value);
    }

    pub fn get(&self, id: &str) -> Eval {
        self.0
            .get(id)
            .copied()
            .ok_or_else(|| EvalError::Missing(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }
}

/// `num / den`, or a domain error when the denominator is zero.
pub fn checked_div(num: f64, den: f64, reason: &'static str) -> Eval {
    if den == 0.0 {
        return Err(EvalError::Domain(Cow::Borrowed(reason)));
    }
    Ok(num / den)
}

/// Square root that rejects negative radicands instead of returning NaN.
pub fn checked_sqrt(x: f64, reason: &'static str) -> Eval {
    if x < 0.0 {
        return Err(EvalError::Domain(Cow::Borrowed(reason)));
    }
    Ok(x.sqrt())
}

/// Arcsine restricted to [-1, 1]. Arguments within rounding distance of
/// the bounds are clamped.
pub fn checked_asin(x: f64, reason: &'static str) -> Eval {
    const SLACK: f64 = 1e-12;
    if !(-1.0 - SLACK..=1.0 + SLACK).contains(&x) {
        return Err(EvalError::Domain(Cow::Borrowed(reason)));
    }
    Ok(x.clamp(-1.0, 1.0).asin())
}

/// Fail with `reason` unless `ok` holds.
pub fn ensure(ok: bool, reason: &'static str) -> Result<(), EvalError> {
    if ok {
        Ok(())
    } else {
        Err(EvalError::Domain(Cow::Borrowed(reason)))
    }
}

// ============================================================================
// Descriptor Types
// ============================================================================

/// One named quantity in a formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariableSpec {
    /// Stable identifier used by callers (e.g. "viscosity")
    pub id: &'static str,
    /// Symbol used in formulas and derivations (e.g. "μ")
    pub symbol: &'static str,
    pub name: &'static str,
    pub family: UnitFamily,
    pub rule: Rule,
    /// Whether a rearrangement exists for this variable
    pub solvable: bool,
}

impl VariableSpec {
    pub const fn new(
        id: &'static str,
        symbol: &'static str,
        name: &'static str,
        family: UnitFamily,
        rule: Rule,
    ) -> Self {
        Self {
            id,
            symbol,
            name,
            family,
            rule,
            solvable: true,
        }
    }

    /// Mark the variable as input-only (it can never be the unknown).
    pub const fn input_only(mut self) -> Self {
        self.solvable = false;
        self
    }
}

/// The formula solved for one variable.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rearrangement {
    pub solves_for: &'static str,
    /// Symbolic form shown in derivations
    pub formula: &'static str,
    #[serde(skip)]
    pub evaluate: fn(&BaseValues) -> Eval,
}

/// An extra output computed once every variable has a value.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DerivedQuantity {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub family: UnitFamily,
    pub formula: &'static str,
    #[serde(skip)]
    pub evaluate: fn(&BaseValues) -> Eval,
}

/// Complete declaration of a formula.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FormulaDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FormulaCategory,
    pub variables: &'static [VariableSpec],
    pub rearrangements: &'static [Rearrangement],
    pub derived: &'static [DerivedQuantity],
    pub classifier: Option<Classifier>,
    pub assumptions: &'static [&'static str],
    /// A consistent set of values for every variable, in base units
    pub example: &'static [(&'static str, f64)],
}

impl FormulaDescriptor {
    pub fn variable(&self, id: &str) -> Option<&'static VariableSpec> {
        self.variables.iter().find(|v| v.id == id)
    }

    pub fn rearrangement(&self, id: &str) -> Option<&'static Rearrangement> {
        self.rearrangements.iter().find(|r| r.solves_for == id)
    }

    pub fn derived_quantity(&self, id: &str) -> Option<&'static DerivedQuantity> {
        self.derived.iter().find(|d| d.id == id)
    }

    /// Number of known values a calculation needs
    pub fn required_inputs(&self) -> usize {
        self.variables.len().saturating_sub(1)
    }

    /// Plain form of the defining equation (the first rearrangement, or the
    /// first derived output for evaluate-only formulas)
    pub fn primary_formula(&self) -> &'static str {
        self.rearrangements
            .first()
            .map(|r| r.formula)
            .or_else(|| self.derived.first().map(|d| d.formula))
            .unwrap_or("")
    }

    pub fn example_values(&self) -> BaseValues {
        let mut values = BaseValues::new();
        for (id, value) in self.example {
            values.insert(id, *value);
        }
        values
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Every registered formula, in category order.
pub static ALL_FORMULAS: Lazy<Vec<&'static FormulaDescriptor>> = Lazy::new(|| {
    let mut all: Vec<&'static FormulaDescriptor> = fluids::FORMULAS
        .iter()
        .chain(mechanics::FORMULAS)
        .chain(electrical::FORMULAS)
        .chain(thermal::FORMULAS)
        .chain(waves::FORMULAS)
        .chain(geometry::FORMULAS)
        .chain(number_theory::FORMULAS)
        .collect();
    all.sort_by_key(|f| f.category.sort_order());
    all
});

static INDEX: Lazy<HashMap<&'static str, &'static FormulaDescriptor>> =
    Lazy::new(|| ALL_FORMULAS.iter().map(|f| (f.id, *f)).collect());

/// Look up a formula by id.
pub fn find_formula(id: &str) -> CalcResult<&'static FormulaDescriptor> {
    INDEX.get(id).copied().ok_or_else(|| {
        tracing::error!(formula = id, "formula not registered");
        CalcError::unknown_formula(id)
    })
}

/// Formulas in one category
pub fn in_category(category: FormulaCategory) -> Vec<&'static FormulaDescriptor> {
    ALL_FORMULAS
        .iter()
        .copied()
        .filter(|f| f.category == category)
        .collect()
}

// ============================================================================
// Markdown Generation for FORMULAS.md
// ============================================================================

/// Generate a complete FORMULAS.md reference from the registry.
///
/// # Example
///
/// ```rust
/// use formula_core::formulas::registry::generate_formulas_markdown;
///
/// let markdown = generate_formulas_markdown();
/// assert!(markdown.contains("# Formula Reference"));
/// assert!(markdown.contains("### Reynolds Number"));
/// ```
pub fn generate_formulas_markdown() -> String {
    let mut output = String::with_capacity(32_000);

    output.push_str(
        r#"# Formula Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

Every formula the solver can evaluate, grouped by category. Each entry lists
its variables with their base units and constraints, the rearrangement used
for each unknown, any derived outputs, and a worked example in base units.

---

"#,
    );

    let mut category_count = 0;
    for category in FormulaCategory::all() {
        let formulas = in_category(category);
        if formulas.is_empty() {
            continue;
        }
        category_count += 1;

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in formulas {
            output.push_str(&format!("### {}\n\n", formula.name));
            output.push_str(&format!("`{}`: {}\n\n", formula.id, formula.description));

            output.push_str("**Variables:**\n\n");
            output.push_str("| Id | Symbol | Name | Base Unit | Constraint | Solvable |\n");
            output.push_str("|----|--------|------|-----------|------------|----------|\n");
            for var in formula.variables {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    var.id,
                    var.symbol,
                    var.name,
                    display_unit(var.family.base().symbol),
                    var.rule.describe(),
                    if var.solvable { "yes" } else { "input only" }
                ));
            }
            output.push('\n');

            if !formula.rearrangements.is_empty() {
                output.push_str("**Rearrangements:**\n\n");
                for r in formula.rearrangements {
                    output.push_str(&format!("- `{}`: `{}`\n", r.solves_for, r.formula));
                }
                output.push('\n');
            }

            if !formula.derived.is_empty() {
                output.push_str("**Derived outputs:**\n\n");
                for d in formula.derived {
                    output.push_str(&format!(
                        "- {} ({}): `{}` [{}]\n",
                        d.name,
                        d.symbol,
                        d.formula,
                        display_unit(d.family.base().symbol)
                    ));
                }
                output.push('\n');
            }

            if let Some(classifier) = &formula.classifier {
                output.push_str(&format!("**Classification of `{}`:**\n\n", classifier.variable));
                for band in classifier.bands {
                    let op = if band.inclusive { "≤" } else { "<" };
                    output.push_str(&format!("- {} {}: {}\n", op, band.below, band.label));
                }
                output.push_str(&format!("- otherwise: {}\n\n", classifier.otherwise));
            }

            if !formula.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in formula.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            if !formula.example.is_empty() {
                let pairs: Vec<String> = formula
                    .example
                    .iter()
                    .map(|(id, value)| format!("{} = {}", id, value))
                    .collect();
                output.push_str(&format!("**Example (base units):** {}\n\n", pairs.join(", ")));
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Formulas:** {}\n- **Categories:** {}\n",
        ALL_FORMULAS.len(),
        category_count
    ));

    output
}

/// Write the reference to `path`, returning the number of bytes written.
pub fn write_formulas_markdown(path: &Path) -> CalcResult<usize> {
    let markdown = generate_formulas_markdown();
    fs::write(path, &markdown).map_err(|e| CalcError::Internal {
        message: format!("Cannot write {}: {}", path.display(), e),
    })?;
    tracing::debug!(path = %path.display(), bytes = markdown.len(), "wrote formula reference");
    Ok(markdown.len())
}

fn display_unit(symbol: &str) -> &str {
    if symbol.is_empty() {
        "(dimensionless)"
    } else {
        symbol
    }
}

// ============================================================================
// Tests
// ============================================================================
