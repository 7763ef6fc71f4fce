//! # Solver
//!
//! Turns a formula descriptor plus a set of known quantities into a result:
//!
//! 1. Pick the unknown (explicit selection, or the one variable left out)
//! 2. Validate each known value against its rule, in the unit it was entered
//! 3. Convert knowns to base units
//! 4. Evaluate the rearrangement registered for the unknown
//! 5. Convert back to the requested unit and assemble the derivation
//!
//! When every variable is supplied, a formula with derived outputs evaluates
//! its first derived quantity instead.
//!
//! ## Example
//!
//! ```rust
//! use formula_core::solver::{calculate, KnownValue};
//!
//! let result = calculate(
//!     "hydrostatic_pressure",
//!     &[
//!         KnownValue::new("density", "1000", "kg/m³"),
//!         KnownValue::new("gravity", "9.81", "m/s²"),
//!         KnownValue::new("depth", "12", "m"),
//!     ],
//!     Some("kPa"),
//!     None,
//! )
//! .unwrap();
//!
//! assert_eq!(result.solved_for, "pressure");
//! assert_eq!(result.formatted, "117.72 kPa");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::format::{format_quantity, FormatSettings};
use crate::formulas::registry::{
    find_formula, BaseValues, DerivedQuantity, Eval, EvalError, FormulaDescriptor,
    Rearrangement, VariableSpec, ALL_FORMULAS,
};
use crate::quantity::Quantity;
use crate::settings::Settings;
use crate::units::{UnitDef, UnitFamily};

// ============================================================================
// Request / Result Types
// ============================================================================

/// One raw form field: variable id, the text typed, and the selected unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownValue {
    pub variable: String,
    pub raw_value: String,
    pub unit: String,
}

impl KnownValue {
    pub fn new(variable: impl Into<String>, raw_value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            raw_value: raw_value.into(),
            unit: unit.into(),
        }
    }
}

/// Parsed input to [`Solver::solve`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationRequest {
    /// Known quantities keyed by variable id
    pub known: BTreeMap<String, Quantity>,
    /// Variable or derived-output id to solve for; inferred when `None`
    pub solve_for: Option<String>,
    /// Unit for the result; the base unit when `None`
    pub output_unit: Option<String>,
}

impl CalculationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known(mut self, variable: impl Into<String>, quantity: Quantity) -> Self {
        self.known.insert(variable.into(), quantity);
        self
    }

    pub fn solving_for(mut self, variable: impl Into<String>) -> Self {
        self.solve_for = Some(variable.into());
        self
    }

    pub fn in_unit(mut self, unit: impl Into<String>) -> Self {
        self.output_unit = Some(unit.into());
        self
    }
}

/// A secondary output, reported in base units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedValue {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub formatted: String,
}

/// Outcome of a calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "formula": "reynolds_number",
///   "solved_for": "reynolds_number",
///   "symbol": "Re",
///   "value": 200000.0,
///   "unit": "",
///   "base_value": 200000.0,
///   "base_unit": "",
///   "formatted": "200000",
///   "derivation_steps": ["Re = ρvD / μ", "..."],
///   "classification": "Turbulent",
///   "derived": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub formula: String,
    /// Variable or derived-output id the value belongs to
    pub solved_for: String,
    pub symbol: String,
    /// Value in the requested unit
    pub value: f64,
    pub unit: String,
    pub base_value: f64,
    pub base_unit: String,
    /// `value` and `unit` rendered for display
    pub formatted: String,
    pub derivation_steps: Vec<String>,
    pub classification: Option<String>,
    /// Companion outputs, excluding the primary result
    pub derived: Vec<DerivedValue>,
}

// ============================================================================
// Target Selection
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Output {
    Variable(&'static VariableSpec),
    Derived(&'static DerivedQuantity),
}

impl Output {
    fn id(&self) -> &'static str {
        match self {
            Output::Variable(v) => v.id,
            Output::Derived(d) => d.id,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Output::Variable(v) => v.symbol,
            Output::Derived(d) => d.symbol,
        }
    }

    fn family(&self) -> UnitFamily {
        match self {
            Output::Variable(v) => v.family,
            Output::Derived(d) => d.family,
        }
    }
}

/// Which variable gets computed (if any) and which value is reported.
#[derive(Debug, Clone, Copy)]
struct Plan {
    unknown: Option<(&'static VariableSpec, &'static Rearrangement)>,
    output: Output,
}

fn missing_variables(formula: &'static FormulaDescriptor, request: &CalculationRequest) -> Vec<&'static VariableSpec> {
    formula
        .variables
        .iter()
        .filter(|v| !request.known.contains_key(v.id))
        .collect()
}

fn ambiguous(formula: &FormulaDescriptor, missing: &[&VariableSpec]) -> CalcError {
    CalcError::AmbiguousUnknown {
        formula: formula.id.to_string(),
        missing: missing.iter().map(|v| v.id.to_string()).collect(),
        required: formula.required_inputs(),
    }
}

fn unknown_variable(
    formula: &'static FormulaDescriptor,
    var: &'static VariableSpec,
) -> CalcResult<(&'static VariableSpec, &'static Rearrangement)> {
    if !var.solvable {
        return Err(CalcError::invalid_input(
            var.id,
            "?",
            "cannot be solved for; enter it as a known value",
        ));
    }
    match formula.rearrangement(var.id) {
        Some(r) => Ok((var, r)),
        None => {
            tracing::error!(formula = formula.id, variable = var.id, "no rearrangement registered");
            Err(CalcError::UnsupportedRearrangement {
                formula: formula.id.to_string(),
                variable: var.id.to_string(),
            })
        }
    }
}

fn plan(formula: &'static FormulaDescriptor, request: &CalculationRequest) -> CalcResult<Plan> {
    let missing = missing_variables(formula, request);

    if let Some(selected) = request.solve_for.as_deref() {
        if let Some(var) = formula.variable(selected) {
            // a value supplied for the selected variable is ignored
            let others: Vec<_> = missing.iter().copied().filter(|v| v.id != var.id).collect();
            if !others.is_empty() {
                return Err(ambiguous(formula, &others));
            }
            return Ok(Plan {
                unknown: Some(unknown_variable(formula, var)?),
                output: Output::Variable(var),
            });
        }
        if let Some(derived) = formula.derived_quantity(selected) {
            let unknown = match missing.as_slice() {
                [] => None,
                [var] => Some(unknown_variable(formula, *var)?),
                _ => return Err(ambiguous(formula, &missing)),
            };
            return Ok(Plan {
                unknown,
                output: Output::Derived(derived),
            });
        }
        return Err(CalcError::unknown_variable(formula.id, selected));
    }

    match missing.as_slice() {
        [] => match formula.derived.first() {
            Some(derived) => Ok(Plan {
                unknown: None,
                output: Output::Derived(derived),
            }),
            None => Err(CalcError::Overdetermined {
                formula: formula.id.to_string(),
                supplied: request.known.len(),
                required: formula.required_inputs(),
            }),
        },
        [var] => Ok(Plan {
            unknown: Some(unknown_variable(formula, *var)?),
            output: Output::Variable(*var),
        }),
        _ => Err(ambiguous(formula, &missing)),
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Stateless calculator carrying display settings.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    format: FormatSettings,
}

impl Solver {
    pub fn new(settings: &Settings) -> Self {
        Self {
            format: settings.format.clone(),
        }
    }

    /// Solve a parsed request against `formula`.
    pub fn solve(&self, formula: &'static FormulaDescriptor, request: &CalculationRequest) -> CalcResult<CalculationResult> {
        for (id, quantity) in &request.known {
            let var = formula
                .variable(id)
                .ok_or_else(|| CalcError::unknown_variable(formula.id, id.as_str()))?;
            if quantity.family() != var.family {
                return Err(CalcError::unknown_unit(var.family.id(), quantity.unit()));
            }
        }

        let plan = plan(formula, request)?;
        let unknown_id = plan.unknown.map(|(var, _)| var.id);
        tracing::debug!(
            formula = formula.id,
            unknown = unknown_id.unwrap_or("-"),
            output = plan.output.id(),
            "selected target"
        );

        let output_family = plan.output.family();
        let output_def: &'static UnitDef = match request.output_unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => output_family.lookup(unit)?,
            _ => output_family.base(),
        };

        // Validate and convert, in declaration order
        let mut values = BaseValues::new();
        let mut knowns: Vec<(&'static VariableSpec, &Quantity)> = Vec::new();
        for var in formula.variables {
            if Some(var.id) == unknown_id {
                continue;
            }
            if let Some(quantity) = request.known.get(var.id) {
                var.rule.check(var.id, quantity)?;
                let base = quantity.to_base();
                tracing::debug!(variable = var.id, value = quantity.value(), unit = quantity.unit(), base, "converted to base");
                values.insert(var.id, base);
                knowns.push((var, quantity));
            }
        }

        let mut steps = Vec::new();
        if let Some((_, rearrangement)) = plan.unknown {
            steps.push(rearrangement.formula.to_string());
        }
        if let Output::Derived(derived) = plan.output {
            steps.push(derived.formula.to_string());
        }
        for (var, quantity) in &knowns {
            if !quantity.is_base() {
                steps.push(format!(
                    "{}: {} → {}",
                    var.symbol,
                    format_quantity(quantity.value(), quantity.unit(), &self.format),
                    format_quantity(quantity.to_base(), var.family.base().symbol, &self.format)
                ));
            }
        }
        if !knowns.is_empty() {
            let substituted: Vec<String> = knowns
                .iter()
                .map(|(var, quantity)| {
                    format!(
                        "{} = {}",
                        var.symbol,
                        format_quantity(quantity.to_base(), var.family.base().symbol, &self.format)
                    )
                })
                .collect();
            steps.push(format!("Substituting: {}", substituted.join(", ")));
        }

        if let Some((var, rearrangement)) = plan.unknown {
            let value = evaluate(formula, var.id, rearrangement.evaluate, &values)?;
            self.check_solved(formula, var, value)?;
            tracing::debug!(variable = var.id, value, "evaluated rearrangement");
            values.insert(var.id, value);
            if let Output::Derived(_) = plan.output {
                steps.push(format!(
                    "{} = {}",
                    var.symbol,
                    format_quantity(value, var.family.base().symbol, &self.format)
                ));
            }
        }

        let base_value = match plan.output {
            Output::Variable(var) => values
                .get(var.id)
                .map_err(|e| internal(formula, var.id, e))?,
            Output::Derived(derived) => evaluate(formula, derived.id, derived.evaluate, &values)?,
        };

        let value = output_def.conversion.from_base(base_value);
        if !value.is_finite() {
            return Err(CalcError::domain(
                formula.id,
                plan.output.id(),
                "result is not a finite number in the requested unit",
            ));
        }

        let base_unit = output_family.base().symbol;
        let symbol = plan.output.symbol();
        steps.push(format!("{} = {}", symbol, format_quantity(base_value, base_unit, &self.format)));
        if output_def.symbol != base_unit {
            steps.push(format!("{} = {}", symbol, format_quantity(value, output_def.symbol, &self.format)));
        }

        let classification = formula.classifier.as_ref().and_then(|classifier| {
            values
                .get(classifier.variable)
                .ok()
                .map(|v| classifier.classify(v).to_string())
        });
        if let Some(label) = &classification {
            steps.push(format!("Classification: {}", label));
        }

        let derived = formula
            .derived
            .iter()
            .filter(|d| d.id != plan.output.id())
            .filter_map(|d| match (d.evaluate)(&values) {
                Ok(v) if v.is_finite() => Some(DerivedValue {
                    id: d.id.to_string(),
                    symbol: d.symbol.to_string(),
                    name: d.name.to_string(),
                    value: v,
                    unit: d.family.base().symbol.to_string(),
                    formatted: format_quantity(v, d.family.base().symbol, &self.format),
                }),
                other => {
                    tracing::debug!(derived = d.id, result = ?other, "derived output skipped");
                    None
                }
            })
            .collect();

        Ok(CalculationResult {
            formula: formula.id.to_string(),
            solved_for: plan.output.id().to_string(),
            symbol: symbol.to_string(),
            value,
            unit: output_def.symbol.to_string(),
            base_value,
            base_unit: base_unit.to_string(),
            formatted: format_quantity(value, output_def.symbol, &self.format),
            derivation_steps: steps,
            classification,
            derived,
        })
    }

    /// A solved value must satisfy the rule it is held to as an input.
    fn check_solved(&self, formula: &FormulaDescriptor, var: &VariableSpec, value: f64) -> CalcResult<()> {
        var.rule
            .check(var.id, &Quantity::base(value, var.family))
            .map_err(|e| match e {
                CalcError::InvalidInput { reason, .. } => CalcError::domain(
                    formula.id,
                    var.id,
                    format!(
                        "solved value {} {}",
                        format_quantity(value, var.family.base().symbol, &self.format),
                        reason
                    ),
                ),
                other => other,
            })
    }

    /// Parse raw form fields and solve. Blank fields count as not supplied.
    pub fn calculate(
        &self,
        formula_id: &str,
        known: &[KnownValue],
        output_unit: Option<&str>,
        solve_for: Option<&str>,
    ) -> CalcResult<CalculationResult> {
        let formula = find_formula(formula_id.trim())?;
        let mut request = CalculationRequest::new();

        for field in known {
            let variable = field.variable.trim();
            let spec = formula
                .variable(variable)
                .ok_or_else(|| CalcError::unknown_variable(formula.id, variable))?;
            let raw = field.raw_value.trim();
            if raw.is_empty() {
                continue;
            }
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CalcError::parse(spec.id, raw))?;
            if request.known.contains_key(spec.id) {
                return Err(CalcError::invalid_input(spec.id, raw, "was supplied more than once"));
            }
            let quantity = Quantity::new(value, field.unit.trim(), spec.family)?;
            request.known.insert(spec.id.to_string(), quantity);
        }

        request.output_unit = output_unit.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);
        request.solve_for = solve_for.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        self.solve(formula, &request)
    }
}

fn internal(formula: &FormulaDescriptor, target: &str, error: EvalError) -> CalcError {
    let message = match error {
        EvalError::Missing(id) => format!("{} for '{}' read '{}' which has no value", formula.id, target, id),
        EvalError::Domain(reason) => format!("{} for '{}': {}", formula.id, target, reason),
    };
    tracing::error!(%message, "formula registration error");
    CalcError::Internal { message }
}

fn evaluate(
    formula: &FormulaDescriptor,
    target: &str,
    evaluator: fn(&BaseValues) -> Eval,
    values: &BaseValues,
) -> CalcResult<f64> {
    match evaluator(values) {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(CalcError::domain(formula.id, target, "result is not a finite number")),
        Err(EvalError::Domain(reason)) => Err(CalcError::domain(formula.id, target, reason)),
        Err(missing @ EvalError::Missing(_)) => Err(internal(formula, target, missing)),
    }
}

// ============================================================================
// Convenience Entry Points
// ============================================================================

/// Solve with default display settings.
pub fn solve(formula: &'static FormulaDescriptor, request: &CalculationRequest) -> CalcResult<CalculationResult> {
    Solver::default().solve(formula, request)
}

/// Parse raw fields and solve with default display settings.
pub fn calculate(
    formula_id: &str,
    known: &[KnownValue],
    output_unit: Option<&str>,
    solve_for: Option<&str>,
) -> CalcResult<CalculationResult> {
    Solver::default().calculate(formula_id, known, output_unit, solve_for)
}

/// Variables of a formula, for rendering input fields.
pub fn list_variables(formula_id: &str) -> CalcResult<&'static [VariableSpec]> {
    Ok(find_formula(formula_id)?.variables)
}

/// Every registered formula, in category order.
pub fn list_formulas() -> &'static [&'static FormulaDescriptor] {
    ALL_FORMULAS.as_slice()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas::registry::FormulaCategory;
    use crate::validation::Rule;

    fn kv(variable: &str, raw: &str, unit: &str) -> KnownValue {
        KnownValue::new(variable, raw, unit)
    }

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= rel * expected.abs().max(1e-300),
            "expected {} within {} relative, got {}",
            expected,
            rel,
            actual
        );
    }

    // ------------------------------------------------------------------------
    // Worked examples
    // ------------------------------------------------------------------------

    #[test]
    fn test_hydrostatic_pressure_fixture() {
        let result = calculate(
            "hydrostatic_pressure",
            &[kv("density", "1000", "kg/m³"), kv("gravity", "9.81", "m/s²"), kv("depth", "12", "m")],
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.solved_for, "pressure");
        assert_eq!(result.unit, "Pa");
        assert_close(result.value, 117_720.0, 1e-12);
        assert_eq!(result.formatted, "117720 Pa");
    }

    #[test]
    fn test_max_height_fixture() {
        let result = calculate(
            "max_height",
            &[kv("initial_velocity", "20", "m/s"), kv("launch_angle", "60", "°"), kv("gravity", "9.81", "m/s²")],
            None,
            None,
        )
        .unwrap();
        assert!((result.value - 15.3).abs() < 0.05, "got {}", result.value);
        assert_eq!(result.formatted, "15.2905 m");
        let apex = result.derived.iter().find(|d| d.id == "time_to_apex").unwrap();
        assert_close(apex.value, 20.0 * (60f64.to_radians()).sin() / 9.81, 1e-9);
    }

    #[test]
    fn test_piston_speed_fixture() {
        let result = calculate(
            "piston_speed",
            &[kv("engine_speed", "6500", "rpm"), kv("stroke", "101", "mm")],
            None,
            None,
        )
        .unwrap();
        // 2 × 0.101 m × 6500 / 60
        assert_close(result.value, 21.883_333_333_333_333, 1e-12);
        assert_close(result.value, 21.83, 0.01);
    }

    #[test]
    fn test_three_phase_fixture() {
        let result = calculate(
            "kva_to_amps_three_phase",
            &[kv("apparent_power", "50", "kVA"), kv("voltage", "480", "V")],
            Some("A"),
            None,
        )
        .unwrap();
        assert!((result.value - 60.16).abs() < 0.05, "got {}", result.value);
    }

    #[test]
    fn test_orbital_velocity_fixture() {
        let result = calculate(
            "orbital_velocity",
            &[
                kv("central_mass", "1", "M⊕"),
                kv("body_radius", "6371", "km"),
                kv("altitude", "400", "km"),
            ],
            None,
            None,
        )
        .unwrap();
        assert_close(result.value, 7669.0, 0.01);
        let period = result.derived.iter().find(|d| d.id == "orbital_period").unwrap();
        assert_eq!(period.unit, "s");
        assert_close(period.value, 5564.0, 0.01);
    }

    #[test]
    fn test_orbital_period_as_primary_output() {
        let result = calculate(
            "orbital_velocity",
            &[
                kv("central_mass", "5.972e24", "kg"),
                kv("body_radius", "6371", "km"),
                kv("altitude", "400", "km"),
            ],
            Some("min"),
            Some("orbital_period"),
        )
        .unwrap();
        assert_eq!(result.solved_for, "orbital_period");
        assert_eq!(result.unit, "min");
        assert_close(result.value * 60.0, result.base_value, 1e-12);
        assert!(result.derivation_steps.iter().any(|s| s.starts_with("v = ")));
    }

    // ------------------------------------------------------------------------
    // Self-consistency
    // ------------------------------------------------------------------------

    #[test]
    fn test_reynolds_round_trip() {
        let forward = calculate(
            "reynolds_number",
            &[
                kv("density", "1000", "kg/m³"),
                kv("velocity", "2", "m/s"),
                kv("diameter", "0.1", "m"),
                kv("viscosity", "0.001", "Pa·s"),
            ],
            None,
            None,
        )
        .unwrap();
        assert_close(forward.value, 200_000.0, 1e-12);
        assert_eq!(forward.classification.as_deref(), Some("Turbulent"));

        let back = calculate(
            "reynolds_number",
            &[
                kv("reynolds_number", &forward.value.to_string(), ""),
                kv("density", "1000", "kg/m³"),
                kv("velocity", "2", "m/s"),
                kv("diameter", "0.1", "m"),
            ],
            None,
            None,
        )
        .unwrap();
        assert_eq!(back.solved_for, "viscosity");
        assert_close(back.value, 0.001, 1e-12);
    }

    #[test]
    fn test_every_example_cross_solves_through_calculate() {
        for formula in list_formulas() {
            for var in formula.variables.iter().filter(|v| v.solvable) {
                let known: Vec<KnownValue> = formula
                    .example
                    .iter()
                    .filter(|(id, _)| *id != var.id)
                    .map(|(id, value)| {
                        let family = formula.variable(id).unwrap().family;
                        KnownValue::new(*id, format!("{:e}", value), family.base().symbol)
                    })
                    .collect();
                let result = calculate(formula.id, &known, None, None)
                    .unwrap_or_else(|e| panic!("{} for {}: {}", formula.id, var.id, e));
                let expected = formula.example_values().get(var.id).unwrap();
                assert!(
                    (result.value - expected).abs() <= 1e-9 * expected.abs().max(1.0),
                    "{} for {}: {} vs {}",
                    formula.id,
                    var.id,
                    result.value,
                    expected
                );
            }
        }
    }

    // ------------------------------------------------------------------------
    // Unknown selection
    // ------------------------------------------------------------------------

    #[test]
    fn test_ambiguous_unknown() {
        let err = calculate("reynolds_number", &[kv("density", "1000", "kg/m³"), kv("velocity", "2", "m/s")], None, None)
            .unwrap_err();
        match &err {
            CalcError::AmbiguousUnknown { missing, required, .. } => {
                assert_eq!(missing, &vec!["reynolds_number".to_string(), "diameter".into(), "viscosity".into()]);
                assert_eq!(*required, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_overdetermined_without_derived_outputs() {
        let err = calculate(
            "hydrostatic_pressure",
            &[
                kv("pressure", "117720", "Pa"),
                kv("density", "1000", "kg/m³"),
                kv("gravity", "9.81", "m/s²"),
                kv("depth", "12", "m"),
            ],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "OVERDETERMINED");
    }

    #[test]
    fn test_all_supplied_evaluates_first_derived() {
        let result = calculate("parabola", &[kv("a", "1", ""), kv("b", "-4", ""), kv("c", "3", "")], None, None).unwrap();
        assert_eq!(result.solved_for, "vertex_x");
        assert_eq!(result.value, 2.0);
        let vertex_y = result.derived.iter().find(|d| d.id == "vertex_y").unwrap();
        assert_eq!(vertex_y.value, -1.0);
        let directrix = result.derived.iter().find(|d| d.id == "directrix_y").unwrap();
        assert_eq!(directrix.value, -1.25);
    }

    #[test]
    fn test_explicit_selection_ignores_supplied_value() {
        let result = calculate(
            "hydrostatic_pressure",
            &[
                kv("pressure", "1", "Pa"),
                kv("density", "1000", "kg/m³"),
                kv("gravity", "9.81", "m/s²"),
                kv("depth", "12", "m"),
            ],
            None,
            Some("pressure"),
        )
        .unwrap();
        assert_close(result.value, 117_720.0, 1e-12);
    }

    #[test]
    fn test_explicit_selection_with_other_gaps_is_ambiguous() {
        let err = calculate("hydrostatic_pressure", &[kv("density", "1000", "kg/m³"), kv("gravity", "9.81", "m/s²")], None, Some("pressure"))
            .unwrap_err();
        match err {
            CalcError::AmbiguousUnknown { missing, .. } => assert_eq!(missing, vec!["depth".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_input_only_variable_cannot_be_unknown() {
        let err = calculate(
            "thermal_resistance_radiation",
            &[
                kv("resistance", "0.13", "K/W"),
                kv("emissivity", "0.9", ""),
                kv("ambient_temperature", "20", "°C"),
                kv("area", "1", "m²"),
            ],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.variable(), Some("surface_temperature"));
    }

    #[test]
    fn test_unknown_selector() {
        let err = calculate("heat_flow", &[], None, Some("voltage")).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_VARIABLE");
        assert!(err.is_fatal());
    }

    // ------------------------------------------------------------------------
    // Input boundary
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_errors() {
        let err = calculate("heat_flow", &[kv("temperature_difference", "fifty", "K"), kv("resistance", "0.5", "K/W")], None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert_eq!(err.variable(), Some("temperature_difference"));

        let err = calculate("heat_flow", &[kv("temperature_difference", "inf", "K"), kv("resistance", "0.5", "K/W")], None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_blank_fields_are_not_supplied() {
        let result = calculate(
            "heat_flow",
            &[kv("heat_flow", "   ", "W"), kv("temperature_difference", " 50 ", "K"), kv("resistance", "0.025", "K/W")],
            None,
            None,
        )
        .unwrap();
        assert_eq!(result.solved_for, "heat_flow");
        assert_close(result.value, 2000.0, 1e-12);
    }

    #[test]
    fn test_duplicate_field() {
        let err = calculate("heat_flow", &[kv("resistance", "1", "K/W"), kv("resistance", "2", "K/W")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_unknown_unit_is_fatal() {
        let err = calculate("heat_flow", &[kv("resistance", "1", "furlongs"), kv("heat_flow", "2", "W")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_UNIT");
        assert!(err.is_fatal());

        let err = calculate("heat_flow", &[kv("resistance", "1", "K/W"), kv("heat_flow", "2", "W")], Some("m"), None).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_UNIT");
    }

    // ------------------------------------------------------------------------
    // Boundary behavior
    // ------------------------------------------------------------------------

    #[test]
    fn test_temperature_at_absolute_zero_rejected() {
        for (raw, unit) in [("0", "K"), ("-273.15", "°C"), ("-459.67", "°F"), ("-300", "°C")] {
            let err = calculate(
                "gas_density",
                &[kv("pressure", "101325", "Pa"), kv("temperature", raw, unit), kv("molar_mass", "28.97", "g/mol")],
                None,
                None,
            )
            .unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT", "{} {}", raw, unit);
            assert_eq!(err.variable(), Some("temperature"));
        }
    }

    #[test]
    fn test_zero_viscosity_rejected() {
        let err = calculate(
            "reynolds_number",
            &[
                kv("density", "1000", "kg/m³"),
                kv("velocity", "2", "m/s"),
                kv("diameter", "0.1", "m"),
                kv("viscosity", "0", "Pa·s"),
            ],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.variable(), Some("viscosity"));
    }

    #[test]
    fn test_negative_area_rejected() {
        let err = calculate("regular_hexagon", &[kv("area", "-4", "m²")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.variable(), Some("area"));

        let err = calculate("circle_area", &[kv("area", "-1", "cm²")], None, None).unwrap_err();
        assert_eq!(err.variable(), Some("area"));
    }

    #[test]
    fn test_modulus_zero_rejected() {
        let err = calculate("modular_inverse", &[kv("value", "3", ""), kv("modulus", "0", "")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(err.variable(), Some("modulus"));
    }

    #[test]
    fn test_modular_inverse_without_inverse_is_domain_error() {
        let ok = calculate("modular_inverse", &[kv("value", "3", ""), kv("modulus", "11", "")], None, None).unwrap();
        assert_eq!(ok.value, 4.0);
        let err = calculate("modular_inverse", &[kv("value", "6", ""), kv("modulus", "9", "")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.variable(), Some("inverse"));
    }

    #[test]
    fn test_sonic_barrier() {
        let err = calculate(
            "doppler_effect",
            &[
                kv("source_frequency", "440", "Hz"),
                kv("wave_speed", "343", "m/s"),
                kv("observer_velocity", "0", "m/s"),
                kv("source_velocity", "343", "m/s"),
            ],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert!(err.to_string().contains("sonic barrier"));
    }

    #[test]
    fn test_doppler_approaching_source_raises_pitch() {
        let result = calculate(
            "doppler_effect",
            &[
                kv("source_frequency", "440", "Hz"),
                kv("wave_speed", "343", "m/s"),
                kv("observer_velocity", "0", "m/s"),
                kv("source_velocity", "30", "m/s"),
            ],
            None,
            None,
        )
        .unwrap();
        assert_close(result.value, 440.0 * 343.0 / 313.0, 1e-12);
        let shift = result.derived.iter().find(|d| d.id == "frequency_shift").unwrap();
        assert!(shift.value > 0.0);
    }

    #[test]
    fn test_height_out_of_reach_is_domain_error() {
        let err = calculate(
            "max_height",
            &[kv("max_height", "100", "m"), kv("initial_velocity", "20", "m/s"), kv("gravity", "9.81", "m/s²")],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.variable(), Some("launch_angle"));
    }

    #[test]
    fn test_solved_gauge_outside_awg_range() {
        let err = calculate("wire_gauge", &[kv("diameter", "20", "mm")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.variable(), Some("gauge"));
        assert!(err.to_string().contains("must be between -3 and 40"), "{}", err);

        let ok = calculate("wire_gauge", &[kv("diameter", "11.6", "mm")], None, None).unwrap();
        assert!(ok.value > -3.0 && ok.value < -2.9, "got {}", ok.value);
    }

    #[test]
    fn test_parallel_branch_must_exceed_total() {
        let err = calculate(
            "thermal_resistance_parallel",
            &[kv("total_resistance", "5", "K/W"), kv("resistance_2", "4", "K/W")],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
    }

    #[test]
    fn test_flat_parabola_is_domain_error() {
        let err = calculate("parabola", &[kv("a", "0", ""), kv("b", "2", ""), kv("c", "1", "")], None, None).unwrap_err();
        assert_eq!(err.error_code(), "DOMAIN_ERROR");
        assert_eq!(err.variable(), Some("vertex_x"));
    }

    #[test]
    fn test_launch_angle_out_of_range() {
        let err = calculate(
            "max_height",
            &[kv("initial_velocity", "20", "m/s"), kv("launch_angle", "120", "°"), kv("gravity", "9.81", "m/s²")],
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.variable(), Some("launch_angle"));
    }

    // ------------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------------

    fn regime_for(re: &str) -> Option<String> {
        calculate(
            "reynolds_number",
            &[kv("reynolds_number", re, ""), kv("density", "1000", "kg/m³"), kv("velocity", "1", "m/s"), kv("diameter", "0.1", "m")],
            None,
            None,
        )
        .unwrap()
        .classification
    }

    #[test]
    fn test_reynolds_boundaries() {
        assert_eq!(regime_for("2299").as_deref(), Some("Laminar"));
        assert_eq!(regime_for("2300").as_deref(), Some("Transitional"));
        assert_eq!(regime_for("4000").as_deref(), Some("Transitional"));
        assert_eq!(regime_for("4001").as_deref(), Some("Turbulent"));
        for _ in 0..3 {
            assert_eq!(regime_for("2300").as_deref(), Some("Transitional"));
        }
    }

    #[test]
    fn test_safety_verdicts() {
        let verdict = |yield_mpa: &str| {
            calculate("safety_factor", &[kv("yield_strength", yield_mpa, "MPa"), kv("applied_stress", "100", "MPa")], None, None)
                .unwrap()
                .classification
                .unwrap()
        };
        assert_eq!(verdict("90"), "Unsafe");
        assert_eq!(verdict("100"), "Marginal");
        assert_eq!(verdict("199"), "Marginal");
        assert_eq!(verdict("200"), "Safe");
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    #[test]
    fn test_output_unit_conversion_and_steps() {
        let result = calculate(
            "reynolds_number",
            &[
                kv("reynolds_number", "200000", ""),
                kv("density", "1", "g/cm³"),
                kv("velocity", "2", "m/s"),
                kv("diameter", "100", "mm"),
            ],
            Some("cP"),
            None,
        )
        .unwrap();
        assert_eq!(result.unit, "cP");
        assert_close(result.value, 1.0, 1e-12);
        assert_close(result.base_value, 0.001, 1e-12);
        assert_eq!(result.derivation_steps[0], "μ = ρvD / Re");
        assert!(result.derivation_steps.contains(&"D: 100 mm → 0.1 m".to_string()));
        assert!(result.derivation_steps.contains(&"ρ: 1 g/cm³ → 1000 kg/m³".to_string()));
        assert!(result
            .derivation_steps
            .contains(&"Substituting: Re = 200000, ρ = 1000 kg/m³, v = 2 m/s, D = 0.1 m".to_string()));
        assert!(result.derivation_steps.contains(&"μ = 0.001 Pa·s".to_string()));
        assert!(result.derivation_steps.contains(&"μ = 1 cP".to_string()));
    }

    #[test]
    fn test_temperature_result_in_celsius() {
        let result = calculate(
            "gas_density",
            &[kv("density", "1.2252149817167723", "kg/m³"), kv("pressure", "1", "atm"), kv("molar_mass", "28.97", "g/mol")],
            Some("°C"),
            None,
        )
        .unwrap();
        assert_eq!(result.solved_for, "temperature");
        assert_close(result.base_value, 288.15, 1e-9);
        assert!((result.value - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent() {
        let run = || {
            calculate(
                "doppler_effect",
                &[
                    kv("observed_frequency", "500", "Hz"),
                    kv("source_frequency", "440", "Hz"),
                    kv("wave_speed", "343", "m/s"),
                    kv("observer_velocity", "5", "km/h"),
                ],
                Some("mph"),
                None,
            )
            .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
        assert_eq!(first.value.to_bits(), second.value.to_bits());
    }

    #[test]
    fn test_custom_format_settings() {
        let settings = Settings::from_json_str(r#"{"format": {"fixed_decimals": 1}}"#).unwrap();
        let solver = Solver::new(&settings);
        let result = solver
            .calculate("circle_area", &[kv("radius", "1", "m")], None, None)
            .unwrap();
        assert_eq!(result.formatted, "3.1 m²");
    }

    #[test]
    fn test_result_json_round_trip() {
        let result = calculate("wire_gauge", &[kv("gauge", "10", "")], Some("mm"), None).unwrap();
        assert_close(result.value, 2.588, 1e-3);
        assert_eq!(result.derived[0].id, "cross_section_area");
        let json = serde_json::to_string(&result).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.solved_for, "diameter");
        assert_eq!(back.formatted, result.formatted);
        assert_eq!(back.derivation_steps, result.derivation_steps);
        assert_close(back.value, result.value, 1e-12);
    }

    #[test]
    fn test_solve_with_quantities() {
        let formula = find_formula("piston_speed").unwrap();
        let request = CalculationRequest::new()
            .with_known("stroke", Quantity::new(4.0, "in", UnitFamily::Length).unwrap())
            .with_known("piston_speed", Quantity::new(20.0, "m/s", UnitFamily::Velocity).unwrap())
            .in_unit("rpm");
        let result = solve(formula, &request).unwrap();
        assert_eq!(result.solved_for, "engine_speed");
        assert_close(result.value, 60.0 * 20.0 / (2.0 * 0.1016), 1e-12);
    }

    #[test]
    fn test_solve_rejects_quantity_of_wrong_family() {
        let formula = find_formula("piston_speed").unwrap();
        let request = CalculationRequest::new()
            .with_known("stroke", Quantity::new(4.0, "s", UnitFamily::Time).unwrap());
        assert_eq!(solve(formula, &request).unwrap_err().error_code(), "UNKNOWN_UNIT");
    }

    // ------------------------------------------------------------------------
    // Malformed descriptors
    // ------------------------------------------------------------------------

    static MALFORMED: FormulaDescriptor = FormulaDescriptor {
        id: "malformed",
        name: "Malformed",
        description: "Registry defects the catalog self-checks would reject.",
        category: FormulaCategory::Geometry,
        variables: &[
            VariableSpec::new("width", "w", "Width", UnitFamily::Length, Rule::Positive),
            VariableSpec::new("height", "h", "Height", UnitFamily::Length, Rule::Positive),
        ],
        rearrangements: &[Rearrangement {
            solves_for: "height",
            formula: "h = 2d",
            evaluate: |v| Ok(2.0 * v.get("depth")?),
        }],
        derived: &[],
        classifier: None,
        assumptions: &[],
        example: &[],
    };

    #[test]
    fn test_missing_rearrangement_is_fatal() {
        let request = CalculationRequest::new().with_known("height", Quantity::base(2.0, UnitFamily::Length));
        let err = solve(&MALFORMED, &request).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_REARRANGEMENT");
        assert_eq!(err.variable(), Some("width"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_evaluator_reading_undeclared_value_is_fatal() {
        let request = CalculationRequest::new().with_known("width", Quantity::base(2.0, UnitFamily::Length));
        let err = solve(&MALFORMED, &request).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("depth"), "{}", err);
    }

    #[test]
    fn test_listing() {
        let vars = list_variables("reynolds_number").unwrap();
        let ids: Vec<_> = vars.iter().map(|v| v.id).collect();
        assert_eq!(ids, ["reynolds_number", "density", "velocity", "diameter", "viscosity"]);
        assert!(list_variables("warp_drive").is_err());
        assert_eq!(list_formulas().len(), 28);
        assert_eq!(list_formulas()[0].id, "reynolds_number");
    }
}
