//! # Formulary CLI
//!
//! Terminal front end for `formula_core`: list formulas, inspect their
//! variables, and solve for the one left blank.
//!
//! ```bash
//! formula_cli solve reynolds_number -k density=1000:kg/m³ -k velocity=2:m/s \
//!     -k diameter=100:mm -k viscosity=1:cP
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use formula_core::formulas::{generate_formulas_markdown, in_category};
use formula_core::units::ALL_FAMILIES;
use formula_core::{
    find_formula, CalcError, CalcResult, CalculationResult, FormulaCategory, KnownValue, Settings, Solver,
};

#[derive(Parser)]
#[command(name = "formula_cli")]
#[command(about = "Formulary CLI - unit-aware formula solver", long_about = None)]
struct Cli {
    /// Display settings JSON file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Log solver steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered formulas
    List {
        /// Only this category (e.g. fluids, number_theory)
        #[arg(short, long)]
        category: Option<String>,
        /// Print descriptors as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the variables of a formula with their units and rules
    Vars {
        /// Formula id
        formula: String,
        /// Print variables as JSON
        #[arg(long)]
        json: bool,
    },
    /// Solve a formula for the missing variable
    Solve {
        /// Formula id
        formula: String,
        /// Known value as variable=value[:unit]; repeat for each input
        #[arg(short, long = "known", value_name = "VAR=VALUE[:UNIT]")]
        known: Vec<String>,
        /// Variable or derived output to solve for
        #[arg(long = "for", value_name = "ID")]
        solve_for: Option<String>,
        /// Unit for the result
        #[arg(short, long)]
        unit: Option<String>,
        /// Print the result (or error) as JSON
        #[arg(long)]
        json: bool,
    },
    /// List unit families and their units
    Units,
    /// Print the formula reference in Markdown
    Reference,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let json_errors = matches!(cli.command, Commands::Solve { json: true, .. });
    if let Err(e) = run(cli) {
        if json_errors {
            match serde_json::to_string_pretty(&e.report()) {
                Ok(json) => println!("{}", json),
                Err(_) => eprintln!("Error [{}]: {}", e.error_code(), e),
            }
        } else {
            eprintln!("Error [{}]: {}", e.error_code(), e);
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> CalcResult<()> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::List { category, json } => cmd_list(category.as_deref(), json),
        Commands::Vars { formula, json } => cmd_vars(&formula, json),
        Commands::Solve {
            formula,
            known,
            solve_for,
            unit,
            json,
        } => cmd_solve(&settings, &formula, &known, solve_for.as_deref(), unit.as_deref(), json),
        Commands::Units => {
            cmd_units();
            Ok(())
        }
        Commands::Reference => {
            print!("{}", generate_formulas_markdown());
            Ok(())
        }
    }
}

fn category_id(category: FormulaCategory) -> String {
    serde_json::to_value(category)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::Internal {
        message: format!("Failed to serialize output: {}", e),
    })
}

fn cmd_list(category: Option<&str>, json: bool) -> CalcResult<()> {
    let categories: Vec<FormulaCategory> = match category {
        Some(wanted) => {
            let wanted = wanted.trim().to_lowercase();
            let found: Vec<_> = FormulaCategory::all()
                .into_iter()
                .filter(|c| category_id(*c) == wanted)
                .collect();
            if found.is_empty() {
                return Err(CalcError::invalid_input(
                    "category",
                    wanted,
                    "is not a formula category",
                ));
            }
            found
        }
        None => FormulaCategory::all().to_vec(),
    };

    if json {
        let formulas: Vec<_> = categories.iter().flat_map(|c| in_category(*c)).collect();
        println!("{}", to_json(&formulas)?);
        return Ok(());
    }

    for category in categories {
        let formulas = in_category(category);
        if formulas.is_empty() {
            continue;
        }
        println!("{} ({})", category.display_name(), category_id(category));
        for formula in formulas {
            println!("  {:<32} {}", formula.id, formula.name);
        }
        println!();
    }
    Ok(())
}

fn cmd_vars(formula_id: &str, json: bool) -> CalcResult<()> {
    let formula = find_formula(formula_id)?;

    if json {
        println!("{}", to_json(formula.variables)?);
        return Ok(());
    }

    println!("{} - {}", formula.name, formula.description);
    println!("Formula: {}", formula.primary_formula());
    println!();
    for var in formula.variables {
        let units: Vec<&str> = var
            .family
            .units()
            .iter()
            .map(|u| if u.symbol.is_empty() { "(none)" } else { u.symbol })
            .collect();
        println!(
            "  {:<22} {:<4} {}{}",
            var.id,
            var.symbol,
            var.name,
            if var.solvable { "" } else { " [input only]" }
        );
        println!("  {:<22}      rule: {}; units: {}", "", var.rule.describe(), units.join(", "));
    }
    if !formula.derived.is_empty() {
        println!();
        println!("Derived outputs:");
        for derived in formula.derived {
            println!("  {:<22} {}", derived.id, derived.formula);
        }
    }
    Ok(())
}

/// Split `variable=value[:unit]`.
fn parse_known(arg: &str) -> CalcResult<KnownValue> {
    let (variable, rest) = arg
        .split_once('=')
        .ok_or_else(|| CalcError::parse(arg, "expected variable=value[:unit]"))?;
    let (value, unit) = rest.split_once(':').unwrap_or((rest, ""));
    Ok(KnownValue::new(variable, value, unit))
}

fn cmd_solve(
    settings: &Settings,
    formula_id: &str,
    known: &[String],
    solve_for: Option<&str>,
    unit: Option<&str>,
    json: bool,
) -> CalcResult<()> {
    let known = known.iter().map(String::as_str).map(parse_known).collect::<CalcResult<Vec<_>>>()?;
    let solver = Solver::new(settings);
    let result = solver.calculate(formula_id, &known, unit, solve_for)?;

    if json {
        println!("{}", to_json(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &CalculationResult) {
    println!("{} = {}", result.symbol, result.formatted);
    if let Some(label) = &result.classification {
        println!("Classification: {}", label);
    }
    println!();
    println!("Derivation:");
    for step in &result.derivation_steps {
        println!("  {}", step);
    }
    if !result.derived.is_empty() {
        println!();
        println!("Also:");
        for derived in &result.derived {
            println!("  {} ({}) = {}", derived.name, derived.symbol, derived.formatted);
        }
    }
}

fn cmd_units() {
    for family in ALL_FAMILIES {
        let symbols: Vec<&str> = family
            .units()
            .iter()
            .map(|u| if u.symbol.is_empty() { "(none)" } else { u.symbol })
            .collect();
        println!("{:<26} {}", family.id(), symbols.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_with_unit() {
        let known = parse_known("diameter=100:mm").unwrap();
        assert_eq!(known, KnownValue::new("diameter", "100", "mm"));
    }

    #[test]
    fn test_parse_known_without_unit() {
        let known = parse_known("reynolds_number=2300").unwrap();
        assert_eq!(known.unit, "");
        assert_eq!(known.raw_value, "2300");
    }

    #[test]
    fn test_parse_known_rejects_missing_equals() {
        let err = parse_known("density").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_category_ids() {
        assert_eq!(category_id(FormulaCategory::NumberTheory), "number_theory");
        assert_eq!(category_id(FormulaCategory::Fluids), "fluids");
    }

    #[test]
    fn test_cli_parses_solve() {
        let cli = Cli::try_parse_from([
            "formula_cli",
            "solve",
            "hydrostatic_pressure",
            "-k",
            "density=1000:kg/m³",
            "--known",
            "depth=12:m",
            "--for",
            "pressure",
            "--unit",
            "kPa",
        ])
        .unwrap();
        match cli.command {
            Commands::Solve { formula, known, solve_for, unit, json } => {
                assert_eq!(formula, "hydrostatic_pressure");
                assert_eq!(known.len(), 2);
                assert_eq!(solve_for.as_deref(), Some("pressure"));
                assert_eq!(unit.as_deref(), Some("kPa"));
                assert!(!json);
            }
            _ => panic!("expected solve"),
        }
    }
}
