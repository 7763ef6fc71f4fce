//! Regenerate the formula reference.
//!
//! ```bash
//! cargo run --bin gen-formulas [OUTPUT]
//! ```
//!
//! `OUTPUT` defaults to `formula_core/FORMULAS.md`.

use std::path::PathBuf;

use formula_core::formulas::{write_formulas_markdown, ALL_FORMULAS};

fn main() {
    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("formula_core/FORMULAS.md"));

    match write_formulas_markdown(&output) {
        Ok(bytes) => println!("{} formulas, {} bytes -> {}", ALL_FORMULAS.len(), bytes, output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
