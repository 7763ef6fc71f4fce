//! Number theory: modular multiplicative inverse.

use std::borrow::Cow;

use crate::units::UnitFamily;
use crate::validation::Rule;

use super::registry::{
    ensure, BaseValues, Eval, EvalError, FormulaCategory, FormulaDescriptor, Rearrangement,
    VariableSpec,
};

pub static FORMULAS: &[FormulaDescriptor] = &[MODULAR_INVERSE];

/// Inverse of `value` modulo `modulus` in `[0, modulus)`, or `None` when
/// `gcd(value, modulus) != 1`.
///
/// ```rust
/// use formula_core::formulas::number_theory::mod_inverse;
///
/// assert_eq!(mod_inverse(3, 11), Some(4));
/// assert_eq!(mod_inverse(-3, 11), Some(7));
/// assert_eq!(mod_inverse(6, 9), None);
/// ```
pub fn mod_inverse(value: i128, modulus: i128) -> Option<i128> {
    if modulus <= 0 {
        return None;
    }
    let (mut old_r, mut r) = (value.rem_euclid(modulus), modulus);
    let (mut old_s, mut s) = (1_i128, 0_i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(modulus))
}

fn solve_inverse(v: &BaseValues) -> Eval {
    let value = v.get("value")?;
    let modulus = v.get("modulus")?;
    ensure(modulus >= 1.0, "modulus must be a positive integer")?;
    match mod_inverse(value as i128, modulus as i128) {
        Some(inverse) => Ok(inverse as f64),
        None => Err(EvalError::Domain(Cow::Owned(format!(
            "{} has no inverse modulo {} (they share a common factor)",
            value, modulus
        )))),
    }
}

pub const MODULAR_INVERSE: FormulaDescriptor = FormulaDescriptor {
    id: "modular_inverse",
    name: "Modular Inverse",
    description: "The x in [0, m) with a·x ≡ 1 (mod m).",
    category: FormulaCategory::NumberTheory,
    variables: &[
        VariableSpec::new("inverse", "x", "Modular inverse", UnitFamily::Dimensionless, Rule::Integer),
        VariableSpec::new("value", "a", "Value", UnitFamily::Dimensionless, Rule::Integer).input_only(),
        VariableSpec::new("modulus", "m", "Modulus", UnitFamily::Dimensionless, Rule::PositiveInteger)
            .input_only(),
    ],
    rearrangements: &[Rearrangement {
        solves_for: "inverse",
        formula: "x = a⁻¹ mod m",
        evaluate: solve_inverse,
    }],
    derived: &[],
    classifier: None,
    assumptions: &[
        "Integers only; negative values are reduced modulo m first",
        "An inverse exists only when gcd(a, m) = 1",
    ],
    example: &[("inverse", 4.0), ("value", 3.0), ("modulus", 11.0)],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_inverse_known_values() {
        assert_eq!(mod_inverse(3, 11), Some(4));
        assert_eq!(mod_inverse(10, 17), Some(12));
        assert_eq!(mod_inverse(1, 2), Some(1));
        assert_eq!(mod_inverse(7, 1), Some(0));
    }

    #[test]
    fn test_mod_inverse_none() {
        assert_eq!(mod_inverse(4, 8), None);
        assert_eq!(mod_inverse(0, 7), None);
        assert_eq!(mod_inverse(5, 0), None);
        assert_eq!(mod_inverse(5, -7), None);
    }

    #[test]
    fn test_inverse_property_large_modulus() {
        let m: i128 = 1_000_000_007;
        let a: i128 = 123_456_789;
        let x = mod_inverse(a, m).unwrap();
        assert_eq!((a * x).rem_euclid(m), 1);
    }

    #[test]
    fn test_no_inverse_is_domain_error() {
        let mut values = BaseValues::new();
        values.insert("value", 6.0);
        values.insert("modulus", 9.0);
        assert!(matches!(solve_inverse(&values), Err(EvalError::Domain(_))));
    }
}
