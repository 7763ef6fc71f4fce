//! # Validation Rules
//!
//! Domain constraints attached to each formula variable. Rules are pure: they
//! look at a [`Quantity`] and either accept it or return
//! [`CalcError::InvalidInput`] naming the variable.
//!
//! Sign checks read the value as entered. Every non-temperature conversion is
//! a positive scale factor, so the sign never changes on the way to base
//! units. Range and absolute-zero checks compare base-unit values.

use serde::Serialize;

use crate::constants::ABSOLUTE_ZERO_K;
use crate::errors::{CalcError, CalcResult};
use crate::format::{format_quantity, format_value, FormatSettings};
use crate::quantity::Quantity;

/// Largest integer an f64 holds exactly (2^53)
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A constraint on one variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Any finite number (signed stresses, velocities)
    Any,
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    NonZero,
    /// 0 < x ≤ 1 (emissivity, power factor)
    Fraction,
    /// min ≤ x ≤ max, bounds in base units
    Range { min: f64, max: f64 },
    /// Absolute temperature strictly above 0 K
    AboveAbsoluteZero,
    /// Whole number
    Integer,
    /// Whole number greater than zero
    PositiveInteger,
}

impl Rule {
    /// Check a known value.
    pub fn check(&self, variable: &str, quantity: &Quantity) -> CalcResult<()> {
        let value = quantity.value();
        let reject = |reason: String| {
            Err(CalcError::invalid_input(
                variable,
                format!("{} {}", value, quantity.unit()).trim_end().to_string(),
                reason,
            ))
        };

        if !value.is_finite() {
            return reject("must be a finite number".to_string());
        }

        match *self {
            Rule::Any => Ok(()),
            Rule::Positive if value <= 0.0 => reject("must be greater than zero".to_string()),
            Rule::NonNegative if value < 0.0 => reject("cannot be negative".to_string()),
            Rule::NonZero if value == 0.0 => reject("cannot be zero".to_string()),
            Rule::Fraction if value <= 0.0 || value > 1.0 => {
                reject("must be greater than 0 and at most 1".to_string())
            }
            Rule::Range { min, max } => {
                let base = quantity.to_base();
                if base < min || base > max {
                    let family = quantity.family();
                    let settings = FormatSettings::default();
                    let lo = family.from_base(min, quantity.unit())?;
                    let hi = family.from_base(max, quantity.unit())?;
                    return reject(format!(
                        "must be between {} and {}",
                        format_value(lo, &settings),
                        format_quantity(hi, quantity.unit(), &settings)
                    ));
                }
                Ok(())
            }
            Rule::AboveAbsoluteZero if quantity.to_base() <= ABSOLUTE_ZERO_K => {
                reject("must be above absolute zero".to_string())
            }
            Rule::Integer | Rule::PositiveInteger if value.fract() != 0.0 => {
                reject("must be a whole number".to_string())
            }
            Rule::Integer | Rule::PositiveInteger if value.abs() > MAX_EXACT_INTEGER => {
                reject("is too large to represent exactly".to_string())
            }
            Rule::PositiveInteger if value <= 0.0 => {
                reject("must be a whole number greater than zero".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Short human description for variable listings
    pub fn describe(&self) -> String {
        match self {
            Rule::Any => "any value".to_string(),
            Rule::Positive => "> 0".to_string(),
            Rule::NonNegative => "≥ 0".to_string(),
            Rule::NonZero => "≠ 0".to_string(),
            Rule::Fraction => "0 < x ≤ 1".to_string(),
            Rule::Range { min, max } => {
                let settings = FormatSettings::default();
                format!(
                    "{} ≤ x ≤ {} (base units)",
                    format_value(*min, &settings),
                    format_value(*max, &settings)
                )
            }
            Rule::AboveAbsoluteZero => "> 0 K".to_string(),
            Rule::Integer => "whole number".to_string(),
            Rule::PositiveInteger => "whole number > 0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitFamily;
    use std::f64::consts::FRAC_PI_2;

    fn q(value: f64, unit: &str, family: UnitFamily) -> Quantity {
        Quantity::new(value, unit, family).unwrap()
    }

    #[test]
    fn test_positive() {
        let rule = Rule::Positive;
        assert!(rule.check("viscosity", &q(0.001, "Pa·s", UnitFamily::Viscosity)).is_ok());
        let err = rule.check("viscosity", &q(0.0, "Pa·s", UnitFamily::Viscosity)).unwrap_err();
        assert_eq!(err.variable(), Some("viscosity"));
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_non_finite_always_rejected() {
        let nan = Quantity::base(f64::NAN, UnitFamily::Dimensionless);
        assert!(Rule::Any.check("x", &nan).is_err());
        let inf = Quantity::base(f64::INFINITY, UnitFamily::Dimensionless);
        assert!(Rule::NonNegative.check("x", &inf).is_err());
    }

    #[test]
    fn test_fraction_bounds() {
        let rule = Rule::Fraction;
        let pf = |v| Quantity::base(v, UnitFamily::Dimensionless);
        assert!(rule.check("power_factor", &pf(1.0)).is_ok());
        assert!(rule.check("power_factor", &pf(0.85)).is_ok());
        assert!(rule.check("power_factor", &pf(0.0)).is_err());
        assert!(rule.check("power_factor", &pf(1.01)).is_err());
    }

    #[test]
    fn test_absolute_zero_in_any_scale() {
        let rule = Rule::AboveAbsoluteZero;
        assert!(rule.check("temperature", &q(-273.15, "°C", UnitFamily::Temperature)).is_err());
        assert!(rule.check("temperature", &q(-500.0, "°F", UnitFamily::Temperature)).is_err());
        assert!(rule.check("temperature", &q(0.0, "K", UnitFamily::Temperature)).is_err());
        assert!(rule.check("temperature", &q(-273.0, "°C", UnitFamily::Temperature)).is_ok());
    }

    #[test]
    fn test_range_reports_bounds_in_entered_unit() {
        let rule = Rule::Range { min: 0.0, max: FRAC_PI_2 };
        assert!(rule.check("launch_angle", &q(60.0, "°", UnitFamily::Angle)).is_ok());
        assert!(rule.check("launch_angle", &q(90.0, "°", UnitFamily::Angle)).is_ok());
        let err = rule.check("launch_angle", &q(120.0, "deg", UnitFamily::Angle)).unwrap_err();
        match err {
            CalcError::InvalidInput { reason, .. } => assert_eq!(reason, "must be between 0 and 90 °"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_dimensionless_range_reason_has_no_unit() {
        let rule = Rule::Range { min: -3.0, max: 40.0 };
        let err = rule.check("gauge", &Quantity::base(41.0, UnitFamily::Dimensionless)).unwrap_err();
        match err {
            CalcError::InvalidInput { reason, .. } => assert_eq!(reason, "must be between -3 and 40"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integers() {
        let m = |v| Quantity::base(v, UnitFamily::Dimensionless);
        assert!(Rule::Integer.check("value", &m(-7.0)).is_ok());
        assert!(Rule::Integer.check("value", &m(2.5)).is_err());
        assert!(Rule::PositiveInteger.check("modulus", &m(0.0)).is_err());
        assert!(Rule::PositiveInteger.check("modulus", &m(-5.0)).is_err());
        assert!(Rule::PositiveInteger.check("modulus", &m(11.0)).is_ok());
        assert!(Rule::Integer.check("value", &m(1e17)).is_err());
    }
}
