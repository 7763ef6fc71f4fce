//! # Result Formatting
//!
//! Renders numbers for display. Values inside the "normal" magnitude band are
//! printed fixed-point with trailing zeros trimmed; everything else switches to
//! scientific notation. Non-finite values print as an explicit marker.
//!
//! ```rust
//! use formula_core::format::{format_value, FormatSettings};
//!
//! let s = FormatSettings::default();
//! assert_eq!(format_value(117_720.0, &s), "117720");
//! assert_eq!(format_value(0.5, &s), "0.5");
//! assert_eq!(format_value(6.02214076e23, &s), "6.022e23");
//! assert_eq!(format_value(f64::NAN, &s), "Invalid");
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Display policy for computed numbers.
///
/// ## JSON Example
///
/// ```json
/// {
///   "fixed_decimals": 4,
///   "scientific_digits": 4,
///   "min_fixed_magnitude": 0.0001,
///   "max_fixed_magnitude": 10000000000.0,
///   "invalid_marker": "Invalid"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Decimal places kept in fixed-point output before trimming
    pub fixed_decimals: usize,

    /// Significant digits in scientific output
    pub scientific_digits: usize,

    /// Smallest magnitude printed fixed-point (inclusive)
    pub min_fixed_magnitude: f64,

    /// Magnitude at which output switches to scientific (exclusive)
    pub max_fixed_magnitude: f64,

    /// Printed for NaN and infinities
    pub invalid_marker: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        FormatSettings {
            fixed_decimals: 4,
            scientific_digits: 4,
            min_fixed_magnitude: 1e-4,
            max_fixed_magnitude: 1e10,
            invalid_marker: "Invalid".to_string(),
        }
    }
}

impl FormatSettings {
    /// Reject settings that would make the band empty or meaningless.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.min_fixed_magnitude > 0.0 && self.min_fixed_magnitude.is_finite()) {
            return Err(CalcError::settings("min_fixed_magnitude must be a positive number"));
        }
        if !(self.max_fixed_magnitude > self.min_fixed_magnitude) {
            return Err(CalcError::settings(
                "max_fixed_magnitude must be greater than min_fixed_magnitude",
            ));
        }
        if self.scientific_digits == 0 {
            return Err(CalcError::settings("scientific_digits must be at least 1"));
        }
        if self.fixed_decimals > 17 {
            return Err(CalcError::settings("fixed_decimals cannot exceed 17"));
        }
        Ok(())
    }
}

/// Format a number for display.
pub fn format_value(value: f64, settings: &FormatSettings) -> String {
    if !value.is_finite() {
        return settings.invalid_marker.clone();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude >= settings.min_fixed_magnitude && magnitude < settings.max_fixed_magnitude {
        let fixed = format!("{:.*}", settings.fixed_decimals, value);
        let trimmed = trim_fraction(&fixed);
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        let digits = settings.scientific_digits.max(1) - 1;
        let sci = format!("{:.*e}", digits, value);
        match sci.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{}", trim_fraction(mantissa), exponent),
            None => sci,
        }
    }
}

/// Format a number followed by its unit symbol (the unit is omitted when empty).
pub fn format_quantity(value: f64, unit: &str, settings: &FormatSettings) -> String {
    let number = format_value(value, settings);
    if unit.is_empty() {
        number
    } else {
        format!("{} {}", number, unit)
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_band() {
        let s = FormatSettings::default();
        assert_eq!(format_value(200_000.0, &s), "200000");
        assert_eq!(format_value(15.291_284_4, &s), "15.2913");
        assert_eq!(format_value(0.001, &s), "0.001");
        assert_eq!(format_value(-2.5, &s), "-2.5");
        assert_eq!(format_value(1e-4, &s), "0.0001");
    }

    #[test]
    fn test_scientific_outside_band() {
        let s = FormatSettings::default();
        assert_eq!(format_value(1.234_56e-5, &s), "1.235e-5");
        assert_eq!(format_value(1e10, &s), "1e10");
        assert_eq!(format_value(-3.986e14, &s), "-3.986e14");
    }

    #[test]
    fn test_invalid_marker() {
        let s = FormatSettings::default();
        assert_eq!(format_value(f64::INFINITY, &s), "Invalid");
        assert_eq!(format_value(f64::NEG_INFINITY, &s), "Invalid");
        let custom = FormatSettings {
            invalid_marker: "n/a".to_string(),
            ..FormatSettings::default()
        };
        assert_eq!(format_value(f64::NAN, &custom), "n/a");
    }

    #[test]
    fn test_zero_and_negative_zero() {
        let s = FormatSettings::default();
        assert_eq!(format_value(0.0, &s), "0");
        assert_eq!(format_value(-0.0, &s), "0");
    }

    #[test]
    fn test_format_quantity() {
        let s = FormatSettings::default();
        assert_eq!(format_quantity(117_720.0, "Pa", &s), "117720 Pa");
        assert_eq!(format_quantity(200_000.0, "", &s), "200000");
    }

    #[test]
    fn test_validate_settings() {
        assert!(FormatSettings::default().validate().is_ok());
        let inverted = FormatSettings {
            min_fixed_magnitude: 1e6,
            max_fixed_magnitude: 1.0,
            ..FormatSettings::default()
        };
        assert_eq!(inverted.validate().unwrap_err().error_code(), "SETTINGS_ERROR");
        let no_digits = FormatSettings {
            scientific_digits: 0,
            ..FormatSettings::default()
        };
        assert!(no_digits.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: FormatSettings = serde_json::from_str(r#"{"fixed_decimals": 2}"#).unwrap();
        assert_eq!(s.fixed_decimals, 2);
        assert_eq!(s.scientific_digits, 4);
        assert_eq!(format_value(3.14159, &s), "3.14");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn finite_values_never_render_as_invalid(x in proptest::num::f64::NORMAL) {
            let s = FormatSettings::default();
            let text = format_value(x, &s);
            prop_assert_ne!(text.as_str(), "Invalid");
            prop_assert!(text.parse::<f64>().is_ok(), "{} rendered as {}", x, text);
        }
    }
}
