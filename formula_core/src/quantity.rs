//! # Quantity
//!
//! A number tagged with a unit from one [`UnitFamily`]. Construction checks the
//! unit against the family's table, so a `Quantity` can always be converted.

use serde::Serialize;

use crate::errors::CalcResult;
use crate::units::{Conversion, UnitFamily};

/// A value in a registered unit.
///
/// ## Example
///
/// ```rust
/// use formula_core::quantity::Quantity;
/// use formula_core::units::UnitFamily;
///
/// let stroke = Quantity::new(101.0, "mm", UnitFamily::Length).unwrap();
/// assert!((stroke.to_base() - 0.101).abs() < 1e-12);
/// assert!(Quantity::new(1.0, "parsec", UnitFamily::Length).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quantity {
    value: f64,
    unit: &'static str,
    family: UnitFamily,
    #[serde(skip)]
    conversion: Conversion,
}

impl Quantity {
    /// Tag `value` with `unit`, which may be a symbol or an alias.
    pub fn new(value: f64, unit: &str, family: UnitFamily) -> CalcResult<Self> {
        let def = family.lookup(unit)?;
        Ok(Self {
            value,
            unit: def.symbol,
            family,
            conversion: def.conversion,
        })
    }

    /// A value already in the family's base unit
    pub fn base(value: f64, family: UnitFamily) -> Self {
        let def = family.base();
        Self {
            value,
            unit: def.symbol,
            family,
            conversion: def.conversion,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Canonical symbol of the unit (aliases are resolved)
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    pub fn family(&self) -> UnitFamily {
        self.family
    }

    /// Whether the value is already in base units
    pub fn is_base(&self) -> bool {
        self.conversion.is_identity()
    }

    pub fn to_base(&self) -> f64 {
        self.conversion.to_base(self.value)
    }

    /// Express the same quantity in another unit of the family.
    pub fn convert_to(&self, unit: &str) -> CalcResult<Self> {
        let def = self.family.lookup(unit)?;
        Ok(Self {
            value: def.conversion.from_base(self.to_base()),
            unit: def.symbol,
            family: self.family,
            conversion: def.conversion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_resolves_to_symbol() {
        let q = Quantity::new(1000.0, "kg/m3", UnitFamily::Density).unwrap();
        assert_eq!(q.unit(), "kg/m³");
        assert!(q.is_base());
    }

    #[test]
    fn test_convert_to() {
        let q = Quantity::new(20.0, "°C", UnitFamily::Temperature).unwrap();
        let k = q.convert_to("K").unwrap();
        assert!((k.value() - 293.15).abs() < 1e-9);
        assert_eq!(k.unit(), "K");
        let f = q.convert_to("°F").unwrap();
        assert!((f.value() - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_constructor() {
        let q = Quantity::base(9.81, UnitFamily::Acceleration);
        assert_eq!(q.unit(), "m/s²");
        assert_eq!(q.to_base(), 9.81);
    }

    #[test]
    fn test_serialization_skips_conversion() {
        let q = Quantity::new(2.0, "bar", UnitFamily::Pressure).unwrap();
        let json = serde_json::to_value(q).unwrap();
        assert_eq!(json["value"], 2.0);
        assert_eq!(json["unit"], "bar");
        assert_eq!(json["family"], "pressure");
        assert!(json.get("conversion").is_none());
    }
}
