//! # Unit Conversion Registry
//!
//! Every quantity belongs to a [`UnitFamily`]. Each family owns a static table
//! of [`UnitDef`]s, and the first entry of every table is the family's base
//! unit: the unit all formulas compute in.
//!
//! Conversions are linear scale factors except for absolute temperature,
//! which needs an offset:
//!
//! ```text
//! base  = value * scale + offset
//! value = (base - offset) / scale
//! ```
//!
//! Units are looked up by their display symbol (`kg/m³`, `°C`, `Pa·s`) or by
//! one of their ASCII aliases (`kg/m3`, `degC`, `Pa*s`).
//!
//! ## Example
//!
//! ```rust
//! use formula_core::units::UnitFamily;
//!
//! let pa = UnitFamily::Pressure.to_base(2.5, "bar").unwrap();
//! assert_eq!(pa, 250_000.0);
//!
//! let kelvin = UnitFamily::Temperature.to_base(25.0, "degC").unwrap();
//! assert!((kelvin - 298.15).abs() < 1e-9);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{EARTH_MASS_KG, SOLAR_MASS_KG, STANDARD_GRAVITY};
use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Conversion
// ============================================================================

/// How a unit maps onto its family's base unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `base = value * scale`
    Linear { scale: f64 },
    /// `base = value * scale + offset` (absolute temperature scales)
    Affine { scale: f64, offset: f64 },
}

impl Conversion {
    pub const fn linear(scale: f64) -> Self {
        Conversion::Linear { scale }
    }

    pub const fn affine(scale: f64, offset: f64) -> Self {
        Conversion::Affine { scale, offset }
    }

    /// Convert a value in this unit to the base unit
    #[inline]
    pub fn to_base(self, value: f64) -> f64 {
        match self {
            Conversion::Linear { scale } => value * scale,
            Conversion::Affine { scale, offset } => value * scale + offset,
        }
    }

    /// Convert a base-unit value into this unit
    #[inline]
    pub fn from_base(self, value: f64) -> f64 {
        match self {
            Conversion::Linear { scale } => value / scale,
            Conversion::Affine { scale, offset } => (value - offset) / scale,
        }
    }

    /// True when converting is a no-op
    pub fn is_identity(self) -> bool {
        match self {
            Conversion::Linear { scale } => scale == 1.0,
            Conversion::Affine { scale, offset } => scale == 1.0 && offset == 0.0,
        }
    }
}

// ============================================================================
// Unit Definition
// ============================================================================

/// One entry of a family's unit table.
#[derive(Debug, Clone, Copy)]
pub struct UnitDef {
    /// Display symbol (e.g., "kg/m³", "°C")
    pub symbol: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Alternative spellings accepted on lookup
    pub aliases: &'static [&'static str],
    pub conversion: Conversion,
}

impl UnitDef {
    pub const fn linear(symbol: &'static str, name: &'static str, scale: f64) -> Self {
        Self {
            symbol,
            name,
            aliases: &[],
            conversion: Conversion::linear(scale),
        }
    }

    pub const fn affine(symbol: &'static str, name: &'static str, scale: f64, offset: f64) -> Self {
        Self {
            symbol,
            name,
            aliases: &[],
            conversion: Conversion::affine(scale, offset),
        }
    }

    pub const fn alias(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// Whether `text` names this unit
    pub fn matches(&self, text: &str) -> bool {
        self.symbol == text || self.aliases.iter().any(|a| *a == text)
    }
}

// ============================================================================
// Unit Families
// ============================================================================

/// A kind of physical quantity with its own unit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitFamily {
    Dimensionless,
    Length,
    Area,
    Mass,
    Time,
    Velocity,
    Acceleration,
    Angle,
    RotationalSpeed,
    Density,
    Viscosity,
    Pressure,
    Temperature,
    TemperatureDifference,
    Force,
    Energy,
    Power,
    ApparentPower,
    Voltage,
    Current,
    Resistance,
    Resistivity,
    ThermalConductivity,
    HeatTransferCoefficient,
    ThermalResistance,
    Frequency,
    MolarMass,
}

/// Every family, in display order.
pub static ALL_FAMILIES: &[UnitFamily] = &[
    UnitFamily::Dimensionless,
    UnitFamily::Length,
    UnitFamily::Area,
    UnitFamily::Mass,
    UnitFamily::Time,
    UnitFamily::Velocity,
    UnitFamily::Acceleration,
    UnitFamily::Angle,
    UnitFamily::RotationalSpeed,
    UnitFamily::Density,
    UnitFamily::Viscosity,
    UnitFamily::Pressure,
    UnitFamily::Temperature,
    UnitFamily::TemperatureDifference,
    UnitFamily::Force,
    UnitFamily::Energy,
    UnitFamily::Power,
    UnitFamily::ApparentPower,
    UnitFamily::Voltage,
    UnitFamily::Current,
    UnitFamily::Resistance,
    UnitFamily::Resistivity,
    UnitFamily::ThermalConductivity,
    UnitFamily::HeatTransferCoefficient,
    UnitFamily::ThermalResistance,
    UnitFamily::Frequency,
    UnitFamily::MolarMass,
];

impl UnitFamily {
    /// Stable identifier (matches the serde name)
    pub fn id(&self) -> &'static str {
        match self {
            UnitFamily::Dimensionless => "dimensionless",
            UnitFamily::Length => "length",
            UnitFamily::Area => "area",
            UnitFamily::Mass => "mass",
            UnitFamily::Time => "time",
            UnitFamily::Velocity => "velocity",
            UnitFamily::Acceleration => "acceleration",
            UnitFamily::Angle => "angle",
            UnitFamily::RotationalSpeed => "rotational_speed",
            UnitFamily::Density => "density",
            UnitFamily::Viscosity => "viscosity",
            UnitFamily::Pressure => "pressure",
            UnitFamily::Temperature => "temperature",
            UnitFamily::TemperatureDifference => "temperature_difference",
            UnitFamily::Force => "force",
            UnitFamily::Energy => "energy",
            UnitFamily::Power => "power",
            UnitFamily::ApparentPower => "apparent_power",
            UnitFamily::Voltage => "voltage",
            UnitFamily::Current => "current",
            UnitFamily::Resistance => "resistance",
            UnitFamily::Resistivity => "resistivity",
            UnitFamily::ThermalConductivity => "thermal_conductivity",
            UnitFamily::HeatTransferCoefficient => "heat_transfer_coefficient",
            UnitFamily::ThermalResistance => "thermal_resistance",
            UnitFamily::Frequency => "frequency",
            UnitFamily::MolarMass => "molar_mass",
        }
    }

    /// The unit table. The first entry is the base unit.
    pub fn units(&self) -> &'static [UnitDef] {
        match self {
            UnitFamily::Dimensionless => DIMENSIONLESS_UNITS,
            UnitFamily::Length => LENGTH_UNITS,
            UnitFamily::Area => AREA_UNITS,
            UnitFamily::Mass => MASS_UNITS,
            UnitFamily::Time => TIME_UNITS,
            UnitFamily::Velocity => VELOCITY_UNITS,
            UnitFamily::Acceleration => ACCELERATION_UNITS,
            UnitFamily::Angle => ANGLE_UNITS,
            UnitFamily::RotationalSpeed => ROTATIONAL_SPEED_UNITS,
            UnitFamily::Density => DENSITY_UNITS,
            UnitFamily::Viscosity => VISCOSITY_UNITS,
            UnitFamily::Pressure => PRESSURE_UNITS,
            UnitFamily::Temperature => TEMPERATURE_UNITS,
            UnitFamily::TemperatureDifference => TEMPERATURE_DIFFERENCE_UNITS,
            UnitFamily::Force => FORCE_UNITS,
            UnitFamily::Energy => ENERGY_UNITS,
            UnitFamily::Power => POWER_UNITS,
            UnitFamily::ApparentPower => APPARENT_POWER_UNITS,
            UnitFamily::Voltage => VOLTAGE_UNITS,
            UnitFamily::Current => CURRENT_UNITS,
            UnitFamily::Resistance => RESISTANCE_UNITS,
            UnitFamily::Resistivity => RESISTIVITY_UNITS,
            UnitFamily::ThermalConductivity => THERMAL_CONDUCTIVITY_UNITS,
            UnitFamily::HeatTransferCoefficient => HEAT_TRANSFER_COEFFICIENT_UNITS,
            UnitFamily::ThermalResistance => THERMAL_RESISTANCE_UNITS,
            UnitFamily::Frequency => FREQUENCY_UNITS,
            UnitFamily::MolarMass => MOLAR_MASS_UNITS,
        }
    }

    /// The canonical unit formulas compute in
    pub fn base(&self) -> &'static UnitDef {
        &self.units()[0]
    }

    /// Find a unit by symbol or alias.
    pub fn lookup(&self, unit: &str) -> CalcResult<&'static UnitDef> {
        self.units()
            .iter()
            .find(|u| u.matches(unit))
            .ok_or_else(|| CalcError::unknown_unit(self.id(), unit))
    }

    /// Convert `value` in `unit` to the base unit.
    pub fn to_base(&self, value: f64, unit: &str) -> CalcResult<f64> {
        Ok(self.lookup(unit)?.conversion.to_base(value))
    }

    /// Convert a base-unit `value` into `unit`.
    pub fn from_base(&self, value: f64, unit: &str) -> CalcResult<f64> {
        Ok(self.lookup(unit)?.conversion.from_base(value))
    }

    /// Convert between two units of this family.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> CalcResult<f64> {
        let base = self.to_base(value, from)?;
        self.from_base(base, to)
    }
}

impl fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Unit Tables
// ============================================================================

static DIMENSIONLESS_UNITS: &[UnitDef] = &[
    UnitDef::linear("", "unitless", 1.0).alias(&["1", "-"]),
];

static LENGTH_UNITS: &[UnitDef] = &[
    UnitDef::linear("m", "meter", 1.0),
    UnitDef::linear("km", "kilometer", 1000.0),
    UnitDef::linear("cm", "centimeter", 0.01),
    UnitDef::linear("mm", "millimeter", 0.001),
    UnitDef::linear("µm", "micrometer", 1e-6).alias(&["um"]),
    UnitDef::linear("in", "inch", 0.0254),
    UnitDef::linear("ft", "foot", 0.3048),
    UnitDef::linear("yd", "yard", 0.9144),
    UnitDef::linear("mi", "mile", 1609.344),
];

static AREA_UNITS: &[UnitDef] = &[
    UnitDef::linear("m²", "square meter", 1.0).alias(&["m2", "m^2"]),
    UnitDef::linear("km²", "square kilometer", 1e6).alias(&["km2", "km^2"]),
    UnitDef::linear("cm²", "square centimeter", 1e-4).alias(&["cm2", "cm^2"]),
    UnitDef::linear("mm²", "square millimeter", 1e-6).alias(&["mm2", "mm^2"]),
    UnitDef::linear("in²", "square inch", 0.000_645_16).alias(&["in2", "in^2"]),
    UnitDef::linear("ft²", "square foot", 0.092_903_04).alias(&["ft2", "ft^2"]),
];

static MASS_UNITS: &[UnitDef] = &[
    UnitDef::linear("kg", "kilogram", 1.0),
    UnitDef::linear("g", "gram", 0.001),
    UnitDef::linear("t", "tonne", 1000.0),
    UnitDef::linear("lb", "pound", 0.453_592_37),
    UnitDef::linear("M⊕", "Earth mass", EARTH_MASS_KG).alias(&["earth"]),
    UnitDef::linear("M☉", "solar mass", SOLAR_MASS_KG).alias(&["sun"]),
];

static TIME_UNITS: &[UnitDef] = &[
    UnitDef::linear("s", "second", 1.0),
    UnitDef::linear("ms", "millisecond", 0.001),
    UnitDef::linear("min", "minute", 60.0),
    UnitDef::linear("h", "hour", 3600.0),
    UnitDef::linear("d", "day", 86_400.0),
];

static VELOCITY_UNITS: &[UnitDef] = &[
    UnitDef::linear("m/s", "meter per second", 1.0),
    UnitDef::linear("km/s", "kilometer per second", 1000.0),
    UnitDef::linear("km/h", "kilometer per hour", 1000.0 / 3600.0).alias(&["kph"]),
    UnitDef::linear("cm/s", "centimeter per second", 0.01),
    UnitDef::linear("mm/s", "millimeter per second", 0.001),
    UnitDef::linear("ft/s", "foot per second", 0.3048).alias(&["fps"]),
    UnitDef::linear("in/s", "inch per second", 0.0254),
    UnitDef::linear("mph", "mile per hour", 0.447_04).alias(&["mi/h"]),
    UnitDef::linear("kn", "knot", 1852.0 / 3600.0).alias(&["knots"]),
];

static ACCELERATION_UNITS: &[UnitDef] = &[
    UnitDef::linear("m/s²", "meter per second squared", 1.0).alias(&["m/s2", "m/s^2"]),
    UnitDef::linear("ft/s²", "foot per second squared", 0.3048).alias(&["ft/s2", "ft/s^2"]),
    UnitDef::linear("g₀", "standard gravity", STANDARD_GRAVITY).alias(&["g0"]),
];

static ANGLE_UNITS: &[UnitDef] = &[
    UnitDef::linear("rad", "radian", 1.0),
    UnitDef::linear("°", "degree", PI / 180.0).alias(&["deg"]),
];

// Engine and shaft speeds are quoted in rpm, so rpm is the base here.
static ROTATIONAL_SPEED_UNITS: &[UnitDef] = &[
    UnitDef::linear("rpm", "revolution per minute", 1.0),
    UnitDef::linear("rps", "revolution per second", 60.0).alias(&["rev/s"]),
    UnitDef::linear("rad/s", "radian per second", 60.0 / (2.0 * PI)),
];

static DENSITY_UNITS: &[UnitDef] = &[
    UnitDef::linear("kg/m³", "kilogram per cubic meter", 1.0).alias(&["kg/m3", "kg/m^3"]),
    UnitDef::linear("g/cm³", "gram per cubic centimeter", 1000.0).alias(&["g/cm3", "g/cm^3"]),
    UnitDef::linear("g/L", "gram per liter", 1.0),
    UnitDef::linear("lb/ft³", "pound per cubic foot", 16.018_463_373_960_14).alias(&["lb/ft3", "lb/ft^3"]),
    UnitDef::linear("lb/in³", "pound per cubic inch", 27_679.904_710_203_12).alias(&["lb/in3", "lb/in^3"]),
    UnitDef::linear("lb/gal", "pound per US gallon", 119.826_427_316_897).alias(&["lb/gal (US)"]),
];

static VISCOSITY_UNITS: &[UnitDef] = &[
    UnitDef::linear("Pa·s", "pascal-second", 1.0).alias(&["Pa*s", "Pa.s"]),
    UnitDef::linear("N·s/m²", "newton-second per square meter", 1.0).alias(&["N*s/m2"]),
    UnitDef::linear("mPa·s", "millipascal-second", 0.001).alias(&["mPa*s", "mPa.s"]),
    UnitDef::linear("cP", "centipoise", 0.001),
    UnitDef::linear("P", "poise", 0.1),
    UnitDef::linear("lb·s/ft²", "pound-force second per square foot", 47.880_258_980_335_84).alias(&["lbf*s/ft2"]),
    UnitDef::linear("lb·s/in²", "pound-force second per square inch", 6894.757_293_168_361).alias(&["lbf*s/in2"]),
];

static PRESSURE_UNITS: &[UnitDef] = &[
    UnitDef::linear("Pa", "pascal", 1.0),
    UnitDef::linear("kPa", "kilopascal", 1e3),
    UnitDef::linear("MPa", "megapascal", 1e6),
    UnitDef::linear("GPa", "gigapascal", 1e9),
    UnitDef::linear("bar", "bar", 1e5),
    UnitDef::linear("atm", "standard atmosphere", 101_325.0),
    UnitDef::linear("psi", "pound per square inch", 6894.757_293_168_361),
    UnitDef::linear("ksi", "kip per square inch", 6_894_757.293_168_361),
    UnitDef::linear("mmHg", "millimeter of mercury", 133.322_387_415),
    UnitDef::linear("inHg", "inch of mercury", 3386.388_64),
    UnitDef::linear("Torr", "torr", 101_325.0 / 760.0).alias(&["torr"]),
];

static TEMPERATURE_UNITS: &[UnitDef] = &[
    UnitDef::linear("K", "kelvin", 1.0),
    UnitDef::affine("°C", "degree Celsius", 1.0, 273.15).alias(&["degC", "C"]),
    UnitDef::affine("°F", "degree Fahrenheit", 5.0 / 9.0, 273.15 - 32.0 * 5.0 / 9.0).alias(&["degF", "F"]),
    UnitDef::linear("°R", "degree Rankine", 5.0 / 9.0).alias(&["degR", "R"]),
];

// A temperature change carries no offset: 1 °C of difference is 1 K.
static TEMPERATURE_DIFFERENCE_UNITS: &[UnitDef] = &[
    UnitDef::linear("K", "kelvin", 1.0),
    UnitDef::linear("°C", "degree Celsius", 1.0).alias(&["degC", "C"]),
    UnitDef::linear("°F", "degree Fahrenheit", 5.0 / 9.0).alias(&["degF", "F"]),
    UnitDef::linear("°R", "degree Rankine", 5.0 / 9.0).alias(&["degR", "R"]),
];

static FORCE_UNITS: &[UnitDef] = &[
    UnitDef::linear("N", "newton", 1.0),
    UnitDef::linear("kN", "kilonewton", 1e3),
    UnitDef::linear("MN", "meganewton", 1e6),
    UnitDef::linear("lbf", "pound-force", 4.448_221_615_260_5),
    UnitDef::linear("kgf", "kilogram-force", STANDARD_GRAVITY),
    UnitDef::linear("dyn", "dyne", 1e-5),
];

static ENERGY_UNITS: &[UnitDef] = &[
    UnitDef::linear("J", "joule", 1.0),
    UnitDef::linear("kJ", "kilojoule", 1e3),
    UnitDef::linear("MJ", "megajoule", 1e6),
    UnitDef::linear("ft·lbf", "foot-pound", 1.355_817_948_331_400_4).alias(&["ft*lbf", "ft-lbf", "ftlbf"]),
    UnitDef::linear("cal", "calorie", 4.184),
    UnitDef::linear("kcal", "kilocalorie", 4184.0),
    UnitDef::linear("BTU", "British thermal unit", 1055.055_852_62).alias(&["Btu"]),
    UnitDef::linear("Wh", "watt-hour", 3600.0),
    UnitDef::linear("kWh", "kilowatt-hour", 3.6e6),
    UnitDef::linear("eV", "electronvolt", 1.602_176_634e-19),
];

static POWER_UNITS: &[UnitDef] = &[
    UnitDef::linear("W", "watt", 1.0),
    UnitDef::linear("kW", "kilowatt", 1e3),
    UnitDef::linear("MW", "megawatt", 1e6),
    UnitDef::linear("hp", "mechanical horsepower", 745.699_871_582_270_2),
    UnitDef::linear("BTU/h", "BTU per hour", 1055.055_852_62 / 3600.0).alias(&["Btu/h"]),
];

static APPARENT_POWER_UNITS: &[UnitDef] = &[
    UnitDef::linear("VA", "volt-ampere", 1.0),
    UnitDef::linear("kVA", "kilovolt-ampere", 1e3),
    UnitDef::linear("MVA", "megavolt-ampere", 1e6),
];

static VOLTAGE_UNITS: &[UnitDef] = &[
    UnitDef::linear("V", "volt", 1.0),
    UnitDef::linear("mV", "millivolt", 1e-3),
    UnitDef::linear("kV", "kilovolt", 1e3),
];

static CURRENT_UNITS: &[UnitDef] = &[
    UnitDef::linear("A", "ampere", 1.0),
    UnitDef::linear("mA", "milliampere", 1e-3),
    UnitDef::linear("kA", "kiloampere", 1e3),
];

static RESISTANCE_UNITS: &[UnitDef] = &[
    UnitDef::linear("Ω", "ohm", 1.0).alias(&["ohm"]),
    UnitDef::linear("mΩ", "milliohm", 1e-3).alias(&["mohm"]),
    UnitDef::linear("kΩ", "kiloohm", 1e3).alias(&["kohm"]),
    UnitDef::linear("MΩ", "megaohm", 1e6).alias(&["Mohm"]),
];

static RESISTIVITY_UNITS: &[UnitDef] = &[
    UnitDef::linear("Ω·m", "ohm-meter", 1.0).alias(&["ohm*m", "ohm.m"]),
    UnitDef::linear("Ω·cm", "ohm-centimeter", 0.01).alias(&["ohm*cm"]),
    UnitDef::linear("µΩ·cm", "microohm-centimeter", 1e-8).alias(&["uohm*cm"]),
    UnitDef::linear("Ω·mm²/m", "ohm square millimeter per meter", 1e-6).alias(&["ohm*mm2/m"]),
];

static THERMAL_CONDUCTIVITY_UNITS: &[UnitDef] = &[
    UnitDef::linear("W/(m·K)", "watt per meter-kelvin", 1.0).alias(&["W/m/K", "W/mK"]),
    UnitDef::linear("BTU/(h·ft·°F)", "BTU per hour-foot-degree Fahrenheit", 1.730_734_666).alias(&["Btu/h/ft/F"]),
];

static HEAT_TRANSFER_COEFFICIENT_UNITS: &[UnitDef] = &[
    UnitDef::linear("W/(m²·K)", "watt per square meter-kelvin", 1.0).alias(&["W/m2/K", "W/m2K"]),
    UnitDef::linear("BTU/(h·ft²·°F)", "BTU per hour-square foot-degree Fahrenheit", 5.678_263_34).alias(&["Btu/h/ft2/F"]),
];

static THERMAL_RESISTANCE_UNITS: &[UnitDef] = &[
    UnitDef::linear("K/W", "kelvin per watt", 1.0),
    UnitDef::linear("°C/W", "degree Celsius per watt", 1.0).alias(&["C/W", "degC/W"]),
    UnitDef::linear("°F·h/BTU", "degree Fahrenheit-hour per BTU", 1.895_634_240).alias(&["F*h/Btu"]),
];

static FREQUENCY_UNITS: &[UnitDef] = &[
    UnitDef::linear("Hz", "hertz", 1.0),
    UnitDef::linear("kHz", "kilohertz", 1e3),
    UnitDef::linear("MHz", "megahertz", 1e6),
    UnitDef::linear("GHz", "gigahertz", 1e9),
];

static MOLAR_MASS_UNITS: &[UnitDef] = &[
    UnitDef::linear("kg/mol", "kilogram per mole", 1.0),
    UnitDef::linear("g/mol", "gram per mole", 0.001),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_unit_is_identity() {
        for family in ALL_FAMILIES {
            assert!(
                family.base().conversion.is_identity(),
                "{} base unit {} is not identity",
                family,
                family.base().symbol
            );
        }
    }

    #[test]
    fn test_symbols_unique_within_family() {
        for family in ALL_FAMILIES {
            let mut seen: Vec<&str> = Vec::new();
            for unit in family.units() {
                for text in std::iter::once(&unit.symbol).chain(unit.aliases.iter()) {
                    assert!(!seen.contains(text), "{} registers '{}' twice", family, text);
                    seen.push(text);
                }
            }
        }
    }

    #[test]
    fn test_length_conversions() {
        assert_eq!(UnitFamily::Length.to_base(12.0, "in").unwrap(), 12.0 * 0.0254);
        let ft = UnitFamily::Length.convert(1.0, "mi", "ft").unwrap();
        assert!((ft - 5280.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_affine() {
        let t = UnitFamily::Temperature;
        assert!((t.to_base(32.0, "°F").unwrap() - 273.15).abs() < 1e-9);
        assert!((t.to_base(212.0, "degF").unwrap() - 373.15).abs() < 1e-9);
        assert!((t.from_base(0.0, "°C").unwrap() + 273.15).abs() < 1e-9);
        assert!((t.convert(-40.0, "°C", "°F").unwrap() + 40.0).abs() < 1e-9);
        assert!((t.to_base(491.67, "°R").unwrap() - 273.15).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_difference_has_no_offset() {
        let dt = UnitFamily::TemperatureDifference;
        assert_eq!(dt.to_base(10.0, "°C").unwrap(), 10.0);
        assert!((dt.to_base(18.0, "°F").unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_aliases_resolve() {
        assert_eq!(UnitFamily::Density.lookup("kg/m3").unwrap().symbol, "kg/m³");
        assert_eq!(UnitFamily::Viscosity.lookup("Pa*s").unwrap().symbol, "Pa·s");
        assert_eq!(UnitFamily::Dimensionless.lookup("").unwrap().name, "unitless");
    }

    #[test]
    fn test_unknown_unit() {
        let err = UnitFamily::Length.to_base(1.0, "furlong").unwrap_err();
        assert_eq!(
            err,
            CalcError::UnknownUnit {
                family: "length".to_string(),
                unit: "furlong".to_string(),
            }
        );
        // Symbols are family-scoped: "Pa" is not a length
        assert!(UnitFamily::Length.lookup("Pa").is_err());
    }

    #[test]
    fn test_family_serialization() {
        let json = serde_json::to_string(&UnitFamily::HeatTransferCoefficient).unwrap();
        assert_eq!(json, "\"heat_transfer_coefficient\"");
        let roundtrip: UnitFamily = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, UnitFamily::HeatTransferCoefficient);
        for family in ALL_FAMILIES {
            assert_eq!(serde_json::to_string(family).unwrap(), format!("\"{}\"", family.id()));
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        let diff = (a - b).abs();
        diff <= 1e-9 * a.abs().max(b.abs()).max(1e-300) || diff <= 1e-9
    }

    proptest! {
        #[test]
        fn every_unit_round_trips(mantissa in 1.0_f64..10.0, exponent in -12_i32..13, negative in any::<bool>()) {
            let x = if negative { -mantissa } else { mantissa } * 10f64.powi(exponent);
            for family in ALL_FAMILIES {
                for unit in family.units() {
                    let back = unit.conversion.from_base(unit.conversion.to_base(x));
                    prop_assert!(close(back, x), "{} {}: {} -> {}", family, unit.symbol, x, back);
                }
            }
        }
    }
}
