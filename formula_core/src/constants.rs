//! # Physical Constants
//!
//! Read-only values shared by the formula descriptors and unit tables.
//! All values are SI unless the name says otherwise.

/// Newtonian constant of gravitation, m³/(kg·s²) (CODATA 2018)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Standard acceleration of gravity, m/s²
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Stefan–Boltzmann constant, W/(m²·K⁴)
pub const STEFAN_BOLTZMANN: f64 = 5.670_374_419e-8;

/// Molar gas constant, J/(mol·K)
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618;

/// Absolute zero, K
pub const ABSOLUTE_ZERO_K: f64 = 0.0;

/// Mass of the Earth, kg
pub const EARTH_MASS_KG: f64 = 5.972e24;

/// Mean radius of the Earth, m
pub const EARTH_RADIUS_M: f64 = 6.371e6;

/// Mass of the Sun, kg
pub const SOLAR_MASS_KG: f64 = 1.988_47e30;

// ============================================================================
// Wave Speed (m/s)
// ============================================================================

pub const SPEED_OF_SOUND_AIR_20C: f64 = 343.0;

// ============================================================================
// Molar Mass (kg/mol)
// ============================================================================

pub const MOLAR_MASS_DRY_AIR: f64 = 0.028_97;

// ============================================================================
// Electrical Resistivity at 20 °C (Ω·m)
// ============================================================================

pub const RESISTIVITY_COPPER: f64 = 1.68e-8;

// ============================================================================
// American Wire Gauge
// ============================================================================

/// Diameter of AWG 36, m
pub const AWG_36_DIAMETER_M: f64 = 0.000_127;

/// Diameter ratio between AWG 0000 and AWG 36
pub const AWG_DIAMETER_RATIO: f64 = 92.0;

/// Gauge steps spanning [`AWG_DIAMETER_RATIO`]
pub const AWG_STEPS: f64 = 39.0;
