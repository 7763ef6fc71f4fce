//! # Classification
//!
//! Maps a computed number onto a qualitative label (flow regime, safety
//! verdict). Bands are checked in order; the first threshold the value falls
//! under wins.

use serde::Serialize;

/// One threshold in a [`Classifier`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Upper bound of the band
    pub below: f64,
    /// Whether `below` itself belongs to this band
    pub inclusive: bool,
    pub label: &'static str,
}

impl Band {
    pub const fn below(below: f64, label: &'static str) -> Self {
        Band {
            below,
            inclusive: false,
            label,
        }
    }

    pub const fn up_to(below: f64, label: &'static str) -> Self {
        Band {
            below,
            inclusive: true,
            label,
        }
    }

    fn contains(&self, value: f64) -> bool {
        if self.inclusive {
            value <= self.below
        } else {
            value < self.below
        }
    }
}

/// Labels a variable of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classifier {
    /// Variable id whose value (in base units) is classified
    pub variable: &'static str,
    pub bands: &'static [Band],
    /// Label when no band matches (including NaN)
    pub otherwise: &'static str,
}

impl Classifier {
    pub fn classify(&self, value: f64) -> &'static str {
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map(|band| band.label)
            .unwrap_or(self.otherwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGIME: Classifier = Classifier {
        variable: "reynolds_number",
        bands: &[Band::below(2300.0, "Laminar"), Band::up_to(4000.0, "Transitional")],
        otherwise: "Turbulent",
    };

    #[test]
    fn test_band_edges() {
        assert_eq!(REGIME.classify(2299.9), "Laminar");
        assert_eq!(REGIME.classify(2300.0), "Transitional");
        assert_eq!(REGIME.classify(4000.0), "Transitional");
        assert_eq!(REGIME.classify(4000.1), "Turbulent");
    }

    #[test]
    fn test_nan_falls_through() {
        assert_eq!(REGIME.classify(f64::NAN), "Turbulent");
    }
}
