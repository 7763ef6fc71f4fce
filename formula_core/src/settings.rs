//! # Settings
//!
//! User-adjustable presentation settings, loaded from a JSON file. Every field
//! has a default, so an empty object (or no file at all) is valid.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "format": {
//!     "fixed_decimals": 6,
//!     "max_fixed_magnitude": 1000000.0
//!   }
//! }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::format::FormatSettings;

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How results are rendered
    pub format: FormatSettings,
}

impl Settings {
    /// Parse and validate a settings document.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CalcError::settings(format!("Invalid JSON: {}", e)))?;
        settings.format.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            CalcError::settings(format!("Cannot open {}: {}", path.display(), e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            CalcError::settings(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let settings = Self::from_json_str(&contents).map_err(|e| match e {
            CalcError::Settings { reason } => {
                CalcError::settings(format!("{} ({})", reason, path.display()))
            }
            other => other,
        })?;

        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_default() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_json_str(r#"{"format": {"invalid_marker": "n/a"}}"#).unwrap();
        assert_eq!(settings.format.invalid_marker, "n/a");
        assert_eq!(settings.format.fixed_decimals, 4);
    }

    #[test]
    fn test_inconsistent_band_rejected() {
        let err = Settings::from_json_str(
            r#"{"format": {"min_fixed_magnitude": 10.0, "max_fixed_magnitude": 1.0}}"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "SETTINGS_ERROR");
    }

    #[test]
    fn test_malformed_json() {
        let err = Settings::from_json_str("{format:").unwrap_err();
        assert!(matches!(err, CalcError::Settings { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("formula_settings_{}.json", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            file.write_all(br#"{"format": {"fixed_decimals": 2}}"#).unwrap();
        }
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.format.fixed_decimals, 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load(Path::new("/nonexistent/formula_settings.json")).unwrap_err();
        match err {
            CalcError::Settings { reason } => assert!(reason.contains("Cannot open")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
