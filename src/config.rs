//! Top-level configuration
//!
//! Sender and receiver must load the same grid and codec sections; neither
//! the grid spacing nor the projection rule travels with the payload.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::CodecConfig;
use crate::error::Result;
use crate::grid::GridConfig;
use crate::pipeline::ZoneSelection;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub codec: CodecConfig,
    pub selection: ZoneSelection,
}

impl Config {
    /// Parses a JSON document; missing sections and fields take their defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.codec.validate()?;
        self.selection.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::compression::Compression;
    use crate::projection::ZoneRule;
    use crate::text::TextEncoding;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid.spacing_m, 100.0);
        assert_eq!(config.codec.compression, Compression::Deflate);
        assert_eq!(config.codec.text, TextEncoding::Base85);
        assert_eq!(config.selection.max_zones, Some(10));
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_json_str(
            r#"{
                "grid": {"spacing_m": 50.0},
                "codec": {"text": "base64", "quantization": {"area_scale": 100.0}},
                "selection": {"max_zones": null}
            }"#,
        )
        .unwrap();
        assert_eq!(config.grid.spacing_m, 50.0);
        assert_eq!(config.grid.zone_rule, ZoneRule::Standard);
        assert_eq!(config.codec.text, TextEncoding::Base64);
        assert_eq!(config.codec.quantization.area_scale, 100.0);
        assert_eq!(config.codec.quantization.ndvi_scale, 1000.0);
        assert_eq!(config.selection.max_zones, None);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"grid": {{"spacing_m": 250.0}}}}"#).unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid.spacing_m, 250.0);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_json_file("/nonexistent/ndvi-zone-codec.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_json_str(r#"{"grid": {"spacing_m": -1.0}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"codec": {"compression_level": 12}}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{"selection": {"min_area_m2": 5000.0, "max_area_m2": 100.0}}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Config::from_json_str("{grid"), Err(Error::Json(_))));
    }
}
