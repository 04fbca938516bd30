//! Encoder configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.

use crate::error::{QueryError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output settings for the encoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Indent output; key order and content are unchanged
    pub pretty: bool,
}

impl EncoderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| QueryError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| QueryError::Config(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EncoderConfig::from_toml("").unwrap();
        assert_eq!(config, EncoderConfig::default());
        assert!(!config.pretty);
    }

    #[test]
    fn test_from_toml() {
        let config = EncoderConfig::from_toml("pretty = true").unwrap();
        assert!(config.pretty);

        let err = EncoderConfig::from_toml("pretty = \"yes\"").unwrap_err();
        assert!(matches!(err, QueryError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pretty = true").unwrap();

        let config = EncoderConfig::from_file(file.path()).unwrap();
        assert!(config.pretty);

        let err = EncoderConfig::from_file("/nonexistent/druidq.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
