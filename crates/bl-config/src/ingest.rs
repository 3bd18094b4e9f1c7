//! CSV ingestion defaults.

use bl_core::enums::ObjectType;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_delimiter() -> String {
    String::from(",")
}

fn default_uploaded_by() -> String {
    String::from("Active User")
}

const fn default_object_type() -> ObjectType {
    ObjectType::MaterialMaster
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Field delimiter; exactly one ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    #[serde(default = "default_object_type")]
    pub object_type: ObjectType,

    /// Recorded as `uploaded_by` on imported batches.
    #[serde(default = "default_uploaded_by")]
    pub uploaded_by: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            object_type: default_object_type(),
            uploaded_by: default_uploaded_by(),
        }
    }
}

impl IngestConfig {
    /// The delimiter as the single byte the CSV reader expects.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` unless the delimiter is exactly one
    /// ASCII character.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::invalid(
                "ingest.delimiter",
                format!("expected one ASCII character, got {:?}", self.delimiter),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delimiter_is_comma() {
        assert_eq!(IngestConfig::default().delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn semicolon_and_tab_accepted() {
        let mut config = IngestConfig {
            delimiter: ";".into(),
            ..IngestConfig::default()
        };
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        config.delimiter = "\t".into();
        assert_eq!(config.delimiter_byte().unwrap(), b'\t');
    }

    #[test]
    fn multi_char_delimiter_rejected() {
        let config = IngestConfig {
            delimiter: "||".into(),
            ..IngestConfig::default()
        };
        assert!(config.delimiter_byte().is_err());

        let config = IngestConfig {
            delimiter: String::new(),
            ..IngestConfig::default()
        };
        assert!(config.delimiter_byte().is_err());
    }
}
