//! General application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_project() -> String {
    String::from("P001")
}

fn default_export_dir() -> String {
    String::from(".")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Project used when `--project` is not given.
    #[serde(default = "default_project")]
    pub default_project: String,

    /// Directory for JSONL trail files. Empty disables the trail.
    #[serde(default)]
    pub trail_dir: String,

    /// Directory exported CSV files are written to.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_project: default_project(),
            trail_dir: String::new(),
            export_dir: default_export_dir(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub fn trail_path(&self) -> Option<PathBuf> {
        (!self.trail_dir.is_empty()).then(|| PathBuf::from(&self.trail_dir))
    }

    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(&self.export_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_project, "P001");
        assert!(config.trail_path().is_none());
        assert_eq!(config.export_path(), PathBuf::from("."));
    }

    #[test]
    fn trail_enabled_when_dir_set() {
        let config = GeneralConfig {
            trail_dir: ".batchline/trail".into(),
            ..GeneralConfig::default()
        };
        assert_eq!(config.trail_path(), Some(PathBuf::from(".batchline/trail")));
    }
}
