//! # bl-config
//!
//! Layered configuration loading for Batchline using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`BATCHLINE_*` prefix, `__` as separator)
//! 2. Project-level `.batchline/config.toml`
//! 3. User-level `~/.config/batchline/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `BATCHLINE_ENGINE__CLAUSE_MODE` -> `engine.clause_mode`,
//! `BATCHLINE_GENERAL__TRAIL_DIR` -> `general.trail_dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use bl_config::BlConfig;
//!
//! let config = BlConfig::load_with_dotenv().expect("config");
//! println!("timeout: {:?}", config.engine.operation_timeout());
//! ```

mod engine;
mod error;
mod general;
mod ingest;
mod lifecycle;

pub use engine::EngineConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use ingest::IngestConfig;
pub use lifecycle::LifecycleConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "BATCHLINE_";
pub const LOCAL_CONFIG_PATH: &str = ".batchline/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BlConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl BlConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` when a source cannot be parsed and
    /// `ConfigError::InvalidValue` when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check values serde cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.ingest.delimiter_byte()?;
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("batchline").join("config.toml"))
    }
}
