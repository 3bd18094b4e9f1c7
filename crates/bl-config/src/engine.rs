//! Harmonization engine settings.

use std::time::Duration;

use bl_core::enums::ClauseMode;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// How multi-clause conditions are evaluated.
    #[serde(default)]
    pub clause_mode: ClauseMode,

    /// Upper bound for one guarded batch operation, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clause_mode: ClauseMode::default(),
            operation_timeout_ms: default_timeout_ms(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "engine.operation_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
