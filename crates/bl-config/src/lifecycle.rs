//! Approval lifecycle policy.

use bl_core::enums::OverflowPolicy;
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LifecycleConfig {
    /// What metadata validation does when a value exceeds its dictionary length.
    #[serde(default)]
    pub metadata_overflow: OverflowPolicy,

    /// Increment the business version when a batch is rejected.
    #[serde(default = "default_true")]
    pub bump_version_on_reject: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            metadata_overflow: OverflowPolicy::default(),
            bump_version_on_reject: true,
        }
    }
}
