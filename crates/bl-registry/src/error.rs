//! Registry error types.

use bl_config::ConfigError;
use bl_core::enums::{ApprovalLevel, ApprovalStatus, LockHolder, RuleKind};
use bl_core::errors::CoreError;
use bl_rules::EngineError;
use thiserror::Error;

/// Errors from registry operations. Every variant is a refusal: no batch
/// state is written when one is returned.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Missing batch, rule or record, or a disallowed status transition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The batch is locked by the other processing context.
    #[error("Access denied: batch {id} is currently held by {holder}")]
    AccessDenied { id: String, holder: LockHolder },

    #[error("No {kind} rules are configured for this project")]
    NoRulesConfigured { kind: RuleKind },

    #[error("Import contains no records")]
    EmptyImport,

    /// Another guarded operation is in flight on the batch.
    #[error("Batch {id} is busy with another operation")]
    Busy { id: String },

    #[error("Operation on batch {id} timed out after {ms} ms")]
    Timeout { id: String, ms: u128 },

    /// Stale compare-and-swap.
    #[error("Batch {id} changed concurrently (expected revision {expected}, found {actual})")]
    Conflict {
        id: String,
        expected: u64,
        actual: u64,
    },

    #[error("Metadata validation failed: {}", .warnings.join(" "))]
    MetadataOverflow { warnings: Vec<String> },

    #[error("Data validation failed: {}", .issues.join("; "))]
    DataValidation { issues: Vec<String> },

    #[error("Approval {level} is out of order (expected {})", .expected.map_or("none", ApprovalLevel::as_str))]
    ApprovalOutOfOrder {
        level: ApprovalLevel,
        expected: Option<ApprovalLevel>,
    },

    /// Approved and rejected batches accept no further changes.
    #[error("Batch {id} is {status} and can no longer be changed")]
    Finalized { id: String, status: ApprovalStatus },

    #[error("CSV error: {0}")]
    Import(#[from] csv::Error),

    #[error("Trail write failed: {0}")]
    Trail(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<EngineError> for RegistryError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::NoRulesConfigured { kind } => Self::NoRulesConfigured { kind },
        }
    }
}

impl RegistryError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::Core(CoreError::not_found(kind, id))
    }
}
