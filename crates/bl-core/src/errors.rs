//! Conditions shared by every Batchline crate.
//!
//! Crate-specific failures (`ParseError`, `RegistryError`, ...) wrap
//! `CoreError` instead of repeating these variants.

use thiserror::Error;

use crate::enums::ApprovalStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// The approval state machine refused a step.
    #[error("Batch {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: ApprovalStatus,
        to: ApprovalStatus,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
