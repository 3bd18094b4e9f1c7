//! Approval state machine steps.
//!
//! Each step takes the current snapshot and returns the next one; the caller
//! persists it with compare-and-swap. A refused step leaves nothing to write.

use bl_core::entities::{ApprovalStamp, Batch};
use bl_core::enums::{ApprovalLevel, ApprovalStatus, OverflowPolicy};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::RegistryError;
use crate::metadata::MetadataReport;

const LEVELS: [ApprovalLevel; 3] = [ApprovalLevel::L1, ApprovalLevel::L2, ApprovalLevel::L3];

/// Refuse changes to approved or rejected batches.
///
/// # Errors
///
/// Returns `RegistryError::Finalized` for a terminal status.
pub fn ensure_open(batch: &Batch) -> Result<(), RegistryError> {
    if batch.status.is_terminal() {
        return Err(RegistryError::Finalized {
            id: batch.id.clone(),
            status: batch.status,
        });
    }
    Ok(())
}

fn advance(batch: &Batch, next: ApprovalStatus) -> Result<Batch, RegistryError> {
    batch.status.ensure_transition(&batch.id, next)?;
    info!(batch = %batch.id, from = %batch.status, to = %next, "status transition");
    Ok(Batch {
        status: next,
        ..batch.clone()
    })
}

/// `DRAFT → META_VALIDATED`. Stores the field map and the pre-flight remark.
/// Overflow warnings pass under `Warn` and refuse under `Block`.
pub fn validate_metadata(
    batch: &Batch,
    report: &MetadataReport,
    policy: OverflowPolicy,
) -> Result<Batch, RegistryError> {
    batch
        .status
        .ensure_transition(&batch.id, ApprovalStatus::MetaValidated)?;
    if report.has_warnings() {
        warn!(batch = %batch.id, warnings = report.warnings.len(), "metadata length overflow");
        if policy == OverflowPolicy::Block {
            return Err(RegistryError::MetadataOverflow {
                warnings: report.warnings.clone(),
            });
        }
    }
    let mut next = advance(batch, ApprovalStatus::MetaValidated)?;
    next.metadata_map = report.map.clone();
    next.remarks = Some(report.remark());
    Ok(next)
}

/// `META_VALIDATED → SUBMITTED`.
pub fn submit(batch: &Batch) -> Result<Batch, RegistryError> {
    advance(batch, ApprovalStatus::Submitted)
}

/// `SUBMITTED → TRANSFORMED`. Marks every non-deleted record transformed.
pub fn transform(batch: &Batch) -> Result<Batch, RegistryError> {
    let mut next = advance(batch, ApprovalStatus::Transformed)?;
    for record in next.records.iter_mut().filter(|r| !r.deleted) {
        record.transformed = true;
    }
    Ok(next)
}

/// `TRANSFORMED → DATA_VALIDATED`, refused when `issues` is non-empty.
pub fn validate_data(batch: &Batch, issues: Vec<String>) -> Result<Batch, RegistryError> {
    batch
        .status
        .ensure_transition(&batch.id, ApprovalStatus::DataValidated)?;
    if !issues.is_empty() {
        return Err(RegistryError::DataValidation { issues });
    }
    advance(batch, ApprovalStatus::DataValidated)
}

/// Stamp an approval level. Levels go L1, L2, L3 while the batch is
/// `DATA_VALIDATED`; only L3 moves it to `APPROVED`.
pub fn acknowledge(
    batch: &Batch,
    level: ApprovalLevel,
    signer: &str,
    at: DateTime<Utc>,
) -> Result<Batch, RegistryError> {
    batch
        .status
        .ensure_transition(&batch.id, ApprovalStatus::Approved)?;

    let in_order = !batch.has_acknowledged(level)
        && level.predecessor().is_none_or(|prev| batch.has_acknowledged(prev));
    if !in_order {
        let expected = LEVELS.into_iter().find(|l| !batch.has_acknowledged(*l));
        return Err(RegistryError::ApprovalOutOfOrder { level, expected });
    }

    let mut next = if level.is_final() {
        advance(batch, ApprovalStatus::Approved)?
    } else {
        batch.clone()
    };
    next.approvals.push(ApprovalStamp {
        level,
        signer: signer.to_string(),
        at,
    });
    info!(batch = %batch.id, %level, signer, "approval acknowledged");
    Ok(next)
}

/// Move to the terminal `REJECTED` state.
pub fn reject(batch: &Batch, reason: &str, bump_version: bool) -> Result<Batch, RegistryError> {
    let mut next = advance(batch, ApprovalStatus::Rejected)?;
    next.rejection_reason = Some(reason.to_string());
    if bump_version {
        next.version += 1;
    }
    Ok(next)
}
