//! ID prefixes and generation helpers.
//!
//! Batch ids are derived from a high-resolution timestamp and are never shown
//! to users; the human-facing identifier is the batch number (see the
//! numbering allocator in `bl-registry`). Rule ids carry a random hex suffix.

use chrono::{DateTime, Utc};

use crate::errors::CoreError;

pub const PREFIX_BATCH: &str = "BATCH";
pub const PREFIX_RULE: &str = "rul";
pub const PREFIX_PROJECT: &str = "P";

/// Internal batch id, e.g. `BATCH_1740045600000123456`.
#[must_use]
pub fn batch_id(now: DateTime<Utc>) -> String {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
    format!("{PREFIX_BATCH}_{nanos}")
}

/// Random prefixed id, e.g. `rul-a3f8b2c1`.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS random source is unavailable.
pub fn random_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 4];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("failed to generate id: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format!("{prefix}-{hex}"))
}

/// Rule id with the `rul-` prefix.
///
/// # Errors
///
/// See [`random_id`].
pub fn rule_id() -> Result<String, CoreError> {
    random_id(PREFIX_RULE)
}
