//! Batch lock manager.
//!
//! At most one of `JOURNEY` and `HARMONIZATION` holds a batch, and a context
//! holds at most one batch. The holder is stored on the batch itself so lock
//! and data change in the same write.

use bl_core::entities::Batch;
use bl_core::enums::LockHolder;
use indexmap::IndexMap;
use tracing::{info, warn};

use crate::error::RegistryError;

/// Refuse when the other context holds the batch. Unlocked batches pass.
///
/// # Errors
///
/// Returns `RegistryError::AccessDenied` naming the current holder.
pub fn ensure_access(batch: &Batch, ctx: LockHolder) -> Result<(), RegistryError> {
    match batch.lock_holder {
        Some(holder) if holder == ctx.other() => Err(RegistryError::AccessDenied {
            id: batch.id.clone(),
            holder,
        }),
        _ => Ok(()),
    }
}

/// Outcome of a lock grant.
#[derive(Debug, Clone)]
pub struct LockGrant {
    pub batch: Batch,
    /// False when `ctx` already held the batch.
    pub changed: bool,
    /// Batches `ctx` held before and released by this grant.
    pub released: Vec<Batch>,
}

/// Ids of the batches other than `except` that `ctx` currently holds.
pub(crate) fn held_by(
    batches: &IndexMap<String, Batch>,
    ctx: LockHolder,
    except: &str,
) -> Vec<String> {
    batches
        .values()
        .filter(|b| b.id != except && b.lock_holder == Some(ctx))
        .map(|b| b.id.clone())
        .collect()
}

/// Grant `ctx` the lock on `id`, releasing whatever else `ctx` held.
/// Re-acquiring a lock already held is a no-op grant.
pub(crate) fn acquire(
    batches: &mut IndexMap<String, Batch>,
    id: &str,
    ctx: LockHolder,
) -> Result<LockGrant, RegistryError> {
    let target = batches
        .get(id)
        .ok_or_else(|| RegistryError::not_found("batch", id))?;
    if let Err(denied) = ensure_access(target, ctx) {
        warn!(batch = id, %ctx, "lock denied");
        return Err(denied);
    }

    let mut released = Vec::new();
    for batch in batches.values_mut() {
        if batch.id != id && batch.lock_holder == Some(ctx) {
            batch.lock_holder = None;
            batch.revision += 1;
            released.push(batch.clone());
        }
    }

    let batch = batches
        .get_mut(id)
        .ok_or_else(|| RegistryError::not_found("batch", id))?;
    let changed = batch.lock_holder != Some(ctx);
    if changed {
        batch.lock_holder = Some(ctx);
        batch.revision += 1;
        info!(batch = id, %ctx, "lock granted");
    }

    Ok(LockGrant {
        batch: batch.clone(),
        changed,
        released,
    })
}

/// Release `ctx`'s lock on `id`. Releasing an unlocked batch is a no-op;
/// returns `None` when nothing changed.
pub(crate) fn release(
    batches: &mut IndexMap<String, Batch>,
    id: &str,
    ctx: LockHolder,
) -> Result<Option<Batch>, RegistryError> {
    let batch = batches
        .get_mut(id)
        .ok_or_else(|| RegistryError::not_found("batch", id))?;
    ensure_access(batch, ctx)?;
    if batch.lock_holder.is_none() {
        return Ok(None);
    }
    batch.lock_holder = None;
    batch.revision += 1;
    info!(batch = id, %ctx, "lock released");
    Ok(Some(batch.clone()))
}
