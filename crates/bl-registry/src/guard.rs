//! Per-batch busy guard and bounded blocking execution.
//!
//! One in-flight permit per batch id. The permit travels with the work it
//! protects, so a run that outlives its timeout keeps the batch busy until
//! it actually finishes.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::warn;

use crate::error::RegistryError;

type Inflight = Arc<Mutex<HashSet<String>>>;

fn lock(set: &Inflight) -> MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct BusyGuard {
    inflight: Inflight,
}

impl BusyGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the permit for `id`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Busy` while another permit for `id` is alive.
    pub fn try_acquire(&self, id: &str) -> Result<BusyPermit, RegistryError> {
        if !lock(&self.inflight).insert(id.to_string()) {
            return Err(RegistryError::Busy { id: id.to_string() });
        }
        Ok(BusyPermit {
            id: id.to_string(),
            inflight: Arc::clone(&self.inflight),
        })
    }

    #[must_use]
    pub fn is_busy(&self, id: &str) -> bool {
        lock(&self.inflight).contains(id)
    }
}

/// Released on drop.
#[derive(Debug)]
pub struct BusyPermit {
    id: String,
    inflight: Inflight,
}

impl Drop for BusyPermit {
    fn drop(&mut self) {
        lock(&self.inflight).remove(&self.id);
    }
}

/// Run `work` on the blocking pool, bounded by `timeout`.
///
/// On success the permit is handed back so the caller can persist the result
/// while still holding it. On timeout the result is discarded.
///
/// # Errors
///
/// Returns `RegistryError::Timeout` when `timeout` elapses first and
/// `RegistryError::Other` if the task panicked.
pub async fn run_blocking<T, F>(
    permit: BusyPermit,
    timeout: Duration,
    work: F,
) -> Result<(BusyPermit, T), RegistryError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let id = permit.id.clone();
    let task = tokio::task::spawn_blocking(move || {
        let value = work();
        (permit, value)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(done)) => Ok(done),
        Ok(Err(e)) => Err(RegistryError::Other(anyhow::anyhow!(
            "batch {id}: worker failed: {e}"
        ))),
        Err(_) => {
            warn!(batch = %id, timeout_ms = timeout.as_millis(), "operation timed out");
            Err(RegistryError::Timeout {
                id,
                ms: timeout.as_millis(),
            })
        }
    }
}
