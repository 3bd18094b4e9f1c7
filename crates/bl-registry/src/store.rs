//! In-memory batch collection with compare-and-swap replacement.

use bl_core::entities::Batch;
use chrono::NaiveDate;
use indexmap::IndexMap;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::error::RegistryError;
use crate::numbering;

/// The canonical collection of batches, keyed by internal id.
///
/// Every write replaces a whole batch. `compare_and_swap` only succeeds when
/// the caller saw the latest `revision`.
#[derive(Debug, Default)]
pub struct BatchStore {
    batches: RwLock<IndexMap<String, Batch>>,
}

impl BatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one batch.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Batch, RegistryError> {
        self.batches
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::not_found("batch", id))
    }

    /// Batches of one project, newest first.
    pub async fn list(&self, project_id: &str) -> Vec<Batch> {
        self.batches
            .read()
            .await
            .values()
            .rev()
            .filter(|b| b.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Assign the next batch number for `date` and insert, under one write.
    /// An id collision gets a numeric suffix.
    pub async fn insert_numbered(&self, mut batch: Batch, date: NaiveDate) -> Batch {
        let mut batches = self.batches.write().await;
        batch.batch_number = numbering::next_batch_number(
            batches
                .values()
                .filter(|b| b.project_id == batch.project_id)
                .map(|b| b.batch_number.as_str()),
            date,
        );
        batch.revision = 0;
        let base = batch.id.clone();
        let mut n = 1;
        while batches.contains_key(&batch.id) {
            batch.id = format!("{base}_{n}");
            n += 1;
        }
        batches.insert(batch.id.clone(), batch.clone());
        batch
    }

    /// Replace a batch if its stored revision is still `expected_revision`.
    /// The stored copy gets `expected_revision + 1`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Conflict` on a stale revision and
    /// `CoreError::NotFound` for an unknown id.
    pub async fn compare_and_swap(
        &self,
        expected_revision: u64,
        mut batch: Batch,
    ) -> Result<Batch, RegistryError> {
        let mut batches = self.batches.write().await;
        let current = batches
            .get_mut(&batch.id)
            .ok_or_else(|| RegistryError::not_found("batch", &batch.id))?;
        if current.revision != expected_revision {
            return Err(RegistryError::Conflict {
                id: batch.id,
                expected: expected_revision,
                actual: current.revision,
            });
        }
        batch.revision = expected_revision + 1;
        *current = batch.clone();
        Ok(batch)
    }

    /// Exclusive access for operations that touch several batches at once.
    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, IndexMap<String, Batch>> {
        self.batches.write().await
    }
}
