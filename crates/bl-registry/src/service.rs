//! `BatchRegistry`: the single owner of batch state.
//!
//! Every mutation follows the same path: take the batch's busy permit, read
//! the current snapshot, check the lock, compute the next snapshot, store it
//! with compare-and-swap, then append a trail line. Refusals write nothing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bl_config::BlConfig;
use bl_core::audit_detail::{
    AcknowledgedDetail, HarmonizedDetail, ImportedDetail, LockDetail, RelevanceDetail,
    StatusChangedDetail,
};
use bl_core::entities::Batch;
use bl_core::enums::{ApprovalLevel, ApprovalStatus, LockHolder, RuleKind, TrailOp};
use bl_core::ids;
use bl_core::responses::BatchStats;
use bl_rules::HarmonizationEngine;
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dictionary::{FieldDictionary, SapMaterialDictionary};
use crate::error::RegistryError;
use crate::guard::{self, BusyGuard};
use crate::metadata::{self, MetadataReport};
use crate::rules::RuleBook;
use crate::store::BatchStore;
use crate::trail::TrailWriter;
use crate::validator::{AcceptAll, DataValidator};
use crate::{export, ingest, lifecycle, lock, stats};

/// Result of a metadata validation run.
#[derive(Debug, Clone)]
pub struct MetadataValidation {
    pub batch: Batch,
    pub report: MetadataReport,
}

/// Result of a harmonization pass.
#[derive(Debug, Clone)]
pub struct Harmonized {
    pub batch: Batch,
    pub applied_count: usize,
    pub touched_records: usize,
}

pub struct BatchRegistry {
    store: BatchStore,
    rules: RuleBook,
    busy: BusyGuard,
    trail: TrailWriter,
    dictionary: Arc<dyn FieldDictionary>,
    validator: Arc<dyn DataValidator>,
    engine: HarmonizationEngine,
    config: BlConfig,
    delimiter: u8,
}

impl BatchRegistry {
    /// Build a registry from configuration. The trail is enabled when
    /// `general.trail_dir` is set.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Config` for an invalid delimiter and
    /// `RegistryError::Io` if the trail directory cannot be created.
    pub fn new(config: BlConfig) -> Result<Self, RegistryError> {
        let delimiter = config.ingest.delimiter_byte()?;
        let trail = match config.general.trail_path() {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self {
            store: BatchStore::new(),
            rules: RuleBook::new(),
            busy: BusyGuard::new(),
            trail,
            dictionary: Arc::new(SapMaterialDictionary::new()),
            validator: Arc::new(AcceptAll),
            engine: HarmonizationEngine::new(config.engine.clause_mode),
            config,
            delimiter,
        })
    }

    #[must_use]
    pub fn with_trail(mut self, trail: TrailWriter) -> Self {
        self.trail = trail;
        self
    }

    #[must_use]
    pub fn with_dictionary(mut self, dictionary: Arc<dyn FieldDictionary>) -> Self {
        self.dictionary = dictionary;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn DataValidator>) -> Self {
        self.validator = validator;
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleBook {
        &self.rules
    }

    #[must_use]
    pub const fn config(&self) -> &BlConfig {
        &self.config
    }

    const fn timeout(&self) -> Duration {
        self.config.engine.operation_timeout()
    }

    /// Whether a guarded operation is in flight on `id`.
    #[must_use]
    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.is_busy(id)
    }

    fn log_trail<D: Serialize>(&self, batch: &Batch, op: TrailOp, detail: &D) {
        if let Err(e) = self.trail.record(&batch.project_id, op, &batch.id, detail) {
            warn!(batch = %batch.id, %op, error = %e, "trail append failed");
        }
    }

    fn log_transition(&self, from: &Batch, to: &Batch, reason: Option<&str>) {
        let op = if to.status == ApprovalStatus::Rejected {
            TrailOp::Rejected
        } else {
            TrailOp::Transitioned
        };
        self.log_trail(
            to,
            op,
            &StatusChangedDetail {
                from: from.status.to_string(),
                to: to.status.to_string(),
                reason: reason.map(String::from),
            },
        );
    }

    // -----------------------------------------------------------------------
    // Ingestion and reads
    // -----------------------------------------------------------------------

    /// Import delimited text as a new `Draft` batch numbered for today.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::EmptyImport` when there are no data rows; no
    /// batch is created.
    pub async fn import(
        &self,
        project_id: &str,
        description: &str,
        content: &str,
    ) -> Result<Batch, RegistryError> {
        self.import_on(project_id, description, content, Local::now().date_naive())
            .await
    }

    /// [`Self::import`] with an explicit numbering date.
    ///
    /// # Errors
    ///
    /// See [`Self::import`].
    pub async fn import_on(
        &self,
        project_id: &str,
        description: &str,
        content: &str,
        date: NaiveDate,
    ) -> Result<Batch, RegistryError> {
        let records = ingest::parse_csv(content, self.delimiter)?;
        let now = Utc::now();
        let batch = Batch {
            id: ids::batch_id(now),
            project_id: project_id.to_string(),
            batch_number: String::new(),
            description: description.to_string(),
            object_type: self.config.ingest.object_type,
            status: ApprovalStatus::Draft,
            version: 1,
            revision: 0,
            uploaded_by: self.config.ingest.uploaded_by.clone(),
            uploaded_at: now,
            records,
            lock_holder: None,
            metadata_map: indexmap::IndexMap::new(),
            remarks: None,
            approvals: Vec::new(),
            rejection_reason: None,
        };
        let batch = self.store.insert_numbered(batch, date).await;
        info!(
            batch = %batch.id,
            number = %batch.batch_number,
            rows = batch.row_count(),
            "batch imported"
        );
        self.log_trail(
            &batch,
            TrailOp::Imported,
            &ImportedDetail {
                batch_number: batch.batch_number.clone(),
                rows: batch.row_count(),
                fields: batch.field_names().into_iter().map(String::from).collect(),
            },
        );
        Ok(batch)
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Batch, RegistryError> {
        self.store.get(id).await
    }

    /// Batches of one project, newest first.
    pub async fn list(&self, project_id: &str) -> Vec<Batch> {
        self.store.list(project_id).await
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id.
    pub async fn stats(&self, id: &str) -> Result<BatchStats, RegistryError> {
        Ok(stats::compute(&self.store.get(id).await?))
    }

    /// Write the batch as CSV into the configured export directory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown id and
    /// `RegistryError::Io` if the file cannot be written.
    pub async fn export(&self, id: &str, ctx: LockHolder) -> Result<PathBuf, RegistryError> {
        let batch = self.store.get(id).await?;
        let path = export::export_csv(&batch, ctx, &self.config.general.export_path())?;
        debug!(batch = id, path = %path.display(), "batch exported");
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Locks
    // -----------------------------------------------------------------------

    /// Grant `ctx` the lock on `id`, releasing any other batch `ctx` held.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AccessDenied` when the other context holds the
    /// batch and `RegistryError::Busy` while an operation is in flight on the
    /// batch or on any batch `ctx` would have to give up. Nothing changes when
    /// the grant is refused.
    pub async fn acquire_lock(&self, id: &str, ctx: LockHolder) -> Result<Batch, RegistryError> {
        let _permit = self.busy.try_acquire(id)?;
        let grant = {
            let mut batches = self.store.write().await;
            let _released_permits = lock::held_by(&batches, ctx, id)
                .iter()
                .map(|held| self.busy.try_acquire(held))
                .collect::<Result<Vec<_>, _>>()
                .inspect_err(|busy| warn!(batch = id, %ctx, %busy, "lock switch refused"))?;
            lock::acquire(&mut batches, id, ctx)?
        };
        for released in &grant.released {
            self.log_trail(released, TrailOp::Released, &LockDetail { holder: ctx });
        }
        if grant.changed {
            self.log_trail(&grant.batch, TrailOp::Locked, &LockDetail { holder: ctx });
        }
        Ok(grant.batch)
    }

    /// Release `ctx`'s lock on `id`. Releasing an unlocked batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::AccessDenied` when the other context holds the
    /// batch.
    pub async fn release_lock(&self, id: &str, ctx: LockHolder) -> Result<Batch, RegistryError> {
        let _permit = self.busy.try_acquire(id)?;
        let released = {
            let mut batches = self.store.write().await;
            lock::release(&mut batches, id, ctx)?
        };
        match released {
            Some(batch) => {
                self.log_trail(&batch, TrailOp::Released, &LockDetail { holder: ctx });
                Ok(batch)
            }
            None => self.store.get(id).await,
        }
    }

    // -----------------------------------------------------------------------
    // Guarded mutation
    // -----------------------------------------------------------------------

    /// Quick read-modify-CAS under the busy permit.
    async fn mutate<F>(
        &self,
        id: &str,
        ctx: LockHolder,
        step: F,
    ) -> Result<(Batch, Batch), RegistryError>
    where
        F: FnOnce(&Batch) -> Result<Batch, RegistryError>,
    {
        let _permit = self.busy.try_acquire(id)?;
        let current = self.store.get(id).await?;
        lock::ensure_access(&current, ctx)?;
        let next = step(&current)?;
        let saved = self.store.compare_and_swap(current.revision, next).await?;
        Ok((current, saved))
    }

    /// Read-modify-CAS with the step on the blocking pool under the
    /// operation timeout. A timed-out step is discarded.
    async fn mutate_blocking<F, R>(
        &self,
        id: &str,
        ctx: LockHolder,
        step: F,
    ) -> Result<(Batch, Batch, R), RegistryError>
    where
        F: FnOnce(&Batch) -> Result<(Batch, R), RegistryError> + Send + 'static,
        R: Send + 'static,
    {
        let permit = self.busy.try_acquire(id)?;
        let current = self.store.get(id).await?;
        lock::ensure_access(&current, ctx)?;
        let snapshot = current.clone();
        let (_permit, result) =
            guard::run_blocking(permit, self.timeout(), move || step(&snapshot)).await?;
        let (next, extra) = result?;
        let saved = self.store.compare_and_swap(current.revision, next).await?;
        Ok((current, saved, extra))
    }

    // -----------------------------------------------------------------------
    // Approval lifecycle (JOURNEY context)
    // -----------------------------------------------------------------------

    /// `DRAFT → META_VALIDATED` against the field dictionary.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::MetadataOverflow` under the `block` policy when
    /// a value exceeds its declared length, plus the common refusals.
    pub async fn validate_metadata(&self, id: &str) -> Result<MetadataValidation, RegistryError> {
        let dictionary = Arc::clone(&self.dictionary);
        let policy = self.config.lifecycle.metadata_overflow;
        let (before, batch, report) =
            self.mutate_blocking(id, LockHolder::Journey, move |batch| {
                let report = metadata::inspect(batch, dictionary.as_ref());
                let next = lifecycle::validate_metadata(batch, &report, policy)?;
                Ok((next, report))
            })
            .await?;
        self.log_transition(&before, &batch, None);
        Ok(MetadataValidation { batch, report })
    }

    /// `META_VALIDATED → SUBMITTED`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` from any other status.
    pub async fn submit(&self, id: &str) -> Result<Batch, RegistryError> {
        let (before, batch) = self.mutate(id, LockHolder::Journey, lifecycle::submit).await?;
        self.log_transition(&before, &batch, None);
        Ok(batch)
    }

    /// `SUBMITTED → TRANSFORMED`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` from any other status.
    pub async fn transform(&self, id: &str) -> Result<Batch, RegistryError> {
        let (before, batch, ()) = self
            .mutate_blocking(id, LockHolder::Journey, |batch| {
                Ok((lifecycle::transform(batch)?, ()))
            })
            .await?;
        self.log_transition(&before, &batch, None);
        Ok(batch)
    }

    /// `TRANSFORMED → DATA_VALIDATED` through the configured validator.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DataValidation` when the validator reports
    /// issues.
    pub async fn validate_data(&self, id: &str) -> Result<Batch, RegistryError> {
        let validator = Arc::clone(&self.validator);
        let (before, batch, ()) = self
            .mutate_blocking(id, LockHolder::Journey, move |batch| {
                let issues = validator.validate(batch);
                Ok((lifecycle::validate_data(batch, issues)?, ()))
            })
            .await?;
        self.log_transition(&before, &batch, None);
        Ok(batch)
    }

    /// Stamp approval `level`. L3 moves the batch to `APPROVED`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ApprovalOutOfOrder` for a skipped or repeated
    /// level.
    pub async fn acknowledge(
        &self,
        id: &str,
        level: ApprovalLevel,
        signer: &str,
    ) -> Result<Batch, RegistryError> {
        let (before, batch) = self
            .mutate(id, LockHolder::Journey, |batch| {
                lifecycle::acknowledge(batch, level, signer, Utc::now())
            })
            .await?;
        self.log_trail(
            &batch,
            TrailOp::Acknowledged,
            &AcknowledgedDetail {
                level,
                signer: signer.to_string(),
            },
        );
        if before.status != batch.status {
            self.log_transition(&before, &batch, None);
        }
        Ok(batch)
    }

    /// Move the batch to the terminal `REJECTED` state.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` from `DRAFT` or a terminal
    /// status.
    pub async fn reject(&self, id: &str, reason: &str) -> Result<Batch, RegistryError> {
        let bump = self.config.lifecycle.bump_version_on_reject;
        let (before, batch) = self
            .mutate(id, LockHolder::Journey, |batch| {
                lifecycle::reject(batch, reason, bump)
            })
            .await?;
        self.log_transition(&before, &batch, Some(reason));
        Ok(batch)
    }

    // -----------------------------------------------------------------------
    // Harmonization (HARMONIZATION context)
    // -----------------------------------------------------------------------

    /// Run the project's `kind` rules over the batch.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NoRulesConfigured` before starting when the
    /// project has no `kind` rules, `RegistryError::Finalized` for approved
    /// or rejected batches, and `RegistryError::Timeout` when the pass
    /// overruns.
    pub async fn harmonize(&self, id: &str, kind: RuleKind) -> Result<Harmonized, RegistryError> {
        let project_id = self.store.get(id).await?.project_id;
        let rules = self.rules.list(&project_id, Some(kind)).await;
        if rules.is_empty() {
            return Err(RegistryError::NoRulesConfigured { kind });
        }

        let engine = self.engine;
        let started = Instant::now();
        let (_, batch, (applied_count, touched_records)) = self
            .mutate_blocking(id, LockHolder::Harmonization, move |batch| {
                lifecycle::ensure_open(batch)?;
                let at = Local::now().time();
                let outcome = engine.apply(kind, &batch.records, &rules, at)?;
                let next = Batch {
                    records: outcome.records,
                    ..batch.clone()
                };
                Ok((next, (outcome.applied_count, outcome.touched_records)))
            })
            .await?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(batch = id, %kind, applied_count, touched_records, duration_ms, "harmonization pass");
        self.log_trail(
            &batch,
            TrailOp::Harmonized,
            &HarmonizedDetail {
                kind,
                applied: applied_count,
                touched_records,
                duration_ms,
            },
        );
        Ok(Harmonized {
            batch,
            applied_count,
            touched_records,
        })
    }

    /// Flip one record's relevance flag.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown record and
    /// `RegistryError::Finalized` for approved or rejected batches.
    pub async fn toggle_relevance(
        &self,
        id: &str,
        record_id: &str,
    ) -> Result<Batch, RegistryError> {
        let (_, batch) = self
            .mutate(id, LockHolder::Harmonization, |batch| {
                lifecycle::ensure_open(batch)?;
                let mut next = batch.clone();
                let record = next
                    .records
                    .iter_mut()
                    .find(|r| r.id == record_id)
                    .ok_or_else(|| RegistryError::not_found("record", record_id))?;
                record.is_relevant = !record.is_relevant;
                Ok(next)
            })
            .await?;
        let is_relevant = batch.record(record_id).is_some_and(|r| r.is_relevant);
        self.log_trail(
            &batch,
            TrailOp::RelevanceToggled,
            &RelevanceDetail {
                record_id: record_id.to_string(),
                is_relevant,
            },
        );
        Ok(batch)
    }
}
