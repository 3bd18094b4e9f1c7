//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-project `{trail_dir}/{project}.jsonl`
//! files with `serde_jsonlines::append_json_lines`.

use std::path::{Path, PathBuf};

use bl_core::enums::TrailOp;
use bl_core::trail::TrailOperation;
use chrono::Utc;
use serde::Serialize;

use crate::error::RegistryError;

/// Appends trail operations to per-project JSONL files.
#[derive(Debug, Clone)]
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a writer for `trail_dir`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Io` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, RegistryError> {
        std::fs::create_dir_all(&trail_dir)?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// A writer that records nothing.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    /// Append one operation to `{trail_dir}/{op.project}.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Trail` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), RegistryError> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.trail_dir.join(format!("{}.jsonl", op.project));
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| RegistryError::Trail(format!("{}: {e}", path.display())))
    }

    /// Build and append an operation stamped now, with `detail` as its data.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Trail` if `detail` cannot be serialized or the
    /// write fails.
    pub fn record<D: Serialize>(
        &self,
        project: &str,
        op: TrailOp,
        batch: &str,
        detail: &D,
    ) -> Result<(), RegistryError> {
        if !self.enabled {
            return Ok(());
        }
        let data = serde_json::to_value(detail).map_err(|e| RegistryError::Trail(e.to_string()))?;
        self.append(&TrailOperation {
            v: 1,
            ts: Utc::now().to_rfc3339(),
            project: project.to_string(),
            op,
            batch: batch.to_string(),
            data,
        })
    }
}
