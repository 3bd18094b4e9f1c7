//! CLI response types returned as JSON by `bl` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Batch;
use crate::enums::{ApprovalStatus, LockHolder, RuleKind};

/// Compact view of a batch without its records.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchSummary {
    pub id: String,
    pub project_id: String,
    pub batch_number: String,
    pub description: String,
    pub status: ApprovalStatus,
    pub version: u32,
    pub row_count: usize,
    pub lock_holder: Option<LockHolder>,
    pub remarks: Option<String>,
}

impl From<&Batch> for BatchSummary {
    fn from(batch: &Batch) -> Self {
        Self {
            id: batch.id.clone(),
            project_id: batch.project_id.clone(),
            batch_number: batch.batch_number.clone(),
            description: batch.description.clone(),
            status: batch.status,
            version: batch.version,
            row_count: batch.row_count(),
            lock_holder: batch.lock_holder,
            remarks: batch.remarks.clone(),
        }
    }
}

/// Response from `bl harmonize`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HarmonizeResponse {
    pub batch: BatchSummary,
    pub kind: RuleKind,
    pub applied_count: usize,
    pub touched_records: usize,
    pub export_path: Option<String>,
}

/// One lifecycle step executed by `bl pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StageReport {
    pub stage: String,
    pub status: ApprovalStatus,
    pub note: Option<String>,
}

/// Response from `bl pipeline`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PipelineResponse {
    pub batch: BatchSummary,
    pub stages: Vec<StageReport>,
    pub export_path: Option<String>,
}

/// Parse result of a single rule in `bl rule check`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RuleCheckEntry {
    pub kind: RuleKind,
    pub logic: String,
    pub ok: bool,
    pub error: Option<String>,
}

/// Response from `bl rule check`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RuleCheckResponse {
    pub total: usize,
    pub parsable: usize,
    pub rules: Vec<RuleCheckEntry>,
}

/// Fill rate of one field across a batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldFill {
    pub field: String,
    /// Percentage of records with a non-empty value, rounded.
    pub filled_pct: u32,
}

/// Response from `bl stats`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchStats {
    pub total_rows: usize,
    /// Percentage of non-empty cells, rounded.
    pub completeness: u32,
    pub duplicates: usize,
    pub quality_score: f64,
    pub fields: Vec<FieldFill>,
}
