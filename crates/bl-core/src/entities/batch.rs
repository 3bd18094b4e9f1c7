use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Record;
use crate::enums::{ApprovalLevel, ApprovalStatus, LockHolder, ObjectType};

/// A versioned, project-scoped collection of records moving through the
/// approval lifecycle.
///
/// `version` is the business version shown to users. `revision` increases on
/// every replacement in the registry and is what compare-and-swap checks.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Batch {
    pub id: String,
    pub project_id: String,
    pub batch_number: String,
    pub description: String,
    pub object_type: ObjectType,
    pub status: ApprovalStatus,
    pub version: u32,
    #[serde(default)]
    pub revision: u64,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub records: Vec<Record>,
    pub lock_holder: Option<LockHolder>,
    /// Source field → dictionary technical name.
    #[serde(default)]
    pub metadata_map: IndexMap<String, String>,
    /// Batch-level remark (metadata validation outcome).
    pub remarks: Option<String>,
    #[serde(default)]
    pub approvals: Vec<ApprovalStamp>,
    pub rejection_reason: Option<String>,
}

impl Batch {
    /// Always the record sequence length.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Field keys shared by every record (taken from the first record).
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.fields.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn record(&self, record_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == record_id)
    }

    #[must_use]
    pub fn has_acknowledged(&self, level: ApprovalLevel) -> bool {
        self.approvals.iter().any(|a| a.level == level)
    }
}

/// An approval acknowledgement recorded against a batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApprovalStamp {
    pub level: ApprovalLevel,
    pub signer: String,
    pub at: DateTime<Utc>,
}
