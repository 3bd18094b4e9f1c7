//! Typed audit detail payloads.
//!
//! Each trail operation carries a structured `data` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ApprovalLevel, LockHolder, RuleKind};

/// Detail for `TrailOp::Imported`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportedDetail {
    pub batch_number: String,
    pub rows: usize,
    pub fields: Vec<String>,
}

/// Detail for `TrailOp::Transitioned` and `TrailOp::Rejected`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `TrailOp::Locked` and `TrailOp::Released`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LockDetail {
    pub holder: LockHolder,
}

/// Detail for `TrailOp::Acknowledged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AcknowledgedDetail {
    pub level: ApprovalLevel,
    pub signer: String,
}

/// Detail for `TrailOp::Harmonized`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HarmonizedDetail {
    pub kind: RuleKind,
    pub applied: usize,
    pub touched_records: usize,
    pub duration_ms: u64,
}

/// Detail for `TrailOp::RelevanceToggled`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RelevanceDetail {
    pub record_id: String,
    pub is_relevant: bool,
}
