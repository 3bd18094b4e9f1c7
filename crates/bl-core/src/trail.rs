//! JSONL trail operation envelope.
//!
//! Every registry mutation is recorded as a `TrailOperation` in per-project
//! `{trail_dir}/{project_id}.jsonl` files.
//!
//! The `v` field supports schema versioning: trail lines without a `v` field
//! deserialize with `v == 1` via `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TrailOp;

const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
///
/// `data` carries the matching `audit_detail` payload for `op`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// ISO 8601 timestamp of the operation.
    pub ts: String,

    /// Project the batch belongs to.
    pub project: String,

    pub op: TrailOp,

    /// Internal id of the affected batch.
    pub batch: String,

    pub data: serde_json::Value,
}
