use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EnrichMode, RuleKind};

/// A stored condition → action directive. Immutable once saved except for
/// deletion and the active flag.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub project_id: String,
    pub kind: RuleKind,
    pub enrich_mode: Option<EnrichMode>,
    pub target_field: Option<String>,
    /// Serialized rule grammar, e.g. `IF (Site == '1000') THEN MODIFY Plant = '1000'`.
    pub logic: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
