use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Isolation boundary for batches, rules and workflow groups.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: String,
}
