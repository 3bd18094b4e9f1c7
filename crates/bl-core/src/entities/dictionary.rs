use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A target-system field definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DictionaryField {
    pub label: String,
    pub technical_name: String,
    pub data_type: String,
    /// Declared maximum length in characters.
    pub length: u32,
    pub description: Option<String>,
}

impl DictionaryField {
    #[must_use]
    pub fn new(label: &str, technical_name: &str, data_type: &str, length: u32) -> Self {
        Self {
            label: label.to_string(),
            technical_name: technical_name.to_string(),
            data_type: data_type.to_string(),
            length,
            description: None,
        }
    }
}

/// A target-system table and its fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DictionaryTable {
    pub table_name: String,
    pub description: String,
    pub fields: Vec<DictionaryField>,
}
