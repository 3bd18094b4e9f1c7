use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A scalar cell value. Imported values are text; rules and callers may store
/// numbers or dates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    /// String form used for comparison, length checks and export.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Date(d) => Cow::Owned(d.format("%Y-%m-%d").to_string()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    /// Length in characters of the string form.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.as_text().chars().count()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One row of legacy data.
///
/// `fields` keeps the imported header order. The fixed wrapper around it
/// (`id`, `is_relevant`, `remarks`, processing flags) never appears among the
/// field keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Record {
    pub id: String,
    pub is_relevant: bool,
    pub fields: IndexMap<String, FieldValue>,
    /// Append-only audit trail of harmonization passes.
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub transformed: bool,
}

impl Record {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: IndexMap<String, FieldValue>) -> Self {
        Self {
            id: id.into(),
            is_relevant: true,
            fields,
            remarks: String::new(),
            deleted: false,
            transformed: false,
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Field value as text; a missing field reads as the empty string.
    #[must_use]
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        self.fields
            .get(field)
            .map_or(Cow::Borrowed(""), FieldValue::as_text)
    }

    /// Set a field, keeping its position if it already exists.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn append_remark(&mut self, line: &str) {
        self.remarks.push_str(line);
    }
}
