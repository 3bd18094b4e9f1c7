//! Pre-flight metadata check: map source headers onto dictionary fields and
//! compare observed value lengths with the declared ones.

use bl_core::entities::Batch;
use indexmap::IndexMap;

use crate::dictionary::FieldDictionary;

pub const PREFLIGHT_OK: &str = "Pre-flight Validation Successful.";

/// Result of inspecting a batch against a field dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataReport {
    /// Source header → technical name, in header order.
    pub map: IndexMap<String, String>,
    /// One line per field whose longest value exceeds the declared length.
    pub warnings: Vec<String>,
    pub unmapped: Vec<String>,
}

impl MetadataReport {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Batch-level remark stored after validation.
    #[must_use]
    pub fn remark(&self) -> String {
        if self.warnings.is_empty() {
            PREFLIGHT_OK.to_string()
        } else {
            self.warnings.join(" ")
        }
    }
}

/// Inspect every user-visible header of `batch`. Unmatched headers are
/// listed, not reported as errors.
pub fn inspect(batch: &Batch, dictionary: &dyn FieldDictionary) -> MetadataReport {
    let mut report = MetadataReport::default();
    let headers: Vec<&str> = batch
        .field_names()
        .into_iter()
        .filter(|h| !h.starts_with('_'))
        .collect();

    for header in headers {
        let Some(field) = dictionary.find_match(header) else {
            report.unmapped.push(header.to_string());
            continue;
        };
        report
            .map
            .insert(header.to_string(), field.technical_name.clone());

        let longest = batch
            .records
            .iter()
            .map(|r| r.get(header).map_or(0, |v| v.char_len()))
            .max()
            .unwrap_or(0);
        if longest > field.length as usize {
            report.warnings.push(format!(
                "Warning: Field {header} exceeds SAP length {}.",
                field.length
            ));
        }
    }
    report
}
