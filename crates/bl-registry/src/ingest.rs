//! CSV ingestion into records.

use bl_core::entities::{FieldValue, Record};
use csv::{ReaderBuilder, Trim};
use indexmap::IndexMap;

use crate::error::RegistryError;

/// Parse delimited text with a header row into records `1..N`.
///
/// Headers and values are trimmed, blank lines skipped, short rows padded
/// with empty values and extra cells dropped. Columns with a blank header are
/// ignored.
///
/// # Errors
///
/// Returns `RegistryError::EmptyImport` when there is no header or no data
/// row, and `RegistryError::Import` for malformed input.
pub fn parse_csv(content: &str, delimiter: u8) -> Result<Vec<Record>, RegistryError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        return Err(RegistryError::EmptyImport);
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        let fields: IndexMap<String, FieldValue> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| (h.clone(), FieldValue::from(row.get(i).unwrap_or(""))))
            .collect();
        records.push(Record::new((records.len() + 1).to_string(), fields));
    }

    if records.is_empty() {
        return Err(RegistryError::EmptyImport);
    }
    Ok(records)
}
