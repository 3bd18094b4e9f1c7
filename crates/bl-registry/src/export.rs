//! CSV export of a batch's records.

use std::path::{Path, PathBuf};

use bl_core::entities::Batch;
use bl_core::enums::LockHolder;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use indexmap::IndexSet;

use crate::error::RegistryError;

/// Export file name, e.g. `M202502200001_harmonized.csv`.
#[must_use]
pub fn file_name(batch: &Batch, holder: LockHolder) -> String {
    format!("{}_{}.csv", batch.batch_number, holder.export_suffix())
}

/// Header: every field key in first-seen order, internal `_` keys excluded.
fn columns(batch: &Batch) -> Vec<&str> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for record in &batch.records {
        for key in record.fields.keys() {
            if !key.starts_with('_') {
                seen.insert(key.as_str());
            }
        }
    }
    seen.into_iter().collect()
}

/// Render all records with every cell double-quoted.
///
/// # Errors
///
/// Returns `RegistryError::Import` or `RegistryError::Io` if writing fails.
pub fn render_csv(batch: &Batch) -> Result<String, RegistryError> {
    let columns = columns(batch);
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&columns)?;
    for record in &batch.records {
        writer.write_record(columns.iter().map(|c| record.text(c).into_owned()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RegistryError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| RegistryError::Other(e.into()))
}

/// Write the batch to `{dir}/{file_name}` and return the path.
///
/// # Errors
///
/// Returns `RegistryError::Io` if the directory or file cannot be written.
pub fn export_csv(batch: &Batch, holder: LockHolder, dir: &Path) -> Result<PathBuf, RegistryError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name(batch, holder));
    std::fs::write(&path, render_csv(batch)?)?;
    Ok(path)
}
