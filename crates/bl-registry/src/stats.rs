//! Batch quality statistics.

use std::collections::HashSet;

use bl_core::entities::Batch;
use bl_core::responses::{BatchStats, FieldFill};

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Completeness, duplicate rows, quality score and per-field fill rate over
/// the user-visible fields. Duplicates compare field values only.
#[must_use]
pub fn compute(batch: &Batch) -> BatchStats {
    let fields: Vec<&str> = batch
        .field_names()
        .into_iter()
        .filter(|f| !f.starts_with('_'))
        .collect();
    let rows = batch.records.len();

    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut duplicates = 0;
    let mut filled_per_field = vec![0usize; fields.len()];

    for record in &batch.records {
        let values: Vec<String> = fields.iter().map(|f| record.text(f).into_owned()).collect();
        for (count, value) in filled_per_field.iter_mut().zip(&values) {
            if !value.is_empty() {
                *count += 1;
            }
        }
        if !seen.insert(values) {
            duplicates += 1;
        }
    }

    let filled: usize = filled_per_field.iter().sum();
    let completeness = percent(filled, rows * fields.len()).round() as u32;
    let quality_score = if rows == 0 {
        0.0
    } else {
        (f64::from(completeness) - percent(duplicates, rows)).max(0.0)
    };

    BatchStats {
        total_rows: rows,
        completeness,
        duplicates,
        quality_score,
        fields: fields
            .iter()
            .zip(filled_per_field)
            .map(|(field, count)| FieldFill {
                field: (*field).to_string(),
                filled_pct: percent(count, rows).round() as u32,
            })
            .collect(),
    }
}
