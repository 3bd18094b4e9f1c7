//! Data validation extension point for `TRANSFORMED → DATA_VALIDATED`.

use bl_core::entities::Batch;

/// Structural or content checks over a transformed batch. Each returned
/// string is one issue; any issue refuses the transition.
pub trait DataValidator: Send + Sync {
    fn validate(&self, batch: &Batch) -> Vec<String>;
}

/// Accepts every batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DataValidator for AcceptAll {
    fn validate(&self, _batch: &Batch) -> Vec<String> {
        Vec::new()
    }
}

/// Flags relevant records with an empty value in any of `fields`.
#[derive(Debug, Clone, Default)]
pub struct RequiredFields {
    pub fields: Vec<String>,
}

impl RequiredFields {
    #[must_use]
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl DataValidator for RequiredFields {
    fn validate(&self, batch: &Batch) -> Vec<String> {
        batch
            .records
            .iter()
            .filter(|r| r.is_relevant && !r.deleted)
            .flat_map(|r| {
                self.fields
                    .iter()
                    .filter(|f| r.text(f).trim().is_empty())
                    .map(move |f| format!("record {}: {f} is empty", r.id))
            })
            .collect()
    }
}
