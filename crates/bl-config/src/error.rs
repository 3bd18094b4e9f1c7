use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or did not match the config shape.
    #[error("Cannot load Batchline configuration: {0}")]
    Figment(#[from] figment::Error),

    /// `field` is the dotted key, e.g. `ingest.delimiter`.
    #[error("Bad value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
