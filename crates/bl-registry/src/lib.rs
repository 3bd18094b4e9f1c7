//! # bl-registry
//!
//! Batch registry service for Batchline.
//!
//! [`BatchRegistry`] owns the in-memory batch collection and is the only
//! writer. It composes:
//! - [`store::BatchStore`] with revision-checked compare-and-swap
//! - the [`lock`] manager for the `JOURNEY` / `HARMONIZATION` contexts
//! - the approval state machine in [`lifecycle`]
//! - the daily [`numbering`] allocator
//! - CSV [`ingest`] and [`export`]
//! - [`metadata`] validation against a [`dictionary::FieldDictionary`]
//! - the per-batch busy [`guard`] with an operation timeout
//! - the per-project [`rules::RuleBook`], batch [`stats`] and the JSONL [`trail`]

pub mod dictionary;
pub mod error;
pub mod export;
pub mod guard;
pub mod ingest;
pub mod lifecycle;
pub mod lock;
pub mod metadata;
pub mod numbering;
pub mod rules;
pub mod service;
pub mod stats;
pub mod store;
pub mod trail;
pub mod validator;

mod test_support;

pub use dictionary::{FieldDictionary, SapMaterialDictionary};
pub use error::RegistryError;
pub use metadata::MetadataReport;
pub use rules::RuleBook;
pub use service::{BatchRegistry, Harmonized, MetadataValidation};
pub use trail::TrailWriter;
pub use validator::{AcceptAll, DataValidator, RequiredFields};
