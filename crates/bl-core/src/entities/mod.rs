//! Entity structs for all Batchline domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema output (`bl schema <type>`).

mod batch;
mod dictionary;
mod project;
mod record;
mod rule;

pub use batch::{ApprovalStamp, Batch};
pub use dictionary::{DictionaryField, DictionaryTable};
pub use project::Project;
pub use record::{FieldValue, Record};
pub use rule::Rule;
