pub mod dispatch;
pub mod harmonize;
pub mod import;
pub mod pipeline;
pub mod rule;
pub mod schema;
pub mod shared;
pub mod stats;
