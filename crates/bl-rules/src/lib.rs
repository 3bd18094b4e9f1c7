//! # bl-rules
//!
//! Rule grammar and harmonization engine for Batchline.
//!
//! - [`lexer`] and [`parser`] turn a logic string such as
//!   `IF (Site == '1000') THEN MODIFY Plant = '1000'` into a typed [`ast::RuleLogic`].
//! - [`eval`] decides what a parsed rule does to one record.
//! - [`engine::HarmonizationEngine`] applies a kind of rules across a record set
//!   and appends audit remarks.
//! - [`builder::RuleDraft`] assembles new rules clause by clause.

pub mod ast;
pub mod builder;
pub mod engine;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

pub use ast::{Action, ActionVerb, Clause, CompareOp, Condition, RuleLogic};
pub use builder::RuleDraft;
pub use engine::{HarmonizationEngine, HarmonizationOutcome};
pub use error::{DraftError, EngineError, ParseError};
pub use eval::Outcome;
pub use parser::parse;
