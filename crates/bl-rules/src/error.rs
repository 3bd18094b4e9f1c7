//! Error types for rule parsing, drafting and harmonization.

use bl_core::enums::RuleKind;
use bl_core::errors::CoreError;

/// A rule logic string that does not match the grammar.
///
/// `position` is a byte offset into the logic string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Empty rule logic")]
    Empty,

    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[error("Unterminated {what} starting at {position}")]
    Unterminated { what: &'static str, position: usize },

    #[error("Expected {expected} at {position}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },
}

/// Errors raised by a harmonization pass.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The requested kind has no rules at all; the pass does not start.
    #[error("No {kind} rules are configured for this project")]
    NoRulesConfigured { kind: RuleKind },
}

/// Errors raised when turning a draft into a stored rule.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("Rule draft is incomplete: {0}")]
    Incomplete(&'static str),

    #[error(transparent)]
    Core(#[from] CoreError),
}
