//! Typed rule AST and its canonical text rendering.
//!
//! `Display` renders the logic string the grammar accepts, so a parsed rule
//! can be stored back in its canonical form.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison operator of a condition clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
}

impl CompareOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(FIELD OP 'VALUE')`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Clause {
    pub field: String,
    pub op: CompareOp,
    pub value: String,
}

impl Clause {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Condition tree. `And` binds tighter than `Or`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clause(Clause),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        Self::And(Box::new(self), Box::new(rhs))
    }

    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        Self::Or(Box::new(self), Box::new(rhs))
    }

    /// The leftmost clause in source order.
    #[must_use]
    pub fn first_clause(&self) -> &Clause {
        match self {
            Self::Clause(c) => c,
            Self::And(lhs, _) | Self::Or(lhs, _) => lhs.first_clause(),
        }
    }
}

impl From<Clause> for Condition {
    fn from(clause: Clause) -> Self {
        Self::Clause(clause)
    }
}

/// Verb of an assignment action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionVerb {
    Modify,
    AddField,
    Enrich,
    Merge,
    Split,
}

impl ActionVerb {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modify => "MODIFY",
            Self::AddField => "ADD FIELD",
            Self::Enrich => "ENRICH",
            Self::Merge => "MERGE",
            Self::Split => "SPLIT",
        }
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// `VERB FIELD = 'VALUE'`
    Assign {
        verb: ActionVerb,
        field: String,
        value: String,
    },
    /// `GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF [A] x [B]`
    MatrixSplit { key_a: String, key_b: String },
}

/// A parsed rule: `IF condition THEN action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuleLogic {
    pub condition: Condition,
    pub action: Action,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Whether `name` lexes back as a single bare word.
fn is_bare_ident(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !matches!(c, '(' | ')' | '[' | ']' | '\'' | '"' | '=' | '!' | '<' | '>')
        })
}

struct Ident<'a>(&'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if is_bare_ident(self.0) {
            f.write_str(self.0)
        } else {
            write!(f, "\"{}\"", self.0.replace('"', "\"\""))
        }
    }
}

struct Literal<'a>(&'a str);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.replace('\'', "''"))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", Ident(&self.field), self.op, Literal(&self.value))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clause(c) => c.fmt(f),
            Self::Or(lhs, rhs) => write!(f, "{lhs} OR {rhs}"),
            Self::And(lhs, rhs) => {
                write_and_operand(f, lhs)?;
                f.write_str(" AND ")?;
                write_and_operand(f, rhs)
            }
        }
    }
}

fn write_and_operand(f: &mut fmt::Formatter<'_>, operand: &Condition) -> fmt::Result {
    if matches!(operand, Condition::Or(..)) {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign { verb, field, value } => {
                write!(f, "{verb} {} = {}", Ident(field), Literal(value))
            }
            Self::MatrixSplit { key_a, key_b } => write!(
                f,
                "GENERATE NxM RECORDS FOR UNIQUE COMBINATIONS OF [{key_a}] x [{key_b}]"
            ),
        }
    }
}

impl fmt::Display for RuleLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IF {} THEN {}", self.condition, self.action)
    }
}
