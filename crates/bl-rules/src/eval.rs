//! Evaluation of parsed rules against a single record.

use bl_core::entities::Record;
use bl_core::enums::ClauseMode;

use crate::ast::{Action, Clause, CompareOp, Condition, RuleLogic};

/// What a rule decided for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Condition held; set `field` to `value`.
    Assign { field: String, value: String },
    /// Condition did not hold.
    NoMatch,
    /// A structural directive the evaluator does not execute (matrix split).
    Deferred,
}

/// Decimal value of the longest numeric prefix of `text`, after leading
/// whitespace. `"12kg"` is 12, `"-3.5e2x"` is -350, `"kg12"` has none.
#[must_use]
pub fn numeric_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

impl Clause {
    /// Compare the record's current value of `field` against `value`.
    /// A missing field reads as the empty string.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        let actual = record.text(&self.field);
        match self.op {
            CompareOp::Eq => actual == self.value,
            CompareOp::Ne => actual != self.value,
            CompareOp::Gt | CompareOp::Lt => {
                let (Some(lhs), Some(rhs)) = (numeric_prefix(&actual), numeric_prefix(&self.value))
                else {
                    return false;
                };
                if self.op == CompareOp::Gt {
                    lhs > rhs
                } else {
                    lhs < rhs
                }
            }
        }
    }
}

impl Condition {
    #[must_use]
    pub fn evaluate(&self, record: &Record, mode: ClauseMode) -> bool {
        match mode {
            ClauseMode::FirstOnly => self.first_clause().matches(record),
            ClauseMode::All => self.evaluate_tree(record),
        }
    }

    fn evaluate_tree(&self, record: &Record) -> bool {
        match self {
            Self::Clause(c) => c.matches(record),
            Self::And(lhs, rhs) => lhs.evaluate_tree(record) && rhs.evaluate_tree(record),
            Self::Or(lhs, rhs) => lhs.evaluate_tree(record) || rhs.evaluate_tree(record),
        }
    }
}

impl RuleLogic {
    /// Decide what this rule does to `record`. Never mutates.
    #[must_use]
    pub fn evaluate(&self, record: &Record, mode: ClauseMode) -> Outcome {
        match &self.action {
            Action::MatrixSplit { .. } => Outcome::Deferred,
            Action::Assign { field, value, .. } => {
                if self.condition.evaluate(record, mode) {
                    Outcome::Assign {
                        field: field.clone(),
                        value: value.clone(),
                    }
                } else {
                    Outcome::NoMatch
                }
            }
        }
    }
}
