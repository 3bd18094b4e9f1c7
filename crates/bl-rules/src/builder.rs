//! Rule drafts: assemble a rule clause by clause and render its logic.

use bl_core::entities::Rule;
use bl_core::enums::{EnrichMode, RuleKind};
use bl_core::ids;
use chrono::{DateTime, Utc};

use crate::ast::{Action, ActionVerb, Clause, CompareOp, Condition, RuleLogic};
use crate::error::DraftError;

/// How a clause joins the clauses before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    #[default]
    Simple,
    Matrix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftClause {
    pub connector: Connector,
    pub clause: Clause,
}

/// An unsaved rule.
///
/// Empty placeholders render as `FIELD`, `VALUE`, `KEY_A` and `KEY_B` in
/// [`RuleDraft::preview`] but make the draft invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDraft {
    kind: RuleKind,
    enrich_mode: EnrichMode,
    split_mode: SplitMode,
    clauses: Vec<DraftClause>,
    target_field: String,
    result_value: String,
    matrix_keys: (String, String),
}

impl RuleDraft {
    #[must_use]
    pub const fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            enrich_mode: EnrichMode::Modify,
            split_mode: SplitMode::Simple,
            clauses: Vec::new(),
            target_field: String::new(),
            result_value: String::new(),
            matrix_keys: (String::new(), String::new()),
        }
    }

    #[must_use]
    pub fn when(self, field: &str, op: CompareOp, value: &str) -> Self {
        self.push(Connector::And, field, op, value)
    }

    #[must_use]
    pub fn and(self, field: &str, op: CompareOp, value: &str) -> Self {
        self.push(Connector::And, field, op, value)
    }

    #[must_use]
    pub fn or(self, field: &str, op: CompareOp, value: &str) -> Self {
        self.push(Connector::Or, field, op, value)
    }

    fn push(mut self, connector: Connector, field: &str, op: CompareOp, value: &str) -> Self {
        self.clauses.push(DraftClause {
            connector,
            clause: Clause::new(field, op, value),
        });
        self
    }

    #[must_use]
    pub const fn enrich_mode(mut self, mode: EnrichMode) -> Self {
        self.enrich_mode = mode;
        self
    }

    #[must_use]
    pub fn set(mut self, target_field: &str, result_value: &str) -> Self {
        self.target_field = target_field.to_string();
        self.result_value = result_value.to_string();
        self
    }

    #[must_use]
    pub fn matrix(mut self, key_a: &str, key_b: &str) -> Self {
        self.split_mode = SplitMode::Matrix;
        self.matrix_keys = (key_a.to_string(), key_b.to_string());
        self
    }

    #[must_use]
    pub fn clauses(&self) -> &[DraftClause] {
        &self.clauses
    }

    const fn is_matrix(&self) -> bool {
        matches!(self.kind, RuleKind::Split) && matches!(self.split_mode, SplitMode::Matrix)
    }

    /// Every clause names a field, and either both matrix keys or the target
    /// and result are filled.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.clauses.is_empty() || self.clauses.iter().any(|c| c.clause.field.is_empty()) {
            return false;
        }
        if self.is_matrix() {
            !self.matrix_keys.0.is_empty() && !self.matrix_keys.1.is_empty()
        } else {
            !self.target_field.is_empty() && !self.result_value.is_empty()
        }
    }

    /// Logic string with placeholders for anything still missing.
    #[must_use]
    pub fn preview(&self) -> String {
        self.to_logic().map_or_else(
            || "Awaiting conditions...".to_string(),
            |logic| logic.to_string(),
        )
    }

    /// The rule AST, or `None` while no clause names a field.
    #[must_use]
    pub fn to_logic(&self) -> Option<RuleLogic> {
        let condition = self.condition()?;
        let action = if self.is_matrix() {
            Action::MatrixSplit {
                key_a: placeholder(&self.matrix_keys.0, "KEY_A"),
                key_b: placeholder(&self.matrix_keys.1, "KEY_B"),
            }
        } else {
            Action::Assign {
                verb: self.verb(),
                field: placeholder(&self.target_field, "FIELD"),
                value: placeholder(&self.result_value, "VALUE"),
            }
        };
        Some(RuleLogic { condition, action })
    }

    /// Fold clauses with `AND` binding tighter than `OR`.
    fn condition(&self) -> Option<Condition> {
        let mut clauses = self.clauses.iter().filter(|c| !c.clause.field.is_empty());
        let first = clauses.next()?;

        let mut disjuncts: Vec<Condition> = Vec::new();
        let mut current: Condition = first.clause.clone().into();
        for next in clauses {
            let clause: Condition = next.clause.clone().into();
            match next.connector {
                Connector::And => current = current.and(clause),
                Connector::Or => disjuncts.push(std::mem::replace(&mut current, clause)),
            }
        }
        disjuncts.push(current);

        disjuncts.into_iter().reduce(Condition::or)
    }

    const fn verb(&self) -> ActionVerb {
        match (self.kind, self.enrich_mode) {
            (RuleKind::Enrich, EnrichMode::Modify) => ActionVerb::Modify,
            (RuleKind::Enrich, EnrichMode::Add) => ActionVerb::AddField,
            (RuleKind::Merge, _) => ActionVerb::Merge,
            (RuleKind::Split, _) => ActionVerb::Split,
        }
    }

    /// Turn a valid draft into a stored rule for `project_id`.
    ///
    /// # Errors
    ///
    /// Returns `DraftError::Incomplete` for an invalid draft and
    /// `DraftError::Core` if no id can be generated.
    pub fn into_rule(self, project_id: &str, now: DateTime<Utc>) -> Result<Rule, DraftError> {
        if !self.is_valid() {
            return Err(DraftError::Incomplete(if self.is_matrix() {
                "conditions and both matrix keys are required"
            } else {
                "conditions, target field and result value are required"
            }));
        }
        let logic = self
            .to_logic()
            .ok_or(DraftError::Incomplete("at least one condition is required"))?;

        Ok(Rule {
            id: ids::rule_id()?,
            project_id: project_id.to_string(),
            kind: self.kind,
            enrich_mode: (self.kind == RuleKind::Enrich).then_some(self.enrich_mode),
            target_field: (!self.is_matrix()).then_some(self.target_field),
            logic: logic.to_string(),
            is_active: true,
            created_at: now,
        })
    }
}

fn placeholder(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
