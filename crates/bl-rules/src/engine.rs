//! Harmonization engine: runs one kind of rules over a record set.

use bl_core::entities::{FieldValue, Record, Rule};
use bl_core::enums::{ClauseMode, RuleKind};
use chrono::NaiveTime;
use tracing::debug;

use crate::ast::RuleLogic;
use crate::error::EngineError;
use crate::eval::Outcome;
use crate::parser::parse;

/// Result of one harmonization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonizationOutcome {
    pub records: Vec<Record>,
    /// Field assignments made across all records.
    pub applied_count: usize,
    /// Records that received a remark line.
    pub touched_records: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonizationEngine {
    clause_mode: ClauseMode,
}

impl HarmonizationEngine {
    #[must_use]
    pub const fn new(clause_mode: ClauseMode) -> Self {
        Self { clause_mode }
    }

    #[must_use]
    pub const fn clause_mode(&self) -> ClauseMode {
        self.clause_mode
    }

    /// Apply the `kind` rules from `rules`, in stored order, to every relevant
    /// record. `at` is the wall-clock time stamped into remark lines.
    ///
    /// Inactive and unparsable rules are skipped. Within a record, later rules
    /// see fields set by earlier ones and may overwrite them.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NoRulesConfigured` when `rules` holds no rule of
    /// `kind`, active or not.
    pub fn apply(
        &self,
        kind: RuleKind,
        records: &[Record],
        rules: &[Rule],
        at: NaiveTime,
    ) -> Result<HarmonizationOutcome, EngineError> {
        let of_kind: Vec<&Rule> = rules.iter().filter(|r| r.kind == kind).collect();
        if of_kind.is_empty() {
            return Err(EngineError::NoRulesConfigured { kind });
        }

        let compiled = compile(&of_kind);
        let stamp = at.format("%H:%M");
        let mut applied_count = 0;
        let mut touched_records = 0;

        let records = records
            .iter()
            .map(|row| {
                if !row.is_relevant {
                    return row.clone();
                }
                let mut record = row.clone();
                let mut fragments = Vec::new();

                for (rule, logic) in &compiled {
                    match logic.evaluate(&record, self.clause_mode) {
                        Outcome::Assign { field, value } => {
                            fragments.push(format!("{field}: {value}"));
                            record.set(field, FieldValue::Text(value));
                        }
                        Outcome::Deferred => {
                            debug!(rule = %rule.id, record = %record.id, "matrix split deferred");
                        }
                        Outcome::NoMatch => {}
                    }
                }

                if !fragments.is_empty() {
                    applied_count += fragments.len();
                    touched_records += 1;
                    record.append_remark(&format!("[{stamp}] {kind}: {}. ", fragments.join(" | ")));
                }
                record
            })
            .collect();

        debug!(%kind, applied_count, touched_records, "harmonization pass complete");
        Ok(HarmonizationOutcome {
            records,
            applied_count,
            touched_records,
        })
    }
}

/// Parse active rules once per pass; unparsable logic is dropped.
fn compile<'a>(rules: &[&'a Rule]) -> Vec<(&'a Rule, RuleLogic)> {
    rules
        .iter()
        .filter(|r| r.is_active)
        .filter_map(|rule| match parse(&rule.logic) {
            Ok(logic) => Some((*rule, logic)),
            Err(error) => {
                debug!(rule = %rule.id, %error, "skipping unparsable rule");
                None
            }
        })
        .collect()
}
