//! Status enums, lock holders, rule kinds, and trail operations for Batchline.
//!
//! Wire values are stable: `ApprovalStatus` serializes to the exact status
//! vocabulary shown to users (`"Validated (Metadata)"`), lock holders and
//! rule kinds use upper-case tokens, and policy enums use `snake_case`.
//! `ApprovalStatus` provides `allowed_next_states()` so every transition is
//! checked against a single table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a batch.
///
/// ```text
/// draft → meta_validated → submitted → transformed → data_validated → approved
///              └──────────────┴────────────┴──────────────┴──→ rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ApprovalStatus {
    #[serde(rename = "Draft")]
    Draft,
    #[serde(rename = "Validated (Metadata)")]
    MetaValidated,
    #[serde(rename = "Submitted")]
    Submitted,
    #[serde(rename = "Transformed")]
    Transformed,
    #[serde(rename = "Validated (Data)")]
    DataValidated,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl ApprovalStatus {
    /// The forward lifecycle, in required order.
    pub const FORWARD: [Self; 6] = [
        Self::Draft,
        Self::MetaValidated,
        Self::Submitted,
        Self::Transformed,
        Self::DataValidated,
        Self::Approved,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::MetaValidated],
            Self::MetaValidated => &[Self::Submitted, Self::Rejected],
            Self::Submitted => &[Self::Transformed, Self::Rejected],
            Self::Transformed => &[Self::DataValidated, Self::Rejected],
            Self::DataValidated => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// The single forward successor, if any. Rejection is never a forward step.
    #[must_use]
    pub fn next_forward(self) -> Option<Self> {
        let idx = Self::FORWARD.iter().position(|s| *s == self)?;
        Self::FORWARD.get(idx + 1).copied()
    }

    /// Whether no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Validate a transition for the batch `id`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTransition` when `next` is not in
    /// `allowed_next_states()`.
    pub fn ensure_transition(self, id: &str, next: Self) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                id: id.to_string(),
                from: self,
                to: next,
            })
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::MetaValidated => "Validated (Metadata)",
            Self::Submitted => "Submitted",
            Self::Transformed => "Transformed",
            Self::DataValidated => "Validated (Data)",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LockHolder
// ---------------------------------------------------------------------------

/// Processing context allowed to mutate a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockHolder {
    Journey,
    Harmonization,
}

impl LockHolder {
    /// The competing context.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Journey => Self::Harmonization,
            Self::Harmonization => Self::Journey,
        }
    }

    /// Suffix used in export file names (`<batchNumber>_<suffix>.csv`).
    #[must_use]
    pub const fn export_suffix(self) -> &'static str {
        match self {
            Self::Journey => "journey_data",
            Self::Harmonization => "harmonized",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Journey => "JOURNEY",
            Self::Harmonization => "HARMONIZATION",
        }
    }
}

impl fmt::Display for LockHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RuleKind / EnrichMode
// ---------------------------------------------------------------------------

/// Structural transformation family of a harmonization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    Enrich,
    Merge,
    Split,
}

impl RuleKind {
    pub const ALL: [Self; 3] = [Self::Enrich, Self::Merge, Self::Split];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrich => "ENRICH",
            Self::Merge => "MERGE",
            Self::Split => "SPLIT",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-mode of an `ENRICH` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichMode {
    Modify,
    Add,
}

impl EnrichMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modify => "MODIFY",
            Self::Add => "ADD",
        }
    }
}

impl fmt::Display for EnrichMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApprovalLevel
// ---------------------------------------------------------------------------

/// Named approval level. Levels are acknowledged strictly in order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum ApprovalLevel {
    L1,
    L2,
    L3,
}

impl ApprovalLevel {
    /// The level that must already be acknowledged before this one.
    #[must_use]
    pub const fn predecessor(self) -> Option<Self> {
        match self {
            Self::L1 => None,
            Self::L2 => Some(Self::L1),
            Self::L3 => Some(Self::L2),
        }
    }

    /// Only the final level moves the batch to `Approved`.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::L3)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
            Self::L3 => "L3",
        }
    }
}

impl fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ObjectType
// ---------------------------------------------------------------------------

/// Master-data object carried by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ObjectType {
    #[serde(rename = "Material Master")]
    MaterialMaster,
    #[serde(rename = "Vendor Master")]
    VendorMaster,
    #[serde(rename = "Customer Master")]
    CustomerMaster,
    #[serde(rename = "BOM")]
    Bom,
}

impl ObjectType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaterialMaster => "Material Master",
            Self::VendorMaster => "Vendor Master",
            Self::CustomerMaster => "Customer Master",
            Self::Bom => "BOM",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// How many condition clauses the evaluator consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClauseMode {
    /// Evaluate the whole `AND`/`OR` tree.
    #[default]
    All,
    /// Consult only the first clause, ignoring any chained clauses.
    FirstOnly,
}

/// What metadata validation does when a value exceeds the dictionary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Record a warning and still transition.
    #[default]
    Warn,
    /// Refuse the transition.
    Block,
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Operation type recorded in JSONL trail files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Imported,
    Locked,
    Released,
    Transitioned,
    Acknowledged,
    Rejected,
    Harmonized,
    RelevanceToggled,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imported => "imported",
            Self::Locked => "locked",
            Self::Released => "released",
            Self::Transitioned => "transitioned",
            Self::Acknowledged => "acknowledged",
            Self::Rejected => "rejected",
            Self::Harmonized => "harmonized",
            Self::RelevanceToggled => "relevance_toggled",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
