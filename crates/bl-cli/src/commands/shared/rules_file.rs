//! TOML rule files.
//!
//! ```toml
//! [[rule]]
//! kind = "enrich"
//! enrich_mode = "modify"
//! target_field = "Plant"
//! logic = "IF (Site == '1000') THEN MODIFY Plant = '1000'"
//! ```

use std::path::Path;

use anyhow::Context;
use bl_core::entities::Rule;
use bl_core::enums::{EnrichMode, RuleKind};
use bl_core::ids;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::commands::shared::input::read_text;
use crate::commands::shared::parse::parse_enum;

const fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct RulesFile {
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub kind: String,
    pub enrich_mode: Option<String>,
    pub target_field: Option<String>,
    pub logic: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl RuleEntry {
    pub fn kind(&self) -> anyhow::Result<RuleKind> {
        parse_enum(&self.kind, "kind")
    }

    /// Store the entry as a rule of `project_id`. The logic is kept verbatim;
    /// unparsable logic is skipped at harmonization time.
    pub fn into_rule(self, project_id: &str, now: DateTime<Utc>) -> anyhow::Result<Rule> {
        let kind = self.kind()?;
        let enrich_mode = match (kind, self.enrich_mode.as_deref()) {
            (RuleKind::Enrich, Some(raw)) => Some(parse_enum::<EnrichMode>(raw, "enrich_mode")?),
            (RuleKind::Enrich, None) => Some(EnrichMode::Modify),
            _ => None,
        };
        Ok(Rule {
            id: ids::rule_id()?,
            project_id: project_id.to_string(),
            kind,
            enrich_mode,
            target_field: self.target_field,
            logic: self.logic,
            is_active: self.active,
            created_at: now,
        })
    }
}

pub fn parse_rules_file(content: &str) -> anyhow::Result<RulesFile> {
    toml::from_str(content).context("invalid rule file")
}

pub fn load_rules_file(path: &Path) -> anyhow::Result<RulesFile> {
    parse_rules_file(&read_text(path)?).with_context(|| format!("in {}", path.display()))
}

/// Load a rule file as stored rules of `project_id`, in file order.
pub fn load_rules(path: &Path, project_id: &str) -> anyhow::Result<Vec<Rule>> {
    let now = Utc::now();
    load_rules_file(path)?
        .rules
        .into_iter()
        .map(|entry| entry.into_rule(project_id, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
[[rule]]
kind = "enrich"
target_field = "Plant"
logic = "IF (Site == '1000') THEN MODIFY Plant = '1000'"

[[rule]]
kind = "MERGE"
logic = "IF (Division == '01') THEN MERGE Division = '10'"
active = false
"#;

    #[test]
    fn entries_keep_file_order_and_defaults() {
        let file = parse_rules_file(SAMPLE).expect("rule file should parse");
        assert_eq!(file.rules.len(), 2);

        let rules: Vec<Rule> = file
            .rules
            .into_iter()
            .map(|entry| entry.into_rule("P001", Utc::now()).expect("entry should convert"))
            .collect();

        assert_eq!(rules[0].kind, RuleKind::Enrich);
        assert_eq!(rules[0].enrich_mode, Some(EnrichMode::Modify));
        assert!(rules[0].is_active);
        assert_eq!(rules[1].kind, RuleKind::Merge);
        assert_eq!(rules[1].enrich_mode, None);
        assert!(!rules[1].is_active);
        assert!(rules.iter().all(|r| r.project_id == "P001" && r.id.starts_with("rul-")));
    }

    #[test]
    fn empty_file_has_no_rules() {
        let file = parse_rules_file("").expect("empty file should parse");
        assert!(file.rules.is_empty());
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let file = parse_rules_file("[[rule]]\nkind = \"cleanse\"\nlogic = \"x\"\n")
            .expect("rule file should parse");
        let err = file.rules[0]
            .clone()
            .into_rule("P001", Utc::now())
            .expect_err("kind should be rejected");
        assert!(err.to_string().contains("invalid kind"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, SAMPLE).expect("write rules");

        let rules = load_rules(&path, "P002").expect("rules should load");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].project_id, "P002");
    }
}
