//! Per-project rule book. Order of insertion is the order of application.

use bl_core::entities::Rule;
use bl_core::enums::RuleKind;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::RegistryError;

#[derive(Debug, Default)]
pub struct RuleBook {
    by_project: RwLock<IndexMap<String, Vec<Rule>>>,
}

impl RuleBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to its project's list.
    pub async fn add(&self, rule: Rule) -> Rule {
        debug!(rule = %rule.id, project = %rule.project_id, kind = %rule.kind, "rule added");
        self.by_project
            .write()
            .await
            .entry(rule.project_id.clone())
            .or_default()
            .push(rule.clone());
        rule
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown rule.
    pub async fn delete(&self, project_id: &str, rule_id: &str) -> Result<Rule, RegistryError> {
        let mut by_project = self.by_project.write().await;
        let rules = by_project
            .get_mut(project_id)
            .ok_or_else(|| RegistryError::not_found("rule", rule_id))?;
        let idx = rules
            .iter()
            .position(|r| r.id == rule_id)
            .ok_or_else(|| RegistryError::not_found("rule", rule_id))?;
        Ok(rules.remove(idx))
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown rule.
    pub async fn set_active(
        &self,
        project_id: &str,
        rule_id: &str,
        active: bool,
    ) -> Result<Rule, RegistryError> {
        let mut by_project = self.by_project.write().await;
        let rule = by_project
            .get_mut(project_id)
            .and_then(|rules| rules.iter_mut().find(|r| r.id == rule_id))
            .ok_or_else(|| RegistryError::not_found("rule", rule_id))?;
        rule.is_active = active;
        Ok(rule.clone())
    }

    /// Rules of a project in stored order, optionally of one kind.
    pub async fn list(&self, project_id: &str, kind: Option<RuleKind>) -> Vec<Rule> {
        self.by_project
            .read()
            .await
            .get(project_id)
            .map(|rules| {
                rules
                    .iter()
                    .filter(|r| kind.is_none_or(|k| r.kind == k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
