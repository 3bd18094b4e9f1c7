use bl_core::responses::{RuleCheckEntry, RuleCheckResponse};
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RuleCommands;
use crate::commands::shared::rules_file::{RulesFile, load_rules_file};
use crate::output::output;

/// Handle `bl rule`.
pub fn handle(action: &RuleCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RuleCommands::Parse { logic } => {
            let parsed = bl_rules::parse(logic)?;
            output(
                &json!({
                    "canonical": parsed.to_string(),
                    "ast": parsed,
                }),
                flags.format,
            )
        }
        RuleCommands::Check { rules } => output(&check(load_rules_file(rules)?)?, flags.format),
    }
}

fn check(file: RulesFile) -> anyhow::Result<RuleCheckResponse> {
    let rules = file
        .rules
        .iter()
        .map(|entry| {
            let error = bl_rules::parse(&entry.logic).err().map(|e| e.to_string());
            Ok(RuleCheckEntry {
                kind: entry.kind()?,
                logic: entry.logic.clone(),
                ok: error.is_none(),
                error,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(RuleCheckResponse {
        total: rules.len(),
        parsable: rules.iter().filter(|r| r.ok).count(),
        rules,
    })
}
