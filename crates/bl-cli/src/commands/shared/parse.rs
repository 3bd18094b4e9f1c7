use serde::de::DeserializeOwned;

/// Parse an enum value from user input using its serde form.
///
/// Hyphens become underscores and the value is upper-cased, so `enrich`,
/// `Enrich` and `ENRICH` all name `RuleKind::Enrich`.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_").to_ascii_uppercase();
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

#[cfg(test)]
mod tests {
    use bl_core::enums::{ApprovalLevel, EnrichMode, RuleKind};

    use super::parse_enum;

    #[test]
    fn parses_lowercase_kind() {
        let kind: RuleKind = parse_enum("merge", "kind").expect("kind should parse");
        assert_eq!(kind, RuleKind::Merge);
    }

    #[test]
    fn parses_mode_and_level() {
        let mode: EnrichMode = parse_enum("Add", "enrich_mode").expect("mode should parse");
        assert_eq!(mode, EnrichMode::Add);
        let level: ApprovalLevel = parse_enum("l2", "level").expect("level should parse");
        assert_eq!(level, ApprovalLevel::L2);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<RuleKind>("cleanse", "kind").expect_err("should fail");
        assert!(err.to_string().contains("invalid kind 'cleanse'"));
    }
}
