use anyhow::bail;
use bl_core::entities::{Batch, Record, Rule};
use bl_core::trail::TrailOperation;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Handle `bl schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for(&args.type_name)?, flags.format)
}

fn schema_for(type_name: &str) -> anyhow::Result<schemars::Schema> {
    Ok(match type_name.to_ascii_lowercase().as_str() {
        "batch" => schemars::schema_for!(Batch),
        "record" => schemars::schema_for!(Record),
        "rule" => schemars::schema_for!(Rule),
        "trail" => schemars::schema_for!(TrailOperation),
        other => bail!("unknown schema type '{other}' (expected batch, record, rule or trail)"),
    })
}

#[cfg(test)]
mod tests {
    use super::schema_for;

    #[test]
    fn batch_schema_lists_lifecycle_fields() {
        let schema = serde_json::to_value(schema_for("Batch").expect("batch schema")).expect("json");
        let properties = &schema["properties"];
        assert!(properties.get("status").is_some());
        assert!(properties.get("records").is_some());
        assert!(properties.get("lock_holder").is_some());
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = schema_for("project").expect_err("should fail");
        assert!(err.to_string().contains("unknown schema type 'project'"));
    }
}
