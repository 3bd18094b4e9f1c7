use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

use table::{Table, TableOptions};

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(&serde_json::to_value(value)?, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> TableOptions {
    let prefs = ui::prefs();
    TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: &Value, options: TableOptions) -> anyhow::Result<String> {
    Ok(match value {
        Value::Array(items) => render_rows(items, options),
        Value::Object(map) => render_object(map, options),
        scalar => {
            let mut table = Table::new(["value"]);
            table.push_row(vec![cell(scalar)]);
            table.render(options)
        }
    })
}

/// Scalars and nested objects become `key | value` rows; arrays of objects
/// are rendered as their own titled tables below.
fn render_object(map: &Map<String, Value>, options: TableOptions) -> String {
    let mut summary = Table::new(["key", "value"]);
    let mut sections = Vec::new();
    flatten_into(&mut summary, &mut sections, "", map);

    let mut blocks = vec![summary.render(options)];
    for (title, items) in sections {
        blocks.push(format!("{title}:\n{}", render_rows(items, options)));
    }
    blocks.join("\n\n")
}

fn flatten_into<'a>(
    summary: &mut Table,
    sections: &mut Vec<(String, &'a [Value])>,
    prefix: &str,
    map: &'a Map<String, Value>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => {
                flatten_into(summary, sections, &path, inner);
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                sections.push((path, items.as_slice()));
            }
            other => summary.push_row(vec![path, cell(other)]),
        }
    }
}

fn render_rows(items: &[Value], options: TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let mut table = Table::new(["value"]);
        for item in items {
            table.push_row(vec![cell(item)]);
        }
        return table.render(options);
    }

    // First-seen column order; responses already serialize in a sensible order.
    let mut headers = Vec::<&str>::new();
    for key in items.iter().filter_map(Value::as_object).flat_map(Map::keys) {
        if !headers.contains(&key.as_str()) {
            headers.push(key);
        }
    }

    let mut table = Table::new(headers.iter().copied());
    for map in items.iter().filter_map(Value::as_object) {
        table.push_row(
            headers
                .iter()
                .map(|header| map.get(*header).map_or_else(|| String::from("-"), cell))
                .collect(),
        );
    }
    table.render(options)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.iter().all(|item| !item.is_object()) => items
            .iter()
            .map(cell)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::{TableOptions, render, render_table};
    use crate::cli::OutputFormat;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[derive(Serialize)]
    struct Summary {
        id: &'static str,
        records: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let out = render(&Summary { id: "M202610190001", records: 7 }, OutputFormat::Json)
            .expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "M202610190001");
        assert_eq!(parsed["records"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&Summary { id: "x", records: 7 }, OutputFormat::Raw)
            .expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn nested_objects_flatten_to_dotted_keys() {
        let value = json!({
            "batch": { "id": "M202610190001", "status": "DRAFT" },
            "applied_count": 2,
        });
        let out = render_table(&value, PLAIN).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.starts_with("key")));
        assert!(out.contains("batch.id"));
        assert!(out.contains("batch.status"));
        assert!(out.contains("applied_count"));
    }

    #[test]
    fn arrays_of_objects_become_titled_sections() {
        let value = json!({
            "batch_id": "M202610190001",
            "stages": [
                { "stage": "import", "status": "ok" },
                { "stage": "submit", "status": "ok" },
            ],
        });
        let out = render_table(&value, PLAIN).expect("table render should work");
        assert!(out.contains("stages:\nstage"));
        assert!(out.contains("submit"));
    }

    #[test]
    fn scalar_lists_join_into_one_cell() {
        let value = json!({ "warnings": ["a", "b"] });
        let out = render_table(&value, PLAIN).expect("table render should work");
        assert!(out.contains("a, b"));
    }

    #[test]
    fn empty_list_reports_no_rows() {
        let out = render_table(&json!([]), PLAIN).expect("table render should work");
        assert_eq!(out, "(no rows)");
    }
}
