//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use bl_core::audit_detail::{HarmonizedDetail, ImportedDetail, StatusChangedDetail};
use bl_core::entities::*;
use bl_core::enums::*;
use bl_core::responses::*;
use bl_core::trail::TrailOperation;
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_record() -> Record {
    let mut fields = IndexMap::new();
    fields.insert("Material Number".to_string(), FieldValue::from("MAT-001"));
    fields.insert("Site".to_string(), FieldValue::from("1000"));
    fields.insert("Weight".to_string(), FieldValue::Number(12.5));
    fields.insert(
        "Created On".to_string(),
        FieldValue::Date(NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()),
    );
    Record::new("row-0", fields)
}

fn sample_batch() -> Batch {
    Batch {
        id: "BATCH_1740045600000000000".into(),
        project_id: "P001".into(),
        batch_number: "M202502200001".into(),
        description: "legacy_materials.csv".into(),
        object_type: ObjectType::MaterialMaster,
        status: ApprovalStatus::DataValidated,
        version: 1,
        revision: 4,
        uploaded_by: "Active User".into(),
        uploaded_at: Utc::now(),
        records: vec![sample_record()],
        lock_holder: Some(LockHolder::Harmonization),
        metadata_map: IndexMap::from([("Material Number".to_string(), "MATNR".to_string())]),
        remarks: Some("Pre-flight Validation Successful.".into()),
        approvals: vec![ApprovalStamp {
            level: ApprovalLevel::L1,
            signer: "Active User".into(),
            at: Utc::now(),
        }],
        rejection_reason: None,
    }
}

roundtrip_and_validate!(record_roundtrip, Record, sample_record());

roundtrip_and_validate!(batch_roundtrip, Batch, sample_batch());

roundtrip_and_validate!(
    rule_roundtrip,
    Rule,
    Rule {
        id: "rul-a3f8b2c1".into(),
        project_id: "P001".into(),
        kind: RuleKind::Enrich,
        enrich_mode: Some(EnrichMode::Add),
        target_field: Some("Plant".into()),
        logic: "IF (Site == '1000') THEN ADD FIELD Plant = '1000'".into(),
        is_active: true,
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    project_roundtrip,
    Project,
    Project {
        id: "P001".into(),
        code: "MIG-2025".into(),
        name: "Global Migration".into(),
        description: "Material master cutover".into(),
    }
);

roundtrip_and_validate!(
    dictionary_table_roundtrip,
    DictionaryTable,
    DictionaryTable {
        table_name: "MARA".into(),
        description: "General Material Data".into(),
        fields: vec![DictionaryField::new("Material Number", "MATNR", "CHAR", 18)],
    }
);

roundtrip_and_validate!(
    trail_operation_roundtrip,
    TrailOperation,
    TrailOperation {
        v: 1,
        ts: "2025-02-20T10:00:00Z".into(),
        project: "P001".into(),
        op: TrailOp::Imported,
        batch: "BATCH_1".into(),
        data: serde_json::to_value(ImportedDetail {
            batch_number: "M202502200001".into(),
            rows: 1,
            fields: vec!["Site".into()],
        })
        .unwrap(),
    }
);

roundtrip_and_validate!(
    status_changed_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: ApprovalStatus::Draft.to_string(),
        to: ApprovalStatus::MetaValidated.to_string(),
        reason: None,
    }
);

roundtrip_and_validate!(
    harmonized_roundtrip,
    HarmonizedDetail,
    HarmonizedDetail {
        kind: RuleKind::Merge,
        applied: 2,
        touched_records: 3,
        duration_ms: 14,
    }
);

roundtrip_and_validate!(
    harmonize_response_roundtrip,
    HarmonizeResponse,
    HarmonizeResponse {
        batch: BatchSummary::from(&sample_batch()),
        kind: RuleKind::Enrich,
        applied_count: 1,
        touched_records: 1,
        export_path: Some("M202502200001_harmonized.csv".into()),
    }
);

roundtrip_and_validate!(
    stats_roundtrip,
    BatchStats,
    BatchStats {
        total_rows: 10,
        completeness: 90,
        duplicates: 1,
        quality_score: 80.0,
        fields: vec![FieldFill {
            field: "Site".into(),
            filled_pct: 100,
        }],
    }
);

#[test]
fn summary_counts_rows() {
    let summary = BatchSummary::from(&sample_batch());
    assert_eq!(summary.row_count, 1);
    assert_eq!(summary.batch_number, "M202502200001");
}

#[test]
fn status_serializes_to_display_vocabulary() {
    let json = serde_json::to_value(sample_batch()).unwrap();
    assert_eq!(json["status"], "Validated (Data)");
    assert_eq!(json["lock_holder"], "HARMONIZATION");
    assert_eq!(json["object_type"], "Material Master");
}

#[test]
fn missing_field_reads_empty() {
    let record = sample_record();
    assert_eq!(record.text("Plant"), "");
    assert_eq!(record.text("Weight"), "12.5");
    assert_eq!(record.text("Created On"), "2025-02-20");
}
