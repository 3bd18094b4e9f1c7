//! End-to-end registry scenarios: import, lifecycle, locks, harmonization.

use std::sync::Arc;
use std::time::Duration;

use bl_config::BlConfig;
use bl_core::entities::{Batch, Rule};
use bl_core::enums::{
    ApprovalLevel, ApprovalStatus, EnrichMode, LockHolder, OverflowPolicy, RuleKind, TrailOp,
};
use bl_core::errors::CoreError;
use bl_core::trail::TrailOperation;
use bl_registry::{BatchRegistry, DataValidator, RegistryError, TrailWriter};
use bl_rules::{CompareOp, RuleDraft};
use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;

const ONE_ROW: &str = "Old Mat No,Site\n100-200,1000\n";
const THREE_ROWS: &str = "Old Mat No,Site\n100-200,1000\n100-201,2000\n100-202,1000\n";

fn registry() -> BatchRegistry {
    BatchRegistry::new(BlConfig::default()).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 20).unwrap()
}

fn plant_rule() -> Rule {
    RuleDraft::new(RuleKind::Enrich)
        .enrich_mode(EnrichMode::Modify)
        .when("Site", CompareOp::Eq, "1000")
        .set("Plant", "1000")
        .into_rule("P001", Utc::now())
        .unwrap()
}

async fn walk_to(registry: &BatchRegistry, id: &str, status: ApprovalStatus) -> Batch {
    let mut batch = registry.get(id).await.unwrap();
    while batch.status != status {
        batch = match batch.status {
            ApprovalStatus::Draft => registry.validate_metadata(id).await.unwrap().batch,
            ApprovalStatus::MetaValidated => registry.submit(id).await.unwrap(),
            ApprovalStatus::Submitted => registry.transform(id).await.unwrap(),
            ApprovalStatus::Transformed => registry.validate_data(id).await.unwrap(),
            other => panic!("cannot walk past {other}"),
        };
    }
    batch
}

#[tokio::test]
async fn import_validate_and_enrich() {
    let registry = registry();
    let batch = registry.import("P001", "legacy load", ONE_ROW).await.unwrap();
    assert_eq!(batch.status, ApprovalStatus::Draft);
    assert_eq!(batch.row_count(), 1);
    assert_eq!(batch.version, 1);

    let validated = registry.validate_metadata(&batch.id).await.unwrap();
    assert_eq!(validated.batch.status, ApprovalStatus::MetaValidated);
    assert_eq!(
        validated.batch.remarks.as_deref(),
        Some("Pre-flight Validation Successful.")
    );

    registry.rules().add(plant_rule()).await;
    let out = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap();

    assert_eq!(out.applied_count, 1);
    let record = &out.batch.records[0];
    assert_eq!(record.text("Plant"), "1000");
    assert!(record.remarks.contains("Plant: 1000"));
    assert!(record.remarks.contains("ENRICH: "));
    assert_eq!(registry.get(&batch.id).await.unwrap(), out.batch);
}

#[tokio::test]
async fn harmonization_lock_denied_while_journey_holds() {
    let registry = registry();
    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();

    registry.acquire_lock(&batch.id, LockHolder::Journey).await.unwrap();
    let err = registry
        .acquire_lock(&batch.id, LockHolder::Harmonization)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::AccessDenied {
            holder: LockHolder::Journey,
            ..
        }
    ));
    assert_eq!(
        registry.get(&batch.id).await.unwrap().lock_holder,
        Some(LockHolder::Journey)
    );

    registry.rules().add(plant_rule()).await;
    let err = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap_err();
    assert!(matches!(err, RegistryError::AccessDenied { .. }));
}

#[tokio::test]
async fn locking_a_second_batch_releases_the_first() {
    let registry = registry();
    let a = registry.import("P001", "", ONE_ROW).await.unwrap();
    let b = registry.import("P001", "", ONE_ROW).await.unwrap();

    registry.acquire_lock(&a.id, LockHolder::Journey).await.unwrap();
    registry.acquire_lock(&b.id, LockHolder::Journey).await.unwrap();

    assert_eq!(registry.get(&a.id).await.unwrap().lock_holder, None);
    assert_eq!(
        registry.get(&b.id).await.unwrap().lock_holder,
        Some(LockHolder::Journey)
    );
}

#[tokio::test]
async fn sequential_imports_number_without_gaps() {
    let registry = registry();
    let mut numbers = Vec::new();
    for _ in 0..5 {
        let batch = registry.import_on("P001", "", ONE_ROW, day()).await.unwrap();
        numbers.push(batch.batch_number);
    }
    assert_eq!(
        numbers,
        [
            "M202502200001",
            "M202502200002",
            "M202502200003",
            "M202502200004",
            "M202502200005",
        ]
    );
    let other = registry.import_on("P002", "", ONE_ROW, day()).await.unwrap();
    assert_eq!(other.batch_number, "M202502200001");
}

#[tokio::test]
async fn empty_import_creates_nothing() {
    let registry = registry();
    let err = registry.import("P001", "", "Old Mat No,Site\n").await.unwrap_err();
    assert!(matches!(err, RegistryError::EmptyImport));
    assert!(registry.list("P001").await.is_empty());
}

#[tokio::test]
async fn irrelevant_records_are_untouched() {
    let registry = registry();
    let batch = registry.import("P001", "", THREE_ROWS).await.unwrap();
    registry.rules().add(plant_rule()).await;

    let toggled = registry.toggle_relevance(&batch.id, "3").await.unwrap();
    let before = toggled.record("3").unwrap().clone();
    assert!(!before.is_relevant);

    let out = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap();
    assert_eq!(out.batch.record("3").unwrap(), &before);
    assert_eq!(out.touched_records, 1);
}

#[tokio::test]
async fn reapplying_rules_is_stable_but_remarks_grow() {
    let registry = registry();
    let batch = registry.import("P001", "", THREE_ROWS).await.unwrap();
    registry.rules().add(plant_rule()).await;

    let first = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap();
    let second = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap();

    for (a, b) in first.batch.records.iter().zip(&second.batch.records) {
        assert_eq!(a.fields, b.fields);
        if a.remarks.is_empty() {
            assert!(b.remarks.is_empty());
        } else {
            assert!(b.remarks.len() > a.remarks.len());
            assert!(b.remarks.starts_with(&a.remarks));
        }
    }
}

#[tokio::test]
async fn missing_rules_refuse_before_starting() {
    let registry = registry();
    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();
    registry.rules().add(plant_rule()).await;

    let err = registry.harmonize(&batch.id, RuleKind::Merge).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NoRulesConfigured {
            kind: RuleKind::Merge
        }
    ));
    assert_eq!(registry.get(&batch.id).await.unwrap(), batch);
}

#[tokio::test]
async fn full_lifecycle_to_approved_and_export() {
    let export_dir = tempfile::tempdir().unwrap();
    let mut config = BlConfig::default();
    config.general.export_dir = export_dir.path().display().to_string();
    let registry = BatchRegistry::new(config).unwrap();

    let batch = registry.import_on("P001", "", ONE_ROW, day()).await.unwrap();
    let batch = walk_to(&registry, &batch.id, ApprovalStatus::DataValidated).await;
    assert!(batch.records.iter().all(|r| r.transformed));

    let err = registry
        .acknowledge(&batch.id, ApprovalLevel::L3, "carol")
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::ApprovalOutOfOrder { .. }));

    for (level, signer) in [
        (ApprovalLevel::L1, "alice"),
        (ApprovalLevel::L2, "bob"),
        (ApprovalLevel::L3, "carol"),
    ] {
        registry.acknowledge(&batch.id, level, signer).await.unwrap();
    }
    let approved = registry.get(&batch.id).await.unwrap();
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert!(registry.submit(&batch.id).await.is_err());

    let path = registry.export(&batch.id, LockHolder::Journey).await.unwrap();
    assert!(path.ends_with("M202502200001_journey_data.csv"));
}

#[tokio::test]
async fn skipping_a_stage_is_an_invalid_transition() {
    let registry = registry();
    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();
    let err = registry.transform(&batch.id).await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Core(CoreError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn rejected_batch_is_final() {
    let registry = registry();
    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();
    walk_to(&registry, &batch.id, ApprovalStatus::Submitted).await;

    let rejected = registry.reject(&batch.id, "wrong plant").await.unwrap();
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert_eq!(rejected.version, 2);

    registry.rules().add(plant_rule()).await;
    let err = registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap_err();
    assert!(matches!(err, RegistryError::Finalized { .. }));
}

#[tokio::test]
async fn blocking_overflow_policy_keeps_draft() {
    let mut config = BlConfig::default();
    config.lifecycle.metadata_overflow = OverflowPolicy::Block;
    let registry = BatchRegistry::new(config).unwrap();
    let batch = registry
        .import("P001", "", "Division,Site\n0001,1000\n")
        .await
        .unwrap();

    let err = registry.validate_metadata(&batch.id).await.unwrap_err();
    assert!(matches!(err, RegistryError::MetadataOverflow { warnings } if warnings.len() == 1));
    assert_eq!(
        registry.get(&batch.id).await.unwrap().status,
        ApprovalStatus::Draft
    );
}

struct SlowValidator(Duration);

impl DataValidator for SlowValidator {
    fn validate(&self, _batch: &Batch) -> Vec<String> {
        std::thread::sleep(self.0);
        Vec::new()
    }
}

#[tokio::test]
async fn timed_out_validation_is_discarded() {
    let mut config = BlConfig::default();
    config.engine.operation_timeout_ms = 20;
    let registry = BatchRegistry::new(config)
        .unwrap()
        .with_validator(Arc::new(SlowValidator(Duration::from_millis(300))));
    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();
    walk_to(&registry, &batch.id, ApprovalStatus::Transformed).await;

    let err = registry.validate_data(&batch.id).await.unwrap_err();
    assert!(matches!(err, RegistryError::Timeout { .. }));
    assert!(registry.is_busy(&batch.id));
    assert!(matches!(
        registry.submit(&batch.id).await,
        Err(RegistryError::Busy { .. })
    ));

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(!registry.is_busy(&batch.id));
    assert_eq!(
        registry.get(&batch.id).await.unwrap().status,
        ApprovalStatus::Transformed
    );
}

#[tokio::test]
async fn lock_switch_waits_for_running_validation() {
    let registry = registry().with_validator(Arc::new(SlowValidator(Duration::from_millis(300))));
    let running = registry.import_on("P001", "", ONE_ROW, day()).await.unwrap();
    let next = registry.import_on("P001", "", ONE_ROW, day()).await.unwrap();
    registry.acquire_lock(&running.id, LockHolder::Journey).await.unwrap();
    walk_to(&registry, &running.id, ApprovalStatus::Transformed).await;

    let (validated, switched) = tokio::join!(registry.validate_data(&running.id), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        registry.acquire_lock(&next.id, LockHolder::Journey).await
    });

    assert!(matches!(switched, Err(RegistryError::Busy { ref id }) if *id == running.id));
    assert_eq!(validated.unwrap().status, ApprovalStatus::DataValidated);
    let stored = registry.get(&running.id).await.unwrap();
    assert_eq!(stored.lock_holder, Some(LockHolder::Journey));
    assert_eq!(registry.get(&next.id).await.unwrap().lock_holder, None);

    let switched = registry.acquire_lock(&next.id, LockHolder::Journey).await.unwrap();
    assert_eq!(switched.lock_holder, Some(LockHolder::Journey));
    assert_eq!(registry.get(&running.id).await.unwrap().lock_holder, None);
}

#[tokio::test]
async fn mutations_are_recorded_in_the_trail() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry().with_trail(TrailWriter::new(dir.path().to_path_buf()).unwrap());

    let batch = registry.import("P001", "", ONE_ROW).await.unwrap();
    registry.acquire_lock(&batch.id, LockHolder::Journey).await.unwrap();
    registry.validate_metadata(&batch.id).await.unwrap();
    registry.release_lock(&batch.id, LockHolder::Journey).await.unwrap();
    registry.rules().add(plant_rule()).await;
    registry.harmonize(&batch.id, RuleKind::Enrich).await.unwrap();

    let ops: Vec<TrailOperation> = serde_jsonlines::json_lines(dir.path().join("P001.jsonl"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let kinds: Vec<TrailOp> = ops.iter().map(|o| o.op).collect();
    assert_eq!(
        kinds,
        [
            TrailOp::Imported,
            TrailOp::Locked,
            TrailOp::Transitioned,
            TrailOp::Released,
            TrailOp::Harmonized,
        ]
    );
    assert!(ops.iter().all(|o| o.batch == batch.id));
    assert_eq!(ops[2].data["to"], "Validated (Metadata)");
}
