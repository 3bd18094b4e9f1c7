use bl_core::entities::Batch;
use bl_core::enums::{ApprovalLevel, ApprovalStatus, LockHolder, RuleKind};
use bl_core::responses::{BatchSummary, PipelineResponse, StageReport};
use bl_registry::RegistryError;
use tracing::{info, warn};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PipelineArgs;
use crate::commands::harmonize::export_to;
use crate::commands::shared::input::read_text;
use crate::commands::shared::rules_file::load_rules;
use crate::context::AppContext;
use crate::output::output;

/// Handle `bl pipeline`.
///
/// Runs import, metadata validation, the optional enrich pass, submit,
/// transform, data validation and the three approvals, then exports. When a
/// stage fails the batch is rejected if its status allows it, the stages so
/// far are printed and the command fails.
pub async fn handle(
    args: &PipelineArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let content = read_text(&args.input)?;
    if let Some(path) = &args.rules {
        for rule in load_rules(path, &ctx.project_id)? {
            ctx.registry.rules().add(rule).await;
        }
    }

    let batch = ctx
        .registry
        .import(&ctx.project_id, "pipeline run", &content)
        .await?;
    let mut run = Run::new(ctx, batch);
    run.record("import", None);

    let result = run.drive(args).await;
    if let Err((stage, error)) = &result {
        warn!(batch = %run.batch.id, stage, %error, "pipeline stopped");
        run.record(stage, Some(error.to_string()));
        run.reject_after(stage, error).await;
    }

    let response = PipelineResponse {
        batch: BatchSummary::from(&run.batch),
        stages: run.stages,
        export_path: run.export_path,
    };
    output(&response, flags.format)?;

    match result {
        Ok(()) => Ok(()),
        Err((stage, error)) => Err(anyhow::anyhow!("pipeline stopped at {stage}: {error}")),
    }
}

type StageError = (&'static str, RegistryError);

struct Run<'a> {
    ctx: &'a AppContext,
    batch: Batch,
    stages: Vec<StageReport>,
    export_path: Option<String>,
}

impl<'a> Run<'a> {
    const fn new(ctx: &'a AppContext, batch: Batch) -> Self {
        Self {
            ctx,
            batch,
            stages: Vec::new(),
            export_path: None,
        }
    }

    fn record(&mut self, stage: &str, note: Option<String>) {
        self.stages.push(StageReport {
            stage: stage.to_string(),
            status: self.batch.status,
            note,
        });
    }

    async fn drive(&mut self, args: &PipelineArgs) -> Result<(), StageError> {
        let ctx = self.ctx;
        let registry = &ctx.registry;
        let id = self.batch.id.clone();

        let validation = registry
            .validate_metadata(&id)
            .await
            .map_err(|e| ("validate metadata", e))?;
        self.batch = validation.batch;
        self.record("validate metadata", self.batch.remarks.clone());

        self.enrich(&id).await?;

        registry
            .acquire_lock(&id, LockHolder::Journey)
            .await
            .map_err(|e| ("lock", e))?;
        self.batch = registry.submit(&id).await.map_err(|e| ("submit", e))?;
        self.record("submit", None);
        self.batch = registry.transform(&id).await.map_err(|e| ("transform", e))?;
        self.record("transform", None);
        self.batch = registry
            .validate_data(&id)
            .await
            .map_err(|e| ("validate data", e))?;
        self.record("validate data", None);

        for (stage, level) in [
            ("approve L1", ApprovalLevel::L1),
            ("approve L2", ApprovalLevel::L2),
            ("approve L3", ApprovalLevel::L3),
        ] {
            self.batch = registry
                .acknowledge(&id, level, &args.signer)
                .await
                .map_err(|e| (stage, e))?;
            self.record(stage, Some(args.signer.clone()));
        }

        let path = export_to(self.ctx, &self.batch, LockHolder::Journey, args.out.as_deref())
            .await
            .map_err(|e| ("export", RegistryError::Other(e)))?;
        self.export_path = Some(path.display().to_string());
        self.batch = registry
            .release_lock(&id, LockHolder::Journey)
            .await
            .map_err(|e| ("release", e))?;
        info!(batch = %id, path = %path.display(), "pipeline complete");
        Ok(())
    }

    /// Run the ENRICH rules under the harmonization lock. A project without
    /// ENRICH rules skips the stage.
    async fn enrich(&mut self, id: &str) -> Result<(), StageError> {
        let ctx = self.ctx;
        let registry = &ctx.registry;
        registry
            .acquire_lock(id, LockHolder::Harmonization)
            .await
            .map_err(|e| ("enrich", e))?;
        let outcome = registry.harmonize(id, RuleKind::Enrich).await;
        registry
            .release_lock(id, LockHolder::Harmonization)
            .await
            .map_err(|e| ("enrich", e))?;

        match outcome {
            Ok(harmonized) => {
                self.batch = harmonized.batch;
                let note = format!(
                    "{} values set on {} records",
                    harmonized.applied_count, harmonized.touched_records
                );
                self.record("enrich", Some(note));
                Ok(())
            }
            Err(RegistryError::NoRulesConfigured { .. }) => {
                self.record("enrich", Some(String::from("skipped")));
                Ok(())
            }
            Err(error) => Err(("enrich", error)),
        }
    }

    /// Reject a batch that stopped in a rejectable status, then drop the
    /// journey lock.
    async fn reject_after(&mut self, stage: &str, error: &RegistryError) {
        let id = self.batch.id.clone();
        if let Ok(current) = self.ctx.registry.get(&id).await {
            self.batch = current;
        }
        if !self.batch.status.can_transition_to(ApprovalStatus::Rejected) {
            return;
        }
        let reason = format!("{stage}: {error}");
        match self.ctx.registry.reject(&id, &reason).await {
            Ok(batch) => {
                self.batch = batch;
                self.record("reject", Some(reason));
            }
            Err(reject_error) => warn!(batch = %id, %reject_error, "could not reject batch"),
        }
        match self.ctx.registry.release_lock(&id, LockHolder::Journey).await {
            Ok(batch) => self.batch = batch,
            Err(release_error) => warn!(batch = %id, %release_error, "could not release lock"),
        }
    }
}
