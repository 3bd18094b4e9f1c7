use std::path::{Path, PathBuf};

use bl_core::entities::Batch;
use bl_core::enums::{LockHolder, RuleKind};
use bl_core::responses::{BatchSummary, HarmonizeResponse};
use tracing::info;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::HarmonizeArgs;
use crate::commands::shared::input::read_text;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::rules_file::load_rules;
use crate::context::AppContext;
use crate::output::output;

/// Handle `bl harmonize`.
pub async fn handle(
    args: &HarmonizeArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let kind = parse_enum::<RuleKind>(&args.kind, "kind")?;
    let content = read_text(&args.input)?;
    for rule in load_rules(&args.rules, &ctx.project_id)? {
        ctx.registry.rules().add(rule).await;
    }

    let batch = ctx
        .registry
        .import(&ctx.project_id, "harmonization run", &content)
        .await?;
    ctx.registry
        .acquire_lock(&batch.id, LockHolder::Harmonization)
        .await?;

    let harmonized = ctx.registry.harmonize(&batch.id, kind).await?;
    let path = export_to(
        ctx,
        &harmonized.batch,
        LockHolder::Harmonization,
        args.out.as_deref(),
    )
    .await?;
    let batch = ctx
        .registry
        .release_lock(&batch.id, LockHolder::Harmonization)
        .await?;
    info!(batch = %batch.id, path = %path.display(), "harmonized batch exported");

    output(
        &HarmonizeResponse {
            batch: BatchSummary::from(&batch),
            kind,
            applied_count: harmonized.applied_count,
            touched_records: harmonized.touched_records,
            export_path: Some(path.display().to_string()),
        },
        flags.format,
    )
}

/// Export into `out` when given, otherwise into the configured directory.
pub async fn export_to(
    ctx: &AppContext,
    batch: &Batch,
    holder: LockHolder,
    out: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    Ok(match out {
        Some(dir) => bl_registry::export::export_csv(batch, holder, dir)?,
        None => ctx.registry.export(&batch.id, holder).await?,
    })
}
