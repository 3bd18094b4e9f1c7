use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;

/// Handle `bl stats`.
pub async fn handle(
    args: &StatsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let content = read_text(&args.input)?;
    let batch = ctx.registry.import(&ctx.project_id, "", &content).await?;
    let stats = ctx.registry.stats(&batch.id).await?;
    output(&stats, flags.format)
}
