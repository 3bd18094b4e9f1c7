use bl_core::responses::BatchSummary;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::commands::shared::input::read_text;
use crate::context::AppContext;
use crate::output::output;

/// Handle `bl import`.
pub async fn handle(
    args: &ImportArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let content = read_text(&args.input)?;
    let batch = ctx
        .registry
        .import(&ctx.project_id, &args.description, &content)
        .await?;
    output(&BatchSummary::from(&batch), flags.format)
}
