use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Import(args) => commands::import::handle(&args, ctx, flags).await,
        Commands::Harmonize(args) => commands::harmonize::handle(&args, ctx, flags).await,
        Commands::Pipeline(args) => commands::pipeline::handle(&args, ctx, flags).await,
        Commands::Stats(args) => commands::stats::handle(&args, ctx, flags).await,
        Commands::Rule { .. } | Commands::Schema(_) => {
            unreachable!("rule/schema are pre-dispatched in main")
        }
    }
}
