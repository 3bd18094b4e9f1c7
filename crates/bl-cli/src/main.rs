#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;

const LOG_ENV: &str = "BATCHLINE_LOG";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("bl error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(default_level(cli.quiet, cli.verbose))?;

    let flags = cli.global_flags();
    ui::init(&flags);

    // Neither command touches the registry, so they run without config.
    match &cli.command {
        cli::Commands::Rule { action } => return commands::rule::handle(action, &flags),
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        _ => {}
    }

    let ctx = context::AppContext::init(bootstrap::load_config(&flags)?)?;
    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

const fn default_level(quiet: bool, verbose: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, true) => "debug",
        (false, false) => "warn",
    }
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("cannot install log subscriber: {error}"))
}
