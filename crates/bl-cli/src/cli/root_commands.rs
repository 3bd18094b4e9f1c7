use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::RuleCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Parse and check rule logic.
    Rule {
        #[command(subcommand)]
        action: RuleCommands,
    },
    /// Import a CSV extract as a draft batch.
    Import(ImportArgs),
    /// Import a CSV extract and run one kind of harmonization rules over it.
    Harmonize(HarmonizeArgs),
    /// Run an extract through the whole approval lifecycle.
    Pipeline(PipelineArgs),
    /// Quality statistics for a CSV extract.
    Stats(StatsArgs),
    /// Print the JSON Schema of a Batchline type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// CSV file with a header row
    #[arg(long)]
    pub input: PathBuf,

    /// Batch description
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Clone, Debug, Args)]
pub struct HarmonizeArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// TOML rule file (`[[rule]]` entries)
    #[arg(long)]
    pub rules: PathBuf,

    /// Rule kind to run: enrich, merge, split
    #[arg(long)]
    pub kind: String,

    /// Directory for the harmonized CSV
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct PipelineArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Optional TOML rule file; its ENRICH rules run after metadata validation
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Signer recorded on every approval level
    #[arg(long, default_value = "Active User")]
    pub signer: String,

    /// Directory for the exported CSV
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    #[arg(long)]
    pub input: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: batch, record, rule, trail
    pub type_name: String,
}
