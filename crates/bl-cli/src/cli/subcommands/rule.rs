use std::path::PathBuf;

use clap::Subcommand;

#[derive(Clone, Debug, Subcommand)]
pub enum RuleCommands {
    /// Parse one logic string and print its syntax tree.
    Parse {
        /// e.g. "IF (Site == '1000') THEN MODIFY Plant = '1000'"
        logic: String,
    },
    /// Parse every rule in a TOML rule file.
    Check {
        #[arg(long)]
        rules: PathBuf,
    },
}
