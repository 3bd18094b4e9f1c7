use clap::ValueEnum;

/// How command responses are printed.
///
/// `json` is pretty-printed, `raw` is single-line JSON for piping, `table`
/// is for people.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Raw,
}

/// Flags accepted anywhere on the command line, handed to every handler.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    /// Overrides `general.default_project`.
    pub project: Option<String>,
}
