//! Terminal preferences for table output, resolved once at startup.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Narrower terminals fall back to natural column widths.
const MIN_TERM_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub term_width: Option<usize>,
}

impl UiPrefs {
    /// `stdout_tty` and the two environment values are passed in so the
    /// decision can be tested without a terminal.
    fn resolve(
        flags: &GlobalFlags,
        stdout_tty: bool,
        no_color: bool,
        columns: Option<&str>,
    ) -> Self {
        Self {
            table_color: stdout_tty
                && !no_color
                && !flags.quiet
                && flags.format == OutputFormat::Table,
            term_width: columns
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|width| *width >= MIN_TERM_WIDTH),
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let columns = std::env::var("COLUMNS").ok();
    let prefs = UiPrefs::resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
        columns.as_deref(),
    );
    let _ = UI_PREFS.set(prefs);
}

/// Preferences set by [`init`]; plain output when `init` never ran.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
