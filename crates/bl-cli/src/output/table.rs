//! Plain aligned text tables for `--format table`.

const MIN_COLUMN: usize = 6;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Rows of string cells under a header line.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths = self.natural_widths();
        if let Some(max_width) = options.max_width {
            self.shrink_to(&mut widths, max_width);
        }

        let header_line = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| pad(&clip(header, *width), *width, false))
            .collect::<Vec<_>>()
            .join(GAP);
        let divider = "-".repeat(header_line.chars().count());

        let mut lines = vec![header_line, divider];
        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let cell = clip(row.get(index).map_or("-", String::as_str), *width);
                    let padded = pad(&cell, *width, is_numeric(&cell));
                    if options.color {
                        paint(&cell, padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join(GAP);
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn natural_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count(), MIN_COLUMN])
                    .max()
                    .unwrap_or(MIN_COLUMN)
            })
            .collect()
    }

    /// Narrow the widest shrinkable column one char at a time until the
    /// table fits or nothing can shrink further.
    fn shrink_to(&self, widths: &mut [usize], max_width: usize) {
        let gaps = widths.len().saturating_sub(1) * GAP.len();
        while widths.iter().sum::<usize>() + gaps > max_width {
            let floor = |index: usize| self.headers[index].chars().count().max(MIN_COLUMN);
            let widest = widths
                .iter()
                .enumerate()
                .filter(|(index, width)| **width > floor(*index))
                .max_by_key(|(_, width)| **width)
                .map(|(index, _)| index);
            match widest {
                Some(index) => widths[index] -= 1,
                None => break,
            }
        }
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(value.chars().count()));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

/// Color lifecycle vocabulary: green for done, yellow for in-between, red
/// for refusals.
fn paint(cell: &str, padded: String) -> String {
    let code = match cell.to_ascii_lowercase().as_str() {
        "approved" | "ok" | "true" => "32",
        "draft" | "skipped" | "warn" | "submitted" | "transformed" => "33",
        "rejected" | "false" | "error" | "failed" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}
