//! Human-facing batch numbers: `M` + `YYYYMMDD` + a four-digit daily counter.

use chrono::NaiveDate;

/// Day prefix, e.g. `M20250220`.
#[must_use]
pub fn prefix(date: NaiveDate) -> String {
    date.format("M%Y%m%d").to_string()
}

/// Counter value of one existing number. A missing or unparsable suffix
/// counts as zero.
fn suffix_of(number: &str, prefix: &str) -> u32 {
    let Some(rest) = number.strip_prefix(prefix) else {
        return 0;
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Next number for `date` given the project's existing batch numbers.
///
/// Numbers of other days are ignored, so the counter restarts at `0001`.
pub fn next_batch_number<'a>(existing: impl IntoIterator<Item = &'a str>, date: NaiveDate) -> String {
    let prefix = prefix(date);
    let max = existing
        .into_iter()
        .filter(|n| n.starts_with(&prefix))
        .map(|n| suffix_of(n, &prefix))
        .max()
        .unwrap_or(0);
    format!("{prefix}{:04}", max.saturating_add(1))
}
