//! Date codec for the `DD-MM-YYYY` header line of balance files.

use chrono::NaiveDate;

/// `strftime`-style format of the date header line and of the row labels in
/// the exported sheets.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Parse a header line as a date.
///
/// The line is trimmed first. Returns `None` for anything that is not a
/// valid calendar date in `DD-MM-YYYY` form, including the empty string.
/// The year must have exactly four digits, so a name line such as
/// `01-02-03` is not taken for a date.
pub fn parse_record_date(line: &str) -> Option<NaiveDate> {
    let line = line.trim();
    let year = line.rsplit('-').next()?;
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(line, DATE_FORMAT).ok()
}

/// Format a date back to its `DD-MM-YYYY` label.
pub fn format_record_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
