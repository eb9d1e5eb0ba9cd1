//! Balance file discovery and parsing.
//!
//! A balance file holds one day of hourly readings for one entity:
//!
//! ```text
//! <name line>            (zero or more)
//! <DD-MM-YYYY>
//! <hour count N>
//! <reading>,<sign>       (N lines)
//! [<trailing line>]
//! ```

use std::path::{Path, PathBuf};

use balance_core::dates::parse_record_date;
use balance_core::error::{BalanceError, Result};
use balance_core::models::{DailyRecord, EXTENDED_HOUR_COLUMNS};
use tracing::{debug, warn};

/// Extension of balance files collected when the input is a directory.
pub const BALANCE_EXTENSION: &str = "dat";

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Resolve `input` to the list of balance files to process, sorted by path.
///
/// An existing directory is walked recursively for `.dat` files. Anything
/// else is treated as a glob pattern, where `**` matches across directory
/// levels.
pub fn discover_files(input: &str) -> Result<Vec<PathBuf>> {
    let as_path = Path::new(input);
    if as_path.is_dir() {
        return Ok(find_dat_files(as_path));
    }

    let entries = glob::glob(input).map_err(|e| BalanceError::Pattern {
        pattern: input.to_string(),
        reason: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    Ok(files)
}

/// Find all `.dat` files recursively under `dir`, sorted by path.
pub fn find_dat_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext == BALANCE_EXTENSION)
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Read and parse one balance file.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// legacy-encoded entity name does not cost the whole file.
pub fn parse_balance_file(path: &Path) -> Result<DailyRecord> {
    let bytes = std::fs::read(path).map_err(|source| BalanceError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let record = parse_balance(&text)?;

    debug!(
        "File {}: entity {:?}, date {}, {} readings",
        path.display(),
        record.entity_name,
        record.date,
        record.readings.len()
    );

    Ok(record)
}

/// Parse the contents of one balance file.
///
/// Every line is stripped of surrounding whitespace. Lines before the first
/// line that parses as a date make up the entity name; the line after the
/// date is the hour count; that many `reading,sign` lines follow. Of the
/// lines left over, blank ones are ignored and the last one is kept as the
/// trailing line. `\n`, `\r\n` and a lone `\r` all end a line.
pub fn parse_balance(text: &str) -> Result<DailyRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = text
        .lines()
        .map(str::trim)
        .enumerate()
        .map(|(idx, line)| (idx + 1, line));

    // Name phase.
    let mut names: Vec<&str> = Vec::new();
    let (date_line, date) = loop {
        let (line_no, line) = lines.next().ok_or(BalanceError::MissingDate)?;
        match parse_record_date(line) {
            Some(date) => break (line_no, date),
            None => names.push(line),
        }
    };

    // Hour-count phase.
    let (hours_line, hours_text) = lines.next().ok_or(BalanceError::MissingHourCount {
        line: date_line + 1,
    })?;
    let declared_hour_count: usize =
        hours_text
            .parse()
            .map_err(|_| BalanceError::InvalidHourCount {
                line: hours_line,
                value: hours_text.to_string(),
            })?;

    // Data phase.
    // The count comes from the file; only trust it up to a wide sheet.
    let capacity = declared_hour_count.min(EXTENDED_HOUR_COLUMNS);
    let mut readings = Vec::with_capacity(capacity);
    let mut signs = Vec::with_capacity(capacity);
    while readings.len() < declared_hour_count {
        let Some((line_no, line)) = lines.next() else {
            return Err(BalanceError::TruncatedData {
                declared: declared_hour_count,
                found: readings.len(),
            });
        };
        let (reading, sign) = parse_data_line(line_no, line)?;
        readings.push(reading);
        signs.push(sign);
    }

    // Trailing phase.
    let extras: Vec<(usize, &str)> = lines.filter(|(_, line)| !line.is_empty()).collect();
    if extras.len() > 1 {
        debug!(
            "{} lines follow the data block; keeping line {}",
            extras.len(),
            extras[extras.len() - 1].0
        );
    }
    let trailing_line = extras.last().map(|(_, line)| line.to_string());

    Ok(DailyRecord {
        entity_name: names.join("_"),
        date,
        declared_hour_count,
        readings,
        signs,
        trailing_line,
    })
}

/// Split a `reading,sign` line on its first comma.
fn parse_data_line(line_no: usize, line: &str) -> Result<(f64, String)> {
    let (value, sign) = line.split_once(',').ok_or_else(|| BalanceError::MissingSign {
        line: line_no,
        value: line.to_string(),
    })?;
    let value = value.trim();
    let reading = value
        .parse::<f64>()
        .map_err(|_| BalanceError::InvalidReading {
            line: line_no,
            value: value.to_string(),
        })?;
    Ok((reading, sign.trim().to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
