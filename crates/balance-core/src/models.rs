use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

/// Number of hour columns used for a regular sheet.
pub const STANDARD_HOUR_COLUMNS: usize = 25;

/// Number of hour columns used when any record of an entity declares more
/// than [`STANDARD_HOUR_COLUMNS`] hours.
pub const EXTENDED_HOUR_COLUMNS: usize = 100;

/// Hour count of the short day at the daylight-saving-time switch.
pub const SHORT_DAY_HOURS: usize = 23;

/// Expected hour count of an ordinary day.
pub const NOMINAL_DAY_HOURS: usize = 24;

/// One parsed balance file: a single day of hourly readings for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    /// Header lines preceding the date line, joined with `_`.
    pub entity_name: String,
    /// Calendar day covered by the readings.
    pub date: NaiveDate,
    /// Number of data lines the file announced after the date.
    pub declared_hour_count: usize,
    /// Hourly readings, in file order.
    pub readings: Vec<f64>,
    /// Sign token of each reading, parallel to `readings`.
    pub signs: Vec<String>,
    /// Opaque line following the data block, if any.
    pub trailing_line: Option<String>,
}

impl DailyRecord {
    /// Distinct sign tokens, sorted, joined with a single space.
    pub fn sign_summary(&self) -> String {
        let distinct: BTreeSet<&str> = self.signs.iter().map(String::as_str).collect();
        distinct.into_iter().collect::<Vec<_>>().join(" ")
    }

    /// `true` when the declared hour count is within one hour of a nominal
    /// day, which covers both daylight-saving-time switch days.
    pub fn has_plausible_hour_count(&self) -> bool {
        self.declared_hour_count.abs_diff(NOMINAL_DAY_HOURS) <= 1
    }

    /// `true` when this record needs the wide sheet layout.
    pub fn needs_extended_columns(&self) -> bool {
        self.declared_hour_count > STANDARD_HOUR_COLUMNS
    }
}
