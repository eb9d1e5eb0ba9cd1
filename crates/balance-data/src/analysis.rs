//! Top-level load pipeline.
//!
//! Discovers the input files, parses them one at a time, groups the parsed
//! days by entity and checks every group, returning a [`LoadResult`] ready
//! for export.

use std::path::{Path, PathBuf};

use balance_core::error::Result;
use balance_core::models::DailyRecord;
use balance_core::notifications::{Notifier, Warning};
use tracing::{debug, info};

use crate::aggregator::{BalanceAggregator, EntityGroup};
use crate::reader::{discover_files, parse_balance_file};

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters produced alongside the loaded groups.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct LoadMetadata {
    /// Number of files the input resolved to.
    pub files_found: usize,
    /// Number of files parsed into a record.
    pub files_parsed: usize,
    /// Number of files skipped because they could not be parsed.
    pub files_failed: usize,
    /// Number of distinct entities.
    pub entities: usize,
    /// Number of consistency warnings (hour counts, dates, sizes).
    pub consistency_warnings: usize,
    /// Wall-clock seconds spent reading and parsing files.
    pub load_time_seconds: f64,
}

/// The complete output of [`load_balances`].
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// Entity groups, sorted by entity name, each sorted by date.
    pub groups: Vec<EntityGroup>,
    pub metadata: LoadMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full load pipeline for an input pattern or directory.
///
/// 1. Resolve `input` to a sorted file list.
/// 2. Parse every file; failures are reported and the file is dropped.
/// 3. Group the records by entity and sort them.
/// 4. Report inconsistent groups.
///
/// Only an invalid input pattern is an error; every per-file problem is a
/// warning sent to `notifier`.
pub fn load_balances(input: &str, notifier: &mut dyn Notifier) -> Result<LoadResult> {
    let files = discover_files(input)?;
    info!("Found {} balance files for {:?}", files.len(), input);
    Ok(load_files(&files, notifier))
}

/// Run steps 2–4 of [`load_balances`] on an explicit file list.
pub fn load_files(files: &[PathBuf], notifier: &mut dyn Notifier) -> LoadResult {
    // ── Step 1: Parse ─────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let mut records: Vec<DailyRecord> = Vec::with_capacity(files.len());
    let mut files_failed = 0usize;
    let mut consistency_warnings = 0usize;

    for path in files {
        match read_one(path, notifier) {
            Some((record, plausible)) => {
                if !plausible {
                    consistency_warnings += 1;
                }
                records.push(record);
            }
            None => files_failed += 1,
        }
    }
    let load_time = load_start.elapsed().as_secs_f64();
    let files_parsed = records.len();

    // ── Step 2: Group ─────────────────────────────────────────────────────────
    let groups = BalanceAggregator::group(records);

    // ── Step 3: Validate ──────────────────────────────────────────────────────
    consistency_warnings += BalanceAggregator::validate(&groups, notifier);

    debug!(
        "Parsed {} of {} files into {} entities in {:.3}s",
        files_parsed,
        files.len(),
        groups.len(),
        load_time
    );

    let metadata = LoadMetadata {
        files_found: files.len(),
        files_parsed,
        files_failed,
        entities: groups.len(),
        consistency_warnings,
        load_time_seconds: load_time,
    };

    LoadResult { groups, metadata }
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// Parse one file, reporting failures and implausible hour counts.
///
/// Returns the record and whether its hour count is plausible, or `None`
/// when the file was dropped.
fn read_one(path: &Path, notifier: &mut dyn Notifier) -> Option<(DailyRecord, bool)> {
    let record = match parse_balance_file(path) {
        Ok(record) => record,
        Err(e) => {
            notifier.notify(Warning::ParseFailure {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return None;
        }
    };

    let plausible = record.has_plausible_hour_count();
    if !plausible {
        notifier.notify(Warning::WrongHourCount {
            path: path.to_path_buf(),
            hours: record.declared_hour_count,
        });
    }
    Some((record, plausible))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
