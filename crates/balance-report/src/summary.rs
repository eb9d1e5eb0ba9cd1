//! JSON summary of a run, written when `--summary` is given.

use std::path::Path;

use balance_core::notifications::{Warning, WarningEntry};
use balance_core::settings::Settings;
use balance_data::analysis::LoadMetadata;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// RFC 3339 timestamp of when the run finished.
    pub generated_at: String,
    pub input: String,
    pub output: String,
    pub files_found: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub entities: usize,
    /// Warnings about hour counts, repeated dates and mixed day sizes.
    pub consistency_warnings: usize,
    pub load_time_seconds: f64,
    pub sheets: usize,
    pub warnings: Vec<WarningEntry>,
}

impl RunSummary {
    pub fn new(
        settings: &Settings,
        metadata: &LoadMetadata,
        sheets: usize,
        warnings: &[Warning],
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            input: settings.input.clone(),
            output: settings.out.display().to_string(),
            files_found: metadata.files_found,
            files_parsed: metadata.files_parsed,
            files_failed: metadata.files_failed,
            entities: metadata.entities,
            consistency_warnings: metadata.consistency_warnings,
            load_time_seconds: metadata.load_time_seconds,
            sheets,
            warnings: warnings.iter().map(WarningEntry::from).collect(),
        }
    }

    /// Write the summary as pretty JSON, creating parent directories.
    ///
    /// Goes through a temp file and a rename so a reader never sees a
    /// half-written summary.
    pub fn save_to(&self, path: &Path) -> balance_core::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }
}
