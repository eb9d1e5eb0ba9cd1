use clap::Parser;
use std::path::PathBuf;

use crate::error::{BalanceError, Result};

/// Default prefix of the technical sheet names.
pub const DEFAULT_SHEET_PREFIX: &str = "sheet_";

/// Longest sheet name a workbook accepts.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters a workbook refuses in sheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Collect daily balance files into one spreadsheet, one sheet per entity
#[derive(Parser, Debug, Clone)]
#[command(
    name = "balance-report",
    about = "Collect daily balance files into one spreadsheet, one sheet per entity",
    version
)]
pub struct Settings {
    /// Input files as a glob pattern (e.g. `dir/OSDN_*.dat`) or a directory
    #[arg(short, long, default_value = "**/*.dat")]
    pub input: String,

    /// Output workbook path
    #[arg(short, long, default_value = "output.xlsx")]
    pub out: PathBuf,

    /// Prefix of the sheet names; the 1-based sheet ordinal is appended
    #[arg(long, default_value = DEFAULT_SHEET_PREFIX)]
    pub sheet_prefix: String,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] but with an explicit argument list, so
    /// tests can drive it without spawning subprocesses.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Apply the `--debug` flag.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Check values clap cannot check on its own.
    ///
    /// The sheet prefix must leave room for the ordinal and may not contain
    /// characters a workbook rejects in sheet names.
    pub fn validate(&self) -> Result<()> {
        if self.input.trim().is_empty() {
            return Err(BalanceError::Config("input pattern is empty".to_string()));
        }
        if let Some(c) = self
            .sheet_prefix
            .chars()
            .find(|c| FORBIDDEN_SHEET_CHARS.contains(c))
        {
            return Err(BalanceError::Config(format!(
                "sheet prefix {:?} contains forbidden character {:?}",
                self.sheet_prefix, c
            )));
        }
        // Leave room for up to four ordinal digits.
        if self.sheet_prefix.chars().count() + 4 > MAX_SHEET_NAME_LEN {
            return Err(BalanceError::Config(format!(
                "sheet prefix {:?} is too long",
                self.sheet_prefix
            )));
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["balance-report"]);

        assert_eq!(settings.input, "**/*.dat");
        assert_eq!(settings.out, PathBuf::from("output.xlsx"));
        assert_eq!(settings.sheet_prefix, DEFAULT_SHEET_PREFIX);
        assert!(settings.summary.is_none());
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_short_flags() {
        let settings = Settings::parse_from([
            "balance-report",
            "-i",
            "dir/OSDN_*.dat",
            "-o",
            "/tmp/balances.xlsx",
        ]);
        assert_eq!(settings.input, "dir/OSDN_*.dat");
        assert_eq!(settings.out, PathBuf::from("/tmp/balances.xlsx"));
    }

    #[test]
    fn test_settings_summary_path() {
        let settings = Settings::parse_from(["balance-report", "--summary", "run.json"]);
        assert_eq!(settings.summary, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn test_settings_rejects_unknown_log_level() {
        let result = Settings::try_parse_from(["balance-report", "--log-level", "TRACE"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_debug_overrides_log_level() {
        let settings = Settings::load_from(["balance-report", "--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_from_keeps_log_level_without_debug() {
        let settings = Settings::load_from(["balance-report", "--log-level", "WARNING"]);
        assert_eq!(settings.log_level, "WARNING");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let settings = Settings::parse_from(["balance-report"]);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_forbidden_prefix_character() {
        let settings = Settings::parse_from(["balance-report", "--sheet-prefix", "a/b"]);
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("forbidden character"));
    }

    #[test]
    fn test_validate_rejects_long_prefix() {
        let prefix = "x".repeat(28);
        let settings = Settings::parse_from(["balance-report", "--sheet-prefix", prefix.as_str()]);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_input() {
        let settings = Settings::parse_from(["balance-report", "--input", "  "]);
        assert!(settings.validate().is_err());
    }
}
