//! Non-fatal warnings and the sinks that surface them.
//!
//! Parsing and aggregation never stop on a malformed file or an
//! inconsistent entity; they report a [`Warning`] to an injected
//! [`Notifier`] and carry on. The binary logs warnings through `tracing`
//! and also keeps them for the run summary.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

// ── Warning ───────────────────────────────────────────────────────────────────

/// A problem found while loading balance files.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The file could not be parsed and was skipped.
    ParseFailure { path: PathBuf, reason: String },
    /// The file declares an hour count too far from a 24-hour day.
    WrongHourCount { path: PathBuf, hours: usize },
    /// Two or more files of one entity share a date.
    RepeatingDates { entity: String },
    /// Files of one entity disagree on the number of readings.
    MixedHourCounts { entity: String },
}

impl Warning {
    /// Stable machine-readable kind, used as the `kind` field of the summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::ParseFailure { .. } => "parse_failure",
            Warning::WrongHourCount { .. } => "wrong_hour_count",
            Warning::RepeatingDates { .. } => "repeating_dates",
            Warning::MixedHourCounts { .. } => "mixed_hour_counts",
        }
    }

    /// The file path or entity name the warning is about.
    pub fn subject(&self) -> String {
        match self {
            Warning::ParseFailure { path, .. } | Warning::WrongHourCount { path, .. } => {
                path.display().to_string()
            }
            Warning::RepeatingDates { entity } | Warning::MixedHourCounts { entity } => {
                entity.clone()
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ParseFailure { path, reason } => {
                write!(f, "Verify file {} -- it is incorrect: {}", path.display(), reason)
            }
            Warning::WrongHourCount { path, hours } => write!(
                f,
                "File {} has a wrong number of hours ({})",
                path.display(),
                hours
            ),
            Warning::RepeatingDates { entity } => {
                write!(f, "Balance {:?} has repeating dates", entity)
            }
            Warning::MixedHourCounts { entity } => write!(
                f,
                "Balance {:?} has different sizes of hours in some files",
                entity
            ),
        }
    }
}

/// Flat, serialisable view of a [`Warning`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningEntry {
    pub kind: String,
    pub subject: String,
    pub message: String,
}

impl From<&Warning> for WarningEntry {
    fn from(w: &Warning) -> Self {
        WarningEntry {
            kind: w.kind().to_string(),
            subject: w.subject(),
            message: w.to_string(),
        }
    }
}

// ── Notifier ──────────────────────────────────────────────────────────────────

/// Sink for non-fatal warnings.
pub trait Notifier {
    fn notify(&mut self, warning: Warning);
}

/// Logs every warning at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, warning: Warning) {
        tracing::warn!(kind = warning.kind(), "{}", warning);
    }
}

/// Keeps every warning in memory, in arrival order.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    warnings: Vec<Warning>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// Number of collected warnings of the given [`Warning::kind`].
    pub fn count_kind(&self, kind: &str) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// Forwards every warning to two notifiers.
pub struct TeeNotifier<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: Notifier, B: Notifier> TeeNotifier<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Notifier, B: Notifier> Notifier for TeeNotifier<A, B> {
    fn notify(&mut self, warning: Warning) {
        self.first.notify(warning.clone());
        self.second.notify(warning);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, warning: Warning) {
        (**self).notify(warning);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure() -> Warning {
        Warning::ParseFailure {
            path: PathBuf::from("data/a.dat"),
            reason: "Invalid reading on line 5: \"x\"".to_string(),
        }
    }

    #[test]
    fn test_warning_kind_and_subject() {
        let w = parse_failure();
        assert_eq!(w.kind(), "parse_failure");
        assert_eq!(w.subject(), "data/a.dat");

        let w = Warning::RepeatingDates {
            entity: "Alice".to_string(),
        };
        assert_eq!(w.kind(), "repeating_dates");
        assert_eq!(w.subject(), "Alice");
    }

    #[test]
    fn test_warning_display_names_the_file() {
        let msg = parse_failure().to_string();
        assert!(msg.contains("data/a.dat"));
        assert!(msg.contains("Invalid reading"));
    }

    #[test]
    fn test_warning_display_names_the_entity() {
        let w = Warning::MixedHourCounts {
            entity: "North_Feeder".to_string(),
        };
        assert_eq!(
            w.to_string(),
            "Balance \"North_Feeder\" has different sizes of hours in some files"
        );
    }

    #[test]
    fn test_warning_entry_from_warning() {
        let w = Warning::WrongHourCount {
            path: PathBuf::from("b.dat"),
            hours: 30,
        };
        let entry = WarningEntry::from(&w);
        assert_eq!(entry.kind, "wrong_hour_count");
        assert_eq!(entry.subject, "b.dat");
        assert!(entry.message.contains("(30)"));
    }

    #[test]
    fn test_collecting_notifier_keeps_order() {
        let mut n = CollectingNotifier::new();
        n.notify(parse_failure());
        n.notify(Warning::RepeatingDates {
            entity: "Alice".to_string(),
        });
        assert_eq!(n.warnings().len(), 2);
        assert_eq!(n.warnings()[0].kind(), "parse_failure");
        assert_eq!(n.count_kind("repeating_dates"), 1);
        assert_eq!(n.count_kind("mixed_hour_counts"), 0);
    }

    #[test]
    fn test_tee_notifier_forwards_to_both() {
        let mut tee = TeeNotifier::new(CollectingNotifier::new(), CollectingNotifier::new());
        tee.notify(parse_failure());
        assert_eq!(tee.first.warnings().len(), 1);
        assert_eq!(tee.second.warnings().len(), 1);
    }

    #[test]
    fn test_mut_ref_is_a_notifier() {
        fn feed<N: Notifier>(mut sink: N) {
            sink.notify(parse_failure());
        }

        let mut inner = CollectingNotifier::new();
        feed(&mut inner);
        feed(&mut inner);
        assert_eq!(inner.warnings().len(), 2);
    }
}
