//! Grouping of parsed days by entity, and per-entity consistency checks.

use std::collections::{BTreeMap, HashSet};

use balance_core::models::{DailyRecord, EXTENDED_HOUR_COLUMNS, STANDARD_HOUR_COLUMNS};
use balance_core::notifications::{Notifier, Warning};
use chrono::NaiveDate;

// ── EntityGroup ───────────────────────────────────────────────────────────────

/// All parsed days of one entity, ordered by date.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityGroup {
    pub name: String,
    pub records: Vec<DailyRecord>,
}

impl EntityGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// `true` when two or more records share a date.
    pub fn has_repeating_dates(&self) -> bool {
        let distinct: HashSet<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        distinct.len() < self.records.len()
    }

    /// `true` when records disagree on how many readings they hold.
    pub fn has_mixed_hour_counts(&self) -> bool {
        let sizes: HashSet<usize> = self.records.iter().map(|r| r.readings.len()).collect();
        sizes.len() > 1
    }

    /// Number of hour columns of this entity's sheet.
    ///
    /// Wide when any record declares more hours than a standard sheet holds.
    pub fn hour_columns(&self) -> usize {
        if self.records.iter().any(DailyRecord::needs_extended_columns) {
            EXTENDED_HOUR_COLUMNS
        } else {
            STANDARD_HOUR_COLUMNS
        }
    }
}

// ── BalanceAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups records by entity name.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Bucket `records` by entity name.
    ///
    /// Groups come out sorted by name; records inside a group are sorted by
    /// date, keeping input order among equal dates.
    pub fn group(records: impl IntoIterator<Item = DailyRecord>) -> Vec<EntityGroup> {
        // BTreeMap keeps the entity names sorted.
        let mut map: BTreeMap<String, EntityGroup> = BTreeMap::new();

        for record in records {
            map.entry(record.entity_name.clone())
                .or_insert_with_key(|name| EntityGroup::new(name.clone()))
                .records
                .push(record);
        }

        map.into_values()
            .map(|mut group| {
                group.records.sort_by_key(|r| r.date);
                group
            })
            .collect()
    }

    /// Run the consistency checks on every group and report what fails.
    ///
    /// Returns the number of warnings emitted.
    pub fn validate(groups: &[EntityGroup], notifier: &mut dyn Notifier) -> usize {
        let mut emitted = 0;
        for group in groups {
            if group.has_repeating_dates() {
                notifier.notify(Warning::RepeatingDates {
                    entity: group.name.clone(),
                });
                emitted += 1;
            }
            if group.has_mixed_hour_counts() {
                notifier.notify(Warning::MixedHourCounts {
                    entity: group.name.clone(),
                });
                emitted += 1;
            }
        }
        emitted
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
