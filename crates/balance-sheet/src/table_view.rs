//! Per-entity sheet tables.
//!
//! A table has one row per day, labelled `DD-MM-YYYY`, with one cell per
//! hour column and a final sign-summary cell.

use balance_core::dates::format_record_date;
use balance_core::models::{DailyRecord, SHORT_DAY_HOURS};
use balance_data::aggregator::EntityGroup;

/// Position of the blank slot inserted into a 23-hour day.
pub const SHORT_DAY_GAP_INDEX: usize = 2;

/// Header of the last column.
pub const SIGN_COLUMN: &str = "sign";

/// One day of an entity's sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// Date label, `DD-MM-YYYY`.
    pub label: String,
    /// Exactly as many cells as the sheet has hour columns; `None` is blank.
    pub cells: Vec<Option<f64>>,
    /// Sorted distinct sign tokens, space separated.
    pub signs: String,
}

/// Everything needed to write one worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    /// Technical sheet name: prefix plus 1-based ordinal.
    pub sheet_name: String,
    /// Human-readable entity name, written to the top-left cell.
    pub entity_name: String,
    pub hour_columns: usize,
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    /// Build the table of `group`, the `ordinal`-th sheet (1-based).
    pub fn from_group(ordinal: usize, group: &EntityGroup, prefix: &str) -> Self {
        let hour_columns = group.hour_columns();
        let rows = group
            .records
            .iter()
            .map(|record| build_row(record, hour_columns))
            .collect();

        Self {
            sheet_name: format!("{}{}", prefix, ordinal),
            entity_name: group.name.clone(),
            hour_columns,
            rows,
        }
    }

    /// Header labels after the top-left cell: `1..=W` then `sign`.
    pub fn column_labels(&self) -> Vec<String> {
        (1..=self.hour_columns)
            .map(|c| c.to_string())
            .chain(std::iter::once(SIGN_COLUMN.to_string()))
            .collect()
    }
}

/// Build one sheet row from a record for a sheet `width` hour columns wide.
///
/// Readings beyond `width` are dropped. A 23-hour day gets a blank at
/// [`SHORT_DAY_GAP_INDEX`] so later hours line up with a regular day. The
/// row is then padded with blanks to `width`.
pub fn build_row(record: &DailyRecord, width: usize) -> SheetRow {
    let mut cells: Vec<Option<f64>> = record
        .readings
        .iter()
        .take(width)
        .copied()
        .map(Some)
        .collect();

    if cells.len() == SHORT_DAY_HOURS {
        cells.insert(SHORT_DAY_GAP_INDEX, None);
    }
    // A 23-hour day in a sheet narrower than 24 columns overflows by one.
    cells.resize(width, None);

    SheetRow {
        label: format_record_date(record.date),
        cells,
        signs: record.sign_summary(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use balance_core::models::{EXTENDED_HOUR_COLUMNS, STANDARD_HOUR_COLUMNS};
    use balance_data::aggregator::BalanceAggregator;
    use chrono::NaiveDate;

    fn make_record(name: &str, date: &str, hours: usize, signs: &[&str]) -> DailyRecord {
        DailyRecord {
            entity_name: name.to_string(),
            date: NaiveDate::parse_from_str(date, "%d-%m-%Y").unwrap(),
            declared_hour_count: hours,
            readings: (1..=hours).map(|h| h as f64).collect(),
            signs: (0..hours).map(|h| signs[h % signs.len()].to_string()).collect(),
            trailing_line: None,
        }
    }

    // ── build_row ─────────────────────────────────────────────────────────────

    #[test]
    fn test_build_row_24_hours_pads_last_column() {
        let row = build_row(&make_record("A", "01-01-2020", 24, &["+"]), 25);
        assert_eq!(row.cells.len(), 25);
        assert_eq!(row.cells[0], Some(1.0));
        assert_eq!(row.cells[23], Some(24.0));
        assert_eq!(row.cells[24], None);
        assert_eq!(row.label, "01-01-2020");
    }

    #[test]
    fn test_build_row_23_hours_inserts_gap_at_index_2() {
        let row = build_row(&make_record("A", "29-03-2020", 23, &["+"]), 25);
        assert_eq!(row.cells.len(), 25);
        assert_eq!(row.cells[..3], [Some(1.0), Some(2.0), None]);

        let values: Vec<f64> = row.cells.iter().flatten().copied().collect();
        let expected: Vec<f64> = (1..=23).map(|h| h as f64).collect();
        assert_eq!(values, expected);
        assert_eq!(row.cells[24], None);
        assert_eq!(row.cells[23], Some(23.0));
    }

    #[test]
    fn test_build_row_25_hours_fills_every_column() {
        let row = build_row(&make_record("A", "25-10-2020", 25, &["+"]), 25);
        assert!(row.cells.iter().all(Option::is_some));
    }

    #[test]
    fn test_build_row_truncates_to_width() {
        let row = build_row(&make_record("A", "01-01-2020", 30, &["+"]), 25);
        assert_eq!(row.cells.len(), 25);
        assert_eq!(row.cells[24], Some(25.0));
    }

    #[test]
    fn test_build_row_extended_width() {
        let row = build_row(&make_record("A", "01-01-2020", 96, &["+"]), 100);
        assert_eq!(row.cells.len(), 100);
        assert_eq!(row.cells[95], Some(96.0));
        assert!(row.cells[96..].iter().all(Option::is_none));
    }

    #[test]
    fn test_build_row_23_hours_in_extended_sheet_still_gets_gap() {
        let row = build_row(&make_record("A", "29-03-2020", 23, &["+"]), 100);
        assert_eq!(row.cells[2], None);
        assert_eq!(row.cells[3], Some(3.0));
        assert_eq!(row.cells.len(), 100);
    }

    #[test]
    fn test_build_row_sign_summary() {
        let row = build_row(&make_record("A", "01-01-2020", 6, &["-", "+", "*"]), 25);
        assert_eq!(row.signs, "* + -");
    }

    #[test]
    fn test_build_row_empty_day() {
        let row = build_row(&make_record("A", "01-01-2020", 0, &["+"]), 25);
        assert!(row.cells.iter().all(Option::is_none));
        assert_eq!(row.signs, "");
    }

    // ── SheetTable ────────────────────────────────────────────────────────────

    #[test]
    fn test_from_group_two_days() {
        let groups = BalanceAggregator::group(vec![
            make_record("Alice", "02-01-2020", 24, &["+", "-"]),
            make_record("Alice", "01-01-2020", 24, &["+"]),
        ]);
        let table = SheetTable::from_group(1, &groups[0], "sheet_");

        assert_eq!(table.sheet_name, "sheet_1");
        assert_eq!(table.entity_name, "Alice");
        assert_eq!(table.hour_columns, STANDARD_HOUR_COLUMNS);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "01-01-2020");
        assert_eq!(table.rows[1].label, "02-01-2020");
        assert_eq!(table.rows[0].signs, "+");
        assert_eq!(table.rows[1].signs, "+ -");
    }

    #[test]
    fn test_from_group_extended_when_any_day_exceeds_25() {
        let groups = BalanceAggregator::group(vec![
            make_record("Bob", "01-01-2020", 24, &["+"]),
            make_record("Bob", "02-01-2020", 26, &["+"]),
        ]);
        let table = SheetTable::from_group(3, &groups[0], "day_");

        assert_eq!(table.sheet_name, "day_3");
        assert_eq!(table.hour_columns, EXTENDED_HOUR_COLUMNS);
        assert!(table.rows.iter().all(|r| r.cells.len() == EXTENDED_HOUR_COLUMNS));
    }

    #[test]
    fn test_column_labels() {
        let groups = BalanceAggregator::group(vec![make_record("A", "01-01-2020", 24, &["+"])]);
        let labels = SheetTable::from_group(1, &groups[0], "sheet_").column_labels();
        assert_eq!(labels.len(), 26);
        assert_eq!(labels[0], "1");
        assert_eq!(labels[24], "25");
        assert_eq!(labels[25], "sign");
    }
}
