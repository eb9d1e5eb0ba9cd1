//! `.xlsx` output.
//!
//! Each [`SheetTable`] becomes one worksheet laid out like a data-frame
//! dump. Row 0 is the header and column A holds the date labels. The
//! top-left cell holds the entity name. The workbook is assembled in memory
//! and written to disk once, by [`WorkbookExporter::save`].

use std::path::Path;

use balance_core::error::{BalanceError, Result};
use balance_data::aggregator::EntityGroup;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, info};

use crate::table_view::{SheetTable, SIGN_COLUMN};

/// Width of the date-label column, in character units.
const LABEL_COLUMN_WIDTH: f64 = 12.0;

// ── Styles ────────────────────────────────────────────────────────────────────

/// Cell formats shared by every worksheet.
struct SheetStyles {
    header: Format,
}

impl SheetStyles {
    fn new() -> Self {
        Self {
            header: Format::new().set_bold().set_border(FormatBorder::Thin),
        }
    }
}

// ── WorkbookExporter ──────────────────────────────────────────────────────────

/// Builds a workbook sheet by sheet and saves it once.
pub struct WorkbookExporter {
    workbook: Workbook,
    styles: SheetStyles,
    sheet_prefix: String,
    sheets: usize,
}

impl WorkbookExporter {
    pub fn new(sheet_prefix: impl Into<String>) -> Self {
        Self {
            workbook: Workbook::new(),
            styles: SheetStyles::new(),
            sheet_prefix: sheet_prefix.into(),
            sheets: 0,
        }
    }

    /// Number of worksheets added so far.
    pub fn sheet_count(&self) -> usize {
        self.sheets
    }

    /// Add the next entity group as a worksheet.
    pub fn add_group(&mut self, group: &EntityGroup) -> Result<()> {
        let table = SheetTable::from_group(self.sheets + 1, group, &self.sheet_prefix);
        self.add_table(&table)
    }

    /// Add a prepared table as a worksheet.
    pub fn add_table(&mut self, table: &SheetTable) -> Result<()> {
        let worksheet = self.workbook.add_worksheet();
        write_table(worksheet, table, &self.styles)
            .map_err(|e| workbook_error(&table.sheet_name, e))?;
        self.sheets += 1;
        debug!(
            "Sheet {} ({:?}): {} rows, {} hour columns",
            table.sheet_name,
            table.entity_name,
            table.rows.len(),
            table.hour_columns
        );
        Ok(())
    }

    /// Write the workbook to `path`.
    ///
    /// A workbook needs at least one worksheet, so an empty export gets a
    /// single blank sheet.
    pub fn save(mut self, path: &Path) -> Result<()> {
        if self.sheets == 0 {
            let name = format!("{}1", self.sheet_prefix);
            self.workbook
                .add_worksheet()
                .set_name(name.as_str())
                .map_err(|e| workbook_error(&name, e))?;
        }
        self.workbook
            .save(path)
            .map_err(|e| BalanceError::Workbook(format!("saving {}: {}", path.display(), e)))?;
        info!("Wrote {} sheets to {}", self.sheets, path.display());
        Ok(())
    }
}

/// Write every group, in order, to a new workbook at `path`.
///
/// Returns the number of sheets written. Any failure aborts the export.
pub fn export_workbook(groups: &[EntityGroup], path: &Path, sheet_prefix: &str) -> Result<usize> {
    let mut exporter = WorkbookExporter::new(sheet_prefix);
    for group in groups {
        exporter.add_group(group)?;
    }
    let sheets = exporter.sheet_count();
    exporter.save(path)?;
    Ok(sheets)
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn write_table(
    worksheet: &mut Worksheet,
    table: &SheetTable,
    styles: &SheetStyles,
) -> std::result::Result<(), XlsxError> {
    worksheet.set_name(table.sheet_name.as_str())?;
    worksheet.set_column_width(0, LABEL_COLUMN_WIDTH)?;

    // Header row.
    let sign_col = column(table.hour_columns + 1);
    worksheet.write_string_with_format(0, 0, table.entity_name.as_str(), &styles.header)?;
    for hour in 1..=table.hour_columns {
        worksheet.write_number_with_format(0, column(hour), hour as f64, &styles.header)?;
    }
    worksheet.write_string_with_format(0, sign_col, SIGN_COLUMN, &styles.header)?;

    // One row per day.
    for (idx, row) in table.rows.iter().enumerate() {
        let r = (idx + 1) as u32;
        worksheet.write_string_with_format(r, 0, row.label.as_str(), &styles.header)?;
        for (offset, cell) in row.cells.iter().enumerate() {
            if let Some(value) = cell {
                write_reading(worksheet, r, column(offset + 1), *value)?;
            }
        }
        if !row.signs.is_empty() {
            worksheet.write_string(r, sign_col, row.signs.as_str())?;
        }
    }

    Ok(())
}

/// Write a reading; NaN stays blank and infinities become text.
fn write_reading(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
) -> std::result::Result<(), XlsxError> {
    if value.is_nan() {
        return Ok(());
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        worksheet.write_string(row, col, text)?;
    } else {
        worksheet.write_number(row, col, value)?;
    }
    Ok(())
}

// Hour columns are capped at 100, far below the workbook column limit.
fn column(index: usize) -> u16 {
    index as u16
}

fn workbook_error(sheet: &str, e: XlsxError) -> BalanceError {
    BalanceError::Workbook(format!("sheet {}: {}", sheet, e))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
