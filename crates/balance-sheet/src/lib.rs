//! Spreadsheet export layer for the balance report tool.
//!
//! Turns each entity group into a [`table_view::SheetTable`] (one row per
//! day, one column per hour plus a sign summary) and writes the tables into
//! an `.xlsx` workbook, one worksheet per entity.

pub mod table_view;
pub mod workbook;

pub use balance_core as core;
