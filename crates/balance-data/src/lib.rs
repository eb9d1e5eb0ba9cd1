//! Data ingestion layer for the balance report tool.
//!
//! Responsible for discovering and parsing balance files, grouping the
//! parsed days by entity, checking each group for consistency, and running
//! the top-level load pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use balance_core as core;
