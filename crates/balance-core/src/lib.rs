//! Shared building blocks for the balance report tool.
//!
//! Holds the typed data model for parsed balance files, the date codec used
//! by the file format, the workspace-wide error type, command-line settings
//! and the notification sink used to surface non-fatal warnings.

pub mod dates;
pub mod error;
pub mod models;
pub mod notifications;
pub mod settings;

pub use error::{BalanceError, Result};
pub use models::DailyRecord;
