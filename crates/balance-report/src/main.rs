mod bootstrap;
mod summary;

use anyhow::{Context, Result};
use balance_core::notifications::{CollectingNotifier, Notifier, TeeNotifier, TracingNotifier};
use balance_core::settings::Settings;
use balance_data::analysis::load_balances;
use balance_sheet::workbook::export_workbook;

use crate::summary::RunSummary;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Balance report v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Settings: {:?}", settings);

    let summary = run(&settings, TracingNotifier)?;

    if !summary.warnings.is_empty() {
        eprintln!(
            "{} warning(s); see the log above for the files and balances to verify",
            summary.warnings.len()
        );
    }
    println!(
        "Wrote {} sheet(s) from {} of {} file(s) to {}",
        summary.sheets, summary.files_parsed, summary.files_found, summary.output
    );

    Ok(())
}

/// Load every balance file matched by the settings and export the workbook.
///
/// Warnings go to `notifier` as they happen and are also kept for the
/// returned summary. Only an invalid configuration, an invalid pattern or a
/// failed export is an error.
fn run<N: Notifier>(settings: &Settings, notifier: N) -> Result<RunSummary> {
    settings.validate()?;

    let mut notifier = TeeNotifier::new(notifier, CollectingNotifier::new());

    let load = load_balances(&settings.input, &mut notifier)
        .with_context(|| format!("resolving input {:?}", settings.input))?;
    if load.metadata.files_found == 0 {
        tracing::warn!("No balance files matched {:?}", settings.input);
    }

    let sheets = export_workbook(&load.groups, &settings.out, &settings.sheet_prefix)
        .with_context(|| format!("exporting workbook to {}", settings.out.display()))?;

    let warnings = notifier.second.into_warnings();
    let summary = RunSummary::new(settings, &load.metadata, sheets, &warnings);

    if let Some(path) = &settings.summary {
        summary
            .save_to(path)
            .with_context(|| format!("writing run summary to {}", path.display()))?;
        tracing::info!("Run summary written to {}", path.display());
    }

    Ok(summary)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
