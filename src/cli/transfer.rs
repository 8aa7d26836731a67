//! Export and import CLI commands

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::diagnostics::Diagnostics;
use crate::error::{PantryError, PantryResult};
use crate::selector::BackendSelector;
use crate::snapshot::{self, Snapshot};

use super::data::report_storage_failure;

/// Snapshot output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    /// Base64 token, accepted by `pantry import`
    Token,
    /// Pretty-printed JSON
    Json,
    /// YAML, human-readable
    Yaml,
}

/// Handle `pantry export`
pub async fn handle_export(
    selector: &BackendSelector,
    diagnostics: &Diagnostics,
    output: Option<PathBuf>,
    format: SnapshotFormat,
) -> PantryResult<()> {
    let rendered = match format {
        SnapshotFormat::Token => snapshot::export_snapshot(selector).await,
        SnapshotFormat::Json => Snapshot::capture(selector.backend())
            .await
            .and_then(|s| s.to_pretty_json()),
        SnapshotFormat::Yaml => Snapshot::capture(selector.backend())
            .await
            .and_then(|s| s.to_yaml()),
    }
    .inspect_err(|e| report_storage_failure(diagnostics, e))?;

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered).map_err(|e| {
                PantryError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            println!("Snapshot exported to: {}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }

    Ok(())
}

/// Handle `pantry import`
pub async fn handle_import(
    selector: &BackendSelector,
    diagnostics: &Diagnostics,
    token: Option<String>,
    file: Option<PathBuf>,
    dry_run: bool,
) -> PantryResult<()> {
    let token = match (token, file) {
        (Some(token), _) => token,
        (None, Some(path)) => read_token_file(&path)?,
        (None, None) => {
            return Err(PantryError::MalformedToken(
                "provide a token or --file".to_string(),
            ))
        }
    };

    if dry_run {
        let snapshot = snapshot::decode_snapshot(&token)?;
        let keys: Vec<&str> = snapshot.data_entries().map(|(k, _)| k.as_str()).collect();

        println!("Snapshot version: {}", display_or_unknown(&snapshot.version_text()));
        println!("Exported at:      {}", display_or_unknown(&snapshot.export_date_text()));
        if keys.is_empty() {
            println!("Would restore:    nothing");
        } else {
            println!("Would restore:    {}", keys.join(", "));
        }
        println!();
        println!("Dry run: nothing was written.");
        return Ok(());
    }

    let report = snapshot::import_snapshot(selector, &token)
        .await
        .inspect_err(|e| {
            if !e.is_format() {
                report_storage_failure(diagnostics, e)
            }
        })?;

    println!("{}", report.summary());
    println!("Import complete ({} storage)", selector.mode());
    Ok(())
}

fn read_token_file(path: &Path) -> PantryResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| PantryError::Io(format!("Failed to read {}: {}", path.display(), e)))
}

fn display_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "(unknown)"
    } else {
        value
    }
}
