//! Append-only diagnostics journal
//!
//! Each reported event is written as a single JSON line and flushed
//! immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{PantryError, PantryResult};

use super::entry::DiagnosticEntry;

/// Handles writing diagnostic entries to the journal file (JSONL)
#[derive(Debug, Clone)]
pub struct DiagnosticJournal {
    log_path: PathBuf,
}

impl DiagnosticJournal {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry as one JSON line
    pub fn append(&self, entry: &DiagnosticEntry) -> PantryResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| PantryError::Io(format!("Failed to open diagnostics journal: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| PantryError::Json(format!("Failed to serialize diagnostic: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| PantryError::Io(format!("Failed to write diagnostic: {}", e)))?;

        file.flush()
            .map_err(|e| PantryError::Io(format!("Failed to flush diagnostics journal: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> PantryResult<Vec<DiagnosticEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| PantryError::Io(format!("Failed to open diagnostics journal: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                PantryError::Io(format!(
                    "Failed to read diagnostics journal line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DiagnosticEntry = serde_json::from_str(&line).map_err(|e| {
                PantryError::Json(format!(
                    "Failed to parse diagnostic at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> PantryResult<Vec<DiagnosticEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Number of non-empty lines in the journal
    pub fn entry_count(&self) -> PantryResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| PantryError::Io(format!("Failed to open diagnostics journal: {}", e)))?;

        let count = BufReader::new(file)
            .lines()
            .filter_map(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
