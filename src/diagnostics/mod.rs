//! Diagnostics side-channel for pantry
//!
//! Validation failures and backend events are reported through an explicitly
//! constructed [`Diagnostics`] service rather than a process-wide logger.
//! Each service carries its own level and category filter, emits `tracing`
//! events, and can append what it reports to a JSON-lines journal.
//!
//! # Example
//!
//! ```rust,ignore
//! use pantry::diagnostics::{Diagnostics, DiagnosticsFilter, LogCategory, LogLevel};
//!
//! let diagnostics = Diagnostics::new(DiagnosticsFilter::new(LogLevel::Warn, [LogCategory::Barcode]));
//! diagnostics.report(LogLevel::Error, LogCategory::Barcode, "Code-barres vide");
//! ```

mod entry;
mod journal;

pub use entry::{DiagnosticEntry, LogCategory, LogLevel};
pub use journal::DiagnosticJournal;

use std::collections::HashSet;

/// Level and category filter applied before anything is reported
#[derive(Debug, Clone)]
pub struct DiagnosticsFilter {
    min_level: LogLevel,
    /// Empty means every category
    categories: HashSet<LogCategory>,
}

impl DiagnosticsFilter {
    pub fn new(min_level: LogLevel, categories: impl IntoIterator<Item = LogCategory>) -> Self {
        Self {
            min_level,
            categories: categories.into_iter().collect(),
        }
    }

    /// Filter accepting every level and category
    pub fn all() -> Self {
        Self::new(LogLevel::Debug, [])
    }

    pub fn allows(&self, level: LogLevel, category: LogCategory) -> bool {
        level >= self.min_level
            && (self.categories.is_empty() || self.categories.contains(&category))
    }
}

impl Default for DiagnosticsFilter {
    fn default() -> Self {
        Self::new(LogLevel::Warn, [])
    }
}

/// Injected logging service
#[derive(Debug, Clone)]
pub struct Diagnostics {
    filter: Option<DiagnosticsFilter>,
    journal: Option<DiagnosticJournal>,
}

impl Diagnostics {
    /// Create a service that emits `tracing` events only
    pub fn new(filter: DiagnosticsFilter) -> Self {
        Self {
            filter: Some(filter),
            journal: None,
        }
    }

    /// A service that discards everything
    pub fn disabled() -> Self {
        Self {
            filter: None,
            journal: None,
        }
    }

    /// Also append reported events to a journal
    pub fn with_journal(mut self, journal: DiagnosticJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn journal(&self) -> Option<&DiagnosticJournal> {
        self.journal.as_ref()
    }

    pub fn is_enabled(&self, level: LogLevel, category: LogCategory) -> bool {
        self.filter
            .as_ref()
            .is_some_and(|f| f.allows(level, category))
    }

    /// Report one event; filtered events are dropped silently
    pub fn report(&self, level: LogLevel, category: LogCategory, message: impl AsRef<str>) {
        if !self.is_enabled(level, category) {
            return;
        }

        let message = message.as_ref();
        let category_name = category.as_str();
        match level {
            LogLevel::Debug => tracing::debug!(category = category_name, "{}", message),
            LogLevel::Info => tracing::info!(category = category_name, "{}", message),
            LogLevel::Warn => tracing::warn!(category = category_name, "{}", message),
            LogLevel::Error => tracing::error!(category = category_name, "{}", message),
        }

        if let Some(journal) = &self.journal {
            let entry = DiagnosticEntry::new(level, category, message);
            // The journal is advisory; a write failure must not fail the caller.
            if let Err(e) = journal.append(&entry) {
                tracing::warn!("Failed to append to diagnostics journal: {}", e);
            }
        }
    }

    pub fn warn(&self, category: LogCategory, message: impl AsRef<str>) {
        self.report(LogLevel::Warn, category, message);
    }

    pub fn error(&self, category: LogCategory, message: impl AsRef<str>) {
        self.report(LogLevel::Error, category, message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticsFilter::default())
    }
}
