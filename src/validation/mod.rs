//! Validation and sanitization pipeline
//!
//! Data is checked at the point of entry, before any persistence attempt.
//! The free functions in [`rules`] and [`sanitize`] are pure; [`Validator`]
//! runs the same rules and reports failures to an injected [`Diagnostics`]
//! service, tagged by domain category.
//!
//! # Example
//!
//! ```rust,ignore
//! use pantry::validation::{QuantityInput, Validator};
//!
//! let validator = Validator::with_diagnostics(&diagnostics);
//! let result = validator.validate_quantity(&QuantityInput::from("250"), None);
//! assert!(result.is_valid());
//! ```

pub mod input;
pub mod result;
pub mod rules;
pub mod sanitize;

pub use input::{IngredientDraft, QuantityInput};
pub use result::{ValidationError, ValidationResult, ValidationWarning};
pub use rules::{
    validate_barcode, validate_ingredient, validate_name, validate_quantity, validate_unit,
    VALID_UNITS,
};
pub use sanitize::{sanitize_ingredient, sanitize_name, sanitize_quantity};

use crate::diagnostics::{Diagnostics, LogCategory};

/// Runs validation rules and reports their outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator<'a> {
    diagnostics: Option<&'a Diagnostics>,
}

impl<'a> Validator<'a> {
    /// A validator that reports nothing
    pub fn new() -> Self {
        Self { diagnostics: None }
    }

    pub fn with_diagnostics(diagnostics: &'a Diagnostics) -> Self {
        Self {
            diagnostics: Some(diagnostics),
        }
    }

    pub fn validate_quantity(&self, value: &QuantityInput, context: Option<&str>) -> ValidationResult {
        self.reported(LogCategory::General, validate_quantity(value, context))
    }

    pub fn validate_name(&self, value: Option<&str>, context: Option<&str>) -> ValidationResult {
        self.reported(LogCategory::General, validate_name(value, context))
    }

    pub fn validate_unit(&self, value: Option<&str>) -> ValidationResult {
        self.reported(LogCategory::Unit, validate_unit(value))
    }

    pub fn validate_barcode(&self, value: Option<&str>) -> ValidationResult {
        self.reported(LogCategory::Barcode, validate_barcode(value))
    }

    pub fn validate_ingredient(&self, draft: &IngredientDraft) -> ValidationResult {
        self.reported(LogCategory::General, validate_ingredient(draft))
    }

    fn reported(&self, category: LogCategory, result: ValidationResult) -> ValidationResult {
        if let Some(diagnostics) = self.diagnostics {
            for error in &result.errors {
                diagnostics.error(category, error.to_string());
            }
            for warning in &result.warnings {
                diagnostics.warn(category, warning.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticJournal, DiagnosticsFilter, LogLevel};
    use tempfile::TempDir;

    fn journaled(filter: DiagnosticsFilter) -> (Diagnostics, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let journal = DiagnosticJournal::new(temp_dir.path().join("diagnostics.log"));
        (Diagnostics::new(filter).with_journal(journal), temp_dir)
    }

    #[test]
    fn test_failures_reported_by_category() {
        let (diagnostics, _temp) = journaled(DiagnosticsFilter::all());
        let validator = Validator::with_diagnostics(&diagnostics);

        validator.validate_unit(Some("tasse"));
        validator.validate_barcode(Some("12ab"));

        let entries = diagnostics.journal().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, LogCategory::Unit);
        assert_eq!(entries[0].level, LogLevel::Error);
        assert_eq!(entries[1].category, LogCategory::Barcode);
    }

    #[test]
    fn test_valid_input_reports_nothing() {
        let (diagnostics, _temp) = journaled(DiagnosticsFilter::all());
        let validator = Validator::with_diagnostics(&diagnostics);

        let result = validator.validate_name(Some("Tomates"), None);
        assert!(result.is_valid());
        assert_eq!(diagnostics.journal().unwrap().entry_count().unwrap(), 0);
    }

    #[test]
    fn test_category_filter_applies() {
        let (diagnostics, _temp) =
            journaled(DiagnosticsFilter::new(LogLevel::Debug, [LogCategory::Barcode]));
        let validator = Validator::with_diagnostics(&diagnostics);

        validator.validate_quantity(&QuantityInput::from(-1), None);
        validator.validate_barcode(Some("12345"));

        let entries = diagnostics.journal().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, LogLevel::Warn);
        assert!(entries[0].message.contains("5 caractères"));
    }

    #[test]
    fn test_silent_validator_matches_rules() {
        let validator = Validator::new();
        assert_eq!(
            validator.validate_unit(Some("G")),
            validate_unit(Some("G"))
        );
    }
}
