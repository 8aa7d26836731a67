//! Validation outcome types
//!
//! Errors invalidate a candidate value; warnings are advisory and never gate
//! persistence. Messages are the French strings shown at the point of entry.

use std::fmt;

use crate::error::PantryError;

use super::rules::VALID_UNITS;

/// A rule the candidate value violates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NotANumber { context: String },
    Negative { context: String },
    Empty { context: String },
    TooShort { context: String, min: usize },
    TooLong { context: String, max: usize, actual: usize },
    ForbiddenCharacters { context: String },
    Unrecognized { value: String },
    NonNumeric,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber { context } => write!(f, "{} doit être un nombre valide", context),
            Self::Negative { context } => write!(f, "{} ne peut pas être négative", context),
            Self::Empty { context } => write!(f, "{} ne peut pas être vide", context),
            Self::TooShort { context, min } => {
                write!(f, "{} doit contenir au moins {} caractères", context, min)
            }
            Self::TooLong {
                context,
                max,
                actual,
            } => write!(
                f,
                "{} ne peut pas dépasser {} caractères ({} actuellement)",
                context, max, actual
            ),
            Self::ForbiddenCharacters { context } => write!(
                f,
                "{} contient des caractères interdits (< > \" ' & {{ }})",
                context
            ),
            Self::Unrecognized { value } => write!(
                f,
                "Unité \"{}\" non reconnue. Unités valides : {}",
                value,
                VALID_UNITS.join(", ")
            ),
            Self::NonNumeric => write!(f, "Le code-barres ne doit contenir que des chiffres"),
        }
    }
}

/// An advisory condition on an otherwise acceptable value
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    Zero { context: String },
    Magnitude { context: String, value: f64 },
    Precision { context: String },
    NumericOnly { context: String },
    UnusualLength { length: usize },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero { context } => write!(f, "{} est égale à 0", context),
            Self::Magnitude { context, value } => {
                write!(f, "{} semble très élevée ({})", context, value)
            }
            Self::Precision { context } => {
                write!(f, "{} a plus de 3 décimales, elle sera arrondie", context)
            }
            Self::NumericOnly { context } => {
                write!(f, "{} ne contient que des chiffres", context)
            }
            Self::UnusualLength { length } => write!(
                f,
                "Longueur de code-barres inhabituelle : {} caractères (attendu 8, 12, 13 ou 14)",
                length
            ),
        }
    }
}

/// Outcome of checking one candidate value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if and only if there are no errors
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Append another result's errors and warnings after this one's
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Turn a failed result into a `PantryError::Validation`, keeping warnings
    /// of a successful one
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, PantryError> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(PantryError::Validation(self.error_messages().join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResult::new();
        assert!(result.is_valid());
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut result = ValidationResult::new();
        result.push_warning(ValidationWarning::Zero {
            context: "La quantité".into(),
        });
        assert!(result.is_valid());
        assert_eq!(result.warning_messages(), vec!["La quantité est égale à 0"]);
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = ValidationResult::new();
        first.push_error(ValidationError::Empty {
            context: "Le nom".into(),
        });
        let mut second = ValidationResult::new();
        second.push_error(ValidationError::NonNumeric);

        first.merge(second);
        assert_eq!(first.errors.len(), 2);
        assert_eq!(first.errors[1], ValidationError::NonNumeric);
    }

    #[test]
    fn test_into_result() {
        let mut result = ValidationResult::new();
        result.push_error(ValidationError::Negative {
            context: "La quantité".into(),
        });
        let err = result.into_result().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("négative"));
    }

    #[test]
    fn test_unrecognized_lists_units() {
        let message = ValidationError::Unrecognized { value: "G".into() }.to_string();
        assert!(message.contains("\"G\""));
        assert!(message.contains("g, kg, ml, cl, L, càs, càc, pièce, tranche, pot, gousse, pincée"));
    }
}
