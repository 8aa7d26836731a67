//! Domain rules for quantities, names, units and barcodes
//!
//! Every function here is pure: the same input always yields the same
//! result. Reporting to diagnostics happens in [`super::Validator`].

use super::input::{IngredientDraft, QuantityInput};
use super::result::{ValidationError, ValidationResult, ValidationWarning};

/// Recognized measurement units (case-sensitive)
pub const VALID_UNITS: [&str; 12] = [
    "g", "kg", "ml", "cl", "L", "càs", "càc", "pièce", "tranche", "pot", "gousse", "pincée",
];

/// Characters never allowed in a name
pub const FORBIDDEN_CHARS: [char; 7] = ['<', '>', '"', '\'', '&', '{', '}'];

/// Barcode lengths (EAN-8, UPC-A, EAN-13, GTIN-14)
pub const STANDARD_BARCODE_LENGTHS: [usize; 4] = [8, 12, 13, 14];

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;
pub const QUANTITY_WARN_ABOVE: f64 = 10_000.0;
pub const QUANTITY_MAX_DECIMALS: usize = 3;

const DEFAULT_QUANTITY_CONTEXT: &str = "La quantité";
const DEFAULT_NAME_CONTEXT: &str = "Le nom";

/// Number of digits after the decimal point in the shortest base-10 rendering
pub(crate) fn decimal_digits(value: f64) -> usize {
    let text = value.to_string();
    text.split_once('.').map_or(0, |(_, fraction)| fraction.len())
}

pub(crate) fn contains_forbidden(value: &str) -> bool {
    value.chars().any(|c| FORBIDDEN_CHARS.contains(&c))
}

/// Check a quantity
///
/// Order: parse, negativity, zero, magnitude, precision. Only a parse failure
/// stops evaluation.
pub fn validate_quantity(value: &QuantityInput, context: Option<&str>) -> ValidationResult {
    let context = context.unwrap_or(DEFAULT_QUANTITY_CONTEXT).to_string();
    let mut result = ValidationResult::new();

    let Some(number) = value.parse() else {
        result.push_error(ValidationError::NotANumber { context });
        return result;
    };

    if number < 0.0 {
        result.push_error(ValidationError::Negative {
            context: context.clone(),
        });
    }

    if number == 0.0 {
        result.push_warning(ValidationWarning::Zero {
            context: context.clone(),
        });
    }

    if number > QUANTITY_WARN_ABOVE {
        result.push_warning(ValidationWarning::Magnitude {
            context: context.clone(),
            value: number,
        });
    }

    if decimal_digits(number) > QUANTITY_MAX_DECIMALS {
        result.push_warning(ValidationWarning::Precision { context });
    }

    result
}

/// Check a name; length and forbidden-character checks are independent
pub fn validate_name(value: Option<&str>, context: Option<&str>) -> ValidationResult {
    let context = context.unwrap_or(DEFAULT_NAME_CONTEXT).to_string();
    let mut result = ValidationResult::new();

    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        result.push_error(ValidationError::Empty { context });
        return result;
    }

    let length = trimmed.chars().count();
    if length < NAME_MIN_LEN {
        result.push_error(ValidationError::TooShort {
            context: context.clone(),
            min: NAME_MIN_LEN,
        });
    }
    if length > NAME_MAX_LEN {
        result.push_error(ValidationError::TooLong {
            context: context.clone(),
            max: NAME_MAX_LEN,
            actual: length,
        });
    }

    if contains_forbidden(trimmed) {
        result.push_error(ValidationError::ForbiddenCharacters {
            context: context.clone(),
        });
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        result.push_warning(ValidationWarning::NumericOnly { context });
    }

    result
}

/// Check a unit against the closed vocabulary
pub fn validate_unit(value: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::new();

    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        result.push_error(ValidationError::Empty {
            context: "L'unité".into(),
        });
        return result;
    }

    if !VALID_UNITS.contains(&trimmed) {
        result.push_error(ValidationError::Unrecognized {
            value: trimmed.to_string(),
        });
    }

    result
}

/// Check a barcode; a non-standard length is only a warning
pub fn validate_barcode(value: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::new();

    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        result.push_error(ValidationError::Empty {
            context: "Le code-barres".into(),
        });
        return result;
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        result.push_error(ValidationError::NonNumeric);
        return result;
    }

    let length = trimmed.len();
    if !STANDARD_BARCODE_LENGTHS.contains(&length) {
        result.push_warning(ValidationWarning::UnusualLength { length });
    }

    result
}

/// Check the present fields of an ingredient, in the order name, quantity, unit
pub fn validate_ingredient(draft: &IngredientDraft) -> ValidationResult {
    let mut result = ValidationResult::new();

    if draft.name.is_some() {
        result.merge(validate_name(draft.name.as_deref(), Some("Le nom de l'ingrédient")));
    }
    if let Some(quantity) = &draft.quantity {
        result.merge(validate_quantity(quantity, None));
    }
    if draft.unit.is_some() {
        result.merge(validate_unit(draft.unit.as_deref()));
    }

    result
}
