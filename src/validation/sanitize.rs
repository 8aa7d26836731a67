//! Sanitizers turning untrusted input into a safe canonical value
//!
//! These never fail; they always return a best-effort value.

use super::input::{IngredientDraft, QuantityInput};
use super::rules::{FORBIDDEN_CHARS, NAME_MAX_LEN, QUANTITY_MAX_DECIMALS};

const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0;

/// Parse a quantity, clamp unparseable or negative input to 0, and round
/// half-up to 3 decimals
pub fn sanitize_quantity(value: &QuantityInput) -> f64 {
    let number = match value.parse() {
        Some(n) if n >= 0.0 => n,
        _ => return 0.0,
    };

    let factor = 10f64.powi(QUANTITY_MAX_DECIMALS as i32);
    let scaled = number * factor;
    // From 2^52 up, the scaled value has no fraction left (or overflowed)
    if scaled >= EXACT_INTEGER_LIMIT {
        return number;
    }
    let rounded = scaled.round() / factor;
    // Normalizes -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Strip forbidden characters, trim, and cap at 100 characters
///
/// Truncation counts `char`s, so a multi-byte character is either kept whole
/// or dropped. Whitespace exposed by stripping or truncation is trimmed, which
/// keeps the function idempotent.
pub fn sanitize_name(value: Option<&str>) -> String {
    let stripped: String = value
        .unwrap_or_default()
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();

    let truncated: String = stripped.trim().chars().take(NAME_MAX_LEN).collect();
    truncated.trim_end().to_string()
}

/// Sanitize every present field of an ingredient
pub fn sanitize_ingredient(draft: &IngredientDraft) -> IngredientDraft {
    IngredientDraft {
        name: draft.name.as_deref().map(|n| sanitize_name(Some(n))),
        quantity: draft
            .quantity
            .as_ref()
            .map(|q| QuantityInput::Number(sanitize_quantity(q))),
        unit: draft.unit.as_deref().map(|u| u.trim().to_string()),
    }
}
