//! Validation and sanitization CLI commands
//!
//! Runs the entry-point checks on a single value without persisting
//! anything. Errors make the command fail; warnings are printed only.

use clap::Subcommand;

use crate::diagnostics::Diagnostics;
use crate::error::PantryResult;
use crate::validation::{
    sanitize_name, sanitize_quantity, IngredientDraft, QuantityInput, ValidationResult, Validator,
};

/// Validate subcommands
#[derive(Subcommand)]
pub enum ValidateCommands {
    /// Check a quantity (number, decimal comma accepted)
    Quantity {
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Label used in messages (e.g. "La quantité de farine")
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Check a recipe or ingredient name
    Name {
        value: String,
        /// Label used in messages
        #[arg(short, long)]
        context: Option<String>,
    },
    /// Check a unit against the recognized list
    Unit { value: String },
    /// Check a product barcode
    Barcode { value: String },
    /// Check an ingredient (name, optional quantity and unit)
    Ingredient {
        name: String,
        #[arg(short, long)]
        quantity: Option<String>,
        #[arg(short, long)]
        unit: Option<String>,
    },
}

/// Sanitize subcommands
#[derive(Subcommand)]
pub enum SanitizeCommands {
    /// Print the stored form of a quantity
    Quantity {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print the stored form of a name
    Name { value: String },
}

/// Handle a validate command
pub fn handle_validate_command(diagnostics: &Diagnostics, cmd: ValidateCommands) -> PantryResult<()> {
    let validator = Validator::with_diagnostics(diagnostics);

    let result = match cmd {
        ValidateCommands::Quantity { value, context } => {
            validator.validate_quantity(&QuantityInput::from(value), context.as_deref())
        }
        ValidateCommands::Name { value, context } => {
            validator.validate_name(Some(value.as_str()), context.as_deref())
        }
        ValidateCommands::Unit { value } => validator.validate_unit(Some(value.as_str())),
        ValidateCommands::Barcode { value } => validator.validate_barcode(Some(value.as_str())),
        ValidateCommands::Ingredient {
            name,
            quantity,
            unit,
        } => {
            let mut draft = IngredientDraft::new(name);
            if let Some(quantity) = quantity {
                draft = draft.with_quantity(quantity);
            }
            if let Some(unit) = unit {
                draft = draft.with_unit(unit);
            }
            validator.validate_ingredient(&draft)
        }
    };

    print_outcome(result)
}

fn print_outcome(result: ValidationResult) -> PantryResult<()> {
    for warning in result.warning_messages() {
        println!("warning: {}", warning);
    }

    result.into_result()?;
    println!("Valid");
    Ok(())
}

/// Handle a sanitize command
pub fn handle_sanitize_command(cmd: SanitizeCommands) -> PantryResult<()> {
    match cmd {
        SanitizeCommands::Quantity { value } => {
            println!("{}", sanitize_quantity(&QuantityInput::from(value)));
        }
        SanitizeCommands::Name { value } => {
            println!("{}", sanitize_name(Some(value.as_str())));
        }
    }
    Ok(())
}
