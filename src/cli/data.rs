//! Data CLI commands
//!
//! Reads and writes logical keys through whichever backend the selector has
//! made active, and manages the cloud connection. `set` stores an opaque
//! payload; `add` is the validated way to put an ingredient into the stock.

use clap::Subcommand;
use serde_json::{json, Value};

use crate::diagnostics::{Diagnostics, LogCategory};
use crate::error::{PantryError, PantryResult};
use crate::keys::LogicalKey;
use crate::selector::BackendSelector;
use crate::validation::{sanitize_ingredient, IngredientDraft, Validator};

/// Data subcommands
#[derive(Subcommand)]
pub enum DataCommands {
    /// Print the value stored under a key (recipes, stock, settings, planning)
    Get {
        /// Logical key
        key: String,
    },
    /// Store a JSON value under a key
    Set {
        /// Logical key
        key: String,
        /// Value as JSON text (e.g. '{"items": []}')
        value: String,
    },
    /// Validate an ingredient and add it to the stock
    Add {
        /// Ingredient name
        name: String,
        /// Quantity (decimal comma accepted)
        #[arg(short, long, allow_hyphen_values = true)]
        quantity: Option<String>,
        /// Unit (g, kg, ml, cl, L, càs, càc, pièce, ...)
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Reconcile the active backend with its storage
    Sync,
    /// Show the active storage mode
    Status,
    /// Store a remote account identity and switch to cloud storage
    Connect {
        /// Remote account identity
        identity: String,
    },
}

/// Handle a data command
pub async fn handle_data_command(
    selector: &mut BackendSelector,
    diagnostics: &Diagnostics,
    cmd: DataCommands,
) -> PantryResult<()> {
    match cmd {
        DataCommands::Get { key } => {
            let key: LogicalKey = key.parse()?;
            let value = selector
                .load(key.as_str())
                .await
                .inspect_err(|e| report_storage_failure(diagnostics, e))?;

            match value {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => println!("No value stored for '{}'", key),
            }
        }
        DataCommands::Set { key, value } => {
            let key: LogicalKey = key.parse()?;
            let value: Value = serde_json::from_str(&value)
                .map_err(|e| PantryError::Json(format!("Value for '{}' is not JSON: {}", key, e)))?;

            selector
                .save(key.as_str(), value)
                .await
                .inspect_err(|e| report_storage_failure(diagnostics, e))?;
            println!("Saved '{}' ({} storage)", key, selector.mode());
        }
        DataCommands::Add {
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

            let warnings = Validator::with_diagnostics(diagnostics)
                .validate_ingredient(&draft)
                .into_result()?;
            for warning in &warnings {
                println!("warning: {}", warning);
            }

            let item = sanitize_ingredient(&draft);
            let key = LogicalKey::Stock.as_str();
            let stock = selector
                .load(key)
                .await
                .inspect_err(|e| report_storage_failure(diagnostics, e))?;
            let stock = append_to_stock(stock, serde_json::to_value(&item)?)?;
            selector
                .save(key, stock)
                .await
                .inspect_err(|e| report_storage_failure(diagnostics, e))?;

            println!(
                "Added '{}' to stock ({} storage)",
                item.name.unwrap_or_default(),
                selector.mode()
            );
        }
        DataCommands::Sync => {
            selector
                .sync()
                .await
                .inspect_err(|e| report_storage_failure(diagnostics, e))?;
            println!("Sync complete ({} storage)", selector.mode());
        }
        DataCommands::Status => {
            println!("Storage mode:     {}", selector.mode());
            println!("Namespace prefix: {}", selector.prefix());
            match selector.identity() {
                Some(identity) => println!("Cloud account:    {}", identity),
                None => println!("Cloud account:    (none)"),
            }
            let records = selector.local_records()?;
            if records.is_empty() {
                println!("Local records:    (none)");
            } else {
                println!("Local records:    {}", records.join(", "));
            }
        }
        DataCommands::Connect { identity } => {
            selector.connect_cloud(&identity)?;
            println!("Connected as '{}'", identity.trim());
            println!("Storage mode is now {}", selector.mode());
        }
    }

    Ok(())
}

/// Append an item to the stored stock
///
/// Accepts a bare array or an object with an `items` array; nothing stored
/// yet starts a new `{"items": [...]}` object.
fn append_to_stock(stock: Option<Value>, item: Value) -> PantryResult<Value> {
    match stock {
        None | Some(Value::Null) => Ok(json!({ "items": [item] })),
        Some(Value::Array(mut items)) => {
            items.push(item);
            Ok(Value::Array(items))
        }
        Some(Value::Object(mut stock)) => {
            match stock.entry("items").or_insert_with(|| json!([])) {
                Value::Array(items) => items.push(item),
                _ => {
                    return Err(PantryError::Validation(
                        "Stored stock has a non-list 'items' field".to_string(),
                    ))
                }
            }
            Ok(Value::Object(stock))
        }
        Some(_) => Err(PantryError::Validation(
            "Stored stock is not a list of items".to_string(),
        )),
    }
}

/// Record a failed backend operation in the storage category
pub(crate) fn report_storage_failure(diagnostics: &Diagnostics, error: &PantryError) {
    diagnostics.error(LogCategory::Storage, error.to_string());
}
