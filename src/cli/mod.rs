//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the storage and validation layers.

pub mod check;
pub mod data;
pub mod log;
pub mod transfer;

pub use check::{handle_sanitize_command, handle_validate_command, SanitizeCommands, ValidateCommands};
pub use data::{handle_data_command, DataCommands};
pub use log::handle_log_command;
pub use transfer::{handle_export, handle_import, SnapshotFormat};
