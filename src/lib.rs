//! Pantry - persistence layer for a recipe and pantry-management application
//!
//! This library stores the application's top-level data categories (recipes,
//! stock, settings, planning) through one save/load contract, either on the
//! local machine or on a remote data service, and checks user input before
//! anything is persisted.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `diagnostics`: Injected logging service and its journal
//! - `validation`: Validation and sanitization of user input
//! - `envelope`: The metadata wrapper around every persisted value
//! - `keys`: Logical keys and record namespacing
//! - `storage`: Local and remote backends behind one contract
//! - `selector`: Choice of the active backend
//! - `snapshot`: Export/import of the whole state as a token
//! - `cli`: Command handlers for the `pantry` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use pantry::config::{PantryPaths, Settings};
//!
//! let paths = PantryPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod envelope;
pub mod error;
pub mod keys;
pub mod selector;
pub mod snapshot;
pub mod storage;
pub mod validation;

pub use error::{PantryError, PantryResult};
