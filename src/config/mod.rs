//! Configuration module for pantry
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (namespace prefix, remote endpoint, logging)

pub mod paths;
pub mod settings;

pub use paths::PantryPaths;
pub use settings::Settings;
