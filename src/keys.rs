//! Logical keys: the closed set of top-level data categories

use std::fmt;
use std::str::FromStr;

use crate::error::PantryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalKey {
    Recipes,
    Stock,
    Settings,
    Planning,
}

impl LogicalKey {
    /// Every logical key, in export order
    pub const ALL: [LogicalKey; 4] = [
        LogicalKey::Recipes,
        LogicalKey::Stock,
        LogicalKey::Settings,
        LogicalKey::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalKey::Recipes => "recipes",
            LogicalKey::Stock => "stock",
            LogicalKey::Settings => "settings",
            LogicalKey::Planning => "planning",
        }
    }
}

impl fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalKey {
    type Err = PantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| PantryError::UnknownKey(s.to_string()))
    }
}

/// Namespaced record key: `<prefix>_<key>`
pub fn record_key(prefix: &str, key: &str) -> String {
    format!("{}_{}", prefix, key)
}
