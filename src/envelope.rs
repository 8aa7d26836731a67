//! Envelope codec
//!
//! Every persisted record is wrapped with its creation time, the schema
//! version of the envelope shape, and the backend that produced it:
//!
//! ```json
//! { "data": <any>, "timestamp": 1700000000000, "version": "1.0", "source": "local" }
//! ```
//!
//! Envelopes are never mutated in place; every save writes a fresh one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PantryError, PantryResult};

/// Envelope version written by the local backend
pub const LOCAL_SCHEMA_VERSION: &str = "1.0";

/// Envelope version written by the remote backend
pub const REMOTE_SCHEMA_VERSION: &str = "2.0";

/// Backend that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Local,
    Cloud,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Local => write!(f, "local"),
            Origin::Cloud => write!(f, "cloud"),
        }
    }
}

/// A persisted value with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,

    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub timestamp: i64,

    /// Schema version of the envelope shape
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub source: Origin,
}

impl Envelope {
    /// Wrap a value, stamped with the current time
    pub fn wrap(data: Value, origin: Origin, schema_version: &str) -> Self {
        Self {
            data,
            timestamp: Utc::now().timestamp_millis(),
            version: schema_version.to_string(),
            source: origin,
        }
    }

    /// Decode an envelope from a structured value
    ///
    /// Fails with `MalformedEnvelope` if the value is not an object, has no
    /// `data` field, or carries metadata of the wrong type.
    pub fn from_value(value: Value) -> PantryResult<Self> {
        let Value::Object(map) = &value else {
            return Err(PantryError::MalformedEnvelope(format!(
                "expected an object, found {}",
                json_type_name(&value)
            )));
        };

        if !map.contains_key("data") {
            return Err(PantryError::MalformedEnvelope(
                "missing `data` field".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| PantryError::MalformedEnvelope(e.to_string()))
    }

    /// Decode an envelope from its JSON text
    pub fn from_json(text: &str) -> PantryResult<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PantryError::MalformedEnvelope(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Encode as JSON text
    pub fn to_json(&self) -> PantryResult<String> {
        serde_json::to_string(self).map_err(PantryError::from)
    }

    /// Consume the envelope, returning only the payload
    pub fn into_data(self) -> Value {
        self.data
    }
}

/// Unwrap stored JSON text into its payload
pub fn unwrap(text: &str) -> PantryResult<Value> {
    Envelope::from_json(text).map(Envelope::into_data)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
