//! Export/import of the whole application state
//!
//! A snapshot bundles the current value of every logical key with two
//! reserved metadata keys, `exportDate` and `version`. Its token is the
//! base64 text of the snapshot's JSON:
//!
//! ```json
//! { "recipes": ..., "stock": ..., "settings": ..., "planning": ...,
//!   "exportDate": "2025-01-31T08:15:00.000Z", "version": "1.0" }
//! ```
//!
//! The token is obscured, not protected: anyone holding it can read it.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{PantryError, PantryResult};
use crate::keys::LogicalKey;
use crate::selector::BackendSelector;
use crate::storage::StorageBackend;

/// Version tag written into every snapshot
pub const EXPORT_VERSION: &str = "1.0";

/// Metadata keys that are never written back as data
pub const RESERVED_KEYS: [&str; 2] = ["exportDate", "version"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Data keys and their unwrapped values
    #[serde(flatten)]
    pub data: Map<String, Value>,

    /// ISO-8601 instant of the export; kept as raw JSON since it is never restored
    #[serde(rename = "exportDate", default)]
    pub export_date: Value,

    #[serde(default)]
    pub version: Value,
}

impl Snapshot {
    /// Load every logical key through a backend; absent keys become `null`
    pub async fn capture(backend: &dyn StorageBackend) -> PantryResult<Self> {
        let mut data = Map::new();
        for key in LogicalKey::ALL {
            let value = backend.load(key.as_str()).await?.unwrap_or(Value::Null);
            data.insert(key.as_str().to_string(), value);
        }

        Ok(Self {
            data,
            export_date: Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            version: Value::from(EXPORT_VERSION),
        })
    }

    pub fn export_date_text(&self) -> String {
        metadata_text(&self.export_date)
    }

    pub fn version_text(&self) -> String {
        metadata_text(&self.version)
    }

    /// Data entries to restore, reserved keys excluded
    pub fn data_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
    }

    /// Encode as a base64 token
    pub fn encode(&self) -> PantryResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json.as_bytes()))
    }

    /// Decode a token; any decoding or parsing failure is `MalformedToken`
    pub fn decode(token: &str) -> PantryResult<Self> {
        let bytes = STANDARD
            .decode(token.trim())
            .map_err(|e| PantryError::MalformedToken(format!("invalid base64: {}", e)))?;

        let text = String::from_utf8(bytes)
            .map_err(|e| PantryError::MalformedToken(format!("invalid UTF-8: {}", e)))?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| PantryError::MalformedToken(format!("invalid JSON: {}", e)))?;

        if !value.is_object() {
            return Err(PantryError::MalformedToken(
                "snapshot must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value).map_err(|e| PantryError::MalformedToken(e.to_string()))
    }

    /// Human-readable YAML rendering
    pub fn to_yaml(&self) -> PantryResult<String> {
        serde_yaml::to_string(self).map_err(|e| PantryError::Json(format!("YAML error: {}", e)))
    }

    /// Pretty JSON rendering
    pub fn to_pretty_json(&self) -> PantryResult<String> {
        serde_json::to_string_pretty(self).map_err(PantryError::from)
    }
}

fn metadata_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Keys written back, in order
    pub restored: Vec<String>,
    pub export_date: String,
    pub version: String,
}

impl ImportReport {
    pub fn summary(&self) -> String {
        if self.restored.is_empty() {
            "Restored: nothing".to_string()
        } else {
            format!("Restored: {}", self.restored.join(", "))
        }
    }
}

/// Export the state seen through the active backend as a token
pub async fn export_snapshot(selector: &BackendSelector) -> PantryResult<String> {
    let snapshot = Snapshot::capture(selector.backend()).await?;
    info!("Exported snapshot from {} storage", selector.mode());
    snapshot.encode()
}

/// Decode a token without writing anything
pub fn decode_snapshot(token: &str) -> PantryResult<Snapshot> {
    Snapshot::decode(token)
}

/// Restore every non-reserved key of a token through the active backend
///
/// Every key is checked against the backend before the first save, so a key
/// the backend cannot store fails the import with nothing written. Saves then
/// run one at a time; a transport failure stops the import and earlier keys
/// stay written.
pub async fn import_snapshot(selector: &BackendSelector, token: &str) -> PantryResult<ImportReport> {
    let snapshot = Snapshot::decode(token)?;
    let backend = selector.backend();

    for (key, _) in snapshot.data_entries() {
        backend.check_key(key)?;
    }

    let mut report = ImportReport {
        restored: Vec::new(),
        export_date: snapshot.export_date_text(),
        version: snapshot.version_text(),
    };

    for (key, value) in snapshot.data_entries() {
        backend.save(key, value.clone()).await?;
        report.restored.push(key.clone());
    }

    info!(
        "Imported {} keys into {} storage",
        report.restored.len(),
        selector.mode()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{StaticConnectivity, IDENTITY_KEY};
    use crate::storage::testing::FakeRemote;
    use crate::storage::{FileStore, KeyValueStore, MemoryStore};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn local_selector() -> (BackendSelector, Arc<MemoryStore>) {
        let local = Arc::new(MemoryStore::new());
        let selector = BackendSelector::initialize(
            "pantryapp",
            local.clone(),
            Arc::new(MemoryStore::new()),
            Arc::new(FakeRemote::new()),
            &StaticConnectivity::online(),
        )
        .unwrap();
        (selector, local)
    }

    #[tokio::test]
    async fn test_export_shape() {
        let (selector, _) = local_selector();
        selector.save("stock", json!({"oeufs": 6})).await.unwrap();

        let token = export_snapshot(&selector).await.unwrap();
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["stock"], json!({"oeufs": 6}));
        assert_eq!(value["recipes"], Value::Null);
        assert_eq!(value["settings"], Value::Null);
        assert_eq!(value["planning"], Value::Null);
        assert_eq!(value["version"], "1.0");
        let export_date = value["exportDate"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(export_date).is_ok());
        assert!(export_date.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_round_trip_into_fresh_backend() {
        let (source, _) = local_selector();
        source.save("recipes", json!([{"name": "Crêpes"}])).await.unwrap();
        source.save("planning", json!({"lundi": "Crêpes"})).await.unwrap();
        let token = export_snapshot(&source).await.unwrap();

        let (target, target_store) = local_selector();
        let report = import_snapshot(&target, &token).await.unwrap();

        assert_eq!(
            report.restored,
            vec!["planning", "recipes", "settings", "stock"]
        );
        assert_eq!(report.version, "1.0");
        assert_eq!(
            target.load("recipes").await.unwrap(),
            Some(json!([{"name": "Crêpes"}]))
        );
        assert_eq!(
            target.load("planning").await.unwrap(),
            Some(json!({"lundi": "Crêpes"}))
        );
        assert_eq!(target.load("stock").await.unwrap(), Some(Value::Null));

        let keys = target_store.keys().unwrap();
        assert!(!keys.iter().any(|k| k.ends_with("exportDate") || k.ends_with("_version")));
    }

    #[tokio::test]
    async fn test_reserved_keys_never_persisted() {
        let (selector, store) = local_selector();
        let token = STANDARD.encode(
            json!({"stock": [1], "exportDate": "2025-01-01T00:00:00.000Z", "version": "1.0"})
                .to_string(),
        );

        let report = import_snapshot(&selector, &token).await.unwrap();

        assert_eq!(report.restored, vec!["stock"]);
        assert_eq!(store.keys().unwrap(), vec!["pantryapp_stock".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_tokens() {
        let (selector, store) = local_selector();
        let not_object = STANDARD.encode("[1, 2, 3]");
        let not_json = STANDARD.encode("{oops");

        for token in ["***not base64***", not_object.as_str(), not_json.as_str()] {
            let err = import_snapshot(&selector, token).await.unwrap_err();
            assert!(matches!(err, PantryError::MalformedToken(_)), "{token}");
        }
        assert!(store.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_goes_through_cloud_backend() {
        let state = Arc::new(MemoryStore::new());
        state.set(IDENTITY_KEY, "user123").unwrap();
        let remote = Arc::new(FakeRemote::new());
        let selector = BackendSelector::initialize(
            "pantryapp",
            Arc::new(MemoryStore::new()),
            state,
            remote.clone(),
            &StaticConnectivity::online(),
        )
        .unwrap();

        let token = STANDARD.encode(json!({"settings": {"lang": "fr"}, "version": "1.0"}).to_string());
        import_snapshot(&selector, &token).await.unwrap();

        let requests = remote.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/users/user123/data/pantryapp_settings");
    }

    #[tokio::test]
    async fn test_unstorable_key_aborts_before_any_write() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));
        let selector = BackendSelector::initialize(
            "pantryapp",
            store.clone(),
            Arc::new(MemoryStore::new()),
            Arc::new(FakeRemote::new()),
            &StaticConnectivity::offline(),
        )
        .unwrap();
        let token = STANDARD.encode(json!({"recipes": [1], "zz bad": 1, "version": "1.0"}).to_string());

        let err = import_snapshot(&selector, &token).await.unwrap_err();

        assert!(matches!(err, PantryError::Storage(_)));
        assert!(store.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_string_metadata_is_skipped() {
        let (selector, store) = local_selector();
        let token = STANDARD.encode(json!({"stock": [1], "exportDate": 0, "version": 1}).to_string());

        let report = import_snapshot(&selector, &token).await.unwrap();

        assert_eq!(report.restored, vec!["stock"]);
        assert_eq!(report.version, "1");
        assert_eq!(store.keys().unwrap(), vec!["pantryapp_stock".to_string()]);
    }

    #[test]
    fn test_decode_tolerates_whitespace_and_unicode() {
        let snapshot = Snapshot {
            data: [("recipes".to_string(), json!("Bœuf 🍅"))].into_iter().collect(),
            export_date: "2025-01-01T00:00:00.000Z".into(),
            version: EXPORT_VERSION.into(),
        };
        let token = format!("  {}\n", snapshot.encode().unwrap());

        assert_eq!(decode_snapshot(&token).unwrap(), snapshot);
    }

    #[test]
    fn test_yaml_rendering() {
        let snapshot = Snapshot {
            data: [("stock".to_string(), json!({"sel": 1}))].into_iter().collect(),
            export_date: "2025-01-01T00:00:00.000Z".into(),
            version: EXPORT_VERSION.into(),
        };
        let yaml = snapshot.to_yaml().unwrap();
        assert!(yaml.contains("exportDate"));
        assert!(yaml.contains("sel: 1"));
    }
}
