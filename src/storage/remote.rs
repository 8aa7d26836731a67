//! Remote backend over an injected request transport
//!
//! Records live at `/users/<identity>/data/<prefix>_<key>`: a save is one
//! `POST` of the envelope, a load is one `GET` whose body is unwrapped. A
//! `404` means no record. Transport failures and non-success statuses are
//! returned to the caller unchanged; there is no fallback to local storage.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, Envelope, Origin, REMOTE_SCHEMA_VERSION};
use crate::error::{PantryError, PantryResult};
use crate::keys::record_key;

use super::transport::{Transport, TransportRequest};
use super::{BackendKind, StorageBackend};

const NOT_FOUND: u16 = 404;

pub struct RemoteBackend {
    transport: Arc<dyn Transport>,
    identity: String,
    prefix: String,
}

impl RemoteBackend {
    pub fn new(
        transport: Arc<dyn Transport>,
        identity: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            identity: identity.into(),
            prefix: prefix.into(),
        }
    }

    /// Remote account this backend reads and writes
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Request path for a logical key
    pub fn record_path(&self, key: &str) -> String {
        format!(
            "/users/{}/data/{}",
            urlencoding::encode(&self.identity),
            urlencoding::encode(&record_key(&self.prefix, key))
        )
    }
}

#[async_trait]
impl StorageBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
    }

    async fn save(&self, key: &str, value: Value) -> PantryResult<()> {
        let envelope = Envelope::wrap(value, Origin::Cloud, REMOTE_SCHEMA_VERSION);
        let body = serde_json::to_value(&envelope)?;
        let path = self.record_path(key);

        debug!("remote save {}", path);
        let response = self.transport.send(TransportRequest::post(path, body)).await?;

        if !response.is_success() {
            return Err(PantryError::transport_status(
                response.status,
                format!("save of '{}' rejected with HTTP {}", key, response.status),
            ));
        }
        Ok(())
    }

    async fn load(&self, key: &str) -> PantryResult<Option<Value>> {
        let path = self.record_path(key);

        debug!("remote load {}", path);
        let response = self.transport.send(TransportRequest::get(path)).await?;

        if response.status == NOT_FOUND {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(PantryError::transport_status(
                response.status,
                format!("load of '{}' failed with HTTP {}", key, response.status),
            ));
        }

        envelope::unwrap(&response.body).map(Some)
    }

    async fn sync(&self) -> PantryResult<()> {
        // Saves and loads already go straight to the service.
        debug!("remote sync for {}: nothing pending", self.identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::FakeRemote;
    use crate::storage::transport::Method;
    use serde_json::json;

    fn backend(remote: &Arc<FakeRemote>) -> RemoteBackend {
        RemoteBackend::new(remote.clone(), "user123", "pantryapp")
    }

    #[test]
    fn test_record_path() {
        let remote = Arc::new(FakeRemote::new());
        assert_eq!(
            backend(&remote).record_path("stock"),
            "/users/user123/data/pantryapp_stock"
        );

        let odd = RemoteBackend::new(remote, "a b/c", "pantryapp");
        assert_eq!(odd.record_path("stock"), "/users/a%20b%2Fc/data/pantryapp_stock");
    }

    #[tokio::test]
    async fn test_save_issues_one_post_with_cloud_envelope() {
        let remote = Arc::new(FakeRemote::new());
        backend(&remote).save("stock", json!({"oeufs": 6})).await.unwrap();

        let requests = remote.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/users/user123/data/pantryapp_stock");

        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["data"], json!({"oeufs": 6}));
        assert_eq!(body["version"], "2.0");
        assert_eq!(body["source"], "cloud");
        assert!(body["timestamp"].is_i64());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let remote = Arc::new(FakeRemote::new());
        let backend = backend(&remote);

        backend.save("recipes", json!(["tarte"])).await.unwrap();
        assert_eq!(backend.load("recipes").await.unwrap(), Some(json!(["tarte"])));
    }

    #[tokio::test]
    async fn test_load_not_found_is_absent() {
        let remote = Arc::new(FakeRemote::new());
        assert_eq!(backend(&remote).load("planning").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let remote = Arc::new(FakeRemote::failing_with(500));
        let backend = backend(&remote);

        let err = backend.save("stock", json!(1)).await.unwrap_err();
        assert!(matches!(err, PantryError::Transport { status: Some(500), .. }));

        let err = backend.load("stock").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let remote = Arc::new(FakeRemote::unreachable());
        let err = backend(&remote).load("stock").await.unwrap_err();
        assert!(matches!(err, PantryError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_propagates() {
        let remote = Arc::new(FakeRemote::new());
        remote.put_raw("/users/user123/data/pantryapp_stock", r#"{"items": []}"#);

        let err = backend(&remote).load("stock").await.unwrap_err();
        assert!(matches!(err, PantryError::MalformedEnvelope(_)));
    }

    #[tokio::test]
    async fn test_sync_completes() {
        let remote = Arc::new(FakeRemote::new());
        backend(&remote).sync().await.unwrap();
        assert!(remote.requests().is_empty());
    }
}
