//! Storage layer for pantry
//!
//! One asynchronous save/load contract, [`StorageBackend`], implemented by a
//! local backend over a synchronous key/value store and a remote backend over
//! an injected request transport. Both wrap every value in an
//! [`Envelope`](crate::envelope::Envelope) and write it under
//! `<prefix>_<key>`.

pub mod file_io;
pub mod kv;
pub mod local;
pub mod remote;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use kv::{is_valid_store_key, FileStore, KeyValueStore, MemoryStore};
pub use local::LocalBackend;
pub use remote::RemoteBackend;
pub use transport::{HttpTransport, Method, Transport, TransportRequest, TransportResponse};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::PantryResult;

/// Which substrate a backend writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Cloud,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Cloud => write!(f, "cloud"),
        }
    }
}

/// Uniform save/load contract over local and remote storage
///
/// Operations are not serialized internally: two concurrent saves to the same
/// key race and the last one to complete wins.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Wrap `value` in an envelope and persist it under the namespaced key
    async fn save(&self, key: &str, value: Value) -> PantryResult<()>;

    /// Read and unwrap a record; `Ok(None)` when nothing is stored
    async fn load(&self, key: &str) -> PantryResult<Option<Value>>;

    /// Fail if `save` would reject this key before reaching the substrate
    fn check_key(&self, _key: &str) -> PantryResult<()> {
        Ok(())
    }

    /// Reconcile with the substrate; completes or reports an error
    async fn sync(&self) -> PantryResult<()> {
        Ok(())
    }
}
