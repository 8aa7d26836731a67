//! Local backend over a synchronous key/value store
//!
//! Async in signature only: every operation completes without suspending.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::envelope::{self, Envelope, Origin, LOCAL_SCHEMA_VERSION};
use crate::error::PantryResult;
use crate::keys::record_key;

use super::kv::KeyValueStore;
use super::{BackendKind, StorageBackend};

pub struct LocalBackend {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl LocalBackend {
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn save(&self, key: &str, value: Value) -> PantryResult<()> {
        let record = record_key(&self.prefix, key);
        let envelope = Envelope::wrap(value, Origin::Local, LOCAL_SCHEMA_VERSION);
        debug!("local save {}", record);
        self.store.set(&record, &envelope.to_json()?)
    }

    async fn load(&self, key: &str) -> PantryResult<Option<Value>> {
        let record = record_key(&self.prefix, key);
        debug!("local load {}", record);
        match self.store.get(&record)? {
            Some(text) => envelope::unwrap(&text).map(Some),
            None => Ok(None),
        }
    }

    fn check_key(&self, key: &str) -> PantryResult<()> {
        self.store.check_key(&record_key(&self.prefix, key))
    }
}
