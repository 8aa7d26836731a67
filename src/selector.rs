//! Backend selection
//!
//! The selector owns the single active backend. It starts in local mode and
//! switches to the cloud backend when a remote identity was stored by an
//! earlier session and the connectivity signal reports online at startup.
//! That check runs once; a later loss of connectivity does not switch back.
//! Callers can also connect explicitly with a new identity. There is no
//! transition from cloud back to local.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::{PantryError, PantryResult};
use crate::storage::{
    BackendKind, KeyValueStore, LocalBackend, RemoteBackend, StorageBackend, Transport,
};

/// Small-state key holding the remote account identity
pub const IDENTITY_KEY: &str = "cloud_user_id";

/// Connectivity signal consulted at startup
pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity {
    online: bool,
}

impl StaticConnectivity {
    pub fn online() -> Self {
        Self { online: true }
    }

    pub fn offline() -> Self {
        Self { online: false }
    }
}

impl Connectivity for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.online
    }
}

/// The backend currently in charge
pub enum ActiveBackend {
    Local(LocalBackend),
    Cloud(RemoteBackend),
}

impl ActiveBackend {
    pub fn as_backend(&self) -> &dyn StorageBackend {
        match self {
            ActiveBackend::Local(backend) => backend as &dyn StorageBackend,
            ActiveBackend::Cloud(backend) => backend as &dyn StorageBackend,
        }
    }
}

pub struct BackendSelector {
    prefix: String,
    local_store: Arc<dyn KeyValueStore>,
    state_store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    active: ActiveBackend,
}

impl BackendSelector {
    /// Build the selector and resolve the startup mode
    pub fn initialize(
        prefix: impl Into<String>,
        local_store: Arc<dyn KeyValueStore>,
        state_store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        connectivity: &dyn Connectivity,
    ) -> PantryResult<Self> {
        let prefix = prefix.into();
        let stored_identity = read_identity(state_store.as_ref())?;

        let active = match stored_identity {
            Some(identity) if connectivity.is_online() => {
                info!("Using cloud storage for account {}", identity);
                ActiveBackend::Cloud(RemoteBackend::new(transport.clone(), identity, prefix.clone()))
            }
            Some(_) => {
                info!("Stored cloud account found but offline; using local storage");
                ActiveBackend::Local(LocalBackend::new(local_store.clone(), prefix.clone()))
            }
            None => ActiveBackend::Local(LocalBackend::new(local_store.clone(), prefix.clone())),
        };

        Ok(Self {
            prefix,
            local_store,
            state_store,
            transport,
            active,
        })
    }

    /// Persist a new identity and switch to the cloud backend immediately
    pub fn connect_cloud(&mut self, identity: &str) -> PantryResult<()> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(PantryError::Config("Cloud identity cannot be empty".into()));
        }

        self.state_store.set(IDENTITY_KEY, identity)?;
        self.active = ActiveBackend::Cloud(RemoteBackend::new(
            self.transport.clone(),
            identity,
            self.prefix.clone(),
        ));
        info!("Switched to cloud storage for account {}", identity);
        Ok(())
    }

    pub fn mode(&self) -> BackendKind {
        self.backend().kind()
    }

    /// Identity of the active cloud backend
    pub fn identity(&self) -> Option<&str> {
        match &self.active {
            ActiveBackend::Cloud(backend) => Some(backend.identity()),
            ActiveBackend::Local(_) => None,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn backend(&self) -> &dyn StorageBackend {
        self.active.as_backend()
    }

    /// Logical keys with a record in the local store under this prefix
    pub fn local_records(&self) -> PantryResult<Vec<String>> {
        let namespace = format!("{}_", self.prefix);
        Ok(self
            .local_store
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&namespace).map(str::to_string))
            .collect())
    }

    pub async fn save(&self, key: &str, value: Value) -> PantryResult<()> {
        self.backend().save(key, value).await
    }

    pub async fn load(&self, key: &str) -> PantryResult<Option<Value>> {
        self.backend().load(key).await
    }

    pub async fn sync(&self) -> PantryResult<()> {
        self.backend().sync().await
    }
}

fn read_identity(store: &dyn KeyValueStore) -> PantryResult<Option<String>> {
    Ok(store
        .get(IDENTITY_KEY)?
        .map(|identity| identity.trim().to_string())
        .filter(|identity| !identity.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::FakeRemote;
    use crate::storage::{MemoryStore, Method};
    use serde_json::json;

    struct Fixture {
        local: Arc<MemoryStore>,
        state: Arc<MemoryStore>,
        remote: Arc<FakeRemote>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                local: Arc::new(MemoryStore::new()),
                state: Arc::new(MemoryStore::new()),
                remote: Arc::new(FakeRemote::new()),
            }
        }

        fn with_identity(identity: &str) -> Self {
            let fixture = Self::new();
            fixture.state.set(IDENTITY_KEY, identity).unwrap();
            fixture
        }

        fn selector(&self, connectivity: StaticConnectivity) -> BackendSelector {
            BackendSelector::initialize(
                "pantryapp",
                self.local.clone(),
                self.state.clone(),
                self.remote.clone(),
                &connectivity,
            )
            .unwrap()
        }
    }

    #[tokio::test]
    async fn test_no_identity_online_uses_local() {
        let fixture = Fixture::new();
        let selector = fixture.selector(StaticConnectivity::online());

        assert_eq!(selector.mode(), BackendKind::Local);
        assert_eq!(selector.identity(), None);

        let stock = json!({"items": [{"name": "Riz", "quantity": 1, "unit": "kg"}]});
        selector.save("stock", stock.clone()).await.unwrap();
        assert_eq!(selector.load("stock").await.unwrap(), Some(stock));
        assert!(fixture.remote.requests().is_empty());
    }

    #[tokio::test]
    async fn test_identity_online_uses_cloud() {
        let fixture = Fixture::with_identity("user123");
        let selector = fixture.selector(StaticConnectivity::online());

        assert_eq!(selector.mode(), BackendKind::Cloud);
        assert_eq!(selector.identity(), Some("user123"));

        selector.save("stock", json!({"sel": 1})).await.unwrap();

        let requests = fixture.remote.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/users/user123/data/pantryapp_stock");
        assert!(fixture.local.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_records_lists_own_namespace() {
        let fixture = Fixture::new();
        fixture.local.set("otherapp_stock", "{}").unwrap();
        let selector = fixture.selector(StaticConnectivity::offline());

        selector.save("stock", json!([])).await.unwrap();
        selector.save("planning", json!({})).await.unwrap();

        assert_eq!(selector.local_records().unwrap(), vec!["planning", "stock"]);
    }

    #[test]
    fn test_identity_offline_stays_local() {
        let fixture = Fixture::with_identity("user123");
        let selector = fixture.selector(StaticConnectivity::offline());

        assert_eq!(selector.mode(), BackendKind::Local);
    }

    #[test]
    fn test_blank_identity_ignored() {
        let fixture = Fixture::with_identity("   ");
        let selector = fixture.selector(StaticConnectivity::online());

        assert_eq!(selector.mode(), BackendKind::Local);
    }

    #[tokio::test]
    async fn test_connect_cloud_persists_and_switches() {
        let fixture = Fixture::new();
        let mut selector = fixture.selector(StaticConnectivity::offline());

        selector.connect_cloud(" chef42 ").unwrap();

        assert_eq!(selector.mode(), BackendKind::Cloud);
        assert_eq!(selector.identity(), Some("chef42"));
        assert_eq!(
            fixture.state.get(IDENTITY_KEY).unwrap().as_deref(),
            Some("chef42")
        );

        selector.load("recipes").await.unwrap();
        assert_eq!(
            fixture.remote.requests()[0].path,
            "/users/chef42/data/pantryapp_recipes"
        );
    }

    #[test]
    fn test_connect_cloud_rejects_empty_identity() {
        let fixture = Fixture::new();
        let mut selector = fixture.selector(StaticConnectivity::online());

        let err = selector.connect_cloud("  ").unwrap_err();
        assert!(matches!(err, PantryError::Config(_)));
        assert_eq!(selector.mode(), BackendKind::Local);
        assert_eq!(fixture.state.get(IDENTITY_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_cloud_failure_does_not_fall_back() {
        let local = Arc::new(MemoryStore::new());
        let state = Arc::new(MemoryStore::new());
        state.set(IDENTITY_KEY, "user123").unwrap();
        let selector = BackendSelector::initialize(
            "pantryapp",
            local.clone(),
            state,
            Arc::new(FakeRemote::unreachable()),
            &StaticConnectivity::online(),
        )
        .unwrap();

        let err = selector.save("stock", json!(1)).await.unwrap_err();
        assert!(err.is_transport());
        assert!(local.keys().unwrap().is_empty());
    }
}
