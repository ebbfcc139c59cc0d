//! Storage wiring: the gateways every handler receives.

use std::sync::Arc;

use househunter_infra::{HouseStore, InMemoryStore, PostgresStore, StoreError, UserStore};

/// Collection gateways shared by all handlers.
///
/// Constructed once at startup and injected into the router; there is no
/// global client.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<dyn UserStore>,
    pub houses: Arc<dyn HouseStore>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserStore>, houses: Arc<dyn HouseStore>) -> Self {
        Self { users, houses }
    }

    /// In-memory wiring (dev/test): both collections in one process-local store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store)
    }

    /// Postgres wiring: connect, ping, and make sure the tables exist.
    pub async fn postgres(database_url: &str) -> Result<Self, StoreError> {
        let store = Arc::new(PostgresStore::connect(database_url).await?);
        store.migrate().await?;
        Ok(Self::new(store.clone(), store))
    }
}
