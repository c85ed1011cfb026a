//! Application state shared across handlers

use std::sync::Arc;

use coffeecloud_persistence::{ConfigurationPersistence, MemoryPersistService, PersistenceService};

pub struct AppState {
    pub configurations: Arc<dyn ConfigurationPersistence>,
    pub persistence: Arc<dyn PersistenceService>,
}

impl AppState {
    pub fn new(
        configurations: Arc<dyn ConfigurationPersistence>,
        persistence: Arc<dyn PersistenceService>,
    ) -> Self {
        Self {
            configurations,
            persistence,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryPersistService::new());
        Self::new(store.clone(), store)
    }
}
