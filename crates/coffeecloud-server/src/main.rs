//! Main entry point for the CoffeeCloud app.
//!
//! Starts the control plane HTTP server next to the sync scheduler and runs until
//! a shutdown signal arrives or the scheduler loses its configuration store.

use std::sync::Arc;

use coffeecloud_client::CoffeeCloudConnector;
use coffeecloud_eliona::{AssetPlatform, ElionaClient};
use coffeecloud_persistence::{
    AssetPersistence, ConfigurationPersistence, ExternalDbPersistService, MemoryPersistService,
    PersistenceService, StorageMode,
};
use coffeecloud_server::{
    model::{AppConfiguration, AppState},
    startup,
};
use coffeecloud_sync::{Scheduler, SyncEngine};
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize configuration and logging
    let configuration = AppConfiguration::new()?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), configuration.version());

    let server_address = configuration.server_address();
    let server_port = configuration.server_port();

    // Initialize the configuration and identity store
    let storage_mode = configuration.persistence_mode();
    info!("Persistence mode: {}", storage_mode);

    let (configurations, assets, persistence): (
        Arc<dyn ConfigurationPersistence>,
        Arc<dyn AssetPersistence>,
        Arc<dyn PersistenceService>,
    ) = match storage_mode {
        StorageMode::ExternalDb => {
            let db = configuration.database_connection().await?;
            let store = Arc::new(ExternalDbPersistService::new(db));
            if configuration.db_init_schema() {
                store.init_schema().await?;
            }
            let configurations: Arc<dyn ConfigurationPersistence> = store.clone();
            let assets: Arc<dyn AssetPersistence> = store.clone();
            let persistence: Arc<dyn PersistenceService> = store;
            (configurations, assets, persistence)
        }
        StorageMode::Memory => {
            warn!("No database configured; configurations are lost on restart");
            let store = Arc::new(MemoryPersistService::new());
            let configurations: Arc<dyn ConfigurationPersistence> = store.clone();
            let assets: Arc<dyn AssetPersistence> = store.clone();
            let persistence: Arc<dyn PersistenceService> = store;
            (configurations, assets, persistence)
        }
    };

    // Wire the sync engine to both APIs
    let eliona_config = configuration.eliona_config();
    info!(endpoint = %eliona_config.endpoint, "Eliona API configured");
    let platform: Arc<dyn AssetPlatform> = Arc::new(ElionaClient::new(eliona_config)?);
    let engine = Arc::new(SyncEngine::new(
        Arc::new(CoffeeCloudConnector),
        platform,
        assets,
    ));
    let scheduler = Scheduler::new(
        configurations.clone(),
        engine,
        configuration.scheduler_config(),
    );

    let app_state = Arc::new(AppState::new(configurations, persistence));

    info!(
        "Starting control plane server on {}:{}",
        server_address, server_port
    );
    let server = startup::main_server(app_state, server_address, server_port)?;
    let server_handle = server.handle();

    let outcome: Result<(), Box<dyn std::error::Error>> = tokio::select! {
        result = scheduler.run() => match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Scheduler stopped: {}", e);
                Err(e.into())
            }
        },
        result = server => match result {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("Control plane server error: {}", e);
                Err(e.into())
            }
        },
        _ = startup::wait_for_shutdown_signal() => {
            info!("Shutdown signal received");
            Ok(())
        }
    };

    scheduler.shutdown();
    server_handle.stop(true).await;
    info!("CoffeeCloud app stopped");

    outcome
}
