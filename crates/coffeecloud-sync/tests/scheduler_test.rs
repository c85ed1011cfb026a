//! Scheduler behavior with a controllable cycle runner.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use coffeecloud_persistence::{
    Configuration, ConfigurationPersistence, MemoryPersistService,
};
use coffeecloud_sync::{CycleReport, CycleRunner, Scheduler, SchedulerConfig, SyncError};
use tokio::sync::Notify;

/// Runner whose cycles block until released
#[derive(Default)]
struct GatedRunner {
    started: AtomicUsize,
    release: Notify,
}

#[async_trait]
impl CycleRunner for GatedRunner {
    async fn run_cycle(&self, _configuration: &Configuration) -> Result<CycleReport, SyncError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(CycleReport::default())
    }
}

/// Runner that finishes immediately
#[derive(Default)]
struct CountingRunner {
    cycles: AtomicUsize,
}

#[async_trait]
impl CycleRunner for CountingRunner {
    async fn run_cycle(&self, _configuration: &Configuration) -> Result<CycleReport, SyncError> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        Ok(CycleReport::default())
    }
}

async fn store_with(configurations: Vec<Configuration>) -> Arc<MemoryPersistService> {
    let store = Arc::new(MemoryPersistService::new());
    for configuration in configurations {
        let created = store.configuration_create(&configuration).await.unwrap();
        if configuration.active {
            store.configuration_set_active(created.id, true).await.unwrap();
        }
    }
    store
}

#[tokio::test(start_paused = true)]
async fn test_trigger_is_noop_while_task_is_live() {
    let store = store_with(vec![]).await;
    let runner = Arc::new(GatedRunner::default());
    let scheduler = Scheduler::new(store, runner.clone(), SchedulerConfig::default());
    let configuration = common::configuration("https://cloud", &["P1"]);

    assert!(scheduler.trigger(configuration.clone()));
    assert!(!scheduler.trigger(configuration.clone()));
    assert!(!scheduler.trigger(configuration.clone()));
    assert_eq!(scheduler.active_task_count(), 1);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(runner.started.load(Ordering::SeqCst), 1);

    scheduler.shutdown();
    assert_eq!(scheduler.active_task_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_task_clears_handle_after_refresh_interval() {
    let store = store_with(vec![]).await;
    let runner = Arc::new(CountingRunner::default());
    let scheduler = Scheduler::new(store, runner.clone(), SchedulerConfig::default());
    let configuration = common::configuration("https://cloud", &["P1"]);

    assert!(scheduler.trigger(configuration.clone()));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(scheduler.is_running(configuration.id));
    assert!(!scheduler.trigger(configuration.clone()));

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(!scheduler.is_running(configuration.id));
    assert_eq!(scheduler.active_task_count(), 0);

    assert!(scheduler.trigger(configuration));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(runner.cycles.load(Ordering::SeqCst), 2);
    scheduler.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_tick_activates_enabled_configurations() {
    let store = store_with(vec![common::configuration("https://cloud", &["P1"])]).await;
    let runner = Arc::new(GatedRunner::default());
    let scheduler = Scheduler::new(store.clone(), runner.clone(), SchedulerConfig::default());

    scheduler.tick().await.unwrap();
    scheduler.tick().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(store.configuration_get(1).await.unwrap().unwrap().active);
    assert!(scheduler.is_running(1));
    assert_eq!(runner.started.load(Ordering::SeqCst), 1);
    scheduler.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_tick_deactivates_disabled_configurations() {
    let mut disabled = common::configuration("https://cloud", &["P1"]);
    disabled.enable = false;
    disabled.active = true;
    let store = store_with(vec![disabled]).await;
    let runner = Arc::new(CountingRunner::default());
    let scheduler = Scheduler::new(store.clone(), runner.clone(), SchedulerConfig::default());

    scheduler.tick().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(!store.configuration_get(1).await.unwrap().unwrap().active);
    assert!(!scheduler.is_running(1));
    assert_eq!(runner.cycles.load(Ordering::SeqCst), 0);
}

/// Store whose enumeration always fails
struct BrokenStore;

#[async_trait]
impl ConfigurationPersistence for BrokenStore {
    async fn configuration_find_all(&self) -> anyhow::Result<Vec<Configuration>> {
        Err(anyhow::anyhow!("connection refused"))
    }

    async fn configuration_get(&self, _id: i64) -> anyhow::Result<Option<Configuration>> {
        Ok(None)
    }

    async fn configuration_create(&self, configuration: &Configuration) -> anyhow::Result<Configuration> {
        Ok(configuration.clone())
    }

    async fn configuration_update(&self, _configuration: &Configuration) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn configuration_delete(&self, _id: i64) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn configuration_set_active(&self, _id: i64, _active: bool) -> anyhow::Result<bool> {
        Ok(false)
    }
}

#[tokio::test(start_paused = true)]
async fn test_store_failure_stops_the_scheduler() {
    let runner = Arc::new(CountingRunner::default());
    let scheduler = Scheduler::new(Arc::new(BrokenStore), runner, SchedulerConfig::default());

    let result = scheduler.run().await;
    assert!(matches!(result, Err(SyncError::Store(_))));
}

/// Store whose first enumeration takes five seconds
#[derive(Default)]
struct SlowFirstStore {
    enumerations: AtomicUsize,
}

#[async_trait]
impl ConfigurationPersistence for SlowFirstStore {
    async fn configuration_find_all(&self) -> anyhow::Result<Vec<Configuration>> {
        if self.enumerations.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        Ok(Vec::new())
    }

    async fn configuration_get(&self, _id: i64) -> anyhow::Result<Option<Configuration>> {
        Ok(None)
    }

    async fn configuration_create(&self, configuration: &Configuration) -> anyhow::Result<Configuration> {
        Ok(configuration.clone())
    }

    async fn configuration_update(&self, _configuration: &Configuration) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn configuration_delete(&self, _id: i64) -> anyhow::Result<bool> {
        Ok(false)
    }

    async fn configuration_set_active(&self, _id: i64, _active: bool) -> anyhow::Result<bool> {
        Ok(false)
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_enumeration_does_not_burst_missed_ticks() {
    let store = Arc::new(SlowFirstStore::default());
    let scheduler = Arc::new(Scheduler::new(
        store.clone(),
        Arc::new(CountingRunner::default()),
        SchedulerConfig::default(),
    ));

    let running = scheduler.clone();
    let handle = tokio::spawn(async move { running.run().await });

    // First tick at 0s blocks until 5s; one catch-up tick follows, the next is due at 6s
    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert_eq!(store.enumerations.load(Ordering::SeqCst), 2);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(store.enumerations.load(Ordering::SeqCst), 3);

    handle.abort();
}
