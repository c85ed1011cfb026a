//! Asset identity resolution and per-project publishing.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use coffeecloud_eliona::{Asset, DataSubtype};
use coffeecloud_persistence::{AssetMapping, AssetPersistence, MemoryPersistService};
use coffeecloud_sync::{AssetIdentityCache, Machine, MachineGroup, Publisher, SyncError};
use common::{RecordingPlatform, configuration};

fn floor_with_lobby() -> MachineGroup {
    MachineGroup {
        group_id: 1,
        group_name: "Floor1".to_string(),
        machines: vec![Machine {
            machine_id: "m1".to_string(),
            machine_name: "Lobby".to_string(),
            serial_number: "SN1".to_string(),
            cup_count: Some(5),
            ..Default::default()
        }],
    }
}

#[tokio::test]
async fn test_create_asset_first_time_is_idempotent() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let identities = AssetIdentityCache::new(store.clone(), platform.clone());

    let asset = Asset::new("P1", "coffeecloud_group_1", "coffeecloud_group", "Floor1", None);
    let first = identities.create_asset_first_time(1, &asset).await.unwrap();
    let second = identities.create_asset_first_time(1, &asset).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(platform.assets().len(), 1);
    assert_eq!(store.asset_count(1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_identity_is_scoped_per_configuration_and_project() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let identities = AssetIdentityCache::new(store, platform.clone());

    let p1 = Asset::new("P1", "coffeecloud_group_1", "coffeecloud_group", "Floor1", None);
    let p2 = Asset::new("P2", "coffeecloud_group_1", "coffeecloud_group", "Floor1", None);
    let a = identities.create_asset_first_time(1, &p1).await.unwrap();
    let b = identities.create_asset_first_time(1, &p2).await.unwrap();
    let c = identities.create_asset_first_time(2, &p1).await.unwrap();

    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_eq!(platform.assets().len(), 3);
}

#[tokio::test]
async fn test_failed_creation_is_not_recorded() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::failing_for("P1"));
    let identities = AssetIdentityCache::new(store.clone(), platform);

    let asset = Asset::new("P1", "coffeecloud_group_1", "coffeecloud_group", "Floor1", None);
    let result = identities.create_asset_first_time(1, &asset).await;

    assert!(matches!(
        result,
        Err(SyncError::AssetCreation { ref identifier, .. }) if identifier == "coffeecloud_group_1"
    ));
    assert_eq!(store.asset_count(1).await.unwrap(), 0);
}

#[tokio::test]
async fn test_hierarchy_is_parented() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let publisher = Publisher::new(store, platform.clone());

    let report = publisher
        .publish(&configuration("https://cloud", &["P1"]), &[floor_with_lobby()])
        .await;
    assert_eq!(report.projects_published, 1);
    assert_eq!(report.projects_failed, 0);

    let root = platform.asset("coffeecloud_root_coffeecloud_root").unwrap();
    let group = platform.asset("coffeecloud_group_1").unwrap();
    let machine = platform.asset("coffeecloud_machine_m1").unwrap();
    assert_eq!(root.parent_locational_asset_id, None);
    assert_eq!(root.name.as_deref(), Some("Coffeecloud Root"));
    assert_eq!(group.parent_locational_asset_id, root.id);
    assert_eq!(machine.parent_locational_asset_id, group.id);
    assert_eq!(machine.device_ids, vec!["coffeecloud_machine_m1"]);

    let data = platform.data();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].subtype, DataSubtype::Input);
    assert_eq!(data[0].asset_id, machine.id.unwrap());
}

#[tokio::test]
async fn test_failing_project_does_not_stop_siblings() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::failing_for("P1"));
    let publisher = Publisher::new(store.clone(), platform.clone());

    let report = publisher
        .publish(&configuration("https://cloud", &["P1", "P2"]), &[floor_with_lobby()])
        .await;

    assert_eq!(report.projects_failed, 1);
    assert_eq!(report.projects_published, 1);
    assert!(platform.assets().iter().all(|a| a.project_id == "P2"));
    assert_eq!(platform.assets().len(), 3);
    assert_eq!(platform.data().len(), 1);
}

#[tokio::test]
async fn test_republishing_reuses_assets() {
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let publisher = Publisher::new(store, platform.clone());
    let configuration = configuration("https://cloud", &["P1"]);

    publisher.publish(&configuration, &[floor_with_lobby()]).await;
    publisher.publish(&configuration, &[floor_with_lobby()]).await;

    assert_eq!(platform.assets().len(), 3);
    assert_eq!(platform.data().len(), 2);
}

/// Store that misses the first lookup, as if another task recorded the identity
/// between the lookup and the insert
struct LateRecordedStore {
    inner: MemoryPersistService,
    missed: AtomicBool,
}

#[async_trait]
impl AssetPersistence for LateRecordedStore {
    async fn asset_get_id(
        &self,
        configuration_id: i64,
        project_id: &str,
        global_asset_id: &str,
    ) -> anyhow::Result<Option<i32>> {
        if !self.missed.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner
            .asset_get_id(configuration_id, project_id, global_asset_id)
            .await
    }

    async fn asset_insert(&self, mapping: &AssetMapping) -> anyhow::Result<()> {
        self.inner.asset_insert(mapping).await
    }

    async fn asset_count(&self, configuration_id: i64) -> anyhow::Result<u64> {
        self.inner.asset_count(configuration_id).await
    }
}

#[tokio::test]
async fn test_create_asset_first_time_returns_recorded_id_after_duplicate_insert() {
    let inner = MemoryPersistService::new();
    inner
        .asset_insert(&AssetMapping {
            configuration_id: 1,
            project_id: "P1".to_string(),
            global_asset_id: "coffeecloud_group_1".to_string(),
            asset_id: 99,
        })
        .await
        .unwrap();
    let store = Arc::new(LateRecordedStore {
        inner,
        missed: AtomicBool::new(false),
    });
    let platform = Arc::new(RecordingPlatform::default());
    let identities = AssetIdentityCache::new(store.clone(), platform.clone());

    let asset = Asset::new("P1", "coffeecloud_group_1", "coffeecloud_group", "Floor1", None);
    let id = identities.create_asset_first_time(1, &asset).await.unwrap();

    assert_eq!(platform.assets().len(), 1);
    assert_eq!(id, 99);
    assert_eq!(store.asset_count(1).await.unwrap(), 1);
}
