//! Full cycles against a mocked CoffeeCloud API and a recording platform.

mod common;

use std::sync::Arc;

use coffeecloud_client::CoffeeCloudConnector;
use coffeecloud_eliona::DataSubtype;
use coffeecloud_persistence::{AssetPersistence, FilterRule, MemoryPersistService};
use coffeecloud_sync::{CycleRunner, SyncEngine, SyncError};
use common::{RecordingPlatform, configuration};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_source(server: &MockServer, machine_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/rest/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "tok"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/groups"))
        .and(header("Authorization", "Bearer tok"))
        .and(header("API-Key", "tenant-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "name": "Floor1", "serialNumbers": ["SN1"]}])),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/overview/data"))
        .and(query_param("groupid", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "result": [{
                "id": "m1",
                "machineName": "Lobby",
                "origin": {"sn": "SN1"},
                "numberOfCups": 5,
                "hoursSinceClean": 3
            }]
        })))
        .expect(machine_calls)
        .mount(server)
        .await;
    for listing in ["/rest/dashboard/error/search", "/rest/dashboard/healthkpi"] {
        Mock::given(method("POST"))
            .and(path(listing))
            .and(query_param("groupid", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"count": 0, "result": []})),
            )
            .mount(server)
            .await;
    }
}

fn engine(store: Arc<MemoryPersistService>, platform: Arc<RecordingPlatform>) -> SyncEngine {
    SyncEngine::new(Arc::new(CoffeeCloudConnector), platform, store)
}

#[tokio::test]
async fn test_cycle_creates_hierarchy_and_publishes_data() {
    let server = MockServer::start().await;
    mount_source(&server, 2).await;
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(store.clone(), platform.clone());
    let configuration = configuration(&server.uri(), &["P1"]);

    let report = engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(report.groups, 1);
    assert_eq!(report.machines, 1);
    assert_eq!(report.publish.projects_published, 1);

    let root = platform.asset("coffeecloud_root_coffeecloud_root").unwrap();
    let group = platform.asset("coffeecloud_group_1").unwrap();
    let machine = platform.asset("coffeecloud_machine_m1").unwrap();
    assert_eq!(group.parent_locational_asset_id, root.id);
    assert_eq!(machine.parent_locational_asset_id, group.id);
    assert_eq!(machine.description.as_deref(), Some("Lobby (coffeecloud_machine_m1)"));

    let data = platform.data();
    assert_eq!(data.len(), 2);
    let input = data.iter().find(|d| d.subtype == DataSubtype::Input).unwrap();
    assert_eq!(json!(input.data), json!({"cub_count": 5}));
    let status = data.iter().find(|d| d.subtype == DataSubtype::Status).unwrap();
    assert_eq!(json!(status.data), json!({"hours_since_cleaned": 3}));

    // A second cycle reuses every asset and republishes data
    engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(platform.assets().len(), 3);
    assert_eq!(platform.data().len(), 4);
    assert_eq!(store.asset_count(configuration.id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_filtered_group_is_not_enriched() {
    let server = MockServer::start().await;
    mount_source(&server, 0).await;
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(store, platform.clone());

    let mut configuration = configuration(&server.uri(), &["P1"]);
    configuration.asset_filter = vec![vec![FilterRule::new("group_name", "^Kitchen")]];

    let report = engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(report.groups, 0);
    assert_eq!(platform.assets().len(), 1);
    assert!(platform.data().is_empty());
}

#[tokio::test]
async fn test_filtered_machine_is_not_published() {
    let server = MockServer::start().await;
    mount_source(&server, 1).await;
    let store = Arc::new(MemoryPersistService::new());
    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(store, platform.clone());

    let mut configuration = configuration(&server.uri(), &["P1"]);
    configuration.asset_filter = vec![vec![
        FilterRule::new("group_name", "Floor"),
        FilterRule::new("machine_name", "^Kitchen"),
    ]];

    let report = engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(report.groups, 0);

    // Machine rules never match a group, so they need their own AND-group
    let mut configuration = configuration.clone();
    configuration.asset_filter = vec![
        vec![FilterRule::new("group_name", "Floor")],
        vec![FilterRule::new("machine_name", "^Kitchen")],
    ];
    let report = engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(report.groups, 1);
    assert_eq!(report.machines, 0);
    assert!(platform.asset("coffeecloud_group_1").is_some());
    assert!(platform.asset("coffeecloud_machine_m1").is_none());
}

#[tokio::test]
async fn test_no_project_ids_publishes_nothing() {
    let server = MockServer::start().await;
    mount_source(&server, 1).await;
    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(Arc::new(MemoryPersistService::new()), platform.clone());

    let report = engine.run_cycle(&configuration(&server.uri(), &[])).await.unwrap();
    assert_eq!(report.machines, 1);
    assert_eq!(report.publish.projects_published, 0);
    assert!(platform.assets().is_empty());
}

#[tokio::test]
async fn test_login_failure_aborts_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(Arc::new(MemoryPersistService::new()), platform.clone());

    let result = engine.run_cycle(&configuration(&server.uri(), &["P1"])).await;
    assert!(matches!(result, Err(SyncError::Auth(_))));
    assert!(platform.assets().is_empty());
}

#[tokio::test]
async fn test_failed_listing_aborts_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "tok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/groups"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let engine = engine(
        Arc::new(MemoryPersistService::new()),
        Arc::new(RecordingPlatform::default()),
    );

    let result = engine.run_cycle(&configuration(&server.uri(), &["P1"])).await;
    assert!(matches!(result, Err(SyncError::Fetch { resource: "groups", .. })));
}

#[tokio::test]
async fn test_invalid_regex_skips_only_the_entity_reaching_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id_token": "tok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Floor1", "serialNumbers": ["SN1", "SN2"]},
            {"id": 2, "name": "Bad", "serialNumbers": ["SN3"]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/overview/data"))
        .and(query_param("groupid", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "result": [
                {"id": "m1", "machineName": "Lobby", "origin": {"sn": "SN1"}, "numberOfCups": 5},
                {"id": "m2", "machineName": "Kitchen", "origin": {"sn": "SN2"}, "numberOfCups": 7}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/overview/data"))
        .and(query_param("groupid", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0, "result": []})))
        .expect(0)
        .mount(&server)
        .await;
    for listing in ["/rest/dashboard/error/search", "/rest/dashboard/healthkpi"] {
        Mock::given(method("POST"))
            .and(path(listing))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"count": 0, "result": []})),
            )
            .mount(&server)
            .await;
    }

    let platform = Arc::new(RecordingPlatform::default());
    let engine = engine(Arc::new(MemoryPersistService::new()), platform.clone());
    let mut configuration = configuration(&server.uri(), &["P1"]);
    configuration.asset_filter = vec![
        vec![FilterRule::new("group_name", "^Floor")],
        vec![FilterRule::new("machine_name", "^Lobby")],
        vec![FilterRule::new("machine_name", "(")],
    ];

    // "Floor1" and "Lobby" match before the broken rule is reached; "Bad" and
    // "Kitchen" reach it and are skipped
    let report = engine.run_cycle(&configuration).await.unwrap();
    assert_eq!(report.groups, 1);
    assert_eq!(report.machines, 1);
    assert_eq!(report.publish.projects_published, 1);

    assert!(platform.asset("coffeecloud_group_1").is_some());
    assert!(platform.asset("coffeecloud_group_2").is_none());
    assert!(platform.asset("coffeecloud_machine_m1").is_some());
    assert!(platform.asset("coffeecloud_machine_m2").is_none());
    assert_eq!(platform.assets().len(), 3);
}
