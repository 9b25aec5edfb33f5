//! Integration tests for the export gateway.
//!
//! Each test starts the router on a random local port and talks to it over
//! HTTP, the way Ansible, Puppet and Chef tooling would.

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;

use blokhouse_export::{Asset, AssetStatus};
use blokhouse_gateway::{build_router, AppState, AssetSource, FileCatalog, StaticCatalog};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;

// =============================================================================
// Helpers
// =============================================================================

fn fixture_assets() -> Vec<Asset> {
    vec![
        Asset::new("a1", "web-01", AssetStatus::Active)
            .with_ip("10.0.0.1")
            .with_mac("52:54:00:00:00:01")
            .with_type("WebServer"),
        Asset::new("a2", "db-01", AssetStatus::Maintenance)
            .with_ip("10.0.0.2")
            .with_description("Primary \"OLTP\"")
            .with_type("Database"),
        Asset::new("a3", "spare", AssetStatus::Deprecated),
        Asset::new("a4", "Jump Host", AssetStatus::Active).with_ip("10.0.0.9"),
    ]
}

/// Start the gateway on a random port.
async fn start_gateway(source: impl AssetSource + 'static) -> SocketAddr {
    let app = build_router(Arc::new(AppState::new(source)));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn get(addr: SocketAddr, path: &str) -> reqwest::Response {
    reqwest::get(format!("http://{addr}{path}")).await.unwrap()
}

fn content_type(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let addr = start_gateway(StaticCatalog::default()).await;
    let body: Value = get(addr, "/health").await.json().await.unwrap();
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_ansible_inventory() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let response = get(addr, "/api/integrations/ansible/inventory").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(content_type(&response).starts_with("application/json"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["all"]["hosts"], json!(["web-01", "db-01", "Jump Host"]));
    assert_eq!(body["WebServer"]["hosts"], json!(["web-01"]));
    assert_eq!(body["Database"]["hosts"], json!(["db-01"]));
    assert_eq!(body["ungrouped"]["hosts"], json!(["Jump Host"]));
    assert_eq!(body["_meta"]["hostvars"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ansible_empty_catalog() {
    let addr = start_gateway(StaticCatalog::default()).await;
    let body: Value = get(addr, "/api/integrations/ansible/inventory")
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({ "all": { "hosts": [], "vars": {} }, "_meta": { "hostvars": {} } })
    );
}

#[tokio::test]
async fn test_ansible_host_query() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let known: Value = get(addr, "/api/integrations/ansible/inventory?host=db-01")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        known,
        json!({
            "ansible_host": "10.0.0.2",
            "description": "Primary \"OLTP\"",
            "status": "MAINTENANCE"
        })
    );

    let unknown: Value = get(addr, "/api/integrations/ansible/inventory?host=spare")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(unknown, json!({}));
}

#[tokio::test]
async fn test_puppet_enc_by_name() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let response = get(addr, "/api/integrations/puppet/enc/web-01").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(content_type(&response), "text/yaml");

    assert_eq!(
        response.text().await.unwrap(),
        "---\nclasses:\n  webserver:\nparameters:\n  blokhouse_id: \"a1\"\n  blokhouse_name: \"web-01\"\n  ip_address: \"10.0.0.1\"\n  mac_address: \"52:54:00:00:00:01\"\n  item_type: \"WebServer\"\n  managed_by: \"blokhouse\"\nenvironment: webserver\n"
    );
}

#[tokio::test]
async fn test_puppet_enc_by_ip() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;
    let yaml = get(addr, "/api/integrations/puppet/enc/10.0.0.2")
        .await
        .text()
        .await
        .unwrap();

    assert!(yaml.contains("  blokhouse_id: \"a2\"\n"));
    assert!(yaml.contains("  description: \"Primary \\\"OLTP\\\"\"\n"));
    assert!(yaml.ends_with("environment: database\n"));
}

#[tokio::test]
async fn test_puppet_enc_unknown_node_gets_default() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let response = get(addr, "/api/integrations/puppet/enc/unknown.example.com").await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        "---\nclasses:\n  base:\nparameters:\n  blokhouse_managed: false\nenvironment: production\n"
    );
}

#[tokio::test]
async fn test_chef_nodes() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let nodes: Value = get(addr, "/api/integrations/chef/nodes")
        .await
        .json()
        .await
        .unwrap();
    let nodes = nodes.as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0]["run_list"], json!(["role[webserver]"]));
    assert_eq!(nodes[2]["chef_environment"], "_default");
    assert_eq!(nodes[2]["run_list"], json!(["role[base]"]));
}

#[tokio::test]
async fn test_chef_node_lookup() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let node: Value = get(addr, "/api/integrations/chef/nodes/db-01")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(node["json_class"], "Chef::Node");
    assert_eq!(node["chef_environment"], "database");
    assert_eq!(node["automatic"]["ipaddress"], "10.0.0.2");
    assert!(node["automatic"].get("macaddress").is_none());

    let missing = get(addr, "/api/integrations/chef/nodes/nope").await;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "Node nope not found");
}

#[tokio::test]
async fn test_chef_data_bag() {
    let addr = start_gateway(StaticCatalog::new(fixture_assets())).await;

    let items: Value = get(addr, "/api/integrations/chef/data_bags/blokhouse")
        .await
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["web-01", "db-01", "spare", "jump-host"]);

    let item: Value = get(addr, "/api/integrations/chef/data_bags/blokhouse/jump-host")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(
        item,
        json!({
            "id": "jump-host",
            "blokhouse_id": "a4",
            "name": "Jump Host",
            "ip_address": "10.0.0.9",
            "chef_type": "data_bag_item",
            "data_bag": "blokhouse"
        })
    );

    let missing = get(addr, "/api/integrations/chef/data_bags/blokhouse/nope").await;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_failure_is_server_error() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(b"[{\"id\": ").unwrap();

    let addr = start_gateway(FileCatalog::new(file.path())).await;

    let response = get(addr, "/api/integrations/ansible/inventory").await;
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON catalog"));

    // ENC never masks a catalog failure with the default document
    let response = get(addr, "/api/integrations/puppet/enc/web-01").await;
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_file_catalog_is_reread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("assets.yaml");
    let addr = start_gateway(FileCatalog::new(&path)).await;

    let before: Value = get(addr, "/api/integrations/ansible/inventory")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(before["all"]["hosts"], json!([]));

    std::fs::write(
        &path,
        "assets:\n  - id: n1\n    name: new-01\n    ip: 10.9.9.9\n    status: ACTIVE\n",
    )
    .unwrap();

    let after: Value = get(addr, "/api/integrations/ansible/inventory")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(after["all"]["hosts"], json!(["new-01"]));
    assert_eq!(after["ungrouped"]["hosts"], json!(["new-01"]));
}
