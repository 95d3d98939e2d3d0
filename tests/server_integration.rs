//! HTTP API tests: the Shepherd server running against the fake record
//! store, and against an in-memory scripted backend.

mod common;

use common::{find_free_port, spawn_fake_api, write_config, APP_ID, SECRET};
use serde_json::{json, Value};
use shepherd::client::HttpBackend;
use shepherd::config::{load_config, Config, Credentials};
use shepherd::server::run_server_with_backend;
use shepherd_core::backend::memory::ScriptedBackend;
use shepherd_core::backend::Backend;
use shepherd_core::models::BackendOutcome;
use shepherd_core::sources::{PEOPLE_ENDPOINT, PERMISSION_DENIED_FRAGMENT};
use std::sync::Arc;
use tempfile::TempDir;

fn server_config(tmp: &TempDir, base_url: &str) -> Config {
    let path = write_config(
        tmp,
        base_url,
        "SHEPHERD_IT_SERVER_APP_ID",
        "SHEPHERD_IT_SERVER_SECRET",
    );
    let mut cfg = load_config(&path).unwrap();
    cfg.server.bind = format!("127.0.0.1:{}", find_free_port());
    cfg
}

/// Start the server and wait until `/health` answers.
async fn start_server(cfg: Config, backend: Arc<dyn Backend>) -> String {
    let base = format!("http://{}", cfg.server.bind);
    tokio::spawn(async move {
        run_server_with_backend(&cfg, backend).await.ok();
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(format!("{}/health", base)).send().await {
            if resp.status().is_success() {
                return base;
            }
        }
    }
    panic!("server did not start on {}", base);
}

#[tokio::test]
async fn test_search_endpoint_against_record_store() {
    let addr = spawn_fake_api().await;
    let tmp = TempDir::new().unwrap();
    let cfg = server_config(&tmp, &format!("http://{}", addr));
    let backend = HttpBackend::new(&cfg.backend, Credentials::new(APP_ID, SECRET)).unwrap();
    let base = start_server(cfg, Arc::new(backend)).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/search", base))
        .json(&json!({ "query": "Ann Lee" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert!(body["context"]
        .as_str()
        .unwrap()
        .starts_with("Found in People Directory: Ann Lee (active)"));
    assert!(body["diagnostics"]
        .as_str()
        .unwrap()
        .starts_with("🏢 Connected to Organization: **Grace Chapel**"));
    assert_eq!(body["people_found"], true);
}

#[tokio::test]
async fn test_search_endpoint_can_hide_diagnostics() {
    let tmp = TempDir::new().unwrap();
    let cfg = server_config(&tmp, "http://127.0.0.1:1");
    let backend = ScriptedBackend::new().respond_any(PEOPLE_ENDPOINT, BackendOutcome::AuthDenied);
    let base = start_server(cfg, Arc::new(backend)).await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({ "query": "Ann", "include_diagnostics": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["context"], PERMISSION_DENIED_FRAGMENT);
    assert!(body["diagnostics"].is_null());
    assert_eq!(body["people_found"], false);
}

#[tokio::test]
async fn test_search_endpoint_rejects_empty_query() {
    let tmp = TempDir::new().unwrap();
    let cfg = server_config(&tmp, "http://127.0.0.1:1");
    let base = start_server(cfg, Arc::new(ScriptedBackend::new())).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/search", base))
        .json(&json!({ "query": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "query must not be empty");
}

#[tokio::test]
async fn test_sources_and_health_endpoints() {
    let tmp = TempDir::new().unwrap();
    let cfg = server_config(&tmp, "http://127.0.0.1:1");
    let base = start_server(cfg, Arc::new(ScriptedBackend::new())).await;
    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));

    let body: Value = client
        .get(format!("{}/sources", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let kinds: Vec<&str> = body["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["organization", "people", "gatherings", "calendar", "groups"]
    );
}
