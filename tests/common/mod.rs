//! Fake record-store API shared by the integration tests.
//!
//! Serves the five endpoints Shepherd queries with canned data keyed on
//! the `where[...]` filter value, and answers 403 to any request that does
//! not carry the test credentials.

#![allow(dead_code)]

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const APP_ID: &str = "test-app";
pub const SECRET: &str = "test-secret";
const EXPECTED_AUTH: &str = "Basic dGVzdC1hcHA6dGVzdC1zZWNyZXQ=";

pub const GATHERING_TYPES: [&str; 6] = [
    "Sunday Morning",
    "Sunday Evening",
    "Youth Night",
    "Choir Rehearsal",
    "Prayer Meeting",
    "Men's Breakfast",
];

type Params = Query<HashMap<String, String>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(EXPECTED_AUTH)
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "errors": [{ "status": "403", "title": "Forbidden" }] })),
    )
        .into_response()
}

fn data(items: Vec<Value>) -> Response {
    Json(json!({ "data": items })).into_response()
}

fn named(kind: &str, name: &str) -> Value {
    json!({ "type": kind, "id": "1", "attributes": { "name": name } })
}

async fn org(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    Json(json!({
        "data": { "type": "Organization", "id": "42", "attributes": { "name": "Grace Chapel" } }
    }))
    .into_response()
}

async fn people(headers: HeaderMap, Query(q): Params) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    let term = q
        .get("where[search_name_or_email]")
        .map(String::as_str)
        .unwrap_or("");
    match term {
        "Ann Lee" => data(vec![json!({
            "type": "Person",
            "id": "7",
            "attributes": { "name": "Ann Lee", "status": "active" }
        })]),
        "Alex" => data(vec![json!({
            "type": "Person",
            "id": "8",
            "attributes": { "name": "Alex Mills", "status": "inactive" }
        })]),
        "Nameless Person" => data(vec![json!({ "type": "Person", "id": "9" })]),
        "Ann" => data(vec![
            json!({
                "type": "Person",
                "id": "7",
                "attributes": { "name": "Ann Lee", "status": "active" }
            }),
            json!({ "type": "Person", "id": "10", "attributes": null }),
        ]),
        _ => data(vec![]),
    }
}

async fn service_types(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    data(
        GATHERING_TYPES
            .iter()
            .map(|n| named("ServiceType", n))
            .collect(),
    )
}

async fn events(headers: HeaderMap, Query(q): Params) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    match q.get("where[name]").map(String::as_str).unwrap_or("") {
        "Easter Brunch" => data(vec![named("Event", "Easter Brunch")]),
        "Broken Event" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "Slow Event" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            data(vec![])
        }
        _ => data(vec![]),
    }
}

async fn groups(headers: HeaderMap, Query(q): Params) -> Response {
    if !authorized(&headers) {
        return forbidden();
    }
    match q.get("where[name]").map(String::as_str).unwrap_or("") {
        "Easter Brunch" => data(vec![named("Group", "Easter Brunch Team")]),
        "Broken Event" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => data(vec![]),
    }
}

/// Start the fake API on an ephemeral port.
pub async fn spawn_fake_api() -> SocketAddr {
    let app = Router::new()
        .route("/", get(org))
        .route("/people/v2/people", get(people))
        .route("/services/v2/service_types", get(service_types))
        .route("/calendar/v2/events", get(events))
        .route("/groups/v2/groups", get(groups));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

/// Reserve a free local port.
pub fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Write a config pointing at `base_url`, with credentials read from the
/// given environment variable names.
pub fn write_config(tmp: &TempDir, base_url: &str, app_id_env: &str, secret_env: &str) -> PathBuf {
    write_config_with(tmp, base_url, app_id_env, secret_env, "")
}

pub fn write_config_with(
    tmp: &TempDir,
    base_url: &str,
    app_id_env: &str,
    secret_env: &str,
    extra: &str,
) -> PathBuf {
    let content = format!(
        r#"[backend]
base_url = "{}"
timeout_secs = 1
app_id_env = "{}"
secret_env = "{}"

[server]
bind = "127.0.0.1:{}"

{}
"#,
        base_url,
        app_id_env,
        secret_env,
        find_free_port(),
        extra
    );
    let path = tmp.path().join("shepherd.toml");
    fs::write(&path, content).unwrap();
    path
}
