//! Mock Microsoft Graph contacts endpoint for integration tests.
//!
//! Serves a fixed list of pages at `/contacts`. Page `n` is selected with
//! `?page=n` (absent means page 0) and links to page `n + 1` through
//! `@odata.nextLink` until the last page.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// One request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
}

#[derive(Clone)]
struct MockState {
    base: String,
    pages: Arc<Vec<Vec<Value>>>,
    fail_page: Option<(usize, u16, String)>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockGraph {
    pub base: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockGraph {
    /// URL to configure as `graph.collection_url`.
    pub fn collection_url(&self) -> String {
        format!("{}/contacts", self.base)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a server returning `pages` in order.
pub async fn spawn_graph(pages: Vec<Vec<Value>>) -> MockGraph {
    spawn(pages, None).await
}

/// Start a server that answers page `fail_page` with `status` and `body`.
pub async fn spawn_failing_graph(
    pages: Vec<Vec<Value>>,
    fail_page: usize,
    status: u16,
    body: &str,
) -> MockGraph {
    spawn(pages, Some((fail_page, status, body.to_string()))).await
}

async fn spawn(pages: Vec<Vec<Value>>, fail_page: Option<(usize, u16, String)>) -> MockGraph {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));

    let state = MockState {
        base: base.clone(),
        pages: Arc::new(pages),
        fail_page,
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/contacts", get(contacts))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockGraph { base, requests }
}

async fn contacts(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    state.requests.lock().unwrap().push(Recorded {
        query: query.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if let Some((fail, status, body)) = &state.fail_page {
        if *fail == page {
            let status = StatusCode::from_u16(*status).unwrap();
            return (status, body.clone()).into_response();
        }
    }

    let items = state.pages.get(page).cloned().unwrap_or_default();
    let mut body = json!({ "value": items });
    if page + 1 < state.pages.len() {
        body["@odata.nextLink"] = json!(format!("{}/contacts?page={}", state.base, page + 1));
    }
    Json(body).into_response()
}

pub fn jane() -> Value {
    json!({
        "displayName": "Jane Doe",
        "jobTitle": "Engineer",
        "businessPhones": [],
        "emailAddresses": [{ "address": "jane@example.com", "name": "Jane Doe" }]
    })
}

pub fn empty_contact() -> Value {
    json!({
        "displayName": null,
        "businessPhones": [],
        "emailAddresses": []
    })
}

pub fn named(name: &str) -> Value {
    json!({ "displayName": name })
}
