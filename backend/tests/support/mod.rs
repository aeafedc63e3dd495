#![allow(dead_code)]

// In-process STAC and CMR catalogs served by axum on ephemeral ports.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Json, Router, extract::Query, routing::get};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const CORE: &str = "https://api.stacspec.org/v1.0.0-beta.1/core";
pub const COLLECTION_SEARCH: &str = "https://api.stacspec.org/v1.0.0-rc.1/collection-search";

pub type RecordedQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

pub struct MockCatalog {
    pub base_url: String,
    pub queries: RecordedQueries,
}

impl MockCatalog {
    pub fn recorded(&self) -> Vec<HashMap<String, String>> {
        self.queries.lock().unwrap().clone()
    }
}

/// Serves `router` on 127.0.0.1 and returns its address as `http://127.0.0.1:<port>`.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn collection(id: &str, description: &str, bbox: [f64; 4], interval: [Option<&str>; 2]) -> Value {
    json!({
        "stac_version": "1.0.0",
        "id": id,
        "type": "Collection",
        "description": description,
        "license": "proprietary",
        "extent": {
            "spatial": {"bbox": [bbox]},
            "temporal": {"interval": [interval]}
        },
        "links": []
    })
}

const GLOBE: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

pub fn stac1_collections() -> Vec<Value> {
    vec![
        collection("collection-1", "A really awesome STAC collection for testing", GLOBE, [Some("2020-01-01T00:00:00Z"), None]),
        collection("collection-2", "Another awesome STAC collection for testing", GLOBE, [Some("2021-01-01T00:00:00Z"), None]),
    ]
}

pub fn stac2_collections() -> Vec<Value> {
    vec![
        collection(
            "collection-3",
            "An appropriate STAC collection for testing",
            GLOBE,
            [Some("2020-01-01T00:00:00Z"), Some("2020-12-31T23:59:59Z")],
        ),
        collection(
            "collection-4",
            "Another appropriate STAC collection for testing",
            [-120.0, 40.0, -110.0, 50.0],
            [Some("2024-01-01T00:00:00Z"), None],
        ),
    ]
}

/// A STAC API whose collection listing is split over `pages`, linked with `rel="next"`.
pub async fn spawn_stac(conforms_to: &[&str], pages: Vec<Vec<Value>>) -> MockCatalog {
    let queries = RecordedQueries::default();
    let conforms_to = conforms_to.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    let pages = Arc::new(pages);

    let recorder = queries.clone();
    let router = Router::new()
        .route(
            "/",
            get(move || async move {
                Json(json!({
                    "type": "Catalog",
                    "stac_version": "1.0.0",
                    "id": "root-catalog",
                    "description": "Root catalog",
                    "links": [
                        {"rel": "self", "href": "./"},
                        {"rel": "data", "href": "./collections"}
                    ],
                    "conformsTo": conforms_to,
                }))
            }),
        )
        .route(
            "/collections",
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                recorder.lock().unwrap().push(params.clone());
                let page = params.get("page").and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
                let collections = pages.get(page).cloned().unwrap_or_default();
                let mut links = vec![];
                if page + 1 < pages.len() {
                    links.push(json!({"rel": "next", "href": format!("collections?page={}", page + 1)}));
                }
                Json(json!({"collections": collections, "links": links}))
            }),
        );

    MockCatalog { base_url: serve(router).await, queries }
}

/// A STAC API whose root document takes `delay` to answer.
pub async fn spawn_slow_stac(delay: Duration) -> MockCatalog {
    let router = Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"type": "Catalog", "id": "slow", "links": [], "conformsTo": [CORE]}))
        }),
    );
    MockCatalog { base_url: serve(router).await, queries: RecordedQueries::default() }
}

pub fn cmr_entry(id: &str, short_name: &str, title: &str, summary: &str) -> Value {
    json!({
        "id": id,
        "short_name": short_name,
        "version_id": "1",
        "title": title,
        "summary": summary,
        "data_center": "PODAAC",
        "boxes": ["-90 -180 90 180"],
        "time_start": "2000-01-01T00:00:00.000Z"
    })
}

/// A CMR search endpoint, base URL ending in `/search/`. A keyword search returns the entries
/// whose title or summary contains every keyword term.
pub async fn spawn_cmr(entries: Vec<Value>) -> MockCatalog {
    let queries = RecordedQueries::default();
    let recorder = queries.clone();
    let entries = Arc::new(entries);

    let router = Router::new().route(
        "/search/collections.json",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            recorder.lock().unwrap().push(params.clone());
            let hits = entries.len().to_string();
            if params.get("page_size").map(String::as_str) == Some("0") {
                return ([("CMR-Hits", hits)], Json(json!({"feed": {"entry": []}})));
            }
            let terms = params
                .get("keyword")
                .map(|k| k.replace('"', "").to_lowercase())
                .unwrap_or_default();
            let matching = entries
                .iter()
                .filter(|entry| {
                    let text = format!("{} {}", entry["title"], entry["summary"]).to_lowercase();
                    terms.split_whitespace().all(|term| text.contains(term))
                })
                .cloned()
                .collect::<Vec<_>>();
            ([("CMR-Hits", hits)], Json(json!({"feed": {"entry": matching}})))
        }),
    );

    MockCatalog { base_url: format!("{}/search/", serve(router).await), queries }
}
