//! REST API integration tests over the in-process router.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::fake_providers::FakeProviders;
use hobbydeck::services::discovery::DiscoveryService;
use hobbydeck::services::youtube::YoutubeSearchClient;
use hobbydeck::store::persist::PanelRepository;
use hobbydeck::store::service::PanelService;
use hobbydeck::store::{MSG_DUPLICATE_TERM, MSG_TITLE_REQUIRED};
use hobbydeck::{build_router, AppState};

async fn memory_repository() -> PanelRepository {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    PanelRepository::from_pool(pool).await.unwrap()
}

/// Router wired to the fake providers (YouTube only), already hydrated.
async fn test_app(api: &FakeProviders) -> Router {
    let youtube = YoutubeSearchClient::with_base_url("y-key".into(), api.youtube_url()).unwrap();
    let discovery = Arc::new(DiscoveryService::new(None, Some(youtube)));
    let panels = Arc::new(PanelService::new(discovery.clone(), memory_repository().await));
    let pending = panels.hydrate().await;
    panels.reconcile(pending).await;
    build_router(AppState::new(panels, discovery))
}

/// Router with no provider credentials at all.
async fn unconfigured_app() -> Router {
    let discovery = Arc::new(DiscoveryService::new(None, None));
    let panels = Arc::new(PanelService::new(discovery.clone(), memory_repository().await));
    panels.hydrate().await;
    build_router(AppState::new(panels, discovery))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_module_and_status() {
    let app = unconfigured_app().await;
    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "hobbydeck");
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn create_panel_then_list_shows_search_results() {
    let api = FakeProviders::start().await.unwrap();
    api.seed_youtube("nike", 2).await;
    let app = test_app(&api).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/panels",
            json!({"title": "Shoes", "labels": "Nike, Adidas"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let panel = json_body(response).await;
    assert_eq!(panel["title"], "Shoes");
    assert_eq!(panel["activeTerm"], "Nike");
    assert_eq!(panel["searchTerms"], json!(["Nike", "Adidas"]));
    assert_eq!(panel["sortOrder"], "relevance");
    assert_eq!(panel["searchMode"], "categoryPlusLabel");
    assert_eq!(panel["items"].as_array().unwrap().len(), 2);
    assert_eq!(panel["searched"], true);
    assert_eq!(panel["loading"], false);

    let response = app.oneshot(get_request("/api/panels")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["storageReady"], true);
    assert_eq!(body["panels"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_title_is_rejected_with_inline_message() {
    let api = FakeProviders::start().await.unwrap();
    let app = test_app(&api).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/panels",
            json!({"title": "   ", "labels": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], MSG_TITLE_REQUIRED);
}

#[tokio::test]
async fn duplicate_term_is_rejected_with_inline_message() {
    let api = FakeProviders::start().await.unwrap();
    api.seed_youtube("nike", 1).await;
    let app = test_app(&api).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/panels",
            json!({"title": "Shoes", "labels": "Nike"}),
        ))
        .await
        .unwrap();
    let panel = json_body(response).await;
    let id = panel["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/panels/{id}/terms"),
            json!({"term": " NIKE "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], MSG_DUPLICATE_TERM);
}

#[tokio::test]
async fn unknown_panel_is_not_found() {
    let api = FakeProviders::start().await.unwrap();
    let app = test_app(&api).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/panels/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/panels/ghost/active-term",
            json!({"term": "Nike"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn delete_panel_returns_no_content() {
    let api = FakeProviders::start().await.unwrap();
    let app = test_app(&api).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/panels",
            json!({"title": "Shoes", "labels": ""}),
        ))
        .await
        .unwrap();
    let panel = json_body(response).await;
    let id = panel["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/panels/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get_request("/api/panels")).await.unwrap();
    let body = json_body(response).await;
    assert!(body["panels"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reorder_returns_the_new_sequence() {
    let api = FakeProviders::start().await.unwrap();
    let app = test_app(&api).await;

    let mut ids = Vec::new();
    for title in ["A", "B", "C"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/panels",
                json!({"title": title, "labels": ""}),
            ))
            .await
            .unwrap();
        let panel = json_body(response).await;
        ids.push(panel["id"].as_str().unwrap().to_string());
    }

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/panels/reorder",
            json!({"activeId": ids[2], "overId": ids[0]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["C", "A", "B"]);
}

#[tokio::test]
async fn discovery_without_credentials_is_service_unavailable() {
    let app = unconfigured_app().await;
    let response = app.oneshot(get_request("/api/discovery")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn discovery_returns_three_fixed_categories() {
    let api = FakeProviders::start().await.unwrap();
    api.seed_youtube("hobby", 2).await;
    let app = test_app(&api).await;

    let response = app
        .oneshot(get_request("/api/discovery?limit=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 3);
    let keys: Vec<_> = categories
        .iter()
        .map(|c| c["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["knitting", "bracelet", "fitness"]);
    // Google is unconfigured here, so the call-wide warning is present.
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
}
