//! Fake search-provider server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /customsearch/v1` — canned Google Custom Search payload
//! - `GET /youtube/v3/search` — canned YouTube Data API payload
//!
//! The provider clients accept a configurable base URL so they can be
//! pointed at this server. Every request's query parameters are recorded
//! for assertions, and either provider can be toggled to fail with a 500.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct ProvidersState {
    google_requests: Vec<HashMap<String, String>>,
    youtube_requests: Vec<HashMap<String, String>>,
    google_failing: bool,
    youtube_failing: bool,
    google_payload: serde_json::Value,
    youtube_payload: serde_json::Value,
}

/// Handle to the running fake provider server.
pub struct FakeProviders {
    addr: SocketAddr,
    state: Arc<Mutex<ProvidersState>>,
}

impl FakeProviders {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ProvidersState {
            google_payload: serde_json::json!({ "items": [] }),
            youtube_payload: serde_json::json!({ "items": [] }),
            ..ProvidersState::default()
        }));

        let app = Router::new()
            .route("/customsearch/v1", get(google_search))
            .route("/youtube/v3/search", get(youtube_search))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the task a moment to register.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        Ok(Self { addr, state })
    }

    /// Base URL for the Google Custom Search endpoint.
    pub fn google_url(&self) -> String {
        format!("http://{}/customsearch/v1", self.addr)
    }

    /// Base URL for the YouTube search endpoint.
    pub fn youtube_url(&self) -> String {
        format!("http://{}/youtube/v3/search", self.addr)
    }

    /// Canned Google payload: `count` items named after `query`.
    pub async fn seed_google(&self, query: &str, count: usize) {
        let items: Vec<_> = (0..count)
            .map(|n| {
                serde_json::json!({
                    "title": format!("{query} article {n}"),
                    "link": format!("https://blog.example/{query}/{n}"),
                    "snippet": format!("about {query}"),
                    "pagemap": { "cse_image": [{ "src": "https://img.example/g.png" }] }
                })
            })
            .collect();
        self.state.lock().await.google_payload = serde_json::json!({ "items": items });
    }

    /// Canned YouTube payload: `count` videos named after `query`.
    pub async fn seed_youtube(&self, query: &str, count: usize) {
        let items: Vec<_> = (0..count)
            .map(|n| {
                serde_json::json!({
                    "id": { "kind": "youtube#video", "videoId": format!("vid-{query}-{n}") },
                    "snippet": {
                        "title": format!("{query} video {n}"),
                        "description": format!("about {query}"),
                        "publishedAt": "2024-01-01T00:00:00Z",
                        "thumbnails": {
                            "default": { "url": "https://img.example/d.jpg" },
                            "high": { "url": "https://img.example/h.jpg" }
                        }
                    }
                })
            })
            .collect();
        self.state.lock().await.youtube_payload = serde_json::json!({ "items": items });
    }

    pub async fn fail_google(&self, failing: bool) {
        self.state.lock().await.google_failing = failing;
    }

    pub async fn fail_youtube(&self, failing: bool) {
        self.state.lock().await.youtube_failing = failing;
    }

    /// Number of Google requests received so far.
    pub async fn google_hits(&self) -> usize {
        self.state.lock().await.google_requests.len()
    }

    /// Number of YouTube requests received so far.
    pub async fn youtube_hits(&self) -> usize {
        self.state.lock().await.youtube_requests.len()
    }

    /// Named parameter of the most recent YouTube request.
    pub async fn last_youtube_param(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .youtube_requests
            .last()
            .and_then(|params| params.get(name).cloned())
    }

    /// Named parameter of the most recent Google request.
    pub async fn last_google_param(&self, name: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .google_requests
            .last()
            .and_then(|params| params.get(name).cloned())
    }

    /// `q` parameters of every YouTube request, in arrival order.
    pub async fn youtube_queries(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .youtube_requests
            .iter()
            .filter_map(|params| params.get("q").cloned())
            .collect()
    }
}

async fn google_search(
    State(state): State<Arc<Mutex<ProvidersState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.google_requests.push(params);
    if state.google_failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": { "code": 500 } })),
        );
    }
    (StatusCode::OK, Json(state.google_payload.clone()))
}

async fn youtube_search(
    State(state): State<Arc<Mutex<ProvidersState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut state = state.lock().await;
    state.youtube_requests.push(params);
    if state.youtube_failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": { "code": 500 } })),
        );
    }
    (StatusCode::OK, Json(state.youtube_payload.clone()))
}
