//! Mock riad backend for forwarder testing
//!
//! Records every request it receives and answers a few API-Platform style routes.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// One request as seen by the backend
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path_and_query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

type Seen = Arc<RwLock<Vec<SeenRequest>>>;

/// Mock backend server
pub struct MockBackend {
    addr: SocketAddr,
    seen: Seen,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock backend on a random port
    pub async fn start() -> Self {
        let seen: Seen = Arc::new(RwLock::new(Vec::new()));

        let app = Router::new()
            .route("/api/{*path}", any(handle_api))
            .with_state(seen.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, seen, handle }
    }

    /// API base URL as the host would be configured with
    pub fn api_base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.seen.read().await.clone()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

async fn handle_api(
    State(seen): State<Seen>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    seen.write().await.push(SeenRequest {
        method: method.clone(),
        path_and_query: uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        authorization: header("authorization"),
        content_type: header("content-type"),
        body: body.to_vec(),
    });

    match (method, uri.path()) {
        (Method::GET, "/api/riads") => (
            StatusCode::OK,
            Json(json!({
                "hydra:member": [{ "@id": "/api/riads/1", "id": 1, "name": "Dar Zitoun" }],
                "hydra:totalItems": 1
            })),
        ),
        (Method::POST, "/api/validate-token") => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "message": "Expired JWT Token" })),
        ),
        (Method::POST, "/api/reservations") => (StatusCode::CREATED, Json(json!({ "id": 7 }))),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "hydra:description": "Not Found" })),
        ),
    }
}
