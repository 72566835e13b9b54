//! `/api` forwarder.
//!
//! The browser only ever talks to this host; requests under `/api` are replayed
//! against `api_base_url` with method, query, auth and body intact. This keeps the
//! password-reset cookie same-origin and removes the need for backend CORS.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use super::AppState;

/// Request headers passed through to the backend
const FORWARDED_REQUEST_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::COOKIE,
];

/// Response headers passed back to the browser
const FORWARDED_RESPONSE_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::SET_COOKIE];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Backend unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Invalid backend response: {0}")]
    Response(#[from] axum::http::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!("API forward failed: {}", self);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}

/// Backend URL for a request that arrived at `/api...`
pub fn upstream_url(api_base_url: &str, uri: &Uri) -> String {
    let rest = uri.path().strip_prefix("/api").unwrap_or(uri.path());
    let mut url = format!("{}{}", api_base_url.trim_end_matches('/'), rest);
    if let Some(query) = uri.query() {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// ANY /api/{*path}
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&state.config.api_base_url, &uri);
    tracing::debug!("Forwarding {} {}", method, url);

    let mut request = state.http.request(method, &url);
    for name in FORWARDED_REQUEST_HEADERS {
        for value in headers.get_all(&name) {
            request = request.header(&name, value);
        }
    }
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request.send().await?;
    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let bytes = upstream.bytes().await?;

    if status.is_server_error() {
        tracing::warn!("Backend returned {} for {}", status, url);
    }

    let mut response = Response::builder().status(status);
    for name in FORWARDED_RESPONSE_HEADERS {
        for value in upstream_headers.get_all(&name) {
            response = response.header(&name, value);
        }
    }
    Ok(response.body(axum::body::Body::from(bytes))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_api_prefix_and_keeps_query() {
        let uri: Uri = "/api/riads/3?page=2".parse().unwrap();
        assert_eq!(
            upstream_url("http://localhost:8000/api/", &uri),
            "http://localhost:8000/api/riads/3?page=2"
        );
    }

    #[test]
    fn bare_api_path_maps_to_base() {
        let uri: Uri = "/api".parse().unwrap();
        assert_eq!(
            upstream_url("http://backend/api", &uri),
            "http://backend/api"
        );
    }
}
