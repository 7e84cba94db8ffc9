//! Request logging and app key check for the mock server.

use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use super::handlers::error;
use super::state::{MockState, RecordedRequest};
use crate::APP_KEY_HEADER;

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record every request, then reject it unless it carries the required
/// app key. `/health` is always let through.
pub async fn record_and_authorize(
    State(state): State<Arc<RwLock<MockState>>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = body::to_bytes(body, usize::MAX).await else {
        return error(StatusCode::BAD_REQUEST, "Unreadable request body.");
    };

    let app_key = header_value(&parts.headers, APP_KEY_HEADER);
    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        app_key: app_key.clone(),
        cookie: header_value(&parts.headers, header::COOKIE.as_str()),
        body: serde_json::from_slice(&bytes).ok(),
    };

    let authorized = {
        let mut state = state.write().await;
        state.requests.push(recorded);
        match &state.required_app_key {
            Some(required) => app_key.as_deref() == Some(required.as_str()),
            None => true,
        }
    };

    if !authorized && parts.uri.path() != "/health" {
        return error(StatusCode::UNAUTHORIZED, "Invalid app key.");
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
