//! Session user handler.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::RwLock;

use super::error;
use crate::mock_server::state::MockState;
use crate::SESSION_COOKIE;

/// Value of the session cookie in a `Cookie` header, if any.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// GET /current-user
pub async fn current_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;

    match session_token(&headers).and_then(|token| state.sessions.get(&token)) {
        Some(user) => (StatusCode::OK, Json(user.clone())).into_response(),
        None => error(StatusCode::FORBIDDEN, "No user is logged in."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; PHPSESSID=abc123"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));

        assert_eq!(session_token(&HeaderMap::new()), None);
    }
}
