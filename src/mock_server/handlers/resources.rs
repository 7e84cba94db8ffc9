//! Generic entity resource handlers.
//!
//! Every resource in [`RESOURCES`](crate::mock_server::state::RESOURCES)
//! supports list, get, create, partial update and delete. Handlers learn
//! which resource they serve from the [`Resource`] extension.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use super::error;
use crate::format_date;
use crate::mock_server::fixtures::Fixtures;
use crate::mock_server::state::MockState;

type SharedState = Arc<RwLock<MockState>>;

/// Resource path a nested router serves, attached as a request extension.
#[derive(Debug, Clone, Copy)]
pub struct Resource(pub &'static str);

/// Query parameters that are not field filters.
const PAGING_PARAMS: &[&str] = &["limit", "offset", "order", "direction"];

/// Fields the host rejects a create without.
fn required_fields(resource: &str) -> &'static [&'static str] {
    match resource {
        "clients" => &["firstName", "lastName"],
        "surcharges" => &["name", "price"],
        "payment-plans" => &["clientId", "currencyId", "provider", "amount", "period"],
        _ => &[],
    }
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Entity not found.")
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// GET /{resource}
///
/// Filters on any top-level field; `limit`, `offset` and `direction`
/// page and order by ID.
pub async fn list_entities(
    State(state): State<SharedState>,
    Extension(Resource(resource)): Extension<Resource>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let state = state.read().await;

    let filters: Vec<(String, String)> = params
        .iter()
        .filter(|(key, _)| !PAGING_PARAMS.contains(&key.as_str()))
        .cloned()
        .collect();

    let mut items: Vec<Value> = state
        .list(resource, &filters)
        .into_iter()
        .cloned()
        .collect();

    if param(&params, "direction").is_some_and(|d| d.eq_ignore_ascii_case("desc")) {
        items.reverse();
    }

    let offset = param(&params, "offset")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let limit = param(&params, "limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(usize::MAX);

    let page: Vec<Value> = items.into_iter().skip(offset).take(limit).collect();
    (StatusCode::OK, Json(Value::Array(page))).into_response()
}

/// GET /{resource}/{id}
pub async fn get_entity(
    State(state): State<SharedState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<i64>,
) -> Response {
    let state = state.read().await;

    match state.get(resource, id) {
        Some(entity) => (StatusCode::OK, Json(entity.clone())).into_response(),
        None => not_found(),
    }
}

/// POST /{resource}
pub async fn create_entity(
    State(state): State<SharedState>,
    Extension(Resource(resource)): Extension<Resource>,
    Json(body): Json<Value>,
) -> Response {
    let Value::Object(fields) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object.");
    };

    let missing: Map<String, Value> = required_fields(resource)
        .iter()
        .filter(|name| fields.get(**name).map_or(true, Value::is_null))
        .map(|name| (name.to_string(), json!(["This value should not be blank."])))
        .collect();
    if !missing.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"code": 422, "message": "Validation failed.", "errors": missing})),
        )
            .into_response();
    }

    let mut state = state.write().await;
    match state.create(resource, fields, Fixtures::computed_fields(resource)) {
        Some(entity) => (StatusCode::CREATED, Json(entity.clone())).into_response(),
        None => not_found(),
    }
}

/// PATCH /{resource}/{id}
pub async fn update_entity(
    State(state): State<SharedState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let Value::Object(changes) = body else {
        return error(StatusCode::BAD_REQUEST, "Expected a JSON object.");
    };

    let mut state = state.write().await;
    match state.update(resource, id, changes) {
        Some(entity) => (StatusCode::OK, Json(entity.clone())).into_response(),
        None => not_found(),
    }
}

/// DELETE /{resource}/{id}
///
/// The host answers a delete with an empty body.
pub async fn delete_entity(
    State(state): State<SharedState>,
    Extension(Resource(resource)): Extension<Resource>,
    Path(id): Path<i64>,
) -> Response {
    let mut state = state.write().await;
    match state.remove(resource, id) {
        Some(_) => StatusCode::OK.into_response(),
        None => not_found(),
    }
}

/// PATCH /payment-plans/{id}/cancel
pub async fn cancel_payment_plan(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Response {
    let mut state = state.write().await;

    let changes = json!({
        "status": "cancelled",
        "canceledDate": format_date(&Utc::now()),
        "nextPaymentDate": null
    });
    let Value::Object(changes) = changes else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid cancel payload.");
    };

    match state.update("payment-plans", id, changes) {
        Some(plan) => (StatusCode::OK, Json(plan.clone())).into_response(),
        None => not_found(),
    }
}
