use crate::api::api_error::APIError;
use crate::api::model::{DeleteParams, UpsertBatch};
use crate::api::server::AppState;
use crate::registry::canonical_name;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const API_TIMEOUT: Duration = Duration::from_secs(10);

pub(super) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(health_check))
        .route(
            "/api",
            get(read_table)
                .post(add_entries)
                .patch(update_entries)
                .delete(delete_entries),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(API_TIMEOUT))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

async fn read_table(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.snapshot().await)
}

async fn add_entries(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Map<String, Value>>, APIError>,
) -> Result<StatusCode, APIError> {
    let batch = UpsertBatch::try_from(payload)?;
    tracing::info!("adding {} domain entries", batch.0.len());
    state.registry.merge(batch.0).await;
    Ok(StatusCode::CREATED)
}

async fn update_entries(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Map<String, Value>>, APIError>,
) -> Result<StatusCode, APIError> {
    let batch = UpsertBatch::try_from(payload)?;
    // Entries are applied in document order up to the first unknown name;
    // those stay applied even when the batch reports not-found.
    state.registry.update_existing(batch.0).await?;
    Ok(StatusCode::OK)
}

async fn delete_entries(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let domain = params
        .domain
        .as_deref()
        .map(|domain| canonical_name(domain).to_string());
    let address = params.address;

    // OR semantics: an entry goes away when its name matches the domain
    // parameter or its value matches the address parameter. Deleting nothing
    // is not an error.
    let removed = state
        .registry
        .remove_matching(|name, bound| {
            domain.as_deref() == Some(name) || address.as_deref() == Some(bound)
        })
        .await;
    tracing::info!("deleted {removed} domain entries");
    StatusCode::OK
}
