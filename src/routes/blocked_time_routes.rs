// src/routes/blocked_time_routes.rs

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{AppState, BlockedTime, BlockedTimeFields},
    routes::appointment_routes::{ApiOk, OkData},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blocked-times", get(list_blocked_times))
        .route("/blocked-times", put(upsert_blocked_time))
        .route("/blocked-times/{blocked_time_id}", delete(delete_blocked_time))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub async fn list_blocked_times(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<Vec<BlockedTime>>>, ApiError> {
    if q.end < q.start {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "end must not precede start".into(),
        ));
    }

    let rows = state.store.list_blocked_times(q.start, q.end).await?;
    Ok(Json(ApiOk { data: rows }))
}

/// PUT creates when `blocked_time_id` is absent, updates when present.
pub async fn upsert_blocked_time(
    State(state): State<AppState>,
    Json(req): Json<BlockedTimeFields>,
) -> Result<Json<ApiOk<BlockedTime>>, ApiError> {
    let row = state.store.upsert_blocked_time(req).await?;
    tracing::info!(blocked_time_id = %row.blocked_time_id, "blocked time upserted");
    Ok(Json(ApiOk { data: row }))
}

pub async fn delete_blocked_time(
    State(state): State<AppState>,
    Path(blocked_time_id): Path<Uuid>,
) -> Result<Json<ApiOk<OkData>>, ApiError> {
    state.store.delete_blocked_time(blocked_time_id).await?;
    Ok(Json(ApiOk { data: OkData { ok: true } }))
}
