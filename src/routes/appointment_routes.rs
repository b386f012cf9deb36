// src/routes/appointment_routes.rs

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        Appointment, AppointmentPatch, AppointmentStatus, AppState, NewAppointment,
    },
    schedule::dragdrop::{DropZone, RescheduleProposal},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments", post(create_appointment))
        .route("/appointments/{appointment_id}", get(get_appointment))
        .route("/appointments/{appointment_id}", patch(patch_appointment))
        .route("/appointments/{appointment_id}", delete(delete_appointment))
        .route("/appointments/{appointment_id}/status", post(set_status))
        .route("/appointments/{appointment_id}/reschedule", post(reschedule))
}

/* ============================================================
   Response DTOs
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct OkData {
    pub ok: bool,
}

/* ============================================================
   GET /appointments?start=&end=&status=
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: Option<AppointmentStatus>,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<Vec<Appointment>>>, ApiError> {
    if q.end < q.start {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "end must not precede start".into(),
        ));
    }

    let rows = state.store.list_appointments(q.start, q.end, q.status).await?;
    Ok(Json(ApiOk { data: rows }))
}

/* ============================================================
   GET /appointments/{id}
   ============================================================ */

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let row = state.store.get_appointment(appointment_id).await?;
    Ok(Json(ApiOk { data: row }))
}

/* ============================================================
   POST /appointments (create)
   ============================================================ */

pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<NewAppointment>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let row = state.store.create_appointment(req).await?;
    tracing::info!(appointment_id = %row.appointment_id, "appointment created");
    Ok(Json(ApiOk { data: row }))
}

/* ============================================================
   PATCH /appointments/{id}
   ============================================================ */

pub async fn patch_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<AppointmentPatch>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let row = state.store.update_appointment(appointment_id, req).await?;
    Ok(Json(ApiOk { data: row }))
}

/* ============================================================
   DELETE /appointments/{id}
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<ApiOk<OkData>>, ApiError> {
    state.store.delete_appointment(appointment_id).await?;
    tracing::info!(%appointment_id, "appointment deleted");
    Ok(Json(ApiOk { data: OkData { ok: true } }))
}

/* ============================================================
   POST /appointments/{id}/status
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: AppointmentStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<ApiOk<Appointment>>, ApiError> {
    let row = state
        .store
        .update_appointment(appointment_id, AppointmentPatch::status(req.status))
        .await?;
    Ok(Json(ApiOk { data: row }))
}

/* ============================================================
   POST /appointments/{id}/reschedule

   The body carries the drop-zone key the card was released on. The original
   duration is preserved; only date/start/end change. Confirmation happens
   client-side before this call, so a reaching request is already confirmed.
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub target_zone: String,
}

#[derive(Debug, Serialize)]
pub struct RescheduleResponse {
    pub proposal: RescheduleProposal,
    pub appointment: Appointment,
}

pub async fn reschedule(
    State(state): State<AppState>,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> Result<Json<ApiOk<RescheduleResponse>>, ApiError> {
    // Unlike an in-grid drop (silent no-op), a malformed key at the API
    // boundary is a caller bug and gets a structured 400.
    let zone = DropZone::parse(&req.target_zone)
        .ok_or_else(|| ApiError::invalid_drop_zone(&req.target_zone))?;

    let current = state.store.get_appointment(appointment_id).await?;
    let proposal = RescheduleProposal::build(&current, &zone).ok_or_else(|| {
        ApiError::BadRequest(
            "VALIDATION_ERROR",
            "rescheduled appointment would run past midnight".into(),
        )
    })?;

    let appointment = proposal.commit(state.store.as_ref()).await?;
    tracing::info!(
        %appointment_id,
        from = %format!("{} {}", proposal.old_date, proposal.old_start),
        to = %format!("{} {}", proposal.new_date, proposal.new_start),
        "appointment rescheduled"
    );

    Ok(Json(ApiOk {
        data: RescheduleResponse { proposal, appointment },
    }))
}
