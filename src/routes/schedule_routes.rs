// src/routes/schedule_routes.rs

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    models::{Appointment, AppointmentStatus, AppState, BlockedTime},
    routes::appointment_routes::ApiOk,
    schedule::{
        indicator,
        layout::{self, CardLayout},
        search,
        slots::{self, TimeSlot},
        view::ViewMode,
    },
};

/// How far ahead of today the search window reaches.
const SEARCH_WINDOW_DAYS: u64 = 90;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schedule/grid", get(get_grid))
        .route("/schedule/search", get(search_appointments))
}

/* ============================================================
   GET /schedule/grid?mode=&anchor=

   One column per view-mode date: the 24 display slots, the card geometry
   for every appointment of the day, and the current-time marker offset on
   today's column only.
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub mode: ViewMode,
    pub anchor: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    pub cards: Vec<CardLayout>,
    pub appointments: Vec<Appointment>,
    pub blocked_times: Vec<BlockedTime>,
    pub now_px: Option<f64>,
}

/// Label/color of one status, for the calendar legend and status pickers.
#[derive(Debug, Serialize)]
pub struct StatusLegend {
    pub status: AppointmentStatus,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub legend: Vec<StatusLegend>,
    pub columns: Vec<DayColumn>,
}

pub async fn get_grid(
    State(state): State<AppState>,
    Query(q): Query<GridQuery>,
) -> Result<Json<ApiOk<GridResponse>>, ApiError> {
    let (start, end) = q.mode.date_range(q.anchor);

    let appointments = state.store.list_appointments(start, end, None).await?;
    let blocked_times = state.store.list_blocked_times(start, end).await?;
    let now = Local::now().naive_local();

    let mut columns = Vec::new();
    for date in q.mode.column_dates(q.anchor) {
        let day_appointments: Vec<Appointment> =
            appointments.iter().filter(|a| a.date == date).cloned().collect();
        let day_blocked: Vec<BlockedTime> =
            blocked_times.iter().filter(|b| b.date == date).cloned().collect();

        let cards = layout::layout_day(&day_appointments)
            .map_err(|e| ApiError::Internal(format!("stored time corrupt: {e}")))?;
        let slots = slots::build_day_slots(date, &day_appointments, &day_blocked)
            .map_err(|e| ApiError::Internal(format!("stored time corrupt: {e}")))?;

        columns.push(DayColumn {
            date,
            slots,
            cards,
            appointments: day_appointments,
            blocked_times: day_blocked,
            now_px: indicator::indicator_offset(now, date),
        });
    }

    let legend = AppointmentStatus::ALL
        .into_iter()
        .map(|status| StatusLegend {
            status,
            label: status.label(),
            color: status.color(),
        })
        .collect();

    Ok(Json(ApiOk {
        data: GridResponse { legend, columns },
    }))
}

/* ============================================================
   GET /schedule/search?q=

   Linear scan over the forward-looking window (today onward); the engine
   enforces the 2-character minimum and the 15-result cap.
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search_appointments(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiOk<Vec<Appointment>>>, ApiError> {
    let today = Local::now().date_naive();
    let horizon = today
        .checked_add_days(Days::new(SEARCH_WINDOW_DAYS))
        .unwrap_or(today);

    let window = state.store.list_appointments(today, horizon, None).await?;
    let hits: Vec<Appointment> = search::search_appointments(&window, &query.q)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ApiOk { data: hits }))
}
