use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::ScheduleStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScheduleStore>,
}

/* -------------------------
   Domain rows
--------------------------*/

/// Appointment lifecycle status, stored as smallint.
///
/// Exhaustive enum so every status carries a calendar color and label; a new
/// variant fails to compile until both tables cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled = 0,
    Confirmed = 1,
    Cancelled = 2,
    NoShow = 3,
    Waiting = 4,
    InProgress = 5,
    Complete = 6,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Waiting,
        AppointmentStatus::InProgress,
        AppointmentStatus::Complete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No-show",
            AppointmentStatus::Waiting => "Waiting",
            AppointmentStatus::InProgress => "In progress",
            AppointmentStatus::Complete => "Complete",
        }
    }

    /// Card accent color on the calendar grid.
    pub fn color(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "#3b82f6",
            AppointmentStatus::Confirmed => "#22c55e",
            AppointmentStatus::Cancelled => "#9ca3af",
            AppointmentStatus::NoShow => "#ef4444",
            AppointmentStatus::Waiting => "#eab308",
            AppointmentStatus::InProgress => "#8b5cf6",
            AppointmentStatus::Complete => "#14b8a6",
        }
    }
}

/// One booked appointment. Times are zero-padded "HH:MM" within `date`;
/// `end_time` may be "24:00" for a booking running up to midnight.
/// Patient and professional names are denormalized for display and search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub professional_id: Uuid,
    pub professional_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    /// Stored redundantly; kept in sync with start/end on every write.
    pub duration_min: i32,
    pub category: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An interval during which a professional cannot be booked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockedTime {
    pub blocked_time_id: Uuid,
    pub professional_id: Uuid,
    pub professional_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/* -------------------------
   Write-side payloads
--------------------------*/

#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub professional_id: Uuid,
    pub professional_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value. `notes` keeps the
/// double Option to distinguish "absent" from an explicit null in the JSON
/// body, though the COALESCE update treats both as "keep".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentPatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub category: Option<String>,
    pub notes: Option<Option<String>>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn reschedule(date: NaiveDate, start_time: String, end_time: String) -> Self {
        AppointmentPatch {
            date: Some(date),
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..AppointmentPatch::default()
        }
    }

    pub fn status(status: AppointmentStatus) -> Self {
        AppointmentPatch {
            status: Some(status),
            ..AppointmentPatch::default()
        }
    }
}

/// Upsert payload for blocked times; `blocked_time_id = None` creates.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockedTimeFields {
    pub blocked_time_id: Option<Uuid>,
    pub professional_id: Uuid,
    pub professional_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub reason: Option<String>,
}
