// src/store/mod.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BlockedTime, BlockedTimeFields,
    NewAppointment,
};
use crate::schedule::time;

#[cfg(test)]
pub mod memory;
pub mod pg;

/// Structured data-layer errors. Conflicts are a first-class variant so
/// callers never have to pattern-match on backend message text.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("schedule conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The scheduling data store. The server owns no appointment state outside
/// of it; conflicting writes are arbitrated here (last write wins except for
/// double-booking, which is rejected as [`StoreError::Conflict`]).
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_appointments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError>;

    async fn create_appointment(&self, fields: NewAppointment) -> Result<Appointment, StoreError>;

    async fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError>;

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError>;

    async fn list_blocked_times(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BlockedTime>, StoreError>;

    async fn upsert_blocked_time(
        &self,
        fields: BlockedTimeFields,
    ) -> Result<BlockedTime, StoreError>;

    async fn delete_blocked_time(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Check an interval pair and return its (start, end) minute offsets.
/// "24:00" is a legal end but never a legal start.
pub fn validate_interval(start_time: &str, end_time: &str) -> Result<(i32, i32), StoreError> {
    let start = time::to_minutes(start_time)
        .map_err(|e| StoreError::Validation(e.to_string()))?;
    let end = time::to_minutes(end_time).map_err(|e| StoreError::Validation(e.to_string()))?;

    if start >= 24 * 60 {
        return Err(StoreError::Validation("start_time must be before 24:00".into()));
    }
    if end <= start {
        return Err(StoreError::Validation("end_time must be after start_time".into()));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_interval_accepts_midnight_end() {
        assert_eq!(validate_interval("23:30", "24:00").unwrap(), (1410, 1440));
    }

    #[test]
    fn validate_interval_rejects_misordered_pairs() {
        assert!(matches!(
            validate_interval("10:00", "09:00"),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            validate_interval("10:00", "10:00"),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            validate_interval("24:00", "24:00"),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn validate_interval_rejects_malformed_times() {
        assert!(matches!(
            validate_interval("9:00", "10:00"),
            Err(StoreError::Validation(_))
        ));
    }
}
