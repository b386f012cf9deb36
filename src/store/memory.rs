// src/store/memory.rs

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BlockedTime, BlockedTimeFields,
    NewAppointment,
};
use crate::schedule::time;
use crate::store::{validate_interval, ScheduleStore, StoreError};

/// In-memory store with the same validation and conflict semantics as the
/// Postgres store. Backs the engine and view tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    appointments: Vec<Appointment>,
    blocked_times: Vec<BlockedTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Insert an appointment bypassing conflict checks; test setup only.
    pub fn seed_appointment(&self, appointment: Appointment) {
        self.inner.lock().unwrap().appointments.push(appointment);
    }

    pub fn seed_blocked_time(&self, blocked: BlockedTime) {
        self.inner.lock().unwrap().blocked_times.push(blocked);
    }
}

/// Half-open overlap against every other booking and block of the same
/// professional on the same date.
fn find_collision(
    inner: &Inner,
    professional_id: Uuid,
    date: NaiveDate,
    start: i32,
    end: i32,
    skip_appointment: Option<Uuid>,
    skip_blocked: Option<Uuid>,
) -> Option<String> {
    for a in &inner.appointments {
        if Some(a.appointment_id) == skip_appointment
            || a.professional_id != professional_id
            || a.date != date
            || a.status == AppointmentStatus::Cancelled
        {
            continue;
        }
        let (Ok(a_start), Ok(a_end)) =
            (time::to_minutes(&a.start_time), time::to_minutes(&a.end_time))
        else {
            continue;
        };
        if time::is_overlapping(start, end, a_start, a_end) {
            return Some(format!(
                "professional already booked {}-{}",
                a.start_time, a.end_time
            ));
        }
    }

    for b in &inner.blocked_times {
        if Some(b.blocked_time_id) == skip_blocked
            || b.professional_id != professional_id
            || b.date != date
        {
            continue;
        }
        let (Ok(b_start), Ok(b_end)) =
            (time::to_minutes(&b.start_time), time::to_minutes(&b.end_time))
        else {
            continue;
        };
        if time::is_overlapping(start, end, b_start, b_end) {
            return Some(format!(
                "professional blocked {}-{}",
                b.start_time, b.end_time
            ));
        }
    }

    None
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_appointments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Appointment> = inner
            .appointments
            .iter()
            .filter(|a| a.date >= start && a.date <= end)
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        Ok(rows)
    }

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .appointments
            .iter()
            .find(|a| a.appointment_id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_appointment(&self, fields: NewAppointment) -> Result<Appointment, StoreError> {
        let (start, end) = validate_interval(&fields.start_time, &fields.end_time)?;
        let duration = end - start;

        let mut inner = self.inner.lock().unwrap();
        if let Some(what) =
            find_collision(&inner, fields.professional_id, fields.date, start, end, None, None)
        {
            return Err(StoreError::Conflict(what));
        }

        let now = Utc::now();
        let appointment = Appointment {
            appointment_id: Uuid::new_v4(),
            patient_id: fields.patient_id,
            patient_name: fields.patient_name,
            professional_id: fields.professional_id,
            professional_name: fields.professional_name,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            duration_min: duration,
            category: fields.category,
            notes: fields.notes,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        inner.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let current = inner
            .appointments
            .iter()
            .find(|a| a.appointment_id == id)
            .cloned()
            .ok_or(StoreError::NotFound)?;

        let date = patch.date.unwrap_or(current.date);
        let start_time = patch.start_time.clone().unwrap_or_else(|| current.start_time.clone());
        let end_time = patch.end_time.clone().unwrap_or_else(|| current.end_time.clone());
        let (start, end) = validate_interval(&start_time, &end_time)?;
        let duration = end - start;

        let times_changed =
            date != current.date || start_time != current.start_time || end_time != current.end_time;
        if times_changed {
            if let Some(what) = find_collision(
                &inner,
                current.professional_id,
                date,
                start,
                end,
                Some(id),
                None,
            ) {
                return Err(StoreError::Conflict(what));
            }
        }

        let slot = inner
            .appointments
            .iter_mut()
            .find(|a| a.appointment_id == id)
            .ok_or(StoreError::NotFound)?;
        slot.date = date;
        slot.start_time = start_time;
        slot.end_time = end_time;
        slot.duration_min = duration;
        if let Some(category) = patch.category {
            slot.category = category;
        }
        // COALESCE semantics, same as the SQL path: a null inside the outer
        // Some does not clear the column.
        if let Some(Some(notes)) = patch.notes {
            slot.notes = Some(notes);
        }
        if let Some(status) = patch.status {
            slot.status = status;
        }
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.appointments.len();
        inner.appointments.retain(|a| a.appointment_id != id);
        if inner.appointments.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_blocked_times(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BlockedTime>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<BlockedTime> = inner
            .blocked_times
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        Ok(rows)
    }

    async fn upsert_blocked_time(
        &self,
        fields: BlockedTimeFields,
    ) -> Result<BlockedTime, StoreError> {
        let (start, end) = validate_interval(&fields.start_time, &fields.end_time)?;

        let mut inner = self.inner.lock().unwrap();
        if let Some(what) = find_collision(
            &inner,
            fields.professional_id,
            fields.date,
            start,
            end,
            None,
            fields.blocked_time_id,
        ) {
            return Err(StoreError::Conflict(what));
        }

        let now = Utc::now();
        if let Some(id) = fields.blocked_time_id {
            let existing = inner
                .blocked_times
                .iter_mut()
                .find(|b| b.blocked_time_id == id)
                .ok_or(StoreError::NotFound)?;
            existing.professional_id = fields.professional_id;
            existing.professional_name = fields.professional_name;
            existing.date = fields.date;
            existing.start_time = fields.start_time;
            existing.end_time = fields.end_time;
            existing.reason = fields.reason;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let blocked = BlockedTime {
            blocked_time_id: Uuid::new_v4(),
            professional_id: fields.professional_id,
            professional_name: fields.professional_name,
            date: fields.date,
            start_time: fields.start_time,
            end_time: fields.end_time,
            reason: fields.reason,
            created_at: now,
            updated_at: now,
        };
        inner.blocked_times.push(blocked.clone());
        Ok(blocked)
    }

    async fn delete_blocked_time(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.blocked_times.len();
        inner.blocked_times.retain(|b| b.blocked_time_id != id);
        if inner.blocked_times.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::{appointment, blocked_time, TEST_DATE};

    fn new_appointment(start: &str, end: &str, professional_id: Uuid) -> NewAppointment {
        NewAppointment {
            patient_id: Uuid::new_v4(),
            patient_name: "Ana Souza".into(),
            professional_id,
            professional_name: "Dr. Lima".into(),
            date: TEST_DATE.parse().unwrap(),
            start_time: start.into(),
            end_time: end.into(),
            category: "Consulta".into(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn double_booking_the_same_professional_conflicts() {
        let store = MemoryStore::new();
        let prof = Uuid::new_v4();
        store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();

        let err = store
            .create_appointment(new_appointment("10:30", "11:30", prof))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Back-to-back is fine, another professional is fine.
        store
            .create_appointment(new_appointment("11:00", "12:00", prof))
            .await
            .unwrap();
        store
            .create_appointment(new_appointment("10:30", "11:30", Uuid::new_v4()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn blocked_time_rejects_bookings_over_it() {
        let store = MemoryStore::new();
        let block = blocked_time("14:00", "15:00");
        let prof = block.professional_id;
        store.seed_blocked_time(block);

        let err = store
            .create_appointment(new_appointment("14:30", "15:30", prof))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancelled_appointments_release_their_slot() {
        let store = MemoryStore::new();
        let prof = Uuid::new_v4();
        let first = store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();
        store
            .update_appointment(
                first.appointment_id,
                AppointmentPatch::status(AppointmentStatus::Cancelled),
            )
            .await
            .unwrap();

        store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_keeps_duration_field_in_sync() {
        let store = MemoryStore::new();
        let appt = appointment("10:00", "10:30");
        let id = appt.appointment_id;
        store.seed_appointment(appt);

        let updated = store
            .update_appointment(
                id,
                AppointmentPatch::reschedule("2024-06-10".parse().unwrap(), "14:15".into(), "15:00".into()),
            )
            .await
            .unwrap();
        assert_eq!(updated.duration_min, 45);
    }

    #[tokio::test]
    async fn update_rejects_moving_onto_another_booking() {
        let store = MemoryStore::new();
        let prof = Uuid::new_v4();
        let first = store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();
        store
            .create_appointment(new_appointment("14:00", "15:00", prof))
            .await
            .unwrap();

        let err = store
            .update_appointment(
                first.appointment_id,
                AppointmentPatch::reschedule(TEST_DATE.parse().unwrap(), "14:30".into(), "15:30".into()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn status_only_update_never_self_conflicts() {
        let store = MemoryStore::new();
        let prof = Uuid::new_v4();
        let appt = store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();

        store
            .update_appointment(
                appt.appointment_id,
                AppointmentPatch::status(AppointmentStatus::Confirmed),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get_appointment(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_appointment(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_blocked_time(Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_filters_by_range_and_status() {
        let store = MemoryStore::new();
        let prof = Uuid::new_v4();
        let a = store
            .create_appointment(new_appointment("10:00", "11:00", prof))
            .await
            .unwrap();
        store
            .update_appointment(a.appointment_id, AppointmentPatch::status(AppointmentStatus::Confirmed))
            .await
            .unwrap();
        store
            .create_appointment(new_appointment("12:00", "13:00", prof))
            .await
            .unwrap();

        let date: NaiveDate = TEST_DATE.parse().unwrap();
        let all = store.list_appointments(date, date, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let confirmed = store
            .list_appointments(date, date, Some(AppointmentStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);

        let other_day: NaiveDate = "2030-01-01".parse().unwrap();
        assert!(store.list_appointments(other_day, other_day, None).await.unwrap().is_empty());
    }
}
