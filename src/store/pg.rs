// src/store/pg.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BlockedTime, BlockedTimeFields,
    NewAppointment,
};
use crate::store::{validate_interval, ScheduleStore, StoreError};

/// Postgres-backed store.
///
/// Times live as zero-padded "HH:MM" text, so lexicographic comparison in
/// SQL matches minute-offset comparison ("09:30" < "10:00", "24:00" sorts
/// last). Double-booking checks run per professional/date with half-open
/// interval overlap; cancelled appointments release their slot.
#[derive(Clone)]
pub struct PgStore {
    pool: sqlx::PgPool,
}

impl PgStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        PgStore { pool }
    }

    async fn check_collision(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
        start_time: &str,
        end_time: &str,
        skip_appointment: Option<Uuid>,
        skip_blocked: Option<Uuid>,
    ) -> Result<(), StoreError> {
        let booked: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT start_time, end_time
            FROM appointment
            WHERE professional_id = $1
              AND date = $2
              AND status <> $3
              AND start_time < $5
              AND end_time > $4
              AND ($6::uuid IS NULL OR appointment_id <> $6)
            LIMIT 1
            "#,
        )
        .bind(professional_id)
        .bind(date)
        .bind(AppointmentStatus::Cancelled)
        .bind(start_time)
        .bind(end_time)
        .bind(skip_appointment)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((s, e)) = booked {
            return Err(StoreError::Conflict(format!(
                "professional already booked {s}-{e}"
            )));
        }

        let blocked: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT start_time, end_time
            FROM blocked_time
            WHERE professional_id = $1
              AND date = $2
              AND start_time < $4
              AND end_time > $3
              AND ($5::uuid IS NULL OR blocked_time_id <> $5)
            LIMIT 1
            "#,
        )
        .bind(professional_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(skip_blocked)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((s, e)) = blocked {
            return Err(StoreError::Conflict(format!("professional blocked {s}-{e}")));
        }

        Ok(())
    }
}

const APPOINTMENT_COLUMNS: &str = r#"
    appointment_id,
    patient_id,
    patient_name,
    professional_id,
    professional_name,
    date,
    start_time,
    end_time,
    duration_min,
    category,
    notes,
    status,
    created_at,
    updated_at
"#;

#[async_trait]
impl ScheduleStore for PgStore {
    async fn list_appointments(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let rows = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment
            WHERE date >= $1
              AND date <= $2
              AND ($3::smallint IS NULL OR status = $3)
            ORDER BY date ASC, start_time ASC
            "#,
        ))
        .bind(start)
        .bind(end)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, StoreError> {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}
            FROM appointment
            WHERE appointment_id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn create_appointment(&self, fields: NewAppointment) -> Result<Appointment, StoreError> {
        let (start, end) = validate_interval(&fields.start_time, &fields.end_time)?;
        self.check_collision(
            fields.professional_id,
            fields.date,
            &fields.start_time,
            &fields.end_time,
            None,
            None,
        )
        .await?;

        let row = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointment (
              appointment_id,
              patient_id,
              patient_name,
              professional_id,
              professional_name,
              date,
              start_time,
              end_time,
              duration_min,
              category,
              notes,
              status,
              created_at,
              updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12, now(), now())
            RETURNING {APPOINTMENT_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(fields.patient_id)
        .bind(fields.patient_name)
        .bind(fields.professional_id)
        .bind(fields.professional_name)
        .bind(fields.date)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(end - start)
        .bind(fields.category)
        .bind(fields.notes)
        .bind(AppointmentStatus::Scheduled)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError> {
        let current = self.get_appointment(id).await?;

        let date = patch.date.unwrap_or(current.date);
        let start_time = patch.start_time.unwrap_or_else(|| current.start_time.clone());
        let end_time = patch.end_time.unwrap_or_else(|| current.end_time.clone());
        let (start, end) = validate_interval(&start_time, &end_time)?;

        let times_changed = date != current.date
            || start_time != current.start_time
            || end_time != current.end_time;
        if times_changed {
            self.check_collision(
                current.professional_id,
                date,
                &start_time,
                &end_time,
                Some(id),
                None,
            )
            .await?;
        }

        let row = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointment
            SET
              date = $2,
              start_time = $3,
              end_time = $4,
              duration_min = $5,
              category = COALESCE($6, category),
              notes = COALESCE($7, notes),
              status = COALESCE($8, status),
              updated_at = now()
            WHERE appointment_id = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(end - start)
        .bind(patch.category)
        .bind(patch.notes.unwrap_or(None))
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound)
    }

    async fn delete_appointment(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM appointment WHERE appointment_id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_blocked_times(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BlockedTime>, StoreError> {
        let rows = sqlx::query_as::<_, BlockedTime>(
            r#"
            SELECT
              blocked_time_id,
              professional_id,
              professional_name,
              date,
              start_time,
              end_time,
              reason,
              created_at,
              updated_at
            FROM blocked_time
            WHERE date >= $1
              AND date <= $2
            ORDER BY date ASC, start_time ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_blocked_time(
        &self,
        fields: BlockedTimeFields,
    ) -> Result<BlockedTime, StoreError> {
        validate_interval(&fields.start_time, &fields.end_time)?;
        self.check_collision(
            fields.professional_id,
            fields.date,
            &fields.start_time,
            &fields.end_time,
            None,
            fields.blocked_time_id,
        )
        .await?;

        let row = sqlx::query_as::<_, BlockedTime>(
            r#"
            INSERT INTO blocked_time (
              blocked_time_id,
              professional_id,
              professional_name,
              date,
              start_time,
              end_time,
              reason,
              created_at,
              updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7, now(), now())
            ON CONFLICT (blocked_time_id) DO UPDATE SET
              professional_id = EXCLUDED.professional_id,
              professional_name = EXCLUDED.professional_name,
              date = EXCLUDED.date,
              start_time = EXCLUDED.start_time,
              end_time = EXCLUDED.end_time,
              reason = EXCLUDED.reason,
              updated_at = now()
            RETURNING
              blocked_time_id,
              professional_id,
              professional_name,
              date,
              start_time,
              end_time,
              reason,
              created_at,
              updated_at
            "#,
        )
        .bind(fields.blocked_time_id.unwrap_or_else(Uuid::new_v4))
        .bind(fields.professional_id)
        .bind(fields.professional_name)
        .bind(fields.date)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(fields.reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_blocked_time(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM blocked_time WHERE blocked_time_id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
