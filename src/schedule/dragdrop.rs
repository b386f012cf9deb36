// src/schedule/dragdrop.rs

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentPatch};
use crate::schedule::time;
use crate::store::{ScheduleStore, StoreError};

/// Pointer travel below this threshold stays a click, not a drag.
#[allow(dead_code)]
pub const DRAG_ACTIVATION_DISTANCE_PX: f64 = 8.0;

/// A quarter-hour drag target. `hour` is the wall-clock hour (0-23);
/// `minute` is one of 0/15/30/45.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZone {
    pub date: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

impl DropZone {
    /// Addressing key: `slot-{year}-{month:02}-{day:02}-{hour}-{minute:02}`.
    /// Collision-free over (date, hour, quarter) and parseable back.
    pub fn key(&self) -> String {
        format!(
            "slot-{:04}-{:02}-{:02}-{}-{:02}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.hour,
            self.minute,
        )
    }

    /// Decode a drop-zone key. Anything that does not split into exactly the
    /// five expected components, or carries an out-of-range hour or a minute
    /// outside the quarter buckets, is `None` — a drop outside a valid
    /// target, not an error.
    pub fn parse(key: &str) -> Option<DropZone> {
        let rest = key.strip_prefix("slot-")?;
        let parts: Vec<&str> = rest.split('-').collect();
        if parts.len() != 5 {
            return None;
        }

        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        let hour: u32 = parts[3].parse().ok()?;
        let minute: u32 = parts[4].parse().ok()?;

        if hour > 23 || !matches!(minute, 0 | 15 | 30 | 45) {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        Some(DropZone { date, hour, minute })
    }
}

/// The pending outcome of a drop, shown to the user as old vs. new before
/// anything is written. Duration is carried over from the original times,
/// never recomputed from grid snapping.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RescheduleProposal {
    pub appointment_id: Uuid,
    pub old_date: NaiveDate,
    pub old_start: String,
    pub old_end: String,
    pub new_date: NaiveDate,
    pub new_start: String,
    pub new_end: String,
}

impl RescheduleProposal {
    /// Build the proposal for dropping `appt` onto `zone`. `None` when the
    /// stored times are unusable or the preserved duration would run past
    /// 24:00 of the target day.
    pub fn build(appt: &Appointment, zone: &DropZone) -> Option<RescheduleProposal> {
        let duration = time::duration_minutes(&appt.start_time, &appt.end_time).ok()?;
        if duration <= 0 {
            return None;
        }

        let new_start = (zone.hour * 60 + zone.minute) as i32;
        let new_end = new_start + duration;
        if new_end > 24 * 60 {
            return None;
        }

        Some(RescheduleProposal {
            appointment_id: appt.appointment_id,
            old_date: appt.date,
            old_start: appt.start_time.clone(),
            old_end: appt.end_time.clone(),
            new_date: zone.date,
            new_start: time::from_minutes(new_start),
            new_end: time::from_minutes(new_end),
        })
    }

    /// Confirmed by the user: write date/start/end only. The store arbitrates
    /// conflicts; on failure nothing local has changed yet.
    pub async fn commit(&self, store: &dyn ScheduleStore) -> Result<Appointment, StoreError> {
        store
            .update_appointment(
                self.appointment_id,
                AppointmentPatch::reschedule(
                    self.new_date,
                    self.new_start.clone(),
                    self.new_end.clone(),
                ),
            )
            .await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
enum DragPhase {
    Idle,
    Dragging(Uuid),
}

/// Per-gesture drag state machine, decoupled from any pointer library.
///
/// Idle -> Dragging once pointer travel passes the activation distance;
/// Dragging -> Idle on every drop, valid or not. A valid drop yields a
/// [`RescheduleProposal`] for explicit confirmation; dropping the proposal
/// is the cancel path and leaves no side effect.
#[derive(Debug)]
#[allow(dead_code)]
pub struct DragController {
    phase: DragPhase,
    activation_distance_px: f64,
}

impl Default for DragController {
    fn default() -> Self {
        DragController::new()
    }
}

#[allow(dead_code)]
impl DragController {
    pub fn new() -> Self {
        DragController {
            phase: DragPhase::Idle,
            activation_distance_px: DRAG_ACTIVATION_DISTANCE_PX,
        }
    }

    pub fn with_activation_distance(px: f64) -> Self {
        DragController {
            phase: DragPhase::Idle,
            activation_distance_px: px,
        }
    }

    /// Pointer moved `travel_px` with the button held on `appointment_id`.
    /// Returns true once the gesture becomes a drag; the host closes any
    /// open detail popover at that point.
    pub fn drag_started(&mut self, appointment_id: Uuid, travel_px: f64) -> bool {
        if travel_px < self.activation_distance_px {
            return false;
        }
        self.phase = DragPhase::Dragging(appointment_id);
        true
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn dragged_appointment(&self) -> Option<Uuid> {
        match self.phase {
            DragPhase::Dragging(id) => Some(id),
            DragPhase::Idle => None,
        }
    }

    /// Release over `zone_key`. Always returns to Idle; yields a proposal
    /// only when a drag was active, the key decodes, and the dragged
    /// appointment is still present in `appointments`.
    pub fn drop_on(
        &mut self,
        appointments: &[Appointment],
        zone_key: &str,
    ) -> Option<RescheduleProposal> {
        let DragPhase::Dragging(id) = self.phase else {
            return None;
        };
        self.phase = DragPhase::Idle;

        let zone = DropZone::parse(zone_key)?;
        let appt = appointments.iter().find(|a| a.appointment_id == id)?;
        RescheduleProposal::build(appt, &zone)
    }

    /// Release outside any valid zone.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}
