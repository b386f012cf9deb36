// src/schedule/layout.rs

use uuid::Uuid;

use crate::models::Appointment;
use crate::schedule::hours;
use crate::schedule::time::{self, TimeError};

/// Fixed pixel height of one hour slot on the grid.
pub const SLOT_HEIGHT_PX: f64 = 64.0;
/// Top and bottom padding inside a slot that cards may not occupy.
pub const SLOT_PADDING_PX: f64 = 2.0;
/// Vertical space available for cards within one slot.
pub const USABLE_SLOT_HEIGHT_PX: f64 = SLOT_HEIGHT_PX - 2.0 * SLOT_PADDING_PX;
pub const PIXELS_PER_MINUTE: f64 = USABLE_SLOT_HEIGHT_PX / 60.0;
/// Floor so that very short appointments stay clickable.
pub const MIN_CARD_HEIGHT_PX: f64 = 20.0;

/// Geometry for one appointment card. Derived on every recompute from the
/// same-day appointment set; never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CardLayout {
    pub appointment_id: Uuid,
    /// Index into [`hours::DAY_HOURS`] of the slot hosting the card. Cards
    /// longer than an hour extend downward past the slot border; the host
    /// renders them absolutely positioned inside a scrollable column.
    pub slot_index: usize,
    pub width_pct: f64,
    pub left_pct: f64,
    pub height_px: f64,
    pub top_px: f64,
    /// Presentation of the appointment's status, resolved here so the host
    /// renders cards without a status lookup of its own.
    pub status_label: &'static str,
    pub status_color: &'static str,
}

/// Compute the card geometry for all appointments of one calendar day.
///
/// For each appointment the overlap set is every same-day appointment whose
/// interval intersects it (itself included), ordered by start time; ties keep
/// the input order (stable sort), so simultaneous appointments place
/// left-to-right in insertion order. Each member of a set of N gets 1/N of
/// the column width.
///
/// Pure function of its input: recomputing on an unchanged list yields
/// identical layouts.
pub fn layout_day(appointments: &[Appointment]) -> Result<Vec<CardLayout>, TimeError> {
    let spans: Vec<(i32, i32)> = appointments
        .iter()
        .map(|a| Ok((time::to_minutes(&a.start_time)?, time::to_minutes(&a.end_time)?)))
        .collect::<Result<_, TimeError>>()?;

    let mut layouts = Vec::with_capacity(appointments.len());

    for (i, appt) in appointments.iter().enumerate() {
        let (start, end) = spans[i];

        let mut group: Vec<usize> = (0..appointments.len())
            .filter(|&j| {
                j == i || time::is_overlapping(start, end, spans[j].0, spans[j].1)
            })
            .collect();
        group.sort_by_key(|&j| spans[j].0);

        let count = group.len();
        let position = group.iter().position(|&j| j == i).unwrap_or(0);
        let width_pct = 100.0 / count as f64;
        let left_pct = position as f64 * width_pct;

        // An end landing exactly on an hour boundary counts one minute
        // shorter, keeping the card inside the originating hour's border
        // instead of bleeding into the next slot. Rendering rule only; the
        // stored times are untouched.
        let mut eff_end = end;
        if eff_end % 60 == 0 && eff_end > start {
            eff_end -= 1;
        }
        let height_px = ((eff_end - start) as f64 * PIXELS_PER_MINUTE).max(MIN_CARD_HEIGHT_PX);
        let top_px = (start % 60) as f64 / 60.0 * USABLE_SLOT_HEIGHT_PX;

        let slot_index = hours::slot_index((start / 60) as u32)
            .ok_or_else(|| TimeError::Invalid(appt.start_time.clone()))?;

        layouts.push(CardLayout {
            appointment_id: appt.appointment_id,
            slot_index,
            width_pct,
            left_pct,
            height_px,
            top_px,
            status_label: appt.status.label(),
            status_color: appt.status.color(),
        });
    }

    Ok(layouts)
}
