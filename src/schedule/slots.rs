// src/schedule/slots.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Appointment, BlockedTime};
use crate::schedule::dragdrop::DropZone;
use crate::schedule::hours::{self, DAY_HOURS};
use crate::schedule::time::{self, TimeError};

/// Blocked coverage of one display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotBlock {
    Free,
    Partial,
    Full,
}

/// One display hour of a day column: the appointments starting inside it,
/// how much of it is blocked, and its four quarter-hour drop-zone keys.
/// Derived per render; never persisted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub index: usize,
    pub starting_appointments: Vec<Uuid>,
    pub blocked: SlotBlock,
    pub blocked_time_ids: Vec<Uuid>,
    pub drop_zones: Vec<String>,
}

/// Build the 24 display slots of one day column.
///
/// Appointments attach to the slot their start hour maps to (midnight starts
/// land on the "24" slot). Blocked coverage is measured against the slot's
/// wall-clock hour.
pub fn build_day_slots(
    date: NaiveDate,
    appointments: &[Appointment],
    blocked_times: &[BlockedTime],
) -> Result<Vec<TimeSlot>, TimeError> {
    let mut slots: Vec<TimeSlot> = DAY_HOURS
        .iter()
        .enumerate()
        .map(|(index, &hour)| TimeSlot {
            hour,
            index,
            starting_appointments: Vec::new(),
            blocked: SlotBlock::Free,
            blocked_time_ids: Vec::new(),
            drop_zones: [0, 15, 30, 45]
                .iter()
                .map(|&minute| DropZone { date, hour: hour % 24, minute }.key())
                .collect(),
        })
        .collect();

    for appt in appointments {
        let start = time::to_minutes(&appt.start_time)?;
        if let Some(index) = hours::slot_index((start / 60) as u32) {
            slots[index].starting_appointments.push(appt.appointment_id);
        }
    }

    let block_spans: Vec<(Uuid, i32, i32)> = blocked_times
        .iter()
        .map(|b| {
            Ok((
                b.blocked_time_id,
                time::to_minutes(&b.start_time)?,
                time::to_minutes(&b.end_time)?,
            ))
        })
        .collect::<Result<_, TimeError>>()?;

    for slot in slots.iter_mut() {
        let Some(wall) = hours::wall_hour(slot.index) else {
            continue;
        };
        let slot_start = (wall * 60) as i32;
        let slot_end = slot_start + 60;

        // Coverage is judged over the union of all blocks touching the slot,
        // so adjacent blocks that jointly span the hour count as Full.
        let mut covered: Vec<(i32, i32)> = Vec::new();
        for &(id, b_start, b_end) in &block_spans {
            if !time::is_overlapping(slot_start, slot_end, b_start, b_end) {
                continue;
            }
            slot.blocked_time_ids.push(id);
            covered.push((b_start.max(slot_start), b_end.min(slot_end)));
        }
        if covered.is_empty() {
            continue;
        }

        covered.sort_unstable();
        let mut minutes = 0;
        let mut cursor = slot_start;
        for (s, e) in covered {
            let s = s.max(cursor);
            if e > s {
                minutes += e - s;
                cursor = e;
            }
        }
        slot.blocked = if minutes >= 60 { SlotBlock::Full } else { SlotBlock::Partial };
    }

    Ok(slots)
}
