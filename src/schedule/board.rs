// src/schedule/board.rs

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentPatch, AppointmentStatus, BlockedTime};
use crate::schedule::dragdrop::RescheduleProposal;
use crate::schedule::search;
use crate::store::{ScheduleStore, StoreError};

/// The in-memory copy of the scheduling data for the currently displayed
/// range. Single writer: only the fetch- and mutation-completion paths of
/// [`ScheduleView`] touch it.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct ScheduleBoard {
    appointments: Vec<Appointment>,
    blocked_times: Vec<BlockedTime>,
    range: Option<(NaiveDate, NaiveDate)>,
}

#[allow(dead_code)]
impl ScheduleBoard {
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn blocked_times(&self) -> &[BlockedTime] {
        &self.blocked_times
    }

    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.range
    }

    pub fn appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.appointment_id == id)
    }

    pub fn appointments_on(&self, date: NaiveDate) -> Vec<Appointment> {
        self.appointments.iter().filter(|a| a.date == date).cloned().collect()
    }

    pub fn blocked_times_on(&self, date: NaiveDate) -> Vec<BlockedTime> {
        self.blocked_times.iter().filter(|b| b.date == date).cloned().collect()
    }

    fn replace(
        &mut self,
        range: (NaiveDate, NaiveDate),
        appointments: Vec<Appointment>,
        blocked_times: Vec<BlockedTime>,
    ) {
        self.range = Some(range);
        self.appointments = appointments;
        self.blocked_times = blocked_times;
    }

    fn set_status(&mut self, id: Uuid, status: AppointmentStatus) -> Option<AppointmentStatus> {
        let appt = self.appointments.iter_mut().find(|a| a.appointment_id == id)?;
        let previous = appt.status;
        appt.status = status;
        Some(previous)
    }
}

/// Owner of the board plus the store handle, scoped to one scheduling view.
///
/// Refreshes carry a generation token: results landing after a newer refresh
/// or an `invalidate()` are dropped instead of clobbering fresher data (the
/// async calls themselves are not cancellable).
#[allow(dead_code)]
pub struct ScheduleView {
    store: Arc<dyn ScheduleStore>,
    board: ScheduleBoard,
    generation: u64,
}

#[allow(dead_code)]
impl ScheduleView {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        ScheduleView {
            store,
            board: ScheduleBoard::default(),
            generation: 0,
        }
    }

    pub fn board(&self) -> &ScheduleBoard {
        &self.board
    }

    /// Drop whatever is loaded; the next refresh repopulates, and any fetch
    /// still in flight from before this call is discarded on completion.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.board = ScheduleBoard::default();
    }

    /// Fetch the range and swap it into the board.
    pub async fn refresh(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), StoreError> {
        let generation = self.begin_refresh();

        let appointments = self.store.list_appointments(start, end, None).await?;
        let blocked_times = self.store.list_blocked_times(start, end).await?;

        self.apply_refresh(generation, (start, end), appointments, blocked_times);
        Ok(())
    }

    fn begin_refresh(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Swap fetched data in unless a newer refresh or an `invalidate()`
    /// superseded this fetch while it was in flight.
    fn apply_refresh(
        &mut self,
        generation: u64,
        range: (NaiveDate, NaiveDate),
        appointments: Vec<Appointment>,
        blocked_times: Vec<BlockedTime>,
    ) -> bool {
        if self.generation != generation {
            return false;
        }
        self.board.replace(range, appointments, blocked_times);
        true
    }

    /// Optimistic status change: the board flips immediately, and flips back
    /// if the store rejects the write.
    pub async fn set_status(
        &mut self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), StoreError> {
        let previous = self.board.set_status(id, status).ok_or(StoreError::NotFound)?;

        match self.store.update_appointment(id, AppointmentPatch::status(status)).await {
            Ok(_) => Ok(()),
            Err(err) => {
                self.board.set_status(id, previous);
                Err(err)
            }
        }
    }

    /// Commit a confirmed reschedule and re-pull the loaded range.
    pub async fn commit_reschedule(
        &mut self,
        proposal: &RescheduleProposal,
    ) -> Result<(), StoreError> {
        proposal.commit(self.store.as_ref()).await?;
        if let Some((start, end)) = self.board.range() {
            self.refresh(start, end).await?;
        }
        Ok(())
    }

    pub fn search(&self, query: &str) -> Vec<&Appointment> {
        search::search_appointments(self.board.appointments(), query)
    }
}
