// src/schedule/indicator.rs

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::schedule::hours;
use crate::schedule::layout::SLOT_HEIGHT_PX;

/// Refresh cadence of the "now" marker.
#[allow(dead_code)]
pub const TICK_SECONDS: u64 = 60;

/// Pixel offset of the current-time marker inside a day column, or `None`
/// when the column is not today or the hour has no slot. At most one column
/// ever carries the marker, and midnight resolves to the single "24" slot.
pub fn indicator_offset(now: NaiveDateTime, column_date: NaiveDate) -> Option<f64> {
    if now.date() != column_date {
        return None;
    }
    let index = hours::slot_index(now.hour())?;
    Some(index as f64 * SLOT_HEIGHT_PX + now.minute() as f64 / 60.0 * SLOT_HEIGHT_PX)
}

/// Minute ticker driving the marker. Publishes local wall time on a watch
/// channel from a tokio task; the task is aborted when the clock is dropped,
/// so no timer outlives the view that started it.
#[allow(dead_code)]
pub struct IndicatorClock {
    rx: watch::Receiver<NaiveDateTime>,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl IndicatorClock {
    pub fn start() -> Self {
        let (tx, rx) = watch::channel(Local::now().naive_local());
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(TICK_SECONDS));
            ticker.tick().await; // immediate first tick already published
            loop {
                ticker.tick().await;
                if tx.send(Local::now().naive_local()).is_err() {
                    break;
                }
            }
        });
        IndicatorClock { rx, handle }
    }

    pub fn now(&self) -> NaiveDateTime {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NaiveDateTime> {
        self.rx.clone()
    }
}

impl Drop for IndicatorClock {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
