//! The scheduling engine: time arithmetic, the wrapped business-hours grid,
//! overlap/layout geometry, the current-time marker, quarter-hour
//! drag-and-drop rescheduling, and search. Everything here is pure or
//! store-agnostic; persistence stays behind [`crate::store::ScheduleStore`].

pub mod board;
pub mod dragdrop;
pub mod hours;
pub mod indicator;
pub mod layout;
pub mod search;
pub mod slots;
pub mod time;
pub mod view;
