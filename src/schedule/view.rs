// src/schedule/view.rs

use chrono::{Days, NaiveDate, Weekday};
use serde::Deserialize;

/// Calendar view modes; each fixes the number of rendered day columns and
/// the date range handed to the list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "5days")]
    FiveDays,
    #[serde(rename = "week")]
    Week,
}

impl ViewMode {
    pub fn day_count(self) -> u64 {
        match self {
            ViewMode::Day => 1,
            ViewMode::FiveDays => 5,
            ViewMode::Week => 7,
        }
    }

    /// The dates rendered as columns. Day and 5-days views start at the
    /// anchor; the week view aligns to the anchor's Monday.
    pub fn column_dates(self, anchor: NaiveDate) -> Vec<NaiveDate> {
        let first = match self {
            ViewMode::Week => anchor.week(Weekday::Mon).first_day(),
            _ => anchor,
        };
        (0..self.day_count())
            .filter_map(|offset| first.checked_add_days(Days::new(offset)))
            .collect()
    }

    /// Inclusive (start, end) range for the store queries.
    pub fn date_range(self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        let dates = self.column_dates(anchor);
        let first = dates.first().copied().unwrap_or(anchor);
        let last = dates.last().copied().unwrap_or(anchor);
        (first, last)
    }
}
