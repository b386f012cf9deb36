// src/schedule/time.rs

use thiserror::Error;

/// Clinic times travel as zero-padded "HH:MM" strings, minute precision.
/// "24:00" is a legal *end* marker (midnight rollover) but never a start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid time literal {0:?}, expected HH:MM")]
    Invalid(String),
}

/// Parse "HH:MM" into minutes since 00:00.
///
/// Malformed input is an error, not a silent 0: a bad time string here means
/// corrupted appointment data upstream and must surface immediately.
pub fn to_minutes(time: &str) -> Result<i32, TimeError> {
    let bad = || TimeError::Invalid(time.to_string());

    let (hh, mm) = time.split_once(':').ok_or_else(bad)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(bad());
    }
    let hours: i32 = hh.parse().map_err(|_| bad())?;
    let minutes: i32 = mm.parse().map_err(|_| bad())?;

    let in_range = (0..=23).contains(&hours) && (0..=59).contains(&minutes);
    let midnight_end = hours == 24 && minutes == 0;
    if !in_range && !midnight_end {
        return Err(bad());
    }

    Ok(hours * 60 + minutes)
}

/// Render minutes-since-midnight back to "HH:MM". 1440 renders as "24:00".
pub fn from_minutes(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// End minus start, in minutes. Negative when the pair is misordered;
/// callers guard.
pub fn duration_minutes(start: &str, end: &str) -> Result<i32, TimeError> {
    Ok(to_minutes(end)? - to_minutes(start)?)
}

/// Half-open interval overlap on minute offsets: back-to-back intervals
/// (one ending exactly when the next starts) do not overlap.
pub fn is_overlapping(a_start: i32, a_end: i32, b_start: i32, b_end: i32) -> bool {
    a_start < b_end && a_end > b_start
}
