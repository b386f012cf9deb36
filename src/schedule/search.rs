// src/schedule/search.rs

use crate::models::Appointment;

/// Queries shorter than this return nothing.
pub const MIN_QUERY_LEN: usize = 2;
/// Result cap; the list is already narrowed to a forward-looking window.
pub const MAX_RESULTS: usize = 15;

/// Search-as-you-type over an in-memory appointment list.
///
/// The query splits on whitespace and every token must match, case
/// insensitively, at least one of: patient name, category, professional
/// name, notes. Results come back chronologically by (date, start time),
/// capped at [`MAX_RESULTS`]. Plain linear scan; at clinic scale an index
/// buys nothing.
pub fn search_appointments<'a>(appointments: &'a [Appointment], query: &str) -> Vec<&'a Appointment> {
    let query = query.trim();
    if query.len() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    let mut hits: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| {
            let fields = [
                a.patient_name.to_lowercase(),
                a.category.to_lowercase(),
                a.professional_name.to_lowercase(),
                a.notes.as_deref().unwrap_or_default().to_lowercase(),
            ];
            tokens
                .iter()
                .all(|token| fields.iter().any(|f| f.contains(token.as_str())))
        })
        .collect();

    // Zero-padded HH:MM compares correctly as text.
    hits.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
    hits.truncate(MAX_RESULTS);
    hits
}
