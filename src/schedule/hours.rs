// src/schedule/hours.rs

/// Display order of the operating day: open at 09:00, run through midnight
/// ("24") and into the early morning, closing after the 08:00 slot.
///
/// The array position, not the hour value, is what fixes a slot's vertical
/// placement on the grid, so this sequence is deliberately not sorted.
pub const DAY_HOURS: [u32; 24] = [
    9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 1, 2, 3, 4, 5, 6, 7, 8,
];

/// Map a clock hour to its position in `DAY_HOURS`.
///
/// Wall-clock midnight (hour 0) shares the "24" slot at index 15, so a time
/// of 00:xx and an end-of-day marker of 24:00 land on the same row and never
/// render twice.
pub fn slot_index(hour: u32) -> Option<usize> {
    match hour {
        9..=24 => Some((hour - 9) as usize),
        0 => Some(15),
        1..=8 => Some((hour + 15) as usize),
        _ => None,
    }
}

/// The wall-clock hour a slot covers. The "24" slot covers 00:00-01:00.
pub fn wall_hour(slot: usize) -> Option<u32> {
    DAY_HOURS.get(slot).map(|h| h % 24)
}
