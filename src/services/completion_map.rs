//! Batched completion lookups for rendering grids

use std::collections::BTreeSet;

use super::heatmap::StreakIndex;
use crate::types::{CalendarDay, DayCompletion};

/// One `DayCompletion` per input day, in input order.
///
/// Duplicate input days each get their own entry so callers can zip the
/// result positionally with the grid they passed in.
pub fn completion_map(
    days: &[CalendarDay],
    completed: &BTreeSet<CalendarDay>,
) -> Vec<DayCompletion> {
    let index = StreakIndex::new(completed);
    days.iter()
        .map(|&date| DayCompletion {
            date,
            completed: completed.contains(&date),
            intensity: index.intensity(date),
        })
        .collect()
}
