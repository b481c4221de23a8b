//! Heatmap intensity mapping

use std::collections::{BTreeSet, HashMap};

use super::stats::streak_ending_at;
use crate::types::{CalendarDay, HeatmapIntensity};

/// Intensity of `day`: `None` when not completed, otherwise the level for
/// the streak ending exactly on `day`. No future masking happens here.
pub fn intensity(day: CalendarDay, completed: &BTreeSet<CalendarDay>) -> HeatmapIntensity {
    HeatmapIntensity::from_streak(streak_ending_at(completed, day))
}

/// Precomputed streak lengths for every completed day.
///
/// One ascending pass over the set; lookups are then O(1) instead of a
/// backward walk per queried day.
#[derive(Debug, Default)]
pub struct StreakIndex {
    runs: HashMap<CalendarDay, u32>,
}

impl StreakIndex {
    pub fn new(completed: &BTreeSet<CalendarDay>) -> Self {
        let mut runs = HashMap::with_capacity(completed.len());
        let mut prev: Option<(CalendarDay, u32)> = None;

        for &day in completed {
            let run = match prev {
                Some((p, run)) if p.succ() == Some(day) => run + 1,
                _ => 1,
            };
            runs.insert(day, run);
            prev = Some((day, run));
        }

        Self { runs }
    }

    /// Streak ending exactly at `day` (0 when not completed)
    pub fn streak_at(&self, day: CalendarDay) -> u32 {
        self.runs.get(&day).copied().unwrap_or(0)
    }

    pub fn intensity(&self, day: CalendarDay) -> HeatmapIntensity {
        HeatmapIntensity::from_streak(self.streak_at(day))
    }
}
