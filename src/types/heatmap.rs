//! Heatmap value types

use serde::Serialize;

use super::CalendarDay;

/// Discrete heatmap level derived from the streak ending on a day.
/// Serializes as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum HeatmapIntensity {
    /// Not completed
    None,
    /// Streak of 1-6 days
    Low,
    /// Streak of 7-13 days
    Medium,
    /// Streak of 14-29 days
    High,
    /// Streak of 30+ days
    Max,
}

impl HeatmapIntensity {
    /// Map a streak length to a level. Monotonic in `streak`.
    pub fn from_streak(streak: u32) -> Self {
        match streak {
            0 => Self::None,
            1..=6 => Self::Low,
            7..=13 => Self::Medium,
            14..=29 => Self::High,
            _ => Self::Max,
        }
    }

    /// Numeric level in `0..=4`
    pub fn level(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Max => 4,
        }
    }
}

impl From<HeatmapIntensity> for u8 {
    fn from(intensity: HeatmapIntensity) -> Self {
        intensity.level()
    }
}

/// Completion state of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCompletion {
    pub date: CalendarDay,
    pub completed: bool,
    pub intensity: HeatmapIntensity,
}

/// One heatmap column, Sunday first
pub type Week = [CalendarDay; 7];

/// Where a month label starts in the heatmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    /// Short English month name ("Jan")
    pub name: String,
    pub start_week: usize,
    /// Weeks until the next label (or the grid end)
    pub span_weeks: usize,
}

/// Week-aligned rolling year of days
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapGrid {
    pub weeks: Vec<Week>,
    pub months: Vec<MonthLabel>,
}

impl HeatmapGrid {
    /// All days in calendar order
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.weeks.iter().flat_map(|w| w.iter().copied())
    }
}
