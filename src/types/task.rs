//! Task record and derived statistics

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::{CalendarDay, Result, StreaklyError};

/// Maximum task name length (after trimming)
pub const MAX_NAME_LEN: usize = 50;

/// Palette new tasks rotate through
pub const TASK_COLORS: [&str; 8] = [
    "#10B981", // Emerald
    "#3B82F6", // Blue
    "#8B5CF6", // Violet
    "#F59E0B", // Amber
    "#EF4444", // Red
    "#EC4899", // Pink
    "#06B6D4", // Cyan
    "#84CC16", // Lime
];

/// Color for the n-th task created
pub fn color_for_index(index: usize) -> &'static str {
    TASK_COLORS[index % TASK_COLORS.len()]
}

/// A tracked habit as stored by `TaskStore`.
///
/// `completed_dates` is a set: duplicate entries in a stored file collapse
/// on load and malformed dates fail deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_dates: BTreeSet<CalendarDay>,
}

impl Task {
    /// Create a task with a fresh id and no completions
    pub fn new(name: &str, color: &str, created_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: validate_name(name)?,
            color: color.to_string(),
            created_at,
            completed_dates: BTreeSet::new(),
        })
    }

    /// Creation date on the user's local calendar
    pub fn created_day(&self) -> Result<CalendarDay> {
        CalendarDay::try_from(self.created_at.with_timezone(&Local).date_naive())
    }

    pub fn is_completed(&self, day: CalendarDay) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Flip completion for `day`. Returns whether the day is now completed.
    pub fn toggle_completion(&mut self, day: CalendarDay) -> bool {
        if self.completed_dates.remove(&day) {
            false
        } else {
            self.completed_dates.insert(day);
            true
        }
    }
}

/// Trim and validate a task name
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StreaklyError::InvalidTask("name must not be empty".into()));
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(StreaklyError::InvalidTask(format!(
            "name is {} characters, maximum is {}",
            len, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

/// Accepts RFC 3339 timestamps or a bare `YYYY-MM-DD` (local midnight).
fn deserialize_created_at<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let day = CalendarDay::parse(&raw).map_err(de::Error::custom)?;
    let midnight = day.date().and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        // DST spring-forward: midnight doesn't exist, use 01:00
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| de::Error::custom(format!("unrepresentable local date {}", raw)))
}

/// Statistics derived from a task's completion set. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    /// Integer percentage, clamped to 100
    pub completion_rate: u32,
    pub monthly_completions: u32,
    pub yearly_completions: u32,
}
