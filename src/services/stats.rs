//! Streak and completion statistics

use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::types::{CalendarDay, Result, Task, TaskStats};

/// Calculator for per-task statistics. Stateless; every input is a parameter.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute all statistics for a completion set as of `now`
    pub fn compute(
        completed: &BTreeSet<CalendarDay>,
        created: CalendarDay,
        now: CalendarDay,
    ) -> TaskStats {
        let total_completions = completed.len() as u32;

        let monthly_completions = completed.iter().filter(|d| d.same_month(now)).count() as u32;
        let yearly_completions = completed.iter().filter(|d| d.year() == now.year()).count() as u32;

        TaskStats {
            current_streak: Self::current_streak(completed, now),
            longest_streak: Self::longest_streak(completed),
            total_completions,
            completion_rate: Self::completion_rate(total_completions, created, now),
            monthly_completions,
            yearly_completions,
        }
    }

    pub fn for_task(task: &Task, now: CalendarDay) -> Result<TaskStats> {
        Ok(Self::compute(&task.completed_dates, task.created_day()?, now))
    }

    /// Stats for every task, in input order
    pub fn for_tasks(tasks: &[Task], now: CalendarDay) -> Result<Vec<TaskStats>> {
        tasks
            .par_iter()
            .map(|task| Self::for_task(task, now))
            .collect()
    }

    /// Consecutive completed days ending today, or ending yesterday when
    /// today is not marked yet. Zero once both are missing.
    pub fn current_streak(completed: &BTreeSet<CalendarDay>, now: CalendarDay) -> u32 {
        if completed.contains(&now) {
            return streak_ending_at(completed, now);
        }
        match now.pred() {
            Some(yesterday) if completed.contains(&yesterday) => {
                streak_ending_at(completed, yesterday)
            }
            _ => 0,
        }
    }

    /// Longest run of consecutive days ever recorded
    pub fn longest_streak(completed: &BTreeSet<CalendarDay>) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut prev: Option<CalendarDay> = None;

        // BTreeSet iterates ascending
        for &day in completed {
            run = match prev {
                Some(p) if day.days_since(p) == 1 => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            prev = Some(day);
        }

        longest
    }

    /// Completions as a rounded percentage of the days since creation
    /// (creation day included, at least one day). Clamped to 100 for
    /// completions recorded outside the creation window.
    pub fn completion_rate(total: u32, created: CalendarDay, now: CalendarDay) -> u32 {
        let days = (now.days_since(created) + 1).max(1) as u64;
        let total = total as u64;
        // Round half up, matching round(total / days * 100)
        let rate = (total * 200 + days) / (days * 2);
        rate.min(100) as u32
    }
}

/// Length of the run of consecutive completed days ending exactly at `day`
pub fn streak_ending_at(completed: &BTreeSet<CalendarDay>, day: CalendarDay) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(day);
    while let Some(current) = cursor.filter(|d| completed.contains(d)) {
        streak += 1;
        cursor = current.pred();
    }
    streak
}
