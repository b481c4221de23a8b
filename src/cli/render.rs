//! Plain-text rendering for the CLI

use std::collections::BTreeSet;

use super::short_id;
use crate::services::{calendar, completion_map};
use crate::types::{
    CalendarDay, DayCompletion, HeatmapGrid, HeatmapIntensity, MonthLabel, Task, TaskStats,
};

/// Month labels narrower than this are not drawn
pub const MIN_LABEL_SPAN_WEEKS: usize = 3;

const DAY_LABELS: [&str; 7] = ["", "Mon", "", "Wed", "", "Fri", ""];
const WEEKDAY_HEADERS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const LABEL_WIDTH: usize = 4; // "Mon "
const CELL_WIDTH: usize = 2; // glyph + gap
const MONTH_CELL_WIDTH: usize = 4;

/// "1 day" / "3 days"
pub fn plural_days(n: u32) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

/// Labels wide enough to draw. Two months starting in the same week leave
/// the earlier one with a span of 0, so it is dropped.
pub fn visible_month_labels(months: &[MonthLabel], min_span: usize) -> Vec<&MonthLabel> {
    months.iter().filter(|m| m.span_weeks >= min_span).collect()
}

fn intensity_char(intensity: HeatmapIntensity) -> char {
    match intensity {
        HeatmapIntensity::None => '·',
        HeatmapIntensity::Low => '░',
        HeatmapIntensity::Medium => '▒',
        HeatmapIntensity::High => '▓',
        HeatmapIntensity::Max => '█',
    }
}

/// Days after `reference` render blank
fn cell_char(cell: &DayCompletion, reference: CalendarDay) -> char {
    if cell.date > reference {
        ' '
    } else {
        intensity_char(cell.intensity)
    }
}

/// Render the heatmap: month header, 7 weekday rows (Sunday first), legend
pub fn render_heatmap(
    grid: &HeatmapGrid,
    completed: &BTreeSet<CalendarDay>,
    reference: CalendarDay,
) -> String {
    let days: Vec<CalendarDay> = grid.days().collect();
    let cells = completion_map(&days, completed);
    let mut out = String::new();

    let width = LABEL_WIDTH + grid.weeks.len() * CELL_WIDTH;
    let mut header = vec![' '; width];
    for label in visible_month_labels(&grid.months, MIN_LABEL_SPAN_WEEKS) {
        let col = LABEL_WIDTH + label.start_week * CELL_WIDTH;
        for (i, ch) in label.name.chars().enumerate() {
            if let Some(slot) = header.get_mut(col + i) {
                *slot = ch;
            }
        }
    }
    out.push_str(header.iter().collect::<String>().trim_end());
    out.push('\n');

    for (dow, label) in DAY_LABELS.iter().enumerate() {
        let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
        for week in 0..grid.weeks.len() {
            line.push(cell_char(&cells[week * 7 + dow], reference));
            line.push(' ');
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let legend: Vec<String> = [
        HeatmapIntensity::None,
        HeatmapIntensity::Low,
        HeatmapIntensity::Medium,
        HeatmapIntensity::High,
        HeatmapIntensity::Max,
    ]
    .iter()
    .map(|&i| intensity_char(i).to_string())
    .collect();
    out.push_str(&format!(
        "{:width$}Less {} More\n",
        "",
        legend.join(" "),
        width = LABEL_WIDTH
    ));
    out
}

/// Render a month grid from `calendar::month_grid`; completed days get `*`
pub fn render_month(grid: &[Option<CalendarDay>], completed: &BTreeSet<CalendarDay>) -> String {
    let Some(first) = grid.iter().flatten().next() else {
        return String::new();
    };

    let mut out = format!("{} {}\n", calendar::month_name(*first, false), first.year());

    let header: String = WEEKDAY_HEADERS
        .iter()
        .map(|h| format!("{:>3} ", h))
        .collect();
    out.push_str(header.trim_end());
    out.push('\n');

    for row in grid.chunks(7) {
        let line: String = row
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let mark = if completed.contains(day) { '*' } else { ' ' };
                    format!("{:>3}{}", day.day(), mark)
                }
                None => " ".repeat(MONTH_CELL_WIDTH),
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn render_stats(task: &Task, stats: &TaskStats) -> String {
    let rows = [
        ("Current streak", plural_days(stats.current_streak)),
        ("Longest streak", plural_days(stats.longest_streak)),
        ("Total", stats.total_completions.to_string()),
        ("This month", stats.monthly_completions.to_string()),
        ("This year", stats.yearly_completions.to_string()),
        ("Completion rate", format!("{}%", stats.completion_rate)),
    ];

    let mut out = format!("{} ({})\n", task.name, short_id(&task.id));
    for (label, value) in rows {
        out.push_str(&format!("  {:<16} {}\n", label, value));
    }
    out
}

/// One row per task; `stats` is positional with `tasks`
pub fn render_task_list(tasks: &[Task], stats: &[TaskStats]) -> String {
    if tasks.is_empty() {
        return "No tasks yet. Add one with `streakly add <NAME>`\n".to_string();
    }

    let name_width = tasks
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = format!(
        "{:<8}  {:<name_width$}  {:>6}  {:>4}  {:>5}  {:>4}\n",
        "ID",
        "NAME",
        "STREAK",
        "BEST",
        "TOTAL",
        "RATE",
        name_width = name_width
    );
    for (task, s) in tasks.iter().zip(stats) {
        out.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>6}  {:>4}  {:>5}  {:>4}\n",
            short_id(&task.id),
            task.name,
            s.current_streak,
            s.longest_streak,
            s.total_completions,
            format!("{}%", s.completion_rate),
            name_width = name_width
        ));
    }
    out
}
