//! Calendar date utilities
//!
//! Everything here works on `CalendarDay` values with Y/M/D arithmetic.
//! Only `today`, `is_today` and `is_future` read the clock.

use chrono::{Local, Month};

use crate::types::{CalendarDay, HeatmapGrid, MonthLabel, Result, StreaklyError, Week};

/// Days covered by the rolling heatmap, including the reference day
pub const HEATMAP_WINDOW_DAYS: i64 = 365;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Current day on the local calendar
pub fn today() -> Result<CalendarDay> {
    CalendarDay::try_from(Local::now().date_naive())
}

pub fn is_today(day: CalendarDay) -> Result<bool> {
    Ok(day == today()?)
}

/// Strictly after today
pub fn is_future(day: CalendarDay) -> Result<bool> {
    Ok(day > today()?)
}

/// English month name, e.g. "March" or "Mar"
pub fn month_name(day: CalendarDay, short: bool) -> &'static str {
    let name = MONTH_NAMES[(day.month() - 1) as usize];
    if short {
        &name[..3]
    } else {
        name
    }
}

/// "Today", "Yesterday", otherwise e.g. "Wed, Mar 6"
pub fn relative_label(day: CalendarDay, today: CalendarDay) -> String {
    if day == today {
        return "Today".to_string();
    }
    if Some(day) == today.pred() {
        return "Yesterday".to_string();
    }
    day.date().format("%a, %b %-d").to_string()
}

/// The `count` days ending at `today`, oldest first. Stops early at
/// 0001-01-01.
pub fn past_days(count: usize, today: CalendarDay) -> Vec<CalendarDay> {
    let mut days: Vec<CalendarDay> = std::iter::successors(Some(today), |d| d.pred())
        .take(count)
        .collect();
    days.reverse();
    days
}

/// Every day of `year`, January 1st first
pub fn year_dates(year: i32) -> Result<Vec<CalendarDay>> {
    let first = CalendarDay::from_ymd(year, 1, 1)?;
    let last = CalendarDay::from_ymd(year, 12, 31)?;
    let len = (last.days_since(first) + 1) as usize;
    Ok(std::iter::successors(Some(first), |d| d.succ())
        .take(len)
        .collect())
}

/// Month laid out for a Sunday-first calendar: one `None` per weekday
/// before the 1st, then every day of the month in order.
pub fn month_grid(year: i32, month: Month) -> Result<Vec<Option<CalendarDay>>> {
    let month_number = month.number_from_month();
    let first = CalendarDay::from_ymd(year, month_number, 1)?;
    let days_in_month = days_in_month(first);

    let padding = first.weekday_index() as usize;
    let mut grid = Vec::with_capacity(padding + days_in_month as usize);
    grid.resize(padding, None);
    grid.extend(
        std::iter::successors(Some(first), |d| d.succ())
            .take(days_in_month as usize)
            .map(Some),
    );
    Ok(grid)
}

/// Convert a 1-based month number to `chrono::Month`
pub fn month_from_number(month: u32) -> Result<Month> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| StreaklyError::InvalidDate(format!("month {} outside 1..=12", month)))
}

fn days_in_month(first: CalendarDay) -> u32 {
    // Walk from the 29th; every month has a 28th.
    let mut len = 28;
    let mut next = first.add_days(28).ok();
    while let Some(day) = next.filter(|d| d.same_month(first)) {
        len += 1;
        next = day.succ();
    }
    len
}

/// Build the rolling-year heatmap ending at `reference`.
///
/// The 365-day window is extended back to the Sunday on or before its first
/// day, and forward to the Saturday on or after `reference` so every week
/// holds exactly 7 days. Days after `reference` are part of the grid; the
/// renderer decides how to show them.
///
/// A month label is emitted for the first grid day and for every 1st of a
/// month up to `reference`, at the index of the week containing it.
///
/// Fails when the padded grid would reach outside 0001-01-01..=9999-12-31.
pub fn year_heatmap_grid(reference: CalendarDay) -> Result<HeatmapGrid> {
    let window_start = reference.add_days(-(HEATMAP_WINDOW_DAYS - 1))?;
    let grid_start = window_start.add_days(-(window_start.weekday_index() as i64))?;
    let grid_end = reference.add_days(6 - reference.weekday_index() as i64)?;

    let week_count = (grid_end.days_since(grid_start) + 1) as usize / 7;

    let days: Vec<CalendarDay> = std::iter::successors(Some(grid_start), |d| d.succ())
        .take(week_count * 7)
        .collect();
    let weeks: Vec<Week> = days
        .chunks_exact(7)
        .filter_map(|chunk| Week::try_from(chunk).ok())
        .collect();

    let mut starts: Vec<(CalendarDay, usize)> = Vec::new();
    for (week_idx, week) in weeks.iter().enumerate() {
        for &day in week {
            if day > reference {
                break;
            }
            if day == grid_start || day.day() == 1 {
                starts.push((day, week_idx));
            }
        }
    }

    let months = starts
        .iter()
        .enumerate()
        .map(|(i, &(day, start_week))| {
            let next_start = starts.get(i + 1).map_or(week_count, |&(_, w)| w);
            MonthLabel {
                name: month_name(day, true).to_string(),
                start_week,
                span_weeks: next_start - start_week,
            }
        })
        .collect();

    Ok(HeatmapGrid { weeks, months })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> CalendarDay {
        CalendarDay::parse(s).unwrap()
    }

    #[test]
    fn test_is_today_and_future() {
        let now = today().unwrap();
        assert!(is_today(now).unwrap());
        assert!(!is_future(now).unwrap());
        assert!(is_future(now.succ().unwrap()).unwrap());
        assert!(!is_future(now.pred().unwrap()).unwrap());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(day("2024-03-10"), false), "March");
        assert_eq!(month_name(day("2024-03-10"), true), "Mar");
        assert_eq!(month_name(day("2024-09-01"), true), "Sep");
        assert_eq!(month_name(day("2024-12-31"), true), "Dec");
    }

    #[test]
    fn test_relative_label() {
        let now = day("2024-03-10");
        assert_eq!(relative_label(now, now), "Today");
        assert_eq!(relative_label(day("2024-03-09"), now), "Yesterday");
        assert_eq!(relative_label(day("2024-03-06"), now), "Wed, Mar 6");
    }

    #[test]
    fn test_past_days_oldest_first() {
        let days = past_days(3, day("2024-03-01"));
        assert_eq!(
            days,
            vec![day("2024-02-28"), day("2024-02-29"), day("2024-03-01")]
        );
        assert!(past_days(0, day("2024-03-01")).is_empty());
    }

    #[test]
    fn test_past_days_stops_at_first_representable_day() {
        let days = past_days(5, day("0001-01-02"));
        assert_eq!(days, vec![day("0001-01-01"), day("0001-01-02")]);
    }

    #[test]
    fn test_year_dates_leap_and_common() {
        let leap = year_dates(2024).unwrap();
        assert_eq!(leap.len(), 366);
        assert_eq!(leap[0], day("2024-01-01"));
        assert_eq!(leap[365], day("2024-12-31"));
        assert_eq!(year_dates(2023).unwrap().len(), 365);
    }

    #[test]
    fn test_year_dates_at_year_bounds() {
        let first = year_dates(1).unwrap();
        assert_eq!(first[0], day("0001-01-01"));
        assert_eq!(first.len(), 365);
        let last = year_dates(9999).unwrap();
        assert_eq!(last.last().copied(), Some(day("9999-12-31")));
        assert_eq!(last.len(), 365);
        assert!(year_dates(0).is_err());
        assert!(year_dates(10000).is_err());
    }

    #[test]
    fn test_month_grid_last_representable_month() {
        let grid = month_grid(9999, Month::December).unwrap();
        assert_eq!(grid.iter().flatten().count(), 31);
        assert_eq!(grid.last().copied().flatten(), Some(day("9999-12-31")));
    }

    #[test]
    fn test_month_grid_leap_february() {
        let grid = month_grid(2024, Month::February).unwrap();
        // 2024-02-01 was a Thursday
        let padding = day("2024-02-01").weekday_index() as usize;
        assert_eq!(padding, 4);
        assert!(grid[..padding].iter().all(Option::is_none));
        let days: Vec<CalendarDay> = grid[padding..].iter().map(|d| d.unwrap()).collect();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], day("2024-02-01"));
        assert_eq!(days[28], day("2024-02-29"));
    }

    #[test]
    fn test_month_grid_common_february_and_december() {
        let feb = month_grid(2023, Month::February).unwrap();
        assert_eq!(feb.iter().flatten().count(), 28);

        // 2023-12-01 was a Friday
        let dec = month_grid(2023, Month::December).unwrap();
        assert_eq!(dec.iter().take_while(|d| d.is_none()).count(), 5);
        assert_eq!(dec.iter().flatten().count(), 31);
        assert_eq!(dec.last().copied().flatten(), Some(day("2023-12-31")));
    }

    #[test]
    fn test_month_grid_starting_sunday_has_no_padding() {
        // 2024-09-01 was a Sunday
        let grid = month_grid(2024, Month::September).unwrap();
        assert_eq!(grid[0], Some(day("2024-09-01")));
        assert_eq!(grid.len(), 30);
    }

    #[test]
    fn test_month_from_number() {
        assert_eq!(month_from_number(1).unwrap(), Month::January);
        assert_eq!(month_from_number(12).unwrap(), Month::December);
        assert!(month_from_number(0).is_err());
        assert!(month_from_number(13).is_err());
    }

    #[test]
    fn test_heatmap_grid_shape() {
        let reference = day("2024-03-10");
        let grid = year_heatmap_grid(reference).unwrap();

        // 2023-03-12 (reference - 364) was a Sunday, reference is a Sunday
        assert_eq!(grid.weeks[0][0], day("2023-03-12"));
        assert_eq!(grid.weeks.len(), 53);
        assert_eq!(grid.weeks.last().unwrap()[0], reference);
        assert_eq!(grid.weeks.last().unwrap()[6], day("2024-03-16"));
    }

    #[test]
    fn test_heatmap_grid_invariants_across_references() {
        let base = day("2023-01-01");
        for offset in 0..400 {
            let reference = base.add_days(offset).unwrap();
            let grid = year_heatmap_grid(reference).unwrap();
            let days: Vec<CalendarDay> = grid.days().collect();

            assert_eq!(grid.weeks[0][0].weekday_index(), 0);
            // Left padding keeps the whole 365-day window
            assert!(days[0] <= reference.add_days(-364).unwrap());
            assert!(days[0] > reference.add_days(-371).unwrap());
            assert!(days.contains(&reference));
            assert!(*days.last().unwrap() < reference.add_days(7).unwrap());
            for pair in days.windows(2) {
                assert_eq!(pair[1].pred(), Some(pair[0]));
            }
        }
    }

    #[test]
    fn test_heatmap_month_labels() {
        let grid = year_heatmap_grid(day("2024-03-10")).unwrap();

        let first = &grid.months[0];
        assert_eq!(first.name, "Mar");
        assert_eq!(first.start_week, 0);
        // 2023-04-01 is 20 days after 2023-03-12
        assert_eq!(grid.months[1].name, "Apr");
        assert_eq!(grid.months[1].start_week, 2);
        assert_eq!(first.span_weeks, 2);

        let last = grid.months.last().unwrap();
        assert_eq!(last.name, "Mar");
        assert_eq!(last.start_week, 50);
        assert_eq!(last.span_weeks, 3);

        assert_eq!(grid.months.len(), 13);
        let total_span: usize = grid.months.iter().map(|m| m.span_weeks).sum();
        assert_eq!(total_span, grid.weeks.len());
    }

    #[test]
    fn test_heatmap_labels_can_share_a_week() {
        // Grid starts Sun 2023-10-29; November 1st falls in week 0 as well
        let grid = year_heatmap_grid(day("2024-10-27")).unwrap();
        assert_eq!(grid.weeks[0][0], day("2023-10-29"));
        assert_eq!(grid.months[0].name, "Oct");
        assert_eq!(grid.months[0].span_weeks, 0);
        assert_eq!(grid.months[1].name, "Nov");
        assert_eq!(grid.months[1].start_week, 0);
    }

    #[test]
    fn test_heatmap_no_label_after_reference() {
        // Reference Thu 2024-02-29; 2024-03-01 is in the last week but in the future
        let grid = year_heatmap_grid(day("2024-02-29")).unwrap();
        assert!(grid.days().any(|d| d == day("2024-03-01")));
        assert_eq!(grid.months.last().unwrap().name, "Feb");
    }

    #[test]
    fn test_heatmap_grid_rejects_window_before_year_one() {
        assert!(year_heatmap_grid(day("0001-01-05")).is_err());
        // Window starts Mon 0001-01-01; padding back to Sunday leaves year 1
        assert_eq!(day("0001-01-01").weekday_index(), 1);
        assert!(year_heatmap_grid(day("0001-12-31")).is_err());
    }

    #[test]
    fn test_heatmap_grid_near_year_one_stays_canonical() {
        let grid = year_heatmap_grid(day("0002-01-10")).unwrap();
        assert_eq!(grid.weeks[0][0], day("0001-01-07"));
        for d in grid.days() {
            assert_eq!(CalendarDay::parse(&d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn test_heatmap_grid_rejects_padding_past_year_9999() {
        // 9999-12-31 is a Friday; the trailing Saturday would be in year 10000
        let last = day("9999-12-31");
        assert_eq!(last.weekday_index(), 5);
        assert!(year_heatmap_grid(last).is_err());

        // 9999-12-25 is a Saturday, so no padding is needed
        let grid = year_heatmap_grid(day("9999-12-25")).unwrap();
        assert_eq!(grid.days().last(), Some(day("9999-12-25")));
        for d in grid.days() {
            assert_eq!(CalendarDay::parse(&d.to_string()).unwrap(), d);
        }
    }
}
