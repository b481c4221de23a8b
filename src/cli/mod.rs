pub mod render;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::services::{calendar, completion_map, StatsCalculator, TaskStore};
use crate::types::{CalendarDay, DayCompletion, HeatmapGrid, StreaklyError, Task, TaskStats};

/// Offline habit tracker: streaks, completion rates and a yearly heatmap
#[derive(Parser)]
#[command(name = "streakly")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding tasks.json [default: ~/.streakly]
    #[arg(long, global = true, env = "STREAKLY_HOME", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task
    Add {
        /// Task name (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// List tasks with their stats (default)
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rename a task
    Rename {
        /// Task id or unique id prefix
        id: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Mark or unmark a day as completed
    Toggle {
        /// Task id or unique id prefix
        id: String,
        /// Day to toggle [default: today]
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<CalendarDay>,
    },

    /// Show statistics for a task
    Stats {
        /// Task id or unique id prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the rolling-year heatmap for a task
    Heatmap {
        /// Task id or unique id prefix
        id: String,
        /// Last day of the heatmap [default: today]
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<CalendarDay>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a month calendar with completed days marked
    Calendar {
        /// Task id or unique id prefix
        id: String,
        /// Year [default: current year]
        #[arg(long)]
        year: Option<i32>,
        /// Month, 1-12 [default: current month]
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Delete all tasks
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct TaskReport<'a> {
    #[serde(flatten)]
    task: &'a Task,
    stats: TaskStats,
}

#[derive(Serialize)]
struct HeatmapReport<'a> {
    task_id: &'a str,
    reference: CalendarDay,
    #[serde(flatten)]
    grid: &'a HeatmapGrid,
    days: Vec<DayCompletion>,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(self) -> anyhow::Result<()> {
        let store = match self.data_dir {
            Some(dir) => TaskStore::with_data_dir(dir),
            None => TaskStore::new()?,
        };
        debug!(path = %store.store_path().display(), "using task store");

        let today = calendar::today()?;

        match self.command.unwrap_or(Commands::List { json: false }) {
            Commands::Add { name } => {
                let task = store.add(&name.join(" "))?;
                println!("Added {} ({})", task.name, short_id(&task.id));
            }
            Commands::List { json } => {
                let tasks = store.load_all()?;
                let stats = StatsCalculator::for_tasks(&tasks, today)?;
                if json {
                    let reports: Vec<TaskReport> = tasks
                        .iter()
                        .zip(stats)
                        .map(|(task, stats)| TaskReport { task, stats })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    print!("{}", render::render_task_list(&tasks, &stats));
                }
            }
            Commands::Rename { id, name } => {
                let task = store.rename(&id, &name.join(" "))?;
                println!("Renamed {} to {}", short_id(&task.id), task.name);
            }
            Commands::Delete { id } => {
                let task = store.delete(&id)?;
                println!("Deleted {} ({})", task.name, short_id(&task.id));
            }
            Commands::Toggle { id, date } => {
                let day = date.unwrap_or(today);
                if day > today {
                    return Err(
                        StreaklyError::InvalidDate(format!("{} is in the future", day)).into(),
                    );
                }
                let (task, completed) = store.toggle_completion(&id, day)?;
                let label = calendar::relative_label(day, today);
                if completed {
                    println!("{}: marked {} as done", task.name, label);
                } else {
                    println!("{}: unmarked {}", task.name, label);
                }
                let stats = StatsCalculator::for_task(&task, today)?;
                println!("Current streak: {}", render::plural_days(stats.current_streak));
            }
            Commands::Stats { id, json } => {
                let task = store.find(&id)?;
                let stats = StatsCalculator::for_task(&task, today)?;
                if json {
                    let report = TaskReport { task: &task, stats };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render::render_stats(&task, &stats));
                }
            }
            Commands::Heatmap { id, date, json } => {
                let task = store.find(&id)?;
                let reference = date.unwrap_or(today);
                let grid = calendar::year_heatmap_grid(reference)?;
                if json {
                    let days: Vec<CalendarDay> = grid.days().collect();
                    let report = HeatmapReport {
                        task_id: &task.id,
                        reference,
                        grid: &grid,
                        days: completion_map(&days, &task.completed_dates),
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", task.name);
                    print!(
                        "{}",
                        render::render_heatmap(&grid, &task.completed_dates, reference)
                    );
                }
            }
            Commands::Calendar { id, year, month } => {
                let task = store.find(&id)?;
                let year = year.unwrap_or(today.year());
                let month = calendar::month_from_number(month.unwrap_or(today.month()))?;
                let grid = calendar::month_grid(year, month)?;
                println!("{}", task.name);
                print!("{}", render::render_month(&grid, &task.completed_dates));
            }
            Commands::Clear { yes } => {
                if !yes {
                    anyhow::bail!("refusing to delete all tasks without --yes");
                }
                store.clear()?;
                println!("All tasks deleted");
            }
        }

        Ok(())
    }
}

/// First 8 characters of an id
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
