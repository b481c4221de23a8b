//! Stats engine and task persistence

pub mod calendar;
pub mod completion_map;
pub mod heatmap;
pub mod stats;
pub mod task_store;

pub use completion_map::completion_map;
pub use heatmap::{intensity, StreakIndex};
pub use stats::StatsCalculator;
pub use task_store::TaskStore;
