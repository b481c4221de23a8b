//! Type definitions for streakly

mod day;
mod error;
mod heatmap;
mod task;

pub use day::CalendarDay;
pub use error::*;
pub use heatmap::*;
pub use task::*;
