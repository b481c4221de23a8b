//! streakly: habit tracking with streaks, completion rates and a
//! rolling-year heatmap.
//!
//! The statistics engine (`services::calendar`, `services::stats`,
//! `services::heatmap`, `services::completion_map`) is pure: it takes the
//! completion set and "now" as parameters and keeps no state.
//! `services::TaskStore` is the only component that touches disk.

pub mod cli;
pub mod services;
pub mod types;
