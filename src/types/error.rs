use thiserror::Error;

/// streakly error types
#[derive(Error, Debug)]
pub enum StreaklyError {
    /// Date string is not a canonical YYYY-MM-DD calendar day
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Task record failed validation (empty name, too long, ...)
    #[error("invalid task: {0}")]
    InvalidTask(String),

    /// No task matches the given id
    #[error("task not found: {0}")]
    NotFound(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file could not be read, parsed or written
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for streakly
pub type Result<T> = std::result::Result<T, StreaklyError>;
