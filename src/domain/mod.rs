/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitLog, DayLog,
/// WeightLog, StreakSummary), the civil calendar every date comes from,
/// and the rules that keep them consistent.

pub mod calendar;
pub mod habit;
pub mod log;
pub mod quotes;
pub mod streak;
pub mod types;
pub mod weight;

// Re-export public types for easy access
pub use calendar::*;
pub use habit::*;
pub use log::*;
pub use quotes::*;
pub use streak::*;
pub use types::*;
pub use weight::*;

use thiserror::Error;

/// Errors raised while interpreting outside input as domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("{0}")]
    InvalidArgument(String),
}
