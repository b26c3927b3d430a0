/// Streak summary for a single habit
///
/// This module defines the StreakSummary struct that bundles the computed
/// streak statistics of a habit. The numbers themselves are produced by the
/// statistics engine; this type only carries and describes them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{days_before, HabitId};

/// Calculated streak information for a habit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakSummary {
    /// Which habit this streak data is for
    pub habit_id: HabitId,
    /// Consecutive completed days ending today (or yesterday)
    pub current_streak: u32,
    /// Longest run within the last year
    pub best_streak: u32,
    /// Most recent completed day within the last year
    pub last_completed: Option<NaiveDate>,
    /// Completion percentage over the last 7 days (0-100)
    pub weekly_rate: f64,
    /// Completion percentage over the last 30 days (0-100)
    pub monthly_rate: f64,
}

impl StreakSummary {
    /// Create an empty summary for a habit that has never been completed
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            best_streak: 0,
            last_completed: None,
            weekly_rate: 0.0,
            monthly_rate: 0.0,
        }
    }

    /// On track if completed today or yesterday
    pub fn is_on_track(&self, today: NaiveDate) -> bool {
        self.last_completed
            .is_some_and(|last| last >= days_before(today, 1))
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every rep counts.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong habit.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. Discipline equals freedom.", self.current_streak),
            _ => format!("Legendary! {} days of unwavering commitment.", self.current_streak),
        }
    }
}
