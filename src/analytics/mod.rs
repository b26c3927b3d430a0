/// Statistics engine for streaks, completion rates and daily aggregates
///
/// Every function here is a pure read over the habit catalog, the log store
/// and the calendar. Nothing is cached: each call recomputes from the live
/// state, so results always reflect the latest mutation.

mod dashboard;

pub use dashboard::{CategoryRate, Dashboard, DayPoint, MonthOverview};

use chrono::NaiveDate;

use crate::domain::{days_before, CivilCalendar, HabitId, StreakSummary};
use crate::tracker::{HabitCatalog, LogStore};

/// How far back streak queries look, in days
pub const LOOKBACK_DAYS: u32 = 365;

/// Read-only statistics over one tracker's state
pub struct Statistics<'a> {
    catalog: &'a HabitCatalog,
    logs: &'a LogStore,
    calendar: &'a CivilCalendar,
}

impl<'a> Statistics<'a> {
    pub fn new(catalog: &'a HabitCatalog, logs: &'a LogStore, calendar: &'a CivilCalendar) -> Self {
        Self {
            catalog,
            logs,
            calendar,
        }
    }

    /// Consecutive completed days counting back from today
    ///
    /// An incomplete today does not break the streak: counting then starts
    /// at yesterday. The first missing or incomplete day after that ends it.
    pub fn current_streak(&self, habit_id: &HabitId) -> u32 {
        let today = self.calendar.today();
        let start = if self.logs.is_completed(habit_id, today) { 0 } else { 1 };

        let mut streak = 0;
        for offset in start..LOOKBACK_DAYS {
            if self.logs.is_completed(habit_id, days_before(today, offset)) {
                streak += 1;
            } else {
                break;
            }
        }
        streak
    }

    /// Longest run of completed days within the last year
    pub fn best_streak(&self, habit_id: &HabitId) -> u32 {
        let today = self.calendar.today();

        let mut best = 0;
        let mut running = 0;
        for offset in (0..LOOKBACK_DAYS).rev() {
            if self.logs.is_completed(habit_id, days_before(today, offset)) {
                running += 1;
                best = best.max(running);
            } else {
                running = 0;
            }
        }
        best
    }

    /// Percentage (0-100) of the trailing `days` days, today included,
    /// on which the habit was completed
    pub fn completion_rate(&self, habit_id: &HabitId, days: i64) -> f64 {
        if days <= 0 {
            return 0.0;
        }
        let today = self.calendar.today();
        let days = u32::try_from(days).unwrap_or(u32::MAX);

        let completed = (0..days)
            .filter(|offset| self.logs.is_completed(habit_id, days_before(today, *offset)))
            .count();

        completed as f64 / f64::from(days) * 100.0
    }

    /// Percentage of the current catalog completed on a date
    ///
    /// The denominator is today's catalog size, so deleting or adding habits
    /// changes historical percentages. Logs of deleted habits are inert and
    /// not counted, which keeps the result within 0-100.
    pub fn day_completion_percentage(&self, date: NaiveDate) -> f64 {
        if self.catalog.is_empty() {
            return 0.0;
        }
        let Some(day) = self.logs.day_log(date) else {
            return 0.0;
        };

        let completed = self
            .catalog
            .iter()
            .filter(|habit| day.is_completed(&habit.id))
            .count();

        completed as f64 / self.catalog.len() as f64 * 100.0
    }

    /// Number of completed records in today's log
    pub fn total_completed_today(&self) -> usize {
        self.logs
            .day_log(self.calendar.today())
            .map_or(0, |day| day.completed_count())
    }

    /// Most recent completed day within the lookback window
    pub fn last_completed(&self, habit_id: &HabitId) -> Option<NaiveDate> {
        let today = self.calendar.today();
        (0..LOOKBACK_DAYS)
            .map(|offset| days_before(today, offset))
            .find(|date| self.logs.is_completed(habit_id, *date))
    }

    /// All streak figures for one habit
    pub fn streak_summary(&self, habit_id: &HabitId) -> StreakSummary {
        // nothing completed within the window means every figure is zero
        let Some(last_completed) = self.last_completed(habit_id) else {
            return StreakSummary::new(habit_id.clone());
        };

        StreakSummary {
            habit_id: habit_id.clone(),
            current_streak: self.current_streak(habit_id),
            best_streak: self.best_streak(habit_id),
            last_completed: Some(last_completed),
            weekly_rate: self.completion_rate(habit_id, 7),
            monthly_rate: self.completion_rate(habit_id, 30),
        }
    }
}
