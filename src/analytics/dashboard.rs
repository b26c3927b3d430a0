/// Aggregated views built from the core statistics
///
/// These are the numbers the dashboard and history screens show: weekly
/// averages, per-category rates, a seven-day series and a month grid.

use chrono::NaiveDate;
use serde::Serialize;

use super::Statistics;
use crate::domain::{dates_in_month, day_of_week, days_before, Category, DailyGoal, StreakSummary};

/// Completion of the whole catalog on one date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u32,
    pub completion: f64,
}

/// Average 7-day completion rate of a category's habits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRate {
    pub category: Category,
    pub habits: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub today_completion: f64,
    /// Mean of the last seven daily completion percentages
    pub weekly_completion: f64,
    pub best_current_streak: u32,
    pub best_ever_streak: u32,
    /// Oldest first, ending today
    pub last_seven_days: Vec<DayPoint>,
    pub categories: Vec<CategoryRate>,
    pub habits: Vec<StreakSummary>,
    /// Days with at least one catalog habit completed
    pub active_days: usize,
    pub total_completed_today: usize,
    pub daily_goal: u32,
    /// Completed-today as a percentage of the goal, capped at 100
    pub goal_progress: f64,
    pub goal_met: bool,
}

/// Completion grid for a calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthOverview {
    pub year: i32,
    /// 1-indexed month
    pub month: u32,
    /// Blank cells before the 1st in a Sunday-first grid
    pub leading_blanks: u32,
    pub days: Vec<DayPoint>,
}

impl Statistics<'_> {
    fn day_point(&self, date: NaiveDate) -> DayPoint {
        DayPoint {
            date,
            weekday: day_of_week(date),
            completion: self.day_completion_percentage(date),
        }
    }

    pub fn dashboard(&self, goal: DailyGoal) -> Dashboard {
        let today = self.calendar.today();

        let last_seven_days: Vec<DayPoint> = (0..7)
            .rev()
            .map(|offset| self.day_point(days_before(today, offset)))
            .collect();
        let weekly_completion =
            last_seven_days.iter().map(|p| p.completion).sum::<f64>() / 7.0;

        let habits: Vec<StreakSummary> = self
            .catalog
            .iter()
            .map(|habit| self.streak_summary(&habit.id))
            .collect();

        let categories = Category::ALL
            .iter()
            .map(|category| {
                let rates: Vec<f64> = habits
                    .iter()
                    .zip(self.catalog.iter())
                    .filter(|(_, habit)| habit.category == *category)
                    .map(|(summary, _)| summary.weekly_rate)
                    .collect();
                let rate = if rates.is_empty() {
                    0.0
                } else {
                    rates.iter().sum::<f64>() / rates.len() as f64
                };
                CategoryRate {
                    category: *category,
                    habits: rates.len(),
                    rate,
                }
            })
            .collect();

        let active_days = self
            .logs
            .days()
            .iter()
            .filter(|day| self.day_completion_percentage(day.date) > 0.0)
            .count();

        let total_completed_today = self.total_completed_today();
        let goal_progress =
            (total_completed_today as f64 / f64::from(goal.get()) * 100.0).min(100.0);

        Dashboard {
            date: today,
            today_completion: self.day_completion_percentage(today),
            weekly_completion,
            best_current_streak: habits.iter().map(|s| s.current_streak).max().unwrap_or(0),
            best_ever_streak: habits.iter().map(|s| s.best_streak).max().unwrap_or(0),
            last_seven_days,
            categories,
            habits,
            active_days,
            total_completed_today,
            daily_goal: goal.get(),
            goal_progress,
            goal_met: total_completed_today >= goal.get() as usize,
        }
    }

    /// Per-date completion for a month; `month0` is 0-indexed
    pub fn month_overview(&self, year: i32, month0: u32) -> MonthOverview {
        let dates = dates_in_month(year, month0);
        let leading_blanks = dates.first().map_or(0, |first| day_of_week(*first));

        MonthOverview {
            year: year + (month0 / 12) as i32,
            month: month0 % 12 + 1,
            leading_blanks,
            days: dates.into_iter().map(|date| self.day_point(date)).collect(),
        }
    }
}
