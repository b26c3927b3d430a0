/// Tools for streaks and progress overviews
///
/// Implements habit_status, dashboard and month_overview.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::analytics::{Dashboard, MonthOverview};
use crate::domain::{Quote, StreakSummary};
use crate::storage::KeyValueStore;
use crate::tools::{require_habit, ToolError};
use crate::tracker::HabitTracker;

/// Parameters for checking habit status
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    /// If omitted, every habit in the catalog is reported
    #[serde(default)]
    pub habit_id: Option<String>,
}

/// Information about a single habit's status
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub weekly_rate: f64,
    pub monthly_rate: f64,
    pub last_completed: Option<String>,
    /// "on_track", "at_risk" or "new"
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    pub quote: Quote,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
    pub quote: Quote,
    pub message: String,
}

/// Month to show; both default to the current month
#[derive(Debug, Default, Deserialize)]
pub struct MonthOverviewParams {
    #[serde(default)]
    pub year: Option<i32>,
    /// 1 = January .. 12 = December
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct MonthOverviewResponse {
    pub overview: MonthOverview,
    pub message: String,
}

fn habit_status(summary: &StreakSummary, name: &str, today: NaiveDate) -> HabitStatus {
    let status = if summary.last_completed.is_none() {
        "new"
    } else if summary.is_on_track(today) {
        "on_track"
    } else {
        "at_risk"
    };

    HabitStatus {
        habit_id: summary.habit_id.to_string(),
        name: name.to_string(),
        current_streak: summary.current_streak,
        best_streak: summary.best_streak,
        weekly_rate: summary.weekly_rate,
        monthly_rate: summary.monthly_rate,
        last_completed: summary.last_completed.map(|d| d.to_string()),
        status: status.to_string(),
    }
}

/// Streaks and completion rates for one habit or the whole catalog
pub fn get_habit_status<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    params: StatusParams,
) -> Result<StatusResponse, ToolError> {
    let stats = tracker.stats();
    let today = tracker.calendar().today();

    let habits: Vec<_> = match params.habit_id.as_deref() {
        Some(habit_id) => vec![require_habit(tracker.catalog(), habit_id)?],
        None => tracker.catalog().iter().collect(),
    };

    let mut lines = Vec::with_capacity(habits.len());
    let mut statuses = Vec::with_capacity(habits.len());
    for habit in habits {
        let summary = stats.streak_summary(&habit.id);
        lines.push(format!(
            "{} **{}**: 🔥 {} (best {}) | 7d {:.0}% | 30d {:.0}%\n   {}",
            habit.emoji,
            habit.name,
            summary.current_streak,
            summary.best_streak,
            summary.weekly_rate,
            summary.monthly_rate,
            summary.motivational_message()
        ));
        statuses.push(habit_status(&summary, &habit.name, today));
    }

    let quote = Quote::of_the_hour(tracker.calendar());
    let on_track = statuses.iter().filter(|s| s.status == "on_track").count();
    let message = if statuses.is_empty() {
        format!("No habits to report on yet.\n\n💬 {}", quote)
    } else {
        format!(
            "📊 **Habit Status** ({} of {} on track)\n\n{}\n\n💬 {}",
            on_track,
            statuses.len(),
            lines.join("\n"),
            quote
        )
    };

    Ok(StatusResponse {
        habits: statuses,
        quote,
        message,
    })
}

fn progress_bar(percent: f64) -> String {
    let filled = (percent / 10.0).round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

/// Today's progress, weekly trend and category breakdown
pub fn get_dashboard<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    _params: DashboardParams,
) -> Result<DashboardResponse, ToolError> {
    let dashboard = tracker.stats().dashboard(tracker.daily_goal());

    let week = dashboard
        .last_seven_days
        .iter()
        .map(|point| {
            format!(
                "{} {} {:.0}%",
                point.date.format("%a"),
                progress_bar(point.completion),
                point.completion
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let categories = dashboard
        .categories
        .iter()
        .map(|c| format!("{}: {:.0}% ({} habits)", c.category.label(), c.rate, c.habits))
        .collect::<Vec<_>>()
        .join("\n");

    let goal_line = if dashboard.goal_met {
        format!(
            "🎯 Daily goal reached: {}/{} habits",
            dashboard.total_completed_today, dashboard.daily_goal
        )
    } else {
        format!(
            "🎯 Daily goal: {}/{} habits ({:.0}%)",
            dashboard.total_completed_today, dashboard.daily_goal, dashboard.goal_progress
        )
    };

    let quote = Quote::of_the_hour(tracker.calendar());
    let message = format!(
        "📈 **Dashboard** ({})\n\n\
         Today: {:.0}% complete\n{}\n\
         Weekly average: {:.0}%\n\
         Best current streak: {} days | Best ever: {} days\n\
         Active days: {}\n\n\
         **Last 7 days**\n{}\n\n\
         **Categories (7-day rate)**\n{}\n\n\
         💬 {}",
        dashboard.date,
        dashboard.today_completion,
        goal_line,
        dashboard.weekly_completion,
        dashboard.best_current_streak,
        dashboard.best_ever_streak,
        dashboard.active_days,
        week,
        categories,
        quote
    );

    Ok(DashboardResponse {
        dashboard,
        quote,
        message,
    })
}

/// Completion for every date of a month
pub fn get_month_overview<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    params: MonthOverviewParams,
) -> Result<MonthOverviewResponse, ToolError> {
    let today = tracker.calendar().today();
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ToolError::Validation(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }

    let overview = tracker.stats().month_overview(year, month - 1);

    let mut grid = String::from("Su Mo Tu We Th Fr Sa\n");
    let mut column = overview.leading_blanks;
    grid.push_str(&"   ".repeat(column as usize));
    for point in &overview.days {
        let cell = match point.completion {
            c if c >= 100.0 => "██",
            c if c >= 50.0 => "▓▓",
            c if c > 0.0 => "░░",
            _ => "··",
        };
        grid.push_str(cell);
        column += 1;
        if column % 7 == 0 {
            grid.push('\n');
        } else {
            grid.push(' ');
        }
    }

    let active = overview.days.iter().filter(|d| d.completion > 0.0).count();
    let perfect = overview.days.iter().filter(|d| d.completion >= 100.0).count();
    let message = format!(
        "🗓️ **{}-{:02}**: {} active days, {} perfect days\n\n{}",
        overview.year,
        overview.month,
        active,
        perfect,
        grid.trim_end()
    );

    Ok(MonthOverviewResponse { overview, message })
}
