/// Tools for recording habit completions
///
/// Implements habit_toggle, habit_set_value and day_log.

use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::KeyValueStore;
use crate::tools::{format_amount, require_habit, resolve_date, ToolError};
use crate::tracker::HabitTracker;

/// Parameters for flipping a habit's completion
#[derive(Debug, Deserialize)]
pub struct ToggleHabitParams {
    pub habit_id: String,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

/// Parameters for recording progress on a counter or duration habit
///
/// Exactly one of `value` (absolute) or `delta` (relative to the current
/// value) must be given. The result never goes below zero.
#[derive(Debug, Deserialize)]
pub struct SetValueParams {
    pub habit_id: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DayLogParams {
    #[serde(default)]
    pub date: Option<String>,
}

/// Response from logging a habit
#[derive(Debug, Serialize)]
pub struct LogHabitResponse {
    pub success: bool,
    pub completed: bool,
    pub value: Option<f64>,
    pub current_streak: u32,
    pub message: String,
}

/// One habit's state on the requested date
#[derive(Debug, Serialize)]
pub struct DayLogEntry {
    pub habit_id: String,
    pub name: String,
    pub completed: bool,
    pub value: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DayLogResponse {
    pub date: String,
    pub completion: f64,
    pub entries: Vec<DayLogEntry>,
    pub message: String,
}

fn streak_note(streak: u32) -> String {
    format!(
        "Current streak: {} day{}",
        streak,
        if streak == 1 { "" } else { "s" }
    )
}

/// Flip a habit's completion for a date
pub fn toggle_habit<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: ToggleHabitParams,
) -> Result<LogHabitResponse, ToolError> {
    let habit = require_habit(tracker.catalog(), &params.habit_id)?.clone();
    let date = resolve_date(tracker.calendar(), params.date.as_deref())?;

    let log = tracker.toggle(&habit.id, date);
    let current_streak = tracker.stats().current_streak(&habit.id);
    let when = tracker.calendar().format_display(date);

    let message = if log.completed() {
        format!(
            "🔥 {} {} marked done ({}). {}",
            habit.emoji,
            habit.name,
            when,
            streak_note(current_streak)
        )
    } else {
        format!("↩️ {} {} unmarked ({})", habit.emoji, habit.name, when)
    };

    Ok(LogHabitResponse {
        success: true,
        completed: log.completed(),
        value: log.value(),
        current_streak,
        message,
    })
}

fn progress_text(habit: &Habit, value: f64) -> String {
    let unit = habit.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();
    match habit.target {
        Some(target) => format!("{}/{}{}", format_amount(value), format_amount(target), unit),
        None => format!("{}{}", format_amount(value), unit),
    }
}

/// Record an absolute or relative value for a measured habit
pub fn set_habit_value<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: SetValueParams,
) -> Result<LogHabitResponse, ToolError> {
    let habit = require_habit(tracker.catalog(), &params.habit_id)?.clone();
    if !habit.kind.is_measured() {
        return Err(ToolError::Validation(format!(
            "'{}' is a yes/no habit, use habit_toggle instead",
            habit.name
        )));
    }
    let date = resolve_date(tracker.calendar(), params.date.as_deref())?;

    let value = match (params.value, params.delta) {
        (Some(value), None) => value,
        (None, Some(delta)) => {
            let current = tracker
                .logs()
                .habit_log(&habit.id, date)
                .and_then(|log| log.value())
                .unwrap_or(0.0);
            current + delta
        }
        _ => {
            return Err(ToolError::Validation(
                "Provide exactly one of 'value' or 'delta'".to_string(),
            ))
        }
    };
    if !value.is_finite() {
        return Err(ToolError::Validation("Value must be a finite number".to_string()));
    }
    let value = value.max(0.0);

    let log = tracker.set_value(&habit.id, date, value);
    let current_streak = tracker.stats().current_streak(&habit.id);

    let message = if log.completed() {
        format!(
            "🔥 {} {}: {} ✅ {}",
            habit.emoji,
            habit.name,
            progress_text(&habit, value),
            streak_note(current_streak)
        )
    } else {
        format!("{} {}: {}", habit.emoji, habit.name, progress_text(&habit, value))
    };

    Ok(LogHabitResponse {
        success: true,
        completed: log.completed(),
        value: log.value(),
        current_streak,
        message,
    })
}

/// Show every catalog habit's record for one date
pub fn day_log<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    params: DayLogParams,
) -> Result<DayLogResponse, ToolError> {
    let date = resolve_date(tracker.calendar(), params.date.as_deref())?;
    let completion = tracker.stats().day_completion_percentage(date);

    let entries: Vec<DayLogEntry> = tracker
        .catalog()
        .iter()
        .map(|habit| {
            let log = tracker.logs().habit_log(&habit.id, date);
            DayLogEntry {
                habit_id: habit.id.to_string(),
                name: habit.name.clone(),
                completed: log.is_some_and(|l| l.completed()),
                value: log.and_then(|l| l.value()),
            }
        })
        .collect();

    let lines = tracker
        .catalog()
        .iter()
        .zip(&entries)
        .map(|(habit, entry)| {
            let mark = if entry.completed { "✅" } else { "⬜" };
            match entry.value {
                Some(value) => format!(
                    "{} {} {} ({})",
                    mark,
                    habit.emoji,
                    habit.name,
                    progress_text(habit, value)
                ),
                None => format!("{} {} {}", mark, habit.emoji, habit.name),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "📅 **{}** ({}): {:.0}% complete\n\n{}",
        tracker.calendar().format_display(date),
        date,
        completion,
        lines
    );

    Ok(DayLogResponse {
        date: date.to_string(),
        completion,
        entries,
        message,
    })
}
