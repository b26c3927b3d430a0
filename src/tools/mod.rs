/// MCP tools for habit and weight tracking
///
/// Each tool deserializes its arguments into a typed parameter struct,
/// validates them, calls into the tracker and renders a text reply.
/// Validation failures surface as [`ToolError`]s; the tracker itself never
/// fails.

pub mod goal;
pub mod habits;
pub mod log;
pub mod status;
pub mod weight;

pub use goal::*;
pub use habits::*;
pub use log::*;
pub use status::*;
pub use weight::*;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{parse_date, CivilCalendar, Habit, HabitId, DomainError};
use crate::tracker::HabitCatalog;

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    Arguments(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("{0}")]
    Validation(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Deserialize raw tool arguments into a parameter struct
pub fn parse_args<T: DeserializeOwned>(args: HashMap<String, Value>) -> Result<T, ToolError> {
    let object: serde_json::Map<String, Value> = args.into_iter().collect();
    Ok(serde_json::from_value(Value::Object(object))?)
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today
pub(crate) fn resolve_date(
    calendar: &CivilCalendar,
    date: Option<&str>,
) -> Result<NaiveDate, ToolError> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(calendar.today()),
    }
}

/// Look up a habit the client referred to by id
pub(crate) fn require_habit<'a>(
    catalog: &'a HabitCatalog,
    habit_id: &str,
) -> Result<&'a Habit, ToolError> {
    let habit_id = habit_id.trim();
    if habit_id.is_empty() {
        return Err(ToolError::Validation("Habit ID cannot be empty".to_string()));
    }
    catalog
        .get(&HabitId::from(habit_id))
        .ok_or_else(|| ToolError::HabitNotFound {
            habit_id: habit_id.to_string(),
        })
}

/// Format a measured value without a trailing `.0`
pub(crate) fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}
