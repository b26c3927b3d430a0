/// Tools for managing the habit catalog
///
/// Implements habit_create, habit_update, habit_delete, habit_reorder and
/// habit_list.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Category, Habit, HabitKind, HabitPatch, NewHabit};
use crate::storage::KeyValueStore;
use crate::tools::{require_habit, ToolError};
use crate::tracker::HabitTracker;

const MAX_NAME_LEN: usize = 100;
const DEFAULT_EMOJI: &str = "✅";

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    pub category: String,
    /// boolean, counter or duration; defaults to boolean
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Defaults to the category's color
    #[serde(default)]
    pub color: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Parameters for editing a habit
///
/// Unknown keys are rejected, which includes any attempt to send a new
/// `id`. An explicit `null` clears `target` or `unit`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub target: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub unit: Option<Option<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `default`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// New display order, as habit ids
///
/// Habits left out keep their relative order after the listed ones.
#[derive(Debug, Deserialize)]
pub struct ReorderHabitsParams {
    pub habit_ids: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListHabitsParams {
    #[serde(default)]
    pub category: Option<String>,
}

/// Response from a catalog edit
#[derive(Debug, Serialize)]
pub struct HabitChangeResponse {
    pub success: bool,
    pub message: String,
}

/// One row of the habit listing
#[derive(Debug, Serialize)]
pub struct HabitListItem {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub kind: HabitKind,
    pub category: Category,
    pub target: Option<String>,
    pub completed_today: bool,
    pub current_streak: u32,
}

#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitListItem>,
    pub message: String,
}

fn validate_name(name: &str) -> Result<String, ToolError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ToolError::Validation("Habit name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ToolError::Validation(format!(
            "Habit name too long (max {} characters)",
            MAX_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

fn validate_target(target: Option<f64>) -> Result<Option<f64>, ToolError> {
    match target {
        Some(t) if !t.is_finite() || t <= 0.0 => Err(ToolError::Validation(
            "Target must be a positive number".to_string(),
        )),
        other => Ok(other),
    }
}

/// Create a habit and append it to the catalog
pub fn create_habit<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let name = validate_name(&params.name)?;
    let category: Category = params.category.parse()?;
    let kind = match params.kind.as_deref() {
        Some(kind) => kind.parse()?,
        None => HabitKind::Boolean,
    };
    let target = validate_target(params.target)?;

    let habit = tracker.add_habit(NewHabit {
        name,
        emoji: params.emoji.unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
        kind,
        target,
        unit: params.unit,
        category,
        color: params.color.unwrap_or_else(|| category.color().to_string()),
    });

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!(
            "✅ Created habit '{}' in {}. Ready to start your streak!\nHabit ID: {}",
            habit.name,
            category.display_name(),
            habit.id
        ),
    })
}

/// Merge the given fields into an existing habit
pub fn update_habit<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: UpdateHabitParams,
) -> Result<HabitChangeResponse, ToolError> {
    let habit_id = require_habit(tracker.catalog(), &params.habit_id)?.id.clone();

    let patch = HabitPatch {
        name: params.name.as_deref().map(validate_name).transpose()?,
        emoji: params.emoji,
        kind: params.kind.as_deref().map(str::parse).transpose()?,
        target: params.target.map(validate_target).transpose()?,
        unit: params.unit,
        category: params.category.as_deref().map(str::parse).transpose()?,
        color: params.color,
    };
    if patch.is_empty() {
        return Err(ToolError::Validation("Nothing to update".to_string()));
    }

    tracker.update_habit(&habit_id, patch);
    let name = tracker
        .catalog()
        .get(&habit_id)
        .map(|h| h.name.clone())
        .unwrap_or_default();

    Ok(HabitChangeResponse {
        success: true,
        message: format!("✅ Updated habit '{}'", name),
    })
}

/// Remove a habit from the catalog; its history is kept
pub fn delete_habit<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: DeleteHabitParams,
) -> Result<HabitChangeResponse, ToolError> {
    let habit = require_habit(tracker.catalog(), &params.habit_id)?;
    let (id, name) = (habit.id.clone(), habit.name.clone());

    tracker.delete_habit(&id);

    Ok(HabitChangeResponse {
        success: true,
        message: format!("🗑️ Deleted habit '{}'. Its history is kept.", name),
    })
}

/// Move the listed habits to the front in the given order
pub fn reorder_habits<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: ReorderHabitsParams,
) -> Result<HabitChangeResponse, ToolError> {
    let mut ordered: Vec<Habit> = Vec::with_capacity(tracker.catalog().len());
    for habit_id in &params.habit_ids {
        let habit = require_habit(tracker.catalog(), habit_id)?;
        if ordered.iter().any(|h| h.id == habit.id) {
            return Err(ToolError::Validation(format!(
                "Habit '{}' is listed more than once",
                habit.id
            )));
        }
        ordered.push(habit.clone());
    }

    let rest: Vec<_> = tracker
        .catalog()
        .iter()
        .filter(|habit| !ordered.iter().any(|h| h.id == habit.id))
        .cloned()
        .collect();
    ordered.extend(rest);

    let names = ordered
        .iter()
        .map(|h| h.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    tracker.reorder_habits(ordered);

    Ok(HabitChangeResponse {
        success: true,
        message: format!("🔀 New habit order: {}", names),
    })
}

/// List the catalog in display order with today's status
pub fn list_habits<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let category = params
        .category
        .as_deref()
        .map(str::parse::<Category>)
        .transpose()?;

    let today = tracker.calendar().today();
    let stats = tracker.stats();
    let habits: Vec<HabitListItem> = tracker
        .catalog()
        .iter()
        .filter(|habit| category.map_or(true, |c| habit.category == c))
        .map(|habit| HabitListItem {
            id: habit.id.to_string(),
            name: habit.name.clone(),
            emoji: habit.emoji.clone(),
            kind: habit.kind,
            category: habit.category,
            target: habit.target_display(),
            completed_today: tracker.logs().is_completed(&habit.id, today),
            current_streak: stats.current_streak(&habit.id),
        })
        .collect();

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let lines = habits
            .iter()
            .map(|h| {
                format!(
                    "{} {} {}{} | {} | 🔥 {} day{} | ID: {}",
                    if h.completed_today { "✅" } else { "⬜" },
                    h.emoji,
                    h.name,
                    h.target
                        .as_ref()
                        .map(|t| format!(" (target {})", t))
                        .unwrap_or_default(),
                    h.category.label(),
                    h.current_streak,
                    if h.current_streak == 1 { "" } else { "s" },
                    h.id
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("📋 **Habits** ({})\n\n{}", habits.len(), lines)
    };

    Ok(ListHabitsResponse { habits, message })
}
