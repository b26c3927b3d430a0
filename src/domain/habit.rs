/// Habit entity and related functionality
///
/// This module defines the Habit struct that represents something the user
/// wants to track, the patch type used to edit it, the completion rule that
/// decides when a measured value counts as done, and the built-in catalog.

use serde::{Deserialize, Serialize};

use crate::domain::{Category, HabitId, HabitKind};

/// A habit represents something the user wants to do regularly
///
/// Presentation attributes (`emoji`, `color`, `unit`) are opaque to the
/// engine; only `kind` and `target` affect how completion is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit, never changes after creation
    pub id: HabitId,
    /// Display name (e.g., "Gym Session", "Water")
    pub name: String,
    pub emoji: String,
    /// Boolean, counter or duration
    #[serde(rename = "type")]
    pub kind: HabitKind,
    /// Value at or above which a counter/duration habit is completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    /// Unit for the target value (e.g., "glasses", "hours")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub category: Category,
    /// Accent color for the habit
    pub color: String,
}

/// Everything needed to create a habit except its id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewHabit {
    pub name: String,
    pub emoji: String,
    #[serde(rename = "type")]
    pub kind: HabitKind,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    pub category: Category,
    pub color: String,
}

/// Partial update of a habit
///
/// There is deliberately no `id` field: a habit's identity cannot be
/// changed through an update. `target` and `unit` use a nested option so a
/// patch can clear them (`Some(None)`) as well as set them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub kind: Option<HabitKind>,
    pub target: Option<Option<f64>>,
    pub unit: Option<Option<String>>,
    pub category: Option<Category>,
    pub color: Option<String>,
}

impl HabitPatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Habit {
    /// Create a habit with a fresh random id
    pub fn new(data: NewHabit) -> Self {
        Self::with_id(HabitId::new(), data)
    }

    /// Create a habit with a caller-chosen id (used by the built-in catalog)
    pub fn with_id(id: HabitId, data: NewHabit) -> Self {
        Self {
            id,
            name: data.name,
            emoji: data.emoji,
            kind: data.kind,
            target: data.target,
            unit: data.unit,
            category: data.category,
            color: data.color,
        }
    }

    /// Merge the present fields of a patch into this habit
    pub fn apply(&mut self, patch: HabitPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(emoji) = patch.emoji {
            self.emoji = emoji;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }

    /// The rule deciding when a recorded value completes this habit
    pub fn completion_rule(&self) -> CompletionRule {
        CompletionRule::from_target(self.target)
    }

    /// Get a display string for the target (e.g., "8 glasses")
    pub fn target_display(&self) -> Option<String> {
        match (self.target, &self.unit) {
            (Some(value), Some(unit)) => Some(format!("{} {}", value, unit)),
            (Some(value), None) => Some(value.to_string()),
            _ => None,
        }
    }
}

/// When a numeric value counts as "completed"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionRule {
    /// Completed once the value reaches the target
    AtLeast(f64),
    /// Completed by any positive value
    AnyPositive,
}

impl CompletionRule {
    /// Build the rule for an optional target
    ///
    /// A missing, zero or NaN target is treated as "no target". Any other
    /// target, negative ones included, is a threshold.
    pub fn from_target(target: Option<f64>) -> Self {
        match target {
            Some(t) if t != 0.0 && !t.is_nan() => CompletionRule::AtLeast(t),
            _ => CompletionRule::AnyPositive,
        }
    }

    pub fn is_completed(&self, value: f64) -> bool {
        match self {
            CompletionRule::AtLeast(target) => value >= *target,
            CompletionRule::AnyPositive => value > 0.0,
        }
    }
}

/// The catalog a fresh installation starts with
pub fn default_habits() -> Vec<Habit> {
    fn boolean(id: &str, name: &str, emoji: &str, category: Category, color: &str) -> Habit {
        Habit::with_id(
            HabitId::from(id),
            NewHabit {
                name: name.to_string(),
                emoji: emoji.to_string(),
                kind: HabitKind::Boolean,
                target: None,
                unit: None,
                category,
                color: color.to_string(),
            },
        )
    }

    vec![
        // Fitness
        boolean("gym", "Gym Session", "🏋️", Category::Fitness, "#10b981"),
        boolean("boxing", "Boxing", "🥊", Category::Fitness, "#ef4444"),
        boolean("cardio", "Cardio", "🏃", Category::Fitness, "#6366f1"),
        boolean("stretching", "Stretching", "🧘", Category::Fitness, "#ec4899"),
        // Nutrition
        boolean("creatine", "Creatine", "💊", Category::Nutrition, "#f59e0b"),
        boolean("protein", "Protein Shake", "🥤", Category::Nutrition, "#f97316"),
        boolean("vitamins", "Vitamins", "💊", Category::Nutrition, "#eab308"),
        boolean("clean-eating", "Clean Eating", "🥗", Category::Nutrition, "#22c55e"),
        // Wellness
        Habit::with_id(
            HabitId::from("water"),
            NewHabit {
                name: "Water".to_string(),
                emoji: "💧".to_string(),
                kind: HabitKind::Counter,
                target: Some(8.0),
                unit: Some("glasses".to_string()),
                category: Category::Wellness,
                color: "#0ea5e9".to_string(),
            },
        ),
        boolean("sleep", "Sleep 7+ hrs", "😴", Category::Wellness, "#8b5cf6"),
        // Discipline
        boolean("no-junk", "No Junk Food", "📵", Category::Discipline, "#f43f5e"),
        boolean("no-alcohol", "No Alcohol", "🚫", Category::Discipline, "#a855f7"),
    ]
}
