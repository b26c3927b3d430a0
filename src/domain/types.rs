/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Category, HabitKind, the ID
/// types and the daily goal that are used by Habit, HabitLog and WeightLog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// Habit ids are opaque strings. The built-in catalog uses readable ids such
/// as `gym` or `water`; habits created at runtime get a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HabitId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a weight entry
///
/// Similar to HabitId but always a UUID, since weight entries are only ever
/// created at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightId(pub Uuid);

impl WeightId {
    /// Generate a new random weight entry ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a weight entry ID from its string form
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidId(s.to_string()))
    }
}

impl Default for WeightId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WeightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a habit is satisfied on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// Yes/No, satisfied by a single toggle ("Did you go to the gym?")
    Boolean,
    /// A count accumulated against an optional target ("8 glasses of water")
    Counter,
    /// A length of time accumulated against an optional target ("7 hours sleep")
    Duration,
}

impl HabitKind {
    /// Whether this kind of habit records a numeric value
    pub fn is_measured(&self) -> bool {
        !matches!(self, HabitKind::Boolean)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitKind::Boolean => "boolean",
            HabitKind::Counter => "counter",
            HabitKind::Duration => "duration",
        }
    }
}

impl FromStr for HabitKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "boolean" => Ok(HabitKind::Boolean),
            "counter" => Ok(HabitKind::Counter),
            "duration" => Ok(HabitKind::Duration),
            other => Err(DomainError::InvalidArgument(format!(
                "Invalid habit type '{}'. Valid options: boolean, counter, duration",
                other
            ))),
        }
    }
}

/// Categories for organizing habits into different life areas
///
/// This is a closed set; dashboard breakdowns always report all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Training sessions, cardio, mobility
    Fitness,
    /// Supplements and diet
    Nutrition,
    /// Hydration, sleep and recovery
    Wellness,
    /// Things to abstain from
    Discipline,
}

impl Category {
    /// Every category, in dashboard order
    pub const ALL: [Category; 4] = [
        Category::Fitness,
        Category::Nutrition,
        Category::Wellness,
        Category::Discipline,
    ];

    /// Get the display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Fitness => "Fitness",
            Category::Nutrition => "Nutrition",
            Category::Wellness => "Wellness",
            Category::Discipline => "Discipline",
        }
    }

    /// Label with the category's emoji, as shown in habit listings
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fitness => "💪 Fitness",
            Category::Nutrition => "🥗 Nutrition",
            Category::Wellness => "✨ Wellness",
            Category::Discipline => "🎯 Discipline",
        }
    }

    /// Accent color used for the category in charts
    pub fn color(&self) -> &'static str {
        match self {
            Category::Fitness => "#10b981",
            Category::Nutrition => "#f59e0b",
            Category::Wellness => "#0ea5e9",
            Category::Discipline => "#a855f7",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fitness => "fitness",
            Category::Nutrition => "nutrition",
            Category::Wellness => "wellness",
            Category::Discipline => "discipline",
        }
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fitness" => Ok(Category::Fitness),
            "nutrition" => Ok(Category::Nutrition),
            "wellness" => Ok(Category::Wellness),
            "discipline" => Ok(Category::Discipline),
            other => Err(DomainError::InvalidArgument(format!(
                "Invalid category '{}'. Valid options: fitness, nutrition, wellness, discipline",
                other
            ))),
        }
    }
}

/// Target number of completed habits per day
///
/// Independent of the catalog size. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyGoal(u32);

impl DailyGoal {
    pub const DEFAULT: DailyGoal = DailyGoal(5);

    /// Build a goal from an arbitrary integer, rejecting anything below 1
    pub fn new(goal: i64) -> Option<Self> {
        if goal > 0 {
            u32::try_from(goal).ok().map(Self)
        } else {
            None
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// Replace the goal if the new value is positive
    ///
    /// Non-positive values are ignored. Returns whether the value was
    /// accepted, which includes setting the goal it already has.
    pub fn update(&mut self, goal: i64) -> bool {
        match Self::new(goal) {
            Some(new_goal) => {
                *self = new_goal;
                true
            }
            None => false,
        }
    }
}

impl Default for DailyGoal {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DailyGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
