/// The ordered set of habit definitions

use crate::domain::{default_habits, Category, Habit, HabitId, HabitPatch, NewHabit};

/// Ordered habit catalog
///
/// Order is display and iteration order. It only changes through `add`
/// (append), `delete` and `reorder`.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitCatalog {
    habits: Vec<Habit>,
}

impl HabitCatalog {
    pub fn new(habits: Vec<Habit>) -> Self {
        Self { habits }
    }

    /// Create a habit with a fresh id and append it to the end
    pub fn add(&mut self, data: NewHabit) -> &Habit {
        let habit = Habit::new(data);
        tracing::debug!("Added habit: {} ({})", habit.name, habit.id);
        let index = self.habits.len();
        self.habits.push(habit);
        &self.habits[index]
    }

    /// Merge a patch into an existing habit
    ///
    /// Unknown ids are ignored. Returns whether a habit was updated.
    pub fn update(&mut self, id: &HabitId, patch: HabitPatch) -> bool {
        match self.habits.iter_mut().find(|h| &h.id == id) {
            Some(habit) => {
                habit.apply(patch);
                tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
                true
            }
            None => false,
        }
    }

    /// Remove a habit; its historical logs are left untouched
    pub fn delete(&mut self, id: &HabitId) -> bool {
        let before = self.habits.len();
        self.habits.retain(|h| &h.id != id);
        let removed = self.habits.len() != before;
        if removed {
            tracing::debug!("Deleted habit: {}", id);
        }
        removed
    }

    /// Replace the catalog with a caller-supplied ordering
    ///
    /// The list is trusted as-is; it is not checked to be a permutation of
    /// the current habits.
    pub fn reorder(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
    }

    pub fn get(&self, id: &HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| &h.id == id)
    }

    pub fn contains(&self, id: &HabitId) -> bool {
        self.get(id).is_some()
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(move |h| h.category == category)
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

impl Default for HabitCatalog {
    fn default() -> Self {
        Self::new(default_habits())
    }
}
