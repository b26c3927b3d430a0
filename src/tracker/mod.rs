/// The tracker state container
///
/// `HabitTracker` owns the catalog, the logs, the weight book and the daily
/// goal, loaded once from a record store. Every mutation updates memory,
/// overwrites the one record it changed and announces the new value on the
/// change feed. `sync` applies what other instances announced.

pub mod catalog;
pub mod log_store;
pub mod weight_log;

pub use catalog::HabitCatalog;
pub use log_store::LogStore;
pub use weight_log::WeightLogBook;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::analytics::Statistics;
use crate::domain::{
    CivilCalendar, CompletionRule, DailyGoal, Habit, HabitId, HabitLog, HabitPatch, NewHabit,
    WeightId, WeightLog,
};
use crate::storage::{KeyValueStore, Persistence, Record, RecordValue, StorageKey};
use crate::sync::{ChangeFeed, NoSync, StorageEvent};

pub struct HabitTracker<S> {
    catalog: HabitCatalog,
    logs: LogStore,
    weights: WeightLogBook,
    daily_goal: DailyGoal,
    calendar: CivilCalendar,
    persistence: Persistence<S>,
    feed: Box<dyn ChangeFeed>,
}

impl<S: KeyValueStore> HabitTracker<S> {
    /// Load state from `store`; unreadable records fall back to defaults
    pub fn load(store: S, calendar: CivilCalendar, feed: Box<dyn ChangeFeed>) -> Self {
        let persistence = Persistence::new(store);
        let snapshot = persistence.load();

        Self {
            catalog: HabitCatalog::new(snapshot.habits),
            logs: LogStore::new(snapshot.day_logs),
            weights: WeightLogBook::new(snapshot.weight_logs),
            daily_goal: snapshot.daily_goal,
            calendar,
            persistence,
            feed,
        }
    }

    /// Load with the IST calendar and no peers
    pub fn open(store: S) -> Self {
        Self::load(store, CivilCalendar::ist(), Box::new(NoSync))
    }

    pub fn catalog(&self) -> &HabitCatalog {
        &self.catalog
    }

    pub fn habits(&self) -> &[Habit] {
        self.catalog.habits()
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn weights(&self) -> &WeightLogBook {
        &self.weights
    }

    pub fn daily_goal(&self) -> DailyGoal {
        self.daily_goal
    }

    pub fn calendar(&self) -> &CivilCalendar {
        &self.calendar
    }

    /// Mutable access for moving a pinned calendar

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn stats(&self) -> Statistics<'_> {
        Statistics::new(&self.catalog, &self.logs, &self.calendar)
    }

    pub fn add_habit(&mut self, data: NewHabit) -> Habit {
        let habit = self.catalog.add(data).clone();
        self.persist(Record::Habits(self.catalog.habits()));
        habit
    }

    /// Returns false, and writes nothing, when the id is unknown
    pub fn update_habit(&mut self, id: &HabitId, patch: HabitPatch) -> bool {
        let updated = self.catalog.update(id, patch);
        if updated {
            self.persist(Record::Habits(self.catalog.habits()));
        }
        updated
    }

    /// Remove a habit; its logs stay in storage
    pub fn delete_habit(&mut self, id: &HabitId) -> bool {
        let deleted = self.catalog.delete(id);
        if deleted {
            self.persist(Record::Habits(self.catalog.habits()));
        }
        deleted
    }

    pub fn reorder_habits(&mut self, habits: Vec<Habit>) {
        self.catalog.reorder(habits);
        self.persist(Record::Habits(self.catalog.habits()));
    }

    pub fn toggle(&mut self, habit_id: &HabitId, date: NaiveDate) -> HabitLog {
        let now = self.calendar.instant();
        let log = self.logs.toggle(habit_id, date, now).clone();
        self.persist(Record::DayLogs(self.logs.days()));
        log
    }

    /// Record a numeric value against the habit's target
    ///
    /// Ids missing from the catalog complete on any positive value.
    pub fn set_value(&mut self, habit_id: &HabitId, date: NaiveDate, value: f64) -> HabitLog {
        let rule = self
            .catalog
            .get(habit_id)
            .map(Habit::completion_rule)
            .unwrap_or(CompletionRule::AnyPositive);
        let now = self.calendar.instant();
        let log = self.logs.set_value(habit_id, date, value, rule, now).clone();
        self.persist(Record::DayLogs(self.logs.days()));
        log
    }

    /// Log a weight; the date defaults to today
    ///
    /// Returns `None` and changes nothing unless `weight` is a positive
    /// finite number.
    pub fn add_weight(&mut self, weight: f64, date: Option<NaiveDate>) -> Option<WeightLog> {
        let date = date.unwrap_or_else(|| self.calendar.today());
        let now = self.calendar.instant();
        let Some(entry) = self.weights.add(weight, date, now).cloned() else {
            debug!("Ignoring invalid weight {}", weight);
            return None;
        };
        self.persist(Record::WeightLogs(self.weights.entries()));
        Some(entry)
    }

    pub fn delete_weight(&mut self, id: WeightId) -> bool {
        let deleted = self.weights.delete(id);
        if deleted {
            self.persist(Record::WeightLogs(self.weights.entries()));
        }
        deleted
    }

    /// Returns false when `goal` is not positive; the goal is then unchanged
    pub fn update_daily_goal(&mut self, goal: i64) -> bool {
        if !self.daily_goal.update(goal) {
            debug!("Ignoring non-positive daily goal {}", goal);
            return false;
        }
        self.persist(Record::DailyGoal(self.daily_goal));
        true
    }

    /// Write every record, e.g. to seed a fresh store with the defaults
    pub fn save_all(&self) {
        self.persist(Record::Habits(self.catalog.habits()));
        self.persist(Record::DayLogs(self.logs.days()));
        self.persist(Record::WeightLogs(self.weights.entries()));
        self.persist(Record::DailyGoal(self.daily_goal));
    }

    /// Apply every change other instances made since the last call
    ///
    /// Returns the number of records replaced.
    pub fn sync(&mut self) -> usize {
        let events = self.feed.poll();
        let applied = events
            .into_iter()
            .filter(|event| self.apply_event(event))
            .count();
        if applied > 0 {
            info!("Applied {} external change(s)", applied);
        }
        applied
    }

    /// Replace one record with a value written elsewhere
    ///
    /// Nothing is saved or published. Removed records and unparseable
    /// values are ignored and leave the state untouched.
    pub fn apply_event(&mut self, event: &StorageEvent) -> bool {
        let Some(raw) = event.new_value.as_deref() else {
            debug!("Ignoring removal of {}", event.key);
            return false;
        };

        match RecordValue::decode(event.key, raw) {
            Ok(value) => {
                self.replace(value);
                true
            }
            Err(e) => {
                warn!("Ignoring malformed external change to {}: {}", event.key, e);
                false
            }
        }
    }

    fn replace(&mut self, value: RecordValue) {
        let key = value.key();
        match value {
            RecordValue::Habits(habits) => self.catalog = HabitCatalog::new(habits),
            RecordValue::DayLogs(days) => self.logs = LogStore::new(days),
            RecordValue::WeightLogs(entries) => self.weights = WeightLogBook::new(entries),
            RecordValue::DailyGoal(goal) => self.daily_goal = goal,
        }
        debug!("Replaced {} from external change", key);
    }

    fn persist(&self, record: Record<'_>) {
        let key: StorageKey = record.key();
        match self.persistence.save(record) {
            Ok(raw) => self.feed.publish(&StorageEvent::new(key, Some(raw))),
            Err(e) => error!("Failed to save {}: {}", key, e),
        }
    }
}
