/// Record codec and the load/save contract
///
/// Loading reads each record independently: a missing or malformed record
/// falls back to its default without affecting the others. Saving
/// re-serializes one whole record and overwrites it.

use tracing::{debug, info, warn};

use crate::domain::{default_habits, DailyGoal, DayLog, Habit, WeightLog};
use crate::storage::{KeyValueStore, StorageError, StorageKey};

/// Everything the tracker keeps in memory, as loaded from storage
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub day_logs: Vec<DayLog>,
    pub weight_logs: Vec<WeightLog>,
    pub daily_goal: DailyGoal,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            habits: default_habits(),
            day_logs: Vec::new(),
            weight_logs: Vec::new(),
            daily_goal: DailyGoal::default(),
        }
    }
}

impl Snapshot {
    fn apply(&mut self, value: RecordValue) {
        match value {
            RecordValue::Habits(habits) => self.habits = habits,
            RecordValue::DayLogs(days) => self.day_logs = days,
            RecordValue::WeightLogs(entries) => self.weight_logs = entries,
            RecordValue::DailyGoal(goal) => self.daily_goal = goal,
        }
    }
}

/// A borrowed record ready to be written
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Habits(&'a [Habit]),
    DayLogs(&'a [DayLog]),
    WeightLogs(&'a [WeightLog]),
    DailyGoal(DailyGoal),
}

impl Record<'_> {
    pub fn key(&self) -> StorageKey {
        match self {
            Record::Habits(_) => StorageKey::Habits,
            Record::DayLogs(_) => StorageKey::DayLogs,
            Record::WeightLogs(_) => StorageKey::WeightLogs,
            Record::DailyGoal(_) => StorageKey::DailyGoal,
        }
    }

    /// Serialize the record: JSON arrays, the goal as a plain number string
    pub fn encode(&self) -> Result<String, StorageError> {
        let raw = match self {
            Record::Habits(habits) => serde_json::to_string(habits)?,
            Record::DayLogs(days) => serde_json::to_string(days)?,
            Record::WeightLogs(entries) => serde_json::to_string(entries)?,
            Record::DailyGoal(goal) => goal.to_string(),
        };
        Ok(raw)
    }
}

/// An owned, decoded record
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Habits(Vec<Habit>),
    DayLogs(Vec<DayLog>),
    WeightLogs(Vec<WeightLog>),
    DailyGoal(DailyGoal),
}

impl RecordValue {
    /// Parse the raw value stored under `key`
    pub fn decode(key: StorageKey, raw: &str) -> Result<Self, StorageError> {
        let value = match key {
            StorageKey::Habits => RecordValue::Habits(serde_json::from_str(raw)?),
            StorageKey::DayLogs => RecordValue::DayLogs(serde_json::from_str(raw)?),
            StorageKey::WeightLogs => RecordValue::WeightLogs(serde_json::from_str(raw)?),
            StorageKey::DailyGoal => {
                let goal = raw
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DailyGoal::new)
                    .ok_or_else(|| StorageError::Malformed {
                        key,
                        reason: format!("'{}' is not a positive integer", raw.trim()),
                    })?;
                RecordValue::DailyGoal(goal)
            }
        };
        Ok(value)
    }

    pub fn key(&self) -> StorageKey {
        match self {
            RecordValue::Habits(_) => StorageKey::Habits,
            RecordValue::DayLogs(_) => StorageKey::DayLogs,
            RecordValue::WeightLogs(_) => StorageKey::WeightLogs,
            RecordValue::DailyGoal(_) => StorageKey::DailyGoal,
        }
    }
}

/// Load/save front end over a record store
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read all four records, falling back to defaults record by record
    ///
    /// Never fails: read and parse problems are logged and the affected
    /// record keeps its default.
    pub fn load(&self) -> Snapshot {
        let mut snapshot = Snapshot::default();

        for key in StorageKey::ALL {
            match self.load_record(key) {
                Ok(Some(RecordValue::Habits(habits))) if habits.is_empty() => {
                    info!("Stored habit list is empty, using the default catalog");
                }
                Ok(Some(value)) => snapshot.apply(value),
                Ok(None) => debug!("No stored value for {}, using default", key),
                Err(e) => warn!("Failed to load {}, using default: {}", key, e),
            }
        }

        info!(
            "Loaded {} habits, {} day logs, {} weight entries, daily goal {}",
            snapshot.habits.len(),
            snapshot.day_logs.len(),
            snapshot.weight_logs.len(),
            snapshot.daily_goal
        );
        snapshot
    }

    fn load_record(&self, key: StorageKey) -> Result<Option<RecordValue>, StorageError> {
        let Some(raw) = self.store.read(key)? else {
            return Ok(None);
        };
        RecordValue::decode(key, &raw).map(Some)
    }

    /// Serialize and overwrite one record, returning the raw value written
    pub fn save(&self, record: Record<'_>) -> Result<String, StorageError> {
        let raw = record.encode()?;
        self.store.write(record.key(), &raw)?;
        debug!("Saved {} ({} bytes)", record.key(), raw.len());
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_empty_store_loads_defaults() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(persistence.load(), Snapshot::default());
    }

    #[test]
    fn test_malformed_record_only_affects_its_key() {
        let store = MemoryStore::new();
        store.write(StorageKey::Habits, "{\"not\": \"an array\"}").unwrap();
        store.write(StorageKey::DailyGoal, "3").unwrap();
        store.write(StorageKey::WeightLogs, "not json at all").unwrap();

        let snapshot = Persistence::new(store).load();
        assert_eq!(snapshot.habits, default_habits());
        assert_eq!(snapshot.daily_goal.get(), 3);
        assert!(snapshot.weight_logs.is_empty());
    }

    #[test]
    fn test_non_positive_goal_falls_back() {
        for raw in ["0", "-4", "five", ""] {
            let store = MemoryStore::new();
            store.write(StorageKey::DailyGoal, raw).unwrap();
            assert_eq!(Persistence::new(store).load().daily_goal, DailyGoal::default());
        }
    }

    #[test]
    fn test_empty_habit_list_falls_back_to_defaults() {
        let store = MemoryStore::new();
        store.write(StorageKey::Habits, "[]").unwrap();
        assert_eq!(Persistence::new(store).load().habits.len(), 12);
    }

    #[test]
    fn test_save_then_load() {
        let persistence = Persistence::new(MemoryStore::new());
        let habits = &default_habits()[..2];

        persistence.save(Record::Habits(habits)).unwrap();
        persistence.save(Record::DailyGoal(DailyGoal::new(9).unwrap())).unwrap();

        assert_eq!(
            persistence.store().read(StorageKey::DailyGoal).unwrap().as_deref(),
            Some("9")
        );
        let snapshot = persistence.load();
        assert_eq!(snapshot.habits, habits);
        assert_eq!(snapshot.daily_goal.get(), 9);
    }
}
