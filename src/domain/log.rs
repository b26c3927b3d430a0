/// Per-day completion records
///
/// A HabitLog is one habit's record for one civil date; a DayLog groups all
/// HabitLogs of a date. HabitLog keeps `completed` consistent with `value`
/// itself: its fields are private and every mutation goes through a method
/// that resolves completion and refreshes the timestamp.

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CompletionRule, HabitId};

/// One habit's record for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitLog {
    habit_id: HabitId,
    date: NaiveDate,
    /// Single source of truth for "did this count toward completion"
    completed: bool,
    /// Only present for counter/duration habits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    updated_at: DateTime<Utc>,
}

impl HabitLog {
    /// A fresh log created by toggling: completed, no value
    pub fn toggled_on(habit_id: HabitId, date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            habit_id,
            date,
            completed: true,
            value: None,
            updated_at: stamp(now),
        }
    }

    /// A fresh log holding a measured value, completion resolved by `rule`
    pub fn measured(
        habit_id: HabitId,
        date: NaiveDate,
        value: f64,
        rule: CompletionRule,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            habit_id,
            date,
            completed: rule.is_completed(value),
            value: Some(value),
            updated_at: stamp(now),
        }
    }

    /// Flip `completed`, leaving any recorded value alone
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.touch(now);
    }

    /// Replace the value and recompute `completed` from it
    pub fn record_value(&mut self, value: f64, rule: CompletionRule, now: DateTime<Utc>) {
        self.value = Some(value);
        self.completed = rule.is_completed(value);
        self.touch(now);
    }

    pub fn habit_id(&self) -> &HabitId {
        &self.habit_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // updated_at must strictly increase on every mutation, even when two
    // mutations land in the same millisecond
    fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + Duration::milliseconds(1);
        let now = stamp(now);
        self.updated_at = if now >= floor { now } else { floor };
    }
}

/// Timestamps are persisted with millisecond precision; keep memory identical
fn stamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(3)
}

/// All habit records for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLog {
    pub date: NaiveDate,
    logs: Vec<HabitLog>,
    /// Fixed when the date is first touched
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl DayLog {
    /// Start a day with its first record
    pub fn new(first: HabitLog, now: DateTime<Utc>) -> Self {
        Self {
            date: first.date,
            logs: vec![first],
            created_at: stamp(now),
        }
    }

    pub fn logs(&self) -> &[HabitLog] {
        &self.logs
    }

    /// The record for a habit on this day, if any
    pub fn get(&self, habit_id: &HabitId) -> Option<&HabitLog> {
        self.logs.iter().find(|l| &l.habit_id == habit_id)
    }

    pub(crate) fn position(&self, habit_id: &HabitId) -> Option<usize> {
        self.logs.iter().position(|l| &l.habit_id == habit_id)
    }

    pub(crate) fn log_mut(&mut self, index: usize) -> &mut HabitLog {
        &mut self.logs[index]
    }

    /// Append a record for a habit that has none yet on this day
    pub(crate) fn push(&mut self, log: HabitLog) -> &mut HabitLog {
        let index = self.logs.len();
        self.logs.push(log);
        &mut self.logs[index]
    }

    /// Whether the habit has a completed record on this day
    pub fn is_completed(&self, habit_id: &HabitId) -> bool {
        self.get(habit_id).is_some_and(|l| l.completed)
    }

    /// Number of completed records, including records of deleted habits
    pub fn completed_count(&self) -> usize {
        self.logs.iter().filter(|l| l.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_toggle_flips_and_strictly_advances_timestamp() {
        let now = instant();
        let mut log = HabitLog::toggled_on(HabitId::from("gym"), day(), now);
        assert!(log.completed());
        assert_eq!(log.value(), None);

        let first = log.updated_at();
        log.toggle(now);
        assert!(!log.completed());
        assert!(log.updated_at() > first);

        let second = log.updated_at();
        log.toggle(now);
        assert!(log.completed());
        assert!(log.updated_at() > second);
    }

    #[test]
    fn test_record_value_resolves_completion() {
        let rule = CompletionRule::from_target(Some(8.0));
        let mut log = HabitLog::measured(HabitId::from("water"), day(), 7.0, rule, instant());
        assert!(!log.completed());

        log.record_value(8.0, rule, instant());
        assert!(log.completed());
        assert_eq!(log.value(), Some(8.0));

        log.record_value(3.0, rule, instant());
        assert!(!log.completed());
    }

    #[test]
    fn test_toggle_keeps_value() {
        let rule = CompletionRule::AnyPositive;
        let mut log = HabitLog::measured(HabitId::from("water"), day(), 2.0, rule, instant());
        log.toggle(instant());
        assert!(!log.completed());
        assert_eq!(log.value(), Some(2.0));
    }

    #[test]
    fn test_day_log_counts_completed_records() {
        let now = instant();
        let mut day_log = DayLog::new(HabitLog::toggled_on(HabitId::from("gym"), day(), now), now);
        day_log.push(HabitLog::toggled_on(HabitId::from("cardio"), day(), now));
        let cardio = day_log.position(&HabitId::from("cardio")).unwrap();
        day_log.log_mut(cardio).toggle(now);

        assert_eq!(day_log.completed_count(), 1);
        assert!(day_log.is_completed(&HabitId::from("gym")));
        assert!(!day_log.is_completed(&HabitId::from("cardio")));
        assert!(!day_log.is_completed(&HabitId::from("boxing")));
    }

    #[test]
    fn test_serialized_shape() {
        let log = HabitLog::toggled_on(HabitId::from("gym"), day(), instant());
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["habit_id"], "gym");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["updated_at"], instant().timestamp_millis());
        assert!(json.get("value").is_none());
    }
}
