/// Per-day habit completion records
///
/// The log store owns every DayLog. Days are created lazily the first time a
/// habit is touched on that date and are never removed.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{CompletionRule, DayLog, HabitId, HabitLog};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogStore {
    days: Vec<DayLog>,
}

impl LogStore {
    pub fn new(days: Vec<DayLog>) -> Self {
        Self { days }
    }

    /// Flip a habit's completion for a date
    ///
    /// A habit with no record yet becomes completed. The recorded value, if
    /// any, is left untouched.
    pub fn toggle(&mut self, habit_id: &HabitId, date: NaiveDate, now: DateTime<Utc>) -> &HabitLog {
        let log = self.upsert(
            habit_id,
            date,
            now,
            |existing| existing.toggle(now),
            || HabitLog::toggled_on(habit_id.clone(), date, now),
        );
        tracing::debug!(
            "Toggled {} on {} -> completed={}",
            habit_id,
            date,
            log.completed()
        );
        log
    }

    /// Record a numeric value, resolving completion with `rule`
    ///
    /// The value is stored as given; callers are expected to clamp it.
    pub fn set_value(
        &mut self,
        habit_id: &HabitId,
        date: NaiveDate,
        value: f64,
        rule: CompletionRule,
        now: DateTime<Utc>,
    ) -> &HabitLog {
        let log = self.upsert(
            habit_id,
            date,
            now,
            |existing| existing.record_value(value, rule, now),
            || HabitLog::measured(habit_id.clone(), date, value, rule, now),
        );
        tracing::debug!(
            "Recorded {} for {} on {} -> completed={}",
            value,
            habit_id,
            date,
            log.completed()
        );
        log
    }

    pub fn habit_log(&self, habit_id: &HabitId, date: NaiveDate) -> Option<&HabitLog> {
        self.day_log(date).and_then(|day| day.get(habit_id))
    }

    pub fn day_log(&self, date: NaiveDate) -> Option<&DayLog> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Whether a habit has a completed record on a date
    pub fn is_completed(&self, habit_id: &HabitId, date: NaiveDate) -> bool {
        self.habit_log(habit_id, date).is_some_and(HabitLog::completed)
    }

    pub fn days(&self) -> &[DayLog] {
        &self.days
    }

    fn upsert(
        &mut self,
        habit_id: &HabitId,
        date: NaiveDate,
        now: DateTime<Utc>,
        update: impl FnOnce(&mut HabitLog),
        create: impl FnOnce() -> HabitLog,
    ) -> &HabitLog {
        let Some(day_index) = self.days.iter().position(|d| d.date == date) else {
            let index = self.days.len();
            self.days.push(DayLog::new(create(), now));
            return &self.days[index].logs()[0];
        };

        let day = &mut self.days[day_index];
        let log = match day.position(habit_id) {
            Some(index) => {
                let log = day.log_mut(index);
                update(&mut *log);
                log
            }
            None => day.push(create()),
        };
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 4, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_toggle_creates_day_lazily() {
        let mut store = LogStore::default();
        let gym = HabitId::from("gym");
        assert!(store.day_log(date(1)).is_none());

        assert!(store.toggle(&gym, date(1), now()).completed());
        assert_eq!(store.days().len(), 1);

        // second habit on the same day joins the existing DayLog
        store.toggle(&HabitId::from("cardio"), date(1), now());
        assert_eq!(store.days().len(), 1);
        assert_eq!(store.day_log(date(1)).unwrap().logs().len(), 2);

        // toggling again flips it off without creating anything
        assert!(!store.toggle(&gym, date(1), now()).completed());
        assert_eq!(store.day_log(date(1)).unwrap().logs().len(), 2);
        assert!(store.day_log(date(2)).is_none());
    }

    #[test]
    fn test_day_created_at_is_fixed() {
        let mut store = LogStore::default();
        store.toggle(&HabitId::from("gym"), date(1), now());
        let created = store.day_log(date(1)).unwrap().created_at;

        store.toggle(&HabitId::from("gym"), date(1), now() + chrono::Duration::hours(3));
        assert_eq!(store.day_log(date(1)).unwrap().created_at, created);
    }

    #[test]
    fn test_set_value_updates_in_place() {
        let mut store = LogStore::default();
        let water = HabitId::from("water");
        let rule = CompletionRule::from_target(Some(8.0));

        assert!(!store.set_value(&water, date(1), 7.0, rule, now()).completed());
        assert!(store.set_value(&water, date(1), 8.0, rule, now()).completed());

        let log = store.habit_log(&water, date(1)).unwrap();
        assert_eq!(log.value(), Some(8.0));
        assert_eq!(store.day_log(date(1)).unwrap().logs().len(), 1);
    }

    #[test]
    fn test_negative_values_are_stored_as_given() {
        let mut store = LogStore::default();
        let log = store.set_value(
            &HabitId::from("water"),
            date(1),
            -2.0,
            CompletionRule::AnyPositive,
            now(),
        );
        assert_eq!(log.value(), Some(-2.0));
        assert!(!log.completed());
    }
}
