/// Engine behavior checked against an in-memory store
use muscleup_tracker::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn date(s: &str) -> chrono::NaiveDate {
        parse_date(s).expect("valid date")
    }

    fn tracker_on(day: &str) -> HabitTracker<MemoryStore> {
        HabitTracker::load(
            MemoryStore::new(),
            CivilCalendar::pinned_on(date(day)),
            Box::new(NoSync),
        )
    }

    fn boolean_habit(name: &str) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            emoji: "✅".to_string(),
            kind: HabitKind::Boolean,
            target: None,
            unit: None,
            category: Category::Fitness,
            color: Category::Fitness.color().to_string(),
        }
    }

    #[test]
    fn test_fresh_tracker_uses_defaults() {
        let tracker = tracker_on("2024-03-15");
        assert_eq!(tracker.habits().len(), 12);
        assert_eq!(tracker.habits()[0].id, HabitId::from("gym"));
        assert_eq!(tracker.daily_goal().get(), 5);
        assert!(tracker.weights().is_empty());
        assert!(tracker.logs().days().is_empty());
    }

    #[test]
    fn test_never_logged_habit_has_zero_stats() {
        let mut tracker = tracker_on("2024-03-15");
        let habit = tracker.add_habit(boolean_habit("Pull-ups"));
        let stats = tracker.stats();

        assert_eq!(stats.current_streak(&habit.id), 0);
        assert_eq!(stats.best_streak(&habit.id), 0);
        assert_eq!(stats.completion_rate(&habit.id, 7), 0.0);
        assert_eq!(stats.completion_rate(&habit.id, 30), 0.0);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut tracker = tracker_on("2024-03-15");
        let gym = HabitId::from("gym");
        let today = tracker.calendar().today();

        let first = tracker.toggle(&gym, today);
        let second = tracker.toggle(&gym, today);

        assert!(first.completed());
        assert!(!second.completed());
        assert!(second.updated_at() > first.updated_at());
        assert!(!tracker.logs().is_completed(&gym, today));
    }

    #[test]
    fn test_set_value_target_boundary() {
        let mut tracker = tracker_on("2024-03-15");
        let water = HabitId::from("water");
        let today = tracker.calendar().today();

        assert!(!tracker.set_value(&water, today, 7.0).completed());
        assert!(tracker.set_value(&water, today, 8.0).completed());
        assert!(tracker.set_value(&water, today, 12.0).completed());
        assert!(!tracker.set_value(&water, today, 0.0).completed());
        assert_eq!(tracker.logs().habit_log(&water, today).and_then(|l| l.value()), Some(0.0));
    }

    #[test]
    fn test_negative_target_is_still_a_threshold() {
        let mut tracker = tracker_on("2024-03-15");
        let today = tracker.calendar().today();
        let habit = tracker.add_habit(NewHabit {
            kind: HabitKind::Counter,
            target: Some(-2.0),
            ..boolean_habit("Calorie deficit")
        });

        assert!(tracker.set_value(&habit.id, today, 0.0).completed());
        assert!(tracker.set_value(&habit.id, today, -2.0).completed());
        assert!(!tracker.set_value(&habit.id, today, -3.0).completed());
    }

    #[test]
    fn test_invalid_weight_does_not_poison_the_log() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let calendar = CivilCalendar::pinned_on(date("2024-03-15"));

        let mut tracker = HabitTracker::load(store.clone(), calendar.clone(), Box::new(NoSync));
        assert!(tracker.add_weight(80.0, None).is_some());
        assert!(tracker.add_weight(f64::NAN, None).is_none());
        assert!(tracker.add_weight(-1.0, None).is_none());
        assert_eq!(tracker.weights().len(), 1);

        let raw = store.read(StorageKey::WeightLogs).unwrap().unwrap();
        assert!(!raw.contains("null"));

        let reloaded = HabitTracker::load(store, calendar, Box::new(NoSync));
        assert_eq!(reloaded.weights().len(), 1);
        assert_eq!(reloaded.weights().summary().current, Some(80.0));
    }

    #[test]
    fn test_three_day_streak() {
        let mut tracker = tracker_on("2024-03-15");
        let gym = HabitId::from("gym");
        for n in 0..3 {
            let day = tracker.calendar().days_ago(n);
            tracker.toggle(&gym, day);
        }

        let stats = tracker.stats();
        assert_eq!(stats.current_streak(&gym), 3);
        assert_eq!(stats.best_streak(&gym), 3);
    }

    #[test]
    fn test_streak_of_today_only() {
        let mut tracker = tracker_on("2024-03-15");
        let gym = HabitId::from("gym");
        let today = tracker.calendar().today();
        tracker.toggle(&gym, today);

        assert_eq!(tracker.stats().current_streak(&gym), 1);
    }

    #[test]
    fn test_open_today_keeps_yesterdays_streak() {
        let mut tracker = tracker_on("2024-03-15");
        let gym = HabitId::from("gym");
        tracker.toggle(&gym, date("2024-03-14"));
        tracker.toggle(&gym, date("2024-03-13"));

        let stats = tracker.stats();
        assert_eq!(stats.current_streak(&gym), 2);
        assert!(stats.best_streak(&gym) >= stats.current_streak(&gym));
    }

    #[test]
    fn test_best_streak_outlives_current() {
        let mut tracker = tracker_on("2024-03-15");
        let gym = HabitId::from("gym");
        for day in ["2024-02-01", "2024-02-02", "2024-02-03", "2024-02-04", "2024-03-15"] {
            tracker.toggle(&gym, date(day));
        }

        let stats = tracker.stats();
        assert_eq!(stats.current_streak(&gym), 1);
        assert_eq!(stats.best_streak(&gym), 4);
    }

    #[test]
    fn test_day_percentage_tracks_current_catalog() {
        let mut tracker = tracker_on("2024-03-15");
        let day = date("2024-03-10");
        let kept: Vec<Habit> = tracker.habits()[..4].to_vec();
        for habit in &tracker.habits()[4..].to_vec() {
            tracker.delete_habit(&habit.id);
        }
        assert_eq!(tracker.habits(), kept.as_slice());

        tracker.toggle(&kept[0].id, day);
        tracker.toggle(&kept[1].id, day);
        assert_eq!(tracker.stats().day_completion_percentage(day), 50.0);

        // Removing a completed habit shrinks both sides of the ratio
        tracker.delete_habit(&kept[0].id);
        let pct = tracker.stats().day_completion_percentage(day);
        assert!((pct - 100.0 / 3.0).abs() < 1e-9);

        // Removing an uncompleted one only shrinks the denominator
        tracker.delete_habit(&kept[2].id);
        assert_eq!(tracker.stats().day_completion_percentage(day), 50.0);
    }

    #[test]
    fn test_weights_are_kept_in_date_order() {
        let mut tracker = tracker_on("2024-03-15");
        tracker.add_weight(80.0, Some(date("2024-01-03")));
        tracker.add_weight(82.0, Some(date("2024-01-01")));
        tracker.add_weight(81.0, Some(date("2024-01-02")));

        let dates: Vec<_> = tracker.weights().entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2024-01-01"), date("2024-01-02"), date("2024-01-03")]);
        assert_eq!(tracker.weights().latest().map(|e| e.weight), Some(80.0));

        let summary = tracker.weights().summary();
        assert_eq!(summary.starting, Some(82.0));
        assert_eq!(summary.current, Some(80.0));
        assert_eq!(summary.trend, WeightTrend::Down);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(dates_in_month(2024, 1).len(), 29);
        assert_eq!(dates_in_month(2023, 1).len(), 28);
        assert_eq!(dates_in_month(2024, 11).len(), 31);
    }

    #[test]
    fn test_calendar_day_boundary_is_ist() {
        use chrono::TimeZone;

        // 18:29 UTC is 23:59 IST, 18:30 UTC is already tomorrow
        let at = |h, m| chrono::Utc.with_ymd_and_hms(2024, 3, 15, h, m, 0).unwrap();
        let before = CivilCalendar::pinned_at(at(18, 29));
        let after = CivilCalendar::pinned_at(at(18, 30));
        assert_eq!(before.today(), date("2024-03-15"));
        assert_eq!(after.today(), date("2024-03-16"));
    }

    #[test]
    fn test_daily_goal_rejects_non_positive() {
        let mut tracker = tracker_on("2024-03-15");
        assert!(!tracker.update_daily_goal(0));
        assert!(!tracker.update_daily_goal(-3));
        assert_eq!(tracker.daily_goal().get(), 5);

        assert!(tracker.update_daily_goal(8));
        assert_eq!(tracker.daily_goal().get(), 8);
    }

    #[test]
    fn test_mutations_survive_reload() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let calendar = CivilCalendar::pinned_on(date("2024-03-15"));
        let today = calendar.today();

        let mut tracker = HabitTracker::load(store.clone(), calendar.clone(), Box::new(NoSync));
        let habit = tracker.add_habit(boolean_habit("Pull-ups"));
        tracker.toggle(&habit.id, today);
        tracker.add_weight(79.4, None);
        tracker.update_daily_goal(3);

        let reloaded = HabitTracker::load(store, calendar, Box::new(NoSync));
        assert!(reloaded.catalog().contains(&habit.id));
        assert!(reloaded.logs().is_completed(&habit.id, today));
        assert_eq!(reloaded.weights().len(), 1);
        assert_eq!(reloaded.weights().entries()[0].date, today);
        assert_eq!(reloaded.daily_goal().get(), 3);
    }

    #[test]
    fn test_dashboard_goal_progress() {
        let mut tracker = tracker_on("2024-03-15");
        let today = tracker.calendar().today();
        tracker.update_daily_goal(4);
        for id in ["gym", "creatine"] {
            tracker.toggle(&HabitId::from(id), today);
        }

        let dashboard = tracker.stats().dashboard(tracker.daily_goal());
        assert_eq!(dashboard.total_completed_today, 2);
        assert_eq!(dashboard.daily_goal, 4);
        assert_eq!(dashboard.goal_progress, 50.0);
        assert!(!dashboard.goal_met);
        assert_eq!(dashboard.last_seven_days.len(), 7);
        assert_eq!(dashboard.last_seven_days[6].date, today);
    }
}
