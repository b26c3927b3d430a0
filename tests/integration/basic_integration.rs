/// End-to-end tests against a real SQLite file
use muscleup_tracker::mcp::McpServer;
use muscleup_tracker::*;
use serde_json::{json, Value};
use tempfile::{NamedTempFile, TempDir};

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn date(s: &str) -> chrono::NaiveDate {
        parse_date(s).expect("valid date")
    }

    fn open_tracker(path: &std::path::Path, day: &str) -> HabitTracker<SqliteStore> {
        let store = SqliteStore::new(path.to_path_buf()).expect("Failed to open store");
        let feed = store.change_feed().expect("Failed to open change feed");
        HabitTracker::load(store, CivilCalendar::pinned_on(date(day)), Box::new(feed))
    }

    #[tokio::test]
    async fn test_server_seeds_fresh_database() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");
        assert_eq!(server.tracker().habits().len(), 12);

        let store = SqliteStore::new(temp_file.path().to_path_buf()).expect("Failed to open store");
        for key in StorageKey::ALL {
            assert!(store.read(key).unwrap().is_some(), "{} was not written", key);
        }
        assert_eq!(store.read(StorageKey::DailyGoal).unwrap().as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("muscleup.db");

        let mut server = HabitTrackerServer::new(db_path.clone())
            .await
            .expect("Failed to create first server");
        let today = server.tracker().calendar().today();
        server.tracker_mut().toggle(&HabitId::from("gym"), today);
        server.tracker_mut().add_weight(78.2, None);
        server.tracker_mut().update_daily_goal(6);
        drop(server);

        let server2 = HabitTrackerServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let tracker = server2.tracker();
        assert!(tracker.logs().is_completed(&HabitId::from("gym"), today));
        assert_eq!(tracker.weights().summary().current, Some(78.2));
        assert_eq!(tracker.daily_goal().get(), 6);
    }

    #[test]
    fn test_malformed_record_falls_back_alone() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        {
            let mut tracker = open_tracker(temp_file.path(), "2024-03-15");
            tracker.update_daily_goal(9);
            tracker.add_weight(80.0, None);
        }

        let store = SqliteStore::new(temp_file.path().to_path_buf()).unwrap();
        store.write(StorageKey::WeightLogs, "{not a list").unwrap();

        let tracker = HabitTracker::open(store);
        assert!(tracker.weights().is_empty());
        assert_eq!(tracker.daily_goal().get(), 9);
        assert_eq!(tracker.habits().len(), 12);
    }

    #[test]
    fn test_instances_on_one_file_stay_in_sync() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut first = open_tracker(temp_file.path(), "2024-03-15");
        let mut second = open_tracker(temp_file.path(), "2024-03-15");
        let today = first.calendar().today();

        first.toggle(&HabitId::from("cardio"), today);
        first.update_daily_goal(3);

        assert_eq!(second.sync(), 2);
        assert!(second.logs().is_completed(&HabitId::from("cardio"), today));
        assert_eq!(second.daily_goal().get(), 3);

        // Own writes are not echoed back
        assert_eq!(first.sync(), 0);

        let weight = second.add_weight(77.0, None).expect("valid weight");
        assert_eq!(first.sync(), 1);
        assert_eq!(first.weights().latest().map(|e| e.id), Some(weight.id));
        assert_eq!(second.sync(), 0);
    }

    #[test]
    fn test_broadcast_peers_converge() {
        let feed = BroadcastFeed::channel(16);
        let peer = feed.subscribe_peer();
        let calendar = CivilCalendar::pinned_on(date("2024-03-15"));

        let mut phone = HabitTracker::load(MemoryStore::new(), calendar.clone(), Box::new(feed));
        let mut laptop = HabitTracker::load(MemoryStore::new(), calendar, Box::new(peer));

        let habit = phone.add_habit(NewHabit {
            name: "Mobility".to_string(),
            emoji: "🤸".to_string(),
            kind: HabitKind::Duration,
            target: Some(20.0),
            unit: Some("minutes".to_string()),
            category: Category::Wellness,
            color: Category::Wellness.color().to_string(),
        });

        assert_eq!(laptop.sync(), 1);
        assert_eq!(laptop.catalog().get(&habit.id), Some(&habit));
        // Applied changes are not written to the receiving store
        assert_eq!(laptop.store().read(StorageKey::Habits).unwrap(), None);
    }

    fn run_session(server: &mut McpServer<MemoryStore>, requests: &[Value]) -> Vec<Value> {
        let input: String = requests.iter().map(|r| format!("{}\n", r)).collect();
        let mut output = Vec::new();

        tokio_test::block_on(server.run_with(input.as_bytes(), &mut output))
            .expect("session failed");

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_mcp_session_over_streams() {
        let tracker = HabitTracker::load(
            MemoryStore::new(),
            CivilCalendar::pinned_on(date("2024-03-15")),
            Box::new(NoSync),
        );
        let mut server = McpServer::new(tracker);

        let responses = run_session(
            &mut server,
            &[
                json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                       "params": {"protocolVersion": "2024-11-05",
                                  "clientInfo": {"name": "test-client", "version": "1.0"}}}),
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
                json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
                json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
                       "params": {"name": "habit_set_value",
                                  "arguments": {"habit_id": "water", "value": 8}}}),
                json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                       "params": {"name": "weight_add",
                                  "arguments": {"weight": -1}}}),
            ],
        );

        // The notification gets no response
        assert_eq!(responses.len(), 4);
        assert!(server.is_initialized());

        assert_eq!(responses[0]["id"], json!(1));
        assert_eq!(responses[0]["result"]["protocolVersion"], json!("2024-11-05"));
        assert_eq!(responses[1]["result"]["tools"].as_array().map(Vec::len), Some(15));

        assert_eq!(responses[2]["result"]["isError"], json!(false));
        let today = server.tracker().calendar().today();
        assert!(server.tracker().logs().is_completed(&HabitId::from("water"), today));

        assert_eq!(responses[3]["result"]["isError"], json!(true));
        assert!(server.tracker().weights().is_empty());
    }
}
