/// Tool for reading or changing the daily goal

use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;
use crate::tools::ToolError;
use crate::tracker::HabitTracker;

/// Omit `goal` to read the current value
#[derive(Debug, Default, Deserialize)]
pub struct DailyGoalParams {
    #[serde(default)]
    pub goal: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DailyGoalResponse {
    pub goal: u32,
    pub completed_today: usize,
    pub message: String,
}

pub fn daily_goal<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: DailyGoalParams,
) -> Result<DailyGoalResponse, ToolError> {
    if let Some(goal) = params.goal {
        if !tracker.update_daily_goal(goal) {
            return Err(ToolError::Validation(format!(
                "Daily goal must be a positive whole number, got {}",
                goal
            )));
        }
    }

    let goal = tracker.daily_goal().get();
    let completed_today = tracker.stats().total_completed_today();
    let verb = if params.goal.is_some() { "set to" } else { "is" };

    Ok(DailyGoalResponse {
        goal,
        completed_today,
        message: format!(
            "🎯 Daily goal {} {} habits ({} done today)",
            verb, goal, completed_today
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_read_and_set_goal() {
        let mut tracker = HabitTracker::open(MemoryStore::new());

        let current = daily_goal(&mut tracker, DailyGoalParams::default()).unwrap();
        assert_eq!(current.goal, 5);

        let updated = daily_goal(&mut tracker, DailyGoalParams { goal: Some(7) }).unwrap();
        assert_eq!(updated.goal, 7);
        assert!(updated.message.contains("set to 7"));

        assert!(daily_goal(&mut tracker, DailyGoalParams { goal: Some(0) }).is_err());
        assert_eq!(tracker.daily_goal().get(), 7);
    }
}
