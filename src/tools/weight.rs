/// Tools for the body-weight log
///
/// Implements weight_add, weight_delete and weight_summary.

use serde::{Deserialize, Serialize};

use crate::domain::{parse_date, WeightId, WeightSummary, WeightTrend};
use crate::storage::KeyValueStore;
use crate::tools::ToolError;
use crate::tracker::HabitTracker;

const DEFAULT_RECENT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct AddWeightParams {
    /// Weight in kg
    pub weight: f64,
    /// YYYY-MM-DD, defaults to today
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteWeightParams {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeightSummaryParams {
    /// How many recent entries to list
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WeightChangeResponse {
    pub success: bool,
    pub id: String,
    pub message: String,
}

/// One listed entry with the change from the entry before it
#[derive(Debug, Serialize)]
pub struct WeightEntryView {
    pub id: String,
    pub date: String,
    pub weight: f64,
    pub diff: f64,
}

#[derive(Debug, Serialize)]
pub struct WeightSummaryResponse {
    pub summary: WeightSummary,
    pub recent: Vec<WeightEntryView>,
    pub message: String,
}

/// Log a weight measurement
pub fn add_weight<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: AddWeightParams,
) -> Result<WeightChangeResponse, ToolError> {
    let date = params.date.as_deref().map(parse_date).transpose()?;

    let entry = tracker.add_weight(params.weight, date).ok_or_else(|| {
        ToolError::Validation("Weight must be a positive number".to_string())
    })?;
    let summary = tracker.weights().summary();

    let mut message = format!(
        "⚖️ Logged {:.1} kg for {}",
        entry.weight,
        tracker.calendar().format_display(entry.date)
    );
    if summary.entries > 1 {
        message.push_str(&format!(" ({:+.1} kg since you started)", summary.change));
    }
    message.push_str(&format!("\nEntry ID: {}", entry.id));

    Ok(WeightChangeResponse {
        success: true,
        id: entry.id.to_string(),
        message,
    })
}

/// Remove a weight entry by id
///
/// Deleting an id that is not in the log succeeds without changing anything.
pub fn delete_weight<S: KeyValueStore>(
    tracker: &mut HabitTracker<S>,
    params: DeleteWeightParams,
) -> Result<WeightChangeResponse, ToolError> {
    let id = WeightId::from_string(params.id.trim())?;
    let message = if tracker.delete_weight(id) {
        "🗑️ Deleted weight entry".to_string()
    } else {
        format!("No weight entry {}, nothing to delete", id)
    };

    Ok(WeightChangeResponse {
        success: true,
        id: id.to_string(),
        message,
    })
}

/// Starting, current and recent weights
pub fn weight_summary<S: KeyValueStore>(
    tracker: &HabitTracker<S>,
    params: WeightSummaryParams,
) -> Result<WeightSummaryResponse, ToolError> {
    let book = tracker.weights();
    let summary = book.summary();
    let limit = params.limit.unwrap_or(DEFAULT_RECENT);

    let recent: Vec<WeightEntryView> = book
        .recent(limit)
        .map(|(entry, diff)| WeightEntryView {
            id: entry.id.to_string(),
            date: entry.date.to_string(),
            weight: entry.weight,
            diff,
        })
        .collect();

    let message = match (summary.starting, summary.current) {
        (Some(starting), Some(current)) => {
            let arrow = match summary.trend {
                WeightTrend::Up => "📈",
                WeightTrend::Down => "📉",
                WeightTrend::Flat => "➡️",
            };
            let lines = recent
                .iter()
                .map(|e| format!("{}  {:.1} kg ({:+.1})", e.date, e.weight, e.diff))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "⚖️ **Weight** ({} entries)\nStarting: {:.1} kg | Current: {:.1} kg | Change: {} {:+.1} kg\n\n{}",
                summary.entries, starting, current, arrow, summary.change, lines
            )
        }
        _ => "No weight entries yet. Log your weight to start tracking your progress.".to_string(),
    };

    Ok(WeightSummaryResponse {
        summary,
        recent,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CivilCalendar;
    use crate::storage::MemoryStore;
    use crate::sync::NoSync;

    fn tracker() -> HabitTracker<MemoryStore> {
        let calendar = CivilCalendar::pinned_on(parse_date("2024-03-15").unwrap());
        HabitTracker::load(MemoryStore::new(), calendar, Box::new(NoSync))
    }

    fn add(tracker: &mut HabitTracker<MemoryStore>, weight: f64, date: &str) -> String {
        let params = AddWeightParams {
            weight,
            date: Some(date.to_string()),
        };
        add_weight(tracker, params).unwrap().id
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        let mut tracker = tracker();
        for weight in [0.0, -70.0, f64::NAN] {
            let params = AddWeightParams { weight, date: None };
            assert!(add_weight(&mut tracker, params).is_err());
        }
        assert!(tracker.weights().is_empty());
    }

    #[test]
    fn test_summary_lists_newest_first_with_diffs() {
        let mut tracker = tracker();
        add(&mut tracker, 80.0, "2024-03-01");
        add(&mut tracker, 78.5, "2024-03-10");
        add(&mut tracker, 79.0, "2024-03-05");

        let response = weight_summary(&tracker, WeightSummaryParams::default()).unwrap();
        assert_eq!(response.summary.starting, Some(80.0));
        assert_eq!(response.summary.current, Some(78.5));
        assert_eq!(response.summary.trend, WeightTrend::Down);
        assert_eq!(response.recent[0].date, "2024-03-10");
        assert!((response.recent[0].diff + 0.5).abs() < 1e-9);
        assert_eq!(response.recent[2].diff, 0.0);
    }

    #[test]
    fn test_delete_weight() {
        let mut tracker = tracker();
        let id = add(&mut tracker, 80.0, "2024-03-01");

        let params = DeleteWeightParams { id: id.clone() };
        assert!(delete_weight(&mut tracker, params).is_ok());

        let again = DeleteWeightParams { id };
        let response = delete_weight(&mut tracker, again).unwrap();
        assert!(response.success);
        assert!(response.message.contains("nothing to delete"));
        assert!(tracker.weights().is_empty());

        let garbage = DeleteWeightParams {
            id: "not-a-uuid".to_string(),
        };
        assert!(matches!(
            delete_weight(&mut tracker, garbage),
            Err(ToolError::Domain(_))
        ));
    }
}
