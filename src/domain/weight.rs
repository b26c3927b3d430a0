/// Body-weight measurements

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::WeightId;

/// A point-in-time body-weight measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLog {
    pub id: WeightId,
    /// Civil date of the measurement; several entries may share a date
    pub date: NaiveDate,
    /// Weight in kg
    pub weight: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl WeightLog {
    /// A new entry, or `None` unless `weight` is a positive finite number
    pub fn new(weight: f64, date: NaiveDate, now: DateTime<Utc>) -> Option<Self> {
        if !weight.is_finite() || weight <= 0.0 {
            return None;
        }
        Some(Self {
            id: WeightId::new(),
            date,
            weight,
            updated_at: now.trunc_subsecs(3),
        })
    }
}

/// Direction of the weight change since the first entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Up,
    Down,
    Flat,
}

impl WeightTrend {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            WeightTrend::Up
        } else if change < 0.0 {
            WeightTrend::Down
        } else {
            WeightTrend::Flat
        }
    }
}

/// Overview of the weight log, first entry to latest entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSummary {
    pub starting: Option<f64>,
    pub current: Option<f64>,
    /// `current - starting`, 0 for an empty log
    pub change: f64,
    pub entries: usize,
    pub trend: WeightTrend,
}

impl WeightSummary {
    pub fn empty() -> Self {
        Self {
            starting: None,
            current: None,
            change: 0.0,
            entries: 0,
            trend: WeightTrend::Flat,
        }
    }
}
