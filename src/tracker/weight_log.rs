/// Body-weight log, kept in ascending date order

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{WeightId, WeightLog, WeightSummary, WeightTrend};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightLogBook {
    entries: Vec<WeightLog>,
}

impl WeightLogBook {
    pub fn new(entries: Vec<WeightLog>) -> Self {
        Self { entries }
    }

    /// Append an entry and restore ascending date order
    ///
    /// The sort is stable, so entries sharing a date keep insertion order.
    /// Non-positive or non-finite weights are ignored.
    pub fn add(&mut self, weight: f64, date: NaiveDate, now: DateTime<Utc>) -> Option<&WeightLog> {
        let entry = WeightLog::new(weight, date, now)?;
        let id = entry.id;
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.date);

        tracing::debug!("Logged weight {} kg on {} ({})", weight, date, id);
        let index = self
            .entries
            .iter()
            .rposition(|e| e.id == id)
            .unwrap_or(self.entries.len() - 1);
        Some(&self.entries[index])
    }

    /// Remove an entry by id; absent ids are ignored
    pub fn delete(&mut self, id: WeightId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Last entry in date order
    pub fn latest(&self) -> Option<&WeightLog> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[WeightLog] {
        &self.entries
    }

    /// Up to `n` entries, newest first, each with its change from the
    /// entry before it (0 for the first entry)
    pub fn recent(&self, n: usize) -> impl Iterator<Item = (&WeightLog, f64)> + '_ {
        let entries = &self.entries;
        entries.iter().enumerate().rev().take(n).map(move |(index, entry)| {
            let diff = index
                .checked_sub(1)
                .map_or(0.0, |prev| entry.weight - entries[prev].weight);
            (entry, diff)
        })
    }

    /// Change from the first entry to the latest one
    pub fn summary(&self) -> WeightSummary {
        let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) else {
            return WeightSummary::empty();
        };

        let change = last.weight - first.weight;
        WeightSummary {
            starting: Some(first.weight),
            current: Some(last.weight),
            change,
            entries: self.entries.len(),
            trend: WeightTrend::from_change(change),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
