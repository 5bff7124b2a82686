//! Commit-change history: per-node, per-day effort deltas.
//!
//! Every time a node's commit value is edited, the signed difference is
//! added to that node's bucket for the current day. The history panel reads
//! these buckets back as a contribution heatmap; classifying a delta into a
//! heat level lives here, drawing it does not.

use std::collections::BTreeMap;

use chrono::{Days, Utc};
use todenet_graph::NodeId;

/// Day buckets for one node: `YYYY-MM-DD` -> summed commit delta.
pub type DayDeltas = BTreeMap<String, f64>;

/// How many recent days the history panel shows.
pub const PANEL_DAYS: usize = 4;

/// Today's day key in UTC, `YYYY-MM-DD`.
pub fn today_key() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// The last `count` day keys, today first, oldest last.
pub fn recent_days(count: usize) -> Vec<String> {
    let today = Utc::now().date_naive();
    (0..count)
        .map(|i| {
            today
                .checked_sub_days(Days::new(i as u64))
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect()
}

/// Heat classification of a day's summed delta, using the history panel's
/// fixed thresholds. Consumers map levels to their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatLevel {
    /// No positive contribution.
    None,
    /// Delta in (0, 10].
    Low,
    /// Delta in (10, 20].
    Medium,
    /// Delta above 20.
    High,
}

impl HeatLevel {
    /// Classify a summed day delta.
    pub fn from_delta(delta: f64) -> Self {
        if delta > 20.0 {
            Self::High
        } else if delta > 10.0 {
            Self::Medium
        } else if delta > 0.0 {
            Self::Low
        } else {
            Self::None
        }
    }
}

/// Accumulated commit deltas for all tracked nodes.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CommitHistory {
    entries: BTreeMap<NodeId, DayDeltas>,
}

impl CommitHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commit edit under today's date. A zero change records
    /// nothing.
    pub fn record(&mut self, id: &NodeId, old_commit: f64, new_commit: f64) {
        self.record_on(id, &today_key(), new_commit - old_commit);
    }

    /// Record a delta under an explicit day key.
    pub fn record_on(&mut self, id: &NodeId, day: &str, delta: f64) {
        if delta == 0.0 {
            return;
        }
        let days = self.entries.entry(id.clone()).or_default();
        *days.entry(day.to_string()).or_insert(0.0) += delta;
    }

    /// Summed delta for a node on a day (0 if nothing was recorded).
    pub fn delta(&self, id: &NodeId, day: &str) -> f64 {
        self.entries
            .get(id)
            .and_then(|days| days.get(day))
            .copied()
            .unwrap_or(0.0)
    }

    /// All day buckets for a node.
    pub fn days(&self, id: &NodeId) -> Option<&DayDeltas> {
        self.entries.get(id)
    }

    /// Replace a node's day buckets wholesale (used when loading).
    pub fn set_days(&mut self, id: NodeId, days: DayDeltas) {
        self.entries.insert(id, days);
    }

    /// Drop a node's history.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<DayDeltas> {
        self.entries.remove(id)
    }

    /// Iterate all tracked node ids.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.keys()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
