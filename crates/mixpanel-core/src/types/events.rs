//! Event rankings and name lists.

use serde::{Deserialize, Serialize};

/// One entry of the `events/top` ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEvent {
    pub event: String,
    pub amount: i64,
    /// Change against the previous period, as a fraction.
    #[serde(default)]
    pub percent_change: f64,
}

/// Result of `events/top`, ordered by `amount` descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopEventsResult {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub events: Vec<TopEvent>,
}

/// Result of `events/names`: most common event names, most frequent first.
pub type CommonEventsResult = Vec<String>;
