//! Series breakdowns returned by the event-properties and segmentation
//! endpoints.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time series plus a count table keyed by segment, then by series entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesData {
    #[serde(default)]
    pub series: Vec<String>,
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, i64>>,
}

impl SeriesData {
    /// Count for `segment` at `point`, if reported.
    pub fn value(&self, segment: &str, point: &str) -> Option<i64> {
        self.values.get(segment)?.get(point).copied()
    }
}

/// Breakdown response with its legend size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownResult {
    #[serde(default)]
    pub legend_size: u32,
    pub data: SeriesData,
}

/// Result of `events/properties`.
pub type EventQueryResult = BreakdownResult;

/// Result of `segmentation`.
pub type SegmentationQueryResult = BreakdownResult;
