//! Request parameter sets.
//!
//! [`Params`] is an ordered string-to-string map. Every mutating method
//! consumes the set and returns the updated one, so a base set can be cloned
//! and reused across calls without any of them seeing the others' changes.

use crate::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Bucket size for time-series queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
        }
    }
}

/// Aggregation applied to event counts (`type` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    General,
    Unique,
    Average,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::General => "general",
            EventKind::Unique => "unique",
            EventKind::Average => "average",
        }
    }
}

/// Query parameters for a single request.
///
/// Keys are kept in byte-wise ascending order, which is also the order the
/// signature's canonical string uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Remove `key` if present.
    pub fn without(mut self, key: &str) -> Self {
        self.entries.remove(key);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` query string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Event names to query, sent comma-joined and expanded to a JSON list
    /// right before signing.
    pub fn event<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = names
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.with("event", joined)
    }

    /// Inclusive date range as `from_date` / `to_date`.
    pub fn date_range(self, from: NaiveDate, to: NaiveDate) -> Self {
        self.with("from_date", from.format("%Y-%m-%d").to_string())
            .with("to_date", to.format("%Y-%m-%d").to_string())
    }

    pub fn unit(self, unit: Unit) -> Self {
        self.with("unit", unit.as_str())
    }

    /// Number of `unit`s to look back from today.
    pub fn interval(self, interval: u32) -> Self {
        self.with("interval", interval.to_string())
    }

    pub fn limit(self, limit: u32) -> Self {
        self.with("limit", limit.to_string())
    }

    pub fn kind(self, kind: EventKind) -> Self {
        self.with("type", kind.as_str())
    }

    /// Property expression to segment on.
    pub fn on(self, expression: impl Into<String>) -> Self {
        self.with("on", expression)
    }

    /// Filter expression (`where` parameter).
    pub fn filter(self, expression: impl Into<String>) -> Self {
        self.with("where", expression)
    }

    /// Replace a comma-separated `event` value with its JSON list form.
    ///
    /// An empty `event` is dropped entirely.
    pub(crate) fn expand_event_list(mut self) -> Result<Self> {
        match self.entries.remove("event") {
            Some(event) if !event.is_empty() => {
                let events: Vec<&str> = event.split(',').collect();
                let encoded = serde_json::to_string(&events)?;
                Ok(self.with("event", encoded))
            }
            _ => Ok(self),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
