//! People profiles from the `engage` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One people profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleRecord {
    #[serde(rename = "$distinct_id", default)]
    pub distinct_id: String,
    #[serde(rename = "$properties", default)]
    pub properties: Map<String, Value>,
}

/// A page of people profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngageResponse {
    pub results: Vec<PeopleRecord>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total: u64,
}

/// Response of the `engage` endpoint.
///
/// Bodies that do not carry a `results` list are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PeopleResponse {
    Profiles(EngageResponse),
    Raw(Value),
}

impl PeopleResponse {
    /// Profiles in the response, or `None` for a raw body.
    pub fn profiles(&self) -> Option<&[PeopleRecord]> {
        match self {
            PeopleResponse::Profiles(page) => Some(&page.results),
            PeopleResponse::Raw(_) => None,
        }
    }
}
