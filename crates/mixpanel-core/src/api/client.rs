//! Mixpanel data API client.
//!
//! Every endpoint goes through [`MixpanelClient::request`]: expand the event
//! list, stamp the expiry, sign, encode the query string, GET, and hand back
//! the raw body for decoding.

use crate::config::{Config, StatusPolicy};
use crate::signing::{Credential, Params, RequestSigner};
use crate::types::{
    parse_export_lines, CommonEventsResult, EventQueryResult, ExportRecord, PeopleResponse,
    SegmentationQueryResult, TopEventsResult,
};
use crate::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Which base URL a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// Query endpoints.
    Api,
    /// Bulk raw event export.
    Export,
}

/// Signed client for the Mixpanel query and export APIs.
///
/// Methods take `&self` and pick the base URL per call, so one client can be
/// shared between tasks.
pub struct MixpanelClient {
    signer: RequestSigner,
    api_url: String,
    export_url: String,
    status_policy: StatusPolicy,
    http_client: reqwest::Client,
}

impl MixpanelClient {
    /// Create a client with the default hosts and settings.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        Self::from_config(&Config::new(api_key, secret))
    }

    /// Create a client from an already validated credential.
    ///
    /// Hosts and signing settings come from `config`; its own key and secret
    /// are ignored.
    pub fn with_credential(credential: Credential, config: &Config) -> Result<Self> {
        Self::build(credential, config)
    }

    /// Create a client from a configuration, validating the credentials first.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credential = config.credential()?;
        Self::build(credential, config)
    }

    /// Create a client from `MIXPANEL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    fn build(credential: Credential, config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let signer = RequestSigner::new(credential)
            .with_format(config.format.clone())
            .with_expire_days(config.expire_days);

        Ok(Self {
            signer,
            api_url: config.api_url.clone(),
            export_url: config.export_url.clone(),
            status_policy: config.status_policy,
            http_client: builder.build()?,
        })
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    pub fn base_url(&self, host: Host) -> &str {
        match host {
            Host::Api => &self.api_url,
            Host::Export => &self.export_url,
        }
    }

    /// Build the full signed request URL without sending it.
    pub fn build_url(&self, host: Host, path: &str, params: Params) -> Result<String> {
        let params = self.signer.authenticate(params.expand_event_list()?)?;
        Ok(format!(
            "{}/{}?{}",
            self.base_url(host).trim_end_matches('/'),
            path.trim_start_matches('/'),
            params.to_query_string()
        ))
    }

    /// Sign and send a GET request, returning the raw response body.
    ///
    /// Under [`StatusPolicy::Permissive`] the body is returned whatever the
    /// status; only transport failures surface as errors.
    pub async fn request(&self, host: Host, path: &str, params: Params) -> Result<Vec<u8>> {
        let param_count = params.len();
        let url = self.build_url(host, path, params)?;
        debug!(?host, path, param_count, "Sending Mixpanel request");

        let response = self
            .http_client
            .get(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            match self.status_policy {
                StatusPolicy::Strict => {
                    let text = match response.text().await {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(
                                error = %e,
                                status = %status,
                                path,
                                "Failed to read error response body"
                            );
                            String::new()
                        }
                    };
                    return Err(Error::Api {
                        message: format!("{} returned {}: {}", path, status, text),
                        status: Some(status.as_u16()),
                    });
                }
                StatusPolicy::Permissive => {
                    warn!(status = %status, path, "Mixpanel returned non-success status");
                }
            }
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        host: Host,
        path: &str,
        params: Params,
    ) -> Result<T> {
        let body = self.request(host, path, params).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Event counts broken down by a property (`events/properties`).
    pub async fn event_query(&self, params: Params) -> Result<EventQueryResult> {
        self.fetch_json(Host::Api, "events/properties", params).await
    }

    /// Raw events from the export host.
    ///
    /// Malformed lines are logged and skipped rather than failing the call.
    pub async fn export_query(&self, params: Params) -> Result<Vec<ExportRecord>> {
        let body = self.request(Host::Export, "export", params).await?;
        Ok(parse_export_lines(&body))
    }

    /// People profiles (`engage`).
    pub async fn people_query(&self, params: Params) -> Result<PeopleResponse> {
        self.fetch_json(Host::Api, "engage", params).await
    }

    /// Properties of the profile with `distinct_id`.
    ///
    /// Returns an empty map when no profile matches.
    pub async fn user_info(&self, distinct_id: &str) -> Result<Map<String, Value>> {
        let params = Params::new().with("distinct_id", distinct_id);
        match self.people_query(params).await? {
            PeopleResponse::Profiles(page) => Ok(page
                .results
                .into_iter()
                .next()
                .map(|record| record.properties)
                .unwrap_or_default()),
            PeopleResponse::Raw(body) => Err(Error::Api {
                message: format!("engage response has no results list: {}", body),
                status: None,
            }),
        }
    }

    /// Event counts segmented by a property (`segmentation`).
    pub async fn segmentation_query(&self, params: Params) -> Result<SegmentationQueryResult> {
        self.fetch_json(Host::Api, "segmentation", params).await
    }

    /// Top events for today with their change against yesterday (`events/top`).
    pub async fn top_events(&self, params: Params) -> Result<TopEventsResult> {
        self.fetch_json(Host::Api, "events/top", params).await
    }

    /// Most common event names over the last 31 days (`events/names`).
    pub async fn most_common_events_last_31_days(
        &self,
        params: Params,
    ) -> Result<CommonEventsResult> {
        self.fetch_json(Host::Api, "events/names", params).await
    }
}

impl std::fmt::Debug for MixpanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixpanelClient")
            .field("api_url", &self.api_url)
            .field("export_url", &self.export_url)
            .field("status_policy", &self.status_policy)
            .finish()
    }
}
