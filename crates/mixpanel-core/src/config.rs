//! Configuration management for the Mixpanel client.

use crate::signing::{expire_in_days, Credential, DEFAULT_EXPIRE_IN_DAYS, DEFAULT_FORMAT};
use crate::{Error, Result};
use std::env;
use std::time::Duration;

/// How the client treats non-2xx HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Hand every response body to the decoder, whatever its status.
    #[default]
    Permissive,
    /// Fail with [`Error::Api`] on any non-2xx status.
    Strict,
}

/// Client configuration.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub secret: String,
    /// Response format sent as the `format` parameter.
    pub format: String,
    /// Base URL for the query endpoints.
    pub api_url: String,
    /// Base URL for the raw export endpoint.
    pub export_url: String,
    /// Days until a signed request expires when the caller sets no `expire`.
    pub expire_days: i64,
    pub status_policy: StatusPolicy,
    /// Request timeout; `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .field("format", &self.format)
            .field("api_url", &self.api_url)
            .field("export_url", &self.export_url)
            .field("expire_days", &self.expire_days)
            .field("status_policy", &self.status_policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Default query API base URL.
    pub const DEFAULT_API_URL: &'static str = "https://mixpanel.com/api/2.0";
    /// Default raw export base URL.
    pub const DEFAULT_EXPORT_URL: &'static str = "https://data.mixpanel.com/api/2.0";

    /// Build a configuration with default hosts and signing settings.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            format: DEFAULT_FORMAT.to_string(),
            api_url: Self::DEFAULT_API_URL.to_string(),
            export_url: Self::DEFAULT_EXPORT_URL.to_string(),
            expire_days: DEFAULT_EXPIRE_IN_DAYS,
            status_policy: StatusPolicy::default(),
            timeout: None,
        }
    }

    /// Point both hosts at the same base URL (useful for proxies and tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.api_url = url.clone();
        self.export_url = url;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// `MIXPANEL_API_KEY` and `MIXPANEL_SECRET` are required; everything else
    /// falls back to the defaults of [`Config::new`].
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from `lookup`, which maps a `MIXPANEL_*` variable
    /// name to its value.
    ///
    /// Optional values that are set but malformed fail with [`Error::Config`].
    #[allow(clippy::result_large_err)]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name).ok_or_else(|| Error::Config {
                message: format!("{} environment variable not set", name),
            })
        };

        // Empty values are rejected later by `Credential::new`.
        let mut config = Self::new(required("MIXPANEL_API_KEY")?, required("MIXPANEL_SECRET")?);

        if let Some(format) = lookup("MIXPANEL_FORMAT") {
            config.format = format;
        }
        if let Some(url) = lookup("MIXPANEL_API_URL") {
            config.api_url = url;
        }
        if let Some(url) = lookup("MIXPANEL_EXPORT_URL") {
            config.export_url = url;
        }
        if let Some(days) = lookup("MIXPANEL_EXPIRE_DAYS") {
            config.expire_days = parse_expire_days(&days)?;
        }
        if let Some(strict) = lookup("MIXPANEL_STRICT_STATUS") {
            config.status_policy = parse_status_policy(&strict)?;
        }
        if let Some(secs) = lookup("MIXPANEL_TIMEOUT_SECS") {
            config.timeout = Some(parse_timeout(&secs)?);
        }

        Ok(config)
    }

    /// Validate and extract the credential pair.
    pub fn credential(&self) -> Result<Credential> {
        Credential::new(self.api_key.clone(), self.secret.clone())
    }
}

fn invalid(name: &str, value: &str, expected: &str) -> Error {
    Error::Config {
        message: format!("{} must be {}, got {:?}", name, expected, value),
    }
}

#[allow(clippy::result_large_err)]
fn parse_expire_days(value: &str) -> Result<i64> {
    let days: i64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("MIXPANEL_EXPIRE_DAYS", value, "an integer"))?;
    if days <= 0 {
        return Err(invalid("MIXPANEL_EXPIRE_DAYS", value, "positive"));
    }
    // Reject windows that would overflow the expiry timestamp.
    expire_in_days(days)
        .map_err(|_| invalid("MIXPANEL_EXPIRE_DAYS", value, "within the date range"))?;
    Ok(days)
}

#[allow(clippy::result_large_err)]
fn parse_status_policy(value: &str) -> Result<StatusPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(StatusPolicy::Strict),
        "" | "0" | "false" | "no" | "off" => Ok(StatusPolicy::Permissive),
        _ => Err(invalid("MIXPANEL_STRICT_STATUS", value, "a boolean")),
    }
}

#[allow(clippy::result_large_err)]
fn parse_timeout(value: &str) -> Result<Duration> {
    value
        .trim()
        .parse()
        .map(Duration::from_secs)
        .map_err(|_| invalid("MIXPANEL_TIMEOUT_SECS", value, "a whole number of seconds"))
}
