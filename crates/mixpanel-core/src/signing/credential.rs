//! API credential pair.

use crate::{Error, Result};

/// API key and shared secret used to sign every request.
///
/// Both fields are checked at construction and never change afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    secret: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    /// Create a credential, rejecting an empty key or secret.
    pub fn new(api_key: impl Into<String>, secret: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let secret = secret.into();
        if api_key.is_empty() || secret.is_empty() {
            return Err(Error::Credential {
                message: "Mixpanel API credentials not found".to_string(),
            });
        }
        Ok(Self { api_key, secret })
    }

    /// Load from `MIXPANEL_API_KEY` and `MIXPANEL_SECRET`.
    ///
    /// Unset variables are treated as empty and fail the same way.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from `lookup`, which maps a variable name to its value.
    #[allow(clippy::result_large_err)]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("MIXPANEL_API_KEY").unwrap_or_default();
        let secret = lookup("MIXPANEL_SECRET").unwrap_or_default();
        Self::new(api_key, secret)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}
