//! Mixpanel Core Library
//!
//! Request signing, the HTTP client, and typed response shapes for the
//! Mixpanel query and raw export APIs.

pub mod api;
pub mod config;
pub mod error;
pub mod signing;
pub mod types;

pub use api::{Host, MixpanelClient};
pub use config::{Config, StatusPolicy};
pub use error::{Error, Result};
pub use signing::{Credential, Params, RequestSigner};
