//! HTTP client for the Mixpanel data APIs.

pub mod client;

pub use client::{Host, MixpanelClient};
