//! Mixpanel client
//!
//! Root crate hosting the integration tests and benchmarks. For the client
//! itself, use `mixpanel-core` directly:
//!
//! - `signing`: credentials, parameter sets, request signatures
//! - `api`: the HTTP client and endpoint methods
//! - `types`: response shapes
//! - `config`: environment-driven configuration

pub use mixpanel_core as core;
