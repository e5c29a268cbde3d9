//! Signing module for Mixpanel API requests.
//!
//! Every request carries `api_key`, `format`, `expire` and `sig`. The
//! signature is an MD5 over the sorted parameters plus the shared secret.
//!
//! # Architecture
//!
//! ```text
//! Params ── expand_event_list ──► ensure_expiry ──► sign ──► query string
//!                                       │             │
//!                                 expire_in_days   Credential
//! ```
//!
//! # Example
//!
//! ```
//! use mixpanel_core::signing::{Credential, Params, RequestSigner};
//!
//! let signer = RequestSigner::new(Credential::new("key", "secret").unwrap());
//! let signed = signer.sign(Params::from([("expire", "100")]));
//! assert_eq!(signed.get("sig").map(str::len), Some(32));
//! ```

pub mod credential;
pub mod params;
pub mod signer;

pub use credential::Credential;
pub use params::{EventKind, Params, Unit};
pub use signer::{
    canonical_string, ensure_expiry, expire_after, expire_in_days, expire_in_hours, sign,
    RequestSigner, DEFAULT_EXPIRE_IN_DAYS, DEFAULT_FORMAT,
};
