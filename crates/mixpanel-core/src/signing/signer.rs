//! Request signing for the Mixpanel data APIs.
//!
//! The server recomputes the signature from the received parameters, so the
//! canonical string built here has to match its computation byte for byte:
//! keys sorted ascending, `key=value` pairs concatenated with no separator,
//! the shared secret appended, MD5, lowercase hex.

use chrono::{DateTime, Duration, Utc};
use md5::{Digest, Md5};

use super::credential::Credential;
use super::params::Params;
use crate::{Error, Result};

/// Days until a request expires when no `expire` is given.
pub const DEFAULT_EXPIRE_IN_DAYS: i64 = 5;
/// Response format requested when none is configured.
pub const DEFAULT_FORMAT: &str = "json";

/// Unix timestamp `ttl` after `now`, truncated to whole seconds.
///
/// `None` when the result falls outside the representable date range.
pub fn expire_after(now: DateTime<Utc>, ttl: Duration) -> Option<i64> {
    now.checked_add_signed(ttl).map(|at| at.timestamp())
}

fn out_of_range(amount: i64, unit: &str) -> Error {
    Error::Config {
        message: format!("expiry of {} {} is out of range", amount, unit),
    }
}

/// Unix timestamp `days` days from now.
#[allow(clippy::result_large_err)]
pub fn expire_in_days(days: i64) -> Result<i64> {
    Duration::try_days(days)
        .and_then(|ttl| expire_after(Utc::now(), ttl))
        .ok_or_else(|| out_of_range(days, "days"))
}

/// Unix timestamp `hours` hours from now.
#[allow(clippy::result_large_err)]
pub fn expire_in_hours(hours: i64) -> Result<i64> {
    Duration::try_hours(hours)
        .and_then(|ttl| expire_after(Utc::now(), ttl))
        .ok_or_else(|| out_of_range(hours, "hours"))
}

/// Stamp `expire` with now + `days` unless a non-empty value is already set.
#[allow(clippy::result_large_err)]
pub fn ensure_expiry(params: Params, days: i64) -> Result<Params> {
    match params.get("expire") {
        Some(expire) if !expire.is_empty() => Ok(params),
        _ => Ok(params.with("expire", expire_in_days(days)?.to_string())),
    }
}

/// Sorted `key=value` pairs followed by the secret.
pub fn canonical_string(params: &Params, secret: &str) -> String {
    let mut canonical = String::new();
    for (key, value) in params.iter() {
        canonical.push_str(key);
        canonical.push('=');
        canonical.push_str(value);
    }
    canonical.push_str(secret);
    canonical
}

/// Add `api_key`, `format` and a fresh `sig` to `params`.
///
/// Any existing `sig` is discarded first, so signing an already signed set
/// yields the same signature unless another field changed.
pub fn sign(params: Params, credential: &Credential, format: &str) -> Params {
    let params = params
        .without("sig")
        .with("api_key", credential.api_key())
        .with("format", format);

    let digest = Md5::digest(canonical_string(&params, credential.secret()).as_bytes());
    params.with("sig", hex::encode(digest))
}

/// Signs parameter sets on behalf of one credential.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: Credential,
    format: String,
    expire_days: i64,
}

impl RequestSigner {
    /// Create a signer with the default format and expiry window.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            format: DEFAULT_FORMAT.to_string(),
            expire_days: DEFAULT_EXPIRE_IN_DAYS,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_expire_days(mut self, days: i64) -> Self {
        self.expire_days = days;
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Sign without touching `expire`.
    pub fn sign(&self, params: Params) -> Params {
        sign(params, &self.credential, &self.format)
    }

    /// Stamp the expiry if missing, then sign.
    #[allow(clippy::result_large_err)]
    pub fn authenticate(&self, params: Params) -> Result<Params> {
        Ok(self.sign(ensure_expiry(params, self.expire_days)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_credential() -> Credential {
        Credential::new("k", "s").unwrap()
    }

    #[test]
    fn test_known_vector() {
        let params = Params::from([("expire", "100")]);
        let signed = sign(params, &test_credential(), "json");

        let unsigned = signed.clone().without("sig");
        assert_eq!(
            canonical_string(&unsigned, "s"),
            "api_key=kexpire=100format=jsons"
        );
        assert_eq!(signed.get("sig"), Some("716cb25d675fc53cf60c86563ce64616"));
        assert_eq!(signed.get("api_key"), Some("k"));
        assert_eq!(signed.get("format"), Some("json"));
    }

    #[test]
    fn test_values_are_not_escaped_when_signing() {
        let params = Params::from([
            ("expire", "100"),
            ("event", r#"["a b","c"]"#),
            ("from_date", "2024-01-01"),
        ]);
        let signed = sign(params, &test_credential(), "json");
        assert_eq!(signed.get("sig"), Some("52c58f356b62632f00f759f5ddf27b1a"));
    }

    /// A fixed set of query fields in a deliberately unsorted order.
    fn generate_pairs() -> Vec<(String, String)> {
        [
            ("where", r#"properties["plan"] == "pro""#),
            ("event", r#"["signup","purchase"]"#),
            ("to_date", "2024-01-31"),
            ("expire", "1700000000"),
            ("from_date", "2024-01-01"),
            ("unit", "day"),
            ("Limit", "10"),
            ("on", r#"properties["country"]"#),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Every rotation of the pairs, forwards and reversed.
    fn orderings() -> Vec<Vec<(String, String)>> {
        let pairs = generate_pairs();
        let mut orderings = Vec::new();
        for shift in 0..pairs.len() {
            let mut rotated = pairs.clone();
            rotated.rotate_left(shift);
            orderings.push(rotated.clone());
            rotated.reverse();
            orderings.push(rotated);
        }
        orderings
    }

    fn build(pairs: &[(String, String)]) -> Params {
        pairs
            .iter()
            .fold(Params::new(), |params, (k, v)| params.with(k.as_str(), v.as_str()))
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let credential = test_credential();
        let expected = sign(build(&generate_pairs()), &credential, "json");

        for ordering in orderings() {
            let signed = sign(build(&ordering), &credential, "json");
            assert_eq!(signed.get("sig"), expected.get("sig"));
            assert_eq!(signed, expected);
        }
    }

    #[test]
    fn test_resign_without_change_is_stable() {
        let credential = test_credential();
        for ordering in orderings() {
            let once = sign(build(&ordering), &credential, "json");
            let twice = sign(once.clone(), &credential, "json");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_resign_after_change_differs() {
        let credential = test_credential();
        let once = sign(build(&generate_pairs()), &credential, "json");

        for (key, value) in generate_pairs() {
            let changed = sign(
                once.clone().with(key.as_str(), format!("{}-changed", value)),
                &credential,
                "json",
            );
            assert_ne!(once.get("sig"), changed.get("sig"), "changing {}", key);
        }

        let added = sign(once.clone().with("interval", "7"), &credential, "json");
        assert_ne!(once.get("sig"), added.get("sig"));
    }

    #[test]
    fn test_sign_overwrites_api_key_and_format() {
        let params = Params::from([("api_key", "other"), ("format", "csv"), ("expire", "100")]);
        let signed = sign(params, &test_credential(), "json");
        assert_eq!(signed.get("api_key"), Some("k"));
        assert_eq!(signed.get("format"), Some("json"));
        assert_eq!(signed.get("sig"), Some("716cb25d675fc53cf60c86563ce64616"));
    }

    #[test]
    fn test_ensure_expiry_keeps_existing() {
        let params = ensure_expiry(Params::from([("expire", "100")]), 5).unwrap();
        assert_eq!(params.get("expire"), Some("100"));
    }

    #[test]
    fn test_ensure_expiry_keeps_existing_even_when_days_overflow() {
        let params = ensure_expiry(Params::from([("expire", "100")]), i64::MAX).unwrap();
        assert_eq!(params.get("expire"), Some("100"));
    }

    #[test]
    fn test_ensure_expiry_fills_missing_and_empty() {
        let before = Utc::now().timestamp();
        for params in [Params::new(), Params::from([("expire", "")])] {
            let stamped = ensure_expiry(params, 5).unwrap();
            let expire: i64 = stamped.get("expire").unwrap().parse().unwrap();
            let expected = before + 5 * 24 * 3600;
            assert!(expire >= expected && expire <= expected + 5);
        }
    }

    #[test]
    fn test_expire_after() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(expire_after(now, Duration::days(5)), Some(1_704_499_200));
        assert_eq!(expire_after(now, Duration::hours(1)), Some(1_704_070_800));
        assert_eq!(expire_after(now, Duration::MAX), None);
    }

    #[test]
    fn test_expire_in_hours_is_before_days() {
        assert!(expire_in_hours(1).unwrap() < expire_in_days(1).unwrap());
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        assert!(matches!(expire_in_days(i64::MAX), Err(Error::Config { .. })));
        assert!(matches!(expire_in_hours(i64::MAX), Err(Error::Config { .. })));
        assert!(matches!(expire_in_hours(i64::MIN), Err(Error::Config { .. })));
        // Representable as a duration, but past the last representable date.
        assert!(matches!(
            expire_in_days(i64::MAX / 86_400 / 1000),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_request_signer_authenticate() {
        let signer = RequestSigner::new(test_credential());
        let signed = signer.authenticate(Params::new()).unwrap();
        assert!(signed.contains_key("expire"));
        assert_eq!(signed.get("format"), Some("json"));
        assert_eq!(signed.get("sig").map(str::len), Some(32));
    }

    #[test]
    fn test_request_signer_rejects_out_of_range_expiry() {
        let signer =
            RequestSigner::new(test_credential()).with_expire_days(i64::MAX / 86_400 / 1000);
        let result = signer.authenticate(Params::new());
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_request_signer_custom_format() {
        let signer = RequestSigner::new(test_credential()).with_format("csv");
        let signed = signer.sign(Params::from([("expire", "100")]));
        assert_eq!(signed.get("format"), Some("csv"));
        assert_ne!(signed.get("sig"), Some("716cb25d675fc53cf60c86563ce64616"));
    }
}
