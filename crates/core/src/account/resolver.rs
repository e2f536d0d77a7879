//! Core identity resolution logic.
//!
//! [`resolve`] maps a request (remote URL or explicit account key) onto a
//! `{name, email, token}` triple using the loaded [`AccountStore`].
//!
//! The lookup order is:
//! 1. The record for the explicit key, or for the owner extracted from the
//!    remote URL.
//! 2. The reserved `default` record when the key is absent or its record
//!    carries no identity fields.
//! 3. Per-field fallback to `default` for name and email.
//!
//! Tokens are identity-specific: a non-default match never inherits the
//! default record's token.

use std::fmt;

use tracing::debug;

use crate::account::store::{AccountStore, DEFAULT_KEY};
use crate::errors::ResolveError;
use crate::git::owner::extract_owner;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// What to resolve: a repository remote URL, an explicit account key, or
/// (invalidly) neither. When both are set the explicit key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Remote URL whose owner segment selects the account.
    pub remote_url: Option<String>,
    /// Account key used verbatim, bypassing owner extraction.
    pub explicit_key: Option<String>,
}

impl ResolutionRequest {
    /// A request keyed on a repository remote URL.
    pub fn for_remote_url(url: impl Into<String>) -> Self {
        Self {
            remote_url: Some(url.into()),
            explicit_key: None,
        }
    }

    /// A request for an explicit account key.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            remote_url: None,
            explicit_key: Some(key.into()),
        }
    }
}

/// The resolved identity. Absent fields stay absent; nothing is fabricated,
/// and the caller decides whether a `None` is fatal.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    /// Resolved `user.name`, if any.
    pub name: Option<String>,
    /// Resolved `user.email`, if any.
    pub email: Option<String>,
    /// Resolved token, if any. Sensitive: never logged, redacted in `Debug`.
    pub token: Option<String>,
    /// The key whose record supplied the match (`"default"` on fallback).
    pub matched_key: String,
    /// Whether the resolver fell back to the default record instead of
    /// matching the requested key.
    pub used_default: bool,
}

impl fmt::Debug for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionResult")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("matched_key", &self.matched_key)
            .field("used_default", &self.used_default)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a request against the store.
///
/// The only error condition is a structurally empty request; every
/// data-level miss degrades to `None` fields. Resolution is pure: repeated
/// calls with the same store and request yield identical results.
pub fn resolve(
    store: &AccountStore,
    request: &ResolutionRequest,
) -> Result<ResolutionResult, ResolveError> {
    // 1. Determine the lookup key.
    let lookup_key = match (&request.explicit_key, &request.remote_url) {
        (Some(key), _) => Some(key.clone()),
        (None, Some(url)) => extract_owner(url),
        (None, None) => return Err(ResolveError::InvalidRequest),
    };

    // 2./3. Match the key's record, or fall back to `default`. A record
    // with no identity fields counts as absent.
    let (matched_key, used_default) = match &lookup_key {
        Some(key) if store.get(key).is_some_and(|r| r.has_identity_fields()) => {
            (key.clone(), false)
        }
        _ => (DEFAULT_KEY.to_string(), true),
    };

    debug!(
        lookup_key = lookup_key.as_deref().unwrap_or("<none>"),
        matched_key = %matched_key,
        used_default,
        "resolved account key"
    );

    let record = store.get(&matched_key);
    let default = store.get(DEFAULT_KEY);

    // 4. Per-field fallback for name/email. The token comes from the
    // matched record only: it reaches across to `default` exactly when the
    // match IS `default`.
    let name = record
        .and_then(|r| r.name.clone())
        .or_else(|| default.and_then(|d| d.name.clone()));
    let email = record
        .and_then(|r| r.email.clone())
        .or_else(|| default.and_then(|d| d.email.clone()));
    let token = record.and_then(|r| r.token.clone());

    Ok(ResolutionResult {
        name,
        email,
        token,
        matched_key,
        used_default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_store() -> AccountStore {
        AccountStore::parse([
            "default.name=D",
            "default.email=d@x",
            "acme.name=A",
        ])
    }

    #[test]
    fn test_explicit_key_with_per_field_fallback() {
        let store = fixture_store();
        let result = resolve(&store, &ResolutionRequest::for_key("acme")).unwrap();
        assert_eq!(result.name.as_deref(), Some("A"));
        assert_eq!(result.email.as_deref(), Some("d@x"));
        assert_eq!(result.token, None);
        assert_eq!(result.matched_key, "acme");
        assert!(!result.used_default);
    }

    #[test]
    fn test_remote_url_owner_match() {
        let store = fixture_store();
        let request = ResolutionRequest::for_remote_url("https://github.com/acme/widgets.git");
        let result = resolve(&store, &request).unwrap();
        assert_eq!(result.matched_key, "acme");
        assert_eq!(result.name.as_deref(), Some("A"));
        assert!(!result.used_default);
    }

    #[test]
    fn test_missing_key_falls_back_to_default() {
        let store = AccountStore::parse(["default.name=D", "default.email=d@x"]);
        let fallback = resolve(&store, &ResolutionRequest::for_key("acme")).unwrap();
        assert_eq!(fallback.matched_key, "default");
        assert!(fallback.used_default);

        // Field-wise, the fallback result equals an explicit lookup of
        // `default` (the used_default flag records the path taken and is
        // excluded from the comparison).
        let explicit = resolve(&store, &ResolutionRequest::for_key("default")).unwrap();
        assert_eq!(fallback.name, explicit.name);
        assert_eq!(fallback.email, explicit.email);
        assert_eq!(fallback.token, explicit.token);
        assert_eq!(fallback.matched_key, explicit.matched_key);
    }

    #[test]
    fn test_unextractable_url_falls_back_to_default() {
        let store = fixture_store();
        let request = ResolutionRequest::for_remote_url("https://gitlab.com/acme/widgets");
        let result = resolve(&store, &request).unwrap();
        assert_eq!(result.matched_key, "default");
        assert!(result.used_default);
        assert_eq!(result.name.as_deref(), Some("D"));
    }

    #[test]
    fn test_token_never_inherited_from_default() {
        let store = AccountStore::parse([
            "default.name=D",
            "default.token=ghp_default_secret",
            "acme.name=A",
        ]);
        let result = resolve(&store, &ResolutionRequest::for_key("acme")).unwrap();
        assert_eq!(result.token, None);

        // But a default match does carry the default token.
        let result = resolve(&store, &ResolutionRequest::for_key("nobody")).unwrap();
        assert_eq!(result.matched_key, "default");
        assert_eq!(result.token.as_deref(), Some("ghp_default_secret"));
    }

    #[test]
    fn test_record_without_fields_counts_as_absent() {
        let store = AccountStore::parse([
            "default.name=D",
            "acme.signing.key=deadbeef",
        ]);
        let result = resolve(&store, &ResolutionRequest::for_key("acme")).unwrap();
        assert_eq!(result.matched_key, "default");
        assert!(result.used_default);
    }

    #[test]
    fn test_no_default_record_yields_empty_result() {
        let store = AccountStore::parse(["acme.name=A"]);
        let result = resolve(&store, &ResolutionRequest::for_key("other")).unwrap();
        assert_eq!(result.name, None);
        assert_eq!(result.email, None);
        assert_eq!(result.token, None);
        assert_eq!(result.matched_key, "default");
        assert!(result.used_default);
    }

    #[test]
    fn test_empty_request_is_invalid() {
        let store = fixture_store();
        let result = resolve(&store, &ResolutionRequest::default());
        assert!(matches!(result, Err(ResolveError::InvalidRequest)));
    }

    #[test]
    fn test_explicit_key_wins_over_remote_url() {
        let store = AccountStore::parse([
            "acme.name=A",
            "beta.name=B",
        ]);
        let request = ResolutionRequest {
            remote_url: Some("https://github.com/acme/widgets".into()),
            explicit_key: Some("beta".into()),
        };
        let result = resolve(&store, &request).unwrap();
        assert_eq!(result.matched_key, "beta");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let store = fixture_store();
        let request = ResolutionRequest::for_remote_url("git@github.com-work:acme/widgets.git");
        let first = resolve(&store, &request).unwrap();
        let second = resolve(&store, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = AccountStore::parse(["default.token=ghp_secret_value"]);
        let result = resolve(&store, &ResolutionRequest::for_key("default")).unwrap();
        let debug = format!("{:?}", result);
        assert!(!debug.contains("ghp_secret_value"));
    }
}
