//! Flat-file account store reader/writer.
//!
//! The accounts file format, one field per line:
//!
//! ```text
//! # fallback identity
//! default.name=Jane Doe
//! default.email=jane@example.com
//!
//! work.name=Jane Doe
//! work.email=jane@corp.example.com
//! work.token=ghp_xxxxxxxxxxxxxxxx
//! ```
//!
//! Lines starting with `#` and blank lines are ignored. The key/field pair
//! splits on the FIRST `.`, the value is everything after the FIRST `=`
//! (values may contain `=`). There is no escaping syntax. Malformed lines
//! are skipped, not fatal: this is a hand-edited file and availability wins
//! over strictness. A later duplicate `key.field` line overrides an earlier
//! one.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::StoreError;

/// The reserved fallback key.
pub const DEFAULT_KEY: &str = "default";

/// The fields the resolver understands.
pub const RECOGNIZED_FIELDS: [&str; 3] = ["name", "email", "token"];

// ---------------------------------------------------------------------------
// AccountRecord
// ---------------------------------------------------------------------------

/// One logical identity: the values recorded under a single account key.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountRecord {
    /// Account key (`[A-Za-z0-9_-]+`; `"default"` is the reserved fallback).
    pub key: String,
    /// Git author/committer name (`user.name`).
    pub name: Option<String>,
    /// Git email address (`user.email`).
    pub email: Option<String>,
    /// GitHub token for this account. Sensitive: never logged, and the
    /// `Debug` impl redacts it.
    pub token: Option<String>,
    /// Unrecognized fields, stored in file order but otherwise unused.
    /// Keeping them makes save/load round-trips lossless and leaves room
    /// for future fields.
    pub extra: Vec<(String, String)>,
}

impl AccountRecord {
    /// An empty record for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            email: None,
            token: None,
            extra: Vec::new(),
        }
    }

    /// Whether at least one of the identity fields is set. A record that
    /// fails this check is treated by the resolver as if it did not exist.
    pub fn has_identity_fields(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.token.is_some()
    }

    /// Look up a field by name, recognized or not.
    pub fn get_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "token" => self.token.as_deref(),
            _ => self
                .extra
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, v)| v.as_str()),
        }
    }

    /// Set a field by name. Last write wins, including for unrecognized
    /// fields.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        match field {
            "name" => self.name = Some(value),
            "email" => self.email = Some(value),
            "token" => self.token = Some(value),
            _ => {
                if let Some(slot) = self.extra.iter_mut().find(|(f, _)| f == field) {
                    slot.1 = value;
                } else {
                    self.extra.push((field.to_string(), value));
                }
            }
        }
    }
}

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("extra", &self.extra)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// AccountStore
// ---------------------------------------------------------------------------

/// Insertion-ordered mapping from account key to [`AccountRecord`], loaded
/// once per invocation and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStore {
    entries: HashMap<String, AccountRecord>,
    /// Keys in first-seen order, for listing and serialization.
    order: Vec<String>,
}

impl AccountStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store from a sequence of lines. Never fails: malformed lines
    /// are skipped.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for line in lines {
            let line = line.as_ref().trim_end_matches('\r');
            match parse_line(line) {
                Some((key, field, value)) => store.set_field(key, field, value),
                None => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        debug!(line_len = line.len(), "skipping malformed accounts line");
                    }
                }
            }
        }
        store
    }

    /// Load the accounts file from disk.
    ///
    /// A missing or unreadable file is an error: the store never silently
    /// degrades to empty, so misconfiguration stays visible to the caller.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading accounts file");

        if !path.exists() {
            return Err(StoreError::Unreadable {
                path: path.display().to_string(),
                detail: "file not found".into(),
            });
        }

        let contents =
            std::fs::read_to_string(path).map_err(|e| StoreError::Unreadable {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;

        let store = Self::parse(contents.lines());
        debug!(count = store.len(), "loaded account records");
        Ok(store)
    }

    /// Save the store back to disk in the flat line format. Comments and
    /// blank lines from the original file are not preserved.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        info!(path = %path.display(), "saving accounts file");
        std::fs::write(path, self.serialize())?;
        debug!(count = self.len(), "saved account records");
        Ok(())
    }

    /// Serialize the store to the flat line format, one `key.field=value`
    /// line per field, keys in first-seen order. Re-parsing the output
    /// yields an equivalent store.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for key in &self.order {
            let record = &self.entries[key];
            for field in RECOGNIZED_FIELDS {
                if let Some(value) = record.get_field(field) {
                    out.push_str(key);
                    out.push('.');
                    out.push_str(field);
                    out.push('=');
                    out.push_str(value);
                    out.push('\n');
                }
            }
            for (field, value) in &record.extra {
                out.push_str(key);
                out.push('.');
                out.push_str(field);
                out.push('=');
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }

    /// Look up a record by key.
    pub fn get(&self, key: &str) -> Option<&AccountRecord> {
        self.entries.get(key)
    }

    /// Look up a single field of a record.
    pub fn get_field(&self, key: &str, field: &str) -> Option<&str> {
        self.get(key).and_then(|r| r.get_field(field))
    }

    /// Set one field, creating the record if needed.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        field: impl AsRef<str>,
        value: impl Into<String>,
    ) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
            self.entries.insert(key.clone(), AccountRecord::new(&key));
        }
        if let Some(record) = self.entries.get_mut(&key) {
            record.set_field(field.as_ref(), value);
        }
    }

    /// Account keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of account records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// Parse one line into `(key, field, value)`, or `None` for comments, blank
/// lines, and anything that does not fit the `key.field=value` shape.
fn parse_line(line: &str) -> Option<(&str, &str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    // Value is the raw remainder after the first `=`; it may contain `=`.
    let (lhs, value) = trimmed.split_once('=')?;
    // Key and field split on the first `.` of the left-hand side.
    let (key, field) = lhs.split_once('.')?;

    if !is_valid_key(key) || field.is_empty() {
        return None;
    }

    Some((key, field, value))
}

/// Keys are non-empty and match `[A-Za-z0-9_-]+`. Exposed so callers that
/// accept keys interactively can enforce the same rule the parser does.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_store() {
        let store = AccountStore::parse(
            [
                "# personal accounts",
                "default.name=Jane Doe",
                "default.email=jane@example.com",
                "",
                "work.name=Jane Doe",
                "work.token=ghp_abc123",
            ],
        );
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_field("default", "name"), Some("Jane Doe"));
        assert_eq!(store.get_field("work", "token"), Some("ghp_abc123"));
        assert_eq!(store.get_field("work", "email"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let store = AccountStore::parse([
            "work.email=old@example.com",
            "work.email=new@example.com",
        ]);
        assert_eq!(store.get_field("work", "email"), Some("new@example.com"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_value_may_contain_equals_and_dots() {
        let store = AccountStore::parse(["work.token=abc=def.ghi"]);
        assert_eq!(store.get_field("work", "token"), Some("abc=def.ghi"));
    }

    #[test]
    fn test_field_splits_on_first_dot() {
        let store = AccountStore::parse(["work.signing.key=deadbeef"]);
        assert_eq!(store.get_field("work", "signing.key"), Some("deadbeef"));
        // Unrecognized fields are stored but carry no identity.
        assert!(!store.get("work").unwrap().has_identity_fields());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let store = AccountStore::parse([
            "no-equals-sign",
            "nodot=value",
            ".email=missing-key",
            "bad key.name=spaces",
            "work.=empty-field",
            "work.name=Jane Doe",
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_field("work", "name"), Some("Jane Doe"));
    }

    #[test]
    fn test_invalid_key_characters_rejected() {
        let store = AccountStore::parse(["a/b.name=x", "ok_key-1.name=y"]);
        assert!(store.get("a/b").is_none());
        assert_eq!(store.get_field("ok_key-1", "name"), Some("y"));
    }

    #[test]
    fn test_keys_keep_first_seen_order() {
        let store = AccountStore::parse([
            "zeta.name=Z",
            "alpha.name=A",
            "zeta.email=z@example.com",
        ]);
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_serialize_round_trip() {
        let store = AccountStore::parse([
            "# comment is dropped",
            "default.name=Jane Doe",
            "default.email=jane@example.com",
            "work.token=ghp_abc=123",
            "work.signing.key=deadbeef",
            "work.name=Jane (work)",
        ]);
        let reparsed = AccountStore::parse(store.serialize().lines());
        assert_eq!(reparsed, store);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = AccountStore::load("/nonexistent/gitacct/accounts");
        assert!(matches!(
            result,
            Err(crate::errors::StoreError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts");

        let mut store = AccountStore::new();
        store.set_field("default", "name", "Jane Doe");
        store.set_field("work", "token", "ghp_abc123");
        store.save(&path).unwrap();

        let reloaded = AccountStore::load(&path).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut record = AccountRecord::new("work");
        record.set_field("token", "ghp_secret_value");
        let debug = format!("{:?}", record);
        assert!(!debug.contains("ghp_secret_value"));
        assert!(debug.contains("redacted"));
    }
}
