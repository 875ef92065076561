//! # Environment Source Map
//!
//! The raw key/value input every envgate operation reads from. Values
//! are `Option<String>` so that a declared-but-unset variable can be
//! represented distinctly from an empty one.
//!
//! ## Ordering
//!
//! Entries keep insertion order (an `IndexMap`). The public-env filter
//! promises to emit entries in source order, so a sorted map would not
//! do. Inserting an existing key replaces its value in place.
//!
//! ## Host Context
//!
//! [`HostContext`] carries the host classification that
//! conditionally-required rules consult. It is passed explicitly into
//! validation rather than read from process state.

use std::ffi::OsString;

use indexmap::IndexMap;
use serde::Serialize;

/// Well-known key holding the deployment tier.
pub const HOST_ENV_KEY: &str = "HOST_ENV";
/// Well-known key holding the runtime mode.
pub const NODE_ENV_KEY: &str = "NODE_ENV";
/// Well-known key holding the deployed build revision.
pub const SOURCE_VERSION_KEY: &str = "SOURCE_VERSION";

/// Ordered mapping from variable name to optional text value.
///
/// Serializes as a JSON object in insertion order, with unset values
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvSource {
    entries: IndexMap<String, Option<String>>,
}

impl EnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let mut source = Self::new();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => source.insert(key, Some(value)),
                (Ok(key), Err(_)) => {
                    tracing::warn!(key = %key, "skipping environment variable with non-UTF-8 value");
                }
                (Err(key), _) => {
                    tracing::warn!(key = ?lossy(&key), "skipping environment variable with non-UTF-8 name");
                }
            }
        }
        tracing::debug!(entries = source.len(), "captured process environment");
        source
    }

    /// Insert or replace an entry. Replacement keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    /// Look up a value. Returns `None` both for unknown keys and for keys
    /// present without a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Option::as_deref)
    }

    /// Returns true if the key is present, with or without a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lossy(s: &OsString) -> String {
    s.to_string_lossy().into_owned()
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for EnvSource {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (k, v) in iter {
            source.insert(k, v);
        }
        source
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for EnvSource {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k, Some(v.into())))
            .collect()
    }
}

/// Host classification in effect while validating.
///
/// Holds the raw `HOST_ENV` literal. Comparisons are exact and
/// case-sensitive; an unset host matches no tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostContext {
    host_env: Option<String>,
}

impl HostContext {
    /// Context for an explicit host literal.
    pub fn new(host_env: impl Into<String>) -> Self {
        Self {
            host_env: Some(host_env.into()),
        }
    }

    /// Context with no host classification.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Derive the context from the `HOST_ENV` entry of a source map.
    pub fn from_source(source: &EnvSource) -> Self {
        Self {
            host_env: source.get(HOST_ENV_KEY).map(str::to_owned),
        }
    }

    /// Returns the raw host literal, if any.
    pub fn host_env(&self) -> Option<&str> {
        self.host_env.as_deref()
    }

    /// Returns true if the host literal equals any of the given literals.
    pub fn is_one_of(&self, literals: &[&str]) -> bool {
        self.host_env()
            .is_some_and(|host| literals.iter().any(|l| *l == host))
    }
}
