//! # Public-Env Filter
//!
//! Selects the subset of a source map that is safe to expose outside the
//! trusted process, e.g. to a browser bundle. An entry passes when its key
//! starts with the public prefix or exactly matches an allowlisted name.
//!
//! Values are not validated here and pass through unchanged, unset ones
//! included. Output order follows the source.

use crate::source::{EnvSource, HOST_ENV_KEY, NODE_ENV_KEY, SOURCE_VERSION_KEY};

/// Default key prefix marking a variable as public.
pub const DEFAULT_PUBLIC_PREFIX: &str = "PUBLIC_ENV__";

/// Default exact-name allowlist.
pub const DEFAULT_PUBLIC_KEYS: [&str; 3] = [NODE_ENV_KEY, HOST_ENV_KEY, SOURCE_VERSION_KEY];

/// Filter settings for [`parse_public_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicEnvOptions {
    prefix: String,
    keys: Vec<String>,
}

impl Default for PublicEnvOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            keys: DEFAULT_PUBLIC_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl PublicEnvOptions {
    /// Replace the public prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the exact-name allowlist.
    pub fn with_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the public prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the exact-name allowlist.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns true if a variable with this name may be exposed.
    pub fn is_public(&self, key: &str) -> bool {
        key.starts_with(self.prefix.as_str()) || self.keys.iter().any(|k| k == key)
    }
}

/// Copy the public entries of `source` into a new source map.
pub fn parse_public_env(source: &EnvSource, options: &PublicEnvOptions) -> EnvSource {
    source
        .iter()
        .filter(|(key, _)| options.is_public(key))
        .map(|(key, value)| (key, value.map(str::to_owned)))
        .collect()
}
