//! # Environment Accessor Factory
//!
//! [`EnvAccess`] binds a schema to a source map and exposes the three
//! accessors every consumer needs:
//!
//! - [`EnvAccess::get_all_env`] — validate the whole schema.
//! - [`EnvAccess::get_one_env`] — validate one key, return its bare value.
//! - [`EnvAccess::get_some_env`] — validate a key subset.
//!
//! plus the eight helper predicates of [`EnvFlags`], which read the raw
//! source and never depend on validation.
//!
//! Every call validates afresh. Nothing is cached and the source is
//! never mutated, so an `EnvAccess` can be shared across threads.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use envgate_core::{EnvFlags, EnvSource, HostContext, Issue, ValidationError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::EnvSchema;

/// Set of keys requested from [`EnvAccess::get_some_env`].
///
/// Built from a key sequence (duplicates collapse, order is irrelevant)
/// or from a key→bool map where keys mapped to `true` are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    /// Iterate the selected keys, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of selected keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<K> for KeySet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(|k| k.as_ref().to_string()).collect())
    }
}

impl<K: AsRef<str>, const N: usize> From<[K; N]> for KeySet {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: AsRef<str>> From<&[K]> for KeySet {
    fn from(keys: &[K]) -> Self {
        keys.iter().collect()
    }
}

impl<K: AsRef<str>> From<Vec<K>> for KeySet {
    fn from(keys: Vec<K>) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: AsRef<str>> From<BTreeSet<K>> for KeySet {
    fn from(keys: BTreeSet<K>) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: AsRef<str>> From<BTreeMap<K, bool>> for KeySet {
    fn from(flags: BTreeMap<K, bool>) -> Self {
        flags
            .into_iter()
            .filter_map(|(k, selected)| selected.then_some(k))
            .collect()
    }
}

impl<K: AsRef<str>, S> From<HashMap<K, bool, S>> for KeySet {
    fn from(flags: HashMap<K, bool, S>) -> Self {
        flags
            .into_iter()
            .filter_map(|(k, selected)| selected.then_some(k))
            .collect()
    }
}

/// Result of [`EnvAccess::get_all_env`]: the validated values together
/// with the helper predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEnv {
    values: Map<String, Value>,
    flags: EnvFlags,
}

impl ValidatedEnv {
    /// Look up a validated value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the validated values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns the helper predicates.
    pub fn flags(&self) -> &EnvFlags {
        &self.flags
    }

    /// Merge the predicates into the value map under their snake_case
    /// names. Schema fields win on a name clash.
    pub fn into_map(self) -> Map<String, Value> {
        let mut values = self.values;
        for (name, flag) in self.flags.entries() {
            values.entry(name).or_insert(Value::Bool(flag));
        }
        values
    }
}

/// Accessors over one schema and one source map.
#[derive(Debug, Clone)]
pub struct EnvAccess {
    schema: EnvSchema,
    source: EnvSource,
    host: HostContext,
}

impl EnvAccess {
    /// Bind a schema to a source. The host context for
    /// conditionally-required rules is taken from the source's
    /// `HOST_ENV`; override it with [`EnvAccess::with_host_context`].
    pub fn new(schema: EnvSchema, source: EnvSource) -> Self {
        let host = HostContext::from_source(&source);
        Self {
            schema,
            source,
            host,
        }
    }

    /// Validate against an explicit host context.
    pub fn with_host_context(mut self, host: HostContext) -> Self {
        self.host = host;
        self
    }

    /// Returns the bound schema.
    pub fn schema(&self) -> &EnvSchema {
        &self.schema
    }

    /// Returns the bound source.
    pub fn source(&self) -> &EnvSource {
        &self.source
    }

    /// Returns the host context used for validation.
    pub fn host_context(&self) -> &HostContext {
        &self.host
    }

    /// Validate every schema field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every failing field.
    pub fn get_all_env(&self) -> Result<ValidatedEnv, ValidationError> {
        let values = self.schema.validate(&self.source, &self.host)?;
        Ok(ValidatedEnv {
            values,
            flags: self.flags(),
        })
    }

    /// Validate every schema field and deserialize the values into `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if validation fails or the values do
    /// not fit `T`.
    pub fn get_all_env_as<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        let values = self.schema.validate(&self.source, &self.host)?;
        serde_json::from_value(Value::Object(values)).map_err(|e| {
            ValidationError::new(
                self.schema.name(),
                vec![Issue::root(format!("cannot deserialize environment: {e}"))],
            )
        })
    }

    /// Validate a single key and return its transformed value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] scoped to `key`.
    pub fn get_one_env(&self, key: &str) -> Result<Value, ValidationError> {
        let mut values = self.schema.pick([key])?.validate(&self.source, &self.host)?;
        Ok(values.remove(key).unwrap_or(Value::Null))
    }

    /// Validate exactly the requested keys and return them.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing requested key.
    pub fn get_some_env(&self, keys: impl Into<KeySet>) -> Result<Map<String, Value>, ValidationError> {
        let keys = keys.into();
        self.schema
            .pick(keys.iter())?
            .validate(&self.source, &self.host)
    }

    /// Helper predicates over the raw source.
    pub fn flags(&self) -> EnvFlags {
        EnvFlags::from_source(&self.source)
    }

    /// `HOST_ENV == "local"`.
    pub fn is_local_host_env(&self) -> bool {
        self.flags().is_local_host_env
    }

    /// `HOST_ENV == "dev"`.
    pub fn is_dev_host_env(&self) -> bool {
        self.flags().is_dev_host_env
    }

    /// `HOST_ENV == "stage"`.
    pub fn is_stage_host_env(&self) -> bool {
        self.flags().is_stage_host_env
    }

    /// `HOST_ENV == "prod"`.
    pub fn is_prod_host_env(&self) -> bool {
        self.flags().is_prod_host_env
    }

    /// `HOST_ENV` is set and is not `"local"`.
    pub fn is_deployed_host_env(&self) -> bool {
        self.flags().is_deployed_host_env
    }

    /// `NODE_ENV == "production"`.
    pub fn is_production_node_env(&self) -> bool {
        self.flags().is_production_node_env
    }

    /// `NODE_ENV == "test"`.
    pub fn is_test_node_env(&self) -> bool {
        self.flags().is_test_node_env
    }

    /// `NODE_ENV == "development"`.
    pub fn is_development_node_env(&self) -> bool {
        self.flags().is_development_node_env
    }
}
