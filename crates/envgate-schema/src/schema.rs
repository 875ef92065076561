//! # Environment Schema
//!
//! A named registry of field rules indexed by variable name, validated
//! through the `jsonschema` crate (Draft 2020-12).
//!
//! ## Reduced Schemas
//!
//! Restricting a schema to one or several keys is an explicit operation,
//! [`EnvSchema::pick`], which copies the selected rules into a new
//! registry. The accessor factory builds reduced schemas on demand for
//! `get_one_env` and `get_some_env`.
//!
//! ## Validation
//!
//! Validation is total. Every field is prepared, the candidates are
//! checked together against a JSON Schema composed from the per-field
//! fragments, and only if no field failed are the transforms applied.
//! Issues are reported in key order, one per failing field.

use std::collections::{BTreeMap, BTreeSet};

use envgate_core::{EnvSource, HostContext, Issue, ValidationError};
use jsonschema::{Draft, Validator};
use serde_json::{json, Map, Value};

use crate::rules::{Prepared, Rule};

/// Message reported when a requested key has no rule.
pub const UNKNOWN_KEY_MESSAGE: &str = "Unknown environment variable";

/// A named set of field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSchema {
    name: String,
    fields: BTreeMap<String, Rule>,
}

impl EnvSchema {
    /// Create an empty schema. The name appears in every error raised
    /// against it, so processes validating several schemas can tell
    /// them apart.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare a field. Redeclaring a key replaces its rule.
    pub fn field(mut self, key: impl Into<String>, rule: Rule) -> Self {
        self.fields.insert(key.into(), rule);
        self
    }

    /// Returns the schema name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Look up the rule for a key.
    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.fields.get(key)
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reduce the schema to exactly the given keys.
    ///
    /// Duplicates collapse. Keys without a rule are reported as issues
    /// of a [`ValidationError`].
    pub fn pick<I, K>(&self, keys: I) -> Result<EnvSchema, ValidationError>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let requested: BTreeSet<String> =
            keys.into_iter().map(|k| k.as_ref().to_string()).collect();

        let unknown: Vec<Issue> = requested
            .iter()
            .filter(|k| !self.fields.contains_key(k.as_str()))
            .map(|k| Issue::at(k.as_str(), UNKNOWN_KEY_MESSAGE))
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::new(&self.name, unknown));
        }

        let fields = requested
            .into_iter()
            .filter_map(|k| self.fields.get(&k).cloned().map(|rule| (k, rule)))
            .collect();
        Ok(EnvSchema {
            name: self.name.clone(),
            fields,
        })
    }

    /// The composed JSON Schema document, with `required` resolved for
    /// the given host.
    pub fn to_json_schema(&self, host: &HostContext) -> Value {
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, rule)| rule.is_required(host))
            .map(|(key, _)| key.as_str())
            .collect();

        let mut document = self.properties_schema();
        if let Value::Object(map) = &mut document {
            map.insert("$schema".into(), json!("https://json-schema.org/draft/2020-12/schema"));
            map.insert("title".into(), json!(self.name));
            map.insert("required".into(), json!(required));
        }
        document
    }

    /// Object schema over the per-field fragments. Presence is decided
    /// before the engine runs, so there is no `required` list here.
    fn properties_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, rule)| (key.clone(), rule.json_schema()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
        })
    }

    fn build_validator(&self) -> Result<Validator, ValidationError> {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);
        opts.build(&self.properties_schema()).map_err(|e| {
            ValidationError::new(
                &self.name,
                vec![Issue::root(format!("schema compilation failed: {e}"))],
            )
        })
    }

    /// Validate and transform every declared field of `source`.
    ///
    /// Absent optional fields appear in the result as `null`, so the
    /// result keys always equal the schema keys.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field.
    pub fn validate(
        &self,
        source: &EnvSource,
        host: &HostContext,
    ) -> Result<Map<String, Value>, ValidationError> {
        tracing::debug!(schema = %self.name, fields = self.fields.len(), "validating environment");

        // `None` is the whole map; a field may legitimately be keyed "".
        let mut issues: BTreeMap<Option<&str>, String> = BTreeMap::new();
        let mut absent: Vec<&str> = Vec::new();
        let mut candidates = Map::new();

        for (key, rule) in &self.fields {
            match rule.prepare(source.get(key), host) {
                Prepared::Absent => absent.push(key),
                Prepared::Candidate(value) => {
                    candidates.insert(key.clone(), value);
                }
                Prepared::Rejected(message) => {
                    issues.insert(Some(key.as_str()), message);
                }
            }
        }

        let instance = Value::Object(candidates);
        let validator = self.build_validator()?;
        for error in validator.iter_errors(&instance) {
            let pointer = error.instance_path.to_string();
            let Some(key) = top_level_key(&pointer) else {
                issues.entry(None).or_insert_with(|| error.to_string());
                continue;
            };
            if let Some((key, rule)) = self.fields.get_key_value(key.as_str()) {
                issues
                    .entry(Some(key.as_str()))
                    .or_insert_with(|| rule.rejection_message(instance.get(key)));
            }
        }

        if !issues.is_empty() {
            tracing::debug!(schema = %self.name, issues = issues.len(), "environment validation failed");
            let issues = issues
                .into_iter()
                .map(|(key, message)| match key {
                    None => Issue::root(message),
                    Some(key) => Issue::at(key, message),
                })
                .collect();
            return Err(ValidationError::new(&self.name, issues));
        }

        let Value::Object(candidates) = instance else {
            return Ok(Map::new());
        };
        let mut output = Map::new();
        for key in absent {
            output.insert(key.to_string(), Value::Null);
        }
        for (key, value) in candidates {
            let value = match self.fields.get(&key) {
                Some(rule) => rule.transform(value),
                None => value,
            };
            output.insert(key, value);
        }
        Ok(output)
    }
}

/// First segment of a JSON Pointer, unescaped.
fn top_level_key(pointer: &str) -> Option<String> {
    let segment = pointer.strip_prefix('/')?.split('/').next()?;
    Some(segment.replace("~1", "/").replace("~0", "~"))
}
