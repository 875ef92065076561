//! # Error Types
//!
//! Defines the error types used throughout envgate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Schema validation produces exactly one error kind, [`ValidationError`],
//!   carrying every failing field rather than stopping at the first.
//! - The error message embeds the JSON-serialized issue list so that a
//!   single log line is enough to diagnose a misconfigured deployment.
//! - Values are never copied into issues. Environment variables routinely
//!   hold secrets.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field failure reported by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path segments to the failing field. For environment schemas this
    /// is the variable name; an empty path refers to the whole map.
    pub path: Vec<String>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Issue {
    /// Issue scoped to a single environment variable.
    pub fn at(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![key.into()],
            message: message.into(),
        }
    }

    /// Issue scoped to the whole source map.
    pub fn root(message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
        }
    }

    /// Returns the first path segment, which is the variable name for
    /// every issue produced by an environment schema.
    pub fn key(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

/// Issue list serialized as a JSON array of `{path, message}` objects.
///
/// Wrapped so the error message can embed it through `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no issues.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a slice of all issues.
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Issue> {
        self.0
    }
}

impl From<Vec<Issue>> for Issues {
    fn from(issues: Vec<Issue>) -> Self {
        Self(issues)
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Environment validation failure.
///
/// Raised by every accessor of a validated environment when at least one
/// requested field fails its rule. There is no partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid environment variables for '{schema_name}': {issues}")]
pub struct ValidationError {
    /// Name of the schema that was validated against.
    pub schema_name: String,
    /// Every failing field, in schema key order.
    pub issues: Issues,
}

impl ValidationError {
    /// Build an error from a schema name and its issue list.
    pub fn new(schema_name: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            schema_name: schema_name.into(),
            issues: Issues(issues),
        }
    }

    /// Returns a slice of all issues.
    pub fn issues(&self) -> &[Issue] {
        self.issues.as_slice()
    }

    /// Returns true if any issue refers to the given variable.
    pub fn has_issue_for(&self, key: &str) -> bool {
        self.issues().iter().any(|issue| issue.key() == Some(key))
    }
}

/// A classification literal did not match any known tier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// `NODE_ENV` literal not in `development`/`production`/`test`.
    #[error("unknown node environment: {0:?}")]
    UnknownNodeEnv(String),

    /// `HOST_ENV` literal not in the selected vocabulary.
    #[error("unknown host environment: {0:?}")]
    UnknownHostEnv(String),
}
