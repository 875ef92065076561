//! # envgate-schema — Schema-Driven Environment Validation
//!
//! Turns a raw [`EnvSource`](envgate_core::EnvSource) into a typed,
//! checked view through a declared schema.
//!
//! ## Field Rules (`rules`)
//!
//! Reusable rules for composing schemas: trimmed strings (required,
//! optional, non-empty, required unless the host is local/production),
//! booleans, numbers, integers and the node/host classifications.
//!
//! ## Schemas (`schema`)
//!
//! [`EnvSchema`] is a named registry of rules indexed by key. It compiles
//! to a JSON Schema document checked by the `jsonschema` crate, and can be
//! reduced to a key subset with [`EnvSchema::pick`].
//!
//! ## Accessors (`access`)
//!
//! [`EnvAccess`] binds a schema to a source and exposes `get_all_env`,
//! `get_one_env`, `get_some_env` and the helper predicates.
//!
//! ```
//! use envgate_core::EnvSource;
//! use envgate_schema::{rules, EnvAccess, EnvSchema};
//!
//! let schema = EnvSchema::new("web")
//!     .field("PORT", rules::integer())
//!     .field("DEBUG", rules::boolean());
//! let env = EnvAccess::new(schema, EnvSource::from([("PORT", "80"), ("DEBUG", "1")]));
//!
//! assert_eq!(env.get_one_env("PORT").unwrap(), 80);
//! assert_eq!(env.get_all_env().unwrap().get("DEBUG"), Some(&true.into()));
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `envgate-core` internally.
//! - Host-dependent requiredness reads the [`HostContext`](envgate_core::HostContext)
//!   passed to validation, never process state.
//! - No partial results: a validation call returns every requested field
//!   or a single error naming every failing field.

pub mod access;
pub mod rules;
pub mod schema;

pub use access::{EnvAccess, KeySet, ValidatedEnv};
pub use rules::{Kind, Presence, Rule};
pub use schema::{EnvSchema, UNKNOWN_KEY_MESSAGE};
