//! # envgate-core — Foundational Types for envgate
//!
//! This crate defines the inputs and outputs shared by every envgate
//! component. It depends on nothing internal.
//!
//! ## Contents
//!
//! 1. **`EnvSource`.** Ordered, read-only mapping from variable name to
//!    optional value. [`EnvSource::from_process`] is the only place that
//!    touches process state.
//!
//! 2. **`HostContext`.** The host classification consulted by
//!    conditionally-required rules, passed explicitly into validation.
//!
//! 3. **Classifications.** `NodeEnv` and `HostEnv` with both host
//!    vocabularies (`Legacy` and `Short`).
//!
//! 4. **`EnvFlags`.** The eight helper predicates over raw `HOST_ENV` and
//!    `NODE_ENV`.
//!
//! 5. **Public-env filter.** [`parse_public_env`] selects entries safe to
//!    expose outside the process.
//!
//! 6. **`ValidationError`.** The single failure kind of schema validation.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Variable values are never logged.

pub mod classification;
pub mod error;
pub mod flags;
pub mod public;
pub mod source;

// Re-export primary types for ergonomic imports.
pub use classification::{HostEnv, HostVocabulary, NodeEnv};
pub use error::{ClassificationError, Issue, Issues, ValidationError};
pub use flags::EnvFlags;
pub use public::{parse_public_env, PublicEnvOptions, DEFAULT_PUBLIC_KEYS, DEFAULT_PUBLIC_PREFIX};
pub use source::{EnvSource, HostContext, HOST_ENV_KEY, NODE_ENV_KEY, SOURCE_VERSION_KEY};
