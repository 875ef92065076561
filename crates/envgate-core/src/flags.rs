//! # Environment Helper Predicates
//!
//! Eight booleans derived from the raw `HOST_ENV` and `NODE_ENV` entries
//! of a source map. They read the source directly and do not depend on
//! schema validation succeeding, so a process can still tell which tier
//! it is running in while reporting a configuration error.
//!
//! Host predicates compare against the `Short` vocabulary
//! (`local`/`dev`/`stage`/`prod`).

use serde::Serialize;

use crate::classification::{HostEnv, HostVocabulary, NodeEnv};
use crate::source::{EnvSource, HOST_ENV_KEY, NODE_ENV_KEY};

/// Snapshot of the helper predicates for one source map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnvFlags {
    /// `HOST_ENV == "local"`.
    pub is_local_host_env: bool,
    /// `HOST_ENV == "dev"`.
    pub is_dev_host_env: bool,
    /// `HOST_ENV == "stage"`.
    pub is_stage_host_env: bool,
    /// `HOST_ENV == "prod"`.
    pub is_prod_host_env: bool,
    /// `HOST_ENV` is set and is not `"local"`.
    pub is_deployed_host_env: bool,
    /// `NODE_ENV == "production"`.
    pub is_production_node_env: bool,
    /// `NODE_ENV == "test"`.
    pub is_test_node_env: bool,
    /// `NODE_ENV == "development"`.
    pub is_development_node_env: bool,
}

impl EnvFlags {
    /// Compute the predicates from the raw source entries.
    pub fn from_source(source: &EnvSource) -> Self {
        let host = source
            .get(HOST_ENV_KEY)
            .and_then(|raw| HostEnv::parse(raw, HostVocabulary::Short).ok());
        let node = source
            .get(NODE_ENV_KEY)
            .and_then(|raw| raw.parse::<NodeEnv>().ok());

        Self {
            is_local_host_env: host == Some(HostEnv::Local),
            is_dev_host_env: host == Some(HostEnv::Development),
            is_stage_host_env: host == Some(HostEnv::Staging),
            is_prod_host_env: host == Some(HostEnv::Production),
            is_deployed_host_env: source
                .get(HOST_ENV_KEY)
                .is_some_and(|raw| raw != HostEnv::Local.as_str(HostVocabulary::Short)),
            is_production_node_env: node == Some(NodeEnv::Production),
            is_test_node_env: node == Some(NodeEnv::Test),
            is_development_node_env: node == Some(NodeEnv::Development),
        }
    }

    /// Returns the predicates as `(name, value)` pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, bool); 8] {
        [
            ("is_local_host_env", self.is_local_host_env),
            ("is_dev_host_env", self.is_dev_host_env),
            ("is_stage_host_env", self.is_stage_host_env),
            ("is_prod_host_env", self.is_prod_host_env),
            ("is_deployed_host_env", self.is_deployed_host_env),
            ("is_production_node_env", self.is_production_node_env),
            ("is_test_node_env", self.is_test_node_env),
            ("is_development_node_env", self.is_development_node_env),
        ]
    }
}
