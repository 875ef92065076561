//! # Node and Host Classifications
//!
//! Closed enumerations for the two well-known environment keys:
//!
//! - `NODE_ENV` — runtime mode: `development`, `production`, `test`.
//! - `HOST_ENV` — deployment tier. Two literal vocabularies exist in the
//!   wild, and callers must pick the one their deployments use:
//!
//! | Tier | `Legacy` | `Short` |
//! |------|----------|---------|
//! | Local | `local` | `local` |
//! | Development | `development` | `dev` |
//! | Staging | `staging` | `stage` |
//! | Production | `production` | `prod` |
//!
//! Matching is exact and case-sensitive in both vocabularies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;

/// Runtime mode read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeEnv {
    /// Local development build.
    Development,
    /// Optimized production build.
    Production,
    /// Test runner.
    Test,
}

impl NodeEnv {
    /// Returns all node classifications in canonical order.
    pub fn all() -> &'static [NodeEnv] {
        &[Self::Development, Self::Production, Self::Test]
    }

    /// Returns the `NODE_ENV` literal for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Returns every accepted literal, in canonical order.
    pub fn literals() -> Vec<&'static str> {
        Self::all().iter().map(NodeEnv::as_str).collect()
    }
}

impl fmt::Display for NodeEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeEnv {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ClassificationError::UnknownNodeEnv(other.to_string())),
        }
    }
}

/// Literal set used to spell host tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostVocabulary {
    /// `local`, `development`, `staging`, `production`.
    Legacy,
    /// `local`, `dev`, `stage`, `prod`.
    #[default]
    Short,
}

/// Deployment tier read from `HOST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEnv {
    /// Developer machine.
    Local,
    /// Shared development deployment.
    Development,
    /// Pre-production deployment.
    Staging,
    /// Production deployment.
    Production,
}

impl HostEnv {
    /// Returns all host tiers in canonical order.
    pub fn all() -> &'static [HostEnv] {
        &[Self::Local, Self::Development, Self::Staging, Self::Production]
    }

    /// Returns the literal spelling of this tier in the given vocabulary.
    pub fn as_str(&self, vocabulary: HostVocabulary) -> &'static str {
        match (self, vocabulary) {
            (Self::Local, _) => "local",
            (Self::Development, HostVocabulary::Legacy) => "development",
            (Self::Development, HostVocabulary::Short) => "dev",
            (Self::Staging, HostVocabulary::Legacy) => "staging",
            (Self::Staging, HostVocabulary::Short) => "stage",
            (Self::Production, HostVocabulary::Legacy) => "production",
            (Self::Production, HostVocabulary::Short) => "prod",
        }
    }

    /// Returns every literal accepted by the given vocabulary.
    pub fn literals(vocabulary: HostVocabulary) -> Vec<&'static str> {
        Self::all().iter().map(|h| h.as_str(vocabulary)).collect()
    }

    /// Parse a literal under one vocabulary only.
    pub fn parse(s: &str, vocabulary: HostVocabulary) -> Result<Self, ClassificationError> {
        Self::all()
            .iter()
            .copied()
            .find(|h| h.as_str(vocabulary) == s)
            .ok_or_else(|| ClassificationError::UnknownHostEnv(s.to_string()))
    }
}

impl FromStr for HostEnv {
    type Err = ClassificationError;

    /// Parse a literal from either vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, HostVocabulary::Short).or_else(|_| Self::parse(s, HostVocabulary::Legacy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_env_roundtrip() {
        for node in NodeEnv::all() {
            assert_eq!(node.as_str().parse::<NodeEnv>().unwrap(), *node);
        }
        assert!("Production".parse::<NodeEnv>().is_err());
        assert!("".parse::<NodeEnv>().is_err());
    }

    #[test]
    fn test_host_vocabularies_differ() {
        assert_eq!(
            HostEnv::literals(HostVocabulary::Legacy),
            vec!["local", "development", "staging", "production"]
        );
        assert_eq!(
            HostEnv::literals(HostVocabulary::Short),
            vec!["local", "dev", "stage", "prod"]
        );
    }

    #[test]
    fn test_host_parse_is_vocabulary_scoped() {
        assert_eq!(
            HostEnv::parse("prod", HostVocabulary::Short).unwrap(),
            HostEnv::Production
        );
        assert!(HostEnv::parse("prod", HostVocabulary::Legacy).is_err());
        assert!(HostEnv::parse("staging", HostVocabulary::Short).is_err());
    }

    #[test]
    fn test_host_from_str_accepts_either_vocabulary() {
        assert_eq!("stage".parse::<HostEnv>().unwrap(), HostEnv::Staging);
        assert_eq!("staging".parse::<HostEnv>().unwrap(), HostEnv::Staging);
        assert!("qa".parse::<HostEnv>().is_err());
    }

    #[test]
    fn test_node_env_serde_matches_as_str() {
        for node in NodeEnv::all() {
            let json = serde_json::to_string(node).unwrap();
            assert_eq!(json, format!("\"{}\"", node.as_str()));
        }
    }
}
