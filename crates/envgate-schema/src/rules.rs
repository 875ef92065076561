//! # Field Rules
//!
//! Reusable validation rules for composing environment schemas. Each rule
//! turns raw text (or its absence) into a JSON value, or rejects it.
//!
//! ## Pipeline
//!
//! Validation of one field runs in three steps:
//!
//! 1. **Prepare** — apply the default, trim where the rule trims, and
//!    decide presence. Presence can depend on the [`HostContext`], which
//!    is how conditionally-required rules work.
//! 2. **Check** — the prepared candidate is checked by the `jsonschema`
//!    engine against the rule's JSON Schema fragment.
//! 3. **Transform** — accepted candidates are converted to their output
//!    value (e.g. `"1"` becomes `true`).
//!
//! Rejection messages never include the offending value.

use envgate_core::{HostContext, HostEnv, HostVocabulary, NodeEnv};
use serde_json::{json, Number, Value};

/// Literals accepted by [`boolean`].
pub const BOOLEAN_LITERALS: [&str; 4] = ["true", "false", "1", "0"];

/// Message for a missing required value.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Value shape checked by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Any text.
    String,
    /// One of [`BOOLEAN_LITERALS`]; transforms to a JSON boolean.
    Boolean,
    /// Finite decimal number.
    Number,
    /// Number without a fractional part.
    Integer,
    /// Exact member of a closed literal set.
    OneOf(Vec<String>),
}

/// When an absent value is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Absent is rejected; empty text is accepted.
    Required,
    /// Absent or empty-after-trim is rejected.
    RequiredNonEmpty,
    /// Absent becomes `null`.
    Optional,
    /// Absent or empty is rejected unless the host is one of `hosts`.
    RequiredUnlessHost {
        /// Host literals under which the value may be missing.
        hosts: Vec<String>,
        /// Rejection message.
        message: String,
    },
}

/// Outcome of the prepare step.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Prepared {
    /// Permitted absence; the field's output is `null`.
    Absent,
    /// Value to hand to the schema engine.
    Candidate(Value),
    /// Rejected before reaching the engine.
    Rejected(String),
}

/// A validation rule for one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    kind: Kind,
    presence: Presence,
    default: Option<String>,
}

impl Rule {
    fn new(kind: Kind, presence: Presence) -> Self {
        Self {
            kind,
            presence,
            default: None,
        }
    }

    /// Accept an absent value, producing `null`.
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Substitute `raw` when the variable is absent. The default goes
    /// through the same checks as a supplied value.
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    /// Returns the value shape.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the presence policy.
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// Returns true if an absent value is rejected under this host.
    pub fn is_required(&self, host: &HostContext) -> bool {
        if self.default.is_some() {
            return false;
        }
        match &self.presence {
            Presence::Required | Presence::RequiredNonEmpty => true,
            Presence::Optional => false,
            Presence::RequiredUnlessHost { hosts, .. } => !host_matches(host, hosts),
        }
    }

    /// JSON Schema fragment checked against prepared candidates.
    pub fn json_schema(&self) -> Value {
        match &self.kind {
            Kind::String => json!({ "type": "string" }),
            Kind::Boolean => json!({ "type": "string", "enum": BOOLEAN_LITERALS }),
            Kind::Number => json!({ "type": "number" }),
            Kind::Integer => json!({ "type": "integer" }),
            Kind::OneOf(literals) => json!({ "type": "string", "enum": literals }),
        }
    }

    fn trims(&self) -> bool {
        matches!(self.kind, Kind::String | Kind::Number | Kind::Integer)
    }

    pub(crate) fn prepare(&self, raw: Option<&str>, host: &HostContext) -> Prepared {
        let raw = raw.or(self.default.as_deref());
        let text = match raw {
            Some(raw) if self.trims() => Some(raw.trim()),
            other => other,
        };

        match (&self.presence, text) {
            (Presence::Optional, None) => Prepared::Absent,
            (Presence::Required | Presence::RequiredNonEmpty, None) => {
                Prepared::Rejected(REQUIRED_MESSAGE.to_string())
            }
            (Presence::RequiredNonEmpty, Some("")) => {
                Prepared::Rejected(REQUIRED_MESSAGE.to_string())
            }
            (Presence::RequiredUnlessHost { hosts, message }, text) => match text {
                Some(text) if !text.is_empty() => Prepared::Candidate(self.coerce(text)),
                _ if !host_matches(host, hosts) => Prepared::Rejected(message.clone()),
                None => Prepared::Absent,
                Some(text) => Prepared::Candidate(self.coerce(text)),
            },
            (_, Some(text)) => Prepared::Candidate(self.coerce(text)),
        }
    }

    /// Convert text into the JSON shape the schema engine expects.
    /// Unparseable numbers stay strings so the engine rejects them.
    fn coerce(&self, text: &str) -> Value {
        match self.kind {
            Kind::Number => parse_number(text).unwrap_or_else(|| Value::String(text.to_string())),
            Kind::Integer => parse_number(text)
                .map(integral)
                .unwrap_or_else(|| Value::String(text.to_string())),
            _ => Value::String(text.to_string()),
        }
    }

    pub(crate) fn transform(&self, candidate: Value) -> Value {
        match (&self.kind, candidate) {
            (Kind::Boolean, Value::String(s)) => Value::Bool(s == "true" || s == "1"),
            (_, other) => other,
        }
    }

    pub(crate) fn rejection_message(&self, candidate: Option<&Value>) -> String {
        match &self.kind {
            Kind::String => "Expected a string".to_string(),
            Kind::Boolean => format!("Expected one of: {}", BOOLEAN_LITERALS.join(", ")),
            Kind::Number => "Not a number".to_string(),
            Kind::Integer => match candidate {
                Some(Value::Number(_)) => "Not an integer".to_string(),
                _ => "Not a number".to_string(),
            },
            Kind::OneOf(literals) => format!("Expected one of: {}", literals.join(", ")),
        }
    }
}

fn host_matches(host: &HostContext, hosts: &[String]) -> bool {
    let literals: Vec<&str> = hosts.iter().map(String::as_str).collect();
    host.is_one_of(&literals)
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::from(i));
    }
    let f = text.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

/// Collapse whole floats (`"4.0"`, `"1e3"`) to integers.
fn integral(value: Value) -> Value {
    match value.as_f64() {
        Some(f) if value.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Value::from(f as i64)
        }
        _ => value,
    }
}

/// Trimmed text. Absent is rejected; empty is accepted.
pub fn string() -> Rule {
    Rule::new(Kind::String, Presence::Required)
}

/// Trimmed text or `null`.
pub fn optional_string() -> Rule {
    string().optional()
}

/// Trimmed, non-empty text.
pub fn required_string() -> Rule {
    Rule::new(Kind::String, Presence::RequiredNonEmpty)
}

/// Trimmed text that may be missing only when the host is one of `hosts`.
pub fn required_unless_host<I, H>(hosts: I, message: impl Into<String>) -> Rule
where
    I: IntoIterator<Item = H>,
    H: Into<String>,
{
    Rule::new(
        Kind::String,
        Presence::RequiredUnlessHost {
            hosts: hosts.into_iter().map(Into::into).collect(),
            message: message.into(),
        },
    )
}

/// Required everywhere except on a `local` host.
pub fn required_on_not_local_host() -> Rule {
    required_unless_host(
        [HostEnv::Local.as_str(HostVocabulary::Short)],
        "Required on not local host",
    )
}

/// Required everywhere except on a production host, in either vocabulary.
pub fn required_unless_production_host() -> Rule {
    required_unless_host(
        [
            HostEnv::Production.as_str(HostVocabulary::Legacy),
            HostEnv::Production.as_str(HostVocabulary::Short),
        ],
        "Required on not production host",
    )
}

/// `true`/`1` → `true`, `false`/`0` → `false`. Case-sensitive, untrimmed.
pub fn boolean() -> Rule {
    Rule::new(Kind::Boolean, Presence::Required)
}

/// Finite decimal number, trimmed.
///
/// Blank text is rejected rather than read as `0`, and radix-prefixed
/// literals such as `0x10` are rejected rather than read as hex.
pub fn number() -> Rule {
    Rule::new(Kind::Number, Presence::Required)
}

/// Number without a fractional part.
pub fn integer() -> Rule {
    Rule::new(Kind::Integer, Presence::Required)
}

/// Exact member of `literals`.
pub fn one_of<I, L>(literals: I) -> Rule
where
    I: IntoIterator<Item = L>,
    L: Into<String>,
{
    Rule::new(
        Kind::OneOf(literals.into_iter().map(Into::into).collect()),
        Presence::Required,
    )
}

/// `development`, `production` or `test`.
pub fn node_env() -> Rule {
    one_of(NodeEnv::literals())
}

/// Host tier spelled in the given vocabulary.
pub fn host_env(vocabulary: HostVocabulary) -> Rule {
    one_of(HostEnv::literals(vocabulary))
}
