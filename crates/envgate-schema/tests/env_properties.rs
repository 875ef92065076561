//! Integration test: end-to-end behaviour of the accessor factory, the
//! field rules and the public-env filter over realistic service schemas.

use envgate_core::{parse_public_env, EnvSource, HostContext, HostVocabulary, PublicEnvOptions};
use envgate_schema::{rules, EnvAccess, EnvSchema};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn service_schema() -> EnvSchema {
    EnvSchema::new("backend")
        .field("NODE_ENV", rules::node_env())
        .field("HOST_ENV", rules::host_env(HostVocabulary::Short))
        .field("PORT", rules::integer())
        .field("RATE", rules::number())
        .field("DEBUG", rules::boolean())
        .field("DATABASE_URL", rules::required_string())
        .field("SENTRY_DSN", rules::required_on_not_local_host())
        .field("BANNER", rules::optional_string())
}

fn valid_source() -> EnvSource {
    EnvSource::from([
        ("NODE_ENV", "production"),
        ("HOST_ENV", "prod"),
        ("PORT", "8080"),
        ("RATE", "0.25"),
        ("DEBUG", "false"),
        ("DATABASE_URL", "postgres://db/app"),
        ("SENTRY_DSN", "https://sentry/1"),
        ("SECRET_TOKEN", "hunter2"),
    ])
}

#[test]
fn test_get_all_env_transforms_valid_source() {
    init_tracing();
    let env = EnvAccess::new(service_schema(), valid_source());
    let all = env.get_all_env().unwrap();
    assert_eq!(
        Value::Object(all.values().clone()),
        json!({
            "NODE_ENV": "production",
            "HOST_ENV": "prod",
            "PORT": 8080,
            "RATE": 0.25,
            "DEBUG": false,
            "DATABASE_URL": "postgres://db/app",
            "SENTRY_DSN": "https://sentry/1",
            "BANNER": null,
        })
    );
    assert!(all.flags().is_prod_host_env);
    assert!(all.flags().is_production_node_env);
}

#[test]
fn test_get_all_env_merged_map_contains_predicates() {
    let env = EnvAccess::new(service_schema(), valid_source());
    let map = env.get_all_env().unwrap().into_map();
    assert_eq!(map["PORT"], json!(8080));
    assert_eq!(map["is_prod_host_env"], json!(true));
    assert_eq!(map["is_local_host_env"], json!(false));
    assert_eq!(map["is_deployed_host_env"], json!(true));
    assert!(!map.contains_key("SECRET_TOKEN"));
}

#[test]
fn test_failure_message_names_schema_and_field() {
    init_tracing();
    let mut source = valid_source();
    source.insert("DEBUG", Some("yes".into()));
    let err = EnvAccess::new(service_schema(), source).get_all_env().unwrap_err();

    assert!(err.has_issue_for("DEBUG"));
    assert_eq!(err.issues().len(), 1);
    let msg = err.to_string();
    assert!(msg.contains("'backend'"));
    assert!(msg.contains(r#""path":["DEBUG"]"#));
    assert!(!msg.contains("yes"));
}

#[test]
fn test_conditionally_required_follows_host() {
    let mut source = valid_source();
    source.insert("SENTRY_DSN", None);

    let local = EnvAccess::new(service_schema(), source.clone())
        .with_host_context(HostContext::new("local"));
    assert_eq!(local.get_one_env("SENTRY_DSN").unwrap(), Value::Null);

    let prod = EnvAccess::new(service_schema(), source);
    let err = prod.get_one_env("SENTRY_DSN").unwrap_err();
    assert_eq!(err.issues()[0].message, "Required on not local host");
}

#[test]
fn test_boolean_rule() {
    let schema = EnvSchema::new("flags").field("ON", rules::boolean());
    let get = |raw: &str| {
        EnvAccess::new(schema.clone(), EnvSource::from([("ON", raw)])).get_one_env("ON")
    };
    assert_eq!(get("true").unwrap(), json!(true));
    assert_eq!(get("1").unwrap(), json!(true));
    assert_eq!(get("0").unwrap(), json!(false));
    assert!(get("yes").is_err());
    assert!(get("TRUE").is_err());
}

#[test]
fn test_integer_rule() {
    let schema = EnvSchema::new("limits").field("N", rules::integer());
    let get = |raw: &str| {
        EnvAccess::new(schema.clone(), EnvSource::from([("N", raw)])).get_one_env("N")
    };
    assert_eq!(get("42").unwrap(), json!(42));
    assert_eq!(get("-7").unwrap(), json!(-7));
    assert!(get("4.5").is_err());
    assert!(get("abc").is_err());
}

#[test]
fn test_host_vocabularies_are_not_interchangeable() {
    let legacy = EnvSchema::new("legacy").field("HOST_ENV", rules::host_env(HostVocabulary::Legacy));
    let env = EnvAccess::new(legacy, EnvSource::from([("HOST_ENV", "prod")]));
    assert!(env.get_one_env("HOST_ENV").is_err());

    let legacy = EnvSchema::new("legacy").field("HOST_ENV", rules::host_env(HostVocabulary::Legacy));
    let env = EnvAccess::new(legacy, EnvSource::from([("HOST_ENV", "staging")]));
    assert_eq!(env.get_one_env("HOST_ENV").unwrap(), json!("staging"));
}

#[test]
fn test_get_some_env_accepts_flag_map() {
    let env = EnvAccess::new(service_schema(), valid_source());
    let selection = std::collections::BTreeMap::from([("PORT", true), ("DEBUG", true), ("RATE", false)]);
    let some = env.get_some_env(selection).unwrap();
    assert_eq!(Value::Object(some), json!({ "PORT": 8080, "DEBUG": false }));
}

#[test]
fn test_get_some_env_reports_only_requested_failures() {
    let mut source = valid_source();
    source.insert("PORT", Some("eighty".into()));
    source.insert("RATE", Some("fast".into()));
    let env = EnvAccess::new(service_schema(), source);

    let err = env.get_some_env(["RATE", "DEBUG"]).unwrap_err();
    assert!(err.has_issue_for("RATE"));
    assert!(!err.has_issue_for("PORT"));
}

#[test]
fn test_get_some_env_unknown_key() {
    let env = EnvAccess::new(service_schema(), valid_source());
    let err = env.get_some_env(["PORT", "MISSING"]).unwrap_err();
    assert!(err.has_issue_for("MISSING"));
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct BackendConfig {
    port: u16,
    debug: bool,
    database_url: String,
    banner: Option<String>,
}

#[test]
fn test_get_all_env_as_typed_struct() {
    let env = EnvAccess::new(service_schema(), valid_source());
    let config: BackendConfig = env.get_all_env_as().unwrap();
    assert_eq!(
        config,
        BackendConfig {
            port: 8080,
            debug: false,
            database_url: "postgres://db/app".into(),
            banner: None,
        }
    );
}

#[test]
fn test_public_filter_example() {
    let source = EnvSource::from([("PUBLIC_ENV__X", "1"), ("SECRET", "2"), ("NODE_ENV", "test")]);
    let public = parse_public_env(&source, &PublicEnvOptions::default());
    assert_eq!(
        serde_json::to_value(&public).unwrap(),
        json!({ "PUBLIC_ENV__X": "1", "NODE_ENV": "test" })
    );
}

proptest! {
    #[test]
    fn prop_get_one_agrees_with_get_all(port in 0u32..65536, debug in prop::bool::ANY) {
        let port_raw = port.to_string();
        let debug_raw = if debug { "1" } else { "0" };
        let mut source = valid_source();
        source.insert("PORT", Some(port_raw));
        source.insert("DEBUG", Some(debug_raw.to_string()));
        let env = EnvAccess::new(service_schema(), source);

        let all = env.get_all_env().unwrap();
        for key in env.schema().keys() {
            let one = env.get_one_env(key).unwrap();
            prop_assert_eq!(Some(&one), all.get(key));
        }
        prop_assert_eq!(all.get("PORT"), Some(&json!(port)));
        prop_assert_eq!(all.get("DEBUG"), Some(&json!(debug)));
    }

    #[test]
    fn prop_get_some_returns_exactly_requested_keys(
        picks in proptest::collection::vec(
            prop::sample::select(vec!["NODE_ENV", "PORT", "RATE", "DEBUG", "BANNER"]),
            1..10,
        )
    ) {
        let env = EnvAccess::new(service_schema(), valid_source());
        let some = env.get_some_env(picks.clone()).unwrap();

        let mut expected: Vec<&str> = picks.clone();
        expected.sort_unstable();
        expected.dedup();
        let actual: Vec<&str> = some.keys().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);
    }
}
