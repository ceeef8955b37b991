//! Layered configuration feeding an engine policy.

use std::collections::HashMap;
use std::path::Path;

use popguard_config::loader::load_with_env;
use popguard_config::{Config, ConfigError, ConfigLayer};
use popguard_test::prelude::*;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_defaults_agree_with_engine_defaults() {
    init_test_logging();
    let home = tempfile::tempdir().unwrap();
    let resolved = Config::load_with_home(None, home.path()).unwrap();
    let p = &resolved.config.policy;
    let engine = PolicyConfig::default();

    assert_eq!(p.block_all_popups, engine.block_all_popups);
    assert_eq!(p.confirm_each_action, engine.confirm_each_action);
    assert_eq!(p.use_grant_period, engine.use_grant_period);
    assert_eq!(p.grant_period_ms, engine.grant_period_ms);
    assert_eq!(p.require_secure_origin, engine.require_secure_origin);
    assert_eq!(
        p.allow_unsolicited_redirects,
        engine.allow_unsolicited_redirects
    );
    assert_eq!(p.confirm_on_unload, engine.confirm_on_unload);
    assert_eq!(
        resolved.config.notifications.timeout_ms,
        engine.notification_timeout_ms
    );

    let mut kinds: Vec<ElementKind> = p
        .allowed_elements
        .keys()
        .map(|k| k.parse().unwrap())
        .collect();
    kinds.sort();
    let expected: Vec<ElementKind> = engine.allowed_elements.keys().cloned().collect();
    assert_eq!(kinds, expected);
}

#[test]
fn test_explicit_file_beats_user_file_beats_env() {
    let home = tempfile::tempdir().unwrap();
    write(
        &home.path().join(".popguard/config.toml"),
        "[policy]\ngrant_period_ms = 250\nrequire_secure_origin = false\n",
    );
    let explicit = home.path().join("strict.toml");
    write(&explicit, "[policy]\nblock_all_popups = true\n");

    let env: HashMap<String, String> = [
        ("POPGUARD_GRANT_PERIOD_MS", "999"),
        ("POPGUARD_CONFIRM_EACH_ACTION", "true"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    let resolved = load_with_env(Some(&explicit), Some(home.path()), &env).unwrap();
    let p = &resolved.config.policy;

    assert_eq!(p.grant_period_ms, 250);
    assert!(!p.require_secure_origin);
    assert!(p.block_all_popups);
    assert!(p.confirm_each_action);
    assert_eq!(
        resolved.source_of("policy.confirm_each_action"),
        Some(&ConfigLayer::Environment)
    );
    assert_eq!(
        resolved.source_of("policy.block_all_popups"),
        Some(&ConfigLayer::Explicit)
    );
}

#[test]
fn test_bad_env_value_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let env: HashMap<String, String> =
        HashMap::from([("POPGUARD_GRANT_PERIOD_MS".to_owned(), "soon".to_owned())]);

    let result = load_with_env(None, Some(home.path()), &env);
    assert!(matches!(result, Err(ConfigError::EnvError { .. })));
}

#[test]
fn test_resolved_config_renders_as_json() {
    let home = tempfile::tempdir().unwrap();
    let resolved = Config::load_with_home(None, home.path()).unwrap();

    let json = resolved.render(popguard_config::ShowFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["policy"]["grant_period_ms"], 50);
    assert_eq!(value["logging"]["format"], "compact");
    assert_eq!(
        value["policy"]["allowed_elements"]["button"]["missing_as"],
        "submit"
    );
}
