use super::*;

#[test]
fn test_deep_merge_scalars() {
    let mut base: toml::Value = toml::from_str(
        r"
        [policy]
        grant_period_ms = 50
        use_grant_period = true
    ",
    )
    .unwrap();

    let overlay: toml::Value = toml::from_str(
        r"
        [policy]
        grant_period_ms = 250
    ",
    )
    .unwrap();

    deep_merge(&mut base, &overlay);

    let policy = base["policy"].as_table().unwrap();
    assert_eq!(policy["grant_period_ms"].as_integer().unwrap(), 250);
    assert!(policy["use_grant_period"].as_bool().unwrap());
}

#[test]
fn test_deep_merge_nested_tables() {
    let mut base: toml::Value = toml::from_str(
        r#"
        [policy.allowed_elements.link]
        [policy.allowed_elements.button]
        attribute = "type"
        values = ["submit"]
    "#,
    )
    .unwrap();

    let overlay: toml::Value = toml::from_str(
        r#"
        [policy.allowed_elements.button]
        values = ["submit", "button"]
        [policy.allowed_elements.area]
    "#,
    )
    .unwrap();

    deep_merge(&mut base, &overlay);

    let elements = base["policy"]["allowed_elements"].as_table().unwrap();
    assert!(elements.contains_key("link"));
    assert!(elements.contains_key("area"));
    // Arrays replace rather than append.
    assert_eq!(elements["button"]["values"].as_array().unwrap().len(), 2);
    assert_eq!(elements["button"]["attribute"].as_str().unwrap(), "type");
}

#[test]
fn test_deep_merge_tracking_records_leaves() {
    let mut base: toml::Value = toml::from_str(
        r#"
        [logging]
        level = "info"
    "#,
    )
    .unwrap();
    let overlay: toml::Value = toml::from_str(
        r#"
        [logging]
        level = "debug"
        [notifications]
        timeout_ms = 5000
    "#,
    )
    .unwrap();

    let mut sources = FieldSources::new();
    deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::Explicit, &mut sources);

    assert_eq!(sources.get("logging.level"), Some(&ConfigLayer::Explicit));
    assert_eq!(
        sources.get("notifications.timeout_ms"),
        Some(&ConfigLayer::Explicit)
    );
    assert_eq!(base["logging"]["level"].as_str().unwrap(), "debug");
}

#[test]
fn test_layer_is_file() {
    assert!(ConfigLayer::User.is_file());
    assert!(ConfigLayer::Explicit.is_file());
    assert!(!ConfigLayer::Defaults.is_file());
    assert!(!ConfigLayer::Environment.is_file());
}
