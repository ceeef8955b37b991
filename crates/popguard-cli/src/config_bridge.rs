//! Bridge from `popguard_config::Config` to engine and telemetry types.
//!
//! The config crate only knows TOML-shaped sections. This module turns them
//! into the engine's [`PolicyConfig`] and the telemetry crate's
//! [`LogConfig`] at startup.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use popguard_config::{Config, ElementRuleSection, LoggingSection};
use popguard_core::{ElementKind, ElementRule, PolicyConfig};
use popguard_telemetry::{LogConfig, LogFormat};

/// Convert the policy and notification sections into a [`PolicyConfig`].
///
/// Entries with `enabled = false` are left out of the allow-list.
///
/// # Errors
///
/// Returns an error if an element kind cannot be parsed.
pub(crate) fn to_policy_config(config: &Config) -> Result<PolicyConfig> {
    let p = &config.policy;

    let mut allowed_elements = BTreeMap::new();
    for (name, section) in &p.allowed_elements {
        if !section.enabled {
            continue;
        }
        let kind: ElementKind = name
            .parse()
            .map_err(|e: String| anyhow!("policy.allowed_elements.{name}: {e}"))?;
        allowed_elements.insert(kind, to_element_rule(section));
    }

    Ok(PolicyConfig {
        block_all_popups: p.block_all_popups,
        confirm_each_action: p.confirm_each_action,
        use_grant_period: p.use_grant_period,
        grant_period_ms: p.grant_period_ms,
        require_secure_origin: p.require_secure_origin,
        allow_unsolicited_redirects: p.allow_unsolicited_redirects,
        confirm_on_unload: p.confirm_on_unload,
        notification_timeout_ms: config.notifications.timeout_ms,
        allowed_elements,
    })
}

fn to_element_rule(section: &ElementRuleSection) -> ElementRule {
    match &section.attribute {
        None => ElementRule::Any,
        Some(attribute) => ElementRule::AttributeOneOf {
            attribute: attribute.to_ascii_lowercase(),
            values: section.values.clone(),
            missing_as: section.missing_as.clone(),
        },
    }
}

/// Convert the logging section into a [`LogConfig`] writing to stderr.
pub(crate) fn to_log_config(logging: &LoggingSection) -> LogConfig {
    let format = logging.format.parse::<LogFormat>().unwrap_or_default();
    LogConfig::new(logging.level.clone())
        .with_format(format)
        .with_directives(logging.directives.iter().cloned())
}
