//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that cross-field invariants hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::{Config, ElementRuleSection};

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_policy(config)?;
    validate_elements(config)?;
    validate_logging(config)?;
    Ok(())
}

/// Longest grant period accepted (one minute).
const MAX_GRANT_PERIOD_MS: u64 = 60_000;

fn validate_policy(config: &Config) -> ConfigResult<()> {
    let p = &config.policy;

    if p.grant_period_ms > MAX_GRANT_PERIOD_MS {
        return Err(ConfigError::ValidationError {
            field: "policy.grant_period_ms".to_owned(),
            message: format!(
                "grant_period_ms ({}) exceeds maximum allowed value ({MAX_GRANT_PERIOD_MS})",
                p.grant_period_ms
            ),
        });
    }

    if p.use_grant_period && p.grant_period_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "policy.grant_period_ms".to_owned(),
            message: "grant_period_ms must be positive when use_grant_period is on".to_owned(),
        });
    }

    Ok(())
}

fn validate_elements(config: &Config) -> ConfigResult<()> {
    for (kind, rule) in &config.policy.allowed_elements {
        let field = format!("policy.allowed_elements.{kind}");

        if kind.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field,
                message: "element kind must not be empty".to_owned(),
            });
        }

        validate_rule(&field, rule)?;
    }
    Ok(())
}

fn validate_rule(field: &str, rule: &ElementRuleSection) -> ConfigResult<()> {
    let Some(attribute) = rule.attribute.as_deref() else {
        if rule.values.is_empty() && rule.missing_as.is_none() {
            return Ok(());
        }
        return Err(ConfigError::ValidationError {
            field: field.to_owned(),
            message: "values and missing_as require an attribute".to_owned(),
        });
    };

    if attribute.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: format!("{field}.attribute"),
            message: "attribute must not be empty".to_owned(),
        });
    }

    if rule.values.iter().all(|v| v.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: format!("{field}.values"),
            message: format!("rule on '{attribute}' must accept at least one value"),
        });
    }

    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_grant_period_upper_bound() {
        let mut config = Config::default();
        config.policy.grant_period_ms = 60_000;
        assert!(validate(&config).is_ok());
        config.policy.grant_period_ms = 60_001;
        assert_eq!(field_of(validate(&config)), "policy.grant_period_ms");
    }

    #[test]
    fn test_zero_grant_period_needs_gate_off() {
        let mut config = Config::default();
        config.policy.grant_period_ms = 0;
        assert_eq!(field_of(validate(&config)), "policy.grant_period_ms");

        config.policy.use_grant_period = false;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_attribute_rejected() {
        let mut config = Config::default();
        config
            .policy
            .allowed_elements
            .insert("input".to_owned(), ElementRuleSection::attribute_one_of(" ", &["submit"]));
        assert_eq!(
            field_of(validate(&config)),
            "policy.allowed_elements.input.attribute"
        );
    }

    #[test]
    fn test_rule_without_values_rejected() {
        let mut config = Config::default();
        config
            .policy
            .allowed_elements
            .insert("button".to_owned(), ElementRuleSection::attribute_one_of("type", &[]));
        assert_eq!(
            field_of(validate(&config)),
            "policy.allowed_elements.button.values"
        );
    }

    #[test]
    fn test_values_without_attribute_rejected() {
        let mut config = Config::default();
        let rule = ElementRuleSection {
            values: vec!["submit".to_owned()],
            ..ElementRuleSection::any()
        };
        config.policy.allowed_elements.insert("form".to_owned(), rule);
        assert_eq!(field_of(validate(&config)), "policy.allowed_elements.form");
    }

    #[test]
    fn test_empty_kind_rejected() {
        let mut config = Config::default();
        config
            .policy
            .allowed_elements
            .insert(String::new(), ElementRuleSection::any());
        assert_eq!(field_of(validate(&config)), "policy.allowed_elements.");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");
    }
}
