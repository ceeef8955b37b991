//! Environment variable fallbacks.
//!
//! A fixed set of `POPGUARD_*` variables can supply values that no config
//! file set. They never override a file: an administrator's
//! `~/.popguard/config.toml` wins over a stray variable in the shell.

use std::collections::HashMap;

use toml::Value;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources};

/// How a variable's text is turned into a TOML value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvKind {
    /// Non-negative integer.
    Integer,
    /// `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
    Bool,
    /// Non-empty string.
    Text,
}

/// One variable and the config field it backs.
#[derive(Debug, Clone, Copy)]
pub struct EnvFallback {
    /// Variable name.
    pub var: &'static str,
    /// Dotted config field path.
    pub field: &'static str,
    /// Expected value shape.
    pub kind: EnvKind,
}

/// Every supported fallback variable.
pub const ENV_FALLBACKS: &[EnvFallback] = &[
    EnvFallback {
        var: "POPGUARD_GRANT_PERIOD_MS",
        field: "policy.grant_period_ms",
        kind: EnvKind::Integer,
    },
    EnvFallback {
        var: "POPGUARD_REQUIRE_SECURE_ORIGIN",
        field: "policy.require_secure_origin",
        kind: EnvKind::Bool,
    },
    EnvFallback {
        var: "POPGUARD_CONFIRM_EACH_ACTION",
        field: "policy.confirm_each_action",
        kind: EnvKind::Bool,
    },
    EnvFallback {
        var: "POPGUARD_LOG_LEVEL",
        field: "logging.level",
        kind: EnvKind::Text,
    },
    EnvFallback {
        var: "POPGUARD_LOG_FORMAT",
        field: "logging.format",
        kind: EnvKind::Text,
    },
];

/// Snapshot the process environment's `POPGUARD_*` variables.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(key, _)| key.starts_with("POPGUARD_"))
        .collect()
}

/// Fill fields no config file set from `env_vars`. Returns how many were
/// applied.
///
/// # Errors
///
/// Returns [`ConfigError::EnvError`] if a variable that would apply holds a
/// value of the wrong shape.
pub fn apply_env_fallbacks(
    merged: &mut Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String>,
) -> ConfigResult<usize> {
    let mut applied = 0usize;

    for fallback in ENV_FALLBACKS {
        let Some(raw) = env_vars.get(fallback.var) else {
            continue;
        };
        if sources.get(fallback.field).is_some_and(ConfigLayer::is_file) {
            debug!(var = fallback.var, field = fallback.field, "set by file; ignoring env");
            continue;
        }

        let value = parse_env_value(fallback, raw)?;
        set_field(merged, fallback.field, value);
        sources.insert(fallback.field.to_owned(), ConfigLayer::Environment);
        applied = applied.saturating_add(1);
        debug!(var = fallback.var, field = fallback.field, "applied env fallback");
    }

    Ok(applied)
}

fn parse_env_value(fallback: &EnvFallback, raw: &str) -> ConfigResult<Value> {
    let raw = raw.trim();
    let invalid = |message: &str| ConfigError::EnvError {
        var: fallback.var.to_owned(),
        message: message.to_owned(),
    };

    match fallback.kind {
        EnvKind::Integer => raw
            .parse::<u64>()
            .ok()
            .and_then(|n| i64::try_from(n).ok())
            .map(Value::Integer)
            .ok_or_else(|| invalid("expected a non-negative integer")),
        EnvKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Boolean(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Boolean(false)),
            _ => Err(invalid("expected true or false")),
        },
        EnvKind::Text if raw.is_empty() => Err(invalid("must not be empty")),
        EnvKind::Text => Ok(Value::String(raw.to_owned())),
    }
}

/// Set a dotted `field` path, creating intermediate tables as needed.
fn set_field(root: &mut Value, field: &str, value: Value) {
    let mut segments: Vec<&str> = field.split('.').collect();
    let Some(leaf) = segments.pop() else {
        return;
    };

    let mut current = root;
    for segment in segments {
        let Value::Table(table) = current else {
            return;
        };
        current = table
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Table(toml::map::Map::new()));
    }
    if let Value::Table(table) = current {
        table.insert(leaf.to_owned(), value);
    }
}
