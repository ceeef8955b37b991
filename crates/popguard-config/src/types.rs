//! Configuration types for popguard.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal popguard crates. The engine's policy types are mirrored here and
//! converted at the boundary. Every struct implements [`Default`] with the
//! same values as `defaults.toml`, so a bare `[section]` header in TOML
//! produces a working configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Popup and redirect policy.
    pub policy: PolicySection,
    /// Notification presentation.
    pub notifications: NotificationSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// PolicySection
// ---------------------------------------------------------------------------

/// Popup and redirect policy switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct PolicySection {
    /// Block every popup window and modal dialog.
    pub block_all_popups: bool,
    /// Ask before every popup window and modal dialog.
    pub confirm_each_action: bool,
    /// Trust actions only shortly after a user interaction.
    pub use_grant_period: bool,
    /// Length of the grant period in milliseconds.
    pub grant_period_ms: u64,
    /// Never auto-trust pages served over plain HTTP.
    pub require_secure_origin: bool,
    /// Turn redirect denial off.
    pub allow_unsolicited_redirects: bool,
    /// Ask before leaving a page right after an interaction that carried no
    /// provenance.
    pub confirm_on_unload: bool,
    /// Elements whose interaction counts as provenance, keyed by kind
    /// (`link`, `button`, `input`, `select`, `textarea`, `form` or any tag).
    pub allowed_elements: BTreeMap<String, ElementRuleSection>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            block_all_popups: false,
            confirm_each_action: false,
            use_grant_period: true,
            grant_period_ms: 50,
            require_secure_origin: true,
            allow_unsolicited_redirects: false,
            confirm_on_unload: false,
            allowed_elements: default_allowed_elements(),
        }
    }
}

/// Allow-list entry for one element kind.
///
/// Without an `attribute` every element of the kind is allowed. With one,
/// the attribute's value must be one of `values` (ASCII case-insensitive);
/// `missing_as` stands in for an absent attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementRuleSection {
    /// Set to `false` to drop an entry inherited from a lower layer.
    pub enabled: bool,
    /// Attribute to inspect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Accepted attribute values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Value assumed when the attribute is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_as: Option<String>,
}

impl Default for ElementRuleSection {
    fn default() -> Self {
        Self {
            enabled: true,
            attribute: None,
            values: Vec::new(),
            missing_as: None,
        }
    }
}

impl ElementRuleSection {
    /// Rule accepting every element of the kind.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Rule requiring `attribute` to be one of `values`.
    #[must_use]
    pub fn attribute_one_of(attribute: &str, values: &[&str]) -> Self {
        Self {
            attribute: Some(attribute.to_owned()),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
            ..Self::default()
        }
    }
}

fn default_allowed_elements() -> BTreeMap<String, ElementRuleSection> {
    let mut button = ElementRuleSection::attribute_one_of("type", &["submit"]);
    button.missing_as = Some("submit".to_owned());

    BTreeMap::from([
        ("link".to_owned(), ElementRuleSection::any()),
        ("button".to_owned(), button),
        (
            "input".to_owned(),
            ElementRuleSection::attribute_one_of("type", &["submit", "image"]),
        ),
        ("select".to_owned(), ElementRuleSection::any()),
    ])
}

// ---------------------------------------------------------------------------
// NotificationSection
// ---------------------------------------------------------------------------

/// Notification presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSection {
    /// Auto-dismiss delay in milliseconds; 0 keeps notifications until
    /// closed.
    pub timeout_ms: u64,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"` (human-friendly), `"compact"` (one-line),
    /// `"json"` (structured), or `"full"` (verbose).
    pub format: String,
    /// Per-crate tracing directives (e.g. `["popguard_core=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
