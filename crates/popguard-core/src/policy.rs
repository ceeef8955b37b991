//! Popup and redirect policy.
//!
//! [`PolicyConfig`] is a structured record of named switches and numeric
//! parameters. It is built once, handed to an [`Engine`](crate::Engine), and
//! never mutated afterwards: the engine only exposes it by shared reference.
//!
//! # Switches
//!
//! | Field | Effect |
//! |-------|--------|
//! | `block_all_popups` | every window/modal request is blocked |
//! | `confirm_each_action` | window/modal requests ask the user |
//! | `use_grant_period` + `grant_period_ms` | trust only within the grant period |
//! | `require_secure_origin` | insecure pages are never auto-trusted |
//! | `allow_unsolicited_redirects` | disables redirect denial |
//! | `confirm_on_unload` | installs the unload challenge |
//! | `allowed_elements` | elements whose interaction carries provenance |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::element::{ElementDescriptor, ElementKind};

/// Default grant period in milliseconds.
pub const DEFAULT_GRANT_PERIOD_MS: u64 = 50;

/// Predicate over an element's attributes deciding whether its kind is
/// allowed to carry provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum ElementRule {
    /// Every element of the kind qualifies.
    Any,
    /// The attribute must equal one of `values` (ASCII case-insensitive).
    AttributeOneOf {
        /// Attribute name, e.g. `type`.
        attribute: String,
        /// Accepted values.
        values: Vec<String>,
        /// Value assumed when the attribute is absent (the HTML default).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        missing_as: Option<String>,
    },
}

impl ElementRule {
    /// Shorthand for an attribute rule.
    #[must_use]
    pub fn attribute_one_of<I, S>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AttributeOneOf {
            attribute: attribute.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            missing_as: None,
        }
    }

    /// Set the default used when the attribute is absent.
    #[must_use]
    pub fn missing_as(self, default: impl Into<String>) -> Self {
        match self {
            Self::AttributeOneOf {
                attribute, values, ..
            } => Self::AttributeOneOf {
                attribute,
                values,
                missing_as: Some(default.into()),
            },
            Self::Any => Self::Any,
        }
    }

    /// Evaluate the rule against an element.
    #[must_use]
    pub fn matches(&self, element: &ElementDescriptor) -> bool {
        match self {
            Self::Any => true,
            Self::AttributeOneOf {
                attribute,
                values,
                missing_as,
            } => {
                let Some(actual) = element.attribute(attribute).or(missing_as.as_deref()) else {
                    return false;
                };
                let actual = actual.trim();
                values.iter().any(|v| v.eq_ignore_ascii_case(actual))
            },
        }
    }
}

impl fmt::Display for ElementRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::AttributeOneOf {
                attribute, values, ..
            } => write!(f, "{attribute} in [{}]", values.join(", ")),
        }
    }
}

/// Engine policy. See the module docs for the meaning of each switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PolicyConfig {
    /// Block every window and modal request outright.
    pub block_all_popups: bool,
    /// Ask the user about every window and modal request.
    pub confirm_each_action: bool,
    /// Only trust actions within `grant_period_ms` of the last interaction.
    pub use_grant_period: bool,
    /// Length of the grant period.
    pub grant_period_ms: u64,
    /// Never auto-trust pages served over an insecure transport.
    pub require_secure_origin: bool,
    /// Disable redirect denial entirely.
    pub allow_unsolicited_redirects: bool,
    /// Challenge unloads that lack provenance.
    pub confirm_on_unload: bool,
    /// Auto-dismiss delay for notifications; 0 keeps them until closed.
    pub notification_timeout_ms: u64,
    /// Element kinds whose interaction carries provenance.
    pub allowed_elements: BTreeMap<ElementKind, ElementRule>,
}

impl PolicyConfig {
    /// A policy that trusts everything and challenges nothing.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            block_all_popups: false,
            confirm_each_action: false,
            use_grant_period: false,
            grant_period_ms: 0,
            require_secure_origin: false,
            allow_unsolicited_redirects: true,
            confirm_on_unload: false,
            notification_timeout_ms: 0,
            allowed_elements: default_allowed_elements(),
        }
    }

    /// Whether `element` satisfies the allow-list.
    #[must_use]
    pub fn element_allowed(&self, element: &ElementDescriptor) -> bool {
        self.allowed_elements
            .get(&element.kind)
            .is_some_and(|rule| rule.matches(element))
    }

    /// Nearest element, starting at `element` itself, that satisfies the
    /// allow-list.
    #[must_use]
    pub fn nearest_allowed<'a>(
        &self,
        element: &'a ElementDescriptor,
    ) -> Option<&'a ElementDescriptor> {
        element.ancestors().find(|e| self.element_allowed(e))
    }
}

impl Default for PolicyConfig {
    /// Grant period of 50 ms plus secure-origin gating, redirect denial on,
    /// no confirmation prompts.
    fn default() -> Self {
        Self {
            block_all_popups: false,
            confirm_each_action: false,
            use_grant_period: true,
            grant_period_ms: DEFAULT_GRANT_PERIOD_MS,
            require_secure_origin: true,
            allow_unsolicited_redirects: false,
            confirm_on_unload: false,
            notification_timeout_ms: 0,
            allowed_elements: default_allowed_elements(),
        }
    }
}

/// Links always; buttons that submit; submit-like inputs; selects.
#[must_use]
pub fn default_allowed_elements() -> BTreeMap<ElementKind, ElementRule> {
    BTreeMap::from([
        (ElementKind::Link, ElementRule::Any),
        (
            ElementKind::Button,
            ElementRule::attribute_one_of("type", ["submit"]).missing_as("submit"),
        ),
        (
            ElementKind::Input,
            ElementRule::attribute_one_of("type", ["submit", "image"]),
        ),
        (ElementKind::Select, ElementRule::Any),
    ])
}
