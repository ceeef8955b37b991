//! Action attempts intercepted on behalf of the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Window names that address an existing browsing context.
pub const SAME_CONTEXT_TARGETS: [&str; 3] = ["_self", "_parent", "_top"];

/// An attempt by the page to open something or to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Action {
    /// Open a new window.
    OpenWindow {
        /// Destination URL.
        url: String,
        /// Window name or target keyword.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_name: Option<String>,
        /// Raw window feature string, passed through untouched.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        features: Option<String>,
    },
    /// Open a modal dialog.
    OpenModal {
        /// Destination URL.
        url: String,
        /// Opaque dialog arguments, passed through untouched.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<String>,
    },
    /// Navigate the current document.
    Navigate {
        /// Destination URL.
        url: String,
    },
}

impl Action {
    /// Open-window action with no name or features.
    #[must_use]
    pub fn open_window(url: impl Into<String>) -> Self {
        Self::OpenWindow {
            url: url.into(),
            target_name: None,
            features: None,
        }
    }

    /// Open-modal action with no arguments.
    #[must_use]
    pub fn open_modal(url: impl Into<String>) -> Self {
        Self::OpenModal {
            url: url.into(),
            arguments: None,
        }
    }

    /// Navigation action.
    #[must_use]
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::Navigate { url: url.into() }
    }

    /// Destination URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::OpenWindow { url, .. } | Self::OpenModal { url, .. } | Self::Navigate { url } => {
                url
            },
        }
    }

    /// Short name of the action kind.
    #[must_use]
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::OpenWindow { .. } => "open_window",
            Self::OpenModal { .. } => "open_modal",
            Self::Navigate { .. } => "navigate",
        }
    }

    /// Whether this is a window request addressed to an existing browsing
    /// context (`_self`, `_parent`, `_top`), which cannot spawn a new
    /// top-level window.
    #[must_use]
    pub fn targets_same_context(&self) -> bool {
        match self {
            Self::OpenWindow {
                target_name: Some(name),
                ..
            } => SAME_CONTEXT_TARGETS
                .iter()
                .any(|t| t.eq_ignore_ascii_case(name.trim())),
            _ => false,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWindow {
                url,
                target_name: Some(name),
                ..
            } => write!(f, "open_window({url}, {name})"),
            _ => write!(f, "{}({})", self.action_type(), self.url()),
        }
    }
}
