//! Notifications and confirmation prompts handed to the host.
//!
//! Rendering, styling and lifecycle belong to the host. The engine only
//! describes what happened and, for popups, which action "proceed anyway"
//! should replay.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::action::Action;
use crate::decision::DecisionReason;

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Create a new random notification ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification:{}", self.0)
    }
}

/// What kind of action was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A new window was blocked.
    BlockedPopup,
    /// A modal dialog was blocked.
    BlockedModal,
    /// A navigation of the current page was denied.
    DeniedRedirect,
}

impl NotificationKind {
    /// Banner text.
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::BlockedPopup => "Blocked popup window",
            Self::BlockedModal => "Blocked modal dialog",
            Self::DeniedRedirect => "Denied redirection",
        }
    }
}

/// A dismissible notice about a blocked action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: NotificationId,
    /// What was blocked.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub text: String,
    /// The blocked destination.
    pub url: String,
    /// Why the action was blocked, when a decision was made.
    pub reason: Option<DecisionReason>,
    /// Optional title (the requested window name for popups).
    pub title: Option<String>,
    /// Action to replay if the user chooses to proceed anyway.
    pub proceed_anyway: Option<Action>,
    /// Auto-dismiss delay; `None` keeps it until closed.
    pub timeout: Option<Duration>,
}

impl Notification {
    /// Describe a blocked action.
    #[must_use]
    pub fn new(kind: NotificationKind, url: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            kind,
            text: kind.text().to_string(),
            url: url.into(),
            reason: None,
            title: None,
            proceed_anyway: None,
            timeout: None,
        }
    }

    /// Record the decision reason.
    #[must_use]
    pub fn with_reason(mut self, reason: DecisionReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Attach a proceed-anyway action.
    #[must_use]
    pub fn with_proceed_anyway(mut self, action: Action) -> Self {
        self.proceed_anyway = Some(action);
        self
    }

    /// Auto-dismiss after `timeout_ms`; 0 leaves it sticky.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.text, self.url)?;
        if let Some(reason) = self.reason {
            write!(f, " ({})", reason.describe())?;
        }
        Ok(())
    }
}

/// Unique identifier for a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptId(pub Uuid);

impl PromptId {
    /// Create a new random prompt ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prompt:{}", self.0)
    }
}

/// A yes/no question for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    /// Unique identifier, used to resolve deferred answers.
    pub id: PromptId,
    /// Question text.
    pub text: String,
}

impl ConfirmPrompt {
    /// Prompt for an action under explicit-confirmation policy.
    #[must_use]
    pub fn for_action(action: &Action) -> Self {
        let text = match action {
            Action::OpenWindow {
                url,
                target_name: Some(name),
                ..
            } => format!("Allow popup? ({url}, {name})"),
            Action::OpenWindow { url, .. } => format!("Allow popup? ({url})"),
            Action::OpenModal { url, .. } => format!("Allow modal dialog? ({url})"),
            Action::Navigate { url } => format!("Allow navigation? ({url})"),
        };
        Self {
            id: PromptId::new(),
            text,
        }
    }

    /// Prompt shown before leaving `href` without provenance.
    #[must_use]
    pub fn for_unload(href: &str) -> Self {
        Self {
            id: PromptId::new(),
            text: format!(
                "You are possibly involuntarily being redirected to another page. \
                 Do you want to leave {href} or stay?"
            ),
        }
    }
}

impl fmt::Display for ConfirmPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
