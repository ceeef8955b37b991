use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::notification::PromptId;

/// The host's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    /// The user said yes.
    Accepted,
    /// The user said no or dismissed the prompt.
    Rejected,
    /// The host cannot block; the answer arrives later through
    /// [`Engine::resolve_confirmation`](crate::engine::Engine::resolve_confirmation).
    Pending,
}

/// What happened to an action attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "disposition", content = "prompt")]
pub enum Disposition {
    /// The host was told to let the action through.
    Proceeded,
    /// The host was told to suppress the action.
    Suppressed,
    /// A confirmation prompt is outstanding; the action is held.
    AwaitingConfirmation(PromptId),
    /// Held behind an outstanding confirmation, not yet evaluated.
    Queued,
    /// The host cannot intercept this kind of action; nothing was done.
    Inert,
}

/// Result of intercepting one action attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptOutcome {
    /// The decision, when one was taken.
    pub decision: Option<Decision>,
    /// What the host was told to do.
    pub disposition: Disposition,
}

impl InterceptOutcome {
    /// Outcome carrying a decision.
    #[must_use]
    pub fn decided(decision: Decision, disposition: Disposition) -> Self {
        Self {
            decision: Some(decision),
            disposition,
        }
    }

    /// Outcome for an action held behind a pending confirmation.
    #[must_use]
    pub fn queued() -> Self {
        Self {
            decision: None,
            disposition: Disposition::Queued,
        }
    }

    /// Outcome for an action suppressed without evaluation because too
    /// many attempts are already parked.
    #[must_use]
    pub fn dropped() -> Self {
        Self {
            decision: None,
            disposition: Disposition::Suppressed,
        }
    }

    /// Outcome for an action the host cannot intercept.
    #[must_use]
    pub fn inert() -> Self {
        Self {
            decision: None,
            disposition: Disposition::Inert,
        }
    }

    /// Whether the host was told to let the action through.
    #[must_use]
    pub fn proceeded(&self) -> bool {
        self.disposition == Disposition::Proceeded
    }

    /// Whether the host was told to suppress the action.
    #[must_use]
    pub fn suppressed(&self) -> bool {
        self.disposition == Disposition::Suppressed
    }

    /// The outstanding prompt, if the action is awaiting an answer.
    #[must_use]
    pub fn pending_prompt(&self) -> Option<PromptId> {
        match self.disposition {
            Disposition::AwaitingConfirmation(id) => Some(id),
            _ => None,
        }
    }
}

/// How the host should treat a page unload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "message")]
pub enum UnloadOutcome {
    /// Let the unload go ahead.
    Proceed,
    /// Keep the user on the page.
    Cancel,
    /// Hand over to the page's own unload handler and its message.
    Delegate(String),
}
