//! Deferred confirmation for hosts that cannot block on a prompt.
//!
//! A modal host answers [`ActionHost::confirm`](crate::interceptor::ActionHost::confirm)
//! synchronously. A non-modal host answers [`Confirmation::Pending`](crate::interceptor::Confirmation::Pending)
//! and delivers the answer later. Until then nothing may race ahead of the
//! held action: input events and further action attempts are parked here in
//! arrival order and replayed once the answer is in.
//!
//! The queue stays bounded. A run of consecutive events is collapsed to the
//! ones that still change the interaction record on replay, and at most
//! [`MAX_PARKED_ACTIONS`] action attempts are parked.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::clock::Millis;
use crate::decision::Decision;
use crate::error::{EngineError, EngineResult};
use crate::notification::PromptId;
use crate::tracker::InputEvent;

/// Upper bound on action attempts parked behind one confirmation.
pub const MAX_PARKED_ACTIONS: usize = 64;

/// An action held until its confirmation prompt is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    /// The outstanding prompt.
    pub prompt_id: PromptId,
    /// The held action.
    pub action: Action,
    /// The decision that asked for confirmation.
    pub decision: Decision,
}

/// Something that arrived while a confirmation was outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deferred {
    /// An input event, with the time it arrived.
    Event {
        /// The event.
        event: InputEvent,
        /// Arrival time.
        at_ms: Millis,
    },
    /// An action attempt.
    Action(Action),
}

/// The outstanding confirmation plus everything parked behind it.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    pending: Option<PendingConfirmation>,
    queue: VecDeque<Deferred>,
    actions: usize,
}

impl DeferredQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a confirmation is outstanding.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.pending.is_some()
    }

    /// The outstanding confirmation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Hold an action until its prompt is answered.
    pub fn hold(&mut self, pending: PendingConfirmation) {
        self.pending = Some(pending);
    }

    /// Whether another action attempt may be parked.
    #[must_use]
    pub fn can_park_action(&self) -> bool {
        self.actions < MAX_PARKED_ACTIONS
    }

    /// Park an item behind the outstanding confirmation.
    ///
    /// Events that cannot affect the record on replay are dropped: a
    /// non-primary activation never does, an activation supersedes the
    /// events directly before it, and a repeated revocation is a no-op.
    /// Callers check [`can_park_action`](Self::can_park_action) before
    /// parking an action.
    pub fn push(&mut self, item: Deferred) {
        match &item {
            Deferred::Action(_) => {
                self.actions = self.actions.saturating_add(1);
            },
            Deferred::Event { event, .. } if event.kind.is_pointer_activation() => {
                if !event.primary_button {
                    return;
                }
                while matches!(self.queue.back(), Some(Deferred::Event { .. })) {
                    self.queue.pop_back();
                }
            },
            Deferred::Event { .. } => {
                if matches!(
                    self.queue.back(),
                    Some(Deferred::Event { event, .. }) if !event.kind.is_pointer_activation()
                ) {
                    return;
                }
            },
        }
        self.queue.push_back(item);
    }

    /// Release the held action for `prompt_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPrompt`] when `prompt_id` is not the
    /// outstanding prompt. The held action stays held.
    pub fn take(&mut self, prompt_id: PromptId) -> EngineResult<PendingConfirmation> {
        match self.pending.take() {
            Some(pending) if pending.prompt_id == prompt_id => Ok(pending),
            other => {
                self.pending = other;
                Err(EngineError::UnknownPrompt {
                    id: prompt_id.to_string(),
                })
            },
        }
    }

    /// Next parked item in arrival order.
    pub fn pop_next(&mut self) -> Option<Deferred> {
        let item = self.queue.pop_front()?;
        if matches!(item, Deferred::Action(_)) {
            self.actions = self.actions.saturating_sub(1);
        }
        Some(item)
    }

    /// Number of parked items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is parked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::DecisionReason;
    use crate::tracker::InputEventKind;

    fn pending(id: PromptId) -> PendingConfirmation {
        PendingConfirmation {
            prompt_id: id,
            action: Action::open_window("/w"),
            decision: Decision::ask(DecisionReason::ExplicitConfirm),
        }
    }

    #[test]
    fn test_hold_and_take() {
        let mut q = DeferredQueue::new();
        assert!(!q.is_blocked());

        let id = PromptId::new();
        q.hold(pending(id));
        assert!(q.is_blocked());
        assert_eq!(q.pending().unwrap().prompt_id, id);

        let released = q.take(id).unwrap();
        assert_eq!(released.action, Action::open_window("/w"));
        assert!(!q.is_blocked());
    }

    #[test]
    fn test_take_unknown_keeps_pending() {
        let mut q = DeferredQueue::new();
        let id = PromptId::new();
        q.hold(pending(id));

        let err = q.take(PromptId::new()).unwrap_err();
        assert!(matches!(err, EngineError::UnknownPrompt { .. }));
        assert!(q.is_blocked());
    }

    #[test]
    fn test_take_with_nothing_pending() {
        let mut q = DeferredQueue::new();
        assert!(q.take(PromptId::new()).is_err());
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut q = DeferredQueue::new();
        q.push(Deferred::Event {
            event: InputEvent::new(InputEventKind::Click, None),
            at_ms: 5,
        });
        q.push(Deferred::Action(Action::navigate("/a")));
        assert_eq!(q.len(), 2);

        assert!(matches!(q.pop_next(), Some(Deferred::Event { at_ms: 5, .. })));
        assert_eq!(q.pop_next(), Some(Deferred::Action(Action::navigate("/a"))));
        assert!(q.is_empty());
    }

    fn event(kind: InputEventKind, at_ms: Millis) -> Deferred {
        Deferred::Event {
            event: InputEvent::new(kind, None),
            at_ms,
        }
    }

    #[test]
    fn test_event_runs_collapse() {
        let mut q = DeferredQueue::new();
        for at in 0..100 {
            q.push(event(InputEventKind::Click, at));
            q.push(event(InputEventKind::KeyDown, at));
            q.push(event(InputEventKind::PointerLeave, at));
        }
        q.push(Deferred::Event {
            event: InputEvent::new(InputEventKind::Click, None).secondary(),
            at_ms: 500,
        });

        assert_eq!(q.len(), 2);
        assert!(matches!(
            q.pop_next(),
            Some(Deferred::Event { at_ms: 99, event }) if event.kind == InputEventKind::Click
        ));
        assert!(matches!(
            q.pop_next(),
            Some(Deferred::Event { event, .. }) if event.kind == InputEventKind::KeyDown
        ));
    }

    #[test]
    fn test_actions_keep_events_apart() {
        let mut q = DeferredQueue::new();
        q.push(event(InputEventKind::Click, 1));
        q.push(Deferred::Action(Action::navigate("/a")));
        q.push(event(InputEventKind::Click, 2));

        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_parked_actions_are_capped() {
        let mut q = DeferredQueue::new();
        for _ in 0..MAX_PARKED_ACTIONS {
            assert!(q.can_park_action());
            q.push(Deferred::Action(Action::open_window("/w")));
        }
        assert!(!q.can_park_action());

        q.pop_next();
        assert!(q.can_park_action());
    }
}
