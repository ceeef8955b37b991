//! Interaction provenance tracking.
//!
//! The [`InteractionTracker`] owns a single [`InteractionRecord`] slot that
//! is overwritten, never appended to. Qualifying pointer events (primary
//! button down, click, value change) stamp the time and resolve the nearest
//! allow-listed ancestor of the event target. Key presses and the pointer
//! leaving the page revoke the standing target but leave the timestamp, so
//! the grant period still runs while element provenance is gone.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clock::Millis;
use crate::element::ElementDescriptor;
use crate::policy::PolicyConfig;

/// Kind of input event observed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEventKind {
    /// Pointer button pressed.
    MouseDown,
    /// Click completed.
    Click,
    /// Form control value changed.
    Change,
    /// Key pressed.
    KeyDown,
    /// Pointer left the viewport.
    PointerLeave,
}

impl InputEventKind {
    /// Whether this event can establish provenance.
    #[must_use]
    pub fn is_pointer_activation(self) -> bool {
        matches!(self, Self::MouseDown | Self::Click | Self::Change)
    }
}

impl fmt::Display for InputEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MouseDown => "mousedown",
            Self::Click => "click",
            Self::Change => "change",
            Self::KeyDown => "keydown",
            Self::PointerLeave => "pointerleave",
        };
        write!(f, "{name}")
    }
}

/// An input event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// What happened.
    pub kind: InputEventKind,
    /// The literal event target, if the host could resolve one.
    #[serde(default)]
    pub target: Option<ElementDescriptor>,
    /// Whether the primary button was used. Ignored for key and leave events.
    #[serde(default = "default_primary")]
    pub primary_button: bool,
}

fn default_primary() -> bool {
    true
}

impl InputEvent {
    /// Primary-button event of `kind` on `target`.
    #[must_use]
    pub fn new(kind: InputEventKind, target: Option<ElementDescriptor>) -> Self {
        Self {
            kind,
            target,
            primary_button: true,
        }
    }

    /// Mark the event as coming from a non-primary button.
    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.primary_button = false;
        self
    }
}

/// The most recent qualifying interaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// When the last qualifying event happened; `None` before the first.
    pub timestamp_ms: Option<Millis>,
    /// Nearest allow-listed ancestor of that event's target.
    pub target: Option<ElementDescriptor>,
}

/// Maintains the single interaction slot.
#[derive(Debug)]
pub struct InteractionTracker {
    policy: Arc<PolicyConfig>,
    record: InteractionRecord,
}

impl InteractionTracker {
    /// Create a tracker with an empty record.
    #[must_use]
    pub fn new(policy: Arc<PolicyConfig>) -> Self {
        Self {
            policy,
            record: InteractionRecord::default(),
        }
    }

    /// Apply an input event observed at `now`.
    ///
    /// Non-primary activations are dropped without touching the record.
    pub fn on_event(&mut self, event: &InputEvent, now: Millis) {
        match event.kind {
            kind if kind.is_pointer_activation() => {
                if !event.primary_button {
                    debug!(kind = %kind, "ignoring non-primary activation");
                    return;
                }
                let target = event
                    .target
                    .as_ref()
                    .and_then(|raw| self.policy.nearest_allowed(raw))
                    .cloned();
                debug!(
                    kind = %kind,
                    at_ms = now,
                    target = target.as_ref().map(|t| t.kind.to_string()),
                    "recorded interaction"
                );
                self.record = InteractionRecord {
                    timestamp_ms: Some(now),
                    target,
                };
            },
            kind => {
                if self.record.target.take().is_some() {
                    debug!(kind = %kind, "revoked interaction target");
                }
            },
        }
    }

    /// Snapshot of the current record.
    #[must_use]
    pub fn current(&self) -> &InteractionRecord {
        &self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn tracker() -> InteractionTracker {
        InteractionTracker::new(Arc::new(PolicyConfig::default()))
    }

    fn link_click() -> InputEvent {
        InputEvent::new(
            InputEventKind::Click,
            Some(ElementDescriptor::link("https://x.com/real")),
        )
    }

    #[test]
    fn test_starts_empty() {
        let t = tracker();
        assert_eq!(t.current(), &InteractionRecord::default());
    }

    #[test]
    fn test_click_records_time_and_target() {
        let mut t = tracker();
        t.on_event(&link_click(), 1_000);
        assert_eq!(t.current().timestamp_ms, Some(1_000));
        assert!(t.current().target.as_ref().unwrap().is_link());
    }

    #[test]
    fn test_click_on_span_resolves_enclosing_link() {
        let mut t = tracker();
        let span = ElementDescriptor::from_tag("span")
            .within(ElementDescriptor::link("https://x.com/real"));
        t.on_event(&InputEvent::new(InputEventKind::MouseDown, Some(span)), 5);
        let target = t.current().target.as_ref().unwrap();
        assert_eq!(target.kind, ElementKind::Link);
        assert_eq!(target.href(), Some("https://x.com/real"));
    }

    #[test]
    fn test_click_without_allowed_ancestor_clears_target() {
        let mut t = tracker();
        t.on_event(&link_click(), 1);
        let div = ElementDescriptor::from_tag("div");
        t.on_event(&InputEvent::new(InputEventKind::Click, Some(div)), 2);
        assert_eq!(t.current().timestamp_ms, Some(2));
        assert!(t.current().target.is_none());
    }

    #[test]
    fn test_missing_target_is_no_match() {
        let mut t = tracker();
        t.on_event(&InputEvent::new(InputEventKind::Change, None), 7);
        assert_eq!(t.current().timestamp_ms, Some(7));
        assert!(t.current().target.is_none());
    }

    #[test]
    fn test_non_primary_ignored() {
        let mut t = tracker();
        t.on_event(&link_click(), 10);
        let before = t.current().clone();
        t.on_event(&link_click().secondary(), 20);
        assert_eq!(t.current(), &before);
    }

    #[test]
    fn test_key_down_revokes_target_keeps_time() {
        let mut t = tracker();
        t.on_event(&link_click(), 10);
        t.on_event(&InputEvent::new(InputEventKind::KeyDown, None), 15);
        assert_eq!(t.current().timestamp_ms, Some(10));
        assert!(t.current().target.is_none());
    }

    #[test]
    fn test_pointer_leave_revokes_even_if_secondary() {
        let mut t = tracker();
        t.on_event(&link_click(), 10);
        t.on_event(
            &InputEvent::new(InputEventKind::PointerLeave, None).secondary(),
            12,
        );
        assert_eq!(t.current().timestamp_ms, Some(10));
        assert!(t.current().target.is_none());
    }

    #[test]
    fn test_later_event_supersedes() {
        let mut t = tracker();
        t.on_event(&link_click(), 10);
        let submit = ElementDescriptor::from_tag("button").with_attribute("type", "submit");
        t.on_event(&InputEvent::new(InputEventKind::Click, Some(submit)), 30);
        assert_eq!(t.current().timestamp_ms, Some(30));
        assert_eq!(t.current().target.as_ref().unwrap().kind, ElementKind::Button);
    }

    #[test]
    fn test_event_deserializes_with_default_primary() {
        let event: InputEvent = serde_json::from_str(r#"{"kind":"click"}"#).unwrap();
        assert!(event.primary_button);
        assert!(event.target.is_none());
    }
}
