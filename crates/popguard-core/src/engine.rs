//! The per-document engine instance.
//!
//! One [`Engine`] serves one browsing context. It owns the immutable policy,
//! the interaction tracker, the page location and the deferred-confirmation
//! queue. There are no module-level singletons; frames and documents each
//! get their own instance.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::Action;
use crate::clock::{Clock, Millis, SystemClock};
use crate::decision::{Decision, DecisionContext};
use crate::deferred::{Deferred, DeferredQueue, PendingConfirmation};
use crate::error::EngineResult;
use crate::interceptor::{self, ActionHost, InterceptOutcome, UnloadOutcome};
use crate::notification::PromptId;
use crate::policy::PolicyConfig;
use crate::tracker::{InputEvent, InteractionRecord, InteractionTracker};
use crate::url::PageLocation;

/// Popup and redirect provenance engine for a single document.
pub struct Engine {
    policy: Arc<PolicyConfig>,
    tracker: InteractionTracker,
    clock: Arc<dyn Clock>,
    page: PageLocation,
    deferred: DeferredQueue,
}

impl Engine {
    /// Create an engine for `page` reading time from `clock`.
    #[must_use]
    pub fn new(policy: PolicyConfig, page: PageLocation, clock: Arc<dyn Clock>) -> Self {
        let policy = Arc::new(policy);
        debug!(
            page = page.href(),
            grant_period_ms = policy.grant_period_ms,
            use_grant_period = policy.use_grant_period,
            require_secure_origin = policy.require_secure_origin,
            "engine created"
        );
        Self {
            tracker: InteractionTracker::new(Arc::clone(&policy)),
            policy,
            clock,
            page,
            deferred: DeferredQueue::new(),
        }
    }

    /// Create an engine on the wall clock.
    #[must_use]
    pub fn with_system_clock(policy: PolicyConfig, page: PageLocation) -> Self {
        Self::new(policy, page, Arc::new(SystemClock))
    }

    /// Create an engine for the document at `href`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPageLocation`](crate::error::EngineError::InvalidPageLocation)
    /// if `href` is not an absolute URL.
    pub fn for_url(policy: PolicyConfig, href: &str, clock: Arc<dyn Clock>) -> EngineResult<Self> {
        Ok(Self::new(policy, PageLocation::parse(href)?, clock))
    }

    /// Active policy.
    #[must_use]
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Current document location.
    #[must_use]
    pub fn page(&self) -> &PageLocation {
        &self.page
    }

    /// Move to a new document location, e.g. after a fragment change.
    pub fn set_page(&mut self, page: PageLocation) {
        self.page = page;
    }

    /// Most recent qualifying interaction.
    #[must_use]
    pub fn interaction(&self) -> &InteractionRecord {
        self.tracker.current()
    }

    /// The confirmation currently holding up evaluation, if any.
    #[must_use]
    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.deferred.pending()
    }

    /// Number of events and actions parked behind a pending confirmation.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.deferred.len()
    }

    /// Feed an input event.
    ///
    /// While a confirmation is outstanding the event is parked and applied
    /// with its arrival time once the answer is resolved.
    pub fn on_event(&mut self, event: InputEvent) {
        let now = self.clock.now_ms();
        if self.deferred.is_blocked() {
            debug!(kind = %event.kind, "event queued behind pending confirmation");
            self.deferred.push(Deferred::Event { event, at_ms: now });
            return;
        }
        self.tracker.on_event(&event, now);
    }

    /// Page asks to open a new window.
    pub fn open_window(
        &mut self,
        url: impl Into<String>,
        target_name: Option<String>,
        host: &mut dyn ActionHost,
    ) -> InterceptOutcome {
        self.attempt(
            Action::OpenWindow {
                url: url.into(),
                target_name,
                features: None,
            },
            host,
        )
    }

    /// Page asks to open a modal dialog.
    pub fn open_modal(
        &mut self,
        url: impl Into<String>,
        host: &mut dyn ActionHost,
    ) -> InterceptOutcome {
        self.attempt(Action::open_modal(url), host)
    }

    /// Page tries to navigate the current document.
    pub fn navigate(&mut self, url: impl Into<String>, host: &mut dyn ActionHost) -> InterceptOutcome {
        self.attempt(Action::navigate(url), host)
    }

    /// Intercept any action attempt.
    ///
    /// While a confirmation is outstanding the attempt is parked and the
    /// outcome is [`Disposition::Queued`](crate::interceptor::Disposition::Queued).
    pub fn attempt(&mut self, action: Action, host: &mut dyn ActionHost) -> InterceptOutcome {
        if self.deferred.is_blocked() {
            if !self.deferred.can_park_action() {
                warn!(url = action.url(), "too many actions behind pending confirmation");
                host.suppress(&action);
                return InterceptOutcome::dropped();
            }
            debug!(url = action.url(), "action queued behind pending confirmation");
            self.deferred.push(Deferred::Action(action));
            return InterceptOutcome::queued();
        }
        self.evaluate(action, host)
    }

    /// The document is about to unload.
    ///
    /// Unload is never queued: it is evaluated against the current record
    /// even while another confirmation is outstanding.
    pub fn before_unload(&mut self, host: &mut dyn ActionHost) -> (Decision, UnloadOutcome) {
        let ctx = self.context(self.clock.now_ms());
        interceptor::intercept_unload(&ctx, &self.page, host)
    }

    /// Deliver the user's answer to a pending confirmation.
    ///
    /// The held action is enacted first, then parked events and actions are
    /// replayed in arrival order. Replay stops early if a replayed action
    /// raises a new pending confirmation; the rest stays parked behind it.
    /// Returns one outcome for the held action followed by one per replayed
    /// action.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPrompt`](crate::error::EngineError::UnknownPrompt)
    /// if `prompt_id` is not the outstanding prompt.
    pub fn resolve_confirmation(
        &mut self,
        prompt_id: PromptId,
        accepted: bool,
        host: &mut dyn ActionHost,
    ) -> EngineResult<Vec<InterceptOutcome>> {
        let pending = self.deferred.take(prompt_id)?;
        debug!(prompt = %prompt_id, accepted, "confirmation resolved");

        let held = {
            let ctx = self.context(self.clock.now_ms());
            interceptor::enact_answer(
                &ctx,
                &self.page,
                &pending.action,
                pending.decision,
                accepted,
                host,
            )
        };

        let mut outcomes = vec![held];
        while !self.deferred.is_blocked() {
            let Some(item) = self.deferred.pop_next() else {
                break;
            };
            match item {
                Deferred::Event { event, at_ms } => self.tracker.on_event(&event, at_ms),
                Deferred::Action(action) => outcomes.push(self.evaluate(action, host)),
            }
        }
        Ok(outcomes)
    }

    fn evaluate(&mut self, action: Action, host: &mut dyn ActionHost) -> InterceptOutcome {
        let outcome = {
            let ctx = self.context(self.clock.now_ms());
            match interceptor::intercept(&ctx, &self.page, &action, host) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!(error = %e, url = action.url(), "interception inert");
                    InterceptOutcome::inert()
                },
            }
        };

        if let (Some(prompt_id), Some(decision)) = (outcome.pending_prompt(), outcome.decision) {
            self.deferred.hold(PendingConfirmation {
                prompt_id,
                action,
                decision,
            });
        }
        outcome
    }

    fn context(&self, now_ms: Millis) -> DecisionContext<'_> {
        DecisionContext {
            policy: &self.policy,
            record: self.tracker.current(),
            now_ms,
            origin_secure: self.page.is_secure(),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
