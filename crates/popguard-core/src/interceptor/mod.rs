//! Action interceptors: enact decisions through the host.
//!
//! The host owns the real window and navigation primitives. It hands every
//! attempt to an interceptor, which asks the decision functions for a
//! verdict and then calls back into the host through the small
//! [`ActionHost`] capability interface.
//!
//! # Flow
//!
//! 1. Window requests addressed to `_self`, `_parent` or `_top` proceed
//!    immediately (they cannot open a new top-level window)
//! 2. Navigation on a host without navigation interception is inert
//! 3. The matching decision function produces a [`Decision`]
//! 4. Allow -> `proceed`; Block -> `suppress` plus a notification
//!    (and `stay_put` for navigations)
//! 5. `AskUser` -> `confirm`; yes proceeds, no blocks, pending holds the
//!    action until the answer is resolved

/// Types shared across interceptors.
pub mod types;

pub use types::*;

use tracing::{debug, info, warn};

use crate::action::Action;
use crate::decision::{
    Decision, DecisionContext, DecisionReason, Verdict, decide_location_change,
    decide_unload_challenge, decide_window_action,
};
use crate::error::{EngineError, EngineResult};
use crate::notification::{ConfirmPrompt, Notification, NotificationKind};
use crate::url::PageLocation;

/// Host capabilities the interceptors call back into.
///
/// A browser extension wraps the page's window and navigation primitives;
/// a test or replay harness records the calls instead.
pub trait ActionHost {
    /// Let the action go ahead unmodified.
    fn proceed(&mut self, action: &Action);

    /// Drop the action.
    fn suppress(&mut self, action: &Action);

    /// Replace a denied navigation with a no-op by resetting the location
    /// to its current fragment.
    fn stay_put(&mut self, _fragment: &str) {}

    /// Show a dismissible notification.
    fn notify(&mut self, notification: Notification);

    /// Ask the user a yes/no question.
    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Confirmation;

    /// Whether the host can intercept navigations of the current document.
    fn intercepts_navigation(&self) -> bool {
        true
    }

    /// Message from the page's own unload handler, if it has one.
    fn previous_unload_message(&mut self) -> Option<String> {
        None
    }
}

/// Intercept any action attempt.
///
/// # Errors
///
/// Returns [`EngineError::NavigationUnsupported`] for a navigation when the
/// host cannot intercept navigations. Nothing is enacted in that case.
pub fn intercept(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    host: &mut dyn ActionHost,
) -> EngineResult<InterceptOutcome> {
    match action {
        Action::OpenWindow { .. } => Ok(intercept_window(ctx, page, action, host)),
        Action::OpenModal { .. } => Ok(intercept_modal(ctx, page, action, host)),
        Action::Navigate { .. } => intercept_location(ctx, page, action, host),
    }
}

/// Intercept a request to open a new window.
pub fn intercept_window(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    host: &mut dyn ActionHost,
) -> InterceptOutcome {
    if action.targets_same_context() {
        let decision = Decision::allow(DecisionReason::SameBrowsingContext);
        debug!(url = action.url(), "window targets current browsing context");
        host.proceed(action);
        return InterceptOutcome::decided(decision, Disposition::Proceeded);
    }
    enact(ctx, page, action, decide_window_action(ctx), host)
}

/// Intercept a request to open a modal dialog.
pub fn intercept_modal(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    host: &mut dyn ActionHost,
) -> InterceptOutcome {
    enact(ctx, page, action, decide_window_action(ctx), host)
}

/// Intercept a navigation of the current document.
///
/// # Errors
///
/// Returns [`EngineError::NavigationUnsupported`] when the host cannot
/// intercept navigations.
pub fn intercept_location(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    host: &mut dyn ActionHost,
) -> EngineResult<InterceptOutcome> {
    if !host.intercepts_navigation() {
        return Err(EngineError::NavigationUnsupported);
    }
    let decision = decide_location_change(ctx, page, action.url());
    Ok(enact(ctx, page, action, decision, host))
}

/// Decide whether the page may unload, asking the user when a challenge is
/// due.
///
/// Unload cannot be held: a pending answer keeps the user on the page.
pub fn intercept_unload(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    host: &mut dyn ActionHost,
) -> (Decision, UnloadOutcome) {
    let decision = decide_unload_challenge(ctx);
    if !decision.requires_confirmation() {
        let outcome = match host.previous_unload_message() {
            Some(message) => UnloadOutcome::Delegate(message),
            None => UnloadOutcome::Proceed,
        };
        return (decision, outcome);
    }

    let prompt = ConfirmPrompt::for_unload(page.href());
    let outcome = match host.confirm(&prompt) {
        Confirmation::Accepted => UnloadOutcome::Proceed,
        Confirmation::Rejected | Confirmation::Pending => {
            warn!(url = page.href(), "unload cancelled");
            UnloadOutcome::Cancel
        },
    };
    (decision, outcome)
}

/// Enact the user's answer to a confirmation for `action`.
pub(crate) fn enact_answer(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    decision: Decision,
    accepted: bool,
    host: &mut dyn ActionHost,
) -> InterceptOutcome {
    if accepted {
        info!(url = action.url(), action = action.action_type(), "user allowed action");
        host.proceed(action);
        InterceptOutcome::decided(decision, Disposition::Proceeded)
    } else {
        refuse(ctx, page, action, decision, host)
    }
}

fn enact(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    decision: Decision,
    host: &mut dyn ActionHost,
) -> InterceptOutcome {
    match decision.verdict {
        Verdict::Allow => {
            info!(
                url = action.url(),
                action = action.action_type(),
                reason = %decision.reason,
                "allowed action"
            );
            host.proceed(action);
            InterceptOutcome::decided(decision, Disposition::Proceeded)
        },
        Verdict::Block => refuse(ctx, page, action, decision, host),
        Verdict::AskUser => {
            let prompt = ConfirmPrompt::for_action(action);
            match host.confirm(&prompt) {
                Confirmation::Accepted => enact_answer(ctx, page, action, decision, true, host),
                Confirmation::Rejected => enact_answer(ctx, page, action, decision, false, host),
                Confirmation::Pending => {
                    debug!(prompt = %prompt.id, url = action.url(), "confirmation pending");
                    InterceptOutcome::decided(
                        decision,
                        Disposition::AwaitingConfirmation(prompt.id),
                    )
                },
            }
        },
    }
}

fn refuse(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    action: &Action,
    decision: Decision,
    host: &mut dyn ActionHost,
) -> InterceptOutcome {
    warn!(
        url = action.url(),
        action = action.action_type(),
        reason = %decision.reason,
        "blocked action"
    );
    host.suppress(action);
    if matches!(action, Action::Navigate { .. }) {
        host.stay_put(&page.fragment());
    }
    host.notify(blocked_notification(
        action,
        decision.reason,
        ctx.policy.notification_timeout_ms,
    ));
    InterceptOutcome::decided(decision, Disposition::Suppressed)
}

/// Notification describing a suppressed action.
///
/// Popups and redirects carry the original request as their proceed-anyway
/// action; modal dialogs do not.
#[must_use]
pub fn blocked_notification(
    action: &Action,
    reason: DecisionReason,
    timeout_ms: u64,
) -> Notification {
    let notification = match action {
        Action::OpenWindow { url, target_name, .. } => {
            Notification::new(NotificationKind::BlockedPopup, url.clone())
                .with_title(target_name.clone())
                .with_proceed_anyway(action.clone())
        },
        Action::OpenModal { url, .. } => Notification::new(NotificationKind::BlockedModal, url.clone()),
        Action::Navigate { url } => Notification::new(NotificationKind::DeniedRedirect, url.clone())
            .with_proceed_anyway(action.clone()),
    };
    notification.with_reason(reason).with_timeout_ms(timeout_ms)
}

#[cfg(test)]
#[path = "interceptor_tests.rs"]
mod tests;
