//! Pure decision functions.
//!
//! Every entry point is a function of a [`DecisionContext`] (policy, the
//! current interaction record, "now" and the page's transport security)
//! plus the action's own parameters. None of them can fail: every branch
//! ends in a well-formed [`Decision`], and anything that cannot be proven
//! safe takes the restrictive branch.
//!
//! # Window and modal requests
//!
//! 1. `block_all_popups` -> Block (`BlockAll`)
//! 2. `confirm_each_action` -> `AskUser` (`ExplicitConfirm`)
//! 3. Insecure origin under `require_secure_origin` -> Block (`InsecureOrigin`)
//! 4. Outside the grant period -> Block (`GrantPeriodExpired`)
//! 5. Otherwise -> Allow
//!
//! # Location changes
//!
//! 1. `allow_unsolicited_redirects` -> Allow
//! 2. Secure origin under `require_secure_origin` -> Allow (exempt)
//! 3. Outside the grant period -> Block (`GrantPeriodExpired`)
//! 4. No allow-listed target -> Block (`NoProvenance`)
//! 5. Link target whose href differs from the destination -> Block (`HijackedLink`)
//! 6. Link target opening a new window -> Block (`NewWindowTarget`)
//! 7. Otherwise -> Allow (`ElementProvenanceOk`)

use serde::{Deserialize, Serialize};
use std::fmt;

use tracing::trace;

use crate::clock::{Millis, elapsed_since};
use crate::policy::PolicyConfig;
use crate::tracker::InteractionRecord;
use crate::url::{PageLocation, canonicalize};

/// What the host should do with an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Let the action proceed unmodified.
    Allow,
    /// Suppress the action.
    Block,
    /// Ask the user; a yes allows, a no blocks.
    AskUser,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Block => write!(f, "block"),
            Self::AskUser => write!(f, "ask"),
        }
    }
}

/// Why a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Policy asks about every action.
    ExplicitConfirm,
    /// A qualifying interaction happened within the grant period.
    WithinGrantPeriod,
    /// The page's secure origin satisfied the policy.
    SecureOriginExempt,
    /// The interacted element legitimately causes this navigation.
    ElementProvenanceOk,
    /// The last qualifying interaction is too old.
    GrantPeriodExpired,
    /// The page was served over an insecure transport.
    InsecureOrigin,
    /// No allow-listed element was interacted with.
    NoProvenance,
    /// The destination differs from the clicked link's href.
    HijackedLink,
    /// The clicked link targets a new window, not this one.
    NewWindowTarget,
    /// Policy blocks every popup.
    BlockAll,
    /// Neither time nor origin gating is enabled.
    NoRestriction,
    /// Redirect denial is disabled.
    RedirectCheckDisabled,
    /// The window request targets the current browsing context.
    SameBrowsingContext,
    /// No unload challenge is due.
    UnloadUnchallenged,
}

impl DecisionReason {
    /// Human-readable explanation.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::ExplicitConfirm => "policy requires explicit confirmation",
            Self::WithinGrantPeriod => "user interaction within grant period",
            Self::SecureOriginExempt => "secure origin",
            Self::ElementProvenanceOk => "initiated by an allowed element",
            Self::GrantPeriodExpired => "no recent user interaction",
            Self::InsecureOrigin => "page served over an insecure connection",
            Self::NoProvenance => "not initiated by a link, button or form control",
            Self::HijackedLink => "destination differs from the clicked link",
            Self::NewWindowTarget => "clicked link opens a new window",
            Self::BlockAll => "all popups are blocked",
            Self::NoRestriction => "no restriction configured",
            Self::RedirectCheckDisabled => "redirect checks disabled",
            Self::SameBrowsingContext => "targets the current browsing context",
            Self::UnloadUnchallenged => "no unload challenge required",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Verdict plus reason for a single action attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// What to do.
    pub verdict: Verdict,
    /// Why.
    pub reason: DecisionReason,
}

impl Decision {
    /// An allow decision.
    #[must_use]
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Allow,
            reason,
        }
    }

    /// A block decision.
    #[must_use]
    pub fn block(reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::Block,
            reason,
        }
    }

    /// An ask-the-user decision.
    #[must_use]
    pub fn ask(reason: DecisionReason) -> Self {
        Self {
            verdict: Verdict::AskUser,
            reason,
        }
    }

    /// Whether the action may proceed without asking.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    /// Whether the action is suppressed.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Block
    }

    /// Whether the user must answer first.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        self.verdict == Verdict::AskUser
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.verdict, self.reason)
    }
}

/// Everything a decision reads besides the action's own parameters.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Active policy.
    pub policy: &'a PolicyConfig,
    /// Most recent interaction.
    pub record: &'a InteractionRecord,
    /// Current time.
    pub now_ms: Millis,
    /// Whether the page was served over a secure transport.
    pub origin_secure: bool,
}

impl DecisionContext<'_> {
    /// Whether the last qualifying interaction is strictly less than
    /// `grant_period_ms` old. No interaction, or a clock reading earlier
    /// than the interaction, counts as outside.
    #[must_use]
    pub fn within_grant_period(&self) -> bool {
        self.record
            .timestamp_ms
            .and_then(|at| elapsed_since(self.now_ms, at))
            .is_some_and(|elapsed| elapsed < self.policy.grant_period_ms)
    }

    /// Time gate: passes when grant-period gating is off or the interaction
    /// is recent enough.
    #[must_use]
    pub fn grant_ok(&self) -> bool {
        !self.policy.use_grant_period || self.within_grant_period()
    }

    /// Origin gate: passes when secure-origin gating is off or the page is
    /// secure.
    #[must_use]
    pub fn origin_ok(&self) -> bool {
        !self.policy.require_secure_origin || self.origin_secure
    }

    /// Whether the recorded target exists and still satisfies the
    /// allow-list.
    #[must_use]
    pub fn has_provenance(&self) -> bool {
        self.record
            .target
            .as_ref()
            .is_some_and(|t| self.policy.element_allowed(t))
    }
}

/// Decide a request to open a new window or a modal dialog.
///
/// Which element was interacted with does not matter here; only timing and
/// origin do.
#[must_use]
pub fn decide_window_action(ctx: &DecisionContext<'_>) -> Decision {
    let policy = ctx.policy;

    if policy.block_all_popups {
        return Decision::block(DecisionReason::BlockAll);
    }
    if policy.confirm_each_action {
        return Decision::ask(DecisionReason::ExplicitConfirm);
    }

    // Origin is the primary gate and is reported when both fail.
    if !ctx.origin_ok() {
        return Decision::block(DecisionReason::InsecureOrigin);
    }
    if !ctx.grant_ok() {
        return Decision::block(DecisionReason::GrantPeriodExpired);
    }

    if policy.use_grant_period {
        Decision::allow(DecisionReason::WithinGrantPeriod)
    } else if policy.require_secure_origin {
        Decision::allow(DecisionReason::SecureOriginExempt)
    } else {
        Decision::allow(DecisionReason::NoRestriction)
    }
}

/// Decide a navigation of the current document to `new_url`.
#[must_use]
pub fn decide_location_change(
    ctx: &DecisionContext<'_>,
    page: &PageLocation,
    new_url: &str,
) -> Decision {
    let policy = ctx.policy;

    if policy.allow_unsolicited_redirects {
        return Decision::allow(DecisionReason::RedirectCheckDisabled);
    }
    if policy.require_secure_origin && ctx.origin_secure {
        return Decision::allow(DecisionReason::SecureOriginExempt);
    }
    if !ctx.grant_ok() {
        return Decision::block(DecisionReason::GrantPeriodExpired);
    }

    let Some(target) = ctx.record.target.as_ref() else {
        return Decision::block(DecisionReason::NoProvenance);
    };
    if !policy.element_allowed(target) {
        return Decision::block(DecisionReason::NoProvenance);
    }

    if target.is_link() {
        if !new_url.starts_with('#') && !matches_link(target.href(), new_url, page) {
            return Decision::block(DecisionReason::HijackedLink);
        }
        if target
            .target_attribute()
            .is_some_and(|t| t.eq_ignore_ascii_case("_blank"))
        {
            return Decision::block(DecisionReason::NewWindowTarget);
        }
    }

    Decision::allow(DecisionReason::ElementProvenanceOk)
}

/// Decide whether leaving the page must be confirmed.
///
/// A challenge is due when the last interaction carried no provenance, the
/// origin is not exempt, and that interaction is still inside the grant
/// period: a script-driven unload right after a click on nothing in
/// particular. Timing here is always measured, whether or not
/// `use_grant_period` gates windows.
#[must_use]
pub fn decide_unload_challenge(ctx: &DecisionContext<'_>) -> Decision {
    let policy = ctx.policy;

    let challenge = policy.confirm_on_unload
        && !ctx.has_provenance()
        && !(policy.require_secure_origin && ctx.origin_secure)
        && ctx.within_grant_period();

    if challenge {
        Decision::ask(DecisionReason::NoProvenance)
    } else {
        Decision::allow(DecisionReason::UnloadUnchallenged)
    }
}

/// Whether `new_url` is the same navigation target as the link's href.
/// A missing href or any canonicalization failure cannot prove sameness.
fn matches_link(href: Option<&str>, new_url: &str, page: &PageLocation) -> bool {
    let Some(href) = href else {
        return false;
    };
    match (canonicalize(href, page), canonicalize(new_url, page)) {
        (Ok(link), Ok(destination)) => {
            trace!(%link, %destination, "compared canonical urls");
            link == destination
        },
        (Err(e), _) | (_, Err(e)) => {
            trace!(error = %e, "canonicalization failed");
            false
        },
    }
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
