//! Popguard Core - popup and redirect provenance engine.
//!
//! Decides whether a page-initiated action (opening a window, opening a
//! modal dialog, navigating away) was caused by a genuine user interaction
//! or by script alone, and tells the host what to do about it.
//!
//! # Components
//!
//! - **URL canonicalization** ([`canonicalize`]): same-origin reduction,
//!   fragment removal and query sorting for navigation-identity comparison
//! - **Policy** ([`PolicyConfig`]): named switches plus the element allow-list
//! - **Interaction tracking** ([`InteractionTracker`]): one overwritten slot
//!   holding the last qualifying interaction
//! - **Decisions** ([`decide_window_action`], [`decide_location_change`],
//!   [`decide_unload_challenge`]): pure, infallible, fail closed
//! - **Interceptors** ([`interceptor`]): enact decisions through an
//!   [`ActionHost`]
//! - **Engine** ([`Engine`]): one instance per document, including the
//!   deferred-confirmation queue for non-modal hosts
//!
//! # Example
//!
//! ```
//! use popguard_core::prelude::*;
//! use popguard_core::decide_location_change;
//!
//! let policy = PolicyConfig {
//!     require_secure_origin: false,
//!     ..PolicyConfig::default()
//! };
//! let page = PageLocation::parse("https://x.com/p").unwrap();
//! let mut tracker = InteractionTracker::new(std::sync::Arc::new(policy.clone()));
//!
//! let click = InputEvent::new(
//!     InputEventKind::Click,
//!     Some(ElementDescriptor::link("https://x.com/real")),
//! );
//! tracker.on_event(&click, 1_000);
//!
//! let ctx = DecisionContext {
//!     policy: &policy,
//!     record: tracker.current(),
//!     now_ms: 1_010,
//!     origin_secure: page.is_secure(),
//! };
//! let hijack = decide_location_change(&ctx, &page, "https://evil.com/");
//! assert_eq!(hijack.reason, DecisionReason::HijackedLink);
//!
//! let follow = decide_location_change(&ctx, &page, "https://x.com/real");
//! assert!(follow.is_allowed());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod action;
pub mod clock;
pub mod decision;
pub mod deferred;
pub mod element;
pub mod engine;
/// Error types and results for the engine.
pub mod error;
pub mod interceptor;
pub mod notification;
pub mod policy;
pub mod tracker;
pub mod url;

pub use action::Action;
pub use clock::{Clock, Millis, SystemClock};
pub use decision::{
    Decision, DecisionContext, DecisionReason, Verdict, decide_location_change,
    decide_unload_challenge, decide_window_action,
};
pub use deferred::{Deferred, DeferredQueue, PendingConfirmation};
pub use element::{ElementDescriptor, ElementKind};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use interceptor::{ActionHost, Confirmation, Disposition, InterceptOutcome, UnloadOutcome};
pub use notification::{ConfirmPrompt, Notification, NotificationId, NotificationKind, PromptId};
pub use policy::{DEFAULT_GRANT_PERIOD_MS, ElementRule, PolicyConfig, default_allowed_elements};
pub use tracker::{InputEvent, InputEventKind, InteractionRecord, InteractionTracker};
pub use crate::url::{PageLocation, canonicalize, same_target};
