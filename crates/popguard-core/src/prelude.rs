//! Prelude module - commonly used types for convenient import.
//!
//! Use `use popguard_core::prelude::*;` to import all essential types.

// Engine
pub use crate::{Clock, Engine, Millis, SystemClock};

// Policy and elements
pub use crate::{ElementDescriptor, ElementKind, ElementRule, PolicyConfig};

// Interaction tracking
pub use crate::{InputEvent, InputEventKind, InteractionRecord, InteractionTracker};

// Decisions
pub use crate::{Decision, DecisionContext, DecisionReason, Verdict};

// Actions and host integration
pub use crate::{
    Action, ActionHost, Confirmation, ConfirmPrompt, Disposition, InterceptOutcome, Notification,
    NotificationKind, PromptId, UnloadOutcome,
};

// URLs
pub use crate::{PageLocation, canonicalize};

// Errors
pub use crate::{EngineError, EngineResult};
