//! Mock implementations for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use popguard_core::{
    Action, ActionHost, Clock, ConfirmPrompt, Confirmation, Millis, Notification,
};

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `now_ms`.
    #[must_use]
    pub fn new(now_ms: Millis) -> Self {
        Self {
            now: AtomicU64::new(now_ms),
        }
    }

    /// Create a shareable clock reading `now_ms`.
    #[must_use]
    pub fn shared(now_ms: Millis) -> Arc<Self> {
        Arc::new(Self::new(now_ms))
    }

    /// Jump to `now_ms`. Moving backwards is allowed.
    pub fn set(&self, now_ms: Millis) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward by `by_ms`, saturating at the maximum.
    pub fn advance(&self, by_ms: Millis) {
        let next = self.now_ms().saturating_add(by_ms);
        self.set(next);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

/// One call the engine made into a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    /// `proceed`
    Proceed(Action),
    /// `suppress`
    Suppress(Action),
    /// `stay_put` with the fragment the location was reset to.
    StayPut(String),
    /// `notify`
    Notify(Notification),
    /// `confirm`
    Confirm(ConfirmPrompt),
}

/// Host that records every call and answers confirmations from a queue.
///
/// Uses `std::sync::Mutex` internally so clones share one record and the
/// builder methods work without `&mut`.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    /// Every call, in order.
    calls: Arc<Mutex<Vec<HostCall>>>,
    /// Queued confirmation answers.
    answers: Arc<Mutex<VecDeque<Confirmation>>>,
    /// Answer used when the queue is empty.
    default_answer: Confirmation,
    /// Whether navigation interception is available.
    intercepts_navigation: bool,
    /// Message returned by the page's own unload handler.
    unload_message: Option<String>,
}

impl RecordingHost {
    /// Create a host that rejects confirmations by default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            answers: Arc::new(Mutex::new(VecDeque::new())),
            default_answer: Confirmation::Rejected,
            intercepts_navigation: true,
            unload_message: None,
        }
    }

    /// Queue a confirmation answer.
    #[must_use]
    pub fn with_answer(self, answer: Confirmation) -> Self {
        self.queue_answer(answer);
        self
    }

    /// Set the answer used when the queue is empty.
    #[must_use]
    pub fn with_default_answer(mut self, answer: Confirmation) -> Self {
        self.default_answer = answer;
        self
    }

    /// Pretend the host cannot intercept navigations.
    #[must_use]
    pub fn without_navigation(mut self) -> Self {
        self.intercepts_navigation = false;
        self
    }

    /// Install a previous unload handler returning `message`.
    #[must_use]
    pub fn with_unload_message(mut self, message: impl Into<String>) -> Self {
        self.unload_message = Some(message.into());
        self
    }

    /// Queue a confirmation answer.
    pub fn queue_answer(&self, answer: Confirmation) {
        if let Ok(mut guard) = self.answers.lock() {
            guard.push_back(answer);
        }
    }

    /// Every recorded call.
    #[must_use]
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Actions that were let through.
    #[must_use]
    pub fn proceeded(&self) -> Vec<Action> {
        self.filter(|call| match call {
            HostCall::Proceed(action) => Some(action.clone()),
            _ => None,
        })
    }

    /// Actions that were suppressed.
    #[must_use]
    pub fn suppressed(&self) -> Vec<Action> {
        self.filter(|call| match call {
            HostCall::Suppress(action) => Some(action.clone()),
            _ => None,
        })
    }

    /// Fragments the location was reset to.
    #[must_use]
    pub fn stay_puts(&self) -> Vec<String> {
        self.filter(|call| match call {
            HostCall::StayPut(fragment) => Some(fragment.clone()),
            _ => None,
        })
    }

    /// Notifications raised.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.filter(|call| match call {
            HostCall::Notify(notification) => Some(notification.clone()),
            _ => None,
        })
    }

    /// Prompts shown.
    #[must_use]
    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.filter(|call| match call {
            HostCall::Confirm(prompt) => Some(prompt.clone()),
            _ => None,
        })
    }

    /// Forget every recorded call.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.clear();
        }
    }

    fn record(&self, call: HostCall) {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(call);
        }
    }

    fn filter<T>(&self, f: impl Fn(&HostCall) -> Option<T>) -> Vec<T> {
        self.calls
            .lock()
            .map(|g| g.iter().filter_map(&f).collect())
            .unwrap_or_default()
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionHost for RecordingHost {
    fn proceed(&mut self, action: &Action) {
        self.record(HostCall::Proceed(action.clone()));
    }

    fn suppress(&mut self, action: &Action) {
        self.record(HostCall::Suppress(action.clone()));
    }

    fn stay_put(&mut self, fragment: &str) {
        self.record(HostCall::StayPut(fragment.to_string()));
    }

    fn notify(&mut self, notification: Notification) {
        self.record(HostCall::Notify(notification));
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Confirmation {
        self.record(HostCall::Confirm(prompt.clone()));
        self.answers
            .lock()
            .ok()
            .and_then(|mut g| g.pop_front())
            .unwrap_or(self.default_answer)
    }

    fn intercepts_navigation(&self) -> bool {
        self.intercepts_navigation
    }

    fn previous_unload_message(&mut self) -> Option<String> {
        self.unload_message.clone()
    }
}
