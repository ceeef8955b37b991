//! Replay a recorded interaction trace through the engine.
//!
//! A trace is a JSON array of steps, each with an `at_ms` timestamp and one
//! of `page`, `event`, `open_window`, `open_modal`, `navigate`, `unload` or
//! `resolve`:
//!
//! ```json
//! [
//!   { "at_ms": 0,    "event": { "kind": "click", "target": { "kind": "a", "attributes": { "href": "/next" } } } },
//!   { "at_ms": 20,   "open_window": { "url": "/ad", "target_name": "promo" } },
//!   { "at_ms": 5000, "navigate": { "url": "/elsewhere" } },
//!   { "at_ms": 5001, "unload": {} }
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow, bail};
use colored::Colorize;
use popguard_core::{
    Action, ActionHost, Clock, ConfirmPrompt, Confirmation, Decision, Disposition, Engine,
    InputEvent, InterceptOutcome, Millis, Notification, PageLocation, PolicyConfig, UnloadOutcome,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::theme::Theme;

/// One step of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TraceStep {
    /// Clock reading when the step happens.
    pub(crate) at_ms: Millis,
    /// What happens.
    #[serde(flatten)]
    pub(crate) kind: StepKind,
}

/// What a trace step does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StepKind {
    /// The document moved to a new URL.
    Page(String),
    /// An input event reached the page.
    Event(InputEvent),
    /// `window.open`.
    OpenWindow {
        url: String,
        #[serde(default)]
        target_name: Option<String>,
    },
    /// A modal dialog request.
    OpenModal { url: String },
    /// A script-driven location change.
    Navigate { url: String },
    /// The document is about to unload.
    Unload {},
    /// The user answered the outstanding confirmation.
    Resolve { accepted: bool },
}

/// One decision taken while replaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReplayRecord {
    /// Clock reading of the step.
    pub(crate) at_ms: Millis,
    /// Step name, e.g. `open_window`.
    pub(crate) step: &'static str,
    /// Destination, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    /// The engine's decision, if it took one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) decision: Option<Decision>,
    /// What the host was told to do with an action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) disposition: Option<Disposition>,
    /// What the host was told to do with an unload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) unload: Option<UnloadOutcome>,
    /// Notifications raised by this step.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) notifications: Vec<String>,
}

impl ReplayRecord {
    fn action(at_ms: Millis, step: &'static str, url: Option<String>, outcome: InterceptOutcome) -> Self {
        Self {
            at_ms,
            step,
            url,
            decision: outcome.decision,
            disposition: Some(outcome.disposition),
            unload: None,
            notifications: Vec::new(),
        }
    }

    fn render(&self) -> String {
        let mut line = format!("{} {:<12}", Theme::at_ms(self.at_ms), self.step);
        match self.decision {
            Some(decision) => {
                line.push_str(&format!(
                    " {} {}",
                    Theme::verdict(decision.verdict),
                    decision.reason.describe()
                ));
            },
            None => line.push_str(&format!(" {:<5}", "-")),
        }
        if let Some(url) = &self.url {
            line.push_str(&format!(" {}", url.bold()));
        }
        if let Some(disposition) = &self.disposition {
            line.push_str(&format!(" [{}]", Theme::disposition(disposition)));
        }
        if let Some(unload) = &self.unload {
            line.push_str(&format!(" [{}]", unload_label(unload)));
        }
        for text in &self.notifications {
            line.push_str(&format!("\n{:>12}{}", "", Theme::warning(text)));
        }
        line
    }
}

fn unload_label(outcome: &UnloadOutcome) -> String {
    match outcome {
        UnloadOutcome::Proceed => "proceed".green().to_string(),
        UnloadOutcome::Cancel => "cancel".red().to_string(),
        UnloadOutcome::Delegate(message) => format!("delegate: {message}").yellow().to_string(),
    }
}

/// Clock driven by trace timestamps.
#[derive(Debug, Default)]
struct TraceClock(AtomicU64);

impl TraceClock {
    fn set(&self, now_ms: Millis) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for TraceClock {
    fn now_ms(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}

/// Host that answers every prompt the same way and collects notifications.
#[derive(Debug)]
pub(crate) struct ReplayHost {
    answer: Confirmation,
    notifications: Vec<Notification>,
}

impl ReplayHost {
    /// Create a host answering every prompt with `answer`.
    pub(crate) fn new(answer: Confirmation) -> Self {
        Self {
            answer,
            notifications: Vec::new(),
        }
    }

    fn drain_notifications(&mut self) -> Vec<String> {
        self.notifications.drain(..).map(|n| n.to_string()).collect()
    }
}

impl ActionHost for ReplayHost {
    fn proceed(&mut self, action: &Action) {
        debug!(action = %action, "proceed");
    }

    fn suppress(&mut self, action: &Action) {
        debug!(action = %action, "suppress");
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Confirmation {
        debug!(prompt = %prompt.id, text = %prompt.text, answer = ?self.answer, "confirm");
        self.answer
    }
}

/// Run `steps` against a fresh engine for `page_url`.
///
/// # Errors
///
/// Returns an error if a page URL is not absolute or a `resolve` step
/// arrives with no confirmation outstanding.
pub(crate) fn run_trace(
    policy: PolicyConfig,
    page_url: &str,
    steps: &[TraceStep],
    host: &mut ReplayHost,
) -> Result<Vec<ReplayRecord>> {
    let clock = Arc::new(TraceClock::default());
    let engine_clock: Arc<dyn Clock> = clock.clone();
    let mut engine = Engine::for_url(policy, page_url, engine_clock)?;
    let mut records = Vec::new();

    for step in steps {
        clock.set(step.at_ms);
        let at = step.at_ms;

        let mut produced = match &step.kind {
            StepKind::Page(href) => {
                engine.set_page(PageLocation::parse(href)?);
                Vec::new()
            },
            StepKind::Event(event) => {
                engine.on_event(event.clone());
                Vec::new()
            },
            StepKind::OpenWindow { url, target_name } => {
                let outcome = engine.open_window(url.clone(), target_name.clone(), host);
                vec![ReplayRecord::action(at, "open_window", Some(url.clone()), outcome)]
            },
            StepKind::OpenModal { url } => {
                let outcome = engine.open_modal(url.clone(), host);
                vec![ReplayRecord::action(at, "open_modal", Some(url.clone()), outcome)]
            },
            StepKind::Navigate { url } => {
                let outcome = engine.navigate(url.clone(), host);
                vec![ReplayRecord::action(at, "navigate", Some(url.clone()), outcome)]
            },
            StepKind::Unload {} => {
                let (decision, outcome) = engine.before_unload(host);
                vec![ReplayRecord {
                    at_ms: at,
                    step: "unload",
                    url: Some(engine.page().href().to_owned()),
                    decision: Some(decision),
                    disposition: None,
                    unload: Some(outcome),
                    notifications: Vec::new(),
                }]
            },
            StepKind::Resolve { accepted } => {
                let pending = engine
                    .pending_confirmation()
                    .ok_or_else(|| anyhow!("no confirmation pending at {at}ms"))?;
                let prompt_id = pending.prompt_id;
                let held_url = pending.action.url().to_owned();

                let outcomes = engine.resolve_confirmation(prompt_id, *accepted, host)?;
                outcomes
                    .into_iter()
                    .enumerate()
                    .map(|(i, outcome)| {
                        let url = (i == 0).then(|| held_url.clone());
                        ReplayRecord::action(at, "resolve", url, outcome)
                    })
                    .collect()
            },
        };

        if let Some(last) = produced.last_mut() {
            last.notifications = host.drain_notifications();
        }
        records.append(&mut produced);
    }

    Ok(records)
}

/// Parse a trace from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of trace steps.
pub(crate) fn parse_trace(text: &str) -> Result<Vec<TraceStep>> {
    serde_json::from_str(text).context("invalid trace")
}

/// `popguard replay`.
pub(crate) fn run_replay(
    trace_path: &Path,
    policy: PolicyConfig,
    page_url: &str,
    answer: Confirmation,
    json: bool,
) -> Result<()> {
    let text = std::fs::read_to_string(trace_path)
        .with_context(|| format!("failed to read {}", trace_path.display()))?;
    let steps = parse_trace(&text)?;
    if steps.is_empty() {
        bail!("trace {} has no steps", trace_path.display());
    }

    let mut host = ReplayHost::new(answer);
    let records = run_trace(policy, page_url, &steps, &mut host)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("{}", Theme::header(&format!("Replaying {}", trace_path.display())));
    println!("{}", Theme::kv("page", page_url));
    println!("{}", Theme::separator());
    for record in &records {
        println!("{}", record.render());
    }
    println!("{}", Theme::separator());

    let blocked = records
        .iter()
        .filter(|r| r.decision.is_some_and(|d| d.is_blocked()))
        .count();
    let summary = format!("{} decisions, {blocked} blocked", records.len());
    if blocked == 0 {
        println!("{}", Theme::success(&summary));
    } else {
        println!("{}", Theme::dimmed(&summary));
    }

    Ok(())
}
