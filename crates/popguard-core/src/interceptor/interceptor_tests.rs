use std::collections::VecDeque;

use super::*;
use crate::clock::Millis;
use crate::element::ElementDescriptor;
use crate::policy::PolicyConfig;
use crate::tracker::InteractionRecord;

#[derive(Default)]
struct Host {
    proceeded: Vec<Action>,
    suppressed: Vec<Action>,
    stayed: Vec<String>,
    notified: Vec<Notification>,
    prompts: Vec<ConfirmPrompt>,
    answers: VecDeque<Confirmation>,
    no_navigation: bool,
    unload_message: Option<String>,
}

impl Host {
    fn answering(answer: Confirmation) -> Self {
        Self {
            answers: VecDeque::from([answer]),
            ..Self::default()
        }
    }
}

impl ActionHost for Host {
    fn proceed(&mut self, action: &Action) {
        self.proceeded.push(action.clone());
    }

    fn suppress(&mut self, action: &Action) {
        self.suppressed.push(action.clone());
    }

    fn stay_put(&mut self, fragment: &str) {
        self.stayed.push(fragment.to_string());
    }

    fn notify(&mut self, notification: Notification) {
        self.notified.push(notification);
    }

    fn confirm(&mut self, prompt: &ConfirmPrompt) -> Confirmation {
        self.prompts.push(prompt.clone());
        self.answers.pop_front().unwrap_or(Confirmation::Rejected)
    }

    fn intercepts_navigation(&self) -> bool {
        !self.no_navigation
    }

    fn previous_unload_message(&mut self) -> Option<String> {
        self.unload_message.clone()
    }
}

const NOW: Millis = 10_000;

fn page() -> PageLocation {
    PageLocation::parse("http://x.com/p#top").unwrap()
}

fn policy() -> PolicyConfig {
    PolicyConfig {
        require_secure_origin: false,
        confirm_on_unload: true,
        notification_timeout_ms: 3_000,
        ..PolicyConfig::default()
    }
}

fn fresh_click(target: Option<ElementDescriptor>) -> InteractionRecord {
    InteractionRecord {
        timestamp_ms: Some(NOW),
        target,
    }
}

fn ctx<'a>(policy: &'a PolicyConfig, record: &'a InteractionRecord) -> DecisionContext<'a> {
    DecisionContext {
        policy,
        record,
        now_ms: NOW,
        origin_secure: false,
    }
}

fn named_window(url: &str, name: &str) -> Action {
    Action::OpenWindow {
        url: url.to_string(),
        target_name: Some(name.to_string()),
        features: None,
    }
}

#[test]
fn test_window_allowed_proceeds() {
    let policy = policy();
    let record = fresh_click(None);
    let mut host = Host::default();
    let action = Action::open_window("https://ads.example/");

    let outcome = intercept_window(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.proceeded());
    assert_eq!(host.proceeded, vec![action]);
    assert!(host.notified.is_empty());
}

#[test]
fn test_window_blocked_notifies_with_proceed_anyway() {
    let policy = policy();
    let record = InteractionRecord::default();
    let mut host = Host::default();
    let action = named_window("https://ads.example/", "promo");

    let outcome = intercept_window(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.suppressed());
    assert_eq!(
        outcome.decision.unwrap().reason,
        DecisionReason::GrantPeriodExpired
    );
    assert_eq!(host.suppressed, vec![action.clone()]);
    assert!(host.stayed.is_empty());

    let note = &host.notified[0];
    assert_eq!(note.kind, NotificationKind::BlockedPopup);
    assert_eq!(note.url, "https://ads.example/");
    assert_eq!(note.title.as_deref(), Some("promo"));
    assert_eq!(note.proceed_anyway, Some(action));
    assert_eq!(note.timeout, Some(std::time::Duration::from_millis(3_000)));
    assert_eq!(note.reason, Some(DecisionReason::GrantPeriodExpired));
    assert!(note.to_string().ends_with("(no recent user interaction)"));
}

#[test]
fn test_same_context_window_fast_path() {
    let policy = PolicyConfig {
        block_all_popups: true,
        ..policy()
    };
    let record = InteractionRecord::default();
    let mut host = Host::default();
    let action = named_window("/next", "_top");

    let outcome = intercept_window(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.proceeded());
    assert_eq!(
        outcome.decision.unwrap().reason,
        DecisionReason::SameBrowsingContext
    );
}

#[test]
fn test_modal_ignores_same_context_fast_path() {
    let policy = policy();
    let record = InteractionRecord::default();
    let mut host = Host::default();
    let action = Action::OpenModal {
        url: "/dialog".to_string(),
        arguments: Some("_self".to_string()),
    };

    let outcome = intercept_modal(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.suppressed());
    let note = &host.notified[0];
    assert_eq!(note.kind, NotificationKind::BlockedModal);
    assert!(note.proceed_anyway.is_none());
}

#[test]
fn test_confirm_accepted_proceeds() {
    let policy = PolicyConfig {
        confirm_each_action: true,
        ..policy()
    };
    let record = InteractionRecord::default();
    let mut host = Host::answering(Confirmation::Accepted);
    let action = named_window("https://ads.example/", "promo");

    let outcome = intercept_window(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.proceeded());
    assert_eq!(host.prompts[0].text, "Allow popup? (https://ads.example/, promo)");
    assert!(host.notified.is_empty());
}

#[test]
fn test_confirm_rejected_blocks_and_notifies() {
    let policy = PolicyConfig {
        confirm_each_action: true,
        ..policy()
    };
    let record = fresh_click(None);
    let mut host = Host::answering(Confirmation::Rejected);
    let action = Action::open_modal("/dialog");

    let outcome = intercept_modal(&ctx(&policy, &record), &page(), &action, &mut host);

    assert!(outcome.suppressed());
    assert_eq!(host.prompts[0].text, "Allow modal dialog? (/dialog)");
    assert_eq!(host.notified[0].kind, NotificationKind::BlockedModal);
}

#[test]
fn test_confirm_pending_holds_action() {
    let policy = PolicyConfig {
        confirm_each_action: true,
        ..policy()
    };
    let record = InteractionRecord::default();
    let mut host = Host::answering(Confirmation::Pending);
    let action = Action::open_window("/w");

    let outcome = intercept_window(&ctx(&policy, &record), &page(), &action, &mut host);

    assert_eq!(outcome.pending_prompt(), Some(host.prompts[0].id));
    assert!(host.proceeded.is_empty());
    assert!(host.suppressed.is_empty());
}

#[test]
fn test_denied_redirect_stays_put() {
    let policy = policy();
    let record = fresh_click(Some(ElementDescriptor::link("https://x.com/real")));
    let mut host = Host::default();
    let action = Action::navigate("https://evil.com/");

    let outcome = intercept_location(&ctx(&policy, &record), &page(), &action, &mut host).unwrap();

    assert!(outcome.suppressed());
    assert_eq!(outcome.decision.unwrap().reason, DecisionReason::HijackedLink);
    assert_eq!(host.stayed, vec!["#top".to_string()]);
    let note = &host.notified[0];
    assert_eq!(note.kind, NotificationKind::DeniedRedirect);
    assert_eq!(note.text, "Denied redirection");
    assert_eq!(note.url, "https://evil.com/");
}

#[test]
fn test_matching_redirect_proceeds() {
    let policy = policy();
    let record = fresh_click(Some(ElementDescriptor::link("https://x.com/real")));
    let mut host = Host::default();
    let action = Action::navigate("https://x.com/real");

    let outcome = intercept_location(&ctx(&policy, &record), &page(), &action, &mut host).unwrap();

    assert!(outcome.proceeded());
    assert!(host.stayed.is_empty());
}

#[test]
fn test_navigation_unsupported_is_inert() {
    let policy = policy();
    let record = InteractionRecord::default();
    let mut host = Host {
        no_navigation: true,
        ..Host::default()
    };

    let err = intercept_location(
        &ctx(&policy, &record),
        &page(),
        &Action::navigate("https://evil.com/"),
        &mut host,
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::NavigationUnsupported));
    assert!(host.proceeded.is_empty());
    assert!(host.suppressed.is_empty());

    // Windows still work without navigation interception.
    let outcome = intercept(
        &ctx(&policy, &record),
        &page(),
        &Action::open_window("/w"),
        &mut host,
    )
    .unwrap();
    assert!(outcome.suppressed());
}

#[test]
fn test_unload_challenge_accept_and_reject() {
    let policy = policy();
    let record = fresh_click(Some(ElementDescriptor::from_tag("div")));

    let mut host = Host::answering(Confirmation::Accepted);
    let (decision, outcome) = intercept_unload(&ctx(&policy, &record), &page(), &mut host);
    assert!(decision.requires_confirmation());
    assert_eq!(outcome, UnloadOutcome::Proceed);
    assert!(host.prompts[0].text.contains("leave http://x.com/p#top or stay?"));

    let mut host = Host::answering(Confirmation::Rejected);
    let (_, outcome) = intercept_unload(&ctx(&policy, &record), &page(), &mut host);
    assert_eq!(outcome, UnloadOutcome::Cancel);

    let mut host = Host::answering(Confirmation::Pending);
    let (_, outcome) = intercept_unload(&ctx(&policy, &record), &page(), &mut host);
    assert_eq!(outcome, UnloadOutcome::Cancel);
}

#[test]
fn test_unload_delegates_to_previous_handler() {
    let policy = policy();
    let record = InteractionRecord::default();

    let mut host = Host {
        unload_message: Some("Unsaved changes".to_string()),
        ..Host::default()
    };
    let (decision, outcome) = intercept_unload(&ctx(&policy, &record), &page(), &mut host);
    assert_eq!(decision.reason, DecisionReason::UnloadUnchallenged);
    assert_eq!(outcome, UnloadOutcome::Delegate("Unsaved changes".to_string()));
    assert!(host.prompts.is_empty());

    let mut host = Host::default();
    let (_, outcome) = intercept_unload(&ctx(&policy, &record), &page(), &mut host);
    assert_eq!(outcome, UnloadOutcome::Proceed);
}
