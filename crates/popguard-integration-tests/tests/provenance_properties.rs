//! End-to-end checks of the provenance rules through the public `Engine`.
//!
//! Every test drives a real engine with a [`ManualClock`] and a
//! [`RecordingHost`], so the decision, the host calls and the interaction
//! record are all observed together.

use popguard_test::prelude::*;

const PAGE: &str = "http://x.com/p";
const SECURE_PAGE: &str = "https://x.com/p";

#[test]
fn test_grant_period_boundary_is_exclusive() {
    init_test_logging();
    let clock = ManualClock::shared(10_000);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("/next")));

    clock.set(10_099);
    let allowed = engine.open_window("/a", None, &mut host);
    assert_eq!(allowed.decision.unwrap().verdict, Verdict::Allow);

    clock.set(10_100);
    let blocked = engine.open_window("/b", None, &mut host);
    assert_eq!(
        blocked.decision.unwrap().reason,
        DecisionReason::GrantPeriodExpired
    );

    clock.set(50_000);
    assert!(engine.open_window("/c", None, &mut host).suppressed());

    assert_eq!(host.proceeded(), vec![Action::open_window("/a")]);
    assert_eq!(host.suppressed().len(), 2);
}

#[test]
fn test_origin_gate_dominates_timing() {
    let policy = PolicyConfig {
        grant_period_ms: 100,
        require_secure_origin: true,
        ..PolicyConfig::default()
    };

    let clock = ManualClock::shared(0);
    let mut insecure = test_engine(policy.clone(), PAGE, &clock);
    let mut secure = test_engine(policy, SECURE_PAGE, &clock);
    let mut host = RecordingHost::new();

    insecure.on_event(click(link("/x")));
    secure.on_event(click(link("/x")));
    clock.advance(1);

    let blocked = insecure.open_window("/w", None, &mut host);
    assert_eq!(blocked.decision.unwrap(), Decision::block(DecisionReason::InsecureOrigin));

    let allowed = secure.open_window("/w", None, &mut host);
    assert_eq!(allowed.decision.unwrap().verdict, Verdict::Allow);
}

#[test]
fn test_canonicalization_ignores_order_and_fragment() {
    let page = page_at(SECURE_PAGE);
    let absolute = canonicalize("https://x.com/p?b=2&a=1#frag", &page).unwrap();
    let relative = canonicalize("/p?a=1&b=2", &page).unwrap();
    assert_eq!(absolute, relative);
}

#[test]
fn test_canonicalization_is_idempotent() {
    let page = page_at(SECURE_PAGE);
    for url in [
        "https://x.com/p?b=2&a=1#frag",
        "/p?a=1&b=2",
        "/other/path?z=1&y=2",
        "https://elsewhere.org/q?k=v",
        "page2.html",
        "#section",
        "?only=query",
        "other",
        "./other",
        "../x",
        "https://x.com//evil.com/",
        "//evil.com/",
        "https://x.com:443/p",
        "HTTPS://X.COM/p?b&a",
    ] {
        let once = canonicalize(url, &page).unwrap();
        let twice = canonicalize(&once, &page).unwrap();
        assert_eq!(once, twice, "canonicalize not idempotent for {url}");
    }
}

#[test]
fn test_hijacked_link_denied_matching_link_allowed() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("https://x.com/real")));
    clock.advance(5);

    let hijack = engine.navigate("https://evil.com/", &mut host);
    assert_eq!(hijack.decision.unwrap(), Decision::block(DecisionReason::HijackedLink));
    assert_eq!(host.stay_puts(), vec![String::new()]);

    let genuine = engine.navigate("https://x.com/real", &mut host);
    assert_eq!(
        genuine.decision.unwrap(),
        Decision::allow(DecisionReason::ElementProvenanceOk)
    );
    assert_eq!(host.proceeded(), vec![Action::navigate("https://x.com/real")]);
}

#[test]
fn test_key_down_revokes_target_but_not_timing() {
    let clock = ManualClock::shared(500);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("https://x.com/real")));
    engine.on_event(key_down());
    assert_eq!(engine.interaction().timestamp_ms, Some(500));
    assert!(engine.interaction().target.is_none());

    clock.advance(1);
    assert!(engine.open_window("/w", None, &mut host).proceeded());

    let redirect = engine.navigate("https://x.com/real", &mut host);
    assert_eq!(redirect.decision.unwrap().reason, DecisionReason::NoProvenance);
}

#[test]
fn test_pointer_leave_also_revokes_target() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);

    engine.on_event(click(submit_button()));
    engine.on_event(pointer_leave());

    assert_eq!(engine.interaction().timestamp_ms, Some(0));
    assert!(engine.interaction().target.is_none());
}

#[test]
fn test_non_primary_click_is_ignored() {
    let clock = ManualClock::shared(1_000);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("https://x.com/real")));
    clock.set(1_500);
    engine.on_event(right_click(link("https://evil.com/")));

    assert_eq!(engine.interaction().timestamp_ms, Some(1_000));
    assert_eq!(
        engine.interaction().target.as_ref().and_then(ElementDescriptor::href),
        Some("https://x.com/real")
    );

    // Evaluated against the old record, which is long expired.
    let outcome = engine.open_window("/w", None, &mut host);
    assert_eq!(
        outcome.decision.unwrap().reason,
        DecisionReason::GrantPeriodExpired
    );
}

#[test]
fn test_span_inside_link_resolves_to_link() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(span_in(link("https://x.com/real"))));

    let target = engine.interaction().target.clone().unwrap();
    assert_eq!(target.kind, ElementKind::Link);
    assert_eq!(target.href(), Some("https://x.com/real"));

    assert!(engine.navigate("https://x.com/real#top", &mut host).proceeded());
}

#[test]
fn test_click_on_unlisted_element_clears_target() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(div()));
    assert_eq!(engine.interaction().timestamp_ms, Some(0));
    assert!(engine.interaction().target.is_none());

    assert!(engine.open_window("/w", None, &mut host).proceeded());
    assert!(engine.navigate("/anywhere", &mut host).suppressed());
}

#[test]
fn test_plain_button_has_no_provenance_submit_button_does() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(plain_button()));
    assert!(engine.navigate("/form-target", &mut host).suppressed());

    engine.on_event(click(submit_button()));
    assert!(engine.navigate("/form-target", &mut host).proceeded());
}

#[test]
fn test_blank_target_link_is_not_a_same_tab_redirect() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link_with_target("https://x.com/real", "_blank")));

    let outcome = engine.navigate("https://x.com/real", &mut host);
    assert_eq!(
        outcome.decision.unwrap().reason,
        DecisionReason::NewWindowTarget
    );
}

#[test]
fn test_lookalike_host_is_not_same_page() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("/p")));

    let outcome = engine.navigate("http://x.com.evil.com/p", &mut host);
    assert_eq!(outcome.decision.unwrap().reason, DecisionReason::HijackedLink);
}

#[test]
fn test_clock_running_backwards_fails_closed() {
    let clock = ManualClock::shared(5_000);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("/x")));
    clock.set(4_000);

    assert!(engine.open_window("/w", None, &mut host).suppressed());
}

#[test]
fn test_double_slash_link_does_not_cover_other_host() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), PAGE, &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("http://x.com//evil.com/")));

    let outcome = engine.navigate("//evil.com/", &mut host);
    assert_eq!(outcome.decision.unwrap(), Decision::block(DecisionReason::HijackedLink));
    assert!(host.proceeded().is_empty());
}

#[test]
fn test_relative_link_matches_its_resolved_navigation() {
    let clock = ManualClock::shared(0);
    let mut engine = test_engine(insecure_policy(100), "https://x.com/dir/page", &clock);
    let mut host = RecordingHost::new();

    engine.on_event(click(link("other")));
    assert!(engine.navigate("https://x.com/dir/other", &mut host).proceeded());

    engine.on_event(click(link("https://x.com:443/real")));
    assert!(engine.navigate("/real", &mut host).proceeded());
}
