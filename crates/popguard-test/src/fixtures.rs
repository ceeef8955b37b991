//! Test fixtures for elements, events, pages and policies.

use std::sync::Arc;

use popguard_core::{
    Clock, ElementDescriptor, Engine, InputEvent, InputEventKind, PageLocation, PolicyConfig,
};

/// `<a href=...>`
#[must_use]
pub fn link(href: &str) -> ElementDescriptor {
    ElementDescriptor::link(href)
}

/// `<a href=... target=...>`
#[must_use]
pub fn link_with_target(href: &str, target: &str) -> ElementDescriptor {
    ElementDescriptor::link(href).with_attribute("target", target)
}

/// `<span>` nested directly inside `parent`.
#[must_use]
pub fn span_in(parent: ElementDescriptor) -> ElementDescriptor {
    ElementDescriptor::from_tag("span").within(parent)
}

/// `<button type="submit">`
#[must_use]
pub fn submit_button() -> ElementDescriptor {
    ElementDescriptor::from_tag("button").with_attribute("type", "submit")
}

/// `<button type="button">`
#[must_use]
pub fn plain_button() -> ElementDescriptor {
    ElementDescriptor::from_tag("button").with_attribute("type", "button")
}

/// `<div>`
#[must_use]
pub fn div() -> ElementDescriptor {
    ElementDescriptor::from_tag("div")
}

/// Primary-button click on `target`.
#[must_use]
pub fn click(target: ElementDescriptor) -> InputEvent {
    InputEvent::new(InputEventKind::Click, Some(target))
}

/// Primary-button press on `target`.
#[must_use]
pub fn mouse_down(target: ElementDescriptor) -> InputEvent {
    InputEvent::new(InputEventKind::MouseDown, Some(target))
}

/// Value change on `target`.
#[must_use]
pub fn change(target: ElementDescriptor) -> InputEvent {
    InputEvent::new(InputEventKind::Change, Some(target))
}

/// Non-primary-button click on `target`.
#[must_use]
pub fn right_click(target: ElementDescriptor) -> InputEvent {
    click(target).secondary()
}

/// Key press with no target.
#[must_use]
pub fn key_down() -> InputEvent {
    InputEvent::new(InputEventKind::KeyDown, None)
}

/// Pointer leaving the viewport.
#[must_use]
pub fn pointer_leave() -> InputEvent {
    InputEvent::new(InputEventKind::PointerLeave, None)
}

/// Parse a page location.
///
/// # Panics
///
/// Panics if `href` is not an absolute URL.
#[must_use]
pub fn page_at(href: &str) -> PageLocation {
    PageLocation::parse(href).expect("fixture page location must parse")
}

/// Grant-period-only policy: secure-origin gating off, redirect denial on.
#[must_use]
pub fn insecure_policy(grant_period_ms: u64) -> PolicyConfig {
    PolicyConfig {
        grant_period_ms,
        require_secure_origin: false,
        ..PolicyConfig::default()
    }
}

/// Engine for the page at `href` on `clock`.
///
/// # Panics
///
/// Panics if `href` is not an absolute URL.
#[must_use]
pub fn test_engine<C>(policy: PolicyConfig, href: &str, clock: &Arc<C>) -> Engine
where
    C: Clock + 'static,
{
    let clock: Arc<dyn Clock> = Arc::clone(clock) as Arc<dyn Clock>;
    Engine::new(policy, page_at(href), clock)
}
