//! Integration tests for state transitions and the shared caches.

mod support;

use lcss::{Color, CompoundSelector, Lookup, ParsedValue, PseudoClass, StyleOrigin, StyledValue};
use lumen::{StyleCacheEntryKey, StyleableNode, transition_states, transition_to_state};
use support::{Harness, author, rule, user_agent};

fn no_negative(value: &StyledValue) -> Result<(), String> {
    match value.as_number() {
        Some(n) if n < 0.0 => Err(format!("{n} is negative")),
        _ => Ok(()),
    }
}

// =============================================================================
// Fast path
// =============================================================================

#[test]
fn test_second_transition_writes_nothing() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label"))
            .declare("text-fill", ParsedValue::Color(Color::WHITE))
            .declare("graphic-gap", ParsedValue::px(6.0)),
    ]));
    let root = h.scene.add_root(StyleableNode::region("Pane"));
    let label = h.scene.add_child(root, StyleableNode::labeled("Label"));
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(6.0)));

    let before = h.scene.applied_styles();
    transition_to_state(&mut h.manager, &mut h.scene, label);
    transition_to_state(&mut h.manager, &mut h.scene, label);
    assert_eq!(h.scene.applied_styles(), before);
}

#[test]
fn test_siblings_share_cached_values() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_class("item"))
            .declare("text-fill", ParsedValue::Color(Color::rgb(40, 50, 60))),
    ]));
    let root = h.scene.add_root(StyleableNode::region("Pane"));
    let a = h.scene.add_child(root, StyleableNode::labeled("Label").with_class("item"));
    let b = h.scene.add_child(root, StyleableNode::labeled("Label").with_class("item"));
    h.pulse();

    let key_a = h.scene.style_helper(a).and_then(|s| s.cache_key()).cloned().unwrap();
    let key_b = h.scene.style_helper(b).and_then(|s| s.cache_key()).cloned().unwrap();
    assert_eq!(key_a, key_b);

    let cache = h.manager.shared_cache(&key_a).unwrap();
    assert_eq!(cache.len(), 1);

    let entry_key = StyleCacheEntryKey::new(
        transition_states(&h.scene, a),
        h.manager.config().default_font.clone(),
    );
    let cached = cache.entry(&entry_key).and_then(|e| e.get("text-fill")).cloned();
    let Some(Lookup::Found(value)) = cached else {
        panic!("text-fill was not cached");
    };
    assert_eq!(value.value, StyledValue::Color(Color::rgb(40, 50, 60)));
    assert_eq!(h.value(a, "text-fill"), h.value(b, "text-fill"));
}

// =============================================================================
// Reverting
// =============================================================================

#[test]
fn test_unstyled_state_restores_pre_css_value() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label").pseudo(PseudoClass::HOVER))
            .declare("graphic-gap", ParsedValue::px(10.0)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label"));
    h.scene
        .styleable_mut(label)
        .apply_style("graphic-gap", None, StyledValue::Number(7.0))
        .unwrap();
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(7.0)));

    h.set_state(label, PseudoClass::HOVER, true);
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(10.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::Author));

    h.set_state(label, PseudoClass::HOVER, false);
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(7.0)));
    assert_eq!(h.origin(label, "graphic-gap"), None);
}

#[test]
fn test_user_value_survives_unstyling() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label").pseudo(PseudoClass::HOVER))
            .declare("graphic-gap", ParsedValue::px(10.0)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label"));
    h.pulse();
    h.set_state(label, PseudoClass::HOVER, true);
    h.pulse();

    h.scene
        .set_user_value(label, "graphic-gap", StyledValue::Number(1.0))
        .unwrap();
    h.set_state(label, PseudoClass::HOVER, false);
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(1.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::User));
}

#[test]
fn test_user_value_does_not_leak_to_siblings() {
    let mut h = Harness::new().stylesheet(user_agent([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(9.0)),
    ]));
    let root = h.scene.add_root(StyleableNode::region("Pane"));
    let a = h.scene.add_child(root, StyleableNode::labeled("Label"));
    let b = h.scene.add_child(root, StyleableNode::labeled("Label"));
    h.scene
        .set_user_value(a, "graphic-gap", StyledValue::Number(2.0))
        .unwrap();
    h.pulse();

    assert_eq!(h.value(a, "graphic-gap"), Some(StyledValue::Number(2.0)));
    assert_eq!(h.origin(a, "graphic-gap"), Some(StyleOrigin::User));
    assert_eq!(h.value(b, "graphic-gap"), Some(StyledValue::Number(9.0)));
    assert_eq!(h.origin(b, "graphic-gap"), Some(StyleOrigin::UserAgent));
}

#[test]
fn test_user_value_does_not_block_inheritance_elsewhere() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Pane")).declare("cursor", ParsedValue::ident("hand")),
    ]));
    let root = h.scene.add_root(StyleableNode::region("Pane"));
    let a = h.scene.add_child(root, StyleableNode::labeled("Label"));
    let b = h.scene.add_child(root, StyleableNode::labeled("Label"));
    let other_root = h.scene.add_root(StyleableNode::region("Pane"));
    let c = h.scene.add_child(other_root, StyleableNode::labeled("Label"));
    h.scene
        .set_user_value(a, "cursor", StyledValue::Ident("wait".to_string()))
        .unwrap();
    h.pulse();

    assert_eq!(h.value(a, "cursor"), Some(StyledValue::Ident("wait".to_string())));
    assert_eq!(h.value(b, "cursor"), Some(StyledValue::Ident("hand".to_string())));
    assert_eq!(h.value(c, "cursor"), Some(StyledValue::Ident("hand".to_string())));
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_rejected_value_is_reported_and_retried() {
    let mut h = Harness::collecting().stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(-5.0)),
    ]));
    let label = h
        .scene
        .add_root(StyleableNode::labeled("Label").with_validator("graphic-gap", no_negative));
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(4.0)));
    assert_eq!(h.errors().len(), 1);
    assert!(
        h.errors()[0]
            .message
            .starts_with("Failed to set css [graphic-gap] on [Label] due to")
    );

    transition_to_state(&mut h.manager, &mut h.scene, label);
    assert_eq!(h.errors().len(), 2);
}

#[test]
fn test_dropped_style_maps_request_a_restyle() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(6.0)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label"));
    h.pulse();

    h.manager.invalidate();
    transition_to_state(&mut h.manager, &mut h.scene, label);
    assert!(h.scene.style_helper(label).unwrap().cache_container().is_none());
    assert!(h.scene.css_flags(label).contains(lumen::CssFlags::REAPPLY));

    h.pulse();
    assert!(h.scene.style_helper(label).unwrap().cache_container().is_some());
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(6.0)));
}
