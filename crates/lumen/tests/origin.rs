//! Integration tests for cascade precedence between origins.

mod support;

use lcss::{CompoundSelector, ParsedValue, StyleOrigin, StyledValue, Stylesheet};
use lumen::StyleableNode;
use support::{Harness, author, rule, user_agent};

#[test]
fn test_user_agent_never_replaces_user_value() {
    let mut h = Harness::new().stylesheet(user_agent([
        rule(CompoundSelector::of_type("Label").id("title"))
            .declare("graphic-gap", ParsedValue::px(9.0)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label").with_id("title"));
    h.scene
        .set_user_value(label, "graphic-gap", StyledValue::Number(2.0))
        .unwrap();
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(2.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::User));
}

#[test]
fn test_author_replaces_user_value() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(9.0)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label"));
    h.scene
        .set_user_value(label, "graphic-gap", StyledValue::Number(2.0))
        .unwrap();
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(9.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::Author));
}

#[test]
fn test_inline_beats_more_specific_author_rule() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_id("title").class("big"))
            .declare("graphic-gap", ParsedValue::px(9.0)),
    ]));
    let label = h.scene.add_root(
        StyleableNode::labeled("Label")
            .with_id("title")
            .with_class("big")
            .with_inline_style(Stylesheet::inline([("graphic-gap", ParsedValue::px(3.0))])),
    );
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(3.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::Inline));
}

#[test]
fn test_important_author_beats_inline() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare_important("graphic-gap", ParsedValue::px(9.0)),
    ]));
    let label = h.scene.add_root(
        StyleableNode::labeled("Label")
            .with_inline_style(Stylesheet::inline([("graphic-gap", ParsedValue::px(3.0))])),
    );
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(9.0)));
    assert_eq!(h.origin(label, "graphic-gap"), Some(StyleOrigin::Author));
}

#[test]
fn test_author_sheet_beats_user_agent_sheet() {
    let mut h = Harness::new()
        .stylesheet(user_agent([
            rule(CompoundSelector::of_id("title")).declare("graphic-gap", ParsedValue::px(1.0)),
        ]))
        .stylesheet(author([
            rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(7.0)),
        ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label").with_id("title"));
    h.pulse();

    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(7.0)));
}
