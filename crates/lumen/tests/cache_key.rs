//! Integration tests for cache key changes when ancestors restyle.

mod support;

use lcss::{Color, CompoundSelector, ParsedValue, StyleMap, StyleOrigin, StyledValue};
use lumen::StyleableNode;
use support::{Harness, author, rule};

#[test]
fn test_ancestor_map_change_rebuilds_descendant_key() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_class("dark"))
            .declare("text-fill", ParsedValue::Color(Color::rgb(200, 200, 200))),
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(2.0)),
    ]));
    let pane = h.scene.add_root(StyleableNode::region("Pane"));
    let label = h.scene.add_child(pane, StyleableNode::labeled("Label"));
    h.pulse();

    let before = h.scene.style_helper(label).and_then(|s| s.cache_key()).cloned().unwrap();
    assert_eq!(before.ids()[1], StyleMap::EMPTY_ID);
    assert_eq!(h.value(label, "text-fill"), Some(StyledValue::Color(Color::BLACK)));

    h.scene.add_style_class(pane, "dark");
    h.pulse();

    let after = h.scene.style_helper(label).and_then(|s| s.cache_key()).cloned().unwrap();
    assert_eq!(after.ids()[0], before.ids()[0]);
    assert_ne!(after, before);
    assert_eq!(
        h.value(label, "text-fill"),
        Some(StyledValue::Color(Color::rgb(200, 200, 200)))
    );
    assert_eq!(h.origin(label, "text-fill"), Some(StyleOrigin::Author));
}

#[test]
fn test_unchanged_structure_reuses_helper() {
    let mut h = Harness::new().stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::px(2.0)),
    ]));
    let pane = h.scene.add_root(StyleableNode::region("Pane"));
    let label = h.scene.add_child(pane, StyleableNode::labeled("Label"));
    h.pulse();
    let before = h.scene.style_helper(label).and_then(|s| s.cache_key()).cloned();

    // A class nothing matches leaves every map as it was.
    h.scene.add_style_class(pane, "unused");
    let writes = h.scene.applied_styles();
    h.pulse();

    assert_eq!(h.scene.style_helper(label).and_then(|s| s.cache_key()).cloned(), before);
    assert_eq!(h.scene.applied_styles(), writes);
}
