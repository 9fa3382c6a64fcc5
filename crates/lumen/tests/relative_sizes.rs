//! Integration tests for values measured in font-relative units.

mod support;

use lcss::{CompoundSelector, Font, ParsedValue, StyledValue};
use lumen::{StyleableNode, recalculate_relative_size_properties};
use support::{Harness, author, rule};

#[test]
fn test_em_values_follow_the_node_font() {
    let mut h = Harness::new().stylesheet(author([rule(CompoundSelector::of_type("Text"))
        .declare("line-spacing", ParsedValue::em(0.5))
        .declare("opacity", ParsedValue::Number(0.8))]));
    let text = h.scene.add_root(StyleableNode::text());
    h.scene
        .set_user_value(text, "font", StyledValue::Font(Font::new("Arial", 20.0)))
        .unwrap();
    h.pulse();
    assert_eq!(h.value(text, "line-spacing"), Some(StyledValue::Number(10.0)));

    let writes = h.scene.applied_styles();
    recalculate_relative_size_properties(
        &mut h.manager,
        &mut h.scene,
        text,
        &Font::new("Arial", 30.0),
    );
    assert_eq!(h.value(text, "line-spacing"), Some(StyledValue::Number(15.0)));
    assert_eq!(h.value(text, "opacity"), Some(StyledValue::Number(0.8)));
    assert_eq!(h.scene.applied_styles(), writes + 1);
}

#[test]
fn test_default_font_drives_unstyled_nodes() {
    let mut h = Harness::with_config(
        lumen::StyleConfig::default().with_default_font(Font::new("System", 10.0)),
    )
    .stylesheet(author([
        rule(CompoundSelector::of_type("Label")).declare("graphic-gap", ParsedValue::em(1.5)),
    ]));
    let label = h.scene.add_root(StyleableNode::labeled("Label"));
    h.pulse();
    assert_eq!(h.value(label, "graphic-gap"), Some(StyledValue::Number(15.0)));
}
