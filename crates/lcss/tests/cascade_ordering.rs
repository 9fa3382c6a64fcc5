//! Cascade ranking across origins, importance, specificity and order.

use std::rc::Rc;

use lcss::{
    CascadingStyle, ComplexSelector, CompoundSelector, Declaration, Lookup, ParsedValue,
    PseudoClass, Style, StyleMap, StyleOrigin,
};

fn style(
    property: &str,
    selector: ComplexSelector,
    origin: StyleOrigin,
    important: bool,
    ordinal: usize,
) -> CascadingStyle {
    let mut declaration = Declaration::new(property, ParsedValue::ident("x"));
    declaration.important = important;
    CascadingStyle::new(
        Style {
            selector: Rc::new(selector),
            declaration: Rc::new(declaration),
            origin,
            url: None,
        },
        ordinal,
    )
}

fn label() -> ComplexSelector {
    CompoundSelector::of_type("Label").into()
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn test_origins_rank_in_order() {
    let agent = style("opacity", label(), StyleOrigin::UserAgent, false, 3);
    let author = style("opacity", label(), StyleOrigin::Author, false, 2);
    let inline = style("opacity", label(), StyleOrigin::Inline, false, 1);
    let user = style("opacity", label(), StyleOrigin::User, false, 0);
    assert!(user > inline);
    assert!(inline > author);
    assert!(author > agent);
}

#[test]
fn test_specificity_breaks_ties_within_origin() {
    let by_type = style("opacity", label(), StyleOrigin::Author, false, 5);
    let by_class = style(
        "opacity",
        CompoundSelector::of_class("caption").into(),
        StyleOrigin::Author,
        false,
        0,
    );
    let by_descendant = style(
        "opacity",
        ComplexSelector::from(CompoundSelector::of_type("HBox"))
            .descendant(CompoundSelector::of_type("Label")),
        StyleOrigin::Author,
        false,
        0,
    );
    assert!(by_class > by_type);
    assert!(by_descendant > by_type);
    assert!(by_class > by_descendant);
}

#[test]
fn test_important_agent_outranks_plain_author() {
    let agent = style("opacity", label(), StyleOrigin::UserAgent, true, 0);
    let author = style(
        "opacity",
        CompoundSelector::of_id("title").into(),
        StyleOrigin::Author,
        false,
        1,
    );
    assert!(agent > author);
}

// =============================================================================
// Style maps
// =============================================================================

#[test]
fn test_style_map_groups_by_property() {
    let map = StyleMap::new(
        0,
        vec![
            style("opacity", label(), StyleOrigin::Author, false, 0),
            style("text-fill", label(), StyleOrigin::Author, false, 1),
            style("opacity", label(), StyleOrigin::Author, false, 2),
        ],
    );
    assert_eq!(map.get("opacity").len(), 2);
    assert_eq!(map.get("text-fill").len(), 1);
    assert!(map.get("cursor").is_empty());

    let mut properties: Vec<&str> = map.properties().collect();
    properties.sort_unstable();
    assert_eq!(properties, ["opacity", "text-fill"]);
}

#[test]
fn test_first_state_match_is_the_winner() {
    let hover: ComplexSelector = CompoundSelector::of_type("Label")
        .pseudo(PseudoClass::HOVER)
        .into();
    let map = StyleMap::new(
        4,
        vec![
            style("opacity", label(), StyleOrigin::Author, false, 0),
            style("opacity", hover, StyleOrigin::Author, false, 1),
        ],
    );
    let styles = map.get("opacity");
    assert_eq!(styles[0].ordinal, 1);
    assert!(styles[0].pseudo_classes().has(PseudoClass::HOVER));
    assert!(styles[1].pseudo_classes().is_empty());
    assert_eq!(map.pseudo_classes(), PseudoClass::HOVER.state());
}

#[test]
fn test_empty_map_has_reserved_id() {
    let map = StyleMap::empty();
    assert!(map.is_empty());
    assert_eq!(map.id(), StyleMap::EMPTY_ID);
}

#[test]
fn test_lookup_classifies_winning_style() {
    let plain = style("opacity", label(), StyleOrigin::Author, false, 0);
    let inherit = Declaration::new("opacity", ParsedValue::Inherit);
    let inherited = CascadingStyle::new(
        Style {
            selector: Rc::new(label()),
            declaration: Rc::new(inherit),
            origin: StyleOrigin::Author,
            url: None,
        },
        1,
    );

    assert!(Lookup::from_style(Some(&plain)).is_found());
    assert_eq!(Lookup::from_style(Some(&inherited)), Lookup::Inherit);
    assert_eq!(Lookup::<&CascadingStyle>::from_style(None), Lookup::NoStyle);
}
