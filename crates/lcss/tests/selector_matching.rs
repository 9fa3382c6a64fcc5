//! Selector matching against detached node chains.

use lcss::{
    ComplexSelector, CompoundSelector, MetaChain, NodeMeta, PseudoClass, PseudoClassState,
};

fn tree() -> Vec<NodeMeta> {
    vec![
        NodeMeta::new("Label").with_id("title").with_class("caption"),
        NodeMeta::new("HBox").with_class("toolbar"),
        NodeMeta::new("BorderPane")
            .with_class("root")
            .with_states(PseudoClassState::empty().with(PseudoClass::FOCUSED)),
    ]
}

// =============================================================================
// Structural matching
// =============================================================================

#[test]
fn test_type_class_and_id_on_subject() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let mut triggers = [PseudoClassState::empty(); 3];

    assert!(ComplexSelector::from(CompoundSelector::of_type("Label")).applies(&label, &mut triggers));
    assert!(ComplexSelector::from(CompoundSelector::of_id("title")).applies(&label, &mut triggers));
    assert!(
        ComplexSelector::from(CompoundSelector::of_type("Label").class("caption"))
            .applies(&label, &mut triggers)
    );
    assert!(
        !ComplexSelector::from(CompoundSelector::of_type("Label").class("missing"))
            .applies(&label, &mut triggers)
    );
}

#[test]
fn test_descendant_skips_intermediate_ancestors() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let mut triggers = [PseudoClassState::empty(); 3];

    let selector = ComplexSelector::from(CompoundSelector::of_class("root"))
        .descendant(CompoundSelector::of_type("Label"));
    assert!(selector.applies(&label, &mut triggers));
}

#[test]
fn test_child_requires_direct_parent() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let mut triggers = [PseudoClassState::empty(); 3];

    let direct = ComplexSelector::from(CompoundSelector::of_class("toolbar"))
        .child(CompoundSelector::of_type("Label"));
    let skipped = ComplexSelector::from(CompoundSelector::of_class("root"))
        .child(CompoundSelector::of_type("Label"));
    assert!(direct.applies(&label, &mut triggers));
    assert!(!skipped.applies(&label, &mut triggers));
}

#[test]
fn test_pseudo_classes_do_not_affect_structure() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let mut triggers = [PseudoClassState::empty(); 3];

    // The label is not hovered, but the selector can still come to apply.
    let selector =
        ComplexSelector::from(CompoundSelector::of_type("Label").pseudo(PseudoClass::HOVER));
    assert!(selector.applies(&label, &mut triggers));
    assert!(triggers[0].has(PseudoClass::HOVER));
}

// =============================================================================
// State matching
// =============================================================================

#[test]
fn test_subject_states_checked_against_given_set() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let selector =
        ComplexSelector::from(CompoundSelector::of_type("Label").pseudo(PseudoClass::HOVER));

    assert!(!selector.state_matches(&label, PseudoClassState::empty()));
    assert!(selector.state_matches(&label, PseudoClassState::empty().with(PseudoClass::HOVER)));
    assert!(selector.state_matches(
        &label,
        PseudoClassState::empty()
            .with(PseudoClass::HOVER)
            .with(PseudoClass::PRESSED)
    ));
}

#[test]
fn test_ancestor_states_checked_live() {
    let nodes = tree();
    let label = MetaChain(&nodes);

    let focused = ComplexSelector::from(CompoundSelector::of_class("root").pseudo(PseudoClass::FOCUSED))
        .descendant(CompoundSelector::of_type("Label"));
    let hovered = ComplexSelector::from(CompoundSelector::of_class("root").pseudo(PseudoClass::HOVER))
        .descendant(CompoundSelector::of_type("Label"));

    assert!(focused.state_matches(&label, PseudoClassState::empty()));
    assert!(!hovered.state_matches(&label, PseudoClassState::empty()));
}

#[test]
fn test_ancestor_triggers_recorded_at_their_depth() {
    let nodes = tree();
    let label = MetaChain(&nodes);
    let mut triggers = [PseudoClassState::empty(); 2];

    // Depth 2 falls outside the slice and is dropped.
    let selector = ComplexSelector::from(CompoundSelector::of_class("root").pseudo(PseudoClass::FOCUSED))
        .descendant(CompoundSelector::of_class("toolbar").pseudo(PseudoClass::HOVER))
        .child(CompoundSelector::of_type("Label"));
    assert!(selector.applies(&label, &mut triggers));
    assert!(triggers[0].is_empty());
    assert_eq!(triggers[1], PseudoClassState::empty().with(PseudoClass::HOVER));
}

#[test]
fn test_custom_pseudo_class_is_interned() {
    let first = PseudoClass::new("expanded").unwrap();
    let second = PseudoClass::new("expanded").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.name(), "expanded");

    let nodes = [NodeMeta::new("TitledPane").with_states(PseudoClassState::empty().with(first))];
    let pane = MetaChain(&nodes);
    let selector = ComplexSelector::from(CompoundSelector::of_type("TitledPane").pseudo(first));
    assert!(selector.state_matches(&pane, nodes[0].states));
}
