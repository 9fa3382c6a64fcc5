//! The styling pulse.
//!
//! Nodes collect [`CssFlags`] as they change. [`process_css`] walks every
//! root top-down and does the pending work: a re-applied node gets its style
//! helper rebuilt (or reused) before it transitions, an updated node only
//! transitions. Pending work on a node is forced onto its whole subtree, since
//! selectors like `.panel:hover Label` make children depend on their
//! ancestors.

use crate::scene::{CssFlags, NodeId, Scene};
use crate::style_helper::{create_style_helper, transition_to_state};
use crate::style_manager::StyleManager;

/// Styles every node with pending work.
///
/// Work requested while the pulse runs (for example by a node whose style
/// map was dropped) stays flagged for the next pulse.
pub fn process_css(manager: &mut StyleManager, scene: &mut Scene) {
    for root in scene.roots().to_vec() {
        process_node(manager, scene, root, CssFlags::empty());
    }
}

/// Styles `node` and its subtree; `inherited` is the work its parent did.
pub fn process_node(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    inherited: CssFlags,
) {
    let flags = scene.css_flags(node) | inherited;
    scene.clear_css_flags(node);

    if !flags.is_empty() {
        log::trace!(
            "CASCADE: Node='{}' flags={:?}",
            scene.styleable(node).describe(),
            flags
        );
    }

    if flags.contains(CssFlags::REAPPLY) {
        create_style_helper(manager, scene, node);
        transition_to_state(manager, scene, node);
    } else if flags.contains(CssFlags::UPDATE) && scene.style_helper(node).is_some() {
        transition_to_state(manager, scene, node);
    }

    for child in scene.children(node).to_vec() {
        process_node(manager, scene, child, flags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styleable::StyleableNode;
    use lcss::{
        Color, ComplexSelector, CompoundSelector, ParsedValue, PseudoClass, Rule, StyleOrigin,
        StyledValue, Stylesheet,
    };

    #[test]
    fn test_pulse_clears_flags_and_styles_new_nodes() {
        let mut manager = StyleManager::default();
        let mut scene = Scene::new();
        manager.add_stylesheet(
            &mut scene,
            Stylesheet::new(StyleOrigin::Author).rule(
                Rule::new(CompoundSelector::of_type("Label").into())
                    .declare("text-fill", ParsedValue::Color(Color::WHITE)),
            ),
        );
        let root = scene.add_root(StyleableNode::region("Pane"));
        let label = scene.add_child(root, StyleableNode::labeled("Label"));

        process_css(&mut manager, &mut scene);
        assert!(scene.css_flags(root).is_empty());
        assert!(scene.css_flags(label).is_empty());
        assert_eq!(
            scene.styleable(label).property("text-fill").map(|s| &s.value),
            Some(&StyledValue::Color(Color::WHITE))
        );
    }

    #[test]
    fn test_parent_update_reaches_children() {
        let mut manager = StyleManager::default();
        let mut scene = Scene::new();
        manager.add_stylesheet(
            &mut scene,
            Stylesheet::new(StyleOrigin::Author).rule(
                Rule::new(
                    ComplexSelector::from(
                        CompoundSelector::of_type("Pane").pseudo(PseudoClass::HOVER),
                    )
                    .child(CompoundSelector::of_type("Label")),
                )
                .declare("graphic-gap", ParsedValue::px(10.0)),
            ),
        );
        let pane = scene.add_root(StyleableNode::region("Pane"));
        let label = scene.add_child(pane, StyleableNode::labeled("Label"));
        process_css(&mut manager, &mut scene);

        scene.set_pseudo_class_state(pane, PseudoClass::HOVER, true);
        assert!(scene.css_flags(pane).contains(CssFlags::UPDATE));
        assert!(scene.css_flags(label).is_empty());

        process_css(&mut manager, &mut scene);
        assert_eq!(
            scene.styleable(label).property("graphic-gap").map(|s| &s.value),
            Some(&StyledValue::Number(10.0))
        );
    }
}
