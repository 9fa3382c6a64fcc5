//! Arena scene graph.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]. A
//! parent link never owns its target, so walking up the tree is a chain of
//! index lookups and nodes can be re-parented without moving them.

use std::collections::HashMap;

use bitflags::bitflags;
use lcss::{PseudoClass, PseudoClassState, Selectable, Style, StyleOrigin, StyledValue, Stylesheet};

use crate::style_helper::StyleHelper;
use crate::styleable::Styleable;

/// Index of a node in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

bitflags! {
    /// Styling work pending for a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CssFlags: u8 {
        /// Pseudo-class state changed; transition to the new state.
        const UPDATE = 1;
        /// Structure changed; rebuild the style helper, then transition.
        const REAPPLY = 1 << 1;
    }
}

/// One node and the styling state attached to it.
#[derive(Debug)]
pub struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    states: PseudoClassState,
    pub(crate) style_helper: Option<StyleHelper>,
    styleable: Box<dyn Styleable>,
    pub(crate) css_flags: CssFlags,
    pub(crate) observed_styles: Option<HashMap<String, Vec<Style>>>,
}

/// A forest of styleable nodes.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    applied: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, parent: Option<NodeId>, styleable: Box<dyn Styleable>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            parent,
            children: Vec::new(),
            states: PseudoClassState::empty(),
            style_helper: None,
            styleable,
            css_flags: CssFlags::REAPPLY,
            observed_styles: None,
        });
        id
    }

    /// Adds a top-level node.
    pub fn add_root(&mut self, styleable: impl Styleable + 'static) -> NodeId {
        let id = self.insert(None, Box::new(styleable));
        self.roots.push(id);
        id
    }

    /// Appends a child to `parent`.
    pub fn add_child(&mut self, parent: NodeId, styleable: impl Styleable + 'static) -> NodeId {
        let id = self.insert(Some(parent), Box::new(styleable));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Re-parents `node` under `new_parent`, or makes it a root.
    ///
    /// A move under `node` itself or one of its descendants is ignored.
    pub fn move_node(&mut self, node: NodeId, new_parent: Option<NodeId>) {
        if let Some(parent) = new_parent {
            if parent == node || self.ancestors(parent).any(|a| a == node) {
                log::warn!(
                    "SCENE: refusing to move Node='{}' under its own subtree",
                    self.styleable(node).describe()
                );
                return;
            }
        }
        match self.nodes[node.0].parent {
            Some(old) => self.nodes[old.0].children.retain(|&c| c != node),
            None => self.roots.retain(|&r| r != node),
        }
        self.nodes[node.0].parent = new_parent;
        match new_parent {
            Some(parent) => self.nodes[parent.0].children.push(node),
            None => self.roots.push(node),
        }
        self.reapply_css(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Ancestors of `node`, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// `node` followed by its subtree, depth first.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Number of nodes from `node` up to its root, inclusive.
    pub fn depth(&self, node: NodeId) -> usize {
        1 + self.ancestors(node).count()
    }

    // =========================================================================
    // Pseudo-class state
    // =========================================================================

    pub fn pseudo_class_states(&self, node: NodeId) -> PseudoClassState {
        self.nodes[node.0].states
    }

    /// Turns `pseudo_class` on or off.
    ///
    /// The node is marked for update only when its style helper says the
    /// change can alter a matching selector.
    pub fn set_pseudo_class_state(&mut self, node: NodeId, pseudo_class: PseudoClass, active: bool) {
        let entry = &mut self.nodes[node.0];
        let before = entry.states;
        entry.states.set(pseudo_class.state(), active);
        if entry.states == before {
            return;
        }
        if entry
            .style_helper
            .as_ref()
            .is_some_and(|helper| helper.pseudo_class_state_changed(pseudo_class))
        {
            entry.css_flags |= CssFlags::UPDATE;
        }
    }

    // =========================================================================
    // Styleable access
    // =========================================================================

    pub fn styleable(&self, node: NodeId) -> &dyn Styleable {
        self.nodes[node.0].styleable.as_ref()
    }

    pub fn styleable_mut(&mut self, node: NodeId) -> &mut dyn Styleable {
        self.nodes[node.0].styleable.as_mut()
    }

    /// Sets a property from code.
    ///
    /// User-agent styles never replace such a value. Setting the font forces
    /// a re-style since cached font sizes depend on it.
    pub fn set_user_value(
        &mut self,
        node: NodeId,
        property: &str,
        value: StyledValue,
    ) -> lcss::Result<()> {
        let is_font = self
            .styleable(node)
            .css_meta_data()
            .iter()
            .any(|meta| meta.property == property && meta.is_font());
        self.styleable_mut(node)
            .apply_style(property, Some(StyleOrigin::User), value)?;
        if is_font {
            self.reapply_css(node);
        }
        Ok(())
    }

    pub fn add_style_class(&mut self, node: NodeId, class: &str) {
        self.styleable_mut(node).add_style_class(class);
        self.reapply_css(node);
    }

    pub fn remove_style_class(&mut self, node: NodeId, class: &str) {
        self.styleable_mut(node).remove_style_class(class);
        self.reapply_css(node);
    }

    pub fn set_style_id(&mut self, node: NodeId, id: Option<&str>) {
        self.styleable_mut(node).set_style_id(id.map(str::to_string));
        self.reapply_css(node);
    }

    pub fn set_inline_style(&mut self, node: NodeId, style: Option<Stylesheet>) {
        self.styleable_mut(node).set_inline_style(style);
        self.reapply_css(node);
    }

    // =========================================================================
    // Styling state
    // =========================================================================

    /// Marks `node` for a full re-style on the next pulse.
    pub fn reapply_css(&mut self, node: NodeId) {
        self.nodes[node.0].css_flags |= CssFlags::REAPPLY;
    }

    /// Marks `node` for a state transition on the next pulse.
    pub fn request_update(&mut self, node: NodeId) {
        self.nodes[node.0].css_flags |= CssFlags::UPDATE;
    }

    pub fn css_flags(&self, node: NodeId) -> CssFlags {
        self.nodes[node.0].css_flags
    }

    pub fn style_helper(&self, node: NodeId) -> Option<&StyleHelper> {
        self.nodes[node.0].style_helper.as_ref()
    }

    pub(crate) fn style_helper_mut(&mut self, node: NodeId) -> Option<&mut StyleHelper> {
        self.nodes[node.0].style_helper.as_mut()
    }

    pub(crate) fn take_style_helper(&mut self, node: NodeId) -> Option<StyleHelper> {
        self.nodes[node.0].style_helper.take()
    }

    pub(crate) fn set_style_helper(&mut self, node: NodeId, helper: Option<StyleHelper>) {
        self.nodes[node.0].style_helper = helper;
    }

    pub(crate) fn clear_css_flags(&mut self, node: NodeId) {
        self.nodes[node.0].css_flags = CssFlags::empty();
    }

    /// Starts recording, per property, the styles behind each applied value.
    pub fn observe_styles(&mut self, node: NodeId) {
        let entry = &mut self.nodes[node.0];
        if entry.observed_styles.is_none() {
            entry.observed_styles = Some(HashMap::new());
            entry.css_flags |= CssFlags::REAPPLY;
        }
    }

    pub fn observed_styles(&self, node: NodeId) -> Option<&HashMap<String, Vec<Style>>> {
        self.nodes[node.0].observed_styles.as_ref()
    }

    pub(crate) fn observed_styles_mut(
        &mut self,
        node: NodeId,
    ) -> Option<&mut HashMap<String, Vec<Style>>> {
        self.nodes[node.0].observed_styles.as_mut()
    }

    pub(crate) fn is_observed(&self, node: NodeId) -> bool {
        self.nodes[node.0].observed_styles.is_some()
    }

    /// Writes a resolved value to a property slot.
    pub(crate) fn apply_style(
        &mut self,
        node: NodeId,
        property: &str,
        origin: Option<StyleOrigin>,
        value: StyledValue,
    ) -> lcss::Result<()> {
        log::trace!(
            "APPLY: Node='{}' {}={} origin={:?}",
            self.styleable(node).describe(),
            property,
            value,
            origin
        );
        self.styleable_mut(node).apply_style(property, origin, value)?;
        self.applied += 1;
        Ok(())
    }

    /// Number of successful writes made by the style engine so far.
    pub fn applied_styles(&self) -> u64 {
        self.applied
    }

    /// A view of `node` selectors can match against.
    pub fn cursor(&self, node: NodeId) -> SceneCursor<'_> {
        SceneCursor { scene: self, node }
    }
}

/// Borrowed handle used for selector matching.
#[derive(Clone, Copy)]
pub struct SceneCursor<'a> {
    scene: &'a Scene,
    node: NodeId,
}

impl SceneCursor<'_> {
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Selectable for SceneCursor<'_> {
    fn type_selector(&self) -> &str {
        self.scene.styleable(self.node).type_selector()
    }

    fn style_id(&self) -> Option<&str> {
        self.scene.styleable(self.node).style_id()
    }

    fn has_style_class(&self, class: &str) -> bool {
        self.scene
            .styleable(self.node)
            .style_classes()
            .iter()
            .any(|c| c == class)
    }

    fn pseudo_class_states(&self) -> PseudoClassState {
        self.scene.pseudo_class_states(self.node)
    }

    fn selectable_parent(&self) -> Option<Self> {
        self.scene.parent(self.node).map(|node| SceneCursor {
            scene: self.scene,
            node,
        })
    }
}
