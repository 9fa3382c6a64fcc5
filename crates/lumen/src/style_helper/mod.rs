//! Per-node style resolution.
//!
//! A node gets a [`StyleHelper`] when styles can affect it. The helper
//! remembers which pseudo-classes can change the node's styles (its trigger
//! states) and, when styles apply, a [`CacheContainer`] tying the node to the
//! shared caches of its [`StyleManager`].
//!
//! The entry points are free functions taking the manager and the scene:
//!
//! - [`create_style_helper`] builds, reuses or drops a node's helper after a
//!   structural change
//! - [`transition_to_state`] applies the values for the node's current state
//! - [`recalculate_relative_size_properties`] re-resolves font-relative
//!   values after the node's font changed outside CSS
//! - [`matching_styles`] and [`matching_styles_map`] explain which styles
//!   apply

mod cache_container;
mod font;
mod lookup;
mod matching;
mod resolve;
mod transition;

use std::rc::Rc;

use lcss::{PseudoClass, PseudoClassState, StyleMap, StyleOrigin};
use smallvec::{SmallVec, smallvec};

use crate::scene::{NodeId, Scene};
use crate::style_cache::StyleCacheKey;
use crate::style_manager::StyleManager;

pub use cache_container::CacheContainer;
pub(crate) use lookup::Resolver;
pub use matching::{matching_styles, matching_styles_map};
pub use transition::{
    recalculate_relative_size_properties, transition_states, transition_to_state,
};

/// Styling state attached to one node.
#[derive(Debug, Clone, Default)]
pub struct StyleHelper {
    /// Pseudo-classes of this node that selectors on it or its descendants use.
    pub(crate) trigger_states: PseudoClassState,
    pub(crate) cache_container: Option<CacheContainer>,
}

impl StyleHelper {
    /// Whether a change of `pseudo_class` on the node can change any style.
    pub fn pseudo_class_state_changed(&self, pseudo_class: PseudoClass) -> bool {
        self.trigger_states.has(pseudo_class)
    }

    pub fn trigger_states(&self) -> PseudoClassState {
        self.trigger_states
    }

    pub fn cache_container(&self) -> Option<&CacheContainer> {
        self.cache_container.as_ref()
    }

    pub fn cache_key(&self) -> Option<&StyleCacheKey> {
        self.cache_container.as_ref().map(|c| &c.cache_key)
    }

    pub fn style_map_id(&self) -> Option<u64> {
        self.cache_container.as_ref().map(|c| c.style_map_id)
    }
}

/// Builds, reuses or removes the style helper of `node`.
///
/// Called when the node's classes, id, inline style, parent or the
/// stylesheets changed. Properties CSS set under a discarded helper are put
/// back to the values they had before.
pub fn create_style_helper(manager: &mut StyleManager, scene: &mut Scene, node: NodeId) {
    let depth = scene.depth(node);
    let mut triggers: SmallVec<[PseudoClassState; 8]> = smallvec![PseudoClassState::empty(); depth];
    let style_map = manager.find_matching_styles(scene, node, &mut triggers);

    if can_reuse_style_helper(manager, scene, node, &style_map) {
        let user_font = is_user_set_font(scene, node);
        if let Some(helper) = scene.style_helper_mut(node) {
            if let Some(container) = helper.cache_container.as_mut() {
                if user_font {
                    container.font_size_cache.clear();
                }
                container.force_slowpath = true;
            }
            helper.trigger_states |= triggers[0];
        }
        update_parent_trigger_states(scene, node, &triggers);
        log::debug!(
            "HELPER: Node='{}' reusing helper for map {}",
            scene.styleable(node).describe(),
            style_map.id()
        );
        return;
    }

    if style_map.is_empty() && !might_inherit(scene, node) {
        if let Some(old) = scene.take_style_helper(node) {
            reset_to_initial_values(scene, node, old);
        }
        // An observed node keeps an empty helper so its observer stays attached.
        if scene.is_observed(node) {
            scene.set_style_helper(
                node,
                Some(StyleHelper {
                    trigger_states: triggers[0],
                    cache_container: None,
                }),
            );
        }
        log::debug!(
            "HELPER: Node='{}' has no styles",
            scene.styleable(node).describe()
        );
        return;
    }

    let old = scene.take_style_helper(node);
    update_parent_trigger_states(scene, node, &triggers);
    let helper = StyleHelper {
        trigger_states: triggers[0],
        cache_container: Some(CacheContainer::new(scene, node, &style_map)),
    };
    log::debug!(
        "HELPER: Node='{}' built helper, key {:?}",
        scene.styleable(node).describe(),
        helper.cache_key().map(StyleCacheKey::ids)
    );
    if let Some(old) = old {
        reset_to_initial_values(scene, node, old);
    }
    scene.set_style_helper(node, Some(helper));
}

fn might_inherit(scene: &Scene, node: NodeId) -> bool {
    scene
        .styleable(node)
        .css_meta_data()
        .iter()
        .any(|meta| meta.inherits)
}

/// The existing helper still fits when the node got the same style map and
/// the styled ancestors' maps are unchanged too.
fn can_reuse_style_helper(
    manager: &StyleManager,
    scene: &Scene,
    node: NodeId,
    style_map: &Rc<StyleMap>,
) -> bool {
    let Some(helper) = scene.style_helper(node) else {
        return false;
    };
    let Some(container) = helper.cache_container.as_ref() else {
        return Rc::ptr_eq(style_map, manager.pool().empty()) && !might_inherit(scene, node);
    };

    let same_map = manager
        .pool()
        .get(container.style_map_id)
        .is_some_and(|current| Rc::ptr_eq(current, style_map));
    if !same_map {
        return false;
    }

    let ancestor_key = scene.ancestors(node).find_map(|ancestor| {
        scene
            .style_helper(ancestor)
            .and_then(|h| h.cache_container.as_ref())
            .map(|c| &c.cache_key)
    });
    match ancestor_key {
        Some(key) => key.ids() == container.cache_key.parent_ids(),
        None => container.cache_key.len() == 1,
    }
}

/// `true` if the node or a styled ancestor has a font set from code.
fn is_user_set_font(scene: &Scene, node: NodeId) -> bool {
    std::iter::once(node)
        .chain(scene.ancestors(node))
        .any(|n| {
            scene
                .style_helper(n)
                .and_then(|h| h.cache_container.as_ref())
                .and_then(|c| c.font_prop.as_deref())
                .is_some_and(|prop| {
                    scene.styleable(n).property_origin(prop) == Some(StyleOrigin::User)
                })
        })
}

/// Adds the pseudo-classes descendants' selectors need to each ancestor,
/// creating bare helpers where an ancestor has none.
fn update_parent_trigger_states(scene: &mut Scene, node: NodeId, triggers: &[PseudoClassState]) {
    let ancestors: Vec<NodeId> = scene.ancestors(node).collect();
    for (ancestor, states) in ancestors.into_iter().zip(triggers.iter().skip(1)) {
        if states.is_empty() {
            continue;
        }
        match scene.style_helper_mut(ancestor) {
            Some(helper) => helper.trigger_states |= *states,
            None => scene.set_style_helper(
                ancestor,
                Some(StyleHelper {
                    trigger_states: *states,
                    cache_container: None,
                }),
            ),
        }
    }
}

/// Puts back what properties held before `helper`'s CSS set them, unless
/// code has set them since.
fn reset_to_initial_values(scene: &mut Scene, node: NodeId, helper: StyleHelper) {
    let Some(container) = helper.cache_container else {
        return;
    };
    for (property, initial) in container.css_set_properties {
        let origin = scene.styleable(node).property_origin(&property);
        if origin.is_some_and(|o| o != StyleOrigin::User) {
            if let Err(err) = scene.apply_style(node, &property, initial.origin, initial.value) {
                log::warn!(
                    "Failed to reset css [{}] on [{}] due to '{}'",
                    property,
                    scene.styleable(node).describe(),
                    err
                );
            }
        }
        if let Some(observed) = scene.observed_styles_mut(node) {
            observed.remove(&property);
        }
    }
}
