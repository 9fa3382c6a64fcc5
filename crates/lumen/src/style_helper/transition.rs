//! Applying resolved values when a node's state changes.

use std::rc::Rc;

use lcss::{
    CalculatedValue, CssError, Font, Lookup, ParsedValue, PseudoClassState, StyleMap,
    StyleOrigin, StyledValue,
};

use super::{CacheContainer, Resolver};
use crate::property::{CssMetaData, FONT, FONT_SIZE};
use crate::scene::{NodeId, Scene};
use crate::style_cache::{StyleCacheEntryKey, StyleCacheKey, TransitionStates};
use crate::style_manager::StyleManager;

/// Live pseudo-classes that can affect `node`'s styles.
///
/// One entry per node with a style helper, starting at `node` and walking
/// up, each the node's live states limited to its trigger states.
pub fn transition_states(scene: &Scene, node: NodeId) -> TransitionStates {
    std::iter::once(node)
        .chain(scene.ancestors(node))
        .filter_map(|n| {
            scene
                .style_helper(n)
                .map(|helper| scene.pseudo_class_states(n) & helper.trigger_states)
        })
        .collect()
}

fn container_mut(scene: &mut Scene, node: NodeId) -> Option<&mut CacheContainer> {
    scene
        .style_helper_mut(node)
        .and_then(|helper| helper.cache_container.as_mut())
}

/// Drops the container and asks for a full re-style.
fn drop_container(scene: &mut Scene, node: NodeId) {
    if let Some(helper) = scene.style_helper_mut(node) {
        helper.cache_container = None;
    }
    scene.reapply_css(node);
    log::debug!(
        "TRANSITION: Node='{}' lost its style map, re-styling",
        scene.styleable(node).describe()
    );
}

/// Brings every styleable property of `node` up to date with its current
/// pseudo-class state.
///
/// Values come from the shared cache when another node with the same cache
/// key already resolved them in the same state. A property is only written
/// when its value or origin changes.
pub fn transition_to_state(manager: &mut StyleManager, scene: &mut Scene, node: NodeId) {
    let Some(container) = scene
        .style_helper(node)
        .and_then(|helper| helper.cache_container.as_ref())
    else {
        return;
    };
    let style_map_id = container.style_map_id;
    let cache_key = container.cache_key.clone();

    let Some(style_map) = manager.style_map(style_map_id) else {
        drop_container(scene, node);
        return;
    };
    if manager.shared_cache_mut(&cache_key).is_none() {
        drop_container(scene, node);
        return;
    }
    // Only inherited properties can be styled without styles of its own.
    let inherit_only = style_map.is_empty();

    let states = transition_states(scene, node);
    let node_states = states.first().copied().unwrap_or_default();
    let cached_font = resolve_cached_font(manager, scene, node, style_map_id, &states);
    let reference_font = cached_font
        .value
        .as_font()
        .cloned()
        .unwrap_or_else(|| manager.config().default_font.clone());
    let entry_key = StyleCacheEntryKey::new(states, reference_font);

    let force_slowpath = container_mut(scene, node)
        .map(|container| std::mem::take(&mut container.force_slowpath))
        .unwrap_or(false);

    let properties = scene.styleable(node).css_meta_data();
    for meta in properties.iter() {
        if inherit_only && !meta.inherits {
            continue;
        }
        if !scene.styleable(node).is_settable(&meta.property) {
            continue;
        }

        // What a node resolves around its own code-set values is not shared.
        let node_specific = depends_on_user_values(scene, node, meta);
        let cached = if node_specific {
            None
        } else {
            manager
                .shared_cache(&cache_key)
                .and_then(|cache| cache.entry(&entry_key))
                .and_then(|entry| entry.get(&meta.property))
                .cloned()
        };
        let calculated = match cached {
            Some(Lookup::Found(value)) => Lookup::Found(value),
            Some(_) if !force_slowpath => Lookup::NoStyle,
            _ => {
                let result = {
                    let mut resolver = manager.resolver(scene);
                    let map = resolver
                        .style_map(style_map_id)
                        .unwrap_or_else(|| resolver.empty_map());
                    resolver.lookup(node, meta, map, node_states, Some(&cached_font))
                };
                let result = result.map(Rc::new);
                if !node_specific {
                    if let Some(cache) = manager.shared_cache_mut(&cache_key) {
                        cache.entry_mut(&entry_key).put(&meta.property, result.clone());
                    }
                }
                result
            }
        };

        let applied = match calculated {
            Lookup::Found(value) => apply_found(manager, scene, node, meta, &value),
            Lookup::Inherit | Lookup::NoStyle => revert(scene, node, &meta.property),
        };
        if let Err(err) = applied {
            handle_apply_failure(manager, scene, node, meta, &cache_key, &entry_key, err);
        }
    }
}

/// Whether code set `meta` or one of its sub-properties on `node`.
///
/// Resolution skips user agent styles and inheritance for such properties,
/// so the result only holds for this node.
fn depends_on_user_values(scene: &Scene, node: NodeId, meta: &CssMetaData) -> bool {
    let styleable = scene.styleable(node);
    std::iter::once(meta)
        .chain(&meta.sub_properties)
        .any(|m| styleable.property_origin(&m.property) == Some(StyleOrigin::User))
}

/// The node's reference font for the current states, computed once per
/// states and cached on the container.
fn resolve_cached_font(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    style_map_id: u64,
    states: &TransitionStates,
) -> CalculatedValue {
    let default_font = manager.config().default_font.clone();
    let font_key = StyleCacheEntryKey::new(states.clone(), default_font.clone());
    if let Some(font) = scene
        .style_helper(node)
        .and_then(|helper| helper.cache_container.as_ref())
        .and_then(|container| container.font_size_cache.get(&font_key))
    {
        return font.clone();
    }

    let font = {
        let mut resolver = manager.resolver(scene);
        let map = resolver
            .style_map(style_map_id)
            .unwrap_or_else(|| resolver.empty_map());
        match resolver.lookup_font(node, map, None) {
            Lookup::Found(font) => font,
            _ => scene
                .parent(node)
                .and_then(|parent| resolver.get_cached_font(parent))
                .unwrap_or_else(|| {
                    CalculatedValue::new(StyledValue::Font(default_font), None, false)
                }),
        }
    };
    if let Some(container) = container_mut(scene, node) {
        container.font_size_cache.insert(font_key, font.clone());
    }
    font
}

/// Writes a found value unless it would be a no-op or would let a user
/// agent style replace a value set in code.
fn apply_found(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    meta: &CssMetaData,
    calculated: &CalculatedValue,
) -> Result<(), CssError> {
    let Some(origin) = calculated.origin else {
        return Ok(());
    };
    let Some(slot) = scene.styleable(node).property(&meta.property).cloned() else {
        return Ok(());
    };
    if slot.origin == Some(StyleOrigin::User) && origin == StyleOrigin::UserAgent {
        return Ok(());
    }
    if slot.origin == Some(origin) && slot.value == calculated.value {
        return Ok(());
    }

    scene.apply_style(node, &meta.property, Some(origin), calculated.value.clone())?;
    if let Some(container) = container_mut(scene, node) {
        container
            .css_set_properties
            .entry(meta.property.clone())
            .or_insert_with(|| CalculatedValue::new(slot.value, slot.origin, false));
    }

    if scene.is_observed(node) {
        let styles = manager.resolver(scene).matching_styles(node, meta, true);
        if let Some(observed) = scene.observed_styles_mut(node) {
            observed.insert(meta.property.clone(), styles);
        }
    }
    Ok(())
}

/// Puts back what a property held before CSS set it.
fn revert(scene: &mut Scene, node: NodeId, property: &str) -> Result<(), CssError> {
    if let Some(observed) = scene.observed_styles_mut(node) {
        observed.remove(property);
    }
    let Some(initial) = container_mut(scene, node)
        .and_then(|container| container.css_set_properties.remove(property))
    else {
        return Ok(());
    };
    let Some(slot) = scene.styleable(node).property(property) else {
        return Ok(());
    };
    if slot.origin == Some(StyleOrigin::User)
        || (slot.origin == initial.origin && slot.value == initial.value)
    {
        return Ok(());
    }
    scene.apply_style(node, property, initial.origin, initial.value)
}

/// Logs the failure, forgets the cached value and resets the property.
fn handle_apply_failure(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    meta: &CssMetaData,
    cache_key: &StyleCacheKey,
    entry_key: &StyleCacheEntryKey,
    err: CssError,
) {
    let describe = scene.styleable(node).describe();
    let message = format!(
        "Failed to set css [{}] on [{}] due to '{}'",
        meta.property, describe, err
    );
    log::warn!("{message}");
    manager.report_error(&meta.property, describe.clone(), message);

    if let Some(cache) = manager.shared_cache_mut(cache_key) {
        cache.entry_mut(entry_key).remove(&meta.property);
    }

    let (origin, value) = container_mut(scene, node)
        .and_then(|container| container.css_set_properties.get(&meta.property))
        .map(|initial| (initial.origin, initial.value.clone()))
        .unwrap_or_else(|| (None, meta.initial.clone()));
    if let Err(reset) = scene.apply_style(node, &meta.property, origin, value) {
        log::error!(
            "Could not reset [{}] on [{}] due to {}",
            meta.property,
            describe,
            reset
        );
    }
}

/// Re-resolves properties whose winning value uses font-relative units,
/// measuring them against `font`.
///
/// Used when the node's font changed outside CSS. `font` and `font-size`
/// themselves are left alone.
pub fn recalculate_relative_size_properties(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    font: &Font,
) {
    let Some(style_map_id) = scene
        .style_helper(node)
        .and_then(|helper| helper.style_map_id())
    else {
        return;
    };
    let Some(style_map) = manager.style_map(style_map_id) else {
        return;
    };
    let inherit_only = style_map.is_empty();

    let states = transition_states(scene, node);
    let node_states = states.first().copied().unwrap_or_default();
    let reference = CalculatedValue::new(StyledValue::Font(font.clone()), None, false);

    let properties = scene.styleable(node).css_meta_data();
    for meta in properties.iter() {
        if inherit_only && !meta.inherits {
            continue;
        }
        if meta.property == FONT || meta.property == FONT_SIZE {
            continue;
        }
        if !scene.styleable(node).is_settable(&meta.property) {
            continue;
        }

        let calculated = {
            let mut resolver = manager.resolver(scene);
            let map = resolver
                .style_map(style_map_id)
                .unwrap_or_else(|| resolver.empty_map());
            if !uses_relative_size(&resolver, node, meta, map, node_states) {
                continue;
            }
            resolver.lookup(node, meta, map, node_states, Some(&reference))
        };
        let Lookup::Found(calculated) = calculated else {
            continue;
        };
        let Some(origin) = calculated.origin else {
            continue;
        };
        let Some(slot) = scene.styleable(node).property(&meta.property).cloned() else {
            continue;
        };
        if slot.origin == Some(StyleOrigin::User) && origin == StyleOrigin::UserAgent {
            continue;
        }
        if slot.origin == Some(origin) && slot.value == calculated.value {
            continue;
        }

        if let Err(err) = scene.apply_style(node, &meta.property, Some(origin), calculated.value) {
            log::warn!(
                "Failed to recalculate and set css [{}] on [{}] due to '{}'",
                meta.property,
                scene.styleable(node).describe(),
                err
            );
            continue;
        }
        if let Some(container) = container_mut(scene, node) {
            container
                .css_set_properties
                .entry(meta.property.clone())
                .or_insert_with(|| CalculatedValue::new(slot.value, slot.origin, true));
        }
    }
}

/// Whether the winning style for `meta` depends on the reference font.
///
/// Shorthands without a style of their own are always re-resolved since
/// any of their parts may be relative.
fn uses_relative_size(
    resolver: &Resolver<'_>,
    node: NodeId,
    meta: &CssMetaData,
    map: &StyleMap,
    states: PseudoClassState,
) -> bool {
    let Some(style) = resolver.get_style(node, &meta.property, map, states) else {
        return !meta.sub_properties.is_empty();
    };
    let mut whence = style.origin();
    resolver
        .resolve_lookups(
            node,
            style.value(),
            map,
            states,
            &mut whence,
            &mut Default::default(),
        )
        .is_ok_and(|resolved: ParsedValue| resolved.contains_font_relative_size(false))
}
