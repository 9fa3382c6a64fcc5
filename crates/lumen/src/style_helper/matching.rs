//! Which styles apply to a property, for tooling.

use std::collections::{HashMap, HashSet};

use lcss::{CascadingStyle, ParsedValue, PseudoClassState, Style, StyleMap};

use super::{Resolver, create_style_helper};
use crate::property::CssMetaData;
use crate::scene::{NodeId, Scene};
use crate::style_manager::StyleManager;

/// Every lookup name inside `value`, in order of appearance.
fn lookup_names<'v>(value: &'v ParsedValue, out: &mut Vec<&'v str>) {
    match value {
        ParsedValue::Lookup(name) => out.push(name),
        ParsedValue::Sequence(values) => values.iter().for_each(|v| lookup_names(v, out)),
        ParsedValue::Layers(layers) => layers.iter().flatten().for_each(|v| lookup_names(v, out)),
        _ => {}
    }
}

impl<'a> Resolver<'a> {
    /// Styles that apply to `meta` on `node`, highest precedence first.
    ///
    /// Includes styles for its sub-properties, styles the values refer to
    /// through lookups and, for inherited properties, styles on ancestors.
    /// With `match_state` only styles that hold in the live pseudo-class
    /// states are returned; otherwise every candidate is.
    pub(crate) fn matching_styles(
        &self,
        node: NodeId,
        meta: &CssMetaData,
        match_state: bool,
    ) -> Vec<Style> {
        let scene = self.scene();
        let mut found: Vec<&'a CascadingStyle> = Vec::new();
        let mut visited = HashSet::new();

        let map = self.style_map_of(node).unwrap_or_else(|| self.empty_map());
        let states = scene.pseudo_class_states(node);
        for property in std::iter::once(meta).chain(&meta.sub_properties) {
            self.collect_styles(
                node,
                &property.property,
                map,
                states,
                match_state,
                &mut found,
                &mut visited,
            );
        }

        if meta.inherits {
            for ancestor in self.helper_ancestors(node) {
                let Some(ancestor_map) = self.style_map_of(ancestor) else {
                    continue;
                };
                let ancestor_states = scene.pseudo_class_states(ancestor);
                self.collect_styles(
                    ancestor,
                    &meta.property,
                    ancestor_map,
                    ancestor_states,
                    match_state,
                    &mut found,
                    &mut visited,
                );
            }
        }

        found.sort_by(|a, b| b.cmp(a));
        let mut styles: Vec<Style> = Vec::with_capacity(found.len());
        for style in found {
            if !styles.contains(&style.style) {
                styles.push(style.style.clone());
            }
        }
        styles
    }

    #[allow(clippy::too_many_arguments)]
    fn collect_styles(
        &self,
        node: NodeId,
        property: &str,
        map: &'a StyleMap,
        states: PseudoClassState,
        match_state: bool,
        found: &mut Vec<&'a CascadingStyle>,
        visited: &mut HashSet<String>,
    ) {
        if match_state {
            if let Some(style) = self.get_style(node, property, map, states) {
                found.push(style);
                self.collect_lookup_styles(node, style.value(), match_state, found, visited);
            }
            return;
        }
        for style in map.get(property) {
            found.push(style);
            self.collect_lookup_styles(node, style.value(), match_state, found, visited);
        }
    }

    /// Follows lookups in `value` to the declarations they name, on the node
    /// and on every styled ancestor.
    fn collect_lookup_styles(
        &self,
        node: NodeId,
        value: &ParsedValue,
        match_state: bool,
        found: &mut Vec<&'a CascadingStyle>,
        visited: &mut HashSet<String>,
    ) {
        let mut names = Vec::new();
        lookup_names(value, &mut names);
        let scene = self.scene();
        for name in names {
            if !visited.insert(name.to_string()) {
                continue;
            }
            for owner in std::iter::once(node).chain(scene.ancestors(node)) {
                let Some(map) = self.style_map_of(owner).filter(|map| !map.is_empty()) else {
                    continue;
                };
                let states = scene.pseudo_class_states(owner);
                self.collect_styles(owner, name, map, states, match_state, found, visited);
            }
        }
    }
}

/// Styles that apply to `meta` on `node`, highest precedence first.
///
/// Builds the node's style helper first if it has none, so this can be
/// asked of a node that was never styled.
pub fn matching_styles(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
    meta: &CssMetaData,
    match_state: bool,
) -> Vec<Style> {
    if scene.style_helper(node).is_none() {
        create_style_helper(manager, scene, node);
    }
    manager.resolver(scene).matching_styles(node, meta, match_state)
}

/// For `node` and every descendant, the styles that hold in the current
/// state, by property. Nodes and properties with no styles are left out.
pub fn matching_styles_map(
    manager: &mut StyleManager,
    scene: &mut Scene,
    node: NodeId,
) -> HashMap<NodeId, HashMap<String, Vec<Style>>> {
    let nodes = scene.descendants(node);
    for &n in &nodes {
        if scene.style_helper(n).is_none() {
            create_style_helper(manager, scene, n);
        }
    }

    let resolver = manager.resolver(scene);
    let mut result = HashMap::new();
    for n in nodes {
        let properties: HashMap<String, Vec<Style>> = scene
            .styleable(n)
            .css_meta_data()
            .iter()
            .map(|meta| (meta.property.clone(), resolver.matching_styles(n, meta, true)))
            .filter(|(_, styles)| !styles.is_empty())
            .collect();
        if !properties.is_empty() {
            result.insert(n, properties);
        }
    }
    result
}
