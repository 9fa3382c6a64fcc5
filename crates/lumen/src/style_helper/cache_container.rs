use std::collections::HashMap;

use lcss::{CalculatedValue, StyleMap};

use crate::scene::{NodeId, Scene};
use crate::style_cache::{StyleCacheEntryKey, StyleCacheKey};

/// Per-node styling state kept while styles apply to a node.
#[derive(Debug, Clone)]
pub struct CacheContainer {
    pub(crate) style_map_id: u64,
    pub(crate) cache_key: StyleCacheKey,
    /// The node's resolved font, by transition states and the default font.
    pub(crate) font_size_cache: HashMap<StyleCacheEntryKey, CalculatedValue>,
    /// Values properties held before CSS first set them.
    pub(crate) css_set_properties: HashMap<String, CalculatedValue>,
    /// Resolve cached "no style" results again on the next transition.
    pub(crate) force_slowpath: bool,
    /// Name of the node's font property, if it has one.
    pub(crate) font_prop: Option<String>,
}

impl CacheContainer {
    /// Builds the container for `node` styled by `style_map`.
    ///
    /// The cache key is the map's id followed by the map ids of every
    /// ancestor that has a container of its own.
    pub(crate) fn new(scene: &Scene, node: NodeId, style_map: &StyleMap) -> Self {
        let ancestor_ids = scene.ancestors(node).filter_map(|ancestor| {
            scene
                .style_helper(ancestor)
                .and_then(|helper| helper.cache_container.as_ref())
                .map(|container| container.style_map_id)
        });
        let cache_key = StyleCacheKey::new(std::iter::once(style_map.id()).chain(ancestor_ids));

        let font_prop = scene
            .styleable(node)
            .css_meta_data()
            .iter()
            .find(|meta| meta.is_font())
            .map(|meta| meta.property.clone());

        Self {
            style_map_id: style_map.id(),
            cache_key,
            font_size_cache: HashMap::new(),
            css_set_properties: HashMap::new(),
            force_slowpath: false,
            font_prop,
        }
    }

    pub fn style_map_id(&self) -> u64 {
        self.style_map_id
    }

    pub fn cache_key(&self) -> &StyleCacheKey {
        &self.cache_key
    }

    /// What `property` held before CSS first touched it.
    pub fn css_set_property(&self, property: &str) -> Option<&CalculatedValue> {
        self.css_set_properties.get(property)
    }

    pub fn font_prop(&self) -> Option<&str> {
        self.font_prop.as_deref()
    }
}
