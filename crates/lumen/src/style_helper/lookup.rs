//! Property resolution against a node's style map and its ancestors.

use lcss::{
    CalculatedValue, CascadingStyle, CssError, Font, Lookup, PseudoClassState, StyleMap,
    StyleOrigin, StyledValue,
};

use super::CacheContainer;
use crate::property::{CssMetaData, FONT, FONT_SIZE};
use crate::scene::{NodeId, Scene};
use crate::style_manager::{CssErrors, StyleMapPool};

/// Read access to the scene and the style maps while values are resolved.
///
/// Everything returned from a resolver borrows from the scene or the map
/// pool, never from the resolver itself, so styles found on different nodes
/// can be compared freely.
pub(crate) struct Resolver<'a> {
    scene: &'a Scene,
    pool: &'a StyleMapPool,
    errors: &'a mut CssErrors,
    default_font: &'a Font,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        scene: &'a Scene,
        pool: &'a StyleMapPool,
        errors: &'a mut CssErrors,
        default_font: &'a Font,
    ) -> Self {
        Self {
            scene,
            pool,
            errors,
            default_font,
        }
    }

    pub(crate) fn scene(&self) -> &'a Scene {
        self.scene
    }

    pub(crate) fn default_font(&self) -> &'a Font {
        self.default_font
    }

    pub(crate) fn empty_map(&self) -> &'a StyleMap {
        let pool = self.pool;
        pool.empty()
    }

    pub(crate) fn style_map(&self, id: u64) -> Option<&'a StyleMap> {
        let pool = self.pool;
        pool.get(id).map(|map| &**map)
    }

    pub(crate) fn container(&self, node: NodeId) -> Option<&'a CacheContainer> {
        let scene = self.scene;
        scene
            .style_helper(node)
            .and_then(|helper| helper.cache_container.as_ref())
    }

    /// The node's own style map, if it has a container and the map is live.
    pub(crate) fn style_map_of(&self, node: NodeId) -> Option<&'a StyleMap> {
        self.container(node)
            .and_then(|container| self.style_map(container.style_map_id))
    }

    /// Ancestors that have a style helper, nearest first.
    pub(crate) fn helper_ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let scene = self.scene;
        scene
            .ancestors(node)
            .filter(move |&ancestor| scene.style_helper(ancestor).is_some())
    }

    /// Whether code set `property` on the node directly.
    pub(crate) fn is_user_set(&self, node: NodeId, property: &str) -> bool {
        self.scene.styleable(node).property_origin(property) == Some(StyleOrigin::User)
    }

    /// The highest ranked style for `property` whose selector holds with the
    /// node in `states`.
    pub(crate) fn get_style(
        &self,
        node: NodeId,
        property: &str,
        map: &'a StyleMap,
        states: PseudoClassState,
    ) -> Option<&'a CascadingStyle> {
        let cursor = self.scene.cursor(node);
        map.get(property)
            .iter()
            .find(|style| style.selector().state_matches(&cursor, states))
    }

    /// Resolves one property of `node` in `states`.
    ///
    /// `cached_font` is the node's font for this transition; relative sizes
    /// are resolved against it.
    pub(crate) fn lookup(
        &mut self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        cached_font: Option<&CalculatedValue>,
    ) -> Lookup<CalculatedValue> {
        if meta.is_font() {
            return self.lookup_font(node, map, cached_font);
        }

        let property = meta.property.as_str();
        let Some(style) = self.get_style(node, property, map, states) else {
            if meta.sub_properties.is_empty() {
                return self.handle_no_style_found(node, meta, map, states, cached_font);
            }
            return self.lookup_sub_properties(node, meta, map, states, cached_font);
        };

        // A user agent style never replaces a value set in code.
        if style.origin() == StyleOrigin::UserAgent && self.is_user_set(node, property) {
            return Lookup::NoStyle;
        }

        let style = if style.value().is_inherit() {
            match self.get_inherited_style(node, property) {
                Some(inherited) => inherited,
                None => return Lookup::NoStyle,
            }
        } else {
            style
        };

        self.calculate_value(style, node, meta, map, states, cached_font)
    }

    /// Assembles a shorthand from whichever sub-properties resolve.
    fn lookup_sub_properties(
        &mut self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        cached_font: Option<&CalculatedValue>,
    ) -> Lookup<CalculatedValue> {
        let mut subs = Vec::new();
        let mut origin: Option<StyleOrigin> = None;
        let mut relative = false;
        for sub in &meta.sub_properties {
            if let Lookup::Found(constituent) = self.lookup(node, sub, map, states, cached_font) {
                origin = origin.max(constituent.origin);
                relative |= constituent.relative;
                subs.push((sub.property.clone(), constituent.value));
            }
        }

        if subs.is_empty() {
            return self.handle_no_style_found(node, meta, map, states, cached_font);
        }

        match meta.converter.convert_subs(&subs) {
            Ok(value) => Lookup::Found(CalculatedValue::new(value, origin, relative)),
            Err(err) => {
                let message = format!(
                    "Caught {err} while calculating value for '{}'",
                    meta.property
                );
                self.report(node, &meta.property, message);
                Lookup::NoStyle
            }
        }
    }

    fn handle_no_style_found(
        &mut self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        cached_font: Option<&CalculatedValue>,
    ) -> Lookup<CalculatedValue> {
        if !meta.inherits || self.is_user_set(node, &meta.property) {
            return Lookup::NoStyle;
        }
        match self.get_inherited_style(node, &meta.property) {
            Some(style) => self.calculate_value(style, node, meta, map, states, cached_font),
            None => Lookup::NoStyle,
        }
    }

    /// The nearest ancestor style for `property` that is not `inherit`.
    ///
    /// Ancestors are matched in their live pseudo-class states.
    pub(crate) fn get_inherited_style(
        &self,
        node: NodeId,
        property: &str,
    ) -> Option<&'a CascadingStyle> {
        let scene = self.scene;
        self.helper_ancestors(node).find_map(|ancestor| {
            let map = self.style_map_of(ancestor)?;
            self.get_style(ancestor, property, map, scene.pseudo_class_states(ancestor))
                .filter(|style| !style.value().is_inherit())
        })
    }

    /// Resolves lookups in `style`'s value and converts it for `meta`.
    pub(crate) fn calculate_value(
        &mut self,
        style: &'a CascadingStyle,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        cached_font: Option<&CalculatedValue>,
    ) -> Lookup<CalculatedValue> {
        if style.value().is_none() {
            return Lookup::Found(CalculatedValue::new(
                StyledValue::Null,
                Some(style.origin()),
                false,
            ));
        }

        let property = meta.property.as_str();
        let mut whence = style.origin();
        let resolved = match self.resolve_lookups(
            node,
            style.value(),
            map,
            states,
            &mut whence,
            &mut Default::default(),
        ) {
            Ok(resolved) => resolved,
            Err(err) => {
                let message = format!(
                    "Caught {err} while calculating value for '{property}'{}",
                    self.context(node, style)
                );
                self.report(node, property, message);
                return Lookup::NoStyle;
            }
        };

        let is_font_property = property == FONT || property == FONT_SIZE;
        let relative = resolved.contains_font_relative_size(is_font_property);
        let reference = self.reference_font(node, relative && is_font_property, cached_font);

        match meta.converter.convert(&resolved, &reference) {
            Ok(value) => Lookup::Found(CalculatedValue::new(value, Some(whence), relative)),
            Err(err) => {
                let context = self.context(node, style);
                let message = match (resolved.first_lookup(), &err) {
                    (Some(name), _) => format!(
                        "Could not resolve '{name}' while resolving lookups for '{property}'{context}"
                    ),
                    (None, CssError::Conversion { .. }) => {
                        format!("Caught '{err}' while converting value for '{property}'{context}")
                    }
                    (None, _) => {
                        format!("Caught {err} while calculating value for '{property}'{context}")
                    }
                };
                self.report(node, property, message);
                Lookup::NoStyle
            }
        }
    }

    /// The font relative sizes are measured against.
    ///
    /// A font property with a relative size must not be measured against a
    /// font that was itself computed from a relative size on the same node,
    /// or the scaling compounds. In that case the nearest ancestor font that
    /// differs is used instead.
    fn reference_font(
        &mut self,
        node: NodeId,
        relative_font_property: bool,
        cached_font: Option<&CalculatedValue>,
    ) -> Font {
        if relative_font_property && cached_font.is_none_or(|font| font.relative) {
            let scene = self.scene;
            let mut child_font = cached_font.cloned();
            for ancestor in scene.ancestors(node) {
                let Some(parent_font) = self.get_cached_font(ancestor) else {
                    continue;
                };
                let same_as_child = child_font.as_ref().is_none_or(|child| *child == parent_font);
                if parent_font.relative && same_as_child {
                    child_font = Some(parent_font);
                    continue;
                }
                if let Some(font) = parent_font.value.as_font() {
                    return font.clone();
                }
            }
            return self.default_font.clone();
        }

        cached_font
            .filter(|font| !font.relative || !relative_font_property)
            .and_then(|font| font.value.as_font())
            .unwrap_or(self.default_font)
            .clone()
    }

    /// Where a style came from, for diagnostics.
    fn context(&self, node: NodeId, style: &CascadingStyle) -> String {
        if style.origin() == StyleOrigin::Inline {
            return format!(
                " from inline style on {}",
                self.scene.styleable(node).describe()
            );
        }
        match style.style.url.as_deref() {
            Some(url) => format!(" from rule '{}' in stylesheet {url}", style.selector()),
            None => format!(" from rule '{}'", style.selector()),
        }
    }

    pub(crate) fn report(&mut self, node: NodeId, property: &str, message: String) {
        log::warn!("{message}");
        let styleable = self.scene.styleable(node).describe();
        self.errors.report(property, styleable, message);
    }
}
