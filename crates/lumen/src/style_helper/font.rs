//! Font resolution.
//!
//! The font is assembled from the `font` shorthand and the `font-size`,
//! `font-weight`, `font-style` and `font-family` longhands. The shorthand
//! may come from an ancestor. A longhand found closer to the node than the
//! shorthand overrides it unless only the shorthand is `!important`; one
//! found on the same node as the shorthand must outrank it in the cascade.
//!
//! A font set in code pins both searches to the node itself, and only author
//! and inline styles there replace it.

use lcss::{
    CalculatedValue, CascadingStyle, Font, FontPosture, FontWeight, Lookup, PseudoClassState,
    StyleMap, StyleOrigin, StyledValue,
};

use super::Resolver;
use super::transition::transition_states;
use crate::property::{
    CssMetaData, FONT, FONT_FAMILY_META, FONT_SHORTHAND_META, FONT_SIZE_META, FONT_STYLE_META,
    FONT_WEIGHT_META,
};
use crate::scene::NodeId;
use crate::style_cache::StyleCacheEntryKey;

/// Font components found so far; `None` keeps the base font's value.
#[derive(Debug, Default)]
struct FontPieces {
    family: Option<String>,
    weight: Option<FontWeight>,
    posture: Option<FontPosture>,
    size: Option<f64>,
}

impl FontPieces {
    fn of(font: &Font) -> Self {
        Self {
            family: Some(font.family.clone()),
            weight: Some(font.weight),
            posture: Some(font.posture),
            size: Some(font.size),
        }
    }

    fn derive(&self, base: &Font) -> Font {
        derive_font(
            base,
            self.family.as_deref(),
            self.weight,
            self.posture,
            self.size,
        )
    }
}

/// `base` with the given components replaced. Non-positive sizes are ignored.
pub fn derive_font(
    base: &Font,
    family: Option<&str>,
    weight: Option<FontWeight>,
    posture: Option<FontPosture>,
    size: Option<f64>,
) -> Font {
    let family = family.map_or_else(
        || base.family.clone(),
        |f| f.trim_matches(|c| c == '"' || c == '\'').to_string(),
    );
    Font::font(
        family,
        weight.unwrap_or(base.weight),
        posture.unwrap_or(base.posture),
        size.filter(|&s| s > 0.0).unwrap_or(base.size),
    )
}

/// Keeps `origin` unless the style that produced `resolved` ranks at least as high.
fn raise_origin(
    origin: Option<StyleOrigin>,
    style: &CascadingStyle,
    resolved: Option<StyleOrigin>,
) -> Option<StyleOrigin> {
    if origin.is_none_or(|o| o <= style.origin()) {
        resolved
    } else {
        origin
    }
}

impl<'a> Resolver<'a> {
    /// Resolves the font of `node`.
    ///
    /// With `cached_font` absent only the size matters: the result is the
    /// font relative sizes on this node are measured against. Otherwise the
    /// full font is resolved on top of `cached_font`.
    pub(crate) fn lookup_font(
        &mut self,
        node: NodeId,
        map: &'a StyleMap,
        cached_font: Option<&CalculatedValue>,
    ) -> Lookup<CalculatedValue> {
        let scene = self.scene();
        let states = scene.pseudo_class_states(node);

        let mut origin: Option<StyleOrigin> = None;
        let mut distance = 0;
        let mut found_style = false;
        let mut pieces = FontPieces::default();
        let mut cv_font = cached_font.cloned();

        let user_font = self.user_set_font(node);
        let user_set = user_font.is_some();
        if let Some(user_font) = user_font {
            pieces = FontPieces::of(&user_font);
            cv_font = Some(CalculatedValue::new(
                StyledValue::Font(user_font),
                Some(StyleOrigin::User),
                false,
            ));
        }

        let parent_font = scene
            .parent(node)
            .and_then(|parent| self.get_cached_font(parent))
            .unwrap_or_else(|| {
                CalculatedValue::new(StyledValue::Font(self.default_font().clone()), None, false)
            });

        let mut shorthand = self
            .get_style(node, FONT, map, states)
            .filter(|style| !style.value().is_inherit())
            .filter(|style| !user_set || style.origin() != StyleOrigin::UserAgent);
        if shorthand.is_none() && !user_set {
            for ancestor in self.helper_ancestors(node) {
                distance += 1;
                let Some(ancestor_map) = self.style_map_of(ancestor) else {
                    continue;
                };
                let style = self
                    .get_style(ancestor, FONT, ancestor_map, scene.pseudo_class_states(ancestor))
                    .filter(|style| !style.value().is_inherit());
                if style.is_some() {
                    shorthand = style;
                    break;
                }
            }
        }

        if let Some(style) = shorthand {
            let cv = self.calculate_value(
                style,
                node,
                &FONT_SHORTHAND_META,
                map,
                states,
                Some(&parent_font),
            );
            if let Lookup::Found(cv) = cv {
                if let Some(font) = cv.value.as_font() {
                    pieces = FontPieces::of(font);
                    origin = cv.origin;
                    cv_font = Some(cv);
                    found_style = true;
                }
            }
        }

        let font_size = self.font_longhand(
            node,
            &FONT_SIZE_META,
            map,
            states,
            distance,
            shorthand,
            user_set,
        );
        if let Some(style) = font_size {
            let cv = self.calculate_value(
                style,
                node,
                &FONT_SIZE_META,
                map,
                states,
                Some(&parent_font),
            );
            if let Lookup::Found(cv) = cv {
                if let Some(size) = cv.value.as_number() {
                    origin = raise_origin(origin, style, cv.origin);
                    pieces.size = Some(size);
                    let relative = cv_font.as_ref().is_some_and(|f| f.relative) || cv.relative;
                    let base = cv_font
                        .as_ref()
                        .and_then(|f| f.value.as_font())
                        .unwrap_or(self.default_font());
                    let font = pieces.derive(base);
                    cv_font = Some(CalculatedValue::new(StyledValue::Font(font), origin, relative));
                    found_style = true;
                }
            }
        }

        // Resolving the reference font only needs the size.
        if cached_font.is_none() {
            return cv_font.map_or(Lookup::NoStyle, Lookup::Found);
        }

        if let Some((style, cv)) =
            self.font_piece(node, &FONT_WEIGHT_META, map, states, distance, shorthand, user_set)
        {
            if let StyledValue::FontWeight(weight) = cv.value {
                origin = raise_origin(origin, style, cv.origin);
                pieces.weight = Some(weight);
                found_style = true;
            }
        }

        if let Some((style, cv)) =
            self.font_piece(node, &FONT_STYLE_META, map, states, distance, shorthand, user_set)
        {
            if let StyledValue::FontPosture(posture) = cv.value {
                origin = raise_origin(origin, style, cv.origin);
                pieces.posture = Some(posture);
                found_style = true;
            }
        }

        if let Some((style, cv)) =
            self.font_piece(node, &FONT_FAMILY_META, map, states, distance, shorthand, user_set)
        {
            if let StyledValue::String(family) = cv.value {
                origin = raise_origin(origin, style, cv.origin);
                pieces.family = Some(family);
                found_style = true;
            }
        }

        if !found_style {
            return Lookup::NoStyle;
        }
        let base = cv_font
            .as_ref()
            .and_then(|f| f.value.as_font())
            .unwrap_or(self.default_font());
        Lookup::Found(CalculatedValue::new(
            StyledValue::Font(pieces.derive(base)),
            origin,
            false,
        ))
    }

    /// The font set in code on `node`'s font property, if any.
    fn user_set_font(&self, node: NodeId) -> Option<Font> {
        let property = self.container(node)?.font_prop.as_deref()?;
        let slot = self.scene().styleable(node).property(property)?;
        if slot.origin != Some(StyleOrigin::User) {
            return None;
        }
        Some(
            slot.value
                .as_font()
                .cloned()
                .unwrap_or_else(|| self.default_font().clone()),
        )
    }

    /// A longhand declared on the node itself; `inherit` counts as unset.
    fn own_longhand(
        &self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
    ) -> Option<&'a CascadingStyle> {
        self.get_style(node, &meta.property, map, states)
            .filter(|style| !style.value().is_inherit())
    }

    /// Finds and converts the weight, style or family longhand.
    #[allow(clippy::too_many_arguments)]
    fn font_piece(
        &mut self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        distance: usize,
        shorthand: Option<&'a CascadingStyle>,
        user_set: bool,
    ) -> Option<(&'a CascadingStyle, CalculatedValue)> {
        let style =
            self.font_longhand(node, meta, map, states, distance, shorthand, user_set)?;
        let cv = self
            .calculate_value(style, node, meta, map, states, None)
            .found()?;
        Some((style, cv))
    }

    /// The `meta` longhand that applies to `node` given the shorthand found
    /// `distance` helper hops up, if any.
    #[allow(clippy::too_many_arguments)]
    fn font_longhand(
        &self,
        node: NodeId,
        meta: &CssMetaData,
        map: &'a StyleMap,
        states: PseudoClassState,
        distance: usize,
        shorthand: Option<&'a CascadingStyle>,
        user_set: bool,
    ) -> Option<&'a CascadingStyle> {
        let (style, hops) = match self.own_longhand(node, meta, map, states) {
            Some(style) => (style, 0),
            None if user_set => return None,
            None => self.inherited_font_longhand(node, meta, distance)?,
        };
        if user_set && style.origin() == StyleOrigin::UserAgent {
            return None;
        }
        let Some(shorthand) = shorthand else {
            return Some(style);
        };
        let wins = if hops < distance {
            !shorthand.is_important() || style.is_important()
        } else {
            style > shorthand
        };
        wins.then_some(style)
    }

    /// The nearest ancestor longhand no more than `distance` helper hops up,
    /// with its hop count. `inherit` values are passed over.
    fn inherited_font_longhand(
        &self,
        node: NodeId,
        meta: &CssMetaData,
        distance: usize,
    ) -> Option<(&'a CascadingStyle, usize)> {
        let scene = self.scene();
        for (hops, ancestor) in (1..=distance).zip(self.helper_ancestors(node)) {
            let Some(ancestor_map) = self.style_map_of(ancestor) else {
                continue;
            };
            let style = self
                .get_style(
                    ancestor,
                    &meta.property,
                    ancestor_map,
                    scene.pseudo_class_states(ancestor),
                )
                .filter(|style| !style.value().is_inherit());
            if let Some(style) = style {
                return Some((style, hops));
            }
        }
        None
    }

    /// The reference font of the nearest node, from `node` up, that has a
    /// cache container.
    pub(crate) fn get_cached_font(&mut self, node: NodeId) -> Option<CalculatedValue> {
        let scene = self.scene();
        let target = std::iter::once(node)
            .chain(scene.ancestors(node))
            .find(|&n| self.container(n).is_some())?;
        let container = self.container(target)?;

        let key = StyleCacheEntryKey::new(
            transition_states(scene, target),
            self.default_font().clone(),
        );
        if let Some(font) = container.font_size_cache.get(&key) {
            return Some(font.clone());
        }

        let map = self
            .style_map_of(target)
            .unwrap_or_else(|| self.empty_map());
        self.lookup_font(target, map, None).found()
    }
}
