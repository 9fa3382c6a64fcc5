//! Stylesheets, style maps and the caches shared between nodes.
//!
//! The [`StyleManager`] owns everything that outlives a single node: the
//! stylesheets, the pool of [`StyleMap`]s handed out to nodes, the shared
//! [`StyleCache`]s and the diagnostics collected while styling. It is passed
//! explicitly to every styling call; there is no global instance.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use lcss::{CascadingStyle, Font, PseudoClassState, Style, StyleMap, StyleOrigin, Stylesheet};

use crate::scene::{NodeId, Scene};
use crate::style_cache::{StyleCache, StyleCacheKey};
use crate::style_helper::Resolver;

/// Settings for a [`StyleManager`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Reference font when neither the node nor its ancestors resolve one.
    pub default_font: Font,
    /// Keep a list of CSS errors for tooling.
    pub collect_errors: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            default_font: Font::default(),
            collect_errors: false,
        }
    }
}

impl StyleConfig {
    pub fn with_default_font(mut self, font: Font) -> Self {
        self.default_font = font;
        self
    }

    pub fn with_collect_errors(mut self, collect: bool) -> Self {
        self.collect_errors = collect;
        self
    }
}

/// A CSS problem found while styling a node.
#[derive(Debug, Clone, PartialEq)]
pub struct CssErrorReport {
    pub property: String,
    /// Description of the node being styled.
    pub styleable: String,
    pub message: String,
}

/// Collected [`CssErrorReport`]s; reports are dropped unless collection is on.
#[derive(Debug, Default)]
pub struct CssErrors {
    collecting: bool,
    reports: Vec<CssErrorReport>,
}

impl CssErrors {
    pub(crate) fn report(&mut self, property: &str, styleable: String, message: String) {
        if self.collecting {
            self.reports.push(CssErrorReport {
                property: property.to_string(),
                styleable,
                message,
            });
        }
    }
}

/// Style maps addressed by id.
///
/// Ids grow monotonically. Dropping the pool moves the base id past every
/// id handed out so far, so a stale id never names a new map.
#[derive(Debug)]
pub(crate) struct StyleMapPool {
    base_id: u64,
    maps: Vec<Rc<StyleMap>>,
    empty: Rc<StyleMap>,
}

impl Default for StyleMapPool {
    fn default() -> Self {
        Self {
            base_id: 0,
            maps: Vec::new(),
            empty: Rc::new(StyleMap::empty()),
        }
    }
}

impl StyleMapPool {
    /// Highest base id; leaves room for a full generation below `EMPTY_ID`.
    const MAX_BASE_ID: u64 = StyleMap::EMPTY_ID / 2;

    pub(crate) fn get(&self, id: u64) -> Option<&Rc<StyleMap>> {
        if id == StyleMap::EMPTY_ID {
            return Some(&self.empty);
        }
        let index = id.checked_sub(self.base_id)?;
        self.maps.get(index as usize)
    }

    pub(crate) fn empty(&self) -> &Rc<StyleMap> {
        &self.empty
    }

    fn add(&mut self, styles: Vec<CascadingStyle>) -> Rc<StyleMap> {
        // `clear` keeps the base below `MAX_BASE_ID`, so this never reaches
        // the empty map's id.
        let id = self.base_id + self.maps.len() as u64;
        let map = Rc::new(StyleMap::new(id, styles));
        self.maps.push(Rc::clone(&map));
        map
    }

    /// Retires every map. Ids are not handed out again until the id space
    /// runs out, at which point numbering restarts at zero.
    fn clear(&mut self) {
        self.base_id = match self
            .base_id
            .checked_add(self.maps.len() as u64)
            .filter(|&next| next < Self::MAX_BASE_ID)
        {
            Some(next) => next,
            None => {
                log::warn!("POOL: style map ids exhausted, restarting at 0");
                0
            }
        };
        self.maps.clear();
    }
}

/// Identity of a node's inline stylesheet.
#[derive(Debug, Clone)]
struct InlineKey(Rc<Stylesheet>);

impl PartialEq for InlineKey {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for InlineKey {}

impl Hash for InlineKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

/// The selectors a node matched; equal keys get the same style map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MatchKey {
    /// `(rule, selector)` positions across all stylesheets.
    selectors: Vec<(usize, usize)>,
    inline: Option<InlineKey>,
}

/// Owner of stylesheets, style maps and shared caches.
#[derive(Debug, Default)]
pub struct StyleManager {
    config: StyleConfig,
    stylesheets: Vec<Rc<Stylesheet>>,
    match_cache: HashMap<MatchKey, Rc<StyleMap>>,
    pool: StyleMapPool,
    shared_caches: HashMap<StyleCacheKey, StyleCache>,
    errors: CssErrors,
}

impl StyleManager {
    pub fn new(config: StyleConfig) -> Self {
        let errors = CssErrors {
            collecting: config.collect_errors,
            reports: Vec::new(),
        };
        Self {
            config,
            errors,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &StyleConfig {
        &self.config
    }

    /// Adds a stylesheet after the existing ones and re-styles every root.
    pub fn add_stylesheet(&mut self, scene: &mut Scene, stylesheet: Stylesheet) {
        self.stylesheets.push(Rc::new(stylesheet));
        self.invalidate();
        for root in scene.roots().to_vec() {
            scene.reapply_css(root);
        }
    }

    pub fn stylesheets(&self) -> &[Rc<Stylesheet>] {
        &self.stylesheets
    }

    /// Drops every style map, match result and shared cache.
    ///
    /// Nodes still holding ids of dropped maps notice on their next
    /// transition and ask to be re-styled.
    pub fn invalidate(&mut self) {
        log::debug!(
            "INVALIDATE: dropping {} style maps and {} shared caches",
            self.pool.maps.len(),
            self.shared_caches.len()
        );
        self.pool.clear();
        self.match_cache.clear();
        self.shared_caches.clear();
    }

    // =========================================================================
    // Style maps
    // =========================================================================

    /// Finds every style that could apply to `node`.
    ///
    /// `trigger_states[d]` collects the pseudo-classes matched selectors need
    /// on the node `d` levels up from `node`. Nodes whose matched selectors
    /// are the same share one map.
    pub fn find_matching_styles(
        &mut self,
        scene: &Scene,
        node: NodeId,
        trigger_states: &mut [PseudoClassState],
    ) -> Rc<StyleMap> {
        let cursor = scene.cursor(node);

        let mut selectors = Vec::new();
        let mut rule_index = 0;
        for sheet in &self.stylesheets {
            for rule in &sheet.rules {
                let mut best: Option<usize> = None;
                for (i, selector) in rule.selectors.iter().enumerate() {
                    if !selector.applies(&cursor, trigger_states) {
                        continue;
                    }
                    let better = best.is_none_or(|b| {
                        selector.specificity() > rule.selectors[b].specificity()
                    });
                    if better {
                        best = Some(i);
                    }
                }
                if let Some(i) = best {
                    selectors.push((rule_index, i));
                }
                rule_index += 1;
            }
        }

        let inline = scene.styleable(node).inline_style().cloned();
        if selectors.is_empty() && inline.as_ref().is_none_or(|s| s.rules.is_empty()) {
            return Rc::clone(self.pool.empty());
        }

        let key = MatchKey {
            selectors,
            inline: inline.map(InlineKey),
        };
        if let Some(map) = self.match_cache.get(&key) {
            return Rc::clone(map);
        }

        let styles = self.cascading_styles(&key);
        let map = self.pool.add(styles);
        log::debug!(
            "STYLE MAP: Node='{}' -> map {} ({} selectors)",
            scene.styleable(node).describe(),
            map.id(),
            key.selectors.len()
        );
        self.match_cache.insert(key, Rc::clone(&map));
        map
    }

    fn cascading_styles(&self, key: &MatchKey) -> Vec<CascadingStyle> {
        let mut styles = Vec::new();
        let mut ordinal = 0;
        let mut matched = key.selectors.iter().peekable();
        let mut rule_index = 0;
        for sheet in &self.stylesheets {
            for rule in &sheet.rules {
                let hit = matched.next_if(|(r, _)| *r == rule_index);
                for declaration in &rule.declarations {
                    if let Some(&(_, i)) = hit {
                        let style = Style {
                            selector: Rc::clone(&rule.selectors[i]),
                            declaration: Rc::clone(declaration),
                            origin: sheet.origin,
                            url: sheet.url.clone(),
                        };
                        styles.push(CascadingStyle::new(style, ordinal));
                    }
                    ordinal += 1;
                }
                rule_index += 1;
            }
        }

        if let Some(InlineKey(inline)) = &key.inline {
            for rule in &inline.rules {
                let Some(selector) = rule.selectors.first() else {
                    continue;
                };
                for declaration in &rule.declarations {
                    let style = Style {
                        selector: Rc::clone(selector),
                        declaration: Rc::clone(declaration),
                        origin: StyleOrigin::Inline,
                        url: None,
                    };
                    styles.push(CascadingStyle::new(style, ordinal));
                    ordinal += 1;
                }
            }
        }
        styles
    }

    /// The map with `id`, or `None` once it has been invalidated.
    pub fn style_map(&self, id: u64) -> Option<Rc<StyleMap>> {
        self.pool.get(id).cloned()
    }

    pub(crate) fn pool(&self) -> &StyleMapPool {
        &self.pool
    }

    // =========================================================================
    // Shared caches
    // =========================================================================

    pub fn shared_cache(&self, key: &StyleCacheKey) -> Option<&StyleCache> {
        self.shared_caches.get(key)
    }

    /// The shared cache for `key`, created on first use.
    ///
    /// Returns `None` when `key` names a style map that no longer exists.
    pub fn shared_cache_mut(&mut self, key: &StyleCacheKey) -> Option<&mut StyleCache> {
        if key.ids().iter().any(|&id| self.pool.get(id).is_none()) {
            return None;
        }
        Some(self.shared_caches.entry(key.clone()).or_default())
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Turns error collection on or off. Turning it off drops collected errors.
    pub fn collect_errors(&mut self, collect: bool) {
        self.errors.collecting = collect;
        if !collect {
            self.errors.reports.clear();
        }
    }

    pub fn errors(&self) -> &[CssErrorReport] {
        &self.errors.reports
    }

    pub fn take_errors(&mut self) -> Vec<CssErrorReport> {
        std::mem::take(&mut self.errors.reports)
    }

    pub fn report_error(&mut self, property: &str, styleable: String, message: String) {
        self.errors.report(property, styleable, message);
    }

    /// Read-only view used while resolving values for one node.
    pub(crate) fn resolver<'a>(&'a mut self, scene: &'a Scene) -> Resolver<'a> {
        Resolver::new(
            scene,
            &self.pool,
            &mut self.errors,
            &self.config.default_font,
        )
    }
}
