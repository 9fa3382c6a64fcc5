//! Cascade ordering and style maps.
//!
//! Styles for one property are ranked by `!important`, then origin, then
//! selector specificity, then declaration order. A [`StyleMap`] keeps every
//! property's styles sorted with the winner first, so the first style whose
//! selector holds in the current state is the one that applies.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::selectors::{ComplexSelector, Specificity};
use super::{Style, StyleOrigin};
use crate::pseudo_class::PseudoClassState;
use crate::value::ParsedValue;

/// A [`Style`] with the data needed to rank it.
#[derive(Debug, Clone)]
pub struct CascadingStyle {
    pub style: Style,
    pub specificity: Specificity,
    /// Position of the declaration across every stylesheet; later wins ties.
    pub ordinal: usize,
}

impl CascadingStyle {
    pub fn new(style: Style, ordinal: usize) -> Self {
        Self {
            specificity: style.selector.specificity(),
            style,
            ordinal,
        }
    }

    pub fn property(&self) -> &str {
        self.style.property()
    }

    pub fn value(&self) -> &ParsedValue {
        self.style.value()
    }

    pub fn origin(&self) -> StyleOrigin {
        self.style.origin
    }

    pub fn selector(&self) -> &ComplexSelector {
        &self.style.selector
    }

    pub fn is_important(&self) -> bool {
        self.style.declaration.important
    }

    /// Pseudo-classes the subject must be in for this style to apply.
    pub fn pseudo_classes(&self) -> PseudoClassState {
        self.style.selector.pseudo_classes()
    }
}

/// Greater means higher precedence.
impl Ord for CascadingStyle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.is_important()
            .cmp(&other.is_important())
            .then_with(|| self.origin().cmp(&other.origin()))
            .then_with(|| self.specificity.cmp(&other.specificity))
            .then_with(|| self.ordinal.cmp(&other.ordinal))
    }
}

impl PartialOrd for CascadingStyle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CascadingStyle {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CascadingStyle {}

/// Every style that could apply to one node shape, by property.
///
/// Maps are shared between nodes and identified by `id`; two nodes with the
/// same map id have the same candidate styles.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    id: u64,
    styles: HashMap<String, Vec<CascadingStyle>>,
}

impl StyleMap {
    /// Id of the shared empty map.
    pub const EMPTY_ID: u64 = u64::MAX;

    pub fn new(id: u64, styles: impl IntoIterator<Item = CascadingStyle>) -> Self {
        let mut by_property: HashMap<String, Vec<CascadingStyle>> = HashMap::new();
        for style in styles {
            by_property
                .entry(style.property().to_string())
                .or_default()
                .push(style);
        }
        for list in by_property.values_mut() {
            list.sort_by(|a, b| b.cmp(a));
        }
        Self {
            id,
            styles: by_property,
        }
    }

    pub fn empty() -> Self {
        Self {
            id: Self::EMPTY_ID,
            styles: HashMap::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Styles for `property`, highest precedence first.
    pub fn get(&self, property: &str) -> &[CascadingStyle] {
        self.styles
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Every pseudo-class a style subject in this map requires.
    pub fn pseudo_classes(&self) -> PseudoClassState {
        self.styles
            .values()
            .flatten()
            .fold(PseudoClassState::empty(), |acc, style| {
                acc | style.pseudo_classes()
            })
    }
}
