//! Selectors and how they match nodes.
//!
//! Matching happens in two steps. [`ComplexSelector::applies`] checks the
//! static shape of a node and its ancestors (type, id, classes) and records
//! which pseudo-classes each matched part depends on. Later,
//! [`ComplexSelector::state_matches`] decides whether the selector holds for
//! a particular pseudo-class state.

use std::fmt;

use crate::pseudo_class::{PseudoClass, PseudoClassState};

/// Anything selectors can be matched against.
pub trait Selectable: Sized {
    /// The type name type selectors compare against.
    fn type_selector(&self) -> &str;
    fn style_id(&self) -> Option<&str>;
    fn has_style_class(&self, class: &str) -> bool;
    /// Current pseudo-class state.
    fn pseudo_class_states(&self) -> PseudoClassState;
    fn selectable_parent(&self) -> Option<Self>;
}

/// CSS specificity for determining rule precedence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    pub ids: u32,
    pub classes: u32,
    pub types: u32,
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ids: self.ids + rhs.ids,
            classes: self.classes + rhs.classes,
            types: self.types + rhs.types,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Selector {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    PseudoClass(PseudoClass),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Type(name) => f.write_str(name),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::PseudoClass(pc) => write!(f, "{pc}"),
        }
    }
}

/// Simple selectors that must all hold for one node, e.g. `Text.title:hover`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct CompoundSelector {
    pub selectors: Vec<Selector>,
}

impl CompoundSelector {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    pub fn universal() -> Self {
        Self::new(vec![Selector::Universal])
    }

    pub fn of_type(name: &str) -> Self {
        Self::new(vec![Selector::Type(name.to_string())])
    }

    pub fn of_class(class: &str) -> Self {
        Self::new(vec![Selector::Class(class.to_string())])
    }

    pub fn of_id(id: &str) -> Self {
        Self::new(vec![Selector::Id(id.to_string())])
    }

    pub fn class(mut self, class: &str) -> Self {
        self.selectors.push(Selector::Class(class.to_string()));
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.selectors.push(Selector::Id(id.to_string()));
        self
    }

    pub fn pseudo(mut self, pseudo_class: PseudoClass) -> Self {
        self.selectors.push(Selector::PseudoClass(pseudo_class));
        self
    }

    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for s in &self.selectors {
            match s {
                Selector::Id(_) => spec.ids += 1,
                Selector::Class(_) | Selector::PseudoClass(_) => spec.classes += 1,
                Selector::Type(_) => spec.types += 1,
                Selector::Universal => {}
            }
        }
        spec
    }

    /// Pseudo-classes this compound requires.
    pub fn pseudo_classes(&self) -> PseudoClassState {
        self.selectors
            .iter()
            .fold(PseudoClassState::empty(), |acc, s| match s {
                Selector::PseudoClass(pc) => acc.with(*pc),
                _ => acc,
            })
    }

    /// Matches type, id and classes, ignoring pseudo-classes.
    pub fn matches_static<S: Selectable>(&self, node: &S) -> bool {
        self.selectors.iter().all(|s| match s {
            Selector::Universal | Selector::PseudoClass(_) => true,
            Selector::Type(name) => node.type_selector() == name,
            Selector::Id(id) => node.style_id() == Some(id.as_str()),
            Selector::Class(class) => node.has_style_class(class),
        })
    }

    /// Matches everything, including the node's live pseudo-class state.
    pub fn matches_live<S: Selectable>(&self, node: &S) -> bool {
        self.matches_static(node) && node.pseudo_class_states().contains(self.pseudo_classes())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selectors.is_empty() {
            return f.write_str("*");
        }
        for s in &self.selectors {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Last part of a selector.
    None,
    Descendant,
    Child,
}

/// A compound selector and the combinator joining it to the part on its right.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelectorPart {
    pub compound: CompoundSelector,
    pub combinator: Combinator,
}

impl SelectorPart {
    pub fn new(compound: CompoundSelector, combinator: Combinator) -> Self {
        Self {
            compound,
            combinator,
        }
    }
}

/// Compound selectors joined by combinators, subject last.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComplexSelector {
    pub parts: Vec<SelectorPart>,
}

impl From<CompoundSelector> for ComplexSelector {
    fn from(compound: CompoundSelector) -> Self {
        Self::new(vec![SelectorPart::new(compound, Combinator::None)])
    }
}

impl ComplexSelector {
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self { parts }
    }

    pub fn universal() -> Self {
        CompoundSelector::universal().into()
    }

    /// `self next`
    pub fn descendant(self, next: CompoundSelector) -> Self {
        self.join(Combinator::Descendant, next)
    }

    /// `self > next`
    pub fn child(self, next: CompoundSelector) -> Self {
        self.join(Combinator::Child, next)
    }

    fn join(mut self, combinator: Combinator, next: CompoundSelector) -> Self {
        if let Some(last) = self.parts.last_mut() {
            last.combinator = combinator;
        }
        self.parts.push(SelectorPart::new(next, Combinator::None));
        self
    }

    pub fn specificity(&self) -> Specificity {
        self.parts
            .iter()
            .map(|p| p.compound.specificity())
            .fold(Specificity::default(), |acc, x| acc + x)
    }

    /// Pseudo-classes required of the subject itself.
    pub fn pseudo_classes(&self) -> PseudoClassState {
        self.parts
            .last()
            .map(|p| p.compound.pseudo_classes())
            .unwrap_or_default()
    }

    /// Structural match against `target` and its ancestors.
    ///
    /// On success, the pseudo-classes of each matched part are added to
    /// `trigger_states[d]`, where `d` is the matched node's distance from
    /// `target` (0 for the target). Depths past the end of the slice are
    /// dropped.
    pub fn applies<S: Selectable>(
        &self,
        target: &S,
        trigger_states: &mut [PseudoClassState],
    ) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !subject.compound.matches_static(target) {
            return false;
        }

        let mut found = Vec::new();
        if !match_ancestors(ancestors, target, 0, &mut found, false) {
            return false;
        }

        let subject_states = subject.compound.pseudo_classes();
        for (depth, states) in std::iter::once((0, subject_states)).chain(found) {
            if let Some(slot) = trigger_states.get_mut(depth) {
                *slot |= states;
            }
        }
        true
    }

    /// Whether the selector holds with the subject in `states`.
    ///
    /// Ancestor parts are checked against the ancestors' live states. The
    /// selector is assumed to already apply structurally.
    pub fn state_matches<S: Selectable>(&self, target: &S, states: PseudoClassState) -> bool {
        let Some((subject, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !states.contains(subject.compound.pseudo_classes()) {
            return false;
        }
        if ancestors
            .iter()
            .all(|p| p.compound.pseudo_classes().is_empty())
        {
            return true;
        }
        match_ancestors(ancestors, target, 0, &mut Vec::new(), true)
    }
}

fn match_ancestors<S: Selectable>(
    parts: &[SelectorPart],
    node: &S,
    depth: usize,
    found: &mut Vec<(usize, PseudoClassState)>,
    live: bool,
) -> bool {
    let Some((part, rest)) = parts.split_last() else {
        return true;
    };

    let mut depth = depth;
    let mut ancestor = node.selectable_parent();
    while let Some(current) = ancestor {
        depth += 1;
        let matched = if live {
            part.compound.matches_live(&current)
        } else {
            part.compound.matches_static(&current)
        };
        if matched {
            found.push((depth, part.compound.pseudo_classes()));
            if match_ancestors(rest, &current, depth, found, live) {
                return true;
            }
            found.pop();
        }
        if part.combinator == Combinator::Child {
            return false;
        }
        ancestor = current.selectable_parent();
    }
    false
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            write!(f, "{}", part.compound)?;
            match part.combinator {
                Combinator::None => {}
                Combinator::Descendant => f.write_str(" ")?,
                Combinator::Child => f.write_str(" > ")?,
            }
        }
        Ok(())
    }
}

/// A detached description of a node, for matching without a scene graph.
#[derive(Debug, Clone, Default)]
pub struct NodeMeta {
    pub type_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub states: PseudoClassState,
}

impl NodeMeta {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_states(mut self, states: PseudoClassState) -> Self {
        self.states = states;
        self
    }
}

/// A node followed by its ancestors, nearest first.
#[derive(Debug, Clone, Copy)]
pub struct MetaChain<'a>(pub &'a [NodeMeta]);

impl Selectable for MetaChain<'_> {
    fn type_selector(&self) -> &str {
        self.0.first().map_or("", |m| m.type_name.as_str())
    }

    fn style_id(&self) -> Option<&str> {
        self.0.first().and_then(|m| m.id.as_deref())
    }

    fn has_style_class(&self, class: &str) -> bool {
        self.0
            .first()
            .is_some_and(|m| m.classes.iter().any(|c| c == class))
    }

    fn pseudo_class_states(&self) -> PseudoClassState {
        self.0.first().map(|m| m.states).unwrap_or_default()
    }

    fn selectable_parent(&self) -> Option<Self> {
        let chain = self.0;
        (chain.len() > 1).then(|| MetaChain(&chain[1..]))
    }
}
