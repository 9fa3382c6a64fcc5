//! Shared fixtures for the lumen integration tests.
//!
//! [`Harness`] bundles a style manager with a scene and runs pulses the way
//! an application loop would.

#![allow(dead_code)]

use lcss::{CompoundSelector, PseudoClass, Rule, StyleOrigin, StyledValue, Stylesheet};
use lumen::{CssErrorReport, NodeId, Scene, StyleConfig, StyleManager, process_css};

pub struct Harness {
    pub manager: StyleManager,
    pub scene: Scene,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(StyleConfig::default())
    }

    pub fn with_config(config: StyleConfig) -> Self {
        Self {
            manager: StyleManager::new(config),
            scene: Scene::new(),
        }
    }

    /// Collects CSS errors so tests can inspect them.
    pub fn collecting() -> Self {
        Self::with_config(StyleConfig::default().with_collect_errors(true))
    }

    pub fn stylesheet(mut self, sheet: Stylesheet) -> Self {
        self.manager.add_stylesheet(&mut self.scene, sheet);
        self
    }

    pub fn pulse(&mut self) {
        process_css(&mut self.manager, &mut self.scene);
    }

    pub fn value(&self, node: NodeId, property: &str) -> Option<StyledValue> {
        self.scene
            .styleable(node)
            .property(property)
            .map(|slot| slot.value.clone())
    }

    pub fn origin(&self, node: NodeId, property: &str) -> Option<StyleOrigin> {
        self.scene.styleable(node).property_origin(property)
    }

    pub fn set_state(&mut self, node: NodeId, pseudo_class: PseudoClass, active: bool) {
        self.scene.set_pseudo_class_state(node, pseudo_class, active);
    }

    pub fn errors(&self) -> &[CssErrorReport] {
        self.manager.errors()
    }
}

/// An author stylesheet holding `rules`.
pub fn author(rules: impl IntoIterator<Item = Rule>) -> Stylesheet {
    rules
        .into_iter()
        .fold(Stylesheet::new(StyleOrigin::Author), Stylesheet::rule)
}

/// A user agent stylesheet holding `rules`.
pub fn user_agent(rules: impl IntoIterator<Item = Rule>) -> Stylesheet {
    rules
        .into_iter()
        .fold(Stylesheet::new(StyleOrigin::UserAgent), Stylesheet::rule)
}

/// A rule with a single compound selector.
pub fn rule(selector: CompoundSelector) -> Rule {
    Rule::new(selector.into())
}
