//! Named lookups inside values.
//!
//! A value may refer to another declaration by name, e.g. `text-fill: accent`
//! with `accent: #336699` declared on the node or an ancestor. References are
//! followed until a plain value remains.

use lcss::{CascadingStyle, CssError, ParsedValue, PseudoClassState, StyleMap, StyleOrigin};

use super::Resolver;
use crate::scene::NodeId;

/// Values and names on the reference chain being expanded.
#[derive(Debug, Default)]
pub(crate) struct LookupTrail {
    resolves: Vec<ParsedValue>,
    /// Never cleared between sibling values, so a chain that comes back to
    /// a name it is still expanding always stops.
    in_flight: Vec<String>,
}

impl<'a> Resolver<'a> {
    /// The declaration a lookup of `property` refers to.
    ///
    /// Tries the node in `states`, then the node with no pseudo-classes, then
    /// the nearest ancestor with a style helper in its live state.
    pub(crate) fn resolve_ref(
        &self,
        node: NodeId,
        property: &str,
        map: &'a StyleMap,
        states: PseudoClassState,
    ) -> Option<&'a CascadingStyle> {
        if let Some(style) = self.get_style(node, property, map, states) {
            return Some(style);
        }
        if !states.is_empty() {
            if let Some(style) = self.get_style(node, property, map, PseudoClassState::empty()) {
                return Some(style);
            }
        }

        let parent = self.helper_ancestors(node).next()?;
        let parent_map = self.style_map_of(parent).unwrap_or_else(|| self.empty_map());
        let parent_states = self.scene().pseudo_class_states(parent);
        self.resolve_ref(parent, property, parent_map, parent_states)
    }

    /// Replaces every lookup in `value` with the value it refers to.
    ///
    /// `whence` is raised to the highest origin among the declarations
    /// followed, so a value reached through an inline declaration is never
    /// cached as an author value. Lookups with no declaration behind them are
    /// left in place for the converter to reject.
    pub(crate) fn resolve_lookups(
        &self,
        node: NodeId,
        value: &ParsedValue,
        map: &'a StyleMap,
        states: PseudoClassState,
        whence: &mut StyleOrigin,
        trail: &mut LookupTrail,
    ) -> lcss::Result<ParsedValue> {
        if let ParsedValue::Lookup(name) = value {
            if let Some(resolved) = self.resolve_ref(node, name, map, states) {
                if trail.in_flight.contains(name)
                    || trail.resolves.contains(value)
                    || trail.resolves.contains(resolved.value())
                {
                    let err = CssError::LookupCycle {
                        rule: resolved.style.to_string(),
                        lookup: name.clone(),
                    };
                    log::warn!("{err}");
                    return Err(err);
                }

                trail.resolves.push(value.clone());
                trail.in_flight.push(name.clone());
                *whence = (*whence).max(resolved.origin());

                let result =
                    self.resolve_lookups(node, resolved.value(), map, states, whence, trail);

                trail.in_flight.pop();
                if let Some(pos) = trail.resolves.iter().rposition(|v| v == value) {
                    trail.resolves.remove(pos);
                }
                return result;
            }
        }

        if !value.contains_lookups() {
            return Ok(value.clone());
        }

        match value {
            ParsedValue::Sequence(values) => {
                let resolved = values
                    .iter()
                    .map(|v| self.resolve_lookups(node, v, map, states, whence, trail))
                    .collect::<lcss::Result<Vec<_>>>()?;
                trail.resolves.clear();
                Ok(ParsedValue::Sequence(resolved))
            }
            ParsedValue::Layers(layers) => {
                let resolved = layers
                    .iter()
                    .map(|layer| {
                        layer
                            .iter()
                            .map(|v| self.resolve_lookups(node, v, map, states, whence, trail))
                            .collect::<lcss::Result<Vec<_>>>()
                    })
                    .collect::<lcss::Result<Vec<_>>>()?;
                trail.resolves.clear();
                Ok(ParsedValue::Layers(resolved))
            }
            other => Ok(other.clone()),
        }
    }
}
