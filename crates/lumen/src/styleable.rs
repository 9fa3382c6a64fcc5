//! The capability a node needs to be styled.
//!
//! The style helper never looks at concrete node types. It reads selector
//! data and property slots through [`Styleable`] and writes resolved values
//! back through [`Styleable::apply_style`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use lcss::{CssError, StyleOrigin, StyledValue, Stylesheet};

use crate::property::{
    CssMetaData, LABELED_PROPERTIES, NODE_PROPERTIES, PropertySlot, REGION_PROPERTIES,
    TEXT_PROPERTIES,
};

/// Checks a value before it is stored; `Err` carries the reason.
pub type Validator = fn(&StyledValue) -> Result<(), String>;

/// A node the style engine can match selectors against and write properties to.
pub trait Styleable: fmt::Debug {
    /// The type name type selectors compare against.
    fn type_selector(&self) -> &str;

    fn style_id(&self) -> Option<&str>;

    fn style_classes(&self) -> &[String];

    /// Declarations that apply to this node only.
    fn inline_style(&self) -> Option<&Rc<Stylesheet>>;

    /// Properties CSS may set, in the order they are applied.
    fn css_meta_data(&self) -> Arc<[CssMetaData]>;

    fn property(&self, name: &str) -> Option<&PropertySlot>;

    /// Stores `value` in the named property.
    fn apply_style(
        &mut self,
        name: &str,
        origin: Option<StyleOrigin>,
        value: StyledValue,
    ) -> Result<(), CssError>;

    fn set_style_id(&mut self, id: Option<String>);

    fn add_style_class(&mut self, class: &str);

    fn remove_style_class(&mut self, class: &str);

    fn set_inline_style(&mut self, style: Option<Stylesheet>);

    /// Who set the property's current value.
    fn property_origin(&self, name: &str) -> Option<StyleOrigin> {
        self.property(name).and_then(|slot| slot.origin)
    }

    /// `false` for unknown and bound properties.
    fn is_settable(&self, name: &str) -> bool {
        self.property(name).is_some_and(|slot| !slot.bound)
    }

    /// Selector-like description used in diagnostics, e.g. `Label#title.big`.
    fn describe(&self) -> String {
        let mut out = self.type_selector().to_string();
        if let Some(id) = self.style_id() {
            out.push('#');
            out.push_str(id);
        }
        for class in self.style_classes() {
            out.push('.');
            out.push_str(class);
        }
        out
    }
}

/// A general purpose [`Styleable`] backed by a map of property slots.
#[derive(Debug, Clone)]
pub struct StyleableNode {
    type_name: String,
    id: Option<String>,
    classes: Vec<String>,
    inline: Option<Rc<Stylesheet>>,
    meta: Arc<[CssMetaData]>,
    slots: HashMap<String, PropertySlot>,
    validators: HashMap<String, Validator>,
}

impl StyleableNode {
    /// A node of `type_name` with one slot per property in `meta`.
    pub fn new(type_name: &str, meta: Arc<[CssMetaData]>) -> Self {
        let slots = meta
            .iter()
            .map(|m| (m.property.clone(), PropertySlot::new(m.initial.clone())))
            .collect();
        Self {
            type_name: type_name.to_string(),
            id: None,
            classes: Vec::new(),
            inline: None,
            meta,
            slots,
            validators: HashMap::new(),
        }
    }

    /// A plain grouping node with only the common properties.
    pub fn group() -> Self {
        Self::new("Group", Arc::clone(&*NODE_PROPERTIES))
    }

    pub fn region(type_name: &str) -> Self {
        Self::new(type_name, Arc::clone(&*REGION_PROPERTIES))
    }

    pub fn text() -> Self {
        Self::new("Text", Arc::clone(&*TEXT_PROPERTIES))
    }

    pub fn labeled(type_name: &str) -> Self {
        Self::new(type_name, Arc::clone(&*LABELED_PROPERTIES))
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_style_class(class);
        self
    }

    pub fn with_inline_style(mut self, style: Stylesheet) -> Self {
        self.inline = Some(Rc::new(style));
        self
    }

    /// Marks `property` as bound so CSS leaves it alone.
    pub fn bound(mut self, property: &str) -> Self {
        if let Some(slot) = self.slots.get_mut(property) {
            slot.bound = true;
        }
        self
    }

    /// Rejects values of `property` that `validator` refuses.
    pub fn with_validator(mut self, property: &str, validator: Validator) -> Self {
        self.validators.insert(property.to_string(), validator);
        self
    }

    /// Convenience accessor for a property's current value.
    pub fn value(&self, name: &str) -> Option<&StyledValue> {
        self.slots.get(name).map(|slot| &slot.value)
    }
}

impl Styleable for StyleableNode {
    fn type_selector(&self) -> &str {
        &self.type_name
    }

    fn style_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn style_classes(&self) -> &[String] {
        &self.classes
    }

    fn inline_style(&self) -> Option<&Rc<Stylesheet>> {
        self.inline.as_ref()
    }

    fn css_meta_data(&self) -> Arc<[CssMetaData]> {
        Arc::clone(&self.meta)
    }

    fn property(&self, name: &str) -> Option<&PropertySlot> {
        self.slots.get(name)
    }

    fn apply_style(
        &mut self,
        name: &str,
        origin: Option<StyleOrigin>,
        value: StyledValue,
    ) -> Result<(), CssError> {
        if let Some(validator) = self.validators.get(name) {
            validator(&value).map_err(|reason| CssError::PropertySet {
                property: name.to_string(),
                reason,
            })?;
        }
        let Some(slot) = self.slots.get_mut(name) else {
            return Err(CssError::PropertySet {
                property: name.to_string(),
                reason: format!("{} has no such property", self.type_name),
            });
        };
        slot.value = value;
        slot.origin = origin;
        Ok(())
    }

    fn set_style_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn add_style_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    fn remove_style_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    fn set_inline_style(&mut self, style: Option<Stylesheet>) {
        self.inline = style.map(Rc::new);
    }
}
