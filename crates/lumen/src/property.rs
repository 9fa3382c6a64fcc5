//! Styleable property descriptors.
//!
//! Every node type publishes the list of properties CSS may set on it as a
//! slice of [`CssMetaData`]. The style helper walks that list in order when
//! a node transitions to a new state.

use std::sync::Arc;

use lcss::{Color, Converter, Font, Insets, StyleOrigin, StyledValue};
use once_cell::sync::Lazy;

/// Name of the font shorthand property.
pub const FONT: &str = "font";
pub const FONT_SIZE: &str = "font-size";
pub const FONT_WEIGHT: &str = "font-weight";
pub const FONT_STYLE: &str = "font-style";
pub const FONT_FAMILY: &str = "font-family";

/// Describes one property CSS can set.
#[derive(Debug, Clone, PartialEq)]
pub struct CssMetaData {
    /// Lowercase CSS property name.
    pub property: String,
    pub converter: Converter,
    /// Value before any style applies.
    pub initial: StyledValue,
    /// Unstyled nodes take the value their nearest styled ancestor resolves.
    pub inherits: bool,
    /// Longhands a shorthand can be assembled from.
    pub sub_properties: Vec<CssMetaData>,
}

impl CssMetaData {
    pub fn new(property: &str, converter: Converter, initial: StyledValue) -> Self {
        Self {
            property: property.to_ascii_lowercase(),
            converter,
            initial,
            inherits: false,
            sub_properties: Vec::new(),
        }
    }

    pub fn inherited(mut self) -> Self {
        self.inherits = true;
        self
    }

    pub fn with_sub_properties(mut self, sub_properties: Vec<CssMetaData>) -> Self {
        self.sub_properties = sub_properties;
        self
    }

    pub fn is_font(&self) -> bool {
        self.converter.is_font()
    }
}

/// The live state of one property on a node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySlot {
    pub value: StyledValue,
    /// Who set the current value; `None` until someone does.
    pub origin: Option<StyleOrigin>,
    /// Bound properties are driven by code and never styled.
    pub bound: bool,
}

impl PropertySlot {
    pub fn new(value: StyledValue) -> Self {
        Self {
            value,
            origin: None,
            bound: false,
        }
    }
}

// Longhands used while resolving the font shorthand. They are never applied
// to a node directly.
pub(crate) static FONT_SHORTHAND_META: Lazy<CssMetaData> = Lazy::new(font_meta);
pub(crate) static FONT_SIZE_META: Lazy<CssMetaData> =
    Lazy::new(|| CssMetaData::new(FONT_SIZE, Converter::FontSize, StyledValue::Null).inherited());
pub(crate) static FONT_WEIGHT_META: Lazy<CssMetaData> = Lazy::new(|| {
    CssMetaData::new(FONT_WEIGHT, Converter::FontWeight, StyledValue::Null).inherited()
});
pub(crate) static FONT_STYLE_META: Lazy<CssMetaData> =
    Lazy::new(|| CssMetaData::new(FONT_STYLE, Converter::FontStyle, StyledValue::Null).inherited());
pub(crate) static FONT_FAMILY_META: Lazy<CssMetaData> = Lazy::new(|| {
    CssMetaData::new(FONT_FAMILY, Converter::FontFamily, StyledValue::Null).inherited()
});

fn font_meta() -> CssMetaData {
    CssMetaData::new(FONT, Converter::Font, StyledValue::Font(Font::default()))
        .inherited()
        .with_sub_properties(vec![
            (*FONT_SIZE_META).clone(),
            (*FONT_WEIGHT_META).clone(),
            (*FONT_STYLE_META).clone(),
            (*FONT_FAMILY_META).clone(),
        ])
}

fn padding_meta() -> CssMetaData {
    let side = |name: &str| CssMetaData::new(name, Converter::Size, StyledValue::Number(0.0));
    CssMetaData::new(
        "padding",
        Converter::Insets,
        StyledValue::Insets(Insets::EMPTY),
    )
    .with_sub_properties(vec![
        side("padding-top"),
        side("padding-right"),
        side("padding-bottom"),
        side("padding-left"),
    ])
}

fn text_fill_meta() -> CssMetaData {
    CssMetaData::new("text-fill", Converter::Paint, StyledValue::Color(Color::BLACK)).inherited()
}

/// Properties every node has.
pub static NODE_PROPERTIES: Lazy<Arc<[CssMetaData]>> = Lazy::new(|| {
    vec![
        CssMetaData::new("opacity", Converter::Size, StyledValue::Number(1.0)),
        CssMetaData::new("cursor", Converter::Ident, StyledValue::Null).inherited(),
    ]
    .into()
});

/// Node properties plus background and padding.
pub static REGION_PROPERTIES: Lazy<Arc<[CssMetaData]>> = Lazy::new(|| {
    let mut properties = NODE_PROPERTIES.to_vec();
    properties.push(CssMetaData::new(
        "background-color",
        Converter::Paint,
        StyledValue::Null,
    ));
    properties.push(padding_meta());
    properties.into()
});

/// Node properties plus the text properties of a text run.
pub static TEXT_PROPERTIES: Lazy<Arc<[CssMetaData]>> = Lazy::new(|| {
    let mut properties = NODE_PROPERTIES.to_vec();
    properties.extend([
        (*FONT_SHORTHAND_META).clone(),
        text_fill_meta(),
        CssMetaData::new("underline", Converter::Boolean, StyledValue::Boolean(false)),
        CssMetaData::new("line-spacing", Converter::Size, StyledValue::Number(0.0)),
    ]);
    properties.into()
});

/// Region properties plus the text and graphic properties of a labeled control.
pub static LABELED_PROPERTIES: Lazy<Arc<[CssMetaData]>> = Lazy::new(|| {
    let mut properties = REGION_PROPERTIES.to_vec();
    properties.extend([
        (*FONT_SHORTHAND_META).clone(),
        text_fill_meta(),
        CssMetaData::new("graphic-gap", Converter::Size, StyledValue::Number(4.0)),
    ]);
    properties.into()
});
