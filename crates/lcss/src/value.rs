//! Parsed value trees.
//!
//! A [`ParsedValue`] is what a declaration holds before resolution: literal
//! values, named lookups that refer to other declarations, and composites of
//! either. Converting one into a typed value is the job of
//! [`Converter`](crate::converter::Converter).

use std::fmt;

use crate::types::{Color, FontPosture, FontWeight, Size, SizeUnit};

/// The components of a `font` shorthand value.
#[derive(Debug, Clone, PartialEq)]
pub struct FontShorthand {
    pub family: String,
    pub size: Size,
    pub weight: Option<FontWeight>,
    pub posture: Option<FontPosture>,
}

impl FontShorthand {
    pub fn new(size: Size, family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            size,
            weight: None,
            posture: None,
        }
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn posture(mut self, posture: FontPosture) -> Self {
        self.posture = Some(posture);
        self
    }
}

/// A declaration value before lookups are resolved and types are converted.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    /// No value at all.
    Null,
    /// The `inherit` keyword.
    Inherit,
    /// A bare identifier such as `bold` or `center`.
    Ident(String),
    /// A quoted string.
    Str(String),
    Number(f64),
    Size(Size),
    Color(Color),
    /// A reference to another property, resolved against the node and its ancestors.
    Lookup(String),
    Font(FontShorthand),
    /// Space or comma separated values.
    Sequence(Vec<ParsedValue>),
    /// Comma separated layers of space separated values.
    Layers(Vec<Vec<ParsedValue>>),
}

impl ParsedValue {
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    /// A lookup of `name`; names are matched case-insensitively.
    pub fn lookup(name: impl Into<String>) -> Self {
        Self::Lookup(name.into().to_ascii_lowercase())
    }

    pub fn px(value: f64) -> Self {
        Self::Size(Size::px(value))
    }

    pub fn em(value: f64) -> Self {
        Self::Size(Size::em(value))
    }

    pub fn font(size: Size, family: impl Into<String>) -> Self {
        Self::Font(FontShorthand::new(size, family))
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup(_))
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, Self::Inherit)
    }

    /// `true` for [`Null`](Self::Null) and the `none`/`null` keywords.
    pub fn is_none(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Ident(s) => s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("null"),
            _ => false,
        }
    }

    /// `true` if a lookup appears anywhere in the tree.
    pub fn contains_lookups(&self) -> bool {
        match self {
            Self::Lookup(_) => true,
            Self::Sequence(values) => values.iter().any(Self::contains_lookups),
            Self::Layers(layers) => layers.iter().flatten().any(Self::contains_lookups),
            _ => false,
        }
    }

    /// The first lookup name in the tree, depth first.
    pub fn first_lookup(&self) -> Option<&str> {
        match self {
            Self::Lookup(name) => Some(name),
            Self::Sequence(values) => values.iter().find_map(Self::first_lookup),
            Self::Layers(layers) => layers.iter().flatten().find_map(Self::first_lookup),
            _ => None,
        }
    }

    /// `true` if the value depends on the reference font.
    ///
    /// `em` and `ex` always do. Percentages only do for font properties,
    /// where they are a share of the parent font size.
    pub fn contains_font_relative_size(&self, is_font_property: bool) -> bool {
        let relative = |size: &Size| {
            size.is_font_relative() || (is_font_property && size.unit == SizeUnit::Percent)
        };
        match self {
            Self::Size(size) => relative(size),
            Self::Font(shorthand) => relative(&shorthand.size),
            Self::Sequence(values) => values
                .iter()
                .any(|v| v.contains_font_relative_size(is_font_property)),
            Self::Layers(layers) => layers
                .iter()
                .flatten()
                .any(|v| v.contains_font_relative_size(is_font_property)),
            _ => false,
        }
    }
}

impl From<Size> for ParsedValue {
    fn from(size: Size) -> Self {
        Self::Size(size)
    }
}

impl From<Color> for ParsedValue {
    fn from(color: Color) -> Self {
        Self::Color(color)
    }
}

impl From<f64> for ParsedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[ParsedValue], sep: &str) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Inherit => f.write_str("inherit"),
            Self::Ident(s) => f.write_str(s),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Number(n) => write!(f, "{n}"),
            Self::Size(size) => write!(f, "{size}"),
            Self::Color(color) => write!(f, "{color}"),
            Self::Lookup(name) => f.write_str(name),
            Self::Font(shorthand) => {
                if let Some(posture) = shorthand.posture {
                    write!(f, "{} ", format!("{posture:?}").to_ascii_lowercase())?;
                }
                if let Some(weight) = shorthand.weight {
                    write!(f, "{} ", weight.weight())?;
                }
                write!(f, "{} \"{}\"", shorthand.size, shorthand.family)
            }
            Self::Sequence(values) => write_joined(f, values, " "),
            Self::Layers(layers) => {
                for (i, layer) in layers.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_joined(f, layer, " ")?;
                }
                Ok(())
            }
        }
    }
}
