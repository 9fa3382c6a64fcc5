//! Conversion of parsed values into typed [`StyledValue`]s.
//!
//! Converters run after lookups are resolved. Any lookup still present at
//! that point has no declaration behind it and fails with
//! [`CssError::MissingValue`].

use std::fmt;

use crate::error::{CssError, Result};
use crate::types::{Color, Font, FontPosture, FontWeight, Insets};
use crate::value::ParsedValue;

/// A converted, typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyledValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Ident(String),
    Color(Color),
    Font(Font),
    FontWeight(FontWeight),
    FontPosture(FontPosture),
    Insets(Insets),
    List(Vec<StyledValue>),
}

impl StyledValue {
    pub fn as_font(&self) -> Option<&Font> {
        match self {
            Self::Font(font) => Some(font),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for StyledValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Ident(s) => f.write_str(s),
            Self::Color(c) => write!(f, "{c}"),
            Self::Font(font) => write!(f, "{font}"),
            Self::FontWeight(w) => write!(f, "{}", w.weight()),
            Self::FontPosture(p) => write!(f, "{p:?}"),
            Self::Insets(i) => write!(f, "{i}"),
            Self::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Turns a [`ParsedValue`] into the type a property expects.
#[derive(Debug, Clone, PartialEq)]
pub enum Converter {
    Boolean,
    /// A length in pixels, or a bare number.
    Size,
    String,
    /// A lowercase keyword.
    Ident,
    Paint,
    Insets,
    /// The `font` shorthand.
    Font,
    /// A font size; percentages are of the reference font size.
    FontSize,
    FontWeight,
    FontStyle,
    FontFamily,
    /// Each element of a sequence converted with the inner converter.
    Sequence(Box<Converter>),
    /// Each element of each layer converted with the inner converter.
    Layers(Box<Converter>),
}

fn mismatch(expected: &'static str, value: &ParsedValue) -> CssError {
    match value {
        ParsedValue::Lookup(name) => CssError::MissingValue(name.clone()),
        _ => CssError::Conversion {
            expected,
            found: value.to_string(),
        },
    }
}

fn length(value: &ParsedValue, multiplier: f64, font: &Font) -> Result<f64> {
    match value {
        ParsedValue::Size(size) => Ok(size.pixels(multiplier, font)),
        ParsedValue::Number(n) => Ok(*n),
        other => Err(mismatch("size", other)),
    }
}

impl Converter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Size => "size",
            Self::String => "string",
            Self::Ident => "ident",
            Self::Paint => "paint",
            Self::Insets => "insets",
            Self::Font => "font",
            Self::FontSize => "font-size",
            Self::FontWeight => "font-weight",
            Self::FontStyle => "font-style",
            Self::FontFamily => "font-family",
            Self::Sequence(_) => "sequence",
            Self::Layers(_) => "layers",
        }
    }

    /// `true` for the font shorthand converter.
    pub fn is_font(&self) -> bool {
        matches!(self, Self::Font)
    }

    /// Converts `value`, resolving relative sizes against `font`.
    pub fn convert(&self, value: &ParsedValue, font: &Font) -> Result<StyledValue> {
        if matches!(value, ParsedValue::Null) {
            return Ok(StyledValue::Null);
        }

        match self {
            Self::Boolean => match value {
                ParsedValue::Ident(s) if s.eq_ignore_ascii_case("true") => {
                    Ok(StyledValue::Boolean(true))
                }
                ParsedValue::Ident(s) if s.eq_ignore_ascii_case("false") => {
                    Ok(StyledValue::Boolean(false))
                }
                other => Err(mismatch("boolean", other)),
            },
            Self::Size => length(value, 1.0, font).map(StyledValue::Number),
            Self::String | Self::FontFamily => match value {
                ParsedValue::Str(s) | ParsedValue::Ident(s) => Ok(StyledValue::String(s.clone())),
                other => Err(mismatch("string", other)),
            },
            Self::Ident => match value {
                ParsedValue::Ident(s) => Ok(StyledValue::Ident(s.to_ascii_lowercase())),
                other => Err(mismatch("ident", other)),
            },
            Self::Paint => match value {
                ParsedValue::Color(color) => Ok(StyledValue::Color(*color)),
                ParsedValue::Ident(name) => Color::named(name)
                    .map(StyledValue::Color)
                    .ok_or_else(|| mismatch("paint", value)),
                other => Err(mismatch("paint", other)),
            },
            Self::Insets => self.convert_insets(value, font),
            Self::Font => match value {
                ParsedValue::Font(shorthand) => Ok(StyledValue::Font(Font {
                    family: shorthand.family.clone(),
                    weight: shorthand.weight.unwrap_or_default(),
                    posture: shorthand.posture.unwrap_or_default(),
                    size: shorthand.size.pixels(font.size, font),
                })),
                other => Err(mismatch("font", other)),
            },
            Self::FontSize => length(value, font.size, font).map(StyledValue::Number),
            Self::FontWeight => match value {
                ParsedValue::Ident(keyword) => FontWeight::from_keyword(keyword)
                    .map(StyledValue::FontWeight)
                    .ok_or_else(|| mismatch("font-weight", value)),
                ParsedValue::Number(n) => FontWeight::from_weight(*n)
                    .map(StyledValue::FontWeight)
                    .ok_or_else(|| CssError::InvalidArgument(format!("font weight {n}"))),
                other => Err(mismatch("font-weight", other)),
            },
            Self::FontStyle => match value {
                ParsedValue::Ident(keyword) => FontPosture::from_keyword(keyword)
                    .map(StyledValue::FontPosture)
                    .ok_or_else(|| mismatch("font-style", value)),
                other => Err(mismatch("font-style", other)),
            },
            Self::Sequence(inner) => match value {
                ParsedValue::Sequence(values) => values
                    .iter()
                    .map(|v| inner.convert(v, font))
                    .collect::<Result<Vec<_>>>()
                    .map(StyledValue::List),
                single => Ok(StyledValue::List(vec![inner.convert(single, font)?])),
            },
            Self::Layers(inner) => {
                let layers: Vec<&[ParsedValue]> = match value {
                    ParsedValue::Layers(layers) => layers.iter().map(Vec::as_slice).collect(),
                    ParsedValue::Sequence(values) => vec![values.as_slice()],
                    single => vec![std::slice::from_ref(single)],
                };
                layers
                    .into_iter()
                    .map(|layer| {
                        layer
                            .iter()
                            .map(|v| inner.convert(v, font))
                            .collect::<Result<Vec<_>>>()
                            .map(StyledValue::List)
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(StyledValue::List)
            }
        }
    }

    fn convert_insets(&self, value: &ParsedValue, font: &Font) -> Result<StyledValue> {
        let sides = match value {
            ParsedValue::Sequence(values) => values
                .iter()
                .map(|v| length(v, 1.0, font))
                .collect::<Result<Vec<_>>>()?,
            single => vec![length(single, 1.0, font)?],
        };
        let insets = match sides.as_slice() {
            [all] => Insets::all(*all),
            [v, h] => Insets::vertical_horizontal(*v, *h),
            [top, h, bottom] => Insets::new(*top, *h, *bottom, *h),
            [top, right, bottom, left] => Insets::new(*top, *right, *bottom, *left),
            _ => {
                return Err(CssError::InvalidArgument(format!(
                    "insets take 1 to 4 values, got {}",
                    sides.len()
                )));
            }
        };
        Ok(StyledValue::Insets(insets))
    }

    /// Combines resolved sub-property values into this converter's type.
    ///
    /// Only insets decompose into sub-properties; keys are matched on their
    /// `-top`, `-right`, `-bottom` and `-left` suffixes and missing sides are zero.
    pub fn convert_subs(&self, subs: &[(String, StyledValue)]) -> Result<StyledValue> {
        if !matches!(self, Self::Insets) {
            return Err(CssError::InvalidArgument(format!(
                "{} converter does not combine sub-properties",
                self.name()
            )));
        }

        let mut insets = Insets::EMPTY;
        for (property, value) in subs {
            let Some(pixels) = value.as_number() else {
                return Err(CssError::Conversion {
                    expected: "size",
                    found: value.to_string(),
                });
            };
            if property.ends_with("-top") {
                insets.top = pixels;
            } else if property.ends_with("-right") {
                insets.right = pixels;
            } else if property.ends_with("-bottom") {
                insets.bottom = pixels;
            } else if property.ends_with("-left") {
                insets.left = pixels;
            } else {
                return Err(CssError::InvalidArgument(format!(
                    "'{property}' is not an insets side"
                )));
            }
        }
        Ok(StyledValue::Insets(insets))
    }
}
