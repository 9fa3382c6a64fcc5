//! Resolution results.

use crate::converter::StyledValue;
use crate::stylesheet::StyleOrigin;
use crate::stylesheet::cascade::CascadingStyle;

/// A resolved property value.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedValue {
    pub value: StyledValue,
    /// `None` when the value did not come from CSS.
    pub origin: Option<StyleOrigin>,
    /// The value was computed from font-relative units.
    pub relative: bool,
}

impl CalculatedValue {
    pub fn new(value: StyledValue, origin: Option<StyleOrigin>, relative: bool) -> Self {
        Self {
            value,
            origin,
            relative,
        }
    }
}

/// Outcome of looking something up in the cascade.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// The winning declaration is `inherit`; look at the ancestors.
    Inherit,
    /// Nothing applies.
    NoStyle,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::Inherit => Lookup::Inherit,
            Self::NoStyle => Lookup::NoStyle,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Inherit => Lookup::Inherit,
            Self::NoStyle => Lookup::NoStyle,
        }
    }
}

impl<'a> Lookup<&'a CascadingStyle> {
    /// Classifies the winning style, if any.
    pub fn from_style(style: Option<&'a CascadingStyle>) -> Self {
        match style {
            None => Self::NoStyle,
            Some(style) if style.value().is_inherit() => Self::Inherit,
            Some(style) => Self::Found(style),
        }
    }
}
