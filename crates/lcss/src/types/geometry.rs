//! Lengths and box insets.

use std::fmt;

use super::font::Font;

const PIXELS_PER_INCH: f64 = 96.0;
const POINTS_PER_INCH: f64 = 72.0;

/// Length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SizeUnit {
    #[default]
    Px,
    Pt,
    In,
    Cm,
    Mm,
    /// Multiple of the reference font size.
    Em,
    /// Half the reference font size.
    Ex,
    Percent,
}

/// A length with its unit, unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub value: f64,
    pub unit: SizeUnit,
}

impl Size {
    pub const ZERO: Self = Self {
        value: 0.0,
        unit: SizeUnit::Px,
    };

    pub fn new(value: f64, unit: SizeUnit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f64) -> Self {
        Self::new(value, SizeUnit::Px)
    }

    pub fn pt(value: f64) -> Self {
        Self::new(value, SizeUnit::Pt)
    }

    pub fn em(value: f64) -> Self {
        Self::new(value, SizeUnit::Em)
    }

    pub fn ex(value: f64) -> Self {
        Self::new(value, SizeUnit::Ex)
    }

    pub fn percent(value: f64) -> Self {
        Self::new(value, SizeUnit::Percent)
    }

    /// `true` for units measured against the reference font.
    pub fn is_font_relative(&self) -> bool {
        matches!(self.unit, SizeUnit::Em | SizeUnit::Ex)
    }

    /// Resolves to pixels.
    ///
    /// Percentages are taken of `multiplier`; `em` and `ex` of `font.size`.
    pub fn pixels(&self, multiplier: f64, font: &Font) -> f64 {
        match self.unit {
            SizeUnit::Px => self.value,
            SizeUnit::Pt => self.value * PIXELS_PER_INCH / POINTS_PER_INCH,
            SizeUnit::In => self.value * PIXELS_PER_INCH,
            SizeUnit::Cm => self.value / 2.54 * PIXELS_PER_INCH,
            SizeUnit::Mm => self.value / 25.4 * PIXELS_PER_INCH,
            SizeUnit::Em => self.value * font.size,
            SizeUnit::Ex => self.value * font.size / 2.0,
            SizeUnit::Percent => self.value / 100.0 * multiplier,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            SizeUnit::Px => "px",
            SizeUnit::Pt => "pt",
            SizeUnit::In => "in",
            SizeUnit::Cm => "cm",
            SizeUnit::Mm => "mm",
            SizeUnit::Em => "em",
            SizeUnit::Ex => "ex",
            SizeUnit::Percent => "%",
        };
        write!(f, "{}{}", self.value, unit)
    }
}

/// Resolved box insets in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const EMPTY: Self = Self::all(0.0);

    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub const fn vertical_horizontal(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

impl fmt::Display for Insets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Insets[top={}, right={}, bottom={}, left={}]",
            self.top, self.right, self.bottom, self.left
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_units() {
        let font = Font::default();
        assert_eq!(Size::px(10.0).pixels(1.0, &font), 10.0);
        assert_eq!(Size::pt(72.0).pixels(1.0, &font), 96.0);
        assert_eq!(Size::new(1.0, SizeUnit::In).pixels(1.0, &font), 96.0);
        assert!((Size::new(2.54, SizeUnit::Cm).pixels(1.0, &font) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_units() {
        let font = Font::new("Arial", 20.0);
        assert_eq!(Size::em(1.5).pixels(1.0, &font), 30.0);
        assert_eq!(Size::ex(1.0).pixels(1.0, &font), 10.0);
        assert_eq!(Size::percent(50.0).pixels(20.0, &font), 10.0);
        assert!(Size::em(1.0).is_font_relative());
        assert!(!Size::percent(10.0).is_font_relative());
    }
}
