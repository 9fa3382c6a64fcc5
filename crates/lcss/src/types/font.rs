//! Fonts and the keyword tables for weight and posture.

use std::fmt;
use std::hash::{Hash, Hasher};

use phf::phf_map;

/// Font weight on the CSS 100..=900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FontWeight {
    Thin,
    ExtraLight,
    Light,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
}

static WEIGHT_KEYWORDS: phf::Map<&'static str, FontWeight> = phf_map! {
    "thin" => FontWeight::Thin,
    "extra-light" => FontWeight::ExtraLight,
    "ultra-light" => FontWeight::ExtraLight,
    "light" => FontWeight::Light,
    "normal" => FontWeight::Normal,
    "regular" => FontWeight::Normal,
    "medium" => FontWeight::Medium,
    "semi-bold" => FontWeight::SemiBold,
    "demi-bold" => FontWeight::SemiBold,
    "bold" => FontWeight::Bold,
    "extra-bold" => FontWeight::ExtraBold,
    "ultra-bold" => FontWeight::ExtraBold,
    "black" => FontWeight::Black,
    "heavy" => FontWeight::Black,
};

impl FontWeight {
    const ALL: [FontWeight; 9] = [
        FontWeight::Thin,
        FontWeight::ExtraLight,
        FontWeight::Light,
        FontWeight::Normal,
        FontWeight::Medium,
        FontWeight::SemiBold,
        FontWeight::Bold,
        FontWeight::ExtraBold,
        FontWeight::Black,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        WEIGHT_KEYWORDS
            .get(keyword.to_ascii_lowercase().as_str())
            .copied()
    }

    /// Maps a numeric weight to the nearest named weight.
    pub fn from_weight(weight: f64) -> Option<Self> {
        if !(1.0..=1000.0).contains(&weight) {
            return None;
        }
        let index = ((weight / 100.0).round() as usize).clamp(1, 9) - 1;
        Some(Self::ALL[index])
    }

    pub fn weight(&self) -> u16 {
        (*self as u16 + 1) * 100
    }
}

/// Upright or slanted glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontPosture {
    #[default]
    Regular,
    Italic,
}

impl FontPosture {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Some(Self::Regular),
            "italic" | "oblique" => Some(Self::Italic),
            _ => None,
        }
    }
}

/// A resolved font.
///
/// Equality and hashing use the exact bit pattern of `size`, so fonts can key
/// caches.
#[derive(Debug, Clone)]
pub struct Font {
    pub family: String,
    pub weight: FontWeight,
    pub posture: FontPosture,
    /// Size in pixels.
    pub size: f64,
}

impl Font {
    pub const DEFAULT_FAMILY: &'static str = "System";
    pub const DEFAULT_SIZE: f64 = 13.0;

    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Normal,
            posture: FontPosture::Regular,
            size,
        }
    }

    pub fn font(
        family: impl Into<String>,
        weight: FontWeight,
        posture: FontPosture,
        size: f64,
    ) -> Self {
        Self {
            family: family.into(),
            weight,
            posture,
            size,
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FAMILY, Self::DEFAULT_SIZE)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.weight == other.weight
            && self.posture == other.posture
            && self.size.to_bits() == other.size.to_bits()
    }
}

impl Eq for Font {}

impl Hash for Font {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.weight.hash(state);
        self.posture.hash(state);
        self.size.to_bits().hash(state);
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Font[family={}, weight={}, posture={:?}, size={}]",
            self.family,
            self.weight.weight(),
            self.posture,
            self.size
        )
    }
}
