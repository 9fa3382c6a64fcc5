//! Typed values produced by conversion: colors, fonts, sizes and insets.

pub mod color;
pub mod font;
pub mod geometry;

pub use color::Color;
pub use font::{Font, FontPosture, FontWeight};
pub use geometry::{Insets, Size, SizeUnit};
