//! # LCSS - the CSS object model behind Lumen styling
//!
//! `lcss` holds the pieces of CSS that the Lumen style engine consumes but
//! does not own: stylesheets built in code, selectors and their matching
//! rules, cascade ordering, parsed values and the converters that turn them
//! into typed values.
//!
//! Stylesheet text is never parsed here. Rules are assembled with builders:
//!
//! ```rust
//! use lcss::prelude::*;
//!
//! let sheet = Stylesheet::new(StyleOrigin::Author)
//!     .with_url("app.css")
//!     .rule(
//!         Rule::new(CompoundSelector::of_class("button").pseudo(PseudoClass::HOVER).into())
//!             .declare("text-fill", ParsedValue::Color(Color::rgb(255, 0, 0))),
//!     );
//!
//! assert_eq!(sheet.rules.len(), 1);
//! ```
//!
//! ## Modules
//!
//! - [`pseudo_class`]: interned pseudo-classes and 64-bit pseudo-class sets
//! - [`stylesheet`]: origins, rules, selectors, cascading styles and style maps
//! - [`value`]: parsed value trees, including named lookups
//! - [`converter`]: conversion of parsed values into [`StyledValue`]s
//! - [`calculated`]: resolved values and the tri-state [`Lookup`] result
//! - [`types`]: colors, fonts, sizes and insets
//! - [`error`]: the [`CssError`] type shared by every stage

pub mod calculated;
pub mod converter;
pub mod error;
pub mod pseudo_class;
pub mod stylesheet;
pub mod types;
pub mod value;

pub use calculated::{CalculatedValue, Lookup};
pub use converter::{Converter, StyledValue};
pub use error::{CssError, Result};
pub use pseudo_class::{PseudoClass, PseudoClassState};
pub use stylesheet::cascade::{CascadingStyle, StyleMap};
pub use stylesheet::selectors::{
    Combinator, ComplexSelector, CompoundSelector, MetaChain, NodeMeta, Selectable, Selector,
    SelectorPart, Specificity,
};
pub use stylesheet::{Declaration, Rule, Style, StyleOrigin, Stylesheet};
pub use types::{Color, Font, FontPosture, FontWeight, Insets, Size, SizeUnit};
pub use value::{FontShorthand, ParsedValue};

/// Everything needed to assemble stylesheets by hand.
pub mod prelude {
    pub use crate::stylesheet::selectors::{ComplexSelector, CompoundSelector};
    pub use crate::stylesheet::{Rule, StyleOrigin, Stylesheet};
    pub use crate::types::{Color, Font, FontPosture, FontWeight, Size};
    pub use crate::value::ParsedValue;
    pub use crate::{PseudoClass, PseudoClassState};
}
