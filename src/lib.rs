//! # lumen-rs
//!
//! CSS style resolution for scene graphs.
//!
//! - [`lcss`]: the CSS object model (stylesheets, selectors, cascade order,
//!   values and converters)
//! - [`lumen`]: style helpers, shared value caches and the styling pulse
//!
//! ```rust
//! use lumen_rs::lcss::prelude::*;
//! use lumen_rs::lumen::{Scene, StyleManager, StyleableNode, process_css};
//!
//! let mut manager = StyleManager::default();
//! let mut scene = Scene::new();
//! manager.add_stylesheet(
//!     &mut scene,
//!     Stylesheet::new(StyleOrigin::Author).rule(
//!         Rule::new(CompoundSelector::of_type("Label").into())
//!             .declare("opacity", ParsedValue::Number(0.5)),
//!     ),
//! );
//! let label = scene.add_root(StyleableNode::labeled("Label"));
//! process_css(&mut manager, &mut scene);
//! assert!(scene.styleable(label).property("opacity").is_some());
//! ```

pub use lcss;
pub use lumen;
