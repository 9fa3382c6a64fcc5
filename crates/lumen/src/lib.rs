//! # Lumen - CSS style resolution for scene graphs
//!
//! Lumen applies [`lcss`] stylesheets to a tree of styleable nodes. Every
//! node that styles can reach gets a [`StyleHelper`]; the helper resolves
//! each property against the cascade, follows named lookups, inherits from
//! ancestors, assembles fonts from the `font` shorthand and its longhands,
//! and writes the winners back to the node.
//!
//! Resolved values are shared: nodes whose own style map and styled
//! ancestors' maps match share one [`StyleCache`], keyed further by the
//! pseudo-classes that can affect them and their reference font.
//!
//! ```rust
//! use lcss::prelude::*;
//! use lumen::{Scene, StyleManager, StyleableNode, process_css};
//!
//! let mut manager = StyleManager::default();
//! let mut scene = Scene::new();
//! manager.add_stylesheet(
//!     &mut scene,
//!     Stylesheet::new(StyleOrigin::Author).rule(
//!         Rule::new(CompoundSelector::of_type("Label").into())
//!             .declare("text-fill", ParsedValue::Color(Color::WHITE)),
//!     ),
//! );
//! let label = scene.add_root(StyleableNode::labeled("Label"));
//! process_css(&mut manager, &mut scene);
//!
//! assert!(scene.style_helper(label).is_some());
//! ```

pub mod error;
mod log_init;
pub mod property;
pub mod scene;
pub mod style_cache;
pub mod style_helper;
pub mod style_manager;
pub mod style_resolver;
pub mod styleable;

pub use error::{LumenError, Result};
pub use log_init::init_logger;
pub use property::{CssMetaData, PropertySlot};
pub use scene::{CssFlags, NodeId, Scene};
pub use style_cache::{StyleCache, StyleCacheEntry, StyleCacheEntryKey, StyleCacheKey};
pub use style_helper::{
    CacheContainer, StyleHelper, create_style_helper, matching_styles, matching_styles_map,
    recalculate_relative_size_properties, transition_states, transition_to_state,
};
pub use style_manager::{CssErrorReport, StyleConfig, StyleManager};
pub use style_resolver::process_css;
pub use styleable::{Styleable, StyleableNode, Validator};

// Re-export the log crate so users can use lumen::log::info!, etc.
pub use log;
