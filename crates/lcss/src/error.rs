//! Error types for value conversion and style resolution.
//!
//! Every failure the style engine can recover from is expressed as a
//! [`CssError`]. None of them abort styling of a tree: the engine reports
//! them and treats the affected property as unstyled.

use thiserror::Error;

/// Errors raised while resolving or converting CSS values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    /// A parsed value could not be converted to the property's type.
    #[error("cannot convert {found} to {expected}")]
    Conversion {
        /// Name of the target type.
        expected: &'static str,
        /// Rendering of the offending value.
        found: String,
    },

    /// A value was structurally wrong for the converter (wrong arity, out of range).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A named lookup did not resolve to any declaration.
    ///
    /// The string is the lookup name.
    #[error("missing value for '{0}'")]
    MissingValue(String),

    /// A lookup chain referenced itself.
    #[error("Loop detected in {rule} while resolving '{lookup}'")]
    LookupCycle {
        /// The rule whose value started the chain.
        rule: String,
        /// The lookup name seen twice.
        lookup: String,
    },

    /// The property rejected a value when it was applied.
    #[error("{property} rejected value: {reason}")]
    PropertySet { property: String, reason: String },

    /// The process-wide pseudo-class registry has no free slot left.
    #[error("pseudo-class registry is full ({0} classes)")]
    PseudoClassLimit(usize),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CssError>;
