//! Pseudo-classes and pseudo-class sets.
//!
//! A [`PseudoClass`] is a small index into a process-wide registry of names,
//! so sets of them fit in a single `u64` ([`PseudoClassState`]). The first
//! eight indices are reserved for the well-known classes below; custom
//! classes are appended on first use.

use std::fmt;
use std::sync::RwLock;

use bitflags::bitflags;
use once_cell::sync::Lazy;

use crate::error::{CssError, Result};

/// Maximum number of distinct pseudo-classes a process can register.
pub const MAX_PSEUDO_CLASSES: usize = 64;

const WELL_KNOWN: [&str; 8] = [
    "hover",
    "focused",
    "pressed",
    "armed",
    "selected",
    "disabled",
    "focus-visible",
    "showing",
];

static REGISTRY: Lazy<RwLock<Vec<String>>> =
    Lazy::new(|| RwLock::new(WELL_KNOWN.iter().map(|s| s.to_string()).collect()));

bitflags! {
    /// A set of pseudo-classes, one bit per registered class.
    ///
    /// Bits for custom classes are created with [`PseudoClass::state`] and
    /// survive every set operation except complement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PseudoClassState: u64 {
        const HOVER = 1 << 0;
        const FOCUSED = 1 << 1;
        const PRESSED = 1 << 2;
        const ARMED = 1 << 3;
        const SELECTED = 1 << 4;
        const DISABLED = 1 << 5;
        const FOCUS_VISIBLE = 1 << 6;
        const SHOWING = 1 << 7;
    }
}

impl PseudoClassState {
    /// Returns `true` if `pseudo_class` is in the set.
    pub fn has(&self, pseudo_class: PseudoClass) -> bool {
        self.contains(pseudo_class.state())
    }

    /// Returns a copy of the set with `pseudo_class` added.
    pub fn with(self, pseudo_class: PseudoClass) -> Self {
        self.union(pseudo_class.state())
    }

    /// Names of the classes in the set, in registry order.
    pub fn names(&self) -> Vec<String> {
        let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        (0..MAX_PSEUDO_CLASSES)
            .filter(|i| self.bits() & (1u64 << i) != 0)
            .map(|i| {
                registry
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("#{i}"))
            })
            .collect()
    }
}

impl From<PseudoClass> for PseudoClassState {
    fn from(pseudo_class: PseudoClass) -> Self {
        pseudo_class.state()
    }
}

/// An interned pseudo-class such as `:hover`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PseudoClass {
    index: u8,
}

impl PseudoClass {
    pub const HOVER: Self = Self { index: 0 };
    pub const FOCUSED: Self = Self { index: 1 };
    pub const PRESSED: Self = Self { index: 2 };
    pub const ARMED: Self = Self { index: 3 };
    pub const SELECTED: Self = Self { index: 4 };
    pub const DISABLED: Self = Self { index: 5 };
    pub const FOCUS_VISIBLE: Self = Self { index: 6 };
    pub const SHOWING: Self = Self { index: 7 };

    /// Returns the pseudo-class registered under `name`, registering it if needed.
    ///
    /// Names are case-insensitive. Fails once [`MAX_PSEUDO_CLASSES`] classes exist.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim_start_matches(':').to_ascii_lowercase();
        {
            let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
            if let Some(index) = registry.iter().position(|n| *n == name) {
                return Ok(Self { index: index as u8 });
            }
        }

        let mut registry = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have registered it between the two locks.
        if let Some(index) = registry.iter().position(|n| *n == name) {
            return Ok(Self { index: index as u8 });
        }
        if registry.len() >= MAX_PSEUDO_CLASSES {
            return Err(CssError::PseudoClassLimit(MAX_PSEUDO_CLASSES));
        }
        registry.push(name);
        Ok(Self {
            index: (registry.len() - 1) as u8,
        })
    }

    /// Position of this class in the registry.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// The registered name, without the leading colon.
    pub fn name(&self) -> String {
        let registry = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
        registry
            .get(self.index())
            .cloned()
            .unwrap_or_else(|| format!("#{}", self.index))
    }

    /// The single-member set containing this class.
    pub fn state(&self) -> PseudoClassState {
        PseudoClassState::from_bits_retain(1u64 << self.index)
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}
