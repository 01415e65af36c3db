//! Graded perception levels.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How well an observer can perceive and interact with a target.
///
/// The levels are totally ordered, so threshold checks compose:
/// `Carried` implies `Reachable`, which implies `Visible`, which implies
/// `Aware`. A level is computed for an (observer, target) pair on demand and
/// is never stored on the entity itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScopeLevel {
    /// Not perceivable at all.
    #[default]
    Unaware,
    /// Known to be present through sound or smell, but not seen.
    Aware,
    /// Seen, but out of reach.
    Visible,
    /// Seen and touchable.
    Reachable,
    /// Held directly by the observer.
    Carried,
}

impl ScopeLevel {
    /// Every level, lowest first.
    pub const ALL: [ScopeLevel; 5] = [
        ScopeLevel::Unaware,
        ScopeLevel::Aware,
        ScopeLevel::Visible,
        ScopeLevel::Reachable,
        ScopeLevel::Carried,
    ];

    /// Returns true if this level meets `threshold`.
    #[must_use]
    pub fn at_least(self, threshold: ScopeLevel) -> bool {
        self >= threshold
    }

    /// Returns the lowercase name of the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unaware => "unaware",
            Self::Aware => "aware",
            Self::Visible => "visible",
            Self::Reachable => "reachable",
            Self::Carried => "carried",
        }
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
