//! Entity identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier for a world entity.
///
/// Identifiers are allocated by the world and never reused within a session,
/// so a saved delta can refer to entities of the baseline world by id.
///
/// Index `0` is reserved for [`EntityId::LIMBO`], the root that holds
/// entities which are out of play.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(u64);

impl EntityId {
    /// The out-of-play root. Always exists, never has a location.
    pub const LIMBO: EntityId = EntityId(0);

    /// Creates an entity ID from a raw index.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }

    /// Returns true if this is the limbo root.
    #[must_use]
    pub const fn is_limbo(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_limbo() {
            write!(f, "EntityId(limbo)")
        } else {
            write!(f, "EntityId({})", self.0)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_limbo() {
            write!(f, "#limbo")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn index_round_trips(index in any::<u64>()) {
            prop_assert_eq!(EntityId::new(index).index(), index);
        }

        #[test]
        fn ordering_follows_index(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(EntityId::new(a).cmp(&EntityId::new(b)), a.cmp(&b));
        }
    }
}
