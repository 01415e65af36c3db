//! Entity records: a trait map plus per-room scope overrides.

use im::OrdMap;
use parlance_foundation::{EntityId, ScopeLevel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::{Actor, Identity, Room, Trait, TraitKind};

/// One entity's stored state, apart from its location.
///
/// Location lives in the world's containment index, so moving an entity
/// never touches this record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entity {
    id: EntityId,
    traits: OrdMap<TraitKind, Trait>,
    scope_overrides: OrdMap<EntityId, ScopeLevel>,
}

impl Entity {
    /// Creates an entity with no traits.
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            traits: OrdMap::new(),
            scope_overrides: OrdMap::new(),
        }
    }

    /// Returns the entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the trait stored under `kind`.
    #[must_use]
    pub fn get(&self, kind: &TraitKind) -> Option<&Trait> {
        self.traits.get(kind)
    }

    /// Returns true if the entity has a trait of `kind`.
    #[must_use]
    pub fn has(&self, kind: &TraitKind) -> bool {
        self.traits.contains_key(kind)
    }

    /// Iterates the entity's traits in kind order.
    pub fn traits(&self) -> impl Iterator<Item = &Trait> + '_ {
        self.traits.values()
    }

    /// Returns the entity's trait map.
    #[must_use]
    pub fn trait_map(&self) -> &OrdMap<TraitKind, Trait> {
        &self.traits
    }

    /// Returns the identity trait, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self.traits.get(&TraitKind::Identity) {
            Some(Trait::Identity(identity)) => Some(identity),
            _ => None,
        }
    }

    /// Returns the room trait, if any.
    #[must_use]
    pub fn room(&self) -> Option<&Room> {
        match self.traits.get(&TraitKind::Room) {
            Some(Trait::Room(room)) => Some(room),
            _ => None,
        }
    }

    /// Returns the actor trait, if any.
    #[must_use]
    pub fn actor(&self) -> Option<&Actor> {
        match self.traits.get(&TraitKind::Actor) {
            Some(Trait::Actor(actor)) => Some(actor),
            _ => None,
        }
    }

    /// Returns the entity's primary name, or `thing` if it has none.
    #[must_use]
    pub fn name(&self) -> &str {
        self.identity().map_or("thing", |id| id.name.as_str())
    }

    /// Returns the minimum scope level declared for observers in `room`.
    #[must_use]
    pub fn scope_override(&self, room: EntityId) -> Option<ScopeLevel> {
        self.scope_overrides.get(&room).copied()
    }

    /// Returns every declared scope override.
    #[must_use]
    pub fn scope_overrides(&self) -> &OrdMap<EntityId, ScopeLevel> {
        &self.scope_overrides
    }

    /// Returns a copy with `t` stored under its kind.
    #[must_use]
    pub(crate) fn with_trait(&self, t: Trait) -> Self {
        Self {
            traits: self.traits.update(t.kind(), t),
            ..self.clone()
        }
    }

    /// Returns a copy without the trait of `kind`.
    #[must_use]
    pub(crate) fn without_trait(&self, kind: &TraitKind) -> Self {
        Self {
            traits: self.traits.without(kind),
            ..self.clone()
        }
    }

    /// Returns a copy with the override for `room` set or cleared.
    #[must_use]
    pub(crate) fn with_scope_override(&self, room: EntityId, level: Option<ScopeLevel>) -> Self {
        let scope_overrides = match level {
            Some(level) => self.scope_overrides.update(room, level),
            None => self.scope_overrides.without(&room),
        };
        Self {
            scope_overrides,
            ..self.clone()
        }
    }
}
