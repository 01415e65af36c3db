//! Snapshots and save deltas.
//!
//! A save stores only what changed since the baseline world, the state
//! right after story initialization. Restoring replays that delta onto the
//! same baseline.

use std::collections::{BTreeMap, BTreeSet};

use im::OrdMap;
use parlance_foundation::{EntityId, Error, ErrorKind, Result, ScopeLevel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::traits::{Trait, TraitKind};
use crate::world::World;

/// The mutable state of a world at one moment.
///
/// Two snapshots compare equal when every entity has the same traits,
/// overrides, and location. Placement order within a container is not part
/// of the comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    entities: OrdMap<EntityId, Entity>,
    locations: OrdMap<EntityId, EntityId>,
}

/// A change to one trait of one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraitChange {
    /// The trait was added or its fields changed.
    Set(Trait),
    /// The trait was removed.
    Removed(TraitKind),
}

/// Everything that differs between a snapshot and its baseline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SaveDelta {
    /// Entities created after the baseline, with their traits.
    pub added: BTreeMap<EntityId, Vec<Trait>>,
    /// Entities whose location changed, with the new location.
    pub moved: BTreeMap<EntityId, EntityId>,
    /// Per-entity trait changes.
    pub traits: BTreeMap<EntityId, Vec<TraitChange>>,
    /// Per-entity scope override changes, keyed by room. `None` clears.
    pub overrides: BTreeMap<EntityId, Vec<(EntityId, Option<ScopeLevel>)>>,
    /// Entities that no longer exist.
    pub removed: BTreeSet<EntityId>,
}

impl SaveDelta {
    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.moved.is_empty()
            && self.traits.is_empty()
            && self.overrides.is_empty()
            && self.removed.is_empty()
    }
}

impl Snapshot {
    /// Returns the number of entities captured, including limbo.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the snapshot holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Computes what changed between `baseline` and this snapshot.
    #[must_use]
    pub fn delta_from(&self, baseline: &Snapshot) -> SaveDelta {
        let mut delta = SaveDelta::default();

        for (id, entity) in &self.entities {
            match baseline.entities.get(id) {
                None => {
                    delta
                        .added
                        .insert(*id, entity.traits().cloned().collect());
                    if let Some(location) = self.locations.get(id) {
                        delta.moved.insert(*id, *location);
                    }
                    let overrides: Vec<_> = entity
                        .scope_overrides()
                        .iter()
                        .map(|(room, level)| (*room, Some(*level)))
                        .collect();
                    if !overrides.is_empty() {
                        delta.overrides.insert(*id, overrides);
                    }
                }
                Some(old) => {
                    let changes = trait_changes(old, entity);
                    if !changes.is_empty() {
                        delta.traits.insert(*id, changes);
                    }
                    let overrides = override_changes(old, entity);
                    if !overrides.is_empty() {
                        delta.overrides.insert(*id, overrides);
                    }
                    let was = baseline.locations.get(id);
                    let now = self.locations.get(id);
                    if was != now {
                        if let Some(now) = now {
                            delta.moved.insert(*id, *now);
                        }
                    }
                }
            }
        }

        for id in baseline.entities.keys() {
            if !self.entities.contains_key(id) {
                delta.removed.insert(*id);
            }
        }

        delta
    }
}

fn trait_changes(old: &Entity, new: &Entity) -> Vec<TraitChange> {
    let mut changes = Vec::new();
    for t in new.traits() {
        if old.get(&t.kind()) != Some(t) {
            changes.push(TraitChange::Set(t.clone()));
        }
    }
    for t in old.traits() {
        let kind = t.kind();
        if !new.has(&kind) {
            changes.push(TraitChange::Removed(kind));
        }
    }
    changes
}

fn override_changes(old: &Entity, new: &Entity) -> Vec<(EntityId, Option<ScopeLevel>)> {
    let mut changes = Vec::new();
    for (room, level) in new.scope_overrides() {
        if old.scope_override(*room) != Some(*level) {
            changes.push((*room, Some(*level)));
        }
    }
    for room in old.scope_overrides().keys() {
        if new.scope_override(*room).is_none() {
            changes.push((*room, None));
        }
    }
    changes
}

fn mismatch(message: String) -> Error {
    Error::new(ErrorKind::BaselineMismatch(message))
}

impl World {
    /// Captures the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entities: self.entity_map().clone(),
            locations: self.location_map().clone(),
        }
    }

    /// Rebuilds the world a delta was taken from.
    ///
    /// # Errors
    ///
    /// Returns `BaselineMismatch` if the delta refers to an entity, trait, or
    /// location the baseline (plus the delta's own additions) does not have,
    /// and `ContainmentCycle` if the restored forest would not be rooted.
    pub fn restore(baseline: &World, delta: &SaveDelta) -> Result<World> {
        let mut world = baseline.clone();

        for (id, traits) in &delta.added {
            if world.exists(*id) {
                return Err(mismatch(format!("{id} added but already in baseline")));
            }
            world = world.insert_entity(*id, traits.iter().cloned());
        }

        for (id, changes) in &delta.traits {
            if !world.exists(*id) {
                return Err(mismatch(format!("trait change for unknown {id}")));
            }
            for change in changes {
                world = match change {
                    TraitChange::Set(t) => world.set_trait(*id, t.clone())?,
                    TraitChange::Removed(kind) => world
                        .remove_trait(*id, kind)
                        .map_err(|_| mismatch(format!("{id} has no {kind} to remove")))?,
                };
            }
        }

        for (id, changes) in &delta.overrides {
            for (room, level) in changes {
                world = world
                    .set_scope_override(*id, *room, *level)
                    .map_err(|_| mismatch(format!("override for unknown {id} or {room}")))?;
            }
        }

        for (id, destination) in &delta.moved {
            if !world.exists(*id) || !world.exists(*destination) {
                return Err(mismatch(format!("{id} moved to unknown {destination}")));
            }
            world = world.relocate(*id, *destination);
        }
        for id in delta.moved.keys() {
            world.check_rooted(*id)?;
        }

        for id in &delta.removed {
            world = world
                .remove(*id)
                .map_err(|_| mismatch(format!("removed entity {id} not in baseline")))?;
        }

        Ok(world)
    }
}
