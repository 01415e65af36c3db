//! Convenience wrapper for building a story world step by step.

use parlance_foundation::{Direction, EntityId, Error, Result};

use crate::traits::{Identity, Room, Trait, TraitKind};
use crate::world::World;

/// Accumulates world-building calls on a mutable handle.
///
/// Each call goes through the same checked `World` operations that events
/// use, so a story cannot build a world that violates containment rules.
#[derive(Clone, Debug, Default)]
pub struct WorldBuilder {
    world: World,
}

impl WorldBuilder {
    /// Starts from an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a lit room.
    ///
    /// # Errors
    ///
    /// Currently infallible for a well-formed builder.
    pub fn room(&mut self, name: &str, description: &str) -> Result<EntityId> {
        let (world, id) = self.world.spawn([
            Trait::Identity(Identity::new(name).proper().with_description(description)),
            Trait::Room(Room::new()),
        ])?;
        self.world = world;
        Ok(id)
    }

    /// Adds an entity inside `location`.
    ///
    /// # Errors
    ///
    /// Fails as [`World::spawn_in`] does.
    pub fn add(
        &mut self,
        traits: impl IntoIterator<Item = Trait>,
        location: EntityId,
    ) -> Result<EntityId> {
        let (world, id) = self.world.spawn_in(traits, location)?;
        self.world = world;
        Ok(id)
    }

    /// Adds a named thing with no other traits inside `location`.
    ///
    /// # Errors
    ///
    /// Fails as [`World::spawn_in`] does.
    pub fn thing(&mut self, identity: Identity, location: EntityId) -> Result<EntityId> {
        self.add([Trait::Identity(identity)], location)
    }

    /// Adds or replaces a trait on an existing entity.
    ///
    /// # Errors
    ///
    /// Fails as [`World::set_trait`] does.
    pub fn with(&mut self, entity: EntityId, t: Trait) -> Result<&mut Self> {
        self.world = self.world.set_trait(entity, t)?;
        Ok(self)
    }

    /// Joins two rooms with exits both ways.
    ///
    /// # Errors
    ///
    /// Returns `MissingTrait` if either entity is not a room.
    pub fn connect(&mut self, from: EntityId, direction: Direction, to: EntityId) -> Result<()> {
        self.add_exit(from, direction, to)?;
        self.add_exit(to, direction.opposite(), from)
    }

    fn add_exit(&mut self, room: EntityId, direction: Direction, to: EntityId) -> Result<()> {
        let updated = match self.world.get_trait(room, &TraitKind::Room) {
            Some(Trait::Room(r)) => r.clone().with_exit(direction, to),
            _ => return Err(Error::missing_trait(room, TraitKind::Room.name())),
        };
        self.world = self.world.set_trait(room, Trait::Room(updated))?;
        Ok(())
    }

    /// Returns the world built so far.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Finishes building.
    #[must_use]
    pub fn build(self) -> World {
        self.world
    }
}
