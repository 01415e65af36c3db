//! World state with immutable snapshots.
//!
//! The `World` is the canonical store of entities, traits, and containment.
//! It uses persistent data structures, so cloning is O(1) and every mutation
//! returns a new `World` that shares structure with the old one. A failed
//! mutation leaves the original untouched, which is what lets event
//! application reject an event without rolling anything back.

use im::{OrdMap, OrdSet, Vector};
use parlance_foundation::{EntityId, Error, ErrorKind, Result, ScopeLevel, Value};

use crate::entity::Entity;
use crate::traits::{Identity, Trait, TraitKind};

/// The canonical entity store.
#[derive(Clone, Debug)]
pub struct World {
    /// Every entity, including limbo.
    entities: OrdMap<EntityId, Entity>,
    /// Child -> parent. Roots have no entry.
    locations: OrdMap<EntityId, EntityId>,
    /// Parent -> children, in placement order.
    contents: OrdMap<EntityId, Vector<EntityId>>,
    /// Trait kind -> entities carrying it.
    trait_index: OrdMap<TraitKind, OrdSet<EntityId>>,
    /// Next index to allocate.
    next_id: u64,
}

impl World {
    /// Creates a world that holds only the limbo root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: OrdMap::unit(EntityId::LIMBO, Entity::new(EntityId::LIMBO)),
            locations: OrdMap::new(),
            contents: OrdMap::new(),
            trait_index: OrdMap::new(),
            next_id: 1,
        }
    }

    /// Returns the number of entities, not counting limbo.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len() - 1
    }

    /// Checks if an entity exists.
    #[must_use]
    pub fn exists(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Iterates all entity ids in id order, not counting limbo.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied().filter(|id| !id.is_limbo())
    }

    /// Returns an entity's record.
    #[must_use]
    pub fn entity(&self, entity: EntityId) -> Option<&Entity> {
        self.entities.get(&entity)
    }

    fn require(&self, entity: EntityId) -> Result<&Entity> {
        self.entities
            .get(&entity)
            .ok_or_else(|| Error::entity_not_found(entity))
    }

    // --- Trait Queries ---

    /// Gets a trait of an entity.
    #[must_use]
    pub fn get_trait(&self, entity: EntityId, kind: &TraitKind) -> Option<&Trait> {
        self.entities.get(&entity).and_then(|e| e.get(kind))
    }

    /// Checks if an entity has a trait.
    #[must_use]
    pub fn has_trait(&self, entity: EntityId, kind: &TraitKind) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.has(kind))
    }

    /// Gets an entity's identity trait.
    #[must_use]
    pub fn identity(&self, entity: EntityId) -> Option<&Identity> {
        self.entities.get(&entity).and_then(Entity::identity)
    }

    /// Returns an entity's primary name, or `thing` if it has none.
    #[must_use]
    pub fn name(&self, entity: EntityId) -> &str {
        self.entities.get(&entity).map_or("thing", Entity::name)
    }

    /// Reads a trait field.
    #[must_use]
    pub fn field(&self, entity: EntityId, kind: &TraitKind, field: &str) -> Option<Value> {
        self.get_trait(entity, kind).and_then(|t| t.field(field))
    }

    /// Reads a boolean trait field, treating anything else as false.
    #[must_use]
    pub fn flag(&self, entity: EntityId, kind: &TraitKind, field: &str) -> bool {
        self.field(entity, kind, field)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Checks if an entity is a room.
    #[must_use]
    pub fn is_room(&self, entity: EntityId) -> bool {
        self.has_trait(entity, &TraitKind::Room)
    }

    /// Iterates the entities carrying a trait, in id order.
    pub fn with_trait<'a>(&'a self, kind: &TraitKind) -> impl Iterator<Item = EntityId> + use<'a> {
        self.trait_index
            .get(kind)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Returns the minimum scope level `entity` declares for observers in `room`.
    #[must_use]
    pub fn scope_override(&self, entity: EntityId, room: EntityId) -> Option<ScopeLevel> {
        self.entities
            .get(&entity)
            .and_then(|e| e.scope_override(room))
    }

    // --- Containment Queries ---

    /// Returns an entity's direct location. Roots have none.
    #[must_use]
    pub fn location(&self, entity: EntityId) -> Option<EntityId> {
        self.locations.get(&entity).copied()
    }

    /// Iterates an entity's direct contents in placement order.
    pub fn contents(&self, entity: EntityId) -> impl Iterator<Item = EntityId> + '_ {
        self.contents
            .get(&entity)
            .into_iter()
            .flat_map(|children| children.iter().copied())
    }

    /// Returns every entity inside `entity`, at any depth, breadth first.
    #[must_use]
    pub fn descendants(&self, entity: EntityId) -> Vec<EntityId> {
        let mut found: Vec<EntityId> = self.contents(entity).collect();
        let mut i = 0;
        while i < found.len() {
            let next = found[i];
            found.extend(self.contents(next));
            i += 1;
        }
        found
    }

    /// Iterates the containment chain above `entity`, nearest first.
    #[must_use]
    pub fn ancestors(&self, entity: EntityId) -> Ancestors<'_> {
        Ancestors {
            world: self,
            current: entity,
            remaining: self.entities.len(),
        }
    }

    /// Returns the room that (transitively) contains `entity`.
    ///
    /// A room is its own containing room.
    #[must_use]
    pub fn containing_room(&self, entity: EntityId) -> Option<EntityId> {
        if self.is_room(entity) {
            return Some(entity);
        }
        self.ancestors(entity).find(|&a| self.is_room(a))
    }

    /// Checks if `entity` is somewhere inside `ancestor`.
    #[must_use]
    pub fn is_within(&self, entity: EntityId, ancestor: EntityId) -> bool {
        self.ancestors(entity).any(|a| a == ancestor)
    }

    /// Returns the declared capacity of a container or supporter.
    #[must_use]
    pub fn capacity(&self, entity: EntityId) -> Option<u32> {
        match self.get_trait(entity, &TraitKind::Container) {
            Some(Trait::Container(c)) => c.capacity,
            _ => match self.get_trait(entity, &TraitKind::Supporter) {
                Some(Trait::Supporter(s)) => s.capacity,
                _ => None,
            },
        }
    }

    // --- Mutations ---

    /// Spawns a new entity with the given traits.
    ///
    /// Rooms become containment roots; anything else starts in limbo.
    /// Returns a new World and the spawned entity ID.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the signature in line with
    /// [`World::spawn_in`].
    pub fn spawn(&self, traits: impl IntoIterator<Item = Trait>) -> Result<(World, EntityId)> {
        let id = EntityId::new(self.next_id);
        let mut world = self.insert_entity(id, traits);
        world.next_id = self.next_id + 1;
        Ok((world, id))
    }

    /// Spawns a new entity directly inside `location`.
    ///
    /// # Errors
    ///
    /// Fails as [`World::move_entity`] does for the new entity.
    pub fn spawn_in(
        &self,
        traits: impl IntoIterator<Item = Trait>,
        location: EntityId,
    ) -> Result<(World, EntityId)> {
        let (world, id) = self.spawn(traits)?;
        let world = world.move_entity(id, location)?;
        Ok((world, id))
    }

    /// Inserts an entity under a fixed id. Used by spawning and restore.
    pub(crate) fn insert_entity(&self, id: EntityId, traits: impl IntoIterator<Item = Trait>) -> World {
        let mut entity = Entity::new(id);
        for t in traits {
            entity = entity.with_trait(t);
        }
        let mut world = self.clone();
        for t in entity.traits() {
            world.index_trait(t.kind(), id);
        }
        if !entity.has(&TraitKind::Room) {
            world = world.relocate(id, EntityId::LIMBO);
        }
        world.entities.insert(id, entity);
        world.next_id = world.next_id.max(id.index() + 1);
        world
    }

    /// Moves an entity to a new location.
    ///
    /// # Errors
    ///
    /// Fails if either entity is missing, if the entity is a room or limbo,
    /// if the destination is the entity itself or inside it, or if the
    /// destination is full.
    pub fn move_entity(&self, entity: EntityId, destination: EntityId) -> Result<World> {
        self.require(entity)?;
        self.require(destination)?;
        if entity.is_limbo() || self.is_room(entity) {
            return Err(Error::new(ErrorKind::NotMovable(entity)));
        }
        if entity == destination || self.is_within(destination, entity) {
            return Err(Error::new(ErrorKind::ContainmentCycle {
                entity,
                destination,
            }));
        }
        if self.location(entity) == Some(destination) {
            return Ok(self.clone());
        }
        if let Some(capacity) = self.capacity(destination) {
            let held = self.contents(destination).count();
            if held >= capacity as usize {
                return Err(Error::new(ErrorKind::CapacityExceeded {
                    container: destination,
                    capacity,
                }));
            }
        }
        Ok(self.relocate(entity, destination))
    }

    /// Moves without checking invariants.
    pub(crate) fn relocate(&self, entity: EntityId, destination: EntityId) -> World {
        let mut world = self.clone();
        if let Some(old) = world.locations.get(&entity).copied() {
            world.detach(entity, old);
        }
        world.locations.insert(entity, destination);
        let mut children = world.contents.get(&destination).cloned().unwrap_or_default();
        children.push_back(entity);
        world.contents.insert(destination, children);
        world
    }

    fn detach(&mut self, entity: EntityId, parent: EntityId) {
        if let Some(children) = self.contents.get(&parent) {
            let mut children = children.clone();
            if let Some(pos) = children.iter().position(|&c| c == entity) {
                children.remove(pos);
            }
            if children.is_empty() {
                self.contents.remove(&parent);
            } else {
                self.contents.insert(parent, children);
            }
        }
        self.locations.remove(&entity);
    }

    /// Removes an entity from the world. Its contents fall to limbo.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for unknown entities and `NotMovable` for limbo.
    pub fn remove(&self, entity: EntityId) -> Result<World> {
        let record = self.require(entity)?;
        if entity.is_limbo() {
            return Err(Error::new(ErrorKind::NotMovable(entity)));
        }
        let mut world = self.clone();
        for child in self.contents(entity).collect::<Vec<_>>() {
            world = world.relocate(child, EntityId::LIMBO);
        }
        if let Some(parent) = world.location(entity) {
            world.detach(entity, parent);
        }
        for t in record.traits() {
            world.unindex_trait(&t.kind(), entity);
        }
        world.entities.remove(&entity);
        Ok(world)
    }

    /// Adds or replaces a trait.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` for unknown entities, and `NotMovable` when
    /// making a placed entity into a room.
    pub fn set_trait(&self, entity: EntityId, t: Trait) -> Result<World> {
        let record = self.require(entity)?;
        let kind = t.kind();
        if kind == TraitKind::Room && !record.has(&TraitKind::Room) {
            if let Some(parent) = self.location(entity) {
                if !parent.is_limbo() {
                    return Err(Error::new(ErrorKind::NotMovable(entity)));
                }
            }
        }
        let updated = record.with_trait(t);
        let mut world = self.clone();
        world.index_trait(kind.clone(), entity);
        if kind == TraitKind::Room {
            if let Some(parent) = world.location(entity) {
                world.detach(entity, parent);
            }
        }
        world.entities.insert(entity, updated);
        Ok(world)
    }

    /// Removes a trait.
    ///
    /// # Errors
    ///
    /// Returns `MissingTrait` if the entity does not have it.
    pub fn remove_trait(&self, entity: EntityId, kind: &TraitKind) -> Result<World> {
        let record = self.require(entity)?;
        if !record.has(kind) {
            return Err(Error::missing_trait(entity, kind.name()));
        }
        let updated = record.without_trait(kind);
        let mut world = self.clone();
        world.unindex_trait(kind, entity);
        world.entities.insert(entity, updated);
        if *kind == TraitKind::Room {
            world = world.relocate(entity, EntityId::LIMBO);
        }
        Ok(world)
    }

    /// Sets one field of a trait.
    ///
    /// # Errors
    ///
    /// Returns `MissingTrait` if the entity lacks the trait, or a field error
    /// if the trait has no such field or the value has the wrong type.
    pub fn set_field(
        &self,
        entity: EntityId,
        kind: &TraitKind,
        field: &str,
        value: Value,
    ) -> Result<World> {
        let record = self.require(entity)?;
        let current = record
            .get(kind)
            .ok_or_else(|| Error::missing_trait(entity, kind.name()))?;
        let updated = current.with_field(field, value)?;
        let mut world = self.clone();
        world.entities.insert(entity, record.with_trait(updated));
        Ok(world)
    }

    /// Adds `delta` to an integer trait field.
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` or `FieldType` unless the field holds an integer.
    pub fn adjust(&self, entity: EntityId, kind: &TraitKind, field: &str, delta: i64) -> Result<World> {
        self.require(entity)?;
        let current = self
            .field(entity, kind, field)
            .ok_or_else(|| Error::unknown_field(kind.name(), field))?;
        let n = current
            .as_int()
            .ok_or_else(|| Error::field_type(field, "int", current.type_name()))?;
        self.set_field(entity, kind, field, Value::Int(n.saturating_add(delta)))
    }

    /// Sets or clears the minimum scope level `entity` has for observers in `room`.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound` if either entity is unknown.
    pub fn set_scope_override(
        &self,
        entity: EntityId,
        room: EntityId,
        level: Option<ScopeLevel>,
    ) -> Result<World> {
        let record = self.require(entity)?;
        self.require(room)?;
        let mut world = self.clone();
        world
            .entities
            .insert(entity, record.with_scope_override(room, level));
        Ok(world)
    }

    fn index_trait(&mut self, kind: TraitKind, entity: EntityId) {
        let set = self.trait_index.get(&kind).cloned().unwrap_or_default();
        self.trait_index.insert(kind, set.update(entity));
    }

    fn unindex_trait(&mut self, kind: &TraitKind, entity: EntityId) {
        if let Some(set) = self.trait_index.get(kind) {
            let set = set.without(&entity);
            if set.is_empty() {
                self.trait_index.remove(kind);
            } else {
                self.trait_index.insert(kind.clone(), set);
            }
        }
    }

    /// Returns the raw location map, for snapshots.
    pub(crate) fn location_map(&self) -> &OrdMap<EntityId, EntityId> {
        &self.locations
    }

    /// Returns the raw entity map, for snapshots.
    pub(crate) fn entity_map(&self) -> &OrdMap<EntityId, Entity> {
        &self.entities
    }

    /// Verifies that the chain above `entity` ends at a root.
    pub(crate) fn check_rooted(&self, entity: EntityId) -> Result<()> {
        let mut walker = self.ancestors(entity);
        while walker.next().is_some() {}
        if walker.remaining == 0 {
            Err(Error::new(ErrorKind::ContainmentCycle {
                entity,
                destination: self.location(entity).unwrap_or(EntityId::LIMBO),
            }))
        } else {
            Ok(())
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over an entity's containment chain, nearest first.
///
/// Bounded by the number of entities, so a corrupted forest cannot loop
/// forever.
pub struct Ancestors<'a> {
    world: &'a World,
    current: EntityId,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        if self.remaining == 0 {
            return None;
        }
        let parent = self.world.location(self.current)?;
        self.remaining -= 1;
        self.current = parent;
        Some(parent)
    }
}
