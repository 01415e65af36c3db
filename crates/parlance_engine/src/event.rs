//! Events: the only channel through which the world changes.
//!
//! Actions never touch the world directly. They emit event drafts; the
//! pipeline stamps each draft with an id and turn, and event application
//! commits mutation events to the world in order. Narrative events carry
//! what happened for the renderer and turn subscribers and commit without
//! changing anything.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use parlance_foundation::{
    EntityId, Error, ErrorKind, EventId, Result, ScopeLevel, Sequence, Value,
};
use parlance_world::{Trait, TraitKind};
use tracing::error;

// =============================================================================
// Roles
// =============================================================================

/// The part an entity plays in an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Who acted
    Actor,
    /// The direct object
    Target,
    /// The indirect object of an instrument ("with the key")
    Instrument,
    /// Where the target was before
    Origin,
    /// Where the target went
    Destination,
    /// The room the event concerns
    Room,
}

impl Role {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Actor => "actor",
            Self::Target => "target",
            Self::Instrument => "instrument",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Room => "room",
        }
    }
}

// =============================================================================
// Mutations
// =============================================================================

/// A change to the world, carried by a mutation event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Move an entity to a new location
    Move {
        /// Entity to move
        entity: EntityId,
        /// New location
        destination: EntityId,
    },
    /// Replace one trait field
    SetField {
        /// Entity to change
        entity: EntityId,
        /// Trait holding the field
        kind: TraitKind,
        /// Field name
        field: String,
        /// New value
        value: Value,
    },
    /// Add to an integer trait field
    Adjust {
        /// Entity to change
        entity: EntityId,
        /// Trait holding the field
        kind: TraitKind,
        /// Field name
        field: String,
        /// Amount to add
        delta: i64,
    },
    /// Add or replace a whole trait
    AddTrait {
        /// Entity to change
        entity: EntityId,
        /// The trait
        value: Trait,
    },
    /// Remove a trait
    RemoveTrait {
        /// Entity to change
        entity: EntityId,
        /// Trait to remove
        kind: TraitKind,
    },
    /// Remove an entity from the world
    Remove {
        /// Entity to remove
        entity: EntityId,
    },
    /// Set or clear a per-room scope floor
    SetScopeOverride {
        /// Entity whose scope is raised
        entity: EntityId,
        /// Room the floor applies in
        room: EntityId,
        /// The floor, or `None` to clear
        level: Option<ScopeLevel>,
    },
}

impl Mutation {
    /// Returns the entity the mutation changes.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Move { entity, .. }
            | Self::SetField { entity, .. }
            | Self::Adjust { entity, .. }
            | Self::AddTrait { entity, .. }
            | Self::RemoveTrait { entity, .. }
            | Self::Remove { entity }
            | Self::SetScopeOverride { entity, .. } => *entity,
        }
    }

    /// Returns the lowercase name of the mutation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::SetField { .. } => "set_field",
            Self::Adjust { .. } => "adjust",
            Self::AddTrait { .. } => "add_trait",
            Self::RemoveTrait { .. } => "remove_trait",
            Self::Remove { .. } => "remove",
            Self::SetScopeOverride { .. } => "set_scope_override",
        }
    }
}

// =============================================================================
// Event Kinds
// =============================================================================

/// Name of a story-defined event kind, registered in an [`EventCatalog`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTag(Arc<str>);

impl EventTag {
    /// Returns the tag name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an event records.
///
/// Closed in the core; stories extend it only through registered
/// [`EventTag`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum EventKind {
    /// A change to the world.
    Mutation(Mutation),

    // --- Narrative ---
    Taken,
    Dropped,
    PutIn,
    PutOn,
    Opened,
    Closed,
    Locked,
    Unlocked,
    SwitchedOn,
    SwitchedOff,
    Went,
    RoomDescribed,
    Examined,
    InventoryListed,
    Waited,
    Slept,
    SaveRequested,
    RestoreRequested,
    Restarted,
    Undone,

    // --- Pipeline outcomes ---
    /// An action's preconditions failed.
    ActionBlocked,
    /// Event application rejected a mutation.
    ActionFailed,
    /// No grammar pattern matched the input.
    CommandNotUnderstood,
    /// A noun phrase could not be bound.
    ResolutionFailed,
    /// The player must choose between candidates.
    DisambiguationRequested,
    /// A scored candidate; never committed.
    Diagnostic,

    /// A story-defined event.
    Custom(EventTag),
}

impl EventKind {
    /// Returns true for mutation events.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation(_))
    }

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Mutation(m) => m.name(),
            Self::Taken => "taken",
            Self::Dropped => "dropped",
            Self::PutIn => "put_in",
            Self::PutOn => "put_on",
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::SwitchedOn => "switched_on",
            Self::SwitchedOff => "switched_off",
            Self::Went => "went",
            Self::RoomDescribed => "room_described",
            Self::Examined => "examined",
            Self::InventoryListed => "inventory_listed",
            Self::Waited => "waited",
            Self::Slept => "slept",
            Self::SaveRequested => "save_requested",
            Self::RestoreRequested => "restore_requested",
            Self::Restarted => "restarted",
            Self::Undone => "undone",
            Self::ActionBlocked => "action_blocked",
            Self::ActionFailed => "action_failed",
            Self::CommandNotUnderstood => "command_not_understood",
            Self::ResolutionFailed => "resolution_failed",
            Self::DisambiguationRequested => "disambiguation_requested",
            Self::Diagnostic => "diagnostic",
            Self::Custom(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Event Catalog
// =============================================================================

/// The registry of custom event tags.
#[derive(Clone, Debug, Default)]
pub struct EventCatalog {
    tags: BTreeSet<EventTag>,
}

impl EventCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom tag and returns it. Registering twice is harmless.
    pub fn register(&mut self, name: &str) -> EventTag {
        let tag = EventTag(name.into());
        self.tags.insert(tag.clone());
        tag
    }

    /// Checks if a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &EventTag) -> bool {
        self.tags.contains(tag)
    }

    /// Looks up a registered tag by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<EventTag> {
        self.tags.iter().find(|t| t.as_str() == name).cloned()
    }

    /// Checks that a kind is either built in or registered.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEventTag` for custom kinds that were never registered.
    pub fn check(&self, kind: &EventKind) -> Result<()> {
        match kind {
            EventKind::Custom(tag) if !self.contains(tag) => {
                error!(tag = %tag, "event uses an unregistered tag");
                Err(Error::new(ErrorKind::UnknownEventTag(tag.to_string())))
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Events
// =============================================================================

/// A stamped event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    /// Unique within the session
    pub id: EventId,
    /// Turn the event belongs to
    pub turn: u64,
    /// What happened
    pub kind: EventKind,
    /// Entities involved, by role
    pub entities: BTreeMap<Role, EntityId>,
    /// Extra data, by name
    pub data: BTreeMap<String, Value>,
}

impl Event {
    /// Returns the entity in a role.
    #[must_use]
    pub fn entity(&self, role: Role) -> Option<EntityId> {
        self.entities.get(&role).copied()
    }

    /// Returns a data value.
    #[must_use]
    pub fn data(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Returns the mutation, for mutation events.
    #[must_use]
    pub fn mutation(&self) -> Option<&Mutation> {
        match &self.kind {
            EventKind::Mutation(m) => Some(m),
            _ => None,
        }
    }
}

/// An event before it has an id and turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct EventDraft {
    /// What happened
    pub kind: EventKind,
    /// Entities involved, by role
    pub entities: BTreeMap<Role, EntityId>,
    /// Extra data, by name
    pub data: BTreeMap<String, Value>,
}

impl EventDraft {
    /// Starts a draft.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            entities: BTreeMap::new(),
            data: BTreeMap::new(),
        }
    }

    /// Starts a mutation draft.
    pub fn mutation(mutation: Mutation) -> Self {
        let entity = mutation.entity();
        Self::new(EventKind::Mutation(mutation)).with(Role::Target, entity)
    }

    /// Sets the entity in a role.
    pub fn with(mut self, role: Role, entity: EntityId) -> Self {
        self.entities.insert(role, entity);
        self
    }

    /// Sets a data value.
    pub fn with_data(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(name.into(), value.into());
        self
    }

    /// Assigns the next id from `sequence` and the current turn.
    pub fn stamp(self, sequence: &mut Sequence) -> Event {
        Event {
            id: sequence.next_event_id(),
            turn: sequence.turn(),
            kind: self.kind,
            entities: self.entities,
            data: self.data,
        }
    }
}
