//! Event application.
//!
//! The single entry point through which world state changes. Each mutation
//! re-checks the invariants its action assumed, because the world may have
//! changed since validation (an earlier event in the same turn, or a turn
//! subscriber). A rejected event leaves the world exactly as it was before
//! that event.

use std::fmt;

use parlance_foundation::{EntityId, Error, ErrorKind, EventId};
use parlance_world::World;
use tracing::{trace, warn};

use crate::event::{Event, Mutation};

/// Which invariant a rejected mutation would have broken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// An entity involved no longer exists
    MissingEntity(EntityId),
    /// The move would put an entity inside itself
    ContainmentCycle,
    /// Rooms and limbo cannot be moved
    NotMovable,
    /// The destination is full
    CapacityExceeded,
    /// The entity lacks the trait being changed
    MissingTrait,
    /// Unknown field, or a value of the wrong type
    InvalidField,
    /// Anything else
    Other,
}

impl RejectionReason {
    fn from_error(error: &Error) -> Self {
        match &error.kind {
            ErrorKind::EntityNotFound(e) => Self::MissingEntity(*e),
            ErrorKind::ContainmentCycle { .. } => Self::ContainmentCycle,
            ErrorKind::NotMovable(_) => Self::NotMovable,
            ErrorKind::CapacityExceeded { .. } => Self::CapacityExceeded,
            ErrorKind::MissingTrait { .. } => Self::MissingTrait,
            ErrorKind::UnknownField { .. } | ErrorKind::FieldType { .. } => Self::InvalidField,
            _ => Self::Other,
        }
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MissingEntity(_) => "missing_entity",
            Self::ContainmentCycle => "containment_cycle",
            Self::NotMovable => "not_movable",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::MissingTrait => "missing_trait",
            Self::InvalidField => "invalid_field",
            Self::Other => "other",
        }
    }
}

/// A mutation event that could not be applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// The rejected event
    pub event: EventId,
    /// The broken invariant
    pub reason: RejectionReason,
    /// Human-readable detail from the world store
    pub message: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.event, self.message)
    }
}

/// Applies one event to `world`.
///
/// Narrative events commit without change.
///
/// # Errors
///
/// Returns a [`Rejection`] if the mutation would break a world invariant.
/// The input world is never modified.
pub fn apply(world: &World, event: &Event) -> Result<World, Rejection> {
    let Some(mutation) = event.mutation() else {
        return Ok(world.clone());
    };
    trace!(event = %event.id, mutation = mutation.name(), "applying");
    let result = match mutation {
        Mutation::Move {
            entity,
            destination,
        } => world.move_entity(*entity, *destination),
        Mutation::SetField {
            entity,
            kind,
            field,
            value,
        } => world.set_field(*entity, kind, field, value.clone()),
        Mutation::Adjust {
            entity,
            kind,
            field,
            delta,
        } => world.adjust(*entity, kind, field, *delta),
        Mutation::AddTrait { entity, value } => world.set_trait(*entity, value.clone()),
        Mutation::RemoveTrait { entity, kind } => world.remove_trait(*entity, kind),
        Mutation::Remove { entity } => world.remove(*entity),
        Mutation::SetScopeOverride {
            entity,
            room,
            level,
        } => world.set_scope_override(*entity, *room, *level),
    };
    result.map_err(|error| {
        let rejection = Rejection {
            event: event.id,
            reason: RejectionReason::from_error(&error),
            message: error.to_string(),
        };
        warn!(event = %event.id, mutation = mutation.name(), %error, "event rejected");
        rejection
    })
}

/// Applies events in order, stopping at the first rejection.
///
/// Returns the world after the last committed event, the committed events,
/// and the rejection if there was one. Events after a rejection are dropped.
#[must_use]
pub fn apply_all(world: &World, events: Vec<Event>) -> (World, Vec<Event>, Option<Rejection>) {
    let mut current = world.clone();
    let mut committed = Vec::with_capacity(events.len());
    for event in events {
        match apply(&current, &event) {
            Ok(next) => {
                current = next;
                committed.push(event);
            }
            Err(rejection) => return (current, committed, Some(rejection)),
        }
    }
    (current, committed, None)
}
