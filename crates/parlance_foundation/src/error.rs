//! Error types for the Parlance system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! These errors describe programming and integrity faults: a missing entity,
//! a containment cycle, an invalid grammar pattern. Ordinary gameplay outcomes
//! such as "you can't see any such thing" are modeled as typed results in the
//! engine, not as errors.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::ids::{ActionId, PatternId};

/// Result alias used throughout Parlance.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Parlance operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a missing trait error.
    #[must_use]
    pub fn missing_trait(entity: EntityId, trait_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingTrait {
            entity,
            trait_name: trait_name.into(),
        })
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(trait_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField {
            trait_name: trait_name.into(),
            field: field.into(),
        })
    }

    /// Creates a field type mismatch error.
    #[must_use]
    pub fn field_type(field: impl Into<String>, expected: &'static str, actual: &'static str) -> Self {
        Self::new(ErrorKind::FieldType {
            field: field.into(),
            expected,
            actual,
        })
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity was not found in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Moving an entity would place it inside itself.
    #[error("containment cycle: cannot move {entity} into {destination}")]
    ContainmentCycle {
        /// The entity being moved.
        entity: EntityId,
        /// The requested new location.
        destination: EntityId,
    },

    /// Rooms and limbo are containment roots and never have a location.
    #[error("{0} is a containment root and cannot be moved")]
    NotMovable(EntityId),

    /// The destination already holds as many entities as it allows.
    #[error("capacity exceeded: {container} holds at most {capacity}")]
    CapacityExceeded {
        /// The full container or supporter.
        container: EntityId,
        /// Its declared capacity.
        capacity: u32,
    },

    /// An operation needed a trait the entity does not have.
    #[error("entity {entity} has no {trait_name} trait")]
    MissingTrait {
        /// The entity that was queried.
        entity: EntityId,
        /// The missing trait's name.
        trait_name: String,
    },

    /// A trait has no field with the given name.
    #[error("unknown field: {field} on trait {trait_name}")]
    UnknownField {
        /// The trait that was queried.
        trait_name: String,
        /// The field name that was not found.
        field: String,
    },

    /// A field was given a value of the wrong type.
    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    FieldType {
        /// The field being written.
        field: String,
        /// The expected value type.
        expected: &'static str,
        /// The type that was supplied.
        actual: &'static str,
    },

    /// A grammar pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The pattern source text.
        pattern: String,
        /// What was wrong with it.
        message: String,
    },

    /// Standard patterns cannot be removed.
    #[error("cannot remove standard pattern {0}")]
    StandardPatternRemoval(PatternId),

    /// No pattern is registered under the id.
    #[error("unknown pattern: {0}")]
    UnknownPattern(PatternId),

    /// No action is registered under the id.
    #[error("unknown action: {0}")]
    UnknownAction(ActionId),

    /// A custom event tag was used before it was registered.
    #[error("unregistered event tag: {0}")]
    UnknownEventTag(String),

    /// A saved delta refers to state the baseline world does not have.
    #[error("save delta does not match baseline: {0}")]
    BaselineMismatch(String),

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Turn during which the error occurred.
    pub turn: Option<u64>,
    /// Entity the failing operation was about.
    pub entity: Option<EntityId>,
    /// Component or action name that raised the error.
    pub source: Option<String>,
    /// Chain of operations leading to the error, outermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the turn.
    #[must_use]
    pub fn with_turn(mut self, turn: u64) -> Self {
        self.turn = Some(turn);
        self
    }

    /// Sets the entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Sets the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if let Some(turn) = self.turn {
            write!(f, " (turn {turn})")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " about {entity}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_entity_not_found() {
        let err = Error::entity_not_found(EntityId::new(42));
        assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
        assert!(err.to_string().contains("#42"));
    }

    #[test]
    fn error_with_context() {
        let err = Error::missing_trait(EntityId::new(3), "openable").with_context(
            ErrorContext::new()
                .with_turn(7)
                .with_source("opening")
                .with_frame("execute"),
        );

        let ctx = err.context.as_ref().unwrap();
        assert_eq!(ctx.turn, Some(7));
        assert_eq!(ctx.source.as_deref(), Some("opening"));
        assert_eq!(ctx.stack, vec!["execute".to_string()]);
        assert!(ctx.to_string().contains("turn 7"));
    }

    #[test]
    fn invalid_pattern_message() {
        let err = Error::invalid_pattern("take <noun", "unterminated slot");
        let msg = err.to_string();
        assert!(msg.contains("take <noun"));
        assert!(msg.contains("unterminated"));
    }

    #[test]
    fn capacity_message() {
        let err = Error::new(ErrorKind::CapacityExceeded {
            container: EntityId::new(5),
            capacity: 2,
        });
        assert!(err.to_string().contains("at most 2"));
    }
}
