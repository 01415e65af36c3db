//! Core identifiers, values, scope levels, and errors for Parlance.
//!
//! This crate provides:
//! - [`EntityId`] - Stable entity identifiers, including the [`EntityId::LIMBO`] root
//! - [`ActionId`], [`PatternId`], [`EventId`] - Identifiers shared across layers
//! - [`Direction`] - Compass and vertical directions for movement
//! - [`ScopeLevel`] - The graded perception scale used by scope resolution
//! - [`Value`] - Field values carried by traits and events
//! - [`Sequence`] - Per-session event id and turn counter
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod direction;
pub mod entity;
pub mod error;
pub mod ids;
pub mod scope;
pub mod sequence;
pub mod value;

pub use direction::Direction;
pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use ids::{ActionId, EventId, PatternId};
pub use scope::ScopeLevel;
pub use sequence::Sequence;
pub use value::Value;
