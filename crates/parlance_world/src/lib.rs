//! Entities, traits, and world state for Parlance.
//!
//! This crate provides:
//! - [`Trait`] and [`TraitKind`] - Data-only capability components
//! - [`Entity`] - An entity's traits and per-room scope overrides
//! - [`World`] - Immutable world state with structural sharing and a checked
//!   containment forest
//! - [`Snapshot`] and [`SaveDelta`] - Baseline-relative save state
//! - [`WorldBuilder`] - Mutable handle for story setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod entity;
pub mod snapshot;
pub mod traits;
pub mod world;

pub use builder::WorldBuilder;
pub use entity::Entity;
pub use snapshot::{SaveDelta, Snapshot, TraitChange};
pub use traits::{Actor, Container, CustomTrait, Gender, Identity, Room, Supporter, Trait, TraitKind};
pub use world::{Ancestors, World};
