//! Scope, validation, actions, and the turn loop for Parlance.
//!
//! The parser hands over [`parlance_parser::ParsedCommand`]s that only know
//! words. This crate binds those words to entities, runs the bound command
//! through its action, and commits the resulting events to the world.
//!
//! # Control flow
//!
//! ```text
//!   input line
//!       │
//!       ▼
//!   Parser ──────────────► CommandNotUnderstood
//!       │ ParsedCommand
//!       ▼
//!   CommandValidator ─────► ResolutionFailed / DisambiguationRequested
//!       │ ResolvedCommand          (ScopeResolver, PronounHistory)
//!       ▼
//!   ActionPipeline
//!       validate ─── invalid ──► blocked ──► ActionBlocked
//!       execute  ─── mutations ─► apply ──► ActionFailed on rejection
//!       report
//!       │ Events
//!       ▼
//!   SubscriberSet  (cascading rounds, each applied the same way)
//!       │
//!       ▼
//!   turn advances, undo frame kept
//! ```
//!
//! Every change to the [`parlance_world::World`] is an [`Event`] passed to
//! [`apply`]. Nothing else mutates it.
//!
//! # Modules
//!
//! - [`scope`] - What an actor can sense and touch
//! - [`pronouns`] - Recent referents for "it", "them", "him", "her"
//! - [`validator`] - Binding noun phrases to entities
//! - [`event`] - Event kinds, mutations, and the custom tag catalog
//! - [`apply`] - The single world-mutation entry point
//! - [`action`] - The four-phase action contract and its pipeline
//! - [`actions`] - The standard library of actions
//! - [`subscriber`] - Turn observers
//! - [`session`] - The turn loop, undo, save, and restore
//! - [`config`] - Scoring weights and engine limits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod actions;
pub mod apply;
pub mod config;
pub mod event;
pub mod pronouns;
pub mod scope;
pub mod session;
pub mod subscriber;
pub mod validator;

pub use action::{
    Action, ActionContext, ActionPipeline, ActionRegistry, ActionStatus, PipelineOutcome,
    ReasonCode, Scratch, ValidationResult,
};
pub use actions::{register_standard, standard_actions};
pub use apply::{Rejection, RejectionReason, apply, apply_all};
pub use config::{EngineConfig, ScoreWeights};
pub use event::{Event, EventCatalog, EventDraft, EventKind, EventTag, Mutation, Role};
pub use pronouns::{PronounHistory, Referent, pronoun_fits};
pub use scope::ScopeResolver;
pub use session::{Session, TurnOutcome, TurnStatus};
pub use subscriber::{Notification, SubscriberSet, TurnNotice, TurnSubscriber};
pub use validator::{
    Binding, CommandValidator, Disambiguation, ResolutionFailure, ResolvedCommand,
    ScoredCandidate, SlotBinding, Validation, hint_satisfied,
};
