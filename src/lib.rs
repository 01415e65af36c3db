//! Parlance - Parser-driven interactive fiction runtime
//!
//! This crate re-exports all layers of the Parlance system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: parlance_runtime    - REPL, rendering, save files, demo story
//! Layer 3: parlance_engine     - Scope, validation, actions, turn loop
//! Layer 2: parlance_parser     - Grammar table, tokenizer, syntax matching
//! Layer 1: parlance_world      - Entities, traits, containment, snapshots
//! Layer 0: parlance_foundation - Core types (EntityId, ScopeLevel, Error)
//! ```

pub use parlance_engine as engine;
pub use parlance_foundation as foundation;
pub use parlance_parser as parser;
pub use parlance_runtime as runtime;
pub use parlance_world as world;
