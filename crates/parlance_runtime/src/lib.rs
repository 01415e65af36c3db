//! REPL, rendering, save files, and the demo story for Parlance.
//!
//! This crate provides:
//! - [`Repl`] - The interactive game loop over a [`LineEditor`]
//! - [`Renderer`] - Plain-text rendering of committed events
//! - [`SaveFile`] - `MessagePack` save files holding a world delta
//! - [`demo_session`] - A small story to play

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod demo;
pub mod editor;
pub mod highlight;
pub mod render;
pub mod repl;
pub mod serialize;

pub use demo::{BellTower, Demo, demo_session, demo_world};
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use highlight::InputHighlighter;
pub use render::Renderer;
pub use repl::{Repl, Step};
pub use serialize::{SaveFile, load_from_file, save_to_file};
