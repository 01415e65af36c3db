//! Natural language parser for text adventure games.
//!
//! This crate turns player input like "take lamp" or "put coin in box" into
//! [`ParsedCommand`]s. It knows nothing about the world: binding noun
//! phrases to entities happens later, in the engine's validator.
//!
//! # Architecture
//!
//! ```text
//! "put the gold coin in the box"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → ["put", "the", "gold", "coin", "in", "the", "box"]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ VOCABULARY      │  → ["put", "gold", "coin", "in", "box"]
//! │ STRIP           │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SYNTAX          │  → put|place <noun:held> in|into <second:container>
//! │ MATCHING        │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PARSED          │  → putting [gold coin] in [box]
//! │ COMMAND         │
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`grammar`] - Pattern compilation and the grammar table
//! - [`vocabulary`] - Articles, prepositions, directions and other closed word classes
//! - [`tokenizer`] - Convert raw input to a token stream
//! - [`noun_phrase`] - Noun phrase representation
//! - [`syntax`] - Pattern matching over tokens
//! - [`command`] - Parsed command records
//! - [`parser`] - The parser pipeline
//! - [`stdlib`] - Standard grammar for adventure games

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod grammar;
pub mod noun_phrase;
pub mod parser;
pub mod stdlib;
pub mod syntax;
pub mod tokenizer;
pub mod vocabulary;

pub use command::{Manner, NounSlot, ParsedCommand, ScopeHint, SlotHint};
pub use grammar::{DEFAULT_PRIORITY, GrammarTable, Pattern, PatternCategory, PatternElement};
pub use noun_phrase::{NounPhrase, PronounKind, Quantifier};
pub use parser::{ParseOutcome, Parser, SyntaxFailure};
pub use stdlib::standard_grammar;
pub use syntax::{SyntaxMatch, SyntaxMatcher};
pub use tokenizer::{InputToken, InputTokenizer};
pub use vocabulary::Vocabulary;
