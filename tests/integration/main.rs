//! Cross-layer integration tests for Parlance
//!
//! Tests that drive a whole session, from typed input to rendered text and
//! save files.

mod persistence;
mod scenarios;
mod transcript;
