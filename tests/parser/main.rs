//! Integration tests for Layer 2: Parser
//!
//! Tests for the standard grammar and for story content extending it.

mod commands;
mod story_grammar;
