//! Integration tests for Layer 3: Engine
//!
//! Tests for scope resolution, command validation, and the action pipeline.

mod fixture;
mod pipeline;
mod scope;
mod validation;
