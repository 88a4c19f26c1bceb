//! Shared helpers used across parsing and the engine.

pub mod validation;
