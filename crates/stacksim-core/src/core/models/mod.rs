//! Data models for compounds, curves, profiles, stacks, and interactions.
//!
//! These are plain, serializable values with no embedded behavior beyond pure
//! accessors; reference data is constructed once at load time and never mutated.

pub mod compound;
pub mod curve;
pub mod interaction;
pub mod profile;
pub mod stack;
