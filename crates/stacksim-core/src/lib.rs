//! # StackSim Core Library
//!
//! A deterministic engine for modeling personalized dose-response behavior of
//! compound stacks: per-compound benefit/risk curve evaluation, profile-driven
//! personalization, pairwise synergy aggregation, receptor saturation, and
//! competitive-binding displacement.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`CompoundLibrary`,
//!   `UserProfile`, `Stack`), pure response mathematics (`ResponseCurve` interpolation,
//!   personalization transforms), and reference-data loading from TOML/CSV.
//!
//! - **[`engine`]: The Logic Core.** This layer aggregates per-compound results into
//!   stack-level metrics: benefit/risk totals and synergy deltas, systemic-load
//!   figures, the receptor saturation model, the competitive displacement model, and
//!   an explicit memoization cache keyed by a canonical input signature.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It ties
//!   the `engine` and `core` together to produce a complete, serializable
//!   `StackReport` for presentation collaborators.
//!
//! Every public operation is a pure, synchronous function of its explicit inputs:
//! no I/O, no hidden state, no ordering dependence between calls. Reference data is
//! loaded once by the caller and passed in by reference, so tests substitute small
//! synthetic catalogs instead of depending on a production dataset.

pub mod core;
pub mod engine;
pub mod workflows;
