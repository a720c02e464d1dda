//! # Engine Module
//!
//! This module aggregates per-compound response readings into stack-level
//! metrics, providing the computational framework for stack evaluation and
//! the receptor-level physiology models.
//!
//! ## Overview
//!
//! The engine consumes the immutable reference data and pure response
//! mathematics of [`crate::core`] and produces the aggregate figures the
//! presentation layer renders: benefit/risk totals with pairwise synergy
//! deltas, systemic-load metrics, receptor saturation under multi-phase
//! adaptation, and competitive-binding displacement across a finite
//! capacity. Every operation is a deterministic, synchronous function of its
//! explicit inputs.
//!
//! ## Architecture
//!
//! - **Stack Evaluation** ([`evaluator`]) - totals, synergy deltas, ratio and
//!   net score for a stack/profile pair
//! - **Synergy Aggregation** ([`synergy`]) - fractional pairwise deltas
//!   scaled by each pair's combined base contribution
//! - **Saturation Model** ([`saturation`]) - capacity-vs-demand with
//!   three-phase adaptation and weighted spillover routing
//! - **Displacement Model** ([`receptor`]) - greedy capacity allocation
//!   ranked by binding affinity
//! - **Load Metrics** ([`load`]) - weekly/active dose normalization, ester
//!   stability penalties, and the systemic toxicity multiplier
//! - **Warnings** ([`warnings`]) - structured flag-driven combination alerts
//! - **Caching** ([`cache`]) - explicit signature-keyed memoization with a
//!   bounded evict-oldest policy
//! - **Configuration** ([`config`]) - validated evaluation parameters
//! - **Error Handling** ([`error`]) - the unified engine error type

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod load;
pub mod receptor;
pub mod saturation;
pub mod synergy;
pub mod warnings;
