//! Reference-data loading: the compound library (TOML) and the pairwise
//! interaction matrix (CSV).
//!
//! Both loaders validate fail-fast: an empty curve, a non-monotonic dose
//! sequence, an unknown rating, or a duplicate pair is a load error, never a
//! condition the evaluators tolerate at runtime. Loaded data is immutable and
//! passed by reference into every engine entry point.

pub mod interactions;
pub mod library;
