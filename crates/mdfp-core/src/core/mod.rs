//! # Core Module
//!
//! Stateless building blocks of the fingerprint composition engine.
//!
//! ## Overview
//!
//! Everything in this layer is a pure function of its inputs: parsing a molecular
//! identifier, counting structural features, summarizing a sampled series, and holding
//! the assembled fingerprint. Orchestration lives in [`crate::engine`].
//!
//! ## Architecture
//!
//! - **Molecular Graphs** ([`molecule`]) - Elements, SMILES parsing, ring perception, and
//!   hydrogen bookkeeping
//! - **Structural Descriptors** ([`descriptors`]) - The graph-service seam and the provider
//!   emitting the ten `2d_counts` values
//! - **Statistics** ([`statistics`]) - Moment functions and the per-property reducer
//! - **Simulation Sources** ([`simulation`]) - Regimes, extractors, per-frame series, and
//!   the source adapters feeding them
//! - **Fingerprint** ([`fingerprint`]) - The ordered, flattened result type

pub mod descriptors;
pub mod fingerprint;
pub mod molecule;
pub mod simulation;
pub mod statistics;
