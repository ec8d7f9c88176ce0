//! # MDFP Core Library
//!
//! Composition engine for molecular dynamics fingerprints (MDFPs): fixed-layout feature
//! vectors that combine 2-D structural counts of a solute with statistical moments of
//! properties sampled along its simulation trajectories.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same strict three-layer split throughout.
//!
//! - **[`core`]: The Foundation.** Stateless pieces: the SMILES toolkit and structural
//!   descriptor provider, moment functions, simulation-source traits and extractors, and
//!   the [`Fingerprint`](core::fingerprint::Fingerprint) type itself.
//!
//! - **[`engine`]: The Logic Core.** Per-run state. It holds the moment configuration,
//!   the run context and phase machine, extractor validation, and the closed set of
//!   composer variants.
//!
//! - **[`workflows`]: The Public API.** [`workflows::compose::run`] drives a composer
//!   variant from identifier resolution to the finished fingerprint. A run either returns
//!   a complete fingerprint or an error; nothing partial escapes.

pub mod core;
pub mod engine;
pub mod workflows;
