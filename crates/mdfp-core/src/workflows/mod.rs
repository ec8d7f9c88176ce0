//! # Workflows Module
//!
//! High-level entry points that drive a complete fingerprint composition.
//!
//! ## Overview
//!
//! A workflow resolves the molecular identifier, computes the structural group, walks
//! every regime of the selected [`Composer`](crate::engine::composer::Composer)
//! variant, and returns the finished fingerprint. Progress is reported through the
//! engine's callback reporter and every failure aborts the run.
//!
//! - **Composition Workflow** ([`compose`]) - Identifier resolution, structural
//!   descriptors, per-regime extraction and reduction, validated assembly.

pub mod compose;
