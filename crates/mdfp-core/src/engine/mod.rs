//! # Engine Module
//!
//! Per-run orchestration state for fingerprint composition.
//!
//! ## Overview
//!
//! The engine owns everything that exists only for the duration of a run: the moment
//! configuration, the resolved identifier and borrowed collaborators, the run phase,
//! and the validation applied to extractor output. The closed [`composer::Composer`]
//! enum selects which regimes and extractors a run visits.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Global moment list and opaque extractor options
//! - **Run Context** ([`context`]) - Per-run bundle threaded through workflow helpers
//! - **State Tracking** ([`state`]) - Forward-only run phase machine
//! - **Extraction** ([`extract`]) - Extractor invocation and output validation
//! - **Variants** ([`composer`]) - Solution, liquid, and combined compositions
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The run-level error type

pub mod composer;
pub mod config;
pub mod context;
pub mod error;
pub mod extract;
pub mod progress;
pub mod state;
