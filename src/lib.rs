//! Measure how work is shared across the members of a group and plan how to
//! rebalance it.
//!
//! [`analysis::AnalysisOrchestrator`] is the entry point: it reads a roster and
//! activity through the [`store`] traits, computes per-member load vectors, and
//! runs the [`engine`] stages to produce an [`analysis::Analysis`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod narrative;
pub mod output;
pub mod store;
