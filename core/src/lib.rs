//! Premium reconciliation and data-quality engine.
//!
//! Loads policy, GL and claims tables into a read-only snapshot, runs a
//! fixed battery of data-quality checks, reconciles per-policy premium
//! between the two ledgers, and aggregates premium by booking date and
//! state for reporting.

pub mod config;
pub mod engine;
pub mod error;
pub mod quality;
pub mod reconciliation;
pub mod reporting;
pub mod sink;
pub mod store;
pub mod summary;
pub mod types;

pub use config::RunConfig;
pub use engine::{Analysis, ReconEngine};
pub use error::{ReconError, ReconResult};
pub use store::SourceStore;
