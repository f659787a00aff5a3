//! Joint regression suite for the multibody engine.
//!
//! This crate validates tables the engine's joint tests recorded against
//! reference data and conservation checks:
//! - Locating per-case channel tables by scenario and producer
//! - Comparing them with reference curves and checking energy drift and
//!   constraint residuals
//! - Writing one JSON report per scenario plus a suite summary
//!
//! # Usage
//!
//! ```bash
//! # Validate every scenario
//! cargo run -p mbdval_validation_tests -- --scenario all
//!
//! # One scenario, with comparison charts
//! cargo run -p mbdval_validation_tests --features charts -- --scenario revolute --charts
//! ```

pub mod config;
pub mod harness;
pub mod metrics;
pub mod scenarios;

pub use config::*;
pub use harness::*;
pub use metrics::*;
