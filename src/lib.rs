//! Comparative long-range aircraft performance estimator.
//!
//! The physics and solvers live in small member crates; this facade
//! re-exports them under one roof so the CLI binaries and external users
//! share a single dependency.
//!
//! Pipeline: load the aircraft catalog, calibrate each airframe's drag
//! and TSFC parameters against published range-payload points, then run
//! the mission simulators and range computations on the calibrated
//! models.

pub use airperf_aero as aero;
pub use airperf_atmosphere as atmosphere;
pub use airperf_calibration as calibration;
pub use airperf_config as config;
pub use airperf_core::{aircraft, constants, fuel, units};
pub use airperf_export as export;
pub use airperf_missions as missions;
pub use airperf_performance as performance;
pub use airperf_propulsion as propulsion;

pub mod pipeline;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
