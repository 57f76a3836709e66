//! Hourly on-site energy economics simulator: solar PV with a battery,
//! an optional hydrogen path, and an optional EV.

pub mod config;
pub mod error;
pub mod io;
/// Simulation core: parameters, step rule, runner, and summary metrics.
pub mod sim;
