//! Hourly simulation core: parameter resolution, the per-hour step rule,
//! the sequential runner, and summary metrics.

pub mod params;
pub mod runner;
pub mod step;
pub mod summary;
pub mod types;

pub use params::{EvParams, HydrogenParams, MonthMode, SimParams};
pub use runner::run;
pub use step::step_hour;
pub use summary::{SummaryReport, GRID_CO2_KG_PER_KWH};
pub use types::{EvFlows, H2Flows, HourlyRecord, SimState, StepRecord};
