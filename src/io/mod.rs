//! Input table loading and output table export.

pub mod export;
pub mod input;

pub use export::{export_csv, write_csv};
pub use input::{read_hourly_csv, read_hourly_table};
