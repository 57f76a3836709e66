//! Run-level error taxonomy.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a simulation run.
///
/// All variants are local to one run: the caller fixes the input or the
/// configuration and invokes again. The core performs no I/O of its own and
/// has no transient-failure classes, so there is no retry policy here.
#[derive(Debug, Error)]
pub enum SimError {
    /// A required input column is absent. Raised before any state
    /// computation happens.
    #[error("missing field \"{0}\" in input table")]
    MissingField(&'static str),

    /// The scenario configuration failed validation. Carries every
    /// violation found, not just the first.
    #[error("invalid configuration: {}", join_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),

    /// A cell in the input table could not be parsed. `row` is the
    /// 1-based data row (the header row is not counted).
    #[error("row {row}: cannot parse {field} value \"{value}\"")]
    BadCell {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("cannot read input table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} — {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
