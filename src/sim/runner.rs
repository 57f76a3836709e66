//! Sequential driver: folds the step rule over the input table.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::params::SimParams;
use super::step::step_hour;
use super::types::{HourlyRecord, SimState, StepRecord};

/// Runs the simulation over an hourly input table.
///
/// The first row seeds the state and is emitted as a zero-flow row; every
/// later row goes through the step rule in order. The EV daily trip counter
/// resets whenever the calendar date advances past the previous row's date.
///
/// An empty table yields an empty result.
pub fn run(params: &SimParams, records: &[HourlyRecord]) -> Vec<StepRecord> {
    let Some(first) = records.first() else {
        return Vec::new();
    };

    let mut state = SimState::initial(params, first.batt_soc_kwh);
    let mut current_day: NaiveDate = first.time.date();

    info!(
        rows = records.len(),
        start = %first.time,
        battery_soc_kwh = state.battery_soc_kwh,
        "starting run"
    );

    let mut out = Vec::with_capacity(records.len());
    out.push(StepRecord::zero_flow(params, first, &state));

    for record in &records[1..] {
        let day = record.time.date();
        if day != current_day {
            debug!(%day, trips = state.ev_trips_today, "day boundary, resetting trip counter");
            state.ev_trips_today = 0;
            current_day = day;
        }

        let (row, next) = step_hour(params, &state, record);
        out.push(row);
        state = next;
    }

    info!(
        battery_soc_kwh = state.battery_soc_kwh,
        h2_storage_kwh = state.h2_storage_kwh,
        "run finished"
    );

    out
}
