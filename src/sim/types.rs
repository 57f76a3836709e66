//! Core simulation types: input rows, carried state, and output records.

use std::fmt;

use chrono::NaiveDateTime;

use super::params::SimParams;

/// One hour of the canonical input table.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    /// Timestamp of the hour. Strictly increasing, hourly cadence assumed
    /// but not enforced.
    pub time: NaiveDateTime,
    /// Site consumption for the hour (kWh, >= 0).
    pub load_site_kwh: f64,
    /// Net positive PV generation for the hour (kWh, >= 0).
    pub pv_net_pos_kwh: f64,
    /// Measured battery state of charge (kWh). Only the first row's value
    /// is consulted, to seed the initial simulation state.
    pub batt_soc_kwh: Option<f64>,
}

/// Mutable state carried from one hour to the next.
///
/// Every kWh field stays clamped inside its capacity bounds; the step rule
/// never leaves a value negative or above capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    /// Battery state of charge (kWh).
    pub battery_soc_kwh: f64,
    /// Stored hydrogen energy (kWh-equivalent). Stays 0 for battery-only runs.
    pub h2_storage_kwh: f64,
    /// EV traction battery state of charge (kWh). Stays 0 without the EV layer.
    pub ev_soc_kwh: f64,
    /// Trips taken since the last calendar-day boundary.
    pub ev_trips_today: u32,
}

impl SimState {
    /// Builds the initial state for a run.
    ///
    /// The battery seeds from the first input row's `batt_soc_kwh` when
    /// present, otherwise from full capacity. Hydrogen and EV storage start
    /// empty.
    pub fn initial(params: &SimParams, first_batt_soc_kwh: Option<f64>) -> Self {
        Self {
            battery_soc_kwh: first_batt_soc_kwh.unwrap_or(params.battery_capacity_kwh),
            h2_storage_kwh: 0.0,
            ev_soc_kwh: 0.0,
            ev_trips_today: 0,
        }
    }
}

/// Hydrogen-path columns of one output row.
#[derive(Debug, Clone, PartialEq)]
pub struct H2Flows {
    /// Stored hydrogen after this hour (kWh-equivalent).
    pub h2_storage_kwh: f64,
    /// Hydrogen energy produced this hour (kWh-equivalent).
    pub h2_energy_kwh: f64,
    /// Electricity fed into the electrolyzer this hour (kWh).
    pub el_input_used_kwh: f64,
    /// Fuel cell electricity delivered this hour (kWh).
    pub fc_output_used_kwh: f64,
    /// Grid purchase before the fuel cell offset (kWh), kept for diagnostics.
    pub buy_before_h2: f64,
}

impl H2Flows {
    pub(crate) fn zero(h2_storage_kwh: f64) -> Self {
        Self {
            h2_storage_kwh,
            h2_energy_kwh: 0.0,
            el_input_used_kwh: 0.0,
            fc_output_used_kwh: 0.0,
            buy_before_h2: 0.0,
        }
    }
}

/// EV columns of one output row.
#[derive(Debug, Clone, PartialEq)]
pub struct EvFlows {
    /// EV state of charge after this hour (kWh).
    pub ev_soc_kwh: f64,
    /// Surplus energy charged into the EV this hour (kWh).
    pub ev_charge_used_kwh: f64,
    /// 1 when a trip happened this hour, else 0.
    pub ev_trip_count: u32,
    /// Trips taken so far today, after this hour.
    pub ev_trips_today: u32,
    /// Energy per trip (kWh); constant across the run, echoed per row so the
    /// exported table is self-describing.
    pub ev_trip_energy_kwh: f64,
}

impl EvFlows {
    pub(crate) fn zero(ev_soc_kwh: f64, ev_trips_today: u32, ev_trip_energy_kwh: f64) -> Self {
        Self {
            ev_soc_kwh,
            ev_charge_used_kwh: 0.0,
            ev_trip_count: 0,
            ev_trips_today,
            ev_trip_energy_kwh,
        }
    }
}

/// One row of the output table: the input columns plus every computed flow.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Timestamp copied from the input row.
    pub time: NaiveDateTime,
    /// Site consumption copied from the input row (kWh).
    pub load_site_kwh: f64,
    /// PV generation copied from the input row (kWh).
    pub pv_net_pos_kwh: f64,
    /// Hourly cost: `buy * buy_price - sell * sell_price`.
    pub cost: f64,
    /// Battery state of charge after this hour (kWh).
    pub batt_soc_kwh: f64,
    /// Energy charged into the battery this hour (kWh).
    pub charge: f64,
    /// Energy discharged from the battery this hour (kWh).
    pub discharge: f64,
    /// Energy bought from the grid this hour (kWh), after any fuel cell offset.
    pub buy_electricity: f64,
    /// Energy sold to the grid this hour (kWh).
    pub sell_electricity: f64,
    /// Surplus left after the battery, handed to the hydrogen/EV path (kWh).
    /// Always 0 for battery-only runs, where surplus sells directly.
    pub remain_surplus: f64,
    /// Hydrogen columns; `None` for battery-only runs.
    pub h2: Option<H2Flows>,
    /// EV columns; `None` unless the EV layer is enabled.
    pub ev: Option<EvFlows>,
}

impl StepRecord {
    /// Builds the fixed zero-flow row emitted for the first input row: no
    /// step is computed for it, it only echoes the seeded state.
    pub fn zero_flow(params: &SimParams, record: &HourlyRecord, state: &SimState) -> Self {
        Self {
            time: record.time,
            load_site_kwh: record.load_site_kwh,
            pv_net_pos_kwh: record.pv_net_pos_kwh,
            cost: 0.0,
            batt_soc_kwh: state.battery_soc_kwh,
            charge: 0.0,
            discharge: 0.0,
            buy_electricity: 0.0,
            sell_electricity: 0.0,
            remain_surplus: 0.0,
            h2: params
                .hydrogen
                .as_ref()
                .map(|_| H2Flows::zero(state.h2_storage_kwh)),
            ev: params.ev.as_ref().map(|ev| {
                EvFlows::zero(state.ev_soc_kwh, state.ev_trips_today, ev.trip_energy_kwh)
            }),
        }
    }
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | load={:>6.2}  pv={:>6.2} | chg={:>5.2}  dis={:>5.2}  \
             buy={:>6.2}  sell={:>6.2} | batt={:>6.2} kWh | cost={:>8.2}",
            self.time.format("%Y-%m-%d %H:%M"),
            self.load_site_kwh,
            self.pv_net_pos_kwh,
            self.charge,
            self.discharge,
            self.buy_electricity,
            self.sell_electricity,
            self.batt_soc_kwh,
            self.cost,
        )?;
        if let Some(h2) = &self.h2 {
            write!(
                f,
                " | h2={:>7.2} kWh (el={:.2} fc={:.2})",
                h2.h2_storage_kwh, h2.el_input_used_kwh, h2.fc_output_used_kwh
            )?;
        }
        if let Some(ev) = &self.ev {
            write!(
                f,
                " | ev={:>6.2} kWh (chg={:.2} trips={})",
                ev.ev_soc_kwh, ev.ev_charge_used_kwh, ev.ev_trips_today
            )?;
        }
        Ok(())
    }
}
