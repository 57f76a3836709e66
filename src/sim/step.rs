//! The hourly step rule: fixed-priority allocation of surplus or shortfall
//! across battery, hydrogen path, EV, and grid.
//!
//! The rule is a pure function: it reads the carried [`SimState`], never
//! mutates it, and hands back the next state alongside the output row.
//! Priorities are fixed (battery, then electrolyzer, then EV, then grid);
//! there is no search or optimization.

use chrono::Datelike;

use super::params::{MonthMode, SimParams};
use super::types::{EvFlows, H2Flows, HourlyRecord, SimState, StepRecord};

/// Computes one hour of the simulation.
///
/// Returns the output row for this hour and the state to carry into the
/// next one. Negative or otherwise out-of-range input values are not
/// validated here; they flow through the arithmetic as-is.
pub fn step_hour(
    params: &SimParams,
    state: &SimState,
    record: &HourlyRecord,
) -> (StepRecord, SimState) {
    let load = record.load_site_kwh;
    let pv = record.pv_net_pos_kwh;
    let month = record.time.month();

    let mut next = state.clone();

    let rated = params.battery_rated_power_kwh;
    let headroom = params.battery_capacity_kwh - state.battery_soc_kwh;

    let mut charge = 0.0;
    let mut discharge = 0.0;
    let mut buy_electricity = 0.0;
    let mut sell_electricity = 0.0;
    let mut remain_surplus = 0.0;

    if pv >= load {
        let surplus = pv - load;
        // Two-tier comparison: first against rated power, then against
        // headroom. The order matters at surplus == rated exactly.
        let (absorbed, remainder) = if surplus >= rated {
            if headroom >= rated {
                (rated, surplus - rated)
            } else {
                (headroom, surplus - headroom)
            }
        } else if headroom >= surplus {
            (surplus, 0.0)
        } else {
            (headroom, surplus - headroom)
        };
        charge = absorbed;
        if params.hydrogen.is_some() {
            remain_surplus = remainder;
        } else {
            sell_electricity = remainder;
        }
    } else {
        let shortage = load - pv;
        let available = state.battery_soc_kwh;
        let (supplied, unmet) = if shortage >= rated {
            if available >= rated {
                (rated, shortage - rated)
            } else {
                (available, shortage - available)
            }
        } else if available >= shortage {
            (shortage, 0.0)
        } else {
            (available, shortage - available)
        };
        discharge = supplied;
        buy_electricity = unmet;
    }

    next.battery_soc_kwh = (state.battery_soc_kwh + charge - discharge)
        .clamp(0.0, params.battery_capacity_kwh);

    let mut ev_charge_used_kwh = 0.0;
    let mut ev_trip_count = 0;

    let h2 = params.hydrogen.as_ref().map(|hp| {
        let mut flows = H2Flows::zero(next.h2_storage_kwh);
        flows.buy_before_h2 = buy_electricity;

        match hp.mode_for(month) {
            MonthMode::Production => {
                let mut surplus_after_h2 = 0.0;
                if remain_surplus > 0.0 {
                    let storage_space = (hp.storage_capacity_kwh - next.h2_storage_kwh).max(0.0);
                    if storage_space > 0.0 {
                        let storage_limit_kwh = storage_space / hp.el_efficiency;
                        let el_input = remain_surplus
                            .min(hp.el_rated_power_kwh)
                            .min(storage_limit_kwh);
                        flows.el_input_used_kwh = el_input;
                        flows.h2_energy_kwh = el_input * hp.el_efficiency;
                        next.h2_storage_kwh = (next.h2_storage_kwh + flows.h2_energy_kwh)
                            .min(hp.storage_capacity_kwh);
                        surplus_after_h2 = (remain_surplus - el_input).max(0.0);
                    } else {
                        surplus_after_h2 = remain_surplus;
                    }
                }

                if let Some(ep) = &params.ev {
                    if surplus_after_h2 > 0.0 {
                        let ev_space = (ep.capacity_kwh - next.ev_soc_kwh).max(0.0);
                        if ev_space > 0.0 {
                            ev_charge_used_kwh =
                                surplus_after_h2.min(ep.charge_power_kwh).min(ev_space);
                            next.ev_soc_kwh += ev_charge_used_kwh;
                            surplus_after_h2 -= ev_charge_used_kwh;
                        }
                    }
                }

                sell_electricity = surplus_after_h2.max(0.0);
            }
            MonthMode::Consumption => {
                // Surplus in a consumption month is unexpected but legal;
                // it sells rather than vanishing.
                if remain_surplus > 0.0 {
                    sell_electricity = remain_surplus;
                }

                if buy_electricity > 0.0 && next.h2_storage_kwh > 0.0 {
                    let fc_possible = hp
                        .fc_rated_power_kwh
                        .min(next.h2_storage_kwh * hp.fc_efficiency);
                    let fc_output = buy_electricity.min(fc_possible);
                    if fc_output > 0.0 {
                        next.h2_storage_kwh =
                            (next.h2_storage_kwh - fc_output / hp.fc_efficiency).max(0.0);
                        buy_electricity -= fc_output;
                        flows.fc_output_used_kwh = fc_output;
                    }
                }
            }
            MonthMode::Idle => {}
        }

        flows.h2_storage_kwh = next.h2_storage_kwh;
        flows
    });

    // One discrete trip per hour, independent of month and of the
    // production/consumption branch above.
    if let Some(ep) = &params.ev {
        if ep.max_trips_per_day > 0
            && ep.trip_energy_kwh > 0.0
            && next.ev_trips_today < ep.max_trips_per_day
            && next.ev_soc_kwh >= ep.trip_energy_kwh
        {
            next.ev_soc_kwh -= ep.trip_energy_kwh;
            next.ev_trips_today += 1;
            ev_trip_count = 1;
        }
    }

    let ev = params.ev.as_ref().map(|ep| EvFlows {
        ev_soc_kwh: next.ev_soc_kwh,
        ev_charge_used_kwh,
        ev_trip_count,
        ev_trips_today: next.ev_trips_today,
        ev_trip_energy_kwh: ep.trip_energy_kwh,
    });

    let cost = buy_electricity * params.buy_price - sell_electricity * params.sell_price;

    let out = StepRecord {
        time: record.time,
        load_site_kwh: load,
        pv_net_pos_kwh: pv,
        cost,
        batt_soc_kwh: next.battery_soc_kwh,
        charge,
        discharge,
        buy_electricity,
        sell_electricity,
        remain_surplus,
        h2,
        ev,
    };

    (out, next)
}
