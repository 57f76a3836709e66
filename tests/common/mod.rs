//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime};
use site_sim::config::ScenarioConfig;
use site_sim::sim::params::SimParams;
use site_sim::sim::types::HourlyRecord;

/// Timestamp helper: 2025 at the given month, day, and hour.
pub fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// One input row without a measured battery state.
pub fn record(month: u32, day: u32, hour: u32, load: f64, pv: f64) -> HourlyRecord {
    HourlyRecord {
        time: at(month, day, hour),
        load_site_kwh: load,
        pv_net_pos_kwh: pv,
        batt_soc_kwh: None,
    }
}

/// One full day of rows with a crude solar bell: pv peaks midday, load
/// is flat with a morning and evening bump. The first row seeds the
/// battery at `initial_batt_soc_kwh`.
pub fn one_day(month: u32, day: u32, initial_batt_soc_kwh: f64) -> Vec<HourlyRecord> {
    (0..24)
        .map(|h| {
            let pv = if (7..=17).contains(&h) {
                let x = f64::from(h) - 12.0;
                (5.0 - x * x * 0.2).max(0.0)
            } else {
                0.0
            };
            let load = match h {
                7 | 8 | 18..=21 => 2.5,
                _ => 1.0,
            };
            let mut r = record(month, day, h, load, pv);
            if h == 0 {
                r.batt_soc_kwh = Some(initial_batt_soc_kwh);
            }
            r
        })
        .collect()
}

/// Several consecutive days of the daily profile.
pub fn days(month: u32, first_day: u32, count: u32, initial_batt_soc_kwh: f64) -> Vec<HourlyRecord> {
    let mut rows = Vec::new();
    for d in 0..count {
        let mut day = one_day(month, first_day + d, initial_batt_soc_kwh);
        if d > 0 {
            for r in &mut day {
                r.batt_soc_kwh = None;
            }
        }
        rows.append(&mut day);
    }
    rows
}

/// Battery-only parameters: 10 kWh capacity, 3 kWh rated power.
pub fn battery_params() -> SimParams {
    let mut cfg = ScenarioConfig::battery_only();
    cfg.battery.capacity_kwh = 10.0;
    cfg.battery.rated_power_kwh = 3.0;
    SimParams::resolve(&cfg).unwrap()
}

/// Hydrogen scenario with June producing and January consuming.
pub fn h2_config() -> ScenarioConfig {
    let mut cfg = ScenarioConfig::cottage_h2();
    cfg.battery.capacity_kwh = 10.0;
    cfg.battery.rated_power_kwh = 3.0;
    cfg.electrolyzer.rated_power_kwh = 3.0;
    cfg.electrolyzer.efficiency = 0.5;
    cfg.h2_storage.capacity_kwh = 50.0;
    cfg.fuel_cell.rated_power_kwh = 3.0;
    cfg.fuel_cell.efficiency = 0.5;
    cfg.months.production = vec![5, 6, 7];
    cfg.months.consumption = vec![12, 1, 2];
    cfg
}

pub fn h2_params() -> SimParams {
    SimParams::resolve(&h2_config()).unwrap()
}

/// Full stack scenario: hydrogen plus an EV with 2 kWh trips, two per day.
pub fn ev_config() -> ScenarioConfig {
    let mut cfg = h2_config();
    cfg.variant = "battery_h2_ev".to_string();
    cfg.ev.capacity_kwh = 20.0;
    cfg.ev.charge_power_kwh = 4.0;
    // 28 km / 7 km-per-kWh / 2 trips = 2 kWh per trip
    cfg.ev.daily_distance_km = 28.0;
    cfg.ev.efficiency_km_per_kwh = 7.0;
    cfg.ev.max_trips_per_day = 2;
    cfg
}

pub fn ev_params() -> SimParams {
    SimParams::resolve(&ev_config()).unwrap()
}
