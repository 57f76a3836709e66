//! Resolved simulation parameters.
//!
//! [`SimParams`] is the validated, immutable form of a [`ScenarioConfig`]:
//! month sets become a per-month mode table, the EV trip energy is derived
//! once, and the optional hydrogen/EV layers collapse into `Option`s so the
//! step rule never re-checks variant strings.

use crate::config::ScenarioConfig;
use crate::error::SimError;

/// Hydrogen-path behaviour for one calendar month, resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthMode {
    /// Electrolyzer converts leftover surplus into stored hydrogen.
    Production,
    /// Fuel cell offsets grid purchases from stored hydrogen.
    Consumption,
    /// Neither device acts; leftover surplus stays unsold.
    Idle,
}

/// Electrolyzer, storage, and fuel cell parameters.
#[derive(Debug, Clone)]
pub struct HydrogenParams {
    /// Electrolyzer electrical input limit per hour (kWh).
    pub el_rated_power_kwh: f64,
    /// Electrolyzer efficiency, electricity in to hydrogen energy out (0–1).
    pub el_efficiency: f64,
    /// Hydrogen storage capacity (kWh-equivalent).
    pub storage_capacity_kwh: f64,
    /// Fuel cell electrical output limit per hour (kWh).
    pub fc_rated_power_kwh: f64,
    /// Fuel cell efficiency, hydrogen energy in to electricity out (0–1).
    pub fc_efficiency: f64,
    /// Mode per calendar month, indexed by `month - 1`.
    month_modes: [MonthMode; 12],
}

impl HydrogenParams {
    /// Returns the hydrogen-path mode for a calendar month (1–12).
    pub fn mode_for(&self, month: u32) -> MonthMode {
        self.month_modes[(month - 1) as usize]
    }
}

/// EV parameters with the derived per-trip energy.
#[derive(Debug, Clone)]
pub struct EvParams {
    /// Traction battery capacity (kWh).
    pub capacity_kwh: f64,
    /// Charge limit per hour (kWh).
    pub charge_power_kwh: f64,
    /// Energy consumed by one trip (kWh):
    /// `daily_distance_km / efficiency_km_per_kwh / max_trips_per_day`.
    pub trip_energy_kwh: f64,
    /// Trip cap per calendar day.
    pub max_trips_per_day: u32,
}

/// Immutable per-run simulation parameters.
///
/// The optional layers select the scenario variant: `hydrogen: None` is
/// battery-only, `ev: Some(..)` implies the full battery+hydrogen+EV stack.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Purchase price per kWh.
    pub buy_price: f64,
    /// Feed-in price per kWh.
    pub sell_price: f64,
    /// Battery usable capacity (kWh).
    pub battery_capacity_kwh: f64,
    /// Battery charge/discharge limit per hour (kWh).
    pub battery_rated_power_kwh: f64,
    /// Hydrogen layer, absent for battery-only runs.
    pub hydrogen: Option<HydrogenParams>,
    /// EV layer, absent unless the variant is `battery_h2_ev`.
    pub ev: Option<EvParams>,
}

impl SimParams {
    /// Validates a scenario configuration and resolves it into run parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] carrying every validation failure
    /// when the configuration is rejected.
    pub fn resolve(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(SimError::InvalidConfig(errors));
        }

        let hydrogen = cfg.hydrogen_enabled().then(|| {
            let mut month_modes = [MonthMode::Idle; 12];
            for &m in &cfg.months.production {
                month_modes[(m - 1) as usize] = MonthMode::Production;
            }
            for &m in &cfg.months.consumption {
                month_modes[(m - 1) as usize] = MonthMode::Consumption;
            }
            HydrogenParams {
                el_rated_power_kwh: cfg.electrolyzer.rated_power_kwh,
                el_efficiency: cfg.electrolyzer.efficiency,
                storage_capacity_kwh: cfg.h2_storage.capacity_kwh,
                fc_rated_power_kwh: cfg.fuel_cell.rated_power_kwh,
                fc_efficiency: cfg.fuel_cell.efficiency,
                month_modes,
            }
        });

        let ev = cfg.ev_enabled().then(|| EvParams {
            capacity_kwh: cfg.ev.capacity_kwh,
            charge_power_kwh: cfg.ev.charge_power_kwh,
            trip_energy_kwh: cfg.ev.daily_distance_km
                / cfg.ev.efficiency_km_per_kwh
                / f64::from(cfg.ev.max_trips_per_day),
            max_trips_per_day: cfg.ev.max_trips_per_day,
        });

        Ok(Self {
            buy_price: cfg.prices.buy_per_kwh,
            sell_price: cfg.prices.sell_per_kwh,
            battery_capacity_kwh: cfg.battery.capacity_kwh,
            battery_rated_power_kwh: cfg.battery.rated_power_kwh,
            hydrogen,
            ev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn battery_only_has_no_layers() {
        let params = SimParams::resolve(&ScenarioConfig::battery_only()).unwrap();
        assert!(params.hydrogen.is_none());
        assert!(params.ev.is_none());
        assert_eq!(params.battery_capacity_kwh, 14.6);
    }

    #[test]
    fn hydrogen_variant_resolves_month_modes() {
        let params = SimParams::resolve(&ScenarioConfig::cottage_h2()).unwrap();
        let h2 = params.hydrogen.expect("hydrogen layer should be enabled");
        assert_eq!(h2.mode_for(4), MonthMode::Production);
        assert_eq!(h2.mode_for(11), MonthMode::Production);
        assert_eq!(h2.mode_for(1), MonthMode::Consumption);
        assert_eq!(h2.mode_for(12), MonthMode::Consumption);
        assert!(params.ev.is_none());
    }

    #[test]
    fn month_in_neither_set_is_idle() {
        let mut cfg = ScenarioConfig::cottage_h2();
        cfg.months.production = vec![6, 7, 8];
        cfg.months.consumption = vec![12, 1, 2];
        let params = SimParams::resolve(&cfg).unwrap();
        let h2 = params.hydrogen.unwrap();
        assert_eq!(h2.mode_for(4), MonthMode::Idle);
        assert_eq!(h2.mode_for(10), MonthMode::Idle);
    }

    #[test]
    fn ev_trip_energy_is_derived() {
        let mut cfg = ScenarioConfig::cottage_h2_ev();
        cfg.ev.daily_distance_km = 42.0;
        cfg.ev.efficiency_km_per_kwh = 7.0;
        cfg.ev.max_trips_per_day = 3;
        let params = SimParams::resolve(&cfg).unwrap();
        let ev = params.ev.expect("ev layer should be enabled");
        // 42 km / 7 km/kWh / 3 trips = 2 kWh per trip
        assert_abs_diff_eq!(ev.trip_energy_kwh, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = ScenarioConfig::cottage_h2();
        cfg.electrolyzer.efficiency = 0.0;
        let err = SimParams::resolve(&cfg);
        assert!(matches!(err, Err(SimError::InvalidConfig(_))));
    }
}
