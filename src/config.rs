//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Scenario variant names accepted in the `variant` field.
pub const VARIANTS: &[&str] = &["battery_only", "battery_h2", "battery_h2_ev"];

fn default_variant() -> String {
    "battery_h2".to_string()
}

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `cottage_h2` preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::from_preset`] for a built-in scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Which device stack to simulate: `"battery_only"`, `"battery_h2"`,
    /// or `"battery_h2_ev"`.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Electricity tariff.
    #[serde(default)]
    pub prices: PriceConfig,
    /// Stationary battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Electrolyzer parameters (hydrogen variants).
    #[serde(default)]
    pub electrolyzer: ElectrolyzerConfig,
    /// Hydrogen storage parameters (hydrogen variants).
    #[serde(default)]
    pub h2_storage: H2StorageConfig,
    /// Fuel cell parameters (hydrogen variants).
    #[serde(default)]
    pub fuel_cell: FuelCellConfig,
    /// Calendar-month classification for the hydrogen path.
    #[serde(default)]
    pub months: MonthConfig,
    /// EV parameters (`battery_h2_ev` only).
    #[serde(default)]
    pub ev: EvConfig,
}

/// Electricity tariff.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Purchase price per kWh bought from the grid.
    pub buy_per_kwh: f64,
    /// Feed-in price per kWh sold to the grid.
    pub sell_per_kwh: f64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            buy_per_kwh: 31.0,
            sell_per_kwh: 16.0,
        }
    }
}

/// Stationary battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Usable capacity (kWh).
    pub capacity_kwh: f64,
    /// Charge/discharge limit per hour (kWh).
    pub rated_power_kwh: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 14.6,
            rated_power_kwh: 3.0,
        }
    }
}

/// Electrolyzer parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElectrolyzerConfig {
    /// Electrical input limit per hour (kWh).
    pub rated_power_kwh: f64,
    /// Electricity-in to hydrogen-energy-out ratio (0–1).
    pub efficiency: f64,
}

impl Default for ElectrolyzerConfig {
    fn default() -> Self {
        Self {
            rated_power_kwh: 3.0,
            efficiency: 0.5,
        }
    }
}

/// Hydrogen storage parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct H2StorageConfig {
    /// Storage capacity in kWh-equivalent of hydrogen energy.
    pub capacity_kwh: f64,
}

impl Default for H2StorageConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 200.0,
        }
    }
}

/// Fuel cell parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FuelCellConfig {
    /// Electrical output limit per hour (kWh).
    pub rated_power_kwh: f64,
    /// Hydrogen-energy-in to electricity-out ratio (0–1).
    pub efficiency: f64,
}

impl Default for FuelCellConfig {
    fn default() -> Self {
        Self {
            rated_power_kwh: 3.0,
            efficiency: 0.5,
        }
    }
}

/// Calendar-month classification for the hydrogen path.
///
/// Months in `production` run the electrolyzer on surplus; months in
/// `consumption` run the fuel cell against grid purchases. A month in
/// neither set leaves the hydrogen path idle. The sets must not overlap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonthConfig {
    /// Electrolyzer months (1–12).
    pub production: Vec<u32>,
    /// Fuel-cell months (1–12).
    pub consumption: Vec<u32>,
}

impl Default for MonthConfig {
    fn default() -> Self {
        Self {
            production: vec![4, 5, 6, 7, 8, 9, 10, 11],
            consumption: vec![1, 2, 3, 12],
        }
    }
}

/// EV parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvConfig {
    /// Traction battery capacity (kWh).
    pub capacity_kwh: f64,
    /// Charge limit per hour (kWh).
    pub charge_power_kwh: f64,
    /// Driving efficiency (km per kWh).
    pub efficiency_km_per_kwh: f64,
    /// Distance driven per day (km).
    pub daily_distance_km: f64,
    /// Number of discrete trips the daily distance is split into.
    pub max_trips_per_day: u32,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 40.0,
            charge_power_kwh: 6.0,
            efficiency_km_per_kwh: 7.0,
            daily_distance_km: 30.0,
            max_trips_per_day: 2,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the battery-only preset: the 14.6 kWh / 3 kW cottage battery
    /// with no hydrogen path.
    pub fn battery_only() -> Self {
        Self {
            variant: "battery_only".to_string(),
            ..Self::cottage_h2()
        }
    }

    /// Returns the cottage battery+hydrogen preset: seasonal electrolyzer
    /// (Apr–Nov) and fuel cell (Dec–Mar) around a 200 kWh store.
    pub fn cottage_h2() -> Self {
        Self {
            variant: "battery_h2".to_string(),
            prices: PriceConfig::default(),
            battery: BatteryConfig::default(),
            electrolyzer: ElectrolyzerConfig::default(),
            h2_storage: H2StorageConfig::default(),
            fuel_cell: FuelCellConfig::default(),
            months: MonthConfig::default(),
            ev: EvConfig::default(),
        }
    }

    /// Returns the cottage preset with the EV layer enabled.
    pub fn cottage_h2_ev() -> Self {
        Self {
            variant: "battery_h2_ev".to_string(),
            ..Self::cottage_h2()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["battery_only", "cottage_h2", "cottage_h2_ev"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "battery_only" => Ok(Self::battery_only()),
            "cottage_h2" => Ok(Self::cottage_h2()),
            "cottage_h2_ev" => Ok(Self::cottage_h2_ev()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Whether the hydrogen layer is active for this variant.
    pub fn hydrogen_enabled(&self) -> bool {
        self.variant == "battery_h2" || self.variant == "battery_h2_ev"
    }

    /// Whether the EV layer is active for this variant.
    pub fn ev_enabled(&self) -> bool {
        self.variant == "battery_h2_ev"
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid. Efficiency
    /// and month constraints are only enforced for the layers the variant
    /// actually enables, so a battery-only scenario may carry unused
    /// hydrogen sections without tripping validation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !VARIANTS.contains(&self.variant.as_str()) {
            errors.push(ConfigError {
                field: "variant".into(),
                message: format!(
                    "must be one of {}, got \"{}\"",
                    VARIANTS.join(", "),
                    self.variant
                ),
            });
        }

        if self.prices.buy_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "prices.buy_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.prices.sell_per_kwh < 0.0 {
            errors.push(ConfigError {
                field: "prices.sell_per_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.battery.capacity_kwh < 0.0 {
            errors.push(ConfigError {
                field: "battery.capacity_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.battery.rated_power_kwh < 0.0 {
            errors.push(ConfigError {
                field: "battery.rated_power_kwh".into(),
                message: "must be >= 0".into(),
            });
        }

        if self.hydrogen_enabled() {
            self.validate_hydrogen(&mut errors);
        }
        if self.ev_enabled() {
            self.validate_ev(&mut errors);
        }

        errors
    }

    fn validate_hydrogen(&self, errors: &mut Vec<ConfigError>) {
        if self.electrolyzer.rated_power_kwh < 0.0 {
            errors.push(ConfigError {
                field: "electrolyzer.rated_power_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        // Efficiencies divide energy amounts; zero is rejected here rather
        // than surfacing as division-by-zero mid-run.
        if !(self.electrolyzer.efficiency > 0.0 && self.electrolyzer.efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "electrolyzer.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }
        if self.h2_storage.capacity_kwh < 0.0 {
            errors.push(ConfigError {
                field: "h2_storage.capacity_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.fuel_cell.rated_power_kwh < 0.0 {
            errors.push(ConfigError {
                field: "fuel_cell.rated_power_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(self.fuel_cell.efficiency > 0.0 && self.fuel_cell.efficiency <= 1.0) {
            errors.push(ConfigError {
                field: "fuel_cell.efficiency".into(),
                message: "must be in (0.0, 1.0]".into(),
            });
        }

        for (name, set) in [
            ("months.production", &self.months.production),
            ("months.consumption", &self.months.consumption),
        ] {
            for &m in set {
                if !(1..=12).contains(&m) {
                    errors.push(ConfigError {
                        field: name.into(),
                        message: format!("month {m} is outside 1–12"),
                    });
                }
            }
        }
        let overlap: Vec<u32> = self
            .months
            .production
            .iter()
            .copied()
            .filter(|m| self.months.consumption.contains(m))
            .collect();
        if !overlap.is_empty() {
            errors.push(ConfigError {
                field: "months".into(),
                message: format!(
                    "production and consumption sets overlap on {overlap:?}; a month selects exactly one branch"
                ),
            });
        }
    }

    fn validate_ev(&self, errors: &mut Vec<ConfigError>) {
        if self.ev.capacity_kwh < 0.0 {
            errors.push(ConfigError {
                field: "ev.capacity_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.ev.charge_power_kwh < 0.0 {
            errors.push(ConfigError {
                field: "ev.charge_power_kwh".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.ev.efficiency_km_per_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "ev.efficiency_km_per_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if self.ev.daily_distance_km < 0.0 {
            errors.push(ConfigError {
                field: "ev.daily_distance_km".into(),
                message: "must be >= 0".into(),
            });
        }
        if self.ev.max_trips_per_day == 0 {
            errors.push(ConfigError {
                field: "ev.max_trips_per_day".into(),
                message: "must be >= 1".into(),
            });
        }
    }
}
