//! Run-level summary metrics derived from an output table.

use std::fmt;

use super::types::StepRecord;

/// Grid emission factor, kg CO2 per purchased kWh.
pub const GRID_CO2_KG_PER_KWH: f64 = 0.431;

/// Aggregate metrics for one simulation run.
///
/// Derived from the output rows after the fold; never persisted alongside
/// the hourly table. Ratios are percentages and fall back to 0 when their
/// denominator is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    /// Negated sum of the hourly `cost` column: positive means the site
    /// earned more from feed-in than it spent on purchases.
    pub total_cost: f64,
    /// Total grid purchase (kWh).
    pub total_buy_kwh: f64,
    /// Total feed-in (kWh).
    pub total_sell_kwh: f64,
    /// Total PV generation (kWh).
    pub total_pv_kwh: f64,
    /// Total site consumption (kWh).
    pub total_load_kwh: f64,
    /// Share of PV generation consumed on site, percent.
    pub self_consumption_pct: f64,
    /// Share of consumption covered without the grid, percent.
    pub self_sufficiency_pct: f64,
    /// Emissions attributed to grid purchases (kg CO2).
    pub co2_kg: f64,
}

impl SummaryReport {
    /// Computes the summary over a run's output rows.
    pub fn from_records(records: &[StepRecord]) -> Self {
        let mut cost_sum = 0.0;
        let mut buy = 0.0;
        let mut sell = 0.0;
        let mut pv = 0.0;
        let mut load = 0.0;
        for r in records {
            cost_sum += r.cost;
            buy += r.buy_electricity;
            sell += r.sell_electricity;
            pv += r.pv_net_pos_kwh;
            load += r.load_site_kwh;
        }

        Self {
            total_cost: -cost_sum,
            total_buy_kwh: buy,
            total_sell_kwh: sell,
            total_pv_kwh: pv,
            total_load_kwh: load,
            self_consumption_pct: ratio_pct(pv - sell, pv),
            self_sufficiency_pct: ratio_pct(load - buy, load),
            co2_kg: buy * GRID_CO2_KG_PER_KWH,
        }
    }

    /// Cost reduction against a baseline run, percent.
    ///
    /// Compares the raw (non-negated) cost sums; a baseline with zero net
    /// cost yields 0.
    pub fn cost_reduction_pct(&self, baseline: &SummaryReport) -> f64 {
        let baseline_cost = -baseline.total_cost;
        let own_cost = -self.total_cost;
        ratio_pct(baseline_cost - own_cost, baseline_cost)
    }
}

fn ratio_pct(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "run summary")?;
        writeln!(f, "  total cost        : {:>12.2}", -self.total_cost)?;
        writeln!(f, "  grid purchase     : {:>12.2} kWh", self.total_buy_kwh)?;
        writeln!(f, "  feed-in           : {:>12.2} kWh", self.total_sell_kwh)?;
        writeln!(f, "  pv generation     : {:>12.2} kWh", self.total_pv_kwh)?;
        writeln!(f, "  site load         : {:>12.2} kWh", self.total_load_kwh)?;
        writeln!(
            f,
            "  self-consumption  : {:>11.1} %",
            self.self_consumption_pct
        )?;
        writeln!(
            f,
            "  self-sufficiency  : {:>11.1} %",
            self.self_sufficiency_pct
        )?;
        write!(f, "  co2 from grid     : {:>12.2} kg", self.co2_kg)
    }
}
