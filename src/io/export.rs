//! CSV export of the hourly output table.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SimError;
use crate::sim::types::StepRecord;

const BASE_HEADER: &[&str] = &[
    "TIME",
    "load_site_kwh",
    "pv_net_pos_kwh",
    "cost",
    "batt_soc_kwh",
    "charge",
    "discharge",
    "buy_electricity",
    "sell_electricity",
];

const H2_HEADER: &[&str] = &[
    "remain_surplus",
    "h2_storage_kwh",
    "h2_energy_kwh",
    "el_input_used_kwh",
    "fc_output_used_kwh",
    "buy_before_h2",
];

const EV_HEADER: &[&str] = &[
    "ev_soc_kwh",
    "ev_charge_used_kwh",
    "ev_trip_count",
    "ev_trips_today",
    "ev_trip_energy_kwh",
];

/// Exports an output table to a CSV file at the given path.
///
/// The column set follows the scenario variant: battery-only tables carry
/// the base columns, the hydrogen and EV column groups appear only when
/// those layers produced flows. Output is deterministic for identical runs.
///
/// # Errors
///
/// Returns [`SimError::Io`] or [`SimError::Csv`] when writing fails.
pub fn export_csv(records: &[StepRecord], path: &Path) -> Result<(), SimError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, buf)
}

/// Writes an output table as CSV to any writer.
pub fn write_csv(records: &[StepRecord], writer: impl Write) -> Result<(), SimError> {
    let with_h2 = records.first().is_some_and(|r| r.h2.is_some());
    let with_ev = records.first().is_some_and(|r| r.ev.is_some());

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header: Vec<&str> = BASE_HEADER.to_vec();
    if with_h2 {
        header.extend_from_slice(H2_HEADER);
    }
    if with_ev {
        header.extend_from_slice(EV_HEADER);
    }
    wtr.write_record(&header)?;

    for r in records {
        let mut row = vec![
            r.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.4}", r.load_site_kwh),
            format!("{:.4}", r.pv_net_pos_kwh),
            format!("{:.4}", r.cost),
            format!("{:.4}", r.batt_soc_kwh),
            format!("{:.4}", r.charge),
            format!("{:.4}", r.discharge),
            format!("{:.4}", r.buy_electricity),
            format!("{:.4}", r.sell_electricity),
        ];
        if with_h2 {
            let h2 = r.h2.as_ref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "row missing hydrogen columns")
            })?;
            row.push(format!("{:.4}", r.remain_surplus));
            row.push(format!("{:.4}", h2.h2_storage_kwh));
            row.push(format!("{:.4}", h2.h2_energy_kwh));
            row.push(format!("{:.4}", h2.el_input_used_kwh));
            row.push(format!("{:.4}", h2.fc_output_used_kwh));
            row.push(format!("{:.4}", h2.buy_before_h2));
        }
        if with_ev {
            let ev = r.ev.as_ref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidData, "row missing ev columns")
            })?;
            row.push(format!("{:.4}", ev.ev_soc_kwh));
            row.push(format!("{:.4}", ev.ev_charge_used_kwh));
            row.push(ev.ev_trip_count.to_string());
            row.push(ev.ev_trips_today.to_string());
            row.push(format!("{:.4}", ev.ev_trip_energy_kwh));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::sim::params::SimParams;
    use crate::sim::runner::run;
    use crate::sim::types::HourlyRecord;
    use chrono::NaiveDate;

    fn records(n: u32) -> Vec<HourlyRecord> {
        (0..n)
            .map(|i| HourlyRecord {
                time: NaiveDate::from_ymd_opt(2025, 6, 1)
                    .unwrap()
                    .and_hms_opt(i % 24, 0, 0)
                    .unwrap(),
                load_site_kwh: 2.0,
                pv_net_pos_kwh: f64::from(i % 6),
                batt_soc_kwh: None,
            })
            .collect()
    }

    fn export_string(params: &SimParams, n: u32) -> String {
        let rows = run(params, &records(n));
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn battery_only_header_has_no_layer_columns() {
        let params = SimParams::resolve(&ScenarioConfig::battery_only()).unwrap();
        let out = export_string(&params, 3);
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "TIME,load_site_kwh,pv_net_pos_kwh,cost,batt_soc_kwh,charge,discharge,\
             buy_electricity,sell_electricity"
        );
    }

    #[test]
    fn hydrogen_header_adds_h2_columns() {
        let params = SimParams::resolve(&ScenarioConfig::cottage_h2()).unwrap();
        let out = export_string(&params, 3);
        let header = out.lines().next().unwrap();
        assert!(header.ends_with(
            "remain_surplus,h2_storage_kwh,h2_energy_kwh,el_input_used_kwh,\
             fc_output_used_kwh,buy_before_h2"
        ));
        assert!(!header.contains("ev_soc_kwh"));
    }

    #[test]
    fn ev_header_adds_ev_columns() {
        let params = SimParams::resolve(&ScenarioConfig::cottage_h2_ev()).unwrap();
        let out = export_string(&params, 3);
        let header = out.lines().next().unwrap();
        assert!(header.contains("buy_before_h2"));
        assert!(header.ends_with(
            "ev_soc_kwh,ev_charge_used_kwh,ev_trip_count,ev_trips_today,ev_trip_energy_kwh"
        ));
    }

    #[test]
    fn row_count_matches_input() {
        let params = SimParams::resolve(&ScenarioConfig::cottage_h2()).unwrap();
        let out = export_string(&params, 24);
        // 1 header + 24 data rows
        assert_eq!(out.lines().count(), 25);
    }

    #[test]
    fn timestamps_use_canonical_format() {
        let params = SimParams::resolve(&ScenarioConfig::battery_only()).unwrap();
        let out = export_string(&params, 1);
        let first_row = out.lines().nth(1).unwrap();
        assert!(first_row.starts_with("2025-06-01 00:00:00,"));
    }

    #[test]
    fn deterministic_output() {
        let params = SimParams::resolve(&ScenarioConfig::cottage_h2_ev()).unwrap();
        let a = export_string(&params, 24);
        let b = export_string(&params, 24);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_run_writes_header_only() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out.lines().count(), 1);
    }
}
