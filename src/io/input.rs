//! Hourly input table loading.
//!
//! The canonical input is a CSV table with a `TIME` column plus the site
//! load and net-positive PV columns in kWh. A `batt_soc_kwh` column is
//! accepted and used only to seed the first row's battery state.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::error::SimError;
use crate::sim::types::HourlyRecord;

const TIME: &str = "TIME";
const LOAD: &str = "load_site_kwh";
const PV: &str = "pv_net_pos_kwh";
const BATT: &str = "batt_soc_kwh";

/// Timestamp formats accepted in the `TIME` column, tried in order.
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Reads an hourly input table from a CSV file.
///
/// # Errors
///
/// Returns [`SimError::MissingField`] when a required column is absent and
/// [`SimError::BadCell`] for the first unparseable cell.
pub fn read_hourly_csv(path: &Path) -> Result<Vec<HourlyRecord>, SimError> {
    let file = File::open(path)?;
    read_hourly_table(BufReader::new(file))
}

/// Reads an hourly input table from any CSV reader.
pub fn read_hourly_table(reader: impl Read) -> Result<Vec<HourlyRecord>, SimError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let time_idx = position(TIME).ok_or(SimError::MissingField(TIME))?;
    let load_idx = position(LOAD).ok_or(SimError::MissingField(LOAD))?;
    let pv_idx = position(PV).ok_or(SimError::MissingField(PV))?;
    let batt_idx = position(BATT);

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1; // 1-based data row, header not counted
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let time = parse_time(cell(time_idx), row)?;
        let load_site_kwh = parse_kwh(cell(load_idx), row, LOAD)?;
        let pv_net_pos_kwh = parse_kwh(cell(pv_idx), row, PV)?;

        if load_site_kwh < 0.0 {
            warn!(row, value = load_site_kwh, "negative load in input table");
        }
        if pv_net_pos_kwh < 0.0 {
            warn!(row, value = pv_net_pos_kwh, "negative pv generation in input table");
        }

        let batt_soc_kwh = match batt_idx.map(cell) {
            None | Some("") => None,
            Some(v) => Some(parse_kwh(v, row, BATT)?),
        };

        records.push(HourlyRecord {
            time,
            load_site_kwh,
            pv_net_pos_kwh,
            batt_soc_kwh,
        });
    }

    Ok(records)
}

fn parse_time(value: &str, row: usize) -> Result<NaiveDateTime, SimError> {
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(t);
        }
    }
    Err(SimError::BadCell {
        row,
        field: TIME,
        value: value.to_string(),
    })
}

fn parse_kwh(value: &str, row: usize, field: &'static str) -> Result<f64, SimError> {
    value.parse().map_err(|_| SimError::BadCell {
        row,
        field,
        value: value.to_string(),
    })
}
