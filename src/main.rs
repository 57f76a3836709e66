//! Simulator entry point — CLI wiring, input loading, run, and export.

use std::path::Path;
use std::process;

use anyhow::Context;
use site_sim::config::ScenarioConfig;
use site_sim::io::export::export_csv;
use site_sim::io::input::read_hourly_csv;
use site_sim::sim::params::SimParams;
use site_sim::sim::runner::run;
use site_sim::sim::summary::SummaryReport;

/// Parsed CLI arguments.
struct CliArgs {
    input_path: Option<String>,
    scenario_path: Option<String>,
    preset: Option<String>,
    out_path: Option<String>,
    compare_baseline: bool,
    print_rows: bool,
}

fn print_help() {
    eprintln!("site-sim — hourly on-site energy economics simulator");
    eprintln!();
    eprintln!("Usage: site-sim --input <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --input <path>       Hourly input table (CSV, required)");
    eprintln!("  --scenario <path>    Load scenario from TOML config file");
    eprintln!("  --preset <name>      Use a built-in preset (battery_only, cottage_h2, cottage_h2_ev)");
    eprintln!("  --out <path>         Export the hourly output table to CSV");
    eprintln!("  --compare-baseline   Also run a battery-only baseline and report the cost reduction");
    eprintln!("  --print-rows         Print every output row");
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the cottage_h2 preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        input_path: None,
        scenario_path: None,
        preset: None,
        out_path: None,
        compare_baseline: false,
        print_rows: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--input" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --input requires a path argument");
                    process::exit(1);
                }
                cli.input_path = Some(args[i].clone());
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out requires a path argument");
                    process::exit(1);
                }
                cli.out_path = Some(args[i].clone());
            }
            "--compare-baseline" => {
                cli.compare_baseline = true;
            }
            "--print-rows" => {
                cli.print_rows = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Battery-only scenario sharing the prices and battery of the given one.
fn baseline_of(cfg: &ScenarioConfig) -> ScenarioConfig {
    let mut baseline = ScenarioConfig::battery_only();
    baseline.prices = cfg.prices.clone();
    baseline.battery = cfg.battery.clone();
    baseline
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = parse_args();

    let Some(ref input_path) = cli.input_path else {
        eprintln!("error: --input is required");
        print_help();
        process::exit(1);
    };

    // Load config: --scenario takes priority, then --preset, then the default preset
    let scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::cottage_h2()
    };

    let params = SimParams::resolve(&scenario)?;

    let records = read_hourly_csv(Path::new(input_path))
        .with_context(|| format!("cannot load input table {input_path}"))?;

    let rows = run(&params, &records);

    if cli.print_rows {
        for r in &rows {
            println!("{r}");
        }
        println!();
    }

    let report = SummaryReport::from_records(&rows);
    println!("{report}");

    if cli.compare_baseline {
        let baseline_params = SimParams::resolve(&baseline_of(&scenario))?;
        let baseline_rows = run(&baseline_params, &records);
        let baseline_report = SummaryReport::from_records(&baseline_rows);
        println!(
            "  cost reduction vs battery-only: {:.1} %",
            report.cost_reduction_pct(&baseline_report)
        );
    }

    if let Some(ref path) = cli.out_path {
        export_csv(&rows, Path::new(path))
            .with_context(|| format!("cannot write output table {path}"))?;
        eprintln!("Output table written to {path}");
    }

    Ok(())
}
