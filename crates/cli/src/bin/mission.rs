use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use airperf::calibration::CalibrationMethod;
use airperf::config::AircraftRegistry;
use airperf::export;
use airperf::missions::endurance::{simulate_low_altitude_endurance, EnduranceOptions};
use airperf::missions::engine_out::{simulate_engine_out, EngineOutOptions};
use airperf::missions::sampling::{simulate_vertical_sampling, SamplingOptions};
use airperf::pipeline::calibrate_catalog;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Run a mission simulation across the aircraft catalog"
)]
struct Cli {
    /// Aircraft catalog directory
    #[arg(long, default_value = "configs/aircraft")]
    catalog: PathBuf,

    /// Mission to simulate
    #[arg(long, value_enum)]
    mission: Mission,

    /// Simulate only this designation (default: whole catalog)
    #[arg(long)]
    aircraft: Option<String>,

    /// Required total payload in lb (default: the mission's own)
    #[arg(long)]
    payload: Option<f64>,

    /// Mission distance in nm (engine-out and sampling missions)
    #[arg(long)]
    distance: Option<f64>,

    /// Engine failure point in nm from departure (engine-out mission)
    #[arg(long)]
    failure_point: Option<f64>,

    /// Mission duration in hours (endurance mission)
    #[arg(long)]
    duration: Option<f64>,

    /// Jet-A price in USD per gallon
    #[arg(long, default_value_t = airperf::fuel::DEFAULT_PRICE_PER_GALLON)]
    fuel_price: f64,

    /// Directory for per-aircraft CSV traces (skipped when absent)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Mission {
    EngineOut,
    Sampling,
    Endurance,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = AircraftRegistry::load(&cli.catalog)?;
    let calibrations = calibrate_catalog(&registry, CalibrationMethod::TwoStage)?;

    println!(
        "{:<12} {:>9} {:>6} {:>12} {:>12} {:>10}  {}",
        "Aircraft", "Feasible", "Fleet", "Payload(lb)", "Fuel(lb)", "Cost($)", "Notes"
    );

    for cal in &calibrations {
        if let Some(only) = &cli.aircraft {
            if &cal.designation != only {
                continue;
            }
        }
        let entry = registry.get(&cal.designation)?;
        let spec = &entry.spec;

        match cli.mission {
            Mission::EngineOut => {
                let mut opts = EngineOutOptions {
                    price_per_gallon: cli.fuel_price,
                    ..EngineOutOptions::default()
                };
                if let Some(p) = cli.payload {
                    opts.payload_lb = p;
                }
                if let Some(d) = cli.distance {
                    opts.distance_nm = d;
                }
                if let Some(f) = cli.failure_point {
                    opts.failure_point_nm = f;
                }
                let result = simulate_engine_out(spec, cal, &opts)?;
                print_row(
                    &result.designation,
                    result.feasible,
                    result.n_aircraft,
                    result.payload_actual_lb,
                    result.per_aircraft.as_ref().map(|d| d.total_fuel_lb),
                    result.per_aircraft.as_ref().map(|d| d.fuel_cost_usd),
                    result.infeasible_reason.as_deref(),
                );
                if let (Some(dir), Some(detail)) = (&cli.output_dir, &result.per_aircraft) {
                    let base = dir.join(&result.designation);
                    export::cruise::write_segments(
                        &base.join("segment1.csv"),
                        &detail.segment1.segments,
                    )?;
                    export::cruise::write_segments(
                        &base.join("segment2.csv"),
                        &detail.segment2.segments,
                    )?;
                }
            }
            Mission::Sampling => {
                let mut opts = SamplingOptions {
                    price_per_gallon: cli.fuel_price,
                    ..SamplingOptions::default()
                };
                if let Some(p) = cli.payload {
                    opts.payload_lb = p;
                }
                if let Some(d) = cli.distance {
                    opts.distance_nm = d;
                }
                let result = simulate_vertical_sampling(spec, cal, &opts)?;
                print_row(
                    &result.designation,
                    result.feasible,
                    result.n_aircraft,
                    result.payload_actual_lb,
                    result.per_aircraft.as_ref().map(|d| d.total_fuel_lb),
                    result.per_aircraft.as_ref().map(|d| d.fuel_cost_usd),
                    result.infeasible_reason.as_deref(),
                );
                if let (Some(dir), Some(detail)) = (&cli.output_dir, &result.per_aircraft) {
                    let base = dir.join(&result.designation);
                    export::sampling::write_cycles(&base.join("cycles.csv"), &detail.cycles)?;
                    export::sampling::write_profile(
                        &base.join("profile.csv"),
                        &detail.profile_points,
                    )?;
                }
            }
            Mission::Endurance => {
                let mut opts = EnduranceOptions {
                    price_per_gallon: cli.fuel_price,
                    ..EnduranceOptions::default()
                };
                if let Some(p) = cli.payload {
                    opts.payload_lb = p;
                }
                if let Some(d) = cli.duration {
                    opts.duration_hr = d;
                }
                let result = simulate_low_altitude_endurance(spec, cal, &opts)?;
                print_row(
                    &result.designation,
                    result.feasible,
                    result.n_aircraft,
                    result.payload_actual_lb,
                    result.per_aircraft.as_ref().map(|d| d.total_fuel_lb),
                    result.per_aircraft.as_ref().map(|d| d.fuel_cost_usd),
                    result.infeasible_reason.as_deref(),
                );
                if let (Some(dir), Some(detail)) = (&cli.output_dir, &result.per_aircraft) {
                    let base = dir.join(&result.designation);
                    export::endurance::write_steps(&base.join("steps.csv"), &detail.steps)?;
                }
            }
        }
    }

    Ok(())
}

fn print_row(
    designation: &str,
    feasible: bool,
    n_aircraft: u32,
    payload_lb: f64,
    fuel_lb: Option<f64>,
    cost_usd: Option<f64>,
    reason: Option<&str>,
) {
    println!(
        "{:<12} {:>9} {:>6} {:>12.0} {:>12} {:>10}  {}",
        designation,
        if feasible { "yes" } else { "NO" },
        n_aircraft,
        payload_lb,
        fuel_lb.map(|f| format!("{f:.0}")).unwrap_or_default(),
        cost_usd.map(|c| format!("{c:.0}")).unwrap_or_default(),
        reason.unwrap_or(""),
    );
}
