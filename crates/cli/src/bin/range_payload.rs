use std::path::PathBuf;

use clap::Parser;

use airperf::calibration::CalibrationMethod;
use airperf::config::AircraftRegistry;
use airperf::export::range_payload::{write_curves, CurvePoint};
use airperf::performance::{compute_range_for_payload, CruiseOptions};
use airperf::pipeline::calibrate_catalog;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compute mission-profile range-payload curves for the catalog"
)]
struct Cli {
    /// Aircraft catalog directory
    #[arg(long, default_value = "configs/aircraft")]
    catalog: PathBuf,

    /// Compute only this designation (default: whole catalog)
    #[arg(long)]
    aircraft: Option<String>,

    /// Payload samples per curve, max payload down to zero
    #[arg(long, default_value_t = 25)]
    points: usize,

    /// Output CSV path ("-" for stdout)
    #[arg(long, default_value = "artifacts/range_payload.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = AircraftRegistry::load(&cli.catalog)?;
    let calibrations = calibrate_catalog(&registry, CalibrationMethod::TwoStage)?;

    let mut curves = Vec::new();
    for cal in &calibrations {
        if let Some(only) = &cli.aircraft {
            if &cal.designation != only {
                continue;
            }
        }
        let spec = &registry.get(&cal.designation)?.spec;

        let n = cli.points.max(2);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let payload = spec.max_payload_lb * (1.0 - i as f64 / (n - 1) as f64);
            let fuel = spec.fuel_available_lb(payload).max(0.0);
            let breakdown = compute_range_for_payload(
                spec,
                payload,
                fuel,
                cal.cd0,
                cal.e,
                cal.k_adj,
                &CruiseOptions::default(),
            )?;
            points.push(CurvePoint {
                payload_lb: payload,
                fuel_lb: fuel,
                range_nm: breakdown.range_nm,
                takeoff_weight_lb: breakdown.takeoff_weight_lb,
            });
        }
        curves.push((cal.designation.clone(), points));
    }

    if curves.is_empty() {
        anyhow::bail!("no aircraft matched");
    }

    write_curves(&cli.output, &curves)?;
    eprintln!(
        "wrote {} curves -> {}",
        curves.len(),
        cli.output.display()
    );
    Ok(())
}
