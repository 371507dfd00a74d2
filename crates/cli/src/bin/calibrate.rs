use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use airperf::calibration::{format_calibration_report, sanity_check, CalibrationMethod};
use airperf::config::AircraftRegistry;
use airperf::export;
use airperf::pipeline::calibrate_catalog;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fit drag and TSFC parameters against published range-payload points"
)]
struct Cli {
    /// Aircraft catalog directory
    #[arg(long, default_value = "configs/aircraft")]
    catalog: PathBuf,

    /// Calibrate only this designation (default: whole catalog)
    #[arg(long)]
    aircraft: Option<String>,

    /// Optimizer routing
    #[arg(long, value_enum, default_value_t = Method::TwoStage)]
    method: Method,

    /// Summary CSV output path ("-" for stdout)
    #[arg(long, default_value = "artifacts/calibration.csv")]
    output: PathBuf,

    /// Directory for per-aircraft JSON sidecars (skipped when absent)
    #[arg(long)]
    sidecar_dir: Option<PathBuf>,

    /// Suppress the per-aircraft reports
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Method {
    TwoStage,
    Global,
    Local,
}

impl From<Method> for CalibrationMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::TwoStage => CalibrationMethod::TwoStage,
            Method::Global => CalibrationMethod::GlobalOnly,
            Method::Local => CalibrationMethod::LocalOnly,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let registry = AircraftRegistry::load(&cli.catalog)?;

    // Catalog validation notes go to stderr before any fitting starts.
    for entry in registry.all() {
        for issue in entry.spec.validate() {
            eprintln!("{}: {}", entry.spec.designation, issue);
        }
    }

    let mut results = calibrate_catalog(&registry, cli.method.into())?;
    if let Some(designation) = &cli.aircraft {
        results.retain(|r| &r.designation == designation);
        if results.is_empty() {
            anyhow::bail!("no aircraft with designation {designation} in the catalog");
        }
    }

    if !cli.quiet {
        for cal in &results {
            print!("{}", format_calibration_report(cal));
            for note in sanity_check(cal) {
                println!("  {note}");
            }
            println!();
        }
    }

    export::calibration::write_summary(&cli.output, &results)?;
    if let Some(dir) = &cli.sidecar_dir {
        for cal in &results {
            let path = dir.join(format!("{}.json", cal.designation.replace('/', "_")));
            export::calibration::write_sidecar(&path, cal)?;
        }
    }

    let n_converged = results.iter().filter(|r| r.converged).count();
    eprintln!(
        "calibrated {} aircraft ({} converged) -> {}",
        results.len(),
        n_converged,
        cli.output.display()
    );
    Ok(())
}
