//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod calibration {
    use super::writer_for_path;
    use airperf_calibration::CalibratedParameters;
    use serde_json::to_writer_pretty;
    use std::fs::File;
    use std::io::{self, Write};
    use std::path::Path;

    const SUMMARY_HEADER: &str =
        "designation,aircraft_name,cd0,e,k_adj,f_oh,l_d_max,cl_at_max_ld,rms_error,converged,derived_from";

    /// Write the one-row-per-aircraft calibration summary CSV.
    pub fn write_summary(path: &Path, results: &[CalibratedParameters]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "{SUMMARY_HEADER}")?;
        for cal in results {
            writeln!(
                w,
                "{},{},{:.6},{:.4},{:.4},{:.4},{:.2},{:.4},{:.6},{},{}",
                cal.designation,
                cal.aircraft_name,
                cal.cd0,
                cal.e,
                cal.k_adj,
                cal.f_oh,
                cal.l_d_max,
                cal.cl_at_max_ld,
                cal.rms_error,
                if cal.converged { "true" } else { "false" },
                cal.derived_from.as_deref().unwrap_or(""),
            )?;
        }
        w.flush()
    }

    /// Write the full calibration result, point diagnostics included, as a
    /// JSON sidecar next to the summary.
    pub fn write_sidecar(path: &Path, cal: &CalibratedParameters) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, cal)?;
        Ok(())
    }
}

pub mod cruise {
    use super::writer_for_path;
    use airperf_performance::CruiseSegment;
    use std::io::{self, Write};
    use std::path::Path;

    const HEADER: &str =
        "step,w_start_lb,w_end_lb,altitude_ft,mach,cl,cd,l_d,effective_l_d,tsfc,v_ktas,range_nm,cumulative_range_nm,cumulative_fuel_lb";

    /// Write a step-cruise segment trace as CSV.
    pub fn write_segments(path: &Path, segments: &[CruiseSegment]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "{HEADER}")?;
        for s in segments {
            writeln!(
                w,
                "{},{:.1},{:.1},{:.0},{:.3},{:.4},{:.5},{:.3},{:.3},{:.4},{:.1},{:.3},{:.3},{:.1}",
                s.step,
                s.w_start_lb,
                s.w_end_lb,
                s.altitude_ft,
                s.mach,
                s.cl,
                s.cd,
                s.l_d,
                s.effective_l_d,
                s.tsfc,
                s.v_ktas,
                s.range_nm,
                s.cumulative_range_nm,
                s.cumulative_fuel_lb,
            )?;
        }
        w.flush()
    }
}

pub mod sampling {
    use super::writer_for_path;
    use airperf_missions::sampling::{ProfilePoint, SawtoothCycle};
    use std::io::{self, Write};
    use std::path::Path;

    const CYCLE_HEADER: &str =
        "cycle,ceiling_ft,climb_fuel_lb,climb_distance_nm,climb_time_hr,descent_fuel_lb,descent_distance_nm,descent_time_hr,total_fuel_lb,total_distance_nm,total_time_hr,weight_start_lb,weight_end_lb,partial";

    /// Write the per-cycle sawtooth table as CSV.
    pub fn write_cycles(path: &Path, cycles: &[SawtoothCycle]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "{CYCLE_HEADER}")?;
        for c in cycles {
            writeln!(
                w,
                "{},{:.0},{:.1},{:.2},{:.4},{:.1},{:.2},{:.4},{:.1},{:.2},{:.4},{:.1},{:.1},{}",
                c.cycle,
                c.ceiling_ft,
                c.climb_fuel_lb,
                c.climb_distance_nm,
                c.climb_time_hr,
                c.descent_fuel_lb,
                c.descent_distance_nm,
                c.descent_time_hr,
                c.total_fuel_lb,
                c.total_distance_nm,
                c.total_time_hr,
                c.weight_start_lb,
                c.weight_end_lb,
                if c.partial { "true" } else { "false" },
            )?;
        }
        w.flush()
    }

    /// Write the sawtooth altitude profile vertices as CSV.
    pub fn write_profile(path: &Path, points: &[ProfilePoint]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "distance_nm,altitude_ft")?;
        for p in points {
            writeln!(w, "{:.2},{:.0}", p.distance_nm, p.altitude_ft)?;
        }
        w.flush()
    }
}

pub mod endurance {
    use super::writer_for_path;
    use airperf_missions::endurance::EnduranceStep;
    use std::io::{self, Write};
    use std::path::Path;

    const HEADER: &str =
        "step,time_start_hr,time_end_hr,w_start_lb,w_end_lb,fuel_burned_lb,distance_nm,fuel_flow_lbhr,altitude_ft,mach,v_ktas,cl,cd,l_d";

    /// Write the endurance time-series as CSV.
    pub fn write_steps(path: &Path, steps: &[EnduranceStep]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "{HEADER}")?;
        for s in steps {
            writeln!(
                w,
                "{},{:.3},{:.3},{:.1},{:.1},{:.1},{:.2},{:.1},{:.0},{:.3},{:.1},{:.4},{:.5},{:.3}",
                s.step,
                s.time_start_hr,
                s.time_end_hr,
                s.w_start_lb,
                s.w_end_lb,
                s.fuel_burned_lb,
                s.distance_nm,
                s.fuel_flow_lbhr,
                s.altitude_ft,
                s.mach,
                s.v_ktas,
                s.cl,
                s.cd,
                s.l_d,
            )?;
        }
        w.flush()
    }
}

pub mod range_payload {
    use super::writer_for_path;
    use std::io::{self, Write};
    use std::path::Path;

    /// One point of a computed range-payload curve.
    #[derive(Debug, Clone, Copy)]
    pub struct CurvePoint {
        pub payload_lb: f64,
        pub fuel_lb: f64,
        pub range_nm: f64,
        pub takeoff_weight_lb: f64,
    }

    const HEADER: &str = "designation,payload_lb,fuel_lb,range_nm,takeoff_weight_lb";

    /// Write range-payload curves for one or more aircraft as CSV.
    pub fn write_curves(path: &Path, curves: &[(String, Vec<CurvePoint>)]) -> io::Result<()> {
        let mut w = writer_for_path(path)?;
        writeln!(w, "{HEADER}")?;
        for (designation, points) in curves {
            for p in points {
                writeln!(
                    w,
                    "{},{:.0},{:.0},{:.1},{:.0}",
                    designation, p.payload_lb, p.fuel_lb, p.range_nm, p.takeoff_weight_lb,
                )?;
            }
        }
        w.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::range_payload::{write_curves, CurvePoint};

    #[test]
    fn curve_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("curves.csv");
        let curves = vec![(
            "DC-8".to_string(),
            vec![CurvePoint {
                payload_lb: 52_000.0,
                fuel_lb: 116_000.0,
                range_nm: 2_750.0,
                takeoff_weight_lb: 325_000.0,
            }],
        )];
        write_curves(&path, &curves).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "designation,payload_lb,fuel_lb,range_nm,takeoff_weight_lb"
        );
        assert!(lines.next().unwrap().starts_with("DC-8,52000,116000,"));
    }
}
