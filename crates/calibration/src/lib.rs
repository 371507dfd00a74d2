//! Parameter calibration against published range-payload points.
//!
//! Each aircraft carries two or three known (payload, fuel, range) points.
//! Four parameters are fitted so the model reproduces them:
//!
//!   cd0    zero-lift drag coefficient
//!   e      Oswald span efficiency factor
//!   k_adj  TSFC adjustment factor (multiplier on the reference TSFC)
//!   f_oh   non-cruise fuel overhead fraction (overhead = f_oh × W_tow)
//!
//! f_oh absorbs every non-cruise phase: taxi, takeoff, climb, descent,
//! approach, and reserves. Modeling it as a fraction of takeoff weight is
//! what lets the fit match the shape of the range-payload diagram: at max
//! payload the overhead eats a much larger share of the available fuel
//! than at light payload.

use airperf_core::aircraft::AircraftSpec;
use airperf_performance::{
    step_cruise_range, CruiseOptions, PerformanceError, PointPerf, ThrustSpec,
};
use serde::Serialize;
use std::fmt::Write as _;

pub mod optimize;

use optimize::{differential_evolution, nelder_mead, DeConfig, NelderMeadConfig};

/// Parameter box bounds for the global search.
pub const CD0_BOUNDS: (f64, f64) = (0.015, 0.040);
pub const E_BOUNDS: (f64, f64) = (0.65, 0.90);
pub const K_ADJ_BOUNDS: (f64, f64) = (0.80, 1.20);
pub const F_OH_BOUNDS: (f64, f64) = (0.05, 0.25);

/// Distance credits added to cruise range for the climb and descent phases.
pub const CLIMB_DISTANCE_NM: f64 = 200.0;
pub const DESCENT_DISTANCE_NM: f64 = 120.0;

/// Error magnitude assigned to unphysical parameters or empty point sets.
const PENALTY: f64 = 1e6;

#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("{name}: need at least 2 calibration points, got {got}")]
    TooFewPoints { name: String, got: usize },
    #[error(transparent)]
    Performance(#[from] PerformanceError),
}

/// Optimizer routing for [`calibrate_aircraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMethod {
    /// Differential evolution followed by Nelder-Mead refinement.
    TwoStage,
    GlobalOnly,
    LocalOnly,
}

/// Predicted mission range under the overhead fuel model.
///
/// Cruise fuel is the total load minus f_oh × W_tow; the cruise range from
/// the step integrator then gets fixed climb and descent distance credits.
/// Returns 0 when the overhead consumes the entire fuel load.
pub fn compute_calibration_range(
    spec: &AircraftSpec,
    payload_lb: f64,
    fuel_lb: f64,
    cd0: f64,
    e: f64,
    k_adj: f64,
    f_oh: f64,
    n_steps: usize,
) -> Result<f64, PerformanceError> {
    let w_tow = spec.oew_lb + payload_lb + fuel_lb;
    let overhead = f_oh * w_tow;
    let cruise_fuel = fuel_lb - overhead;
    if cruise_fuel <= 0.0 {
        return Ok(0.0);
    }

    let perf = PointPerf::from_spec(spec, cd0, e, k_adj);
    let opts = CruiseOptions {
        n_steps,
        ceiling_ft: spec.service_ceiling_ft,
        ..CruiseOptions::default()
    };
    let result = step_cruise_range(
        w_tow,
        cruise_fuel,
        spec.cruise_mach,
        &perf,
        Some(ThrustSpec::from_spec(spec)),
        &opts,
    )?;

    Ok(result.range_nm + CLIMB_DISTANCE_NM + DESCENT_DISTANCE_NM)
}

/// RMS relative range error over the calibration points.
///
/// Unphysical parameters and empty point sets score a flat 1e6 penalty;
/// points the model cannot reach at all contribute a unit squared error.
pub fn calibration_error(
    params: &[f64],
    spec: &AircraftSpec,
    n_steps: usize,
) -> f64 {
    let [cd0, e, k_adj, f_oh] = params else {
        return PENALTY;
    };
    if *cd0 <= 0.0 || *e <= 0.0 || *k_adj <= 0.0 || *f_oh <= 0.0 {
        return PENALTY;
    }

    let mut errors = Vec::with_capacity(spec.calibration_points.len());
    for point in &spec.calibration_points {
        if point.range_nm <= 0.0 {
            continue;
        }
        match compute_calibration_range(
            spec,
            point.payload_lb,
            point.fuel_lb,
            *cd0,
            *e,
            *k_adj,
            *f_oh,
            n_steps,
        ) {
            Ok(predicted) if predicted > 0.0 => {
                let rel = (predicted - point.range_nm) / point.range_nm;
                errors.push(rel * rel);
            }
            Ok(_) | Err(_) => errors.push(1.0),
        }
    }

    if errors.is_empty() {
        return PENALTY;
    }
    (errors.iter().sum::<f64>() / errors.len() as f64).sqrt()
}

/// Per-point diagnostics for a calibration fit.
#[derive(Debug, Clone, Serialize)]
pub struct PointError {
    pub payload_lb: f64,
    pub fuel_lb: f64,
    pub target_range_nm: f64,
    pub predicted_range_nm: f64,
    pub error_pct: f64,
    pub overhead_fuel_lb: f64,
    pub cruise_fuel_lb: f64,
    pub initial_cruise_alt_ft: f64,
}

/// A calibrated parameter set with fit diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CalibratedParameters {
    pub cd0: f64,
    pub e: f64,
    pub k_adj: f64,
    pub f_oh: f64,
    pub rms_error: f64,
    pub point_errors: Vec<PointError>,
    pub l_d_max: f64,
    pub cl_at_max_ld: f64,
    pub converged: bool,
    pub aircraft_name: String,
    pub designation: String,
    /// Set when the parameters were transferred from another airframe.
    pub derived_from: Option<String>,
    pub oswald_delta: Option<f64>,
}

/// Fit cd0, e, k_adj, and f_oh for one aircraft.
///
/// The two-stage path runs a global differential-evolution search and
/// keeps a Nelder-Mead refinement only when it actually improves the fit.
/// Convergence requires RMS error under 5% with three or more points, or
/// under 3% with just two.
pub fn calibrate_aircraft(
    spec: &AircraftSpec,
    method: CalibrationMethod,
) -> Result<CalibratedParameters, CalibrationError> {
    let n_points = spec.calibration_points.len();
    if n_points < 2 {
        return Err(CalibrationError::TooFewPoints {
            name: spec.name.clone(),
            got: n_points,
        });
    }

    let bounds = [CD0_BOUNDS, E_BOUNDS, K_ADJ_BOUNDS, F_OH_BOUNDS];
    let mut objective = |params: &[f64]| calibration_error(params, spec, 25);

    let (mut x_best, mut f_best) = match method {
        CalibrationMethod::TwoStage | CalibrationMethod::GlobalOnly => {
            let global = differential_evolution(&mut objective, &bounds, &DeConfig::default());
            (global.x, global.fun)
        }
        CalibrationMethod::LocalOnly => (vec![0.025, 0.80, 1.0, 0.12], f64::INFINITY),
    };

    match method {
        CalibrationMethod::TwoStage => {
            let local = nelder_mead(&mut objective, &x_best, &NelderMeadConfig::default());
            if local.fun < f_best {
                x_best = local.x;
                f_best = local.fun;
            }
        }
        CalibrationMethod::LocalOnly => {
            let cfg = NelderMeadConfig {
                max_iter: 10_000,
                ..NelderMeadConfig::default()
            };
            let local = nelder_mead(&mut objective, &x_best, &cfg);
            x_best = local.x;
            f_best = local.fun;
        }
        CalibrationMethod::GlobalOnly => {}
    }

    let (cd0, e, k_adj, f_oh) = (x_best[0], x_best[1], x_best[2], x_best[3]);
    let point_errors = compute_point_errors(spec, cd0, e, k_adj, f_oh);
    let (l_d_max, cl_star) = airperf_aero::max_lift_to_drag(cd0, spec.aspect_ratio, e);

    let threshold = if n_points >= 3 { 0.05 } else { 0.03 };

    Ok(CalibratedParameters {
        cd0,
        e,
        k_adj,
        f_oh,
        rms_error: f_best,
        point_errors,
        l_d_max,
        cl_at_max_ld: cl_star,
        converged: f_best < threshold,
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        derived_from: None,
        oswald_delta: None,
    })
}

/// Detailed per-point breakdown at a fixed parameter set.
fn compute_point_errors(
    spec: &AircraftSpec,
    cd0: f64,
    e: f64,
    k_adj: f64,
    f_oh: f64,
) -> Vec<PointError> {
    let mut out = Vec::with_capacity(spec.calibration_points.len());
    for point in &spec.calibration_points {
        let w_tow = spec.oew_lb + point.payload_lb + point.fuel_lb;
        let overhead = f_oh * w_tow;
        let cruise_fuel = (point.fuel_lb - overhead).max(0.0);

        let predicted = compute_calibration_range(
            spec,
            point.payload_lb,
            point.fuel_lb,
            cd0,
            e,
            k_adj,
            f_oh,
            50,
        )
        .unwrap_or(0.0);
        let error_pct = if predicted > 0.0 {
            (predicted - point.range_nm) / point.range_nm * 100.0
        } else {
            -100.0
        };

        let perf = PointPerf::from_spec(spec, cd0, e, k_adj);
        let opts = CruiseOptions {
            n_steps: 50,
            ceiling_ft: spec.service_ceiling_ft,
            ..CruiseOptions::default()
        };
        let initial_alt = step_cruise_range(
            w_tow,
            cruise_fuel,
            spec.cruise_mach,
            &perf,
            Some(ThrustSpec::from_spec(spec)),
            &opts,
        )
        .ok()
        .and_then(|r| r.segments.first().map(|s| s.altitude_ft))
        .unwrap_or(0.0);

        out.push(PointError {
            payload_lb: point.payload_lb,
            fuel_lb: point.fuel_lb,
            target_range_nm: point.range_nm,
            predicted_range_nm: predicted,
            error_pct,
            overhead_fuel_lb: overhead,
            cruise_fuel_lb: cruise_fuel,
            initial_cruise_alt_ft: initial_alt,
        });
    }
    out
}

/// Transfer a donor calibration onto a derivative airframe.
///
/// The derivative inherits cd0, k_adj, and f_oh, and gains an Oswald
/// efficiency increment (raked wingtips), capped at 0.90. When the
/// derivative has its own points the transferred set is refined locally;
/// otherwise the RMS error is NaN and the result counts as converged.
pub fn calibrate_derived(
    donor: &CalibratedParameters,
    spec: &AircraftSpec,
    oswald_delta: f64,
) -> CalibratedParameters {
    let mut cd0 = donor.cd0;
    let mut e = (donor.e + oswald_delta).min(0.90);
    let mut k_adj = donor.k_adj;
    let mut f_oh = donor.f_oh;

    let rms_error = if spec.calibration_points.len() >= 2 {
        let mut objective = |params: &[f64]| calibration_error(params, spec, 25);
        let local = nelder_mead(
            &mut objective,
            &[cd0, e, k_adj, f_oh],
            &NelderMeadConfig::default(),
        );
        cd0 = local.x[0];
        e = local.x[1];
        k_adj = local.x[2];
        f_oh = local.x[3];
        local.fun
    } else {
        f64::NAN
    };

    let (l_d_max, cl_star) = airperf_aero::max_lift_to_drag(cd0, spec.aspect_ratio, e);
    let point_errors = compute_point_errors(spec, cd0, e, k_adj, f_oh);

    CalibratedParameters {
        cd0,
        e,
        k_adj,
        f_oh,
        rms_error,
        point_errors,
        l_d_max,
        cl_at_max_ld: cl_star,
        converged: if rms_error.is_nan() {
            true
        } else {
            rms_error < 0.10
        },
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        derived_from: Some(donor.designation.clone()),
        oswald_delta: Some(oswald_delta),
    }
}

/// Physical plausibility notes for a fit. Empty means all checks passed.
pub fn sanity_check(cal: &CalibratedParameters) -> Vec<String> {
    let mut issues = Vec::new();

    if cal.l_d_max < 10.0 {
        issues.push(format!(
            "WARNING: L/D_max = {:.1} is unusually low",
            cal.l_d_max
        ));
    } else if cal.l_d_max > 22.0 {
        issues.push(format!(
            "WARNING: L/D_max = {:.1} is unusually high",
            cal.l_d_max
        ));
    }

    if cal.cd0 < 0.015 {
        issues.push(format!("WARNING: CD0 = {:.5} below typical range", cal.cd0));
    } else if cal.cd0 > 0.035 {
        issues.push(format!("WARNING: CD0 = {:.5} above typical range", cal.cd0));
    }

    if cal.e < 0.65 {
        issues.push(format!("WARNING: e = {:.3} below typical range", cal.e));
    }

    if (cal.k_adj - 1.0).abs() > 0.15 {
        issues.push(format!(
            "NOTE: k_adj = {:.3} differs from 1.0 by {:.1}%",
            cal.k_adj,
            (cal.k_adj - 1.0).abs() * 100.0
        ));
    }

    if cal.f_oh > 0.20 {
        issues.push(format!(
            "NOTE: f_oh = {:.3} is high (>20% overhead)",
            cal.f_oh
        ));
    } else if cal.f_oh < 0.06 {
        issues.push(format!("NOTE: f_oh = {:.3} is low (<6% overhead)", cal.f_oh));
    }

    issues
}

/// Human-readable calibration report.
pub fn format_calibration_report(cal: &CalibratedParameters) -> String {
    let mut s = String::new();
    let status = if cal.converged {
        "CONVERGED"
    } else {
        "PARTIAL"
    };

    let _ = writeln!(s, "{}", "=".repeat(72));
    let _ = writeln!(s, "Calibration Report: {}", cal.aircraft_name);
    let _ = writeln!(s, "{}", "=".repeat(72));
    let _ = writeln!(
        s,
        "Status: {status}  (RMS error: {:.2}%)",
        cal.rms_error * 100.0
    );
    let _ = writeln!(s, "\nCalibrated Parameters:");
    let _ = writeln!(s, "  CD0          = {:.6}", cal.cd0);
    let _ = writeln!(s, "  e (Oswald)   = {:.4}", cal.e);
    let _ = writeln!(s, "  k_adj (TSFC) = {:.4}", cal.k_adj);
    let _ = writeln!(
        s,
        "  f_oh (ovhd)  = {:.4}  ({:.1}% of TOW is non-cruise fuel)",
        cal.f_oh,
        cal.f_oh * 100.0
    );
    let _ = writeln!(
        s,
        "  (L/D)_max    = {:.2}  at CL = {:.4}",
        cal.l_d_max, cal.cl_at_max_ld
    );

    if let Some(donor) = &cal.derived_from {
        let _ = writeln!(
            s,
            "\n  (Derived from {donor}, Oswald delta = +{:.3})",
            cal.oswald_delta.unwrap_or(0.0)
        );
    }

    let _ = writeln!(s, "\nCalibration Point Results:");
    let _ = writeln!(
        s,
        "  {:>10} {:>10} {:>8} {:>10} {:>8} {:>10} {:>10} {:>8}",
        "Payload", "Fuel", "Target", "Predicted", "Error", "Overhead", "Cruise F", "Alt"
    );
    let _ = writeln!(
        s,
        "  {:>10} {:>10} {:>8} {:>10} {:>8} {:>10} {:>10} {:>8}",
        "(lb)", "(lb)", "(nm)", "(nm)", "", "(lb)", "(lb)", "(ft)"
    );
    let _ = writeln!(s, "  {}", "-".repeat(94));
    for pe in &cal.point_errors {
        let _ = writeln!(
            s,
            "  {:>10.0} {:>10.0} {:>8.0} {:>10.0} {:>+7.2}% {:>10.0} {:>10.0} {:>8.0}",
            pe.payload_lb,
            pe.fuel_lb,
            pe.target_range_nm,
            pe.predicted_range_nm,
            pe.error_pct,
            pe.overhead_fuel_lb,
            pe.cruise_fuel_lb,
            pe.initial_cruise_alt_ft
        );
    }

    let issues = sanity_check(cal);
    if issues.is_empty() {
        let _ = writeln!(s, "\nSanity Checks: All passed");
    } else {
        let _ = writeln!(s, "\nSanity Checks:");
        for issue in &issues {
            let _ = writeln!(s, "  {issue}");
        }
    }

    s
}
