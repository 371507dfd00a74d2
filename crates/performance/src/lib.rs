//! Cruise performance engine.
//!
//! Composes the atmosphere, drag-polar, and propulsion models into:
//! - an instantaneous cruise-condition solver,
//! - specific-range computation,
//! - a buffet- and thrust-constrained optimal-altitude search,
//! - a step-cruise Breguet range integrator,
//! - coarse climb/descent estimators and a reserve-fuel solver,
//! - the full mission-profile range with climb, descent, and reserves.
//!
//! The step-cruise method divides the cruise into equal-fuel segments and
//! re-solves altitude and conditions at each one, which captures the
//! step-climb behavior of real aircraft as they lighten. This is the
//! model's main accuracy lever over a one-shot Breguet calculation.

use serde::Serialize;
use thiserror::Error;

use airperf_aero as aero;
use airperf_atmosphere as atmosphere;
use airperf_core::aircraft::AircraftSpec;
use airperf_core::units::{HR_TO_SEC, NM_TO_FT, ft_to_nm, kt_to_fps, nm_to_ft};
use airperf_propulsion as propulsion;

/// Hard errors: non-physical inputs or configurations that indicate a
/// defect, not a runtime condition to recover from.
#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error(transparent)]
    Aero(#[from] aero::AeroError),
    #[error("final weight must be positive (got {w_final_lb} lb)")]
    NonPositiveFinalWeight { w_final_lb: f64 },
    #[error("takeoff weight {tow_lb:.0} lb exceeds MTOW {mtow_lb:.0} lb")]
    ExceedsMtow { tow_lb: f64, mtow_lb: f64 },
    #[error("fuel {fuel_lb:.0} lb exceeds max fuel capacity {max_fuel_lb:.0} lb")]
    ExceedsFuelCapacity { fuel_lb: f64, max_fuel_lb: f64 },
}

/// Airframe and engine inputs for point-performance evaluation, with the
/// calibrated drag/TSFC parameters threaded through.
#[derive(Debug, Clone, Copy)]
pub struct PointPerf {
    pub wing_area_ft2: f64,
    pub aspect_ratio: f64,
    pub cd0: f64,
    pub e: f64,
    pub tsfc_ref: f64,
    pub k_adj: f64,
}

impl PointPerf {
    /// Bundle an aircraft's fixed geometry with calibrated parameters.
    pub fn from_spec(spec: &AircraftSpec, cd0: f64, e: f64, k_adj: f64) -> Self {
        Self {
            wing_area_ft2: spec.wing_area_ft2,
            aspect_ratio: spec.aspect_ratio,
            cd0,
            e,
            tsfc_ref: spec.tsfc_cruise_ref,
            k_adj,
        }
    }
}

/// Engine data for thrust-availability checks.
#[derive(Debug, Clone, Copy)]
pub struct ThrustSpec {
    pub slst_per_engine_lbf: f64,
    pub n_engines: u32,
}

impl ThrustSpec {
    pub fn from_spec(spec: &AircraftSpec) -> Self {
        Self {
            slst_per_engine_lbf: spec.thrust_per_engine_slst_lbf,
            n_engines: spec.n_engines,
        }
    }

    /// Same engines with one shut down.
    pub fn engine_out(self) -> Self {
        Self {
            n_engines: self.n_engines.saturating_sub(1),
            ..self
        }
    }
}

/// Instantaneous cruise state at one (weight, altitude, Mach) point.
#[derive(Debug, Clone, Copy)]
pub struct CruiseConditions {
    pub cl: f64,
    pub cd: f64,
    pub l_d: f64,
    pub v_fps: f64,
    pub v_ktas: f64,
    pub drag_lbf: f64,
    pub tsfc: f64,
    pub sr_nm_per_lb: f64,
    pub q_psf: f64,
    pub mach: f64,
    pub altitude_ft: f64,
}

/// Per-segment telemetry from the step-cruise integrator, kept for
/// feasibility checks and plotting.
#[derive(Debug, Clone, Serialize)]
pub struct CruiseSegment {
    pub step: usize,
    pub w_start_lb: f64,
    pub w_end_lb: f64,
    pub altitude_ft: f64,
    pub mach: f64,
    pub cl: f64,
    pub cd: f64,
    pub l_d: f64,
    pub effective_l_d: f64,
    pub tsfc: f64,
    pub v_ktas: f64,
    pub range_nm: f64,
    pub cumulative_range_nm: f64,
    pub cumulative_fuel_lb: f64,
}

/// Result of a step-cruise integration.
#[derive(Debug, Clone, Serialize)]
pub struct StepCruiseResult {
    pub range_nm: f64,
    pub fuel_burned_lb: f64,
    pub segments: Vec<CruiseSegment>,
}

/// Search and constraint knobs for the altitude optimizer and step-cruise.
#[derive(Debug, Clone, Copy)]
pub struct CruiseOptions {
    pub n_steps: usize,
    pub ceiling_ft: f64,
    pub fixed_altitude_ft: Option<f64>,
    pub drag_multiplier: f64,
    pub cl_max_cruise: f64,
    pub h_min_ft: f64,
    pub h_step_ft: f64,
}

impl Default for CruiseOptions {
    fn default() -> Self {
        Self {
            n_steps: 50,
            ceiling_ft: 43_000.0,
            fixed_altitude_ft: None,
            drag_multiplier: 1.0,
            cl_max_cruise: 0.60,
            h_min_ft: 25_000.0,
            h_step_ft: 500.0,
        }
    }
}

/// Classic Breguet range equation: R = (V/c) · (L/D) · ln(Wi/Wf), in nm.
///
/// Returns 0 when no fuel is burned (Wf ≥ Wi); errors on Wf ≤ 0.
pub fn breguet_range_nm(
    v_fps: f64,
    tsfc_lb_per_lbf_hr: f64,
    l_d: f64,
    w_initial_lb: f64,
    w_final_lb: f64,
) -> Result<f64, PerformanceError> {
    if w_final_lb <= 0.0 {
        return Err(PerformanceError::NonPositiveFinalWeight {
            w_final_lb,
        });
    }
    if w_final_lb >= w_initial_lb {
        return Ok(0.0);
    }
    let tsfc_per_sec = tsfc_lb_per_lbf_hr / HR_TO_SEC;
    let range_ft = (v_fps / tsfc_per_sec) * l_d * (w_initial_lb / w_final_lb).ln();
    Ok(ft_to_nm(range_ft))
}

/// Instantaneous specific range: nm of distance per lb of fuel.
pub fn specific_range(v_fps: f64, tsfc_lb_per_lbf_hr: f64, l_d: f64, weight_lb: f64) -> f64 {
    let tsfc_per_sec = tsfc_lb_per_lbf_hr / HR_TO_SEC;
    ft_to_nm(v_fps * l_d / (tsfc_per_sec * weight_lb))
}

/// Solve all cruise parameters at one flight condition.
///
/// This is the atomic building block used by every higher-level routine.
pub fn cruise_conditions(
    weight_lb: f64,
    h_ft: f64,
    mach: f64,
    perf: &PointPerf,
) -> Result<CruiseConditions, PerformanceError> {
    let rho = atmosphere::density(h_ft);
    let a = atmosphere::speed_of_sound(h_ft);
    let v_fps = mach * a;
    let q = 0.5 * rho * v_fps * v_fps;

    let cl = aero::lift_coefficient(weight_lb, q, perf.wing_area_ft2)?;
    let cd = aero::drag_coefficient(cl, perf.cd0, perf.aspect_ratio, perf.e);
    let l_d = cl / cd;
    let drag_lbf = cd * q * perf.wing_area_ft2;

    let tsfc = propulsion::tsfc(h_ft, mach, perf.tsfc_ref, perf.k_adj);
    let sr = specific_range(v_fps, tsfc, l_d, weight_lb);

    Ok(CruiseConditions {
        cl,
        cd,
        l_d,
        v_fps,
        v_ktas: v_fps * HR_TO_SEC / NM_TO_FT,
        drag_lbf,
        tsfc,
        sr_nm_per_lb: sr,
        q_psf: q,
        mach,
        altitude_ft: h_ft,
    })
}

/// Find the altitude maximizing specific range, subject to the buffet CL
/// limit and (when engine data is given) thrust availability.
///
/// The two constraints are handled differently on purpose:
/// - CL grows monotonically with altitude at fixed weight, so the first
///   buffet violation ends the sweep (`break`);
/// - the thrust-drag balance is NOT monotonic in altitude (high dynamic
///   pressure can make low altitudes infeasible while mid altitudes work),
///   so a thrust violation only skips the candidate (`continue`).
pub fn optimal_cruise_altitude(
    weight_lb: f64,
    mach: f64,
    perf: &PointPerf,
    thrust: Option<ThrustSpec>,
    opts: &CruiseOptions,
) -> Result<f64, PerformanceError> {
    let mut best_alt = opts.h_min_ft;
    let mut best_sr = 0.0;

    let mut h = opts.h_min_ft;
    while h <= opts.ceiling_ft {
        let conds = cruise_conditions(weight_lb, h, mach, perf)?;

        if conds.cl > opts.cl_max_cruise {
            break;
        }

        if let Some(t) = thrust {
            let thrust_avail =
                propulsion::thrust_available_cruise(t.slst_per_engine_lbf, h, t.n_engines);
            if thrust_avail < conds.drag_lbf * opts.drag_multiplier {
                h += opts.h_step_ft;
                continue;
            }
        }

        if conds.sr_nm_per_lb > best_sr {
            best_sr = conds.sr_nm_per_lb;
            best_alt = h;
        }

        h += opts.h_step_ft;
    }

    Ok(best_alt)
}

/// Step-cruise Breguet integration.
///
/// Divides the fuel load into `opts.n_steps` equal-fuel segments. Each
/// segment re-optimizes altitude for the segment-start weight (unless a
/// fixed altitude is supplied), evaluates conditions at the midpoint
/// weight, applies the drag multiplier, and accumulates Breguet range.
pub fn step_cruise_range(
    w_initial_lb: f64,
    fuel_available_lb: f64,
    mach: f64,
    perf: &PointPerf,
    thrust: Option<ThrustSpec>,
    opts: &CruiseOptions,
) -> Result<StepCruiseResult, PerformanceError> {
    let fuel_per_step = fuel_available_lb / opts.n_steps as f64;
    let mut total_range = 0.0;
    let mut total_fuel = 0.0;
    let mut w_current = w_initial_lb;
    let mut segments = Vec::with_capacity(opts.n_steps);

    for step in 0..opts.n_steps {
        let w_start = w_current;
        let w_end = w_current - fuel_per_step;
        if w_end <= 0.0 {
            // Fuel load inconsistent with weight; degrade to what we have.
            break;
        }

        let h = match opts.fixed_altitude_ft {
            Some(h) => h,
            None => optimal_cruise_altitude(w_start, mach, perf, thrust, opts)?,
        };

        let w_mid = 0.5 * (w_start + w_end);
        let conds = cruise_conditions(w_mid, h, mach, perf)?;
        let effective_l_d = conds.l_d / opts.drag_multiplier;

        let seg_range = breguet_range_nm(conds.v_fps, conds.tsfc, effective_l_d, w_start, w_end)?;

        total_range += seg_range;
        total_fuel += fuel_per_step;
        w_current = w_end;

        segments.push(CruiseSegment {
            step,
            w_start_lb: w_start,
            w_end_lb: w_end,
            altitude_ft: h,
            mach,
            cl: conds.cl,
            cd: conds.cd,
            l_d: conds.l_d,
            effective_l_d,
            tsfc: conds.tsfc,
            v_ktas: conds.v_ktas,
            range_nm: seg_range,
            cumulative_range_nm: total_range,
            cumulative_fuel_lb: total_fuel,
        });
    }

    Ok(StepCruiseResult {
        range_nm: total_range,
        fuel_burned_lb: total_fuel,
        segments,
    })
}

/// Coarse climb estimate from the energy method.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClimbEstimate {
    pub climb_fuel_lb: f64,
    pub climb_distance_nm: f64,
    pub climb_time_hr: f64,
}

/// Coarse descent credit.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DescentCredit {
    pub descent_distance_nm: f64,
    pub descent_fuel_lb: f64,
}

/// Representative average rate of climb for a loaded transport, ft/min.
const AVG_ROC_FPM: f64 = 1500.0;
/// Approximate idle-descent fuel for a transport, lb.
const DESCENT_FUEL_LB: f64 = 300.0;

/// Estimate climb fuel and distance from sea level to cruise altitude.
///
/// Energy method at mid-climb conditions with a fixed representative rate
/// of climb. This is the coarse estimator used by the mission-profile range
/// computation; the mission simulators use the finer altitude-stepping
/// integrator instead.
pub fn estimate_climb_fuel(
    w_lb: f64,
    h_cruise_ft: f64,
    spec: &AircraftSpec,
    perf: &PointPerf,
) -> Result<ClimbEstimate, PerformanceError> {
    let h_avg = 0.5 * h_cruise_ft;
    let mach_climb = (spec.cruise_mach * 0.95).min(0.80);

    let conds = cruise_conditions(w_lb, h_avg, mach_climb, perf)?;

    let climb_time_hr = h_cruise_ft / AVG_ROC_FPM / 60.0;
    let climb_distance_nm = conds.v_ktas * climb_time_hr;

    // Thrust during climb = drag + weight * sin(gamma), with
    // sin(gamma) = ROC / V.
    let avg_roc_fps = AVG_ROC_FPM / 60.0;
    let gamma_sin = avg_roc_fps / conds.v_fps;
    let thrust_climb = conds.drag_lbf + w_lb * gamma_sin;

    let tsfc_climb = propulsion::tsfc(h_avg, mach_climb, perf.tsfc_ref, perf.k_adj);
    let climb_fuel_lb = thrust_climb * tsfc_climb * climb_time_hr;

    Ok(ClimbEstimate {
        climb_fuel_lb,
        climb_distance_nm,
        climb_time_hr,
    })
}

/// Estimate descent distance and fuel from cruise altitude.
///
/// A 3° glide path converts altitude to distance; fuel is a token idle
/// allowance.
pub fn estimate_descent_credit(h_cruise_ft: f64) -> DescentCredit {
    let glide_angle = 3.0_f64.to_radians();
    DescentCredit {
        descent_distance_nm: ft_to_nm(h_cruise_ft) / glide_angle.tan(),
        descent_fuel_lb: DESCENT_FUEL_LB,
    }
}

/// Payload assumed aboard when flying the reserve legs, lb above OEW.
const RESERVE_WEIGHT_MARGIN_LB: f64 = 10_000.0;

/// Compute required reserve fuel for a given total fuel load.
///
/// Policy: 5% of trip fuel contingency, a 200 nm alternate at 25,000 ft and
/// reduced Mach, and a 30-minute hold at 1,500 ft. Contingency is a
/// percentage of trip fuel (= total minus reserves), so the percentage term is
/// solved as a fixed point: reserves = (0.05·total + fixed)/1.05.
///
/// Diversion and hold fuel are evaluated at a fixed light-weight estimate
/// (OEW + 10,000 lb) rather than the true end-of-mission weight, a
/// documented approximation.
pub fn compute_reserve_fuel(
    total_fuel_lb: f64,
    spec: &AircraftSpec,
    perf: &PointPerf,
) -> Result<f64, PerformanceError> {
    let w_reserve_est = spec.oew_lb + RESERVE_WEIGHT_MARGIN_LB;

    // Alternate: 200 nm at 25,000 ft, slightly reduced Mach.
    let h_alt = 25_000.0;
    let mach_alt = spec.cruise_mach * 0.95;
    let conds_alt = cruise_conditions(w_reserve_est, h_alt, mach_alt, perf)?;

    let r_alt_ft = nm_to_ft(200.0);
    let tsfc_per_sec = conds_alt.tsfc / HR_TO_SEC;
    let exponent = r_alt_ft * tsfc_per_sec / (conds_alt.v_fps * conds_alt.l_d);
    let alternate_fuel = w_reserve_est * (1.0 - (-exponent).exp());

    // Hold: 30 minutes at 1,500 ft and ~250 ktas, capped at Mach 0.5.
    let h_hold = 1_500.0;
    let a_hold = atmosphere::speed_of_sound(h_hold);
    let v_hold_fps = kt_to_fps(250.0);
    let mach_hold = (v_hold_fps / a_hold).min(0.5);
    let conds_hold = cruise_conditions(w_reserve_est, h_hold, mach_hold, perf)?;
    let hold_fuel = conds_hold.drag_lbf * conds_hold.tsfc * 0.5;

    let fixed_reserves = alternate_fuel + hold_fuel;
    let total_reserve = (0.05 * total_fuel_lb + fixed_reserves) / 1.05;

    // Reserves can never consume the whole load.
    Ok(total_reserve.min(total_fuel_lb * 0.95))
}

/// Full mission-profile range breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct MissionRangeBreakdown {
    pub range_nm: f64,
    pub cruise_range_nm: f64,
    pub climb_distance_nm: f64,
    pub descent_distance_nm: f64,
    pub fuel_burned_lb: f64,
    pub climb_fuel_lb: f64,
    pub cruise_fuel_lb: f64,
    pub descent_fuel_lb: f64,
    pub reserve_fuel_lb: f64,
    pub takeoff_weight_lb: f64,
    pub payload_lb: f64,
    pub fuel_total_lb: f64,
    pub initial_cruise_alt_ft: f64,
    pub climb_time_hr: f64,
    pub segments: Vec<CruiseSegment>,
}

/// Compute mission range for a payload-fuel combination with the full
/// profile: climb + step-cruise + descent, with reserves withheld.
///
/// The fuel budget is total = climb + cruise + descent + reserves. Errors
/// if the takeoff weight exceeds MTOW or the fuel load exceeds capacity
/// (0.1% tolerance for rounding); a budget with no cruise fuel left
/// degrades to a zero-range breakdown rather than an error.
pub fn compute_range_for_payload(
    spec: &AircraftSpec,
    payload_lb: f64,
    fuel_lb: f64,
    cd0: f64,
    e: f64,
    k_adj: f64,
    opts: &CruiseOptions,
) -> Result<MissionRangeBreakdown, PerformanceError> {
    let w_initial = spec.oew_lb + payload_lb + fuel_lb;
    if w_initial > spec.mtow_lb * 1.001 {
        return Err(PerformanceError::ExceedsMtow {
            tow_lb: w_initial,
            mtow_lb: spec.mtow_lb,
        });
    }
    if fuel_lb > spec.max_fuel_lb * 1.001 {
        return Err(PerformanceError::ExceedsFuelCapacity {
            fuel_lb,
            max_fuel_lb: spec.max_fuel_lb,
        });
    }

    let perf = PointPerf::from_spec(spec, cd0, e, k_adj);
    let thrust = ThrustSpec::from_spec(spec);
    let opts = CruiseOptions {
        ceiling_ft: spec.service_ceiling_ft,
        ..*opts
    };

    // Initial cruise altitude estimate for the fuel allocation.
    let h_cruise_init = match opts.fixed_altitude_ft {
        Some(h) => h,
        None => optimal_cruise_altitude(w_initial, spec.cruise_mach, &perf, Some(thrust), &opts)?,
    };

    let climb = estimate_climb_fuel(w_initial, h_cruise_init, spec, &perf)?;
    let descent = estimate_descent_credit(h_cruise_init);

    // Published range-payload data is quoted with reserves set aside, so
    // reserves are always withheld here.
    let reserve_fuel = compute_reserve_fuel(fuel_lb, spec, &perf)?;

    let cruise_fuel =
        (fuel_lb - climb.climb_fuel_lb - descent.descent_fuel_lb - reserve_fuel).max(0.0);
    if cruise_fuel <= 0.0 {
        return Ok(MissionRangeBreakdown {
            range_nm: 0.0,
            cruise_range_nm: 0.0,
            climb_distance_nm: 0.0,
            descent_distance_nm: 0.0,
            fuel_burned_lb: 0.0,
            climb_fuel_lb: climb.climb_fuel_lb,
            cruise_fuel_lb: 0.0,
            descent_fuel_lb: descent.descent_fuel_lb,
            reserve_fuel_lb: reserve_fuel,
            takeoff_weight_lb: w_initial,
            payload_lb,
            fuel_total_lb: fuel_lb,
            initial_cruise_alt_ft: h_cruise_init,
            climb_time_hr: climb.climb_time_hr,
            segments: Vec::new(),
        });
    }

    let w_cruise_start = w_initial - climb.climb_fuel_lb;

    // Engine-out callers pass a drag multiplier; reflect the shutdown in
    // the thrust check as well.
    let thrust_eff = if opts.drag_multiplier > 1.0 {
        thrust.engine_out()
    } else {
        thrust
    };

    let cruise = step_cruise_range(
        w_cruise_start,
        cruise_fuel,
        spec.cruise_mach,
        &perf,
        Some(thrust_eff),
        &opts,
    )?;

    Ok(MissionRangeBreakdown {
        range_nm: climb.climb_distance_nm + cruise.range_nm + descent.descent_distance_nm,
        cruise_range_nm: cruise.range_nm,
        climb_distance_nm: climb.climb_distance_nm,
        descent_distance_nm: descent.descent_distance_nm,
        fuel_burned_lb: climb.climb_fuel_lb + cruise.fuel_burned_lb + descent.descent_fuel_lb,
        climb_fuel_lb: climb.climb_fuel_lb,
        cruise_fuel_lb: cruise_fuel,
        descent_fuel_lb: descent.descent_fuel_lb,
        reserve_fuel_lb: reserve_fuel,
        takeoff_weight_lb: w_initial,
        payload_lb,
        fuel_total_lb: fuel_lb,
        initial_cruise_alt_ft: h_cruise_init,
        climb_time_hr: climb.climb_time_hr,
        segments: cruise.segments,
    })
}
