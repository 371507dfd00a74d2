//! Low-altitude endurance survey at fixed altitude and reduced speed.
//!
//! The aircraft loiters at low altitude for a target duration; distance
//! covered is an output, not a goal. Fuel loading is mission-sized: only
//! enough fuel for the duration plus reserves is loaded, found
//! iteratively because fuel weight feeds back into drag and burn rate.

use airperf_atmosphere as atmosphere;
use airperf_calibration::CalibratedParameters;
use airperf_core::aircraft::AircraftSpec;
use airperf_core::fuel::fuel_cost;
use airperf_core::units::kt_to_fps;
use airperf_performance::{
    compute_reserve_fuel, cruise_conditions, PerformanceError, PointPerf,
};
use serde::Serialize;

use crate::{infeasible_result, size_fleet, FleetAggregate, MissionResult};

/// Speed for low-altitude work, keeping inside structural speed limits.
/// At 1,500 ft this is roughly Mach 0.38.
pub const LOW_ALT_KTAS: f64 = 250.0;

/// Iterative fuel sizing limits.
const FUEL_ITER_MAX: usize = 20;
const FUEL_ITER_TOL_LB: f64 = 50.0;
const FUEL_MARGIN_FACTOR: f64 = 1.05;

/// Mission definition. Defaults describe an 8-hour survey at 1,500 ft.
#[derive(Debug, Clone, Copy)]
pub struct EnduranceOptions {
    pub payload_lb: f64,
    pub duration_hr: f64,
    pub h_mission_ft: f64,
    pub n_steps: usize,
    pub price_per_gallon: f64,
}

impl Default for EnduranceOptions {
    fn default() -> Self {
        Self {
            payload_lb: 30_000.0,
            duration_hr: 8.0,
            h_mission_ft: 1_500.0,
            n_steps: 40,
            price_per_gallon: airperf_core::fuel::DEFAULT_PRICE_PER_GALLON,
        }
    }
}

/// One time step of the endurance loiter.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnduranceStep {
    pub step: usize,
    pub time_start_hr: f64,
    pub time_end_hr: f64,
    pub w_start_lb: f64,
    pub w_end_lb: f64,
    pub fuel_burned_lb: f64,
    pub distance_nm: f64,
    pub fuel_flow_lbhr: f64,
    pub altitude_ft: f64,
    pub mach: f64,
    pub v_ktas: f64,
    pub cl: f64,
    pub cd: f64,
    pub l_d: f64,
}

/// Result of one fixed-altitude endurance run.
#[derive(Debug, Clone)]
pub struct EnduranceRun {
    pub fuel_burned_lb: f64,
    pub distance_nm: f64,
    pub endurance_hr: f64,
    pub steps: Vec<EnduranceStep>,
    pub fuel_remaining_lb: f64,
    pub avg_fuel_flow_lbhr: f64,
}

/// Time-stepping loiter at fixed altitude and Mach.
///
/// The inner loop of the endurance mission, extracted so the fuel-sizing
/// iteration can call it repeatedly. Stops with a partial final step when
/// mission fuel runs out.
pub fn run_endurance(
    w_tow: f64,
    mission_fuel_lb: f64,
    h_ft: f64,
    mach: f64,
    perf: &PointPerf,
    duration_hr: f64,
    n_steps: usize,
) -> Result<EnduranceRun, PerformanceError> {
    let dt_hr = duration_hr / n_steps as f64;
    let mut w_current = w_tow;
    let mut fuel_remaining = mission_fuel_lb;
    let mut total_fuel = 0.0;
    let mut total_distance = 0.0;
    let mut endurance_hr = 0.0;
    let mut steps = Vec::with_capacity(n_steps);

    for step_num in 0..n_steps {
        let conds = cruise_conditions(w_current, h_ft, mach, perf)?;
        let fuel_flow = conds.drag_lbf * conds.tsfc;
        let fuel_this_step = fuel_flow * dt_hr;

        if fuel_this_step > fuel_remaining {
            let partial_dt = if fuel_flow > 0.0 {
                fuel_remaining / fuel_flow
            } else {
                0.0
            };
            let partial_dist = conds.v_ktas * partial_dt;
            steps.push(EnduranceStep {
                step: step_num,
                time_start_hr: endurance_hr,
                time_end_hr: endurance_hr + partial_dt,
                w_start_lb: w_current,
                w_end_lb: w_current - fuel_remaining,
                fuel_burned_lb: fuel_remaining,
                distance_nm: partial_dist,
                fuel_flow_lbhr: fuel_flow,
                altitude_ft: h_ft,
                mach,
                v_ktas: conds.v_ktas,
                cl: conds.cl,
                cd: conds.cd,
                l_d: conds.l_d,
            });
            total_fuel += fuel_remaining;
            total_distance += partial_dist;
            endurance_hr += partial_dt;
            fuel_remaining = 0.0;
            break;
        }

        let dist_this_step = conds.v_ktas * dt_hr;
        steps.push(EnduranceStep {
            step: step_num,
            time_start_hr: endurance_hr,
            time_end_hr: endurance_hr + dt_hr,
            w_start_lb: w_current,
            w_end_lb: w_current - fuel_this_step,
            fuel_burned_lb: fuel_this_step,
            distance_nm: dist_this_step,
            fuel_flow_lbhr: fuel_flow,
            altitude_ft: h_ft,
            mach,
            v_ktas: conds.v_ktas,
            cl: conds.cl,
            cd: conds.cd,
            l_d: conds.l_d,
        });
        total_fuel += fuel_this_step;
        total_distance += dist_this_step;
        endurance_hr += dt_hr;
        w_current -= fuel_this_step;
        fuel_remaining -= fuel_this_step;
    }

    Ok(EnduranceRun {
        fuel_burned_lb: total_fuel,
        distance_nm: total_distance,
        endurance_hr,
        steps,
        fuel_remaining_lb: fuel_remaining.max(0.0),
        avg_fuel_flow_lbhr: if endurance_hr > 0.0 {
            total_fuel / endurance_hr
        } else {
            0.0
        },
    })
}

/// Per-aircraft breakdown of the endurance mission.
#[derive(Debug, Clone, Serialize)]
pub struct EnduranceDetail {
    pub takeoff_weight_lb: f64,
    pub oew_lb: f64,
    pub payload_lb: f64,
    pub total_fuel_lb: f64,
    pub reserve_fuel_lb: f64,
    pub mission_fuel_lb: f64,
    pub fuel_burned_lb: f64,
    pub fuel_remaining_lb: f64,
    pub endurance_hr: f64,
    pub distance_covered_nm: f64,
    pub altitude_ft: f64,
    pub mach: f64,
    pub v_ktas: f64,
    pub avg_fuel_flow_lbhr: f64,
    pub steps: Vec<EnduranceStep>,
    pub fuel_cost_usd: f64,
    pub fuel_cost_per_1000lb_nm: f64,
    pub max_fuel_available_lb: f64,
    pub fuel_sizing_converged: bool,
}

/// Simulate the low-altitude endurance mission with mission-sized fuel.
///
/// Sizing loop: start from the burn rate at light weight, add reserves,
/// cap at capacity, simulate, and feed the actual burn (with a 5% margin)
/// back into the estimate until the total fuel load stabilizes within
/// 50 lb. Falls back to max fuel if the loop does not converge.
pub fn simulate_low_altitude_endurance(
    spec: &AircraftSpec,
    cal: &CalibratedParameters,
    opts: &EnduranceOptions,
) -> Result<MissionResult<EnduranceDetail>, PerformanceError> {
    let (actual_payload, n_aircraft) = size_fleet(opts.payload_lb, spec.max_payload_lb);

    let max_fuel_available = spec.fuel_available_lb(actual_payload);
    if max_fuel_available <= 0.0 {
        return Ok(infeasible_result(
            spec,
            opts.payload_lb,
            actual_payload,
            n_aircraft,
            "Cannot carry payload within MTOW",
        ));
    }

    let perf = PointPerf::from_spec(spec, cal.cd0, cal.e, cal.k_adj);

    let a_mission = atmosphere::speed_of_sound(opts.h_mission_ft);
    let mach_mission = kt_to_fps(LOW_ALT_KTAS) / a_mission;

    let w_empty_with_payload = spec.oew_lb + actual_payload;

    // Lower bound on the burn rate: conditions at zero fuel aboard.
    let conds_light =
        cruise_conditions(w_empty_with_payload, opts.h_mission_ft, mach_mission, &perf)?;
    let initial_burn_rate = conds_light.drag_lbf * conds_light.tsfc;
    let mut mission_fuel_est = initial_burn_rate * opts.duration_hr * FUEL_MARGIN_FACTOR;

    let mut converged = false;
    let mut prev_total_fuel = 0.0;
    let mut total_fuel_candidate = 0.0;
    let mut reserve_fuel = 0.0;
    let mut mission_fuel_candidate = 0.0;
    let mut w_tow_candidate = w_empty_with_payload;
    let mut sim: Option<EnduranceRun> = None;

    for _ in 0..FUEL_ITER_MAX {
        // Rough total for the first reserve estimate, then recompute the
        // reserves properly for the capped candidate.
        let reserve_est = compute_reserve_fuel(mission_fuel_est * 1.2, spec, &perf)?;
        total_fuel_candidate = (mission_fuel_est + reserve_est).min(max_fuel_available);

        reserve_fuel = compute_reserve_fuel(total_fuel_candidate, spec, &perf)?;
        mission_fuel_candidate = total_fuel_candidate - reserve_fuel;
        if mission_fuel_candidate <= 0.0 {
            return Ok(infeasible_result(
                spec,
                opts.payload_lb,
                actual_payload,
                n_aircraft,
                "No mission fuel after reserve deduction",
            ));
        }

        if (total_fuel_candidate - prev_total_fuel).abs() < FUEL_ITER_TOL_LB {
            w_tow_candidate = w_empty_with_payload + total_fuel_candidate;
            sim = Some(run_endurance(
                w_tow_candidate,
                mission_fuel_candidate,
                opts.h_mission_ft,
                mach_mission,
                &perf,
                opts.duration_hr,
                opts.n_steps,
            )?);
            converged = true;
            break;
        }
        prev_total_fuel = total_fuel_candidate;

        w_tow_candidate = w_empty_with_payload + total_fuel_candidate;
        let trial = run_endurance(
            w_tow_candidate,
            mission_fuel_candidate,
            opts.h_mission_ft,
            mach_mission,
            &perf,
            opts.duration_hr,
            opts.n_steps,
        )?;

        let actual_burn = trial.fuel_burned_lb;
        if trial.endurance_hr >= opts.duration_hr - 0.01 {
            mission_fuel_est = actual_burn * FUEL_MARGIN_FACTOR;
        } else if actual_burn > 0.0 && trial.endurance_hr > 0.0 {
            let scale = opts.duration_hr / trial.endurance_hr;
            mission_fuel_est = actual_burn * scale * FUEL_MARGIN_FACTOR;
        } else {
            mission_fuel_est *= 2.0;
        }

        // Never size past capacity.
        let reserve_at_max = compute_reserve_fuel(max_fuel_available, spec, &perf)?;
        let max_mission_fuel = max_fuel_available - reserve_at_max;
        if mission_fuel_est > max_mission_fuel {
            mission_fuel_est = max_mission_fuel;
        }
    }

    let sim = match sim {
        Some(run) if converged => run,
        // Sizing did not settle; load max fuel and take whatever it gives.
        _ => {
            total_fuel_candidate = max_fuel_available;
            reserve_fuel = compute_reserve_fuel(total_fuel_candidate, spec, &perf)?;
            mission_fuel_candidate = total_fuel_candidate - reserve_fuel;
            w_tow_candidate = w_empty_with_payload + total_fuel_candidate;
            run_endurance(
                w_tow_candidate,
                mission_fuel_candidate,
                opts.h_mission_ft,
                mach_mission,
                &perf,
                opts.duration_hr,
                opts.n_steps,
            )?
        }
    };
    let feasible = sim.endurance_hr >= opts.duration_hr - 0.01;

    // Cost is on fuel loaded; all of it must be purchased.
    let total_fuel_cost = fuel_cost(total_fuel_candidate, opts.price_per_gallon);
    let fuel_cost_metric = if actual_payload > 0.0 && sim.distance_nm > 0.0 {
        total_fuel_cost / (actual_payload / 1000.0 * sim.distance_nm)
    } else {
        f64::INFINITY
    };

    let infeasible_reason = (!feasible).then(|| {
        format!(
            "Fuel exhausted after {:.1} hr (required {:.1} hr)",
            sim.endurance_hr, opts.duration_hr
        )
    });

    let aggregate = (n_aircraft > 1).then(|| {
        let fleet_fuel_cost = n_aircraft as f64 * total_fuel_cost;
        FleetAggregate {
            n_aircraft,
            total_payload_lb: n_aircraft as f64 * actual_payload,
            total_fuel_lb: n_aircraft as f64 * total_fuel_candidate,
            total_fuel_burned_lb: n_aircraft as f64 * sim.fuel_burned_lb,
            total_fuel_cost_usd: fleet_fuel_cost,
            fuel_cost_per_1000lb_nm: if opts.payload_lb > 0.0 && sim.distance_nm > 0.0 {
                fleet_fuel_cost / (opts.payload_lb / 1000.0 * sim.distance_nm)
            } else {
                f64::INFINITY
            },
        }
    });

    let per_aircraft = EnduranceDetail {
        takeoff_weight_lb: w_tow_candidate,
        oew_lb: spec.oew_lb,
        payload_lb: actual_payload,
        total_fuel_lb: total_fuel_candidate,
        reserve_fuel_lb: reserve_fuel,
        mission_fuel_lb: mission_fuel_candidate,
        fuel_burned_lb: sim.fuel_burned_lb,
        fuel_remaining_lb: sim.fuel_remaining_lb,
        endurance_hr: sim.endurance_hr,
        distance_covered_nm: sim.distance_nm,
        altitude_ft: opts.h_mission_ft,
        mach: mach_mission,
        v_ktas: LOW_ALT_KTAS,
        avg_fuel_flow_lbhr: sim.avg_fuel_flow_lbhr,
        steps: sim.steps,
        fuel_cost_usd: total_fuel_cost,
        fuel_cost_per_1000lb_nm: fuel_cost_metric,
        max_fuel_available_lb: max_fuel_available,
        fuel_sizing_converged: converged,
    };

    Ok(MissionResult {
        feasible,
        infeasible_reason,
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        payload_requested_lb: opts.payload_lb,
        payload_actual_lb: actual_payload,
        n_aircraft,
        per_aircraft: Some(per_aircraft),
        aggregate,
    })
}
