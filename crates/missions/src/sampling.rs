//! Vertical atmospheric sampling flown as sawtooth climb-descend cycles.
//!
//! The aircraft repeatedly climbs from a low altitude to its
//! weight-limited ceiling and descends back down. As fuel burns off the
//! ceiling rises cycle by cycle; that progressive ceiling increase is the
//! primary scientific output. Reserves are modeled explicitly; the
//! overhead fraction is not used here.

use airperf_calibration::CalibratedParameters;
use airperf_core::aircraft::AircraftSpec;
use airperf_core::fuel::fuel_cost;
use airperf_performance::{compute_reserve_fuel, PerformanceError, PointPerf, ThrustSpec};
use serde::Serialize;

use crate::segments::{climb_segment, descend_segment};
use crate::{infeasibility_reason, infeasible_result, size_fleet, FleetAggregate, MissionResult};

/// Mission definition. Defaults describe the 4,200 nm sampling transect.
#[derive(Debug, Clone, Copy)]
pub struct SamplingOptions {
    pub payload_lb: f64,
    pub distance_nm: f64,
    /// Bottom altitude of each sawtooth cycle, ft.
    pub h_low_ft: f64,
    pub max_cycles: usize,
    pub price_per_gallon: f64,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            payload_lb: 52_000.0,
            distance_nm: 4_200.0,
            h_low_ft: 5_000.0,
            max_cycles: 50,
            price_per_gallon: airperf_core::fuel::DEFAULT_PRICE_PER_GALLON,
        }
    }
}

/// One climb-descend cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SawtoothCycle {
    pub cycle: usize,
    pub ceiling_ft: f64,
    pub climb_fuel_lb: f64,
    pub climb_distance_nm: f64,
    pub climb_time_hr: f64,
    pub descent_fuel_lb: f64,
    pub descent_distance_nm: f64,
    pub descent_time_hr: f64,
    pub total_fuel_lb: f64,
    pub total_distance_nm: f64,
    pub total_time_hr: f64,
    pub weight_start_lb: f64,
    pub weight_end_lb: f64,
    /// Cycle cut short by fuel exhaustion or by reaching the distance goal.
    pub partial: bool,
}

/// A (distance, altitude) vertex of the sawtooth profile.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProfilePoint {
    pub distance_nm: f64,
    pub altitude_ft: f64,
}

/// Per-aircraft breakdown of the sampling mission.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingDetail {
    pub takeoff_weight_lb: f64,
    pub oew_lb: f64,
    pub payload_lb: f64,
    pub total_fuel_lb: f64,
    pub reserve_fuel_lb: f64,
    pub mission_fuel_lb: f64,
    pub fuel_burned_lb: f64,
    pub fuel_remaining_lb: f64,
    pub distance_covered_nm: f64,
    pub total_time_hr: f64,
    pub n_cycles: usize,
    pub cycles: Vec<SawtoothCycle>,
    pub profile_points: Vec<ProfilePoint>,
    pub peak_ceiling_ft: f64,
    pub initial_ceiling_ft: f64,
    pub final_ceiling_ft: f64,
    pub fuel_cost_usd: f64,
    pub fuel_cost_per_1000lb_nm: f64,
}

/// Simulate the sawtooth vertical sampling mission.
pub fn simulate_vertical_sampling(
    spec: &AircraftSpec,
    cal: &CalibratedParameters,
    opts: &SamplingOptions,
) -> Result<MissionResult<SamplingDetail>, PerformanceError> {
    let (actual_payload, n_aircraft) = size_fleet(opts.payload_lb, spec.max_payload_lb);

    let fuel_available = spec.fuel_available_lb(actual_payload);
    if fuel_available <= 0.0 {
        return Ok(infeasible_result(
            spec,
            opts.payload_lb,
            actual_payload,
            n_aircraft,
            "Cannot carry payload within MTOW",
        ));
    }

    let w_tow = spec.oew_lb + actual_payload + fuel_available;
    let perf = PointPerf::from_spec(spec, cal.cd0, cal.e, cal.k_adj);
    let thrust = ThrustSpec::from_spec(spec);

    let reserve_fuel = compute_reserve_fuel(fuel_available, spec, &perf)?;
    let mission_fuel = fuel_available - reserve_fuel;
    if mission_fuel <= 0.0 {
        return Ok(infeasible_result(
            spec,
            opts.payload_lb,
            actual_payload,
            n_aircraft,
            "No mission fuel after reserve deduction",
        ));
    }

    // The hard ceiling is a structural/pressurization limit. The climb
    // target sits above it so the integrator finds the thrust-limited
    // ceiling via the ROC criterion: at heavy weights that ceiling is
    // below the cap (the progressive increase we are after), at light
    // weights the cap governs and the climb is truncated to it.
    let hard_ceiling = spec.service_ceiling_ft;
    let climb_ceiling = hard_ceiling + 5_000.0;
    let mach_climb = spec.cruise_mach * 0.95;
    let mach_descent = spec.cruise_mach * 0.90;

    let mut w_current = w_tow;
    let mut fuel_remaining = mission_fuel;
    let mut distance_covered = 0.0;
    let mut total_time_hr = 0.0;
    let mut cycles: Vec<SawtoothCycle> = Vec::new();

    for cycle_num in 1..=opts.max_cycles {
        if fuel_remaining <= 0.0 || distance_covered >= opts.distance_nm {
            break;
        }

        let cycle_start_weight = w_current;

        let climb = climb_segment(w_current, opts.h_low_ft, climb_ceiling, mach_climb, &perf, thrust)?;

        // Cap at the hard ceiling. When the climb went above it, truncate
        // fuel/distance/time using the per-step data, with a partial step
        // at the crossing.
        let raw_ceiling = climb.ceiling_ft;
        let (mut climb_fuel, mut climb_dist, mut climb_time, mut cycle_ceiling);
        if raw_ceiling <= hard_ceiling {
            climb_fuel = climb.fuel_burned_lb;
            climb_dist = climb.distance_nm;
            climb_time = climb.time_hr;
            cycle_ceiling = raw_ceiling;
        } else {
            cycle_ceiling = hard_ceiling;
            climb_fuel = 0.0;
            climb_dist = 0.0;
            climb_time = 0.0;
            for step in &climb.steps {
                if step.h_end_ft <= hard_ceiling {
                    climb_fuel += step.fuel_lb;
                    climb_dist += step.distance_nm;
                    climb_time += step.time_hr;
                } else {
                    if step.h_start_ft < hard_ceiling {
                        let frac =
                            (hard_ceiling - step.h_start_ft) / (step.h_end_ft - step.h_start_ft);
                        climb_fuel += step.fuel_lb * frac;
                        climb_dist += step.distance_nm * frac;
                        climb_time += step.time_hr * frac;
                    }
                    break;
                }
            }
        }

        // Zero-progress guard: an aircraft that cannot climb above the
        // low altitude at all would loop forever.
        if climb_dist <= 0.0 && climb_fuel <= 0.0 {
            break;
        }

        // Climb needs more fuel than is left: fly the affordable fraction
        // and end the mission.
        if climb_fuel > fuel_remaining {
            let frac = if climb_fuel > 0.0 {
                fuel_remaining / climb_fuel
            } else {
                0.0
            };
            climb_fuel = fuel_remaining;
            climb_dist *= frac;
            climb_time *= frac;
            cycle_ceiling = opts.h_low_ft + (cycle_ceiling - opts.h_low_ft) * frac;

            w_current -= climb_fuel;
            fuel_remaining = 0.0;

            cycles.push(SawtoothCycle {
                cycle: cycle_num,
                ceiling_ft: cycle_ceiling,
                climb_fuel_lb: climb_fuel,
                climb_distance_nm: climb_dist,
                climb_time_hr: climb_time,
                descent_fuel_lb: 0.0,
                descent_distance_nm: 0.0,
                descent_time_hr: 0.0,
                total_fuel_lb: climb_fuel,
                total_distance_nm: climb_dist,
                total_time_hr: climb_time,
                weight_start_lb: cycle_start_weight,
                weight_end_lb: w_current,
                partial: true,
            });
            distance_covered += climb_dist;
            total_time_hr += climb_time;
            break;
        }

        w_current -= climb_fuel;
        fuel_remaining -= climb_fuel;

        // Distance goal reached during the climb: no descent needed.
        if distance_covered + climb_dist >= opts.distance_nm {
            cycles.push(SawtoothCycle {
                cycle: cycle_num,
                ceiling_ft: cycle_ceiling,
                climb_fuel_lb: climb_fuel,
                climb_distance_nm: climb_dist,
                climb_time_hr: climb_time,
                descent_fuel_lb: 0.0,
                descent_distance_nm: 0.0,
                descent_time_hr: 0.0,
                total_fuel_lb: climb_fuel,
                total_distance_nm: climb_dist,
                total_time_hr: climb_time,
                weight_start_lb: cycle_start_weight,
                weight_end_lb: w_current,
                partial: true,
            });
            distance_covered += climb_dist;
            total_time_hr += climb_time;
            break;
        }

        let descent = descend_segment(w_current, cycle_ceiling, opts.h_low_ft, mach_descent, &perf)?;
        let mut descent_fuel = descent.fuel_burned_lb;
        let mut descent_dist = descent.distance_nm;
        let mut descent_time = descent.time_hr;

        if descent_fuel > fuel_remaining {
            let frac = if descent_fuel > 0.0 {
                fuel_remaining / descent_fuel
            } else {
                0.0
            };
            descent_fuel = fuel_remaining;
            descent_dist *= frac;
            descent_time *= frac;
            fuel_remaining = 0.0;
        } else {
            fuel_remaining -= descent_fuel;
        }

        w_current -= descent_fuel;

        cycles.push(SawtoothCycle {
            cycle: cycle_num,
            ceiling_ft: cycle_ceiling,
            climb_fuel_lb: climb_fuel,
            climb_distance_nm: climb_dist,
            climb_time_hr: climb_time,
            descent_fuel_lb: descent_fuel,
            descent_distance_nm: descent_dist,
            descent_time_hr: descent_time,
            total_fuel_lb: climb_fuel + descent_fuel,
            total_distance_nm: climb_dist + descent_dist,
            total_time_hr: climb_time + descent_time,
            weight_start_lb: cycle_start_weight,
            weight_end_lb: w_current,
            partial: false,
        });
        distance_covered += climb_dist + descent_dist;
        total_time_hr += climb_time + descent_time;
    }

    let total_fuel_burned = mission_fuel - fuel_remaining;
    let feasible = distance_covered >= opts.distance_nm && fuel_remaining >= -50.0;

    let total_fuel_cost = fuel_cost(fuel_available, opts.price_per_gallon);
    let fuel_cost_metric = if actual_payload > 0.0 && opts.distance_nm > 0.0 {
        total_fuel_cost / (actual_payload / 1000.0 * opts.distance_nm)
    } else {
        f64::INFINITY
    };

    // Sawtooth vertices for the altitude-profile plot.
    let mut profile_points = Vec::new();
    let mut cum_dist = 0.0;
    for c in &cycles {
        profile_points.push(ProfilePoint {
            distance_nm: cum_dist,
            altitude_ft: opts.h_low_ft,
        });
        cum_dist += c.climb_distance_nm;
        profile_points.push(ProfilePoint {
            distance_nm: cum_dist,
            altitude_ft: c.ceiling_ft,
        });
        if c.descent_distance_nm > 0.0 {
            cum_dist += c.descent_distance_nm;
            profile_points.push(ProfilePoint {
                distance_nm: cum_dist,
                altitude_ft: opts.h_low_ft,
            });
        }
    }

    let per_aircraft = SamplingDetail {
        takeoff_weight_lb: w_tow,
        oew_lb: spec.oew_lb,
        payload_lb: actual_payload,
        total_fuel_lb: fuel_available,
        reserve_fuel_lb: reserve_fuel,
        mission_fuel_lb: mission_fuel,
        fuel_burned_lb: total_fuel_burned,
        fuel_remaining_lb: fuel_remaining.max(0.0),
        distance_covered_nm: distance_covered,
        total_time_hr,
        n_cycles: cycles.len(),
        peak_ceiling_ft: cycles.iter().map(|c| c.ceiling_ft).fold(0.0, f64::max),
        initial_ceiling_ft: cycles.first().map(|c| c.ceiling_ft).unwrap_or(0.0),
        final_ceiling_ft: cycles.last().map(|c| c.ceiling_ft).unwrap_or(0.0),
        cycles,
        profile_points,
        fuel_cost_usd: total_fuel_cost,
        fuel_cost_per_1000lb_nm: fuel_cost_metric,
    };

    let aggregate = (n_aircraft > 1).then(|| {
        let fleet_fuel_cost = n_aircraft as f64 * total_fuel_cost;
        FleetAggregate {
            n_aircraft,
            total_payload_lb: n_aircraft as f64 * actual_payload,
            total_fuel_lb: n_aircraft as f64 * fuel_available,
            total_fuel_burned_lb: n_aircraft as f64 * total_fuel_burned,
            total_fuel_cost_usd: fleet_fuel_cost,
            fuel_cost_per_1000lb_nm: if opts.payload_lb > 0.0 {
                fleet_fuel_cost / (opts.payload_lb / 1000.0 * opts.distance_nm)
            } else {
                f64::INFINITY
            },
        }
    });

    Ok(MissionResult {
        feasible,
        infeasible_reason: (!feasible)
            .then(|| infeasibility_reason(distance_covered, opts.distance_nm, fuel_remaining)),
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        payload_requested_lb: opts.payload_lb,
        payload_actual_lb: actual_payload,
        n_aircraft,
        per_aircraft: Some(per_aircraft),
        aggregate,
    })
}
