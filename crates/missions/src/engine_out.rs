//! Long-range transport with a single engine failure at the mission
//! midpoint.
//!
//! Two-segment cruise: normal cruise to the failure point, then
//! engine-out cruise with the drag penalty, one fewer engine, and a
//! lower altitude floor. The fuel budget follows the calibration
//! convention: non-cruise fuel = f_oh × W_tow, with fixed climb and
//! descent distance credits.

use airperf_calibration::{CalibratedParameters, CLIMB_DISTANCE_NM, DESCENT_DISTANCE_NM};
use airperf_core::aircraft::AircraftSpec;
use airperf_core::fuel::fuel_cost;
use airperf_performance::{
    step_cruise_range, CruiseOptions, CruiseSegment, PerformanceError, PointPerf, ThrustSpec,
};
use serde::Serialize;

use crate::segments::find_fuel_at_distance;
use crate::{infeasibility_reason, infeasible_result, size_fleet, FleetAggregate, MissionResult};

/// Mission definition. Defaults describe the 5,050 nm transport leg with
/// failure at the midpoint.
#[derive(Debug, Clone, Copy)]
pub struct EngineOutOptions {
    pub payload_lb: f64,
    pub distance_nm: f64,
    pub failure_point_nm: f64,
    pub n_steps_per_segment: usize,
    pub price_per_gallon: f64,
}

impl Default for EngineOutOptions {
    fn default() -> Self {
        Self {
            payload_lb: 46_000.0,
            distance_nm: 5_050.0,
            failure_point_nm: 2_525.0,
            n_steps_per_segment: 50,
            price_per_gallon: airperf_core::fuel::DEFAULT_PRICE_PER_GALLON,
        }
    }
}

/// One cruise phase of the two-segment profile.
#[derive(Debug, Clone, Serialize)]
pub struct CruisePhase {
    pub label: String,
    pub range_nm: f64,
    pub fuel_burned_lb: f64,
    pub n_engines: u32,
    pub drag_multiplier: f64,
    pub mach: f64,
    pub weight_at_start_lb: f64,
    pub weight_at_end_lb: f64,
    pub segments: Vec<CruiseSegment>,
}

/// Per-aircraft breakdown of the engine-out mission.
#[derive(Debug, Clone, Serialize)]
pub struct EngineOutDetail {
    pub takeoff_weight_lb: f64,
    pub oew_lb: f64,
    pub payload_lb: f64,
    pub total_fuel_lb: f64,
    pub non_cruise_fuel_lb: f64,
    pub cruise_fuel_lb: f64,
    pub segment1: CruisePhase,
    pub segment2: CruisePhase,
    pub climb_credit_nm: f64,
    pub descent_credit_nm: f64,
    pub total_range_nm: f64,
    pub cruise_range_nm: f64,
    pub range_surplus_nm: f64,
    pub total_fuel_burned_lb: f64,
    pub reserve_fuel_lb: f64,
    /// Cruise fuel still aboard on arrival, when the mission is feasible
    /// and the destination is reached before fuel exhaustion.
    pub fuel_at_destination_lb: Option<f64>,
    pub fuel_cost_usd: f64,
    pub fuel_cost_per_1000lb_nm: f64,
}

/// Simulate the engine-out transport mission.
pub fn simulate_engine_out(
    spec: &AircraftSpec,
    cal: &CalibratedParameters,
    opts: &EngineOutOptions,
) -> Result<MissionResult<EngineOutDetail>, PerformanceError> {
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

    // Fuel budget: the calibrated overhead fraction covers everything
    // outside cruise.
    let non_cruise_fuel = cal.f_oh * w_tow;
    let cruise_fuel = fuel_available - non_cruise_fuel;
    if cruise_fuel <= 0.0 {
        return Ok(infeasible_result(
            spec,
            opts.payload_lb,
            actual_payload,
            n_aircraft,
            "No cruise fuel after f_oh overhead deduction",
        ));
    }

    let perf = PointPerf::from_spec(spec, cal.cd0, cal.e, cal.k_adj);
    let thrust = ThrustSpec::from_spec(spec);
    let mach = spec.cruise_mach;

    // The failure point is measured from takeoff; the first 200 nm belong
    // to the climb credit, so the cruise distance to failure is shorter.
    // A failure inside the climb makes the whole cruise engine-out.
    let cruise_to_failure = (opts.failure_point_nm - CLIMB_DISTANCE_NM).max(0.0);

    // Segment 1: normal cruise at fine resolution so the failure-point
    // interpolation is smooth.
    let seg1_opts = CruiseOptions {
        n_steps: opts.n_steps_per_segment * 2,
        ceiling_ft: spec.service_ceiling_ft,
        ..CruiseOptions::default()
    };
    let seg1_full = step_cruise_range(w_tow, cruise_fuel, mach, &perf, Some(thrust), &seg1_opts)?;
    let seg1_split = find_fuel_at_distance(&seg1_full.segments, cruise_to_failure);

    let seg1_fuel_burned = seg1_split.fuel_burned_lb;
    let seg1_range = seg1_split
        .segments
        .last()
        .map(|s| s.cumulative_range_nm)
        .unwrap_or(0.0);
    let mut seg1_segments = seg1_split.segments;

    let w_at_failure = w_tow - seg1_fuel_burned;
    let remaining_cruise_fuel = cruise_fuel - seg1_fuel_burned;

    // Segment 2: engine-out cruise with the drag penalty and a lower
    // altitude floor so the true driftdown ceiling can be found.
    let drag_mult = airperf_aero::engine_out_drag_factor(spec.n_engines);
    let (seg2_range, seg2_fuel_burned, mut seg2_segments) = if remaining_cruise_fuel > 0.0 {
        let seg2_opts = CruiseOptions {
            n_steps: opts.n_steps_per_segment,
            ceiling_ft: spec.service_ceiling_ft,
            drag_multiplier: drag_mult,
            h_min_ft: 10_000.0,
            ..CruiseOptions::default()
        };
        let seg2 = step_cruise_range(
            w_at_failure,
            remaining_cruise_fuel,
            mach,
            &perf,
            Some(thrust.engine_out()),
            &seg2_opts,
        )?;
        (seg2.range_nm, seg2.fuel_burned_lb, seg2.segments)
    } else {
        (0.0, 0.0, Vec::new())
    };

    let total_cruise_range = seg1_range + seg2_range;
    let total_range = total_cruise_range + CLIMB_DISTANCE_NM + DESCENT_DISTANCE_NM;
    let total_fuel_burned = seg1_fuel_burned + seg2_fuel_burned;
    let reserve_remaining = cruise_fuel - total_fuel_burned;

    // Small tolerance on the reserve for interpolation rounding.
    let feasible = total_range >= opts.distance_nm && reserve_remaining >= -50.0;

    // Fuel still aboard at exactly the mission distance.
    let fuel_at_destination_lb = if feasible {
        let required_cruise_distance = opts.distance_nm - CLIMB_DISTANCE_NM - DESCENT_DISTANCE_NM;
        let mut combined: Vec<CruiseSegment> = seg1_segments.clone();
        for s in &seg2_segments {
            let mut entry = s.clone();
            entry.cumulative_range_nm = seg1_range + s.cumulative_range_nm;
            entry.cumulative_fuel_lb = seg1_fuel_burned + s.cumulative_fuel_lb;
            combined.push(entry);
        }
        let fad = find_fuel_at_distance(&combined, required_cruise_distance);
        fad.reached.then(|| cruise_fuel - fad.fuel_burned_lb)
    } else {
        None
    };

    // Shift segment tracks onto a continuous distance axis for plotting:
    // segment 1 starts after the climb credit, segment 2 after segment 1.
    for s in &mut seg1_segments {
        s.cumulative_range_nm += CLIMB_DISTANCE_NM;
    }
    let seg2_offset = CLIMB_DISTANCE_NM + seg1_range;
    for s in &mut seg2_segments {
        s.cumulative_range_nm += seg2_offset;
    }

    let total_fuel_cost = fuel_cost(fuel_available, opts.price_per_gallon);
    let fuel_cost_metric = if actual_payload > 0.0 && opts.distance_nm > 0.0 {
        total_fuel_cost / (actual_payload / 1000.0 * opts.distance_nm)
    } else {
        f64::INFINITY
    };

    let per_aircraft = EngineOutDetail {
        takeoff_weight_lb: w_tow,
        oew_lb: spec.oew_lb,
        payload_lb: actual_payload,
        total_fuel_lb: fuel_available,
        non_cruise_fuel_lb: non_cruise_fuel,
        cruise_fuel_lb: cruise_fuel,
        segment1: CruisePhase {
            label: "Normal cruise".to_string(),
            range_nm: seg1_range,
            fuel_burned_lb: seg1_fuel_burned,
            n_engines: spec.n_engines,
            drag_multiplier: 1.0,
            mach,
            weight_at_start_lb: w_tow,
            weight_at_end_lb: w_at_failure,
            segments: seg1_segments,
        },
        segment2: CruisePhase {
            label: "Engine-out cruise".to_string(),
            range_nm: seg2_range,
            fuel_burned_lb: seg2_fuel_burned,
            n_engines: spec.n_engines.saturating_sub(1),
            drag_multiplier: drag_mult,
            mach,
            weight_at_start_lb: w_at_failure,
            weight_at_end_lb: w_at_failure - seg2_fuel_burned,
            segments: seg2_segments,
        },
        climb_credit_nm: CLIMB_DISTANCE_NM,
        descent_credit_nm: DESCENT_DISTANCE_NM,
        total_range_nm: total_range,
        cruise_range_nm: total_cruise_range,
        range_surplus_nm: total_range - opts.distance_nm,
        total_fuel_burned_lb: total_fuel_burned,
        reserve_fuel_lb: reserve_remaining.max(0.0),
        fuel_at_destination_lb,
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
            .then(|| infeasibility_reason(total_range, opts.distance_nm, reserve_remaining)),
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        payload_requested_lb: opts.payload_lb,
        payload_actual_lb: actual_payload,
        n_aircraft,
        per_aircraft: Some(per_aircraft),
        aggregate,
    })
}
