//! Altitude-stepping climb and idle-descent integrators.
//!
//! These are the fine-grained segment models used by the mission
//! simulators. The coarse energy-method estimators used by the range
//! computation live in `airperf_performance`.

use airperf_performance::{cruise_conditions, CruiseSegment, PerformanceError, PointPerf, ThrustSpec};
use airperf_core::units::{ft_to_nm, fps_to_kt};
use airperf_atmosphere as atmosphere;
use airperf_propulsion as propulsion;
use serde::Serialize;

/// Default altitude integration step, ft.
pub const CLIMB_H_STEP_FT: f64 = 1_000.0;
/// Minimum rate of climb defining the service ceiling, ft/min.
pub const ROC_MIN_FPM: f64 = 100.0;
/// Default idle descent rate, ft/min.
pub const DESCENT_RATE_FPM: f64 = 2_000.0;
/// Idle fuel flow as a fraction of cruise fuel flow.
pub const IDLE_FRACTION: f64 = 0.10;

/// One altitude step of a climb, for plotting and analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ClimbStep {
    pub h_start_ft: f64,
    pub h_end_ft: f64,
    pub h_mid_ft: f64,
    pub w_start_lb: f64,
    pub fuel_lb: f64,
    pub distance_nm: f64,
    pub time_hr: f64,
    pub roc_fpm: f64,
    pub thrust_avail_lbf: f64,
    pub drag_lbf: f64,
    pub excess_thrust_lbf: f64,
    pub mach: f64,
    pub cl: f64,
}

/// Result of an altitude-stepping climb.
#[derive(Debug, Clone, Serialize)]
pub struct ClimbSegmentResult {
    pub fuel_burned_lb: f64,
    pub distance_nm: f64,
    pub time_hr: f64,
    /// Altitude actually reached; below the target when the climb is
    /// thrust-limited.
    pub ceiling_ft: f64,
    pub steps: Vec<ClimbStep>,
    pub ceiling_limited: bool,
}

/// Integrate a constant-Mach climb between two altitudes.
///
/// Each step evaluates drag and thrust at the step midpoint, converts
/// excess thrust to rate of climb (ROC = V·T_excess/W), and burns fuel at
/// the thrust required for drag plus the climb component. The climb stops
/// early, flagged `ceiling_limited`, when excess thrust runs out or ROC
/// drops below 100 ft/min.
pub fn climb_segment(
    w_start_lb: f64,
    h_start_ft: f64,
    h_target_ft: f64,
    mach_climb: f64,
    perf: &PointPerf,
    thrust: ThrustSpec,
) -> Result<ClimbSegmentResult, PerformanceError> {
    if h_start_ft >= h_target_ft {
        return Ok(ClimbSegmentResult {
            fuel_burned_lb: 0.0,
            distance_nm: 0.0,
            time_hr: 0.0,
            ceiling_ft: h_start_ft,
            steps: Vec::new(),
            ceiling_limited: false,
        });
    }

    let mut total_fuel = 0.0;
    let mut total_distance = 0.0;
    let mut total_time = 0.0;
    let mut w_current = w_start_lb;
    let mut h_current = h_start_ft;
    let mut steps = Vec::new();
    let mut ceiling_limited = false;

    while h_current < h_target_ft {
        // The top step may be partial.
        let dh = CLIMB_H_STEP_FT.min(h_target_ft - h_current);
        let h_mid = h_current + dh / 2.0;

        let a_mid = atmosphere::speed_of_sound(h_mid);
        let v_fps = mach_climb * a_mid;
        let rho_mid = atmosphere::density(h_mid);
        let q_mid = 0.5 * rho_mid * v_fps * v_fps;

        let cl = airperf_aero::lift_coefficient(w_current, q_mid, perf.wing_area_ft2)?;
        let cd = airperf_aero::drag_coefficient(cl, perf.cd0, perf.aspect_ratio, perf.e);
        let drag_lbf = cd * q_mid * perf.wing_area_ft2;

        let thrust_avail =
            propulsion::thrust_available_cruise(thrust.slst_per_engine_lbf, h_mid, thrust.n_engines);

        let excess_thrust = thrust_avail - drag_lbf;
        if excess_thrust <= 0.0 {
            ceiling_limited = true;
            break;
        }

        let sin_gamma = excess_thrust / w_current;
        let roc_fps = v_fps * sin_gamma;
        let roc_fpm = roc_fps * 60.0;
        if roc_fpm < ROC_MIN_FPM {
            ceiling_limited = true;
            break;
        }

        let dt_sec = dh / roc_fps;
        let dt_hr = dt_sec / 3600.0;

        // Engine thrust during the climb balances drag plus the weight
        // component along the flight path.
        let thrust_required = drag_lbf + w_current * sin_gamma;
        let tsfc_val = propulsion::tsfc(h_mid, mach_climb, perf.tsfc_ref, perf.k_adj);
        let fuel_this_step = thrust_required * tsfc_val * dt_hr;

        let cos_gamma = (1.0 - sin_gamma * sin_gamma).sqrt();
        let dist_nm = ft_to_nm(v_fps * cos_gamma * dt_sec);

        steps.push(ClimbStep {
            h_start_ft: h_current,
            h_end_ft: h_current + dh,
            h_mid_ft: h_mid,
            w_start_lb: w_current,
            fuel_lb: fuel_this_step,
            distance_nm: dist_nm,
            time_hr: dt_hr,
            roc_fpm,
            thrust_avail_lbf: thrust_avail,
            drag_lbf,
            excess_thrust_lbf: excess_thrust,
            mach: mach_climb,
            cl,
        });

        total_fuel += fuel_this_step;
        total_distance += dist_nm;
        total_time += dt_hr;
        w_current -= fuel_this_step;
        h_current += dh;
    }

    Ok(ClimbSegmentResult {
        fuel_burned_lb: total_fuel,
        distance_nm: total_distance,
        time_hr: total_time,
        ceiling_ft: h_current,
        steps,
        ceiling_limited,
    })
}

/// Result of an idle descent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DescentSegmentResult {
    pub fuel_burned_lb: f64,
    pub distance_nm: f64,
    pub time_hr: f64,
}

/// Idle descent at a fixed rate.
///
/// Fuel burn scales with aircraft size: 10% of the cruise fuel flow at the
/// mid-descent altitude, rather than a fixed allowance.
pub fn descend_segment(
    w_start_lb: f64,
    h_start_ft: f64,
    h_target_ft: f64,
    mach_descent: f64,
    perf: &PointPerf,
) -> Result<DescentSegmentResult, PerformanceError> {
    if h_start_ft <= h_target_ft {
        return Ok(DescentSegmentResult {
            fuel_burned_lb: 0.0,
            distance_nm: 0.0,
            time_hr: 0.0,
        });
    }

    let delta_h = h_start_ft - h_target_ft;
    let time_hr = delta_h / DESCENT_RATE_FPM / 60.0;

    let h_mid = (h_start_ft + h_target_ft) / 2.0;
    let conds = cruise_conditions(w_start_lb, h_mid, mach_descent, perf)?;
    let cruise_fuel_flow = conds.drag_lbf * conds.tsfc;
    let descent_fuel = IDLE_FRACTION * cruise_fuel_flow * time_hr;

    let a_mid = atmosphere::speed_of_sound(h_mid);
    let v_ktas = fps_to_kt(mach_descent * a_mid);

    Ok(DescentSegmentResult {
        fuel_burned_lb: descent_fuel,
        distance_nm: v_ktas * time_hr,
        time_hr,
    })
}

/// State at the point where cruise distance reaches a target.
#[derive(Debug, Clone)]
pub struct FuelAtDistance {
    pub fuel_burned_lb: f64,
    pub weight_lb: f64,
    /// Segments up to the target; the crossing segment is truncated so the
    /// cumulative track stays continuous for plotting.
    pub segments: Vec<CruiseSegment>,
    pub reached: bool,
}

/// Scan step-cruise segments for the point where cumulative range crosses
/// a target distance, interpolating within the crossing step.
pub fn find_fuel_at_distance(segments: &[CruiseSegment], target_range_nm: f64) -> FuelAtDistance {
    if segments.is_empty() {
        return FuelAtDistance {
            fuel_burned_lb: 0.0,
            weight_lb: 0.0,
            segments: Vec::new(),
            reached: false,
        };
    }

    let mut truncated = Vec::new();
    for (i, s) in segments.iter().enumerate() {
        if s.cumulative_range_nm >= target_range_nm {
            let (prev_cum_range, prev_cum_fuel) = if i > 0 {
                (
                    segments[i - 1].cumulative_range_nm,
                    segments[i - 1].cumulative_fuel_lb,
                )
            } else {
                (0.0, 0.0)
            };

            let range_into_step = target_range_nm - prev_cum_range;
            let frac = if s.range_nm > 0.0 {
                (range_into_step / s.range_nm).clamp(0.0, 1.0)
            } else {
                1.0
            };

            let step_fuel = s.w_start_lb - s.w_end_lb;
            let interpolated_fuel = step_fuel * frac;
            let fuel_burned = prev_cum_fuel + interpolated_fuel;
            let weight = s.w_start_lb - interpolated_fuel;

            let mut partial = s.clone();
            partial.range_nm = s.range_nm * frac;
            partial.cumulative_range_nm = target_range_nm;
            partial.cumulative_fuel_lb = fuel_burned;
            partial.w_end_lb = weight;
            truncated.push(partial);

            return FuelAtDistance {
                fuel_burned_lb: fuel_burned,
                weight_lb: weight,
                segments: truncated,
                reached: true,
            };
        }
        truncated.push(s.clone());
    }

    // Fuel ran out before the target.
    let last = &segments[segments.len() - 1];
    FuelAtDistance {
        fuel_burned_lb: last.cumulative_fuel_lb,
        weight_lb: last.w_end_lb,
        segments: truncated,
        reached: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf() -> PointPerf {
        PointPerf {
            wing_area_ft2: 2_868.0,
            aspect_ratio: 7.68,
            cd0: 0.022,
            e: 0.80,
            tsfc_ref: 0.65,
            k_adj: 1.0,
        }
    }

    fn thrust() -> ThrustSpec {
        ThrustSpec {
            slst_per_engine_lbf: 22_000.0,
            n_engines: 4,
        }
    }

    #[test]
    fn climb_from_above_target_is_a_no_op() {
        let r = climb_segment(250_000.0, 35_000.0, 30_000.0, 0.76, &perf(), thrust()).unwrap();
        assert_eq!(r.fuel_burned_lb, 0.0);
        assert_eq!(r.ceiling_ft, 35_000.0);
        assert!(!r.ceiling_limited);
    }

    #[test]
    fn climb_burns_fuel_and_covers_distance() {
        let r = climb_segment(250_000.0, 5_000.0, 35_000.0, 0.76, &perf(), thrust()).unwrap();
        assert!(r.fuel_burned_lb > 0.0);
        assert!(r.distance_nm > 0.0);
        assert!(r.ceiling_ft > 5_000.0);
        assert_eq!(r.steps.len(), ((r.ceiling_ft - 5_000.0) / 1_000.0).round() as usize);
    }

    #[test]
    fn heavy_climb_is_ceiling_limited() {
        // At well above MTOW-class weight the thrust-limited ceiling must
        // sit below an absurdly high target.
        let r = climb_segment(320_000.0, 5_000.0, 60_000.0, 0.76, &perf(), thrust()).unwrap();
        assert!(r.ceiling_limited);
        assert!(r.ceiling_ft < 60_000.0);
    }

    #[test]
    fn descent_scales_with_altitude() {
        let hi = descend_segment(200_000.0, 40_000.0, 5_000.0, 0.72, &perf()).unwrap();
        let lo = descend_segment(200_000.0, 20_000.0, 5_000.0, 0.72, &perf()).unwrap();
        assert!(hi.time_hr > lo.time_hr);
        assert!(hi.distance_nm > lo.distance_nm);
        assert!(hi.fuel_burned_lb > 0.0);
    }

    #[test]
    fn fuel_at_distance_interpolates_within_a_step() {
        let segments = vec![
            CruiseSegment {
                step: 0,
                w_start_lb: 100_000.0,
                w_end_lb: 99_000.0,
                altitude_ft: 35_000.0,
                mach: 0.8,
                cl: 0.5,
                cd: 0.03,
                l_d: 16.0,
                effective_l_d: 16.0,
                tsfc: 0.65,
                v_ktas: 460.0,
                range_nm: 100.0,
                cumulative_range_nm: 100.0,
                cumulative_fuel_lb: 1_000.0,
            },
            CruiseSegment {
                step: 1,
                w_start_lb: 99_000.0,
                w_end_lb: 98_000.0,
                altitude_ft: 35_000.0,
                mach: 0.8,
                cl: 0.5,
                cd: 0.03,
                l_d: 16.0,
                effective_l_d: 16.0,
                tsfc: 0.65,
                v_ktas: 460.0,
                range_nm: 100.0,
                cumulative_range_nm: 200.0,
                cumulative_fuel_lb: 2_000.0,
            },
        ];

        let r = find_fuel_at_distance(&segments, 150.0);
        assert!(r.reached);
        assert!((r.fuel_burned_lb - 1_500.0).abs() < 1e-9);
        assert!((r.weight_lb - 98_500.0).abs() < 1e-9);
        assert_eq!(r.segments.len(), 2);
        assert!((r.segments[1].cumulative_range_nm - 150.0).abs() < 1e-9);
    }

    #[test]
    fn fuel_at_distance_reports_exhaustion() {
        let segments = vec![CruiseSegment {
            step: 0,
            w_start_lb: 100_000.0,
            w_end_lb: 99_000.0,
            altitude_ft: 35_000.0,
            mach: 0.8,
            cl: 0.5,
            cd: 0.03,
            l_d: 16.0,
            effective_l_d: 16.0,
            tsfc: 0.65,
            v_ktas: 460.0,
            range_nm: 100.0,
            cumulative_range_nm: 100.0,
            cumulative_fuel_lb: 1_000.0,
        }];
        let r = find_fuel_at_distance(&segments, 500.0);
        assert!(!r.reached);
        assert_eq!(r.fuel_burned_lb, 1_000.0);
    }
}
