//! Mission simulators for the comparative study.
//!
//! Three missions, each taking an aircraft and its calibrated parameters
//! and returning feasibility, a fuel breakdown, per-segment data for
//! plotting, and fleet sizing for aircraft too small to carry the full
//! payload:
//!
//!   1. long-range transport with a single engine failure at midpoint,
//!   2. vertical atmospheric sampling flown as sawtooth climb-descend
//!      cycles,
//!   3. low-altitude endurance at fixed altitude and reduced speed.
//!
//! Fuel budgets differ on purpose: the engine-out mission uses the
//! calibrated overhead fraction (non-cruise fuel = f_oh × W_tow) so its
//! accounting matches the calibration convention, while the sampling and
//! endurance missions model climb, descent, and reserves explicitly.

use serde::Serialize;

pub mod endurance;
pub mod engine_out;
pub mod sampling;
pub mod segments;

/// Outcome common to all three missions; `detail` carries the
/// mission-specific per-aircraft breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct MissionResult<D> {
    pub feasible: bool,
    pub infeasible_reason: Option<String>,
    pub aircraft_name: String,
    pub designation: String,
    pub payload_requested_lb: f64,
    pub payload_actual_lb: f64,
    pub n_aircraft: u32,
    /// None when the aircraft cannot even attempt the mission.
    pub per_aircraft: Option<D>,
    /// Present only when more than one airframe is needed.
    pub aggregate: Option<FleetAggregate>,
}

/// Fleet-level totals when several airframes split the payload.
#[derive(Debug, Clone, Serialize)]
pub struct FleetAggregate {
    pub n_aircraft: u32,
    pub total_payload_lb: f64,
    pub total_fuel_lb: f64,
    pub total_fuel_burned_lb: f64,
    pub total_fuel_cost_usd: f64,
    pub fuel_cost_per_1000lb_nm: f64,
}

/// Split a required payload across the minimum number of airframes.
///
/// Returns the per-aircraft payload and the fleet size. A single aircraft
/// carries the whole load when it fits; otherwise the load is divided
/// evenly over ceil(required / max) airframes.
pub fn size_fleet(payload_required_lb: f64, max_payload_lb: f64) -> (f64, u32) {
    if payload_required_lb <= max_payload_lb {
        (payload_required_lb, 1)
    } else {
        let n = (payload_required_lb / max_payload_lb).ceil() as u32;
        (payload_required_lb / n as f64, n)
    }
}

/// Human-readable reason for an infeasible mission outcome.
pub(crate) fn infeasibility_reason(
    achieved_nm: f64,
    required_nm: f64,
    reserve_lb: f64,
) -> String {
    let mut reasons = Vec::new();
    if achieved_nm < required_nm {
        reasons.push(format!(
            "Range shortfall: {:.0} nm ({:.0} of {:.0} nm)",
            required_nm - achieved_nm,
            achieved_nm,
            required_nm
        ));
    }
    if reserve_lb < 0.0 {
        reasons.push(format!("Negative reserve fuel: {reserve_lb:.0} lb"));
    }
    if reasons.is_empty() {
        "Unknown".to_string()
    } else {
        reasons.join("; ")
    }
}

pub(crate) fn infeasible_result<D>(
    spec: &airperf_core::aircraft::AircraftSpec,
    payload_requested_lb: f64,
    payload_actual_lb: f64,
    n_aircraft: u32,
    reason: &str,
) -> MissionResult<D> {
    MissionResult {
        feasible: false,
        infeasible_reason: Some(reason.to_string()),
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        payload_requested_lb,
        payload_actual_lb,
        n_aircraft,
        per_aircraft: None,
        aggregate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_aircraft_when_payload_fits() {
        let (per, n) = size_fleet(46_000.0, 52_000.0);
        assert_eq!(n, 1);
        assert_eq!(per, 46_000.0);
    }

    #[test]
    fn fleet_splits_payload_evenly() {
        let (per, n) = size_fleet(46_000.0, 5_800.0);
        assert_eq!(n, 8);
        assert!((per - 5_750.0).abs() < 1e-9);
        assert!(per <= 5_800.0);
    }

    #[test]
    fn exact_fit_needs_no_fleet() {
        let (per, n) = size_fleet(5_800.0, 5_800.0);
        assert_eq!(n, 1);
        assert_eq!(per, 5_800.0);
    }

    #[test]
    fn infeasibility_reason_mentions_both_causes() {
        let r = infeasibility_reason(4_000.0, 5_050.0, -120.0);
        assert!(r.contains("Range shortfall"));
        assert!(r.contains("Negative reserve fuel"));
    }
}
