use airperf::aircraft::{AircraftSpec, CalibrationPoint};
use airperf::calibration::CalibratedParameters;
use airperf::missions::endurance::{EnduranceOptions, simulate_low_altitude_endurance};
use airperf::missions::engine_out::{EngineOutOptions, simulate_engine_out};
use airperf::missions::sampling::{SamplingOptions, simulate_vertical_sampling};
use airperf::missions::segments::{climb_segment, descend_segment};
use airperf::missions::size_fleet;
use airperf::performance::{PointPerf, ThrustSpec};

fn widebody() -> AircraftSpec {
    AircraftSpec::new(AircraftSpec {
        name: "Test Widebody".into(),
        designation: "TW-1".into(),
        oew_lb: 179_080.0,
        mtow_lb: 395_000.0,
        mzfw_lb: 235_000.0,
        max_payload_lb: 55_920.0,
        max_fuel_lb: 162_000.0,
        wing_area_ft2: 3_050.0,
        aspect_ratio: 7.99,
        n_engines: 2,
        thrust_per_engine_slst_lbf: 52_500.0,
        tsfc_cruise_ref: 0.605,
        cruise_mach: 0.80,
        service_ceiling_ft: 43_100.0,
        calibration_points: vec![
            CalibrationPoint {
                payload_lb: 55_920.0,
                fuel_lb: 160_000.0,
                range_nm: 5_990.0,
            },
            CalibrationPoint {
                payload_lb: 0.0,
                fuel_lb: 162_000.0,
                range_nm: 7_900.0,
            },
        ],
    })
    .unwrap()
}

/// A plausible hand-picked fit, so mission tests do not depend on the
/// optimizer.
fn fitted(spec: &AircraftSpec) -> CalibratedParameters {
    CalibratedParameters {
        cd0: 0.020,
        e: 0.82,
        k_adj: 1.0,
        f_oh: 0.10,
        rms_error: 0.02,
        point_errors: vec![],
        l_d_max: 17.5,
        cl_at_max_ld: 0.55,
        converged: true,
        aircraft_name: spec.name.clone(),
        designation: spec.designation.clone(),
        derived_from: None,
        oswald_delta: None,
    }
}

#[test]
fn fleet_sizing_splits_oversized_payloads_evenly() {
    assert_eq!(size_fleet(40_000.0, 55_920.0), (40_000.0, 1));
    let (per_aircraft, n) = size_fleet(120_000.0, 55_920.0);
    assert_eq!(n, 3);
    assert!((per_aircraft - 40_000.0).abs() < 1e-9);
}

#[test]
fn climb_performance_degrades_with_weight() {
    let spec = widebody();
    let cal = fitted(&spec);
    let perf = PointPerf::from_spec(&spec, cal.cd0, cal.e, cal.k_adj);
    let thrust = ThrustSpec::from_spec(&spec);

    let heavy = climb_segment(390_000.0, 5_000.0, 35_000.0, 0.74, &perf, thrust).unwrap();
    let light = climb_segment(280_000.0, 5_000.0, 35_000.0, 0.74, &perf, thrust).unwrap();

    assert!(heavy.fuel_burned_lb > light.fuel_burned_lb);
    assert!(heavy.time_hr > light.time_hr);
    assert!(light.ceiling_ft >= heavy.ceiling_ft);
    assert!(!heavy.steps.is_empty());
}

#[test]
fn descent_is_far_cheaper_than_climb() {
    let spec = widebody();
    let cal = fitted(&spec);
    let perf = PointPerf::from_spec(&spec, cal.cd0, cal.e, cal.k_adj);
    let thrust = ThrustSpec::from_spec(&spec);

    let climb = climb_segment(350_000.0, 5_000.0, 35_000.0, 0.74, &perf, thrust).unwrap();
    let descent = descend_segment(340_000.0, 35_000.0, 5_000.0, 0.70, &perf).unwrap();

    assert!(descent.fuel_burned_lb < climb.fuel_burned_lb * 0.5);
    assert!(descent.distance_nm > 0.0);
}

#[test]
fn engine_out_long_haul_is_feasible_for_the_widebody() {
    let spec = widebody();
    let cal = fitted(&spec);
    let opts = EngineOutOptions {
        payload_lb: 46_000.0,
        distance_nm: 3_500.0,
        failure_point_nm: 1_750.0,
        ..EngineOutOptions::default()
    };

    let result = simulate_engine_out(&spec, &cal, &opts).unwrap();
    assert!(result.feasible, "reason: {:?}", result.infeasible_reason);
    assert_eq!(result.n_aircraft, 1);

    let detail = result.per_aircraft.unwrap();
    assert_eq!(detail.segment1.n_engines, 2);
    assert_eq!(detail.segment2.n_engines, 1);
    assert!(detail.segment2.drag_multiplier > 1.0);
    assert!(detail.total_range_nm >= opts.distance_nm);
    assert!(detail.fuel_at_destination_lb.is_some());
    // One engine out forces a lower, draggier cruise.
    let h1 = detail.segment1.segments.last().map(|s| s.altitude_ft);
    let h2 = detail.segment2.segments.first().map(|s| s.altitude_ft);
    if let (Some(h1), Some(h2)) = (h1, h2) {
        assert!(h2 <= h1, "engine-out altitude {h2} above all-engine {h1}");
    }
}

#[test]
fn engine_out_impossible_distance_reports_the_shortfall() {
    let spec = widebody();
    let cal = fitted(&spec);
    let opts = EngineOutOptions {
        payload_lb: 55_000.0,
        distance_nm: 30_000.0,
        failure_point_nm: 15_000.0,
        ..EngineOutOptions::default()
    };

    let result = simulate_engine_out(&spec, &cal, &opts).unwrap();
    assert!(!result.feasible);
    let reason = result.infeasible_reason.unwrap();
    assert!(reason.contains("shortfall"), "reason: {reason}");
}

#[test]
fn sampling_ceilings_rise_as_fuel_burns_off() {
    let spec = widebody();
    let cal = fitted(&spec);
    let opts = SamplingOptions {
        payload_lb: 40_000.0,
        distance_nm: 3_000.0,
        ..SamplingOptions::default()
    };

    let result = simulate_vertical_sampling(&spec, &cal, &opts).unwrap();
    assert!(result.feasible, "reason: {:?}", result.infeasible_reason);

    let detail = result.per_aircraft.unwrap();
    assert!(detail.n_cycles >= 2, "n_cycles = {}", detail.n_cycles);
    assert!(detail.final_ceiling_ft >= detail.initial_ceiling_ft);
    assert!(detail.peak_ceiling_ft <= spec.service_ceiling_ft + 1.0);
    assert!(
        detail.distance_covered_nm >= opts.distance_nm * 0.99,
        "covered = {}",
        detail.distance_covered_nm
    );
    assert!(!detail.profile_points.is_empty());
}

#[test]
fn endurance_sizing_converges_and_meets_the_clock() {
    let spec = widebody();
    let cal = fitted(&spec);
    let opts = EnduranceOptions {
        payload_lb: 30_000.0,
        duration_hr: 8.0,
        ..EnduranceOptions::default()
    };

    let result = simulate_low_altitude_endurance(&spec, &cal, &opts).unwrap();
    assert!(result.feasible, "reason: {:?}", result.infeasible_reason);

    let detail = result.per_aircraft.unwrap();
    assert!(detail.fuel_sizing_converged);
    assert!(detail.endurance_hr >= opts.duration_hr - 0.01);
    assert!(detail.mission_fuel_lb < detail.total_fuel_lb);
    assert!(detail.total_fuel_lb <= detail.max_fuel_available_lb + 1.0);
    // Mission-sized fuel should come in well under a full load for a
    // widebody loitering 8 hours at 1,500 ft.
    assert!(detail.total_fuel_lb < spec.max_fuel_lb);
    assert!((250.0 - detail.v_ktas).abs() < 1.0);
}

#[test]
fn overweight_payload_is_rejected_with_a_reason() {
    let spec = widebody();
    let cal = fitted(&spec);

    // Payload per airframe at max structural, so fuel available is tiny:
    // the mission dies on range, not on sizing.
    let opts = EngineOutOptions {
        payload_lb: spec.max_payload_lb * 2.0,
        distance_nm: 5_050.0,
        failure_point_nm: 2_525.0,
        ..EngineOutOptions::default()
    };
    let result = simulate_engine_out(&spec, &cal, &opts).unwrap();
    assert_eq!(result.n_aircraft, 2);
    assert!((result.payload_actual_lb - spec.max_payload_lb).abs() < 1e-9);
}

#[test]
fn payload_leaving_no_fuel_is_infeasible_in_every_mission() {
    // A structural max payload that uses up the whole OEW-to-MTOW margin,
    // so carrying it leaves zero fuel aboard.
    let mut template = widebody();
    template.max_payload_lb = template.mtow_lb - template.oew_lb;
    template.mzfw_lb = template.mtow_lb;
    let spec = AircraftSpec::new(template).unwrap();
    let cal = fitted(&spec);

    let payload_lb = spec.max_payload_lb;

    let eo = simulate_engine_out(
        &spec,
        &cal,
        &EngineOutOptions {
            payload_lb,
            ..EngineOutOptions::default()
        },
    )
    .unwrap();
    let vs = simulate_vertical_sampling(
        &spec,
        &cal,
        &SamplingOptions {
            payload_lb,
            ..SamplingOptions::default()
        },
    )
    .unwrap();
    let en = simulate_low_altitude_endurance(
        &spec,
        &cal,
        &EnduranceOptions {
            payload_lb,
            ..EnduranceOptions::default()
        },
    )
    .unwrap();

    for feasible in [eo.feasible, vs.feasible, en.feasible] {
        assert!(!feasible);
    }
    for reason in [
        eo.infeasible_reason.as_deref(),
        vs.infeasible_reason.as_deref(),
        en.infeasible_reason.as_deref(),
    ] {
        let reason = reason.unwrap();
        assert!(reason.contains("MTOW"), "reason = {reason}");
    }
    assert_eq!(eo.n_aircraft, 1);
    assert!(eo.per_aircraft.is_none());
}
