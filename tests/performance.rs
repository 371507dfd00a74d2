use airperf::aircraft::{AircraftSpec, CalibrationPoint};
use airperf::performance::{
    CruiseOptions, PointPerf, ThrustSpec, breguet_range_nm, compute_range_for_payload,
    compute_reserve_fuel, cruise_conditions, optimal_cruise_altitude, step_cruise_range,
};

fn dc8_like() -> AircraftSpec {
    AircraftSpec::new(AircraftSpec {
        name: "Quad Freighter".into(),
        designation: "QF-1".into(),
        oew_lb: 157_000.0,
        mtow_lb: 325_000.0,
        mzfw_lb: 209_000.0,
        max_payload_lb: 52_000.0,
        max_fuel_lb: 147_255.0,
        wing_area_ft2: 2_868.0,
        aspect_ratio: 7.68,
        n_engines: 4,
        thrust_per_engine_slst_lbf: 22_000.0,
        tsfc_cruise_ref: 0.65,
        cruise_mach: 0.80,
        service_ceiling_ft: 42_000.0,
        calibration_points: vec![
            CalibrationPoint {
                payload_lb: 52_000.0,
                fuel_lb: 116_000.0,
                range_nm: 2_750.0,
            },
            CalibrationPoint {
                payload_lb: 0.0,
                fuel_lb: 147_255.0,
                range_nm: 6_400.0,
            },
        ],
    })
    .unwrap()
}

fn perf_for(spec: &AircraftSpec) -> PointPerf {
    PointPerf::from_spec(spec, 0.022, 0.80, 1.0)
}

#[test]
fn breguet_zero_fuel_gives_zero_range() {
    let r = breguet_range_nm(800.0, 0.65, 17.0, 300_000.0, 300_000.0).unwrap();
    assert_eq!(r, 0.0);
}

#[test]
fn breguet_jet_transport_magnitude() {
    // 800 fps, TSFC 0.65, L/D 17, burning 100k of a 300k lb TOW:
    // R = (V/c)·(L/D)·ln(Wi/Wf) ~ 3,100 nm.
    let r = breguet_range_nm(800.0, 0.65, 17.0, 300_000.0, 200_000.0).unwrap();
    assert!((2_500.0..4_000.0).contains(&r), "range = {r}");
}

#[test]
fn breguet_rejects_nonpositive_final_weight() {
    assert!(breguet_range_nm(800.0, 0.65, 17.0, 300_000.0, 0.0).is_err());
}

#[test]
fn cruise_conditions_are_self_consistent() {
    let spec = dc8_like();
    let perf = perf_for(&spec);
    let conds = cruise_conditions(280_000.0, 33_000.0, 0.80, &perf).unwrap();

    assert!(conds.cl > 0.2 && conds.cl < 0.8, "cl = {}", conds.cl);
    assert!(conds.l_d > 10.0 && conds.l_d < 22.0, "l_d = {}", conds.l_d);
    // Drag equals weight over L/D in level flight.
    let implied_drag = 280_000.0 / conds.l_d;
    assert!((conds.drag_lbf - implied_drag).abs() / implied_drag < 1e-9);
}

#[test]
fn optimal_altitude_rises_as_weight_falls() {
    let spec = dc8_like();
    let perf = perf_for(&spec);
    let thrust = ThrustSpec::from_spec(&spec);
    let opts = CruiseOptions {
        ceiling_ft: spec.service_ceiling_ft,
        ..CruiseOptions::default()
    };

    let h_heavy = optimal_cruise_altitude(320_000.0, 0.80, &perf, Some(thrust), &opts).unwrap();
    let h_light = optimal_cruise_altitude(200_000.0, 0.80, &perf, Some(thrust), &opts).unwrap();
    assert!(
        h_light >= h_heavy,
        "h_light = {h_light}, h_heavy = {h_heavy}"
    );
}

#[test]
fn step_cruise_range_grows_with_fuel() {
    let spec = dc8_like();
    let perf = perf_for(&spec);
    let thrust = ThrustSpec::from_spec(&spec);
    let opts = CruiseOptions {
        ceiling_ft: spec.service_ceiling_ft,
        n_steps: 25,
        ..CruiseOptions::default()
    };

    let short = step_cruise_range(300_000.0, 40_000.0, 0.80, &perf, Some(thrust), &opts).unwrap();
    let long = step_cruise_range(300_000.0, 80_000.0, 0.80, &perf, Some(thrust), &opts).unwrap();
    assert!(long.range_nm > short.range_nm);
    assert_eq!(short.segments.len(), 25);

    // Specific range improves as the aircraft burns down, so the second
    // half of the fuel buys more distance than the first.
    let half = short.range_nm;
    assert!(long.range_nm > 2.0 * half * 0.95, "second half too short");
}

#[test]
fn step_cruise_altitudes_never_decrease() {
    let spec = dc8_like();
    let perf = perf_for(&spec);
    let thrust = ThrustSpec::from_spec(&spec);
    let opts = CruiseOptions {
        ceiling_ft: spec.service_ceiling_ft,
        n_steps: 20,
        ..CruiseOptions::default()
    };

    let res = step_cruise_range(320_000.0, 100_000.0, 0.80, &perf, Some(thrust), &opts).unwrap();
    for pair in res.segments.windows(2) {
        assert!(
            pair[1].altitude_ft >= pair[0].altitude_ft - 1.0,
            "altitude dropped from {} to {}",
            pair[0].altitude_ft,
            pair[1].altitude_ft
        );
    }
}

#[test]
fn reserves_are_a_sane_fraction_of_the_load() {
    let spec = dc8_like();
    let perf = perf_for(&spec);
    let reserve = compute_reserve_fuel(116_000.0, &spec, &perf).unwrap();
    assert!(reserve > 5_000.0, "reserve = {reserve}");
    assert!(reserve < 116_000.0 * 0.25, "reserve = {reserve}");
}

#[test]
fn range_for_payload_breakdown_adds_up() {
    let spec = dc8_like();
    let b = compute_range_for_payload(
        &spec,
        52_000.0,
        116_000.0,
        0.022,
        0.80,
        1.0,
        &CruiseOptions::default(),
    )
    .unwrap();

    assert!(b.range_nm > 1_500.0 && b.range_nm < 5_000.0, "range = {}", b.range_nm);
    let parts = b.cruise_range_nm + b.climb_distance_nm + b.descent_distance_nm;
    assert!((b.range_nm - parts).abs() < 1.0);
    let fuel_parts = b.climb_fuel_lb + b.cruise_fuel_lb + b.descent_fuel_lb + b.reserve_fuel_lb;
    assert!((fuel_parts - b.fuel_total_lb).abs() / b.fuel_total_lb < 0.05);
    assert!(b.initial_cruise_alt_ft >= 25_000.0);
    assert!(b.initial_cruise_alt_ft <= spec.service_ceiling_ft);
}

#[test]
fn range_for_payload_rejects_overweight_loads() {
    let spec = dc8_like();
    let res = compute_range_for_payload(
        &spec,
        52_000.0,
        147_255.0,
        0.022,
        0.80,
        1.0,
        &CruiseOptions::default(),
    );
    assert!(res.is_err());
}
