use airperf::aircraft::{AircraftSpec, CalibrationPoint};
use airperf::calibration::{
    CalibrationMethod, calibrate_aircraft, calibrate_derived, compute_calibration_range,
    format_calibration_report, sanity_check,
};

/// A twin with target ranges generated by the model itself at a known
/// parameter set, so a local fit can recover them almost exactly.
fn synthetic_twin() -> AircraftSpec {
    let truth = (0.025, 0.80, 1.0, 0.12);
    let mut spec = AircraftSpec {
        name: "Synthetic Twin".into(),
        designation: "ST-1".into(),
        oew_lb: 98_495.0,
        mtow_lb: 187_700.0,
        mzfw_lb: 146_300.0,
        max_payload_lb: 47_805.0,
        max_fuel_lb: 46_063.0,
        wing_area_ft2: 1_344.0,
        aspect_ratio: 10.26,
        n_engines: 2,
        thrust_per_engine_slst_lbf: 26_300.0,
        cruise_mach: 0.785,
        tsfc_cruise_ref: 0.627,
        service_ceiling_ft: 41_000.0,
        calibration_points: vec![
            CalibrationPoint {
                payload_lb: 47_805.0,
                fuel_lb: 41_400.0,
                range_nm: 0.0,
            },
            CalibrationPoint {
                payload_lb: 43_142.0,
                fuel_lb: 46_063.0,
                range_nm: 0.0,
            },
            CalibrationPoint {
                payload_lb: 0.0,
                fuel_lb: 46_063.0,
                range_nm: 0.0,
            },
        ],
    };
    for i in 0..spec.calibration_points.len() {
        let (payload_lb, fuel_lb) = (
            spec.calibration_points[i].payload_lb,
            spec.calibration_points[i].fuel_lb,
        );
        spec.calibration_points[i].range_nm = compute_calibration_range(
            &spec, payload_lb, fuel_lb, truth.0, truth.1, truth.2, truth.3, 25,
        )
        .unwrap();
    }
    AircraftSpec::new(spec).unwrap()
}

#[test]
fn local_fit_recovers_a_self_generated_target() {
    let spec = synthetic_twin();
    let cal = calibrate_aircraft(&spec, CalibrationMethod::LocalOnly).unwrap();

    // The local start IS the generating parameter set, so the fit should
    // sit at (numerically) zero RMS and converge.
    assert!(cal.rms_error < 0.01, "rms = {}", cal.rms_error);
    assert!(cal.converged);
    assert_eq!(cal.point_errors.len(), 3);
    assert!((cal.cd0 - 0.025).abs() < 0.002, "cd0 = {}", cal.cd0);
    assert!((cal.e - 0.80).abs() < 0.05, "e = {}", cal.e);
    assert!(cal.l_d_max > 10.0 && cal.l_d_max < 25.0);
}

#[test]
fn too_few_points_is_an_error() {
    let mut spec = synthetic_twin();
    spec.calibration_points.truncate(1);
    assert!(calibrate_aircraft(&spec, CalibrationMethod::LocalOnly).is_err());
}

#[test]
fn derived_transfer_keeps_the_donor_shape() {
    let spec = synthetic_twin();
    let donor = calibrate_aircraft(&spec, CalibrationMethod::LocalOnly).unwrap();

    let mut variant = synthetic_twin();
    variant.name = "Synthetic Twin MPA".into();
    variant.designation = "ST-1M".into();
    variant.calibration_points.clear();

    let derived = calibrate_derived(&donor, &variant, 0.025);
    assert_eq!(derived.cd0, donor.cd0);
    assert!((derived.e - (donor.e + 0.025).min(0.90)).abs() < 1e-12);
    assert_eq!(derived.derived_from.as_deref(), Some("ST-1"));
    assert!(derived.rms_error.is_nan());
    assert!(derived.converged);
}

#[test]
fn sanity_check_flags_implausible_fits() {
    let spec = synthetic_twin();
    let mut cal = calibrate_aircraft(&spec, CalibrationMethod::LocalOnly).unwrap();
    let clean = sanity_check(&cal);
    assert!(clean.is_empty(), "unexpected flags: {clean:?}");

    cal.k_adj = 1.30;
    cal.f_oh = 0.30;
    let flagged = sanity_check(&cal);
    assert!(flagged.len() >= 2, "flags: {flagged:?}");
}

#[test]
fn report_includes_the_fitted_parameters() {
    let spec = synthetic_twin();
    let cal = calibrate_aircraft(&spec, CalibrationMethod::LocalOnly).unwrap();
    let report = format_calibration_report(&cal);
    assert!(report.contains("Synthetic Twin"));
    assert!(report.contains("CD0"));
    assert!(report.contains("Oswald"));
    assert!(report.contains("RMS"));
}
