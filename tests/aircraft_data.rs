use airperf::aircraft::IssueLevel;
use airperf::config::AircraftRegistry;

fn catalog() -> AircraftRegistry {
    AircraftRegistry::load(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/aircraft")).unwrap()
}

#[test]
fn the_shipped_catalog_loads_all_seven_aircraft() {
    let registry = catalog();
    assert_eq!(registry.len(), 7);
    for designation in [
        "DC-8",
        "GV",
        "737-900ER",
        "767-200ER",
        "A330-200",
        "777-200LR",
        "P-8",
    ] {
        assert!(registry.get(designation).is_ok(), "missing {designation}");
    }
}

#[test]
fn no_catalog_entry_has_validation_errors() {
    for entry in catalog().all() {
        let errors: Vec<_> = entry
            .spec
            .validate()
            .into_iter()
            .filter(|i| matches!(i.level, IssueLevel::Error))
            .collect();
        assert!(
            errors.is_empty(),
            "{}: {:?}",
            entry.spec.designation,
            errors
        );
    }
}

#[test]
fn weights_are_internally_consistent() {
    for entry in catalog().all() {
        let spec = &entry.spec;
        assert!(spec.oew_lb < spec.mzfw_lb, "{}", spec.designation);
        assert!(spec.mzfw_lb <= spec.mtow_lb, "{}", spec.designation);
        for (i, p) in spec.calibration_points.iter().enumerate() {
            let tow = spec.oew_lb + p.payload_lb + p.fuel_lb;
            assert!(
                tow <= spec.mtow_lb * 1.01,
                "{} point {i}: TOW {tow} above MTOW",
                spec.designation
            );
        }
    }
}

#[test]
fn ranges_grow_as_payload_shrinks() {
    for entry in catalog().all() {
        for pair in entry.spec.calibration_points.windows(2) {
            assert!(
                pair[0].payload_lb >= pair[1].payload_lb,
                "{}",
                entry.spec.designation
            );
            assert!(
                pair[0].range_nm < pair[1].range_nm,
                "{}",
                entry.spec.designation
            );
        }
    }
}

#[test]
fn the_maritime_variant_is_derived_from_the_narrowbody() {
    let registry = catalog();
    let p8 = registry.get("P-8").unwrap();
    assert_eq!(p8.derived_from.as_deref(), Some("737-900ER"));
    assert!((p8.oswald_delta.unwrap() - 0.025).abs() < 1e-12);
    // Max payload plus max fuel fills the P-8 to MTOW exactly.
    let spec = &p8.spec;
    let full = spec.oew_lb + spec.max_payload_lb + spec.max_fuel_lb;
    assert!((full - spec.mtow_lb).abs() < 1.0);

    for entry in registry.all() {
        if entry.spec.designation != "P-8" {
            assert!(entry.derived_from.is_none(), "{}", entry.spec.designation);
        }
    }
}
