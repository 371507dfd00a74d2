use airperf::atmosphere::{self, H_TROPOPAUSE_FT};
use airperf::constants::{A0_FPS, P0_PSF, RHO0_SLUGFT3, T0_RANKINE};

#[test]
fn sea_level_matches_standard_day() {
    assert!((atmosphere::temperature(0.0) - T0_RANKINE).abs() < 1e-9);
    assert!((atmosphere::pressure(0.0) - P0_PSF).abs() < 1e-6);
    assert!((atmosphere::density(0.0) - RHO0_SLUGFT3).abs() < 1e-7);
    assert!((atmosphere::speed_of_sound(0.0) - A0_FPS).abs() < 0.1);
}

#[test]
fn troposphere_values_at_35000_ft() {
    // Standard atmosphere tables: T ~ 393.9 R, sigma ~ 0.3099 at FL350.
    let t = atmosphere::temperature(35_000.0);
    assert!((t - 393.9).abs() < 1.0, "T = {t}");
    let sigma = atmosphere::density_ratio(35_000.0);
    assert!((sigma - 0.310).abs() < 0.01, "sigma = {sigma}");
}

#[test]
fn pressure_and_density_decrease_with_altitude() {
    let mut h = 0.0;
    while h < 60_000.0 {
        let h_next = h + 1_000.0;
        assert!(atmosphere::pressure(h_next) < atmosphere::pressure(h));
        assert!(atmosphere::density(h_next) < atmosphere::density(h));
        h = h_next;
    }
}

#[test]
fn temperature_is_isothermal_above_the_tropopause() {
    let t_tropo = atmosphere::temperature(H_TROPOPAUSE_FT);
    for h in [40_000.0, 50_000.0, 60_000.0] {
        assert!((atmosphere::temperature(h) - t_tropo).abs() < 1e-9);
        assert!(
            (atmosphere::speed_of_sound(h) - atmosphere::speed_of_sound(40_000.0)).abs() < 1e-9
        );
    }
}

#[test]
fn profiles_are_continuous_across_the_tropopause() {
    let below = atmosphere::pressure(H_TROPOPAUSE_FT - 0.1);
    let above = atmosphere::pressure(H_TROPOPAUSE_FT + 0.1);
    assert!((below - above).abs() / below < 1e-4);

    let rho_below = atmosphere::density(H_TROPOPAUSE_FT - 0.1);
    let rho_above = atmosphere::density(H_TROPOPAUSE_FT + 0.1);
    assert!((rho_below - rho_above).abs() / rho_below < 1e-4);
}

#[test]
fn dynamic_pressure_scales_with_density_and_speed() {
    let q1 = atmosphere::dynamic_pressure(0.0, 500.0);
    let q2 = atmosphere::dynamic_pressure(0.0, 1_000.0);
    assert!((q2 / q1 - 4.0).abs() < 1e-9);

    let q_alt = atmosphere::dynamic_pressure(35_000.0, 500.0);
    assert!(q_alt < q1);
}
