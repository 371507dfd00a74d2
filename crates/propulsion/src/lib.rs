//! Turbofan propulsion model: parametric TSFC and a two-regime thrust lapse.
//!
//! TSFC(h, M) = TSFC_ref × f_altitude(h) × f_mach(M) × k_adj
//!
//! The altitude factor captures the thermal-efficiency benefit of cold air
//! (sqrt of the temperature ratio, standard for high-bypass turbofans); the
//! Mach factor is a linear ram-effect correction; k_adj is the calibration
//! multiplier fitted per aircraft.
//!
//! References: Mattingly, "Elements of Propulsion"; Raymer, "Aircraft
//! Design: A Conceptual Approach".

use airperf_atmosphere as atmosphere;
use airperf_atmosphere::H_TROPOPAUSE_FT;

/// Altitude where published cruise TSFC values are typically quoted, ft.
pub const TSFC_REF_ALT_FT: f64 = 35_000.0;
/// Mach number where published cruise TSFC values are typically quoted.
pub const TSFC_REF_MACH: f64 = 0.80;

/// TSFC sensitivity to Mach number for high-bypass turbofans.
const K_MACH: f64 = 0.3;

/// Thrust lapse exponent below the tropopause (σ^0.75, standard
/// high-bypass turbofan).
pub const THRUST_LAPSE_EXPONENT_TROPO: f64 = 0.75;
/// Thrust lapse exponent above the tropopause. Steeper than the simple
/// density-ratio model: real engines shed thrust faster in the isothermal
/// layer (compressor efficiency, RPM limits). Empirical, not derivable from
/// first principles, and calibration-sensitive.
pub const THRUST_LAPSE_EXPONENT_STRATO: f64 = 2.0;

/// TSFC altitude correction, normalized to 1.0 at the reference altitude.
pub fn altitude_factor(h_ft: f64) -> f64 {
    let theta = atmosphere::temperature_ratio(h_ft);
    let theta_ref = atmosphere::temperature_ratio(TSFC_REF_ALT_FT);
    (theta / theta_ref).sqrt()
}

/// TSFC Mach correction: linear ram-effect model, 1.0 at the reference Mach.
pub fn mach_factor(mach: f64) -> f64 {
    1.0 + K_MACH * (mach - TSFC_REF_MACH)
}

/// TSFC at flight conditions, lb/(lbf·hr).
pub fn tsfc(h_ft: f64, mach: f64, tsfc_ref: f64, k_adj: f64) -> f64 {
    tsfc_ref * altitude_factor(h_ft) * mach_factor(mach) * k_adj
}

/// Fuel flow for a given thrust, lb/hr.
pub fn fuel_flow_rate(thrust_lbf: f64, h_ft: f64, mach: f64, tsfc_ref: f64, k_adj: f64) -> f64 {
    thrust_lbf * tsfc(h_ft, mach, tsfc_ref, k_adj)
}

/// Total available cruise thrust at altitude, lbf.
///
/// Two-regime lapse: σ^0.75 below the tropopause; above it, a steeper
/// (σ/σ_trop)^2.0 lapse referenced to the tropopause thrust so the two
/// regimes agree at the boundary by construction. Used for thrust-vs-drag
/// feasibility checks, not for fuel burn.
pub fn thrust_available_cruise(thrust_slst_lbf: f64, h_ft: f64, n_engines: u32) -> f64 {
    let sigma = atmosphere::density_ratio(h_ft);
    let per_engine = if h_ft <= H_TROPOPAUSE_FT {
        thrust_slst_lbf * sigma.powf(THRUST_LAPSE_EXPONENT_TROPO)
    } else {
        let sigma_trop = atmosphere::density_ratio(H_TROPOPAUSE_FT);
        let thrust_at_trop = thrust_slst_lbf * sigma_trop.powf(THRUST_LAPSE_EXPONENT_TROPO);
        thrust_at_trop * (sigma / sigma_trop).powf(THRUST_LAPSE_EXPONENT_STRATO)
    };
    per_engine * n_engines as f64
}

/// Highest altitude where available thrust still meets the requirement, ft.
///
/// Bisection over 0..55,000 ft; the lapse model has no clean inverse.
/// Returns 0 if even sea level cannot meet the requirement.
pub fn max_altitude_for_thrust(
    required_thrust_lbf: f64,
    thrust_slst_lbf: f64,
    n_engines: u32,
) -> f64 {
    let mut h_low = 0.0_f64;
    let mut h_high = 55_000.0_f64;

    if thrust_available_cruise(thrust_slst_lbf, 0.0, n_engines) < required_thrust_lbf {
        return 0.0;
    }

    // 50 iterations is effectively machine precision over this interval.
    for _ in 0..50 {
        let h_mid = 0.5 * (h_low + h_high);
        if thrust_available_cruise(thrust_slst_lbf, h_mid, n_engines) >= required_thrust_lbf {
            h_low = h_mid;
        } else {
            h_high = h_mid;
        }
    }
    h_low
}

/// Fraction of total thrust remaining after a single engine failure.
pub fn engine_out_thrust_fraction(n_engines: u32) -> f64 {
    (n_engines.saturating_sub(1)) as f64 / n_engines as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thrust_lapse_continuous_at_tropopause() {
        let below = thrust_available_cruise(22_000.0, H_TROPOPAUSE_FT - 1e-6, 4);
        let above = thrust_available_cruise(22_000.0, H_TROPOPAUSE_FT + 1e-6, 4);
        assert!((below - above).abs() / below < 1e-6);
    }

    #[test]
    fn tsfc_normalized_at_reference_conditions() {
        let c = tsfc(TSFC_REF_ALT_FT, TSFC_REF_MACH, 0.65, 1.0);
        assert!((c - 0.65).abs() < 1e-12);
    }

    #[test]
    fn ceiling_search_brackets_the_requirement() {
        let thrust_slst = 22_000.0;
        let h = max_altitude_for_thrust(30_000.0, thrust_slst, 4);
        assert!(h > 0.0 && h < 55_000.0);
        assert!(thrust_available_cruise(thrust_slst, h - 1.0, 4) >= 30_000.0);
        assert!(thrust_available_cruise(thrust_slst, h + 1.0, 4) < 30_000.0);
    }

    #[test]
    fn infeasible_requirement_returns_sea_level() {
        assert_eq!(max_altitude_for_thrust(1e9, 22_000.0, 4), 0.0);
    }
}
