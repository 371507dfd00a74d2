//! International Standard Atmosphere, sea level through the lower stratosphere.
//!
//! Two layers are modeled:
//! - Troposphere, 0 to 36,089 ft: linear temperature lapse.
//! - Lower stratosphere, 36,089 to 65,617 ft: isothermal at the tropopause
//!   temperature.
//!
//! Above 65,617 ft the isothermal formulas extrapolate unchanged, a
//! documented simplification, since nothing in the study flies there. Inputs
//! are never validated; negative altitudes extrapolate through the same
//! formulas.
//!
//! Reference: ICAO Doc 7488/3, US Standard Atmosphere 1976.

use airperf_core::constants::{A0_FPS, G_FPS2, GAMMA, P0_PSF, R_AIR, RHO0_SLUGFT3, T0_RANKINE};

/// Tropopause altitude, ft (= 11,000 m).
pub const H_TROPOPAUSE_FT: f64 = 36_089.24;
/// Top of the modeled lower stratosphere, ft (= 20,000 m).
pub const H_STRATO2_FT: f64 = 65_616.80;
/// Tropospheric temperature lapse rate, °R per ft (= -6.5 °C per km).
pub const LAPSE_RATE: f64 = -0.003566;

/// ISA temperature at altitude, °R.
pub fn temperature(h_ft: f64) -> f64 {
    if h_ft <= H_TROPOPAUSE_FT {
        T0_RANKINE + LAPSE_RATE * h_ft
    } else {
        // Isothermal at the tropopause value, including above H_STRATO2_FT.
        T0_RANKINE + LAPSE_RATE * H_TROPOPAUSE_FT
    }
}

/// ISA pressure at altitude, lbf/ft².
pub fn pressure(h_ft: f64) -> f64 {
    if h_ft <= H_TROPOPAUSE_FT {
        // Linear-lapse layer: P = P0 * (T/T0)^(-g/(L*R))
        let exponent = -G_FPS2 / (LAPSE_RATE * R_AIR);
        P0_PSF * (temperature(h_ft) / T0_RANKINE).powf(exponent)
    } else {
        // Isothermal layer referenced to tropopause conditions; evaluating
        // at exactly h = H_TROPOPAUSE_FT agrees with the branch above.
        let p_trop = pressure(H_TROPOPAUSE_FT);
        let t_trop = temperature(H_TROPOPAUSE_FT);
        p_trop * (-G_FPS2 * (h_ft - H_TROPOPAUSE_FT) / (R_AIR * t_trop)).exp()
    }
}

/// ISA density at altitude via the ideal gas law, slug/ft³.
pub fn density(h_ft: f64) -> f64 {
    pressure(h_ft) / (R_AIR * temperature(h_ft))
}

/// Speed of sound at altitude, ft/s: a = sqrt(γ R T).
pub fn speed_of_sound(h_ft: f64) -> f64 {
    (GAMMA * R_AIR * temperature(h_ft)).sqrt()
}

/// Density ratio σ relative to sea level.
pub fn density_ratio(h_ft: f64) -> f64 {
    density(h_ft) / RHO0_SLUGFT3
}

/// Pressure ratio δ relative to sea level.
pub fn pressure_ratio(h_ft: f64) -> f64 {
    pressure(h_ft) / P0_PSF
}

/// Temperature ratio θ relative to sea level.
pub fn temperature_ratio(h_ft: f64) -> f64 {
    temperature(h_ft) / T0_RANKINE
}

/// Dynamic pressure q = ½ ρ V², lbf/ft².
pub fn dynamic_pressure(h_ft: f64, velocity_fps: f64) -> f64 {
    0.5 * density(h_ft) * velocity_fps * velocity_fps
}

/// Sea level speed of sound re-exported for callers that only need the
/// reference value.
pub fn sea_level_speed_of_sound() -> f64 {
    A0_FPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_at_tropopause() {
        let below = pressure(H_TROPOPAUSE_FT - 1e-6);
        let above = pressure(H_TROPOPAUSE_FT + 1e-6);
        assert!((below - above).abs() / below < 1e-9);
        let t_below = temperature(H_TROPOPAUSE_FT - 1e-6);
        let t_above = temperature(H_TROPOPAUSE_FT + 1e-6);
        assert!((t_below - t_above).abs() < 1e-6);
    }

    #[test]
    fn ideal_gas_consistency() {
        for h in [0.0, 10_000.0, 36_089.24, 45_000.0, 60_000.0] {
            let p = pressure(h);
            let rho = density(h);
            let t = temperature(h);
            assert!((p - rho * R_AIR * t).abs() / p < 1e-12, "h = {h}");
        }
    }
}
