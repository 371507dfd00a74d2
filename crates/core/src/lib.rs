//! Core units, constants, and shared value types for the airperf workspace.
//!
//! Everything downstream works in a single unit system: pounds, feet, knots,
//! Mach, and lb/(lbf·hr) for TSFC. Source data in other units must be
//! converted before it reaches these types.

pub mod aircraft;

/// Physical constants in US customary aeronautical units.
pub mod constants {
    /// Sea level ISA temperature, °R (= 288.15 K).
    pub const T0_RANKINE: f64 = 518.67;
    /// Sea level ISA pressure, lbf/ft² (= 101,325 Pa).
    pub const P0_PSF: f64 = 2116.22;
    /// Sea level ISA density, slug/ft³ (= 1.225 kg/m³).
    pub const RHO0_SLUGFT3: f64 = 0.002377;
    /// Sea level speed of sound, ft/s (= 340.3 m/s).
    pub const A0_FPS: f64 = 1116.45;
    /// Standard gravitational acceleration, ft/s².
    pub const G_FPS2: f64 = 32.174;
    /// Specific gas constant for dry air, ft·lbf/(slug·°R).
    pub const R_AIR: f64 = 1716.49;
    /// Ratio of specific heats for air.
    pub const GAMMA: f64 = 1.4;
}

/// Unit conversion helpers.
pub mod units {
    /// Feet per nautical mile.
    pub const NM_TO_FT: f64 = 6076.12;
    /// Seconds per hour.
    pub const HR_TO_SEC: f64 = 3600.0;
    /// Jet-A density, lb per US gallon.
    pub const GAL_TO_LB_JETA: f64 = 6.7;

    /// Convert nautical miles to feet.
    #[inline]
    pub fn nm_to_ft(nm: f64) -> f64 {
        nm * NM_TO_FT
    }

    /// Convert feet to nautical miles.
    #[inline]
    pub fn ft_to_nm(ft: f64) -> f64 {
        ft / NM_TO_FT
    }

    /// Convert knots to feet per second.
    #[inline]
    pub fn kt_to_fps(kt: f64) -> f64 {
        kt * NM_TO_FT / HR_TO_SEC
    }

    /// Convert feet per second to knots.
    #[inline]
    pub fn fps_to_kt(fps: f64) -> f64 {
        fps * HR_TO_SEC / NM_TO_FT
    }

    /// Convert hours to seconds.
    #[inline]
    pub fn hr_to_sec(hr: f64) -> f64 {
        hr * HR_TO_SEC
    }

    /// Convert seconds to hours.
    #[inline]
    pub fn sec_to_hr(sec: f64) -> f64 {
        sec / HR_TO_SEC
    }

    /// Convert fuel weight in pounds to US gallons of Jet-A.
    #[inline]
    pub fn fuel_lb_to_gallons(fuel_lb: f64) -> f64 {
        fuel_lb / GAL_TO_LB_JETA
    }

    /// Convert US gallons of Jet-A to pounds.
    #[inline]
    pub fn fuel_gallons_to_lb(gallons: f64) -> f64 {
        gallons * GAL_TO_LB_JETA
    }
}

/// Fuel pricing helpers used to annotate mission results.
pub mod fuel {
    use super::units::fuel_lb_to_gallons;

    /// Mid-range Jet-A price estimate, USD per US gallon.
    pub const DEFAULT_PRICE_PER_GALLON: f64 = 5.50;

    /// Cost of a fuel load in USD at a given per-gallon price.
    #[inline]
    pub fn fuel_cost(fuel_lb: f64, price_per_gallon: f64) -> f64 {
        fuel_lb_to_gallons(fuel_lb) * price_per_gallon
    }
}
