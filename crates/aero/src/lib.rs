//! Parabolic drag polar: CD = CD0 + CL² / (π · AR · e).
//!
//! CD0 and the Oswald factor e are calibration parameters, not published
//! values: the fit absorbs compressibility, trim drag, and everything else
//! the polar cannot represent into effective cruise values.

use std::f64::consts::PI;

use thiserror::Error;

/// Non-physical inputs. These indicate a programming or configuration
/// defect and propagate uncaught.
#[derive(Debug, Error)]
pub enum AeroError {
    #[error("dynamic pressure and wing area must be positive (q = {q_psf}, S = {wing_area_ft2})")]
    NonPositiveLiftInputs { q_psf: f64, wing_area_ft2: f64 },
    #[error("drag coefficient must be positive (CD = {cd})")]
    NonPositiveDrag { cd: f64 },
    #[error("lift coefficient must be positive (CL = {cl})")]
    NonPositiveLift { cl: f64 },
}

/// Lift coefficient in steady level flight (L = W): CL = W / (q S).
pub fn lift_coefficient(weight_lb: f64, q_psf: f64, wing_area_ft2: f64) -> Result<f64, AeroError> {
    if q_psf <= 0.0 || wing_area_ft2 <= 0.0 {
        return Err(AeroError::NonPositiveLiftInputs {
            q_psf,
            wing_area_ft2,
        });
    }
    Ok(weight_lb / (q_psf * wing_area_ft2))
}

/// Induced drag factor K = 1 / (π · AR · e).
pub fn induced_drag_factor(aspect_ratio: f64, e: f64) -> f64 {
    1.0 / (PI * aspect_ratio * e)
}

/// Drag coefficient from the parabolic polar.
pub fn drag_coefficient(cl: f64, cd0: f64, aspect_ratio: f64, e: f64) -> f64 {
    cd0 + induced_drag_factor(aspect_ratio, e) * cl * cl
}

/// Total drag in level flight: D = CD · q · S.
pub fn drag_force(
    weight_lb: f64,
    q_psf: f64,
    wing_area_ft2: f64,
    cd0: f64,
    aspect_ratio: f64,
    e: f64,
) -> Result<f64, AeroError> {
    let cl = lift_coefficient(weight_lb, q_psf, wing_area_ft2)?;
    let cd = drag_coefficient(cl, cd0, aspect_ratio, e);
    Ok(cd * q_psf * wing_area_ft2)
}

/// L/D at a given CL. Unreachable with positive CD0, but guarded anyway.
pub fn lift_to_drag_ratio(cl: f64, cd0: f64, aspect_ratio: f64, e: f64) -> Result<f64, AeroError> {
    let cd = drag_coefficient(cl, cd0, aspect_ratio, e);
    if cd <= 0.0 {
        return Err(AeroError::NonPositiveDrag { cd });
    }
    Ok(cl / cd)
}

/// Maximum L/D and the CL at which it occurs.
///
/// For a parabolic polar, (L/D)max occurs at CL* = sqrt(CD0/K), giving
/// (L/D)max = 1 / (2 sqrt(CD0 K)).
pub fn max_lift_to_drag(cd0: f64, aspect_ratio: f64, e: f64) -> (f64, f64) {
    let k = induced_drag_factor(aspect_ratio, e);
    let cl_star = (cd0 / k).sqrt();
    let l_d_max = 1.0 / (2.0 * (cd0 * k).sqrt());
    (l_d_max, cl_star)
}

/// CL for maximum specific range, jet aircraft.
///
/// This is NOT the max-L/D CL. For the Breguet equation
/// R = (V/c)·(L/D)·ln(Wi/Wf), V itself depends on CL through
/// V = sqrt(2W/(ρ S CL)), so the quantity maximized is
/// V·L/D ∝ CL^0.5 / CD, whose optimum is CL = sqrt(CD0 / (3K)).
pub fn cl_for_max_range(cd0: f64, aspect_ratio: f64, e: f64) -> f64 {
    let k = induced_drag_factor(aspect_ratio, e);
    (cd0 / (3.0 * k)).sqrt()
}

/// True airspeed for a given CL in level flight, ft/s.
pub fn speed_for_cl(
    cl: f64,
    weight_lb: f64,
    density_slugft3: f64,
    wing_area_ft2: f64,
) -> Result<f64, AeroError> {
    if cl <= 0.0 {
        return Err(AeroError::NonPositiveLift { cl });
    }
    Ok((2.0 * weight_lb / (density_slugft3 * wing_area_ft2 * cl)).sqrt())
}

/// Drag multiplier after a single engine failure.
///
/// Rudder deflection, sideslip, and the windmilling engine are lumped into
/// a uniform +10% increment. Twins arguably deserve slightly more, but the
/// increment is held uniform across airframes as a documented assumption.
pub fn engine_out_drag_factor(_n_engines: u32) -> f64 {
    1.10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_ld_is_a_local_maximum() {
        let (l_d_max, cl_star) = max_lift_to_drag(0.022, 8.0, 0.80);
        for delta in [-0.1, -0.01, 0.01, 0.1] {
            let l_d = lift_to_drag_ratio(cl_star + delta, 0.022, 8.0, 0.80).unwrap();
            assert!(l_d < l_d_max, "perturbed L/D {l_d} >= {l_d_max}");
        }
    }

    #[test]
    fn max_range_cl_below_max_ld_cl() {
        let (_, cl_star) = max_lift_to_drag(0.022, 8.0, 0.80);
        let cl_range = cl_for_max_range(0.022, 8.0, 0.80);
        assert!(cl_range < cl_star);
        // Exactly 1/sqrt(3) of the max-L/D CL.
        assert!((cl_range - cl_star / 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_physical_inputs() {
        assert!(lift_coefficient(100_000.0, 0.0, 2868.0).is_err());
        assert!(lift_coefficient(100_000.0, 200.0, -1.0).is_err());
        assert!(speed_for_cl(0.0, 100_000.0, 0.001, 2868.0).is_err());
    }
}
