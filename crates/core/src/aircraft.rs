//! Aircraft specification value types.
//!
//! An [`AircraftSpec`] is an immutable record of the published figures the
//! rest of the workspace treats as ground truth. Construction validates the
//! weight bookkeeping so unit-confusion bugs surface here instead of deep
//! inside a cruise integration loop.

use thiserror::Error;

/// One corner of the published range-payload diagram: a (payload, fuel,
/// range) triple used as a calibration target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationPoint {
    pub payload_lb: f64,
    pub fuel_lb: f64,
    pub range_nm: f64,
}

/// Published aircraft data, normalized to lb / ft / kt / Mach.
///
/// Immutable after construction; every downstream computation borrows it.
#[derive(Debug, Clone)]
pub struct AircraftSpec {
    pub name: String,
    pub designation: String,

    // Weights, lb
    pub oew_lb: f64,
    pub mtow_lb: f64,
    pub mzfw_lb: f64,
    pub max_payload_lb: f64,
    pub max_fuel_lb: f64,

    // Geometry
    pub wing_area_ft2: f64,
    pub aspect_ratio: f64,

    // Propulsion
    pub n_engines: u32,
    pub thrust_per_engine_slst_lbf: f64,
    pub tsfc_cruise_ref: f64,

    // Performance
    pub cruise_mach: f64,
    pub service_ceiling_ft: f64,

    /// 2-3 published range-payload corner points, ordered by non-increasing
    /// payload and non-decreasing range.
    pub calibration_points: Vec<CalibrationPoint>,
}

/// Hard errors raised when a spec fails its construction invariants.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("{name}: OEW ({oew_lb} lb) must be positive and below MTOW ({mtow_lb} lb)")]
    WeightOrdering {
        name: String,
        oew_lb: f64,
        mtow_lb: f64,
    },
    #[error(
        "{name}: calibration point {index} exceeds MTOW: OEW + payload + fuel = {total_lb:.0} lb > {mtow_lb:.0} lb"
    )]
    PointExceedsMtow {
        name: String,
        index: usize,
        total_lb: f64,
        mtow_lb: f64,
    },
    #[error("{name}: need at least 2 calibration points, got {count}")]
    TooFewPoints { name: String, count: usize },
    #[error("{name}: wing area and aspect ratio must be positive")]
    InvalidGeometry { name: String },
}

/// Soft data-quality findings from [`AircraftSpec::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLevel {
    Error,
    Warning,
}

/// One validation finding with a human-readable message.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
        };
        write!(f, "{tag}: {}", self.message)
    }
}

impl AircraftSpec {
    /// Validate invariants and return the spec as an immutable value.
    ///
    /// Each calibration point must respect OEW + payload + fuel ≤ MTOW
    /// within a 1% tolerance for published-data rounding.
    pub fn new(spec: AircraftSpec) -> Result<AircraftSpec, SpecError> {
        if spec.oew_lb <= 0.0 || spec.oew_lb >= spec.mtow_lb {
            return Err(SpecError::WeightOrdering {
                name: spec.name.clone(),
                oew_lb: spec.oew_lb,
                mtow_lb: spec.mtow_lb,
            });
        }
        if spec.wing_area_ft2 <= 0.0 || spec.aspect_ratio <= 0.0 {
            return Err(SpecError::InvalidGeometry {
                name: spec.name.clone(),
            });
        }
        if spec.calibration_points.len() < 2 {
            return Err(SpecError::TooFewPoints {
                name: spec.name.clone(),
                count: spec.calibration_points.len(),
            });
        }
        for (index, point) in spec.calibration_points.iter().enumerate() {
            let total = spec.oew_lb + point.payload_lb + point.fuel_lb;
            if total > spec.mtow_lb * 1.01 {
                return Err(SpecError::PointExceedsMtow {
                    name: spec.name.clone(),
                    index,
                    total_lb: total,
                    mtow_lb: spec.mtow_lb,
                });
            }
        }
        Ok(spec)
    }

    /// Run soft consistency checks mirroring the data-quality review the
    /// published figures get before a study run. Returns findings rather
    /// than failing; callers decide what to do with warnings.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let warn = |issues: &mut Vec<ValidationIssue>, message: String| {
            issues.push(ValidationIssue {
                level: IssueLevel::Warning,
                message,
            });
        };

        if self.mzfw_lb > 0.0 {
            let expected_payload = self.mzfw_lb - self.oew_lb;
            if (expected_payload - self.max_payload_lb).abs() > 5000.0 {
                warn(
                    &mut issues,
                    format!(
                        "{}: max_payload ({:.0} lb) differs from MZFW-OEW ({:.0} lb)",
                        self.name, self.max_payload_lb, expected_payload
                    ),
                );
            }
        }

        for pair in self.calibration_points.windows(2) {
            if pair[0].range_nm >= pair[1].range_nm {
                warn(
                    &mut issues,
                    format!(
                        "{}: range-payload points not strictly increasing in range \
                         ({:.0} nm then {:.0} nm)",
                        self.name, pair[0].range_nm, pair[1].range_nm
                    ),
                );
            }
            if pair[0].payload_lb < pair[1].payload_lb {
                warn(
                    &mut issues,
                    format!(
                        "{}: range-payload points not non-increasing in payload",
                        self.name
                    ),
                );
            }
        }

        if self.aspect_ratio < 5.0 || self.aspect_ratio > 15.0 {
            warn(
                &mut issues,
                format!(
                    "{}: aspect ratio {:.2} outside typical range 5-15",
                    self.name, self.aspect_ratio
                ),
            );
        }
        if self.tsfc_cruise_ref < 0.4 || self.tsfc_cruise_ref > 0.8 {
            warn(
                &mut issues,
                format!(
                    "{}: cruise TSFC {:.3} outside typical range 0.4-0.8",
                    self.name, self.tsfc_cruise_ref
                ),
            );
        }

        issues
    }

    /// Fuel loadable with a given payload: limited by MTOW and tank capacity.
    pub fn fuel_available_lb(&self, payload_lb: f64) -> f64 {
        (self.mtow_lb - self.oew_lb - payload_lb).min(self.max_fuel_lb)
    }
}
