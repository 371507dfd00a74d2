//! Catalog-order calibration.
//!
//! Base airframes are fitted directly against their published points;
//! derivative airframes (marked `derived_from` in the catalog) inherit
//! the donor's fit afterwards, so donors must be calibrated first.

use std::collections::HashMap;

use thiserror::Error;

use airperf_calibration::{
    calibrate_aircraft, calibrate_derived, CalibratedParameters, CalibrationError,
    CalibrationMethod,
};
use airperf_config::AircraftRegistry;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("{aircraft}: donor {donor} is not in the catalog or not calibrated")]
    UnknownDonor { aircraft: String, donor: String },
}

/// Default Oswald efficiency increment for derivatives that do not state
/// one in the catalog.
const DEFAULT_OSWALD_DELTA: f64 = 0.0;

/// Calibrate every aircraft in the catalog, donors before derivatives.
///
/// Results come back in catalog (designation) order.
pub fn calibrate_catalog(
    registry: &AircraftRegistry,
    method: CalibrationMethod,
) -> Result<Vec<CalibratedParameters>, PipelineError> {
    let mut results: Vec<Option<CalibratedParameters>> = Vec::new();
    let mut index_by_designation: HashMap<String, usize> = HashMap::new();

    // First pass: base airframes.
    for (i, entry) in registry.all().enumerate() {
        index_by_designation.insert(entry.spec.designation.clone(), i);
        if entry.derived_from.is_none() {
            results.push(Some(calibrate_aircraft(&entry.spec, method)?));
        } else {
            results.push(None);
        }
    }

    // Second pass: derivatives inherit from their donors.
    for (i, entry) in registry.all().enumerate() {
        let Some(donor_designation) = &entry.derived_from else {
            continue;
        };
        let donor = index_by_designation
            .get(donor_designation)
            .and_then(|&j| results[j].clone())
            .ok_or_else(|| PipelineError::UnknownDonor {
                aircraft: entry.spec.designation.clone(),
                donor: donor_designation.clone(),
            })?;
        let delta = entry.oswald_delta.unwrap_or(DEFAULT_OSWALD_DELTA);
        results[i] = Some(calibrate_derived(&donor, &entry.spec, delta));
    }

    Ok(results.into_iter().flatten().collect())
}
