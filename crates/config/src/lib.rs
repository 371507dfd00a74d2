//! Aircraft catalog loading for the airperf workspace.
//!
//! Each aircraft is one TOML file in a catalog directory. Files are read
//! in sorted order so the registry is deterministic across platforms.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use airperf_core::aircraft::{AircraftSpec, CalibrationPoint, SpecError};

/// Raw aircraft record as it appears in a catalog TOML file.
#[derive(Debug, Deserialize, Clone)]
pub struct AircraftConfig {
    pub name: String,
    pub designation: String,
    pub oew_lb: f64,
    pub mtow_lb: f64,
    pub mzfw_lb: f64,
    pub max_payload_lb: f64,
    pub max_fuel_lb: f64,
    pub wing_area_ft2: f64,
    pub aspect_ratio: f64,
    pub n_engines: u32,
    pub thrust_per_engine_slst_lbf: f64,
    pub tsfc_cruise_ref: f64,
    pub cruise_mach: f64,
    pub service_ceiling_ft: f64,
    #[serde(default)]
    pub calibration_points: Vec<CalibrationPointConfig>,
    /// Designation of the airframe this one derives its calibration from.
    #[serde(default)]
    pub derived_from: Option<String>,
    /// Oswald efficiency increment applied during derivation.
    #[serde(default)]
    pub oswald_delta: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CalibrationPointConfig {
    pub payload_lb: f64,
    pub fuel_lb: f64,
    pub range_nm: f64,
}

/// Errors that can occur while loading the aircraft catalog.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Spec(#[from] SpecError),
    #[error("unknown aircraft designation: {0}")]
    UnknownAircraft(String),
}

/// A catalog entry: the validated spec plus derivation metadata that is
/// not part of the physical description.
#[derive(Debug, Clone)]
pub struct AircraftEntry {
    pub spec: AircraftSpec,
    pub derived_from: Option<String>,
    pub oswald_delta: Option<f64>,
}

impl AircraftConfig {
    /// Validate the raw record into a catalog entry.
    pub fn into_entry(self) -> Result<AircraftEntry, SpecError> {
        let spec = AircraftSpec::new(AircraftSpec {
            name: self.name,
            designation: self.designation,
            oew_lb: self.oew_lb,
            mtow_lb: self.mtow_lb,
            mzfw_lb: self.mzfw_lb,
            max_payload_lb: self.max_payload_lb,
            max_fuel_lb: self.max_fuel_lb,
            wing_area_ft2: self.wing_area_ft2,
            aspect_ratio: self.aspect_ratio,
            n_engines: self.n_engines,
            thrust_per_engine_slst_lbf: self.thrust_per_engine_slst_lbf,
            tsfc_cruise_ref: self.tsfc_cruise_ref,
            cruise_mach: self.cruise_mach,
            service_ceiling_ft: self.service_ceiling_ft,
            calibration_points: self
                .calibration_points
                .iter()
                .map(|p| CalibrationPoint {
                    payload_lb: p.payload_lb,
                    fuel_lb: p.fuel_lb,
                    range_nm: p.range_nm,
                })
                .collect(),
        })?;
        Ok(AircraftEntry {
            spec,
            derived_from: self.derived_from,
            oswald_delta: self.oswald_delta,
        })
    }
}

/// Load all aircraft records from a catalog directory, sorted by file name.
pub fn load_aircraft_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<AircraftEntry>, ConfigError> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    paths.sort();

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let contents = std::fs::read_to_string(&path)?;
        let record: AircraftConfig = toml::from_str(&contents)?;
        entries.push(record.into_entry()?);
    }
    Ok(entries)
}

/// The aircraft catalog, indexed by designation.
#[derive(Debug, Clone, Default)]
pub struct AircraftRegistry {
    by_designation: BTreeMap<String, AircraftEntry>,
}

impl AircraftRegistry {
    /// Load a registry from a catalog directory.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let mut by_designation = BTreeMap::new();
        for entry in load_aircraft_dir(dir)? {
            by_designation.insert(entry.spec.designation.clone(), entry);
        }
        Ok(Self { by_designation })
    }

    pub fn get(&self, designation: &str) -> Result<&AircraftEntry, ConfigError> {
        self.by_designation
            .get(designation)
            .ok_or_else(|| ConfigError::UnknownAircraft(designation.to_string()))
    }

    /// All entries in designation order.
    pub fn all(&self) -> impl Iterator<Item = &AircraftEntry> {
        self.by_designation.values()
    }

    pub fn len(&self) -> usize {
        self.by_designation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_designation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
name = "Test Twin"
designation = "TT-1"
oew_lb = 98495.0
mtow_lb = 187700.0
mzfw_lb = 146300.0
max_payload_lb = 47805.0
max_fuel_lb = 46063.0
wing_area_ft2 = 1344.0
aspect_ratio = 10.26
n_engines = 2
thrust_per_engine_slst_lbf = 26300.0
tsfc_cruise_ref = 0.627
cruise_mach = 0.785
service_ceiling_ft = 41000.0

[[calibration_points]]
payload_lb = 47805.0
fuel_lb = 41400.0
range_nm = 2505.0

[[calibration_points]]
payload_lb = 0.0
fuel_lb = 46063.0
range_nm = 3990.0
"#;

    #[test]
    fn parses_a_catalog_record() {
        let record: AircraftConfig = toml::from_str(SAMPLE).unwrap();
        let entry = record.into_entry().unwrap();
        assert_eq!(entry.spec.designation, "TT-1");
        assert_eq!(entry.spec.calibration_points.len(), 2);
        assert!(entry.derived_from.is_none());
    }

    #[test]
    fn registry_loads_a_directory_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("tt1.toml")).unwrap();
        f.write_all(SAMPLE.as_bytes()).unwrap();

        let registry = AircraftRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("TT-1").is_ok());
        assert!(matches!(
            registry.get("XX-9"),
            Err(ConfigError::UnknownAircraft(_))
        ));
    }

    #[test]
    fn rejects_inconsistent_weights() {
        let bad = SAMPLE.replace("mtow_lb = 187700.0", "mtow_lb = 90000.0");
        let record: AircraftConfig = toml::from_str(&bad).unwrap();
        assert!(record.into_entry().is_err());
    }
}
