//! Scenario configuration for direction-finding geometry runs.
//!
//! A scenario describes one sensing platform (position, attitude, antenna mounting) and a list of
//! candidate targets. Scenarios can be written to and read from JSON, YAML or TOML; the format is
//! chosen by file extension.
//!
//! Every record is optional in the file so that partially specified scenarios still parse. The
//! required records are enforced when geometry is built, through [`GeometryBuilder`], which
//! reports the first absent one as [`GeoError::MissingValue`].
//!
//! Example TOML scenario:
//!
//! ```toml
//! angles_in_degrees = true
//!
//! [origin_position]
//! longitude = -76.9
//! latitude = 39.2
//! altitude = 6000.0
//!
//! [origin_attitude]
//! yaw = 45.0
//! pitch = 0.0
//! roll = 0.0
//!
//! [origin_mounting]
//! alpha = 0.0
//! beta = -10.0
//! gamma = 0.0
//!
//! [[targets]]
//! longitude = -76.7
//! latitude = 39.35
//! altitude = 0.0
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::earth::geodetic_to_ecef;
use crate::error::{GeoError, Result};
use crate::measurements::DirectionFindingGeometry;
use crate::{AntennaMounting, BodyAttitude, EcefPosition, GeodeticPosition};

/// Builder for a [`DirectionFindingGeometry`] that enforces all required records.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometryBuilder {
    origin: Option<EcefPosition>,
    position: Option<GeodeticPosition>,
    attitude: Option<BodyAttitude>,
    mounting: Option<AntennaMounting>,
    target: Option<GeodeticPosition>,
}
impl GeometryBuilder {
    pub fn new() -> Self {
        GeometryBuilder::default()
    }
    /// Platform ECEF position
    pub fn origin(mut self, origin: EcefPosition) -> Self {
        self.origin = Some(origin);
        self
    }
    /// Platform geodetic position
    pub fn position(mut self, position: GeodeticPosition) -> Self {
        self.position = Some(position);
        self
    }
    pub fn attitude(mut self, attitude: BodyAttitude) -> Self {
        self.attitude = Some(attitude);
        self
    }
    pub fn mounting(mut self, mounting: AntennaMounting) -> Self {
        self.mounting = Some(mounting);
        self
    }
    pub fn target(mut self, target: GeodeticPosition) -> Self {
        self.target = Some(target);
        self
    }
    /// Build the geometry.
    ///
    /// # Errors
    /// [`GeoError::MissingValue`] naming the first record that was not supplied.
    pub fn build(&self) -> Result<DirectionFindingGeometry> {
        let origin = self.origin.ok_or(GeoError::MissingValue("origin_ecef"))?;
        let position = self
            .position
            .ok_or(GeoError::MissingValue("origin_position"))?;
        let attitude = self
            .attitude
            .ok_or(GeoError::MissingValue("origin_attitude"))?;
        let mounting = self
            .mounting
            .ok_or(GeoError::MissingValue("origin_mounting"))?;
        let target = self.target.ok_or(GeoError::MissingValue("target"))?;
        Ok(DirectionFindingGeometry::new(
            &origin, &position, &attitude, &mounting, &target,
        ))
    }
}

/// A platform and its candidate targets, as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// When true every angle in the file (longitude, latitude, attitude and mounting) is in
    /// degrees and is converted to radians by [`ScenarioConfig::to_radians`].
    #[serde(default)]
    pub angles_in_degrees: bool,
    /// Platform ECEF position. Derived from `origin_position` with the crate's Earth model when
    /// omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_ecef: Option<EcefPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_position: Option<GeodeticPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_attitude: Option<BodyAttitude>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_mounting: Option<AntennaMounting>,
    #[serde(default)]
    pub targets: Vec<GeodeticPosition>,
}

impl ScenarioConfig {
    /// A small airborne scenario with three ground targets, in degrees.
    pub fn example() -> Self {
        ScenarioConfig {
            angles_in_degrees: true,
            origin_ecef: None,
            origin_position: Some(GeodeticPosition::new(-76.9, 39.2, 6000.0)),
            origin_attitude: Some(BodyAttitude::new(45.0, 0.0, 0.0)),
            origin_mounting: Some(AntennaMounting::new(0.0, -10.0, 0.0)),
            targets: vec![
                GeodeticPosition::new(-76.7, 39.35, 0.0),
                GeodeticPosition::new(-76.6, 39.3, 150.0),
                GeodeticPosition::new(-76.75, 39.45, 0.0),
            ],
        }
    }
    /// Return a copy with every angle expressed in radians.
    pub fn to_radians(&self) -> Self {
        if !self.angles_in_degrees {
            return self.clone();
        }
        let position = |p: GeodeticPosition| {
            GeodeticPosition::new(p.longitude.to_radians(), p.latitude.to_radians(), p.altitude)
        };
        ScenarioConfig {
            angles_in_degrees: false,
            origin_ecef: self.origin_ecef,
            origin_position: self.origin_position.map(position),
            origin_attitude: self.origin_attitude.map(|a| {
                BodyAttitude::new(a.yaw.to_radians(), a.pitch.to_radians(), a.roll.to_radians())
            }),
            origin_mounting: self.origin_mounting.map(|m| {
                AntennaMounting::new(
                    m.alpha.to_radians(),
                    m.beta.to_radians(),
                    m.gamma.to_radians(),
                )
            }),
            targets: self.targets.iter().copied().map(position).collect(),
        }
    }
    /// Builder pre-populated with the platform records of this scenario (in radians).
    pub fn builder(&self) -> GeometryBuilder {
        let scenario = self.to_radians();
        let mut builder = GeometryBuilder::new();
        if let Some(position) = scenario.origin_position {
            builder = builder.position(position);
        }
        if let Some(origin) = scenario
            .origin_ecef
            .or_else(|| scenario.origin_position.map(|p| geodetic_to_ecef(&p)))
        {
            builder = builder.origin(origin);
        }
        if let Some(attitude) = scenario.origin_attitude {
            builder = builder.attitude(attitude);
        }
        if let Some(mounting) = scenario.origin_mounting {
            builder = builder.mounting(mounting);
        }
        builder
    }
    /// Build the geometry for every target in the scenario.
    ///
    /// # Errors
    /// [`GeoError::MissingValue`] if a platform record is absent or there are no targets.
    pub fn geometries(&self) -> Result<Vec<DirectionFindingGeometry>> {
        if self.targets.is_empty() {
            return Err(GeoError::MissingValue("targets"));
        }
        let builder = self.builder();
        let geometries = self
            .to_radians()
            .targets
            .into_iter()
            .map(|target| builder.target(target).build())
            .collect::<Result<Vec<_>>>()?;
        debug!("built {} direction-finding geometries", geometries.len());
        Ok(geometries)
    }
    /// Write the scenario to a JSON file (pretty-printed).
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(|e| GeoError::Parse(e.to_string()))
    }
    /// Read the scenario from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(|e| GeoError::Parse(e.to_string()))
    }
    /// Write the scenario as YAML.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let s = serde_yaml::to_string(self).map_err(|e| GeoError::Parse(e.to_string()))?;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
    /// Read the scenario from YAML.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        serde_yaml::from_reader(file).map_err(|e| GeoError::Parse(e.to_string()))
    }
    /// Write the scenario as TOML.
    pub fn to_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        let s = toml::to_string(self).map_err(|e| GeoError::Parse(e.to_string()))?;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
    /// Read the scenario from TOML.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut s = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut s)?;
        toml::from_str(&s).map_err(|e| GeoError::Parse(e.to_string()))
    }
    /// Generic write: choose format by file extension (.json/.yaml/.yml/.toml)
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let p = path.as_ref();
        match extension(p).as_deref() {
            Some("json") => self.to_json(p),
            Some("yaml") | Some("yml") => self.to_yaml(p),
            Some("toml") => self.to_toml(p),
            _ => Err(unsupported(p)),
        }
    }
    /// Generic read: choose format by file extension (.json/.yaml/.yml/.toml)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let scenario = match extension(p).as_deref() {
            Some("json") => Self::from_json(p),
            Some("yaml") | Some("yml") => Self::from_yaml(p),
            Some("toml") => Self::from_toml(p),
            _ => Err(unsupported(p)),
        }?;
        debug!(
            "loaded scenario from {} with {} targets",
            p.display(),
            scenario.targets.len()
        );
        Ok(scenario)
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
fn unsupported(path: &Path) -> GeoError {
    GeoError::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unsupported file extension: {}", path.display()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use tempfile::tempdir;

    fn radians_scenario() -> ScenarioConfig {
        ScenarioConfig {
            angles_in_degrees: false,
            origin_ecef: None,
            origin_position: Some(GeodeticPosition::new(0.3, -0.001, 5000.0)),
            origin_attitude: Some(BodyAttitude::new(1.15, 0.0, 0.0)),
            origin_mounting: Some(AntennaMounting::default()),
            targets: vec![GeodeticPosition::new(0.305, 0.001, 0.0)],
        }
    }

    #[test]
    fn file_round_trips() {
        let dir = tempdir().unwrap();
        let scenario = ScenarioConfig::example();
        for name in ["scenario.json", "scenario.yaml", "scenario.yml", "scenario.toml"] {
            let path = dir.path().join(name);
            scenario.to_file(&path).unwrap();
            let read = ScenarioConfig::from_file(&path).unwrap();
            assert_eq!(read, scenario, "round trip through {}", name);
        }
    }
    #[test]
    fn unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.txt");
        assert!(matches!(
            ScenarioConfig::example().to_file(&path),
            Err(GeoError::Io(_))
        ));
        assert!(matches!(
            ScenarioConfig::from_file(&path),
            Err(GeoError::Io(_))
        ));
    }
    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"targets\": 3 }").unwrap();
        assert!(matches!(
            ScenarioConfig::from_file(&path),
            Err(GeoError::Parse(_))
        ));
    }
    #[test]
    fn degrees_are_converted() {
        let scenario = ScenarioConfig::example().to_radians();
        assert!(!scenario.angles_in_degrees);
        let position = scenario.origin_position.unwrap();
        assert_approx_eq!(position.longitude, (-76.9_f64).to_radians());
        assert_approx_eq!(position.latitude, 39.2_f64.to_radians());
        assert_eq!(position.altitude, 6000.0);
        assert_approx_eq!(scenario.origin_attitude.unwrap().yaw, 45.0_f64.to_radians());
        assert_approx_eq!(scenario.origin_mounting.unwrap().beta, (-10.0_f64).to_radians());
        assert_approx_eq!(scenario.targets[1].latitude, 39.3_f64.to_radians());
        // already in radians: unchanged
        assert_eq!(radians_scenario().to_radians(), radians_scenario());
    }
    #[test]
    fn origin_ecef_is_derived_when_omitted() {
        let scenario = radians_scenario();
        let geometry = &scenario.geometries().unwrap()[0];
        let origin = geodetic_to_ecef(&scenario.origin_position.unwrap());
        let expected = crate::measurements::relative_position(&origin, &scenario.targets[0]);
        assert_eq!(geometry.relative, expected);
    }
    #[test]
    fn explicit_origin_ecef_is_used() {
        let mut scenario = radians_scenario();
        let origin = EcefPosition::new(1.0, 2.0, 3.0);
        scenario.origin_ecef = Some(origin);
        let geometry = &scenario.geometries().unwrap()[0];
        let expected = crate::measurements::relative_position(&origin, &scenario.targets[0]);
        assert_eq!(geometry.relative, expected);
    }
    #[test]
    fn missing_records_are_reported() {
        let mut scenario = radians_scenario();
        scenario.origin_attitude = None;
        assert!(matches!(
            scenario.geometries(),
            Err(GeoError::MissingValue("origin_attitude"))
        ));

        let mut scenario = radians_scenario();
        scenario.origin_position = None;
        assert!(matches!(
            scenario.geometries(),
            Err(GeoError::MissingValue("origin_ecef"))
        ));

        let mut scenario = radians_scenario();
        scenario.targets.clear();
        assert!(matches!(
            scenario.geometries(),
            Err(GeoError::MissingValue("targets"))
        ));
    }
    #[test]
    fn builder_requires_target() {
        let builder = radians_scenario().builder();
        assert!(matches!(
            builder.build(),
            Err(GeoError::MissingValue("target"))
        ));
        let geometry = builder
            .target(GeodeticPosition::new(0.305, 0.001, 0.0))
            .build()
            .unwrap();
        let los: nalgebra::Vector3<f64> = geometry.los.into();
        assert_approx_eq!(los.norm(), 1.0, 1e-12);
    }
    #[test]
    fn missing_mounting_only() {
        let result = GeometryBuilder::new()
            .origin(EcefPosition::default())
            .position(GeodeticPosition::default())
            .attitude(BodyAttitude::default())
            .target(GeodeticPosition::new(0.0, 0.0, 100.0))
            .build();
        assert!(matches!(
            result,
            Err(GeoError::MissingValue("origin_mounting"))
        ));
    }
}
