//! End-to-end tests for direction-finding geometry
//!
//! These tests drive the public API the way a geolocation estimator would: a scenario is loaded
//! from disk, the rotation chain is assembled, angles are extracted and the measurement matrix is
//! used to predict how the angles respond to a small change in the candidate target position.
//!
//! ## Test Structure
//!
//! 1. The rotation chain assembled step by step from the generic frame operations matches the
//!    one the line-of-sight engine builds internally, whatever matrix representation is used.
//! 2. A scenario written in degrees loads into the same geometry as the equivalent one in radians.
//! 3. The measurement matrix is a usable linearization: `H * delta` predicts the change in the
//!    azimuth and angle-of-arrival for a small target displacement.
use assert_approx_eq::assert_approx_eq;
use nalgebra::{DMatrix, Matrix3, Vector3};

use dfgeo::earth::geodetic_to_ecef;
use dfgeo::frames::{
    antenna_from_ecef, antenna_from_ecef_chain, body_from_antenna, compose, ecef_from_antenna,
    ecef_from_body, ecef_from_ned, ned_from_body,
};
use dfgeo::linearize::{
    aoa_measurement, azimuth_measurement, elevation_measurement, measurement_matrix,
};
use dfgeo::measurements::{Angles, DirectionFindingGeometry, line_of_sight, relative_position};
use dfgeo::scenario::ScenarioConfig;
use dfgeo::{AntennaMounting, BodyAttitude, EcefPosition, GeoError, GeodeticPosition};

struct Platform {
    origin: EcefPosition,
    position: GeodeticPosition,
    attitude: BodyAttitude,
    mounting: AntennaMounting,
}

fn platform() -> Platform {
    let position = GeodeticPosition::new(0.3, -0.001, 5000.0);
    Platform {
        origin: geodetic_to_ecef(&position),
        position,
        attitude: BodyAttitude::new(1.15, 0.02, -0.01),
        mounting: AntennaMounting::new(0.05, -0.1, 0.0),
    }
}

fn to_rows(matrix: &Matrix3<f64>) -> Vec<Vec<f64>> {
    (0..3)
        .map(|i| (0..3).map(|j| matrix[(i, j)]).collect())
        .collect()
}

fn angles_at(p: &Platform, target: &GeodeticPosition) -> Angles {
    let relative = relative_position(&p.origin, target);
    Angles::from_los(&line_of_sight(&p.position, &p.attitude, &p.mounting, &relative))
}

#[test]
fn test_rotation_chain_from_mixed_representations() {
    let p = platform();
    let en = ecef_from_ned(p.position.longitude, p.position.latitude);
    let nb = ned_from_body(p.attitude.yaw, p.attitude.pitch, p.attitude.roll);
    let ba = body_from_antenna(p.mounting.alpha, p.mounting.beta, p.mounting.gamma);

    // nested rows and a dynamic matrix go through the same checks as a fixed 3x3
    let eb = ecef_from_body(&to_rows(&en), &DMatrix::from_column_slice(3, 3, nb.as_slice()))
        .unwrap();
    let ea = ecef_from_antenna(&eb, &ba).unwrap();
    let ae = antenna_from_ecef(&ea).unwrap();

    let chain = antenna_from_ecef_chain(&p.position, &p.attitude, &p.mounting);
    assert!((ae - chain).amax() < 1e-12);

    let target = GeodeticPosition::new(0.305, 0.001, 0.0);
    let geometry =
        DirectionFindingGeometry::new(&p.origin, &p.position, &p.attitude, &p.mounting, &target);
    assert!((geometry.antenna_from_ecef - chain).amax() < 1e-12);

    let relative: Vector3<f64> = geometry.relative.into();
    let los: Vector3<f64> = geometry.los.into();
    assert_approx_eq!((ae * relative / geometry.range - los).norm(), 0.0, 1e-12);
}

#[test]
fn test_rotation_chain_rejects_ragged_operand() {
    let p = platform();
    let en = ecef_from_ned(p.position.longitude, p.position.latitude);
    let mut rows = to_rows(&en);
    rows[1].pop();
    let nb = ned_from_body(p.attitude.yaw, p.attitude.pitch, p.attitude.roll);
    assert!(matches!(
        compose(&rows, &nb),
        Err(GeoError::InvalidArgument(_))
    ));
}

#[test]
fn test_scenario_in_degrees_matches_radians() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.toml");
    std::fs::write(
        &path,
        r#"
angles_in_degrees = true

[origin_position]
longitude = -76.9
latitude = 39.2
altitude = 6000.0

[origin_attitude]
yaw = 45.0
pitch = 2.0
roll = -1.0

[origin_mounting]
alpha = 0.0
beta = -10.0
gamma = 0.0

[[targets]]
longitude = -76.7
latitude = 39.35
altitude = 0.0

[[targets]]
longitude = -76.6
latitude = 39.3
altitude = 150.0
"#,
    )
    .unwrap();

    let scenario = ScenarioConfig::from_file(&path).unwrap();
    let geometries = scenario.geometries().unwrap();
    assert_eq!(geometries.len(), 2);

    let position = GeodeticPosition::from_degrees(-76.9, 39.2, 6000.0);
    let attitude = BodyAttitude::new(45f64.to_radians(), 2f64.to_radians(), (-1f64).to_radians());
    let mounting = AntennaMounting::new(0.0, (-10f64).to_radians(), 0.0);
    let origin = geodetic_to_ecef(&position);
    let target = GeodeticPosition::from_degrees(-76.6, 39.3, 150.0);
    let expected = DirectionFindingGeometry::new(&origin, &position, &attitude, &mounting, &target);

    let actual = &geometries[1];
    assert_approx_eq!(actual.range, expected.range, 1e-6);
    assert_approx_eq!(actual.los.alpha, expected.los.alpha, 1e-12);
    assert_approx_eq!(actual.los.beta, expected.los.beta, 1e-12);
    assert_approx_eq!(actual.los.gamma, expected.los.gamma, 1e-12);
    // north-east of a north-east heading platform: in front of the array
    assert!(actual.los.alpha > 0.0);
}

#[test]
fn test_measurement_matrix_predicts_angle_changes() {
    let p = platform();
    let target = GeodeticPosition::new(0.305, 0.001, 0.0);
    let h = measurement_matrix(&p.origin, &p.position, &p.attitude, &p.mounting, &target);

    let delta = Vector3::new(2e-8, -1e-8, 0.0);
    let moved = GeodeticPosition::new(
        target.longitude + delta[0],
        target.latitude + delta[1],
        target.altitude,
    );
    let before = angles_at(&p, &target);
    let after = angles_at(&p, &moved);
    let predicted = h * delta;

    let actual_azimuth = after.azimuth - before.azimuth;
    assert!(actual_azimuth.abs() > 1e-7);
    assert!((predicted[0] - actual_azimuth).abs() < 1e-2 * actual_azimuth.abs());

    let actual_aoa = after.aoa - before.aoa;
    assert!(actual_aoa.abs() > 1e-9);
    assert!((predicted[2] - actual_aoa).abs() < 1e-2 * actual_aoa.abs());
}

#[test]
fn test_measurement_matrix_rows_match_single_angle_routines() {
    let p = platform();
    let target = GeodeticPosition::new(0.304, 0.002, 100.0);
    let h = measurement_matrix(&p.origin, &p.position, &p.attitude, &p.mounting, &target);
    let az = azimuth_measurement(&p.origin, &p.position, &p.attitude, &p.mounting, &target);
    let el = elevation_measurement(&p.origin, &p.position, &p.attitude, &p.mounting, &target);
    let aoa = aoa_measurement(&p.origin, &p.position, &p.attitude, &p.mounting, &target);
    assert_eq!(h.row(0), az);
    assert_eq!(h.row(1), el);
    assert_eq!(h.row(2), aoa);
    assert_eq!(h.column(2).norm(), 0.0);
}
