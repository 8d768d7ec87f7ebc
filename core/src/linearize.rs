//! Measurement Jacobians for direction-finding angles
//!
//! This module provides the analytic sensitivity of each direction-finding angle to the target's
//! geodetic position. These rows form the measurement matrix H of an extended Kalman filter that
//! estimates the target position from a sequence of angle measurements.
//!
//! # Structure
//!
//! Every angle type shares the same five-factor chain rule:
//!
//! ```text
//! H = ∂θ/∂u · ∂u/∂r_a · C_e^a · I · ∂r_e/∂[lon, lat, alt]
//! ```
//!
//! where:
//! - `∂θ/∂u` is the 1×3 partial of the angle with respect to the unit line of sight `u`
//! - `∂u/∂r_a = (I − u uᵀ) / r` normalizes the antenna-frame relative position of length `r`
//! - `C_e^a` rotates the relative ECEF position into the antenna-array frame
//! - `I` is the frame-selection factor (the target state is always expressed in ECEF here)
//! - `∂r_e/∂[lon, lat, alt]` is [`earth::geodetic_jacobian`] at the target position
//!
//! The result is a 1×3 row per angle with columns (longitude, latitude, altitude). Altitude is
//! held constant, so the last column is always zero. [`measurement_matrix`] stacks the azimuth,
//! elevation and angle-of-arrival rows into the 3×3 matrix for a combined angle measurement.
//!
//! # Usage Example
//!
//! ```rust
//! use dfgeo::linearize::{azimuth_measurement, measurement_matrix};
//! use dfgeo::{earth, AntennaMounting, BodyAttitude, GeodeticPosition};
//!
//! let position = GeodeticPosition::new(0.3, 0.5, 5000.0);
//! let origin = earth::geodetic_to_ecef(&position);
//! let attitude = BodyAttitude::new(1.1, 0.0, 0.0);
//! let mounting = AntennaMounting::default();
//! let target = GeodeticPosition::new(0.305, 0.502, 0.0);
//!
//! let h_azimuth = azimuth_measurement(&origin, &position, &attitude, &mounting, &target);
//! let h = measurement_matrix(&origin, &position, &attitude, &mounting, &target);
//! assert_eq!(h.row(0), h_azimuth);
//! ```
//!
//! # References
//!
//! Grabbe, "Geo-Location Using Direction Finding Angles", Johns Hopkins APL Technical Digest 31(3).

use nalgebra::{Matrix3, RowVector3, Vector3};

use crate::earth;
use crate::measurements::{AngleMeasurement, Angles, DirectionFindingGeometry};
use crate::{AntennaMounting, BodyAttitude, EcefPosition, GeodeticPosition, LineOfSight};

/// Partial derivative of an angle with respect to the unit line-of-sight components
///
/// - azimuth: $[-\sin az, \cos az, 0] / \cos el$
/// - elevation: $[-\cos az \sin el, -\cos az \sin el, -\cos el]$
/// - angle-of-arrival: $[-\sin^2 aoa, \sin az \cos el \cos aoa, -\sin el \cos aoa] / \sin aoa$
///
/// The azimuth row is singular at $el = \pm\pi/2$ and the angle-of-arrival row on boresight
/// ($aoa = 0$).
///
/// # Arguments
///
/// * `measurement` - Which angle to differentiate
/// * `angles` - The angles of the current line of sight
///
/// # Returns
///
/// 1×3 row $\partial\theta/\partial u$
pub fn angle_partial(measurement: AngleMeasurement, angles: &Angles) -> RowVector3<f64> {
    let (sin_az, cos_az) = angles.azimuth.sin_cos();
    let (sin_el, cos_el) = angles.elevation.sin_cos();
    match measurement {
        AngleMeasurement::Azimuth => RowVector3::new(-sin_az, cos_az, 0.0) / cos_el,
        // The first two terms are identical in the reference formulation; kept as published.
        AngleMeasurement::Elevation => {
            RowVector3::new(-cos_az * sin_el, -cos_az * sin_el, -cos_el)
        }
        AngleMeasurement::AngleOfArrival => {
            let (sin_aoa, cos_aoa) = angles.aoa.sin_cos();
            RowVector3::new(
                -sin_aoa.powi(2),
                sin_az * cos_el * cos_aoa,
                -sin_el * cos_aoa,
            ) / sin_aoa
        }
    }
}
/// Partial derivative of the unit line of sight with respect to the antenna-frame relative position
///
/// $$
/// \frac{\partial u}{\partial r_a} = \frac{I - u u^T}{r}
/// $$
///
/// # Arguments
///
/// * `los` - Unit line of sight
/// * `range` - Magnitude of the antenna-frame relative position in meters
pub fn los_partial(los: &LineOfSight, range: f64) -> Matrix3<f64> {
    let u: Vector3<f64> = (*los).into();
    (Matrix3::identity() - u * u.transpose()) / range
}
/// Measurement Jacobian row for one angle type from a precomputed geometry
///
/// # Returns
///
/// 1×3 row $\partial\theta / \partial [\lambda, \phi, h]$ of the target position
pub fn measurement_row(
    measurement: AngleMeasurement,
    geometry: &DirectionFindingGeometry,
) -> RowVector3<f64> {
    let first = angle_partial(measurement, &geometry.angles());
    let second = los_partial(&geometry.los, geometry.range);
    let frame_selection = Matrix3::<f64>::identity();
    let fifth = earth::geodetic_jacobian(&geometry.target);
    first * second * geometry.antenna_from_ecef * frame_selection * fifth
}
/// Azimuth measurement Jacobian
///
/// # Arguments
///
/// * `origin` - Platform ECEF position
/// * `position` - Platform geodetic position
/// * `attitude` - Platform body attitude
/// * `mounting` - Antenna-array mounting angles
/// * `target` - Candidate target geodetic position
pub fn azimuth_measurement(
    origin: &EcefPosition,
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    target: &GeodeticPosition,
) -> RowVector3<f64> {
    let geometry = DirectionFindingGeometry::new(origin, position, attitude, mounting, target);
    measurement_row(AngleMeasurement::Azimuth, &geometry)
}
/// Elevation measurement Jacobian, see [`azimuth_measurement`] for the arguments
pub fn elevation_measurement(
    origin: &EcefPosition,
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    target: &GeodeticPosition,
) -> RowVector3<f64> {
    let geometry = DirectionFindingGeometry::new(origin, position, attitude, mounting, target);
    measurement_row(AngleMeasurement::Elevation, &geometry)
}
/// Angle-of-arrival measurement Jacobian, see [`azimuth_measurement`] for the arguments
pub fn aoa_measurement(
    origin: &EcefPosition,
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    target: &GeodeticPosition,
) -> RowVector3<f64> {
    let geometry = DirectionFindingGeometry::new(origin, position, attitude, mounting, target);
    measurement_row(AngleMeasurement::AngleOfArrival, &geometry)
}
/// Stack the azimuth, elevation and angle-of-arrival rows of a geometry into a 3×3 matrix
pub fn geometry_measurement_matrix(geometry: &DirectionFindingGeometry) -> Matrix3<f64> {
    let rows = AngleMeasurement::ALL.map(|measurement| measurement_row(measurement, geometry));
    Matrix3::from_rows(&rows)
}
/// 3×3 measurement matrix for a combined azimuth, elevation and angle-of-arrival measurement
///
/// Rows are ordered as [`AngleMeasurement::ALL`]; columns are (longitude, latitude, altitude).
pub fn measurement_matrix(
    origin: &EcefPosition,
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    target: &GeodeticPosition,
) -> Matrix3<f64> {
    let geometry = DirectionFindingGeometry::new(origin, position, attitude, mounting, target);
    geometry_measurement_matrix(&geometry)
}
