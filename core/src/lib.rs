//! Direction-finding geolocation geometry toolbox
//!
//! This crate provides the geometric engine behind angle-only (direction-finding) geolocation. Given a
//! sensing platform's position, orientation and antenna-array mounting, together with a candidate target
//! position, it derives the line-of-sight (LOS) angles a direction-finding receiver would report
//! (azimuth, elevation and angle-of-arrival) and the measurement sensitivity (Jacobian) rows that an
//! external estimator, typically an extended Kalman filter, uses to turn angle residuals into target
//! position corrections. The crate does not implement the estimator itself.
//!
//! This crate is primarily built off of two additional dependencies:
//! - [`nalgebra`](https://crates.io/crates/nalgebra): Provides the small dense matrices and vectors.
//! - [`nav-types`](https://crates.io/crates/nav-types): Provides interoperable coordinate types.
//!
//! The primary reference is Grabbe, _Geo-Location Using Direction Finding Angles_, Johns Hopkins APL
//! Technical Digest, Volume 31, Number 3. Variables are named for the quantity they represent rather
//! than the symbol used in the paper.
//!
//! ## Crate overview
//!
//! - [earth]: Oblate-spheroid Earth model, geodetic to ECEF conversion and its partial derivatives.
//! - [frames]: Rotation matrices between the ECEF, NED, body and antenna-array frames.
//! - [measurements]: Relative position, line-of-sight derivation and angle extraction.
//! - [linearize]: Measurement Jacobians for the azimuth, elevation and angle-of-arrival angles.
//! - [scenario]: Scenario configuration files and the builder that enforces required inputs.
//! - [error]: The error type shared by the modules above.
//!
//! ## Reference frames
//!
//! Five frames are involved:
//! - **ECEF**: Earth-centered Earth-fixed Cartesian frame.
//! - **NED**: North-East-Down local-level frame at the platform.
//! - **Body**: platform-fixed frame, rotated from NED by yaw, pitch and roll.
//! - **Antenna array**: frame fixed to the sensing antenna, rotated from the body frame by the
//!   mounting angles alpha, beta and gamma.
//! - **LLA**: geodetic longitude, latitude and altitude.
//!
//! Rotations compose right to left against column vectors:
//!
//! $$
//! C_a^e = C_n^e C_b^n C_a^b
//! $$
//!
//! and every rotation is orthonormal, so the reverse transform is always the transpose.
//!
//! ## Line of sight and angles
//!
//! The target's relative ECEF position is projected into the antenna-array frame and normalized to the
//! unit LOS vector $u = [\alpha, \beta, \gamma]$. The angles are
//!
//! $$
//! az = \arctan\left(\frac{\beta}{\alpha}\right), \quad
//! el = \arctan\left(\frac{-\gamma}{\sqrt{\alpha^2 + \beta^2}}\right), \quad
//! aoa = \arctan\left(\frac{\sqrt{\beta^2 + \gamma^2}}{\alpha}\right)
//! $$
//!
//! All angles are in radians and all lengths in meters throughout the crate.
pub mod earth;
pub mod error;
pub mod frames;
pub mod linearize;
pub mod measurements;
pub mod scenario;

use std::fmt::{self, Display};

use nalgebra::Vector3;
use nav_types::{ECEF, WGS84};
use serde::{Deserialize, Serialize};

pub use error::{GeoError, Result};

/// Geodetic position on or above the reference ellipsoid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Geodetic longitude in radians
    pub longitude: f64,
    /// Geodetic latitude in radians
    pub latitude: f64,
    /// Altitude above the ellipsoid in meters
    pub altitude: f64,
}
impl GeodeticPosition {
    pub fn new(longitude: f64, latitude: f64, altitude: f64) -> Self {
        GeodeticPosition {
            longitude,
            latitude,
            altitude,
        }
    }
    /// Build a position from longitude and latitude in degrees and altitude in meters.
    pub fn from_degrees(longitude: f64, latitude: f64, altitude: f64) -> Self {
        GeodeticPosition::new(longitude.to_radians(), latitude.to_radians(), altitude)
    }
}
impl Display for GeodeticPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GeodeticPosition(lon: {:.6} deg, lat: {:.6} deg, alt: {:.2} m)",
            self.longitude.to_degrees(),
            self.latitude.to_degrees(),
            self.altitude
        )
    }
}
/// Conversion into `nav-types`. The `nav-types` constructor rejects latitudes outside ±90°.
impl From<GeodeticPosition> for WGS84<f64> {
    fn from(position: GeodeticPosition) -> Self {
        WGS84::from_radians_and_meters(position.latitude, position.longitude, position.altitude)
    }
}
impl From<WGS84<f64>> for GeodeticPosition {
    fn from(position: WGS84<f64>) -> Self {
        GeodeticPosition::new(
            position.longitude_radians(),
            position.latitude_radians(),
            position.altitude(),
        )
    }
}

/// Cartesian position (or displacement) in the Earth-centered Earth-fixed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EcefPosition {
    /// meters
    pub x: f64,
    /// meters
    pub y: f64,
    /// meters
    pub z: f64,
}
impl EcefPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        EcefPosition { x, y, z }
    }
    /// Euclidean length of the vector in meters.
    pub fn norm(&self) -> f64 {
        Vector3::from(*self).norm()
    }
}
impl Display for EcefPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EcefPosition(x: {:.3} m, y: {:.3} m, z: {:.3} m)",
            self.x, self.y, self.z
        )
    }
}
impl From<EcefPosition> for Vector3<f64> {
    fn from(position: EcefPosition) -> Self {
        Vector3::new(position.x, position.y, position.z)
    }
}
impl From<Vector3<f64>> for EcefPosition {
    fn from(vector: Vector3<f64>) -> Self {
        EcefPosition::new(vector[0], vector[1], vector[2])
    }
}
impl From<EcefPosition> for ECEF<f64> {
    fn from(position: EcefPosition) -> Self {
        ECEF::new(position.x, position.y, position.z)
    }
}
impl From<ECEF<f64>> for EcefPosition {
    fn from(position: ECEF<f64>) -> Self {
        EcefPosition::new(position.x(), position.y(), position.z())
    }
}

/// Platform orientation relative to the local-level (NED) frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyAttitude {
    /// radians
    pub yaw: f64,
    /// radians
    pub pitch: f64,
    /// radians
    pub roll: f64,
}
impl BodyAttitude {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        BodyAttitude { yaw, pitch, roll }
    }
}
impl Display for BodyAttitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BodyAttitude(yaw: {:.4}, pitch: {:.4}, roll: {:.4})",
            self.yaw, self.pitch, self.roll
        )
    }
}

/// Antenna-array mounting angles relative to the body frame.
///
/// These are angles. The line-of-sight direction expressed in the array frame has the same field
/// names but is a unit vector, see [`LineOfSight`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AntennaMounting {
    /// Rotation about the body z-axis in radians
    pub alpha: f64,
    /// Rotation about the intermediate y-axis in radians
    pub beta: f64,
    /// Rotation about the final x-axis in radians
    pub gamma: f64,
}
impl AntennaMounting {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        AntennaMounting { alpha, beta, gamma }
    }
}
impl Display for AntennaMounting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AntennaMounting(alpha: {:.4}, beta: {:.4}, gamma: {:.4})",
            self.alpha, self.beta, self.gamma
        )
    }
}

/// Unit line-of-sight vector from platform to target, expressed in antenna-array coordinates.
///
/// `alpha` lies along the array boresight, `beta` to the right and `gamma` down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineOfSight {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}
impl LineOfSight {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        LineOfSight { alpha, beta, gamma }
    }
}
impl Display for LineOfSight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LineOfSight(alpha: {:.6}, beta: {:.6}, gamma: {:.6})",
            self.alpha, self.beta, self.gamma
        )
    }
}
impl From<LineOfSight> for Vector3<f64> {
    fn from(los: LineOfSight) -> Self {
        Vector3::new(los.alpha, los.beta, los.gamma)
    }
}

/// Position in the local-level North-East-Down frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalLevelPosition {
    /// meters
    pub north: f64,
    /// meters
    pub east: f64,
    /// meters
    pub down: f64,
}
impl LocalLevelPosition {
    pub fn new(north: f64, east: f64, down: f64) -> Self {
        LocalLevelPosition { north, east, down }
    }
}
impl Display for LocalLevelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LocalLevelPosition(north: {:.3} m, east: {:.3} m, down: {:.3} m)",
            self.north, self.east, self.down
        )
    }
}
