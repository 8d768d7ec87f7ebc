//! Earth-related constants and functions
//!
//! This module contains the oblate-spheroid Earth model used to place a candidate target in the
//! Earth-centered Earth-fixed (ECEF) frame. The model is parameterized by a mean radius and an
//! eccentricity; the prime-vertical ("transverse") radius of curvature is derived from them and
//! the usual geodetic to ECEF formulas are applied.
//!
//! # Coordinate Systems
//! The ECEF frame is a right-handed Cartesian coordinate system with the origin at the Earth's
//! center, x through the equator at the prime meridian and z through the north pole. Geodetic
//! coordinates are longitude, latitude (both radians) and altitude above the ellipsoid (meters).
//!
//! # Partial derivatives
//! The measurement Jacobians need the sensitivity of a target's ECEF position to its geodetic
//! coordinates. Altitude is treated as a known constant for direction-finding geolocation, so only
//! the longitude and latitude partials are populated; both are evaluated with the transverse radius
//! held at the target's latitude.
use ::nalgebra::{Matrix3, Vector3};

use crate::{EcefPosition, GeodeticPosition};

/// Earth model eccentricity ($e$), unit-less
pub const ECCENTRICITY: f64 = 0.01671;
/// Earth model eccentricity squared ($e^2$)
pub const ECCENTRICITY_SQUARED: f64 = ECCENTRICITY * ECCENTRICITY;
/// Earth's mean radius in meters
pub const MEAN_RADIUS: f64 = 6.371e6;

/// Calculate the transverse (prime-vertical) radius of curvature
///
/// $$
/// N = \frac{R}{\sqrt{1 - e^2 \sin^2 \phi}}
/// $$
///
/// # Parameters
/// - `latitude` - The geodetic latitude in radians
///
/// # Returns
/// The transverse radius of curvature in meters
///
/// # Example
/// ```rust
/// use dfgeo::earth;
/// let radius = earth::transverse_radius(0.0);
/// assert_eq!(radius, earth::MEAN_RADIUS);
/// ```
pub fn transverse_radius(latitude: f64) -> f64 {
    let sin_lat: f64 = latitude.sin();
    MEAN_RADIUS / (1.0 - ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt()
}
/// Calculate the rate of change of the transverse radius with respect to latitude
///
/// $$
/// \frac{dN}{d\phi} = \frac{e^2 \sin \phi \cos \phi \, N}{1 - e^2 \sin^2 \phi}
/// $$
///
/// The measurement Jacobians hold the transverse radius fixed at the target latitude, so this term
/// is not folded into [`geodetic_jacobian`]. It is exposed for estimators that carry the full
/// derivative.
///
/// # Parameters
/// - `latitude` - The geodetic latitude in radians
///
/// # Returns
/// The derivative of the transverse radius in meters per radian
pub fn transverse_radius_rate(latitude: f64) -> f64 {
    let sin_lat: f64 = latitude.sin();
    let numerator = ECCENTRICITY_SQUARED * sin_lat * latitude.cos() * transverse_radius(latitude);
    let denominator = 1.0 - ECCENTRICITY_SQUARED * sin_lat * sin_lat;
    numerator / denominator
}
/// Convert a geodetic position to ECEF coordinates
///
/// $$
/// \begin{aligned}
/// x &= (N + h) \cos\lambda \cos\phi \\\\
/// y &= (N + h) \sin\lambda \cos\phi \\\\
/// z &= (N (1 - e^2) + h) \sin\phi
/// \end{aligned}
/// $$
///
/// # Parameters
/// - `position` - The geodetic position (radians, radians, meters)
///
/// # Returns
/// The ECEF position in meters
///
/// # Example
/// ```rust
/// use dfgeo::{earth, GeodeticPosition};
/// let ecef = earth::geodetic_to_ecef(&GeodeticPosition::new(0.0, 0.0, 1000.0));
/// assert_eq!(ecef.x, earth::MEAN_RADIUS + 1000.0);
/// ```
pub fn geodetic_to_ecef(position: &GeodeticPosition) -> EcefPosition {
    let (sin_lon, cos_lon) = position.longitude.sin_cos();
    let (sin_lat, cos_lat) = position.latitude.sin_cos();
    let transverse = transverse_radius(position.latitude);
    let horizontal = transverse + position.altitude;
    EcefPosition::new(
        horizontal * cos_lon * cos_lat,
        horizontal * sin_lon * cos_lat,
        (transverse * (1.0 - ECCENTRICITY_SQUARED) + position.altitude) * sin_lat,
    )
}
/// Partial derivative of the ECEF position with respect to longitude
///
/// # Parameters
/// - `position` - The geodetic position at which to evaluate the derivative
///
/// # Returns
/// $\partial r^e / \partial \lambda$ in meters per radian
pub fn ecef_longitude_partial(position: &GeodeticPosition) -> Vector3<f64> {
    let (sin_lon, cos_lon) = position.longitude.sin_cos();
    let cos_lat = position.latitude.cos();
    let horizontal = transverse_radius(position.latitude) + position.altitude;
    Vector3::new(
        -horizontal * sin_lon * cos_lat,
        horizontal * cos_lon * cos_lat,
        0.0,
    )
}
/// Partial derivative of the ECEF position with respect to latitude
///
/// The transverse radius is held constant at the evaluation latitude (see
/// [`transverse_radius_rate`] for the omitted term).
///
/// # Parameters
/// - `position` - The geodetic position at which to evaluate the derivative
///
/// # Returns
/// $\partial r^e / \partial \phi$ in meters per radian
pub fn ecef_latitude_partial(position: &GeodeticPosition) -> Vector3<f64> {
    let (sin_lon, cos_lon) = position.longitude.sin_cos();
    let (sin_lat, cos_lat) = position.latitude.sin_cos();
    let transverse = transverse_radius(position.latitude);
    let horizontal = transverse + position.altitude;
    Vector3::new(
        -horizontal * cos_lon * sin_lat,
        -horizontal * sin_lon * sin_lat,
        (transverse * (1.0 - ECCENTRICITY_SQUARED) + position.altitude) * cos_lat,
    )
}
/// Jacobian of the ECEF position with respect to the geodetic coordinates
///
/// Columns are ordered (longitude, latitude, altitude). Altitude is held constant, so the third
/// column is zero.
///
/// # Parameters
/// - `position` - The geodetic position at which to evaluate the Jacobian
///
/// # Returns
/// A 3x3 matrix $\partial r^e / \partial [\lambda, \phi, h]$
///
/// # Example
/// ```rust
/// use dfgeo::{earth, GeodeticPosition};
/// let jacobian = earth::geodetic_jacobian(&GeodeticPosition::new(0.1, 0.2, 0.0));
/// assert_eq!(jacobian.column(2).norm(), 0.0);
/// ```
pub fn geodetic_jacobian(position: &GeodeticPosition) -> Matrix3<f64> {
    Matrix3::from_columns(&[
        ecef_longitude_partial(position),
        ecef_latitude_partial(position),
        Vector3::zeros(),
    ])
}
