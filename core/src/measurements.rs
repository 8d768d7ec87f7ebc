//! Line-of-sight derivation and direction-finding angle extraction.
//!
//! This module projects a target's position relative to the sensing platform into the
//! antenna-array frame, normalizes it to the unit line-of-sight (LOS) vector and extracts the
//! three angles a direction-finding receiver reports:
//!
//! - azimuth $az = \arctan(\beta / \alpha)$
//! - elevation $el = \arctan(-\gamma / \sqrt{\alpha^2 + \beta^2})$
//! - angle-of-arrival $aoa = \arctan(\sqrt{\beta^2 + \gamma^2} / \alpha)$
//!
//! The angle functions deliberately use `atan` of a ratio rather than `atan2`: they are only
//! meaningful in front of the array ($\alpha > 0$). A target in the array's beta/gamma plane
//! ($\alpha = 0$) produces an infinite or undefined ratio and the result is `±π/2` or NaN. Callers
//! are responsible for screening such geometry.

use std::fmt::{self, Display};

use nalgebra::{Matrix3, Vector3};

use crate::earth::geodetic_to_ecef;
use crate::frames::{antenna_from_ecef_chain, ecef_from_ned};
use crate::{
    AntennaMounting, BodyAttitude, EcefPosition, GeodeticPosition, LineOfSight,
    LocalLevelPosition,
};

/// The direction-finding angle types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AngleMeasurement {
    Azimuth,
    Elevation,
    AngleOfArrival,
}
impl AngleMeasurement {
    /// All angle types in measurement-matrix row order.
    pub const ALL: [AngleMeasurement; 3] = [
        AngleMeasurement::Azimuth,
        AngleMeasurement::Elevation,
        AngleMeasurement::AngleOfArrival,
    ];
    /// Extract this angle from a line-of-sight vector (radians).
    pub fn value(&self, los: &LineOfSight) -> f64 {
        match self {
            AngleMeasurement::Azimuth => azimuth(los),
            AngleMeasurement::Elevation => elevation(los),
            AngleMeasurement::AngleOfArrival => aoa(los),
        }
    }
    /// Short lower-case label used in reports and CSV headers.
    pub fn label(&self) -> &'static str {
        match self {
            AngleMeasurement::Azimuth => "azimuth",
            AngleMeasurement::Elevation => "elevation",
            AngleMeasurement::AngleOfArrival => "aoa",
        }
    }
}
impl Display for AngleMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The three direction-finding angles for one line of sight, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Angles {
    pub azimuth: f64,
    pub elevation: f64,
    pub aoa: f64,
}
impl Angles {
    pub fn from_los(los: &LineOfSight) -> Self {
        Angles {
            azimuth: azimuth(los),
            elevation: elevation(los),
            aoa: aoa(los),
        }
    }
    pub fn get(&self, measurement: AngleMeasurement) -> f64 {
        match measurement {
            AngleMeasurement::Azimuth => self.azimuth,
            AngleMeasurement::Elevation => self.elevation,
            AngleMeasurement::AngleOfArrival => self.aoa,
        }
    }
}
impl Display for Angles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Angles(az: {:.4} deg, el: {:.4} deg, aoa: {:.4} deg)",
            self.azimuth.to_degrees(),
            self.elevation.to_degrees(),
            self.aoa.to_degrees()
        )
    }
}

/// Target position relative to the platform, in ECEF
///
/// The target's geodetic position is converted with [`geodetic_to_ecef`] and the platform's
/// ECEF position is subtracted.
///
/// # Example
/// ```rust
/// use dfgeo::{earth, measurements, EcefPosition, GeodeticPosition};
/// let origin = EcefPosition::new(earth::MEAN_RADIUS, 0.0, 0.0);
/// let target = GeodeticPosition::new(0.0, 0.0, 1000.0);
/// let relative = measurements::relative_position(&origin, &target);
/// assert!((relative.x - 1000.0).abs() < 1e-6);
/// ```
pub fn relative_position(origin: &EcefPosition, target: &GeodeticPosition) -> EcefPosition {
    let target = geodetic_to_ecef(target);
    EcefPosition::new(target.x - origin.x, target.y - origin.y, target.z - origin.z)
}
/// Unit line-of-sight vector in antenna-array coordinates
///
/// # Parameters
/// - `position` - platform geodetic position (defines the local-level frame)
/// - `attitude` - platform body attitude
/// - `mounting` - antenna-array mounting angles
/// - `relative` - target position relative to the platform in ECEF (see [`relative_position`])
pub fn line_of_sight(
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    relative: &EcefPosition,
) -> LineOfSight {
    line_of_sight_with_range(position, attitude, mounting, relative).0
}
/// Unit line-of-sight vector together with the range to the target in meters
///
/// A zero relative vector has no direction; the components are NaN in that case.
pub fn line_of_sight_with_range(
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
    relative: &EcefPosition,
) -> (LineOfSight, f64) {
    let rotation = antenna_from_ecef_chain(position, attitude, mounting);
    project(&rotation, relative)
}
fn project(antenna_from_ecef: &Matrix3<f64>, relative: &EcefPosition) -> (LineOfSight, f64) {
    let in_antenna: Vector3<f64> = antenna_from_ecef * Vector3::from(*relative);
    let range = in_antenna.norm();
    let unit = in_antenna / range;
    (LineOfSight::new(unit[0], unit[1], unit[2]), range)
}
/// Azimuth angle, $\arctan(\beta / \alpha)$, in radians
///
/// # Example
/// ```rust
/// use dfgeo::{measurements, LineOfSight};
/// let az = measurements::azimuth(&LineOfSight::new(0.0, 1.0, 0.0));
/// assert_eq!(az, std::f64::consts::FRAC_PI_2);
/// ```
pub fn azimuth(los: &LineOfSight) -> f64 {
    (los.beta / los.alpha).atan()
}
/// Elevation angle, $\arctan(-\gamma / \sqrt{\alpha^2 + \beta^2})$, in radians (positive up)
pub fn elevation(los: &LineOfSight) -> f64 {
    (-los.gamma / (los.alpha.powi(2) + los.beta.powi(2)).sqrt()).atan()
}
/// Angle-of-arrival, the angle between the line of sight and the array boresight, in radians
pub fn aoa(los: &LineOfSight) -> f64 {
    ((los.beta.powi(2) + los.gamma.powi(2)).sqrt() / los.alpha).atan()
}
/// Project a relative ECEF vector into the platform's local-level (NED) frame
pub fn local_level_position(
    position: &GeodeticPosition,
    relative: &EcefPosition,
) -> LocalLevelPosition {
    let ned_from_ecef = ecef_from_ned(position.longitude, position.latitude).transpose();
    let ned = ned_from_ecef * Vector3::from(*relative);
    LocalLevelPosition::new(ned[0], ned[1], ned[2])
}

/// Line-of-sight geometry between one platform state and one target.
///
/// Holds every intermediate quantity the measurement Jacobians reuse so that the relative
/// position, rotation chain and LOS are derived once per origin/target pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionFindingGeometry {
    /// Target geodetic position
    pub target: GeodeticPosition,
    /// Target minus platform, ECEF, meters
    pub relative: EcefPosition,
    /// $C_e^a$, the ECEF to antenna-array rotation
    pub antenna_from_ecef: Matrix3<f64>,
    /// Unit line of sight in antenna-array coordinates
    pub los: LineOfSight,
    /// Distance from platform to target in meters
    pub range: f64,
}
impl DirectionFindingGeometry {
    pub fn new(
        origin: &EcefPosition,
        position: &GeodeticPosition,
        attitude: &BodyAttitude,
        mounting: &AntennaMounting,
        target: &GeodeticPosition,
    ) -> Self {
        let relative = relative_position(origin, target);
        let antenna_from_ecef = antenna_from_ecef_chain(position, attitude, mounting);
        let (los, range) = project(&antenna_from_ecef, &relative);
        DirectionFindingGeometry {
            target: *target,
            relative,
            antenna_from_ecef,
            los,
            range,
        }
    }
    pub fn angles(&self) -> Angles {
        Angles::from_los(&self.los)
    }
}
impl Display for DirectionFindingGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DirectionFindingGeometry(target: {}, range: {:.3} m, {})",
            self.target, self.range, self.los
        )
    }
}
