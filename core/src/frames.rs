//! Rotation matrices between the reference frames used for direction finding
//!
//! Four Cartesian frames are chained together to express a target direction in antenna-array
//! coordinates:
//!
//! ```text
//! ECEF  <--C_n^e--  NED  <--C_b^n--  Body  <--C_a^b--  Antenna array
//! ```
//!
//! Each adjacent pair is built from elemental rotations about the coordinate axes. Composites are
//! formed by right-to-left products (`C_a^e = C_b^e C_a^b`) and every reverse transform is the
//! transpose of the forward one, since all of these matrices are orthonormal.
//!
//! The composite and inverse helpers accept any [`RotationOperand`]. Statically sized
//! [`Matrix3`] values are always valid; dynamically sized matrices and nested vectors are checked
//! and rejected with [`GeoError::InvalidArgument`] unless they are exactly 3×3.
use std::f64::consts::FRAC_PI_2;

use nalgebra::{DMatrix, Matrix3};

use crate::error::{GeoError, Result};
use crate::{AntennaMounting, BodyAttitude, GeodeticPosition};

/// Something that can be used as a 3×3 rotation operand.
pub trait RotationOperand {
    /// Validate the operand and return it as a statically sized matrix.
    fn to_rotation(&self) -> Result<Matrix3<f64>>;
}
impl RotationOperand for Matrix3<f64> {
    fn to_rotation(&self) -> Result<Matrix3<f64>> {
        Ok(*self)
    }
}
impl RotationOperand for DMatrix<f64> {
    fn to_rotation(&self) -> Result<Matrix3<f64>> {
        if self.is_empty() {
            return Err(GeoError::InvalidArgument(
                "rotation matrix is empty".to_string(),
            ));
        }
        if self.shape() != (3, 3) {
            return Err(GeoError::InvalidArgument(format!(
                "rotation matrix must be 3x3, got {}x{}",
                self.nrows(),
                self.ncols()
            )));
        }
        Ok(Matrix3::from_fn(|i, j| self[(i, j)]))
    }
}
impl RotationOperand for Vec<Vec<f64>> {
    fn to_rotation(&self) -> Result<Matrix3<f64>> {
        if self.len() != 3 {
            return Err(GeoError::InvalidArgument(format!(
                "rotation matrix must have 3 rows, got {}",
                self.len()
            )));
        }
        if let Some((i, row)) = self.iter().enumerate().find(|(_, row)| row.len() != 3) {
            return Err(GeoError::InvalidArgument(format!(
                "rotation matrix row {} must have 3 columns, got {}",
                i,
                row.len()
            )));
        }
        Ok(Matrix3::from_fn(|i, j| self[i][j]))
    }
}
impl<T: RotationOperand> RotationOperand for Option<T> {
    fn to_rotation(&self) -> Result<Matrix3<f64>> {
        match self {
            Some(matrix) => matrix.to_rotation(),
            None => Err(GeoError::InvalidArgument(
                "rotation matrix is absent".to_string(),
            )),
        }
    }
}

/// Elemental rotation about the x-axis
///
/// # Parameters
/// - `angle` - rotation angle in radians, positive counter-clockwise looking down the +x axis
///
/// # Returns
/// $$
/// R_x(\theta) = \begin{bmatrix} 1 & 0 & 0 \\\\ 0 & \cos\theta & -\sin\theta \\\\ 0 & \sin\theta & \cos\theta \end{bmatrix}
/// $$
pub fn rx(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, cos, -sin, 0.0, sin, cos)
}
/// Elemental rotation about the y-axis
///
/// $$
/// R_y(\theta) = \begin{bmatrix} \cos\theta & 0 & \sin\theta \\\\ 0 & 1 & 0 \\\\ -\sin\theta & 0 & \cos\theta \end{bmatrix}
/// $$
pub fn ry(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(cos, 0.0, sin, 0.0, 1.0, 0.0, -sin, 0.0, cos)
}
/// Elemental rotation about the z-axis
///
/// $$
/// R_z(\theta) = \begin{bmatrix} \cos\theta & -\sin\theta & 0 \\\\ \sin\theta & \cos\theta & 0 \\\\ 0 & 0 & 1 \end{bmatrix}
/// $$
pub fn rz(angle: f64) -> Matrix3<f64> {
    let (sin, cos) = angle.sin_cos();
    Matrix3::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0)
}

/// Transformation to the ECEF frame from the NED frame
///
/// $$
/// C_n^e = R_z(\lambda) R_y(-\phi - \pi/2)
/// $$
///
/// The latitude offset flips the third axis so it points down along the ellipsoid normal.
///
/// # Parameters
/// - `longitude` - The longitude in radians
/// - `latitude` - The geodetic latitude in radians
///
/// # Example
/// ```rust
/// use dfgeo::frames;
/// let rot = frames::ecef_from_ned(0.0, 0.0);
/// // at the equator and prime meridian "down" points along -x
/// assert!((rot[(0, 2)] + 1.0).abs() < 1e-12);
/// ```
pub fn ecef_from_ned(longitude: f64, latitude: f64) -> Matrix3<f64> {
    rz(longitude) * ry(-latitude - FRAC_PI_2)
}
/// Transformation to the NED frame from the aircraft body frame (3-2-1 yaw, pitch, roll)
///
/// # Parameters
/// - `yaw`, `pitch`, `roll` - Euler angles in radians
pub fn ned_from_body(yaw: f64, pitch: f64, roll: f64) -> Matrix3<f64> {
    rz(yaw) * ry(pitch) * rx(roll)
}
/// Transformation to the body frame from the antenna-array frame
///
/// Same 3-2-1 sequence as [`ned_from_body`] with the mounting angles in place of yaw, pitch and
/// roll.
pub fn body_from_antenna(alpha: f64, beta: f64, gamma: f64) -> Matrix3<f64> {
    rz(alpha) * ry(beta) * rx(gamma)
}

/// Generic product of two rotation operands, `first · second`
///
/// # Errors
/// [`GeoError::InvalidArgument`] if either operand is absent or not exactly 3×3.
///
/// # Example
/// ```rust
/// use dfgeo::frames;
/// use nalgebra::DMatrix;
/// let valid = frames::compose(&frames::rz(0.3), &frames::rz(-0.3)).unwrap();
/// assert!((valid - nalgebra::Matrix3::identity()).norm() < 1e-12);
/// let malformed = DMatrix::<f64>::zeros(2, 3);
/// assert!(frames::compose(&malformed, &frames::rz(0.3)).is_err());
/// ```
pub fn compose<A, B>(first: &A, second: &B) -> Result<Matrix3<f64>>
where
    A: RotationOperand + ?Sized,
    B: RotationOperand + ?Sized,
{
    Ok(first.to_rotation()? * second.to_rotation()?)
}
/// Transpose (and therefore inverse) of a rotation operand
///
/// # Errors
/// [`GeoError::InvalidArgument`] if the operand is absent or not exactly 3×3.
pub fn transpose<A>(matrix: &A) -> Result<Matrix3<f64>>
where
    A: RotationOperand + ?Sized,
{
    Ok(matrix.to_rotation()?.transpose())
}

/// Transformation to ECEF from the body frame, $C_b^e = C_n^e C_b^n$
pub fn ecef_from_body<A, B>(ecef_from_ned: &A, ned_from_body: &B) -> Result<Matrix3<f64>>
where
    A: RotationOperand + ?Sized,
    B: RotationOperand + ?Sized,
{
    compose(ecef_from_ned, ned_from_body)
}
/// Transformation to ECEF from the antenna-array frame, $C_a^e = C_b^e C_a^b$
pub fn ecef_from_antenna<A, B>(ecef_from_body: &A, body_from_antenna: &B) -> Result<Matrix3<f64>>
where
    A: RotationOperand + ?Sized,
    B: RotationOperand + ?Sized,
{
    compose(ecef_from_body, body_from_antenna)
}
/// Transformation to NED from the antenna-array frame, $C_a^n = C_b^n C_a^b$
pub fn ned_from_antenna<A, B>(ned_from_body: &A, body_from_antenna: &B) -> Result<Matrix3<f64>>
where
    A: RotationOperand + ?Sized,
    B: RotationOperand + ?Sized,
{
    compose(ned_from_body, body_from_antenna)
}
/// Transformation to NED from ECEF, the transpose of [`ecef_from_ned`]
pub fn ned_from_ecef<A: RotationOperand + ?Sized>(ecef_from_ned: &A) -> Result<Matrix3<f64>> {
    transpose(ecef_from_ned)
}
/// Transformation to the body frame from NED, the transpose of [`ned_from_body`]
pub fn body_from_ned<A: RotationOperand + ?Sized>(ned_from_body: &A) -> Result<Matrix3<f64>> {
    transpose(ned_from_body)
}
/// Transformation to the body frame from ECEF, the transpose of [`ecef_from_body`]
pub fn body_from_ecef<A: RotationOperand + ?Sized>(ecef_from_body: &A) -> Result<Matrix3<f64>> {
    transpose(ecef_from_body)
}
/// Transformation to the antenna-array frame from ECEF, the transpose of [`ecef_from_antenna`]
pub fn antenna_from_ecef<A: RotationOperand + ?Sized>(ecef_from_antenna: &A) -> Result<Matrix3<f64>> {
    transpose(ecef_from_antenna)
}
/// Transformation to the antenna-array frame from NED, the transpose of [`ned_from_antenna`]
pub fn antenna_from_ned<A: RotationOperand + ?Sized>(ned_from_antenna: &A) -> Result<Matrix3<f64>> {
    transpose(ned_from_antenna)
}
/// Transformation to the antenna-array frame from the body frame, the transpose of
/// [`body_from_antenna`]
pub fn antenna_from_body<A: RotationOperand + ?Sized>(body_from_antenna: &A) -> Result<Matrix3<f64>> {
    transpose(body_from_antenna)
}

/// Full ECEF to antenna-array rotation for a platform
///
/// $$
/// C_e^a = \left( C_n^e C_b^n C_a^b \right)^T
/// $$
///
/// # Parameters
/// - `position` - platform geodetic position (only longitude and latitude are used)
/// - `attitude` - platform body attitude
/// - `mounting` - antenna-array mounting angles
pub fn antenna_from_ecef_chain(
    position: &GeodeticPosition,
    attitude: &BodyAttitude,
    mounting: &AntennaMounting,
) -> Matrix3<f64> {
    let ecef_from_ned = ecef_from_ned(position.longitude, position.latitude);
    let ned_from_body = ned_from_body(attitude.yaw, attitude.pitch, attitude.roll);
    let body_from_antenna = body_from_antenna(mounting.alpha, mounting.beta, mounting.gamma);
    (ecef_from_ned * ned_from_body * body_from_antenna).transpose()
}
