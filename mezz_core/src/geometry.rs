//! # Geometry Utilities
//!
//! Polar-angle and orthogonality helpers used by the layout solvers. All
//! functions are pure; angles are radians.
//!
//! Conventions (matching the rest of the crate):
//! - **Bearing (phi)**: horizontal compass-style direction of a segment,
//!   `atan2(dy, dx)` of the horizontal projection, range (-pi, pi].
//! - **Elevation (theta)**: angle from *vertical*: 0 = straight up,
//!   pi/2 = horizontal, pi = straight down.

use crate::errors::{LayoutError, LayoutResult};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A point in 2D profile space.
pub type Point2 = nalgebra::Point2<f64>;

/// Tolerance for angle comparisons (radians).
pub const ANGLE_TOL: f64 = 1e-9;

/// Tolerance for linear comparisons (inches).
pub const LINEAR_TOL: f64 = 1e-6;

/// Horizontal bearing of the segment `p0 -> p1`.
///
/// Degenerate (vertical or coincident) segments return 0, the same answer
/// `atan2(0, 0)` gives.
pub fn polar_bearing(p0: &Point3, p1: &Point3) -> f64 {
    (p1.y - p0.y).atan2(p1.x - p0.x)
}

/// Elevation angle of the segment `p0 -> p1`, measured from vertical.
///
/// Returns an error when the points coincide.
pub fn polar_elevation(p0: &Point3, p1: &Point3) -> LayoutResult<f64> {
    let d = p1 - p0;
    let len = d.norm();
    if len < LINEAR_TOL {
        return Err(LayoutError::degenerate_vector("polar_elevation"));
    }
    Ok((d.z / len).acos())
}

/// True iff `angle` is an integer multiple of pi/2 within tolerance.
pub fn is_orthogonal(angle: f64) -> bool {
    let r = angle.rem_euclid(std::f64::consts::FRAC_PI_2);
    r < ANGLE_TOL || (std::f64::consts::FRAC_PI_2 - r) < ANGLE_TOL
}

/// Normalize `v` to unit length; defined error on (near) zero-length input.
pub fn unit_vector(v: &Vec3) -> LayoutResult<Vec3> {
    let len = v.norm();
    if len < LINEAR_TOL {
        return Err(LayoutError::degenerate_vector("unit_vector"));
    }
    Ok(v / len)
}

/// Snap a direction onto the nearest coordinate axis by normalizing and
/// rounding each component to the nearest integer.
///
/// Used to derive the lateral "width" direction of stairs and ladders from
/// a user-picked path that may be slightly off-axis. Errors if the rounded
/// vector collapses to zero (direction more than 45 degrees off every axis
/// pair is impossible, so this only fires on degenerate input).
pub fn snap_to_axis(v: &Vec3) -> LayoutResult<Vec3> {
    let u = unit_vector(v)?;
    let snapped = Vec3::new(u.x.round(), u.y.round(), u.z.round());
    if snapped.norm() < LINEAR_TOL {
        return Err(LayoutError::degenerate_vector("snap_to_axis"));
    }
    Ok(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_polar_bearing_quadrants() {
        let o = Point3::new(0.0, 0.0, 0.0);
        assert!((polar_bearing(&o, &Point3::new(10.0, 0.0, 0.0)) - 0.0).abs() < 1e-12);
        assert!((polar_bearing(&o, &Point3::new(0.0, 5.0, 3.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!((polar_bearing(&o, &Point3::new(-4.0, 0.0, 0.0)) - PI).abs() < 1e-12);
        assert!((polar_bearing(&o, &Point3::new(0.0, -4.0, 0.0)) + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_polar_elevation_convention() {
        let o = Point3::new(0.0, 0.0, 0.0);
        // Straight up = 0
        let up = polar_elevation(&o, &Point3::new(0.0, 0.0, 10.0)).unwrap();
        assert!(up.abs() < 1e-12);
        // Horizontal = pi/2
        let flat = polar_elevation(&o, &Point3::new(10.0, 0.0, 0.0)).unwrap();
        assert!((flat - FRAC_PI_2).abs() < 1e-12);
        // Straight down = pi
        let down = polar_elevation(&o, &Point3::new(0.0, 0.0, -10.0)).unwrap();
        assert!((down - PI).abs() < 1e-12);
    }

    #[test]
    fn test_polar_elevation_coincident_points() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(polar_elevation(&p, &p).is_err());
    }

    #[test]
    fn test_is_orthogonal_gate() {
        for deg in [0.0_f64, 90.0, 180.0, 270.0, -90.0] {
            assert!(is_orthogonal(deg.to_radians()), "{} deg", deg);
        }
        assert!(!is_orthogonal(45.0_f64.to_radians()));
        assert!(!is_orthogonal(91.0_f64.to_radians()));
    }

    #[test]
    fn test_unit_vector_zero_length() {
        assert!(unit_vector(&Vec3::new(0.0, 0.0, 0.0)).is_err());
        let u = unit_vector(&Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((u.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_snap_to_axis() {
        // Slightly off-axis picks snap cleanly
        let v = Vec3::new(0.02, -7.99, 0.0);
        let s = snap_to_axis(&v).unwrap();
        assert_eq!(s, Vec3::new(0.0, -1.0, 0.0));
    }
}
