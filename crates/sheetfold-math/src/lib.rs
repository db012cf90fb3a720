#![warn(missing_docs)]

//! Math types for the sheetfold unfolding engine.
//!
//! Thin wrappers around nalgebra providing the vector, point and unit
//! quaternion operations the bend geometry is built from. Every function
//! here is pure; degenerate input (zero-length vectors, lines parallel to a
//! plane) yields `None` rather than NaN so callers can report which edge or
//! wall is at fault.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in 2D space.
pub type Point2 = nalgebra::Point2<f64>;

/// A rotation, stored as a unit quaternion.
pub type Rotation = UnitQuaternion<f64>;

/// Vectors shorter than this are treated as having no direction.
const MIN_NORM: f64 = 1e-12;

/// Below this `1 + dot(u, v)` the two directions are treated as opposite.
const ANTIPARALLEL_EPSILON: f64 = 1e-12;

fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Any unit vector perpendicular to `u` (which must be unit length).
pub fn any_perpendicular(u: &Vec3) -> Vec3 {
    let helper = if u.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    u.cross(&helper).normalize()
}

/// The shortest rotation carrying the direction of `from` onto the direction of `to`.
///
/// Computed as `normalize(Quaternion(1 + u·v, u × v))` on the normalized inputs,
/// which stays well conditioned for nearly parallel vectors. When the inputs
/// point in opposite directions the result is a half turn about an axis
/// perpendicular to `from`.
///
/// Returns `None` if either vector is zero-length or not finite.
pub fn rotation_between(from: &Vec3, to: &Vec3) -> Option<Rotation> {
    if !is_finite(from) || !is_finite(to) {
        return None;
    }
    let u = from.try_normalize(MIN_NORM)?;
    let v = to.try_normalize(MIN_NORM)?;

    let real = 1.0 + u.dot(&v);
    if real < ANTIPARALLEL_EPSILON {
        let axis = Unit::new_unchecked(any_perpendicular(&u));
        return Some(Rotation::from_axis_angle(&axis, PI));
    }

    let imag = u.cross(&v);
    Some(Rotation::new_normalize(Quaternion::new(
        real, imag.x, imag.y, imag.z,
    )))
}

/// Rotation by `angle` radians about `axis` (right-hand rule).
///
/// Returns `None` if the axis is zero-length.
pub fn rotation_about_axis(axis: &Vec3, angle: f64) -> Option<Rotation> {
    let axis = Unit::try_new(*axis, MIN_NORM)?;
    Some(Rotation::from_axis_angle(&axis, angle))
}

/// Rotate `point` by `rotation` about `pivot`: `pivot + rotation(point - pivot)`.
pub fn rotate_about_pivot(point: &Point3, rotation: &Rotation, pivot: &Point3) -> Point3 {
    pivot + rotation * (point - pivot)
}

/// Spherical interpolation from the identity towards `rotation`.
///
/// `t = 0` is the identity and `t = 1` is `rotation`. Interpolates the
/// rotation angle along its own axis, so half turns (where a generic slerp is
/// undefined) interpolate smoothly.
pub fn slerp_from_identity(rotation: &Rotation, t: f64) -> Rotation {
    match rotation.axis_angle() {
        Some((axis, angle)) => Rotation::from_axis_angle(&axis, angle * t),
        None => Rotation::identity(),
    }
}

/// Vector projection of `v` onto `onto`.
///
/// Returns `None` if `onto` is zero-length.
pub fn project_onto(v: &Vec3, onto: &Vec3) -> Option<Vec3> {
    let len_sq = onto.norm_squared();
    if len_sq < MIN_NORM * MIN_NORM {
        return None;
    }
    Some(onto * (v.dot(onto) / len_sq))
}

/// Signed length of the projection of `v` onto `onto`.
///
/// Returns `None` if `onto` is zero-length.
pub fn scalar_projection(v: &Vec3, onto: &Vec3) -> Option<f64> {
    let len = onto.norm();
    if len < MIN_NORM {
        return None;
    }
    Some(v.dot(onto) / len)
}

/// The component of `v` lying in the plane with normal `plane_normal`.
///
/// Returns `None` if the normal is zero-length.
pub fn project_onto_plane(v: &Vec3, plane_normal: &Vec3) -> Option<Vec3> {
    project_onto(v, plane_normal).map(|along| v - along)
}

/// Unit normal of the face through `a`, `b`, `c` listed clockwise when seen
/// from the side the normal points to.
///
/// Returns `None` for collinear or coincident vertices.
pub fn normal_from_clockwise_vertices(a: &Point3, b: &Point3, c: &Point3) -> Option<Vec3> {
    (c - b).cross(&(b - a)).try_normalize(MIN_NORM)
}

/// Intersection of the line `origin + s * direction` with a plane.
///
/// Returns `None` if the line is parallel to the plane.
pub fn intersect_line_plane(
    origin: &Point3,
    direction: &Vec3,
    plane_origin: &Point3,
    plane_normal: &Vec3,
) -> Option<Point3> {
    let denom = direction.dot(plane_normal);
    if denom.abs() < MIN_NORM {
        return None;
    }
    let s = (plane_origin - origin).dot(plane_normal) / denom;
    let hit = origin + direction * s;
    is_finite(&hit.coords).then_some(hit)
}

/// `v` lengthened by `by` along its own direction. A zero vector stays zero.
pub fn extended(v: &Vec3, by: f64) -> Vec3 {
    match v.try_normalize(MIN_NORM) {
        Some(dir) => v + dir * by,
        None => *v,
    }
}

/// Midpoint of two points.
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    nalgebra::center(a, b)
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Check if two directions are parallel or anti-parallel.
    pub fn parallel(&self, a: &Vec3, b: &Vec3) -> bool {
        match (a.try_normalize(MIN_NORM), b.try_normalize(MIN_NORM)) {
            (Some(a), Some(b)) => a.cross(&b).norm() < self.angular.sqrt(),
            _ => true,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_between_identity() {
        let n = Vec3::new(0.2673, 0.1397, 0.9534).normalize();
        let r = rotation_between(&n, &n).unwrap();
        assert!(r.angle().abs() < 1e-12);
    }

    #[test]
    fn test_rotation_between_right_angle() {
        let r = rotation_between(&Vec3::z(), &Vec3::y()).unwrap();
        assert!((r.angle() - FRAC_PI_2).abs() <= f64::EPSILON);
        let moved = r * Vec3::z();
        assert!((moved - Vec3::y()).norm() < 1e-12);
        let axis = r.axis().unwrap();
        assert!((axis.into_inner() + Vec3::x()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_between_opposite() {
        let n = Vec3::new(0.0, 0.0, 1.0);
        let r = rotation_between(&n, &-n).unwrap();
        assert!(r.coords.iter().all(|c| c.is_finite()));
        assert!((r.angle() - PI).abs() < 1e-12);
        assert!((r * n + n).norm() < 1e-12);
        assert!(r.axis().unwrap().dot(&n).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_between_opposite_along_x() {
        let n = Vec3::x();
        let r = rotation_between(&n, &-n).unwrap();
        assert!((r * n + n).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_between_zero_vector() {
        assert!(rotation_between(&Vec3::zeros(), &Vec3::z()).is_none());
        assert!(rotation_between(&Vec3::z(), &Vec3::new(f64::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_rotate_about_pivot() {
        let r = rotation_about_axis(&Vec3::z(), FRAC_PI_2).unwrap();
        let p = rotate_about_pivot(&Point3::new(2.0, 1.0, 0.0), &r, &Point3::new(1.0, 1.0, 0.0));
        assert!((p - Point3::new(1.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_slerp_from_identity() {
        let r = rotation_about_axis(&Vec3::x(), 1.2).unwrap();
        assert!(slerp_from_identity(&r, 0.0).angle().abs() < 1e-12);
        assert!((slerp_from_identity(&r, 0.5).angle() - 0.6).abs() < 1e-12);
        assert!(slerp_from_identity(&r, 1.0).angle_to(&r) < 1e-12);

        let half_turn = rotation_about_axis(&Vec3::y(), PI).unwrap();
        assert!((slerp_from_identity(&half_turn, 0.5).angle() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_projections() {
        let v = Vec3::new(3.0, 4.0, 5.0);
        let along = project_onto(&v, &Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!((along - Vec3::new(0.0, 4.0, 0.0)).norm() < 1e-12);
        assert!((scalar_projection(&v, &Vec3::new(0.0, 0.0, -3.0)).unwrap() + 5.0).abs() < 1e-12);
        let in_plane = project_onto_plane(&v, &Vec3::z()).unwrap();
        assert!((in_plane - Vec3::new(3.0, 4.0, 0.0)).norm() < 1e-12);
        assert!(project_onto(&v, &Vec3::zeros()).is_none());
        assert!(scalar_projection(&v, &Vec3::zeros()).is_none());
    }

    #[test]
    fn test_clockwise_normal() {
        let a = Point3::new(-1.0, 1.0, 0.0);
        let b = Point3::new(1.0, 1.0, 0.0);
        let c = Point3::new(1.0, -1.0, 0.0);
        let n = normal_from_clockwise_vertices(&a, &b, &c).unwrap();
        assert!((n - Vec3::z()).norm() < 1e-12);
        assert!(normal_from_clockwise_vertices(&a, &a, &c).is_none());
    }

    #[test]
    fn test_line_plane_intersection() {
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        let hit = intersect_line_plane(
            &Point3::new(0.0, 2.0, 10.0),
            &-Vec3::z(),
            &Point3::origin(),
            &n,
        )
        .unwrap();
        assert!((hit - Point3::new(0.0, 2.0, -2.0)).norm() < 1e-12);
        assert!(intersect_line_plane(&Point3::origin(), &Vec3::x(), &Point3::origin(), &Vec3::z())
            .is_none());
    }

    #[test]
    fn test_extended() {
        let v = extended(&Vec3::new(0.0, 3.0, 4.0), 5.0);
        assert!((v - Vec3::new(0.0, 6.0, 8.0)).norm() < 1e-12);
        assert_eq!(extended(&Vec3::zeros(), 1.0), Vec3::zeros());
    }

    #[test]
    fn test_tolerance() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.points_equal(&Point3::origin(), &Point3::new(1e-7, 0.0, 0.0)));
        assert!(tol.is_zero(1e-7));
        assert!(!tol.is_zero(1e-3));
        assert!(tol.parallel(&Vec3::x(), &(-2.0 * Vec3::x())));
        assert!(!tol.parallel(&Vec3::x(), &Vec3::y()));
    }
}
