pub mod arc_2d;
pub mod direction;
pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global tolerance for floating-point computations.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two points are considered the same location.
pub const EPSILON: f64 = 1e-3;

/// Returns true if two points coincide within [`EPSILON`].
#[must_use]
pub fn same_point(a: &Point3, b: &Point3) -> bool {
    (a - b).norm() < EPSILON
}

/// Returns true if two points coincide in the XY plane within [`EPSILON`].
#[must_use]
pub fn same_point_2d(a: &Point3, b: &Point3) -> bool {
    (a.x - b.x).hypot(a.y - b.y) < EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_within_epsilon_are_equal() {
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(same_point(&a, &Point3::new(1.0005, 2.0, 3.0)));
        assert!(!same_point(&a, &Point3::new(1.01, 2.0, 3.0)));
    }

    #[test]
    fn planar_equality_ignores_z() {
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(same_point_2d(&a, &Point3::new(1.0, 2.0, -7.0)));
        assert!(!same_point(&a, &Point3::new(1.0, 2.0, -7.0)));
    }
}
