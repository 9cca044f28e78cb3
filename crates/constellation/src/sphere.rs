//! Spherical geometry utilities.
//!
//! Pure functions over the unit sphere: spherical-cap area and radius
//! conversions, Fibonacci-lattice point distribution, tangent bases, the
//! exponential map, and scaling to world units. All functions are total;
//! inputs outside their natural domain are clamped rather than rejected.

use std::f64::consts::{PI, TAU};

use constellation_core::geometry::Point;
use glam::DVec3;

/// Golden angle in radians, `π · (3 − √5)`.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Total surface area of the unit sphere.
pub const SPHERE_AREA: f64 = 2.0 * TAU;

/// Offsets shorter than this are treated as zero by [`exponential_map`].
const TANGENT_EPSILON: f64 = 1e-12;

/// Area of a spherical cap of the given angular radius on the unit sphere.
///
/// # Examples
///
/// ```
/// # use constellation::sphere::{spherical_cap_area, SPHERE_AREA};
/// assert_eq!(spherical_cap_area(0.0), 0.0);
/// assert!((spherical_cap_area(std::f64::consts::PI) - SPHERE_AREA).abs() < 1e-12);
/// ```
pub fn spherical_cap_area(angular_radius: f64) -> f64 {
    TAU * (1.0 - angular_radius.cos())
}

/// Angular radius of the spherical cap with the given area.
///
/// Inverse of [`spherical_cap_area`]. The area is clamped to `[0, 4π]` so the
/// result is always in `[0, π]`.
pub fn area_to_radius(area: f64) -> f64 {
    let area = if area.is_nan() {
        0.0
    } else {
        area.clamp(0.0, SPHERE_AREA)
    };
    (1.0 - area / TAU).clamp(-1.0, 1.0).acos()
}

/// Returns the `index`-th of `count` points of the golden-angle spiral.
///
/// Points run from near the +Y pole (`index = 0`) to near the −Y pole
/// (`index = count − 1`). For `count = 1` the single point is `+X`.
pub fn fibonacci_point(index: usize, count: usize) -> DVec3 {
    if count == 0 {
        return DVec3::X;
    }
    let y = 1.0 - 2.0 * (index as f64 + 0.5) / count as f64;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * index as f64;
    DVec3::new(theta.cos() * ring, y, theta.sin() * ring)
}

/// Distributes `count` points nearly uniformly over the unit sphere.
///
/// Deterministic and order-stable: the `k`-th point depends only on `k` and
/// `count`.
///
/// # Examples
///
/// ```
/// # use constellation::sphere::fibonacci_sphere;
/// let points = fibonacci_sphere(32);
/// assert_eq!(points.len(), 32);
/// assert!(points.iter().all(|p| (p.length() - 1.0).abs() < 1e-12));
/// ```
pub fn fibonacci_sphere(count: usize) -> Vec<DVec3> {
    (0..count).map(|index| fibonacci_point(index, count)).collect()
}

/// Returns two orthonormal vectors spanning the tangent plane at `center`.
///
/// The reference axis is +Z unless `center` lies close to the Z axis, in
/// which case +X is used, so the basis is never degenerate. For a zero
/// `center` the basis of `+X` is returned.
pub fn tangent_basis(center: DVec3) -> (DVec3, DVec3) {
    let normal = center.try_normalize().unwrap_or(DVec3::X);
    let reference = if normal.z.abs() < 0.9 {
        DVec3::Z
    } else {
        DVec3::X
    };
    let first = reference.cross(normal).try_normalize().unwrap_or(DVec3::Y);
    let second = normal.cross(first);
    (first, second)
}

/// Maps a tangent-plane offset at `center` onto the unit sphere.
///
/// The offset length is the geodesic distance (radians) travelled from
/// `center` along `u·basis.0 + v·basis.1`. A zero offset returns `center`.
///
/// # Examples
///
/// ```
/// # use constellation::sphere::{angular_distance, exponential_map, tangent_basis};
/// # use constellation::{DVec3, geometry::Point};
/// let center = DVec3::Y;
/// let basis = tangent_basis(center);
/// let moved = exponential_map(center, Point::new(0.5, 0.0), basis);
/// assert!((angular_distance(moved, center) - 0.5).abs() < 1e-12);
/// ```
pub fn exponential_map(center: DVec3, offset: Point, basis: (DVec3, DVec3)) -> DVec3 {
    let center = center.try_normalize().unwrap_or(DVec3::X);
    let distance = offset.hypot();
    if distance < TANGENT_EPSILON {
        return center;
    }
    let direction = (basis.0 * offset.x() + basis.1 * offset.y()) / distance;
    let point = center * distance.cos() + direction * distance.sin();
    point.try_normalize().unwrap_or(center)
}

/// Rotates `center` by `distance` radians along a tangent `direction`.
///
/// `direction` need not be unit length or exactly tangent; its component
/// along `center` is discarded first. Returns `center` when no tangent
/// direction remains.
pub fn move_along(center: DVec3, direction: DVec3, distance: f64) -> DVec3 {
    let center = center.try_normalize().unwrap_or(DVec3::X);
    let tangent = direction - center * direction.dot(center);
    match tangent.try_normalize() {
        Some(unit) => (center * distance.cos() + unit * distance.sin())
            .try_normalize()
            .unwrap_or(center),
        None => center,
    }
}

/// Normalizes `point` and scales it to `sphere_radius`.
///
/// A zero vector has no direction; it is placed at `+X · sphere_radius`.
pub fn scale_to_sphere(point: DVec3, sphere_radius: f64) -> DVec3 {
    point.try_normalize().unwrap_or(DVec3::X) * sphere_radius
}

/// Angular separation between two directions, in `[0, π]`.
///
/// Computed as `atan2(|a × b|, a · b)`, which keeps full precision for
/// nearly parallel directions. Returns `0` when either vector is zero.
pub fn angular_distance(a: DVec3, b: DVec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b)).clamp(0.0, PI)
}


#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_golden_angle_constant() {
        assert_approx_eq!(f64, GOLDEN_ANGLE, PI * (3.0 - 5.0f64.sqrt()), epsilon = 1e-15);
    }

    #[test]
    fn test_cap_area_known_values() {
        assert_approx_eq!(f64, spherical_cap_area(0.0), 0.0);
        assert_approx_eq!(f64, spherical_cap_area(PI / 2.0), TAU, epsilon = 1e-12);
        assert_approx_eq!(f64, spherical_cap_area(PI), SPHERE_AREA, epsilon = 1e-12);
    }

    #[test]
    fn test_area_to_radius_clamps() {
        assert_eq!(area_to_radius(-5.0), 0.0);
        assert_approx_eq!(f64, area_to_radius(100.0), PI);
        assert_eq!(area_to_radius(f64::NAN), 0.0);
    }

    #[test]
    fn test_area_to_radius_inverts_cap_area() {
        for radius in [0.05, 0.3, 1.0, 2.0, 3.0] {
            assert_approx_eq!(
                f64,
                area_to_radius(spherical_cap_area(radius)),
                radius,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_fibonacci_single_point_is_x_axis() {
        let points = fibonacci_sphere(1);
        assert_eq!(points, vec![DVec3::X]);
    }

    #[test]
    fn test_fibonacci_is_order_stable() {
        let points = fibonacci_sphere(50);
        for (index, point) in points.iter().enumerate() {
            assert_eq!(*point, fibonacci_point(index, 50));
        }
        assert!(fibonacci_sphere(0).is_empty());
    }

    #[test]
    fn test_fibonacci_is_roughly_balanced() {
        let points = fibonacci_sphere(200);
        let centroid = points.iter().sum::<DVec3>() / 200.0;
        assert!(centroid.length() < 0.05, "centroid {centroid:?}");
    }

    #[test]
    fn test_tangent_basis_is_orthonormal() {
        for center in [DVec3::X, DVec3::Y, DVec3::Z, DVec3::new(1.0, -2.0, 0.5)] {
            let normal = center.normalize();
            let (b0, b1) = tangent_basis(center);
            assert_approx_eq!(f64, b0.length(), 1.0, epsilon = 1e-12);
            assert_approx_eq!(f64, b1.length(), 1.0, epsilon = 1e-12);
            assert_approx_eq!(f64, b0.dot(b1), 0.0, epsilon = 1e-12);
            assert_approx_eq!(f64, b0.dot(normal), 0.0, epsilon = 1e-12);
            assert_approx_eq!(f64, b1.dot(normal), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tangent_basis_of_zero_center_uses_x_axis() {
        assert_eq!(tangent_basis(DVec3::ZERO), tangent_basis(DVec3::X));
    }

    #[test]
    fn test_exponential_map_zero_offset_returns_center() {
        let center = DVec3::Z;
        let mapped = exponential_map(center, Point::default(), tangent_basis(center));
        assert_eq!(mapped, center);

        let tilted = DVec3::new(0.0, 0.6, 0.8);
        let mapped = exponential_map(tilted, Point::new(1e-15, 0.0), tangent_basis(tilted));
        assert!(angular_distance(mapped, tilted) < 1e-12);
    }

    #[test]
    fn test_exponential_map_distance_and_direction() {
        let center = DVec3::X;
        let basis = tangent_basis(center);
        let mapped = exponential_map(center, Point::new(0.0, 0.4), basis);

        assert_approx_eq!(f64, angular_distance(mapped, center), 0.4, epsilon = 1e-12);
        assert!(mapped.dot(basis.1) > 0.0);
        assert_approx_eq!(f64, mapped.dot(basis.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_move_along_handles_degenerate_direction() {
        assert_eq!(move_along(DVec3::Y, DVec3::Y, 0.5), DVec3::Y);

        let moved = move_along(DVec3::Y, DVec3::X, 0.25);
        assert_approx_eq!(f64, angular_distance(moved, DVec3::Y), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_to_sphere() {
        let scaled = scale_to_sphere(DVec3::new(0.0, 0.0, 2.0), 5000.0);
        assert_eq!(scaled, DVec3::new(0.0, 0.0, 5000.0));
        assert_eq!(scale_to_sphere(DVec3::ZERO, 10.0), DVec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_angular_distance_resolves_tiny_angles() {
        let nudged = move_along(DVec3::X, DVec3::Y, 1e-10);

        assert_approx_eq!(f64, angular_distance(DVec3::X, nudged), 1e-10, epsilon = 1e-15);
        assert_approx_eq!(f64, angular_distance(DVec3::X, -DVec3::X), PI);
        assert_eq!(angular_distance(DVec3::ZERO, DVec3::X), 0.0);
    }
}
