//! Stateless measurements over already-gated points.

use crate::point::Point;

/// Rays shorter than this are treated as degenerate.
const MIN_RAY_LENGTH: f32 = 1e-4;

/// Angle in degrees at `vertex` between the rays to `a` and `c`, in `[0, 180]`.
///
/// Returns `None` when either ray is degenerate, since the angle is undefined.
pub fn angle(a: Point, vertex: Point, c: Point) -> Option<f32> {
    let v1 = a - vertex;
    let v2 = c - vertex;

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 < MIN_RAY_LENGTH || mag2 < MIN_RAY_LENGTH {
        return None;
    }

    let cos_angle = (v1.dot(v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

pub fn distance(p: Point, q: Point) -> f32 {
    p.squared_distance(q).sqrt()
}

/// Whether `a` sits above `b` by more than `margin`.
pub fn is_above(a: Point, b: Point, margin: f32) -> bool {
    a.y() + margin < b.y()
}

/// Whether `a` and `b` share a column within `tolerance`.
pub fn vertically_aligned(a: Point, b: Point, tolerance: f32) -> bool {
    (a.x() - b.x()).abs() <= tolerance
}

/// Whether `a` and `b` share a row within `tolerance`.
pub fn horizontally_aligned(a: Point, b: Point, tolerance: f32) -> bool {
    (a.y() - b.y()).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y).unwrap()
    }

    mod angle_tests {
        use super::*;

        #[test]
        fn straight() {
            assert_approx_eq!(angle(p(0.0, 0.0), p(0.5, 0.0), p(1.0, 0.0)).unwrap(), 180.0, 1e-3);
        }

        #[test]
        fn right() {
            assert_approx_eq!(angle(p(0.0, 0.0), p(0.5, 0.0), p(0.5, 0.5)).unwrap(), 90.0, 1e-3);
        }

        #[test]
        fn folded() {
            assert_approx_eq!(angle(p(1.0, 0.0), p(0.0, 0.0), p(1.0, 0.0)).unwrap(), 0.0, 1e-2);
        }

        #[test]
        fn forty_five() {
            assert_approx_eq!(angle(p(1.0, 0.0), p(0.0, 0.0), p(1.0, 1.0)).unwrap(), 45.0, 1e-3);
        }

        #[test]
        fn symmetric_in_rays() {
            let a = p(0.2, 0.9);
            let v = p(0.4, 0.4);
            let c = p(0.8, 0.1);
            assert_approx_eq!(angle(a, v, c).unwrap(), angle(c, v, a).unwrap(), 1e-4);
        }

        #[test]
        fn degenerate_ray() {
            assert!(angle(p(0.5, 0.5), p(0.5, 0.5), p(1.0, 0.0)).is_none());
            assert!(angle(p(0.0, 0.0), p(0.5, 0.5), p(0.5, 0.5)).is_none());
        }
    }

    #[test]
    fn euclidean_distance() {
        assert_approx_eq!(distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0);
    }

    #[test]
    fn above_uses_image_coordinates() {
        assert!(is_above(p(0.0, 0.1), p(0.0, 0.5), 0.0));
        assert!(!is_above(p(0.0, 0.5), p(0.0, 0.1), 0.0));
        assert!(!is_above(p(0.0, 0.45), p(0.0, 0.5), 0.1));
    }

    #[test]
    fn alignment() {
        assert!(vertically_aligned(p(0.50, 0.1), p(0.52, 0.9), 0.05));
        assert!(!vertically_aligned(p(0.50, 0.1), p(0.60, 0.9), 0.05));
        assert!(horizontally_aligned(p(0.1, 0.30), p(0.9, 0.31), 0.05));
        assert!(!horizontally_aligned(p(0.1, 0.30), p(0.9, 0.50), 0.05));
    }
}
