//! Axis-aligned bounding box helpers used for pruning during tree searches.

use crate::r#type::CoordNum;

/// Compute the tight bounding box of a flat buffer of points.
///
/// Returns `(min, max)`, each of length `dimension`. The buffer must hold at least one point.
pub fn bounding_box<N: CoordNum>(coords: &[N], dimension: usize) -> (Vec<N>, Vec<N>) {
    debug_assert!(coords.len() >= dimension && coords.len() % dimension == 0);

    // Initialize with the first point's values
    let mut min = coords[..dimension].to_vec();
    let mut max = min.clone();

    for point in coords.chunks_exact(dimension).skip(1) {
        for (axis, &value) in point.iter().enumerate() {
            if value < min[axis] {
                min[axis] = value;
            }
            if value > max[axis] {
                max[axis] = value;
            }
        }
    }
    (min, max)
}

/// 1D distance from a value to a range.
#[inline]
pub fn axis_dist<N: CoordNum>(k: N, min: N, max: N) -> N {
    if k < min {
        min - k
    } else if k <= max {
        N::zero()
    } else {
        k - max
    }
}

/// Squared distance from `point` to the closest point of the box `[min, max]`.
///
/// This never overestimates the distance from `point` to anything inside the box.
#[inline]
pub fn box_distance2<N: CoordNum>(point: &[N], min: &[N], max: &[N]) -> N {
    point
        .iter()
        .zip(min.iter().zip(max.iter()))
        .fold(N::zero(), |acc, (&p, (&lo, &hi))| {
            let d = axis_dist(p, lo, hi);
            acc + d * d
        })
}

/// Whether any point of the box `[min, max]` lies within `radius` of `point`.
///
/// `radius2` must be `radius * radius`; it is passed in so hot loops compute it once.
#[inline]
pub fn intersects_radius<N: CoordNum>(
    point: &[N],
    min: &[N],
    max: &[N],
    radius: N,
    radius2: N,
) -> bool {
    let mut dist2 = N::zero();
    for (axis, &p) in point.iter().enumerate() {
        let d = axis_dist(p, min[axis], max[axis]);
        if d > radius {
            // one axis alone is already too far
            return false;
        }
        dist2 = dist2 + d * d;
    }
    dist2 <= radius2
}

/// Squared euclidean distance between two points.
#[inline]
pub fn sq_dist<N: CoordNum>(a: &[N], b: &[N]) -> N {
    a.iter().zip(b.iter()).fold(N::zero(), |acc, (&x, &y)| {
        let d = x - y;
        acc + d * d
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn computes_tight_bounds() {
        let coords = [2.0f64, 3.0, -1.0, 5.0, 4.0, 0.0];
        let (min, max) = bounding_box(&coords, 2);
        assert_eq!(min, vec![-1.0, 0.0]);
        assert_eq!(max, vec![4.0, 5.0]);
    }

    #[test]
    fn box_distance_is_zero_inside() {
        let min = [0.0f32, 0.0];
        let max = [2.0f32, 2.0];
        assert_eq!(box_distance2(&[1.0, 1.0], &min, &max), 0.0);
        assert_eq!(box_distance2(&[2.0, 0.0], &min, &max), 0.0);
    }

    #[test]
    fn box_distance_to_faces_and_corners() {
        let min = [0.0f64, 0.0, 0.0];
        let max = [1.0f64, 1.0, 1.0];
        // face
        assert_eq!(box_distance2(&[3.0, 0.5, 0.5], &min, &max), 4.0);
        // corner
        assert_eq!(box_distance2(&[-1.0, 2.0, 0.5], &min, &max), 2.0);
    }

    #[test]
    fn radius_intersection() {
        let min = [0.0f64, 0.0];
        let max = [1.0f64, 1.0];
        assert!(intersects_radius(&[2.0, 0.5], &min, &max, 1.0, 1.0));
        assert!(!intersects_radius(&[2.5, 0.5], &min, &max, 1.0, 1.0));
        // each axis gap is within the radius, but the corner is not
        assert!(!intersects_radius(&[1.9, 1.9], &min, &max, 1.0, 1.0));
        assert!(intersects_radius(&[1.5, 1.5], &min, &max, 1.0, 1.0));
    }

    #[test]
    fn squared_distance() {
        assert_eq!(sq_dist(&[0.0f64, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(sq_dist(&[1.0f32], &[-1.0]), 4.0);
    }
}
