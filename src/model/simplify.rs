//! Douglas-Peucker path simplification.
//!
//! Distances are measured in the (longitude, latitude) plane. Elevation travels with the
//! retained points but never influences which points are retained. A tolerance of zero
//! keeps every point that is not exactly collinear with its chord; negative tolerances
//! keep everything.

use tracing::debug;

use crate::common::types::*;


/// Default number of binary search refinements in [`simplify_to_count`]
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Relative deviation from the target count accepted by [`simplify_to_count`]
const COUNT_SLACK: f64 = 0.05;

/// Initial upper tolerance bound as a fraction of the bounding box diagonal
const INITIAL_HIGH_FRACTION: f64 = 0.1;


/// Distance from `p` to the line through `a` and `b`; point distance when `a` and `b` coincide
fn perpendicular_distance(p: &GeoPoint, a: &GeoPoint, b: &GeoPoint) -> Coord {
    let dx = b.longitude - a.longitude;
    let dy = b.latitude - a.latitude;

    if dx==0.0 && dy==0.0 {
        return (p.longitude - a.longitude).hypot(p.latitude - a.latitude);
    }

    let cross = dx*(a.latitude - p.latitude) - dy*(a.longitude - p.longitude);
    cross.abs()/dx.hypot(dy)
}

/// Indices of the points kept for `tolerance`, in ascending order
pub fn simplify_indices(points: &[GeoPoint], tolerance: Coord) -> Vec<GeoPointIndex> {
    let n = points.len();
    if n<=2 {
        return (0..n).collect();
    }

    let mut kept = vec![false; n];
    kept[0] = true;
    kept[n-1] = true;

    // explicit work stack; near-collinear input would otherwise recurse O(n) deep
    let mut ranges = vec![(0, n-1)];
    while let Some((start, end)) = ranges.pop() {
        if end<=start+1 {
            continue;
        }

        let (a, b) = (&points[start], &points[end]);
        let mut max_distance = f64::NEG_INFINITY;
        let mut max_index = start;
        for (i, p) in points.iter().enumerate().take(end).skip(start+1) {
            let distance = perpendicular_distance(p, a, b);
            if distance>max_distance {
                max_distance = distance;
                max_index = i;
            }
        }

        if max_distance>tolerance {
            kept[max_index] = true;
            ranges.push((max_index, end));
            ranges.push((start, max_index));
        }
    }

    kept.iter()
        .enumerate()
        .filter_map(|(i, &k)| if k {Some(i)} else {None})
        .collect()
}

/// Simplifies a path so that no dropped point deviates more than `tolerance` from the result
pub fn simplify(points: &[GeoPoint], tolerance: Coord) -> Vec<GeoPoint> {
    simplify_indices(points, tolerance)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

fn within_slack(count: usize, target_count: usize) -> bool {
    count==target_count || (count as f64 - target_count as f64).abs()<=COUNT_SLACK*target_count as f64
}

/// Simplifies a path to roughly `target_count` points by searching for a tolerance.
///
/// The result may miss the target by more than 5% when the search does not converge
/// within `max_iterations` refinements.
pub fn simplify_to_count(points: &[GeoPoint], target_count: usize, max_iterations: usize) -> Vec<GeoPoint> {
    if points.len()<=target_count {
        return points.to_vec();
    }

    let diagonal = BoundingBox::from_points(points).diagonal();
    let mut low: Coord = 0.0;
    let mut high: Coord = diagonal*INITIAL_HIGH_FRACTION;

    let mut result = simplify(points, high);
    while result.len()>target_count && high<diagonal {
        high = (high*2.0).min(diagonal);
        result = simplify(points, high);
    }
    debug!(target_count, high, count = result.len(), "tolerance search bounds");

    for iteration in 0..max_iterations {
        let mid = (low + high)/2.0;
        result = simplify(points, mid);
        let count = result.len();
        debug!(iteration, tolerance = mid, count, "tolerance search step");

        if within_slack(count, target_count) {
            break;
        }
        if count>target_count {
            low = mid;
        } else {
            high = mid;
        }
    }

    result
}
