//! Matching fiducial centroids to the canonical target corners.

use cubeface_core::{CornerCorrespondences, CornerId, Correspondence};
use log::debug;
use nalgebra::Point2;

use crate::{AssignmentStrategy, FiducialError};

/// Number of fiducials on the target, one per corner.
pub const FIDUCIAL_COUNT: usize = 4;

/// Offset added to the canonical corner coordinates.
///
/// Destinations are `(1, 1)`, `(W + 1, 1)`, `(1, H + 1)` and `(W + 1, H + 1)`;
/// changing this shifts the whole rectified output.
pub const DESTINATION_OFFSET: f64 = 1.0;

/// Canonical destination points in [`CornerId::ALL`] order for a `width x height` image.
pub fn canonical_destinations(width: usize, height: usize) -> [Point2<f64>; 4] {
    let (w, h) = (width as f64, height as f64);
    let o = DESTINATION_OFFSET;
    [
        Point2::new(o, o),
        Point2::new(w + o, o),
        Point2::new(o, h + o),
        Point2::new(w + o, h + o),
    ]
}

/// Pair each of the four centroids with a canonical corner.
///
/// Output is always in TL, TR, BL, BR order and uses every centroid once.
pub fn assign_corners(
    centroids: &[Point2<f64>],
    width: usize,
    height: usize,
    strategy: AssignmentStrategy,
) -> Result<CornerCorrespondences, FiducialError> {
    let centroids: &[Point2<f64>; 4] = centroids
        .try_into()
        .map_err(|_| FiducialError::CandidateCount {
            found: centroids.len(),
            expected: FIDUCIAL_COUNT,
        })?;
    let dst = canonical_destinations(width, height);

    let order = match strategy {
        AssignmentStrategy::Greedy => greedy_order(centroids, &dst),
        AssignmentStrategy::Exhaustive => exhaustive_order(centroids, &dst),
    };

    let pairs: [Correspondence; 4] = std::array::from_fn(|k| Correspondence {
        src: centroids[order[k]],
        dst: dst[k],
    });
    for corner in CornerId::ALL {
        let c = &pairs[corner.index()];
        debug!(
            "{:?}: ({:.2}, {:.2}) -> ({:.1}, {:.1})",
            corner, c.src.x, c.src.y, c.dst.x, c.dst.y
        );
    }
    Ok(CornerCorrespondences::new(pairs))
}

/// `order[k]` is the index of the centroid assigned to destination `k`.
fn greedy_order(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> [usize; 4] {
    let mut used = [false; 4];
    let mut order = [0usize; 4];
    for (k, d) in dst.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for (i, s) in src.iter().enumerate() {
            if used[i] {
                continue;
            }
            let dist = (s - d).norm();
            if best.is_none_or(|(_, bd)| dist < bd) {
                best = Some((i, dist));
            }
        }
        // four destinations, four candidates: there is always one left
        let (i, _) = best.unwrap_or((k, 0.0));
        used[i] = true;
        order[k] = i;
    }
    order
}

fn exhaustive_order(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> [usize; 4] {
    let mut best = ([0, 1, 2, 3], f64::INFINITY);
    for perm in permutations4() {
        let cost: f64 = perm
            .iter()
            .zip(dst.iter())
            .map(|(&i, d)| (src[i] - d).norm())
            .sum();
        if cost < best.1 {
            best = (perm, cost);
        }
    }
    best.0
}

/// All 24 permutations of `0..4` in lexicographic order.
fn permutations4() -> Vec<[usize; 4]> {
    let mut out = Vec::with_capacity(24);
    for a in 0..4 {
        for b in (0..4).filter(|&b| b != a) {
            for c in (0..4).filter(|&c| c != a && c != b) {
                let d = 6 - a - b - c;
                out.push([a, b, c, d]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near_corners() -> [Point2<f64>; 4] {
        [
            Point2::new(22.0, 18.0),
            Point2::new(377.0, 24.0),
            Point2::new(19.0, 383.0),
            Point2::new(381.0, 376.0),
        ]
    }

    #[test]
    fn destinations_carry_the_offset() {
        let d = canonical_destinations(400, 300);
        assert_eq!(d[0], Point2::new(1.0, 1.0));
        assert_eq!(d[1], Point2::new(401.0, 1.0));
        assert_eq!(d[2], Point2::new(1.0, 301.0));
        assert_eq!(d[3], Point2::new(401.0, 301.0));
    }

    #[test]
    fn greedy_assignment_is_permutation_invariant() {
        let pts = near_corners();
        let reference = assign_corners(&pts, 400, 400, AssignmentStrategy::Greedy).unwrap();
        for perm in permutations4() {
            let shuffled: Vec<Point2<f64>> = perm.iter().map(|&i| pts[i]).collect();
            let out = assign_corners(&shuffled, 400, 400, AssignmentStrategy::Greedy).unwrap();
            assert_eq!(out, reference, "permutation {perm:?}");
        }
        assert_eq!(reference.get(CornerId::TopLeft).src, pts[0]);
        assert_eq!(reference.get(CornerId::TopRight).src, pts[1]);
        assert_eq!(reference.get(CornerId::BottomLeft).src, pts[2]);
        assert_eq!(reference.get(CornerId::BottomRight).src, pts[3]);
    }

    #[test]
    fn assignment_is_a_bijection() {
        // all four candidates huddle near the top-left corner
        let pts = [
            Point2::new(5.0, 5.0),
            Point2::new(8.0, 5.0),
            Point2::new(5.0, 9.0),
            Point2::new(9.0, 9.0),
        ];
        for strategy in [AssignmentStrategy::Greedy, AssignmentStrategy::Exhaustive] {
            let out = assign_corners(&pts, 100, 100, strategy).unwrap();
            let mut used: Vec<usize> = out
                .sources()
                .iter()
                .map(|s| pts.iter().position(|p| p == s).unwrap())
                .collect();
            used.sort_unstable();
            assert_eq!(used, vec![0, 1, 2, 3], "{strategy:?}");
        }
    }

    #[test]
    fn greedy_can_lose_to_exhaustive_on_skewed_layouts() {
        // TL grabs the candidate that BL needs more
        let pts = [
            Point2::new(10.0, 60.0),
            Point2::new(95.0, 5.0),
            Point2::new(50.0, 100.0),
            Point2::new(95.0, 95.0),
        ];
        let greedy = assign_corners(&pts, 100, 100, AssignmentStrategy::Greedy).unwrap();
        let exact = assign_corners(&pts, 100, 100, AssignmentStrategy::Exhaustive).unwrap();

        let total = |c: &CornerCorrespondences| -> f64 {
            c.pairs.iter().map(|p| (p.src - p.dst).norm()).sum()
        };
        assert!(total(&exact) <= total(&greedy));
        assert_eq!(greedy.get(CornerId::TopLeft).src, pts[0]);
    }

    #[test]
    fn greedy_tie_goes_to_lowest_input_index() {
        // both candidates are exactly 10 px from TL = (1, 1)
        let a = Point2::new(11.0, 1.0);
        let b = Point2::new(1.0, 11.0);
        let rest = [Point2::new(91.0, 91.0), Point2::new(101.0, 1.0)];
        for first in [a, b] {
            let second = if first == a { b } else { a };
            let pts = [first, second, rest[0], rest[1]];
            let out = assign_corners(&pts, 100, 100, AssignmentStrategy::Greedy).unwrap();
            assert_eq!(out.get(CornerId::TopLeft).src, first);
            assert_eq!(out.get(CornerId::TopRight).src, rest[1]);
        }
    }

    #[test]
    fn exhaustive_tie_goes_to_first_permutation() {
        // on the main diagonal: equally far from TR and BL, so swapping them
        // leaves the total cost unchanged
        let a = Point2::new(41.0, 41.0);
        let b = Point2::new(61.0, 61.0);
        let (tl, br) = (Point2::new(1.0, 1.0), Point2::new(101.0, 101.0));
        for first in [a, b] {
            let second = if first == a { b } else { a };
            let pts = [first, second, tl, br];
            let out = assign_corners(&pts, 100, 100, AssignmentStrategy::Exhaustive).unwrap();
            assert_eq!(out.get(CornerId::TopLeft).src, tl);
            assert_eq!(out.get(CornerId::BottomRight).src, br);
            // [2, 0, 1, 3] precedes [2, 1, 0, 3]
            assert_eq!(out.get(CornerId::TopRight).src, first);
            assert_eq!(out.get(CornerId::BottomLeft).src, second);
        }
    }

    #[test]
    fn wrong_candidate_count_is_rejected() {
        let pts = near_corners();
        let err = assign_corners(&pts[..3], 400, 400, AssignmentStrategy::Greedy).unwrap_err();
        assert_eq!(
            err,
            FiducialError::CandidateCount {
                found: 3,
                expected: 4
            }
        );
    }
}
