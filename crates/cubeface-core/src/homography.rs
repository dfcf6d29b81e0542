use crate::{sample_bilinear, ColorImage};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Projective transform `dst ~ H * src`, normalized so that `h33 = 1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        Point2::new(v[0] / w, v[1] / w)
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.h.try_inverse()?;
        normalize_homography(inv).map(Self::new)
    }
}

// Hartley normalization: translate to centroid, scale so mean distance = sqrt(2)
fn normalize_points(pts: &[Point2<f64>]) -> (Vec<Point2<f64>>, Matrix3<f64>) {
    let n = pts.len() as f64;
    let (sx, sy) = pts
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (cx, cy) = (sx / n, sy / n);

    let mean_dist = pts
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);

    let out = pts
        .iter()
        .map(|p| Point2::new(s * (p.x - cx), s * (p.y - cy)))
        .collect();
    (out, t)
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

fn denormalize_homography(
    hn: Matrix3<f64>,
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Matrix3<f64>> {
    let t_dst_inv = t_dst.try_inverse()?;
    normalize_homography(t_dst_inv * hn * t_src)
}

/// Exact homography from 4 correspondences (`dst ~ H * src`).
///
/// Solves the 8x8 linear system with `h33 = 1` on Hartley-normalized points.
/// Returns `None` for degenerate configurations (three collinear points,
/// repeated points).
pub fn homography_from_4pt(src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> Option<Homography> {
    let (src_n, t_src) = normalize_points(src);
    let (dst_n, t_dst) = normalize_points(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (src_n[k].x, src_n[k].y);
        let (u, v) = (dst_n[k].x, dst_n[k].y);

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = r0 + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;
    if x.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let hn = Matrix3::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );
    denormalize_homography(hn, t_src, t_dst).map(Homography::new)
}

/// Warp `src` through `h_dst_from_src` into a `out_w x out_h` canvas.
///
/// Every output pixel is mapped back with the inverse transform and sampled
/// bilinearly; samples falling outside `src` are black. Returns `None` if the
/// homography is singular.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(src, h_dst_from_src), fields(width = src.width, height = src.height))
)]
pub fn warp_perspective(
    src: &ColorImage,
    h_dst_from_src: &Homography,
    out_w: usize,
    out_h: usize,
) -> Option<ColorImage> {
    let h_src_from_dst = h_dst_from_src.inverse()?;

    let mut out = ColorImage::new(out_w, out_h);
    for y in 0..out_h {
        for x in 0..out_w {
            let p = h_src_from_dst.apply(Point2::new(x as f64, y as f64));
            if !p.x.is_finite() || !p.y.is_finite() {
                continue;
            }
            out.set(x, y, sample_bilinear(src, p.x, p.y));
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        assert!(
            (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    fn ground_truth() -> Homography {
        Homography::new(Matrix3::new(
            0.8, 0.05, 120.0, //
            -0.02, 1.1, 80.0, //
            0.0009, -0.0004, 1.0,
        ))
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = ground_truth();
        let inv = h.inverse().expect("invertible");
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, -20.0),
            Point2::new(320.0, 200.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-6);
        }
    }

    #[test]
    fn four_points_recover_projective_map() {
        let h = ground_truth();
        let src = [
            Point2::new(0.0, 0.0),
            Point2::new(180.0, 0.0),
            Point2::new(0.0, 130.0),
            Point2::new(180.0, 130.0),
        ];
        let dst = src.map(|p| h.apply(p));
        let recovered = homography_from_4pt(&src, &dst).expect("recoverable");
        for p in [
            Point2::new(10.0, 10.0),
            Point2::new(60.0, 40.0),
            Point2::new(150.0, 120.0),
        ] {
            assert_close(recovered.apply(p), h.apply(p), 1e-6);
        }
    }

    #[test]
    fn identity_correspondences_give_identity() {
        let pts = [
            Point2::new(20.0, 20.0),
            Point2::new(380.0, 20.0),
            Point2::new(20.0, 380.0),
            Point2::new(380.0, 380.0),
        ];
        let h = homography_from_4pt(&pts, &pts).expect("identity");
        approx::assert_abs_diff_eq!(h.h, Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let collapsed = [Point2::new(3.0, 3.0); 4];
        let dst = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        assert!(homography_from_4pt(&collapsed, &dst).is_none());
    }

    #[test]
    fn warp_with_translation_shifts_content() {
        let src = ColorImage::from_fn(6, 6, |x, y| {
            if x == 2 && y == 3 {
                [1.0, 0.0, 0.0]
            } else {
                [0.0, 0.0, 1.0]
            }
        });
        let shift = Homography::new(Matrix3::new(
            1.0, 0.0, 1.0, //
            0.0, 1.0, -1.0, //
            0.0, 0.0, 1.0,
        ));
        let out = warp_perspective(&src, &shift, 6, 6).expect("invertible");
        assert_eq!(out.get(3, 2), [1.0, 0.0, 0.0]);
        // column 0 maps to x = -1 in the source
        assert_eq!(out.get(0, 0), [0.0, 0.0, 0.0]);
    }
}
