use cubeface_core::ColorImage;
use cubeface_regions::{
    clear_border, close_disk, detect_edges, fill_holes, is_degenerate, region_props, to_gray8,
};
use image::GrayImage;
use log::{debug, info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{BlobParams, CandidateRegion, FiducialError, FIDUCIAL_COUNT};

/// Finds circular fiducial candidates in a raw image.
///
/// Pipeline: luma, Gaussian blur, Canny (fixed thresholds), disk closing,
/// hole filling, border clearing, 8-connected labelling, moment ellipse fit,
/// shape filter.
#[derive(Clone, Debug, Default)]
pub struct BlobDetector {
    params: BlobParams,
}

impl BlobDetector {
    pub fn new(params: BlobParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BlobParams {
        &self.params
    }

    /// Filled, border-cleared foreground mask that the candidates are measured on.
    ///
    /// Images narrower than [`cubeface_regions::MIN_IMAGE_SIDE`] give an empty mask.
    pub fn foreground_mask(&self, image: &ColorImage) -> GrayImage {
        let gray = to_gray8(image);
        if is_degenerate(&gray) {
            debug!(
                "{}x{} image is too small for blob detection",
                image.width, image.height
            );
            return GrayImage::new(gray.width(), gray.height());
        }
        let edges = detect_edges(&gray, self.params.blur_sigma, self.params.canny);
        let closed = close_disk(&edges, self.params.closing_disk_radius);
        clear_border(&fill_holes(&closed))
    }

    /// Every component of the foreground mask, before shape filtering.
    pub fn detect_unfiltered(&self, image: &ColorImage) -> Vec<CandidateRegion> {
        region_props(&self.foreground_mask(image))
            .into_iter()
            .map(CandidateRegion::from)
            .collect()
    }

    /// Detect fiducials. Fails unless exactly [`FIDUCIAL_COUNT`] components pass
    /// the shape filter.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn detect(&self, image: &ColorImage) -> Result<Vec<CandidateRegion>, FiducialError> {
        let all = self.detect_unfiltered(image);
        let total = all.len();

        let kept: Vec<CandidateRegion> = all
            .into_iter()
            .filter(|c| self.params.shape.accepts(c))
            .collect();

        for c in &kept {
            debug!(
                "fiducial candidate at ({:.2}, {:.2}) axes {:.1}/{:.1} area {}",
                c.centroid.x, c.centroid.y, c.major_axis_length, c.minor_axis_length, c.area
            );
        }
        info!("fiducial components: {} total, {} after shape filter", total, kept.len());

        if kept.len() != FIDUCIAL_COUNT {
            warn!("expected {FIDUCIAL_COUNT} fiducials, found {}", kept.len());
            return Err(FiducialError::CandidateCount {
                found: kept.len(),
                expected: FIDUCIAL_COUNT,
            });
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeFilter;
    use nalgebra::Point2;

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    const DARK: [f32; 3] = [0.05, 0.05, 0.05];

    fn disks_image(w: usize, h: usize, centers: &[(f64, f64)], radius: f64) -> ColorImage {
        ColorImage::from_fn(w, h, |x, y| {
            let inside = centers.iter().any(|&(cx, cy)| {
                (x as f64 - cx).powi(2) + (y as f64 - cy).powi(2) <= radius * radius
            });
            if inside {
                DARK
            } else {
                WHITE
            }
        })
    }

    const CENTERS: [(f64, f64); 4] = [(60.0, 60.0), (240.0, 50.0), (50.0, 230.0), (250.0, 250.0)];

    #[test]
    fn finds_four_disks() {
        let img = disks_image(300, 300, &CENTERS, 8.0);
        let found = BlobDetector::default().detect(&img).expect("four fiducials");
        assert_eq!(found.len(), 4);

        for &(cx, cy) in &CENTERS {
            let truth = Point2::new(cx, cy);
            let best = found
                .iter()
                .map(|c| (c.centroid - truth).norm())
                .fold(f64::INFINITY, f64::min);
            assert!(best < 1.0, "no candidate within 1px of ({cx}, {cy}): {best}");
        }
        for c in &found {
            assert!(c.major_axis_length < 70.0 && c.area < 5000);
        }
    }

    #[test]
    fn three_disks_fail_calibration() {
        let img = disks_image(300, 300, &CENTERS[..3], 8.0);
        let err = BlobDetector::default().detect(&img).unwrap_err();
        assert_eq!(
            err,
            FiducialError::CandidateCount {
                found: 3,
                expected: 4
            }
        );
    }

    #[test]
    fn five_disks_fail_calibration() {
        let mut centers = CENTERS.to_vec();
        centers.push((150.0, 150.0));
        let img = disks_image(300, 300, &centers, 8.0);
        let err = BlobDetector::default().detect(&img).unwrap_err();
        assert_eq!(
            err,
            FiducialError::CandidateCount {
                found: 5,
                expected: 4
            }
        );
    }

    #[test]
    fn large_blobs_are_filtered_out() {
        let mut img = disks_image(300, 300, &CENTERS, 8.0);
        // a 90x90 dark square: area and axes well above the marker limits
        for y in 100..190 {
            for x in 100..190 {
                img.set(x, y, DARK);
            }
        }
        let det = BlobDetector::default();
        assert!(det.detect_unfiltered(&img).len() >= 5);
        assert_eq!(det.detect(&img).expect("square rejected").len(), 4);
    }

    #[test]
    fn tighter_shape_filter_rejects_markers() {
        let img = disks_image(300, 300, &CENTERS, 8.0);
        let params = BlobParams {
            shape: ShapeFilter {
                max_area: 50,
                ..ShapeFilter::default()
            },
            ..BlobParams::default()
        };
        let err = BlobDetector::new(params).detect(&img).unwrap_err();
        assert_eq!(
            err,
            FiducialError::CandidateCount {
                found: 0,
                expected: 4
            }
        );
    }

    #[test]
    fn params_deserialize_with_partial_overrides() {
        let params: BlobParams =
            serde_json::from_str(r#"{ "shape": { "max_area": 1200 } }"#).expect("valid json");
        assert_eq!(params.shape.max_area, 1200);
        assert_eq!(params.shape.max_major_axis, 70.0);
        assert_eq!(params.closing_disk_radius, 2);
    }

    #[test]
    fn marker_count_is_not_configurable() {
        let params: BlobParams =
            serde_json::from_str(r#"{ "expected_count": 5 }"#).expect("unknown keys ignored");
        assert_eq!(params, BlobParams::default());

        let img = disks_image(300, 300, &CENTERS, 8.0);
        let found = BlobDetector::new(params).detect(&img).expect("four fiducials");
        assert_eq!(found.len(), FIDUCIAL_COUNT);
        let centroids: Vec<Point2<f64>> = found.iter().map(|c| c.centroid).collect();
        assert!(crate::assign_corners(&centroids, 300, 300, Default::default()).is_ok());
    }

    #[test]
    fn degenerate_images_fail_calibration_without_panicking() {
        for (w, h) in [(0, 0), (0, 5), (5, 0), (1, 1), (2, 2), (3, 1)] {
            let img = ColorImage::from_fn(w, h, |_, _| DARK);
            let err = BlobDetector::default().detect(&img).unwrap_err();
            assert_eq!(
                err,
                FiducialError::CandidateCount {
                    found: 0,
                    expected: 4
                },
                "{w}x{h}"
            );
        }
    }
}
