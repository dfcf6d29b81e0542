use cubeface_regions::CannyThresholds;
use serde::{Deserialize, Serialize};

/// Parameters of the subject re-detection and crop after warping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyParams {
    /// Gaussian sigma applied to the warped luma image before Canny.
    pub blur_sigma: f32,
    pub canny: CannyThresholds,
    /// Side of the square used to dilate the edge map.
    pub dilate_square_size: u8,
    /// Pixels added on every side of the subject bounding box.
    pub crop_margin: usize,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny: CannyThresholds::Auto,
            dilate_square_size: 3,
            crop_margin: 10,
        }
    }
}
