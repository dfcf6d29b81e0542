use cubeface_regions::CannyThresholds;
use serde::{Deserialize, Serialize};

use crate::types::CandidateRegion;

/// Size limits a component must stay strictly below to count as a fiducial.
///
/// The defaults are tuned for markers a few tens of pixels across at the
/// expected capture distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeFilter {
    pub max_major_axis: f64,
    pub max_minor_axis: f64,
    pub max_area: usize,
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self {
            max_major_axis: 70.0,
            max_minor_axis: 70.0,
            max_area: 5000,
        }
    }
}

impl ShapeFilter {
    pub fn accepts(&self, region: &CandidateRegion) -> bool {
        region.major_axis_length < self.max_major_axis
            && region.minor_axis_length < self.max_minor_axis
            && region.area < self.max_area
    }
}

/// Parameters of the fiducial blob detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobParams {
    /// Gaussian sigma applied to the luma image before Canny.
    pub blur_sigma: f32,
    pub canny: CannyThresholds,
    /// Radius of the disk used to close small gaps in the edge map.
    pub closing_disk_radius: u8,
    pub shape: ShapeFilter,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            canny: CannyThresholds::Fixed {
                low: 20.0,
                high: 50.0,
            },
            closing_disk_radius: 2,
            shape: ShapeFilter::default(),
        }
    }
}

/// How the four candidates are matched to the canonical corners.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Walk TL, TR, BL, BR and take the nearest unused candidate each time.
    ///
    /// Not a global optimum: a strongly rotated target or an almost
    /// symmetric layout can swap corners.
    #[default]
    Greedy,
    /// Try all 24 bijections and keep the one with the smallest summed distance.
    Exhaustive,
}
