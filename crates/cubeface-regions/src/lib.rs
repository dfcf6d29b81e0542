//! Binary-image building blocks shared by the fiducial detector and the
//! rectifier.
//!
//! Everything operates on `image::GrayImage` masks holding 0 (background) or
//! 255 (foreground) and delegates the heavy lifting to `imageproc`:
//! - [`edges`]: luma conversion, Gaussian smoothing, Canny with fixed or
//!   automatic thresholds.
//! - [`morphology`]: disk closing, square dilation, hole filling, border clearing.
//! - [`props`]: 8-connected labelling with area, centroid, ellipse axes and
//!   bounding box per component.

use image::GrayImage;

/// Smallest width and height the edge and labelling primitives process.
/// Narrower images yield empty masks and no regions.
pub const MIN_IMAGE_SIDE: u32 = 3;

/// True when either side of `img` is below [`MIN_IMAGE_SIDE`].
pub fn is_degenerate(img: &GrayImage) -> bool {
    img.width() < MIN_IMAGE_SIDE || img.height() < MIN_IMAGE_SIDE
}

pub mod edges;
pub mod morphology;
pub mod props;

pub use edges::{auto_canny_thresholds, detect_edges, smooth, to_gray8, CannyThresholds};
pub use morphology::{clear_border, close_disk, dilate_square, fill_holes};
pub use props::{region_props, RegionProps};
