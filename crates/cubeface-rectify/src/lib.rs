//! Projective rectification from four corner correspondences.
//!
//! The raw image is warped into a canvas of its own size so that the
//! fiducial centroids land on the canonical corners. The warped canvas is then
//! re-segmented (auto-threshold Canny, square dilation, hole filling) and
//! cropped to the largest component plus a fixed margin.

mod error;
mod params;
mod rectifier;

pub use error::RectifyError;
pub use params::RectifyParams;
pub use rectifier::{
    expand_crop, find_subject, fit_homography, warp_to_canvas, RectifiedImage, Rectifier,
};
