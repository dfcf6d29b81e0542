//! Core types for fiducial-based grid face reading.
//!
//! This crate is small and purely geometric: an `f32` RGB image container,
//! bilinear sampling, point correspondences, and homography estimation and
//! warping. It does not depend on any image decoding library.

mod correspondence;
mod homography;
mod image;
mod logger;

pub use correspondence::{CornerCorrespondences, CornerId, Correspondence};
pub use homography::{homography_from_4pt, warp_perspective, Homography};
pub use image::{luma, sample_bilinear, ColorImage, PixelRect, Rgb};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
