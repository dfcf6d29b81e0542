//! Luminance conversion, smoothing and Canny edge detection.

use cubeface_core::{luma, ColorImage};
use image::{GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use serde::{Deserialize, Serialize};

use crate::is_degenerate;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Blur applied inside `imageproc::edges::canny` before the Sobel step.
const CANNY_INNER_SIGMA: f32 = 1.4;
/// Fraction of pixels assumed not to be edges when picking automatic thresholds.
const AUTO_NON_EDGE_FRACTION: f64 = 0.7;
/// Ratio of the low to the high automatic threshold.
const AUTO_LOW_RATIO: f32 = 0.4;
const AUTO_HISTOGRAM_BINS: usize = 64;

/// Hysteresis thresholds for Canny, in Sobel gradient-magnitude units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CannyThresholds {
    Fixed { low: f32, high: f32 },
    /// Derive the pair from the gradient-magnitude histogram of the input.
    #[default]
    Auto,
}

/// Quantize the luma of an RGB image to 8 bits.
pub fn to_gray8(img: &ColorImage) -> GrayImage {
    let mut out = GrayImage::new(img.width as u32, img.height as u32);
    for (dst, &px) in out.pixels_mut().zip(img.data.iter()) {
        *dst = Luma([(luma(px).clamp(0.0, 1.0) * 255.0).round() as u8]);
    }
    out
}

/// Gaussian smoothing; a non-positive sigma returns the input unchanged.
pub fn smooth(gray: &GrayImage, sigma: f32) -> GrayImage {
    if sigma > 0.0 {
        gaussian_blur_f32(gray, sigma)
    } else {
        gray.clone()
    }
}

/// Pick `(low, high)` the way the classic "default" Canny does.
///
/// Gradient magnitudes (computed exactly as `canny` computes them) are
/// binned into a 64-bin histogram relative to the maximum; `high` is the
/// upper edge of the first bin where the cumulative count exceeds 70% of the
/// pixels, `low` is 40% of it.
pub fn auto_canny_thresholds(gray: &GrayImage) -> (f32, f32) {
    let blurred = gaussian_blur_f32(gray, CANNY_INNER_SIGMA);
    let gx = horizontal_sobel(&blurred);
    let gy = vertical_sobel(&blurred);

    let mags: Vec<f32> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| {
            let (x, y) = (x[0] as f32, y[0] as f32);
            (x * x + y * y).sqrt()
        })
        .collect();

    let max = mags.iter().copied().fold(0.0f32, f32::max);
    if mags.is_empty() || max <= 0.0 {
        // flat image: nothing can pass
        return (1.0, 1.0);
    }

    let mut hist = [0usize; AUTO_HISTOGRAM_BINS];
    for &m in &mags {
        let bin = ((m / max) * AUTO_HISTOGRAM_BINS as f32) as usize;
        hist[bin.min(AUTO_HISTOGRAM_BINS - 1)] += 1;
    }

    let limit = AUTO_NON_EDGE_FRACTION * mags.len() as f64;
    let mut cumulative = 0usize;
    let mut bin = AUTO_HISTOGRAM_BINS - 1;
    for (i, &count) in hist.iter().enumerate() {
        cumulative += count;
        if cumulative as f64 > limit {
            bin = i;
            break;
        }
    }

    let high = (bin + 1) as f32 / AUTO_HISTOGRAM_BINS as f32 * max;
    (AUTO_LOW_RATIO * high, high)
}

/// Smooth with `sigma`, then run Canny. Returns a 0/255 edge map, all zero for
/// degenerate images.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn detect_edges(gray: &GrayImage, sigma: f32, thresholds: CannyThresholds) -> GrayImage {
    if is_degenerate(gray) {
        log::debug!("{}x{} image too small for canny", gray.width(), gray.height());
        return GrayImage::new(gray.width(), gray.height());
    }
    let smoothed = smooth(gray, sigma);
    let (low, high) = match thresholds {
        CannyThresholds::Fixed { low, high } => (low, high),
        CannyThresholds::Auto => auto_canny_thresholds(&smoothed),
    };
    log::debug!("canny thresholds low={low:.2} high={high:.2}");
    canny(&smoothed, low, high)
}
