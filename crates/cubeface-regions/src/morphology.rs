//! Binary morphology on 0/255 masks.

use std::collections::HashSet;

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_close, grayscale_dilate, Mask};
use imageproc::region_labelling::{connected_components, Connectivity};

use crate::is_degenerate;

const FOREGROUND: Luma<u8> = Luma([255]);
const BACKGROUND: Luma<u8> = Luma([0]);

/// Morphological closing with a disk of the given radius.
pub fn close_disk(mask: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return mask.clone();
    }
    grayscale_close(mask, &Mask::disk(radius))
}

/// Dilation with a `size x size` square. An even `size` acts like `size + 1`.
pub fn dilate_square(mask: &GrayImage, size: u8) -> GrayImage {
    let radius = size / 2;
    if radius == 0 {
        return mask.clone();
    }
    grayscale_dilate(mask, &Mask::square(radius))
}

fn border_labels(labels: &image::ImageBuffer<Luma<u32>, Vec<u32>>) -> HashSet<u32> {
    let (w, h) = labels.dimensions();
    let mut out = HashSet::new();
    if w == 0 || h == 0 {
        return out;
    }
    for x in 0..w {
        out.insert(labels.get_pixel(x, 0)[0]);
        out.insert(labels.get_pixel(x, h - 1)[0]);
    }
    for y in 0..h {
        out.insert(labels.get_pixel(0, y)[0]);
        out.insert(labels.get_pixel(w - 1, y)[0]);
    }
    out.remove(&0);
    out
}

/// Fill holes: background pixels that are not 4-connected to the image border
/// become foreground.
pub fn fill_holes(mask: &GrayImage) -> GrayImage {
    if is_degenerate(mask) {
        // every pixel lies on the border
        return mask.clone();
    }
    let inverted = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            BACKGROUND
        } else {
            FOREGROUND
        }
    });
    let labels = connected_components(&inverted, Connectivity::Four, BACKGROUND);
    let outside = border_labels(&labels);

    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let label = labels.get_pixel(x, y)[0];
        if label == 0 || !outside.contains(&label) {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

/// Remove every 8-connected foreground component that touches the image border.
pub fn clear_border(mask: &GrayImage) -> GrayImage {
    if is_degenerate(mask) {
        return GrayImage::new(mask.width(), mask.height());
    }
    let labels = connected_components(mask, Connectivity::Eight, BACKGROUND);
    let touching = border_labels(&labels);

    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let label = labels.get_pixel(x, y)[0];
        if label != 0 && !touching.contains(&label) {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}
