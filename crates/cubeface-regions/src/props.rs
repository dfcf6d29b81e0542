//! Connected-component labelling and per-region shape statistics.

use cubeface_core::PixelRect;
use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::is_degenerate;

/// Shape statistics of one 8-connected foreground component.
///
/// The axis lengths belong to the ellipse that has the same normalized second
/// central moments as the region (each pixel treated as a unit square).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionProps {
    /// Component label, starting at 1.
    pub label: u32,
    /// Pixel count.
    pub area: usize,
    pub centroid: Point2<f64>,
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    /// Tight bounding box.
    pub bbox: PixelRect,
}

#[derive(Clone, Copy)]
struct Moments {
    n: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Moments {
    fn new() -> Self {
        Self {
            n: 0.0,
            sx: 0.0,
            sy: 0.0,
            sxx: 0.0,
            syy: 0.0,
            sxy: 0.0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        }
    }

    fn push(&mut self, x: u32, y: u32) {
        let (fx, fy) = (x as f64, y as f64);
        self.n += 1.0;
        self.sx += fx;
        self.sy += fy;
        self.sxx += fx * fx;
        self.syy += fy * fy;
        self.sxy += fx * fy;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn finish(&self, label: u32) -> RegionProps {
        let cx = self.sx / self.n;
        let cy = self.sy / self.n;

        // 1/12 is the variance of a unit-width pixel
        let uxx = (self.sxx / self.n - cx * cx).max(0.0) + 1.0 / 12.0;
        let uyy = (self.syy / self.n - cy * cy).max(0.0) + 1.0 / 12.0;
        let uxy = self.sxy / self.n - cx * cy;

        let common = ((uxx - uyy).powi(2) + 4.0 * uxy * uxy).sqrt();
        let major = 2.0 * std::f64::consts::SQRT_2 * (uxx + uyy + common).sqrt();
        let minor = 2.0 * std::f64::consts::SQRT_2 * (uxx + uyy - common).max(0.0).sqrt();

        RegionProps {
            label,
            area: self.n as usize,
            centroid: Point2::new(cx, cy),
            major_axis_length: major,
            minor_axis_length: minor,
            bbox: PixelRect::new(
                self.min_x as usize,
                self.min_y as usize,
                (self.max_x - self.min_x + 1) as usize,
                (self.max_y - self.min_y + 1) as usize,
            ),
        }
    }
}

/// Label 8-connected foreground components of a 0/255 mask and measure each.
///
/// Regions are returned in label order (raster order of their first pixel).
pub fn region_props(mask: &GrayImage) -> Vec<RegionProps> {
    if !mask.pixels().any(|p| p[0] > 0) {
        return Vec::new();
    }
    if is_degenerate(mask) {
        return padded_region_props(mask);
    }
    label_and_measure(mask)
}

/// Label a copy surrounded by one background pixel, then shift back.
fn padded_region_props(mask: &GrayImage) -> Vec<RegionProps> {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    for (x, y, px) in mask.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, *px);
    }
    label_and_measure(&padded)
        .into_iter()
        .map(|mut r| {
            r.centroid -= nalgebra::Vector2::new(1.0, 1.0);
            r.bbox.x -= 1;
            r.bbox.y -= 1;
            r
        })
        .collect()
}

fn label_and_measure(mask: &GrayImage) -> Vec<RegionProps> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut moments: Vec<Moments> = Vec::new();
    for (x, y, px) in labels.enumerate_pixels() {
        let label = px[0] as usize;
        if label == 0 {
            continue;
        }
        if moments.len() < label {
            moments.resize(label, Moments::new());
        }
        moments[label - 1].push(x, y);
    }

    moments
        .iter()
        .enumerate()
        .filter(|(_, m)| m.n > 0.0)
        .map(|(i, m)| m.finish(i as u32 + 1))
        .collect()
}
