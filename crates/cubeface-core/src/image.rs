use serde::{Deserialize, Serialize};

/// RGB pixel with channels normalized to `[0, 1]`.
pub type Rgb = [f32; 3];

/// Owned row-major RGB image with `f32` channels in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<Rgb>, // row-major, len = w*h
}

/// Axis-aligned pixel rectangle (zero-based, inclusive origin, exclusive extent).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the last column.
    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// True when the rectangle lies fully inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

impl ColorImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![[0.0; 3]; width * height],
        }
    }

    /// Build an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgb) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        let w = self.width;
        self.data[y * w + x] = px;
    }

    /// Pixel value, or black for out-of-bounds coordinates.
    #[inline]
    pub fn get_or_black(&self, x: i64, y: i64) -> Rgb {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return [0.0; 3];
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// Copy out a sub-rectangle. The rectangle is clipped to the image.
    pub fn crop(&self, rect: PixelRect) -> ColorImage {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        let w = x1 - x0;
        let h = y1 - y0;

        let mut data = Vec::with_capacity(w * h);
        for y in y0..y1 {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            data.extend_from_slice(&row[x0..x1]);
        }
        ColorImage {
            width: w,
            height: h,
            data,
        }
    }
}

/// `0.2989 R + 0.5870 G + 0.1140 B`.
#[inline]
pub fn luma(px: Rgb) -> f32 {
    0.2989 * px[0] + 0.5870 * px[1] + 0.1140 * px[2]
}

/// Bilinear sample with pixel centers at integer coordinates.
///
/// Neighbors outside the image contribute black.
#[inline]
pub fn sample_bilinear(src: &ColorImage, x: f64, y: f64) -> Rgb {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = (x - x0) as f32;
    let fy = (y - y0) as f32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let p00 = src.get_or_black(x0, y0);
    let p10 = src.get_or_black(x0 + 1, y0);
    let p01 = src.get_or_black(x0, y0 + 1);
    let p11 = src.get_or_black(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 3];
    for c in 0..3 {
        let a = p00[c] + fx * (p10[c] - p00[c]);
        let b = p01[c] + fx * (p11[c] - p01[c]);
        out[c] = a + fy * (b - a);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gradient(w: usize, h: usize) -> ColorImage {
        ColorImage::from_fn(w, h, |x, y| {
            [x as f32 / w as f32, y as f32 / h as f32, 0.5]
        })
    }

    #[test]
    fn sampling_at_integer_coordinates_is_exact() {
        let img = gradient(8, 6);
        for (x, y) in [(0usize, 0usize), (3, 2), (7, 5)] {
            assert_eq!(sample_bilinear(&img, x as f64, y as f64), img.get(x, y));
        }
    }

    #[test]
    fn sampling_between_pixels_interpolates() {
        let img = gradient(8, 6);
        let v = sample_bilinear(&img, 2.5, 1.0);
        assert_abs_diff_eq!(v[0], 2.5 / 8.0, epsilon = 1e-6);
        assert_abs_diff_eq!(v[1], 1.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn sampling_outside_fades_to_black() {
        let img = ColorImage::from_fn(4, 4, |_, _| [1.0, 1.0, 1.0]);
        assert_eq!(sample_bilinear(&img, -3.0, 1.0), [0.0; 3]);
        let edge = sample_bilinear(&img, 3.5, 1.0);
        assert_abs_diff_eq!(edge[0], 0.5, epsilon = 1e-6);
    }

    #[test]
    fn crop_is_clipped_to_image() {
        let img = gradient(10, 10);
        let out = img.crop(PixelRect::new(6, 7, 10, 10));
        assert_eq!((out.width, out.height), (4, 3));
        assert_eq!(out.get(0, 0), img.get(6, 7));
        assert_eq!(out.get(3, 2), img.get(9, 9));
    }
}
