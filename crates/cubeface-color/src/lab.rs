use cubeface_core::{ColorImage, Rgb};
use palette::{FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

/// CIE L*a*b* triple (D65 white point).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabColor {
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

impl LabColor {
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }
}

/// Convert one gamma-encoded sRGB pixel with channels in `[0, 1]`.
pub fn rgb_to_lab(px: Rgb) -> LabColor {
    let lab: Lab = Lab::from_color(Srgb::new(px[0], px[1], px[2]).into_linear());
    LabColor::new(lab.l, lab.a, lab.b)
}

/// Row-major per-pixel Lab planes of `img`.
pub fn image_to_lab(img: &ColorImage) -> Vec<LabColor> {
    img.data.iter().map(|&px| rgb_to_lab(px)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn primaries_match_reference_values() {
        let cases = [
            ([1.0, 1.0, 1.0], (100.0, 0.0, 0.0)),
            ([0.0, 0.0, 0.0], (0.0, 0.0, 0.0)),
            ([1.0, 0.0, 0.0], (53.24, 80.09, 67.20)),
            ([0.0, 1.0, 0.0], (87.73, -86.18, 83.18)),
            ([0.0, 0.0, 1.0], (32.30, 79.19, -107.86)),
            ([1.0, 1.0, 0.0], (97.14, -21.55, 94.48)),
        ];
        for (rgb, (l, a, b)) in cases {
            let lab = rgb_to_lab(rgb);
            assert_abs_diff_eq!(lab.l, l, epsilon = 0.5);
            assert_abs_diff_eq!(lab.a, a, epsilon = 0.5);
            assert_abs_diff_eq!(lab.b, b, epsilon = 0.5);
        }
    }
}
