use cubeface_core::{
    homography_from_4pt, warp_perspective, ColorImage, CornerCorrespondences, Homography,
    PixelRect,
};
use cubeface_regions::{
    detect_edges, dilate_square, fill_holes, is_degenerate, region_props, to_gray8, RegionProps,
};
use image::GrayImage;
use log::{debug, info, warn};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{RectifyError, RectifyParams};

/// Perspective-corrected and cropped view of the input.
#[derive(Clone, Debug)]
pub struct RectifiedImage {
    /// Cropped output.
    pub image: ColorImage,
    /// Maps raw image coordinates into the warped canvas.
    pub h_canvas_from_img: Homography,
    /// Crop rectangle inside the warped canvas.
    pub crop: PixelRect,
    pub canvas_width: usize,
    pub canvas_height: usize,
}

/// Warps a raw image so the fiducials land on the canonical corners, then
/// crops the warped canvas to the dominant foreground region.
#[derive(Clone, Debug, Default)]
pub struct Rectifier {
    params: RectifyParams,
}

impl Rectifier {
    pub fn new(params: RectifyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RectifyParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image, pairs), fields(width = image.width, height = image.height))
    )]
    pub fn rectify(
        &self,
        image: &ColorImage,
        pairs: &CornerCorrespondences,
    ) -> Result<RectifiedImage, RectifyError> {
        let h = fit_homography(pairs)?;
        let canvas = warp_to_canvas(image, &h)?;

        let mask = self.subject_mask(&canvas);
        let Some(subject) = find_subject(&mask) else {
            warn!("no foreground component in the warped image");
            return Err(RectifyError::NoSubject);
        };
        debug!(
            "subject component: area {} bbox {:?}",
            subject.area, subject.bbox
        );

        let crop = expand_crop(
            subject.bbox,
            self.params.crop_margin,
            canvas.width,
            canvas.height,
        );
        info!(
            "rectified {}x{} canvas, crop {}x{} at ({}, {})",
            canvas.width, canvas.height, crop.width, crop.height, crop.x, crop.y
        );

        Ok(RectifiedImage {
            image: canvas.crop(crop),
            h_canvas_from_img: h,
            crop,
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        })
    }

    /// Dilated, hole-filled edge mask of the warped canvas. Empty for
    /// degenerate canvases.
    pub fn subject_mask(&self, canvas: &ColorImage) -> GrayImage {
        let gray = to_gray8(canvas);
        if is_degenerate(&gray) {
            return GrayImage::new(gray.width(), gray.height());
        }
        let edges = detect_edges(&gray, self.params.blur_sigma, self.params.canny);
        fill_holes(&dilate_square(&edges, self.params.dilate_square_size))
    }
}

/// Homography taking the fiducial centroids to their canonical destinations.
pub fn fit_homography(pairs: &CornerCorrespondences) -> Result<Homography, RectifyError> {
    let h = homography_from_4pt(&pairs.sources(), &pairs.destinations())
        .ok_or(RectifyError::HomographyFailed)?;
    debug!("H_canvas_from_img = {:?}", h.to_array());
    Ok(h)
}

/// Warp into a canvas with the input's dimensions. Pixels mapping outside
/// the input are black; content mapping outside the canvas is dropped.
pub fn warp_to_canvas(image: &ColorImage, h: &Homography) -> Result<ColorImage, RectifyError> {
    warp_perspective(image, h, image.width, image.height).ok_or(RectifyError::NonInvertible)
}

/// Largest 8-connected component of `mask`. Ties keep the first in label order.
pub fn find_subject(mask: &GrayImage) -> Option<RegionProps> {
    region_props(mask)
        .into_iter()
        .fold(None, |best: Option<RegionProps>, r| match best {
            Some(b) if b.area >= r.area => Some(b),
            _ => Some(r),
        })
}

/// Grow `bbox` by `margin` on every side, clamped to a `width x height` canvas.
pub fn expand_crop(bbox: PixelRect, margin: usize, width: usize, height: usize) -> PixelRect {
    let x = bbox.x.saturating_sub(margin).min(width);
    let y = bbox.y.saturating_sub(margin).min(height);
    let w = (bbox.width + 2 * margin).min(width - x);
    let h = (bbox.height + 2 * margin).min(height - y);
    PixelRect::new(x, y, w, h)
}
