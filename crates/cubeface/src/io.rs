use std::path::Path;

use cubeface_color::ColorGrid;
use cubeface_core::ColorImage;
use image::{Rgb, RgbImage};
use log::debug;

use crate::{Pipeline, PipelineError, PipelineParams};

/// Errors produced by the file-based helpers.
#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    ImageLoad(#[from] image::ImageError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Convert an 8-bit RGB image into the normalized `f32` container.
pub fn color_image_from_rgb(img: &RgbImage) -> ColorImage {
    ColorImage::from_fn(img.width() as usize, img.height() as usize, |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x as u32, y as u32);
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    })
}

/// Quantize back to 8-bit RGB.
pub fn to_rgb_image(img: &ColorImage) -> RgbImage {
    RgbImage::from_fn(img.width as u32, img.height as u32, |x, y| {
        let px = img.get(x as usize, y as usize);
        Rgb(px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
    })
}

/// Decode any format supported by `image` and drop the alpha channel.
pub fn load_color_image(path: impl AsRef<Path>) -> Result<ColorImage, ClassifyError> {
    let path = path.as_ref();
    let img = image::open(path)?.to_rgb8();
    debug!("loaded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(color_image_from_rgb(&img))
}

/// Read the grid from an image file with default parameters.
pub fn classify(path: impl AsRef<Path>) -> Result<ColorGrid, ClassifyError> {
    classify_with_params(path, &PipelineParams::default())
}

pub fn classify_with_params(
    path: impl AsRef<Path>,
    params: &PipelineParams,
) -> Result<ColorGrid, ClassifyError> {
    let image = load_color_image(path)?;
    let out = Pipeline::new(params.clone()).run(&image)?;
    Ok(out.grid())
}
