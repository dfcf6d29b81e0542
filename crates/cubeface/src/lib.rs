//! Read the 4x4 color grid printed on a target face.
//!
//! The target carries four dark circular fiducials near its corners. A run
//! finds them, maps them onto the image frame with a projective warp, crops
//! to the target and labels each of the 16 cells from its mean L*a*b* color.
//!
//! ## Quickstart
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = cubeface::classify("face.jpg")?;
//! println!("{grid}");
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `cubeface::core`: image container, correspondences, homographies, logging.
//! - `cubeface::regions`: edges, morphology and connected-component measurements.
//! - `cubeface::fiducial`: blob detection and corner assignment.
//! - `cubeface::rectify`: warp and subject crop.
//! - `cubeface::color`: Lab block averaging and labelling.
//! - [`Pipeline`]: all stages on an in-memory image.
//! - `classify` / `classify_with_params` (feature `image`): from a file.

pub use cubeface_color as color;
pub use cubeface_core as core;
pub use cubeface_fiducial as fiducial;
pub use cubeface_rectify as rectify;
pub use cubeface_regions as regions;

pub use cubeface_color::{CellColor, ColorGrid};
pub use cubeface_core::ColorImage;

mod pipeline;

pub use pipeline::{Pipeline, PipelineError, PipelineOutput, PipelineParams};

#[cfg(feature = "image")]
mod io;

#[cfg(feature = "image")]
pub use io::{
    classify, classify_with_params, color_image_from_rgb, load_color_image, to_rgb_image,
    ClassifyError,
};
