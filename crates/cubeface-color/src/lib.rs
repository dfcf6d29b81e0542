//! Color grid classification in CIE L*a*b*.
//!
//! The rectified image is split into a 4x4 grid of equal blocks. Each block is
//! averaged in Lab (sRGB, D65, via `palette`) after dropping a border strip,
//! and the mean is labelled by a fixed sequence of threshold rules
//! ([`ColorThresholds`]).

mod classifier;
mod lab;
mod label;
mod thresholds;

pub use classifier::{inner_region, CellSample, ClassifierParams, ColorClassifier, GridSample};
pub use lab::{image_to_lab, rgb_to_lab, LabColor};
pub use label::{CellColor, ColorGrid, GRID_SIZE};
pub use thresholds::{classify_lab, ColorThresholds};
