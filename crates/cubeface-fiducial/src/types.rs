use cubeface_core::PixelRect;
use cubeface_regions::RegionProps;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A connected foreground component that may be a fiducial marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRegion {
    pub centroid: Point2<f64>,
    pub major_axis_length: f64,
    pub minor_axis_length: f64,
    /// Pixel count.
    pub area: usize,
    pub bbox: PixelRect,
}

impl From<RegionProps> for CandidateRegion {
    fn from(p: RegionProps) -> Self {
        Self {
            centroid: p.centroid,
            major_axis_length: p.major_axis_length,
            minor_axis_length: p.minor_axis_length,
            area: p.area,
            bbox: p.bbox,
        }
    }
}
