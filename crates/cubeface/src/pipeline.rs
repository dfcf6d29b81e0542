use cubeface_color::{ClassifierParams, ColorClassifier, ColorGrid, GridSample};
use cubeface_core::{ColorImage, CornerCorrespondences};
use cubeface_fiducial::{
    assign_corners, AssignmentStrategy, BlobDetector, BlobParams, CandidateRegion, FiducialError,
};
use cubeface_rectify::{RectifiedImage, Rectifier, RectifyError, RectifyParams};
use log::info;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by [`Pipeline::run`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Calibration(#[from] FiducialError),

    #[error(transparent)]
    Rectification(#[from] RectifyError),
}

/// Parameters of every stage. Partial JSON files override only what they name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub blob: BlobParams,
    pub assignment: AssignmentStrategy,
    pub rectify: RectifyParams,
    pub classifier: ClassifierParams,
}

/// Every intermediate value of one run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Fiducials that passed the shape filter, in label order.
    pub candidates: Vec<CandidateRegion>,
    pub correspondences: CornerCorrespondences,
    pub rectified: RectifiedImage,
    pub sample: GridSample,
}

impl PipelineOutput {
    pub fn grid(&self) -> ColorGrid {
        self.sample.grid
    }
}

/// Detect fiducials, rectify, classify.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    detector: BlobDetector,
    assignment: AssignmentStrategy,
    rectifier: Rectifier,
    classifier: ColorClassifier,
}

impl Pipeline {
    pub fn new(params: PipelineParams) -> Self {
        Self {
            detector: BlobDetector::new(params.blob),
            assignment: params.assignment,
            rectifier: Rectifier::new(params.rectify),
            classifier: ColorClassifier::new(params.classifier),
        }
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn run(&self, image: &ColorImage) -> Result<PipelineOutput, PipelineError> {
        let candidates = self.detector.detect(image)?;
        let centroids: Vec<Point2<f64>> = candidates.iter().map(|c| c.centroid).collect();
        let correspondences =
            assign_corners(&centroids, image.width, image.height, self.assignment)?;
        let rectified = self.rectifier.rectify(image, &correspondences)?;
        let sample = self.classifier.sample(&rectified.image);

        info!("grid:\n{}", sample.grid);
        Ok(PipelineOutput {
            candidates,
            correspondences,
            rectified,
            sample,
        })
    }
}
