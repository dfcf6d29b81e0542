/// Errors returned by the rectifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RectifyError {
    #[error("homography estimation failed (degenerate correspondences)")]
    HomographyFailed,
    #[error("homography not invertible")]
    NonInvertible,
    #[error("rectification failed: no subject region found in the warped image")]
    NoSubject,
}
