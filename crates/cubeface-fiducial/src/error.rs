/// Errors returned by fiducial detection and corner assignment.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FiducialError {
    #[error("calibration failed: expected {expected} fiducial candidates, found {found}")]
    CandidateCount { found: usize, expected: usize },
}
