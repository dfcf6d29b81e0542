//! Fiducial detection and corner assignment.
//!
//! ## Quickstart
//!
//! ```
//! use cubeface_core::ColorImage;
//! use cubeface_fiducial::{assign_corners, AssignmentStrategy, BlobDetector};
//!
//! let image = ColorImage::new(64, 64);
//! let detector = BlobDetector::default();
//! match detector.detect(&image) {
//!     Ok(found) => {
//!         let centroids: Vec<_> = found.iter().map(|c| c.centroid).collect();
//!         let pairs = assign_corners(&centroids, 64, 64, AssignmentStrategy::Greedy);
//!         println!("{pairs:?}");
//!     }
//!     Err(err) => println!("{err}"),
//! }
//! ```
//!
//! Algorithm:
//! 1. Luma, Gaussian blur, Canny with fixed thresholds.
//! 2. Disk closing, hole filling, removal of components touching the border.
//! 3. Moment ellipse per 8-connected component; keep the small ones.
//! 4. Exactly four must remain; they are matched to TL, TR, BL, BR of the
//!    image frame (see [`canonical_destinations`]).

mod assign;
mod detector;
mod error;
mod params;
mod types;

pub use assign::{assign_corners, canonical_destinations, DESTINATION_OFFSET, FIDUCIAL_COUNT};
pub use detector::BlobDetector;
pub use error::FiducialError;
pub use params::{AssignmentStrategy, BlobParams, ShapeFilter};
pub use types::CandidateRegion;
