use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Target corner, in canonical order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerId {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerId {
    /// Canonical processing and storage order: TL, TR, BL, BR.
    pub const ALL: [CornerId; 4] = [
        CornerId::TopLeft,
        CornerId::TopRight,
        CornerId::BottomLeft,
        CornerId::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            CornerId::TopLeft => 0,
            CornerId::TopRight => 1,
            CornerId::BottomLeft => 2,
            CornerId::BottomRight => 3,
        }
    }
}

/// One source point (image) paired with its destination (canonical plane).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub src: Point2<f64>,
    pub dst: Point2<f64>,
}

/// Exactly four correspondences stored in [`CornerId::ALL`] order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerCorrespondences {
    pub pairs: [Correspondence; 4],
}

impl CornerCorrespondences {
    pub fn new(pairs: [Correspondence; 4]) -> Self {
        Self { pairs }
    }

    pub fn get(&self, corner: CornerId) -> &Correspondence {
        &self.pairs[corner.index()]
    }

    pub fn sources(&self) -> [Point2<f64>; 4] {
        self.pairs.map(|c| c.src)
    }

    pub fn destinations(&self) -> [Point2<f64>; 4] {
        self.pairs.map(|c| c.dst)
    }

    /// Map every point to itself. Useful for checking that rectification is a no-op.
    pub fn identity(points: [Point2<f64>; 4]) -> Self {
        Self::new(points.map(|p| Correspondence { src: p, dst: p }))
    }
}
