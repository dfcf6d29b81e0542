use cubeface_core::{ColorImage, PixelRect};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    classify_lab, image_to_lab, CellColor, ColorGrid, ColorThresholds, LabColor, GRID_SIZE,
};

/// Block sampling and labelling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Fraction of a block's width/height dropped on each side before averaging.
    pub border_fraction: f32,
    pub thresholds: ColorThresholds,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            border_fraction: 0.1,
            thresholds: ColorThresholds::default(),
        }
    }
}

/// One grid cell: where it was sampled, its mean color and its label.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSample {
    pub color: CellColor,
    pub mean_lab: LabColor,
    /// Pixels that were averaged.
    pub region: PixelRect,
}

/// Labels plus the measurements behind them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSample {
    pub grid: ColorGrid,
    /// Row-major, `cells[row * 4 + col]`.
    pub cells: Vec<CellSample>,
}

/// Splits an image into 4x4 blocks and labels each block by its mean Lab color.
#[derive(Clone, Debug, Default)]
pub struct ColorClassifier {
    params: ClassifierParams,
}

impl ColorClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ClassifierParams {
        &self.params
    }

    pub fn classify(&self, image: &ColorImage) -> ColorGrid {
        self.sample(image).grid
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn sample(&self, image: &ColorImage) -> GridSample {
        let bw = image.width / GRID_SIZE;
        let bh = image.height / GRID_SIZE;
        if bw == 0 || bh == 0 {
            info!(
                "image {}x{} too small for a {GRID_SIZE}x{GRID_SIZE} grid",
                image.width, image.height
            );
            return GridSample {
                grid: ColorGrid::default(),
                cells: Vec::new(),
            };
        }

        let lab = image_to_lab(image);
        let mut grid = ColorGrid::default();
        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let block = PixelRect::new(col * bw, row * bh, bw, bh);
                let region = inner_region(block, self.params.border_fraction);
                let mean_lab = mean_over(&lab, image.width, region);
                let color =
                    classify_lab(mean_lab.l, mean_lab.a, mean_lab.b, &self.params.thresholds);
                debug!(
                    "cell ({row}, {col}): L={:.1} a={:.1} b={:.1} -> {color}",
                    mean_lab.l, mean_lab.a, mean_lab.b
                );
                grid.0[row][col] = color;
                cells.push(CellSample {
                    color,
                    mean_lab,
                    region,
                });
            }
        }
        info!("classified {bw}x{bh} px blocks");
        GridSample { grid, cells }
    }
}

/// Shrink `block` by `round(fraction * side)` on each side. Falls back to the
/// whole block when nothing would remain.
pub fn inner_region(block: PixelRect, fraction: f32) -> PixelRect {
    let mx = (fraction * block.width as f32).round().max(0.0) as usize;
    let my = (fraction * block.height as f32).round().max(0.0) as usize;
    if 2 * mx >= block.width || 2 * my >= block.height {
        return block;
    }
    PixelRect::new(
        block.x + mx,
        block.y + my,
        block.width - 2 * mx,
        block.height - 2 * my,
    )
}

fn mean_over(lab: &[LabColor], stride: usize, region: PixelRect) -> LabColor {
    let (mut sl, mut sa, mut sb) = (0.0f64, 0.0f64, 0.0f64);
    for y in region.y..region.bottom() {
        for px in &lab[y * stride + region.x..y * stride + region.right()] {
            sl += px.l as f64;
            sa += px.a as f64;
            sb += px.b as f64;
        }
    }
    let n = region.area().max(1) as f64;
    LabColor::new((sl / n) as f32, (sa / n) as f32, (sb / n) as f32)
}
