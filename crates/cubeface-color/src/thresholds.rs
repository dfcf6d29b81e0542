use serde::{Deserialize, Serialize};

use crate::CellColor;

/// Boundaries of the ordered Lab rules. All comparisons are strict.
///
/// Rules, first match wins:
/// 1. `a < green_max_a` → green
/// 2. `white_min_b < b < white_max_b` → white
/// 3. `a < yellow_max_a` → yellow
/// 4. `b > red_min_b` → red
/// 5. `L > purple_min_l` → purple
/// 6. `blue_min_l < L < blue_max_l`, `blue_min_a < a < blue_max_a`, `b < blue_max_b` → blue
/// 7. otherwise other
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorThresholds {
    pub green_max_a: f32,
    pub white_min_b: f32,
    pub white_max_b: f32,
    pub yellow_max_a: f32,
    pub red_min_b: f32,
    pub purple_min_l: f32,
    pub blue_min_l: f32,
    pub blue_max_l: f32,
    pub blue_min_a: f32,
    pub blue_max_a: f32,
    pub blue_max_b: f32,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            green_max_a: -45.0,
            white_min_b: -30.0,
            white_max_b: 20.0,
            yellow_max_a: 0.0,
            red_min_b: 20.0,
            purple_min_l: 40.0,
            blue_min_l: 20.0,
            blue_max_l: 45.0,
            blue_min_a: 35.0,
            blue_max_a: 80.0,
            blue_max_b: -70.0,
        }
    }
}

/// Label a single mean `(L, a, b)` triple.
pub fn classify_lab(l: f32, a: f32, b: f32, t: &ColorThresholds) -> CellColor {
    if a < t.green_max_a {
        CellColor::Green
    } else if t.white_min_b < b && b < t.white_max_b {
        CellColor::White
    } else if a < t.yellow_max_a {
        CellColor::Yellow
    } else if b > t.red_min_b {
        CellColor::Red
    } else if l > t.purple_min_l {
        CellColor::Purple
    } else if t.blue_min_l < l
        && l < t.blue_max_l
        && t.blue_min_a < a
        && a < t.blue_max_a
        && b < t.blue_max_b
    {
        CellColor::Blue
    } else {
        CellColor::Other
    }
}
