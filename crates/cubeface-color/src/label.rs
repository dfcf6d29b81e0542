use std::fmt;

use serde::{Deserialize, Serialize};

/// Side of the square label grid.
pub const GRID_SIZE: usize = 4;

/// Palette of cell labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellColor {
    Green,
    White,
    Yellow,
    Red,
    Purple,
    Blue,
    #[default]
    Other,
}

impl CellColor {
    pub const ALL: [CellColor; 7] = [
        CellColor::Green,
        CellColor::White,
        CellColor::Yellow,
        CellColor::Red,
        CellColor::Purple,
        CellColor::Blue,
        CellColor::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CellColor::Green => "green",
            CellColor::White => "white",
            CellColor::Yellow => "yellow",
            CellColor::Red => "red",
            CellColor::Purple => "purple",
            CellColor::Blue => "blue",
            CellColor::Other => "other",
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-major 4x4 grid of labels; `grid.0[row][col]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorGrid(pub [[CellColor; GRID_SIZE]; GRID_SIZE]);

impl ColorGrid {
    pub fn filled(color: CellColor) -> Self {
        Self([[color; GRID_SIZE]; GRID_SIZE])
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> CellColor {
        self.0[row][col]
    }

    /// Number of cells carrying `color`.
    pub fn count(&self, color: CellColor) -> usize {
        self.0.iter().flatten().filter(|&&c| c == color).count()
    }
}

/// Four lines of four space-separated labels.
impl fmt::Display for ColorGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_prints_four_lines() {
        let mut grid = ColorGrid::filled(CellColor::White);
        grid.0[0][3] = CellColor::Red;
        grid.0[3][0] = CellColor::Blue;
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "white white white red");
        assert_eq!(lines[3], "blue white white white");
    }

    #[test]
    fn labels_serialize_lowercase() {
        let json = serde_json::to_string(&CellColor::Purple).unwrap();
        assert_eq!(json, "\"purple\"");
        let back: CellColor = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(back, CellColor::Yellow);
        for c in CellColor::ALL {
            assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{c}\""));
        }
    }
}
