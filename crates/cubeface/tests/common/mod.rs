#![allow(dead_code)]

use cubeface::CellColor;
use image::{Rgb, RgbImage};

pub const SIZE: u32 = 400;
pub const MARKER_RADIUS: i64 = 5;
pub const MARKERS: [(i64, i64); 4] = [(20, 20), (380, 20), (20, 380), (380, 380)];

/// Painted area of the grid: `GRID_ORIGIN..GRID_ORIGIN + 4 * CELL` on both axes.
pub const GRID_ORIGIN: u32 = 40;
pub const CELL: u32 = 80;

pub const LAYOUT: [[CellColor; 4]; 4] = {
    use CellColor::{Blue as B, Green as G, Red as R, Yellow as Y};
    [[R, G, B, R], [G, Y, Y, B], [B, Y, Y, G], [R, B, G, R]]
};

fn paint(color: CellColor) -> Rgb<u8> {
    match color {
        CellColor::Red => Rgb([255, 0, 0]),
        CellColor::Green => Rgb([0, 255, 0]),
        CellColor::Blue => Rgb([0, 0, 255]),
        CellColor::Yellow => Rgb([255, 255, 0]),
        _ => Rgb([255, 255, 255]),
    }
}

/// White face with four black corner markers and a 4x4 painted grid.
pub fn synthetic_face() -> RgbImage {
    let grid_end = GRID_ORIGIN + 4 * CELL;
    RgbImage::from_fn(SIZE, SIZE, |x, y| {
        let on_marker = MARKERS.iter().any(|&(cx, cy)| {
            let (dx, dy) = (x as i64 - cx, y as i64 - cy);
            dx * dx + dy * dy <= MARKER_RADIUS * MARKER_RADIUS
        });
        if on_marker {
            return Rgb([0, 0, 0]);
        }
        if (GRID_ORIGIN..grid_end).contains(&x) && (GRID_ORIGIN..grid_end).contains(&y) {
            let row = ((y - GRID_ORIGIN) / CELL) as usize;
            let col = ((x - GRID_ORIGIN) / CELL) as usize;
            return paint(LAYOUT[row][col]);
        }
        Rgb([255, 255, 255])
    })
}

/// Same face with only three markers.
pub fn face_missing_marker() -> RgbImage {
    let mut img = synthetic_face();
    let (cx, cy) = MARKERS[3];
    let r = MARKER_RADIUS + 1;
    for y in (cy - r)..=(cy + r) {
        for x in (cx - r)..=(cx + r) {
            img.put_pixel(x as u32, y as u32, Rgb([255, 255, 255]));
        }
    }
    img
}
