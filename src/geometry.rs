//! Translation of piece orientations onto the grid.
//!
//! Every orientation is already a catalog entry, so placing a piece only
//! means sliding its bounding box over every anchor where it fits.

use crate::pieces::{Cell, Shape};

/// Returns every translation of `shape` that fits inside a `width` x `height`
/// grid, as absolute cells.
///
/// Anchors are visited row-major and each placement lists its cells
/// row-major. A shape larger than the grid in either direction has no
/// placements. Identical shapes yield identical placements; nothing is
/// deduplicated here.
pub fn placements(shape: &Shape, width: usize, height: usize) -> Vec<Vec<Cell>> {
    let (shape_height, shape_width) = (shape.height(), shape.width());
    if shape_height == 0 || shape_width == 0 || shape_height > height || shape_width > width {
        return Vec::new();
    }

    let offsets: Vec<Cell> = shape.cells().collect();
    let mut result = Vec::with_capacity((height - shape_height + 1) * (width - shape_width + 1));

    for y in 0..=height - shape_height {
        for x in 0..=width - shape_width {
            result.push(offsets.iter().map(|&(i, j)| (y + i, x + j)).collect());
        }
    }

    result
}
