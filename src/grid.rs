//! Board helpers around the solver: sizing, text rendering and checking.
//!
//! The board is rendered row by row, top to bottom. Each cell shows the
//! identifier of the piece covering it, or '.' for an uncovered cell.

use rustc_hash::FxHashSet;

use crate::pieces::{Cell, PieceId, PlacedPiece, Shape};

/// Picks the most square `(width, height)` with `width * height == area`.
///
/// Heights are tried from 1 up to `sqrt(area)`, so the width is never
/// smaller than the height. Returns `None` for an area of zero.
pub fn near_square(area: usize) -> Option<(usize, usize)> {
    if area == 0 {
        return None;
    }

    let mut best = (area, 1);
    let mut height = 1;
    while height <= area / height {
        if area % height == 0 {
            let width = area / height;
            if width - height < best.0 - best.1 {
                best = (width, height);
            }
        }
        height += 1;
    }

    Some(best)
}

/// Converts a solution to a row-major board of piece identifiers.
///
/// Cells outside the grid are ignored.
pub fn solution_to_grid(
    solution: &[PlacedPiece],
    width: usize,
    height: usize,
) -> Vec<Option<PieceId>> {
    let mut grid = vec![None; width * height];

    for placed in solution {
        for &(row, col) in &placed.cells {
            if row < height && col < width {
                grid[row * width + col] = Some(placed.piece);
            }
        }
    }

    grid
}

/// Formats a solution as a human-readable board.
pub fn format_solution(solution: &[PlacedPiece], width: usize, height: usize) -> String {
    let grid = solution_to_grid(solution, width, height);
    let mut output = String::with_capacity((width + 1) * height);

    for row in grid.chunks(width.max(1)) {
        output.extend(row.iter().map(|cell| cell.unwrap_or('.')));
        output.push('\n');
    }

    output
}

/// Formats one orientation as a small icon: '#' for set cells.
pub fn format_shape(shape: &Shape) -> String {
    let mut output = String::new();
    for row in 0..shape.height() {
        output.extend((0..shape.width()).map(|col| if shape.is_set(row, col) { '#' } else { '.' }));
        output.push('\n');
    }
    output
}

/// Whether the placements cover every cell of the grid exactly once.
pub fn is_exact_partition(solution: &[PlacedPiece], width: usize, height: usize) -> bool {
    let mut seen: FxHashSet<Cell> = FxHashSet::default();

    for placed in solution {
        for &(row, col) in &placed.cells {
            if row >= height || col >= width || !seen.insert((row, col)) {
                return false;
            }
        }
    }

    seen.len() == width * height
}
