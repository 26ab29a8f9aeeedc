//! Piece catalog and coordinate types.
//!
//! Each piece is listed with every orientation it may be placed in. Shapes
//! are never rotated or mirrored at runtime, so a piece that may only appear
//! in one orientation simply lists one shape.

/// A grid cell as `(row, col)`.
pub type Cell = (usize, usize);

/// Piece identifiers are single letters, as shown on the rendered board.
pub type PieceId = char;

/// One fixed orientation of a piece: an H x W boolean grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Builds a shape from 0/1 rows. All rows must have the same width.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let width = rows.first().map_or(0, |row| row.len());
        assert!(
            rows.iter().all(|row| row.len() == width),
            "shape rows must have equal width"
        );
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&bit| bit != 0).collect())
                .collect(),
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[inline]
    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Set cells relative to the shape's top-left corner, row-major.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, set)| **set)
                .map(move |(j, _)| (i, j))
        })
    }
}

/// A catalog entry.
#[derive(Clone, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub name: &'static str,
    /// Geometrically distinct orientations; never empty.
    pub orientations: Vec<Shape>,
}

impl Piece {
    pub fn new(id: PieceId, name: &'static str, orientations: Vec<Shape>) -> Self {
        assert!(!orientations.is_empty(), "piece {id} has no orientations");
        Self {
            id,
            name,
            orientations,
        }
    }

    /// Number of cells the piece covers.
    pub fn area(&self) -> usize {
        self.orientations
            .first()
            .map_or(0, |shape| shape.cells().count())
    }
}

/// Read-only table of pieces, kept in insertion order.
#[derive(Clone, Debug)]
pub struct Catalog {
    pieces: Vec<Piece>,
}

impl Catalog {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    /// The standard set of eleven blocks, from the monomino up to the
    /// U and X pentominoes.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN
                .iter()
                .map(|&(id, name, orientations)| {
                    Piece::new(
                        id,
                        name,
                        orientations.iter().map(|rows| Shape::from_rows(rows)).collect(),
                    )
                })
                .collect(),
        )
    }

    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A piece instance placed at specific cells of the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedPiece {
    pub piece: PieceId,
    /// Which copy of the piece this is, counting from 0.
    pub instance: usize,
    /// Absolute cells, row-major.
    pub cells: Vec<Cell>,
}

type ShapeRows = &'static [&'static [u8]];

/// `(id, name, orientations)` for the built-in blocks.
const BUILTIN: &[(PieceId, &str, &[ShapeRows])] = &[
    ('A', "Monomino", &[&[&[1]]]),
    ('B', "Domino", &[&[&[1, 1]], &[&[1], &[1]]]),
    ('C', "Triomino I", &[&[&[1, 1, 1]], &[&[1], &[1], &[1]]]),
    (
        'D',
        "Triomino L",
        &[
            &[&[1, 0], &[1, 1]],
            &[&[0, 1], &[1, 1]],
            &[&[1, 1], &[1, 0]],
            &[&[1, 1], &[0, 1]],
        ],
    ),
    (
        'I',
        "Tetromino I",
        &[&[&[1, 1, 1, 1]], &[&[1], &[1], &[1], &[1]]],
    ),
    (
        'L',
        "Tetromino L",
        &[
            &[&[1, 1, 1], &[1, 0, 0]],
            &[&[1, 0], &[1, 0], &[1, 1]],
            &[&[0, 0, 1], &[1, 1, 1]],
            &[&[1, 1], &[0, 1], &[0, 1]],
        ],
    ),
    ('O', "Tetromino O", &[&[&[1, 1], &[1, 1]]]),
    (
        'S',
        "Tetromino S",
        &[&[&[0, 1, 1], &[1, 1, 0]], &[&[1, 0], &[1, 1], &[0, 1]]],
    ),
    (
        'T',
        "Tetromino T",
        &[
            &[&[1, 1, 1], &[0, 1, 0]],
            &[&[0, 1, 0], &[1, 1, 1]],
            &[&[1, 0], &[1, 1], &[1, 0]],
            &[&[0, 1], &[1, 1], &[0, 1]],
        ],
    ),
    (
        'U',
        "Pentomino U",
        &[
            &[&[1, 0, 1], &[1, 1, 1]],
            &[&[1, 1, 1], &[1, 0, 1]],
            &[&[1, 1], &[1, 0], &[1, 1]],
            &[&[1, 1], &[0, 1], &[1, 1]],
        ],
    ),
    ('X', "Pentomino X", &[&[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]]),
];
