//! Exact-cover matrix for a packing request.
//!
//! Columns are the grid cells (row-major) followed by one slot per requested
//! piece instance. Each row is one placement of one orientation of one
//! instance and touches its cell columns plus its slot column.
//!
//! Nodes live in a single arena and link to each other by index:
//! - index 0 is the root of the header ring
//! - indices `1..=columns` are column headers
//! - the rest are data nodes, appended row by row
//!
//! The arena is sized once here; searching only relinks nodes.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::geometry::placements;
use crate::pieces::{Cell, Piece, PieceId, PlacedPiece};

/// Index of the header ring's root sentinel.
pub(crate) const ROOT: usize = 0;

/// What a column stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    /// A grid cell that must be covered exactly once.
    Cell(Cell),
    /// A piece instance that must be placed exactly once.
    Slot { piece: PieceId, instance: usize },
}

/// A quad-linked node. Removed nodes keep their own links so they can be
/// restored in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) left: usize,
    pub(crate) right: usize,
    pub(crate) up: usize,
    pub(crate) down: usize,
    /// Header node of the column this node belongs to (itself for headers).
    pub(crate) column: usize,
}

impl Node {
    const fn header(index: usize, left: usize, right: usize) -> Self {
        Self {
            left,
            right,
            up: index,
            down: index,
            column: index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Column {
    pub(crate) key: ColumnKey,
    /// Live nodes in the column's vertical ring.
    pub(crate) size: usize,
}

/// One placement of one piece instance, before linking.
struct Candidate {
    piece: PieceId,
    instance: usize,
    cells: Vec<Cell>,
}

fn merge_counts<'p>(pieces: &[(&'p Piece, usize)]) -> Vec<(&'p Piece, usize)> {
    let mut merged: Vec<(&'p Piece, usize)> = Vec::with_capacity(pieces.len());
    for &(piece, count) in pieces {
        match merged.iter_mut().find(|(known, _)| known.id == piece.id) {
            Some((_, total)) => *total += count,
            None => merged.push((piece, count)),
        }
    }
    merged
}

/// The dancing-links matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix {
    pub(crate) nodes: Vec<Node>,
    /// `columns[h - 1]` describes header node `h`.
    pub(crate) columns: Vec<Column>,
    rows: usize,
}

impl Matrix {
    /// Builds the matrix for packing `pieces` (with their requested counts)
    /// into a `width` x `height` grid.
    ///
    /// Candidate rows are shuffled with `rng` before linking, which decides
    /// the order the search meets them in. No feasibility check is made: if
    /// the piece area does not match the grid the matrix is still valid, it
    /// just has no exact cover.
    ///
    /// A piece listed more than once gets the sum of its counts, so every
    /// slot key stays unique.
    pub fn build<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        pieces: &[(&Piece, usize)],
        rng: &mut R,
    ) -> Self {
        let pieces = merge_counts(pieces);
        let mut keys: Vec<ColumnKey> = (0..height)
            .flat_map(|row| (0..width).map(move |col| ColumnKey::Cell((row, col))))
            .collect();
        for &(piece, count) in &pieces {
            keys.extend((0..count).map(|instance| ColumnKey::Slot {
                piece: piece.id,
                instance,
            }));
        }

        let mut candidates = Vec::new();
        for &(piece, count) in &pieces {
            for instance in 0..count {
                for shape in &piece.orientations {
                    candidates.extend(placements(shape, width, height).into_iter().map(
                        |cells| Candidate {
                            piece: piece.id,
                            instance,
                            cells,
                        },
                    ));
                }
            }
        }
        candidates.shuffle(rng);

        let data_nodes: usize = candidates.iter().map(|c| c.cells.len() + 1).sum();
        let mut matrix = Self::with_columns(keys, data_nodes);

        // headers are numbered in key order, starting after the root
        let headers: FxHashMap<ColumnKey, usize> = matrix
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.key, index + 1))
            .collect();

        let mut row_headers = Vec::new();
        for candidate in &candidates {
            row_headers.clear();
            row_headers.extend(
                candidate
                    .cells
                    .iter()
                    .filter_map(|&cell| headers.get(&ColumnKey::Cell(cell)).copied()),
            );
            let slot = ColumnKey::Slot {
                piece: candidate.piece,
                instance: candidate.instance,
            };
            if let Some(&header) = headers.get(&slot) {
                row_headers.push(header);
            }
            matrix.add_row(&row_headers);
        }

        debug!(
            "built {}x{} matrix: {} columns, {} rows, {} nodes",
            width,
            height,
            matrix.column_count(),
            matrix.row_count(),
            matrix.nodes.len()
        );

        matrix
    }

    /// Creates the root and one empty column per key, all linked into the
    /// header ring in key order.
    fn with_columns(keys: Vec<ColumnKey>, data_nodes: usize) -> Self {
        let count = keys.len();
        let mut nodes = Vec::with_capacity(1 + count + data_nodes);

        nodes.push(Node::header(ROOT, count, if count == 0 { ROOT } else { 1 }));
        for index in 1..=count {
            let right = if index == count { ROOT } else { index + 1 };
            nodes.push(Node::header(index, index - 1, right));
        }

        Self {
            nodes,
            columns: keys
                .into_iter()
                .map(|key| Column { key, size: 0 })
                .collect(),
            rows: 0,
        }
    }

    /// Appends a row touching the given column headers, in that order.
    ///
    /// Each new node goes to the bottom of its column's vertical ring, and
    /// the row's nodes form their own horizontal ring.
    fn add_row(&mut self, headers: &[usize]) {
        let first = self.nodes.len();
        let last = first + headers.len().saturating_sub(1);

        for (offset, &header) in headers.iter().enumerate() {
            let index = first + offset;
            let above = self.nodes[header].up;
            self.nodes.push(Node {
                left: if index == first { last } else { index - 1 },
                right: if index == last { first } else { index + 1 },
                up: above,
                down: header,
                column: header,
            });
            self.nodes[above].down = index;
            self.nodes[header].up = index;
            self.columns[header - 1].size += 1;
        }

        if !headers.is_empty() {
            self.rows += 1;
        }
    }

    #[inline]
    pub(crate) fn size(&self, header: usize) -> usize {
        self.columns[header - 1].size
    }

    #[inline]
    pub(crate) fn size_mut(&mut self, header: usize) -> &mut usize {
        &mut self.columns[header - 1].size
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Header nodes currently linked into the header ring, in ring order.
    pub(crate) fn live_columns(&self) -> Vec<usize> {
        let mut live = Vec::new();
        let mut header = self.nodes[ROOT].right;
        while header != ROOT {
            live.push(header);
            header = self.nodes[header].right;
        }
        live
    }

    /// Keys of the columns a row touches, starting from any of its nodes.
    fn row_keys(&self, node: usize) -> Vec<ColumnKey> {
        let mut keys = vec![self.columns[self.nodes[node].column - 1].key];
        let mut next = self.nodes[node].right;
        while next != node {
            keys.push(self.columns[self.nodes[next].column - 1].key);
            next = self.nodes[next].right;
        }
        keys
    }

    /// Maps selected rows (any node of each row) back to placed pieces.
    ///
    /// Reads the links only; the matrix is not changed.
    pub fn resolve(&self, selected: &[usize]) -> Vec<PlacedPiece> {
        selected
            .iter()
            .filter_map(|&node| {
                let mut slot = None;
                let mut cells = Vec::new();
                for key in self.row_keys(node) {
                    match key {
                        ColumnKey::Cell(cell) => cells.push(cell),
                        ColumnKey::Slot { piece, instance } => slot = Some((piece, instance)),
                    }
                }
                let Some((piece, instance)) = slot else {
                    warn!("selected row at node {node} has no piece slot");
                    return None;
                };
                cells.sort_unstable();
                Some(PlacedPiece {
                    piece,
                    instance,
                    cells,
                })
            })
            .collect()
    }
}
