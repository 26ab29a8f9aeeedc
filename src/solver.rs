//! Algorithm X over dancing links.
//!
//! Key points:
//! - cover/uncover relink nodes in place, so backtracking allocates nothing
//! - the column with the fewest live rows is branched on first
//! - rows of that column are tried in a shuffled order
//! - a wall-clock budget is checked on entry to every recursive call
//!
//! All per-search state lives in a [`SearchContext`], so independent searches
//! over independent matrices never interfere.

use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::matrix::{Matrix, ROOT};

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Recursive calls made, including the top-level one.
    pub calls: u64,
    /// Deepest recursion level entered.
    pub max_depth: usize,
    /// Whether the time budget stopped the search.
    pub timed_out: bool,
}

/// Mutable state threaded through the recursion.
pub(crate) struct SearchContext<'r, R: ?Sized> {
    rng: &'r mut R,
    start: Instant,
    budget: Duration,
    found: bool,
    /// Nodes of the rows selected on the current path, one per level.
    selected: Vec<usize>,
    solutions: Vec<Vec<usize>>,
    stats: SearchStats,
}

impl<'r, R: Rng + ?Sized> SearchContext<'r, R> {
    /// Starts the clock.
    pub(crate) fn new(budget: Duration, rng: &'r mut R) -> Self {
        Self {
            rng,
            start: Instant::now(),
            budget,
            found: false,
            selected: Vec::new(),
            solutions: Vec::new(),
            stats: SearchStats::default(),
        }
    }
}

/// Result of one top-level search.
#[derive(Clone, Debug)]
pub struct Search {
    /// Selected row nodes of the first exact cover reached, if any.
    pub solution: Option<Vec<usize>>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl Matrix {
    /// Removes `header` from the header ring and every row that intersects
    /// it from the other columns those rows touch.
    pub(crate) fn cover(&mut self, header: usize) {
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row = self.nodes[header].down;
        while row != header {
            let mut node = self.nodes[row].right;
            while node != row {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                *self.size_mut(self.nodes[node].column) -= 1;
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Undoes [`Matrix::cover`], walking rows upwards and nodes leftwards so
    /// the relinking mirrors the unlinking.
    pub(crate) fn uncover(&mut self, header: usize) {
        let mut row = self.nodes[header].up;
        while row != header {
            let mut node = self.nodes[row].left;
            while node != row {
                *self.size_mut(self.nodes[node].column) += 1;
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = node;
                self.nodes[down].up = node;
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }

        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Picks the live column with the fewest rows, first in ring order on
    /// ties. `None` when every column is covered.
    pub(crate) fn choose_column(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        let mut header = self.nodes[ROOT].right;
        while header != ROOT {
            let size = self.size(header);
            if best.map_or(true, |(_, best_size)| size < best_size) {
                best = Some((header, size));
                if size == 0 {
                    // dead end, nothing can beat it
                    break;
                }
            }
            header = self.nodes[header].right;
        }
        best.map(|(header, _)| header)
    }

    /// Searches for an exact cover within `budget`.
    ///
    /// Stops at the first cover found. Whatever happens the matrix is left
    /// exactly as it was, since every cover is undone on the way out.
    pub fn solve<R: Rng + ?Sized>(&mut self, budget: Duration, rng: &mut R) -> Search {
        let mut context = SearchContext::new(budget, rng);
        self.search(0, &mut context);

        let elapsed = context.start.elapsed();
        debug!(
            "search finished after {} calls, depth {}, {:?}",
            context.stats.calls, context.stats.max_depth, elapsed
        );

        Search {
            solution: context.solutions.into_iter().next(),
            stats: context.stats,
            elapsed,
        }
    }

    pub(crate) fn search<R: Rng + ?Sized>(&mut self, depth: usize, ctx: &mut SearchContext<'_, R>) {
        ctx.stats.calls += 1;
        ctx.stats.max_depth = ctx.stats.max_depth.max(depth);

        if self.nodes[ROOT].right == ROOT {
            ctx.solutions.push(ctx.selected.clone());
            ctx.found = true;
            return;
        }

        if ctx.start.elapsed() > ctx.budget {
            if !ctx.stats.timed_out {
                warn!("search stopped: time budget of {:?} exceeded", ctx.budget);
            }
            ctx.stats.timed_out = true;
            return;
        }

        let Some(column) = self.choose_column() else {
            return;
        };
        if self.size(column) == 0 {
            return;
        }

        self.cover(column);

        let mut rows = Vec::with_capacity(self.size(column));
        let mut row = self.nodes[column].down;
        while row != column {
            rows.push(row);
            row = self.nodes[row].down;
        }
        rows.shuffle(&mut *ctx.rng);

        for row in rows {
            if ctx.found || ctx.stats.timed_out {
                break;
            }
            ctx.selected.push(row);

            let mut node = self.nodes[row].right;
            while node != row {
                self.cover(self.nodes[node].column);
                node = self.nodes[node].right;
            }

            self.search(depth + 1, ctx);

            let mut node = self.nodes[row].left;
            while node != row {
                self.uncover(self.nodes[node].column);
                node = self.nodes[node].left;
            }

            ctx.selected.pop();
        }

        self.uncover(column);
    }
}
