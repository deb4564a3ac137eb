//! Moore-neighbourhood topology of a square row-major lattice.

use crate::consts::MOORE_NEIGHBOURS;
use crate::error::{LensPosError, Result};
use crate::grid::square_edge;

/// The eight neighbour indices of every strict-interior lattice point.
///
/// Boundary points have no entry and must never be compared against their
/// neighbours: a point on the lattice edge cannot be shown to be a local
/// minimum with fewer than eight comparisons.
#[derive(Clone, Debug)]
pub struct NeighborTable {
    edge: usize,
    neighbors: Vec<Option<[usize; MOORE_NEIGHBOURS]>>,
}

impl NeighborTable {
    /// Build the table for a lattice of `len` points.
    ///
    /// Neighbours are ordered top-left, top, top-right, left, right,
    /// bottom-left, bottom, bottom-right.
    pub fn square(len: usize) -> Result<Self> {
        let edge = square_edge(len).ok_or(LensPosError::InvalidGridSize(len))?;

        let mut neighbors = Vec::with_capacity(len);
        for y in 0..edge {
            for x in 0..edge {
                let interior = y > 0 && x > 0 && y < edge - 1 && x < edge - 1;
                if !interior {
                    neighbors.push(None);
                    continue;
                }
                let index = y * edge + x;
                neighbors.push(Some([
                    index - edge - 1,
                    index - edge,
                    index - edge + 1,
                    index - 1,
                    index + 1,
                    index + edge - 1,
                    index + edge,
                    index + edge + 1,
                ]));
            }
        }

        Ok(Self { edge, neighbors })
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn has_full_neighbors(&self, index: usize) -> bool {
        self.neighbors[index].is_some()
    }

    pub fn neighbors(&self, index: usize) -> Option<&[usize; MOORE_NEIGHBOURS]> {
        self.neighbors[index].as_ref()
    }

    /// Number of points with a full neighbour set, `(edge - 2)^2` for `edge >= 2`.
    pub fn interior_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }
}
