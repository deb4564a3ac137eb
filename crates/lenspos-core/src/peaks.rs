use ndarray::Array1;

use crate::error::{LensPosError, Result};
use crate::grid::{Coordinate, CoordinateList, UniformGrid};
use crate::topology::NeighborTable;

/// Select the lattice points closer to the target than all eight neighbours.
///
/// `distances` holds each grid point's source-plane distance to the target.
/// Ties count as peaks, so a flat plateau yields several adjacent peaks.
/// Boundary points are never peaks. A NaN distance fails every comparison, so
/// neither the NaN point nor anything bordering it is reported.
pub fn grid_peaks(
    grid: &UniformGrid,
    distances: &Array1<f64>,
    neighbors: &NeighborTable,
) -> Result<CoordinateList> {
    if distances.len() != grid.len() {
        return Err(LensPosError::LengthMismatch {
            expected: grid.len(),
            actual: distances.len(),
        });
    }
    if neighbors.len() != grid.len() {
        return Err(LensPosError::LengthMismatch {
            expected: grid.len(),
            actual: neighbors.len(),
        });
    }

    let peaks: Vec<Coordinate> = (0..grid.len())
        .filter(|&i| {
            neighbors.neighbors(i).is_some_and(|adjacent| {
                let distance = distances[i];
                adjacent.iter().all(|&n| distance <= distances[n])
            })
        })
        .map(|i| grid.coordinate(i))
        .collect();

    Ok(CoordinateList::from_coordinates(&peaks, grid.pixel_scales()))
}
