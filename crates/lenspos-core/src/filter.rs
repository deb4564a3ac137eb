//! Distance-threshold filters over coordinate lists.
//!
//! Both filters keep input order and may return an empty list, which is a
//! valid answer rather than an error.

use ndarray::Array1;

use crate::error::{LensPosError, Result};
use crate::grid::{Coordinate, CoordinateList};

fn retain_where<F>(list: &CoordinateList, distances: &Array1<f64>, keep: F) -> Result<CoordinateList>
where
    F: Fn(f64) -> bool,
{
    if distances.len() != list.len() {
        return Err(LensPosError::LengthMismatch {
            expected: list.len(),
            actual: distances.len(),
        });
    }

    let kept: Vec<Coordinate> = list
        .iter()
        .zip(distances.iter())
        .filter(|&(_, &d)| keep(d))
        .map(|(c, _)| c)
        .collect();

    Ok(CoordinateList::from_coordinates(&kept, list.pixel_scales()))
}

/// Keep points whose distance is strictly greater than `outside_distance`.
pub fn grid_outside_distance(
    list: &CoordinateList,
    distances: &Array1<f64>,
    outside_distance: f64,
) -> Result<CoordinateList> {
    retain_where(list, distances, |d| d > outside_distance)
}

/// Keep points whose distance is strictly less than `within_distance`.
pub fn grid_within_distance(
    list: &CoordinateList,
    distances: &Array1<f64>,
    within_distance: f64,
) -> Result<CoordinateList> {
    retain_where(list, distances, |d| d < within_distance)
}
