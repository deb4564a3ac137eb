//! The lens model seam: everything the solvers need from a mass model.

use ndarray::{Array1, Array2, ArrayView2};

use crate::error::{LensPosError, Result};
use crate::grid::{distances_from, Coordinate};

/// A mass distribution that deflects image-plane rays.
///
/// Implementations must be pure: the finder evaluates deflections for several
/// candidate branches at once from Rayon worker threads.
pub trait LensingModel: Send + Sync {
    /// Deflection angles `(alpha_y, alpha_x)` for every `(y, x)` row of `grid`.
    ///
    /// The returned array must have the same shape as `grid`.
    fn deflections(&self, grid: ArrayView2<'_, f64>) -> Array2<f64>;

    /// Centres of the model's mass concentrations.
    fn mass_profile_centres(&self) -> Vec<Coordinate>;
}

/// No lensing: every ray lands where it started.
#[derive(Clone, Copy, Debug, Default)]
pub struct Undeflected;

impl LensingModel for Undeflected {
    fn deflections(&self, grid: ArrayView2<'_, f64>) -> Array2<f64> {
        Array2::zeros(grid.raw_dim())
    }

    fn mass_profile_centres(&self) -> Vec<Coordinate> {
        Vec::new()
    }
}

/// Trace `grid` to the source plane: `beta = theta - alpha`.
pub fn traced_grid(model: &dyn LensingModel, grid: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let deflections = model.deflections(grid);
    if deflections.dim() != grid.dim() {
        return Err(LensPosError::LengthMismatch {
            expected: grid.len(),
            actual: deflections.len(),
        });
    }
    Ok(&grid - &deflections)
}

/// Source-plane distance of every traced grid point to `source_plane_coordinate`.
pub fn source_plane_distances(
    model: &dyn LensingModel,
    grid: ArrayView2<'_, f64>,
    source_plane_coordinate: &Coordinate,
) -> Result<Array1<f64>> {
    let traced = traced_grid(model, grid)?;
    Ok(distances_from(traced.view(), source_plane_coordinate))
}
