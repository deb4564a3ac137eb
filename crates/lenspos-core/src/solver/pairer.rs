use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::consts::PAIRER_REFINE_BUFFER;
use crate::error::{LensPosError, Result};
use crate::grid::Coordinate;
use crate::lens::LensingModel;

use super::{grid_buffed, source_plane_peaks, PairerConfig, SolverConfig};

/// Pairs an approximate observed position with the precise image it belongs to.
///
/// Every "closest candidate" choice is measured against the observed
/// position, never against the current estimate, so refinement cannot walk
/// off towards a neighbouring image.
#[derive(Clone, Debug)]
pub struct PositionsPairer {
    config: SolverConfig,
    pairer: PairerConfig,
}

impl PositionsPairer {
    pub fn new(config: SolverConfig, pairer: PairerConfig) -> Result<Self> {
        config.validate()?;
        pairer.validate()?;
        Ok(Self { config, pairer })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn pairer_config(&self) -> &PairerConfig {
        &self.pairer
    }

    /// Refined image position paired with `position`.
    ///
    /// Fails with [`LensPosError::PairingNotFound`] when no search factor
    /// produces a candidate near `position`.
    pub fn solve(
        &self,
        model: &dyn LensingModel,
        position: Coordinate,
        source_plane_coordinate: Coordinate,
    ) -> Result<Coordinate> {
        let mut paired =
            self.paired_coordinate_from_buffer_search(model, &position, &source_plane_coordinate)?;

        if self.config.effective_upscale_factor() == 1 {
            return Ok(paired);
        }

        let mut pixel_scales = self.pairer.pair_pixel_scales;

        for iteration in 1..=self.pairer.max_refine_iterations {
            let grid = grid_buffed(
                &self.config,
                paired,
                pixel_scales,
                PAIRER_REFINE_BUFFER,
                self.config.upscale_factor,
            )?;
            pixel_scales = grid.pixel_scales();

            let peaks = source_plane_peaks(model, &grid, &source_plane_coordinate)?;
            let Some(index) = peaks.closest_index(&position) else {
                warn!(
                    iteration,
                    y = paired.y,
                    x = paired.x,
                    "Refinement grid has no peaks, keeping last estimate"
                );
                return Ok(paired);
            };

            let refined = peaks.coordinate(index);
            let shift = paired.distance_to(&refined);
            paired = refined;
            debug!(iteration, shift, pixel_scale = pixel_scales.max(), "Pair refinement step");

            if shift <= self.pairer.pair_precision {
                info!(iterations = iteration, y = paired.y, x = paired.x, "Position paired");
                return Ok(paired);
            }
        }

        warn!(
            max_iterations = self.pairer.max_refine_iterations,
            "Pair refinement did not converge, returning last estimate"
        );
        Ok(paired)
    }

    /// Pair every observed position against the same source; fails if any
    /// position cannot be paired.
    pub fn solve_positions(
        &self,
        model: &dyn LensingModel,
        positions: &[Coordinate],
        source_plane_coordinate: Coordinate,
    ) -> Result<Vec<Coordinate>> {
        positions
            .par_iter()
            .map(|position| self.solve(model, *position, source_plane_coordinate))
            .collect()
    }

    /// Coarse pairing: the nearest peak on the first search grid that has any.
    fn paired_coordinate_from_buffer_search(
        &self,
        model: &dyn LensingModel,
        position: &Coordinate,
        source_plane_coordinate: &Coordinate,
    ) -> Result<Coordinate> {
        for &buffer in &self.pairer.pair_search_factors {
            let grid = grid_buffed(
                &self.config,
                *position,
                self.pairer.pair_pixel_scales,
                buffer,
                1,
            )?;
            let peaks = source_plane_peaks(model, &grid, source_plane_coordinate)?;

            if let Some(index) = peaks.closest_index(position) {
                debug!(buffer, candidates = peaks.len(), "Coarse pairing found candidates");
                return Ok(peaks.coordinate(index));
            }
        }

        Err(LensPosError::PairingNotFound {
            y: position.y,
            x: position.x,
            search_factors: self.pairer.pair_search_factors.clone(),
        })
    }
}
