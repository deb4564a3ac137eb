use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::{FINDER_REFINE_BUFFER, PARALLEL_CANDIDATE_THRESHOLD, PLATEAU_MERGE_PIXELS};
use crate::error::{LensPosError, Result};
use crate::grid::{Coordinate, CoordinateList, PixelScales, UniformGrid};
use crate::lens::LensingModel;

use super::{
    filter_by_source_distance, grid_buffed, remove_mass_centre_neighbourhoods, source_plane_peaks,
    SolverConfig,
};

/// Finds every image-plane position of a source-plane coordinate.
///
/// Local minima of the traced distance over the base grid seed the search.
/// Each seed is then re-gridded around itself at `upscale_factor` times the
/// resolution, and the local minima of that grid replace it, until the pixel
/// scale drops to `pixel_scale_precision`.
#[derive(Clone, Debug)]
pub struct PositionsFinder {
    grid: UniformGrid,
    config: SolverConfig,
}

impl PositionsFinder {
    pub fn new(grid: UniformGrid, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        if config.use_upscaling && config.upscale_factor < 2 {
            return Err(LensPosError::InvalidConfig(format!(
                "refinement needs upscale_factor >= 2, got {}",
                config.upscale_factor
            )));
        }
        Ok(Self { grid, config })
    }

    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// All image-plane positions that trace to `source_plane_coordinate`.
    ///
    /// An empty list means no image was found and is not an error.
    pub fn solve(
        &self,
        model: &dyn LensingModel,
        source_plane_coordinate: Coordinate,
    ) -> Result<CoordinateList> {
        let seeds = source_plane_peaks(model, &self.grid, &source_plane_coordinate)?;
        let mut coordinates = remove_mass_centre_neighbourhoods(&self.config, model, seeds)?;
        debug!(candidates = coordinates.len(), "Seed peaks on base grid");

        let mut pixel_scales = self.grid.pixel_scales();
        let mut level = 0usize;

        if self.config.use_upscaling {
            while pixel_scales.max() > self.config.pixel_scale_precision && !coordinates.is_empty() {
                let refined = self.refine_level(
                    model,
                    &coordinates,
                    pixel_scales,
                    &source_plane_coordinate,
                )?;
                pixel_scales = pixel_scales.upscaled(self.config.upscale_factor)?;
                let merged = merge_plateaus(refined, pixel_scales);
                coordinates = CoordinateList::from_coordinates(&merged, pixel_scales);

                level += 1;
                debug!(
                    level,
                    pixel_scale = pixel_scales.max(),
                    candidates = coordinates.len(),
                    "Refinement level complete"
                );
            }
        }

        let coordinates =
            filter_by_source_distance(&self.config, model, coordinates, &source_plane_coordinate)?;

        info!(
            images = coordinates.len(),
            levels = level,
            source_y = source_plane_coordinate.y,
            source_x = source_plane_coordinate.x,
            "Image positions solved"
        );
        Ok(coordinates)
    }

    /// Solve for several source-plane coordinates, one result per source.
    pub fn solve_for_sources(
        &self,
        model: &dyn LensingModel,
        sources: &[Coordinate],
    ) -> Result<Vec<CoordinateList>> {
        sources
            .par_iter()
            .map(|source| self.solve(model, *source))
            .collect()
    }

    /// Refine every candidate and concatenate the branches in candidate order.
    fn refine_level(
        &self,
        model: &dyn LensingModel,
        coordinates: &CoordinateList,
        pixel_scales: PixelScales,
        source_plane_coordinate: &Coordinate,
    ) -> Result<Vec<Coordinate>> {
        let refine = |coordinate: Coordinate| {
            self.refined_coordinates_from_coordinate(
                model,
                coordinate,
                pixel_scales,
                source_plane_coordinate,
            )
        };

        let branches: Vec<Vec<Coordinate>> = if coordinates.len() >= PARALLEL_CANDIDATE_THRESHOLD {
            coordinates
                .to_vec()
                .into_par_iter()
                .map(refine)
                .collect::<Result<_>>()?
        } else {
            coordinates.iter().map(refine).collect::<Result<_>>()?
        };

        Ok(branches.into_iter().flatten().collect())
    }

    /// Local minima of a finer grid built around one candidate. A branch that
    /// finds none simply contributes nothing.
    fn refined_coordinates_from_coordinate(
        &self,
        model: &dyn LensingModel,
        coordinate: Coordinate,
        pixel_scales: PixelScales,
        source_plane_coordinate: &Coordinate,
    ) -> Result<Vec<Coordinate>> {
        let grid = grid_buffed(
            &self.config,
            coordinate,
            pixel_scales,
            FINDER_REFINE_BUFFER,
            self.config.upscale_factor,
        )?;
        let peaks = source_plane_peaks(model, &grid, source_plane_coordinate)?;
        Ok(peaks.to_vec())
    }
}

struct Cluster {
    anchor: Coordinate,
    sum_y: f64,
    sum_x: f64,
    count: usize,
}

/// Collapse candidates that sit on the same plateau of the refined grid.
///
/// Neighbouring branches rediscover the same fine points, and a minimum that
/// falls between lattice points shows up as a block of tied peaks. Each
/// candidate joins the first cluster whose anchor is within
/// [`PLATEAU_MERGE_PIXELS`] refined pixels on both axes; clusters are replaced
/// by their mean.
fn merge_plateaus(candidates: Vec<Coordinate>, pixel_scales: PixelScales) -> Vec<Coordinate> {
    let tolerance_y = PLATEAU_MERGE_PIXELS * pixel_scales.y();
    let tolerance_x = PLATEAU_MERGE_PIXELS * pixel_scales.x();

    let mut clusters: Vec<Cluster> = Vec::new();
    for candidate in candidates {
        let existing = clusters.iter_mut().find(|cluster| {
            (cluster.anchor.y - candidate.y).abs() <= tolerance_y
                && (cluster.anchor.x - candidate.x).abs() <= tolerance_x
        });
        match existing {
            Some(cluster) => {
                cluster.sum_y += candidate.y;
                cluster.sum_x += candidate.x;
                cluster.count += 1;
            }
            None => clusters.push(Cluster {
                anchor: candidate,
                sum_y: candidate.y,
                sum_x: candidate.x,
                count: 1,
            }),
        }
    }

    clusters
        .into_iter()
        .map(|c| Coordinate::new(c.sum_y / c.count as f64, c.sum_x / c.count as f64))
        .collect()
}
