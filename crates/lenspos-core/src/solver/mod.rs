//! Multiple-image position solvers.
//!
//! [`PositionsFinder`] searches a whole base grid for every image of a
//! source-plane coordinate. [`PositionsPairer`] starts from one approximate
//! observed position and refines the image nearest to it.
//!
//! Both repeat the same step at finer and finer resolution: build a lattice,
//! trace it through the lens, and keep the lattice points whose source-plane
//! distance to the target is a local minimum.

mod finder;
mod pairer;

pub use finder::PositionsFinder;
pub use pairer::PositionsPairer;

use serde::{Deserialize, Serialize};

use crate::buffer::grid_buffed_around_coordinate;
use crate::consts::{
    DEFAULT_MAX_REFINE_ITERATIONS, DEFAULT_PAIR_PIXEL_SCALE, DEFAULT_PAIR_PRECISION,
    DEFAULT_PAIR_SEARCH_FACTORS, DEFAULT_PIXEL_SCALE_PRECISION, DEFAULT_UPSCALE_FACTOR,
    MAX_PAIR_SEARCH_FACTOR, MAX_UPSCALE_FACTOR,
};
use crate::error::{LensPosError, Result};
use crate::filter::{grid_outside_distance, grid_within_distance};
use crate::grid::{distances_from, Coordinate, CoordinateList, PixelScales, UniformGrid};
use crate::lens::{source_plane_distances, LensingModel};
use crate::peaks::grid_peaks;
use crate::topology::NeighborTable;

/// Settings shared by the finder and the pairer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Refine candidates on successively subdivided grids.
    #[serde(default = "default_use_upscaling")]
    pub use_upscaling: bool,
    /// Subdivision applied per refinement level.
    #[serde(default = "default_upscale_factor")]
    pub upscale_factor: usize,
    /// Pixel scale at which the finder stops refining, in the grid's angular units.
    #[serde(default = "default_pixel_scale_precision")]
    pub pixel_scale_precision: f64,
    /// Drop seed candidates at or within this distance of any mass centre.
    #[serde(default)]
    pub distance_from_mass_profile_centre: Option<f64>,
    /// Keep only final positions that trace to strictly within this distance of the source.
    #[serde(default)]
    pub distance_from_source_centre: Option<f64>,
    /// Keep only final positions that trace to strictly beyond this distance of the source.
    #[serde(default)]
    pub min_distance_from_source_centre: Option<f64>,
}

fn default_use_upscaling() -> bool {
    true
}
fn default_upscale_factor() -> usize {
    DEFAULT_UPSCALE_FACTOR
}
fn default_pixel_scale_precision() -> f64 {
    DEFAULT_PIXEL_SCALE_PRECISION
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            use_upscaling: true,
            upscale_factor: DEFAULT_UPSCALE_FACTOR,
            pixel_scale_precision: DEFAULT_PIXEL_SCALE_PRECISION,
            distance_from_mass_profile_centre: None,
            distance_from_source_centre: None,
            min_distance_from_source_centre: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.upscale_factor == 0 {
            return Err(LensPosError::InvalidUpscaleFactor(self.upscale_factor));
        }
        if self.upscale_factor > MAX_UPSCALE_FACTOR {
            return Err(LensPosError::InvalidConfig(format!(
                "upscale_factor must be at most {MAX_UPSCALE_FACTOR}, got {}",
                self.upscale_factor
            )));
        }
        if !(self.pixel_scale_precision.is_finite() && self.pixel_scale_precision > 0.0) {
            return Err(LensPosError::InvalidConfig(format!(
                "pixel_scale_precision must be positive, got {}",
                self.pixel_scale_precision
            )));
        }
        let distances = [
            ("distance_from_mass_profile_centre", self.distance_from_mass_profile_centre),
            ("distance_from_source_centre", self.distance_from_source_centre),
            ("min_distance_from_source_centre", self.min_distance_from_source_centre),
        ];
        for (name, value) in distances {
            if let Some(d) = value {
                if !(d.is_finite() && d >= 0.0) {
                    return Err(LensPosError::InvalidConfig(format!(
                        "{name} must be non-negative, got {d}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Subdivision actually applied when building refinement grids.
    pub fn effective_upscale_factor(&self) -> usize {
        if self.use_upscaling {
            self.upscale_factor
        } else {
            1
        }
    }
}

/// Settings specific to [`PositionsPairer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairerConfig {
    /// Spacing of the coarse search grids.
    #[serde(default = "default_pair_pixel_scales")]
    pub pair_pixel_scales: PixelScales,
    /// Buffer radii tried in order until one yields a candidate.
    #[serde(default = "default_pair_search_factors")]
    pub pair_search_factors: Vec<usize>,
    /// Refinement stops once successive estimates move less than this.
    #[serde(default = "default_pair_precision")]
    pub pair_precision: f64,
    #[serde(default = "default_max_refine_iterations")]
    pub max_refine_iterations: usize,
}

fn default_pair_pixel_scales() -> PixelScales {
    PixelScales::new_unchecked(DEFAULT_PAIR_PIXEL_SCALE, DEFAULT_PAIR_PIXEL_SCALE)
}
fn default_pair_search_factors() -> Vec<usize> {
    DEFAULT_PAIR_SEARCH_FACTORS.to_vec()
}
fn default_pair_precision() -> f64 {
    DEFAULT_PAIR_PRECISION
}
fn default_max_refine_iterations() -> usize {
    DEFAULT_MAX_REFINE_ITERATIONS
}

impl Default for PairerConfig {
    fn default() -> Self {
        Self {
            pair_pixel_scales: default_pair_pixel_scales(),
            pair_search_factors: default_pair_search_factors(),
            pair_precision: DEFAULT_PAIR_PRECISION,
            max_refine_iterations: DEFAULT_MAX_REFINE_ITERATIONS,
        }
    }
}

impl PairerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.pair_search_factors.is_empty() {
            return Err(LensPosError::EmptySearchFactors);
        }
        if let Some(&factor) = self
            .pair_search_factors
            .iter()
            .find(|&&f| f > MAX_PAIR_SEARCH_FACTOR)
        {
            return Err(LensPosError::InvalidConfig(format!(
                "pair_search_factors must be at most {MAX_PAIR_SEARCH_FACTOR}, got {factor}"
            )));
        }
        if !(self.pair_precision.is_finite() && self.pair_precision > 0.0) {
            return Err(LensPosError::InvalidConfig(format!(
                "pair_precision must be positive, got {}",
                self.pair_precision
            )));
        }
        if self.max_refine_iterations == 0 {
            return Err(LensPosError::InvalidConfig(
                "max_refine_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Square grid around `coordinate`, subdivided only when upscaling is enabled.
fn grid_buffed(
    config: &SolverConfig,
    coordinate: Coordinate,
    pixel_scales: PixelScales,
    buffer: usize,
    upscale_factor: usize,
) -> Result<UniformGrid> {
    let factor = if config.use_upscaling { upscale_factor } else { 1 };
    grid_buffed_around_coordinate(coordinate, pixel_scales, buffer, factor)
}

/// Lattice points of `grid` whose traced distance to the target is a local minimum.
fn source_plane_peaks(
    model: &dyn LensingModel,
    grid: &UniformGrid,
    source_plane_coordinate: &Coordinate,
) -> Result<CoordinateList> {
    let distances = source_plane_distances(model, grid.as_array(), source_plane_coordinate)?;
    let neighbors = NeighborTable::square(grid.len())?;
    grid_peaks(grid, &distances, &neighbors)
}

/// Remove candidates lying within the exclusion radius of any mass centre.
fn remove_mass_centre_neighbourhoods(
    config: &SolverConfig,
    model: &dyn LensingModel,
    coordinates: CoordinateList,
) -> Result<CoordinateList> {
    let Some(radius) = config.distance_from_mass_profile_centre else {
        return Ok(coordinates);
    };

    model
        .mass_profile_centres()
        .iter()
        .try_fold(coordinates, |survivors, centre| {
            let distances = distances_from(survivors.as_array(), centre);
            grid_outside_distance(&survivors, &distances, radius)
        })
}

/// Apply the configured source-plane distance bounds to final positions.
fn filter_by_source_distance(
    config: &SolverConfig,
    model: &dyn LensingModel,
    mut coordinates: CoordinateList,
    source_plane_coordinate: &Coordinate,
) -> Result<CoordinateList> {
    if let Some(max) = config.distance_from_source_centre {
        let distances =
            source_plane_distances(model, coordinates.as_array(), source_plane_coordinate)?;
        coordinates = grid_within_distance(&coordinates, &distances, max)?;
    }
    if let Some(min) = config.min_distance_from_source_centre {
        let distances =
            source_plane_distances(model, coordinates.as_array(), source_plane_coordinate)?;
        coordinates = grid_outside_distance(&coordinates, &distances, min)?;
    }
    Ok(coordinates)
}
