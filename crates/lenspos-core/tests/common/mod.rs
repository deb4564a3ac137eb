#![allow(dead_code)]

use ndarray::{Array2, ArrayView2};

use lenspos_core::grid::{Coordinate, PixelScales, UniformGrid};
use lenspos_core::LensingModel;

/// Singular isothermal sphere: a constant-magnitude deflection of
/// `einstein_radius` pointing away from the centre.
pub struct IsothermalSphere {
    pub centre: Coordinate,
    pub einstein_radius: f64,
}

impl LensingModel for IsothermalSphere {
    fn deflections(&self, grid: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros(grid.raw_dim());
        for (i, row) in grid.outer_iter().enumerate() {
            let dy = row[0] - self.centre.y;
            let dx = row[1] - self.centre.x;
            let r = (dy * dy + dx * dx).sqrt();
            // Deflection direction is undefined at the centre itself.
            if r > 0.0 {
                out[[i, 0]] = self.einstein_radius * dy / r;
                out[[i, 1]] = self.einstein_radius * dx / r;
            }
        }
        out
    }

    fn mass_profile_centres(&self) -> Vec<Coordinate> {
        vec![self.centre]
    }
}

/// Folds both axes onto the positive quadrant: `beta = (|y| - offset, |x| - offset)`.
///
/// A source near the origin has one image in each quadrant, at
/// `(+-(offset + beta_y), +-(offset + beta_x))`.
pub struct FourfoldMirror {
    pub offset: f64,
}

impl LensingModel for FourfoldMirror {
    fn deflections(&self, grid: ArrayView2<'_, f64>) -> Array2<f64> {
        grid.mapv(|theta| theta - (theta.abs() - self.offset))
    }

    fn mass_profile_centres(&self) -> Vec<Coordinate> {
        Vec::new()
    }
}

/// A model whose deflection array has the wrong number of rows.
pub struct BrokenModel;

impl LensingModel for BrokenModel {
    fn deflections(&self, _grid: ArrayView2<'_, f64>) -> Array2<f64> {
        Array2::zeros((1, 2))
    }

    fn mass_profile_centres(&self) -> Vec<Coordinate> {
        Vec::new()
    }
}

pub fn sis_at_origin() -> IsothermalSphere {
    IsothermalSphere {
        centre: Coordinate::new(0.0, 0.0),
        einstein_radius: 1.0,
    }
}

pub fn square_grid(edge: usize, pixel_scale: f64) -> UniformGrid {
    UniformGrid::uniform(
        edge,
        PixelScales::square(pixel_scale).unwrap(),
        Coordinate::new(0.0, 0.0),
    )
    .unwrap()
}

pub fn assert_close(actual: Coordinate, expected: Coordinate, tolerance: f64) {
    assert!(
        (actual.y - expected.y).abs() <= tolerance && (actual.x - expected.x).abs() <= tolerance,
        "({}, {}) not within {tolerance} of ({}, {})",
        actual.y,
        actual.x,
        expected.y,
        expected.x
    );
}
