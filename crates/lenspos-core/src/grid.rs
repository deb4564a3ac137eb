//! Coordinate and grid primitives.
//!
//! Both grid types store their points as an `(n, 2)` array of `(y, x)` rows so
//! they can be handed to a [`LensingModel`](crate::lens::LensingModel) without
//! copying. A [`UniformGrid`] additionally promises a square row-major lattice.

use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::consts::MAX_GRID_POINTS;
use crate::error::{LensPosError, Result};

/// A `(y, x)` position in angular units (arc-seconds).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub y: f64,
    pub x: f64,
}

impl Coordinate {
    pub fn new(y: f64, x: f64) -> Self {
        Self { y, x }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        self.squared_distance_to(other).sqrt()
    }

    pub fn squared_distance_to(&self, other: &Coordinate) -> f64 {
        (self.y - other.y).powi(2) + (self.x - other.x).powi(2)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([y, x]: [f64; 2]) -> Self {
        Self { y, x }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.y, c.x]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((y, x): (f64, f64)) -> Self {
        Self { y, x }
    }
}

/// Spacing of a uniform lattice along `(y, x)`. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct PixelScales {
    y: f64,
    x: f64,
}

impl PixelScales {
    pub fn new(y: f64, x: f64) -> Result<Self> {
        if !(y.is_finite() && x.is_finite() && y > 0.0 && x > 0.0) {
            return Err(LensPosError::InvalidPixelScales { y, x });
        }
        Ok(Self { y, x })
    }

    /// For compile-time constants already known to be positive.
    pub(crate) const fn new_unchecked(y: f64, x: f64) -> Self {
        Self { y, x }
    }

    pub fn square(scale: f64) -> Result<Self> {
        Self::new(scale, scale)
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// The coarser of the two axes.
    pub fn max(&self) -> f64 {
        self.y.max(self.x)
    }

    /// Scales of a grid subdivided `factor` times along each axis.
    pub fn upscaled(&self, factor: usize) -> Result<Self> {
        if factor == 0 {
            return Err(LensPosError::InvalidUpscaleFactor(factor));
        }
        Self::new(self.y / factor as f64, self.x / factor as f64)
    }
}

impl TryFrom<[f64; 2]> for PixelScales {
    type Error = LensPosError;

    fn try_from([y, x]: [f64; 2]) -> Result<Self> {
        Self::new(y, x)
    }
}

impl From<PixelScales> for [f64; 2] {
    fn from(s: PixelScales) -> Self {
        [s.y, s.x]
    }
}

/// Edge length of a square lattice holding `len` points, if there is one.
pub fn square_edge(len: usize) -> Option<usize> {
    let edge = (len as f64).sqrt().round() as usize;
    (edge * edge == len).then_some(edge)
}

/// Euclidean distance of every `(y, x)` row of `points` to `coordinate`.
pub fn distances_from(points: ArrayView2<'_, f64>, coordinate: &Coordinate) -> Array1<f64> {
    points
        .outer_iter()
        .map(|row| ((row[0] - coordinate.y).powi(2) + (row[1] - coordinate.x).powi(2)).sqrt())
        .collect()
}

/// Point count of an `edge x edge` lattice, refusing anything past
/// [`MAX_GRID_POINTS`].
pub(crate) fn checked_lattice_len(edge: usize) -> Result<usize> {
    edge.checked_mul(edge)
        .filter(|&len| len <= MAX_GRID_POINTS)
        .ok_or_else(|| {
            LensPosError::GridTooLarge(format!(
                "{edge}x{edge} exceeds {MAX_GRID_POINTS} points"
            ))
        })
}

fn array_from_coordinates(coordinates: &[Coordinate]) -> Array2<f64> {
    Array2::from_shape_fn((coordinates.len(), 2), |(i, axis)| {
        if axis == 0 {
            coordinates[i].y
        } else {
            coordinates[i].x
        }
    })
}

fn check_columns(data: &Array2<f64>) -> Result<()> {
    if data.ncols() != 2 {
        return Err(LensPosError::LengthMismatch {
            expected: 2,
            actual: data.ncols(),
        });
    }
    Ok(())
}

/// A square lattice of coordinates, row-major from the top-left corner.
#[derive(Clone, Debug)]
pub struct UniformGrid {
    data: Array2<f64>,
    pixel_scales: PixelScales,
    edge: usize,
}

impl UniformGrid {
    /// Wrap an `(edge * edge, 2)` array of lattice points.
    pub fn new(data: Array2<f64>, pixel_scales: PixelScales) -> Result<Self> {
        check_columns(&data)?;
        let edge = square_edge(data.nrows()).ok_or(LensPosError::InvalidGridSize(data.nrows()))?;
        Ok(Self {
            data,
            pixel_scales,
            edge,
        })
    }

    /// An `edge x edge` lattice centred on `origin`.
    ///
    /// Rows run top to bottom with decreasing y, columns left to right with
    /// increasing x.
    pub fn uniform(edge: usize, pixel_scales: PixelScales, origin: Coordinate) -> Result<Self> {
        if edge == 0 {
            return Err(LensPosError::InvalidGridSize(0));
        }
        let len = checked_lattice_len(edge)?;
        let centre = (edge as f64 - 1.0) / 2.0;
        let data = Array2::from_shape_fn((len, 2), |(i, axis)| {
            let (row, col) = (i / edge, i % edge);
            if axis == 0 {
                origin.y + (centre - row as f64) * pixel_scales.y()
            } else {
                origin.x + (col as f64 - centre) * pixel_scales.x()
            }
        });
        Ok(Self {
            data,
            pixel_scales,
            edge,
        })
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn edge(&self) -> usize {
        self.edge
    }

    pub fn pixel_scales(&self) -> PixelScales {
        self.pixel_scales
    }

    pub fn coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new(self.data[[index, 0]], self.data[[index, 1]])
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.data
            .outer_iter()
            .map(|row| Coordinate::new(row[0], row[1]))
    }

    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn distances_from(&self, coordinate: &Coordinate) -> Array1<f64> {
        distances_from(self.data.view(), coordinate)
    }
}

/// An ordered set of coordinates with no lattice structure.
#[derive(Clone, Debug)]
pub struct CoordinateList {
    data: Array2<f64>,
    pixel_scales: PixelScales,
}

impl CoordinateList {
    pub fn new(data: Array2<f64>, pixel_scales: PixelScales) -> Result<Self> {
        check_columns(&data)?;
        Ok(Self { data, pixel_scales })
    }

    pub fn from_coordinates(coordinates: &[Coordinate], pixel_scales: PixelScales) -> Self {
        Self {
            data: array_from_coordinates(coordinates),
            pixel_scales,
        }
    }

    pub fn empty(pixel_scales: PixelScales) -> Self {
        Self {
            data: Array2::zeros((0, 2)),
            pixel_scales,
        }
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn pixel_scales(&self) -> PixelScales {
        self.pixel_scales
    }

    pub fn coordinate(&self, index: usize) -> Coordinate {
        Coordinate::new(self.data[[index, 0]], self.data[[index, 1]])
    }

    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.data
            .outer_iter()
            .map(|row| Coordinate::new(row[0], row[1]))
    }

    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.iter().collect()
    }

    pub fn as_array(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn distances_from(&self, coordinate: &Coordinate) -> Array1<f64> {
        distances_from(self.data.view(), coordinate)
    }

    /// Index of the point nearest `coordinate`; the first wins on ties.
    pub fn closest_index(&self, coordinate: &Coordinate) -> Option<usize> {
        self.iter()
            .map(|c| c.squared_distance_to(coordinate))
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}
