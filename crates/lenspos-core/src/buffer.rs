//! Square search grids built around a single coordinate.

use ndarray::Array2;

use crate::error::{LensPosError, Result};
use crate::grid::{checked_lattice_len, Coordinate, PixelScales, UniformGrid};

/// Build a square grid of `upscale_factor * (2 * buffer + 1)` points per edge
/// around `coordinate`, spaced at `pixel_scales / upscale_factor`.
///
/// With an odd edge the centre point sits exactly on `coordinate`. With an
/// even edge no point does, and the lattice straddles it symmetrically with
/// the nearest points half a subdivided pixel away on each axis.
pub fn grid_buffed_around_coordinate(
    coordinate: Coordinate,
    pixel_scales: PixelScales,
    buffer: usize,
    upscale_factor: usize,
) -> Result<UniformGrid> {
    if upscale_factor == 0 {
        return Err(LensPosError::InvalidUpscaleFactor(upscale_factor));
    }
    let scales = pixel_scales.upscaled(upscale_factor)?;
    let edge = buffer
        .checked_mul(2)
        .and_then(|b| b.checked_add(1))
        .and_then(|cells| cells.checked_mul(upscale_factor))
        .ok_or_else(|| {
            LensPosError::GridTooLarge(format!(
                "buffer {buffer} at upscale factor {upscale_factor}"
            ))
        })?;
    let len = checked_lattice_len(edge)?;

    let y_half = scales.y() / 2.0;
    let x_half = scales.x() / 2.0;

    // Odd edges run -(e-1)/2..=(e-1)/2 and cancel the half-pixel shift;
    // even edges run -e/2..e/2 and keep it.
    let (edge_start, y_odd, x_odd) = if edge % 2 != 0 {
        (-(((edge - 1) / 2) as i64), y_half, x_half)
    } else {
        (-((edge / 2) as i64), 0.0, 0.0)
    };

    let data = Array2::from_shape_fn((len, 2), |(i, axis)| {
        let row = edge_start + (i / edge) as i64;
        let col = edge_start + (i % edge) as i64;
        if axis == 0 {
            coordinate.y - row as f64 * scales.y() - y_half + y_odd
        } else {
            coordinate.x + col as f64 * scales.x() + x_half - x_odd
        }
    });

    UniformGrid::new(data, scales)
}
