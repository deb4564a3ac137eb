mod common;

use approx::assert_abs_diff_eq;

use lenspos_core::grid::{square_edge, Coordinate, CoordinateList, PixelScales, UniformGrid};
use lenspos_core::LensPosError;

// ---------------------------------------------------------------------------
// PixelScales
// ---------------------------------------------------------------------------

#[test]
fn test_pixel_scales_reject_non_positive() {
    assert!(PixelScales::new(0.0, 0.1).is_err());
    assert!(PixelScales::new(0.1, -0.1).is_err());
    assert!(PixelScales::new(f64::NAN, 0.1).is_err());
    assert!(PixelScales::new(0.1, f64::INFINITY).is_err());
}

#[test]
fn test_pixel_scales_upscaled_divides_both_axes() {
    let scales = PixelScales::new(0.2, 0.1).unwrap().upscaled(4).unwrap();
    assert_abs_diff_eq!(scales.y(), 0.05);
    assert_abs_diff_eq!(scales.x(), 0.025);
    assert_abs_diff_eq!(scales.max(), 0.05);
}

#[test]
fn test_pixel_scales_upscaled_by_zero_fails() {
    let scales = PixelScales::square(0.1).unwrap();
    assert!(matches!(
        scales.upscaled(0),
        Err(LensPosError::InvalidUpscaleFactor(0))
    ));
}

// ---------------------------------------------------------------------------
// UniformGrid
// ---------------------------------------------------------------------------

#[test]
fn test_square_edge() {
    assert_eq!(square_edge(0), Some(0));
    assert_eq!(square_edge(1), Some(1));
    assert_eq!(square_edge(49), Some(7));
    assert_eq!(square_edge(50), None);
}

#[test]
fn test_uniform_grid_layout_is_row_major_from_top_left() {
    let grid = common::square_grid(3, 1.0);
    assert_eq!(grid.len(), 9);
    assert_eq!(grid.edge(), 3);

    let first = grid.coordinate(0);
    assert_abs_diff_eq!(first.y, 1.0);
    assert_abs_diff_eq!(first.x, -1.0);

    let centre = grid.coordinate(4);
    assert_abs_diff_eq!(centre.y, 0.0);
    assert_abs_diff_eq!(centre.x, 0.0);

    let last = grid.coordinate(8);
    assert_abs_diff_eq!(last.y, -1.0);
    assert_abs_diff_eq!(last.x, 1.0);
}

#[test]
fn test_uniform_grid_even_edge_straddles_origin() {
    let origin = Coordinate::new(0.5, -0.5);
    let grid = UniformGrid::uniform(2, PixelScales::square(0.2).unwrap(), origin).unwrap();
    let ys: Vec<f64> = grid.iter().map(|c| c.y).collect();
    let xs: Vec<f64> = grid.iter().map(|c| c.x).collect();
    assert_abs_diff_eq!(ys[0], 0.6, epsilon = 1e-12);
    assert_abs_diff_eq!(ys[3], 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(xs[0], -0.6, epsilon = 1e-12);
    assert_abs_diff_eq!(xs[3], -0.4, epsilon = 1e-12);
}

#[test]
fn test_uniform_grid_rejects_zero_edge() {
    let scales = PixelScales::square(0.1).unwrap();
    assert!(UniformGrid::uniform(0, scales, Coordinate::default()).is_err());
}

#[test]
fn test_uniform_grid_rejects_oversized_edge() {
    let scales = PixelScales::square(0.1).unwrap();
    for edge in [1usize << 33, 5000] {
        let result = UniformGrid::uniform(edge, scales, Coordinate::default());
        assert!(matches!(result, Err(LensPosError::GridTooLarge(_))), "edge={edge}");
    }
}

#[test]
fn test_uniform_grid_new_rejects_non_square_length() {
    let data = ndarray::Array2::<f64>::zeros((10, 2));
    let result = UniformGrid::new(data, PixelScales::square(0.1).unwrap());
    assert!(matches!(result, Err(LensPosError::InvalidGridSize(10))));
}

#[test]
fn test_grid_distances() {
    let grid = common::square_grid(3, 1.0);
    let distances = grid.distances_from(&Coordinate::new(0.0, 0.0));
    assert_abs_diff_eq!(distances[4], 0.0);
    assert_abs_diff_eq!(distances[1], 1.0);
    assert_abs_diff_eq!(distances[0], 2f64.sqrt());
}

// ---------------------------------------------------------------------------
// CoordinateList
// ---------------------------------------------------------------------------

#[test]
fn test_closest_index_prefers_first_on_tie() {
    let scales = PixelScales::square(0.1).unwrap();
    let list = CoordinateList::from_coordinates(
        &[
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(3.0, 3.0),
        ],
        scales,
    );
    assert_eq!(list.closest_index(&Coordinate::new(0.0, 0.0)), Some(0));
    assert_eq!(list.closest_index(&Coordinate::new(2.5, 2.0)), Some(2));
}

#[test]
fn test_closest_index_on_empty_list() {
    let list = CoordinateList::empty(PixelScales::square(0.1).unwrap());
    assert!(list.is_empty());
    assert_eq!(list.closest_index(&Coordinate::default()), None);
}

#[test]
fn test_coordinate_list_round_trips_coordinates() {
    let coords = vec![Coordinate::new(0.1, 0.2), Coordinate::new(-0.3, 0.4)];
    let list = CoordinateList::from_coordinates(&coords, PixelScales::square(0.1).unwrap());
    assert_eq!(list.len(), 2);
    assert_eq!(list.to_vec(), coords);
}

#[test]
fn test_coordinate_distance() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(3.0, 4.0);
    assert_abs_diff_eq!(a.distance_to(&b), 5.0);
    assert_abs_diff_eq!(a.squared_distance_to(&b), 25.0);
}
