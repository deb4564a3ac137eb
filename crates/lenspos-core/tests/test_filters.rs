use ndarray::array;

use lenspos_core::filter::{grid_outside_distance, grid_within_distance};
use lenspos_core::grid::{Coordinate, CoordinateList, PixelScales};
use lenspos_core::LensPosError;

fn sample_list() -> CoordinateList {
    CoordinateList::from_coordinates(
        &[
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(0.0, -3.0),
        ],
        PixelScales::square(0.1).unwrap(),
    )
}

#[test]
fn test_outside_distance_keeps_far_points_in_order() {
    let list = sample_list();
    let distances = list.distances_from(&Coordinate::new(0.0, 0.0));
    let kept = grid_outside_distance(&list, &distances, 1.0).unwrap();
    assert_eq!(
        kept.to_vec(),
        vec![Coordinate::new(2.0, 0.0), Coordinate::new(0.0, -3.0)]
    );
    assert_eq!(kept.pixel_scales(), list.pixel_scales());
}

#[test]
fn test_within_distance_is_strict() {
    let list = sample_list();
    let distances = list.distances_from(&Coordinate::new(0.0, 0.0));
    let kept = grid_within_distance(&list, &distances, 2.0).unwrap();
    assert_eq!(
        kept.to_vec(),
        vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]
    );
}

#[test]
fn test_within_distance_is_idempotent() {
    let list = sample_list();
    let centre = Coordinate::new(0.5, 0.5);
    let once = grid_within_distance(&list, &list.distances_from(&centre), 2.5).unwrap();
    let twice = grid_within_distance(&once, &once.distances_from(&centre), 2.5).unwrap();
    assert_eq!(once.to_vec(), twice.to_vec());
}

#[test]
fn test_filters_may_return_empty() {
    let list = sample_list();
    let distances = list.distances_from(&Coordinate::new(0.0, 0.0));
    assert!(grid_within_distance(&list, &distances, 0.0)
        .unwrap()
        .is_empty());
    assert!(grid_outside_distance(&list, &distances, 10.0)
        .unwrap()
        .is_empty());
}

#[test]
fn test_filter_length_mismatch() {
    let list = sample_list();
    let distances = array![1.0, 2.0];
    assert!(matches!(
        grid_within_distance(&list, &distances, 1.0),
        Err(LensPosError::LengthMismatch {
            expected: 4,
            actual: 2
        })
    ));
}
