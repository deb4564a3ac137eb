use lenspos_core::consts::{
    DEFAULT_MAX_REFINE_ITERATIONS, DEFAULT_PAIR_PRECISION, DEFAULT_PAIR_SEARCH_FACTORS,
    DEFAULT_PIXEL_SCALE_PRECISION, DEFAULT_UPSCALE_FACTOR, MAX_PAIR_SEARCH_FACTOR,
    MAX_UPSCALE_FACTOR,
};
use lenspos_core::grid::{Coordinate, PixelScales};
use lenspos_core::{LensPosError, PairerConfig, SolverConfig};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn test_solver_config_defaults() {
    let config = SolverConfig::default();
    assert!(config.use_upscaling);
    assert_eq!(config.upscale_factor, DEFAULT_UPSCALE_FACTOR);
    assert_eq!(config.pixel_scale_precision, DEFAULT_PIXEL_SCALE_PRECISION);
    assert!(config.distance_from_mass_profile_centre.is_none());
    assert!(config.distance_from_source_centre.is_none());
    assert!(config.min_distance_from_source_centre.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_pairer_config_defaults() {
    let config = PairerConfig::default();
    assert_eq!(config.pair_pixel_scales, PixelScales::square(0.05).unwrap());
    assert_eq!(config.pair_search_factors, DEFAULT_PAIR_SEARCH_FACTORS.to_vec());
    assert_eq!(config.pair_precision, DEFAULT_PAIR_PRECISION);
    assert_eq!(config.max_refine_iterations, DEFAULT_MAX_REFINE_ITERATIONS);
    assert!(config.validate().is_ok());
}

#[test]
fn test_effective_upscale_factor() {
    let mut config = SolverConfig {
        upscale_factor: 3,
        ..SolverConfig::default()
    };
    assert_eq!(config.effective_upscale_factor(), 3);
    config.use_upscaling = false;
    assert_eq!(config.effective_upscale_factor(), 1);
}

// ---------------------------------------------------------------------------
// TOML / JSON
// ---------------------------------------------------------------------------

#[test]
fn test_solver_config_toml_roundtrip() {
    let config = SolverConfig {
        upscale_factor: 3,
        distance_from_mass_profile_centre: Some(0.1),
        ..SolverConfig::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: SolverConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let parsed: SolverConfig = toml::from_str("upscale_factor = 4\n").unwrap();
    assert_eq!(parsed.upscale_factor, 4);
    assert!(parsed.use_upscaling);
    assert_eq!(parsed.pixel_scale_precision, DEFAULT_PIXEL_SCALE_PRECISION);

    let parsed: PairerConfig = toml::from_str("pair_search_factors = [2, 4]\n").unwrap();
    assert_eq!(parsed.pair_search_factors, vec![2, 4]);
    assert_eq!(parsed.pair_pixel_scales, PixelScales::square(0.05).unwrap());
}

#[test]
fn test_pixel_scales_deserialize_as_pair() {
    let parsed: PairerConfig = toml::from_str("pair_pixel_scales = [0.1, 0.2]\n").unwrap();
    assert_eq!(parsed.pair_pixel_scales.y(), 0.1);
    assert_eq!(parsed.pair_pixel_scales.x(), 0.2);
}

#[test]
fn test_negative_pixel_scales_fail_to_deserialize() {
    let parsed: Result<PairerConfig, _> = toml::from_str("pair_pixel_scales = [-0.1, 0.2]\n");
    assert!(parsed.is_err());
}

#[test]
fn test_coordinate_json_is_a_pair() {
    let json = serde_json::to_string(&Coordinate::new(1.5, -2.0)).unwrap();
    assert_eq!(json, "[1.5,-2.0]");
    let parsed: Coordinate = serde_json::from_str("[0.25, 0.5]").unwrap();
    assert_eq!(parsed, Coordinate::new(0.25, 0.5));
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_validate_rejects_bad_values() {
    let bad_precision = SolverConfig {
        pixel_scale_precision: -1.0,
        ..SolverConfig::default()
    };
    assert!(matches!(
        bad_precision.validate(),
        Err(LensPosError::InvalidConfig(_))
    ));

    let bad_radius = SolverConfig {
        distance_from_mass_profile_centre: Some(f64::NAN),
        ..SolverConfig::default()
    };
    assert!(matches!(
        bad_radius.validate(),
        Err(LensPosError::InvalidConfig(_))
    ));

    let bad_iterations = PairerConfig {
        max_refine_iterations: 0,
        ..PairerConfig::default()
    };
    assert!(matches!(
        bad_iterations.validate(),
        Err(LensPosError::InvalidConfig(_))
    ));
}

#[test]
fn test_validate_bounds_grid_sizes() {
    let at_limit = SolverConfig {
        upscale_factor: MAX_UPSCALE_FACTOR,
        ..SolverConfig::default()
    };
    assert!(at_limit.validate().is_ok());

    for upscale_factor in [MAX_UPSCALE_FACTOR + 1, 1 << 33] {
        let config = SolverConfig {
            upscale_factor,
            ..SolverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LensPosError::InvalidConfig(_))
        ));
    }

    let huge_search = PairerConfig {
        pair_search_factors: vec![5, MAX_PAIR_SEARCH_FACTOR + 1],
        ..PairerConfig::default()
    };
    assert!(matches!(
        huge_search.validate(),
        Err(LensPosError::InvalidConfig(_))
    ));
}
