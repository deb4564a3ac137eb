/// Default integer subdivision applied per refinement level.
pub const DEFAULT_UPSCALE_FACTOR: usize = 2;

/// Default pixel scale (arc-seconds) below which the finder stops refining.
pub const DEFAULT_PIXEL_SCALE_PRECISION: f64 = 1e-4;

/// Half-width, in coarse pixels, of the grid built around each finder candidate.
pub const FINDER_REFINE_BUFFER: usize = 5;

/// Half-width, in coarse pixels, of the grid built around the pairer estimate.
pub const PAIRER_REFINE_BUFFER: usize = 3;

/// Default pixel scale (arc-seconds) of the pairer's coarse search grids.
pub const DEFAULT_PAIR_PIXEL_SCALE: f64 = 0.05;

/// Default buffer radii tried, in order, by the pairer's coarse search.
pub const DEFAULT_PAIR_SEARCH_FACTORS: [usize; 3] = [5, 10, 20];

/// Default displacement (arc-seconds) at which pairer refinement has converged.
pub const DEFAULT_PAIR_PRECISION: f64 = 1e-4;

/// Upper bound on pairer refinement iterations before giving up on convergence.
pub const DEFAULT_MAX_REFINE_ITERATIONS: usize = 64;

/// Minimum candidate count to refine finder branches with Rayon.
pub const PARALLEL_CANDIDATE_THRESHOLD: usize = 4;

/// Number of neighbours in a Moore neighbourhood.
pub const MOORE_NEIGHBOURS: usize = 8;

/// Refined candidates within this many refined pixels (per axis) of each other
/// are collapsed to their mean before the next level.
pub const PLATEAU_MERGE_PIXELS: f64 = 1.5;

/// Largest lattice, in points, any grid constructor will allocate.
pub const MAX_GRID_POINTS: usize = 1 << 24;

/// Largest accepted per-level subdivision.
pub const MAX_UPSCALE_FACTOR: usize = 64;

/// Largest accepted pairer search buffer radius, in coarse pixels.
pub const MAX_PAIR_SEARCH_FACTOR: usize = 1000;
