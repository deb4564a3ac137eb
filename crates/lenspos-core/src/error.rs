use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensPosError {
    #[error("No image found near ({y}, {x}) for any search factor in {search_factors:?}")]
    PairingNotFound {
        y: f64,
        x: f64,
        search_factors: Vec<usize>,
    },

    #[error("Grid of {0} points is not a square lattice")]
    InvalidGridSize(usize),

    #[error("Grid too large: {0}")]
    GridTooLarge(String),

    #[error("Invalid pixel scales: ({y}, {x})")]
    InvalidPixelScales { y: f64, x: f64 },

    #[error("Upscale factor must be at least 1, got {0}")]
    InvalidUpscaleFactor(usize),

    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Pairer has no search factors")]
    EmptySearchFactors,

    #[error("Invalid solver configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LensPosError>;
