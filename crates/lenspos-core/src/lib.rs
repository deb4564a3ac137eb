pub mod buffer;
pub mod consts;
pub mod error;
pub mod filter;
pub mod grid;
pub mod lens;
pub mod peaks;
pub mod solver;
pub mod topology;

pub use error::{LensPosError, Result};
pub use grid::{Coordinate, CoordinateList, PixelScales, UniformGrid};
pub use lens::LensingModel;
pub use solver::{PairerConfig, PositionsFinder, PositionsPairer, SolverConfig};
