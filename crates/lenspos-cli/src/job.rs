use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lenspos_core::grid::{Coordinate, PixelScales, UniformGrid};
use lenspos_core::{PairerConfig, SolverConfig};

use crate::models::{Deflector, LensModel};

/// The finder's base search grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Points per edge of the square grid.
    pub shape: usize,
    pub pixel_scales: PixelScales,
    #[serde(default)]
    pub origin: Coordinate,
}

impl GridConfig {
    pub fn build(&self) -> lenspos_core::Result<UniformGrid> {
        UniformGrid::uniform(self.shape, self.pixel_scales, self.origin)
    }
}

/// Everything one `lenspos` run needs, loaded from TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Source-plane coordinates to solve for.
    pub sources: Vec<Coordinate>,
    /// Approximate observed image positions, used by `pair`.
    #[serde(default)]
    pub positions: Vec<Coordinate>,
    pub grid: GridConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub pairer: PairerConfig,
    pub lens: LensModel,
}

impl Job {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job {}", path.display()))?;
        let job: Job = toml::from_str(&contents)
            .with_context(|| format!("Invalid job file {}", path.display()))?;
        job.lens.validate()?;
        job.solver.validate()?;
        job.pairer.validate()?;
        Ok(job)
    }

    /// A small two-component lens with a single source.
    pub fn example() -> lenspos_core::Result<Self> {
        Ok(Self {
            sources: vec![Coordinate::new(0.05, 0.1)],
            positions: vec![Coordinate::new(0.07, 1.28), Coordinate::new(-0.05, -1.08)],
            grid: GridConfig {
                shape: 100,
                pixel_scales: PixelScales::square(0.05)?,
                origin: Coordinate::default(),
            },
            solver: SolverConfig {
                distance_from_mass_profile_centre: Some(0.1),
                ..SolverConfig::default()
            },
            pairer: PairerConfig::default(),
            lens: LensModel {
                components: vec![
                    Deflector::IsothermalSphere {
                        centre: Coordinate::new(0.0, 0.0),
                        einstein_radius: 1.2,
                    },
                    Deflector::PointMass {
                        centre: Coordinate::new(1.5, -1.0),
                        einstein_radius: 0.1,
                    },
                ],
            },
        })
    }
}
