//! Analytic deflectors for job files.
//!
//! A job's lens is the sum of its components' deflection fields.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use lenspos_core::grid::Coordinate;
use lenspos_core::LensingModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Deflector {
    /// alpha = theta_E^2 * r_vec / r^2
    PointMass {
        centre: Coordinate,
        einstein_radius: f64,
    },
    /// alpha = theta_E * r_vec / r
    IsothermalSphere {
        centre: Coordinate,
        einstein_radius: f64,
    },
}

impl Deflector {
    pub fn centre(&self) -> Coordinate {
        match self {
            Deflector::PointMass { centre, .. } | Deflector::IsothermalSphere { centre, .. } => {
                *centre
            }
        }
    }

    pub fn einstein_radius(&self) -> f64 {
        match self {
            Deflector::PointMass {
                einstein_radius, ..
            }
            | Deflector::IsothermalSphere {
                einstein_radius, ..
            } => *einstein_radius,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Deflector::PointMass { .. } => "point mass",
            Deflector::IsothermalSphere { .. } => "isothermal sphere",
        }
    }

    /// Deflection at `(y, x)`. Zero exactly at the centre, where the
    /// direction of the field is undefined.
    fn deflection_at(&self, y: f64, x: f64) -> (f64, f64) {
        let centre = self.centre();
        let (dy, dx) = (y - centre.y, x - centre.x);
        let r_squared = dy * dy + dx * dx;
        if r_squared == 0.0 {
            return (0.0, 0.0);
        }

        let factor = match self {
            Deflector::PointMass {
                einstein_radius, ..
            } => einstein_radius * einstein_radius / r_squared,
            Deflector::IsothermalSphere {
                einstein_radius, ..
            } => einstein_radius / r_squared.sqrt(),
        };
        (factor * dy, factor * dx)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LensModel {
    pub components: Vec<Deflector>,
}

impl LensModel {
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, component) in self.components.iter().enumerate() {
            let radius = component.einstein_radius();
            if !(radius.is_finite() && radius >= 0.0) {
                anyhow::bail!(
                    "Lens component {i} ({}) has invalid einstein_radius {radius}",
                    component.name()
                );
            }
        }
        Ok(())
    }
}

impl LensingModel for LensModel {
    fn deflections(&self, grid: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut deflections = Array2::<f64>::zeros(grid.raw_dim());
        for (row, mut out) in grid.outer_iter().zip(deflections.outer_iter_mut()) {
            for component in &self.components {
                let (ay, ax) = component.deflection_at(row[0], row[1]);
                out[0] += ay;
                out[1] += ax;
            }
        }
        deflections
    }

    fn mass_profile_centres(&self) -> Vec<Coordinate> {
        self.components.iter().map(Deflector::centre).collect()
    }
}
