//! The 3-degree-of-freedom vector fields shipped with the crate.

mod lorenz;
mod planar_pendulum;
mod rotating_pendulum;

pub use lorenz::{Lorenz, BETA, RHO, SIGMA};
pub use planar_pendulum::PlanarPendulum;
pub use rotating_pendulum::{RotatingPendulum, LAMBDA};

use crate::bounds::{AxisBounds, BoundType, DataBox};
use crate::error::{Error, Result};
use crate::traits::{coefficient_or, Coefficients, VectorField};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Pendulum arm length.
pub const L: &str = "L";
/// Gravitational acceleration.
pub const G: &str = "g";

const L_DEFAULT: f64 = 1.0;
const G_DEFAULT: f64 = 9.8;

/// Pendulum states are `(θ, φ, dθ/dt)`.
const PENDULUM_LABELS: [&str; 3] = ["θ", "φ", "dθ/dt"];

fn pendulum_length(coefficients: &Coefficients, current: f64) -> Result<f64> {
    let length = coefficient_or(coefficients, L, current)?;
    if length <= 0.0 {
        return Err(Error::InvalidCoefficient {
            name: L.to_string(),
            value: length,
            reason: "arm length must be > 0",
        });
    }
    Ok(length)
}

/// θ wraps on `[theta_min, theta_max]`, φ wraps on `[0, 2π]`, θ̇ is left
/// alone on `[-10, 10]`.
fn pendulum_bounds(theta_min: f64, theta_max: f64) -> DataBox {
    DataBox::new(
        AxisBounds::from_finite(theta_min, theta_max, BoundType::Periodic),
        AxisBounds::from_finite(0.0, 2.0 * PI, BoundType::Periodic),
        AxisBounds::from_finite(-10.0, 10.0, BoundType::Permeable),
    )
}

/// Selects one of the built-in systems by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemKind {
    Lorenz,
    PlanarPendulum,
    RotatingPendulum,
}

impl SystemKind {
    pub const ALL: [SystemKind; 3] = [
        SystemKind::Lorenz,
        SystemKind::PlanarPendulum,
        SystemKind::RotatingPendulum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Lorenz => "lorenz",
            SystemKind::PlanarPendulum => "planar_pendulum",
            SystemKind::RotatingPendulum => "rotating_pendulum",
        }
    }

    /// Builds the system with its default coefficients.
    pub fn build(self) -> Box<dyn VectorField> {
        match self {
            SystemKind::Lorenz => Box::new(Lorenz::default()),
            SystemKind::PlanarPendulum => Box::new(PlanarPendulum::default()),
            SystemKind::RotatingPendulum => Box::new(RotatingPendulum::default()),
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_builds_a_field_whose_hint_lies_in_its_bounds() {
        for kind in SystemKind::ALL {
            let field = kind.build();
            let hint = field.initial_state_hint();
            assert!(field.data_bounds().contains(&hint), "{kind}: {hint}");
            assert_eq!(field.coefficients(), field.coefficients_hint(), "{kind}");
        }
    }

    #[test]
    fn kind_names_round_trip_through_serde() {
        #[derive(Deserialize)]
        struct Holder {
            system: SystemKind,
        }
        for kind in SystemKind::ALL {
            let text = format!("system = \"{}\"", kind.name());
            let holder: Holder = toml::from_str(&text).expect("parse");
            assert_eq!(holder.system, kind);
        }
        assert!(toml::from_str::<Holder>("system = \"duffing\"").is_err());
    }
}
