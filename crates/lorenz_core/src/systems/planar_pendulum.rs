use super::{pendulum_bounds, pendulum_length, G, G_DEFAULT, L, L_DEFAULT, PENDULUM_LABELS};
use crate::bounds::DataBox;
use crate::error::Result;
use crate::point::DataPoint;
use crate::traits::{coefficient_or, Coefficients, VectorField};
use log::debug;
use std::f64::consts::PI;

/// Spherical pendulum with no motion about the vertical axis (dφ/dt = 0).
///
/// With `p = (θ, φ, dθ/dt)`:
///
/// ```text
/// dθ/dt      = θ̇
/// dφ/dt      = 0
/// d(θ̇)/dt    = -(g/L) sin θ
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarPendulum {
    length: f64,
    gravity: f64,
    minus_g_over_l: f64,
}

impl Default for PlanarPendulum {
    fn default() -> Self {
        Self {
            length: L_DEFAULT,
            gravity: G_DEFAULT,
            minus_g_over_l: -G_DEFAULT / L_DEFAULT,
        }
    }
}

impl PlanarPendulum {
    pub fn new(length: f64, gravity: f64) -> Result<Self> {
        let mut system = Self::default();
        system.set_coefficients(&Coefficients::from([
            (L.to_string(), length),
            (G.to_string(), gravity),
        ]))?;
        Ok(system)
    }

    /// Energy per unit mass, `½ L² θ̇² - g L cos θ`. Conserved by the flow.
    pub fn energy(&self, p: &[f64; 3]) -> f64 {
        0.5 * self.length * self.length * p[2] * p[2] - self.gravity * self.length * p[0].cos()
    }
}

impl VectorField for PlanarPendulum {
    fn derivatives(&self, _t: f64, p: &[f64; 3], dpdt: &mut [f64; 3]) {
        dpdt[0] = p[2];
        dpdt[1] = 0.0;
        dpdt[2] = self.minus_g_over_l * p[0].sin();
    }

    fn data_bounds(&self) -> DataBox {
        pendulum_bounds(-PI, PI)
    }

    fn initial_state_hint(&self) -> DataPoint {
        DataPoint::from_finite([7.0 * PI / 8.0, 0.0, 0.0])
    }

    fn coordinate_labels(&self) -> [&'static str; 3] {
        PENDULUM_LABELS
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::from([(L.to_string(), self.length), (G.to_string(), self.gravity)])
    }

    fn coefficients_hint(&self) -> Coefficients {
        Self::default().coefficients()
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients) -> Result<()> {
        let length = pendulum_length(coefficients, self.length)?;
        let gravity = coefficient_or(coefficients, G, self.gravity)?;
        self.length = length;
        self.gravity = gravity;
        self.minus_g_over_l = -gravity / length;
        debug!("planar pendulum coefficients now L={length}, g={gravity}");
        Ok(())
    }
}
