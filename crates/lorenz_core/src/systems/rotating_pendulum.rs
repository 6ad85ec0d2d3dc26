use super::{pendulum_bounds, pendulum_length, G, G_DEFAULT, L, L_DEFAULT, PENDULUM_LABELS};
use crate::bounds::DataBox;
use crate::error::Result;
use crate::point::DataPoint;
use crate::traits::{coefficient_or, Coefficients, VectorField};
use log::debug;
use std::f64::consts::PI;

pub const LAMBDA: &str = "lambda";

const LAMBDA_DEFAULT: f64 = 1.0;

/// Spherical pendulum with a conserved angular momentum about the vertical
/// axis, parametrized by `λ = (L sin θ)² dφ/dt`.
///
/// With `p = (θ, φ, dθ/dt)`:
///
/// ```text
/// dφ/dt   = λ / (L sin θ)²
/// dθ/dt   = θ̇
/// d(θ̇)/dt = sin θ cos θ (dφ/dt)² - (g/L) sin θ
/// ```
///
/// The field is singular at θ = 0 and θ = π where `sin θ` vanishes; nothing
/// here guards against it. Evaluating there yields non-finite derivatives,
/// which the integrating data source reports as a failed step.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatingPendulum {
    length: f64,
    gravity: f64,
    lambda: f64,
    minus_g_over_l: f64,
}

impl Default for RotatingPendulum {
    fn default() -> Self {
        Self {
            length: L_DEFAULT,
            gravity: G_DEFAULT,
            lambda: LAMBDA_DEFAULT,
            minus_g_over_l: -G_DEFAULT / L_DEFAULT,
        }
    }
}

impl RotatingPendulum {
    pub fn new(length: f64, gravity: f64, lambda: f64) -> Result<Self> {
        let mut system = Self::default();
        system.set_coefficients(&Coefficients::from([
            (L.to_string(), length),
            (G.to_string(), gravity),
            (LAMBDA.to_string(), lambda),
        ]))?;
        Ok(system)
    }

    pub fn phi_dot(&self, theta: f64) -> f64 {
        let l_sin_theta = self.length * theta.sin();
        self.lambda / (l_sin_theta * l_sin_theta)
    }
}

impl VectorField for RotatingPendulum {
    fn derivatives(&self, _t: f64, p: &[f64; 3], dpdt: &mut [f64; 3]) {
        let sin_theta = p[0].sin();
        let phi_dot = self.phi_dot(p[0]);
        dpdt[0] = p[2];
        dpdt[1] = phi_dot;
        dpdt[2] = sin_theta * p[0].cos() * phi_dot * phi_dot + self.minus_g_over_l * sin_theta;
    }

    fn data_bounds(&self) -> DataBox {
        pendulum_bounds(0.0, PI)
    }

    fn initial_state_hint(&self) -> DataPoint {
        DataPoint::from_finite([2.0 * PI / 3.0, 0.0, 0.0])
    }

    fn coordinate_labels(&self) -> [&'static str; 3] {
        PENDULUM_LABELS
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::from([
            (L.to_string(), self.length),
            (G.to_string(), self.gravity),
            (LAMBDA.to_string(), self.lambda),
        ])
    }

    fn coefficients_hint(&self) -> Coefficients {
        Self::default().coefficients()
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients) -> Result<()> {
        let length = pendulum_length(coefficients, self.length)?;
        let gravity = coefficient_or(coefficients, G, self.gravity)?;
        let lambda = coefficient_or(coefficients, LAMBDA, self.lambda)?;
        self.length = length;
        self.gravity = gravity;
        self.lambda = lambda;
        self.minus_g_over_l = -gravity / length;
        debug!("rotating pendulum coefficients now L={length}, g={gravity}, lambda={lambda}");
        Ok(())
    }
}
