use crate::bounds::DataBox;
use crate::error::Result;
use crate::point::DataPoint;
use crate::traits::{coefficient_or, Coefficients, VectorField};
use log::debug;

pub const SIGMA: &str = "sigma";
pub const RHO: &str = "rho";
pub const BETA: &str = "beta";

const SIGMA_DEFAULT: f64 = 10.0;
const RHO_DEFAULT: f64 = 28.0;
const BETA_DEFAULT: f64 = 8.0 / 3.0;

/// The Lorenz equations
///
/// ```text
/// dx/dt = sigma*(y-x)
/// dy/dt = x*(rho-z) - y
/// dz/dt = x*y - beta*z
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lorenz {
    sigma: f64,
    rho: f64,
    beta: f64,
}

impl Default for Lorenz {
    fn default() -> Self {
        Self {
            sigma: SIGMA_DEFAULT,
            rho: RHO_DEFAULT,
            beta: BETA_DEFAULT,
        }
    }
}

impl Lorenz {
    pub fn new(sigma: f64, rho: f64, beta: f64) -> Result<Self> {
        let mut system = Self::default();
        system.set_coefficients(&Coefficients::from([
            (SIGMA.to_string(), sigma),
            (RHO.to_string(), rho),
            (BETA.to_string(), beta),
        ]))?;
        Ok(system)
    }

    /// The two non-trivial fixed points `(±√(β(ρ-1)), ±√(β(ρ-1)), ρ-1)`,
    /// or `None` when `β(ρ-1) < 0`.
    pub fn nontrivial_fixed_points(&self) -> Option<[DataPoint; 2]> {
        let r2 = self.beta * (self.rho - 1.0);
        if r2.is_nan() || r2 < 0.0 {
            return None;
        }
        let r = r2.sqrt();
        let z = self.rho - 1.0;
        Some([
            DataPoint::new(r, r, z).ok()?,
            DataPoint::new(-r, -r, z).ok()?,
        ])
    }
}

impl VectorField for Lorenz {
    fn derivatives(&self, _t: f64, p: &[f64; 3], dpdt: &mut [f64; 3]) {
        dpdt[0] = self.sigma * (p[1] - p[0]);
        dpdt[1] = p[0] * (self.rho - p[2]) - p[1];
        dpdt[2] = p[0] * p[1] - self.beta * p[2];
    }

    fn data_bounds(&self) -> DataBox {
        DataBox::from_corners(
            &DataPoint::from_finite([-18.0, -18.0, 0.0]),
            &DataPoint::from_finite([18.0, 18.0, 50.0]),
        )
    }

    fn initial_state_hint(&self) -> DataPoint {
        DataPoint::from_finite([1.0, 1.0, 20.0])
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::from([
            (SIGMA.to_string(), self.sigma),
            (RHO.to_string(), self.rho),
            (BETA.to_string(), self.beta),
        ])
    }

    fn coefficients_hint(&self) -> Coefficients {
        Self::default().coefficients()
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients) -> Result<()> {
        let sigma = coefficient_or(coefficients, SIGMA, self.sigma)?;
        let rho = coefficient_or(coefficients, RHO, self.rho)?;
        let beta = coefficient_or(coefficients, BETA, self.beta)?;
        self.sigma = sigma;
        self.rho = rho;
        self.beta = beta;
        debug!("Lorenz coefficients now sigma={sigma}, rho={rho}, beta={beta}");
        Ok(())
    }
}
