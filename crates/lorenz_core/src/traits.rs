use crate::bounds::DataBox;
use crate::error::Result;
use crate::point::DataPoint;
use num_traits::{Float, FromPrimitive};
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Represents an n-dimensional flow.
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// x: current state
    /// t: current time
    /// out: buffer to write dx/dt into
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    /// dt: step size
    fn step<S>(&mut self, system: &S, t: &mut T, state: &mut [T], dt: T)
    where
        S: DynamicalSystem<T> + ?Sized;
}

/// Named scalar coefficients of a vector field.
pub type Coefficients = BTreeMap<String, f64>;

/// Default coordinate labels.
pub const XYZ_LABELS: [&str; 3] = ["x", "y", "z"];

/// A system of ordinary differential equations with three degrees of freedom.
///
/// Coefficient names are not standardized; every system has its own
/// idiosyncratic set. `set_coefficients` only touches the names it knows
/// about and either applies all of them or none.
pub trait VectorField {
    /// Writes dp/dt evaluated at `(t, p)` into `dpdt`.
    ///
    /// Called several times per step, so it works on caller-owned buffers.
    fn derivatives(&self, t: f64, p: &[f64; 3], dpdt: &mut [f64; 3]);

    /// Suggested region for displaying trajectories of this system.
    fn data_bounds(&self) -> DataBox;

    fn initial_state_hint(&self) -> DataPoint {
        DataPoint::ORIGIN
    }

    fn coordinate_labels(&self) -> [&'static str; 3] {
        XYZ_LABELS
    }

    fn coefficients(&self) -> Coefficients {
        Coefficients::new()
    }

    fn coefficients_hint(&self) -> Coefficients {
        Coefficients::new()
    }

    fn set_coefficients(&mut self, _coefficients: &Coefficients) -> Result<()> {
        Ok(())
    }
}

impl<V: VectorField + ?Sized> VectorField for Box<V> {
    fn derivatives(&self, t: f64, p: &[f64; 3], dpdt: &mut [f64; 3]) {
        (**self).derivatives(t, p, dpdt)
    }

    fn data_bounds(&self) -> DataBox {
        (**self).data_bounds()
    }

    fn initial_state_hint(&self) -> DataPoint {
        (**self).initial_state_hint()
    }

    fn coordinate_labels(&self) -> [&'static str; 3] {
        (**self).coordinate_labels()
    }

    fn coefficients(&self) -> Coefficients {
        (**self).coefficients()
    }

    fn coefficients_hint(&self) -> Coefficients {
        (**self).coefficients_hint()
    }

    fn set_coefficients(&mut self, coefficients: &Coefficients) -> Result<()> {
        (**self).set_coefficients(coefficients)
    }
}

impl<V: VectorField + ?Sized> DynamicalSystem<f64> for V {
    fn dimension(&self) -> usize {
        3
    }

    fn apply(&self, t: f64, x: &[f64], out: &mut [f64]) {
        let p = [x[0], x[1], x[2]];
        let mut dpdt = [0.0; 3];
        self.derivatives(t, &p, &mut dpdt);
        out[..3].copy_from_slice(&dpdt);
    }
}

/// Reads a coefficient from `coefficients`, falling back to `current`, and
/// rejects non-finite values.
pub(crate) fn coefficient_or(
    coefficients: &Coefficients,
    name: &str,
    current: f64,
) -> Result<f64> {
    match coefficients.get(name) {
        None => Ok(current),
        Some(&value) if value.is_finite() => Ok(value),
        Some(&value) => Err(crate::Error::InvalidCoefficient {
            name: name.to_string(),
            value,
            reason: "must be finite",
        }),
    }
}
