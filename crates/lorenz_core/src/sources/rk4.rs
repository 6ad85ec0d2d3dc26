use super::{check_step, DataSource, SourceBase};
use crate::bounds::DataBox;
use crate::error::{require_positive, Result};
use crate::point::DataPoint;
use crate::solvers::RK4;
use crate::traits::{Steppable, VectorField};
use log::debug;

const DEFAULT_TIME_STEP: f64 = 0.001;

/// Fourth-order Runge-Kutta integration of a 3-DOF vector field, exposed as
/// a [`DataSource`].
pub struct RungeKutta4<V: VectorField> {
    base: SourceBase,
    system: V,
    solver: RK4<f64>,
    initial_state: DataPoint,
    time_step: f64,
    current: [f64; 3],
    current_time: f64,
    confinement: Option<DataBox>,
}

impl<V: VectorField> RungeKutta4<V> {
    /// Starts from the system's initial-state hint.
    pub fn new(system: V) -> Self {
        let initial_state = system.initial_state_hint();
        let source = Self {
            base: SourceBase::default(),
            system,
            solver: RK4::new(3),
            initial_state,
            time_step: DEFAULT_TIME_STEP,
            current: initial_state.to_array(),
            current_time: 0.0,
            confinement: None,
        };
        debug!(
            "created {} from {}, initial state {}",
            source.name(),
            std::any::type_name::<V>(),
            initial_state
        );
        source
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.base.rename(name);
        self
    }

    /// Sets the initial state and moves the current state there.
    pub fn with_initial_state(mut self, initial_state: DataPoint) -> Self {
        self.initial_state = initial_state;
        self.do_reset();
        self
    }

    pub fn system(&self) -> &V {
        &self.system
    }

    /// Coefficient changes apply from the next step on.
    pub fn system_mut(&mut self) -> &mut V {
        &mut self.system
    }

    /// When on, every new state is mapped through the system's
    /// `data_bounds()` (e.g. wrapping pendulum angles).
    pub fn set_confine_to_bounds(&mut self, confine: bool) {
        self.confinement = confine.then(|| self.system.data_bounds());
    }

    pub fn confines_to_bounds(&self) -> bool {
        self.confinement.is_some()
    }
}

impl<V: VectorField> DataSource for RungeKutta4<V> {
    fn base(&self) -> &SourceBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SourceBase {
        &mut self.base
    }

    fn current_point(&self) -> DataPoint {
        DataPoint::from_finite(self.current)
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn set_time_step(&mut self, time_step: f64) -> Result<()> {
        self.time_step = require_positive("timeStep", time_step)?;
        Ok(())
    }

    fn initial_state(&self) -> DataPoint {
        self.initial_state
    }

    fn set_initial_state(&mut self, initial_state: DataPoint) {
        self.initial_state = initial_state;
    }

    fn data_bounds_hint(&self) -> DataBox {
        self.system.data_bounds()
    }

    fn coordinate_labels(&self) -> [&'static str; 3] {
        self.system.coordinate_labels()
    }

    fn do_step(&mut self) -> Result<()> {
        let mut next = self.current;
        let mut t = self.current_time;
        self.solver
            .step(&self.system, &mut t, &mut next, self.time_step);

        check_step(&self.base, self.current_time, t, &next)?;
        if let Some(bounds) = &self.confinement {
            bounds.apply_to(&mut next);
        }

        self.current = next;
        self.current_time = t;
        Ok(())
    }

    fn do_reset(&mut self) {
        self.current = self.initial_state.to_array();
        self.current_time = 0.0;
    }
}
