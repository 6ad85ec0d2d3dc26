use super::{check_step, DataSource, SourceBase};
use crate::bounds::{AxisBounds, BoundType, DataBox};
use crate::error::{require_positive, Result};
use crate::point::DataPoint;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEFAULT_STEP_SIZE: f64 = 0.01;
const DEFAULT_TIME_STEP: f64 = 1e-3;

/// Brownian-style walk: every step moves each coordinate by a uniform random
/// amount in `[-step_size, step_size)`, then confines it to the box.
pub struct RandomWalker {
    base: SourceBase,
    rng: StdRng,
    bounds: DataBox,
    step_size: f64,
    time_step: f64,
    initial_state: DataPoint,
    current: [f64; 3],
    current_time: f64,
}

impl Default for RandomWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomWalker {
    /// Starts at the origin inside the reflective cube `[-1, 1]³`.
    pub fn new() -> Self {
        let unit = AxisBounds::from_finite(-1.0, 1.0, BoundType::Reflective);
        Self {
            base: SourceBase::default(),
            rng: StdRng::from_os_rng(),
            bounds: DataBox::new(unit, unit, unit),
            step_size: DEFAULT_STEP_SIZE,
            time_step: DEFAULT_TIME_STEP,
            initial_state: DataPoint::ORIGIN,
            current: DataPoint::ORIGIN.to_array(),
            current_time: 0.0,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.base.rename(name);
        self
    }

    /// Makes the walk reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_bounds(mut self, bounds: DataBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the initial state and moves the current state there.
    pub fn with_initial_state(mut self, initial_state: DataPoint) -> Self {
        self.initial_state = initial_state;
        self.do_reset();
        self
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: f64) -> Result<()> {
        self.step_size = require_positive("stepSize", step_size)?;
        debug!("{}: stepSize={}", self.base.name, step_size);
        Ok(())
    }

    pub fn bounds(&self) -> &DataBox {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: DataBox) {
        self.bounds = bounds;
    }
}

impl DataSource for RandomWalker {
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
        self.bounds
    }

    fn do_step(&mut self) -> Result<()> {
        let mut next = self.current;
        for v in &mut next {
            *v += self.step_size * self.rng.random_range(-1.0..1.0);
        }
        let next_time = self.current_time + self.time_step;
        check_step(&self.base, self.current_time, next_time, &next)?;

        self.bounds.apply_to(&mut next);
        self.current = next;
        self.current_time = next_time;
        Ok(())
    }

    fn do_reset(&mut self) {
        self.current = self.initial_state.to_array();
        self.current_time = 0.0;
    }
}
