use super::{check_step, DataSource, SourceBase};
use crate::bounds::{Axis, BoundType, DataBox};
use crate::error::{require_positive, Result};
use crate::point::DataPoint;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEFAULT_PULSE_SIZE: f64 = 0.05;
const DEFAULT_V_MAX: f64 = 1.0;
const DEFAULT_TIME_STEP: f64 = 1e-3;
const DEFAULT_BOX_SIZE: f64 = 2.0;

/// A particle with inertia: every step gives each velocity component a
/// random kick of at most `pulse_size`, caps its magnitude at `v_max` and
/// moves the position by `v * h`.
///
/// Crossing a reflective wall reverses the matching velocity component as
/// well as folding the position back inside.
pub struct RandomFlier {
    base: SourceBase,
    rng: StdRng,
    bounds: DataBox,
    pulse_size: f64,
    v_max: f64,
    time_step: f64,
    initial_state: DataPoint,
    initial_velocity: [f64; 3],
    current: [f64; 3],
    velocity: [f64; 3],
    current_time: f64,
}

impl RandomFlier {
    /// Starts at rest at `initial_state`, inside a reflective cube of side 2
    /// centred there.
    pub fn new(initial_state: DataPoint) -> Result<Self> {
        let bounds = DataBox::centered(initial_state, DEFAULT_BOX_SIZE)?
            .with_bound_type(BoundType::Reflective);
        Ok(Self {
            base: SourceBase::default(),
            rng: StdRng::from_os_rng(),
            bounds,
            pulse_size: DEFAULT_PULSE_SIZE,
            v_max: DEFAULT_V_MAX,
            time_step: DEFAULT_TIME_STEP,
            initial_state,
            initial_velocity: [0.0; 3],
            current: initial_state.to_array(),
            velocity: [0.0; 3],
            current_time: 0.0,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.base.rename(name);
        self
    }

    /// Makes the flight reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_bounds(mut self, bounds: DataBox) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn pulse_size(&self) -> f64 {
        self.pulse_size
    }

    pub fn set_pulse_size(&mut self, pulse_size: f64) -> Result<()> {
        self.pulse_size = require_positive("pulseSize", pulse_size)?;
        debug!("{}: pulseSize={}", self.base.name, pulse_size);
        Ok(())
    }

    pub fn v_max(&self) -> f64 {
        self.v_max
    }

    pub fn set_v_max(&mut self, v_max: f64) -> Result<()> {
        self.v_max = require_positive("vMax", v_max)?;
        debug!("{}: vMax={}", self.base.name, v_max);
        Ok(())
    }

    pub fn velocity(&self) -> [f64; 3] {
        self.velocity
    }

    /// Velocity restored on reset. Components are capped at `v_max` on the
    /// first step.
    pub fn set_initial_velocity(&mut self, velocity: DataPoint) {
        self.initial_velocity = velocity.to_array();
    }

    pub fn bounds(&self) -> &DataBox {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: DataBox) {
        self.bounds = bounds;
    }
}

impl DataSource for RandomFlier {
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
        let h = self.time_step;
        let mut next = self.current;
        let mut velocity = self.velocity;
        for axis in Axis::ALL {
            let i = axis.index();
            let kick = self.pulse_size * self.rng.random_range(-1.0..1.0);
            let v = (velocity[i] + kick).clamp(-self.v_max, self.v_max);
            next[i] = self.current[i] + v * h;
            velocity[i] = v;
        }
        let next_time = self.current_time + h;
        check_step(&self.base, self.current_time, next_time, &next)?;

        for axis in Axis::ALL {
            let i = axis.index();
            let side = self.bounds.axis(axis);
            if side.bound_type() == BoundType::Reflective && !side.contains(next[i]) {
                velocity[i] = -velocity[i];
            }
            next[i] = side.apply(next[i]);
        }
        self.current = next;
        self.velocity = velocity;
        self.current_time = next_time;
        Ok(())
    }

    fn do_reset(&mut self) {
        self.current = self.initial_state.to_array();
        self.velocity = self.initial_velocity;
        self.current_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::AxisBounds;
    use crate::error::Error;
    use crate::sources::advance;

    fn flier(seed: u64) -> RandomFlier {
        RandomFlier::new(DataPoint::ORIGIN).unwrap().with_seed(seed)
    }

    #[test]
    fn default_box_is_reflective_cube_around_start() {
        let start = DataPoint::new(10.0, -3.0, 0.5).unwrap();
        let flier = RandomFlier::new(start).unwrap();
        let hint = flier.data_bounds_hint();
        assert_eq!(hint.min_point().to_array(), [9.0, -4.0, -0.5]);
        assert_eq!(hint.max_point().to_array(), [11.0, -2.0, 1.5]);
        for axis in Axis::ALL {
            assert_eq!(hint.axis(axis).bound_type(), BoundType::Reflective);
        }
        assert_eq!(flier.pulse_size(), 0.05);
        assert_eq!(flier.v_max(), 1.0);
        assert_eq!(flier.time_step(), 1e-3);
        assert_eq!(flier.velocity(), [0.0; 3]);
    }

    #[test]
    fn speed_never_exceeds_v_max() {
        let mut flier = flier(5);
        flier.set_pulse_size(0.8).unwrap();
        flier.set_v_max(0.25).unwrap();
        for _ in 0..2_000 {
            flier.step().unwrap();
            assert!(flier.velocity().iter().all(|v| v.abs() <= 0.25));
        }
    }

    #[test]
    fn position_moves_by_velocity_times_step() {
        let mut flier = flier(11);
        flier.step().unwrap();
        let v = flier.velocity();
        let p = flier.current_point().to_array();
        for i in 0..3 {
            assert!((p[i] - v[i] * 1e-3).abs() < 1e-15);
        }
    }

    #[test]
    fn bounces_off_reflective_walls() {
        let thin = DataBox::new(
            AxisBounds::new(-0.01, 0.01, BoundType::Reflective).unwrap(),
            AxisBounds::new(-1.0, 1.0, BoundType::Reflective).unwrap(),
            AxisBounds::new(-1.0, 1.0, BoundType::Reflective).unwrap(),
        );
        let mut flier = flier(2).with_bounds(thin);
        flier.set_initial_velocity(DataPoint::new(1.0, 0.0, 0.0).unwrap());
        flier.set_time_step(0.004).unwrap();
        flier.reset();

        let mut reversals = 0;
        let mut last_vx = flier.velocity()[0];
        for _ in 0..200 {
            flier.step().unwrap();
            assert!(thin.contains(&flier.current_point()));
            let vx = flier.velocity()[0];
            if vx.signum() != last_vx.signum() {
                reversals += 1;
            }
            last_vx = vx;
        }
        assert!(reversals > 0);
    }

    #[test]
    fn periodic_walls_wrap_without_reversing() {
        let ring = DataBox::new(
            AxisBounds::new(0.0, 0.01, BoundType::Periodic).unwrap(),
            AxisBounds::new(-1.0, 1.0, BoundType::Reflective).unwrap(),
            AxisBounds::new(-1.0, 1.0, BoundType::Reflective).unwrap(),
        );
        let mut flier = flier(4).with_bounds(ring);
        flier.set_pulse_size(1e-9).unwrap();
        flier.set_initial_velocity(DataPoint::new(1.0, 0.0, 0.0).unwrap());
        flier.reset();
        for _ in 0..100 {
            flier.step().unwrap();
            assert!(flier.velocity()[0] > 0.0);
            assert!(ring.contains(&flier.current_point()));
        }
    }

    #[test]
    fn reset_restores_position_and_velocity() {
        let mut flier = flier(8);
        advance(&mut flier, 300).unwrap();
        assert_ne!(flier.velocity(), [0.0; 3]);
        flier.reset();
        assert_eq!(flier.velocity(), [0.0; 3]);
        assert_eq!(flier.current_point(), DataPoint::ORIGIN);
        assert_eq!(flier.current_time(), 0.0);
    }

    #[test]
    fn rejects_bad_pulse_and_speed() {
        let mut flier = flier(0);
        assert!(flier.set_pulse_size(0.0).unwrap_err().to_string().contains("pulseSize"));
        assert!(flier.set_v_max(-1.0).unwrap_err().to_string().contains("vMax"));
        assert_eq!(flier.pulse_size(), 0.05);
        assert_eq!(flier.v_max(), 1.0);
    }

    #[test]
    fn overflowing_flight_is_rejected_without_moving() {
        let far = 1e308;
        let open = DataBox::from_corners(
            &DataPoint::new(-far, -far, -far).unwrap(),
            &DataPoint::new(far, far, far).unwrap(),
        );
        let mut flier = flier(3).with_bounds(open);
        flier.set_pulse_size(far).unwrap();
        flier.set_v_max(far).unwrap();
        flier.set_time_step(far).unwrap();

        let mut failed = false;
        for _ in 0..10 {
            let before = (flier.current_point(), flier.velocity(), flier.current_time());
            if let Err(err) = flier.step() {
                assert!(matches!(err, Error::NonFiniteStep { .. }), "{err}");
                assert_eq!(
                    (flier.current_point(), flier.velocity(), flier.current_time()),
                    before
                );
                failed = true;
                break;
            }
        }
        assert!(failed, "flight never overflowed");
    }
}
