use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic fixed-step Runge-Kutta 4th order solver.
///
/// Stage buffers are sized once in [`RK4::new`] and reused by every step.
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            tmp: vec![T::zero(); dim],
        }
    }

    pub fn dimension(&self) -> usize {
        self.tmp.len()
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step<S>(&mut self, system: &S, t: &mut T, state: &mut [T], dt: T)
    where
        S: DynamicalSystem<T> + ?Sized,
    {
        debug_assert_eq!(state.len(), self.tmp.len());

        let two = T::one() + T::one();
        let half = T::one() / two;
        let sixth = T::one() / (two * (two + T::one()));

        let t0 = *t;
        let t_half = t0 + dt * half;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t_half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        system.apply(t_half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        // y_next = y + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }

        *t = t0 + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zero;

    impl DynamicalSystem<f64> for Zero {
        fn dimension(&self) -> usize {
            3
        }

        fn apply(&self, _t: f64, _x: &[f64], out: &mut [f64]) {
            out.fill(0.0);
        }
    }

    struct Exponential {
        rate: f64,
    }

    impl DynamicalSystem<f64> for Exponential {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = self.rate * x[0];
        }
    }

    /// dx/dt = t, so x(t) = x0 + t^2/2 exactly (RK4 integrates quadratics exactly).
    struct Ramp;

    impl DynamicalSystem<f64> for Ramp {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, t: f64, _x: &[f64], out: &mut [f64]) {
            out[0] = t;
        }
    }

    #[test]
    fn zero_field_leaves_state_and_advances_time() {
        let mut solver = RK4::<f64>::new(3);
        for (start, h) in [([1.0, -2.0, 3.5], 0.1), ([1e9, 0.0, -1e-9], 1e-3)] {
            let mut state = start;
            let mut t = 2.0;
            solver.step(&Zero, &mut t, &mut state, h);
            assert_eq!(state, start);
            assert_eq!(t, 2.0 + h);
        }
    }

    #[test]
    fn exponential_growth_matches_rk4_amplification() {
        let system = Exponential { rate: 1.0 };
        let mut solver = RK4::<f64>::new(1);
        let h: f64 = 0.1;
        let mut state = [1.0];
        let mut t = 0.0;
        solver.step(&system, &mut t, &mut state, h);
        let expected = 1.0 + h + h.powi(2) / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert!((state[0] - expected).abs() < 1e-14);
    }

    #[test]
    fn non_autonomous_field_sees_stage_times() {
        let mut solver = RK4::<f64>::new(1);
        let mut state = [0.0];
        let mut t = 0.0;
        for _ in 0..10 {
            solver.step(&Ramp, &mut t, &mut state, 0.1);
        }
        assert!((t - 1.0).abs() < 1e-12);
        assert!((state[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn global_error_is_fourth_order() {
        let system = Exponential { rate: -1.0 };
        let error_for = |steps: usize| {
            let mut solver = RK4::<f64>::new(1);
            let h = 1.0 / steps as f64;
            let mut state = [1.0];
            let mut t = 0.0;
            for _ in 0..steps {
                solver.step(&system, &mut t, &mut state, h);
            }
            (state[0] - (-1.0f64).exp()).abs()
        };
        let ratio = error_for(10) / error_for(20);
        assert!(ratio > 14.0 && ratio < 18.0, "ratio = {ratio}");
    }
}
