//! TOML run configuration.
//!
//! ```toml
//! name = "attractor"
//! time_step = 0.005
//! steps = 20000
//! record_every = 10
//! log_level = "debug"
//!
//! [source]
//! kind = "ode"
//! system = "lorenz"
//! initial_state = [1.0, 1.0, 20.0]
//! coefficients = { rho = 28.0 }
//! ```

use crate::bounds::DataBox;
use crate::point::DataPoint;
use crate::sources::{DataSource, RandomFlier, RandomWalker, RungeKutta4};
use crate::systems::SystemKind;
use crate::traits::{Coefficients, VectorField};
use anyhow::{bail, Context, Result};
use log::{debug, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Which data source to run, with its source-specific settings. Anything
/// left out keeps the source's default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Ode {
        system: SystemKind,
        #[serde(default)]
        coefficients: Coefficients,
        #[serde(default)]
        initial_state: Option<DataPoint>,
        #[serde(default)]
        confine_to_bounds: bool,
    },
    RandomWalker {
        #[serde(default)]
        step_size: Option<f64>,
        #[serde(default)]
        initial_state: Option<DataPoint>,
        #[serde(default)]
        bounds: Option<DataBox>,
    },
    RandomFlier {
        #[serde(default)]
        pulse_size: Option<f64>,
        #[serde(default)]
        v_max: Option<f64>,
        #[serde(default)]
        initial_state: Option<DataPoint>,
        #[serde(default)]
        bounds: Option<DataBox>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Ode {
            system: SystemKind::Lorenz,
            coefficients: Coefficients::new(),
            initial_state: None,
            confine_to_bounds: false,
        }
    }
}

/// Settings for one headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub name: Option<String>,
    pub source: SourceConfig,
    /// Overrides the source's default time step.
    pub time_step: Option<f64>,
    pub steps: usize,
    /// Keep every n-th generated point.
    pub record_every: usize,
    /// Seeds the random sources; ignored by ODE sources.
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: None,
            source: SourceConfig::default(),
            time_step: None,
            steps: 10_000,
            record_every: 1,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid simulation config.")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}.", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.record_every == 0 {
            bail!("record_every must be at least 1.");
        }
        if let Some(h) = self.time_step {
            if !(h.is_finite() && h > 0.0) {
                bail!("time_step must be a finite number > 0, got {h}.");
            }
        }
        self.log_level_filter()?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level).map_err(|_| {
            anyhow::anyhow!(
                "log_level must be one of off, error, warn, info, debug, trace; got \"{}\".",
                self.log_level
            )
        })
    }

    /// Builds the configured source, named and with its time step applied.
    pub fn build_source(&self) -> Result<Box<dyn DataSource>> {
        let mut source: Box<dyn DataSource> = match &self.source {
            SourceConfig::Ode {
                system,
                coefficients,
                initial_state,
                confine_to_bounds,
            } => {
                let mut field = system.build();
                warn_unknown_coefficients(*system, field.as_ref(), coefficients);
                field
                    .set_coefficients(coefficients)
                    .with_context(|| format!("Bad coefficients for {system}."))?;
                let mut ode = RungeKutta4::new(field);
                if let Some(p) = initial_state {
                    ode = ode.with_initial_state(*p);
                }
                ode.set_confine_to_bounds(*confine_to_bounds);
                if self.seed.is_some() {
                    debug!("seed is ignored by ODE sources");
                }
                Box::new(ode)
            }
            SourceConfig::RandomWalker {
                step_size,
                initial_state,
                bounds,
            } => {
                let mut walker = RandomWalker::new();
                if let Some(seed) = self.seed {
                    walker = walker.with_seed(seed);
                }
                if let Some(bounds) = bounds {
                    walker = walker.with_bounds(*bounds);
                }
                if let Some(p) = initial_state {
                    walker = walker.with_initial_state(*p);
                }
                if let Some(step_size) = step_size {
                    walker.set_step_size(*step_size).context("Bad step_size.")?;
                }
                Box::new(walker)
            }
            SourceConfig::RandomFlier {
                pulse_size,
                v_max,
                initial_state,
                bounds,
            } => {
                let start = initial_state.unwrap_or(DataPoint::ORIGIN);
                let mut flier = RandomFlier::new(start)?;
                if let Some(seed) = self.seed {
                    flier = flier.with_seed(seed);
                }
                if let Some(bounds) = bounds {
                    flier = flier.with_bounds(*bounds);
                }
                if let Some(pulse_size) = pulse_size {
                    flier.set_pulse_size(*pulse_size).context("Bad pulse_size.")?;
                }
                if let Some(v_max) = v_max {
                    flier.set_v_max(*v_max).context("Bad v_max.")?;
                }
                Box::new(flier)
            }
        };

        if let Some(name) = &self.name {
            source.set_name(name);
        }
        if let Some(h) = self.time_step {
            source.set_time_step(h).context("Bad time_step.")?;
        }
        debug!(
            "built {} with time step {}, bounds hint {}",
            source.name(),
            source.time_step(),
            source.data_bounds_hint()
        );
        Ok(source)
    }
}

fn warn_unknown_coefficients(kind: SystemKind, field: &dyn VectorField, given: &Coefficients) {
    let known = field.coefficients_hint();
    for name in given.keys().filter(|name| !known.contains_key(*name)) {
        warn!("{kind} has no coefficient named \"{name}\"; ignoring it");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{Axis, BoundType};
    use crate::sources::advance;
    use approx::assert_relative_eq;

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        let source = config.build_source().unwrap();
        assert_eq!(source.current_point().to_array(), [1.0, 1.0, 20.0]);
        assert_eq!(source.time_step(), 0.001);
    }

    #[test]
    fn parses_full_ode_config() {
        let config = SimulationConfig::from_toml_str(
            r#"
            name = "attractor"
            time_step = 0.005
            steps = 200
            record_every = 10
            log_level = "debug"

            [source]
            kind = "ode"
            system = "lorenz"
            initial_state = [1, 2, 3]
            coefficients = { rho = 14.0 }
            "#,
        )
        .unwrap();
        assert_eq!(config.steps, 200);
        assert_eq!(config.record_every, 10);
        assert_eq!(config.log_level_filter().unwrap(), LevelFilter::Debug);

        let source = config.build_source().unwrap();
        assert_eq!(source.name(), "attractor");
        assert_eq!(source.time_step(), 0.005);
        assert_eq!(source.initial_state().to_array(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn pendulum_with_confinement_stays_in_angle_range() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [source]
            kind = "ode"
            system = "planar_pendulum"
            initial_state = [0.0, 0.0, 9.0]
            confine_to_bounds = true
            "#,
        )
        .unwrap();
        let mut source = config.build_source().unwrap();
        assert_eq!(source.coordinate_labels(), ["θ", "φ", "dθ/dt"]);
        advance(source.as_mut(), 2_000).unwrap();
        let theta = source.current_point().x();
        assert!((-std::f64::consts::PI..=std::f64::consts::PI).contains(&theta));
    }

    #[test]
    fn invalid_pendulum_length_is_reported() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [source]
            kind = "ode"
            system = "rotating_pendulum"
            coefficients = { L = -1.0 }
            "#,
        )
        .unwrap();
        assert_err_contains(config.build_source().map(|_| ()), "coefficient \"L\"");
    }

    #[test]
    fn seeded_walkers_repeat() {
        let text = r#"
            seed = 42
            [source]
            kind = "random_walker"
            step_size = 0.05
            "#;
        let config = SimulationConfig::from_toml_str(text).unwrap();
        let mut a = config.build_source().unwrap();
        let mut b = config.build_source().unwrap();
        advance(a.as_mut(), 100).unwrap();
        advance(b.as_mut(), 100).unwrap();
        assert_eq!(a.current_point(), b.current_point());
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn flier_bounds_from_config() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [source]
            kind = "random_flier"
            v_max = 0.5
            initial_state = [0.0, 0.0, 0.0]

            [source.bounds]
            x = { min = -2.0, max = 2.0, bound_type = "periodic" }
            y = { min = -1.0, max = 1.0, bound_type = "reflective" }
            z = { min = -3.0, max = 3.0 }
            "#,
        )
        .unwrap();
        let source = config.build_source().unwrap();
        let hint = source.data_bounds_hint();
        assert_eq!(hint.axis(Axis::X).bound_type(), BoundType::Periodic);
        assert_eq!(hint.axis(Axis::Z).bound_type(), BoundType::Permeable);
        assert_relative_eq!(hint.axis(Axis::Z).width(), 6.0);
    }

    #[test]
    fn rejects_bad_settings() {
        assert_err_contains(
            SimulationConfig::from_toml_str("time_step = -0.1"),
            "time_step",
        );
        assert_err_contains(
            SimulationConfig::from_toml_str("record_every = 0"),
            "record_every",
        );
        assert_err_contains(
            SimulationConfig::from_toml_str("log_level = \"loud\""),
            "log_level",
        );
        assert!(SimulationConfig::from_toml_str("[source]\nkind = \"teleporter\"").is_err());
        assert!(SimulationConfig::from_toml_str(
            "[source]\nkind = \"ode\"\nsystem = \"duffing\""
        )
        .is_err());

        let walker = SimulationConfig::from_toml_str(
            "[source]\nkind = \"random_walker\"\nstep_size = 0.0",
        )
        .unwrap();
        assert_err_contains(walker.build_source().map(|_| ()), "stepSize");
    }

    #[test]
    fn load_reports_missing_file() {
        assert_err_contains(
            SimulationConfig::load(Path::new("/definitely/not/here.toml")),
            "Failed to read config file",
        );
    }
}
