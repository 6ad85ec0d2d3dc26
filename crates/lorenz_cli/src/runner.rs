use anyhow::Result;
use log::{error, info};
use lorenz_core::config::SimulationConfig;
use lorenz_core::sources::{Sample, TrajectoryRecorder};
use lorenz_core::Error;

/// What a run produced. A failed step ends the run early; the points
/// recorded before it are kept.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub source: String,
    pub labels: [&'static str; 3],
    pub samples: Vec<Sample>,
    pub steps_completed: usize,
    pub failure: Option<Error>,
}

impl Trajectory {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Builds the configured source, resets it and steps it `config.steps`
/// times, recording every `config.record_every`-th point.
pub fn run(config: &SimulationConfig) -> Result<Trajectory> {
    let mut source = config.build_source()?;
    let recorder = TrajectoryRecorder::every(config.record_every);
    source.add_listener(Box::new(recorder.clone()));

    info!(
        "running {} for {} steps of {} from {}",
        source.name(),
        config.steps,
        source.time_step(),
        source.initial_state()
    );
    source.reset();

    let mut steps_completed = 0;
    let mut failure = None;
    while steps_completed < config.steps {
        if let Err(err) = source.step() {
            error!("{} stopped early after {steps_completed} steps: {err}", source.name());
            failure = Some(err);
            break;
        }
        steps_completed += 1;
    }
    info!(
        "{} finished at t={} with {} samples",
        source.name(),
        source.current_time(),
        recorder.len()
    );

    Ok(Trajectory {
        source: source.name().to_string(),
        labels: source.coordinate_labels(),
        samples: recorder.samples(),
        steps_completed,
        failure,
    })
}
