//! Stepped, stateful producers of trajectory points.
//!
//! A [`DataSource`] owns its current state and elapsed time. `step()` advances
//! it by one time step and tells every registered [`DataSourceListener`] about
//! the new point; `reset()` restores the initial conditions and fires a reset
//! notification instead. Listeners are notified in registration order.

mod random_flier;
mod random_walker;
mod recorder;
mod rk4;

pub use random_flier::RandomFlier;
pub use random_walker::RandomWalker;
pub use recorder::{Sample, TrajectoryRecorder};
pub use rk4::RungeKutta4;

use crate::bounds::DataBox;
use crate::error::{Error, Result};
use crate::point::DataPoint;
use crate::traits::XYZ_LABELS;
use log::{debug, trace, warn};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What a source tells its listeners after a step or a reset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceEvent {
    source: Arc<str>,
    point: DataPoint,
    time: f64,
}

impl DataSourceEvent {
    pub fn new(source: Arc<str>, point: DataPoint, time: f64) -> Self {
        Self {
            source,
            point,
            time,
        }
    }

    /// Name of the source that fired the event.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn point(&self) -> DataPoint {
        self.point
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

impl fmt::Display for DataSourceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{p={}, t={}}}", self.point, self.time)
    }
}

pub trait DataSourceListener {
    fn data_point_generated(&mut self, event: &DataSourceEvent);

    fn data_source_reset(&mut self, event: &DataSourceEvent);
}

/// Handle returned by [`DataSource::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered listener registry.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(ListenerId, Box<dyn DataSourceListener>)>,
    next_id: u64,
}

impl Listeners {
    pub fn add(&mut self, listener: Box<dyn DataSourceListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn notify_generated(&mut self, event: &DataSourceEvent) {
        for (_, listener) in &mut self.entries {
            listener.data_point_generated(event);
        }
    }

    fn notify_reset(&mut self, event: &DataSourceEvent) {
        for (_, listener) in &mut self.entries {
            listener.data_source_reset(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

static DEFAULT_NAME_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// `DataSource0`, `DataSource1`, ... unique within the process.
pub fn default_name() -> String {
    format!(
        "DataSource{}",
        DEFAULT_NAME_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

/// Name and listeners, the part every source shares.
#[derive(Debug)]
pub struct SourceBase {
    name: Arc<str>,
    listeners: Listeners,
}

impl SourceBase {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            listeners: Listeners::default(),
        }
    }

    pub fn rename(&mut self, name: impl Into<Arc<str>>) {
        self.name = name.into();
    }
}

impl Default for SourceBase {
    fn default() -> Self {
        Self::new(default_name())
    }
}

/// The stepped producer of trajectory points.
///
/// Implementors supply the state handling (`do_step`, `do_reset` and the
/// accessors); `step` and `reset` wrap them with listener notification.
pub trait DataSource {
    /// Implementor hook. Callers use `name`, `set_name` and the listener
    /// methods instead.
    fn base(&self) -> &SourceBase;

    /// Implementor hook; see [`DataSource::base`].
    fn base_mut(&mut self) -> &mut SourceBase;

    fn current_point(&self) -> DataPoint;

    fn current_time(&self) -> f64;

    fn time_step(&self) -> f64;

    /// `time_step` must be finite and > 0.
    fn set_time_step(&mut self, time_step: f64) -> Result<()>;

    fn initial_state(&self) -> DataPoint;

    /// Takes effect on the next reset.
    fn set_initial_state(&mut self, initial_state: DataPoint);

    /// Suggested display region for this source's trajectory.
    fn data_bounds_hint(&self) -> DataBox;

    fn coordinate_labels(&self) -> [&'static str; 3] {
        XYZ_LABELS
    }

    /// Implementor hook that advances the state by one time step without
    /// notifying anyone. On error the state is unchanged. Callers use
    /// [`DataSource::step`].
    fn do_step(&mut self) -> Result<()>;

    /// Implementor hook that restores the initial conditions without
    /// notifying anyone. Callers use [`DataSource::reset`].
    fn do_reset(&mut self);

    fn name(&self) -> &str {
        &self.base().name
    }

    fn set_name(&mut self, name: &str) {
        debug!("{} renamed to {name}", self.name());
        self.base_mut().rename(name);
    }

    fn step(&mut self) -> Result<()> {
        self.do_step()?;
        let event = DataSourceEvent::new(
            self.base().name.clone(),
            self.current_point(),
            self.current_time(),
        );
        trace!("{} stepped, event={}", event.source(), event);
        self.base_mut().listeners.notify_generated(&event);
        Ok(())
    }

    fn reset(&mut self) {
        self.do_reset();
        let event = DataSourceEvent::new(
            self.base().name.clone(),
            self.current_point(),
            self.current_time(),
        );
        debug!("{} reset, event={}", event.source(), event);
        self.base_mut().listeners.notify_reset(&event);
    }

    fn add_listener(&mut self, listener: Box<dyn DataSourceListener>) -> ListenerId {
        self.base_mut().listeners.add(listener)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.base_mut().listeners.remove(id)
    }

    fn listener_count(&self) -> usize {
        self.base().listeners.len()
    }
}

/// Rejects a proposed step unless the new time and every new coordinate are
/// finite. Sources call this before committing anything.
pub(crate) fn check_step(
    base: &SourceBase,
    time: f64,
    next_time: f64,
    next: &[f64; 3],
) -> Result<()> {
    if next_time.is_finite() && next.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    warn!(
        "{}: step at t={} diverged to {:?}, t={}",
        base.name, time, next, next_time
    );
    Err(Error::NonFiniteStep { time, state: *next })
}

/// Steps `source` up to `steps` times, stopping at the first failed step.
/// Returns the number of completed steps.
pub fn advance(source: &mut dyn DataSource, steps: usize) -> Result<usize> {
    for done in 0..steps {
        if let Err(err) = source.step() {
            debug!("{} stopped after {done} of {steps} steps", source.name());
            return Err(err);
        }
    }
    Ok(steps)
}
