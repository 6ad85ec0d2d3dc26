use super::{DataSourceEvent, DataSourceListener};
use crate::point::DataPoint;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded point of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub point: DataPoint,
}

impl From<&DataSourceEvent> for Sample {
    fn from(event: &DataSourceEvent) -> Self {
        Self {
            time: event.time(),
            point: event.point(),
        }
    }
}

#[derive(Debug, Default)]
struct Recording {
    samples: Vec<Sample>,
    since_reset: usize,
    resets: usize,
}

/// Listener that keeps the trajectory in memory.
///
/// Clones share one buffer: register a clone with the source and read the
/// samples back through any other clone. A reset clears the buffer and records
/// the restored initial point; after that every `stride`-th generated point
/// is kept.
#[derive(Debug, Clone)]
pub struct TrajectoryRecorder {
    stride: usize,
    recording: Rc<RefCell<Recording>>,
}

impl Default for TrajectoryRecorder {
    fn default() -> Self {
        Self::every(1)
    }
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps every `stride`-th generated point. A stride of 0 is treated
    /// as 1.
    pub fn every(stride: usize) -> Self {
        Self {
            stride: stride.max(1),
            recording: Rc::new(RefCell::new(Recording::default())),
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.recording.borrow().samples.clone()
    }

    pub fn last(&self) -> Option<Sample> {
        self.recording.borrow().samples.last().copied()
    }

    pub fn len(&self) -> usize {
        self.recording.borrow().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.borrow().samples.is_empty()
    }

    /// Number of reset notifications seen so far.
    pub fn reset_count(&self) -> usize {
        self.recording.borrow().resets
    }
}

impl DataSourceListener for TrajectoryRecorder {
    fn data_point_generated(&mut self, event: &DataSourceEvent) {
        let mut recording = self.recording.borrow_mut();
        recording.since_reset += 1;
        if recording.since_reset % self.stride == 0 {
            recording.samples.push(Sample::from(event));
        }
    }

    fn data_source_reset(&mut self, event: &DataSourceEvent) {
        let mut recording = self.recording.borrow_mut();
        recording.samples.clear();
        recording.samples.push(Sample::from(event));
        recording.since_reset = 0;
        recording.resets += 1;
    }
}
