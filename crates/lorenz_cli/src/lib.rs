//! Headless front end for `lorenz_core`: runs a configured data source and
//! writes the recorded trajectory as CSV.

pub mod output;
pub mod runner;

pub use output::write_csv;
pub use runner::{run, Trajectory};
