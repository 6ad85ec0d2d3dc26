pub mod bounds;
pub mod config;
pub mod error;
pub mod point;
pub mod solvers;
pub mod sources;
pub mod systems;
/// The `lorenz_core` crate produces trajectories of small dynamical systems,
/// one fixed time step at a time, for a viewer or the `lorenz` CLI to consume.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem` and `Steppable` for the generic solver, `VectorField` for 3-DOF ODE systems.
/// - **Solvers**: classic fixed-step RK4 with reusable stage buffers.
/// - **Systems**: the Lorenz system and two pendulums.
/// - **Sources**: `DataSource` implementations (RK4 integration, random walker, random flier) with ordered step/reset listeners.
/// - **Bounds**: `DataBox`, an axis-aligned box with permeable, reflective or periodic walls.
pub mod traits;

pub use error::{Error, Result};
