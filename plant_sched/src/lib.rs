//! Scheduling of material batches onto parallel unrelated equipment.
//!
//! A run validates the raw plant tables, assigns every batch greedily to the
//! least loaded capable equipment and, for the iterative algorithm, improves
//! the assignment by relocating batches off the busiest equipment.

pub mod algorithm;
pub mod error;
pub mod greedy;
pub mod input;
pub mod model;
pub mod optimizer;
pub mod plant_gen;
pub mod report;
pub mod simulation;
pub mod validation;

pub use algorithm::{Algorithm, AlgorithmKind, AlgorithmSettings};
pub use error::{InvariantViolation, SchedulerError};
pub use input::{EquipmentSpec, ScheduleInput, TaskSpec};
pub use optimizer::IterationOptions;
pub use report::SimulationResult;
pub use simulation::{run, Simulation};
pub use validation::{validate, InputOptions};
