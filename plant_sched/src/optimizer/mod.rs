//! Local search on top of a complete assignment.
//!
//! Both stages repeat a single-relocation step on the busiest equipment until
//! the step finds nothing to move or the iteration cap is reached.

mod gain;
mod idle;

use std::num::NonZeroU32;

use log::debug;
use serde::{Deserialize, Serialize};

pub use gain::{best_gain_move, gain_step, optimize_by_gain};
pub use idle::{best_idle_move, idle_step, optimize_by_idle_time};

use crate::{
    error::InvariantViolation,
    model::{EquipmentIndex, LoadModel, TaskIndex},
};

const DEFAULT_MAX_ITERATIONS: NonZeroU32 = match NonZeroU32::new(1000) {
    Some(value) => value,
    None => panic!("iteration cap must not be zero"),
};

/// Options of the iterative optimization, shared by both stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IterationOptions {
    /// Upper bound on the steps of each stage.
    pub max_iterations: NonZeroU32,
}

impl Default for IterationOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// A single task move chosen by one optimizer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
    pub task: TaskIndex,
    pub from: EquipmentIndex,
    pub to: EquipmentIndex,
}

impl Relocation {
    fn apply(self, model: &mut LoadModel) -> Result<(), InvariantViolation> {
        model.relocate(self.task, self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageReport {
    pub steps: u32,
    pub moves: u32,
    pub makespan_before: f64,
    pub makespan_after: f64,
}

impl StageReport {
    pub fn improved(&self) -> bool {
        self.makespan_after < self.makespan_before
    }

    pub fn benefit(&self) -> f64 {
        self.makespan_before - self.makespan_after
    }
}

/// Runs `step` until it reports no move or `max_iterations` steps were made.
fn optimize_by_steps(
    model: &mut LoadModel,
    options: &IterationOptions,
    stage: &str,
    mut step: impl FnMut(&mut LoadModel) -> Result<Option<Relocation>, InvariantViolation>,
) -> Result<StageReport, InvariantViolation> {
    let max_iterations = options.max_iterations.get();
    let makespan_before = model.makespan();

    let mut steps = 0;
    let mut moves = 0;
    let mut last_makespan = makespan_before;

    loop {
        steps += 1;
        let relocation = step(model)?;
        let makespan = model.makespan();

        if relocation.is_some() {
            moves += 1;
        }
        debug!(
            "{stage} step {steps}: makespan {makespan}, benefit: total {}, step {}",
            makespan_before - makespan,
            last_makespan - makespan
        );
        last_makespan = makespan;

        if relocation.is_none() || steps >= max_iterations {
            break;
        }
    }

    Ok(StageReport {
        steps,
        moves,
        makespan_before,
        makespan_after: model.makespan(),
    })
}
