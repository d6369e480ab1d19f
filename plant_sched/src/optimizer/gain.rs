use crate::{error::InvariantViolation, model::LoadModel};

use super::{optimize_by_steps, IterationOptions, Relocation, StageReport};

/// The move off the busiest equipment that shortens its task the most.
///
/// Gain is the task's duration on the busiest equipment minus its duration on
/// the alternative. Only strictly positive gains count; on equal gains the
/// first pair in task-list, then capability order wins.
pub fn best_gain_move(model: &LoadModel) -> Option<Relocation> {
    let busiest = model.busiest()?;
    let mut best: Option<(Relocation, f64)> = None;

    for &task in model.equipment_at(busiest).assigned_tasks() {
        let Some(current) = model.task(task).duration_on(busiest) else {
            continue;
        };

        for &(alternative, duration) in model.task(task).capabilities() {
            if alternative == busiest {
                continue;
            }
            let gain = current - duration;
            if gain > 0.0 && best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((
                    Relocation {
                        task,
                        from: busiest,
                        to: alternative,
                    },
                    gain,
                ));
            }
        }
    }

    best.map(|(relocation, _)| relocation)
}

/// Applies [`best_gain_move`] if there is one.
pub fn gain_step(model: &mut LoadModel) -> Result<Option<Relocation>, InvariantViolation> {
    let relocation = best_gain_move(model);
    if let Some(relocation) = relocation {
        relocation.apply(model)?;
    }
    Ok(relocation)
}

/// Stage 1. The caller decides whether to keep the result.
pub fn optimize_by_gain(
    model: &mut LoadModel,
    options: &IterationOptions,
) -> Result<StageReport, InvariantViolation> {
    optimize_by_steps(model, options, "gain", gain_step)
}
