use crate::{error::InvariantViolation, model::LoadModel};

use super::{optimize_by_steps, IterationOptions, Relocation, StageReport};

/// A move off the busiest equipment into spare capacity elsewhere.
///
/// Other equipment is tried from the most idle one down; ties keep
/// declaration order. The first task of the busiest equipment that takes
/// strictly less than the candidate's idle time is moved.
pub fn best_idle_move(model: &LoadModel) -> Option<Relocation> {
    let busiest = model.busiest()?;

    let mut candidates: Vec<_> = model
        .equipment_indices()
        .filter(|index| *index != busiest)
        .collect();
    candidates.sort_by(|a, b| {
        let idle_a = model.equipment_at(*a).idle_time();
        let idle_b = model.equipment_at(*b).idle_time();
        idle_b.total_cmp(&idle_a)
    });

    candidates.into_iter().find_map(|candidate| {
        let idle_time = model.equipment_at(candidate).idle_time();
        model
            .equipment_at(busiest)
            .assigned_tasks()
            .iter()
            .find(|task| {
                model
                    .task(**task)
                    .duration_on(candidate)
                    .map_or(false, |duration| duration < idle_time)
            })
            .map(|task| Relocation {
                task: *task,
                from: busiest,
                to: candidate,
            })
    })
}

/// Applies [`best_idle_move`] if there is one.
pub fn idle_step(model: &mut LoadModel) -> Result<Option<Relocation>, InvariantViolation> {
    let relocation = best_idle_move(model);
    if let Some(relocation) = relocation {
        relocation.apply(model)?;
    }
    Ok(relocation)
}

/// Stage 2. Never increases the makespan.
pub fn optimize_by_idle_time(
    model: &mut LoadModel,
    options: &IterationOptions,
) -> Result<StageReport, InvariantViolation> {
    optimize_by_steps(model, options, "idle", idle_step)
}
