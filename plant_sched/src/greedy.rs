use log::{debug, trace};

use crate::{error::InvariantViolation, model::LoadModel};

/// List scheduling: every task in arrival order goes to the currently least
/// loaded equipment able to process it. Placements are never revisited.
pub fn assign_greedily(model: &mut LoadModel) -> Result<(), InvariantViolation> {
    for task in model.task_indices() {
        let equipment = model.find_least_loaded_capable(task)?;
        model.assign(task, equipment)?;
        trace!(
            "task id={} -> equipment id={}",
            model.task(task).id,
            model.equipment_at(equipment).id
        );
    }

    debug!("greedy makespan: {}", model.makespan());
    Ok(())
}
