//! Mutable load state of one scheduling run.
//!
//! The model knows, per piece of equipment, which tasks it carries and how
//! long it is busy. Idle time is derived from the makespan and recomputed
//! for all equipment after every `assign`/`unassign`; nothing else mutates
//! the model.

mod equipment;
mod task;

use hashbrown::HashMap;
use log::trace;

pub use equipment::Equipment;
pub use task::Task;

use crate::{error::InvariantViolation, input::ScheduleInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquipmentIndex(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskIndex(usize);

impl EquipmentIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }
}

impl TaskIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadModel {
    equipment: Vec<Equipment>,
    tasks: Vec<Task>,
    /// Equipment currently holding each task.
    holders: Vec<Option<EquipmentIndex>>,
}

impl LoadModel {
    /// Creates a model with nothing assigned yet.
    pub fn new(equipment: Vec<Equipment>, tasks: Vec<Task>) -> Self {
        let mut model = Self {
            holders: vec![None; tasks.len()],
            equipment,
            tasks,
        };
        model.reset();
        model
    }

    /// Builds a fresh model for a validated input.
    pub fn from_input(input: &ScheduleInput) -> Result<Self, InvariantViolation> {
        let index_by_id: HashMap<&str, EquipmentIndex> = input
            .equipment
            .iter()
            .enumerate()
            .map(|(index, spec)| (spec.id.as_str(), EquipmentIndex(index)))
            .collect();

        let equipment = input
            .equipment
            .iter()
            .map(|spec| Equipment::new(spec.id.clone(), spec.name.clone()))
            .collect();

        let tasks = input
            .tasks
            .iter()
            .map(|spec| {
                let timing = spec
                    .durations
                    .iter()
                    .map(|(equipment_id, duration)| {
                        index_by_id
                            .get(equipment_id.as_str())
                            .map(|index| (*index, *duration))
                            .ok_or_else(|| InvariantViolation::UnknownEquipment {
                                task: spec.id.clone(),
                                equipment: equipment_id.clone(),
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(Task::new(spec.id.clone(), spec.description.clone(), timing))
            })
            .collect::<Result<Vec<_>, InvariantViolation>>()?;

        Ok(Self::new(equipment, tasks))
    }

    pub fn equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn equipment_at(&self, index: EquipmentIndex) -> &Equipment {
        &self.equipment[index.0]
    }

    pub fn equipment_indices(&self) -> impl Iterator<Item = EquipmentIndex> {
        (0..self.equipment.len()).map(EquipmentIndex)
    }

    pub fn task(&self, index: TaskIndex) -> &Task {
        &self.tasks[index.0]
    }

    pub fn task_indices(&self) -> impl Iterator<Item = TaskIndex> {
        (0..self.tasks.len()).map(TaskIndex)
    }

    /// Equipment the task is currently assigned to.
    pub fn holder(&self, task: TaskIndex) -> Option<EquipmentIndex> {
        self.holders[task.0]
    }

    /// Back to the state before any assignment.
    pub fn reset(&mut self) {
        for equipment in &mut self.equipment {
            equipment.load = 0.0;
            equipment.idle_time = 0.0;
            equipment.assigned.clear();
        }
        self.holders.iter_mut().for_each(|holder| *holder = None);
    }

    /// The capable equipment with the smallest load. On ties the equipment
    /// declared first wins.
    pub fn find_least_loaded_capable(
        &self,
        task: TaskIndex,
    ) -> Result<EquipmentIndex, InvariantViolation> {
        self.check_task(task)?;
        let mut best: Option<(EquipmentIndex, f64)> = None;

        for &(index, _) in self.task(task).capabilities() {
            self.check_equipment(task, index)?;
            let load = self.equipment_at(index).load;
            if best.map_or(true, |(_, best_load)| load < best_load) {
                best = Some((index, load));
            }
        }

        best.map(|(index, _)| index)
            .ok_or_else(|| InvariantViolation::NoCapableEquipment {
                task: self.task(task).id.clone(),
            })
    }

    pub fn assign(
        &mut self,
        task: TaskIndex,
        equipment: EquipmentIndex,
    ) -> Result<(), InvariantViolation> {
        self.check_task(task)?;
        self.check_equipment(task, equipment)?;
        let duration = self.task(task).duration_on(equipment).ok_or_else(|| {
            InvariantViolation::NotCapable {
                task: self.task(task).id.clone(),
                equipment: self.equipment_at(equipment).id.clone(),
            }
        })?;

        if let Some(holder) = self.holders[task.0] {
            return Err(InvariantViolation::AlreadyAssigned {
                task: self.task(task).id.clone(),
                equipment: self.equipment_at(equipment).id.clone(),
                holder: self.equipment_at(holder).id.clone(),
            });
        }

        let target = &mut self.equipment[equipment.0];
        target.assigned.push(task);
        target.load += duration;
        self.holders[task.0] = Some(equipment);

        self.recompute_idle_times();
        Ok(())
    }

    pub fn unassign(
        &mut self,
        task: TaskIndex,
        equipment: EquipmentIndex,
    ) -> Result<(), InvariantViolation> {
        self.check_task(task)?;
        self.check_equipment(task, equipment)?;
        let position = self
            .equipment_at(equipment)
            .assigned
            .iter()
            .position(|assigned| *assigned == task)
            .ok_or_else(|| InvariantViolation::NotAssigned {
                task: self.task(task).id.clone(),
                equipment: self.equipment_at(equipment).id.clone(),
            })?;

        let tasks = &self.tasks;
        let source = &mut self.equipment[equipment.0];
        source.assigned.remove(position);
        // summed again rather than subtracted, so the load stays exactly the sum
        source.load = source
            .assigned
            .iter()
            .filter_map(|assigned| tasks[assigned.0].duration_on(equipment))
            .sum();
        self.holders[task.0] = None;

        self.recompute_idle_times();
        Ok(())
    }

    /// Moves a task between two pieces of equipment.
    pub fn relocate(
        &mut self,
        task: TaskIndex,
        from: EquipmentIndex,
        to: EquipmentIndex,
    ) -> Result<(), InvariantViolation> {
        self.unassign(task, from)?;
        self.assign(task, to)?;
        trace!(
            "moved task '{}' id={} : {} id={} ==> {} id={}",
            self.task(task).description,
            self.task(task).id,
            self.equipment_at(from).name,
            self.equipment_at(from).id,
            self.equipment_at(to).name,
            self.equipment_at(to).id,
        );
        Ok(())
    }

    /// Maximum load over all equipment, 0 without equipment.
    pub fn makespan(&self) -> f64 {
        self.equipment
            .iter()
            .fold(0.0, |makespan, equipment| equipment.load.max(makespan))
    }

    /// First equipment with a strictly maximal load, in declaration order.
    pub fn busiest(&self) -> Option<EquipmentIndex> {
        let mut busiest = EquipmentIndex(0);
        let mut max_load = 0.0;

        for (index, equipment) in self.equipment.iter().enumerate() {
            if equipment.load > max_load {
                max_load = equipment.load;
                busiest = EquipmentIndex(index);
            }
        }

        (!self.equipment.is_empty()).then_some(busiest)
    }

    fn check_task(&self, task: TaskIndex) -> Result<(), InvariantViolation> {
        if task.0 < self.tasks.len() {
            Ok(())
        } else {
            Err(InvariantViolation::UnknownTask { index: task.0 })
        }
    }

    fn check_equipment(
        &self,
        task: TaskIndex,
        equipment: EquipmentIndex,
    ) -> Result<(), InvariantViolation> {
        if equipment.0 < self.equipment.len() {
            Ok(())
        } else {
            Err(InvariantViolation::UnknownEquipment {
                task: self.task(task).id.clone(),
                equipment: format!("#{}", equipment.0),
            })
        }
    }

    fn recompute_idle_times(&mut self) {
        let makespan = self.makespan();
        for equipment in &mut self.equipment {
            equipment.idle_time = makespan - equipment.load;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::input::TaskSpec;

    fn two_machines() -> LoadModel {
        let input = ScheduleInput::new()
            .with_equipment("M1", "Crusher")
            .with_equipment("M2", "Mill")
            .with_task(TaskSpec::new("t1", "ore").with_duration("M1", 4.0).with_duration("M2", 4.0))
            .with_task(TaskSpec::new("t2", "ore").with_duration("M1", 3.0).with_duration("M2", 3.0))
            .with_task(TaskSpec::new("t3", "slag").with_duration("M2", 2.0).with_duration("M1", 6.0));

        LoadModel::from_input(&input).unwrap()
    }

    /// Load, idle time and holders agree with the assigned task lists.
    pub(crate) fn assert_consistent(model: &LoadModel) {
        let makespan = model.makespan();
        for index in model.equipment_indices() {
            let equipment = model.equipment_at(index);
            let sum: f64 = equipment
                .assigned_tasks()
                .iter()
                .map(|task| model.task(*task).duration_on(index).unwrap())
                .sum();
            assert_eq!(equipment.load(), sum);
            assert_eq!(equipment.idle_time(), makespan - equipment.load());
            for task in equipment.assigned_tasks() {
                assert_eq!(model.holder(*task), Some(index));
            }
        }
    }

    #[test]
    fn capabilities_follow_declaration_order() {
        let model = two_machines();

        let t3 = model.task(TaskIndex::new(2));
        assert_eq!(t3.capabilities()[0], (EquipmentIndex::new(0), 6.0));
        assert_eq!(t3.capabilities()[1], (EquipmentIndex::new(1), 2.0));
    }

    #[test]
    fn unknown_equipment_is_rejected() {
        let input = ScheduleInput::new()
            .with_equipment("M1", "Crusher")
            .with_task(TaskSpec::new("t1", "ore").with_duration("M9", 1.0));

        let model = LoadModel::from_input(&input);

        assert!(matches!(
            model,
            Err(InvariantViolation::UnknownEquipment { .. })
        ));
    }

    #[test]
    fn assign_updates_load_and_idle_time() {
        let mut model = two_machines();
        let (m1, m2) = (EquipmentIndex::new(0), EquipmentIndex::new(1));

        model.assign(TaskIndex::new(0), m1).unwrap();
        model.assign(TaskIndex::new(1), m2).unwrap();

        assert_eq!(model.makespan(), 4.0);
        assert_eq!(model.equipment_at(m1).idle_time(), 0.0);
        assert_eq!(model.equipment_at(m2).idle_time(), 1.0);
        assert_consistent(&model);
    }

    #[test]
    fn least_loaded_prefers_first_declared_on_tie() {
        let mut model = two_machines();

        assert_eq!(
            model.find_least_loaded_capable(TaskIndex::new(0)),
            Ok(EquipmentIndex::new(0))
        );

        model.assign(TaskIndex::new(0), EquipmentIndex::new(0)).unwrap();
        assert_eq!(
            model.find_least_loaded_capable(TaskIndex::new(1)),
            Ok(EquipmentIndex::new(1))
        );
    }

    #[test]
    fn no_capable_equipment_is_an_error() {
        let mut model = LoadModel::new(
            vec![Equipment::new("M1", "Crusher")],
            vec![Task::new("t1", "ore", vec![])],
        );

        assert!(matches!(
            model.find_least_loaded_capable(TaskIndex::new(0)),
            Err(InvariantViolation::NoCapableEquipment { .. })
        ));
        assert!(model.assign(TaskIndex::new(0), EquipmentIndex::new(0)).is_err());
    }

    #[test]
    fn assign_to_incapable_equipment_fails() {
        let mut model = LoadModel::new(
            vec![Equipment::new("M1", "Crusher"), Equipment::new("M2", "Mill")],
            vec![Task::new("t1", "ore", vec![(EquipmentIndex::new(1), 2.0)])],
        );

        let result = model.assign(TaskIndex::new(0), EquipmentIndex::new(0));

        assert_eq!(
            result,
            Err(InvariantViolation::NotCapable {
                task: "t1".to_string(),
                equipment: "M1".to_string()
            })
        );
        assert_eq!(model.makespan(), 0.0);
    }

    #[test]
    fn double_assignment_fails() {
        let mut model = two_machines();
        model.assign(TaskIndex::new(0), EquipmentIndex::new(0)).unwrap();

        let result = model.assign(TaskIndex::new(0), EquipmentIndex::new(1));

        assert!(matches!(
            result,
            Err(InvariantViolation::AlreadyAssigned { .. })
        ));
        assert_consistent(&model);
    }

    #[test]
    fn indices_out_of_range_are_rejected() {
        let mut model = two_machines();

        assert_eq!(
            model.assign(TaskIndex::new(0), EquipmentIndex::new(2)),
            Err(InvariantViolation::UnknownEquipment {
                task: "t1".to_string(),
                equipment: "#2".to_string()
            })
        );
        assert_eq!(
            model.unassign(TaskIndex::new(0), EquipmentIndex::new(7)),
            Err(InvariantViolation::UnknownEquipment {
                task: "t1".to_string(),
                equipment: "#7".to_string()
            })
        );
        assert_eq!(
            model.assign(TaskIndex::new(3), EquipmentIndex::new(0)),
            Err(InvariantViolation::UnknownTask { index: 3 })
        );
        assert_eq!(
            model.find_least_loaded_capable(TaskIndex::new(9)),
            Err(InvariantViolation::UnknownTask { index: 9 })
        );
        assert_eq!(model.makespan(), 0.0);
    }

    #[test]
    fn capability_on_missing_equipment_is_rejected() {
        let model = LoadModel::new(
            vec![Equipment::new("M1", "Crusher")],
            vec![Task::new("t1", "ore", vec![(EquipmentIndex::new(4), 1.0)])],
        );

        assert!(matches!(
            model.find_least_loaded_capable(TaskIndex::new(0)),
            Err(InvariantViolation::UnknownEquipment { .. })
        ));
    }

    #[test]
    fn unassign_of_foreign_task_fails() {
        let mut model = two_machines();
        model.assign(TaskIndex::new(0), EquipmentIndex::new(0)).unwrap();

        let result = model.unassign(TaskIndex::new(0), EquipmentIndex::new(1));

        assert!(matches!(result, Err(InvariantViolation::NotAssigned { .. })));
        assert_eq!(model.equipment_at(EquipmentIndex::new(0)).load(), 4.0);
    }

    #[test]
    fn unassign_keeps_order_of_remaining_tasks() {
        let mut model = two_machines();
        let m1 = EquipmentIndex::new(0);
        for task in model.task_indices() {
            model.assign(task, m1).unwrap();
        }

        model.unassign(TaskIndex::new(1), m1).unwrap();

        assert_eq!(
            model.equipment_at(m1).assigned_tasks(),
            &[TaskIndex::new(0), TaskIndex::new(2)]
        );
        assert_eq!(model.equipment_at(m1).load(), 10.0);
        assert_eq!(model.holder(TaskIndex::new(1)), None);
        assert_consistent(&model);
    }

    #[test]
    fn relocate_moves_between_equipment() {
        let mut model = two_machines();
        let (m1, m2) = (EquipmentIndex::new(0), EquipmentIndex::new(1));
        model.assign(TaskIndex::new(2), m1).unwrap();

        model.relocate(TaskIndex::new(2), m1, m2).unwrap();

        assert_eq!(model.equipment_at(m1).load(), 0.0);
        assert_eq!(model.equipment_at(m2).load(), 2.0);
        assert_eq!(model.busiest(), Some(m2));
        assert_consistent(&model);
    }

    #[test]
    fn busiest_keeps_first_on_tie() {
        let mut model = two_machines();
        assert_eq!(model.busiest(), Some(EquipmentIndex::new(0)));

        model.assign(TaskIndex::new(0), EquipmentIndex::new(1)).unwrap();
        assert_eq!(model.busiest(), Some(EquipmentIndex::new(1)));

        model.assign(TaskIndex::new(1), EquipmentIndex::new(0)).unwrap();
        model.assign(TaskIndex::new(2), EquipmentIndex::new(1)).unwrap();
        // M1 = 3, M2 = 6
        assert_eq!(model.busiest(), Some(EquipmentIndex::new(1)));
    }

    #[test]
    fn empty_model_has_no_busiest() {
        let model = LoadModel::new(vec![], vec![]);

        assert_eq!(model.makespan(), 0.0);
        assert_eq!(model.busiest(), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut model = two_machines();
        model.assign(TaskIndex::new(0), EquipmentIndex::new(0)).unwrap();
        model.assign(TaskIndex::new(2), EquipmentIndex::new(1)).unwrap();

        model.reset();

        assert_eq!(model.makespan(), 0.0);
        for equipment in model.equipment() {
            assert!(equipment.assigned_tasks().is_empty());
            assert_eq!(equipment.idle_time(), 0.0);
        }
        assert!(model.task_indices().all(|task| model.holder(task).is_none()));
    }
}
