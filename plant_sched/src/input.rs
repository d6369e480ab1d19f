//! Validated input of a scheduling run.
//!
//! Everything in here is assumed consistent: equipment ids are unique,
//! every task can run somewhere, every referenced equipment exists and every
//! duration is strictly positive. [`crate::validation`] is the usual way to
//! obtain one from raw plant tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInput {
    /// Equipment in declaration order. The order breaks load ties.
    pub equipment: Vec<EquipmentSpec>,
    /// Tasks in arrival order, which is the greedy assignment order.
    pub tasks: Vec<TaskSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub id: String,
    pub description: String,
    /// Processing duration per equipment id. Equipment missing here cannot run the task.
    pub durations: Vec<(String, f64)>,
}

impl ScheduleInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equipment(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.equipment.push(EquipmentSpec {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn with_task(mut self, task: TaskSpec) -> Self {
        self.tasks.push(task);
        self
    }
}

impl TaskSpec {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            durations: Vec::new(),
        }
    }

    pub fn with_duration(mut self, equipment_id: impl Into<String>, duration: f64) -> Self {
        self.durations.push((equipment_id.into(), duration));
        self
    }
}
