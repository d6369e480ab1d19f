//! Read-only view of a finished run, detached from the load model.

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::{error::InvariantViolation, model::LoadModel};

pub const MAKESPAN_METRIC: &str = "makespan";
pub const TOTAL_IDLE_METRIC: &str = "total idle time";
pub const INVALID_INPUT_MESSAGE: &str = "input data is not valid or incorrect";

const IDLE_METRIC_PREFIX: &str = "idle time";
const ERRORS_HEADER: &str = "following errors occurred during modelling";

/// Serialized with an additional `hasErrors` flag derived from `errors`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub errors: Vec<String>,
    pub metrics: Vec<Metric>,
    pub footnotes: Vec<String>,
    pub schedule_by_equipment: Vec<EquipmentSchedule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSchedule {
    pub equipment: EquipmentRef,
    pub tasks: Vec<AssignedTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    pub task_id: String,
    pub description: String,
    pub started_at: f64,
    pub stopped_at: f64,
    pub duration: f64,
}

impl SimulationResult {
    /// Timelines and metrics of the current model state.
    ///
    /// Tasks of one equipment run back to back in assignment order.
    pub fn project(model: &LoadModel, footnotes: Vec<String>) -> Result<Self, InvariantViolation> {
        let schedule_by_equipment = model
            .equipment_indices()
            .map(|index| {
                let equipment = model.equipment_at(index);
                let mut started_at = 0.0;

                let tasks = equipment
                    .assigned_tasks()
                    .iter()
                    .map(|task| {
                        let task = model.task(*task);
                        let duration = task.duration_on(index).ok_or_else(|| {
                            InvariantViolation::NotCapable {
                                task: task.id.clone(),
                                equipment: equipment.id.clone(),
                            }
                        })?;
                        let assigned = AssignedTask {
                            task_id: task.id.clone(),
                            description: task.description.clone(),
                            started_at,
                            stopped_at: started_at + duration,
                            duration,
                        };
                        started_at = assigned.stopped_at;
                        Ok(assigned)
                    })
                    .collect::<Result<_, InvariantViolation>>()?;

                Ok(EquipmentSchedule {
                    equipment: EquipmentRef {
                        id: equipment.id.clone(),
                        name: equipment.name.clone(),
                    },
                    tasks,
                })
            })
            .collect::<Result<_, InvariantViolation>>()?;

        let mut metrics = vec![
            Metric::new(MAKESPAN_METRIC, model.makespan()),
            Metric::new(
                TOTAL_IDLE_METRIC,
                model
                    .equipment()
                    .iter()
                    .map(|equipment| equipment.idle_time())
                    .sum::<f64>(),
            ),
        ];
        metrics.extend(model.equipment().iter().map(|equipment| {
            Metric::new(
                &format!("{IDLE_METRIC_PREFIX} {}", equipment.name),
                equipment.idle_time(),
            )
        }));

        Ok(Self {
            errors: Vec::new(),
            metrics,
            footnotes,
            schedule_by_equipment,
        })
    }

    /// A result for input that never reached the scheduler.
    pub fn from_validation_errors(errors: Vec<String>) -> Self {
        let mut all = Vec::with_capacity(errors.len() + 1);
        all.push(INVALID_INPUT_MESSAGE.to_string());
        all.extend(errors);

        Self {
            errors: all,
            ..Self::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|metric| metric.label == label)
            .map(|metric| metric.value.as_str())
    }

    /// Latest stop over all timelines, 0 for an empty schedule.
    pub fn makespan(&self) -> f64 {
        self.schedule_by_equipment
            .iter()
            .filter_map(|schedule| schedule.tasks.last())
            .fold(0.0, |makespan, task| task.stopped_at.max(makespan))
    }

    pub fn tasks_of(&self, equipment_id: &str) -> Option<&[AssignedTask]> {
        self.schedule_by_equipment
            .iter()
            .find(|schedule| schedule.equipment.id == equipment_id)
            .map(|schedule| schedule.tasks.as_slice())
    }

    /// Human readable report, one entry per line.
    pub fn to_text(&self) -> Vec<String> {
        if self.has_errors() {
            let mut lines = vec![ERRORS_HEADER.to_string()];
            lines.extend(self.errors.iter().cloned());
            return lines;
        }

        let mut lines: Vec<String> = self
            .schedule_by_equipment
            .iter()
            .map(|schedule| {
                let timeline = schedule
                    .tasks
                    .iter()
                    .map(|task| {
                        format!(
                            "id={} '{}' {}-{}",
                            task.task_id, task.description, task.started_at, task.stopped_at
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" -> ");
                format!(
                    "id='{}' {} : {timeline}",
                    schedule.equipment.id, schedule.equipment.name
                )
            })
            .collect();

        lines.push(String::new());
        lines.extend(
            self.metrics
                .iter()
                .map(|metric| format!("{} : {}", metric.label, metric.value)),
        );

        lines.push(String::new());
        lines.extend(self.footnotes.iter().cloned());
        lines
    }
}

impl Serialize for SimulationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SimulationResult", 5)?;
        state.serialize_field("hasErrors", &self.has_errors())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("metrics", &self.metrics)?;
        state.serialize_field("footnotes", &self.footnotes)?;
        state.serialize_field("scheduleByEquipment", &self.schedule_by_equipment)?;
        state.end()
    }
}

impl Metric {
    fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}
