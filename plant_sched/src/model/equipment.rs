use super::TaskIndex;

/// A piece of equipment together with its current load.
///
/// `load` and `idle_time` are only ever changed by [`super::LoadModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub(super) load: f64,
    pub(super) idle_time: f64,
    pub(super) assigned: Vec<TaskIndex>,
}

impl Equipment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            load: 0.0,
            idle_time: 0.0,
            assigned: Vec::new(),
        }
    }

    /// Sum of the durations of all tasks currently assigned here,
    /// i.e. the time the next assigned task would start at.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// Lag behind the busiest equipment.
    pub fn idle_time(&self) -> f64 {
        self.idle_time
    }

    /// Assigned tasks in assignment order.
    pub fn assigned_tasks(&self) -> &[TaskIndex] {
        &self.assigned
    }
}
