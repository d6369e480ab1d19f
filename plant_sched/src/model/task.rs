use super::EquipmentIndex;

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub description: String,
    /// Capability map, ordered by equipment declaration order.
    pub(super) timing: Vec<(EquipmentIndex, f64)>,
}

impl Task {
    /// Creates a task; `timing` is put into equipment declaration order.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        mut timing: Vec<(EquipmentIndex, f64)>,
    ) -> Self {
        timing.sort_by_key(|(equipment, _)| *equipment);
        Self {
            id: id.into(),
            description: description.into(),
            timing,
        }
    }

    pub fn capabilities(&self) -> &[(EquipmentIndex, f64)] {
        &self.timing
    }

    pub fn duration_on(&self, equipment: EquipmentIndex) -> Option<f64> {
        self.timing
            .iter()
            .find(|(index, _)| *index == equipment)
            .map(|(_, duration)| *duration)
    }
}
