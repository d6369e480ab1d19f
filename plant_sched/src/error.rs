use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("simulation context not initialized: {0}")]
    Configuration(String),
    #[error("unknown algorithm '{name}', expected one of: {known}")]
    UnknownAlgorithm { name: String, known: String },
    #[error(transparent)]
    InvariantViolation(#[from] InvariantViolation),
}

/// A broken internal contract of the load model. Valid input never causes one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("attempt to assign task id='{task}' to equipment id='{equipment}' which cannot process it")]
    NotCapable { task: String, equipment: String },
    #[error("attempt to assign task id='{task}' to equipment id='{equipment}' while equipment id='{holder}' holds it")]
    AlreadyAssigned {
        task: String,
        equipment: String,
        holder: String,
    },
    #[error("attempt to unassign task id='{task}' from equipment id='{equipment}' which is not assigned")]
    NotAssigned { task: String, equipment: String },
    #[error("no equipment can process task id='{task}'")]
    NoCapableEquipment { task: String },
    #[error("no task at index {index}")]
    UnknownTask { index: usize },
    #[error("task id='{task}' references unknown equipment id='{equipment}'")]
    UnknownEquipment { task: String, equipment: String },
}
