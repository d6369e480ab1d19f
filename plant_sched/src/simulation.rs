use log::{error, info, warn};
use plant_data_parser::structs::PlantData;

use crate::{
    algorithm::Algorithm,
    error::SchedulerError,
    greedy::assign_greedily,
    input::ScheduleInput,
    model::LoadModel,
    optimizer::{optimize_by_gain, optimize_by_idle_time},
    report::SimulationResult,
    validation::{validate, InputOptions},
};

/// One scheduling run over raw plant tables.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    algorithm: Algorithm,
    input: Option<PlantData>,
    input_options: InputOptions,
}

impl Simulation {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn with_input(mut self, input: PlantData) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_input_options(mut self, options: InputOptions) -> Self {
        self.input_options = options;
        self
    }

    /// Validates the input and schedules it.
    ///
    /// Invalid input is not an error here: the returned result carries the
    /// validation messages instead of a schedule.
    pub fn simulate(&self) -> Result<SimulationResult, SchedulerError> {
        let data = self
            .input
            .as_ref()
            .ok_or_else(|| SchedulerError::Configuration("no input data".to_string()))?;

        match validate(data, &self.input_options) {
            Ok(input) => run(&self.algorithm, &input),
            Err(errors) => {
                for message in &errors {
                    error!("{message}");
                }
                Ok(SimulationResult::from_validation_errors(errors))
            }
        }
    }
}

/// Schedules already validated input with `algorithm`.
pub fn run(algorithm: &Algorithm, input: &ScheduleInput) -> Result<SimulationResult, SchedulerError> {
    let kind = algorithm.kind();
    info!(
        "scheduling {} tasks on {} equipment with {kind}",
        input.tasks.len(),
        input.equipment.len()
    );

    let mut model = LoadModel::from_input(input)?;
    assign_greedily(&mut model)?;
    let greedy_makespan = model.makespan();

    let mut footnotes = vec![format!("algorithm: {}", kind.description())];

    if let Algorithm::IterativeOptimization(options) = algorithm {
        let greedy = model.clone();

        let gain = optimize_by_gain(&mut model, options)?;
        if gain.improved() {
            let idle = optimize_by_idle_time(&mut model, options)?;
            info!(
                "optimization benefit: gain stage {} in {} moves, idle stage {} in {} moves, total {}",
                gain.benefit(),
                gain.moves,
                idle.benefit(),
                idle.moves,
                greedy_makespan - model.makespan()
            );
            footnotes.push(format!(
                "gain relocation accepted: makespan {} -> {}",
                gain.makespan_before, gain.makespan_after
            ));
            footnotes.push(format!(
                "idle time consolidation: makespan {} -> {}",
                idle.makespan_before, idle.makespan_after
            ));
        } else {
            warn!(
                "gain relocation did not improve makespan {greedy_makespan} after {} steps, keeping the greedy result",
                gain.steps
            );
            model = greedy;
            footnotes.push("gain relocation rejected: greedy result kept".to_string());
        }
    }

    info!("makespan: {}", model.makespan());
    Ok(SimulationResult::project(&model, footnotes)?)
}
