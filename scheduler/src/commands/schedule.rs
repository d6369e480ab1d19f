use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{info, warn};
use plant_sched::{Algorithm, IterationOptions, Simulation, SimulationResult};

use crate::{config::Settings, Schedule};

pub fn schedule(schedule: Schedule) -> Result<()> {
    let mut settings = Settings::load(&schedule.config)?;

    if let Some(name) = schedule.algorithm {
        settings.algorithm.name = name;
    }
    if let Some(max_iterations) = schedule.max_iterations {
        settings.algorithm.options = Some(IterationOptions { max_iterations });
    }
    if schedule.output.is_some() {
        settings.output = schedule.output;
    }

    // unknown algorithms fail before any table is read
    let algorithm = Algorithm::from_settings(&settings.algorithm)?;
    info!("algorithm: {}", algorithm.kind());

    let data = settings.input.read()?;
    let result = Simulation::new(algorithm)
        .with_input(data)
        .with_input_options(settings.input.options)
        .simulate()?;

    for line in result.to_text() {
        info!("{line}");
        println!("{line}");
    }

    match settings.output {
        Some(output) => {
            write_result(&result, &output)?;
            info!("result written to {}", output.display());
        }
        None => warn!("no output file configured, the result is not saved"),
    }

    Ok(())
}

/// `.json` files get the full result, anything else the text report.
pub fn write_result(result: &SimulationResult, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }

    let is_json = output
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("json"));
    let content = if is_json {
        serde_json::to_string_pretty(result)?
    } else {
        let mut text = result.to_text().join("\n");
        text.push('\n');
        text
    };

    fs::write(output, content).with_context(|| format!("could not write {}", output.display()))
}
