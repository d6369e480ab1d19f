use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use plant_sched::{run, validate, Algorithm, InputOptions, IterationOptions};
use rayon::prelude::*;

use crate::{config::InputFiles, Benchmark};

pub fn benchmark(benchmark: Benchmark) -> Result<()> {
    if !benchmark.folder.is_dir() {
        anyhow::bail!("{} is not a directory", benchmark.folder.display())
    }

    let mut instances: Vec<PathBuf> = benchmark
        .folder
        .read_dir()?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()?;
    instances.retain(|path| path.is_dir());
    instances.sort();
    info!("benchmarking {} data sets", instances.len());

    // every data set is scheduled on its own, single threaded
    let scheduling_results: Vec<String> = instances
        .par_iter()
        .map(|path| compare(path))
        .collect::<Result<_>>()?;

    std::fs::write(&benchmark.output, scheduling_results.join("\n"))
        .with_context(|| format!("could not write {}", benchmark.output.display()))?;

    Ok(())
}

fn compare(path: &Path) -> Result<String> {
    let data = InputFiles::default().relative_to(path).read()?;
    let input = validate(&data, &InputOptions::default()).map_err(|errors| {
        anyhow::anyhow!("{}: invalid data set: {}", path.display(), errors.join("; "))
    })?;

    let greedy = run(&Algorithm::Greedy, &input)?;
    let iterative = run(
        &Algorithm::IterativeOptimization(IterationOptions::default()),
        &input,
    )?;

    Ok(format!(
        "{}: greedy={} iterative={}",
        path.display(),
        greedy.makespan(),
        iterative.makespan()
    ))
}
