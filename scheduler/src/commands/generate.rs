use std::fs;

use anyhow::{Context, Result};
use log::info;
use plant_data_parser::{write_machine_tools, write_nomenclature, write_parties, write_timings};
use plant_sched::{
    plant_gen::{generate_plant_data, GeneratorOptions},
    AlgorithmKind, AlgorithmSettings, IterationOptions,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    config::{InputFiles, Settings, SETTINGS_FILE},
    Generate,
};

pub fn generate(generate: Generate) -> Result<()> {
    let options = GeneratorOptions {
        equipment_count: generate.equipment,
        nomenclature_count: generate.nomenclature,
        party_count: generate.parties,
        ..GeneratorOptions::default()
    };
    let mut rng = match generate.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let data = generate_plant_data(&options, &mut rng);

    fs::create_dir_all(&generate.dir)
        .with_context(|| format!("could not create {}", generate.dir.display()))?;

    let files = InputFiles::default();
    for (name, content) in [
        (&files.equipment, write_machine_tools(&data.equipment)),
        (&files.nomenclature, write_nomenclature(&data.nomenclature)),
        (&files.parties, write_parties(&data.parties)),
        (&files.timing, write_timings(&data.timings)),
    ] {
        let path = generate.dir.join(name);
        fs::write(&path, content).with_context(|| format!("could not write {}", path.display()))?;
    }

    let settings = Settings {
        input: files,
        algorithm: AlgorithmSettings {
            name: AlgorithmKind::IterativeOptimization.name().to_string(),
            options: Some(IterationOptions::default()),
        },
        output: Some("result.json".into()),
    };
    let path = generate.dir.join(SETTINGS_FILE);
    fs::write(&path, serde_json::to_string_pretty(&settings)?)
        .with_context(|| format!("could not write {}", path.display()))?;

    info!(
        "generated {} machine tools, {} nomenclature entries and {} parties in {}",
        data.equipment.len(),
        data.nomenclature.len(),
        data.parties.len(),
        generate.dir.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::schedule, Schedule};

    #[test]
    fn generated_set_can_be_scheduled() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("set");

        generate(Generate {
            equipment: 3,
            nomenclature: 4,
            parties: 12,
            seed: Some(17),
            dir: target.clone(),
        })
        .unwrap();

        let settings = Settings::load(&target.join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings.algorithm.name, "iterative");
        let data = settings.input.read().unwrap();
        assert_eq!(data.equipment.len(), 3);
        assert_eq!(data.parties.len(), 12);

        schedule(Schedule {
            config: target.join(SETTINGS_FILE),
            algorithm: None,
            max_iterations: None,
            output: None,
        })
        .unwrap();
        assert!(target.join("result.json").exists());
    }

    #[test]
    fn same_seed_same_tables() {
        let dir = tempfile::tempdir().unwrap();
        let arguments = |name: &str| Generate {
            equipment: 2,
            nomenclature: 2,
            parties: 5,
            seed: Some(3),
            dir: dir.path().join(name),
        };

        generate(arguments("a")).unwrap();
        generate(arguments("b")).unwrap();

        let read = |name: &str| fs::read_to_string(dir.path().join(name).join("times.csv")).unwrap();
        assert_eq!(read("a"), read("b"));
    }
}
