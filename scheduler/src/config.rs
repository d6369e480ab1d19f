use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};
use plant_data_parser::{
    parse_machine_tools, parse_nomenclature, parse_parties, parse_timings, structs::PlantData,
};
use plant_sched::{AlgorithmSettings, InputOptions};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub input: InputFiles,
    #[serde(default)]
    pub algorithm: AlgorithmSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Locations of the four plant tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputFiles {
    pub equipment: PathBuf,
    pub nomenclature: PathBuf,
    pub parties: PathBuf,
    pub timing: PathBuf,
    pub options: InputOptions,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            equipment: "machine_tools.csv".into(),
            nomenclature: "nomenclatures.csv".into(),
            parties: "parties.csv".into(),
            timing: "times.csv".into(),
            options: InputOptions::default(),
        }
    }
}

impl Settings {
    /// Reads a settings file; relative paths in it are taken relative to
    /// the directory of the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read settings file {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        debug!("settings: {settings:?}");

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        settings.input = settings.input.relative_to(base);
        settings.output = settings.output.map(|output| resolve(base, output));

        Ok(settings)
    }
}

impl InputFiles {
    pub fn relative_to(self, base: &Path) -> Self {
        Self {
            equipment: resolve(base, self.equipment),
            nomenclature: resolve(base, self.nomenclature),
            parties: resolve(base, self.parties),
            timing: resolve(base, self.timing),
            options: self.options,
        }
    }

    pub fn read(&self) -> Result<PlantData> {
        info!("reading plant data");

        Ok(PlantData {
            equipment: read_table(&self.equipment, parse_machine_tools)?,
            nomenclature: read_table(&self.nomenclature, parse_nomenclature)?,
            parties: read_table(&self.parties, parse_parties)?,
            timings: read_table(&self.timing, parse_timings)?,
        })
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn read_table<T, E>(path: &Path, parse: impl Fn(&str, &str) -> Result<Vec<T>, E>) -> Result<Vec<T>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let table = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse(&content, &table).with_context(|| format!("could not parse {}", path.display()))
}
