//! Consistency checks of raw plant tables.
//!
//! Checks run group by group; a failing group hides the later ones, since
//! referential checks make no sense on top of broken keys.

use std::{fmt::Display, hash::Hash};

use hashbrown::{HashMap, HashSet};
use log::{info, warn};
use plant_data_parser::structs::{MachineTool, Nomenclature, Party, PlantData, Timing};
use serde::{Deserialize, Serialize};

use crate::input::{EquipmentSpec, ScheduleInput, TaskSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputOptions {
    /// Turn the warning about nomenclature without parties into an error.
    pub error_if_nomenclature_not_used: bool,
}

/// Checks `data` and turns it into a schedule input, or returns every
/// message of the first failing group of checks.
pub fn validate(data: &PlantData, options: &InputOptions) -> Result<ScheduleInput, Vec<String>> {
    info!("checking input data");

    let data = trimmed(data);
    let mut errors = Vec::new();

    check_fields(&data, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }

    let valid = check_nomenclature(&data.nomenclature, &mut errors)
        && check_equipment(&data.equipment, &mut errors)
        && check_parties(&data, options, &mut errors)
        && check_timings(&data, &mut errors);
    if !valid {
        return Err(errors);
    }

    info!("input data checked ok");
    Ok(build_input(&data))
}

fn trimmed(data: &PlantData) -> PlantData {
    let trim = |value: &String| value.trim().to_string();

    PlantData {
        equipment: data
            .equipment
            .iter()
            .map(|tool| MachineTool {
                id: trim(&tool.id),
                name: trim(&tool.name),
            })
            .collect(),
        nomenclature: data
            .nomenclature
            .iter()
            .map(|item| Nomenclature {
                id: trim(&item.id),
                name: trim(&item.name),
            })
            .collect(),
        parties: data
            .parties
            .iter()
            .map(|party| Party {
                id: trim(&party.id),
                nomenclature_id: trim(&party.nomenclature_id),
            })
            .collect(),
        timings: data
            .timings
            .iter()
            .map(|timing| Timing {
                equipment_id: trim(&timing.equipment_id),
                nomenclature_id: trim(&timing.nomenclature_id),
                time: trim(&timing.time),
            })
            .collect(),
    }
}

fn require<T: Display>(record: &T, fields: &[(&str, &str)], errors: &mut Vec<String>) {
    for (field, value) in fields {
        if value.is_empty() {
            errors.push(format!("field {field} is required: {record}"));
        }
    }
}

fn check_fields(data: &PlantData, errors: &mut Vec<String>) {
    for item in &data.nomenclature {
        require(item, &[("id", item.id.as_str()), ("name", item.name.as_str())], errors);
    }
    for party in &data.parties {
        require(
            party,
            &[("id", party.id.as_str()), ("nomenclature_id", party.nomenclature_id.as_str())],
            errors,
        );
    }
    for timing in &data.timings {
        require(
            timing,
            &[
                ("machine_tool_id", timing.equipment_id.as_str()),
                ("nomenclature_id", timing.nomenclature_id.as_str()),
                ("time", timing.time.as_str()),
            ],
            errors,
        );
    }
    for tool in &data.equipment {
        require(tool, &[("id", tool.id.as_str()), ("name", tool.name.as_str())], errors);
    }
}

/// Reports the first record whose key repeats an earlier one.
fn check_unique<'a, T: Display, K: Eq + Hash>(
    records: &'a [T],
    key: impl Fn(&'a T) -> K,
    field: &str,
    object: &str,
    errors: &mut Vec<String>,
) -> bool {
    let mut seen = HashSet::with_capacity(records.len());

    for record in records {
        if !seen.insert(key(record)) {
            errors.push(format!(
                "unique constraint violated, field {field} object {object} {record}"
            ));
            return false;
        }
    }
    true
}

fn check_nomenclature(nomenclature: &[Nomenclature], errors: &mut Vec<String>) -> bool {
    check_unique(nomenclature, |item| item.id.as_str(), "id", "Nomenclature", errors)
        && check_unique(nomenclature, |item| item.name.as_str(), "name", "Nomenclature", errors)
}

fn check_equipment(equipment: &[MachineTool], errors: &mut Vec<String>) -> bool {
    check_unique(equipment, |tool| tool.id.as_str(), "id", "MachineTool", errors)
        && check_unique(equipment, |tool| tool.name.as_str(), "name", "MachineTool", errors)
}

fn check_parties(data: &PlantData, options: &InputOptions, errors: &mut Vec<String>) -> bool {
    if !check_unique(&data.parties, |party| party.id.as_str(), "id", "Party", errors) {
        return false;
    }

    let mut used: HashMap<&str, bool> = data
        .nomenclature
        .iter()
        .map(|item| (item.id.as_str(), false))
        .collect();

    for party in &data.parties {
        match used.get_mut(party.nomenclature_id.as_str()) {
            Some(flag) => *flag = true,
            None => {
                errors.push(format!(
                    "foreign key violation: no nomenclature for party: {party}"
                ));
                return false;
            }
        }
    }

    // file order, so the reported nomenclature does not depend on hashing
    for item in &data.nomenclature {
        if used.get(item.id.as_str()) == Some(&false) {
            let message = format!("nomenclature id='{}' not used in parties", item.id);
            warn!("{message}");
            if options.error_if_nomenclature_not_used {
                errors.push(message);
                return false;
            }
        }
    }
    true
}

fn check_timings(data: &PlantData, errors: &mut Vec<String>) -> bool {
    let equipment: HashSet<&str> = data.equipment.iter().map(|tool| tool.id.as_str()).collect();
    let mut treated: HashMap<&str, bool> = data
        .nomenclature
        .iter()
        .map(|item| (item.id.as_str(), false))
        .collect();
    let errors_before = errors.len();

    for timing in &data.timings {
        match timing.time.parse::<f64>() {
            Ok(time) if time.is_finite() => {
                if time <= 0.0 {
                    errors.push(format!("time should be positive: {timing}"));
                }
            }
            _ => errors.push(format!("time is not a number: {timing}")),
        }

        if !equipment.contains(timing.equipment_id.as_str()) {
            errors.push(format!(
                "foreign key violation: no equipment with id='{}' in {timing}",
                timing.equipment_id
            ));
        }

        match treated.get_mut(timing.nomenclature_id.as_str()) {
            Some(flag) => *flag = true,
            None => errors.push(format!(
                "foreign key violation: no nomenclature with id='{}' in {timing}",
                timing.nomenclature_id
            )),
        }
    }

    for item in &data.nomenclature {
        if treated.get(item.id.as_str()) == Some(&false) {
            errors.push(format!(
                "foreign key violation: no equipment can treat nomenclature id='{}'",
                item.id
            ));
        }
    }

    check_unique(
        &data.timings,
        |timing| (timing.equipment_id.as_str(), timing.nomenclature_id.as_str()),
        "machine_tool_id + nomenclature_id",
        "Timing",
        errors,
    );

    errors.len() == errors_before
}

/// Only called on checked data: every lookup below is known to succeed.
fn build_input(data: &PlantData) -> ScheduleInput {
    let equipment_order: HashMap<&str, usize> = data
        .equipment
        .iter()
        .enumerate()
        .map(|(index, tool)| (tool.id.as_str(), index))
        .collect();

    let mut durations: HashMap<&str, Vec<(String, f64)>> = HashMap::new();
    for timing in &data.timings {
        if let Ok(time) = timing.time.parse::<f64>() {
            durations
                .entry(timing.nomenclature_id.as_str())
                .or_default()
                .push((timing.equipment_id.clone(), time));
        }
    }
    for list in durations.values_mut() {
        list.sort_by_key(|(equipment_id, _)| {
            equipment_order
                .get(equipment_id.as_str())
                .copied()
                .unwrap_or(usize::MAX)
        });
    }

    let names: HashMap<&str, &str> = data
        .nomenclature
        .iter()
        .map(|item| (item.id.as_str(), item.name.as_str()))
        .collect();

    ScheduleInput {
        equipment: data
            .equipment
            .iter()
            .map(|tool| EquipmentSpec {
                id: tool.id.clone(),
                name: tool.name.clone(),
            })
            .collect(),
        tasks: data
            .parties
            .iter()
            .map(|party| TaskSpec {
                id: party.id.clone(),
                description: names
                    .get(party.nomenclature_id.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_default(),
                durations: durations
                    .get(party.nomenclature_id.as_str())
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect(),
    }
}
