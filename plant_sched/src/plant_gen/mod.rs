use std::ops::RangeInclusive;

use plant_data_parser::structs::{MachineTool, Nomenclature, Party, PlantData, Timing};
use rand::{seq::SliceRandom, Rng};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub equipment_count: usize,
    pub nomenclature_count: usize,
    pub party_count: usize,
    /// Processing times are whole numbers drawn from here.
    pub duration_range: RangeInclusive<u32>,
    /// Chance that a machine tool can process a given nomenclature.
    pub capability_probability: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            equipment_count: 4,
            nomenclature_count: 5,
            party_count: 40,
            duration_range: 1..=20,
            capability_probability: 0.6,
        }
    }
}

/// Random but valid plant tables.
///
/// Counts of zero are raised to one for equipment and nomenclature, every
/// nomenclature can be processed somewhere.
pub fn generate_plant_data<R: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut R) -> PlantData {
    let equipment_count = options.equipment_count.max(1);
    let nomenclature_count = options.nomenclature_count.max(1);
    let probability = options.capability_probability.clamp(0.0, 1.0);
    let (low, high) = (*options.duration_range.start(), *options.duration_range.end());
    let durations = low.max(1)..=high.max(low.max(1));

    let equipment: Vec<MachineTool> = (1..=equipment_count)
        .map(|number| MachineTool {
            id: format!("M{number}"),
            name: format!("machine tool {number}"),
        })
        .collect();

    let nomenclature: Vec<Nomenclature> = (1..=nomenclature_count)
        .map(|number| Nomenclature {
            id: format!("N{number}"),
            name: format!("material {number}"),
        })
        .collect();

    let mut timings = vec![];
    for item in &nomenclature {
        let mut capable: Vec<&MachineTool> = equipment
            .iter()
            .filter(|_| rng.gen_bool(probability))
            .collect();
        if capable.is_empty() {
            // at least one machine tool per nomenclature
            capable.extend(equipment.choose(rng));
        }

        timings.extend(capable.into_iter().map(|tool| Timing {
            equipment_id: tool.id.clone(),
            nomenclature_id: item.id.clone(),
            time: rng.gen_range(durations.clone()).to_string(),
        }));
    }

    // first cover every nomenclature, then draw at random
    let mut kinds: Vec<&Nomenclature> = nomenclature.iter().collect();
    kinds.shuffle(rng);
    let parties = (1..=options.party_count)
        .map(|number| {
            let kind = kinds
                .get(number - 1)
                .copied()
                .or_else(|| nomenclature.choose(rng))
                .unwrap_or(&nomenclature[0]);
            Party {
                id: format!("P{number}"),
                nomenclature_id: kind.id.clone(),
            }
        })
        .collect();

    PlantData {
        equipment,
        nomenclature,
        parties,
        timings,
    }
}
