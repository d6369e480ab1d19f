use std::fmt;

/// All raw tables of one plant data set, exactly as read from the files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantData {
    pub equipment: Vec<MachineTool>,
    pub nomenclature: Vec<Nomenclature>,
    pub parties: Vec<Party>,
    pub timings: Vec<Timing>,
}

/// A piece of equipment (`machine_tools` table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineTool {
    pub id: String,
    pub name: String,
}

/// A kind of material (`nomenclatures` table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nomenclature {
    pub id: String,
    pub name: String,
}

/// A batch of material that has to be processed (`parties` table).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub id: String,
    pub nomenclature_id: String,
}

/// Processing time of a nomenclature on a machine tool (`times` table).
///
/// The time is kept as text; turning it into a number is up to validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub equipment_id: String,
    pub nomenclature_id: String,
    pub time: String,
}

impl fmt::Display for MachineTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineTool id={}, name={}", self.id, self.name)
    }
}

impl fmt::Display for Nomenclature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nomenclature id={}, name={}", self.id, self.name)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Party id={}, nomenclatureId={}",
            self.id, self.nomenclature_id
        )
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timing equipmentId={}, nomenclatureId={}, timing={}",
            self.equipment_id, self.nomenclature_id, self.time
        )
    }
}
