use crate::{
    structs::{MachineTool, Nomenclature, Party, Timing},
    MACHINE_TOOLS_HEADER, NOMENCLATURE_HEADER, PARTIES_HEADER, TIMINGS_HEADER,
};

fn needs_quotes(cell: &str) -> bool {
    cell.contains([';', '"', '\n', '\r'])
        || cell.starts_with([' ', '\t'])
        || cell.ends_with([' ', '\t'])
}

fn write_cell(cell: &str, out: &mut String) {
    if needs_quotes(cell) {
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(cell);
    }
}

/// Renders a header and its rows in the format read by [`crate::parse_table`].
pub fn write_table<R, C>(header: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let mut out = header.join(";");
    out.push('\n');

    for row in rows {
        for (index, cell) in row.into_iter().enumerate() {
            if index > 0 {
                out.push(';');
            }
            write_cell(cell.as_ref(), &mut out);
        }
        out.push('\n');
    }

    out
}

pub fn write_machine_tools(tools: &[MachineTool]) -> String {
    write_table(
        &MACHINE_TOOLS_HEADER,
        tools.iter().map(|tool| [tool.id.as_str(), tool.name.as_str()]),
    )
}

pub fn write_nomenclature(nomenclature: &[Nomenclature]) -> String {
    write_table(
        &NOMENCLATURE_HEADER,
        nomenclature.iter().map(|item| [item.id.as_str(), item.name.as_str()]),
    )
}

pub fn write_parties(parties: &[Party]) -> String {
    write_table(
        &PARTIES_HEADER,
        parties
            .iter()
            .map(|party| [party.id.as_str(), party.nomenclature_id.as_str()]),
    )
}

pub fn write_timings(timings: &[Timing]) -> String {
    write_table(
        &TIMINGS_HEADER,
        timings.iter().map(|timing| {
            [
                timing.equipment_id.as_str(),
                timing.nomenclature_id.as_str(),
                timing.time.as_str(),
            ]
        }),
    )
}
