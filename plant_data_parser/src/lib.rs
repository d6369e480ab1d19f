// Plain chumsky grammar for the plant tables: `;` separated cells,
// optional double quotes, one row per line.

use chumsky::{prelude::*, Parser};
use log::{debug, trace};
use std::fmt::Display;
use structs::{MachineTool, Nomenclature, Party, Timing};
use thiserror::Error;

pub mod structs;
mod writer;

pub use writer::{
    write_machine_tools, write_nomenclature, write_parties, write_table, write_timings,
};

/// Column layout of the machine tools table.
pub const MACHINE_TOOLS_HEADER: [&str; 2] = ["id", "name"];
/// Column layout of the nomenclature table.
pub const NOMENCLATURE_HEADER: [&str; 2] = ["id", "name"];
/// Column layout of the parties table.
pub const PARTIES_HEADER: [&str; 2] = ["id", "nomenclature_id"];
/// Column layout of the times table.
pub const TIMINGS_HEADER: [&str; 3] = ["machine_tool_id", "nomenclature_id", "time"];

/// Chumsky diagnostics of a table that does not follow the grammar.
#[derive(Debug, Error)]
#[error("malformed table ({})", describe(.0))]
pub struct ParseError(pub Vec<Simple<char>>);

#[derive(Debug, Error)]
pub enum PlantDataParseError {
    #[error("{table}: {cause}")]
    ParseError {
        table: String,
        #[source]
        cause: ParseError,
    },
    #[error("{table}: too little rows, need at least two: header + data")]
    TooFewRows { table: String },
    #[error("{table}: row {row}, need at least {expected} non-empty starting columns")]
    IncompleteRow {
        table: String,
        row: usize,
        expected: usize,
    },
}

fn describe(errors: &[Simple<char>]) -> String {
    errors
        .iter()
        .map(|error| match error.found() {
            Some(found) => format!("unexpected '{found}' at {:?}", error.span()),
            None => format!("unexpected end of input at {:?}", error.span()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits `content` into rows of trimmed cells. Nothing is skipped here,
/// blank lines come back as rows holding a single empty cell.
pub fn parse_table(content: &str) -> Result<Vec<Vec<String>>, ParseError> {
    table_parser().parse(content).map_err(ParseError)
}

pub fn parse_machine_tools(content: &str, table: &str) -> Result<Vec<MachineTool>, PlantDataParseError> {
    load_records(content, table, MACHINE_TOOLS_HEADER.len(), |cells| MachineTool {
        id: cells[0].clone(),
        name: cells[1].clone(),
    })
}

pub fn parse_nomenclature(content: &str, table: &str) -> Result<Vec<Nomenclature>, PlantDataParseError> {
    load_records(content, table, NOMENCLATURE_HEADER.len(), |cells| Nomenclature {
        id: cells[0].clone(),
        name: cells[1].clone(),
    })
}

pub fn parse_parties(content: &str, table: &str) -> Result<Vec<Party>, PlantDataParseError> {
    load_records(content, table, PARTIES_HEADER.len(), |cells| Party {
        id: cells[0].clone(),
        nomenclature_id: cells[1].clone(),
    })
}

pub fn parse_timings(content: &str, table: &str) -> Result<Vec<Timing>, PlantDataParseError> {
    load_records(content, table, TIMINGS_HEADER.len(), |cells| Timing {
        equipment_id: cells[0].clone(),
        nomenclature_id: cells[1].clone(),
        time: cells[2].clone(),
    })
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Turns every data row of a table into a record. The first row is the header.
fn load_records<T: Display>(
    content: &str,
    table: &str,
    cell_count: usize,
    build: impl Fn(&[String]) -> T,
) -> Result<Vec<T>, PlantDataParseError> {
    trace!("reading {table}");

    let mut rows = parse_table(content).map_err(|cause| PlantDataParseError::ParseError {
        table: table.to_string(),
        cause,
    })?;

    while rows.last().map_or(false, |row| is_blank(row)) {
        rows.pop();
    }
    if rows.len() < 2 {
        return Err(PlantDataParseError::TooFewRows {
            table: table.to_string(),
        });
    }

    let mut records = Vec::with_capacity(rows.len() - 1);
    // rows are numbered from 1, the header being row 1
    for (index, row) in rows.iter().enumerate().skip(1) {
        let row_number = index + 1;
        if is_blank(row) {
            continue;
        }

        let filled = row
            .iter()
            .take(cell_count)
            .filter(|cell| !cell.trim().is_empty())
            .count();
        if filled != cell_count {
            return Err(PlantDataParseError::IncompleteRow {
                table: table.to_string(),
                row: row_number,
                expected: cell_count,
            });
        }

        let record = build(&row[..cell_count]);
        trace!("row {row_number}. Created element: {record}");
        records.push(record);
    }

    debug!("{table}: {} elements found", records.len());
    Ok(records)
}

pub(crate) fn table_parser() -> impl Parser<char, Vec<Vec<String>>, Error = Simple<char>> {
    let inline_whitespace = || filter(|c: &char| *c == ' ' || *c == '\t').repeated();

    let quoted = just('"')
        .ignore_then(
            filter(|c: &char| *c != '"')
                .or(just("\"\"").to('"'))
                .repeated(),
        )
        .then_ignore(just('"'))
        .collect::<String>()
        .padded_by(inline_whitespace())
        .labelled("quoted cell");

    let bare = filter(|c: &char| !matches!(c, ';' | '"' | '\n' | '\r'))
        .repeated()
        .collect::<String>()
        .map(|cell| cell.trim().to_string())
        .labelled("cell");

    let row = quoted.or(bare).separated_by(just(';'));

    row.separated_by(text::newline()).then_ignore(end())
}

#[cfg(test)]
mod tests {
    use chumsky::Parser;

    use crate::{parse_machine_tools, parse_parties, parse_table, parse_timings, PlantDataParseError};

    static MACHINE_TOOLS: &str = include_str!("../../data/sample/machine_tools.csv");
    static TIMES: &str = include_str!("../../data/sample/times.csv");

    #[test]
    fn table_parsing() {
        let rows = crate::table_parser().parse("id;name\nM1; Crusher \r\nM2;Mill");
        assert!(rows.is_ok());

        let rows = rows.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["M1".to_string(), "Crusher".to_string()]);
        assert_eq!(rows[2], vec!["M2".to_string(), "Mill".to_string()]);
    }

    #[test]
    fn quoted_cells() {
        let rows = parse_table("id;name\nM1; \"Crusher; \"\"big\"\" one\" \n").unwrap();

        assert_eq!(rows[1][1], "Crusher; \"big\" one");
    }

    #[test]
    fn unterminated_quote_fails() {
        let error = parse_table("id;name\nM1;\"Crusher\n").unwrap_err();

        assert!(!error.0.is_empty());
        assert!(error.to_string().starts_with("malformed table (unexpected"));
    }

    #[test]
    fn text_after_closing_quote_fails() {
        let output = parse_machine_tools("id;name\nM1;\"Crusher\" A\n", "machine_tools");

        match output {
            Err(error @ PlantDataParseError::ParseError { .. }) => {
                assert!(error.to_string().starts_with("machine_tools: malformed table (unexpected"));
                assert!(std::error::Error::source(&error).is_some());
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn sample_machine_tools() {
        let output = parse_machine_tools(MACHINE_TOOLS, "machine_tools.csv");

        dbg!(&output);
        let tools = output.unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0].id, "M1");
    }

    #[test]
    fn sample_timings() {
        let timings = parse_timings(TIMES, "times.csv").unwrap();

        assert!(!timings.is_empty());
        assert!(timings.iter().all(|timing| !timing.time.is_empty()));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let parties = parse_parties("id;nomenclature_id\n\n p1 ; n1\n ; \np2;n2\n\n\n", "parties").unwrap();

        assert_eq!(parties.len(), 2);
        assert_eq!(parties[0].id, "p1");
        assert_eq!(parties[1].nomenclature_id, "n2");
    }

    #[test]
    fn extra_cells_are_ignored() {
        let parties = parse_parties("id;nomenclature_id;comment\np1;n1;urgent\n", "parties").unwrap();

        assert_eq!(parties.len(), 1);
        assert_eq!(parties[0].nomenclature_id, "n1");
    }

    #[test]
    fn header_only_fails() {
        let output = parse_parties("id;nomenclature_id\n\n", "parties");

        assert!(matches!(output, Err(PlantDataParseError::TooFewRows { .. })));
    }

    #[test]
    fn incomplete_row_reports_its_number() {
        let output = parse_timings("a;b;c\nM1;N1;4\n\nM2;;3\n", "times");

        match output {
            Err(PlantDataParseError::IncompleteRow { row, expected, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(expected, 3);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }
}
