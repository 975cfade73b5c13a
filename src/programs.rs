//! A small catalog of machines embedded in the binary, parsed once on first use.

use crate::parser::parse;
use crate::table::TransitionTable;
use crate::types::TuringMachineError;

/// Name, sample input and source of each embedded program.
const PROGRAM_SOURCES: [(&str, &str, &str); 4] = [
    (
        "binary-increment",
        "1011",
        include_str!("../programs/binary-increment.tm"),
    ),
    (
        "unary-addition",
        "11+111",
        include_str!("../programs/unary-addition.tm"),
    ),
    (
        "palindrome",
        "abba",
        include_str!("../programs/palindrome.tm"),
    ),
    (
        "busy-beaver-2",
        "",
        include_str!("../programs/busy-beaver-2.tm"),
    ),
];

/// An embedded machine, ready to run.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: &'static str,
    /// The first comment line of the source.
    pub description: String,
    pub sample_input: &'static str,
    pub source: &'static str,
    pub table: TransitionTable,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = load_programs();
}

fn load_programs() -> Vec<Program> {
    PROGRAM_SOURCES
        .iter()
        .filter_map(|&(name, sample_input, source)| match parse(source) {
            Ok(table) => Some(Program {
                name,
                description: describe(source),
                sample_input,
                source,
                table,
            }),
            Err(e) => {
                tracing::error!(program = name, error = %e, "failed to parse embedded program");
                None
            }
        })
        .collect()
}

fn describe(source: &str) -> String {
    source
        .lines()
        .find_map(|line| line.trim().strip_prefix(';'))
        .map(|comment| comment.trim().to_string())
        .unwrap_or_default()
}

/// Summary of an embedded program, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
    pub sample_input: String,
    pub state_count: usize,
    pub transition_count: usize,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<&'static Program, TuringMachineError> {
        PROGRAMS
            .get(index)
            .ok_or_else(|| TuringMachineError::UnknownProgram(format!("#{index}")))
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<&'static Program, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| TuringMachineError::UnknownProgram(name.to_string()))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|program| program.name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = Self::get_program_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.to_string(),
            description: program.description.clone(),
            sample_input: program.sample_input.to_string(),
            state_count: program.table.states().len(),
            transition_count: program.table.len(),
        })
    }
}
