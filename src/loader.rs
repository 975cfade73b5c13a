//! This module provides the `ProgramLoader` struct, responsible for loading rule files into
//! transition tables.

use crate::parser::parse_lines;
use crate::table::TransitionTable;
use crate::types::TuringMachineError;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading rule files, either from a path or from any
/// buffered reader.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a transition table from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the rule file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the file is read and every rule is valid.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be opened or read.
    /// * `Err(TuringMachineError::Syntax)` or `Err(TuringMachineError::DuplicateTransition)`
    ///   if the content is not a valid rule set.
    pub fn load_program(path: &Path) -> Result<TransitionTable, TuringMachineError> {
        let file = fs::File::open(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let table = Self::load_program_from_reader(BufReader::new(file)).map_err(|e| match e {
            TuringMachineError::FileError(msg) => {
                TuringMachineError::FileError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::info!(path = %path.display(), rules = table.len(), "loaded rule file");
        Ok(table)
    }

    /// Loads a transition table line by line from any buffered reader.
    pub fn load_program_from_reader<R: BufRead>(
        reader: R,
    ) -> Result<TransitionTable, TuringMachineError> {
        let lines = reader
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TuringMachineError::FileError(format!("Failed to read line: {}", e)))?;

        parse_lines(lines)
    }
}
