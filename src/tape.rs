//! The machine's tape: a lazily materialized, two-way unbounded run of cells with a head.
//!
//! Cells live in a `VecDeque`, so growing at either end is amortized O(1). The head is an index
//! into it; moving past either end materializes exactly one blank cell.

use crate::types::{Direction, TuringMachineError, BLANK_SYMBOL};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    head: usize,
}

impl Tape {
    /// Creates an empty tape. Nothing is materialized until the first write or move.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a tape with `input`, head on the first cell.
    ///
    /// # Returns
    ///
    /// * `Ok(Tape)` if `is_known` accepts every character of `input`.
    /// * `Err(TuringMachineError::UnknownSymbolInInput)` for the first character it rejects.
    pub fn initialize<F>(input: &str, is_known: F) -> Result<Self, TuringMachineError>
    where
        F: Fn(char) -> bool,
    {
        let cells = input
            .chars()
            .enumerate()
            .map(|(position, symbol)| {
                if is_known(symbol) {
                    Ok(symbol)
                } else {
                    Err(TuringMachineError::UnknownSymbolInInput { symbol, position })
                }
            })
            .collect::<Result<VecDeque<_>, _>>()?;

        Ok(Self { cells, head: 0 })
    }

    /// Returns the symbol under the head. An unmaterialized cell reads as blank.
    pub fn current_symbol(&self) -> char {
        self.cells.get(self.head).copied().unwrap_or(BLANK_SYMBOL)
    }

    /// Overwrites the cell under the head.
    pub fn set_current_symbol(&mut self, symbol: char) {
        self.materialize();
        self.cells[self.head] = symbol;
    }

    /// Makes sure the head sits on a real cell, creating a blank one on an empty tape.
    pub fn materialize(&mut self) {
        if self.cells.is_empty() {
            self.cells.push_back(BLANK_SYMBOL);
            self.head = 0;
        }
    }

    /// Moves the head one cell, extending the tape with a blank if it walks off either end.
    ///
    /// On a tape with no cells a move only materializes the blank under the head.
    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Stay => {}
            Direction::Left | Direction::Right if self.cells.is_empty() => self.materialize(),
            Direction::Left => {
                if self.head == 0 {
                    self.cells.push_front(BLANK_SYMBOL);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                self.head += 1;
                if self.head == self.cells.len() {
                    self.cells.push_back(BLANK_SYMBOL);
                }
            }
        }
    }

    /// Index of the head within the materialized cells.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Renders every materialized cell, left to right.
    pub fn render(&self) -> String {
        self.cells.iter().collect()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
