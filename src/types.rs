//! This module defines the core data structures and types shared by the parser, the transition
//! table, the tape and the executor, including transition records, execution outcomes and
//! error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The blank symbol. Always part of the tape alphabet, whether or not a rule mentions it.
pub const BLANK_SYMBOL: char = '_';
/// The wildcard token used in rule files.
pub const WILDCARD: char = '*';
/// The state every machine starts in.
pub const START_STATE: &str = "0";
/// Label prefix marking a halt state, e.g. `halt`, `halt-accept`.
pub const HALT_PREFIX: &str = "halt";

/// Returns `true` if `state` is a halt state by naming convention.
pub fn is_halt_state(state: &str) -> bool {
    state.starts_with(HALT_PREFIX)
}

/// The symbol-side pattern of a transition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolMatch {
    /// Matches exactly this symbol.
    Symbol(char),
    /// Matches any symbol without an exact rule (`*`).
    Any,
}

/// The state-side pattern of a transition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateMatch {
    /// Matches exactly this state.
    State(String),
    /// Matches any state without a more specific rule (`*`).
    Any,
}

/// What a transition writes under the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Write {
    Symbol(char),
    /// Write back whatever was read (`*`).
    Keep,
}

/// Where a transition moves the control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextState {
    State(String),
    /// Stay in the current state (`*`).
    Same,
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Parses a direction token: `l`, `r` or `*`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "l" => Some(Direction::Left),
            "r" => Some(Direction::Right),
            "*" => Some(Direction::Stay),
            _ => None,
        }
    }

    pub fn as_token(&self) -> char {
        match self {
            Direction::Left => 'l',
            Direction::Right => 'r',
            Direction::Stay => WILDCARD,
        }
    }
}

/// The (state, symbol) pair a transition is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionKey {
    pub state: StateMatch,
    pub read: SymbolMatch,
}

/// A single validated rule line: `<state> <symbol> <symbol> <direction> <state>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateMatch,
    pub read: SymbolMatch,
    pub write: Write,
    pub direction: Direction,
    pub next_state: NextState,
    /// 1-based line number in the source the rule was read from.
    pub line: usize,
}

impl Transition {
    pub fn key(&self) -> TransitionKey {
        TransitionKey {
            state: self.state.clone(),
            read: self.read,
        }
    }
}

impl fmt::Display for Transition {
    /// Formats the rule back into rule-file syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            StateMatch::State(s) => s.as_str(),
            StateMatch::Any => "*",
        };
        let read = match self.read {
            SymbolMatch::Symbol(c) => c,
            SymbolMatch::Any => WILDCARD,
        };
        let write = match self.write {
            Write::Symbol(c) => c,
            Write::Keep => WILDCARD,
        };
        let next = match &self.next_state {
            NextState::State(s) => s.as_str(),
            NextState::Same => "*",
        };

        write!(
            f,
            "{state} {read} {write} {} {next}",
            self.direction.as_token()
        )
    }
}

/// A transition with every wildcard resolved against the current state and symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub write: char,
    pub direction: Direction,
    pub next_state: String,
}

/// Controls how the executor decides that a machine has halted.
///
/// - `Normal` (default): the machine halts when no rule matches the current state and symbol.
/// - `Strict`: the machine halts on entering a state whose label starts with `halt`; running out
///   of rules anywhere else is an error, useful for catching missing rules.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// Why a machine stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// No exact or wildcard rule matched the current state and symbol.
    NoTransition,
    /// The machine entered a `halt*` state (strict mode only).
    HaltState,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine applied a transition and can keep going.
    Continue,
    /// The machine has halted normally.
    Halt(HaltReason),
}

/// Final configuration of a halted machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Rendered tape, leftmost to rightmost materialized cell.
    pub tape: String,
    pub head: usize,
    /// The state the machine halted in.
    pub state: String,
    /// The symbol under the head when it halted.
    pub symbol: char,
    pub steps: usize,
    pub reason: HaltReason,
}

/// The kind of fatal condition that stopped a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    InvalidState,
    InvalidSymbol,
    UndefinedTransition,
    StepLimitExceeded,
}

/// Lifecycle of a machine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    Halted(HaltReason),
    Failed(FailureKind),
}

/// Represents the errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A rule line is malformed.
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
    /// Two rules share the same (state, symbol) key.
    #[error("Duplicate transition on line {line} for state {state} and symbol '{symbol}' (first defined on line {first_line})")]
    DuplicateTransition {
        line: usize,
        first_line: usize,
        state: String,
        symbol: char,
    },
    /// The input string contains a symbol that no rule declares.
    #[error("Invalid symbol '{symbol}' at position {position} of the input string")]
    UnknownSymbolInInput { symbol: char, position: usize },
    /// Execution reached a state that no rule declares.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// Execution read a symbol that no rule declares.
    #[error("Invalid symbol '{symbol}' under the head in state {state}")]
    InvalidSymbol { state: String, symbol: char },
    /// Strict mode only: no rule for a state that is not a halt state.
    #[error("No rule defined for state {0} and symbol '{1}'")]
    UndefinedTransition(String, char),
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
    /// Indicates an error related to reading rule files.
    #[error("File error: {0}")]
    FileError(String),
    #[error("No built-in program named {0}")]
    UnknownProgram(String),
}

impl TuringMachineError {
    /// Maps a runtime error onto the failure it leaves the machine in.
    /// Load-time errors have no runtime counterpart.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            TuringMachineError::InvalidState(_) => Some(FailureKind::InvalidState),
            TuringMachineError::InvalidSymbol { .. } => Some(FailureKind::InvalidSymbol),
            TuringMachineError::UndefinedTransition(..) => Some(FailureKind::UndefinedTransition),
            TuringMachineError::StepLimitExceeded(_) => Some(FailureKind::StepLimitExceeded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_tokens() {
        assert_eq!(Direction::from_token("l"), Some(Direction::Left));
        assert_eq!(Direction::from_token("r"), Some(Direction::Right));
        assert_eq!(Direction::from_token("*"), Some(Direction::Stay));
        assert_eq!(Direction::from_token("L"), None);
        assert_eq!(Direction::from_token("left"), None);
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_transition_display() {
        let transition = Transition {
            state: StateMatch::State("0".into()),
            read: SymbolMatch::Any,
            write: Write::Keep,
            direction: Direction::Right,
            next_state: NextState::State("halt".into()),
            line: 1,
        };
        assert_eq!(transition.to_string(), "0 * * r halt");

        let transition = Transition {
            state: StateMatch::State("q1".into()),
            read: SymbolMatch::Symbol('1'),
            write: Write::Symbol('_'),
            direction: Direction::Stay,
            next_state: NextState::Same,
            line: 2,
        };
        assert_eq!(transition.to_string(), "q1 1 _ * *");
    }

    #[test]
    fn test_halt_state_prefix() {
        assert!(is_halt_state("halt"));
        assert!(is_halt_state("halt-accept"));
        assert!(!is_halt_state("Halt"));
        assert!(!is_halt_state("0"));
    }

    #[test]
    fn test_error_display() {
        let error = TuringMachineError::InvalidState("q9".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid state"));
        assert!(error_msg.contains("q9"));

        let error = TuringMachineError::DuplicateTransition {
            line: 2,
            first_line: 1,
            state: "0".into(),
            symbol: '1',
        };
        assert!(error.to_string().contains("line 2"));
        assert!(error.to_string().contains("line 1"));
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(
            TuringMachineError::InvalidState("x".into()).failure_kind(),
            Some(FailureKind::InvalidState)
        );
        assert_eq!(
            TuringMachineError::FileError("x".into()).failure_kind(),
            None
        );
    }
}
