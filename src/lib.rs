//! This crate provides the core logic for a single-tape Turing machine interpreter.
//! It includes modules for parsing quintuple rule files into a transition table, the
//! two-way unbounded tape, the executor that runs a machine until it halts, and a catalog of
//! built-in programs.

pub mod config;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the run settings.
pub use config::RunConfig;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse, parse_line, parse_lines};
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the transition table and its builder.
pub use table::{Match, MatchKind, TableBuilder, TransitionTable};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the step tracing interface.
pub use trace::{NoopTracer, StepEvent, Tracer, WriterTracer};
/// Re-exports various types related to rule definition and execution from the types module.
pub use types::{
    Action, Direction, FailureKind, HaltReason, Mode, NextState, RunReport, StateMatch, Status,
    Step, SymbolMatch, Transition, TransitionKey, TuringMachineError, Write,
};
