//! This module defines the `TuringMachine` struct, which executes a single-tape machine against
//! a borrowed [`TransitionTable`]. It owns the tape and the control state, and drives the
//! read / look up / write / move loop until the machine halts or fails.

use crate::config::RunConfig;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::trace::{NoopTracer, StepEvent, Tracer};
use crate::types::{
    is_halt_state, HaltReason, Mode, RunReport, Status, Step, TuringMachineError, START_STATE,
};

/// A single-tape Turing machine in the middle of a run.
///
/// The transition table is borrowed and never modified; the tape and the current state belong
/// to the machine.
pub struct TuringMachine<'t> {
    table: &'t TransitionTable,
    config: RunConfig,
    start_state: String,
    initial_tape: Tape,
    tape: Tape,
    state: String,
    status: Status,
    failure: Option<TuringMachineError>,
    step_count: usize,
}

impl<'t> TuringMachine<'t> {
    /// Creates a machine in state `0` with its tape seeded from `input`.
    ///
    /// # Arguments
    ///
    /// * `table` - The rules to run.
    /// * `input` - Initial tape content; every character must be a known symbol.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` ready to run.
    /// * `Err(TuringMachineError::UnknownSymbolInInput)` if `input` uses an undeclared symbol.
    pub fn new(table: &'t TransitionTable, input: &str) -> Result<Self, TuringMachineError> {
        let tape = Tape::initialize(input, |symbol| table.is_known_symbol(symbol))?;
        Ok(Self::with_tape(table, tape))
    }

    /// Creates a machine in state `0` over an already built tape.
    ///
    /// An empty tape gets a blank cell under the head.
    pub fn with_tape(table: &'t TransitionTable, mut tape: Tape) -> Self {
        tape.materialize();

        Self {
            table,
            config: RunConfig::default(),
            start_state: START_STATE.to_string(),
            initial_tape: tape.clone(),
            tape,
            state: START_STATE.to_string(),
            status: Status::Running,
            failure: None,
            step_count: 0,
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts (and resets) the machine in `state` instead of `0`.
    pub fn with_start_state(mut self, state: impl Into<String>) -> Self {
        self.start_state = state.into();
        self.state = self.start_state.clone();
        self
    }

    /// Executes a single step without tracing.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        self.step_with(&mut NoopTracer)
    }

    /// Executes a single step of the computation.
    ///
    /// Reads the symbol under the head, checks that state and symbol are declared, looks up the
    /// matching rule and applies it. The tracer sees the step before it is applied.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a transition was applied.
    /// * `Ok(Step::Halt(_))` if the machine has halted; further calls keep returning it.
    /// * `Err(_)` if the machine failed; further calls keep returning the same error.
    pub fn step_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<Step, TuringMachineError> {
        match self.status {
            Status::Running => {}
            Status::Halted(reason) => return Ok(Step::Halt(reason)),
            Status::Failed(_) => {
                if let Some(error) = &self.failure {
                    return Err(error.clone());
                }
            }
        }

        if self.config.mode == Mode::Strict && is_halt_state(&self.state) {
            return Ok(self.halt(HaltReason::HaltState));
        }

        let table = self.table;
        let symbol = self.tape.current_symbol();

        if !table.is_known_state(&self.state) {
            return Err(self.fail(TuringMachineError::InvalidState(self.state.clone())));
        }

        if !table.is_known_symbol(symbol) {
            return Err(self.fail(TuringMachineError::InvalidSymbol {
                state: self.state.clone(),
                symbol,
            }));
        }

        let Some(matched) = table.lookup(&self.state, symbol) else {
            if self.config.mode == Mode::Strict {
                return Err(self.fail(TuringMachineError::UndefinedTransition(
                    self.state.clone(),
                    symbol,
                )));
            }
            return Ok(self.halt(HaltReason::NoTransition));
        };

        if let Some(limit) = self.config.max_steps {
            if self.step_count >= limit {
                return Err(self.fail(TuringMachineError::StepLimitExceeded(limit)));
            }
        }

        let action = matched.resolve(&self.state, symbol);

        if tracer.enabled() {
            let tape = self.tape.render();
            let event = StepEvent {
                step: self.step_count,
                tape: &tape,
                head: self.tape.head(),
                state: &self.state,
                symbol,
                matched,
                action: &action,
            };

            if let Err(e) = tracer.on_step(&event) {
                tracing::warn!(error = %e, "tracer failed to record step");
            }
        }

        tracing::trace!(
            step = self.step_count,
            state = %self.state,
            symbol = %symbol,
            rule = %matched.transition,
            "applying transition"
        );

        self.tape.set_current_symbol(action.write);
        self.tape.move_head(action.direction);
        self.state = action.next_state;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Runs the machine until it halts, without tracing.
    pub fn run(&mut self) -> Result<RunReport, TuringMachineError> {
        self.run_with(&mut NoopTracer)
    }

    /// Runs the machine until it halts or fails.
    ///
    /// There is no step limit unless the [`RunConfig`] sets one, so a machine that never halts
    /// never returns.
    pub fn run_with<T: Tracer>(&mut self, tracer: &mut T) -> Result<RunReport, TuringMachineError> {
        loop {
            if let Step::Halt(reason) = self.step_with(tracer)? {
                return Ok(self.build_report(reason));
            }
        }
    }

    /// Returns the final report, once the machine has halted.
    pub fn report(&self) -> Option<RunReport> {
        match self.status {
            Status::Halted(reason) => Some(self.build_report(reason)),
            _ => None,
        }
    }

    /// Restores the initial tape and start state.
    pub fn reset(&mut self) {
        self.tape = self.initial_tape.clone();
        self.state = self.start_state.clone();
        self.status = Status::Running;
        self.failure = None;
        self.step_count = 0;
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Returns the number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.status, Status::Halted(_))
    }

    pub fn table(&self) -> &'t TransitionTable {
        self.table
    }

    fn halt(&mut self, reason: HaltReason) -> Step {
        tracing::debug!(
            state = %self.state,
            symbol = %self.tape.current_symbol(),
            steps = self.step_count,
            ?reason,
            "machine halted"
        );

        self.status = Status::Halted(reason);
        Step::Halt(reason)
    }

    fn fail(&mut self, error: TuringMachineError) -> TuringMachineError {
        tracing::warn!(state = %self.state, steps = self.step_count, %error, "machine failed");

        if let Some(kind) = error.failure_kind() {
            self.status = Status::Failed(kind);
        }
        self.failure = Some(error.clone());
        error
    }

    fn build_report(&self, reason: HaltReason) -> RunReport {
        RunReport {
            tape: self.tape.render(),
            head: self.tape.head(),
            state: self.state.clone(),
            symbol: self.tape.current_symbol(),
            steps: self.step_count,
            reason,
        }
    }
}
