//! Step tracing. The executor hands a [`StepEvent`] to a [`Tracer`] before applying each
//! transition; tracers only observe and never influence the run.

use crate::table::Match;
use crate::types::Action;
use std::io::{self, Write};

/// A snapshot of the machine just before a transition is applied.
#[derive(Debug, Clone, Copy)]
pub struct StepEvent<'a> {
    /// Number of steps already applied.
    pub step: usize,
    pub tape: &'a str,
    pub head: usize,
    pub state: &'a str,
    pub symbol: char,
    pub matched: Match<'a>,
    pub action: &'a Action,
}

/// Receives every step of a run.
pub trait Tracer {
    /// Whether the executor should build events at all.
    fn enabled(&self) -> bool {
        true
    }

    fn on_step(&mut self, event: &StepEvent<'_>) -> io::Result<()>;
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn enabled(&self) -> bool {
        false
    }

    fn on_step(&mut self, _event: &StepEvent<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a human-readable block per step:
///
/// ```text
/// Tape: 1011
///       ^
/// Current state: 0
/// Current symbol: 1
/// Transition: 0 1 1 r 0
/// New symbol: 1
/// New direction: r
/// New state: 0
/// ```
pub struct WriterTracer<W: Write> {
    out: W,
}

impl<W: Write> WriterTracer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Tracer for WriterTracer<W> {
    fn on_step(&mut self, event: &StepEvent<'_>) -> io::Result<()> {
        let marker = " ".repeat(event.head);

        writeln!(self.out, "Tape: {}", event.tape)?;
        writeln!(self.out, "      {marker}^")?;
        writeln!(self.out, "Current state: {}", event.state)?;
        writeln!(self.out, "Current symbol: {}", event.symbol)?;
        writeln!(self.out, "Transition: {}", event.matched.transition)?;
        writeln!(self.out, "New symbol: {}", event.action.write)?;
        writeln!(self.out, "New direction: {}", event.action.direction.as_token())?;
        writeln!(self.out, "New state: {}", event.action.next_state)?;
        writeln!(self.out)
    }
}
