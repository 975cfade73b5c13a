//! Run-time settings for the executor.

use crate::types::Mode;
use serde::{Deserialize, Serialize};

/// How a machine is allowed to run.
///
/// The default runs in [`Mode::Normal`] with no step limit, so a machine that never halts runs
/// forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mode: Mode,
    /// Maximum number of transitions to apply before failing with
    /// `TuringMachineError::StepLimitExceeded`.
    pub max_steps: Option<usize>,
}

impl RunConfig {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }
}
