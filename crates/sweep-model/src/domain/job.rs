use std::time::{Duration, Instant};

use crate::{JobStatus, ParameterCombination, Slot, SlotIndex};

/// One unit of work: a single engine run for one parameter combination.
///
/// Built up front in status [`JobStatus::Queued`]; afterwards only the scheduler mutates it.
#[derive(Debug, Clone)]
pub struct SimJob {
    /// 1-based sequence number in enumeration order.
    pub index: usize,
    pub combination: ParameterCombination,
    /// Argument vector without resource flags; `argv[0]` is the executable.
    pub argv: Vec<String>,
    /// Position in `argv` where the flags of the acquired slot are inserted.
    pub resource_at: usize,
    /// Slot-agnostic, replayable command line.
    pub command_line: String,
    pub status: JobStatus,
    pub slot: Option<SlotIndex>,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    pub exit_code: Option<i32>,
    /// Last error message (launch failure, non-zero exit, timeout).
    pub error: Option<String>,
}

impl SimJob {
    pub fn new(
        index: usize,
        combination: ParameterCombination,
        argv: Vec<String>,
        resource_at: usize,
        command_line: String,
    ) -> Self {
        Self {
            index,
            combination,
            argv,
            resource_at,
            command_line,
            status: JobStatus::Queued,
            slot: None,
            started_at: None,
            ended_at: None,
            exit_code: None,
            error: None,
        }
    }

    /// Argument vector with the tokens of `slot` spliced in after the batch flags.
    pub fn launch_argv(&self, slot: Option<&Slot>) -> Vec<String> {
        let Some(slot) = slot else {
            return self.argv.clone();
        };

        let at = self.resource_at.min(self.argv.len());
        let mut argv = Vec::with_capacity(self.argv.len() + slot.tokens().len());
        argv.extend_from_slice(&self.argv[..at]);
        argv.extend(slot.tokens().iter().cloned());
        argv.extend_from_slice(&self.argv[at..]);
        argv
    }

    /// Wall time between launch and reaping, once both are known.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some(end.saturating_duration_since(start)),
            _ => None,
        }
    }
}
