use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a simulation job.
///
/// `Queued -> Running -> {Completed | Failed | Cancelled}`.
/// A job abandoned by a cancelled batch stays `Queued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    /// Built and waiting for a free slot.
    Queued,
    /// External process spawned and not yet reaped.
    Running,
    /// Process exited with code `0`.
    Completed,
    /// Process could not be spawned, exited non-zero or timed out.
    Failed,
    /// Process was terminated by a batch cancellation.
    Cancelled,
}

impl JobStatus {
    /// Returns `true` if the job reached its final state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
