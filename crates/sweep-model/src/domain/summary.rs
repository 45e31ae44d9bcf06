use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{JobStatus, SimJob};

/// Outcome of one job as reported at the end of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub index: usize,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub command_line: String,
}

impl JobRecord {
    /// Snapshot a job; `slot_label` resolves the slot index to its flag tokens.
    pub fn from_job(job: &SimJob, slot_label: Option<String>) -> Self {
        Self {
            index: job.index,
            status: job.status,
            slot: slot_label,
            exit_code: job.exit_code,
            duration_secs: job.duration().map(|d| d.as_secs_f64()),
            error: job.error.clone(),
            command_line: job.command_line.clone(),
        }
    }
}

/// Aggregated result of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Jobs never dispatched (only non-zero after an interrupt).
    pub queued: usize,
    /// Highest number of simultaneously running jobs observed.
    pub peak_running: usize,
    pub wall_secs: f64,
    /// `true` if the batch ended through cancellation.
    pub interrupted: bool,
    pub jobs: Vec<JobRecord>,
}

impl RunSummary {
    pub fn from_records(
        jobs: Vec<JobRecord>,
        peak_running: usize,
        wall: Duration,
        interrupted: bool,
    ) -> Self {
        let count = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();
        Self {
            completed: count(JobStatus::Completed),
            failed: count(JobStatus::Failed),
            cancelled: count(JobStatus::Cancelled),
            queued: count(JobStatus::Queued),
            peak_running,
            wall_secs: wall.as_secs_f64(),
            interrupted,
            jobs,
        }
    }

    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// `true` if every job completed with exit code `0`.
    pub fn all_completed(&self) -> bool {
        !self.interrupted && self.completed == self.total()
    }
}
