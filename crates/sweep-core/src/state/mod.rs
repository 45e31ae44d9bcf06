use std::{collections::BTreeMap, time::Instant};

use sweep_model::{JobRecord, JobStatus, SimJob, SlotIndex};

use crate::error::CoreError;

/// In-memory job records of one batch, keyed by job index.
///
/// Every status change goes through [`JobLedger::mark_running`] or [`JobLedger::mark_finished`],
/// which reject transitions the job lifecycle does not allow.
#[derive(Debug, Clone, Default)]
pub struct JobLedger {
    jobs: BTreeMap<usize, SimJob>,
}

impl JobLedger {
    pub fn new(jobs: Vec<SimJob>) -> Self {
        Self {
            jobs: jobs.into_iter().map(|job| (job.index, job)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Get a job by index.
    pub fn get(&self, index: usize) -> Result<&SimJob, CoreError> {
        self.jobs.get(&index).ok_or(CoreError::UnknownJob(index))
    }

    /// `Queued -> Running`, recording the slot and the start time.
    pub fn mark_running(
        &mut self,
        index: usize,
        slot: SlotIndex,
        at: Instant,
    ) -> Result<(), CoreError> {
        let job = self.transition(index, JobStatus::Queued, JobStatus::Running)?;
        job.slot = Some(slot);
        job.started_at = Some(at);
        Ok(())
    }

    /// `Running -> Completed | Failed | Cancelled`, recording the end time.
    pub fn mark_finished(
        &mut self,
        index: usize,
        status: JobStatus,
        exit_code: Option<i32>,
        error: Option<String>,
        at: Instant,
    ) -> Result<(), CoreError> {
        if !status.is_terminal() {
            let from = self.get(index)?.status;
            return Err(CoreError::InvalidTransition {
                index,
                from,
                to: status,
            });
        }
        let job = self.transition(index, JobStatus::Running, status)?;
        job.ended_at = Some(at);
        job.exit_code = exit_code;
        if let Some(err) = error {
            job.error = Some(err);
        }
        Ok(())
    }

    fn transition(
        &mut self,
        index: usize,
        from: JobStatus,
        to: JobStatus,
    ) -> Result<&mut SimJob, CoreError> {
        let job = self
            .jobs
            .get_mut(&index)
            .ok_or(CoreError::UnknownJob(index))?;
        if job.status != from {
            return Err(CoreError::InvalidTransition {
                index,
                from: job.status,
                to,
            });
        }
        job.status = to;
        Ok(job)
    }

    /// All jobs in index order.
    pub fn iter(&self) -> impl Iterator<Item = &SimJob> {
        self.jobs.values()
    }

    pub fn list_by_status(&self, status: JobStatus) -> Vec<&SimJob> {
        self.jobs.values().filter(|j| j.status == status).collect()
    }

    /// Jobs that held `slot` at some point, in index order.
    pub fn list_by_slot(&self, slot: SlotIndex) -> Vec<&SimJob> {
        self.jobs.values().filter(|j| j.slot == Some(slot)).collect()
    }

    pub fn count(&self, status: JobStatus) -> usize {
        self.jobs.values().filter(|j| j.status == status).count()
    }

    /// Report records; `label` resolves a slot index to its flag tokens.
    pub fn records<F>(&self, label: F) -> Vec<JobRecord>
    where
        F: Fn(SlotIndex) -> Option<String>,
    {
        self.jobs
            .values()
            .map(|job| JobRecord::from_job(job, job.slot.and_then(&label)))
            .collect()
    }
}
