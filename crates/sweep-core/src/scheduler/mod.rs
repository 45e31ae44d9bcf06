//! Slot-constrained dispatch loop.
//!
//! The loop itself is single-threaded: it owns the queue, the slot pool and the job ledger.
//! Every spawned process gets one waiter task that blocks on its exit (or on cancellation /
//! timeout) and posts a [`Completion`] back over a channel.
use std::{
    collections::{HashSet, VecDeque},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use sweep_model::{JobStatus, Priority, RunSpec, RunSummary, SimJob, SlotIndex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    error::CoreError,
    pool::SlotPool,
    runner::{LaunchRequest, ProcessHandle, Runner},
    state::JobLedger,
};

/// How a waiter task saw its process end.
#[derive(Debug)]
enum Outcome {
    Exited(Option<i32>),
    WaitFailed(String),
    TimedOut,
    Cancelled,
}

#[derive(Debug)]
struct Completion {
    index: usize,
    outcome: Outcome,
}

pub struct Scheduler {
    runner: Arc<dyn Runner>,
    pool: SlotPool,
    ledger: JobLedger,
    queue: VecDeque<usize>,
    running: HashSet<usize>,
    peak_running: usize,

    priority: Priority,
    launch_delay: Duration,
    job_timeout: Option<Duration>,
    post_run_hook: Option<PathBuf>,

    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Scheduler {
    /// Queue `jobs` in the given order; `cancel` aborts the batch when triggered.
    pub fn new(
        spec: &RunSpec,
        jobs: Vec<SimJob>,
        runner: Arc<dyn Runner>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runner,
            pool: SlotPool::new(spec.slots().to_vec()),
            queue: jobs.iter().map(|j| j.index).collect(),
            ledger: JobLedger::new(jobs),
            running: HashSet::new(),
            peak_running: 0,
            priority: spec.priority(),
            launch_delay: spec.launch_delay(),
            job_timeout: spec.job_timeout(),
            post_run_hook: spec.post_run_hook().map(PathBuf::from),
            cancel,
            tx,
            rx,
        }
    }

    pub fn ledger(&self) -> &JobLedger {
        &self.ledger
    }

    pub fn pool(&self) -> &SlotPool {
        &self.pool
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drive every queued job to a terminal state, or stop early on cancellation.
    ///
    /// On cancellation running jobs are terminated and marked `Cancelled`; jobs still queued
    /// are left untouched.
    #[instrument(level = "debug", skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary, CoreError> {
        let started = Instant::now();
        info!(
            target: "sweep.core.scheduler",
            jobs = self.queue.len(),
            capacity = self.pool.capacity(),
            "batch started"
        );

        loop {
            self.dispatch().await?;
            if self.cancel.is_cancelled() {
                break;
            }
            if self.running.is_empty() && self.queue.is_empty() {
                break;
            }

            tokio::select! {
                Some(done) = self.rx.recv() => self.reap(done)?,
                _ = self.cancel.cancelled() => {}
            }
        }

        if self.cancel.is_cancelled() {
            warn!(
                target: "sweep.core.scheduler",
                running = self.running.len(),
                queued = self.queue.len(),
                "batch cancelled; terminating running jobs"
            );
            self.drain().await?;
        } else {
            self.run_hook().await;
        }
        // An interrupt during the post-run hook still counts.
        let interrupted = self.cancel.is_cancelled();

        let pool = &self.pool;
        let summary = RunSummary::from_records(
            self.ledger.records(|slot| pool.label(slot)),
            self.peak_running,
            started.elapsed(),
            interrupted,
        );
        info!(
            target: "sweep.core.scheduler",
            completed = summary.completed,
            failed = summary.failed,
            cancelled = summary.cancelled,
            queued = summary.queued,
            wall_secs = summary.wall_secs,
            "batch finished"
        );
        Ok(summary)
    }

    /// Launch queued jobs in FIFO order while a slot is free.
    async fn dispatch(&mut self) -> Result<(), CoreError> {
        while let Some(&index) = self.queue.front() {
            if self.cancel.is_cancelled() {
                break;
            }
            let Some(slot) = self.pool.acquire() else {
                break;
            };
            self.queue.pop_front();

            let launched = self.launch(index, slot)?;
            if launched && !self.queue.is_empty() && !self.launch_delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.launch_delay) => {}
                    _ = self.cancel.cancelled() => {}
                }
            }
        }
        Ok(())
    }

    /// Spawn job `index` on `slot`; returns `false` if the spawn failed.
    fn launch(&mut self, index: usize, slot: SlotIndex) -> Result<bool, CoreError> {
        let argv = self.ledger.get(index)?.launch_argv(self.pool.slot(slot));
        let req = LaunchRequest {
            job: index,
            argv: &argv,
            priority: self.priority,
        };

        match self.runner.spawn(&req) {
            Ok(handle) => {
                self.ledger.mark_running(index, slot, Instant::now())?;
                self.running.insert(index);
                self.peak_running = self.peak_running.max(self.running.len());
                info!(
                    target: "sweep.core.scheduler",
                    job = index,
                    slot = %self.pool.label(slot).unwrap_or_default(),
                    runner = self.runner.name(),
                    pid = handle.id(),
                    "job started"
                );
                self.watch(index, handle);
                Ok(true)
            }
            Err(e) => {
                let now = Instant::now();
                self.ledger.mark_running(index, slot, now)?;
                self.ledger
                    .mark_finished(index, JobStatus::Failed, None, Some(e.to_string()), now)?;
                self.pool.release(slot);
                error!(target: "sweep.core.scheduler", job = index, error = %e, "job failed to launch");
                Ok(false)
            }
        }
    }

    /// Hand `handle` to a waiter task that reports how the process ended.
    fn watch(&self, index: usize, mut handle: Box<dyn ProcessHandle>) {
        let tx = self.tx.clone();
        let cancel = self.cancel.child_token();
        let timeout = self.job_timeout;

        tokio::spawn(async move {
            let outcome = tokio::select! {
                res = handle.wait() => match res {
                    Ok(code) => Outcome::Exited(code),
                    Err(e) => Outcome::WaitFailed(e.to_string()),
                },
                _ = cancel.cancelled() => {
                    debug!(target: "sweep.core.scheduler", job = index, "cancelled; terminating process");
                    if let Err(e) = handle.terminate().await {
                        warn!(target: "sweep.core.scheduler", job = index, error = %e, "terminate failed");
                    }
                    Outcome::Cancelled
                }
                _ = expire(timeout) => {
                    if let Err(e) = handle.terminate().await {
                        warn!(target: "sweep.core.scheduler", job = index, error = %e, "terminate failed");
                    }
                    Outcome::TimedOut
                }
            };
            // The receiver only goes away with the scheduler itself.
            let _ = tx.send(Completion { index, outcome });
        });
    }

    /// Record the end of a job, free its slot and log the outcome.
    fn reap(&mut self, done: Completion) -> Result<(), CoreError> {
        let Completion { index, outcome } = done;
        if !self.running.remove(&index) {
            warn!(target: "sweep.core.scheduler", job = index, "completion for a job that is not running");
            return Ok(());
        }

        let (status, exit_code, reason) = match outcome {
            Outcome::Exited(Some(0)) => (JobStatus::Completed, Some(0), None),
            Outcome::Exited(Some(code)) => {
                (JobStatus::Failed, Some(code), Some(format!("exit code: {code}")))
            }
            Outcome::Exited(None) => (JobStatus::Failed, None, Some("terminated by signal".to_string())),
            Outcome::WaitFailed(e) => (JobStatus::Failed, None, Some(e)),
            Outcome::TimedOut => (JobStatus::Failed, None, Some("timed out".to_string())),
            Outcome::Cancelled => (JobStatus::Cancelled, None, None),
        };

        self.ledger
            .mark_finished(index, status, exit_code, reason.clone(), Instant::now())?;
        let job = self.ledger.get(index)?;
        if let Some(slot) = job.slot {
            self.pool.release(slot);
        }

        let secs = job.duration().unwrap_or_default().as_secs_f64();
        match status {
            JobStatus::Completed => {
                info!(target: "sweep.core.scheduler", job = index, secs, "job completed")
            }
            JobStatus::Cancelled => {
                warn!(target: "sweep.core.scheduler", job = index, secs, "job cancelled")
            }
            _ => error!(
                target: "sweep.core.scheduler",
                job = index,
                secs,
                reason = reason.as_deref().unwrap_or("unknown"),
                "job failed"
            ),
        }
        Ok(())
    }

    /// Collect the waiters of every running job after cancellation.
    async fn drain(&mut self) -> Result<(), CoreError> {
        while !self.running.is_empty() {
            match self.rx.recv().await {
                Some(done) => self.reap(done)?,
                None => break,
            }
        }
        Ok(())
    }

    async fn run_hook(&self) {
        let Some(hook) = &self.post_run_hook else {
            return;
        };
        let argv = vec![hook.display().to_string()];
        let req = LaunchRequest {
            job: 0,
            argv: &argv,
            priority: Priority::Normal,
        };

        info!(target: "sweep.core.scheduler", hook = %hook.display(), "running post-run hook");
        let result = match self.runner.spawn(&req) {
            Ok(mut handle) => tokio::select! {
                res = handle.wait() => res,
                _ = self.cancel.cancelled() => {
                    warn!(target: "sweep.core.scheduler", "cancelled; terminating post-run hook");
                    if let Err(e) = handle.terminate().await {
                        warn!(target: "sweep.core.scheduler", error = %e, "terminate failed");
                    }
                    return;
                }
            },
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(0)) => debug!(target: "sweep.core.scheduler", "post-run hook finished"),
            Ok(code) => warn!(target: "sweep.core.scheduler", ?code, "post-run hook exited abnormally"),
            Err(e) => warn!(target: "sweep.core.scheduler", error = %e, "post-run hook failed"),
        }
    }
}

async fn expire(timeout: Option<Duration>) {
    match timeout {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
