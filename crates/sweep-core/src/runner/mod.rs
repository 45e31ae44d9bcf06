//! Seam between the scheduler and whatever actually runs the engine.
//!
//! The OS implementation lives in `sweep-exec`; tests plug in an in-memory runner.
use async_trait::async_trait;
use sweep_model::Priority;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid launch request: {0}")]
    InvalidRequest(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
    #[error("terminate failed: {0}")]
    Terminate(String),
}

/// Everything a runner needs to start one process.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    /// Job index, `0` for the post-run hook.
    pub job: usize,
    /// Full argument vector; `argv[0]` is the program.
    pub argv: &'a [String],
    pub priority: Priority,
}

impl LaunchRequest<'_> {
    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}

/// Starts external processes.
pub trait Runner: Send + Sync {
    fn name(&self) -> &'static str;

    /// Spawn the process described by `req` without waiting for it.
    fn spawn(&self, req: &LaunchRequest<'_>) -> Result<Box<dyn ProcessHandle>, RunnerError>;
}

/// A spawned process owned by exactly one waiter task.
#[async_trait]
pub trait ProcessHandle: Send {
    /// OS process id, when there is one.
    fn id(&self) -> Option<u32>;

    /// Resolve once the process exited.
    ///
    /// `Ok(None)` means the process ended without an exit code (killed by a signal).
    async fn wait(&mut self) -> Result<Option<i32>, RunnerError>;

    /// Request termination; best effort, the caller does not wait for the exit.
    async fn terminate(&mut self) -> Result<(), RunnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_splits_program_and_args() {
        let argv = vec!["engine".to_string(), "-b".to_string(), "model.tcf".to_string()];
        let req = LaunchRequest {
            job: 1,
            argv: &argv,
            priority: Priority::Normal,
        };
        assert_eq!(req.program(), Some("engine"));
        assert_eq!(req.args(), ["-b", "model.tcf"]);
    }

    #[test]
    fn empty_request_has_no_program() {
        let req = LaunchRequest {
            job: 0,
            argv: &[],
            priority: Priority::Low,
        };
        assert!(req.program().is_none());
        assert!(req.args().is_empty());
    }
}
