use std::process::Stdio;

use async_trait::async_trait;
use sweep_core::{LaunchRequest, ProcessHandle, Runner, RunnerError};
use tokio::process::Child;
use tracing::{debug, trace};

use crate::{
    error::ExecError,
    util::{cmd_program, kill_graceful},
    utils::priority::attach_priority,
};

/// Runner spawning real OS processes with `tokio::process`.
///
/// Children inherit stdout/stderr so the engine's console output stays visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcRunner;

impl ProcRunner {
    pub fn new() -> Self {
        Self
    }

    fn spawn_child(&self, req: &LaunchRequest<'_>) -> Result<Child, ExecError> {
        let program = req
            .program()
            .filter(|p| !p.is_empty())
            .ok_or(ExecError::MissingProgram)?;

        let mut cmd = cmd_program(program, req.args());
        attach_priority(&mut cmd, req.priority);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        trace!(target: "sweep.exec.proc", job = req.job, program, args = ?req.args(), "spawn");
        cmd.spawn().map_err(|e| ExecError::Spawn {
            program: program.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Runner for ProcRunner {
    fn name(&self) -> &'static str {
        "proc"
    }

    fn spawn(&self, req: &LaunchRequest<'_>) -> Result<Box<dyn ProcessHandle>, RunnerError> {
        let child = self.spawn_child(req)?;
        Ok(Box::new(ProcHandle {
            job: req.job,
            child,
        }))
    }
}

/// A spawned engine process.
struct ProcHandle {
    job: usize,
    child: Child,
}

#[async_trait]
impl ProcessHandle for ProcHandle {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> Result<Option<i32>, RunnerError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| RunnerError::Wait(e.to_string()))?;
        debug!(target: "sweep.exec.proc", job = self.job, code = ?status.code(), "exit");
        Ok(status.code())
    }

    async fn terminate(&mut self) -> Result<(), RunnerError> {
        debug!(target: "sweep.exec.proc", job = self.job, "killing child");
        kill_graceful(&mut self.child)
            .await
            .map_err(|e| RunnerError::Terminate(e.to_string()))
    }
}
