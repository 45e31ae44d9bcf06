use sweep_core::RunnerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("missing program")]
    MissingProgram,
    #[error("spawn failed: {program}: {reason}")]
    Spawn { program: String, reason: String },
}

impl From<ExecError> for RunnerError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::MissingProgram => RunnerError::InvalidRequest(e.to_string()),
            ExecError::Spawn { .. } => RunnerError::Spawn(e.to_string()),
        }
    }
}
