use sweep_model::{ConfigError, JobStatus};
use thiserror::Error;

use crate::export::ExportError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("unknown job #{0}")]
    UnknownJob(usize),

    #[error("job #{index}: invalid transition {from} -> {to}")]
    InvalidTransition {
        index: usize,
        from: JobStatus,
        to: JobStatus,
    },
}
