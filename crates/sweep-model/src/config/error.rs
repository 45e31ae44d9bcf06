use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration problems, always raised before any job is built or spawned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("engine executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),
    #[error("template not found: {}", .0.display())]
    MissingTemplate(PathBuf),
    #[error("unknown priority label: {0} (expected: low|belownormal|normal|abovenormal|high|realtime)")]
    InvalidPriority(String),
    #[error("malformed resource flag token: {0:?}")]
    MalformedResourceFlag(String),
    #[error("resource slot #{0} is an empty group")]
    EmptySlotGroup(usize),
    #[error("resource flag {0} is assigned to more than one slot")]
    DuplicateResourceFlag(String),
    #[error("resource flag {0} is set in batch flags while a slot list is configured")]
    ConflictingResourceFlags(String),
    #[error("invalid run-variable key: {0:?} (expected e1..e9 or s1..s9)")]
    InvalidRunVariable(String),
    #[error("invalid launch delay: {0} (expected a finite number of seconds >= 0)")]
    InvalidLaunchDelay(f64),
    #[error("job timeout must be greater than zero")]
    ZeroTimeout,
}
