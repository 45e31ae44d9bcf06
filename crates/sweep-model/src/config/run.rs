use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::Slot;

/// Raw, unvalidated batch configuration as read from a TOML file.
///
/// Turn it into a [`crate::RunSpec`] before use; nothing downstream accepts a `RunConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Path of the engine executable.
    pub engine_exe: PathBuf,
    /// Path of the template; its file name carries the `[xy]` placeholders.
    pub template: PathBuf,
    /// Static flags passed to every job, space separated.
    pub batch_flags: String,
    /// Priority class label (`low`, `belownormal`, `normal`, `abovenormal`, `high`, `realtime`).
    pub priority: String,
    /// Exclusive resource slots; empty means one implicit slot.
    pub slots: Vec<Slot>,
    /// Candidate values per run-variable key.
    pub values: BTreeMap<String, Vec<String>>,
    /// Keys to iterate first, in this order; other keys follow in natural order.
    pub key_order: Option<Vec<String>>,
    /// Spawn the jobs; when `false` only the command log is written.
    pub execute: bool,
    /// Pause after each launch, in seconds.
    pub launch_delay_secs: f64,
    /// Wait for Enter before the launcher exits.
    pub pause_on_finish: bool,
    /// Executable run once after a batch that was not interrupted.
    pub post_run_hook: Option<PathBuf>,
    /// Where to write the command log; defaults to `<template stem>_commands.bat`.
    pub export_path: Option<PathBuf>,
    /// Terminate jobs running longer than this many seconds.
    pub job_timeout_secs: Option<u64>,
    /// Where to write the JSON run summary.
    pub summary_path: Option<PathBuf>,
    pub log: LogSection,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            engine_exe: PathBuf::new(),
            template: PathBuf::new(),
            batch_flags: String::new(),
            priority: "normal".to_string(),
            slots: Vec::new(),
            values: BTreeMap::new(),
            key_order: None,
            execute: false,
            launch_delay_secs: 0.0,
            pause_on_finish: false,
            post_run_hook: None,
            export_path: None,
            job_timeout_secs: None,
            summary_path: None,
            log: LogSection::default(),
        }
    }
}

/// `[log]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub level: String,
    pub format: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
