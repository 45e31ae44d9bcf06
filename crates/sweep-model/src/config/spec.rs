use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{ConfigError, Priority, RunConfig, Slot, is_resource_flag, is_run_variable};

/// Validated, immutable description of one batch.
///
/// Only obtainable through [`RunSpec::from_config`], so every instance satisfies the
/// configuration invariants.
#[derive(Debug, Clone)]
pub struct RunSpec {
    engine_exe: PathBuf,
    template: PathBuf,
    batch_flags: Vec<String>,
    priority: Priority,
    slots: Vec<Slot>,
    values: BTreeMap<String, Vec<String>>,
    key_order: Vec<String>,
    execute: bool,
    launch_delay: Duration,
    pause_on_finish: bool,
    post_run_hook: Option<PathBuf>,
    export_path: PathBuf,
    job_timeout: Option<Duration>,
    summary_path: Option<PathBuf>,
}

impl RunSpec {
    /// Validate `cfg`, including existence of the executable and the template.
    pub fn from_config(cfg: RunConfig) -> Result<Self, ConfigError> {
        Self::build(cfg, true)
    }

    /// Validate `cfg` without touching the filesystem.
    pub fn from_config_unchecked(cfg: RunConfig) -> Result<Self, ConfigError> {
        Self::build(cfg, false)
    }

    fn build(cfg: RunConfig, check_paths: bool) -> Result<Self, ConfigError> {
        if cfg.engine_exe.as_os_str().is_empty() || (check_paths && !cfg.engine_exe.is_file()) {
            return Err(ConfigError::MissingExecutable(cfg.engine_exe));
        }
        if cfg.template.as_os_str().is_empty() || (check_paths && !cfg.template.is_file()) {
            return Err(ConfigError::MissingTemplate(cfg.template));
        }

        let priority: Priority = cfg.priority.parse()?;
        let batch_flags: Vec<String> = cfg
            .batch_flags
            .split_whitespace()
            .map(str::to_string)
            .collect();
        validate_resource_flags(&batch_flags, &cfg.slots)?;

        if let Some(key) = cfg.values.keys().find(|k| !is_run_variable(k)) {
            return Err(ConfigError::InvalidRunVariable(key.clone()));
        }

        let launch_delay = Duration::try_from_secs_f64(cfg.launch_delay_secs)
            .map_err(|_| ConfigError::InvalidLaunchDelay(cfg.launch_delay_secs))?;
        let job_timeout = match cfg.job_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let export_path = cfg
            .export_path
            .unwrap_or_else(|| default_export_path(&cfg.template));

        Ok(Self {
            engine_exe: cfg.engine_exe,
            template: cfg.template,
            batch_flags,
            priority,
            slots: cfg.slots,
            values: cfg.values,
            key_order: cfg.key_order.unwrap_or_default(),
            execute: cfg.execute,
            launch_delay,
            pause_on_finish: cfg.pause_on_finish,
            post_run_hook: cfg.post_run_hook,
            export_path,
            job_timeout,
            summary_path: cfg.summary_path,
        })
    }

    pub fn engine_exe(&self) -> &Path {
        &self.engine_exe
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn batch_flags(&self) -> &[String] {
        &self.batch_flags
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn values(&self) -> &BTreeMap<String, Vec<String>> {
        &self.values
    }

    /// Caller-supplied key priority; empty means natural (sorted) order.
    pub fn key_order(&self) -> &[String] {
        &self.key_order
    }

    pub fn execute(&self) -> bool {
        self.execute
    }

    pub fn launch_delay(&self) -> Duration {
        self.launch_delay
    }

    pub fn pause_on_finish(&self) -> bool {
        self.pause_on_finish
    }

    pub fn post_run_hook(&self) -> Option<&Path> {
        self.post_run_hook.as_deref()
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn job_timeout(&self) -> Option<Duration> {
        self.job_timeout
    }

    pub fn summary_path(&self) -> Option<&Path> {
        self.summary_path.as_deref()
    }
}

/// Check slot tokens and reject resource flags configured in two places at once.
pub fn validate_resource_flags(batch_flags: &[String], slots: &[Slot]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (i, slot) in slots.iter().enumerate() {
        if slot.tokens().is_empty() {
            return Err(ConfigError::EmptySlotGroup(i));
        }
        for token in slot.tokens() {
            if !is_resource_flag(token) {
                return Err(ConfigError::MalformedResourceFlag(token.clone()));
            }
            if !seen.insert(token.as_str()) {
                return Err(ConfigError::DuplicateResourceFlag(token.clone()));
            }
        }
    }

    if !slots.is_empty()
        && let Some(flag) = batch_flags
            .iter()
            .find(|f| is_resource_flag(f))
    {
        return Err(ConfigError::ConflictingResourceFlags(flag.clone()));
    }
    Ok(())
}

fn default_export_path(template: &Path) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run".to_string());
    template.with_file_name(format!("{stem}_commands.bat"))
}
