use crate::logger::{error::LoggerError, format::LoggerFormat};

/// Settings for the launcher's diagnostic log.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directive, e.g. `info` or `sweep.core=debug,info`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl LoggerConfig {
    /// Build from the textual labels found in the run file or on the command line.
    pub fn from_labels(level: &str, format: &str) -> Result<Self, LoggerError> {
        let format: LoggerFormat = format.parse()?;
        let level = level.trim();
        if level.is_empty() {
            return Err(LoggerError::InvalidLogLevel(level.to_string()));
        }
        Ok(Self {
            format,
            level: level.to_string(),
            ..Self::default()
        })
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: false,
            use_color: atty::is(atty::Stream::Stderr),
        }
    }
}
