use std::{fmt, str::FromStr};

use crate::ConfigError;

/// Scheduling priority class the engine processes are launched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    BelowNormal,
    #[default]
    Normal,
    AboveNormal,
    High,
    Realtime,
}

impl Priority {
    /// Switch used by the `START` launch convention of the exported command log.
    pub fn start_switch(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::BelowNormal => "BELOWNORMAL",
            Priority::Normal => "NORMAL",
            Priority::AboveNormal => "ABOVENORMAL",
            Priority::High => "HIGH",
            Priority::Realtime => "REALTIME",
        }
    }
}

impl FromStr for Priority {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        match norm.as_str() {
            "low" => Ok(Priority::Low),
            "belownormal" => Ok(Priority::BelowNormal),
            "normal" => Ok(Priority::Normal),
            "abovenormal" => Ok(Priority::AboveNormal),
            "high" => Ok(Priority::High),
            "realtime" => Ok(Priority::Realtime),
            _ => Err(ConfigError::InvalidPriority(s.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.start_switch())
    }
}
