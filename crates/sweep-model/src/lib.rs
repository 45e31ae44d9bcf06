mod constants;
pub use constants::*;

mod domain;
pub use domain::*;

mod config;
pub use config::{ConfigError, LogSection, RunConfig, RunSpec, validate_resource_flags};
