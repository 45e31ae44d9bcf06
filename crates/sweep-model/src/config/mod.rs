mod error;
pub use error::ConfigError;

mod run;
pub use run::{LogSection, RunConfig};

mod spec;
pub use spec::{RunSpec, validate_resource_flags};
