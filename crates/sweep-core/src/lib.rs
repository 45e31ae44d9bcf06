pub mod error;
pub use error::CoreError;

pub mod runner;
pub use runner::{LaunchRequest, ProcessHandle, Runner, RunnerError};

pub mod space;
pub use space::{ParameterSpace, placeholders};

pub mod builder;
pub use builder::CommandBuilder;

pub mod pool;
pub use pool::{SlotEvent, SlotPool};

pub mod state;
pub use state::JobLedger;

pub mod scheduler;
pub use scheduler::Scheduler;

pub mod export;
pub use export::{CommandExporter, ExportError};

pub mod cancel;
pub use cancel::CancellationHandler;

use sweep_model::{RunSpec, SimJob};

/// Enumerate the parameter space of `spec` and build every job, in enumeration order.
pub fn prepare(spec: &RunSpec) -> Result<Vec<SimJob>, CoreError> {
    let builder = CommandBuilder::new(spec)?;
    let space = ParameterSpace::from_spec(spec);
    Ok(builder.build(&space.combinations()))
}
