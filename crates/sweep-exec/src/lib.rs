mod error;
pub use error::ExecError;

mod util;
pub use util::kill_graceful;

pub mod utils;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::ProcRunner;
