mod job_status;
pub use job_status::JobStatus;

mod slot;
pub use slot::Slot;

mod priority;
pub use priority::Priority;

mod combination;
pub use combination::ParameterCombination;

mod job;
pub use job::SimJob;

mod summary;
pub use summary::{JobRecord, RunSummary};

/// Position of a slot inside the configured slot list.
///
/// The implicit slot of an empty pool is index `0` as well.
pub type SlotIndex = usize;
