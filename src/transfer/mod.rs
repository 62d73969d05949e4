pub mod gate;
pub mod job;
pub mod queue;
pub mod scraper;
pub mod task;

pub use gate::{TransferGate, TransferPermit};
pub use job::{TransferJob, PARTIAL_SUFFIX};
pub use queue::{BatchSummary, FailedJob, TransferQueue};
pub use scraper::{PercentParser, ProgressParser};
pub use task::{
    CancelToken, TransferEvent, TransferHandle, TransferOutcome, TransferProgress, TransferState,
    TransferTask,
};

#[cfg(test)]
mod task_test;

#[cfg(test)]
mod queue_test;
