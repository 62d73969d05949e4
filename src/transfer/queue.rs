use crate::device::RemoteFs;
use crate::error::AdbxError;
use crate::transfer::gate::TransferGate;
use crate::transfer::job::TransferJob;
use crate::transfer::scraper::{PercentParser, ProgressParser};
use crate::transfer::task::{CancelToken, TransferEvent, TransferOutcome, TransferTask};
use log::*;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Result of a batch of transfers
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub completed: Vec<TransferJob>,
    pub failed: Vec<FailedJob>,
}

#[derive(Debug, Serialize)]
pub struct FailedJob {
    pub job: TransferJob,
    pub error: String,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs transfers strictly one after another.
///
/// A failed job is recorded and the queue moves on; cancellation stops the
/// running job and marks every remaining one as cancelled.
pub struct TransferQueue {
    remote: RemoteFs,
    gate: TransferGate,
    jobs: VecDeque<TransferJob>,
    parser: Arc<dyn ProgressParser>,
    timeout: Option<Duration>,
    cancel: CancelToken,
}

impl TransferQueue {
    pub fn new(remote: RemoteFs, gate: TransferGate) -> Self {
        Self {
            remote,
            gate,
            jobs: VecDeque::new(),
            parser: Arc::new(PercentParser),
            timeout: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn ProgressParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn enqueue(&mut self, job: TransferJob) {
        self.jobs.push_back(job);
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Token that cancels the running job and the rest of the batch
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every queued job, handing each event to `observer`
    pub async fn run<F>(mut self, mut observer: F) -> BatchSummary
    where
        F: FnMut(&TransferJob, &TransferEvent),
    {
        let mut summary = BatchSummary::default();
        let total = self.jobs.len();

        while let Some(job) = self.jobs.pop_front() {
            if self.cancel.is_cancelled() {
                summary.failed.push(FailedJob {
                    job,
                    error: AdbxError::Cancelled.to_string(),
                });
                continue;
            }

            let index = total - self.jobs.len();
            debug!("Transfer {}/{}: {}", index, total, job);

            let permit = match self.gate.try_acquire() {
                Ok(permit) => permit,
                Err(e) => {
                    summary.failed.push(FailedJob {
                        job,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let mut handle = TransferTask::new(self.remote.clone(), job.clone())
                .with_parser(self.parser.clone())
                .with_timeout(self.timeout)
                .spawn(permit, self.cancel.clone());

            let mut outcome = None;
            while let Some(event) = handle.next_event().await {
                observer(&job, &event);
                if let TransferEvent::Finished(result) = event {
                    outcome = Some(result);
                }
            }

            // The permit is released when the worker exits
            if let Err(e) = handle.wait().await {
                warn!("{}", e);
            }

            match outcome {
                Some(TransferOutcome::Completed { .. }) => summary.completed.push(job),
                Some(TransferOutcome::Failed(e)) => summary.failed.push(FailedJob {
                    job,
                    error: e.to_string(),
                }),
                None => summary.failed.push(FailedJob {
                    job,
                    error: "transfer ended without an outcome".to_string(),
                }),
            }
        }

        info!(
            "Batch finished: {} completed, {} failed",
            summary.completed.len(),
            summary.failed.len()
        );
        summary
    }
}
