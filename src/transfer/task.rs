use crate::core::types::TransferDirection;
use crate::device::RemoteFs;
use crate::error::{AdbxError, Result};
use crate::transfer::gate::TransferPermit;
use crate::transfer::job::TransferJob;
use crate::transfer::scraper::{approx_bytes, PercentParser, ProgressParser};
use log::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Diagnostic lines kept from a failing transfer
const MAX_DIAGNOSTIC_LINES: usize = 20;

/// Lifecycle of a transfer. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferState {
    Pending,
    SizingSource,
    Transferring,
    Completed,
    Failed,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed)
    }
}

/// Progress estimate scraped from the tool's output.
///
/// `approx_bytes` is `percent/100 * total_bytes`, not a measured count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferProgress {
    pub percent: u8,
    pub approx_bytes: u64,
    pub total_bytes: u64,
}

#[derive(Debug)]
pub enum TransferOutcome {
    Completed { message: String, total_bytes: u64 },
    Failed(AdbxError),
}

/// Messages from the transfer worker to whoever drives the UI
#[derive(Debug)]
pub enum TransferEvent {
    State(TransferState),
    /// Source size in bytes, once sizing succeeded
    Sized(u64),
    Progress(TransferProgress),
    /// Sent exactly once, last
    Finished(TransferOutcome),
}

/// Cloneable cancellation signal shared between a transfer and its owner
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Owner side of a spawned transfer
pub struct TransferHandle {
    job: TransferJob,
    events: mpsc::UnboundedReceiver<TransferEvent>,
    cancel: CancelToken,
    join: JoinHandle<TransferState>,
}

impl TransferHandle {
    pub fn job(&self) -> &TransferJob {
        &self.job
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Kill the running bridge process; the task ends `Failed(Cancelled)`
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Next event, or `None` once the worker has finished
    pub async fn next_event(&mut self) -> Option<TransferEvent> {
        self.events.recv().await
    }

    /// Wait for the worker to exit and return its terminal state
    pub async fn wait(self) -> Result<TransferState> {
        self.join
            .await
            .map_err(|e| AdbxError::Other(format!("transfer worker failed: {}", e)))
    }
}

/// A single push or pull run as a background unit of work.
///
/// `Pending → SizingSource → Transferring → {Completed | Failed}`. The bridge
/// writes to a temporary destination which is renamed into place only on
/// success, so a failed or cancelled transfer never leaves a truncated file
/// under the final name.
pub struct TransferTask {
    remote: RemoteFs,
    job: TransferJob,
    parser: Arc<dyn ProgressParser>,
    timeout: Option<Duration>,
}

impl TransferTask {
    pub fn new(remote: RemoteFs, job: TransferJob) -> Self {
        Self {
            remote,
            job,
            parser: Arc::new(PercentParser),
            timeout: None,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ProgressParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run on a background tokio task, reporting over a channel
    pub fn spawn(self, permit: TransferPermit, cancel: CancelToken) -> TransferHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let job = self.job.clone();
        let cancel_rx = cancel.subscribe();

        let join = tokio::spawn(async move {
            let _permit = permit;
            self.run(&tx, cancel_rx).await
        });

        TransferHandle {
            job,
            events: rx,
            cancel,
            join,
        }
    }

    /// Drive the state machine to a terminal state, emitting events
    pub async fn run(
        self,
        events: &mpsc::UnboundedSender<TransferEvent>,
        mut cancel: watch::Receiver<bool>,
    ) -> TransferState {
        info!("Starting {}", self.job);
        emit(events, TransferEvent::State(TransferState::Pending));
        emit(events, TransferEvent::State(TransferState::SizingSource));

        let total = match self.size_source().await {
            Ok(total) => total,
            Err(e) => return self.fail(events, e),
        };
        debug!("Source size: {} bytes", total);
        emit(events, TransferEvent::Sized(total));

        emit(events, TransferEvent::State(TransferState::Transferring));

        let mut last_percent = 0u8;
        if let Err(e) = self.transfer(total, events, &mut cancel, &mut last_percent).await {
            self.discard_partial().await;
            return self.fail(events, e);
        }

        if let Err(e) = self.commit().await {
            self.discard_partial().await;
            return self.fail(events, e);
        }

        if last_percent < 100 {
            emit(
                events,
                TransferEvent::Progress(TransferProgress {
                    percent: 100,
                    approx_bytes: total,
                    total_bytes: total,
                }),
            );
        }

        info!("Completed {}", self.job);
        emit(events, TransferEvent::State(TransferState::Completed));
        emit(
            events,
            TransferEvent::Finished(TransferOutcome::Completed {
                message: format!("Transfer completed successfully: {}", self.job),
                total_bytes: total,
            }),
        );
        TransferState::Completed
    }

    async fn size_source(&self) -> Result<u64> {
        match self.job.direction {
            TransferDirection::Push => {
                let metadata = tokio::fs::metadata(&self.job.local).await.map_err(|e| {
                    AdbxError::SizeUnavailable {
                        path: self.job.source(),
                        detail: e.to_string(),
                    }
                })?;
                if !metadata.is_file() {
                    return Err(AdbxError::SizeUnavailable {
                        path: self.job.source(),
                        detail: "not a regular file".to_string(),
                    });
                }
                Ok(metadata.len())
            }
            TransferDirection::Pull => self
                .remote
                .stat_size(&self.job.remote)
                .await
                .map_err(|e| AdbxError::SizeUnavailable {
                    path: self.job.source(),
                    detail: e.to_string(),
                }),
        }
    }

    async fn transfer(
        &self,
        total: u64,
        events: &mpsc::UnboundedSender<TransferEvent>,
        cancel: &mut watch::Receiver<bool>,
        last_percent: &mut u8,
    ) -> Result<()> {
        let (src, dst) = match self.job.direction {
            TransferDirection::Push => (self.job.source(), self.job.partial_remote()),
            TransferDirection::Pull => (
                self.job.source(),
                self.job.partial_local().display().to_string(),
            ),
        };

        let (line_tx, mut line_rx) = mpsc::unbounded_channel();
        let bridge = self.remote.bridge();
        let process = bridge.transfer(self.remote.serial(), self.job.direction, &src, &dst, line_tx);
        tokio::pin!(process);

        let timeout = self.timeout;
        let deadline = async move {
            match timeout {
                Some(d) => tokio::time::sleep(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut diagnostic: Vec<String> = Vec::new();

        // Dropping `process` on an early return kills the child
        let exit_code = loop {
            tokio::select! {
                Some(line) = line_rx.recv() => {
                    self.observe_line(&line, total, last_percent, &mut diagnostic, events);
                }
                result = &mut process => {
                    while let Ok(line) = line_rx.try_recv() {
                        self.observe_line(&line, total, last_percent, &mut diagnostic, events);
                    }
                    break result?;
                }
                _ = cancelled(cancel) => {
                    warn!("Cancelling {}", self.job);
                    return Err(AdbxError::Cancelled);
                }
                _ = &mut deadline => {
                    warn!("Timed out: {}", self.job);
                    return Err(AdbxError::Timeout {
                        command: format!("adb {} {} {}", self.job.direction, src, dst),
                        secs: timeout.map(|d| d.as_secs()).unwrap_or_default(),
                    });
                }
            }
        };

        if exit_code != 0 {
            return Err(AdbxError::TransferFailed {
                exit_code,
                diagnostic: if diagnostic.is_empty() {
                    "no output from adb".to_string()
                } else {
                    diagnostic.join("\n")
                },
            });
        }
        Ok(())
    }

    fn observe_line(
        &self,
        line: &str,
        total: u64,
        last_percent: &mut u8,
        diagnostic: &mut Vec<String>,
        events: &mpsc::UnboundedSender<TransferEvent>,
    ) {
        match self.parser.parse(line) {
            Some(percent) if percent > *last_percent => {
                *last_percent = percent;
                emit(
                    events,
                    TransferEvent::Progress(TransferProgress {
                        percent,
                        approx_bytes: approx_bytes(percent, total),
                        total_bytes: total,
                    }),
                );
            }
            Some(_) => {}
            None => {
                let line = line.trim();
                if !line.is_empty() {
                    debug!("adb: {}", line);
                    if diagnostic.len() == MAX_DIAGNOSTIC_LINES {
                        diagnostic.remove(0);
                    }
                    diagnostic.push(line.to_string());
                }
            }
        }
    }

    /// Move the temporary destination to the final name
    async fn commit(&self) -> Result<()> {
        match self.job.direction {
            TransferDirection::Push => {
                self.remote
                    .move_path(&self.job.partial_remote(), self.job.remote.as_str())
                    .await
            }
            TransferDirection::Pull => {
                tokio::fs::rename(self.job.partial_local(), &self.job.local).await?;
                Ok(())
            }
        }
    }

    async fn discard_partial(&self) {
        let result = match self.job.direction {
            TransferDirection::Push => self.remote.remove_file(&self.job.partial_remote()).await,
            TransferDirection::Pull => remove_local(&self.job.partial_local()).await,
        };
        if let Err(e) = result {
            warn!("Could not remove partial destination for {}: {}", self.job, e);
        }
    }

    fn fail(&self, events: &mpsc::UnboundedSender<TransferEvent>, error: AdbxError) -> TransferState {
        error!("{} failed: {}", self.job, error);
        emit(events, TransferEvent::State(TransferState::Failed));
        emit(events, TransferEvent::Finished(TransferOutcome::Failed(error)));
        TransferState::Failed
    }
}

async fn remove_local(path: &std::path::Path) -> Result<()> {
    let result = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
        Ok(_) => tokio::fs::remove_file(path).await,
        Err(e) => Err(e),
    };
    match result {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn emit(events: &mpsc::UnboundedSender<TransferEvent>, event: TransferEvent) {
    // The receiver may have been dropped; the transfer still runs to completion
    let _ = events.send(event);
}
