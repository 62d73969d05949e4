//! Planning and running push/pull batches for the CLI and the browser.

use crate::core::context::CommandContext;
use crate::core::path::RemotePath;
use crate::core::types::{OutputFormat, TransferDirection};
use crate::device::DeviceSession;
use crate::error::{AdbxError, Result};
use crate::output::TransferRecord;
use crate::progress::ProgressReporter;
use crate::transfer::{BatchSummary, TransferEvent, TransferJob, TransferOutcome, TransferState};
use log::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Jobs for a push, plus the remote directories they need
#[derive(Debug, Default)]
pub struct PushPlan {
    pub directories: Vec<RemotePath>,
    pub jobs: Vec<TransferJob>,
}

/// Expand local sources into one job per file under `remote_dir`.
///
/// Directories are only accepted with `recursive`; their layout is
/// recreated below `remote_dir/<dirname>`.
pub fn plan_push(locals: &[PathBuf], remote_dir: &RemotePath, recursive: bool) -> Result<PushPlan> {
    let mut plan = PushPlan::default();

    for local in locals {
        let name = file_name(local)?;
        let metadata = std::fs::metadata(local)?;

        if !metadata.is_dir() {
            plan.jobs.push(TransferJob::push(local, remote_dir.join(&name)));
            continue;
        }
        if !recursive {
            return Err(AdbxError::Other(format!(
                "{} is a directory (use --recursive)",
                local.display()
            )));
        }

        let base = remote_dir.join(&name);
        for entry in WalkDir::new(local).sort_by_file_name() {
            let entry = entry.map_err(|e| AdbxError::Other(e.to_string()))?;
            let relative = entry
                .path()
                .strip_prefix(local)
                .map_err(|e| AdbxError::Other(e.to_string()))?;
            let remote = base.join(&relative.to_string_lossy());

            if entry.file_type().is_dir() {
                plan.directories.push(remote);
            } else if entry.file_type().is_file() {
                plan.jobs.push(TransferJob::push(entry.path(), remote));
            } else {
                debug!("Skipping {}", entry.path().display());
            }
        }
    }
    Ok(plan)
}

/// One job per remote source, landing in `local_dir`
pub fn plan_pull(remotes: &[RemotePath], local_dir: &Path) -> Result<Vec<TransferJob>> {
    remotes
        .iter()
        .map(|remote| {
            let name = remote
                .name()
                .ok_or_else(|| AdbxError::InvalidPath(format!("cannot pull {}", remote)))?;
            Ok(TransferJob::pull(remote.clone(), local_dir.join(name)))
        })
        .collect()
}

fn file_name(local: &Path) -> Result<String> {
    if let Some(name) = local.file_name() {
        return Ok(name.to_string_lossy().to_string());
    }
    // `.` and `..` have no name of their own
    std::fs::canonicalize(local)?
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AdbxError::Other(format!("cannot push {}", local.display())))
}

/// Split jobs into those to run and those skipped because the destination
/// already exists. With `force` nothing is skipped.
pub async fn skip_existing(
    session: &DeviceSession,
    jobs: Vec<TransferJob>,
    force: bool,
) -> Result<(Vec<TransferJob>, Vec<TransferRecord>)> {
    if force {
        return Ok((jobs, Vec::new()));
    }

    let mut run = Vec::new();
    let mut skipped = Vec::new();
    for job in jobs {
        let exists = match job.direction {
            TransferDirection::Push => session.exists(&job.remote).await?,
            TransferDirection::Pull => job.local.exists(),
        };
        if exists {
            info!("Skipping {}: destination exists", job);
            skipped.push(TransferRecord::skipped(&job));
        } else {
            run.push(job);
        }
    }
    Ok((run, skipped))
}

/// Run `jobs` one after another with a progress bar each. Ctrl-C cancels
/// the running job and the rest of the batch.
pub async fn run_batch(
    ctx: &CommandContext,
    session: &DeviceSession,
    jobs: Vec<TransferJob>,
) -> BatchSummary {
    let mut queue = session.transfer_queue();
    for job in jobs {
        queue.enqueue(job);
    }

    let token = queue.cancel_token();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling transfers");
            token.cancel();
        }
    });

    let progress = ctx.progress();
    let mut current: Option<Box<dyn ProgressReporter>> = None;
    let summary = queue
        .run(|job, event| match event {
            TransferEvent::State(TransferState::SizingSource) => {
                current = Some(progress.transfer(&job.display_name()));
            }
            TransferEvent::Sized(total) => {
                if let Some(bar) = &current {
                    bar.start(*total);
                }
            }
            TransferEvent::State(_) => {}
            TransferEvent::Progress(p) => {
                if let Some(bar) = &current {
                    bar.update(p);
                }
            }
            TransferEvent::Finished(outcome) => {
                if let Some(bar) = current.take() {
                    match outcome {
                        TransferOutcome::Completed { .. } => bar.finish("done"),
                        TransferOutcome::Failed(e) => bar.abandon(&e.to_string()),
                    }
                }
            }
        })
        .await;

    watcher.abort();
    summary
}

/// Print the per-job results; an error if any job failed
pub fn report(ctx: &CommandContext, summary: &BatchSummary, skipped: Vec<TransferRecord>) -> Result<()> {
    let mut records = skipped;
    records.extend(TransferRecord::from_summary(summary));

    let formatter = ctx.formatter();
    match ctx.output_format {
        OutputFormat::Table if records.iter().all(|r| r.status == "ok") => formatter.success(
            &format!("{} file(s) transferred", summary.completed.len()),
        )?,
        format => formatter.render(format, &records)?,
    }

    if summary.all_succeeded() {
        Ok(())
    } else {
        Err(AdbxError::Other(format!(
            "{} of {} transfer(s) failed",
            summary.failed.len(),
            summary.failed.len() + summary.completed.len()
        )))
    }
}
