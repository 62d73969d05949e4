use crate::error::{AdbxError, Result};
use async_trait::async_trait;
use log::*;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;

const READ_CHUNK: usize = 4096;

/// Captured result of one bridge invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Error text to report on failure: stderr, falling back to stdout
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Process invocation seam for the bridge tool.
///
/// Implementations must kill the child process when a returned future is
/// dropped, so callers can cancel or time out by dropping.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run to completion and capture stdout/stderr
    async fn run(&self, args: &[String]) -> Result<ToolOutput>;

    /// Run to completion, forwarding every stdout/stderr line to `lines`.
    /// Returns the exit code.
    async fn stream(&self, args: &[String], lines: mpsc::UnboundedSender<String>) -> Result<i32>;
}

/// Runs the real `adb` executable
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    adb_path: PathBuf,
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(adb_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            adb_path: adb_path.into(),
            timeout,
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.adb_path);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, e: std::io::Error) -> AdbxError {
        match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                AdbxError::ToolNotFound(self.adb_path.clone())
            }
            _ => AdbxError::Io(e),
        }
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, args: &[String]) -> Result<ToolOutput> {
        debug!("Running: {} {}", self.adb_path.display(), args.join(" "));

        let output = match tokio::time::timeout(self.timeout, self.command(args).output()).await {
            Ok(result) => result.map_err(|e| self.spawn_error(e))?,
            Err(_) => {
                warn!("adb {} timed out, killed", args.join(" "));
                return Err(AdbxError::Timeout {
                    command: format!("adb {}", args.join(" ")),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let result = ToolOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!("Exit code: {}", result.exit_code);
        Ok(result)
    }

    async fn stream(&self, args: &[String], lines: mpsc::UnboundedSender<String>) -> Result<i32> {
        debug!("Streaming: {} {}", self.adb_path.display(), args.join(" "));

        let mut child = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, _, _) = tokio::join!(
            child.wait(),
            forward_lines(stdout, lines.clone()),
            forward_lines(stderr, lines),
        );

        let code = status?.code().unwrap_or(-1);
        debug!("Stream exit code: {}", code);
        Ok(code)
    }
}

async fn forward_lines<R>(reader: Option<R>, lines: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };
    let mut splitter = LineSplitter::default();
    let mut buffer = vec![0u8; READ_CHUNK];

    loop {
        match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => {
                for line in splitter.push(&buffer[..n]) {
                    // Receiver gone means nobody cares about the rest
                    if lines.send(line).is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                warn!("Error reading adb output: {}", e);
                break;
            }
        }
    }

    if let Some(rest) = splitter.finish() {
        let _ = lines.send(rest);
    }
}

/// Splits a byte stream into lines on `\n` or `\r`.
///
/// The bridge tool redraws its progress indicator with carriage returns,
/// so both count as terminators. Empty lines are dropped.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &b in bytes {
            if b == b'\n' || b == b'\r' {
                if let Some(line) = self.take() {
                    lines.push(line);
                }
            } else {
                self.pending.push(b);
            }
        }
        lines
    }

    pub fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).to_string();
        self.pending.clear();
        Some(line)
    }
}
