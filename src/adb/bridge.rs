use crate::adb::runner::{ToolOutput, ToolRunner};
use crate::adb::shell::ShellCommand;
use crate::core::types::{DeviceId, TransferDirection};
use crate::error::{AdbxError, Result};
use log::*;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;

/// Handle to the bridge tool shared by device queries and transfers.
///
/// Once any invocation reports `ToolNotFound` the bridge is halted: the
/// condition is logged once and every later call fails fast with the same
/// error without spawning anything.
#[derive(Clone)]
pub struct Bridge {
    runner: Arc<dyn ToolRunner>,
    missing_tool: Arc<OnceLock<PathBuf>>,
}

impl Bridge {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self {
            runner,
            missing_tool: Arc::new(OnceLock::new()),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.missing_tool.get().is_some()
    }

    fn check_halted(&self) -> Result<()> {
        match self.missing_tool.get() {
            Some(path) => Err(AdbxError::ToolNotFound(path.clone())),
            None => Ok(()),
        }
    }

    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(AdbxError::ToolNotFound(path)) = &result {
            if self.missing_tool.set(path.clone()).is_ok() {
                error!("adb not found at {}; halting further device operations", path.display());
            }
        }
        result
    }

    /// Run a raw bridge invocation
    pub async fn run(&self, args: Vec<String>) -> Result<ToolOutput> {
        self.check_halted()?;
        let result = self.runner.run(&args).await;
        self.observe(result)
    }

    /// Run a raw bridge invocation, streaming its output lines
    pub async fn stream(&self, args: Vec<String>, lines: mpsc::UnboundedSender<String>) -> Result<i32> {
        self.check_halted()?;
        let result = self.runner.stream(&args, lines).await;
        self.observe(result)
    }

    /// `adb devices`
    pub async fn devices(&self) -> Result<ToolOutput> {
        self.run(vec!["devices".to_string()]).await
    }

    /// `adb -s <serial> shell <command>`
    pub async fn shell(&self, serial: &DeviceId, command: &ShellCommand) -> Result<ToolOutput> {
        self.run(shell_args(serial, command)).await
    }

    /// `adb -s <serial> push|pull -p <src> <dst>`, streaming output lines
    pub async fn transfer(
        &self,
        serial: &DeviceId,
        direction: TransferDirection,
        src: &str,
        dst: &str,
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<i32> {
        self.stream(transfer_args(serial, direction, src, dst), lines).await
    }
}

pub fn shell_args(serial: &DeviceId, command: &ShellCommand) -> Vec<String> {
    vec![
        "-s".to_string(),
        serial.to_string(),
        "shell".to_string(),
        command.to_command_line(),
    ]
}

pub fn transfer_args(serial: &DeviceId, direction: TransferDirection, src: &str, dst: &str) -> Vec<String> {
    vec![
        "-s".to_string(),
        serial.to_string(),
        direction.subcommand().to_string(),
        "-p".to_string(),
        src.to_string(),
        dst.to_string(),
    ]
}
